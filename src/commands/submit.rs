use anyhow::Result;
use log::info;
use std::time::Duration;

use crate::{
    error::CallError,
    http::{Sleeper, Transport},
    invoice::{Invoice, generate_invoice_id},
    remote::{CreateInvoice, RemoteCall, Status, StatusSink},
};

/// Saves an invoice to the spreadsheet and returns the id the endpoint confirmed.
///
/// Required fields are checked first; nothing is sent if one is empty.
#[tracing::instrument(skip(call, invoice, sink), fields(invoice_id = %invoice.invoice_id))]
pub async fn submit_invoice<T: Transport, S: Sleeper>(
    call: &RemoteCall<T, S>,
    invoice: Invoice,
    sink: &dyn StatusSink,
) -> Result<String, CallError> {
    let missing = invoice.missing_fields();
    if !missing.is_empty() {
        let message = format!("Please fill in: {}.", missing.join(", "));
        sink.show(Status::error(message.clone(), Duration::from_secs(5)));
        return Err(CallError::InvalidInput(message));
    }

    call.perform_with_retry(&CreateInvoice::new(invoice), sink)
        .await
}

/// CLI entry point: submits, then prints a fresh id for the next invoice.
pub async fn submit<T: Transport, S: Sleeper>(
    call: &RemoteCall<T, S>,
    invoice: Invoice,
    sink: &dyn StatusSink,
) -> Result<()> {
    let confirmed = submit_invoice(call, invoice, sink).await?;
    info!("Invoice {} saved", confirmed);

    println!("Next invoice ID: {}", generate_invoice_id());
    Ok(())
}
