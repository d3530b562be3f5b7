use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::invoice::{Invoice, render_print_view};

/// Writes the print view of `invoice` to `output`, or to stdout when no path is given.
#[tracing::instrument(skip(invoice))]
pub fn print(invoice: &Invoice, output: Option<&Path>) -> Result<()> {
    let view = render_print_view(invoice);

    match output {
        Some(path) => {
            std::fs::write(path, &view)
                .with_context(|| format!("Failed to write print view to {:?}", path))?;
            info!("Print view for {} written to {:?}", invoice.invoice_id, path);
        }
        None => print!("{}", view),
    }
    Ok(())
}
