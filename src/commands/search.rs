use anyhow::Result;
use std::time::Duration;

use crate::{
    error::CallError,
    http::{Sleeper, Transport},
    invoice::{StoredInvoice, render_not_found, render_search_details},
    remote::{ReadInvoice, RemoteCall, Status, StatusSink},
};

pub const EMPTY_SEARCH_TEXT: &str =
    "Please enter a valid Invoice ID (e.g., INV-123456789) to search.";

/// Looks up one invoice by id. Surrounding whitespace in the id is ignored.
#[tracing::instrument(skip(call, sink))]
pub async fn search_invoice<T: Transport, S: Sleeper>(
    call: &RemoteCall<T, S>,
    invoice_id: &str,
    sink: &dyn StatusSink,
) -> Result<StoredInvoice, CallError> {
    let invoice_id = invoice_id.trim();
    if invoice_id.is_empty() {
        sink.show(Status::error(EMPTY_SEARCH_TEXT, Duration::from_secs(5)));
        return Err(CallError::InvalidInput(EMPTY_SEARCH_TEXT.to_string()));
    }

    call.perform_with_retry(&ReadInvoice::new(invoice_id), sink)
        .await
}

/// CLI entry point: prints the details block, or the endpoint's rejection.
pub async fn search<T: Transport, S: Sleeper>(
    call: &RemoteCall<T, S>,
    invoice_id: &str,
    sink: &dyn StatusSink,
) -> Result<()> {
    match search_invoice(call, invoice_id, sink).await {
        Ok(invoice) => {
            println!("{}", render_search_details(&invoice));
            Ok(())
        }
        Err(CallError::Logical(message)) => {
            println!("{}", render_not_found(&message));
            Err(CallError::Logical(message).into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MockSleeper, MockTransport, RawResponse, RetryPolicy};
    use crate::remote::StatusKind;
    use crate::test_utils::{RecordingSink, test_endpoint};

    fn remote_call(transport: MockTransport) -> RemoteCall<MockTransport, MockSleeper> {
        RemoteCall::new(
            transport,
            MockSleeper::new(),
            test_endpoint(),
            RetryPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_search_blank_id_makes_no_call() {
        let call = remote_call(MockTransport::new());
        let sink = RecordingSink::new();

        let err = search_invoice(&call, "   ", &sink).await.unwrap_err();

        assert!(matches!(err, CallError::InvalidInput(_)));
        assert_eq!(
            sink.statuses(),
            vec![Status::error(EMPTY_SEARCH_TEXT, Duration::from_secs(5))]
        );
    }

    #[tokio::test]
    async fn test_search_trims_id() {
        let mut transport = MockTransport::new();
        transport
            .expect_get_with_query()
            .withf(|_, query| query == [("invoiceId".to_string(), "INV-3".to_string())])
            .times(1)
            .returning(|_, _| {
                Ok(RawResponse::new(
                    200,
                    r#"{"result":"success","invoice":{"Invoice ID":"INV-3","Customer Name":"Ada"}}"#,
                ))
            });

        let call = remote_call(transport);
        let sink = RecordingSink::new();
        let invoice = search_invoice(&call, "  INV-3\n", &sink).await.unwrap();

        assert_eq!(invoice.customer_name.to_string(), "Ada");
        assert_eq!(sink.count(StatusKind::Success), 1);
    }

    #[tokio::test]
    async fn test_search_not_found_is_an_error() {
        let mut transport = MockTransport::new();
        transport.expect_get_with_query().times(1).returning(|_, _| {
            Ok(RawResponse::new(
                200,
                r#"{"result":"error","message":"Invoice not found"}"#,
            ))
        });

        let call = remote_call(transport);
        let sink = RecordingSink::new();
        let err = search(&call, "INV-999", &sink).await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<CallError>(),
            Some(&CallError::Logical("Invoice not found".into()))
        );
    }
}
