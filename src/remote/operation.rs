//! Descriptors for the two remote operations: create and read an invoice.
//!
//! A descriptor knows its request shape, how to decode a transport-level
//! success, and what to tell the user. The retry loop itself lives in
//! [`super::RemoteCall`] and is shared by both.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use super::status::Status;
use crate::error::TransportError;
use crate::invoice::{Invoice, StoredInvoice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    Read,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Create => write!(f, "create"),
            OperationKind::Read => write!(f, "read"),
        }
    }
}

/// What is sent on every attempt of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// URL-encoded form body, sent with `POST`.
    Form(Vec<(String, String)>),
    /// Query parameters, sent with `GET`.
    Query(Vec<(String, String)>),
}

/// Result of decoding the body of a transport-level success.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified<T> {
    Success(T),
    /// Worth another attempt.
    Retryable(TransportError),
    /// The endpoint answered and said no. Never retried.
    Logical(String),
}

pub trait RemoteOperation: Send + Sync {
    type Output: Send;

    fn kind(&self) -> OperationKind;

    /// Short description for logs, e.g. `create INV-42`.
    fn describe(&self) -> String;

    fn request(&self) -> Request;

    /// Decodes the body of a 2xx response.
    fn classify(&self, body: &str) -> Classified<Self::Output>;

    fn loading_status(&self) -> Status;
    fn success_status(&self, output: &Self::Output) -> Status;
    fn logical_failure_status(&self, message: &str) -> Status;
    fn terminal_failure_status(&self) -> Status;
}

fn decode_json(body: &str) -> Result<Value, TransportError> {
    serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))
}

fn result_field(response: &Value) -> Option<&str> {
    response.get("result").and_then(Value::as_str)
}

/// A JSON answer that carries a non-success `result` or an error `message`.
fn is_rejection(response: &Value) -> bool {
    let failed_result = response
        .get("result")
        .is_some_and(|r| r.as_str() != Some("success"));
    failed_result || response.get("message").is_some_and(Value::is_string)
}

fn rejection_message(response: &Value) -> String {
    if let Some(message) = response.get("message").and_then(Value::as_str) {
        return message.to_string();
    }
    match response.get("result") {
        Some(Value::String(result)) => format!("result was '{}'", result),
        Some(result) if !result.is_null() => format!("result was {}", result),
        _ => "response has no result".to_string(),
    }
}

/// Appends one invoice row to the spreadsheet.
#[derive(Debug, Clone)]
pub struct CreateInvoice {
    invoice: Invoice,
}

impl CreateInvoice {
    pub fn new(invoice: Invoice) -> Self {
        Self { invoice }
    }
}

impl RemoteOperation for CreateInvoice {
    /// The invoice id confirmed by the endpoint.
    type Output = String;

    fn kind(&self) -> OperationKind {
        OperationKind::Create
    }

    fn describe(&self) -> String {
        format!("{} {}", self.kind(), self.invoice.invoice_id)
    }

    fn request(&self) -> Request {
        Request::Form(self.invoice.to_form())
    }

    /// Only a body that is not JSON at all is retried. Once the endpoint has
    /// answered with JSON the row may already exist, so the POST is not
    /// repeated.
    fn classify(&self, body: &str) -> Classified<String> {
        let response = match decode_json(body) {
            Ok(response) => response,
            Err(e) => return Classified::Retryable(e),
        };

        match response.get("invoiceId") {
            Some(Value::String(id)) => Classified::Success(id.clone()),
            Some(Value::Number(id)) => Classified::Success(id.to_string()),
            _ if is_rejection(&response) => Classified::Logical(rejection_message(&response)),
            _ => Classified::Success(self.invoice.invoice_id.clone()),
        }
    }

    fn loading_status(&self) -> Status {
        Status::loading("Submitting invoice data to Google Sheet...")
    }

    fn success_status(&self, invoice_id: &String) -> Status {
        Status::success(
            format!(
                "Success! Invoice {} has been saved to your Google Sheet.",
                invoice_id
            ),
            Duration::from_secs(5),
        )
    }

    fn logical_failure_status(&self, message: &str) -> Status {
        Status::error(
            format!("Failed to save invoice: {}", message),
            Duration::from_secs(7),
        )
    }

    fn terminal_failure_status(&self) -> Status {
        Status::error(
            "Failed to save invoice. Check your Apps Script deployment/URL and console for errors.",
            Duration::from_secs(7),
        )
    }
}

/// Looks up one invoice row by id.
#[derive(Debug, Clone)]
pub struct ReadInvoice {
    invoice_id: String,
}

impl ReadInvoice {
    pub fn new(invoice_id: impl Into<String>) -> Self {
        Self {
            invoice_id: invoice_id.into(),
        }
    }
}

impl RemoteOperation for ReadInvoice {
    type Output = StoredInvoice;

    fn kind(&self) -> OperationKind {
        OperationKind::Read
    }

    fn describe(&self) -> String {
        format!("{} {}", self.kind(), self.invoice_id)
    }

    fn request(&self) -> Request {
        Request::Query(vec![("invoiceId".to_string(), self.invoice_id.clone())])
    }

    fn classify(&self, body: &str) -> Classified<StoredInvoice> {
        let response = match decode_json(body) {
            Ok(response) => response,
            Err(e) => return Classified::Retryable(e),
        };

        if result_field(&response) != Some("success") {
            return Classified::Logical(rejection_message(&response));
        }

        match response.get("invoice") {
            Some(invoice) if !invoice.is_null() => {
                match StoredInvoice::deserialize(invoice) {
                    Ok(invoice) => Classified::Success(invoice),
                    Err(e) => Classified::Retryable(TransportError::Decode(e.to_string())),
                }
            }
            _ => Classified::Retryable(TransportError::Decode(
                "successful response without an invoice".to_string(),
            )),
        }
    }

    fn loading_status(&self) -> Status {
        Status::loading(format!("Searching for Invoice ID: {}...", self.invoice_id))
    }

    fn success_status(&self, _invoice: &StoredInvoice) -> Status {
        Status::success(
            format!("Invoice {} found.", self.invoice_id),
            Duration::from_secs(3),
        )
    }

    fn logical_failure_status(&self, _message: &str) -> Status {
        Status::error("Invoice not found.", Duration::from_secs(5))
    }

    fn terminal_failure_status(&self) -> Status {
        Status::error(
            "Search failed. Check your Apps Script permissions and deployment.",
            Duration::from_secs(7),
        )
    }
}
