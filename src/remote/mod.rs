//! Resilient calls against the spreadsheet endpoint.
//!
//! # Structure
//!
//! - `endpoint` - Endpoint configuration and pre-flight validation
//! - `operation` - Create / read descriptors (request shape, classifier, status texts)
//! - `call` - The shared retry loop
//! - `status` - Status messages and the sink they are reported to

mod call;
mod endpoint;
mod operation;
mod status;

pub use call::{CONFIGURATION_ERROR_TEXT, RemoteCall};
pub use endpoint::{APPS_SCRIPT_PREFIX, Endpoint, EndpointConfig, PLACEHOLDER_ENDPOINT};
pub use operation::{
    Classified, CreateInvoice, OperationKind, ReadInvoice, RemoteOperation, Request,
};
pub use status::{ConsoleSink, Status, StatusKind, StatusSink};

#[cfg(test)]
pub use status::MockStatusSink;
