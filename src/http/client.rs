//! HTTP transport for the spreadsheet endpoint.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::error::TransportError;

/// Status and body of a single HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx class.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and hands back whatever the server answered.
///
/// Implementations do not retry and do not interpret the status code;
/// an `Err` means no response was received at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// `POST` an `application/x-www-form-urlencoded` body.
    async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<RawResponse, TransportError>;

    /// `GET` with the given query parameters appended to the URL.
    async fn get_with_query(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] backed by a reqwest client.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[tracing::instrument(skip(self, form))]
    async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<RawResponse, TransportError> {
        debug!("POST form with {} fields to {}...", form.len(), url);

        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(network_error)?;

        read_response(response).await
    }

    #[tracing::instrument(skip(self, query))]
    async fn get_with_query(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<RawResponse, TransportError> {
        debug!("GET from {} with query {:?}...", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(network_error)?;

        read_response(response).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<RawResponse, TransportError> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(network_error)?;
    debug!("Received HTTP {} with {} bytes", status, body.len());
    Ok(RawResponse { status, body })
}

fn network_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Network(format!("request timed out: {}", error))
    } else {
        TransportError::Network(error.to_string())
    }
}
