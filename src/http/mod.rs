//! HTTP transport and retry timing.

mod client;
mod retry;

pub use client::{HttpClient, RawResponse, Transport};
pub use retry::{BASE_DELAY_MS, MAX_ATTEMPTS, RetryPolicy, Sleeper, TokioSleeper};

#[cfg(test)]
pub use client::MockTransport;
#[cfg(test)]
pub use retry::MockSleeper;
