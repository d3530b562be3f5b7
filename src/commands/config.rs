use anyhow::Result;
use log::debug;
use reqwest::Client;
use std::time::Duration;

use crate::{
    http::{HttpClient, RetryPolicy, Sleeper, TokioSleeper, Transport},
    remote::{EndpointConfig, RemoteCall},
};

pub struct Config<T: Transport, S: Sleeper> {
    pub transport: T,
    pub sleeper: S,
    pub endpoint: EndpointConfig,
    pub policy: RetryPolicy,
}

impl Config<HttpClient, TokioSleeper> {
    pub fn new(
        endpoint: EndpointConfig,
        policy: RetryPolicy,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder().user_agent("invoice-desk");
        if let Some(timeout) = timeout {
            debug!("Using request timeout of {}s", timeout.as_secs());
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            transport: HttpClient::new(client),
            sleeper: TokioSleeper,
            endpoint,
            policy,
        })
    }
}

impl<T: Transport, S: Sleeper> Config<T, S> {
    pub fn into_remote_call(self) -> RemoteCall<T, S> {
        RemoteCall::new(self.transport, self.sleeper, self.endpoint, self.policy)
    }
}
