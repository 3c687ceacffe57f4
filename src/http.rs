//! Blocking HTTP helpers shared by the provider adapters.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::warn;

pub(crate) fn client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Sends the request and parses a JSON body; any failure is logged and yields `None`.
pub(crate) fn fetch_json<T: DeserializeOwned>(request: RequestBuilder, provider: &str) -> Option<T> {
    let response = request
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.json::<T>());

    match response {
        Ok(body) => Some(body),
        Err(err) => {
            warn!(provider, error = %err, "route query failed");
            None
        }
    }
}
