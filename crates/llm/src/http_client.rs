//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients for providers.

use std::time::Duration;

use crate::types::ProviderConfig;

/// Build a `reqwest::Client` honouring the provider's request timeout.
///
/// Falls back to a default client if the builder rejects the settings, so a
/// provider can always be constructed; request errors surface per call.
pub fn build_http_client(config: &ProviderConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if config.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.timeout_secs));
    }
    match builder.build() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        }
    }
}
