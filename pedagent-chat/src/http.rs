//! HTTP client helper with native-tls support.

use crate::error::ChatError;
use std::time::Duration;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

/// Maximum response body size accepted from the chat backend (10 MB).
pub const MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// Validate that an endpoint is an absolute http or https URL.
///
/// Plain http is allowed because the backend normally lives on the same
/// machine as the notebook server.
pub fn validate_endpoint(endpoint: &str) -> Result<url::Url, ChatError> {
    let parsed = url::Url::parse(endpoint).map_err(|e| ChatError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ChatError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: format!("scheme '{scheme}' is not allowed; use http or https"),
            });
        }
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ChatError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(parsed)
}

/// Create an HTTP agent configured with native-tls and an optional global
/// timeout. `None` means requests never time out.
pub fn agent(timeout: Option<Duration>) -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(timeout)
        .build()
        .into()
}
