// Shared transport configuration for building reqwest::Client instances.
//
// TLS, timeout, and the default headers every request carries are decided
// here, once, rather than at each call site.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use crate::error::Error;

/// Header naming the API origin on every request.
pub const REQUEST_ORIGIN: &str = "Request-Origin";

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed development backends).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` whose default headers name `origin`.
    pub fn build_client(&self, origin: &Url) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("aadhar/", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers(origin)?);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

fn default_headers(origin: &Url) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    let origin = origin.as_str().trim_end_matches('/');
    let value = HeaderValue::from_str(origin)
        .map_err(|e| Error::Tls(format!("invalid origin header {origin:?}: {e}")))?;
    headers.insert(REQUEST_ORIGIN, value);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn origin_header_has_no_trailing_slash() {
        let url = Url::parse("http://localhost:8081/").unwrap();
        let headers = default_headers(&url).unwrap();
        assert_eq!(headers[REQUEST_ORIGIN], "http://localhost:8081");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let config = TransportConfig {
            tls: TlsMode::CustomCa("/nonexistent/ca.pem".into()),
            ..TransportConfig::default()
        };
        let url = Url::parse("https://localhost").unwrap();
        assert!(matches!(config.build_client(&url), Err(Error::Tls(_))));
    }
}
