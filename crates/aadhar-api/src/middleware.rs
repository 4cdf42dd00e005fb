// Request decoration and the refresh-retry decision
//
// Both halves of the session protocol are plain functions so they can be
// composed explicitly by the session client and tested without a server:
// one decorates an outgoing request, the other decides what a failure means.

use bytes::Bytes;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::trace;

use crate::error::Error;
use crate::schema::{ApiMessage, Contract};
use crate::session::RequestEnvelope;
use crate::store::{SessionStore, TokenKey};

/// How a request attempt failed.
#[derive(Debug)]
pub enum Failure {
    /// No HTTP response (connect, DNS, timeout, body read).
    Transport(reqwest::Error),
    /// The server answered with a non-success status.
    Status { status: StatusCode, body: Bytes },
}

impl Failure {
    /// Translate into the caller-facing error.
    ///
    /// A `{message}` body is surfaced verbatim whatever the status; 5xx
    /// without one is a server fault; anything else is malformed.
    pub fn into_error(self) -> Error {
        match self {
            Self::Transport(e) => Error::Transport(e),
            Self::Status { status, body } => {
                let code = status.as_u16();
                let message = serde_json::from_slice::<serde_json::Value>(&body)
                    .ok()
                    .and_then(|raw| ApiMessage::parse(&raw).ok())
                    .filter(|msg| !msg.is_success_tag());
                match message {
                    Some(msg) => Error::Api {
                        status: code,
                        message: msg.message,
                    },
                    None if status.is_server_error() => Error::Server {
                        status: code,
                        body: String::from_utf8_lossy(&body).into_owned(),
                    },
                    None => Error::MalformedResponse {
                        message: format!("HTTP {status} without an error message"),
                        body: String::from_utf8_lossy(&body).into_owned(),
                    },
                }
            }
        }
    }
}

/// What to do after a failed attempt.
#[derive(Debug)]
pub enum RetryDecision {
    /// Hand the failure to the caller unchanged.
    Propagate,
    /// A refresh would be needed but no refresh token is stored.
    MissingRefreshToken,
    /// Refresh with this token, then replay the request once.
    Refresh(SecretString),
}

/// Add `Authorization: Bearer <access>` when an access token is present.
pub fn attach_credentials(
    builder: RequestBuilder,
    access: Option<&SecretString>,
) -> RequestBuilder {
    match access {
        Some(token) => builder.bearer_auth(token.expose_secret()),
        None => builder,
    }
}

/// Decide whether `failure` of `request` warrants a token refresh.
///
/// Checked in order: an already-retried request, an endpoint that never
/// refreshes, a transport or 5xx failure, and finally a missing refresh
/// token. Only if all pass is a refresh attempted.
pub fn decide_retry(
    failure: &Failure,
    request: &RequestEnvelope,
    store: &dyn SessionStore,
) -> Result<RetryDecision, Error> {
    if request.is_retried() {
        trace!(endpoint = ?request.endpoint(), "already retried, propagating");
        return Ok(RetryDecision::Propagate);
    }

    if request.endpoint().skips_refresh() {
        trace!(endpoint = ?request.endpoint(), "endpoint never refreshes");
        return Ok(RetryDecision::Propagate);
    }

    match failure {
        Failure::Transport(_) => return Ok(RetryDecision::Propagate),
        Failure::Status { status, .. } if status.is_server_error() => {
            trace!(%status, "server fault, propagating");
            return Ok(RetryDecision::Propagate);
        }
        Failure::Status { .. } => {}
    }

    Ok(match store.get(TokenKey::Refresh)? {
        Some(token) => RetryDecision::Refresh(token),
        None => RetryDecision::MissingRefreshToken,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::endpoint::Endpoint;
    use crate::store::MemoryStore;

    fn status(code: u16, body: &'static str) -> Failure {
        Failure::Status {
            status: StatusCode::from_u16(code).unwrap(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn bearer_attached_only_when_present() {
        let http = reqwest::Client::new();
        let token = SecretString::from("a1");

        let with = attach_credentials(http.get("http://localhost/profile"), Some(&token))
            .build()
            .unwrap();
        assert_eq!(with.headers()[reqwest::header::AUTHORIZATION], "Bearer a1");

        let without = attach_credentials(http.get("http://localhost/swagger"), None)
            .build()
            .unwrap();
        assert!(!without.headers().contains_key(reqwest::header::AUTHORIZATION));
    }

    #[test]
    fn expired_access_refreshes() {
        let store = MemoryStore::with_pair("a", "r");
        let decision = decide_retry(
            &status(401, ""),
            &RequestEnvelope::new(Endpoint::GetData),
            &store,
        )
        .unwrap();
        match decision {
            RetryDecision::Refresh(token) => assert_eq!(token.expose_secret(), "r"),
            other => panic!("expected refresh, got {other:?}"),
        }
    }

    #[test]
    fn retried_request_never_refreshes_again() {
        let store = MemoryStore::with_pair("a", "r");
        let mut request = RequestEnvelope::new(Endpoint::Profile);
        assert!(request.mark_retried());
        assert!(!request.mark_retried());
        assert!(matches!(
            decide_retry(&status(401, ""), &request, &store).unwrap(),
            RetryDecision::Propagate
        ));
    }

    #[test]
    fn auth_endpoints_propagate() {
        let store = MemoryStore::with_pair("a", "r");
        for endpoint in [Endpoint::Login, Endpoint::Register, Endpoint::Refresh] {
            assert!(matches!(
                decide_retry(&status(401, ""), &RequestEnvelope::new(endpoint), &store).unwrap(),
                RetryDecision::Propagate
            ));
        }
    }

    #[test]
    fn server_faults_propagate() {
        let store = MemoryStore::with_pair("a", "r");
        for code in [500, 502, 503] {
            assert!(matches!(
                decide_retry(
                    &status(code, ""),
                    &RequestEnvelope::new(Endpoint::GetData),
                    &store
                )
                .unwrap(),
                RetryDecision::Propagate
            ));
        }
    }

    #[test]
    fn transport_failures_propagate() {
        let store = MemoryStore::with_pair("a", "r");
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();
        assert!(matches!(
            decide_retry(
                &Failure::Transport(err),
                &RequestEnvelope::new(Endpoint::Profile),
                &store
            )
            .unwrap(),
            RetryDecision::Propagate
        ));
    }

    #[test]
    fn missing_refresh_token_is_signaled() {
        let store = MemoryStore::new();
        assert!(matches!(
            decide_retry(
                &status(401, ""),
                &RequestEnvelope::new(Endpoint::GetData),
                &store
            )
            .unwrap(),
            RetryDecision::MissingRefreshToken
        ));
    }

    #[test]
    fn failure_translation() {
        let recognized = status(401, r#"{"message":"Invalid JWT token received"}"#).into_error();
        assert_eq!(recognized.server_message(), Some("Invalid JWT token received"));

        let fault = status(503, "upstream down").into_error();
        assert!(matches!(fault, Error::Server { status: 503, .. }));

        let garbage = status(404, "<html>").into_error();
        assert!(matches!(garbage, Error::MalformedResponse { .. }));

        let ok_tag = status(400, r#"{"message":"ok"}"#).into_error();
        assert!(matches!(ok_tag, Error::MalformedResponse { .. }));
    }
}
