// Session client
//
// Single chokepoint for every request to the backend. Attaches the stored
// access token, and when a protected request fails with a client error,
// refreshes the access token once and replays the request. Refreshes are
// serialized per client; a request that waited on another request's refresh
// replays with the rotated token instead of refreshing again.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::middleware::{Failure, RetryDecision, attach_credentials, decide_retry};
use crate::schema::{Contract, Outcome, RefreshSuccess, classify};
use crate::store::{SessionStore, TokenKey};
use crate::transport::TransportConfig;

// ── Request envelope ────────────────────────────────────────────────

/// An outbound request plus its retry marker.
///
/// The marker flips from `false` to `true` at most once; a marked request
/// never triggers another refresh.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    endpoint: Endpoint,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
    retried: bool,
}

impl RequestEnvelope {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
            body: None,
            retried: false,
        }
    }

    pub fn with_query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Set the retry marker. Returns `false` if it was already set.
    pub(crate) fn mark_retried(&mut self) -> bool {
        !std::mem::replace(&mut self.retried, true)
    }
}

// ── Raw response ────────────────────────────────────────────────────

/// A successful (2xx) response, not yet validated.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl RawResponse {
    pub fn json(&self) -> Result<Value, Error> {
        serde_json::from_slice(&self.body).map_err(|e| Error::MalformedResponse {
            message: format!("response is not JSON: {e}"),
            body: self.body_preview(),
        })
    }

    /// Validate the body against `T`.
    pub fn parse<T: Contract>(&self) -> Result<T, Error> {
        let raw = self.json()?;
        match classify::<T>(&raw) {
            Outcome::Success(value) => Ok(value),
            Outcome::ServerError(message) => Err(Error::Api {
                status: self.status.as_u16(),
                message,
            }),
            Outcome::Malformed(err) => Err(Error::MalformedResponse {
                message: err.to_string(),
                body: self.body_preview(),
            }),
        }
    }

    fn body_preview(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        text.chars().take(200).collect()
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// HTTP client bound to one backend and one credential store.
pub struct SessionClient {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<dyn SessionStore>,
    refresh_lock: Mutex<()>,
}

impl SessionClient {
    /// Create a session client from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        store: Arc<dyn SessionStore>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client(&base_url)?;
        Ok(Self::with_client(http, base_url, store))
    }

    /// Create a session client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, store: Arc<dyn SessionStore>) -> Self {
        Self {
            http,
            base_url,
            store,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Full URL of `endpoint` under the base URL.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{}", endpoint.path()))?)
    }

    /// Send `request`, refreshing the access token and replaying once if
    /// the backend rejects it.
    pub async fn send(&self, mut request: RequestEnvelope) -> Result<RawResponse, Error> {
        loop {
            let access = self.store.get(TokenKey::Access)?;
            let failure = match self.dispatch(&request, access.as_ref()).await? {
                Ok(response) => return Ok(response),
                Err(failure) => failure,
            };

            match decide_retry(&failure, &request, self.store.as_ref())? {
                RetryDecision::Propagate => return Err(failure.into_error()),
                RetryDecision::MissingRefreshToken => {
                    debug!(endpoint = ?request.endpoint(), "no refresh token stored");
                    return Err(Error::MissingRefreshToken);
                }
                RetryDecision::Refresh(refresh) => {
                    request.mark_retried();
                    self.refresh_access(access.as_ref(), &refresh).await?;
                    debug!(endpoint = ?request.endpoint(), "replaying with refreshed token");
                }
            }
        }
    }

    /// One attempt. The outer `Result` is for local failures (bad URL);
    /// the inner one separates success from a retryable failure.
    async fn dispatch(
        &self,
        request: &RequestEnvelope,
        access: Option<&SecretString>,
    ) -> Result<Result<RawResponse, Failure>, Error> {
        let url = self.endpoint_url(request.endpoint())?;
        let method = request.endpoint().method();
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let builder = attach_credentials(builder, access);

        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => return Ok(Err(Failure::Transport(e))),
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => return Ok(Err(Failure::Transport(e))),
        };

        if status.is_success() {
            Ok(Ok(RawResponse { status, body }))
        } else {
            debug!(%status, "request failed");
            Ok(Err(Failure::Status { status, body }))
        }
    }

    /// Rotate the access token, or notice that a concurrent request already did.
    ///
    /// On refresh failure both credentials are cleared.
    async fn refresh_access(
        &self,
        sent_with: Option<&SecretString>,
        refresh: &SecretString,
    ) -> Result<(), Error> {
        let _guard = self.refresh_lock.lock().await;

        match (self.store.get(TokenKey::Access)?, sent_with) {
            (Some(current), sent)
                if sent.is_none_or(|sent| sent.expose_secret() != current.expose_secret()) =>
            {
                debug!("access token already rotated by a concurrent refresh");
                return Ok(());
            }
            (None, Some(_)) => {
                debug!("session cleared by a concurrent refresh failure");
                return Err(Error::MissingRefreshToken);
            }
            _ => {}
        }

        match self.call_refresh(refresh).await {
            Ok(access) => {
                debug!("access token refreshed");
                self.store.set(TokenKey::Access, access)
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, clearing session");
                self.store.clear()?;
                Err(Error::RefreshFailed {
                    source: Box::new(err),
                })
            }
        }
    }

    /// `POST /refresh` with the refresh token as bearer. Bypasses `send` so
    /// a failing refresh can never recurse.
    async fn call_refresh(&self, refresh: &SecretString) -> Result<SecretString, Error> {
        let url = self.endpoint_url(Endpoint::Refresh)?;
        debug!("POST {url}");

        let response = self
            .http
            .post(url)
            .bearer_auth(refresh.expose_secret())
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(Failure::Status { status, body }.into_error());
        }

        let tokens: RefreshSuccess = RawResponse { status, body }.parse()?;
        Ok(tokens.into_access())
    }
}
