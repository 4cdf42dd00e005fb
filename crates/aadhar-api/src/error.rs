use thiserror::Error;

use crate::schema::ValidationErrors;

/// Top-level error type for the `aadhar-api` crate.
///
/// Every failure is recovered at the session / schema boundary into one of
/// these variants; [`Error::kind`] collapses them into the coarse categories
/// a front-end renders differently.
#[derive(Debug, Error)]
pub enum Error {
    // ── Input ───────────────────────────────────────────────────────
    /// User-supplied input failed validation. Raised before any network call.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    // ── Server responses ────────────────────────────────────────────
    /// The server answered with the generic `{ "message": ... }` error shape.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The body matched neither the expected success shape nor the generic
    /// error shape.
    #[error("Malformed Response: {message}")]
    MalformedResponse { message: String, body: String },

    /// HTTP 5xx without a recognizable error body.
    #[error("Server error (HTTP {status})")]
    Server { status: u16, body: String },

    // ── Authentication ──────────────────────────────────────────────
    /// A protected request failed and no refresh token is stored.
    #[error("Refresh Token not found")]
    MissingRefreshToken,

    /// The refresh endpoint rejected the refresh token (or answered with
    /// garbage). Stored credentials have been cleared.
    #[error("Session refresh failed: {source}")]
    RefreshFailed {
        #[source]
        source: Box<Error>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Storage ─────────────────────────────────────────────────────
    /// The session store could not be read or written.
    #[error("Session store error: {message}")]
    Store { message: String },
}

/// Coarse error categories, one per user-visible treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Field-level input problem; show next to the form fields.
    InputValidation,
    /// Recognized `{message}` from the server; show verbatim.
    ServerMessage,
    /// Unrecognized response; show a fallback message.
    Malformed,
    /// The session is gone; the user must log in again.
    Authentication,
    /// Network or server fault; retry or re-login.
    Connectivity,
    /// Local failure (session storage).
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::InputValidation,
            Self::Api { .. } => ErrorKind::ServerMessage,
            Self::MalformedResponse { .. } => ErrorKind::Malformed,
            Self::MissingRefreshToken | Self::RefreshFailed { .. } => ErrorKind::Authentication,
            Self::Server { .. } | Self::Transport(_) | Self::InvalidUrl(_) | Self::Tls(_) => {
                ErrorKind::Connectivity
            }
            Self::Store { .. } => ErrorKind::Internal,
        }
    }

    /// The server-provided message, if the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Server { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the transport gave up waiting.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
