//! CLI error types with miette diagnostics.
//!
//! Maps `aadhar_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code per category.

use miette::Diagnostic;
use thiserror::Error;

use aadhar_api::ValidationErrors;
use aadhar_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Session ──────────────────────────────────────────────────────
    #[error("Unauthorized Entry detected! Please re-login")]
    #[diagnostic(code(aadhar::unauthorized), help("Run: aadhar login"))]
    Unauthorized,

    #[error("{reason}")]
    #[diagnostic(
        code(aadhar::session_expired),
        help("Your session could not be renewed. Run: aadhar login")
    )]
    SessionExpired { reason: String },

    // ── Input ────────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(aadhar::invalid_input))]
    InvalidInput(ValidationErrors),

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(aadhar::validation))]
    Validation { field: String, reason: String },

    // ── Server ───────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(aadhar::api_error))]
    ApiError { status: u16, message: String },

    #[error("{message} (HTTP {status})")]
    #[diagnostic(
        code(aadhar::server_error),
        help("Unable to process your request. Please verify your network connection and re-login.")
    )]
    ServerFault { status: u16, message: String },

    #[error("Malformed Response: {detail}")]
    #[diagnostic(
        code(aadhar::malformed),
        help("Unable to process your request. Please verify your network connection and re-login.")
    )]
    Malformed { detail: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Aadhar service")]
    #[diagnostic(
        code(aadhar::connection_failed),
        help("Unable to process your request. Please verify your network connection and re-login.")
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {reason}")]
    #[diagnostic(
        code(aadhar::tls_error),
        help(
            "The backend may be using a self-signed certificate.\n\
             Use --insecure (-k) to accept it, or set ca_cert in your config."
        )
    )]
    TlsError { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(aadhar::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Local ────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(aadhar::store))]
    Store { message: String },

    #[error(transparent)]
    #[diagnostic(code(aadhar::config))]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unauthorized | Self::SessionExpired { .. } => exit_code::AUTH,
            Self::ApiError {
                status: 401 | 403,
                ..
            } => exit_code::AUTH,
            Self::InvalidInput(_) | Self::Validation { .. } => exit_code::USAGE,
            Self::ConnectionFailed { .. }
            | Self::TlsError { .. }
            | Self::Malformed { .. }
            | Self::ServerFault { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── aadhar_api::Error → CliError mapping ─────────────────────────────

impl From<aadhar_api::Error> for CliError {
    fn from(err: aadhar_api::Error) -> Self {
        use aadhar_api::Error as Api;

        if err.is_timeout() {
            return Self::Timeout;
        }

        match err {
            Api::Validation(errors) => Self::InvalidInput(errors),
            Api::Api { status, message } if status >= 500 => Self::ServerFault { status, message },
            Api::Api { status, message } => Self::ApiError { status, message },
            Api::MalformedResponse { message, body } => {
                tracing::debug!(%body, "malformed response body");
                Self::Malformed { detail: message }
            }
            Api::Server { status, .. } => Self::ServerFault {
                status,
                message: "Server error".into(),
            },
            e @ (Api::MissingRefreshToken | Api::RefreshFailed { .. }) => Self::SessionExpired {
                reason: e.to_string(),
            },
            Api::Transport(e) => Self::ConnectionFailed {
                source: Box::new(e),
            },
            Api::InvalidUrl(e) => Self::Validation {
                field: "api_url".into(),
                reason: e.to_string(),
            },
            Api::Tls(reason) => Self::TlsError { reason },
            Api::Store { message } => Self::Store { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_faults_exit_as_connection_failures() {
        let bare: CliError = aadhar_api::Error::Server {
            status: 502,
            body: String::new(),
        }
        .into();
        assert_eq!(bare.exit_code(), exit_code::CONNECTION);
        assert_eq!(bare.to_string(), "Server error (HTTP 502)");

        let with_message: CliError = aadhar_api::Error::Api {
            status: 500,
            message: "Failed to establish connection to database".into(),
        }
        .into();
        assert_eq!(with_message.exit_code(), exit_code::CONNECTION);
        assert_eq!(
            with_message.to_string(),
            "Failed to establish connection to database (HTTP 500)"
        );
        assert!(
            with_message
                .help()
                .is_some_and(|h| h.to_string().starts_with("Unable to process your request"))
        );
    }

    #[test]
    fn client_errors_keep_their_codes() {
        let rejected: CliError = aadhar_api::Error::Api {
            status: 401,
            message: "Incorrect Username or Password found".into(),
        }
        .into();
        assert_eq!(rejected.exit_code(), exit_code::AUTH);

        let conflict: CliError = aadhar_api::Error::Api {
            status: 409,
            message: "User already exists".into(),
        }
        .into();
        assert_eq!(conflict.exit_code(), exit_code::GENERAL);

        let expired: CliError = aadhar_api::Error::MissingRefreshToken.into();
        assert_eq!(expired.exit_code(), exit_code::AUTH);
    }
}
