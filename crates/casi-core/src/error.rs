// ── Core error types ──
//
// User-facing errors from casi-core. Consumers never see raw HTTP detail;
// the `From<casi_api::Error>` impl translates transport-layer errors into
// domain-appropriate variants. Nothing here is caught inside the core --
// everything propagates to the controller boundary for the shell to handle.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("No credentials set -- log in first")]
    CredentialsMissing,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Range validation failed: {message}")]
    RangeValidation { message: String },

    // ── Remote ───────────────────────────────────────────────────────
    /// Network or HTTP failure talking to the booking service.
    /// `timed_out` marks the timeout subtype.
    #[error("Booking service error: {message}")]
    Remote { message: String, timed_out: bool },

    // ── Cache ────────────────────────────────────────────────────────
    /// Snapshot exists but cannot be read. The service downgrades this to
    /// a logged cache miss on the read path; it only surfaces to callers
    /// from direct store access.
    #[error("Cannot read cache snapshot {path}: {reason}")]
    CacheRead { path: PathBuf, reason: String },

    #[error("Cannot write cache snapshot {path}: {reason}")]
    CacheWrite { path: PathBuf, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` when re-entering credentials might resolve this.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::CredentialsMissing | Self::AuthenticationFailed { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<casi_api::Error> for CoreError {
    fn from(err: casi_api::Error) -> Self {
        match err {
            casi_api::Error::CredentialsMissing => Self::CredentialsMissing,
            casi_api::Error::Authentication { message } => Self::AuthenticationFailed { message },
            casi_api::Error::RangeValidation { message } => Self::RangeValidation { message },
            casi_api::Error::Timeout { timeout_secs } => Self::Remote {
                message: format!("request timed out after {timeout_secs}s"),
                timed_out: true,
            },
            casi_api::Error::Transport(ref e) => Self::Remote {
                message: e.to_string(),
                timed_out: e.is_timeout(),
            },
            casi_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("invalid URL: {e}"),
            },
            casi_api::Error::Remote { status, message } => Self::Remote {
                message: format!("HTTP {status}: {message}"),
                timed_out: false,
            },
            casi_api::Error::Deserialization { message, body: _ } => Self::Remote {
                message: format!("unreadable response: {message}"),
                timed_out: false,
            },
        }
    }
}
