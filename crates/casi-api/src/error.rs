use thiserror::Error;

/// Top-level error type for the `casi-api` crate.
///
/// Covers every failure mode of the two remote operations (token issuance
/// and booking listing). `casi-core` maps these into its own domain errors;
/// raw HTTP detail never leaks past that boundary.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// No credentials set before an operation that needs them.
    #[error("No credentials set -- provide username and password before querying")]
    CredentialsMissing,

    /// Login rejected or the token payload was malformed.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Validation ──────────────────────────────────────────────────
    /// Requested range falls outside the allowed query window.
    #[error("Range validation failed: {message}")]
    RangeValidation { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Remote API ──────────────────────────────────────────────────
    /// Non-2xx response from the bookings endpoint.
    #[error("Booking API error (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error means the caller's credentials (or the
    /// session derived from them) were rejected.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::CredentialsMissing
        )
    }

    /// Returns `true` if the request expired rather than failed outright.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }
}
