//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help
//! text. The interactive menu catches and displays these; one-shot
//! commands exit with the mapped code.

use miette::Diagnostic;
use thiserror::Error;

use casi_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(casi::no_credentials),
        help(
            "Configure credentials with: casi config init\n\
             Or set CASI_USERNAME and CASI_PASSWORD environment variables."
        )
    )]
    NoCredentials { profile: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(casi::auth_failed),
        help(
            "Verify your username and password.\n\
             Run: casi config init"
        )
    )]
    AuthFailed { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(casi::validation))]
    Validation { field: String, reason: String },

    #[error("Requested range is outside the allowed window: {reason}")]
    #[diagnostic(
        code(casi::range),
        help("The service only answers queries within the trailing 12 months.")
    )]
    RangeOutsideWindow { reason: String },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("Booking service error: {message}")]
    #[diagnostic(
        code(casi::remote),
        help("Check your network connection and try again; the service may be down.")
    )]
    Remote { message: String },

    #[error("Request timed out: {message}")]
    #[diagnostic(
        code(casi::timeout),
        help("Increase the timeout with --timeout or try a narrower range.")
    )]
    Timeout { message: String },

    // ── Cache ────────────────────────────────────────────────────────
    #[error("Cache error: {message}")]
    #[diagnostic(
        code(casi::cache),
        help("Check that the cache directory is writable (see --cache-dir).")
    )]
    Cache { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(casi::config))]
    Config(#[from] casi_config::ConfigError),

    // ── Interactive / IO ─────────────────────────────────────────────
    #[error("Prompt failed: {0}")]
    #[diagnostic(code(casi::prompt))]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoCredentials { .. } | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Validation { .. } | Self::RangeOutsideWindow { .. } => exit_code::USAGE,
            Self::Remote { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CredentialsMissing => CliError::NoCredentials {
                profile: "current".into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::RangeValidation { message } => {
                CliError::RangeOutsideWindow { reason: message }
            }

            CoreError::Remote { message, timed_out } => {
                if timed_out {
                    CliError::Timeout { message }
                } else {
                    CliError::Remote { message }
                }
            }

            e @ (CoreError::CacheRead { .. } | CoreError::CacheWrite { .. }) => CliError::Cache {
                message: e.to_string(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}
