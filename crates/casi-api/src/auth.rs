use secrecy::{ExposeSecret, SecretString};

/// Provider id sent with every token request. Identifies the car-sharing
/// operator within the shared CASIREST installation.
pub const PROVIDER_ID: &str = "87";

/// Well-known `X-API-Key` used when the caller does not supply one.
/// This is the key the operator's own web frontend ships with.
pub const DEFAULT_API_KEY: &str = "a291a1e3-3d98-f46c-0e8f-9ddbc7604cc2";

/// Credentials for authenticating with the booking service.
///
/// Supplied once per session and replaceable at any time (re-login).
/// The password and API key are held as [`SecretString`] so they never
/// show up in debug output.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    /// Optional override for the `X-API-Key` header;
    /// [`DEFAULT_API_KEY`] is used when absent.
    pub api_key: Option<SecretString>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// The `X-API-Key` header value to send: the caller's key, or the
    /// well-known default.
    pub(crate) fn api_key_or_default(&self) -> String {
        self.api_key
            .as_ref()
            .map_or_else(|| DEFAULT_API_KEY.to_owned(), |key| key.expose_secret().to_owned())
    }
}
