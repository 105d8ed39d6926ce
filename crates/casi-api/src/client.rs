// Booking API HTTP client
//
// Wraps `reqwest::Client` with CASIREST URL construction, the session-token
// lifecycle, and query-window validation. One client instance serves one
// interactive session; the token cache is a single field behind a mutex.

use std::sync::RwLock;

use chrono::{DateTime, Months, SecondsFormat, Utc};
use secrecy::ExposeSecret;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::auth::{Credentials, PROVIDER_ID};
use crate::error::Error;
use crate::models::{Booking, SessionToken, TimeRange, TokenResponse};
use crate::transport::TransportConfig;

/// Base URL of the hosted CASIREST installation.
pub const DEFAULT_BASE_URL: &str = "https://de1.cantamen.de/casirest/v3";

/// Sort order requested from the bookings endpoint.
const BOOKINGS_SORT: &str = "timeRange.start,timeRange.end,id";

/// Raw HTTP client for the CASIREST booking service.
///
/// Owns the credentials and a lazily-acquired, renewed-on-expiry session
/// token. Performs the two remote operations: token issuance (login) and
/// booking listing for a time range.
pub struct BookingClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
    /// Credentials may be replaced mid-session (re-login). Guarded
    /// separately from the token so replacement never blocks a fetch.
    credentials: RwLock<Option<Credentials>>,
    /// Single-writer token cache. The lock is held across the login await,
    /// so at most one token is ever live.
    token: Mutex<Option<SessionToken>>,
}

impl BookingClient {
    /// Create a new client. Credentials may be supplied later via
    /// [`set_credentials`](Self::set_credentials).
    pub fn new(
        base_url: Url,
        credentials: Option<Credentials>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout.as_secs(),
            credentials: RwLock::new(credentials),
            token: Mutex::new(None),
        })
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replace the session credentials.
    ///
    /// An already-issued token stays live until its own expiry; only the
    /// next login uses the new credentials. Inherited from the observed
    /// service behavior -- credential rotation does not force a re-login.
    pub fn set_credentials(&self, credentials: Credentials) {
        *self
            .credentials
            .write()
            .expect("credentials lock poisoned") = Some(credentials);
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials
            .read()
            .expect("credentials lock poisoned")
            .is_some()
    }

    fn current_credentials(&self) -> Result<Credentials, Error> {
        self.credentials
            .read()
            .expect("credentials lock poisoned")
            .clone()
            .ok_or(Error::CredentialsMissing)
    }

    // ── Query window ─────────────────────────────────────────────────

    /// The maximum queryable window: midnight today minus 12 months,
    /// through midnight today. The remote API rejects anything older, so
    /// this doubles as the default query range and the validation bound.
    pub fn max_range() -> TimeRange {
        Self::max_range_at(Utc::now())
    }

    pub(crate) fn max_range_at(now: DateTime<Utc>) -> TimeRange {
        let today = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc();
        let start = today
            .checked_sub_months(Months::new(12))
            .expect("12 months before today is representable");
        TimeRange { start, end: today }
    }

    fn validate_range(range: &TimeRange, max: &TimeRange) -> Result<(), Error> {
        if range.start > range.end {
            return Err(Error::RangeValidation {
                message: format!(
                    "range start {} is after its end {}",
                    iso(range.start),
                    iso(range.end)
                ),
            });
        }
        if range.start < max.start || range.end < max.start {
            return Err(Error::RangeValidation {
                message: format!("range borders need to be on or after {}", iso(max.start)),
            });
        }
        if range.start > max.end || range.end > max.end {
            return Err(Error::RangeValidation {
                message: format!("range borders need to be on or before {}", iso(max.end)),
            });
        }
        Ok(())
    }

    // ── Token lifecycle ──────────────────────────────────────────────

    /// Return the cached token while it is still valid, otherwise log in
    /// with the currently-set credentials and replace it.
    pub async fn token(&self) -> Result<SessionToken, Error> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            if token.is_valid_at(Utc::now()) {
                return Ok(token.clone());
            }
            debug!("session token expired");
        }

        let credentials = self.current_credentials()?;
        let token = self.login(&credentials).await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    /// Authenticate against the token endpoint.
    ///
    /// `POST /tokens?expand=customerId` with the provider id and the
    /// `X-API-Key` header. Does not touch the token cache -- that is
    /// [`token`](Self::token)'s job.
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionToken, Error> {
        let url = self.api_url("tokens?expand=customerId")?;
        debug!(%url, username = %credentials.username, "requesting session token");

        let body = json!({
            "login": credentials.username,
            "credential": credentials.password.expose_secret(),
            "provId": PROVIDER_ID,
            "storeLogin": false,
        });

        let resp = self
            .http
            .post(url)
            .header("X-API-Key", credentials.api_key_or_default())
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let raw: TokenResponse =
            serde_json::from_str(&body).map_err(|e| Error::Authentication {
                message: format!("malformed token payload: {e}"),
            })?;
        raw.into_token()
    }

    // ── Booking queries ──────────────────────────────────────────────

    /// Fetch bookings for `range`.
    ///
    /// `GET /bookings?end=<ISO>&sort=timeRange.start,timeRange.end,id`
    /// with HTTP Basic auth derived from the session token. Only the `end`
    /// bound is sent on the wire -- the service returns everything up to
    /// it, and callers narrow by `start` locally. The range is checked
    /// against [`max_range`](Self::max_range) unless `skip_validation`.
    /// No automatic retry: a failed call surfaces immediately.
    pub async fn bookings(
        &self,
        range: TimeRange,
        skip_validation: bool,
    ) -> Result<Vec<Booking>, Error> {
        let token = self.token().await?;

        debug!(start = %iso(range.start), end = %iso(range.end), "fetching bookings");
        if !skip_validation {
            Self::validate_range(&range, &Self::max_range())?;
        }

        let mut url = self.api_url("bookings")?;
        url.query_pairs_mut()
            .append_pair("end", &iso(range.end))
            .append_pair("sort", BOOKINGS_SORT);

        let resp = self
            .http
            .get(url)
            .basic_auth(&token.id, Some(&token.customer_id))
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "session token rejected by the bookings endpoint".into(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Remote {
                status: status.as_u16(),
                message: body[..body.len().min(200)].to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(Error::InvalidUrl)
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// ISO-8601 with milliseconds, matching what the remote API emits.
fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
