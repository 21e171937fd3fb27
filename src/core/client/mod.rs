//! Public client surface + builder.
//! Internals are split into `auth` (cookie/crumb session) and `constants` (UA + defaults).

mod auth;
mod constants;

use crate::core::YhError;
use chrono::{DateTime, Utc};
use constants::{DEFAULT_BASE_DOWNLOAD, DEFAULT_COOKIE_URL, DEFAULT_CRUMB_URL, USER_AGENT};
use reqwest::Client;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use url::Url;

/// A source of "now", injectable so tests can freeze time.
///
/// Date-range validation (`start` must not be in the future) and the default
/// end of a period both go through this rather than calling the system clock
/// directly.
pub trait Clock: std::fmt::Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The default [`Clock`], backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One authenticated session: the HTTP client that owns the cookie jar, plus
/// the crumb bound to it. Recreated as a unit on invalidation.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    http: Client,
    crumb: String,
}

impl Session {
    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
    pub(crate) fn crumb(&self) -> &str {
        &self.crumb
    }
}

#[derive(Debug, Clone)]
pub struct YhClient {
    base_download: Url,
    cookie_url: Url,
    crumb_url: Url,
    user_agent: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    clock: Arc<dyn Clock>,

    session: Arc<RwLock<Option<Session>>>,
    session_create_lock: Arc<Mutex<()>>,
}

impl Default for YhClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl YhClient {
    /// Create a new builder.
    pub fn builder() -> YhClientBuilder {
        YhClientBuilder::default()
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn base_download(&self) -> &Url {
        &self.base_download
    }
    pub(crate) fn cookie_url(&self) -> &Url {
        &self.cookie_url
    }
    pub(crate) fn crumb_url(&self) -> &Url {
        &self.crumb_url
    }

    /// The clock used for date-range validation and period defaults.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Build a fresh HTTP client with its own cookie jar for a new session.
    pub(crate) fn new_session_http(&self) -> Result<Client, YhError> {
        let mut b = Client::builder()
            .user_agent(&self.user_agent)
            .cookie_store(true);
        if let Some(t) = self.timeout {
            b = b.timeout(t);
        }
        if let Some(ct) = self.connect_timeout {
            b = b.connect_timeout(ct);
        }
        Ok(b.build()?)
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct YhClientBuilder {
    user_agent: Option<String>,
    base_download: Option<Url>,
    cookie_url: Option<Url>,
    crumb_url: Option<Url>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    clock: Option<Arc<dyn Clock>>,
    preauth: Option<(String, String)>,
}

impl YhClientBuilder {
    /// Override the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the CSV download base (e.g., `https://query1.finance.yahoo.com/v7/finance/download/`).
    #[must_use]
    pub fn base_download(mut self, url: Url) -> Self {
        self.base_download = Some(url);
        self
    }

    /// Override the cookie bootstrap URL.
    #[must_use]
    pub fn cookie_url(mut self, url: Url) -> Self {
        self.cookie_url = Some(url);
        self
    }

    /// Override the crumb URL.
    #[must_use]
    pub fn crumb_url(mut self, url: Url) -> Self {
        self.crumb_url = Some(url);
        self
    }

    /// Set a global request timeout (overall). Default: none.
    #[must_use]
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    #[must_use]
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Replace the system clock, e.g. to freeze "now" in tests.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Seed the client with an already-acquired cookie and crumb, skipping the
    /// bootstrap for the first session. A later invalidation discards them and
    /// falls back to the normal cookie/crumb dance.
    #[must_use]
    pub fn preauth(mut self, cookie: impl Into<String>, crumb: impl Into<String>) -> Self {
        self.preauth = Some((cookie.into(), crumb.into()));
        self
    }

    pub fn build(self) -> Result<YhClient, YhError> {
        let base_download = match self.base_download {
            Some(u) => u,
            None => Url::parse(DEFAULT_BASE_DOWNLOAD)?,
        };
        let cookie_url = match self.cookie_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_COOKIE_URL)?,
        };
        let crumb_url = match self.crumb_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_CRUMB_URL)?,
        };
        let user_agent = self.user_agent.unwrap_or_else(|| USER_AGENT.to_string());

        let client = YhClient {
            base_download,
            cookie_url,
            crumb_url,
            user_agent,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            session: Arc::new(RwLock::new(None)),
            session_create_lock: Arc::new(Mutex::new(())),
        };

        if let Some((cookie, crumb)) = self.preauth {
            let mut headers = HeaderMap::new();
            let value = HeaderValue::from_str(&cookie)
                .map_err(|_| YhError::Auth("preauth cookie is not a valid header value".into()))?;
            headers.insert(COOKIE, value);
            let mut b = Client::builder()
                .user_agent(&client.user_agent)
                .default_headers(headers)
                .cookie_store(true);
            if let Some(t) = client.timeout {
                b = b.timeout(t);
            }
            if let Some(ct) = client.connect_timeout {
                b = b.connect_timeout(ct);
            }
            let http = b.build()?;
            let session = Session { http, crumb };
            *client
                .session
                .try_write()
                .expect("session lock is uncontended during build") = Some(session);
        }

        Ok(client)
    }
}
