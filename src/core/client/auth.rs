//! Cookie & crumb session lifecycle.
//!
//! The session is created lazily, shared by every concurrent caller, and
//! recreated from scratch after an invalidation. Creation is guarded by a
//! dedicated lock so that N simultaneous first callers produce exactly one
//! bootstrap sequence.

use super::Session;
use super::constants::{COOKIE_MAX_RETRIES, COOKIE_RETRY_DELAY};
use crate::core::error::YhError;
use rand::{Rng, distributions::Alphanumeric};
use reqwest::header::SET_COOKIE;

impl super::YhClient {
    /// Return the current session, creating it if necessary.
    ///
    /// Fast path: a read lock when the session already exists. Slow path:
    /// take the creation lock, re-check (a task queued behind the winner must
    /// not bootstrap again), then perform the cookie and crumb fetches.
    pub(crate) async fn session(&self) -> Result<Session, YhError> {
        if let Some(s) = self.session.read().await.as_ref() {
            return Ok(s.clone());
        }

        let _guard = self.session_create_lock.lock().await;

        if let Some(s) = self.session.read().await.as_ref() {
            return Ok(s.clone());
        }

        let http = self.bootstrap_cookie().await?;
        let crumb = self.fetch_crumb(&http).await?;

        let session = Session { http, crumb };
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// Discard the cached session so the next [`session`](Self::session) call
    /// recreates it. Never touches the network; safe to call redundantly from
    /// multiple concurrent failures.
    pub(crate) async fn invalidate_session(&self) {
        *self.session.write().await = None;
    }

    /// Hit the cookie URL until the response carries at least one cookie.
    ///
    /// A random query parameter defeats cached cookie-less responses. Up to
    /// `COOKIE_MAX_RETRIES` attempts with a short fixed delay in between; the
    /// status code does not matter, only the presence of a `Set-Cookie`
    /// header.
    async fn bootstrap_cookie(&self) -> Result<reqwest::Client, YhError> {
        for attempt in 0..COOKIE_MAX_RETRIES {
            if attempt > 0 {
                tokio::time::sleep(COOKIE_RETRY_DELAY).await;
            }

            let http = self.new_session_http()?;

            let nonce: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(8)
                .map(char::from)
                .collect();
            let mut url = self.cookie_url().clone();
            url.query_pairs_mut().append_key_only(&nonce);

            let resp = match http.get(url).send().await {
                Ok(r) => r,
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(error = %_e, attempt, "cookie bootstrap request failed");
                    continue;
                }
            };

            if resp.headers().get_all(SET_COOKIE).iter().next().is_some() {
                return Ok(http);
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(attempt, "no cookie in bootstrap response, retrying");
        }

        Err(YhError::Auth(format!(
            "no cookie received after {COOKIE_MAX_RETRIES} attempts"
        )))
    }

    /// Fetch the crumb with the freshly-cookied client. The body must be a
    /// short plain-text token; HTML or JSON here means the cookie was not
    /// accepted.
    async fn fetch_crumb(&self, http: &reqwest::Client) -> Result<String, YhError> {
        let resp = http.get(self.crumb_url().clone()).send().await?;
        let crumb = resp.text().await?;

        if crumb.is_empty() || crumb.contains('{') || crumb.contains('<') {
            return Err(YhError::Auth(format!("received invalid crumb: {crumb:?}")));
        }

        Ok(crumb)
    }
}
