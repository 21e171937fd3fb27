//! Centralized constants for default endpoints and UA.

/// Default desktop UA to avoid trivial bot blocking.
pub(crate) const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/122.0.0.0 Safari/537.36"
);

/// Yahoo CSV download base (symbol is appended).
pub(crate) const DEFAULT_BASE_DOWNLOAD: &str =
    "https://query1.finance.yahoo.com/v7/finance/download/";

/// A URL that returns a Set-Cookie header for Yahoo domains.
pub(crate) const DEFAULT_COOKIE_URL: &str = "https://fc.yahoo.com/consent";

/// URL to fetch a crumb (requires cookie from `DEFAULT_COOKIE_URL`).
pub(crate) const DEFAULT_CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";

/// Attempts made to obtain a session cookie before giving up.
pub(crate) const COOKIE_MAX_RETRIES: u32 = 5;

/// Delay between cookie bootstrap attempts.
pub(crate) const COOKIE_RETRY_DELAY: std::time::Duration = std::time::Duration::from_millis(100);
