//! Single-symbol historical data fetching.

pub(crate) mod wire;

use chrono::{DateTime, Utc};

use crate::core::client::Clock;
use crate::core::models::{Candle, Dividend, Interval, SortOrder, Split};
use crate::core::{YhClient, YhError, net};
use wire::Tick;

/// A builder for fetching historical data for a single symbol.
///
/// The date window defaults to "everything": epoch start through now. An
/// unknown symbol is reported as `Ok(None)` rather than an error, so callers
/// can distinguish "no such ticker" from transport failures.
#[derive(Clone)]
pub struct HistoryBuilder {
    pub(crate) client: YhClient,
    pub(crate) symbol: String,
    /// Unix-second window; `None` means epoch start through now.
    pub(crate) period: Option<(i64, i64)>,
    pub(crate) lookback: Option<chrono::Duration>,
    pub(crate) interval: Interval,
    pub(crate) ignore_empty_rows: bool,
    pub(crate) sort: Option<SortOrder>,
}

impl HistoryBuilder {
    /// Creates a new `HistoryBuilder` for a given symbol.
    pub fn new(client: &YhClient, symbol: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            symbol: symbol.into(),
            period: None,
            lookback: None,
            interval: Interval::D1,
            ignore_empty_rows: false,
            sort: None,
        }
    }

    /// Sets an absolute time window for the request.
    ///
    /// Overrides any previously set lookback.
    #[must_use]
    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.lookback = None;
        self.period = Some((start.timestamp(), end.timestamp()));
        self
    }

    /// Sets a window ending now and reaching back by `duration`.
    ///
    /// Overrides any previously set absolute window.
    #[must_use]
    pub fn lookback(mut self, duration: chrono::Duration) -> Self {
        self.period = None;
        self.lookback = Some(duration);
        self
    }

    /// Sets the sampling frequency. (Default: daily)
    #[must_use]
    pub const fn interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// Drop all-zero placeholder rows (non-trading days) instead of emitting
    /// zero-valued records. (Default: `false`)
    #[must_use]
    pub const fn ignore_empty_rows(mut self, yes: bool) -> Self {
        self.ignore_empty_rows = yes;
        self
    }

    /// Sort decoded records by date in the given direction. Without this, the
    /// provider's row order is preserved.
    #[must_use]
    pub const fn sort(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }

    /// Fetches price history. `Ok(None)` means the symbol is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid arguments, session bootstrap failure, or
    /// transport problems.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(symbol = %self.symbol)))]
    pub async fn candles(&self) -> Result<Option<Vec<Candle>>, YhError> {
        self.fetch_ticks::<Candle>().await
    }

    /// Fetches dividend history. `Ok(None)` means the symbol is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid arguments, session bootstrap failure, or
    /// transport problems.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(symbol = %self.symbol)))]
    pub async fn dividends(&self) -> Result<Option<Vec<Dividend>>, YhError> {
        self.fetch_ticks::<Dividend>().await
    }

    /// Fetches split history. `Ok(None)` means the symbol is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid arguments, session bootstrap failure, or
    /// transport problems.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(symbol = %self.symbol)))]
    pub async fn splits(&self) -> Result<Option<Vec<Split>>, YhError> {
        self.fetch_ticks::<Split>().await
    }

    pub(crate) async fn fetch_ticks<T: Tick>(&self) -> Result<Option<Vec<T>>, YhError> {
        let symbol = self.symbol.trim();
        if symbol.is_empty() {
            return Err(YhError::InvalidParams("symbol is empty".into()));
        }

        let (start, end) = resolve_period(self.client.clock(), self.period, self.lookback)?;

        let mut url = self.client.base_download().join(symbol)?;
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("period1", &start.to_string());
            qp.append_pair("period2", &end.to_string());
            qp.append_pair("interval", self.interval.as_str());
            qp.append_pair("events", T::EVENTS);
        }

        match net::fetch_csv(&self.client, symbol, &url).await {
            Ok(body) => {
                let mut rows = wire::decode_rows::<T>(&body, self.ignore_empty_rows);
                if let Some(order) = self.sort {
                    wire::sort_by_date(&mut rows, order);
                }
                Ok(Some(rows))
            }
            Err(YhError::SymbolNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Resolve the effective Unix-second window and validate it against the
/// injected clock, before any network activity.
pub(crate) fn resolve_period(
    clock: &dyn Clock,
    period: Option<(i64, i64)>,
    lookback: Option<chrono::Duration>,
) -> Result<(i64, i64), YhError> {
    let now = clock.now().timestamp();
    let (start, end) = match (lookback, period) {
        (Some(d), _) => (now - d.num_seconds(), now),
        (None, Some((s, e))) => (s, e),
        (None, None) => (0, now),
    };
    if start > now || start > end {
        return Err(YhError::InvalidDates);
    }
    Ok((start, end))
}
