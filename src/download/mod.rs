//! Multi-symbol concurrent downloads.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::core::models::{Candle, Dividend, Interval, SortOrder, Split};
use crate::core::{YhClient, YhError};
use crate::history::{HistoryBuilder, resolve_period, wire::Tick};

/// The terminal state of one symbol's fetch inside a batch.
#[derive(Debug)]
pub enum SymbolOutcome<T> {
    /// Decoded records in provider row order (or sorted, if requested).
    Data(Vec<T>),
    /// The provider does not know this symbol.
    NotFound,
    /// This symbol's fetch failed; siblings are unaffected.
    Failed(YhError),
}

impl<T> SymbolOutcome<T> {
    /// The decoded records, if this symbol succeeded.
    pub fn records(&self) -> Option<&[T]> {
        match self {
            SymbolOutcome::Data(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SymbolOutcome::NotFound)
    }

    /// The per-symbol error, if this symbol failed.
    pub fn error(&self) -> Option<&YhError> {
        match self {
            SymbolOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// The result of a multi-symbol download: one outcome per requested symbol.
///
/// Keys keep the casing the caller supplied; lookups are case-insensitive.
/// No requested symbol is ever omitted: unknown tickers are present as
/// [`SymbolOutcome::NotFound`].
#[derive(Debug)]
pub struct DownloadResponse<T> {
    outcomes: HashMap<String, SymbolOutcome<T>>,
}

impl<T> DownloadResponse<T> {
    /// Look up one symbol's outcome, ignoring case.
    pub fn get(&self, symbol: &str) -> Option<&SymbolOutcome<T>> {
        if let Some(o) = self.outcomes.get(symbol) {
            return Some(o);
        }
        self.outcomes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(symbol))
            .map(|(_, o)| o)
    }

    /// The requested symbols, in their original casing.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.outcomes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolOutcome<T>)> {
        self.outcomes.iter().map(|(k, o)| (k.as_str(), o))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// A builder for downloading the same kind of data for many symbols at once.
///
/// Every symbol is fetched as an independent unit of work, all started before
/// any is awaited; one symbol failing (or not existing) never disturbs the
/// others.
#[derive(Clone)]
pub struct DownloadBuilder {
    client: YhClient,
    symbols: Vec<String>,
    period: Option<(i64, i64)>,
    lookback: Option<chrono::Duration>,
    interval: Interval,
    ignore_empty_rows: bool,
    sort: Option<SortOrder>,
}

impl DownloadBuilder {
    /// Creates a new `DownloadBuilder`.
    #[must_use]
    pub fn new(client: &YhClient) -> Self {
        Self {
            client: client.clone(),
            symbols: Vec::new(),
            period: None,
            lookback: None,
            interval: Interval::D1,
            ignore_empty_rows: false,
            sort: None,
        }
    }

    /// Replaces the current list of symbols with a new list.
    #[must_use]
    pub fn symbols<I, S>(mut self, syms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols = syms.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a single symbol to the list.
    #[must_use]
    pub fn add_symbol(mut self, sym: impl Into<String>) -> Self {
        self.symbols.push(sym.into());
        self
    }

    /// Sets an absolute time window applied to every symbol.
    #[must_use]
    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.lookback = None;
        self.period = Some((start.timestamp(), end.timestamp()));
        self
    }

    /// Sets a window ending now and reaching back by `duration`.
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

    /// Drop all-zero placeholder rows. (Default: `false`)
    #[must_use]
    pub const fn ignore_empty_rows(mut self, yes: bool) -> Self {
        self.ignore_empty_rows = yes;
        self
    }

    /// Sort each symbol's records by date in the given direction.
    #[must_use]
    pub const fn sort(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }

    /// Downloads price history for every symbol.
    ///
    /// # Errors
    ///
    /// Fails fast, before any network activity, on an empty or duplicate
    /// symbol list, a blank symbol, or an invalid date window. Per-symbol
    /// problems are reported inside the response instead.
    pub async fn candles(self) -> Result<DownloadResponse<Candle>, YhError> {
        self.run::<Candle>().await
    }

    /// Downloads dividend history for every symbol.
    ///
    /// # Errors
    ///
    /// Same contract as [`candles`](Self::candles).
    pub async fn dividends(self) -> Result<DownloadResponse<Dividend>, YhError> {
        self.run::<Dividend>().await
    }

    /// Downloads split history for every symbol.
    ///
    /// # Errors
    ///
    /// Same contract as [`candles`](Self::candles).
    pub async fn splits(self) -> Result<DownloadResponse<Split>, YhError> {
        self.run::<Split>().await
    }

    async fn run<T: Tick>(self) -> Result<DownloadResponse<T>, YhError> {
        self.validate_symbols()?;

        // Resolve and validate the window once so argument errors surface as
        // a batch error, not as N identical per-symbol failures.
        let (start, end) = resolve_period(self.client.clock(), self.period, self.lookback)?;

        let futures = self.symbols.iter().map(|sym| {
            let hb = HistoryBuilder {
                client: self.client.clone(),
                symbol: sym.clone(),
                period: Some((start, end)),
                lookback: None,
                interval: self.interval,
                ignore_empty_rows: self.ignore_empty_rows,
                sort: self.sort,
            };
            let sym = sym.clone();
            async move {
                let outcome = match hb.fetch_ticks::<T>().await {
                    Ok(Some(rows)) => SymbolOutcome::Data(rows),
                    Ok(None) => SymbolOutcome::NotFound,
                    Err(e) => SymbolOutcome::Failed(e),
                };
                (sym, outcome)
            }
        });

        let joined = join_all(futures).await;
        Ok(DownloadResponse {
            outcomes: joined.into_iter().collect(),
        })
    }

    fn validate_symbols(&self) -> Result<(), YhError> {
        if self.symbols.is_empty() {
            return Err(YhError::InvalidParams("no symbols specified".into()));
        }
        if self.symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(YhError::InvalidParams("blank symbol in list".into()));
        }

        // Compare trimmed, since the fetch path trims before building the URL.
        let mut seen = HashSet::new();
        let duplicates: Vec<&str> = self
            .symbols
            .iter()
            .filter(|s| !seen.insert(s.trim().to_ascii_lowercase()))
            .map(String::as_str)
            .collect();
        if !duplicates.is_empty() {
            let list = duplicates
                .iter()
                .map(|s| format!("\"{s}\""))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(YhError::InvalidParams(format!(
                "duplicate symbol(s): {list}"
            )));
        }

        Ok(())
    }
}
