use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// One bar of daily/weekly/monthly price history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Close adjusted for splits and dividend distributions.
    pub adj_close: Decimal,
    pub volume: u64,
}

/// A single cash dividend distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dividend {
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// A stock split event.
///
/// Yahoo reports the ratio as `after/before`, so a 7-for-1 split arrives as
/// `"7/1"` and decodes to `after_split = 7`, `before_split = 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Split {
    pub date: NaiveDate,
    pub before_split: Decimal,
    pub after_split: Decimal,
}

/// The sampling frequency of a history request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interval {
    /// Daily bars (`1d`).
    #[default]
    D1,
    /// Weekly bars (`1wk`).
    W1,
    /// Monthly bars (`1mo`).
    M1,
}

impl Interval {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Interval::D1 => "1d",
            Interval::W1 => "1wk",
            Interval::M1 => "1mo",
        }
    }
}

/// Direction for the optional date sort applied after decoding.
///
/// The decoder itself preserves provider row order; sorting is opt-in,
/// compares by date only, and is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}
