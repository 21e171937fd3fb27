//! Decoding of the provider's CSV rows into typed records.
//!
//! Column layout is fixed by observation, not documentation:
//! `Date,Open,High,Low,Close,Adj Close,Volume` for history, `Date,Dividends`
//! for dividends, `Date,Stock Splits` (an `after/before` ratio) for splits.
//! The literal token `null` appears in placeholder rows for non-trading days
//! and decodes to zero; any other garbage is a decode failure for that row.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::error::YhError;
use crate::core::models::{Candle, Dividend, SortOrder, Split};

/// One decodable record kind. Implementations pin the `events` query value
/// and the column-to-field mapping for their row shape.
pub(crate) trait Tick: Sized {
    /// Value for the `events` query parameter.
    const EVENTS: &'static str;

    fn from_row(fields: &[&str]) -> Result<Self, YhError>;

    /// True when every numeric field is zero, i.e. a provider placeholder.
    fn is_placeholder(&self) -> bool;

    fn date(&self) -> NaiveDate;
}

impl Tick for Candle {
    const EVENTS: &'static str = "history";

    fn from_row(fields: &[&str]) -> Result<Self, YhError> {
        if fields.len() < 7 {
            return Err(YhError::Data(format!(
                "history row has {} columns, expected 7",
                fields.len()
            )));
        }
        Ok(Candle {
            date: parse_date(fields[0])?,
            open: parse_decimal(fields[1])?,
            high: parse_decimal(fields[2])?,
            low: parse_decimal(fields[3])?,
            close: parse_decimal(fields[4])?,
            adj_close: parse_decimal(fields[5])?,
            volume: parse_volume(fields[6])?,
        })
    }

    fn is_placeholder(&self) -> bool {
        self.open.is_zero()
            && self.high.is_zero()
            && self.low.is_zero()
            && self.close.is_zero()
            && self.adj_close.is_zero()
            && self.volume == 0
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Tick for Dividend {
    const EVENTS: &'static str = "div";

    fn from_row(fields: &[&str]) -> Result<Self, YhError> {
        if fields.len() < 2 {
            return Err(YhError::Data(format!(
                "dividend row has {} columns, expected 2",
                fields.len()
            )));
        }
        Ok(Dividend {
            date: parse_date(fields[0])?,
            amount: parse_decimal(fields[1])?,
        })
    }

    fn is_placeholder(&self) -> bool {
        self.amount.is_zero()
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Tick for Split {
    const EVENTS: &'static str = "split";

    fn from_row(fields: &[&str]) -> Result<Self, YhError> {
        if fields.len() < 2 {
            return Err(YhError::Data(format!(
                "split row has {} columns, expected 2",
                fields.len()
            )));
        }
        let date = parse_date(fields[0])?;

        // Ratio is "after/before": "7/1" is a 7-for-1 split. A ratio column
        // without a slash leaves both components zero, same as a placeholder.
        let (after_split, before_split) = match fields[1].split_once('/') {
            Some((after, before)) => (parse_decimal(after)?, parse_decimal(before)?),
            None => (Decimal::ZERO, Decimal::ZERO),
        };

        Ok(Split {
            date,
            before_split,
            after_split,
        })
    }

    fn is_placeholder(&self) -> bool {
        self.after_split.is_zero() && self.before_split.is_zero()
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Decode a full CSV body, skipping the header row unconditionally.
///
/// Rows that fail to decode are dropped rather than failing the whole fetch,
/// matching the reference behavior. With `ignore_empty_rows`, all-zero
/// records (placeholder rows for non-trading days) are dropped as well.
pub(crate) fn decode_rows<T: Tick>(body: &str, ignore_empty_rows: bool) -> Vec<T> {
    let mut out = Vec::new();
    for line in body.lines().skip(1) {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if let Ok(Some(tick)) = decode_row::<T>(&fields, ignore_empty_rows) {
            out.push(tick);
        }
    }
    out
}

/// Decode one row. `Ok(None)` means "drop this row" (all-zero placeholder
/// under `ignore_empty_rows`); `Err` means the row is malformed.
pub(crate) fn decode_row<T: Tick>(
    fields: &[&str],
    ignore_empty_rows: bool,
) -> Result<Option<T>, YhError> {
    let tick = T::from_row(fields)?;
    if ignore_empty_rows && tick.is_placeholder() {
        return Ok(None);
    }
    Ok(Some(tick))
}

/// Stable sort by date only, in the requested direction. Records sharing a
/// date keep their provider order.
pub(crate) fn sort_by_date<T: Tick>(rows: &mut [T], order: SortOrder) {
    match order {
        SortOrder::Ascending => rows.sort_by(|a, b| a.date().cmp(&b.date())),
        SortOrder::Descending => rows.sort_by(|a, b| b.date().cmp(&a.date())),
    }
}

fn parse_date(token: &str) -> Result<NaiveDate, YhError> {
    NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .map_err(|_| YhError::Data(format!("could not parse {token:?} as a date")))
}

fn parse_decimal(token: &str) -> Result<Decimal, YhError> {
    if token == "null" {
        return Ok(Decimal::ZERO);
    }
    token
        .parse::<Decimal>()
        .map_err(|_| YhError::Data(format!("could not parse {token:?} as a decimal")))
}

fn parse_volume(token: &str) -> Result<u64, YhError> {
    if token == "null" {
        return Ok(0);
    }
    token
        .parse::<u64>()
        .map_err(|_| YhError::Data(format!("could not parse {token:?} as a volume")))
}
