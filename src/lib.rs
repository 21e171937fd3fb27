//! yhistory-rs: async Yahoo Finance historical-data client.
//!
//! Fetches OHLCV candles, dividends and splits from the CSV download
//! endpoint, handling the cookie/crumb session dance transparently.
//!
//! ```no_run
//! use yhistory_rs::{DownloadBuilder, YhClient};
//!
//! # async fn run() -> Result<(), yhistory_rs::YhError> {
//! let client = YhClient::builder().build()?;
//! let batch = DownloadBuilder::new(&client)
//!     .symbols(["AAPL", "MSFT"])
//!     .candles()
//!     .await?;
//! for sym in batch.symbols() {
//!     println!("{sym}: {:?}", batch.get(sym));
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod download;
pub mod history;

pub use crate::core::{
    Candle, Clock, Dividend, Interval, SortOrder, Split, SystemClock, YhClient, YhClientBuilder,
    YhError,
};
pub use crate::download::{DownloadBuilder, DownloadResponse, SymbolOutcome};
pub use crate::history::HistoryBuilder;
