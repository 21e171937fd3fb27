//! Core components of the `yhistory-rs` client.
//!
//! This module contains the foundational building blocks of the library:
//! - The main [`YhClient`] and its builder.
//! - The primary [`YhError`] type.
//! - Shared data models ([`Candle`], [`Dividend`], [`Split`]).
//! - Internal networking and authentication logic.

/// The main client (`YhClient`), builder, and clock abstraction.
pub mod client;
/// The primary error type (`YhError`) for the crate.
pub mod error;
/// Shared data models used by both the single- and multi-symbol surfaces.
pub mod models;

pub(crate) mod net;

// convenient re-exports so most code can just `use crate::core::YhClient`
pub use client::{Clock, SystemClock, YhClient, YhClientBuilder};
pub use error::YhError;
pub use models::{Candle, Dividend, Interval, SortOrder, Split};
