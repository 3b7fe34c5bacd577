//! Shared data model for the news-sentiment / stock-return study.
//!
//! Every layer of the workspace exchanges the types defined here:
//! - Price tables with named, independently nullable columns and the
//!   audit record of any adjusted-close substitution
//! - Scored articles, daily aggregated sentiment and lag-aligned pairs
//! - Correlation results and the diagnostics that explain undefined values

mod columns;
mod issue;
mod models;
mod table;

pub use columns::{
    resolve_column, resolve_ohlcv, OhlcvMapping, CLOSE, HIGH, LOW, OHLCV_COLUMNS, OPEN, VOLUME,
};
pub use issue::AnalysisIssue;
pub use models::{
    normalize_ticker, parse_datetime, parse_timestamp, AggregatedSentiment, AlignedPair,
    CorrelationResult, PublishedAt, SentimentObservation,
};
pub use table::{CloseSource, Column, PriceBar, PriceTable, TableError};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use indexmap::IndexMap;
