//! Sentiment, alignment and correlation models

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::issue::AnalysisIssue;

/// Normalize a free-form ticker into the exact key used for grouping and joins.
///
/// Every path that keys on a ticker (price collections, article tickers)
/// goes through here, so surrounding whitespace never splits a ticker.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Parse a loader timestamp that carries a time of day.
///
/// Zoned timestamps keep the wall clock of their own offset.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%:z"))
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Parse a loader timestamp and truncate it to its calendar date.
///
/// Zoned timestamps keep the date in their own offset.
pub fn parse_timestamp(text: &str) -> Option<NaiveDate> {
    parse_datetime(text)
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok())
}

/// Publication time of an article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PublishedAt {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
    /// Unparsed loader text
    Text(String),
}

impl PublishedAt {
    /// Calendar date of the publication; time of day is discarded
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        match self {
            PublishedAt::Zoned(dt) => Some(dt.date_naive()),
            PublishedAt::Naive(dt) => Some(dt.date()),
            PublishedAt::Text(text) => parse_timestamp(text),
        }
    }

    /// Hour of day in the publisher's own clock.
    ///
    /// Unknown for date-only or unparseable text.
    pub fn hour(&self) -> Option<u32> {
        match self {
            PublishedAt::Zoned(dt) => Some(dt.hour()),
            PublishedAt::Naive(dt) => Some(dt.hour()),
            PublishedAt::Text(text) => parse_datetime(text).map(|dt| dt.hour()),
        }
    }
}

/// One scored article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentObservation {
    pub published_at: Option<PublishedAt>,
    pub ticker: String,
    /// Compound polarity in [-1, 1]; `None` when the article was not scored
    pub compound_score: Option<f64>,
}

/// Mean sentiment for one (calendar date, ticker)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSentiment {
    pub date: NaiveDate,
    pub ticker: String,
    pub avg_sentiment: f64,
    pub num_articles: usize,
}

/// Sentiment for one date paired with the lag-shifted return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPair {
    pub ticker: String,
    pub sentiment_date: NaiveDate,
    pub avg_sentiment: f64,
    pub num_articles: usize,
    /// `None` when the shifted position has no defined return
    pub aligned_return: Option<f64>,
}

impl AlignedPair {
    /// (sentiment, return) as a correlation input
    pub fn as_pair(&self) -> (Option<f64>, Option<f64>) {
        (Some(self.avg_sentiment), self.aligned_return)
    }
}

/// Pearson coefficient with the number of complete pairs it was based on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// `None` whenever a guard fired
    pub coefficient: Option<f64>,
    pub n_obs: usize,
    /// The guard that left the coefficient undefined
    pub issue: Option<AnalysisIssue>,
}

impl CorrelationResult {
    pub fn defined(coefficient: f64, n_obs: usize) -> Self {
        Self {
            coefficient: Some(coefficient),
            n_obs,
            issue: None,
        }
    }

    pub fn undefined(n_obs: usize, issue: AnalysisIssue) -> Self {
        Self {
            coefficient: None,
            n_obs,
            issue: Some(issue),
        }
    }

    pub fn is_defined(&self) -> bool {
        self.coefficient.is_some()
    }

    /// Coefficient with NaN standing in for "undefined"
    pub fn coefficient_or_nan(&self) -> f64 {
        self.coefficient.unwrap_or(f64::NAN)
    }
}
