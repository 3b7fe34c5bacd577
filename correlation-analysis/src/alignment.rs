//! Lagged pairing of daily sentiment with returns.
//!
//! A lag moves along row positions of the date-ordered return series, not
//! along calendar days. Lag `L` pairs sentiment on date `d` with the return
//! `L` rows after `d` (`L < 0` looks back `|L|` rows). Only sentiment dates
//! that are also rows of the return series produce a pair.

use std::collections::HashMap;

use common::{AggregatedSentiment, AlignedPair, AnalysisIssue, IndexMap, NaiveDate, PriceTable};
use market_analysis::DAILY_RETURN;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A ticker that contributed no aligned rows, and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: AnalysisIssue,
}

/// Aligned rows for every ticker, in the order tickers were processed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    pub pairs: Vec<AlignedPair>,
    pub skipped: Vec<SkippedTicker>,
}

impl Alignment {
    /// Rows grouped per ticker, in processing order
    pub fn by_ticker(&self) -> IndexMap<&str, Vec<&AlignedPair>> {
        let mut grouped: IndexMap<&str, Vec<&AlignedPair>> = IndexMap::new();
        for pair in &self.pairs {
            grouped.entry(pair.ticker.as_str()).or_default().push(pair);
        }
        grouped
    }

    /// Rows where both sentiment and return are defined
    pub fn complete_pairs(&self) -> usize {
        self.pairs.iter().filter(|p| p.aligned_return.is_some()).count()
    }
}

/// `shifted[i] = returns[i + lag]`, undefined where that row does not exist
pub fn shift_returns(returns: &[Option<f64>], lag: i64) -> Vec<Option<f64>> {
    (0..returns.len())
        .map(|i| {
            let target = (i as i64).checked_add(lag)?;
            let target = usize::try_from(target).ok()?;
            returns.get(target).copied().flatten()
        })
        .collect()
}

/// Joins aggregated sentiment to a lag-shifted return column
#[derive(Debug, Clone)]
pub struct LagAligner {
    return_column: String,
}

impl Default for LagAligner {
    fn default() -> Self {
        Self::new(DAILY_RETURN)
    }
}

impl LagAligner {
    pub fn new(return_column: impl Into<String>) -> Self {
        Self {
            return_column: return_column.into(),
        }
    }

    /// Align one ticker's sentiment rows to its return series.
    pub fn align_ticker(
        &self,
        ticker: &str,
        table: &PriceTable,
        sentiment: &[&AggregatedSentiment],
        lag: i64,
    ) -> Result<Vec<AlignedPair>, AnalysisIssue> {
        let returns = table
            .numeric(&self.return_column)
            .ok_or_else(|| AnalysisIssue::missing_column(&self.return_column))?;
        if sentiment.is_empty() {
            return Err(AnalysisIssue::EmptyInput);
        }

        let shifted = shift_returns(&returns, lag);
        let mut rows_by_date: HashMap<NaiveDate, Vec<usize>> = HashMap::new();
        for (row, date) in table.dates().iter().enumerate() {
            rows_by_date.entry(*date).or_default().push(row);
        }

        let mut pairs = Vec::new();
        for observation in sentiment {
            let Some(rows) = rows_by_date.get(&observation.date) else {
                continue;
            };
            for &row in rows {
                pairs.push(AlignedPair {
                    ticker: ticker.to_string(),
                    sentiment_date: observation.date,
                    avg_sentiment: observation.avg_sentiment,
                    num_articles: observation.num_articles,
                    aligned_return: shifted[row],
                });
            }
        }

        Ok(pairs)
    }

    /// Align every ticker of `tables` with its rows of `sentiment`.
    ///
    /// Tickers are matched by exact key. Sentiment for a ticker with no
    /// table is reported as skipped after the tables are processed.
    pub fn align(
        &self,
        tables: &IndexMap<String, PriceTable>,
        sentiment: &[AggregatedSentiment],
        lag: i64,
    ) -> Alignment {
        let mut by_ticker: IndexMap<&str, Vec<&AggregatedSentiment>> = IndexMap::new();
        for row in sentiment {
            by_ticker.entry(row.ticker.as_str()).or_default().push(row);
        }

        let mut alignment = Alignment::default();
        for (ticker, table) in tables {
            let rows = by_ticker.get(ticker.as_str()).map(Vec::as_slice).unwrap_or_default();
            match self.align_ticker(ticker, table, rows, lag) {
                Ok(pairs) => {
                    debug!("{}: {} aligned row(s) at lag {}", ticker, pairs.len(), lag);
                    alignment.pairs.extend(pairs);
                }
                Err(reason) => {
                    debug!(ticker = %ticker, lag, %reason, "Ticker skipped during alignment");
                    alignment.skipped.push(SkippedTicker {
                        ticker: ticker.clone(),
                        reason,
                    });
                }
            }
        }

        for ticker in by_ticker.keys().filter(|t| !tables.contains_key(**t)) {
            warn!(ticker = %ticker, "Sentiment found for ticker without a price series");
            alignment.skipped.push(SkippedTicker {
                ticker: ticker.to_string(),
                reason: AnalysisIssue::MissingSeries {
                    ticker: ticker.to_string(),
                },
            });
        }

        alignment
    }
}
