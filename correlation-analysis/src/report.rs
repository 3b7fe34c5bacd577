//! Study output and significance testing

use std::path::Path;

use common::{AlignedPair, AnalysisIssue, CloseSource, CorrelationResult, IndexMap};
use market_analysis::IndicatorStatus;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::alignment::SkippedTicker;
use crate::config::StudyConfig;

/// Two-sided t-test of a Pearson coefficient against zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Significance {
    /// `None` when |r| is 1 and the statistic is unbounded
    pub t_statistic: Option<f64>,
    pub p_value: f64,
    pub degrees_of_freedom: usize,
}

/// t-statistic `r * sqrt((n - 2) / (1 - r^2))` with a Student-t p-value.
///
/// Undefined coefficients and fewer than three pairs have no test.
pub fn significance(result: &CorrelationResult) -> Option<Significance> {
    let r = result.coefficient?;
    let degrees_of_freedom = result.n_obs.checked_sub(2).filter(|df| *df > 0)?;
    let df = degrees_of_freedom as f64;

    let unexplained = 1.0 - r * r;
    if unexplained <= 0.0 {
        return Some(Significance {
            t_statistic: None,
            p_value: 0.0,
            degrees_of_freedom,
        });
    }

    let t = r * (df / unexplained).sqrt();
    let distribution = StudentsT::new(0.0, 1.0, df).ok()?;
    let p_value = (2.0 * (1.0 - distribution.cdf(t.abs()))).clamp(0.0, 1.0);

    Some(Significance {
        t_statistic: Some(t),
        p_value,
        degrees_of_freedom,
    })
}

/// Preparation outcome for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSummary {
    pub ticker: String,
    pub rows: usize,
    pub close_source: CloseSource,
    /// Why the return column is degraded, if it is
    pub returns_issue: Option<AnalysisIssue>,
    pub indicators: IndexMap<String, IndicatorStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerCorrelation {
    pub ticker: String,
    pub result: CorrelationResult,
    pub significance: Option<Significance>,
}

/// Everything computed for one lag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagReport {
    pub lag: i64,
    /// All tickers' aligned rows taken together
    pub pooled: CorrelationResult,
    pub pooled_significance: Option<Significance>,
    pub per_ticker: Vec<TickerCorrelation>,
    pub pairs: Vec<AlignedPair>,
    pub skipped: Vec<SkippedTicker>,
}

impl LagReport {
    pub fn ticker(&self, ticker: &str) -> Option<&TickerCorrelation> {
        self.per_ticker.iter().find(|c| c.ticker == ticker)
    }
}

/// Result of a full sentiment/return study run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyReport {
    pub config: StudyConfig,
    pub tickers: Vec<TickerSummary>,
    /// Aggregated sentiment rows that entered alignment
    pub sentiment_rows: usize,
    /// Articles left out of aggregation (undated or unscored)
    pub dropped_articles: usize,
    pub lags: Vec<LagReport>,
}

impl StudyReport {
    pub fn lag(&self, lag: i64) -> Option<&LagReport> {
        self.lags.iter().find(|report| report.lag == lag)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significance_of_moderate_correlation() {
        let test = significance(&CorrelationResult::defined(0.5, 20)).unwrap();
        assert_eq!(test.degrees_of_freedom, 18);
        assert!((test.t_statistic.unwrap() - 2.449489742783178).abs() < 1e-9);
        assert!(test.p_value > 0.02 && test.p_value < 0.03);
    }

    #[test]
    fn test_zero_correlation_is_not_significant() {
        let test = significance(&CorrelationResult::defined(0.0, 30)).unwrap();
        assert_eq!(test.t_statistic, Some(0.0));
        assert!((test.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_perfect_correlation() {
        let test = significance(&CorrelationResult::defined(-1.0, 15)).unwrap();
        assert_eq!(test.t_statistic, None);
        assert_eq!(test.p_value, 0.0);
    }

    #[test]
    fn test_no_test_without_coefficient() {
        let undefined = CorrelationResult::undefined(10, AnalysisIssue::degenerate("constant series"));
        assert!(significance(&undefined).is_none());
        assert!(significance(&CorrelationResult::defined(0.9, 2)).is_none());
    }
}
