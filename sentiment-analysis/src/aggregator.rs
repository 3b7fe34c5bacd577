//! Daily per-ticker sentiment aggregation

use std::collections::BTreeMap;

use common::{normalize_ticker, AggregatedSentiment, IndexMap, NaiveDate, SentimentObservation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Aggregated rows plus what was left out
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Ordered by (date, ticker)
    pub rows: Vec<AggregatedSentiment>,
    /// Observations without a usable publication date
    pub dropped_undated: usize,
    /// Dated observations without a usable score or ticker
    pub dropped_unscored: usize,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows grouped by ticker, tickers in order of first appearance
    pub fn by_ticker(&self) -> IndexMap<String, Vec<AggregatedSentiment>> {
        let mut grouped: IndexMap<String, Vec<AggregatedSentiment>> = IndexMap::new();
        for row in &self.rows {
            grouped.entry(row.ticker.clone()).or_default().push(row.clone());
        }
        grouped
    }
}

/// Groups scored observations by (calendar date, normalized ticker)
#[derive(Debug, Clone, Default)]
pub struct SentimentAggregator;

impl SentimentAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Mean score and article count per (date, ticker).
    ///
    /// Undated observations are dropped before grouping. Unscored ones do
    /// not count toward `num_articles`, and a group with no scored
    /// observation produces no row.
    pub fn aggregate(&self, observations: &[SentimentObservation]) -> Aggregation {
        let mut groups: BTreeMap<(NaiveDate, String), (f64, usize)> = BTreeMap::new();
        let mut aggregation = Aggregation::default();

        for observation in observations {
            let Some(date) = observation
                .published_at
                .as_ref()
                .and_then(|published| published.calendar_date())
            else {
                aggregation.dropped_undated += 1;
                continue;
            };

            let ticker = normalize_ticker(&observation.ticker);
            if ticker.is_empty() {
                aggregation.dropped_unscored += 1;
                continue;
            }

            let group = groups.entry((date, ticker)).or_insert((0.0, 0));
            match observation.compound_score.filter(|s| s.is_finite()) {
                Some(score) => {
                    group.0 += score;
                    group.1 += 1;
                }
                None => aggregation.dropped_unscored += 1,
            }
        }

        aggregation.rows = groups
            .into_iter()
            .filter(|(_, (_, count))| *count > 0)
            .map(|((date, ticker), (sum, count))| AggregatedSentiment {
                date,
                ticker,
                avg_sentiment: sum / count as f64,
                num_articles: count,
            })
            .collect();

        if aggregation.dropped_undated > 0 || aggregation.dropped_unscored > 0 {
            debug!(
                "Dropped {} undated and {} unscored observation(s)",
                aggregation.dropped_undated, aggregation.dropped_unscored
            );
        }
        info!(
            observations = observations.len(),
            rows = aggregation.rows.len(),
            "Aggregated daily sentiment"
        );

        aggregation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::PublishedAt;

    fn observation(date: &str, ticker: &str, score: Option<f64>) -> SentimentObservation {
        SentimentObservation {
            published_at: Some(PublishedAt::Text(date.to_string())),
            ticker: ticker.to_string(),
            compound_score: score,
        }
    }

    #[test]
    fn test_grouping() {
        let aggregation = SentimentAggregator::new().aggregate(&[
            observation("2024-01-01", "AAPL", Some(0.5)),
            observation("2024-01-01", "AAPL", Some(-0.5)),
            observation("2024-01-01", "MSFT", Some(0.2)),
        ]);

        assert_eq!(aggregation.rows.len(), 2);
        assert_eq!(aggregation.rows[0].ticker, "AAPL");
        assert_eq!(aggregation.rows[0].avg_sentiment, 0.0);
        assert_eq!(aggregation.rows[0].num_articles, 2);
        assert_eq!(aggregation.rows[1].ticker, "MSFT");
        assert_eq!(aggregation.rows[1].avg_sentiment, 0.2);
        assert_eq!(aggregation.rows[1].num_articles, 1);
    }

    #[test]
    fn test_time_of_day_is_discarded() {
        let aggregation = SentimentAggregator::new().aggregate(&[
            observation("2024-01-01 09:00:00-04:00", "aapl", Some(0.2)),
            observation("2024-01-01 16:30:00-04:00", "AAPL", Some(0.4)),
        ]);
        assert_eq!(aggregation.rows.len(), 1);
        assert_eq!(aggregation.rows[0].num_articles, 2);
        assert!((aggregation.rows[0].avg_sentiment - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_undated_and_unscored_are_dropped() {
        let aggregation = SentimentAggregator::new().aggregate(&[
            observation("not a date", "AAPL", Some(0.9)),
            SentimentObservation {
                published_at: None,
                ticker: "AAPL".into(),
                compound_score: Some(0.9),
            },
            observation("2024-01-02", "AAPL", None),
            observation("2024-01-02", "AAPL", Some(f64::NAN)),
            observation("2024-01-02", "AAPL", Some(-0.4)),
            observation("2024-01-03", "AAPL", None),
        ]);

        assert_eq!(aggregation.dropped_undated, 2);
        assert_eq!(aggregation.dropped_unscored, 3);
        assert_eq!(aggregation.rows.len(), 1);
        assert_eq!(aggregation.rows[0].num_articles, 1);
        assert_eq!(aggregation.rows[0].avg_sentiment, -0.4);
    }

    #[test]
    fn test_empty_input() {
        let aggregation = SentimentAggregator::new().aggregate(&[]);
        assert!(aggregation.is_empty());
        assert!(aggregation.by_ticker().is_empty());
    }

    #[test]
    fn test_rows_ordered_by_date_then_ticker() {
        let aggregation = SentimentAggregator::new().aggregate(&[
            observation("2024-01-02", "AAPL", Some(0.1)),
            observation("2024-01-01", "MSFT", Some(0.1)),
            observation("2024-01-01", "AAPL", Some(0.1)),
        ]);
        let keys: Vec<(String, String)> = aggregation
            .rows
            .iter()
            .map(|r| (r.date.to_string(), r.ticker.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2024-01-01".to_string(), "AAPL".to_string()),
                ("2024-01-01".to_string(), "MSFT".to_string()),
                ("2024-01-02".to_string(), "AAPL".to_string()),
            ]
        );

        let grouped = aggregation.by_ticker();
        assert_eq!(grouped["AAPL"].len(), 2);
        assert_eq!(grouped["MSFT"].len(), 1);
    }
}
