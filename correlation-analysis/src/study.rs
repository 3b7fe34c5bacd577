//! End-to-end news sentiment vs. stock return study

use common::{normalize_ticker, AggregatedSentiment, IndexMap, PriceTable};
use market_analysis::{IndicatorEngine, IndicatorSeries, ReturnsCalculator};
use sentiment_analysis::{score_articles, NewsArticle, SentimentAggregator, SentimentScorer};
use tracing::{info, warn};

use crate::alignment::LagAligner;
use crate::config::StudyConfig;
use crate::correlation::CorrelationEngine;
use crate::report::{significance, LagReport, StudyReport, TickerCorrelation, TickerSummary};

/// Runs returns, indicators, alignment and correlation for every ticker.
///
/// Tickers are independent of each other and processed one after another;
/// each owns its own copy of its price table.
#[derive(Debug, Clone, Default)]
pub struct SentimentReturnStudy {
    config: StudyConfig,
}

impl SentimentReturnStudy {
    pub fn new(config: StudyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StudyConfig {
        &self.config
    }

    fn returns(&self) -> ReturnsCalculator {
        ReturnsCalculator::new(&self.config.price_column)
            .with_output_column(&self.config.return_column)
    }

    /// Returns and indicators per ticker, keyed by normalized ticker.
    ///
    /// When two keys normalize to the same ticker the first one wins.
    pub fn prepare(&self, prices: &IndexMap<String, PriceTable>) -> IndexMap<String, IndicatorSeries> {
        let returns = self.returns();
        let engine = IndicatorEngine::new(&self.config.price_column, self.config.indicators.clone());

        let mut prepared = IndexMap::new();
        for (key, table) in prices {
            let ticker = normalize_ticker(key);
            if prepared.contains_key(&ticker) {
                warn!(ticker = %ticker, key = %key, "Duplicate ticker after normalization, ignoring");
                continue;
            }
            let series = engine.compute(&returns.compute(table));
            prepared.insert(ticker, series);
        }
        prepared
    }

    /// Run the study on already aggregated sentiment.
    pub fn run(
        &self,
        prices: &IndexMap<String, PriceTable>,
        aggregated: &[AggregatedSentiment],
    ) -> StudyReport {
        let returns = self.returns();
        let prepared = self.prepare(prices);

        let mut tickers = Vec::with_capacity(prepared.len());
        let mut tables = IndexMap::with_capacity(prepared.len());
        for (ticker, series) in prepared {
            tickers.push(TickerSummary {
                ticker: ticker.clone(),
                rows: series.table.len(),
                close_source: series.table.close_source().clone(),
                returns_issue: returns.diagnose(&series.table),
                indicators: series.statuses,
            });
            tables.insert(ticker, series.table);
        }

        let sentiment: Vec<AggregatedSentiment> = aggregated
            .iter()
            .map(|row| AggregatedSentiment {
                ticker: normalize_ticker(&row.ticker),
                ..row.clone()
            })
            .collect();

        let aligner = LagAligner::new(&self.config.return_column);
        let engine = CorrelationEngine::new(self.config.min_observations);

        let mut lags = Vec::with_capacity(self.config.lags.len());
        for &lag in &self.config.lags {
            let alignment = aligner.align(&tables, &sentiment, lag);
            let grouped = alignment.by_ticker();

            let per_ticker: Vec<TickerCorrelation> = tables
                .keys()
                .filter(|ticker| !alignment.skipped.iter().any(|s| &s.ticker == *ticker))
                .map(|ticker| {
                    let pairs = grouped.get(ticker.as_str()).cloned().unwrap_or_default();
                    let result = engine.correlate(pairs);
                    TickerCorrelation {
                        ticker: ticker.clone(),
                        significance: significance(&result),
                        result,
                    }
                })
                .collect();

            let pooled = engine.correlate(&alignment.pairs);
            info!(
                lag,
                pairs = alignment.pairs.len(),
                complete = pooled.n_obs,
                coefficient = ?pooled.coefficient,
                skipped = alignment.skipped.len(),
                "Correlated sentiment with returns"
            );

            lags.push(LagReport {
                lag,
                pooled_significance: significance(&pooled),
                pooled,
                per_ticker,
                pairs: alignment.pairs,
                skipped: alignment.skipped,
            });
        }

        StudyReport {
            config: self.config.clone(),
            tickers,
            sentiment_rows: sentiment.len(),
            dropped_articles: 0,
            lags,
        }
    }

    /// Score headlines with `scorer`, aggregate them per day and run the study.
    pub fn run_articles<S: SentimentScorer + ?Sized>(
        &self,
        prices: &IndexMap<String, PriceTable>,
        scorer: &S,
        articles: &[NewsArticle],
    ) -> StudyReport {
        let observations = score_articles(scorer, articles, self.config.score_field);
        let aggregation = SentimentAggregator::new().aggregate(&observations);

        let mut report = self.run(prices, &aggregation.rows);
        report.dropped_articles = aggregation.dropped_undated + aggregation.dropped_unscored;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{AnalysisIssue, CloseSource, NaiveDate, PriceBar, PublishedAt};
    use sentiment_analysis::LexiconScorer;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let mut date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut dates = Vec::with_capacity(n);
        for _ in 0..n {
            dates.push(date);
            date = date.succ_opt().unwrap();
        }
        dates
    }

    fn bars(closes: &[f64]) -> Vec<PriceBar> {
        dates(closes.len())
            .into_iter()
            .zip(closes)
            .map(|(date, close)| PriceBar {
                date,
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: 1_000.0,
            })
            .collect()
    }

    fn wavy(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 1.3).sin() * 4.0).collect()
    }

    fn prices(entries: &[(&str, Vec<f64>)]) -> IndexMap<String, PriceTable> {
        entries
            .iter()
            .map(|(key, closes)| {
                (
                    key.to_string(),
                    PriceTable::from_bars(*key, &bars(closes), CloseSource::Close),
                )
            })
            .collect()
    }

    /// Sentiment that tracks the return of each day
    fn tracking_sentiment(ticker: &str, closes: &[f64]) -> Vec<AggregatedSentiment> {
        let returns = market_analysis::daily_returns(
            &closes.iter().map(|c| Some(*c)).collect::<Vec<_>>(),
        );
        dates(closes.len())
            .into_iter()
            .zip(returns)
            .filter_map(|(date, ret)| {
                ret.map(|r| AggregatedSentiment {
                    date,
                    ticker: ticker.to_string(),
                    avg_sentiment: r * 10.0,
                    num_articles: 1,
                })
            })
            .collect()
    }

    #[test]
    fn test_same_day_tracking_sentiment_correlates() {
        let closes = wavy(40);
        let study = SentimentReturnStudy::default();
        let report = study.run(&prices(&[("aapl", closes.clone())]), &tracking_sentiment("AAPL", &closes));

        let same_day = report.lag(0).unwrap();
        let aapl = same_day.ticker("AAPL").unwrap();
        assert_eq!(aapl.result.n_obs, 39);
        assert!((aapl.result.coefficient.unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(same_day.pooled.n_obs, 39);

        // the next-day return of the last row does not exist
        assert_eq!(report.lag(1).unwrap().pooled.n_obs, 38);
        assert_eq!(report.lags.len(), 3);
    }

    #[test]
    fn test_ticker_keys_are_normalized() {
        let closes = wavy(20);
        let report = SentimentReturnStudy::default()
            .run(&prices(&[("msft", closes.clone())]), &tracking_sentiment("Msft", &closes));
        assert_eq!(report.tickers[0].ticker, "MSFT");
        assert_eq!(report.lag(0).unwrap().pairs.len(), 19);
    }

    #[test]
    fn test_summary_records_indicator_and_return_state() {
        let report = SentimentReturnStudy::default().run(&prices(&[("AAPL", wavy(30))]), &[]);
        let summary = &report.tickers[0];
        assert_eq!(summary.rows, 30);
        assert_eq!(summary.returns_issue, None);
        assert!(summary.indicators["sma20"].is_computed());
        assert!(!summary.indicators["sma50"].is_computed());

        // no sentiment at all: every ticker is skipped, nothing is correlated
        let lag = report.lag(0).unwrap();
        assert!(lag.per_ticker.is_empty());
        assert_eq!(lag.skipped[0].reason, AnalysisIssue::EmptyInput);
        assert_eq!(lag.pooled.n_obs, 0);
    }

    #[test]
    fn test_unknown_sentiment_ticker_is_skipped() {
        let closes = wavy(20);
        let mut sentiment = tracking_sentiment("AAPL", &closes);
        sentiment.extend(tracking_sentiment("TSLA", &closes));
        let report = SentimentReturnStudy::default().run(&prices(&[("AAPL", closes)]), &sentiment);

        let lag = report.lag(0).unwrap();
        assert_eq!(lag.per_ticker.len(), 1);
        assert_eq!(lag.skipped.len(), 1);
        assert_eq!(lag.skipped[0].ticker, "TSLA");
        assert!(lag.pairs.iter().all(|p| p.ticker == "AAPL"));
    }

    #[test]
    fn test_run_articles_scores_and_aggregates() {
        let closes = wavy(5);
        let articles = vec![
            NewsArticle::new("Shares surge on record profit", PublishedAt::Text("2024-03-02".into()), "aapl"),
            NewsArticle::new("Analysts fear a crash", PublishedAt::Text("2024-03-02".into()), "AAPL"),
            NewsArticle::new("Undated", PublishedAt::Text("someday".into()), "AAPL"),
        ];
        let report = SentimentReturnStudy::default().run_articles(
            &prices(&[("AAPL", closes)]),
            &LexiconScorer::new(),
            &articles,
        );

        assert_eq!(report.sentiment_rows, 1);
        assert_eq!(report.dropped_articles, 1);
        assert_eq!(report.lag(0).unwrap().pairs[0].num_articles, 2);
    }

    #[test]
    fn test_padded_tickers_join_across_paths() {
        let articles = vec![
            NewsArticle::new("Shares surge on record profit", PublishedAt::Text("2024-03-02".into()), "AAPL "),
            NewsArticle::new("Analysts fear a crash", PublishedAt::Text("2024-03-03".into()), " aapl"),
        ];
        let report = SentimentReturnStudy::default().run_articles(
            &prices(&[("AAPL ", wavy(5))]),
            &LexiconScorer::new(),
            &articles,
        );

        assert_eq!(report.tickers[0].ticker, "AAPL");
        let same_day = report.lag(0).unwrap();
        assert!(same_day.skipped.is_empty());
        assert_eq!(same_day.pairs.len(), 2);
        assert!(same_day.pairs.iter().all(|p| p.ticker == "AAPL"));
    }

    #[test]
    fn test_report_json() {
        let report = SentimentReturnStudy::default().run(&prices(&[("AAPL", wavy(25))]), &[]);
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["config"]["min_observations"], 15);
        assert_eq!(value["lags"].as_array().unwrap().len(), 3);
    }
}
