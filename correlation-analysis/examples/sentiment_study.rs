use anyhow::Result;
use common::{CloseSource, IndexMap, NaiveDate, PriceBar, PriceTable, PublishedAt};
use correlation_analysis::{load_layered, SentimentReturnStudy};
use sentiment_analysis::{
    score_headlines, LexiconScorer, NewsArticle, PublicationStats, SentimentLabel,
};
use tracing::{info, Level};
use tracing_subscriber::fmt;

const HEADLINES: &[&str] = &[
    "Shares surge after strong quarterly profit",
    "Analysts downgrade stock on weak guidance",
    "Company announces annual shareholder meeting",
    "Stock rally continues on record demand",
    "Lawsuit threatens growth outlook",
    "Upgrade lifts shares to record high",
];

fn synthetic_bars(start: NaiveDate, days: usize, phase: f64) -> Vec<PriceBar> {
    let mut bars = Vec::with_capacity(days);
    let mut date = start;
    for i in 0..days {
        let close = 100.0 + i as f64 * 0.2 + ((i as f64 + phase) * 0.8).sin() * 3.0;
        bars.push(PriceBar {
            date,
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000_000.0 + i as f64 * 1_000.0,
        });
        date = date.succ_opt().unwrap_or(date);
    }
    bars
}

fn main() -> Result<()> {
    // Initialize logging
    fmt().with_max_level(Level::INFO).init();

    info!("News Sentiment / Stock Return Study");
    info!("===================================");

    // Optional study.toml next to the working directory, overridable via SENTIMENT_STUDY_*
    let config = load_layered(Some(std::path::Path::new("study.toml")))?;
    info!("Lags under test: {:?}", config.lags);

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let mut prices = IndexMap::new();
    for (i, ticker) in ["AAPL", "MSFT", "NVDA"].iter().enumerate() {
        let bars = synthetic_bars(start, 90, i as f64);
        prices.insert(ticker.to_string(), PriceTable::from_bars(*ticker, &bars, CloseSource::Close));
    }

    let mut articles = Vec::new();
    let mut date = start;
    for day in 0..90 {
        for (i, ticker) in ["aapl", "msft", "nvda", "tsla"].iter().enumerate() {
            let headline = HEADLINES[(day * 7 + i * 3) % HEADLINES.len()];
            let published = PublishedAt::Text(format!("{} {:02}:30:00", date, 8 + (day + i) % 10));
            articles.push(NewsArticle::new(headline, published, *ticker).with_publisher("Newswire"));
        }
        date = date.succ_opt().unwrap_or(date);
    }

    let stats = PublicationStats::from_articles(&articles, 5);
    info!("\n=== News set ===");
    info!("Articles: {}", stats.total_articles);
    if let Some(length) = &stats.headline_length {
        info!("Headline length: mean {:.1}, median {:.1}", length.mean, length.median);
    }
    for (weekday, count) in &stats.per_weekday {
        info!("  {:?}: {}", weekday, count);
    }
    for (hour, count) in &stats.per_hour {
        info!("  {:02}:00 {}", hour, count);
    }
    for (word, count) in &stats.top_keywords {
        info!("  keyword '{}': {}", word, count);
    }
    for (pair, count) in &stats.top_bigrams {
        info!("  bigram '{}': {}", pair, count);
    }

    let scorer = LexiconScorer::new();
    let mut labels: IndexMap<SentimentLabel, usize> = IndexMap::new();
    for scored in score_headlines(&scorer, &articles) {
        *labels.entry(scored.label).or_insert(0) += 1;
    }
    info!("Headline labels: {:?}", labels);

    let study = SentimentReturnStudy::new(config);
    let report = study.run_articles(&prices, &scorer, &articles);

    info!("\n=== Correlations ===");
    for lag in &report.lags {
        info!(
            "Lag {:+}: pooled r = {:?} over {} pairs",
            lag.lag, lag.pooled.coefficient, lag.pooled.n_obs
        );
        if let Some(test) = &lag.pooled_significance {
            info!("  p-value {:.4}", test.p_value);
        }
        for ticker in &lag.per_ticker {
            info!(
                "  {}: r = {:?} (n = {})",
                ticker.ticker, ticker.result.coefficient, ticker.result.n_obs
            );
        }
        for skipped in &lag.skipped {
            info!("  skipped {}: {}", skipped.ticker, skipped.reason);
        }
    }

    report.write_json("sentiment_study_report.json")?;
    info!("Report written to sentiment_study_report.json");

    Ok(())
}
