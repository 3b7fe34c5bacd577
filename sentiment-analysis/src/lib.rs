//! Sentiment Analysis (Layer 2)
//!
//! Turns news headlines into daily per-ticker sentiment:
//! - [`scorer`] - polarity scoring behind the [`SentimentScorer`] trait
//! - [`articles`] - loader-facing article records and headline scoring
//! - [`aggregator`] - mean score and article count per (date, ticker)
//! - [`publication`] - descriptive statistics of the news set
//! - [`keywords`] - most frequent headline words and word pairs

pub mod aggregator;
pub mod articles;
pub mod keywords;
pub mod publication;
pub mod scorer;

pub use aggregator::{Aggregation, SentimentAggregator};
pub use articles::{score_articles, score_headlines, NewsArticle, ScoredHeadline};
pub use keywords::{tokenize, top_bigrams, top_keywords};
pub use publication::{LengthSummary, PublicationStats};
pub use scorer::{
    score_text, LexiconScorer, PolarityScores, ScoreField, SentimentLabel, SentimentScorer,
    NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD,
};

pub use common::{AggregatedSentiment, SentimentObservation};
