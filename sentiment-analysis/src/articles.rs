//! News articles and their conversion into scored observations

use common::{PublishedAt, SentimentObservation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scorer::{score_text, PolarityScores, ScoreField, SentimentLabel, SentimentScorer};

/// One news item as handed over by the loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub headline: Option<String>,
    pub published_at: Option<PublishedAt>,
    /// Ticker as it appears in the source, before normalization
    pub ticker: String,
    pub publisher: Option<String>,
}

impl NewsArticle {
    pub fn new(headline: impl Into<String>, published_at: PublishedAt, ticker: impl Into<String>) -> Self {
        Self {
            headline: Some(headline.into()),
            published_at: Some(published_at),
            ticker: ticker.into(),
            publisher: None,
        }
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn headline_length(&self) -> Option<usize> {
        self.headline.as_ref().map(|h| h.chars().count())
    }
}

/// An article's full polarity scores and the label derived from its compound score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHeadline {
    pub published_at: Option<PublishedAt>,
    pub ticker: String,
    pub scores: PolarityScores,
    pub label: SentimentLabel,
}

impl ScoredHeadline {
    pub fn observation(&self, field: ScoreField) -> SentimentObservation {
        SentimentObservation {
            published_at: self.published_at.clone(),
            ticker: self.ticker.clone(),
            compound_score: Some(field.select(&self.scores)),
        }
    }
}

/// Score and label every headline with `scorer`.
pub fn score_headlines<S: SentimentScorer + ?Sized>(
    scorer: &S,
    articles: &[NewsArticle],
) -> Vec<ScoredHeadline> {
    articles
        .iter()
        .map(|article| {
            let scores = score_text(scorer, article.headline.as_deref());
            ScoredHeadline {
                published_at: article.published_at.clone(),
                ticker: article.ticker.clone(),
                label: SentimentLabel::from_compound(scores.compound),
                scores,
            }
        })
        .collect()
}

/// Score every headline with `scorer`, keeping the selected sub-score.
pub fn score_articles<S: SentimentScorer + ?Sized>(
    scorer: &S,
    articles: &[NewsArticle],
    field: ScoreField,
) -> Vec<SentimentObservation> {
    let observations: Vec<SentimentObservation> = score_headlines(scorer, articles)
        .iter()
        .map(|scored| scored.observation(field))
        .collect();

    debug!(articles = observations.len(), ?field, "Scored headlines");
    observations
}
