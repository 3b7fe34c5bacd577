//! Text polarity scoring.
//!
//! The scorer is always an explicit argument; nothing in this crate holds a
//! shared analyzer instance.

use serde::{Deserialize, Serialize};

/// Compound score at or above which text counts as positive
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound score at or below which text counts as negative
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Negative, neutral and positive proportions plus a compound polarity in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    pub compound: f64,
}

impl PolarityScores {
    /// Score for text that carries no sentiment at all
    pub const NEUTRAL: PolarityScores = PolarityScores {
        negative: 0.0,
        neutral: 1.0,
        positive: 0.0,
        compound: 0.0,
    };
}

impl Default for PolarityScores {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Turns text into polarity scores
pub trait SentimentScorer: Send + Sync {
    fn polarity_scores(&self, text: &str) -> PolarityScores;
}

/// Score optional text; absent text is neutral rather than an error.
pub fn score_text<S: SentimentScorer + ?Sized>(scorer: &S, text: Option<&str>) -> PolarityScores {
    match text {
        Some(text) => scorer.polarity_scores(text),
        None => PolarityScores::NEUTRAL,
    }
}

/// Which sub-score is used as an article's sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreField {
    #[default]
    Compound,
    Positive,
    Negative,
    Neutral,
}

impl ScoreField {
    pub fn select(&self, scores: &PolarityScores) -> f64 {
        match self {
            ScoreField::Compound => scores.compound,
            ScoreField::Positive => scores.positive,
            ScoreField::Negative => scores.negative,
            ScoreField::Neutral => scores.neutral,
        }
    }
}

/// Coarse label derived from a compound score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

const POSITIVE_WORDS: &[&str] = &[
    "growth", "rise", "rises", "rising", "increase", "gain", "gains", "profit", "profits",
    "success", "good", "great", "positive", "best", "upward", "bullish", "buy", "upgrade",
    "upgrades", "recovery", "boom", "breakthrough", "beat", "beats", "win", "wins", "strong",
    "record", "surge", "surges", "rally", "outperform", "deal", "agreement",
];

const NEGATIVE_WORDS: &[&str] = &[
    "crisis", "crash", "drop", "drops", "fall", "falls", "decline", "declines", "decrease",
    "loss", "losses", "fail", "fails", "bad", "negative", "worst", "downward", "bearish",
    "sell", "dump", "collapse", "risk", "danger", "threat", "lawsuit", "downgrade",
    "downgrades", "miss", "misses", "weak", "plunge", "plunges", "recession", "inflation",
    "underperform",
];

const NEGATIONS: &[&str] = &["not", "no", "never", "without", "isn't", "doesn't", "didn't", "won't"];

/// Word-list scorer producing VADER-shaped scores.
///
/// Each listed word carries a fixed valence, flipped when the previous token
/// is a negation. The valence sum is squashed into [-1, 1] with
/// `sum / sqrt(sum^2 + alpha)`.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    valence: f64,
    alpha: f64,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self {
            valence: 2.0,
            alpha: 15.0,
        }
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self::default()
    }

    fn word_valence(&self, word: &str) -> f64 {
        if POSITIVE_WORDS.contains(&word) {
            self.valence
        } else if NEGATIVE_WORDS.contains(&word) {
            -self.valence
        } else {
            0.0
        }
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity_scores(&self, text: &str) -> PolarityScores {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.is_empty() {
            return PolarityScores::NEUTRAL;
        }

        let mut sum = 0.0;
        let (mut positive, mut negative) = (0usize, 0usize);
        for (i, token) in tokens.iter().enumerate() {
            let mut valence = self.word_valence(token);
            if valence == 0.0 {
                continue;
            }
            if i > 0 && NEGATIONS.contains(&tokens[i - 1]) {
                valence = -valence;
            }
            if valence > 0.0 {
                positive += 1;
            } else {
                negative += 1;
            }
            sum += valence;
        }

        let total = tokens.len() as f64;
        let compound = if sum == 0.0 {
            0.0
        } else {
            (sum / (sum * sum + self.alpha).sqrt()).clamp(-1.0, 1.0)
        };

        PolarityScores {
            negative: negative as f64 / total,
            neutral: (tokens.len() - positive - negative) as f64 / total,
            positive: positive as f64 / total,
            compound,
        }
    }
}
