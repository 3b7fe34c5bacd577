//! Guarded Pearson correlation

use common::{AlignedPair, AnalysisIssue, CorrelationResult};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

/// Default minimum number of complete pairs
pub const DEFAULT_MIN_OBSERVATIONS: usize = 15;

/// Pearson correlation that refuses to run on too few or constant samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationEngine {
    pub min_observations: usize,
}

impl Default for CorrelationEngine {
    fn default() -> Self {
        Self {
            min_observations: DEFAULT_MIN_OBSERVATIONS,
        }
    }
}

impl CorrelationEngine {
    pub fn new(min_observations: usize) -> Self {
        Self { min_observations }
    }

    /// Pearson coefficient over the complete pairs of `pairs`.
    ///
    /// A pair is complete when neither side is `None` or NaN. The result is
    /// undefined below `min_observations` complete pairs or when either side
    /// is constant; `n_obs` is always the complete-pair count.
    pub fn pearson(&self, pairs: &[(Option<f64>, Option<f64>)]) -> CorrelationResult {
        let (xs, ys): (Vec<f64>, Vec<f64>) = pairs
            .iter()
            .filter_map(|pair| match *pair {
                (Some(x), Some(y)) if !x.is_nan() && !y.is_nan() => Some((x, y)),
                _ => None,
            })
            .unzip();
        let n = xs.len();

        if n < self.min_observations {
            debug!("Correlation skipped: {} of {} required pairs", n, self.min_observations);
            return CorrelationResult::undefined(
                n,
                AnalysisIssue::InsufficientData {
                    required: self.min_observations,
                    available: n,
                },
            );
        }

        if is_constant(&xs) || is_constant(&ys) {
            return CorrelationResult::undefined(n, AnalysisIssue::degenerate("constant series"));
        }

        let denominator = xs.iter().std_dev() * ys.iter().std_dev();
        if denominator == 0.0 || !denominator.is_finite() {
            return CorrelationResult::undefined(n, AnalysisIssue::degenerate("zero variance"));
        }

        let r = xs.iter().covariance(ys.iter()) / denominator;
        if r.is_nan() {
            return CorrelationResult::undefined(n, AnalysisIssue::degenerate("non-finite coefficient"));
        }
        CorrelationResult::defined(r.clamp(-1.0, 1.0), n)
    }

    /// Correlation of sentiment with aligned return
    pub fn correlate<'a, I>(&self, aligned: I) -> CorrelationResult
    where
        I: IntoIterator<Item = &'a AlignedPair>,
    {
        let pairs: Vec<(Option<f64>, Option<f64>)> =
            aligned.into_iter().map(AlignedPair::as_pair).collect();
        self.pearson(&pairs)
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
