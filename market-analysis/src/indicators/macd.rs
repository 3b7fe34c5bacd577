//! Moving Average Convergence Divergence (MACD) indicator.

use super::ewm::{alpha_from_span, ewm_mean};
use super::Indicator;

/// MACD line, signal line and histogram for one price series
#[derive(Debug, Clone, PartialEq)]
pub struct MacdColumns {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// MACD built from two exponential averages seeded with the first price.
///
/// Each average starts reporting once its own period of prices has been
/// observed, and the signal line waits for `signal` MACD values.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast: fast.max(1),
            slow: slow.max(1),
            signal: signal.max(1),
        }
    }

    /// Standard MACD(12, 26, 9)
    pub fn standard() -> Self {
        Self::new(12, 26, 9)
    }

    pub fn signal_period(&self) -> usize {
        self.signal
    }

    /// Valid prices needed before the signal line and histogram are attempted
    pub fn signal_required_samples(&self) -> usize {
        self.slow + self.signal
    }

    /// MACD line only
    pub fn line(&self, prices: &[Option<f64>]) -> Vec<Option<f64>> {
        let fast = ewm_mean(prices, alpha_from_span(self.fast), self.fast);
        let slow = ewm_mean(prices, alpha_from_span(self.slow), self.slow);
        fast.into_iter()
            .zip(slow)
            .map(|pair| match pair {
                (Some(f), Some(s)) => Some(f - s),
                _ => None,
            })
            .collect()
    }

    /// Signal line of an already computed MACD line
    pub fn signal_line(&self, line: &[Option<f64>]) -> Vec<Option<f64>> {
        ewm_mean(line, alpha_from_span(self.signal), self.signal)
    }

    pub fn compute_all(&self, prices: &[Option<f64>]) -> MacdColumns {
        let macd = self.line(prices);
        let signal = self.signal_line(&macd);
        let histogram = histogram(&macd, &signal);
        MacdColumns {
            macd,
            signal,
            histogram,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::standard()
    }
}

impl Indicator for Macd {
    fn required_samples(&self) -> usize {
        self.slow
    }

    fn compute(&self, prices: &[Option<f64>]) -> Vec<Option<f64>> {
        self.line(prices)
    }
}

/// `macd - signal`, undefined wherever either side is
pub(crate) fn histogram(macd: &[Option<f64>], signal: &[Option<f64>]) -> Vec<Option<f64>> {
    macd.iter()
        .zip(signal)
        .map(|pair| match pair {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect()
}
