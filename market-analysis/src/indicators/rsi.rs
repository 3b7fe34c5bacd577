//! Relative Strength Index (RSI) indicator.

use super::ewm::{alpha_from_center_of_mass, ewm_mean};
use super::Indicator;

/// Relative Strength Index with Wilder smoothing.
///
/// Gains and losses are smoothed with weight `1 / period`. The first value
/// appears once `period` price changes have been smoothed. A zero average
/// loss reads as 100, which also covers a perfectly flat series.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI with the given period (a period of 0 is treated as 1).
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    fn value(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        }
    }
}

impl Indicator for Rsi {
    /// `period` changes need `period + 1` prices
    fn required_samples(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, prices: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut gains = Vec::with_capacity(prices.len());
        let mut losses = Vec::with_capacity(prices.len());

        for t in 0..prices.len() {
            let change = match (t.checked_sub(1).and_then(|p| prices[p]), prices[t]) {
                (Some(prev), Some(cur)) => cur - prev,
                _ => 0.0,
            };
            gains.push(Some(change.max(0.0)));
            losses.push(Some((-change).max(0.0)));
        }

        let alpha = alpha_from_center_of_mass(self.period - 1);
        let avg_gain = ewm_mean(&gains, alpha, self.period);
        let avg_loss = ewm_mean(&losses, alpha, self.period);

        avg_gain
            .into_iter()
            .zip(avg_loss)
            .map(|pair| match pair {
                (Some(gain), Some(loss)) => Some(Self::value(gain, loss)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rising(n: usize) -> Vec<Option<f64>> {
        (0..n).map(|i| Some(100.0 + i as f64)).collect()
    }

    #[test]
    fn test_rising_series_is_100() {
        let values = Rsi::new(14).compute(&rising(20));
        assert_eq!(values[12], None);
        assert_eq!(values[13], Some(100.0));
        assert!(values[13..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn test_flat_series_is_100() {
        let values = Rsi::new(3).compute(&vec![Some(5.0); 6]);
        assert_eq!(values[5], Some(100.0));
    }

    #[test]
    fn test_falling_series_is_0() {
        let prices: Vec<Option<f64>> = (0..10).map(|i| Some(50.0 - i as f64)).collect();
        let values = Rsi::new(3).compute(&prices);
        assert!(values[9].unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_mixed_moves() {
        // gains [0, 2, 0], losses [0, 0, 1] with alpha 1/2
        let values = Rsi::new(2).compute(&[Some(10.0), Some(12.0), Some(11.0)]);
        assert_eq!(values[0], None);
        assert_eq!(values[1], Some(100.0));
        let gain = (0.5 * 1.0 + 0.5 * 0.0) / 1.0;
        let loss = (0.5 * 0.0 + 0.5 * 1.0) / 1.0;
        let expected = 100.0 - 100.0 / (1.0 + gain / loss);
        assert!((values[2].unwrap() - expected).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_rsi_is_bounded(
            prices in proptest::collection::vec(proptest::option::of(1.0f64..1_000.0), 15..80)
        ) {
            for value in Rsi::new(14).compute(&prices).into_iter().flatten() {
                prop_assert!((0.0..=100.0).contains(&value));
            }
        }
    }
}
