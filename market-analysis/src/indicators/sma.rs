//! Simple Moving Average (SMA) indicator.

use super::Indicator;

/// Simple Moving Average over a trailing window.
///
/// A value is produced only where the whole window holds valid prices, so
/// a gap blanks every window that contains it.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the given period (a period of 0 is treated as 1).
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn required_samples(&self) -> usize {
        self.period
    }

    fn compute(&self, prices: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut output = vec![None; prices.len()];
        if prices.len() < self.period {
            return output;
        }

        for (end, window) in prices.windows(self.period).enumerate() {
            let sum: Option<f64> = window.iter().copied().sum();
            output[end + self.period - 1] = sum.map(|s| s / self.period as f64);
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_mean() {
        let prices: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0].iter().map(|p| Some(*p)).collect();
        assert_eq!(
            Sma::new(2).compute(&prices),
            vec![None, Some(1.5), Some(2.5), Some(3.5)]
        );
    }

    #[test]
    fn test_gap_blanks_windows() {
        let prices = vec![Some(1.0), None, Some(3.0), Some(5.0), Some(7.0)];
        assert_eq!(
            Sma::new(2).compute(&prices),
            vec![None, None, None, Some(4.0), Some(6.0)]
        );
    }

    #[test]
    fn test_short_input() {
        assert_eq!(Sma::new(3).compute(&[Some(1.0)]), vec![None]);
    }
}
