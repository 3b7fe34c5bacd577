//! Daily percentage returns

use common::{AnalysisIssue, PriceTable, CLOSE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default name of the derived return column
pub const DAILY_RETURN: &str = "daily_return";

/// `price[t] / price[t-1] - 1` for every row after the first.
///
/// A return is undefined when either price is undefined, when the previous
/// price is zero, or when the quotient is not finite.
pub fn daily_returns(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    if prices.is_empty() {
        return Vec::new();
    }

    let mut returns = Vec::with_capacity(prices.len());
    returns.push(None);
    returns.extend(prices.windows(2).map(|pair| match (pair[0], pair[1]) {
        (Some(prev), Some(cur)) if prev != 0.0 => Some(cur / prev - 1.0).filter(|r| r.is_finite()),
        _ => None,
    }));
    returns
}

/// Adds a daily return column to a price table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnsCalculator {
    /// Column treated as "price"
    pub price_column: String,
    /// Name of the derived column
    pub output_column: String,
}

impl Default for ReturnsCalculator {
    fn default() -> Self {
        Self {
            price_column: CLOSE.to_string(),
            output_column: DAILY_RETURN.to_string(),
        }
    }
}

impl ReturnsCalculator {
    pub fn new(price_column: impl Into<String>) -> Self {
        Self {
            price_column: price_column.into(),
            ..Default::default()
        }
    }

    pub fn with_output_column(mut self, output_column: impl Into<String>) -> Self {
        self.output_column = output_column.into();
        self
    }

    /// Copy of `table` with the return column added.
    ///
    /// The return column is always present; it is entirely undefined when
    /// the price column is absent or nothing in it is numeric.
    pub fn compute(&self, table: &PriceTable) -> PriceTable {
        let mut output = table.clone();

        let Some(column) = table.column(&self.price_column) else {
            if !table.is_empty() {
                warn!(
                    ticker = %table.ticker(),
                    column = %self.price_column,
                    "Price column not found, daily returns left undefined"
                );
            }
            output.set_undefined(&self.output_column);
            return output;
        };

        let unparsed = column.unparsed_count();
        if unparsed > 0 {
            debug!(
                "{}: {} value(s) in '{}' coerced to undefined",
                table.ticker(),
                unparsed,
                self.price_column
            );
        }

        output.set_numeric(&self.output_column, daily_returns(&column.to_numeric()));
        output
    }

    /// Explain why the return column of `table` would be degraded, if it would be
    pub fn diagnose(&self, table: &PriceTable) -> Option<AnalysisIssue> {
        if table.is_empty() {
            return Some(AnalysisIssue::EmptyInput);
        }

        let column = match table.column(&self.price_column) {
            Some(column) => column,
            None => return Some(AnalysisIssue::missing_column(&self.price_column)),
        };

        let valid = column.to_numeric().iter().flatten().count();
        if valid < 2 {
            return Some(AnalysisIssue::InsufficientData {
                required: 2,
                available: valid,
            });
        }

        match column.unparsed_count() {
            0 => None,
            count => Some(AnalysisIssue::UnparseableValue {
                field: self.price_column.clone(),
                count,
            }),
        }
    }
}
