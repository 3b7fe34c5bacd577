//! Market Analysis (Layer 1)
//!
//! Price-derived series for the sentiment/return study:
//! - [`returns`] - daily percentage returns from a price column
//! - [`indicators`] - SMA, RSI and MACD with all-or-nothing warm-up gating
//!
//! Both stages take a [`PriceTable`] and hand back an augmented copy. A
//! missing or unusable price column never aborts the batch; the derived
//! columns are still created, holding only undefined values.

pub mod indicators;
pub mod returns;

pub use indicators::{
    alpha_from_center_of_mass, alpha_from_span, ewm_mean, Indicator, IndicatorConfig,
    IndicatorEngine, IndicatorRow, IndicatorSeries, IndicatorStatus, Macd, MacdColumns, Rsi, Sma,
    MACD, MACD_HIST, MACD_SIGNAL,
};
pub use returns::{daily_returns, ReturnsCalculator, DAILY_RETURN};

pub use common::{AnalysisIssue, PriceTable};
