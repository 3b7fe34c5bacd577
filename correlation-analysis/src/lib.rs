//! Correlation Analysis (Layer 3)
//!
//! Ties price-derived returns to daily news sentiment:
//! - [`alignment`] - lag-shifted pairing of sentiment and returns per ticker
//! - [`correlation`] - Pearson coefficient with sample-size and constant-series guards
//! - [`report`] - significance tests and the serializable study report
//! - [`study`] - the full per-ticker pipeline driven by a [`StudyConfig`]

pub mod alignment;
pub mod config;
pub mod correlation;
pub mod report;
pub mod study;

pub use crate::alignment::{shift_returns, Alignment, LagAligner, SkippedTicker};
pub use crate::config::{
    create_config_template, load_config, load_layered, load_layered_with_env, save_config,
    StudyConfig, ENV_PREFIX,
};
pub use crate::correlation::{CorrelationEngine, DEFAULT_MIN_OBSERVATIONS};
pub use crate::report::{
    significance, LagReport, Significance, StudyReport, TickerCorrelation, TickerSummary,
};
pub use crate::study::SentimentReturnStudy;

pub use common::{AlignedPair, CorrelationResult};
