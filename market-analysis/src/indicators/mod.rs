//! Technical indicators over a single price column.
//!
//! Each indicator is all-or-nothing per series: when the price column holds
//! fewer valid values than the indicator needs, its whole column is left
//! undefined instead of being partially filled.

mod ewm;
mod macd;
mod rsi;
mod sma;

pub use ewm::{alpha_from_center_of_mass, alpha_from_span, ewm_mean};
pub use macd::{Macd, MacdColumns};
pub use rsi::Rsi;
pub use sma::Sma;

use common::{AnalysisIssue, IndexMap, NaiveDate, PriceTable, CLOSE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const MACD: &str = "macd";
pub const MACD_SIGNAL: &str = "macd_signal";
pub const MACD_HIST: &str = "macd_hist";

/// A series transform over price values.
pub trait Indicator {
    /// Valid prices needed before the indicator is attempted at all
    fn required_samples(&self) -> usize;

    /// One output per input row; `None` where the value is undefined
    fn compute(&self, prices: &[Option<f64>]) -> Vec<Option<f64>>;
}

/// Indicator periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    #[serde(default = "default_sma_short")]
    pub sma_short: usize,
    #[serde(default = "default_sma_long")]
    pub sma_long: usize,
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
}

fn default_sma_short() -> usize {
    20
}
fn default_sma_long() -> usize {
    50
}
fn default_rsi_period() -> usize {
    14
}
fn default_macd_fast() -> usize {
    12
}
fn default_macd_slow() -> usize {
    26
}
fn default_macd_signal() -> usize {
    9
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_short: default_sma_short(),
            sma_long: default_sma_long(),
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
        }
    }
}

impl IndicatorConfig {
    pub fn sma_short_column(&self) -> String {
        format!("sma{}", self.sma_short)
    }

    pub fn sma_long_column(&self) -> String {
        format!("sma{}", self.sma_long)
    }

    pub fn rsi_column(&self) -> String {
        format!("rsi{}", self.rsi_period)
    }

    /// The six output columns in table order
    pub fn column_names(&self) -> [String; 6] {
        [
            self.sma_short_column(),
            self.sma_long_column(),
            self.rsi_column(),
            MACD.to_string(),
            MACD_SIGNAL.to_string(),
            MACD_HIST.to_string(),
        ]
    }

    /// False when two indicators would write the same column
    pub fn has_distinct_columns(&self) -> bool {
        self.sma_short != self.sma_long
    }

    pub fn macd(&self) -> Macd {
        Macd::new(self.macd_fast, self.macd_slow, self.macd_signal)
    }
}

/// Outcome for one indicator column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndicatorStatus {
    Computed,
    /// Column exists but holds only undefined values
    Skipped(AnalysisIssue),
}

impl IndicatorStatus {
    pub fn is_computed(&self) -> bool {
        matches!(self, IndicatorStatus::Computed)
    }
}

/// Typed view of one row of an [`IndicatorSeries`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub price: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
}

/// Price table augmented with the indicator columns
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub table: PriceTable,
    pub statuses: IndexMap<String, IndicatorStatus>,
    price_column: String,
    config: IndicatorConfig,
}

impl IndicatorSeries {
    pub fn status(&self, column: &str) -> Option<&IndicatorStatus> {
        self.statuses.get(column)
    }

    pub fn rows(&self) -> Vec<IndicatorRow> {
        let column = |name: &str| {
            self.table
                .numeric(name)
                .unwrap_or_else(|| vec![None; self.table.len()])
        };
        let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

        let price = column(&self.price_column);
        let sma_short = column(&self.config.sma_short_column());
        let sma_long = column(&self.config.sma_long_column());
        let rsi = column(&self.config.rsi_column());
        let macd = column(MACD);
        let signal = column(MACD_SIGNAL);
        let hist = column(MACD_HIST);

        self.table
            .dates()
            .iter()
            .enumerate()
            .map(|(i, &date)| IndicatorRow {
                date,
                price: at(&price, i),
                sma_short: at(&sma_short, i),
                sma_long: at(&sma_long, i),
                rsi: at(&rsi, i),
                macd: at(&macd, i),
                macd_signal: at(&signal, i),
                macd_hist: at(&hist, i),
            })
            .collect()
    }
}

/// Computes SMA, RSI and MACD columns for a price table
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    price_column: String,
    config: IndicatorConfig,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(CLOSE, IndicatorConfig::default())
    }
}

impl IndicatorEngine {
    pub fn new(price_column: impl Into<String>, config: IndicatorConfig) -> Self {
        if !config.has_distinct_columns() {
            warn!(
                column = %config.sma_short_column(),
                "Short and long SMA share a period, the long SMA overwrites the short one"
            );
        }
        Self {
            price_column: price_column.into(),
            config,
        }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Copy of `table` with all six indicator columns present.
    pub fn compute(&self, table: &PriceTable) -> IndicatorSeries {
        let mut output = table.clone();
        let names = self.config.column_names();
        for name in &names {
            output.set_undefined(name);
        }

        let mut statuses = IndexMap::new();
        let skip_all = |issue: AnalysisIssue, statuses: &mut IndexMap<String, IndicatorStatus>| {
            for name in &names {
                statuses.insert(name.clone(), IndicatorStatus::Skipped(issue.clone()));
            }
        };

        if table.is_empty() {
            skip_all(AnalysisIssue::EmptyInput, &mut statuses);
            return self.series(output, statuses);
        }

        let Some(column) = table.column(&self.price_column) else {
            warn!(
                ticker = %table.ticker(),
                column = %self.price_column,
                "Price column not found, indicators left undefined"
            );
            skip_all(AnalysisIssue::missing_column(&self.price_column), &mut statuses);
            return self.series(output, statuses);
        };

        let prices = column.to_numeric();
        let valid = prices.iter().flatten().count();
        debug!(
            "{}: {} valid price(s) of {} for indicators",
            table.ticker(),
            valid,
            prices.len()
        );

        let [sma_short_name, sma_long_name, rsi_name, _, _, _] = &names;
        let single: [(&String, Box<dyn Indicator>); 3] = [
            (sma_short_name, Box::new(Sma::new(self.config.sma_short))),
            (sma_long_name, Box::new(Sma::new(self.config.sma_long))),
            (rsi_name, Box::new(Rsi::new(self.config.rsi_period))),
        ];
        for (name, indicator) in single {
            let status = match gate(indicator.required_samples(), valid) {
                Ok(()) => {
                    output.set_numeric(name, indicator.compute(&prices));
                    IndicatorStatus::Computed
                }
                Err(issue) => IndicatorStatus::Skipped(issue),
            };
            statuses.insert(name.clone(), status);
        }

        let macd = self.config.macd();
        match gate(macd.required_samples(), valid) {
            Ok(()) => {
                let line = macd.line(&prices);
                let defined = line.iter().flatten().count();
                let signal = gate(macd.signal_required_samples(), valid)
                    .and_then(|_| gate(macd.signal_period(), defined))
                    .map(|_| macd.signal_line(&line));

                statuses.insert(MACD.to_string(), IndicatorStatus::Computed);
                match signal {
                    Ok(signal) => {
                        output.set_numeric(MACD_HIST, macd::histogram(&line, &signal));
                        output.set_numeric(MACD_SIGNAL, signal);
                        statuses.insert(MACD_SIGNAL.to_string(), IndicatorStatus::Computed);
                        statuses.insert(MACD_HIST.to_string(), IndicatorStatus::Computed);
                    }
                    Err(issue) => {
                        statuses.insert(MACD_SIGNAL.to_string(), IndicatorStatus::Skipped(issue.clone()));
                        statuses.insert(MACD_HIST.to_string(), IndicatorStatus::Skipped(issue));
                    }
                }
                output.set_numeric(MACD, line);
            }
            Err(issue) => {
                for name in [MACD, MACD_SIGNAL, MACD_HIST] {
                    statuses.insert(name.to_string(), IndicatorStatus::Skipped(issue.clone()));
                }
            }
        }

        for (name, status) in &statuses {
            if let IndicatorStatus::Skipped(issue) = status {
                debug!(ticker = %table.ticker(), column = %name, %issue, "Indicator skipped");
            }
        }

        self.series(output, statuses)
    }

    fn series(
        &self,
        table: PriceTable,
        statuses: IndexMap<String, IndicatorStatus>,
    ) -> IndicatorSeries {
        IndicatorSeries {
            table,
            statuses,
            price_column: self.price_column.clone(),
            config: self.config.clone(),
        }
    }
}

fn gate(required: usize, available: usize) -> Result<(), AnalysisIssue> {
    if available >= required {
        Ok(())
    } else {
        Err(AnalysisIssue::InsufficientData {
            required,
            available,
        })
    }
}
