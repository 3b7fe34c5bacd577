//! Date-indexed price table with named, independently nullable columns

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::columns::{resolve_ohlcv, CLOSE, HIGH, LOW, OPEN, VOLUME};
use crate::issue::AnalysisIssue;

/// One daily OHLCV bar as delivered by the price loader
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Where the `Close` column of a table came from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CloseSource {
    /// A raw close column was present
    #[default]
    Close,
    /// No raw close existed; the named adjusted-close column was used instead
    AdjustedClose { column: String },
}

impl CloseSource {
    pub fn is_substituted(&self) -> bool {
        matches!(self, CloseSource::AdjustedClose { .. })
    }
}

/// A single named column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Numeric view of the column. Text values that fail to parse, and NaN,
    /// become `None`.
    pub fn to_numeric(&self) -> Vec<Option<f64>> {
        match self {
            Column::Numeric(values) => values.iter().map(|v| v.filter(|x| !x.is_nan())).collect(),
            Column::Text(values) => values
                .iter()
                .map(|v| v.as_deref().and_then(parse_number))
                .collect(),
        }
    }

    /// Number of present text values that could not be coerced to a number
    pub fn unparsed_count(&self) -> usize {
        match self {
            Column::Numeric(_) => 0,
            Column::Text(values) => values
                .iter()
                .flatten()
                .filter(|raw| !raw.trim().is_empty() && parse_number(raw).is_none())
                .count(),
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("column '{name}' has {actual} rows but the table has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// One ticker's date-ascending table.
///
/// A column is either absent or present with a value slot for every row,
/// so "missing column" and "value undefined" stay distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    ticker: String,
    dates: Vec<NaiveDate>,
    columns: IndexMap<String, Column>,
    close_source: CloseSource,
}

impl PriceTable {
    /// Create a table with the given dates and no columns
    pub fn new(ticker: impl Into<String>, dates: Vec<NaiveDate>) -> Self {
        Self {
            ticker: ticker.into(),
            dates,
            columns: IndexMap::new(),
            close_source: CloseSource::Close,
        }
    }

    /// Build a canonical OHLCV table from bars.
    ///
    /// Bars are sorted by date; the first bar of a duplicated date is kept.
    pub fn from_bars(ticker: impl Into<String>, bars: &[PriceBar], close_source: CloseSource) -> Self {
        let mut sorted: Vec<PriceBar> = bars.to_vec();
        sorted.sort_by_key(|bar| bar.date);
        sorted.dedup_by_key(|bar| bar.date);

        let column = |f: fn(&PriceBar) -> f64| {
            Column::Numeric(sorted.iter().map(|bar| Some(f(bar)).filter(|v| !v.is_nan())).collect())
        };

        let mut columns = IndexMap::new();
        columns.insert(OPEN.to_string(), column(|b| b.open));
        columns.insert(HIGH.to_string(), column(|b| b.high));
        columns.insert(LOW.to_string(), column(|b| b.low));
        columns.insert(CLOSE.to_string(), column(|b| b.close));
        columns.insert(VOLUME.to_string(), column(|b| b.volume));

        Self {
            ticker: ticker.into(),
            dates: sorted.iter().map(|bar| bar.date).collect(),
            columns,
            close_source,
        }
    }

    /// Add or replace a column, checking its length
    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) -> Result<(), TableError> {
        let name = name.into();
        if column.len() != self.dates.len() {
            return Err(TableError::LengthMismatch {
                name,
                expected: self.dates.len(),
                actual: column.len(),
            });
        }
        self.columns.insert(name, column);
        Ok(())
    }

    /// Builder form of [`PriceTable::insert_column`]
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self, TableError> {
        self.insert_column(name, column)?;
        Ok(self)
    }

    /// Add or replace a numeric column. Values are padded with `None` or
    /// truncated to the table length.
    pub fn set_numeric(&mut self, name: &str, mut values: Vec<Option<f64>>) {
        values.resize(self.dates.len(), None);
        self.columns.insert(name.to_string(), Column::Numeric(values));
    }

    /// Add or replace a numeric column with every value undefined
    pub fn set_undefined(&mut self, name: &str) {
        self.set_numeric(name, Vec::new());
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Numeric view of a column, or `None` when the column is absent
    pub fn numeric(&self, name: &str) -> Option<Vec<Option<f64>>> {
        self.columns.get(name).map(Column::to_numeric)
    }

    pub fn close_source(&self) -> &CloseSource {
        &self.close_source
    }

    pub fn set_close_source(&mut self, close_source: CloseSource) {
        self.close_source = close_source;
    }

    /// Repair a loader table into canonical OHLCV form.
    ///
    /// Resolves the five OHLCV columns (recording any adjusted-close
    /// substitution), renames them to canonical names, coerces them to
    /// numbers and drops every row with an undefined OHLCV value. Other
    /// columns are not carried over.
    pub fn into_ohlcv(self) -> Result<Self, AnalysisIssue> {
        let names: Vec<&str> = self.column_names().collect();
        let mapping = resolve_ohlcv(&names)?;

        let resolved: Vec<(&str, Vec<Option<f64>>)> = mapping
            .pairs()
            .iter()
            .map(|(canonical, actual)| (*canonical, self.numeric(actual).unwrap_or_default()))
            .collect();

        let keep: Vec<usize> = (0..self.len())
            .filter(|&row| resolved.iter().all(|(_, values)| values[row].is_some()))
            .collect();

        let dropped = self.len() - keep.len();
        if dropped > 0 {
            debug!(
                ticker = %self.ticker,
                dropped,
                "Dropped price rows with undefined OHLCV values"
            );
        }

        let mut columns = IndexMap::new();
        for (canonical, values) in resolved {
            let kept = keep.iter().map(|&row| values[row]).collect();
            columns.insert(canonical.to_string(), Column::Numeric(kept));
        }

        Ok(Self {
            dates: keep.iter().map(|&row| self.dates[row]).collect(),
            ticker: self.ticker,
            columns,
            close_source: mapping.close_source,
        })
    }
}
