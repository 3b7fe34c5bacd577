//! Column-name resolution for loader-supplied price tables

use crate::issue::AnalysisIssue;
use crate::table::CloseSource;

pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const VOLUME: &str = "Volume";

/// Canonical OHLCV column names in table order
pub const OHLCV_COLUMNS: [&str; 5] = [OPEN, HIGH, LOW, CLOSE, VOLUME];

const CLOSE_ALIASES: [&str; 2] = ["Adj Close", "Adjusted Close"];

fn aliases(required: &str) -> &'static [&'static str] {
    if required.eq_ignore_ascii_case(CLOSE) {
        &CLOSE_ALIASES
    } else {
        &[]
    }
}

/// Find the actual column name that satisfies `required`.
///
/// Precedence: exact match, then ASCII case-insensitive match, then a
/// known alias (`Close` falls back to `Adj Close` / `Adjusted Close`).
pub fn resolve_column<S: AsRef<str>>(required: &str, available: &[S]) -> Option<String> {
    let names = || available.iter().map(|name| name.as_ref());

    names()
        .find(|name| *name == required)
        .or_else(|| names().find(|name| name.eq_ignore_ascii_case(required)))
        .or_else(|| {
            aliases(required)
                .iter()
                .find_map(|alias| names().find(|name| name.eq_ignore_ascii_case(alias)))
        })
        .map(str::to_string)
}

/// Actual column names backing the five canonical OHLCV columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OhlcvMapping {
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub close_source: CloseSource,
}

impl OhlcvMapping {
    /// (canonical, actual) pairs in table order
    pub fn pairs(&self) -> [(&'static str, &str); 5] {
        [
            (OPEN, self.open.as_str()),
            (HIGH, self.high.as_str()),
            (LOW, self.low.as_str()),
            (CLOSE, self.close.as_str()),
            (VOLUME, self.volume.as_str()),
        ]
    }
}

/// Resolve all OHLCV columns, reporting the first one that cannot be found.
pub fn resolve_ohlcv<S: AsRef<str>>(available: &[S]) -> Result<OhlcvMapping, AnalysisIssue> {
    let find = |required: &str| {
        resolve_column(required, available).ok_or_else(|| AnalysisIssue::missing_column(required))
    };

    let open = find(OPEN)?;
    let high = find(HIGH)?;
    let low = find(LOW)?;
    let close = find(CLOSE)?;
    let volume = find(VOLUME)?;

    let close_source = if close.eq_ignore_ascii_case(CLOSE) {
        CloseSource::Close
    } else {
        CloseSource::AdjustedClose {
            column: close.clone(),
        }
    };

    Ok(OhlcvMapping {
        open,
        high,
        low,
        close,
        volume,
        close_source,
    })
}
