//! Study configuration

use std::path::Path;

use ::config::{Config, Environment, File, FileFormat, Map};
use anyhow::Context;
use common::CLOSE;
use market_analysis::{IndicatorConfig, DAILY_RETURN};
use sentiment_analysis::ScoreField;
use serde::{Deserialize, Serialize};

use crate::correlation::DEFAULT_MIN_OBSERVATIONS;

/// Prefix of environment variables overriding file settings
pub const ENV_PREFIX: &str = "SENTIMENT_STUDY";

/// Everything the sentiment/return study can be told
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Column treated as "price" for returns and indicators
    #[serde(default = "default_price_column")]
    pub price_column: String,

    /// Name of the derived return column
    #[serde(default = "default_return_column")]
    pub return_column: String,

    /// Sub-score used as an article's sentiment
    #[serde(default)]
    pub score_field: ScoreField,

    /// Signed row offsets to evaluate (0 = same day, 1 = next day, -1 = previous day)
    #[serde(default = "default_lags")]
    pub lags: Vec<i64>,

    /// Complete pairs required before a correlation is computed
    #[serde(default = "default_min_observations")]
    pub min_observations: usize,

    #[serde(default)]
    pub indicators: IndicatorConfig,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            price_column: default_price_column(),
            return_column: default_return_column(),
            score_field: ScoreField::default(),
            lags: default_lags(),
            min_observations: default_min_observations(),
            indicators: IndicatorConfig::default(),
        }
    }
}

impl StudyConfig {
    /// Reject settings that would silently corrupt the output tables
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.indicators.has_distinct_columns(),
            "indicators.sma_short and indicators.sma_long must differ (both {})",
            self.indicators.sma_short
        );
        anyhow::ensure!(
            self.price_column != self.return_column,
            "price_column and return_column must differ"
        );
        Ok(())
    }
}

fn default_price_column() -> String {
    CLOSE.to_string()
}

fn default_return_column() -> String {
    DAILY_RETURN.to_string()
}

fn default_lags() -> Vec<i64> {
    vec![0, 1, -1]
}

fn default_min_observations() -> usize {
    DEFAULT_MIN_OBSERVATIONS
}

/// Load configuration from TOML file
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<StudyConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: StudyConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to TOML file
pub fn save_config(config: &StudyConfig, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load an optional TOML file, then apply `SENTIMENT_STUDY_*` environment overrides.
///
/// Nested keys use a double underscore (`SENTIMENT_STUDY_INDICATORS__RSI_PERIOD`);
/// lags are a comma separated list (`SENTIMENT_STUDY_LAGS=0,1,2`).
pub fn load_layered(path: Option<&Path>) -> anyhow::Result<StudyConfig> {
    layered(path, None)
}

/// Same as [`load_layered`], reading overrides from `env` instead of the process environment.
pub fn load_layered_with_env(
    path: Option<&Path>,
    env: Map<String, String>,
) -> anyhow::Result<StudyConfig> {
    layered(path, Some(env))
}

fn layered(path: Option<&Path>, env: Option<Map<String, String>>) -> anyhow::Result<StudyConfig> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("lags")
                .source(env),
        )
        .build()
        .context("failed to assemble study configuration")?;

    let study: StudyConfig = config.try_deserialize()?;
    study.validate()?;
    Ok(study)
}

/// Create a default configuration file template
pub fn create_config_template(path: impl AsRef<Path>) -> anyhow::Result<()> {
    let template = "# News Sentiment / Stock Return Study Configuration

# Column treated as the price for returns and indicators
price_column = \"Close\"

# Name of the derived daily return column
return_column = \"daily_return\"

# Sentiment sub-score used per article: compound, positive, negative or neutral
score_field = \"compound\"

# Row offsets to test: 0 same day, 1 next day, -1 previous day
lags = [0, 1, -1]

# Complete (sentiment, return) pairs required before correlating
min_observations = 15

[indicators]
sma_short = 20
sma_long = 50
rsi_period = 14
macd_fast = 12
macd_slow = 26
macd_signal = 9
";

    std::fs::write(path, template)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StudyConfig::default();
        assert_eq!(config.price_column, "Close");
        assert_eq!(config.return_column, "daily_return");
        assert_eq!(config.lags, vec![0, 1, -1]);
        assert_eq!(config.min_observations, 15);
        assert_eq!(config.score_field, ScoreField::Compound);
    }

    #[test]
    fn test_config_serialization() {
        let config = StudyConfig {
            lags: vec![0, 2, -3],
            score_field: ScoreField::Positive,
            ..Default::default()
        };
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: StudyConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_template_matches_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.toml");
        create_config_template(&path).unwrap();
        assert_eq!(load_config(&path).unwrap(), StudyConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.toml");
        let mut config = StudyConfig::default();
        config.min_observations = 30;
        config.indicators.rsi_period = 21;
        save_config(&config, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.toml");
        std::fs::write(&path, "lags = [0]\n[indicators]\nsma_short = 10\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.lags, vec![0]);
        assert_eq!(config.indicators.sma_short, 10);
        assert_eq!(config.indicators.sma_long, 50);
        assert_eq!(config.price_column, "Close");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_shared_sma_period_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.toml");
        std::fs::write(&path, "[indicators]\nsma_short = 30\nsma_long = 30\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("sma_short"));
        assert!(load_layered(Some(path.as_path())).is_err());
        assert!(StudyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_layered_file_without_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.toml");
        std::fs::write(&path, "min_observations = 20\nprice_column = \"Adj Close\"\n").unwrap();

        let config = load_layered(Some(path.as_path())).unwrap();
        assert_eq!(config.min_observations, 20);
        assert_eq!(config.price_column, "Adj Close");
        assert_eq!(config.lags, vec![0, 1, -1]);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.toml");
        std::fs::write(&path, "min_observations = 20\nlags = [0]\n").unwrap();

        let mut env = Map::new();
        env.insert("SENTIMENT_STUDY_LAGS".to_string(), "0,2,-3".to_string());
        env.insert("SENTIMENT_STUDY_MIN_OBSERVATIONS".to_string(), "25".to_string());
        env.insert("SENTIMENT_STUDY_SCORE_FIELD".to_string(), "positive".to_string());
        env.insert("SENTIMENT_STUDY_INDICATORS__RSI_PERIOD".to_string(), "21".to_string());
        env.insert("UNRELATED_LAGS".to_string(), "9".to_string());

        let config = load_layered_with_env(Some(path.as_path()), env).unwrap();
        assert_eq!(config.lags, vec![0, 2, -3]);
        assert_eq!(config.min_observations, 25);
        assert_eq!(config.score_field, ScoreField::Positive);
        assert_eq!(config.indicators.rsi_period, 21);
        assert_eq!(config.indicators.sma_short, 20);
        assert_eq!(config.price_column, "Close");
    }

    #[test]
    fn test_environment_without_file() {
        let mut env = Map::new();
        env.insert("SENTIMENT_STUDY_RETURN_COLUMN".to_string(), "ret".to_string());

        let config = load_layered_with_env(None, env).unwrap();
        assert_eq!(config.return_column, "ret");
        assert_eq!(config.lags, vec![0, 1, -1]);
    }
}
