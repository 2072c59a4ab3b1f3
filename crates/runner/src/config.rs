//! Runner configuration
//!
//! A single JSON file; every field is optional and falls back to its default.
//!
//! ```json
//! {
//!   "ws_url": "wss://ws.gomarket-cpp.goquant.io/ws/l2-orderbook/okx/BTC-USDT-SWAP",
//!   "ws_reconnect_interval_secs": 5,
//!   "cost": { "quantity_usd": 100.0, "volatility": 0.02, "fee_tier": "Tier 1" },
//!   "max_processing_time_ms": 100.0,
//!   "db_path": "data/trading.db"
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use costsim_estimators::{
    CostInputs, CostModel, MakerTakerConfig, MakerTakerPredictor, SlippageConfig,
    SlippageEstimator,
};
use costsim_gateway::WsFeedConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::PipelineSettings;

pub const DEFAULT_WS_URL: &str =
    "wss://ws.gomarket-cpp.goquant.io/ws/l2-orderbook/okx/BTC-USDT-SWAP";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Level-2 order-book stream
    pub ws_url: String,
    pub ws_reconnect_interval_secs: u64,
    /// Sent after every connect, for feeds that need a subscription
    pub subscribe_message: Option<String>,

    /// The order being costed
    pub cost: CostInputs,
    pub slippage: SlippageConfig,
    pub maker_taker: MakerTakerConfig,

    /// Ticks slower than this are reported
    pub max_processing_time_ms: f64,
    /// Samples kept by the performance analyzer
    pub performance_window: usize,
    /// Write a performance record every this many ticks
    pub performance_every: u64,

    /// SQLite database for history; `None` keeps history in memory
    pub db_path: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            ws_url: DEFAULT_WS_URL.to_string(),
            ws_reconnect_interval_secs: 5,
            subscribe_message: None,
            cost: CostInputs::default(),
            slippage: SlippageConfig::default(),
            maker_taker: MakerTakerConfig::default(),
            max_processing_time_ms: 100.0,
            performance_window: 100,
            performance_every: 100,
            db_path: Some(PathBuf::from("data/trading.db")),
        }
    }
}

impl RunnerConfig {
    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cost = &self.cost;
        if !(cost.quantity_usd.is_finite() && cost.quantity_usd > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cost.quantity_usd must be positive, got {}",
                cost.quantity_usd
            )));
        }
        if !(cost.horizon.is_finite() && cost.horizon > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cost.horizon must be positive, got {}",
                cost.horizon
            )));
        }
        for (name, value) in [
            ("cost.volatility", cost.volatility),
            ("cost.eta", cost.eta),
            ("cost.gamma", cost.gamma),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        if !(self.slippage.quantile > 0.0 && self.slippage.quantile < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "slippage.quantile must be in (0, 1), got {}",
                self.slippage.quantile
            )));
        }
        if self.performance_window == 0 {
            return Err(ConfigError::Invalid(
                "performance_window must be at least 1".to_string(),
            ));
        }
        if self.performance_every == 0 {
            return Err(ConfigError::Invalid(
                "performance_every must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cost_model(&self) -> CostModel {
        CostModel::new(
            self.cost,
            SlippageEstimator::new(self.slippage),
            MakerTakerPredictor::new(self.maker_taker),
        )
    }

    pub fn pipeline_settings(&self, tick_limit: Option<u64>) -> PipelineSettings {
        PipelineSettings {
            max_processing_time_ms: self.max_processing_time_ms,
            performance_every: self.performance_every,
            tick_limit,
        }
    }

    pub fn feed_config(&self) -> WsFeedConfig {
        WsFeedConfig {
            url: self.ws_url.clone(),
            reconnect_interval: Duration::from_secs(self.ws_reconnect_interval_secs),
            subscribe_message: self.subscribe_message.clone(),
        }
    }
}

/// Load configuration, falling back to defaults when the file does not exist
pub fn load_config(path: impl AsRef<Path>) -> Result<RunnerConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("no config at {}, using defaults", path.display());
        return Ok(RunnerConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    RunnerConfig::from_json(&content)
}

/// Write configuration as pretty JSON, creating the parent directory
pub fn save_config(config: &RunnerConfig, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let io_error = |e: std::io::Error| ConfigError::Io {
        path: path.display().to_string(),
        error: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, config.to_json()?).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use costsim_core::{FeeTier, Side};

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.ws_url, DEFAULT_WS_URL);
        assert_eq!(config.ws_reconnect_interval_secs, 5);
        assert_eq!(config.cost.quantity_usd, 100.0);
        assert_eq!(config.cost.volatility, 0.02);
        assert_eq!(config.cost.fee_tier, FeeTier::Tier1);
        assert_eq!(config.max_processing_time_ms, 100.0);
        assert_eq!(config.performance_window, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RunnerConfig::from_json(
            r#"{"cost": {"quantity_usd": 250.0, "fee_tier": "Tier 3", "side": "Sell"},
                "db_path": null}"#,
        )
        .unwrap();

        assert_eq!(config.cost.quantity_usd, 250.0);
        assert_eq!(config.cost.fee_tier, FeeTier::Tier3);
        assert_eq!(config.cost.side, Side::Sell);
        assert_eq!(config.cost.eta, 0.1);
        assert_eq!(config.ws_url, DEFAULT_WS_URL);
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = RunnerConfig::from_json(r#"{"cost": {"quantity_usd": -1.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("quantity_usd")));

        let err = RunnerConfig::from_json(r#"{"cost": {"gamma": -0.1}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("cost.gamma")));

        let err = RunnerConfig::from_json(r#"{"performance_every": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        assert!(matches!(
            RunnerConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("costsim-config-does-not-exist.json");
        assert_eq!(load_config(path).unwrap(), RunnerConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("costsim-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.json");
        let _ = std::fs::remove_dir_all(&dir);

        let mut config = RunnerConfig::default();
        config.cost.quantity_usd = 1_000.0;
        config.ws_reconnect_interval_secs = 1;
        save_config(&config, &path).unwrap();

        assert_eq!(load_config(&path).unwrap(), config);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_feed_config() {
        let mut config = RunnerConfig::default();
        config.ws_reconnect_interval_secs = 2;
        config.subscribe_message = Some("{\"op\":\"subscribe\"}".to_string());

        let feed = config.feed_config();
        assert_eq!(feed.url, DEFAULT_WS_URL);
        assert_eq!(feed.reconnect_interval, Duration::from_secs(2));
        assert_eq!(feed.subscribe_message.as_deref(), Some("{\"op\":\"subscribe\"}"));
    }
}
