use std::path::{Path, PathBuf};

use crate::ai::{AdaptiveConfig, EvalConfig, OpeningConfig, ProfilerConfig, SearchConfig};
use crate::error::ConfigError;
use crate::game::{COLS, ROWS};
use crate::session::SessionConfig;

/// Where game history and the opening book are kept.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// When false, everything learned is discarded at exit.
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            enabled: true,
            path: PathBuf::from("data/adaptive_connect_four.json"),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub eval: EvalConfig,
    pub profiler: ProfilerConfig,
    pub opening: OpeningConfig,
    pub store: StoreConfig,
    pub session: SessionConfig,
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Validation(msg.into())
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// The sections the adaptive player is built from.
    pub fn adaptive_config(&self) -> AdaptiveConfig {
        AdaptiveConfig {
            search: self.search.clone(),
            eval: self.eval.clone(),
            profiler: self.profiler.clone(),
            opening: self.opening.clone(),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.depth as usize > ROWS * COLS {
            return Err(invalid("search.depth must be <= 42"));
        }

        let e = &self.eval;
        let weights = [
            e.center,
            e.pair_single,
            e.pair_split,
            e.pair_double,
            e.three,
            e.fork,
            e.blunder_penalty,
        ];
        if weights.iter().any(|w| *w < 0.0) {
            return Err(invalid("eval weights must be >= 0"));
        }
        if e.win <= e.fork || e.win <= e.blunder_penalty {
            return Err(invalid("eval.win must exceed eval.fork and eval.blunder_penalty"));
        }
        if e.defense_multiplier < 1.0 {
            return Err(invalid("eval.defense_multiplier must be >= 1"));
        }

        let p = &self.profiler;
        if p.min_bias <= 0.0 {
            return Err(invalid("profiler.min_bias must be > 0"));
        }
        if p.min_bias > p.max_bias {
            return Err(invalid("profiler.min_bias must be <= profiler.max_bias"));
        }
        let rates = [
            p.lethal_rate,
            p.strategic_rate,
            p.positional_rate,
            p.correction_rate,
        ];
        if rates.iter().any(|r| *r < 0.0) {
            return Err(invalid("profiler rates must be >= 0"));
        }
        if !(p.lethal_rate > p.strategic_rate && p.strategic_rate > p.correction_rate) {
            return Err(invalid(
                "profiler rates must satisfy lethal_rate > strategic_rate > correction_rate",
            ));
        }
        if p.smoothing <= 0.0 || p.smoothing > 1.0 {
            return Err(invalid("profiler.smoothing must be in (0, 1]"));
        }
        if p.cooling_factor < 0.0 || p.cooling_factor > 1.0 {
            return Err(invalid("profiler.cooling_factor must be in [0, 1]"));
        }
        if p.arrogance_threshold < 1.0 {
            return Err(invalid("profiler.arrogance_threshold must be >= 1"));
        }
        if p.confidence_threshold < 1.0 {
            return Err(invalid("profiler.confidence_threshold must be >= 1"));
        }

        let o = &self.opening;
        if o.win_reward <= o.loss_reward {
            return Err(invalid("opening.win_reward must be > opening.loss_reward"));
        }
        if o.draw_reward < o.loss_reward || o.draw_reward > o.win_reward {
            return Err(invalid(
                "opening.draw_reward must lie between loss_reward and win_reward",
            ));
        }
        if o.min_total_visits == 0 {
            return Err(invalid("opening.min_total_visits must be >= 1"));
        }
        if o.exploration < 0.0 {
            return Err(invalid("opening.exploration must be >= 0"));
        }

        if self.session.games == 0 {
            return Err(invalid("session.games must be > 0"));
        }
        if self.session.log_interval == 0 {
            return Err(invalid("session.log_interval must be > 0"));
        }
        if self.session.opponent.parse::<crate::ai::BotKind>().is_err() {
            return Err(ConfigError::Validation(format!(
                "session.opponent '{}' is not a known bot",
                self.session.opponent
            )));
        }

        if self.store.enabled && self.store.path.as_os_str().is_empty() {
            return Err(invalid("store.path must be set when the store is enabled"));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[search]
depth = 6

[profiler]
max_bias = 4.0
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search.depth, 6);
        assert!(config.search.use_transposition);
        assert!((config.profiler.max_bias - 4.0).abs() < 1e-9);
        assert!((config.profiler.lethal_rate - 0.5).abs() < 1e-9);
        assert_eq!(config.session.games, 20);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_adaptive_config_mirrors_sections() {
        let mut config = AppConfig::default();
        config.search.depth = 2;
        config.opening.enabled = false;
        let adaptive = config.adaptive_config();
        assert_eq!(adaptive.search.depth, 2);
        assert!(!adaptive.opening.enabled);
        assert_eq!(adaptive.eval, config.eval);
    }

    #[test]
    fn test_validation_rejects_inverted_bias_range() {
        let mut config = AppConfig::default();
        config.profiler.min_bias = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_min_bias() {
        let mut config = AppConfig::default();
        config.profiler.min_bias = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_rate() {
        let mut config = AppConfig::default();
        config.profiler.strategic_rate = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_misordered_rates() {
        let mut config = AppConfig::default();
        config.profiler.strategic_rate = 0.6;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.profiler.correction_rate = 0.3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_smoothing_out_of_range() {
        let mut config = AppConfig::default();
        config.profiler.smoothing = 0.0;
        assert!(config.validate().is_err());
        config.profiler.smoothing = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_cooling_out_of_range() {
        let mut config = AppConfig::default();
        config.profiler.cooling_factor = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_weak_defense_multiplier() {
        let mut config = AppConfig::default();
        config.eval.defense_multiplier = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_fork_above_win() {
        let mut config = AppConfig::default();
        config.eval.fork = config.eval.win * 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_draw_reward_outside_range() {
        let mut config = AppConfig::default();
        config.opening.draw_reward = 150.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_inverted_rewards() {
        let mut config = AppConfig::default();
        config.opening.win_reward = -100.0;
        config.opening.loss_reward = 100.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_min_visits() {
        let mut config = AppConfig::default();
        config.opening.min_total_visits = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_games() {
        let mut config = AppConfig::default();
        config.session.games = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_opponent() {
        let mut config = AppConfig::default();
        config.session.opponent = "grandmaster".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_huge_depth() {
        let mut config = AppConfig::default();
        config.search.depth = 50;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_store_needs_no_path() {
        let mut config = AppConfig::default();
        config.store.enabled = false;
        config.store.path = PathBuf::new();
        config.validate().unwrap();
        config.store.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.search.depth, 4);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[session]
games = 50
opponent = "edge"
seed = 7

[store]
path = "elsewhere.json"
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.session.games, 50);
        assert_eq!(config.session.opponent, "edge");
        assert_eq!(config.session.seed, Some(7));
        assert_eq!(config.store.path, PathBuf::from("elsewhere.json"));
        // Others are defaults
        assert_eq!(config.session.log_interval, 10);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[session]\ngames = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config, AppConfig::default());
    }
}
