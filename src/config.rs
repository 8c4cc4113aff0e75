use crate::error::{MediascribeError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Target duration for each cut chunk, in seconds. Kept safely below the
/// transcription service's hard per-request ceiling.
pub const DEFAULT_CHUNK_DURATION_SECS: f64 = 1400.0;

/// Hard per-request duration ceiling enforced by the transcription service.
/// Chunks must always stay strictly below this.
pub const SERVICE_DURATION_CEILING_SECS: f64 = 1500.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub max_chunk_duration_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            max_chunk_duration_secs: DEFAULT_CHUNK_DURATION_SECS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.openai_api_key = Some(key);
        }
        if let Ok(duration) = std::env::var("MEDIASCRIBE_CHUNK_DURATION") {
            if let Ok(d) = duration.parse() {
                config.max_chunk_duration_secs = d;
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.is_none() {
            return Err(MediascribeError::Config(
                "OPENAI_API_KEY not set. Export it with: export OPENAI_API_KEY=sk-..."
                    .to_string(),
            ));
        }

        if !self.max_chunk_duration_secs.is_finite() || self.max_chunk_duration_secs <= 0.0 {
            return Err(MediascribeError::Config(
                "Chunk duration must be a positive number of seconds".to_string(),
            ));
        }

        if self.max_chunk_duration_secs >= SERVICE_DURATION_CEILING_SECS {
            return Err(MediascribeError::Config(format!(
                "Chunk duration {}s must stay below the {}s limit the transcription API enforces",
                self.max_chunk_duration_secs, SERVICE_DURATION_CEILING_SECS
            )));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mediascribe").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.max_chunk_duration_secs, DEFAULT_CHUNK_DURATION_SECS);
    }

    #[test]
    fn test_default_chunk_duration_below_service_ceiling() {
        assert!(DEFAULT_CHUNK_DURATION_SECS < SERVICE_DURATION_CEILING_SECS);
    }

    #[test]
    fn test_validate_missing_api_key() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_with_api_key() {
        let config = Config {
            openai_api_key: Some("sk-test".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_chunk_duration_at_ceiling() {
        let config = Config {
            openai_api_key: Some("sk-test".to_string()),
            max_chunk_duration_secs: SERVICE_DURATION_CEILING_SECS,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_chunk_duration() {
        let config = Config {
            openai_api_key: Some("sk-test".to_string()),
            max_chunk_duration_secs: 0.0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_chunk_duration() {
        // "NaN" and "inf" both parse as f64, so they can arrive via the
        // CLI flag or the environment override.
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let config = Config {
                openai_api_key: Some("sk-test".to_string()),
                max_chunk_duration_secs: bad,
            };
            assert!(config.validate().is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let config: Config = toml::from_str("openai_api_key = \"sk-file\"").unwrap();
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-file"));
        assert_eq!(config.max_chunk_duration_secs, DEFAULT_CHUNK_DURATION_SECS);
    }
}
