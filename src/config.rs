//! Runtime configuration from `BLOCKFALL_*` environment variables.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::FRAME_MS;

pub const DEFAULT_SCORES_PATH: &str = "blockfall_scores.json";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Piece generator seed; `None` seeds from the wall clock
    pub seed: Option<u32>,
    pub scores_path: PathBuf,
    /// Log file. No logging without one, so the alternate screen stays clean.
    pub log_path: Option<PathBuf>,
    pub log_filter: String,
    pub backdrop: bool,
    pub frame_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: None,
            scores_path: PathBuf::from(DEFAULT_SCORES_PATH),
            log_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            backdrop: true,
            frame_ms: FRAME_MS,
        }
    }
}

impl AppConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let seed = non_empty("BLOCKFALL_SEED").and_then(|s| s.parse().ok());

        let scores_path = non_empty("BLOCKFALL_SCORES_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.scores_path);

        let log_path = non_empty("BLOCKFALL_LOG_PATH").map(PathBuf::from);

        let log_filter = non_empty("BLOCKFALL_LOG").unwrap_or(defaults.log_filter);

        let backdrop = non_empty("BLOCKFALL_BACKDROP")
            .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "off" | "no"))
            .unwrap_or(defaults.backdrop);

        let frame_ms = non_empty("BLOCKFALL_FRAME_MS")
            .and_then(|s| s.parse().ok())
            .filter(|&ms: &u32| ms > 0)
            .unwrap_or(defaults.frame_ms);

        Self {
            seed,
            scores_path,
            log_path,
            log_filter,
            backdrop,
            frame_ms,
        }
    }

    /// Configured seed, or one derived from the current time
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u32 ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.frame_ms, 16);
    }

    #[test]
    fn test_reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BLOCKFALL_SEED", "42"),
            ("BLOCKFALL_SCORES_PATH", "/tmp/scores.json"),
            ("BLOCKFALL_LOG_PATH", " /tmp/blockfall.log "),
            ("BLOCKFALL_LOG", "debug"),
            ("BLOCKFALL_BACKDROP", "off"),
            ("BLOCKFALL_FRAME_MS", "33"),
        ]));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.resolve_seed(), 42);
        assert_eq!(config.scores_path, PathBuf::from("/tmp/scores.json"));
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/blockfall.log")));
        assert_eq!(config.log_filter, "debug");
        assert!(!config.backdrop);
        assert_eq!(config.frame_ms, 33);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BLOCKFALL_SEED", "many"),
            ("BLOCKFALL_LOG_PATH", "   "),
            ("BLOCKFALL_FRAME_MS", "0"),
        ]));
        assert_eq!(config.seed, None);
        assert_eq!(config.log_path, None);
        assert_eq!(config.frame_ms, 16);
    }

    #[test]
    fn test_from_env_does_not_panic() {
        let _config = AppConfig::from_env();
    }
}
