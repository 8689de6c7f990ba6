//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use fq_core::{SortSpec, TimeWindow};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Observation snapshot used when `--data` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations_path: Option<PathBuf>,

    /// Activity snapshot used when `--data` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities_path: Option<PathBuf>,

    /// Time window applied when `--window` is absent.
    #[serde(default)]
    pub default_window: TimeWindow,

    /// Ordering for `fq floats` when `--sort` is absent.
    pub floats_sort: SortSpec,

    /// Ordering for `fq history` when `--sort` is absent. Unset keeps log order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_sort: Option<SortSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            observations_path: None,
            activities_path: None,
            default_window: TimeWindow::All,
            floats_sort: SortSpec::descending("date"),
            history_sort: None,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (FQ_*)
        figment = figment.merge(Env::prefixed("FQ_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for fq.
///
/// On Linux: `~/.config/fq`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("fq"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use fq_core::Direction;

    #[test]
    fn test_dirs_config_path_ends_with_fq() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "fq");
    }

    #[test]
    fn test_default_config_sorts_floats_newest_first() {
        let config = Config::default();
        assert_eq!(config.floats_sort, SortSpec::descending("date"));
        assert_eq!(config.default_window, TimeWindow::All);
        assert_eq!(config.history_sort, None);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
observations_path = "/data/floats.json"
default_window = "last-30-days"

[floats_sort]
field = "temperature"
direction = "asc"

[history_sort]
field = "timestamp"
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();

        assert_eq!(
            config.observations_path.as_deref(),
            Some(Path::new("/data/floats.json"))
        );
        assert_eq!(config.activities_path, None);
        assert_eq!(config.default_window, TimeWindow::Last30Days);
        assert_eq!(config.floats_sort, SortSpec::ascending("temperature"));
        assert_eq!(
            config.history_sort.map(|s| s.direction),
            Some(Direction::Descending)
        );
    }

    #[test]
    fn test_load_from_rejects_bad_window() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "default_window = \"fortnight\"\n").unwrap();

        assert!(Config::load_from(Some(&path)).is_err());
    }
}
