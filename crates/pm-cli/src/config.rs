//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use pm_core::{DateScope, DurationFormatter, DurationStyle, Locale, TimeUnit, WeightMetric};
use serde::{Deserialize, Serialize};

/// Application configuration.
///
/// Supplies defaults for options not given on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Edge weight metric.
    pub weight_metric: WeightMetric,
    /// Unit for `mean_time` edge weights.
    pub time_unit: TimeUnit,
    /// Tooltip duration style.
    pub duration_style: DurationStyle,
    /// Language of unit labels.
    pub locale: Locale,
    /// Whether date bounds apply before or after ranking.
    pub date_scope: DateScope,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weight_metric: WeightMetric::Cases,
            time_unit: TimeUnit::Day,
            duration_style: DurationStyle::Breakdown,
            locale: Locale::En,
            date_scope: DateScope::Reindex,
            pretty: false,
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

        // Load from environment variables (PM_*)
        figment = figment.merge(Env::prefixed("PM_"));

        figment.extract()
    }

    /// Builds the duration formatter for the configured style and locale.
    pub fn formatter(&self) -> Box<dyn DurationFormatter> {
        self.duration_style.formatter(self.locale)
    }
}

/// Returns the platform-specific config directory for pm.
///
/// On Linux: `~/.config/pm`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pm"))
}
