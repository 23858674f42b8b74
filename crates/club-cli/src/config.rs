//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// How `club run` prints records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One plain line per record.
    #[default]
    Text,
    /// One JSON object per record.
    Json,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Event log used when no input path is given on the command line.
    pub input_path: PathBuf,

    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("input.txt"),
            format: OutputFormat::default(),
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

        // Load from environment variables (CLUB_*)
        figment = figment.merge(Env::prefixed("CLUB_"));

        figment.extract()
    }

    /// The event log to read: the explicit path if given, else the
    /// configured one.
    pub fn input_or_default(&self, explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(|| self.input_path.clone(), Path::to_path_buf)
    }

    /// Output format, with `--json` taking precedence over the config.
    pub const fn format_with(&self, json_flag: bool) -> OutputFormat {
        if json_flag {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

/// Returns the platform-specific config directory for club.
///
/// On Linux: `~/.config/club`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("club"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_club() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "club");
    }

    #[test]
    fn test_default_config_reads_input_txt() {
        let config = Config::default();
        assert_eq!(config.input_path, PathBuf::from("input.txt"));
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("club.toml");
        std::fs::write(&path, "input_path = \"/logs/monday.txt\"\nformat = \"json\"\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.input_path, PathBuf::from("/logs/monday.txt"));
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_explicit_input_wins() {
        let config = Config::default();
        assert_eq!(
            config.input_or_default(Some(Path::new("day.txt"))),
            PathBuf::from("day.txt")
        );
        assert_eq!(config.input_or_default(None), PathBuf::from("input.txt"));
    }

    #[test]
    fn test_json_flag_overrides_format() {
        let config = Config::default();
        assert_eq!(config.format_with(true), OutputFormat::Json);
        assert_eq!(config.format_with(false), OutputFormat::Text);
    }
}
