use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::util::paths::{config_path, donations_dir};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Locale used to resolve translatable text
    pub locale: String,
    /// Directory finished donations are written to
    pub output_dir: PathBuf,
    /// Default input file offered to file prompts when the CLI gets none
    pub input_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            output_dir: donations_dir(),
            input_file: None,
        }
    }
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub locale: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub input_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file, merging with defaults
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    fn load_from(config_file: &Path) -> Self {
        let mut config = Config::default();

        if config_file.exists() {
            match fs::read_to_string(config_file) {
                Ok(contents) => match toml::from_str::<TomlConfig>(&contents) {
                    Ok(toml_config) => {
                        if let Some(locale) = toml_config.locale {
                            config.locale = locale;
                        }
                        if let Some(output_dir) = toml_config.output_dir {
                            config.output_dir = output_dir;
                        }
                        if let Some(input_file) = toml_config.input_file {
                            config.input_file = Some(input_file);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %config_file.display(),
                            error = %e,
                            "ignoring unparseable config file"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %config_file.display(),
                        error = %e,
                        "failed to read config file"
                    );
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.locale, "en");
        assert!(config.input_file.is_none());
    }

    #[test]
    fn partial_file_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "locale = \"nl\"").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.locale, "nl");
        assert_eq!(config.output_dir, donations_dir());
    }

    #[test]
    fn unparseable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "locale = [not toml").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.locale, "en");
    }
}
