//! Configuration management module.
//!
//! This module handles loading, saving, and managing application configuration,
//! including the data directory, which collections are mirrored to disk, and
//! theme preferences.

mod error;

pub use error::ConfigError;

use crate::crm::Collection;
use crate::error::AppError;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/crm-tui";
const DATA_DIRECTORY_NAME: &str = "crm-tui";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub theme_name: String,
    pub data_dir: PathBuf,
    pub mirrored_collections: Vec<Collection>,
    pub simulated_delay_ms: u64,
    pub default_owner: String,
    pub seed_demo_data: bool,
    pub log_level: String,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_theme_name")]
    pub theme_name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_mirrored_collections")]
    pub mirrored_collections: Vec<Collection>,
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,
    #[serde(default = "default_owner")]
    pub default_owner: String,
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme_name() -> String {
    "tokyo-night".to_string()
}

fn default_data_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join(DATA_DIRECTORY_NAME),
        None => PathBuf::from(".").join(DATA_DIRECTORY_NAME),
    }
}

fn default_mirrored_collections() -> Vec<Collection> {
    vec![Collection::Emails]
}

fn default_simulated_delay_ms() -> u64 {
    800
}

fn default_owner() -> String {
    "Jane Doe".to_string()
}

fn default_seed_demo_data() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance holding the defaults.
    ///
    pub fn new() -> Config {
        Config {
            theme_name: default_theme_name(),
            data_dir: default_data_dir(),
            mirrored_collections: default_mirrored_collections(),
            simulated_delay_ms: default_simulated_delay_ms(),
            default_owner: default_owner(),
            seed_demo_data: default_seed_demo_data(),
            log_level: default_log_level(),
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. If no file exists yet, one is written with the
    /// current values.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };
        self.load_from_dir(&dir_path)
    }

    /// Load the configuration file inside the given directory, creating the
    /// directory and the file as needed.
    ///
    pub fn load_from_dir(&mut self, dir_path: &Path) -> Result<(), AppError> {
        if !dir_path.exists() {
            fs::create_dir_all(dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.to_path_buf(),
                source: e,
            })?;
        }

        let file_path = dir_path.join(Path::new(FILE_NAME));
        self.file_path = Some(file_path.clone());

        if file_path.exists() {
            let contents = fs::read_to_string(&file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileSpec = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            self.theme_name = data.theme_name;
            self.data_dir = data.data_dir;
            self.mirrored_collections = data.mirrored_collections;
            self.simulated_delay_ms = data.simulated_delay_ms;
            self.default_owner = data.default_owner;
            self.seed_demo_data = data.seed_demo_data;
            self.log_level = data.log_level;
        } else {
            self.save()?;
        }
        Ok(())
    }

    /// Attempt to serialize the configuration data and write it to the disk,
    /// returning any unrecoverable errors.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let data = FileSpec {
            theme_name: self.theme_name.clone(),
            data_dir: self.data_dir.clone(),
            mirrored_collections: self.mirrored_collections.clone(),
            simulated_delay_ms: self.simulated_delay_ms,
            default_owner: self.default_owner.clone(),
            seed_demo_data: self.seed_demo_data,
            log_level: self.log_level.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Path of the loaded configuration file, if any.
    ///
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Delay applied to simulated network calls.
    ///
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    /// Parse the configured log level, falling back to info.
    ///
    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Returns the path buffer for the default path to the configuration file
    /// or an error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => Ok(home.join(Path::new(DEFAULT_DIRECTORY_PATH))),
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_only_emails() {
        let config = Config::new();
        assert_eq!(config.mirrored_collections, vec![Collection::Emails]);
        assert_eq!(config.simulated_delay(), Duration::from_millis(800));
        assert!(config.seed_demo_data);
        assert_eq!(config.log_level_filter(), LevelFilter::Info);
        assert!(config.file_path().is_none());
    }

    #[test]
    fn load_creates_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("nested");
        let mut config = Config::new();
        config.load_from_dir(&config_dir).unwrap();

        let file = config_dir.join(FILE_NAME);
        assert!(file.exists());
        let contents = fs::read_to_string(file).unwrap();
        assert!(contents.contains("mirrored_collections"));
        assert!(contents.contains("emails"));
    }

    #[test]
    fn load_reads_partial_file_and_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(FILE_NAME),
            "theme_name: dracula\nmirrored_collections:\n  - emails\n  - campaigns\nlog_level: debug\n",
        )
        .unwrap();
        let mut config = Config::new();
        config.load_from_dir(dir.path()).unwrap();
        assert_eq!(config.theme_name, "dracula");
        assert_eq!(
            config.mirrored_collections,
            vec![Collection::Emails, Collection::Campaigns]
        );
        assert_eq!(config.simulated_delay_ms, 800);
        assert_eq!(config.log_level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn save_round_trips_theme() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new();
        config.load_from_dir(dir.path()).unwrap();
        config.theme_name = "gruvbox".to_string();
        config.save().unwrap();

        let mut reloaded = Config::new();
        reloaded.load_from_dir(dir.path()).unwrap();
        assert_eq!(reloaded.theme_name, "gruvbox");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILE_NAME), "mirrored_collections: 7\n").unwrap();
        let mut config = Config::new();
        let error = config.load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(
            error,
            AppError::Config(ConfigError::DeserializationFailed(_))
        ));
    }

    #[test]
    fn save_without_path_fails() {
        assert!(Config::new().save().is_err());
    }
}
