//! Configuration management module.
//!
//! This module handles loading and saving the YAML configuration file: the
//! database IDs, the cached users and projects, and display preferences. The
//! API token is only ever read from the environment.

mod directory;
mod error;

pub use directory::{Directory, Entry};
pub use error::ConfigError;

use crate::error::AppError;
use crate::utils::text_processing::normalize_key;
use chrono::format::{Item, StrftimeItems};
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = "config.yml";
const DIRECTORY_NAME: &str = "noty";

/// Environment variable holding the integration token.
pub const TOKEN_VAR: &str = "NOTION_API_KEY";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tasks_database_id: String,
    #[serde(default)]
    pub projects_database_id: String,
    #[serde(default)]
    pub sprints_database_id: String,
    #[serde(default)]
    pub hours_database_id: String,
    #[serde(default)]
    pub users: Vec<Entry>,
    #[serde(default)]
    pub projects: Vec<Entry>,
    #[serde(default = "default_use_emotes")]
    pub use_emotes: bool,
    #[serde(default = "default_status_emotes")]
    pub status_emotes: BTreeMap<String, String>,
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(skip)]
    file_path: Option<PathBuf>,
}

fn default_use_emotes() -> bool {
    true
}

fn default_status_emotes() -> BTreeMap<String, String> {
    [
        ("not_started", "❄️"),
        ("in_progress", "🚀"),
        ("to_be_tested", "💣"),
        ("in_testing", "💥"),
        ("done", "✅"),
        ("cancelled", "❌"),
    ]
    .into_iter()
    .map(|(status, emote)| (status.to_string(), emote.to_string()))
    .collect()
}

fn default_datetime_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tasks_database_id: String::new(),
            projects_database_id: String::new(),
            sprints_database_id: String::new(),
            hours_database_id: String::new(),
            users: vec![],
            projects: vec![],
            use_emotes: default_use_emotes(),
            status_emotes: default_status_emotes(),
            datetime_format: default_datetime_format(),
            date_format: default_date_format(),
            file_path: None,
        }
    }
}

impl Config {
    /// Return a new instance holding the defaults.
    ///
    pub fn new() -> Config {
        Config::default()
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. Returns whether a file was found; when it was
    /// not, the defaults stay in place and the path is remembered for a later
    /// [`Config::save`].
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<bool, AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(path).to_path_buf(),
            None => Config::default_path()?,
        };
        let file_path = dir_path.join(FILE_NAME);
        debug!("Loading configuration from {}...", file_path.display());

        if !file_path.exists() {
            self.file_path = Some(file_path);
            return Ok(false);
        }

        let contents = fs::read_to_string(&file_path).map_err(|e| ConfigError::LoadFailed {
            path: file_path.clone(),
            message: format!("IO error: {}", e),
        })?;
        let mut data: Config = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
        check_format("datetime_format", &data.datetime_format)?;
        check_format("date_format", &data.date_format)?;
        data.file_path = Some(file_path);
        *self = data;
        Ok(true)
    }

    /// Serialize the configuration and write it to disk, creating the
    /// directory if needed. Returns the file written.
    ///
    pub fn save(&self) -> Result<PathBuf, AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let content = serde_yaml::to_string(self)
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
        info!("Configuration saved to {}", file_path.display());
        Ok(file_path.clone())
    }

    /// Read the integration token from the environment.
    ///
    pub fn access_token() -> Result<String, ConfigError> {
        token_from(std::env::var(TOKEN_VAR).ok())
    }

    pub fn tasks_database(&self) -> Result<&str, ConfigError> {
        required(&self.tasks_database_id, "tasks")
    }

    pub fn projects_database(&self) -> Result<&str, ConfigError> {
        required(&self.projects_database_id, "projects")
    }

    pub fn sprints_database(&self) -> Result<&str, ConfigError> {
        required(&self.sprints_database_id, "sprints")
    }

    pub fn hours_database(&self) -> Result<&str, ConfigError> {
        required(&self.hours_database_id, "hours")
    }

    pub fn directory(&self) -> Directory<'_> {
        Directory::new(&self.users, &self.projects)
    }

    /// Emote for a status label, when emotes are enabled and one is set.
    ///
    pub fn status_emote(&self, status: &str) -> Option<&str> {
        if !self.use_emotes {
            return None;
        }
        self.status_emotes
            .get(&normalize_key(status))
            .map(String::as_str)
            .filter(|emote| !emote.is_empty())
    }

    /// Returns the default configuration directory or an error if the
    /// platform has none.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::config_dir() {
            Some(base) => Ok(base.join(DIRECTORY_NAME)),
            None => Err(ConfigError::ConfigDirectoryNotFound.into()),
        }
    }
}

fn token_from(value: Option<String>) -> Result<String, ConfigError> {
    value
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or(ConfigError::AccessTokenNotSet(TOKEN_VAR))
}

/// Reject strftime strings chrono cannot render.
fn check_format(key: &'static str, format: &str) -> Result<(), ConfigError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidFormat {
            key,
            format: format.to_string(),
        });
    }
    Ok(())
}

fn required<'a>(id: &'a str, database: &'static str) -> Result<&'a str, ConfigError> {
    if id.trim().is_empty() {
        Err(ConfigError::MissingDatabaseId(database))
    } else {
        Ok(id)
    }
}
