use crate::error::{Result, RolodexError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_ADDRESS_BOOK_FILE: &str = "addressbook.json";
const DEFAULT_NOTEBOOK_FILE: &str = "notebook.json";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration for rolodex, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RolodexConfig {
    /// File name (relative to the data directory) of the address book
    #[serde(default = "default_address_book_file")]
    pub address_book_file: String,

    /// File name (relative to the data directory) of the notebook
    #[serde(default = "default_notebook_file")]
    pub notebook_file: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_address_book_file() -> String {
    DEFAULT_ADDRESS_BOOK_FILE.to_string()
}

fn default_notebook_file() -> String {
    DEFAULT_NOTEBOOK_FILE.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for RolodexConfig {
    fn default() -> Self {
        Self {
            address_book_file: default_address_book_file(),
            notebook_file: default_notebook_file(),
            log_level: default_log_level(),
        }
    }
}

impl RolodexConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let config_path = data_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(RolodexError::Io)?;
        let config: RolodexConfig = serde_json::from_str(&content).map_err(|err| {
            RolodexError::Config(format!("{}: {}", config_path.display(), err))
        })?;
        config.validate().map_err(|reason| {
            RolodexError::Config(format!("{}: {}", config_path.display(), reason))
        })?;
        Ok(config)
    }

    /// Both collections need a file of their own.
    fn validate(&self) -> std::result::Result<(), String> {
        if same_file(&self.address_book_file, &self.notebook_file) {
            return Err(format!(
                "address_book_file and notebook_file both point to {}",
                self.notebook_file
            ));
        }
        Ok(())
    }

    pub fn address_book_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.address_book_file)
    }

    pub fn notebook_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.notebook_file)
    }

    pub fn log_dir(&self, data_dir: &Path) -> PathBuf {
        data_dir.join("logs")
    }
}

/// Compares two data-dir relative names, ignoring `.` components.
fn same_file(a: &str, b: &str) -> bool {
    let normal = |name: &str| -> PathBuf {
        Path::new(name)
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    };
    normal(a) == normal(b)
}
