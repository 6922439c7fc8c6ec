use crate::error::{Result, WikiError};
use crate::store::fs::DEFAULT_FILE_SUFFIX;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "flatwiki.json";
const DEFAULT_STORAGE_DIR: &str = "data/pages";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_WORKERS: usize = 4;

/// Server configuration, read from a JSON file. Every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WikiConfig {
    /// Directory holding one record per page
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Directory with an `html/` folder of template overrides
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Request handler threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Suffix of page record files (e.g. ".wiki")
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STORAGE_DIR)
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_file_suffix() -> String {
    DEFAULT_FILE_SUFFIX.to_string()
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            assets_dir: None,
            listen_addr: default_listen_addr(),
            workers: default_workers(),
            file_suffix: default_file_suffix(),
        }
    }
}

impl WikiConfig {
    /// Load config from `path`, or return defaults if the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let mut config: WikiConfig = serde_json::from_str(&content).map_err(WikiError::Config)?;
        let suffix = config.file_suffix.clone();
        config.set_file_suffix(&suffix);
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(self).map_err(WikiError::Config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Set the record suffix (normalizes to start with a dot)
    pub fn set_file_suffix(&mut self, suffix: &str) {
        if suffix.starts_with('.') {
            self.file_suffix = suffix.to_string();
        } else {
            self.file_suffix = format!(".{}", suffix);
        }
    }

    /// Make sure the storage directory exists. Fails if the path is taken by
    /// something that is not a directory.
    pub fn prepare_storage(&self) -> Result<()> {
        match fs::metadata(&self.storage_dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(WikiError::StorageIo(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is not a directory", self.storage_dir.display()),
            ))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.storage_dir)?;
                Ok(())
            }
            Err(err) => Err(WikiError::StorageIo(err)),
        }
    }
}
