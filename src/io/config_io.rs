use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::file_storage::atomic_write;
use crate::model::config::{AppConfig, UiConfig};

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Config file location, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".config"));
    config_dir.join("shoplist").join("config.toml")
}

/// Default directory for stored lists, respecting XDG_DATA_HOME
pub fn default_data_dir() -> PathBuf {
    let data_dir = std::env::var_os("XDG_DATA_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".local").join("share"));
    data_dir.join("shoplist")
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"))
}

/// Read the config at `path`. A missing file yields the defaults.
pub fn read_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Effective settings: config file values with command-line overrides applied.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: PathBuf,
    pub namespace: String,
    pub data_dir: PathBuf,
    pub ui: UiConfig,
}

/// Read the config at `config_path` and apply overrides on top.
pub fn resolve_settings(
    config_path: PathBuf,
    namespace: Option<String>,
    data_dir: Option<PathBuf>,
) -> Result<Settings, ConfigError> {
    let config = read_config_from(&config_path)?;
    Ok(Settings {
        namespace: namespace.unwrap_or(config.storage.namespace),
        data_dir: data_dir
            .or(config.storage.data_dir)
            .unwrap_or_else(default_data_dir),
        ui: config.ui,
        config_path,
    })
}

/// Read the config document for format-preserving edits.
/// A missing file yields an empty document.
pub fn read_config_doc(path: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    text.parse().map_err(|e: toml_edit::TomlError| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write the config document back to disk, creating parent directories.
pub fn write_config_doc(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    atomic_write(path, doc.to_string().as_bytes()).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Set `storage.namespace` in the config document
pub fn set_namespace(doc: &mut toml_edit::DocumentMut, namespace: &str) {
    if !doc.contains_key("storage") {
        doc["storage"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["storage"]["namespace"] = toml_edit::value(namespace);
}
