use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default storage namespace, so lists written by earlier versions are found.
pub const DEFAULT_NAMESPACE: &str = "myShoppingListApp";

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Prefix of the storage key (`<namespace>-shoppingList`)
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Directory holding the stored records. Absent = XDG data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            namespace: default_namespace(),
            data_dir: None,
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show the key hint line under the list
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Theme overrides: slot name -> "#RRGGBB"
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}
