use serde::Deserialize;
use std::fs;
use std::path::Path;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub code: CodeConfig,
    pub tables: TableConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    /// Language shown for fences without a tag
    pub default_language: String,
    pub copy_button: bool,
    pub copy_label: String,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            default_language: "plaintext".to_string(),
            copy_button: true,
            copy_label: "Copy".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub enabled: bool,
    pub class: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            class: "ai-table".to_string(),
        }
    }
}

impl Config {
    /// The defaults shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        Self::from_toml_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Parse a TOML document. Keys it omits keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "invalid config, using defaults"
                );
                Self::compiled_default()
            }),
            Err(_) => Self::compiled_default(),
        }
    }
}
