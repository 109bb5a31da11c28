use crate::error::{CardifyError, Result};
use crate::model::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

pub const CONFIG_KEYS: &[&str] = &[
    "default-width",
    "default-height",
    "relative",
    "history-limit",
    "import-extensions",
];

/// Configuration for cardify, stored in .cardify/config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardifyConfig {
    /// Surface width in pixels for new templates
    #[serde(default = "default_width")]
    pub default_width: f64,

    #[serde(default = "default_height")]
    pub default_height: f64,

    /// Whether new templates use percent-of-surface geometry
    #[serde(default)]
    pub relative: bool,

    /// Maximum undo steps kept per editing session (unbounded when unset)
    #[serde(default)]
    pub history_limit: Option<usize>,

    /// Extensions to look for when importing directories
    #[serde(default = "default_import_ext")]
    pub import_extensions: Vec<String>,
}

fn default_width() -> f64 {
    DEFAULT_WIDTH
}

fn default_height() -> f64 {
    DEFAULT_HEIGHT
}

fn default_import_ext() -> Vec<String> {
    vec![".json".to_string()]
}

impl Default for CardifyConfig {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
            relative: false,
            history_limit: None,
            import_extensions: default_import_ext(),
        }
    }
}

impl CardifyConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(CardifyError::Io)?;
        let config: CardifyConfig =
            serde_json::from_str(&content).map_err(CardifyError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(CardifyError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(CardifyError::Serialization)?;
        fs::write(config_path, content).map_err(CardifyError::Io)?;
        Ok(())
    }

    /// Display value for a key, `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default-width" => Some(self.default_width.to_string()),
            "default-height" => Some(self.default_height.to_string()),
            "relative" => Some(self.relative.to_string()),
            "history-limit" => Some(
                self.history_limit
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "unlimited".to_string()),
            ),
            "import-extensions" => Some(self.import_extensions.join(",")),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "default-width" => self.default_width = parse_dimension(key, value)?,
            "default-height" => self.default_height = parse_dimension(key, value)?,
            "relative" => {
                self.relative = value
                    .parse()
                    .map_err(|_| format!("{} must be true or false, got '{}'", key, value))?
            }
            "history-limit" => {
                self.history_limit = match value {
                    "unlimited" | "none" => None,
                    v => Some(v.parse().map_err(|_| {
                        format!("{} must be a whole number or 'unlimited', got '{}'", key, v)
                    })?),
                }
            }
            "import-extensions" => {
                self.import_extensions = value
                    .split(',')
                    .map(str::trim)
                    .filter(|ext| !ext.is_empty())
                    .map(normalize_ext)
                    .collect()
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

fn parse_dimension(key: &str, value: &str) -> std::result::Result<f64, String> {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err(format!("{} must be a positive number, got '{}'", key, value)),
    }
}

fn normalize_ext(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}
