use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClasificaError, Result};
use crate::output::OutputFormat;
use crate::pipeline::{BlockOrder, RunConfig};

pub const DEFAULT_RULES_FILE: &str = "relacion_clave_categoria.xlsx";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    /// Relative paths are taken from `input_dir`.
    #[serde(default = "default_rules_path")]
    pub rules_path: String,
    /// Empty means "same as `input_dir`".
    #[serde(default)]
    pub output_dir: String,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    pub ordered: bool,
}

fn default_input_dir() -> String {
    ".".to_string()
}

fn default_rules_path() -> String {
    DEFAULT_RULES_FILE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            rules_path: default_rules_path(),
            output_dir: String::new(),
            output_format: OutputFormat::default(),
            ordered: false,
        }
    }
}

/// Values given on the command line; `None` keeps the stored setting.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub input_dir: Option<String>,
    pub rules_path: Option<String>,
    pub output_dir: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub ordered: bool,
}

impl Settings {
    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(dir) = &overrides.input_dir {
            self.input_dir = shellexpand_path(dir);
        }
        // Kept relative so it resolves against `input_dir`, not the cwd.
        if let Some(path) = &overrides.rules_path {
            self.rules_path = expand_home(path);
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir = shellexpand_path(dir);
        }
        if let Some(format) = overrides.output_format {
            self.output_format = format;
        }
        self.ordered |= overrides.ordered;
        self
    }

    pub fn input_dir(&self) -> PathBuf {
        PathBuf::from(&self.input_dir)
    }

    pub fn rules_path(&self) -> PathBuf {
        let path = Path::new(&self.rules_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.input_dir().join(path)
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        if self.output_dir.is_empty() {
            self.input_dir()
        } else {
            PathBuf::from(&self.output_dir)
        }
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            input_dir: self.input_dir(),
            rules_path: self.rules_path(),
            output_dir: self.output_dir(),
            order: if self.ordered {
                BlockOrder::Discovery
            } else {
                BlockOrder::Completion
            },
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("clasifica")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ClasificaError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path(), settings)
}

/// Expand a leading `~` and nothing else.
pub fn expand_home(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        return expand_home(path);
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
