//! Configuration file handling.
//!
//! Settings live in `config.json` under the platform config directory
//! (`~/.config/pinoytax/config.json` on Linux). A missing file means defaults.
//! Command-line flags and `PINOYTAX_*` environment variables override it.

use crate::core::Reminders;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "pinoytax";
const CONFIG_JSON: &str = "config.json";
const CONFIG_VERSION: u8 = 1;

/// The on-disk configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFile {
    pub config_version: u8,
    /// Where the `taxAppResult` session snapshot is kept
    pub data_dir: Option<PathBuf>,
    /// Where exported files are written
    pub output_dir: Option<PathBuf>,
    /// Directory holding `compliance.html` / `invoice.html` layouts
    pub templates_dir: Option<PathBuf>,
    /// HTML-to-PDF converter command line; input and output paths are appended
    pub pdf_command: Vec<String>,
    pub default_reminders: Reminders,
}

impl Default for ConfigFile {
    fn default() -> Self {
        ConfigFile {
            config_version: CONFIG_VERSION,
            data_dir: None,
            output_dir: None,
            templates_dir: None,
            pdf_command: vec!["wkhtmltopdf".to_string(), "--quiet".to_string()],
            default_reminders: Reminders::default(),
        }
    }
}

impl ConfigFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read config file {}", path.display()))?;
        let config: ConfigFile = serde_json::from_str(&json)
            .with_context(|| format!("Config file {} is not valid", path.display()))?;
        if config.config_version != CONFIG_VERSION {
            bail!(
                "Unsupported config version {} in {} (expected {})",
                config.config_version,
                path.display(),
                CONFIG_VERSION
            );
        }
        Ok(config)
    }
}

/// Resolved settings used by the commands.
#[derive(Debug, Clone)]
pub struct Config {
    data_dir: PathBuf,
    output_dir: PathBuf,
    templates_dir: Option<PathBuf>,
    pdf_command: Vec<String>,
    default_reminders: Reminders,
}

impl Config {
    /// Load `path` if given, else the default config location if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(p) => ConfigFile::load(p)?,
            None => match default_config_path() {
                Some(p) if p.is_file() => ConfigFile::load(&p)?,
                _ => ConfigFile::default(),
            },
        };
        Ok(Config::from_file(file))
    }

    pub fn from_file(file: ConfigFile) -> Self {
        let data_dir = file
            .data_dir
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR));
        let output_dir = file.output_dir.unwrap_or_else(|| PathBuf::from("."));
        Config {
            data_dir,
            output_dir,
            templates_dir: file.templates_dir,
            pdf_command: file.pdf_command,
            default_reminders: file.default_reminders,
        }
    }

    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.data_dir = dir;
        }
        self
    }

    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.output_dir = dir;
        }
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn templates_dir(&self) -> Option<&Path> {
        self.templates_dir.as_deref()
    }

    pub fn pdf_command(&self) -> &[String] {
        &self.pdf_command
    }

    pub fn default_reminders(&self) -> Reminders {
        self.default_reminders
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_JSON))
}
