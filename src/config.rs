//! User configuration (`config.toml` in the platform config dir).
//!
//! ```toml
//! width = 9
//! height = 17
//! ```
//!
//! Problems reading the file are reported as warnings and the defaults are
//! used instead.

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

pub const DEFAULT_WIDTH: usize = 9;
pub const DEFAULT_HEIGHT: usize = 17;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    width: Option<usize>,
    height: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Columns of a new sheet.
    pub width: usize,
    /// Rows of a new sheet.
    pub height: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Load the config from `config_file`, or the user config path when None.
/// Returns the config and any warnings.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    match read_config(&path) {
        Ok(file) => {
            let mut config = Config::default();
            if let Some(width) = file.width {
                config.width = width;
            }
            if let Some(height) = file.height {
                config.height = height;
            }
            if config.width == 0 || config.height == 0 {
                warnings.push(format!(
                    "Ignoring {}: width and height must be positive",
                    path.display()
                ));
                config = Config::default();
            }
            (config, warnings)
        }
        Err(err) => {
            log::warn!("{}", err);
            warnings.push(err);
            (Config::default(), warnings)
        }
    }
}

fn read_config(path: &Path) -> Result<ConfigFile, String> {
    let meta = std::fs::metadata(path)
        .map_err(|err| format!("Failed to read metadata for {}: {}", path.display(), err))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(format!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        ));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {}", path.display(), err))?;
    toml::from_str::<ConfigFile>(&content)
        .map_err(|err| format!("Failed to parse {}: {}", path.display(), err))
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "sheetcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
