//! Default file locations
//!
//! - Linux: `~/.config/ergoquest` and `~/.local/share/ergoquest`
//! - macOS: `~/Library/Application Support/ergoquest` for both
//! - Windows: `%APPDATA%\ergoquest` for both

use std::io;
use std::path::PathBuf;

const APP_DIR: &str = "ergoquest";

fn app_dir(base: Option<PathBuf>, kind: &str) -> io::Result<PathBuf> {
    base.map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} directory not found", kind)))
}

/// Directory holding `config.toml`
pub fn config_dir() -> io::Result<PathBuf> {
    app_dir(dirs::config_dir(), "Config")
}

/// Directory holding `progress.json`
pub fn data_dir() -> io::Result<PathBuf> {
    app_dir(dirs::data_dir(), "Data")
}

pub fn default_config_file() -> io::Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn default_progress_file() -> io::Result<PathBuf> {
    Ok(data_dir()?.join("progress.json"))
}
