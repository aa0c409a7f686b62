//! Per-user configuration file in the platform config directory
//! (`$XDG_CONFIG_HOME/wrapview/config.toml` on Linux).

use config::{File, FileFormat, FileSourceFile};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "wrapview").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// The per-user file as a source, when one exists
pub fn source() -> Option<File<FileSourceFile, FileFormat>> {
    let path = global_config_path()?;
    if !path.is_file() {
        debug!(config_path = %path.display(), "No per-user configuration");
        return None;
    }
    debug!(config_path = %path.display(), "Using per-user configuration");
    Some(File::from(path).required(false))
}
