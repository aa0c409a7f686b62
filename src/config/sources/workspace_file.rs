//! Configuration checked into a workspace: `config/config.toml`, then a profile overlay
//! `config/<profile>.toml` where the profile comes from `WRAPVIEW_ENV`.

use config::{File, FileFormat, FileSourceFile};
use std::path::{Path, PathBuf};

const PROFILE_VAR: &str = "WRAPVIEW_ENV";
const DEFAULT_PROFILE: &str = "development";

/// Active profile name
pub fn profile() -> String {
    std::env::var(PROFILE_VAR)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

/// Existing workspace files for `profile`, lowest precedence first
pub fn paths(workspace_root: &Path, profile: &str) -> Vec<PathBuf> {
    let dir = workspace_root.join("config");
    [dir.join("config.toml"), dir.join(format!("{}.toml", profile))]
        .into_iter()
        .filter(|path| path.is_file())
        .collect()
}

pub fn sources(workspace_root: &Path) -> Vec<File<FileSourceFile, FileFormat>> {
    paths(workspace_root, &profile())
        .into_iter()
        .map(|path| File::from(path).required(false))
        .collect()
}
