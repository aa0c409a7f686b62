//! File sources, lowest precedence first: per-user, then workspace.

pub mod global_file;
pub mod workspace_file;
