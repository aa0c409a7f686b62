//! Layer ordering: defaults sit beneath files, files beneath the environment.

pub mod merge_policy;
