//! Content loaders for reading battle data from files.
//!
//! Loaders turn RON/TOML files into core types. Each loader accepts either a
//! path or an in-memory string so embedded defaults and override files share
//! one parsing path.

pub mod config;
pub mod factory;
pub mod moves;
pub mod roster;

pub use config::{ConfigLoader, ConfigSpec};
pub use factory::ContentFactory;
pub use moves::{MoveCatalogSpec, MoveLoader, MoveSpec};
pub use roster::{RosterEntry, RosterLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
