//! Content factory for loading battle content from a data directory.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, MoveDefinition, MoveOracle, StaticMoveOracle};

use crate::loaders::{ConfigLoader, LoadResult, MoveLoader, RosterEntry, RosterLoader};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── moves.ron
/// └── roster.ron
/// ```
///
/// Missing files fall back to the embedded defaults; files that exist but
/// fail to parse are errors.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `battle.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("battle.toml");
        if path.exists() {
            ConfigLoader::load(&path)
        } else {
            ConfigLoader::parse(crate::EMBEDDED_CONFIG)
        }
    }

    /// Load the move catalog from `moves.ron`.
    pub fn load_moves(&self) -> LoadResult<Vec<MoveDefinition>> {
        let path = self.data_dir.join("moves.ron");
        if path.exists() {
            MoveLoader::load(&path)
        } else {
            MoveLoader::load_embedded()
        }
    }

    /// Load the CPU roster from `roster.ron`.
    pub fn load_roster(&self) -> LoadResult<Vec<RosterEntry>> {
        let path = self.data_dir.join("roster.ron");
        if path.exists() {
            RosterLoader::load(&path)
        } else {
            RosterLoader::load_embedded()
        }
    }

    /// Builds a move oracle from the catalog, checking that every roster
    /// move exists.
    pub fn build_move_oracle(&self) -> LoadResult<StaticMoveOracle> {
        let oracle: StaticMoveOracle = self.load_moves()?.into_iter().collect();
        for entry in self.load_roster()? {
            for id in &entry.moves {
                if oracle.definition(id).is_none() {
                    anyhow::bail!("Roster entry {} references unknown move {}", entry.id, id);
                }
            }
        }
        Ok(oracle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
