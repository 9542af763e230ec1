//! Runtime wrappers around battle content oracles.
//!
//! [`OracleManager`] bundles the move catalog, arena modifiers, and battle
//! configuration so the runtime can build [`battle_core::BattleEnv`]
//! snapshots on demand. Catalog data is read-only to the engine; admin
//! overrides flow in through the [`OverrideCache`].
mod cache;
mod catalog;

use std::sync::Arc;

use battle_content::{ContentFactory, LoadResult};
use battle_core::{ArenaOracle, BattleConfig, BattleEnv, NeutralArena};

pub use cache::{OverrideCache, OverrideError, OverrideSource, StaticOverrideSource};
pub use catalog::{MoveCatalog, MoveMagnitude};

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) catalog: Arc<MoveCatalog>,
    pub(crate) arena: Arc<dyn ArenaOracle>,
    pub(crate) config: BattleConfig,
}

impl OracleManager {
    pub fn new(catalog: Arc<MoveCatalog>, config: BattleConfig) -> Self {
        Self {
            catalog,
            arena: Arc::new(NeutralArena),
            config,
        }
    }

    /// Loads the move catalog and battle configuration from content files.
    ///
    /// Missing files fall back to the embedded defaults.
    pub fn from_content(factory: &ContentFactory) -> LoadResult<Self> {
        let config = factory.load_config()?;
        let moves = factory.load_moves()?;
        Ok(Self::new(Arc::new(MoveCatalog::new(moves)), config))
    }

    pub fn with_arena(mut self, arena: Arc<dyn ArenaOracle>) -> Self {
        self.arena = arena;
        self
    }

    /// Borrows the oracles as an engine environment.
    pub fn as_battle_env(&self) -> BattleEnv<'_> {
        BattleEnv::new(self.catalog.as_ref(), &self.config).with_arena(self.arena.as_ref())
    }

    pub fn catalog(&self) -> &Arc<MoveCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }
}
