//! Data-driven battle content and loaders.
//!
//! This crate houses the default move catalog, CPU roster, and battle
//! configuration, and provides loaders for RON/TOML data files:
//! - Move catalog (RON), with legacy single-effect entries normalized
//! - CPU roster with behavior archetypes (RON)
//! - Battle configuration overrides (TOML)
//!
//! Content is consumed by runtime oracles and never appears in battle state.

#[cfg(feature = "loaders")]
pub mod loaders;

/// Default battle configuration overrides.
pub const EMBEDDED_CONFIG: &str = include_str!("../data/battle.toml");

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ConfigSpec, ContentFactory, LoadResult, MoveCatalogSpec, MoveLoader, MoveSpec,
    RosterEntry, RosterLoader,
};
