//! Move catalog loader.
//!
//! Catalog files may describe a move's effects with the legacy single
//! `status_effect` field, the `status_effects` list, or both. Loading folds
//! them into one ordered list with the legacy entry first, so nothing
//! downstream ever sees two shapes.

use std::path::Path;

use battle_core::{Guard, Magnitude, MasteryTier, MoveDefinition, MoveType, StatusEffectTemplate};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Embedded default catalog.
const EMBEDDED_MOVES: &str = include_str!("../../data/moves.ron");

/// Move catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveCatalogSpec {
    pub moves: Vec<MoveSpec>,
}

/// One catalog entry as written on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub kind: MoveType,
    #[serde(default)]
    pub damage: Option<Magnitude>,
    #[serde(default)]
    pub healing: Option<Magnitude>,
    #[serde(default)]
    pub shield_boost: Option<Magnitude>,
    #[serde(default)]
    pub resource_steal: u32,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default = "default_mastery")]
    pub mastery: u8,
    #[serde(default)]
    pub guard: Option<Guard>,
    /// Legacy single-effect shape.
    #[serde(default)]
    pub status_effect: Option<StatusEffectTemplate>,
    #[serde(default)]
    pub status_effects: Vec<StatusEffectTemplate>,
}

fn default_level() -> u32 {
    1
}

fn default_mastery() -> u8 {
    1
}

impl MoveSpec {
    /// Every effect the entry declares, legacy field first.
    pub fn effects(&self) -> Vec<StatusEffectTemplate> {
        self.status_effect
            .iter()
            .chain(self.status_effects.iter())
            .copied()
            .collect()
    }

    pub fn into_definition(self) -> MoveDefinition {
        let status_effects = self.effects();
        MoveDefinition {
            id: self.id,
            name: self.name,
            description: self.description,
            category: self.category,
            kind: self.kind,
            damage: self.damage,
            healing: self.healing,
            shield_boost: self.shield_boost,
            resource_steal: self.resource_steal,
            priority: self.priority,
            level: self.level.max(1),
            mastery: MasteryTier::new(self.mastery),
            guard: self.guard.map(|g| Guard::new(g.flat, g.percent)),
            status_effects,
        }
    }
}

/// Loader for move catalogs from RON files.
pub struct MoveLoader;

impl MoveLoader {
    /// Load a move catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<MoveDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse a move catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<MoveDefinition>> {
        let catalog: MoveCatalogSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse move catalog RON: {}", e))?;

        let mut seen = std::collections::HashSet::new();
        for spec in &catalog.moves {
            if !seen.insert(spec.id.as_str()) {
                anyhow::bail!("Duplicate move id in catalog: {}", spec.id);
            }
        }

        Ok(catalog
            .moves
            .into_iter()
            .map(MoveSpec::into_definition)
            .collect())
    }

    /// The catalog compiled into the crate.
    pub fn load_embedded() -> LoadResult<Vec<MoveDefinition>> {
        Self::parse(EMBEDDED_MOVES)
    }
}
