//! CPU roster loader.
//!
//! Roster entries describe CPU combatants. The behavior archetype is part of
//! the entry and is fixed when the participant is built.

use std::path::Path;

use battle_core::{Controller, CpuArchetype, Participant, ParticipantId, Role};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const EMBEDDED_ROSTER: &str = include_str!("../../data/roster.ron");

/// Roster structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSpec {
    pub entries: Vec<RosterEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub speed: u32,
    pub health: u32,
    #[serde(default)]
    pub shield: u32,
    #[serde(default)]
    pub archetype: CpuArchetype,
    pub moves: Vec<String>,
}

fn default_level() -> u32 {
    1
}

impl RosterEntry {
    /// Builds a CPU-controlled participant at full resources.
    pub fn into_participant(&self, id: ParticipantId, role: Role) -> Participant {
        Participant::new(id, self.name.clone(), role, Controller::Cpu(self.archetype))
            .with_level(self.level)
            .with_speed(self.speed)
            .with_health(self.health, self.health)
            .with_shield(self.shield, self.shield)
            .with_moves(self.moves.iter().cloned())
    }
}

/// Loader for CPU rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<RosterEntry>> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<RosterEntry>> {
        let roster: RosterSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        if let Some(empty) = roster.entries.iter().find(|e| e.moves.is_empty()) {
            anyhow::bail!("Roster entry {} has no moves", empty.id);
        }
        Ok(roster.entries)
    }

    pub fn load_embedded() -> LoadResult<Vec<RosterEntry>> {
        Self::parse(EMBEDDED_ROSTER)
    }
}
