//! Read-only collaborators consumed by the engine.
//!
//! The move catalog and arena modifiers are exposed as oracle traits and
//! bundled into a [`BattleEnv`] so the reducer can reach everything it needs
//! without depending on concrete implementations. Randomness is not part of
//! the environment; every call that draws takes an explicit [`BattleRng`].
mod arena;
mod moves;
mod rng;

pub use arena::{ArenaOracle, FlatHealArena, NeutralArena};
pub use moves::{MoveOracle, StaticMoveOracle};
pub use rng::{BattleRng, PcgRng, SequenceRng, compute_seed};

use crate::config::BattleConfig;
use crate::state::{MoveDefinition, Participant};

static NEUTRAL_ARENA: NeutralArena = NeutralArena;

/// Aggregates the oracles required by the reducer.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    moves: &'a dyn MoveOracle,
    arena: &'a dyn ArenaOracle,
    config: &'a BattleConfig,
}

impl<'a> BattleEnv<'a> {
    pub fn new(moves: &'a dyn MoveOracle, config: &'a BattleConfig) -> Self {
        Self {
            moves,
            arena: &NEUTRAL_ARENA,
            config,
        }
    }

    pub fn with_arena(mut self, arena: &'a dyn ArenaOracle) -> Self {
        self.arena = arena;
        self
    }

    pub fn moves(&self) -> &'a dyn MoveOracle {
        self.moves
    }

    pub fn config(&self) -> &'a BattleConfig {
        self.config
    }

    pub fn move_definition(&self, id: &str) -> Option<MoveDefinition> {
        self.moves.definition(id)
    }

    pub fn periodic_heal(&self, owner: &Participant) -> u32 {
        self.arena.periodic_heal(owner)
    }
}

impl std::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
