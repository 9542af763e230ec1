//! Worker tasks that back the runtime orchestration.
//!
//! The battle worker owns the authoritative [`battle_core::BattleState`] and
//! is the only place the engine runs.

mod battle;

pub use battle::{BattleWorker, Command, StepReport};
