//! Plain data types that make up the battle state.
mod common;
mod moves;
mod participant;
mod status;
mod turn;

pub use common::{ParticipantId, ResourceMeter};
pub use moves::{Guard, Magnitude, MasteryTier, MoveDefinition, MoveType};
pub use participant::{
    Controller, CpuArchetype, Participant, ParticipantSnapshot, Role, Side,
};
pub use status::{ActiveStatusEffect, StatusEffectKind, StatusEffectTemplate, StatusEffects};
pub use turn::{
    BattleLog, BattleMode, BattleOutcome, BattleResult, MoveSelection, Phase, RewardDeltas,
    RoundState, ScheduledTurn, ScriptedDefeat,
};
