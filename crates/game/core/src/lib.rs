//! Deterministic battle rules shared across clients.
//!
//! `battle-core` defines the canonical battle data model and the pure pieces
//! that act on it: the roll calculator, the status effect engine, move
//! resolution, the turn order scheduler, and the battle state machine. All
//! state mutation flows through [`engine::BattleEngine`]; runtime crates feed
//! it events and perform the side effects around each step.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod roll;
pub mod state;
pub mod status;

pub use combat::{DamageReport, EffectGrant, Mitigation, MoveReport, resolve_move};
pub use config::BattleConfig;
pub use engine::{
    BattleEngine, BattleEvent, EngineError, OrderEntry, ResolvedMove, StepOutcome, compute_order,
    step_rng,
};
pub use env::{
    ArenaOracle, BattleEnv, BattleRng, FlatHealArena, MoveOracle, NeutralArena, PcgRng,
    SequenceRng, StaticMoveOracle, compute_seed,
};
pub use error::{BattleError, ErrorSeverity};
pub use roll::{MultiplierTable, Roll, RollKind, RollRange, RollTables, StepBoost};
pub use state::{
    ActiveStatusEffect, BattleLog, BattleMode, BattleOutcome, BattleResult, BattleSetup,
    BattleState, Controller, CpuArchetype, Guard, Magnitude, MasteryTier, MoveDefinition,
    MoveSelection, MoveType, Participant, ParticipantId, ParticipantSnapshot, Phase,
    ResourceDelta, ResourceMeter, RewardDeltas, Role, RoundState, ScheduledTurn, ScriptedDefeat,
    SetupError, Side, StateDelta, StatusEffectKind, StatusEffectTemplate, StatusEffects,
};
pub use status::{Application, TickOutcome, apply_effect, tick_turn_start};
