//! Async orchestration for the deterministic battle engine.
//!
//! This crate wires together the move provider abstraction, catalog oracles,
//! the resource repository, the move-exchange channel, and the battle worker
//! into a cohesive runtime API. Consumers embed [`Runtime`] to drive a battle,
//! subscribe to events, and escape through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`providers`] holds the CPU heuristic
//! - [`sync`] publishes and applies moves shared between clients
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod api;
pub mod events;
pub mod oracle;
pub mod providers;
pub mod repository;
pub mod runtime;
pub mod sync;

mod workers;

pub use api::{
    CutsceneDirector, MoveProvider, ProgressionSink, ProviderKind, RecordingProgression, Result,
    RuntimeError, RuntimeHandle, ScriptedMoveProvider, SkipCutscene,
};
pub use events::{Event, EventBus, LogEvent, OutcomeEvent, PhaseEvent, Topic};
pub use oracle::{
    MoveCatalog, MoveMagnitude, OracleManager, OverrideCache, OverrideError, OverrideSource,
    StaticOverrideSource,
};
pub use providers::CpuMoveProvider;
pub use repository::{
    InMemoryResourceRepository, RepositoryError, ResourceRepository, StoredResources,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use sync::{
    ExchangeError, FileMoveExchange, InMemoryMoveExchange, MoveExchange, MoveFeed, MovePayload,
    MoveSynchronizer, PollingMoveFeed, PublishedMoveRecord, RecordId, RoundId,
};
pub use workers::StepReport;
