//! Heuristic move selection for CPU participants.
//!
//! 1. **Situation**: collect the actor, its archetype, and live targets
//! 2. **Scoring**: score every (move, target) pair with a [`Score`]
//! 3. **Selection**: take the best pair, or the first move with a valid
//!    target when nothing scores
//!
//! Finishing blows outrank everything else through the score modifier.

pub mod heuristic;
pub mod provider;
pub mod scoring;
pub mod situation;

pub use heuristic::select;
pub use provider::CpuMoveProvider;
pub use scoring::{ArchetypeWeights, Score};
pub use situation::Situation;
