//! Move provider implementations for the different participant controllers.

pub mod ai;

pub use ai::CpuMoveProvider;
