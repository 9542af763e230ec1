//! Topic-based event bus for runtime events.
//!
//! The battle worker publishes log lines, phase changes, and outcomes to
//! separate topics so a renderer can subscribe only to what it draws.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{LogEvent, OutcomeEvent, PhaseEvent};
