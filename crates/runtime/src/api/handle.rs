//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! feeding battle events or streaming events from specific topics. Any task
//! holding a handle may escape, including while the runtime waits on a peer.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use battle_core::{BattleEvent, BattleState, Phase};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, StepReport};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    phase_rx: watch::Receiver<Phase>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        phase_rx: watch::Receiver<Phase>,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            phase_rx,
        }
    }

    /// Run one event through the battle engine.
    pub async fn apply(&self, event: BattleEvent) -> Result<StepReport> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Apply {
                event,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Leave the battle. Accepted from any non-terminal phase.
    pub async fn escape(&self) -> Result<StepReport> {
        self.apply(BattleEvent::Escape).await
    }

    /// Query the current battle state (read-only snapshot)
    pub async fn query_state(&self) -> Result<BattleState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Log` - Battle log lines in append order
    /// - `Topic::Phase` - State machine transitions
    /// - `Topic::Outcome` - Terminal settlement
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use battle_runtime::Topic;
    ///
    /// let mut log_rx = handle.subscribe(Topic::Log);
    /// while let Ok(event) = log_rx.recv().await {
    ///     // Render the line
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Watch channel tracking the current phase.
    pub fn phase_watch(&self) -> watch::Receiver<Phase> {
        self.phase_rx.clone()
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
