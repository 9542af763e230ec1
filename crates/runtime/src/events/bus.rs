//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{LogEvent, OutcomeEvent, PhaseEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Battle log lines for rendering
    Log,
    /// Phase changes
    Phase,
    /// Terminal outcomes
    Outcome,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Log(LogEvent),
    Phase(PhaseEvent),
    Outcome(OutcomeEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Log(_) => Topic::Log,
            Event::Phase(_) => Topic::Phase,
            Event::Outcome(_) => Topic::Outcome,
        }
    }
}

struct Channels {
    log: broadcast::Sender<Event>,
    phase: broadcast::Sender<Event>,
    outcome: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Log => &self.log,
            Topic::Phase => &self.phase,
            Topic::Outcome => &self.outcome,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is best-effort: events sent while a
/// topic has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                log: broadcast::channel(capacity).0,
                phase: broadcast::channel(capacity).0,
                outcome: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "runtime::events", "No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::Phase;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut log_rx = bus.subscribe(Topic::Log);
        let mut phase_rx = bus.subscribe(Topic::Phase);

        bus.publish(Event::Phase(PhaseEvent {
            from: Phase::Selection,
            to: Phase::Execution,
            turn: 1,
            acting: None,
        }));
        bus.publish(Event::Log(LogEvent {
            turn: 1,
            line: "Hero uses Strike on Wolf!".into(),
        }));

        assert!(matches!(log_rx.recv().await.unwrap(), Event::Log(_)));
        assert!(matches!(phase_rx.recv().await.unwrap(), Event::Phase(_)));
        assert!(phase_rx.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(Event::Log(LogEvent {
            turn: 1,
            line: "nobody listens".into(),
        }));
    }
}
