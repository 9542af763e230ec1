//! Records exchanged between clients.

use std::collections::BTreeSet;
use std::fmt;

use battle_core::{MoveSelection, ParticipantId, ResolvedMove};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies one shared battle on the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundId(pub String);

impl RoundId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a participant committed.
///
/// Duels exchange the fully resolved action. Skirmish rounds exchange the
/// selection only: every client runs the shared order itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovePayload {
    Resolved(ResolvedMove),
    Selection { turn: u32, selection: MoveSelection },
}

impl MovePayload {
    pub fn turn(&self) -> u32 {
        match self {
            Self::Resolved(resolved) => resolved.turn,
            Self::Selection { turn, .. } => *turn,
        }
    }

    pub fn move_id(&self) -> &str {
        match self {
            Self::Resolved(resolved) => &resolved.move_id,
            Self::Selection { selection, .. } => &selection.move_id,
        }
    }
}

/// One committed human move on the exchange.
///
/// Append-only: after publishing, only `processed_by` grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedMoveRecord {
    pub id: RecordId,
    pub round: RoundId,
    pub actor: ParticipantId,
    pub payload: MovePayload,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub processed_by: BTreeSet<ParticipantId>,
}

impl PublishedMoveRecord {
    pub fn new(round: RoundId, actor: ParticipantId, payload: MovePayload) -> Self {
        let published_at = Utc::now();
        let id = RecordId(format!(
            "{}-{}-{}-{:08x}",
            round,
            actor.0,
            payload.turn(),
            rand::random::<u32>()
        ));
        Self {
            id,
            round,
            actor,
            payload,
            published_at,
            processed_by: BTreeSet::new(),
        }
    }

    pub fn resolved(round: RoundId, resolved: ResolvedMove) -> Self {
        Self::new(round, resolved.actor, MovePayload::Resolved(resolved))
    }

    pub fn selection(round: RoundId, turn: u32, selection: MoveSelection) -> Self {
        Self::new(
            round,
            selection.actor,
            MovePayload::Selection { turn, selection },
        )
    }

    pub fn is_processed_by(&self, observer: ParticipantId) -> bool {
        self.processed_by.contains(&observer)
    }

    /// Adds `observer` to the processed set. Returns false if it was already
    /// there.
    pub fn mark_processed(&mut self, observer: ParticipantId) -> bool {
        self.processed_by.insert(observer)
    }
}

/// Orders records by publish time, then id, ignoring channel order.
pub fn sort_by_publish_time(records: &mut [PublishedMoveRecord]) {
    records.sort_by(|a, b| {
        a.published_at
            .cmp(&b.published_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
