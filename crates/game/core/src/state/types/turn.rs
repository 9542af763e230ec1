use std::collections::BTreeMap;
use std::fmt;

use super::common::ParticipantId;

/// High-level phase of the battle state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Waiting for move selections.
    #[default]
    Selection,
    /// Resolving the acting participant's move (or the next scheduled entry).
    Execution,
    /// Two-participant mode: waiting for the opponent's action.
    OpponentTurn,
    /// Halted by a scripted instant-defeat condition; an external cutscene
    /// decides the result.
    Cutscene,
    Victory,
    Defeat,
    Escaped,
}

impl Phase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat | Self::Escaped)
    }

    /// Phases from which escape is allowed.
    pub const fn can_escape(self) -> bool {
        !self.is_terminal()
    }
}

/// Two-participant duels alternate actor and opponent; skirmishes with three
/// or more participants collect selections and resolve them in speed order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleMode {
    Duel,
    Skirmish,
}

/// A committed move and target for one participant in one round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveSelection {
    pub actor: ParticipantId,
    pub move_id: String,
    pub target: ParticipantId,
}

impl MoveSelection {
    pub fn new(actor: ParticipantId, move_id: impl Into<String>, target: ParticipantId) -> Self {
        Self {
            actor,
            move_id: move_id.into(),
            target,
        }
    }
}

/// One entry of a computed turn order.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledTurn {
    pub participant: ParticipantId,
    pub speed: u32,
    pub priority: i32,
    pub random: f64,
    pub score: f64,
}

/// Per-round bookkeeping for skirmish mode.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundState {
    /// At most one selection per participant.
    pub selections: BTreeMap<ParticipantId, MoveSelection>,
    /// Frozen execution order, empty until every selection is in.
    pub order: Vec<ScheduledTurn>,
    /// Index of the next entry in `order` to execute.
    pub cursor: usize,
}

impl RoundState {
    pub fn is_ordered(&self) -> bool {
        !self.order.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.is_ordered() && self.cursor >= self.order.len()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
        self.order.clear();
        self.cursor = 0;
    }
}

/// Append-only battle log. Rendering concern only; never read for logic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleLog {
    entries: Vec<String>,
}

impl BattleLog {
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, lines: I) {
        self.entries.extend(lines);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Lines appended since `offset`.
    pub fn since(&self, offset: usize) -> &[String] {
        self.entries.get(offset..).unwrap_or(&[])
    }
}

/// Terminal result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleResult {
    Victory,
    Defeat,
    Escape,
}

/// Reward settlement handed to the progression collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardDeltas {
    /// Participant credited with the settlement.
    pub recipient: ParticipantId,
    /// Steal pool plus the defeated side's remaining primary resource.
    pub resource: u32,
    /// Turns the battle lasted.
    pub turns: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOutcome {
    pub result: BattleResult,
    pub rewards: RewardDeltas,
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} resource to {} after {} turns)",
            self.result, self.rewards.resource, self.rewards.recipient, self.rewards.turns
        )
    }
}

/// Scripted condition that halts a skirmish when `target` drops to or below
/// `threshold_percent` of its primary resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptedDefeat {
    pub target: ParticipantId,
    pub threshold_percent: u32,
}
