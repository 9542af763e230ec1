use crate::combat::EffectGrant;
use crate::state::{
    BattleOutcome, MoveSelection, ParticipantId, ParticipantSnapshot, Phase, ResourceDelta,
    StateDelta,
};

/// Inputs accepted by [`super::BattleEngine::execute`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    /// Commit a move. Duel mode accepts only the local participant; skirmish
    /// mode accepts one selection per living participant.
    Select(MoveSelection),
    /// Resolve the pending selection (duel) or the next scheduled entry
    /// (skirmish).
    Execute,
    /// Duel mode: the opponent's move, resolved locally.
    OpponentAct(MoveSelection),
    /// Duel mode: the opponent's move as resolved on the peer's client.
    ApplyRemote(ResolvedMove),
    /// Leave the battle. Accepted from any non-terminal phase.
    Escape,
    /// Ends a scripted cutscene halt.
    ResolveCutscene { victory: bool },
}

impl BattleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Execute => "execute",
            Self::OpponentAct(_) => "opponent_act",
            Self::ApplyRemote(_) => "apply_remote",
            Self::Escape => "escape",
            Self::ResolveCutscene { .. } => "resolve_cutscene",
        }
    }
}

/// One participant's action as observed by every client.
///
/// Covers the actor's turn-start tick as well as its move, so applying the
/// deltas on a peer reproduces the whole action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedMove {
    pub actor: ParticipantId,
    pub target: ParticipantId,
    pub move_id: String,
    pub move_name: String,
    /// Round the action belongs to.
    pub turn: u32,
    /// Lost to `stun` or `freeze`, or the actor fell during its tick.
    pub skipped: bool,
    /// Move resolved as a no-op.
    pub fizzled: bool,
    pub is_max_roll: bool,
    /// Added to the steal pool.
    pub stolen: u32,
    /// Resource changes per participant across the whole action.
    pub deltas: Vec<ResourceDelta>,
    pub effects: Vec<EffectGrant>,
    /// Actor and target after the action.
    pub snapshot: Vec<ParticipantSnapshot>,
    pub log: Vec<String>,
}

impl ResolvedMove {
    pub fn snapshot_of(&self, id: ParticipantId) -> Option<&ParticipantSnapshot> {
        self.snapshot.iter().find(|snapshot| snapshot.id == id)
    }

    pub fn delta_of(&self, id: ParticipantId) -> Option<&ResourceDelta> {
        self.deltas.iter().find(|delta| delta.participant == id)
    }
}

/// Result of one accepted event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub delta: StateDelta,
    /// Log lines appended by this step.
    pub log: Vec<String>,
    /// Actions resolved locally during this step.
    pub resolved: Vec<ResolvedMove>,
    /// Set when this step ended the battle.
    pub outcome: Option<BattleOutcome>,
    /// Set when this step halted on a scripted defeat.
    pub cutscene: Option<ParticipantId>,
}

impl StepOutcome {
    pub fn phase_change(&self) -> Option<(Phase, Phase)> {
        self.delta.phase
    }
}
