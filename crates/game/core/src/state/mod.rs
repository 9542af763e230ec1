//! Authoritative battle state representation.
//!
//! This module owns the data structures that describe participants, round
//! bookkeeping, and the battle log. Runtime layers clone or query this state
//! but mutate it exclusively through the engine.
pub mod delta;
mod error;
pub mod types;

use std::collections::BTreeSet;

pub use delta::{ResourceDelta, StateDelta};
pub use error::SetupError;
pub use types::{
    ActiveStatusEffect, BattleLog, BattleMode, BattleOutcome, BattleResult, Controller,
    CpuArchetype, Guard, Magnitude, MasteryTier, MoveDefinition, MoveSelection, MoveType,
    Participant, ParticipantId, ParticipantSnapshot, Phase, ResourceMeter, RewardDeltas, Role,
    RoundState, ScheduledTurn, ScriptedDefeat, Side, StatusEffectKind, StatusEffectTemplate,
    StatusEffects,
};

/// Everything needed to start a battle, gathered from collaborators.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSetup {
    /// Seed shared by every client in the encounter.
    pub battle_seed: u64,
    /// Participant controlled from this client.
    pub local: ParticipantId,
    pub participants: Vec<Participant>,
    pub scripted_defeat: Option<ScriptedDefeat>,
}

impl BattleSetup {
    pub fn new(battle_seed: u64, local: ParticipantId, participants: Vec<Participant>) -> Self {
        Self {
            battle_seed,
            local,
            participants,
            scripted_defeat: None,
        }
    }

    pub fn with_scripted_defeat(mut self, scripted_defeat: ScriptedDefeat) -> Self {
        self.scripted_defeat = Some(scripted_defeat);
        self
    }
}

/// Canonical in-memory state of one battle on one client.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    /// RNG seed for deterministic random generation.
    ///
    /// Set once at battle setup and never modified. Each engine step is
    /// seeded from it together with the turn, phase, and order cursor, so
    /// clients sharing a battle draw the same values.
    pub battle_seed: u64,
    /// Engine step counter, incremented after every accepted event.
    pub nonce: u64,
    pub phase: Phase,
    pub mode: BattleMode,
    pub local: ParticipantId,
    pub participants: Vec<Participant>,
    pub log: BattleLog,
    /// Round counter, starting at 1.
    pub turn: u32,
    /// Resource stolen during the battle, settled only when it ends.
    pub steal_pool: u32,
    /// Duel mode: the local participant's pending selection.
    pub selection: Option<MoveSelection>,
    /// Skirmish mode: selections, frozen order, and cursor.
    pub round: RoundState,
    pub scripted_defeat: Option<ScriptedDefeat>,
    pub outcome: Option<BattleOutcome>,
}

impl BattleState {
    /// Validates setup data and builds the initial state.
    pub fn new(setup: BattleSetup) -> Result<Self, SetupError> {
        let BattleSetup {
            battle_seed,
            local,
            participants,
            scripted_defeat,
        } = setup;

        if participants.len() < 2 {
            return Err(SetupError::TooFewParticipants {
                count: participants.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for participant in &participants {
            if !seen.insert(participant.id) {
                return Err(SetupError::DuplicateParticipant { id: participant.id });
            }
        }

        if !participants
            .iter()
            .any(|p| p.id == local && p.role == Role::Player)
        {
            return Err(SetupError::MissingLocalPlayer { id: local });
        }

        if !participants.iter().any(|p| p.role == Role::Opponent) {
            return Err(SetupError::NoOpponent);
        }

        if let Some(script) = scripted_defeat
            && !seen.contains(&script.target)
        {
            return Err(SetupError::UnknownScriptTarget { id: script.target });
        }

        let live = participants.iter().filter(|p| p.is_alive()).count();
        let mode = if live >= 3 {
            BattleMode::Skirmish
        } else {
            BattleMode::Duel
        };

        let phase = if peer_moves_first(mode, local, &participants) {
            Phase::OpponentTurn
        } else {
            Phase::Selection
        };

        Ok(Self {
            battle_seed,
            nonce: 0,
            phase,
            mode,
            local,
            participants,
            log: BattleLog::default(),
            turn: 1,
            steal_pool: 0,
            selection: None,
            round: RoundState::default(),
            scripted_defeat,
            outcome: None,
        })
    }

    /// True in a peer duel where the peer holds the lower id. Such a round
    /// opens with the peer's move and closes after the local one.
    pub fn peer_leads(&self) -> bool {
        peer_moves_first(self.mode, self.local, &self.participants)
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    pub fn local_participant(&self) -> Option<&Participant> {
        self.participant(self.local)
    }

    /// Duel mode: the opponent facing the local participant.
    ///
    /// Prefers the first opponent still standing.
    pub fn duel_opponent(&self) -> Option<&Participant> {
        let mut opponents = self
            .participants
            .iter()
            .filter(|p| p.role == Role::Opponent);
        let first = opponents.clone().next();
        opponents.find(|p| p.is_alive()).or(first)
    }

    pub fn live_participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_alive())
    }

    /// Living participants on the other side from `id`.
    pub fn live_opponents_of(&self, id: ParticipantId) -> Vec<&Participant> {
        let Some(actor) = self.participant(id) else {
            return Vec::new();
        };
        self.live_participants()
            .filter(|p| p.is_opponent_of(actor))
            .collect()
    }

    /// True when every participant on `side` is defeated.
    pub fn side_defeated(&self, side: Side) -> bool {
        self.participants
            .iter()
            .filter(|p| p.side() == side)
            .all(Participant::is_defeated)
    }

    /// Remaining primary resource summed over a side.
    pub fn side_health(&self, side: Side) -> u32 {
        self.participants
            .iter()
            .filter(|p| p.side() == side)
            .map(|p| p.health.current)
            .sum()
    }

    /// Skirmish mode: living participants that have not selected this round.
    pub fn pending_selectors(&self) -> Vec<ParticipantId> {
        self.live_participants()
            .map(|p| p.id)
            .filter(|id| !self.round.selections.contains_key(id))
            .collect()
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Snapshots of every participant, in setup order.
    pub fn snapshots(&self) -> Vec<ParticipantSnapshot> {
        self.participants.iter().map(Participant::snapshot).collect()
    }
}

/// Peer duels alternate strictly; the lower id moves first.
fn peer_moves_first(mode: BattleMode, local: ParticipantId, participants: &[Participant]) -> bool {
    mode == BattleMode::Duel
        && participants.iter().any(|p| {
            p.role == Role::Opponent
                && p.is_alive()
                && p.controller == Controller::Peer
                && p.id < local
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Participant {
        Participant::new(ParticipantId::PLAYER, "Hero", Role::Player, Controller::Local)
    }

    fn cpu(id: u32) -> Participant {
        Participant::new(
            ParticipantId(id),
            format!("Cpu{id}"),
            Role::Opponent,
            Controller::Cpu(CpuArchetype::Balanced),
        )
    }

    #[test]
    fn two_participants_form_a_duel() {
        let state = BattleState::new(BattleSetup::new(
            1,
            ParticipantId::PLAYER,
            vec![player(), cpu(1)],
        ))
        .unwrap();
        assert_eq!(state.mode, BattleMode::Duel);
        assert_eq!(state.phase, Phase::Selection);
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn three_participants_form_a_skirmish() {
        let state = BattleState::new(BattleSetup::new(
            1,
            ParticipantId::PLAYER,
            vec![player(), cpu(1), cpu(2)],
        ))
        .unwrap();
        assert_eq!(state.mode, BattleMode::Skirmish);
    }

    #[test]
    fn setup_rejects_duplicates_and_missing_roles() {
        let duplicate = BattleState::new(BattleSetup::new(
            1,
            ParticipantId::PLAYER,
            vec![player(), cpu(1), cpu(1)],
        ));
        assert_eq!(
            duplicate.unwrap_err(),
            SetupError::DuplicateParticipant {
                id: ParticipantId(1)
            }
        );

        let lonely = BattleState::new(BattleSetup::new(1, ParticipantId::PLAYER, vec![player()]));
        assert!(matches!(
            lonely,
            Err(SetupError::TooFewParticipants { count: 1 })
        ));

        let no_player =
            BattleState::new(BattleSetup::new(1, ParticipantId(9), vec![player(), cpu(1)]));
        assert!(matches!(no_player, Err(SetupError::MissingLocalPlayer { .. })));
    }
}
