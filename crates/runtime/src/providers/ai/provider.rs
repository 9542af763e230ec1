//! CPU move provider.

use std::sync::Arc;

use async_trait::async_trait;
use battle_core::{
    BattleConfig, BattleState, Controller, CpuArchetype, MoveDefinition, MoveOracle,
    MoveSelection, ParticipantId, RollTables,
};
use tracing::{debug, warn};

use super::heuristic;
use super::situation::Situation;
use crate::api::{MoveProvider, Result, RuntimeError};

/// Chooses moves for CPU-controlled participants with the scoring heuristic.
///
/// The archetype comes from the participant's [`Controller::Cpu`] tag set at
/// setup. Participants without one are scored as [`CpuArchetype::Balanced`].
pub struct CpuMoveProvider {
    moves: Arc<dyn MoveOracle>,
    tables: RollTables,
}

impl CpuMoveProvider {
    pub fn new(moves: Arc<dyn MoveOracle>, config: &BattleConfig) -> Self {
        Self {
            moves,
            tables: config.roll_tables.clone(),
        }
    }

    /// The participant's own moves, or the whole catalog when none resolve.
    fn available_moves(&self, known: &[String]) -> Vec<MoveDefinition> {
        let own: Vec<_> = known
            .iter()
            .filter_map(|id| self.moves.definition(id))
            .collect();
        if !own.is_empty() {
            return own;
        }
        self.moves
            .move_ids()
            .iter()
            .filter_map(|id| self.moves.definition(id))
            .collect()
    }
}

#[async_trait]
impl MoveProvider for CpuMoveProvider {
    async fn provide_move(
        &self,
        actor: ParticipantId,
        state: &BattleState,
    ) -> Result<MoveSelection> {
        let participant = state
            .participant(actor)
            .ok_or(RuntimeError::UnknownParticipant { id: actor })?;
        let archetype = match participant.controller {
            Controller::Cpu(archetype) => archetype,
            _ => CpuArchetype::default(),
        };
        let moves = self.available_moves(&participant.moves);

        let situation = Situation::from_state(state, participant, archetype)
            .with_fallback_target(state.local_participant());
        debug!(
            target: "runtime::cpu",
            actor = %actor,
            archetype = %archetype,
            candidates = moves.len(),
            opponents = situation.opponents.len(),
            "selecting cpu move"
        );

        if let Some(selection) = heuristic::select(&situation, &moves, &self.tables) {
            return Ok(selection);
        }

        // No move has a reachable target; the engine resolves this as a no-op.
        let move_id = moves.first().map(|m| m.id.clone()).unwrap_or_default();
        warn!(
            target: "runtime::cpu",
            actor = %actor,
            move_id = %move_id,
            "no valid target; aiming at the local participant"
        );
        Ok(MoveSelection::new(actor, move_id, state.local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{
        BattleSetup, Magnitude, MoveType, Participant, Role, StaticMoveOracle,
    };

    fn oracle() -> Arc<dyn MoveOracle> {
        Arc::new(
            StaticMoveOracle::new()
                .with(
                    MoveDefinition::new("strike", "Strike", MoveType::Attack)
                        .with_damage(Magnitude::Fixed(20)),
                )
                .with(
                    MoveDefinition::new("mend", "Mend", MoveType::Heal)
                        .with_healing(Magnitude::Fixed(10)),
                ),
        )
    }

    #[tokio::test]
    async fn picks_a_move_from_the_participant_list() {
        let hero = Participant::new(ParticipantId(0), "Hero", Role::Player, Controller::Local)
            .with_health(15, 80);
        let brute = Participant::new(
            ParticipantId(1),
            "Brute",
            Role::Opponent,
            Controller::Cpu(CpuArchetype::Aggressor),
        )
        .with_moves(["strike"]);
        let state =
            BattleState::new(BattleSetup::new(1, ParticipantId(0), vec![hero, brute])).unwrap();
        let provider = CpuMoveProvider::new(oracle(), &BattleConfig::default());

        let selection = provider.provide_move(ParticipantId(1), &state).await.unwrap();
        assert_eq!(selection, MoveSelection::new(ParticipantId(1), "strike", ParticipantId(0)));
    }

    #[tokio::test]
    async fn unknown_actor_is_an_error() {
        let hero = Participant::new(ParticipantId(0), "Hero", Role::Player, Controller::Local);
        let brute = Participant::new(
            ParticipantId(1),
            "Brute",
            Role::Opponent,
            Controller::Cpu(CpuArchetype::Balanced),
        );
        let state =
            BattleState::new(BattleSetup::new(1, ParticipantId(0), vec![hero, brute])).unwrap();
        let provider = CpuMoveProvider::new(oracle(), &BattleConfig::default());

        let err = provider.provide_move(ParticipantId(7), &state).await.unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownParticipant { .. }));
    }
}
