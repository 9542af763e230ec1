//! Battle state machine.
//!
//! The [`BattleEngine`] is the authoritative reducer for [`BattleState`]:
//! `(state, event) -> state'`. It performs no I/O. The runtime feeds it
//! events, persists the returned deltas, and publishes the resolved moves.
//! A rejected event leaves the state exactly as it was.

mod errors;
mod outcome;
mod transition;
mod turns;

pub use errors::EngineError;
pub use outcome::{BattleEvent, ResolvedMove, StepOutcome};
pub use turns::{OrderEntry, compute_order};

use crate::env::{BattleEnv, BattleRng, PcgRng};
use crate::state::{BattleMode, BattleState, Phase, StateDelta};

/// Battle engine that applies events to a borrowed state.
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    /// Applies `event`, drawing every random value from `rng`.
    ///
    /// Increments the nonce on success and returns the delta, new log lines,
    /// and any locally resolved moves.
    pub fn execute(
        &mut self,
        env: &BattleEnv<'_>,
        event: &BattleEvent,
        rng: &mut impl BattleRng,
    ) -> Result<StepOutcome, EngineError> {
        let mut next = self.state.clone();
        let transition = transition::apply(&mut next, env, event, rng)?;
        next.nonce += 1;

        let delta = StateDelta::from_states(self.state, &next);
        let log = next.log.since(self.state.log.len()).to_vec();
        let outcome = if next.outcome != self.state.outcome {
            next.outcome
        } else {
            None
        };

        *self.state = next;

        Ok(StepOutcome {
            delta,
            log,
            resolved: transition.resolved,
            outcome,
            cutscene: transition.cutscene,
        })
    }
}

/// Seeds the RNG for the next engine step.
///
/// The seed depends only on data every peer agrees on (battle seed, round,
/// phase, schedule cursor), never on the local nonce, so clients that hold
/// the same state draw the same values.
pub fn step_rng(state: &BattleState) -> PcgRng {
    let phase = match state.phase {
        Phase::Selection => 1,
        Phase::Execution => 2,
        Phase::OpponentTurn => 3,
        Phase::Cutscene => 4,
        Phase::Victory | Phase::Defeat | Phase::Escaped => 5,
    };
    let cursor = match state.mode {
        BattleMode::Duel => 0,
        BattleMode::Skirmish => state.round.cursor as u32,
    };
    PcgRng::for_step(state.battle_seed, u64::from(state.turn), (phase << 16) | cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BattleConfig;
    use crate::env::{SequenceRng, StaticMoveOracle};
    use crate::state::{
        BattleResult, BattleSetup, Controller, CpuArchetype, Magnitude, MoveDefinition,
        MoveSelection, MoveType, Participant, ParticipantId, Role, StatusEffectKind,
        StatusEffectTemplate,
    };

    const HERO: ParticipantId = ParticipantId::PLAYER;
    const FOE: ParticipantId = ParticipantId(1);

    fn moves() -> StaticMoveOracle {
        StaticMoveOracle::new()
            .with(
                MoveDefinition::new("strike", "Strike", MoveType::Attack)
                    .with_damage(Magnitude::Fixed(20)),
            )
            .with(
                MoveDefinition::new("jab", "Jab", MoveType::Attack)
                    .with_damage(Magnitude::Fixed(2)),
            )
            .with(
                MoveDefinition::new("bash", "Bash", MoveType::Attack)
                    .with_damage(Magnitude::Fixed(1))
                    .with_effect(StatusEffectTemplate::new(StatusEffectKind::Stun, 1)),
            )
    }

    fn duel(foe_health: u32) -> BattleState {
        let hero = Participant::new(HERO, "Hero", Role::Player, Controller::Local)
            .with_health(50, 50)
            .with_moves(["strike", "jab"]);
        let foe = Participant::new(FOE, "Wolf", Role::Opponent, Controller::Cpu(CpuArchetype::Aggressor))
            .with_health(foe_health, foe_health)
            .with_moves(["jab"]);
        BattleState::new(BattleSetup::new(9, HERO, vec![hero, foe])).unwrap()
    }

    #[test]
    fn lethal_strike_wins_the_duel() {
        let oracle = moves();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&oracle, &config);
        let mut state = duel(15);
        let mut engine = BattleEngine::new(&mut state);
        let mut rng = SequenceRng::zeros();

        engine
            .execute(&env, &BattleEvent::Select(MoveSelection::new(HERO, "strike", FOE)), &mut rng)
            .unwrap();
        let step = engine.execute(&env, &BattleEvent::Execute, &mut rng).unwrap();

        assert_eq!(state.phase, Phase::Victory);
        assert_eq!(state.participant(FOE).unwrap().health.current, 0);
        let outcome = step.outcome.unwrap();
        assert_eq!(outcome.result, BattleResult::Victory);
        assert_eq!(outcome.rewards.recipient, HERO);
        assert_eq!(step.resolved.len(), 1);
    }

    #[test]
    fn duel_round_trip_returns_to_selection() {
        let oracle = moves();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&oracle, &config);
        let mut state = duel(100);
        let mut rng = SequenceRng::zeros();
        {
            let mut engine = BattleEngine::new(&mut state);
            engine
                .execute(&env, &BattleEvent::Select(MoveSelection::new(HERO, "jab", FOE)), &mut rng)
                .unwrap();
            engine.execute(&env, &BattleEvent::Execute, &mut rng).unwrap();
            assert_eq!(engine.state().phase, Phase::OpponentTurn);
            engine
                .execute(&env, &BattleEvent::OpponentAct(MoveSelection::new(FOE, "jab", HERO)), &mut rng)
                .unwrap();
        }
        assert_eq!(state.phase, Phase::Selection);
        assert_eq!(state.turn, 2);
        assert_eq!(state.nonce, 3);
        assert_eq!(state.participant(HERO).unwrap().health.current, 48);
    }

    #[test]
    fn rejected_event_leaves_state_untouched() {
        let oracle = moves();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&oracle, &config);
        let mut state = duel(100);
        let before = state.clone();
        let mut engine = BattleEngine::new(&mut state);

        let err = engine
            .execute(&env, &BattleEvent::Execute, &mut SequenceRng::zeros())
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnexpectedEvent {
                phase: Phase::Selection,
                event: "execute"
            }
        );
        let err = engine
            .execute(
                &env,
                &BattleEvent::Select(MoveSelection::new(FOE, "jab", HERO)),
                &mut SequenceRng::zeros(),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::WrongActor { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn stunned_opponent_loses_its_action() {
        let oracle = moves();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&oracle, &config);
        let mut state = duel(100);
        let mut rng = SequenceRng::zeros();
        let mut engine = BattleEngine::new(&mut state);

        engine
            .execute(&env, &BattleEvent::Select(MoveSelection::new(HERO, "bash", FOE)), &mut rng)
            .unwrap();
        engine.execute(&env, &BattleEvent::Execute, &mut rng).unwrap();
        let step = engine
            .execute(&env, &BattleEvent::OpponentAct(MoveSelection::new(FOE, "jab", HERO)), &mut rng)
            .unwrap();

        assert!(step.resolved[0].skipped);
        assert_eq!(state.participant(HERO).unwrap().health.current, 50);
        assert_eq!(state.phase, Phase::Selection);
        assert!(!state.participant(FOE).unwrap().status.has(StatusEffectKind::Stun));
    }

    #[test]
    fn escape_is_terminal_and_forfeits_pool() {
        let oracle = moves();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&oracle, &config);
        let mut state = duel(100);
        state.steal_pool = 12;
        let mut engine = BattleEngine::new(&mut state);

        let step = engine
            .execute(&env, &BattleEvent::Escape, &mut SequenceRng::zeros())
            .unwrap();
        let outcome = step.outcome.unwrap();
        assert_eq!(outcome.result, BattleResult::Escape);
        assert_eq!(outcome.rewards.resource, 0);

        let err = engine
            .execute(&env, &BattleEvent::Escape, &mut SequenceRng::zeros())
            .unwrap_err();
        assert_eq!(err, EngineError::BattleOver { phase: Phase::Escaped });
    }

    #[test]
    fn step_rng_ignores_nonce() {
        let mut a = duel(100);
        let b = a.clone();
        a.nonce = 41;
        let mut first = step_rng(&a);
        let mut second = step_rng(&b);
        assert_eq!(first.next_u32(), second.next_u32());
    }
}
