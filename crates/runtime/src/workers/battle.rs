//! Battle worker that owns the authoritative [`BattleState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], runs each event through
//! [`BattleEngine`], writes the resulting resource changes to the repository,
//! and publishes log, phase, and outcome events.

use std::sync::Arc;

use battle_core::{
    BattleEngine, BattleEvent, BattleMode, BattleOutcome, BattleState, ParticipantId, Phase,
    ResolvedMove, ResourceDelta, StepOutcome, step_rng,
};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::api::Result;
use crate::events::{Event, EventBus, LogEvent, OutcomeEvent, PhaseEvent};
use crate::oracle::OracleManager;
use crate::repository::ResourceRepository;

/// Commands accepted by the battle worker.
pub enum Command {
    /// Run one event through the engine.
    Apply {
        event: BattleEvent,
        reply: oneshot::Sender<Result<StepReport>>,
    },
    /// Read-only clone of the current state.
    QueryState { reply: oneshot::Sender<BattleState> },
}

/// What one accepted event produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Actions resolved on this client during the step.
    pub resolved: Vec<ResolvedMove>,
    pub outcome: Option<BattleOutcome>,
    pub cutscene: Option<ParticipantId>,
    /// Phase after the step.
    pub phase: Phase,
    pub turn: u32,
    /// False when a resource write failed and the rest were skipped.
    pub persisted: bool,
}

/// Background task that applies battle events in arrival order.
pub struct BattleWorker {
    state: BattleState,
    oracles: OracleManager,
    repository: Arc<dyn ResourceRepository>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    phase_tx: watch::Sender<Phase>,
}

impl BattleWorker {
    pub fn new(
        state: BattleState,
        oracles: OracleManager,
        repository: Arc<dyn ResourceRepository>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        phase_tx: watch::Sender<Phase>,
    ) -> Self {
        info!(
            target: "runtime::worker",
            mode = ?state.mode,
            participants = state.participants.len(),
            phase = %state.phase,
            "battle worker initialized"
        );
        Self {
            state,
            oracles,
            repository,
            command_rx,
            event_bus,
            phase_tx,
        }
    }

    /// Main worker loop. Ends when every command sender is dropped.
    pub async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command).await;
        }
        debug!(target: "runtime::worker", "command channel closed; worker stopping");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Apply { event, reply } => {
                let result = self.apply(event).await;
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Apply reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!(target: "runtime::worker", "QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    async fn apply(&mut self, event: BattleEvent) -> Result<StepReport> {
        let turn = self.state.turn;
        let step = self.execute(&event).inspect_err(|error| {
            warn!(
                target: "runtime::worker",
                event = event.name(),
                phase = %self.state.phase,
                %error,
                "event rejected"
            );
        })?;

        // The client that resolved a move owns its writes; replays skip them.
        let persisted = match event {
            BattleEvent::ApplyRemote(_) => true,
            _ => self.persist(&step.delta.resources).await,
        };

        self.publish(turn, &step);

        Ok(StepReport {
            resolved: step.resolved,
            outcome: step.outcome,
            cutscene: step.cutscene,
            phase: self.state.phase,
            turn: self.state.turn,
            persisted,
        })
    }

    fn execute(&mut self, event: &BattleEvent) -> std::result::Result<StepOutcome, battle_core::EngineError> {
        let env = self.oracles.as_battle_env();
        let mut rng = step_rng(&self.state);
        let mut engine = BattleEngine::new(&mut self.state);
        engine.execute(&env, event, &mut rng)
    }

    /// Writes each changed participant in order, stopping at the first failure.
    async fn persist(&self, resources: &[ResourceDelta]) -> bool {
        for delta in resources {
            if let Err(error) = self
                .repository
                .update_participant_resources(delta.participant, delta)
                .await
            {
                warn!(
                    target: "runtime::worker",
                    participant = %delta.participant,
                    %error,
                    "resource update failed; skipping remaining updates"
                );
                return false;
            }
        }
        true
    }

    fn publish(&self, turn: u32, step: &StepOutcome) {
        for line in &step.log {
            self.event_bus.publish(Event::Log(LogEvent {
                turn,
                line: line.clone(),
            }));
        }

        if let Some((from, to)) = step.phase_change() {
            info!(
                target: "runtime::worker",
                %from,
                %to,
                turn = self.state.turn,
                "phase changed"
            );
            self.event_bus.publish(Event::Phase(PhaseEvent {
                from,
                to,
                turn: self.state.turn,
                acting: acting_participant(&self.state),
            }));
            self.phase_tx.send_replace(to);
        }

        if let Some(outcome) = step.outcome {
            info!(
                target: "runtime::worker",
                result = ?outcome.result,
                resource = outcome.rewards.resource,
                turns = outcome.rewards.turns,
                "battle ended"
            );
            self.event_bus.publish(Event::Outcome(OutcomeEvent { outcome }));
        }
    }
}

/// Participant whose input the state is waiting on, when there is one.
pub(crate) fn acting_participant(state: &BattleState) -> Option<ParticipantId> {
    match (state.phase, state.mode) {
        (Phase::Selection, _) => Some(state.local),
        (Phase::OpponentTurn, _) => state.duel_opponent().map(|p| p.id),
        (Phase::Execution, BattleMode::Skirmish) => state
            .round
            .order
            .get(state.round.cursor)
            .map(|turn| turn.participant),
        (Phase::Execution, BattleMode::Duel) => Some(state.local),
        _ => None,
    }
}
