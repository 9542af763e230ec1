//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a battle. Each
//! [`Runtime::step`] reads the current phase, asks the right collaborator
//! (local input, CPU heuristic, peer channel, cutscene director) for the next
//! event, and hands it to the worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use battle_core::{
    BattleConfig, BattleEvent, BattleMode, BattleOutcome, BattleSetup, BattleState, Controller,
    MoveOracle, MoveSelection, ParticipantId, Phase,
};

use crate::api::{
    CutsceneDirector, MoveProvider, ProgressionSink, ProviderKind, Result, RuntimeError,
    RuntimeHandle, SkipCutscene,
};
use crate::events::EventBus;
use crate::oracle::OracleManager;
use crate::providers::CpuMoveProvider;
use crate::repository::{InMemoryResourceRepository, ResourceRepository};
use crate::sync::{
    MoveExchange, MovePayload, MoveSynchronizer, PollingMoveFeed, PublishedMoveRecord, RoundId,
};
use crate::workers::{BattleWorker, Command, StepReport};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Replaces the oracle manager's battle configuration when set.
    pub battle_config: Option<BattleConfig>,
    /// Interval between move-exchange polls.
    pub poll_interval: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle_config: None,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that orchestrates one battle on one client.
///
/// [`RuntimeHandle`] provides a cloneable façade for renderers and for
/// escaping from another task.
pub struct Runtime {
    handle: RuntimeHandle,
    local: ParticipantId,

    local_provider: Option<Arc<dyn MoveProvider>>,
    cpu_provider: Arc<dyn MoveProvider>,
    synchronizer: Option<MoveSynchronizer>,
    progression: Option<Arc<dyn ProgressionSink>>,
    cutscene: Arc<dyn CutsceneDirector>,

    worker_handle: JoinHandle<()>,
    settled: bool,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn local(&self) -> ParticipantId {
        self.local
    }

    /// Advances the battle by one event.
    ///
    /// Returns the outcome once the battle is over. Waiting on a peer has no
    /// timeout; it ends when the move arrives or the battle is escaped.
    pub async fn step(&mut self) -> Result<Option<BattleOutcome>> {
        let state = self.handle.query_state().await?;
        if let Some(outcome) = state.outcome {
            return Ok(Some(outcome));
        }

        match (state.phase, state.mode) {
            (Phase::Selection, BattleMode::Duel) => {
                let selection = self.local_selection(&state).await?;
                self.handle.apply(BattleEvent::Select(selection)).await?;
            }
            (Phase::Execution, BattleMode::Duel) => {
                let report = self.handle.apply(BattleEvent::Execute).await?;
                self.publish_resolved(&report).await?;
            }
            (Phase::OpponentTurn, _) => self.opponent_turn(&state).await?,
            (Phase::Selection, BattleMode::Skirmish) => self.collect_selection(&state).await?,
            (Phase::Execution, BattleMode::Skirmish) => {
                self.handle.apply(BattleEvent::Execute).await?;
            }
            (Phase::Cutscene, _) => {
                let target = state
                    .scripted_defeat
                    .as_ref()
                    .map(|script| script.target)
                    .unwrap_or(state.local);
                let victory = self.cutscene.play(target).await;
                info!(target: "runtime", %target, victory, "cutscene finished");
                self.handle
                    .apply(BattleEvent::ResolveCutscene { victory })
                    .await?;
            }
            (Phase::Victory | Phase::Defeat | Phase::Escaped, _) => {}
        }

        Ok(self.handle.query_state().await?.outcome)
    }

    /// Steps until the battle ends and notifies the progression collaborator.
    pub async fn run(&mut self) -> Result<BattleOutcome> {
        loop {
            if let Some(outcome) = self.step().await? {
                self.settle(&outcome).await;
                return Ok(outcome);
            }
        }
    }

    /// Leave the battle immediately.
    pub async fn escape(&mut self) -> Result<Option<BattleOutcome>> {
        let report = self.handle.escape().await?;
        if let Some(outcome) = &report.outcome {
            self.settle(outcome).await;
        }
        Ok(report.outcome)
    }

    /// Set the local move provider
    pub fn set_local_provider(&mut self, provider: impl MoveProvider + 'static) {
        self.local_provider = Some(Arc::new(provider));
    }

    /// Set the CPU move provider
    pub fn set_cpu_provider(&mut self, provider: impl MoveProvider + 'static) {
        self.cpu_provider = Arc::new(provider);
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;
        Ok(())
    }

    async fn settle(&mut self, outcome: &BattleOutcome) {
        if self.settled {
            return;
        }
        self.settled = true;
        if let Some(progression) = &self.progression {
            progression.on_battle_end(outcome).await;
        }
    }

    async fn local_selection(&self, state: &BattleState) -> Result<MoveSelection> {
        let provider = self
            .local_provider
            .as_ref()
            .ok_or(RuntimeError::ProviderNotSet {
                kind: ProviderKind::Local,
            })?;
        provider.provide_move(state.local, state).await
    }

    async fn opponent_turn(&mut self, state: &BattleState) -> Result<()> {
        let opponent = state
            .duel_opponent()
            .ok_or(RuntimeError::UnknownParticipant { id: state.local })?;
        let opponent_id = opponent.id;

        if opponent.controller == Controller::Peer {
            let wanted = move |record: &PublishedMoveRecord| {
                record.actor == opponent_id && matches!(record.payload, MovePayload::Resolved(_))
            };
            if let Some(record) = self.await_peer(opponent_id, wanted).await?
                && let MovePayload::Resolved(resolved) = record.payload
            {
                debug!(target: "runtime", record = %record.id, "applying peer move");
                self.handle.apply(BattleEvent::ApplyRemote(resolved)).await?;
            }
            return Ok(());
        }

        let selection = self.cpu_provider.provide_move(opponent_id, state).await?;
        self.handle.apply(BattleEvent::OpponentAct(selection)).await?;
        Ok(())
    }

    /// Commits one pending skirmish selection.
    ///
    /// The local participant goes first and its choice is published; peers
    /// follow as their records arrive; CPUs choose last, once every human
    /// selection for the round is in.
    async fn collect_selection(&mut self, state: &BattleState) -> Result<()> {
        let pending = state.pending_selectors();
        let turn = state.turn;

        if pending.contains(&state.local) {
            let selection = self.local_selection(state).await?;
            self.handle
                .apply(BattleEvent::Select(selection.clone()))
                .await?;
            if let Some(sync) = &self.synchronizer {
                sync.publish_selection(turn, &selection).await?;
            }
            return Ok(());
        }

        let controller_of = |id: &ParticipantId| state.participant(*id).map(|p| p.controller);
        let peers: Vec<ParticipantId> = pending
            .iter()
            .copied()
            .filter(|id| controller_of(id) == Some(Controller::Peer))
            .collect();
        if let Some(&first) = peers.first() {
            let wanted = move |record: &PublishedMoveRecord| {
                peers.contains(&record.actor)
                    && matches!(record.payload, MovePayload::Selection { turn: t, .. } if t == turn)
            };
            if let Some(record) = self.await_peer(first, wanted).await?
                && let MovePayload::Selection { selection, .. } = record.payload
            {
                let selection = MoveSelection {
                    actor: record.actor,
                    ..selection
                };
                self.handle.apply(BattleEvent::Select(selection)).await?;
            }
            return Ok(());
        }

        if let Some(&cpu) = pending.first() {
            let selection = self.cpu_provider.provide_move(cpu, state).await?;
            self.handle.apply(BattleEvent::Select(selection)).await?;
        }
        Ok(())
    }

    /// Waits for a matching peer record, or `None` once the battle is over.
    async fn await_peer<F>(
        &mut self,
        participant: ParticipantId,
        wanted: F,
    ) -> Result<Option<PublishedMoveRecord>>
    where
        F: Fn(&PublishedMoveRecord) -> bool + Send,
    {
        let sync = self
            .synchronizer
            .as_mut()
            .ok_or(RuntimeError::MissingExchange { participant })?;
        let mut phase = self.handle.phase_watch();
        debug!(target: "runtime::sync", %participant, round = %sync.round(), "waiting for peer move");

        tokio::select! {
            record = sync.next_matching(wanted) => Ok(Some(record)),
            _ = phase.wait_for(|phase| phase.is_terminal()) => Ok(None),
        }
    }

    async fn publish_resolved(&self, report: &StepReport) -> Result<()> {
        let Some(sync) = &self.synchronizer else {
            return Ok(());
        };
        for resolved in report.resolved.iter().filter(|r| r.actor == self.local) {
            sync.publish_resolved(resolved).await?;
        }
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    setup: Option<BattleSetup>,
    oracles: Option<OracleManager>,
    local_provider: Option<Arc<dyn MoveProvider>>,
    cpu_provider: Option<Arc<dyn MoveProvider>>,
    repository: Option<Arc<dyn ResourceRepository>>,
    exchange: Option<Arc<dyn MoveExchange>>,
    round: Option<RoundId>,
    progression: Option<Arc<dyn ProgressionSink>>,
    cutscene: Option<Arc<dyn CutsceneDirector>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            setup: None,
            oracles: None,
            local_provider: None,
            cpu_provider: None,
            repository: None,
            exchange: None,
            round: None,
            progression: None,
            cutscene: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Participants and seed of the battle (required)
    pub fn setup(mut self, setup: BattleSetup) -> Self {
        self.setup = Some(setup);
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Set the local move provider (optional for CPU-only battles)
    pub fn local_provider(mut self, provider: impl MoveProvider + 'static) -> Self {
        self.local_provider = Some(Arc::new(provider));
        self
    }

    /// Replace the default CPU heuristic provider
    pub fn cpu_provider(mut self, provider: impl MoveProvider + 'static) -> Self {
        self.cpu_provider = Some(Arc::new(provider));
        self
    }

    /// Resource store (defaults to an in-memory repository)
    pub fn repository(mut self, repository: Arc<dyn ResourceRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Move-exchange channel, required when any participant is a peer
    pub fn exchange(mut self, exchange: Arc<dyn MoveExchange>, round: RoundId) -> Self {
        self.exchange = Some(exchange);
        self.round = Some(round);
        self
    }

    pub fn progression(mut self, progression: Arc<dyn ProgressionSink>) -> Self {
        self.progression = Some(progression);
        self
    }

    pub fn cutscene(mut self, cutscene: Arc<dyn CutsceneDirector>) -> Self {
        self.cutscene = Some(cutscene);
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let setup = self.setup.ok_or(RuntimeError::MissingSetup)?;
        let mut oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        if let Some(config) = self.config.battle_config.clone() {
            oracles.config = config;
        }

        let state = BattleState::new(setup)?;
        let local = state.local;

        let peer = state
            .participants
            .iter()
            .find(|p| p.controller == Controller::Peer)
            .map(|p| p.id);
        let synchronizer = match (self.exchange, peer) {
            (Some(exchange), _) => {
                let round = self
                    .round
                    .unwrap_or_else(|| RoundId::new(format!("battle-{}", state.battle_seed)));
                let feed = PollingMoveFeed::new(
                    exchange.clone(),
                    round.clone(),
                    local,
                    self.config.poll_interval,
                );
                Some(MoveSynchronizer::new(exchange, Box::new(feed), round, local))
            }
            (None, Some(participant)) => {
                return Err(RuntimeError::MissingExchange { participant });
            }
            (None, None) => None,
        };

        let cpu_provider = self.cpu_provider.unwrap_or_else(|| {
            let moves: Arc<dyn MoveOracle> = oracles.catalog().clone();
            Arc::new(CpuMoveProvider::new(moves, oracles.config()))
        });
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryResourceRepository::new()));

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (phase_tx, phase_rx) = watch::channel(state.phase);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone(), phase_rx);

        info!(
            target: "runtime",
            %local,
            mode = ?state.mode,
            phase = %state.phase,
            peers = peer.is_some(),
            "battle runtime starting"
        );

        let worker = BattleWorker::new(state, oracles, repository, command_rx, event_bus, phase_tx);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            local,
            local_provider: self.local_provider,
            cpu_provider,
            synchronizer,
            progression: self.progression,
            cutscene: self
                .cutscene
                .unwrap_or_else(|| Arc::new(SkipCutscene::default())),
            worker_handle,
            settled: false,
        })
    }
}
