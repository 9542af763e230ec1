//! Terminal battle client.
//!
//! # Architecture
//!
//! ```text
//! Client
//!   ├─→ Runtime (battle worker, providers, move exchange)
//!   ├─→ Log printer (renders battle log events to stdout)
//!   └─→ Progression (logs the settled rewards)
//! ```
//!
//! The local participant is driven from stdin, or by the CPU heuristic when
//! autoplay is enabled. Setting an exchange directory shares the battle with
//! a second client through [`FileMoveExchange`].

pub mod config;
pub mod encounter;
pub mod input;
pub mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use battle_content::ContentFactory;
use battle_core::{BattleOutcome, MoveOracle};
use battle_runtime::{
    CpuMoveProvider, Event, FileMoveExchange, OracleManager, ProgressionSink, RoundId, Runtime,
    RuntimeConfig, Topic,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::input::StdinMoveProvider;

/// Top-level client container: one runtime plus the log printer.
pub struct Client {
    runtime: Runtime,
    printer: JoinHandle<()>,
}

impl Client {
    /// Loads content, builds the encounter, and starts the runtime.
    pub async fn build(config: &ClientConfig) -> Result<Self> {
        let factory = ContentFactory::new(&config.data_dir);
        let oracles = OracleManager::from_content(&factory).context("loading battle content")?;
        let roster = factory.load_roster().context("loading roster")?;
        let setup = encounter::build_setup(config, &roster)?;

        let catalog = oracles.catalog().clone();
        let battle_config = oracles.config().clone();
        let runtime_config = RuntimeConfig {
            poll_interval: config.poll_interval,
            ..RuntimeConfig::default()
        };

        let mut builder = Runtime::builder()
            .config(runtime_config)
            .setup(setup)
            .oracles(oracles)
            .progression(Arc::new(LogProgression));

        builder = if config.autoplay {
            let moves: Arc<dyn MoveOracle> = catalog;
            builder.local_provider(CpuMoveProvider::new(moves, &battle_config))
        } else {
            builder.local_provider(StdinMoveProvider::new(catalog))
        };

        if let Some(dir) = &config.exchange_dir {
            let exchange = FileMoveExchange::open(dir)
                .await
                .with_context(|| format!("opening move exchange at {}", dir.display()))?;
            let round = RoundId::new(format!("battle-{}", config.seed));
            info!("Move exchange: {} (round {})", dir.display(), round);
            builder = builder.exchange(Arc::new(exchange), round);
        }

        let runtime = builder.build().await.context("building battle runtime")?;
        let printer = tokio::spawn(print_log(runtime.handle().subscribe(Topic::Log)));

        Ok(Self { runtime, printer })
    }

    /// Runs the battle to the end. Ctrl-C escapes.
    pub async fn run(mut self) -> Result<BattleOutcome> {
        let finished = tokio::select! {
            outcome = self.runtime.run() => Some(outcome),
            _ = tokio::signal::ctrl_c() => None,
        };

        let outcome = match finished {
            Some(outcome) => outcome?,
            None => {
                info!("Escape requested");
                self.runtime
                    .escape()
                    .await?
                    .context("battle ended without an outcome")?
            }
        };

        self.runtime.shutdown().await?;
        if let Err(err) = self.printer.await {
            warn!("log printer stopped: {}", err);
        }
        Ok(outcome)
    }
}

async fn print_log(mut log: broadcast::Receiver<Event>) {
    loop {
        match log.recv().await {
            Ok(Event::Log(event)) => println!("{}", event.line),
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("log printer skipped {} lines", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Reports settled rewards through tracing.
struct LogProgression;

#[async_trait]
impl ProgressionSink for LogProgression {
    async fn on_battle_end(&self, outcome: &BattleOutcome) {
        info!(
            result = %outcome.result,
            resource = outcome.rewards.resource,
            recipient = %outcome.rewards.recipient,
            turns = outcome.rewards.turns,
            "battle settled"
        );
    }
}
