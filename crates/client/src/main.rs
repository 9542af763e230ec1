//! Battle client binary.
//!
//! Main entry point for the terminal battle client.
//!
//! # Examples
//!
//! ```bash
//! # Fight the default roster entry, picking moves from stdin
//! cargo run -p battle-client
//!
//! # Watch the CPU heuristic play a skirmish
//! BATTLE_AUTOPLAY=1 BATTLE_ALLIES=iron_warden BATTLE_OPPONENTS=cave_brute,hex_weaver \
//!     cargo run -p battle-client
//!
//! # Two terminals sharing one duel
//! BATTLE_SEED=7 BATTLE_EXCHANGE_DIR=/tmp/duel BATTLE_PLAYER_ID=0 cargo run -p battle-client
//! BATTLE_SEED=7 BATTLE_EXCHANGE_DIR=/tmp/duel BATTLE_PLAYER_ID=1 cargo run -p battle-client
//! ```

use anyhow::Result;
use battle_client::Client;
use battle_client::config::ClientConfig;
use battle_client::logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let config = ClientConfig::from_env();

    // 2. Setup logging
    let _guard = logging::setup_logging(config.log_dir.as_deref(), config.session_id.as_deref())?;

    tracing::info!("Starting battle client");
    tracing::info!("Seed: {}", config.seed);
    tracing::info!("Player id: {}", config.player_id);
    tracing::info!("Autoplay: {}", config.autoplay);

    // 3. Build and run
    let client = Client::build(&config).await?;
    tracing::info!("Client assembled, starting...");
    let outcome = client.run().await?;

    println!();
    println!("{}", outcome);
    tracing::info!("Client shutdown complete");
    Ok(())
}
