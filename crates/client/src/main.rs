//! Withdraw client binary.
//!
//! Loads the item catalog and a game-state fixture from RON files, wires them
//! to the dry-run transfer backend, and runs the console on stdin/stdout.
//!
//! # Examples
//!
//! ```bash
//! # Bundled content, successful transfers
//! cargo run -p withdraw-client
//!
//! # Exercise the failure and retry path
//! WITHDRAW_DRY_RUN_FAIL=true cargo run -p withdraw-client
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use withdraw_client::{Client, ClientConfig, DryRunTransfer, logging};
use withdraw_content::{GameStateLoader, ItemLoader};
use withdraw_runtime::StaticGameState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let config = ClientConfig::from_env();

    // 2. Setup logging; the guard flushes the file writer on exit
    let _guard = logging::setup_logging(config.session_id.as_deref(), config.log_dir.as_deref())?;

    tracing::info!("Starting withdraw client");
    tracing::info!("Catalog: {}", config.content.catalog.display());
    tracing::info!("Game state: {}", config.content.game_state.display());

    // 3. Load content
    let oracle = ItemLoader::load(&config.content.catalog).with_context(|| {
        format!(
            "Failed to load item catalog from {}",
            config.content.catalog.display()
        )
    })?;
    let record = GameStateLoader::load(&config.content.game_state).with_context(|| {
        format!(
            "Failed to load game state from {}",
            config.content.game_state.display()
        )
    })?;
    let game_state = StaticGameState {
        farm_id: record.farm_id,
        balance: record.balance,
        address: record.address.clone(),
        inventory: Arc::new(record.inventory_snapshot()?),
    };

    // 4. Build and run
    let client = Client::builder()
        .game_state(game_state)
        .oracle(oracle)
        .transfer(DryRunTransfer::new(config.dry_run.clone()))
        .build()?;

    tracing::info!("Client assembled, starting console...");
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    client.run(input, std::io::stdout()).await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}
