//! Withdraw client: composition root for the withdraw panel.
//!
//! # Architecture
//!
//! ```text
//! Client
//!   ├─→ WithdrawPanel (basket manager + submission controller per session)
//!   │     ├─→ GameStateProvider (inventory, balance, wallet address)
//!   │     ├─→ ItemOracle (item -> contract id)
//!   │     └─→ TokenTransfer (wallet bridge, dry-run in this binary)
//!   └─→ Console (line-oriented frontend)
//! ```
//!
//! All collaborators are injected through [`ClientBuilder`], so tests swap in
//! `MockTransfer` and fixed game state.

mod builder;
pub mod config;
pub mod console;
pub mod dry_run;
pub mod logging;

pub use builder::ClientBuilder;
pub use config::{ClientConfig, ContentConfig, DryRunConfig};
pub use console::{Command, CommandError, Console};
pub use dry_run::DryRunTransfer;

use std::io::Write;

use anyhow::Result;
use tokio::io::AsyncBufRead;
use withdraw_runtime::WithdrawPanel;

/// Top-level client container.
///
/// # Lifecycle
///
/// 1. `Client::builder()` wires the panel collaborators
/// 2. `Client::run()` opens the panel and hands control to the console
/// 3. On quit or end of input the panel is closed, orphaning any transfer
///    still in flight
pub struct Client {
    panel: WithdrawPanel,
}

impl Client {
    /// Create a new ClientBuilder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Run the console until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub async fn run<R, W>(mut self, input: R, output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.panel.set_open(true);

        let mut console = Console::new(input, output);
        let result = console.run(&mut self.panel).await;

        self.panel.set_open(false);
        result
    }
}
