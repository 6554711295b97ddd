//! # Estoque CLI Library
//!
//! Wiring for the `estoque` binary: configuration, logging, ledger setup
//! and command dispatch. Kept as a library so integration tests can drive
//! a full invocation without spawning a process.
//!
//! ## Module Organization
//! ```text
//! estoque_cli/
//! ├── lib.rs          ◄─── You are here (setup & run)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── config.rs       ◄─── estoque.toml + environment
//! ├── error.rs        ◄─── CliError and exit codes
//! └── commands/
//!     ├── mod.rs      ◄─── Dispatch and output helpers
//!     ├── intake.rs
//!     ├── stock.rs
//!     ├── entries.rs
//!     ├── sales.rs
//!     ├── candidates.rs
//!     ├── sell.rs
//!     └── report.rs
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

use std::io::Write;

use estoque_store::{Ledger, StoreConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use commands::Output;
use config::AppConfig;
use error::CliError;

/// Runs one invocation.
///
/// ## Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → estoque.toml → ESTOQUE_* environment                   │
/// │     • --data-dir wins over all of them                                  │
/// │                                                                         │
/// │  2. Open Ledger ──────────────────────────────────────────────────────► │
/// │     • CSV tables under data_dir                                         │
/// │     • read cache with the configured TTL                                │
/// │                                                                         │
/// │  3. Dispatch Command ─────────────────────────────────────────────────► │
/// │     • output to `out` (stdout in the binary), logs to stderr            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<(), CliError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        debug!(data_dir = %data_dir.display(), "Overriding data dir from command line");
        config.store.data_dir = data_dir;
        config.validate()?;
    }

    info!(data_dir = %config.store.data_dir.display(), "Starting estoque");

    let ledger = Ledger::open(StoreConfig::new(config.store.data_dir.clone()).cache_ttl(config.cache_ttl()));
    let output = Output::new(cli.json, config.display.currency_symbol.clone());

    commands::dispatch(&ledger, cli.command, &output, out)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=estoque_store=trace` - Cache hits and misses
/// - Default: INFO, DEBUG for the estoque crates
///
/// Logs go to stderr; stdout carries command output only.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,estoque=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
