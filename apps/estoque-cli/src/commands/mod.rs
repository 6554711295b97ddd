//! # Commands Module
//!
//! One function per subcommand. Each runs a single read-compute-persist
//! cycle against the ledger and writes its result to `out`.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (dispatch, output helpers)
//! ├── intake.rs      ◄─── Stock intake
//! ├── stock.rs       ◄─── Reconciled stock view
//! ├── entries.rs     ◄─── Stock intake registry
//! ├── sales.rs       ◄─── Sales history
//! ├── candidates.rs  ◄─── Lots offered for sale
//! ├── sell.rs        ◄─── Checkout and confirmation
//! └── report.rs      ◄─── Business report
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  estoque sell --line "CAFE - LOT 1:2" --confirm                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  dispatch(ledger, Command::Sell(args), output, out)                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  sell::run(ledger, args, output, out) -> Result<(), CliError>           │
//! │         │                                                               │
//! │         ├── --json ──► serde_json to stdout                             │
//! │         └── text  ───► aligned table to stdout                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod candidates;
pub mod entries;
pub mod intake;
pub mod report;
pub mod sales;
pub mod sell;
pub mod stock;

use std::io::Write;

use chrono::NaiveDate;
use estoque_core::Money;
use estoque_store::{Ledger, TableStore};
use serde::Serialize;

use crate::cli::Command;
use crate::error::CliError;

/// How results are rendered.
#[derive(Debug, Clone)]
pub struct Output {
    pub json: bool,
    pub currency_symbol: String,
}

impl Output {
    pub fn new(json: bool, currency_symbol: impl Into<String>) -> Self {
        Output {
            json,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn text() -> Self {
        Output::new(false, "R$")
    }

    pub fn money(&self, amount: Money) -> String {
        format!("{} {}", self.currency_symbol, amount)
    }

    pub fn optional_money(&self, amount: Option<Money>) -> String {
        amount.map(|m| self.money(m)).unwrap_or_else(|| "-".to_string())
    }

    pub fn write_json<W: Write, T: Serialize + ?Sized>(&self, out: &mut W, value: &T) -> Result<(), CliError> {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
        Ok(())
    }
}

pub(crate) fn optional_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Runs one subcommand.
pub fn dispatch<S, W>(ledger: &Ledger<S>, command: Command, output: &Output, out: &mut W) -> Result<(), CliError>
where
    S: TableStore,
    W: Write,
{
    match command {
        Command::Intake(args) => intake::run(ledger, args, output, out),
        Command::Stock(args) => stock::run(ledger, args, output, out),
        Command::Entries => entries::run(ledger, output, out),
        Command::Sales => sales::run(ledger, output, out),
        Command::Candidates => candidates::run(ledger, output, out),
        Command::Sell(args) => sell::run(ledger, args, output, out),
        Command::Report => report::run(ledger, output, out),
    }
}
