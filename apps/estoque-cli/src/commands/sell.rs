//! # Sell Command
//!
//! Checkout in two steps: the batch is always built and shown, and only
//! written when `--confirm` is given.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  --line "CAFE - LOT 1:2" --line "LEITE - LOT 3:1:5,50:pix"              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  load ──► reconcile ──► build_sale_batch (one sale id for all lines)    │
//! │                              │                                          │
//! │                  ┌───────────┴───────────┐                              │
//! │                  ▼                       ▼                              │
//! │          accepted records         rejected lines (warned, skipped)      │
//! │                  │                                                      │
//! │        no --confirm: print pending batch, write nothing                 │
//! │        --confirm:    commit_sale ──► print recorded batch               │
//! │                                                                         │
//! │  Every line rejected ──► validation error, nothing written              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;

use chrono::NaiveDateTime;
use estoque_core::{build_sale_batch, PaymentMethod, SaleBatch, SaleLineRequest, StockEntry};
use estoque_store::{CommitOutcome, Ledger, TableStore};
use serde::Serialize;
use tracing::{debug, warn};

use super::Output;
use crate::cli::{SaleLineArg, SellArgs};
use crate::error::CliError;

/// JSON shape of the command result.
#[derive(Debug, Serialize)]
struct SellResult<'a> {
    confirmed: bool,
    batch: &'a SaleBatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<&'a CommitOutcome>,
}

pub fn run<S: TableStore, W: Write>(
    ledger: &Ledger<S>,
    args: SellArgs,
    output: &Output,
    out: &mut W,
) -> Result<(), CliError> {
    run_at(ledger, args, chrono::Local::now().naive_local(), output, out)
}

pub(crate) fn run_at<S: TableStore, W: Write>(
    ledger: &Ledger<S>,
    args: SellArgs,
    now: NaiveDateTime,
    output: &Output,
    out: &mut W,
) -> Result<(), CliError> {
    debug!(lines = args.lines.len(), confirm = args.confirm, "sell command");

    let state = ledger.load()?;
    let balances = state.reconcile();
    let requests: Vec<SaleLineRequest> = args
        .lines
        .iter()
        .map(|line| resolve_line(line, args.payment, &state.stock_entries))
        .collect();

    let batch = build_sale_batch(&requests, &balances, &state.stock_entries, now)?;
    for rejected in &batch.rejected {
        warn!(
            product = %rejected.request.product,
            lot = %rejected.request.lot,
            reason = %rejected.reason,
            "Sale line rejected"
        );
    }

    if !batch.is_committable() {
        let reasons: Vec<String> = batch.rejected.iter().map(|r| r.reason.to_string()).collect();
        return Err(CliError::validation(format!(
            "No sale line was accepted: {}",
            reasons.join("; ")
        )));
    }

    let outcome = if args.confirm {
        Some(ledger.commit_sale(Some(&batch))?)
    } else {
        None
    };

    if output.json {
        let result = SellResult {
            confirmed: outcome.is_some(),
            batch: &batch,
            outcome: outcome.as_ref(),
        };
        return output.write_json(out, &result);
    }

    let status = if outcome.is_some() { "recorded" } else { "pending" };
    writeln!(out, "Sale {} ({})", batch.sale_id, status)?;
    for record in &batch.records {
        writeln!(
            out,
            "  {} - {}  {} x {} = {}  {}",
            record.product,
            record.lot,
            record.quantity,
            output.money(record.unit_price),
            output.money(record.total_value),
            record.payment_method,
        )?;
    }
    for rejected in &batch.rejected {
        writeln!(
            out,
            "  rejected {} - {}: {}",
            rejected.request.product, rejected.request.lot, rejected.reason
        )?;
    }
    writeln!(out, "Total: {}", output.money(batch.total_value()))?;

    if outcome.is_none() {
        writeln!(out, "Not recorded. Re-run with --confirm to record this sale.")?;
    }
    Ok(())
}

/// Turns a `--line` into a request. A missing price falls back to the
/// lot's registered sale price; a missing method to `default_method`.
fn resolve_line(line: &SaleLineArg, default_method: PaymentMethod, entries: &[StockEntry]) -> SaleLineRequest {
    let product = line.lot.product.trim().to_uppercase();
    let lot = line.lot.lot.trim().to_uppercase();

    let unit_price = line.unit_price.unwrap_or_else(|| {
        entries
            .iter()
            .find(|e| e.is_lot(&product, &lot))
            .map(|e| e.unit_sale_price)
            .unwrap_or_default()
    });

    SaleLineRequest {
        product,
        lot,
        quantity: line.quantity,
        payment_method: line.payment_method.unwrap_or(default_method),
        unit_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::NaiveDate;
    use estoque_core::{Money, StockIntake};
    use estoque_store::MemoryStore;

    fn stocked_ledger() -> Ledger<MemoryStore> {
        let ledger = Ledger::new(MemoryStore::new());
        let intake = StockIntake {
            product: "CAFE".to_string(),
            sector: "MERCEARIA".to_string(),
            quantity: 5,
            expiry_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            unit_cost: Money::from_cents(200),
            unit_sale_price: Money::from_cents(500),
        };
        ledger
            .record_intake(intake, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .unwrap();
        ledger
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 2).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    fn sell_args(lines: &[&str], confirm: bool) -> SellArgs {
        SellArgs {
            lines: lines.iter().map(|l| l.parse().unwrap()).collect(),
            payment: PaymentMethod::Cash,
            confirm,
        }
    }

    #[test]
    fn test_resolve_line_defaults_price_and_method() {
        let ledger = stocked_ledger();
        let entries = ledger.load().unwrap().stock_entries;
        let line: SaleLineArg = "cafe - lot 1:2".parse().unwrap();

        let request = resolve_line(&line, PaymentMethod::Pix, &entries);
        assert_eq!(request.product, "CAFE");
        assert_eq!(request.lot, "LOT 1");
        assert_eq!(request.unit_price, Money::from_cents(500));
        assert_eq!(request.payment_method, PaymentMethod::Pix);
    }

    #[test]
    fn test_without_confirm_nothing_is_written() {
        let ledger = stocked_ledger();
        let mut out = Vec::new();

        run_at(&ledger, sell_args(&["CAFE - LOT 1:2"], false), now(), &Output::text(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Sale 20240602093000 (pending)\n"));
        assert!(text.contains("CAFE - LOT 1  2 x R$ 5.00 = R$ 10.00  Dinheiro"));
        assert!(text.contains("Re-run with --confirm"));
        assert!(ledger.load().unwrap().sales.is_empty());
    }

    #[test]
    fn test_confirm_records_accepted_lines_only() {
        let ledger = stocked_ledger();
        let mut out = Vec::new();

        run_at(
            &ledger,
            sell_args(&["CAFE - LOT 1:2", "CAFE - LOT 9:1"], true),
            now(),
            &Output::text(),
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(recorded)"));
        assert!(text.contains("rejected CAFE - LOT 9"));

        let state = ledger.load().unwrap();
        assert_eq!(state.sales.len(), 1);
        assert_eq!(state.reconcile()[0].balance, 3);
    }

    #[test]
    fn test_all_lines_rejected_is_a_validation_error() {
        let ledger = stocked_ledger();
        let mut out = Vec::new();

        let err = run_at(
            &ledger,
            sell_args(&["CAFE - LOT 1:6", "CAFE - LOT 1:1:4.99"], true),
            now(),
            &Output::text(),
            &mut out,
        )
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.starts_with("No sale line was accepted"));
        assert!(ledger.load().unwrap().sales.is_empty());
    }

    #[test]
    fn test_json_result_carries_outcome() {
        let ledger = stocked_ledger();
        let mut out = Vec::new();

        run_at(
            &ledger,
            sell_args(&["CAFE - LOT 1:1"], true),
            now(),
            &Output::new(true, "R$"),
            &mut out,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["confirmed"], true);
        assert_eq!(value["outcome"]["status"], "committed");
        assert_eq!(value["outcome"]["sale_id"], "20240602093000");
    }
}
