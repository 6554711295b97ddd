//! # Stock Command
//!
//! The reconciled view: one row per (product, lot, sector) with intake,
//! sold quantity, balance, entry and expiry dates, and cost.

use std::io::Write;

use estoque_core::{CoreError, ReconciledBalance};
use estoque_store::{Ledger, TableStore};
use tracing::debug;

use super::{optional_date, Output};
use crate::cli::StockArgs;
use crate::error::CliError;

pub fn run<S: TableStore, W: Write>(
    ledger: &Ledger<S>,
    args: StockArgs,
    output: &Output,
    out: &mut W,
) -> Result<(), CliError> {
    let mut balances = ledger.load()?.reconcile();

    if let Some(product) = args.product {
        let product = product.trim().to_uppercase();
        balances.retain(|b| b.product == product);
        if balances.is_empty() {
            return Err(CoreError::ProductNotFound(product).into());
        }
    }
    debug!(rows = balances.len(), "stock command");

    if output.json {
        return output.write_json(out, &balances);
    }
    write_balances(&balances, output, out)
}

pub(crate) fn write_balances<W: Write>(
    balances: &[ReconciledBalance],
    output: &Output,
    out: &mut W,
) -> Result<(), CliError> {
    if balances.is_empty() {
        writeln!(out, "No stock recorded.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<24} {:<12} {:<8} {:>6} {:>6} {:>7} {:<10} {:<10} {:>12} {:>14}",
        "PRODUCT", "SECTOR", "LOT", "IN", "SOLD", "BALANCE", "ENTERED", "EXPIRY", "UNIT COST", "TOTAL COST"
    )?;
    for b in balances {
        writeln!(
            out,
            "{:<24} {:<12} {:<8} {:>6} {:>6} {:>7} {:<10} {:<10} {:>12} {:>14}",
            b.product,
            b.sector.as_deref().unwrap_or("-"),
            b.lot,
            b.quantity_in,
            b.quantity_sold,
            b.balance,
            optional_date(b.entry_date),
            optional_date(b.expiry_date),
            output.optional_money(b.unit_cost),
            output.optional_money(b.total_cost),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::NaiveDate;
    use estoque_core::{Money, StockIntake};
    use estoque_store::MemoryStore;

    fn ledger_with(products: &[&str]) -> Ledger<MemoryStore> {
        let ledger = Ledger::new(MemoryStore::new());
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        for product in products {
            let intake = StockIntake {
                product: product.to_string(),
                sector: "S1".to_string(),
                quantity: 4,
                expiry_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                unit_cost: Money::from_cents(100),
                unit_sale_price: Money::from_cents(300),
            };
            ledger.record_intake(intake, today).unwrap();
        }
        ledger
    }

    #[test]
    fn test_filter_by_product_is_case_insensitive() {
        let ledger = ledger_with(&["A", "B"]);
        let mut out = Vec::new();
        let output = Output::new(true, "R$");

        run(&ledger, StockArgs { product: Some(" b ".into()) }, &output, &mut out).unwrap();

        let rows: Vec<ReconciledBalance> = serde_json::from_slice(&out).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product, "B");
        assert_eq!(rows[0].total_cost, Some(Money::from_cents(400)));
    }

    #[test]
    fn test_unknown_product_is_not_found() {
        let ledger = ledger_with(&["A"]);
        let mut out = Vec::new();

        let err = run(&ledger, StockArgs { product: Some("Z".into()) }, &Output::text(), &mut out).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: Z");
    }

    #[test]
    fn test_text_table_has_one_line_per_row() {
        let ledger = ledger_with(&["A", "B"]);
        let mut out = Vec::new();

        run(&ledger, StockArgs { product: None }, &Output::text(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("PRODUCT"));
        assert!(lines[1].starts_with("A "));
        assert!(lines[1].contains("R$ 4.00"));
        assert!(lines[1].contains("2024-06-01"));
    }

    #[test]
    fn test_empty_ledger_message() {
        let ledger = Ledger::new(MemoryStore::new());
        let mut out = Vec::new();

        run(&ledger, StockArgs { product: None }, &Output::text(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No stock recorded.\n");
    }
}
