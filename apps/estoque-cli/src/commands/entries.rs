//! # Entries Command
//!
//! The intake registry as recorded, one line per stock entry, in file order.

use std::io::Write;

use estoque_core::StockEntry;
use estoque_store::{Ledger, TableStore};
use tracing::debug;

use super::Output;
use crate::error::CliError;

pub fn run<S: TableStore, W: Write>(ledger: &Ledger<S>, output: &Output, out: &mut W) -> Result<(), CliError> {
    let entries = ledger.load()?.stock_entries;
    debug!(rows = entries.len(), "entries command");

    if output.json {
        return output.write_json(out, &entries);
    }
    write_entries(&entries, output, out)
}

fn write_entries<W: Write>(entries: &[StockEntry], output: &Output, out: &mut W) -> Result<(), CliError> {
    if entries.is_empty() {
        writeln!(out, "No stock entries recorded.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<24} {:<12} {:<8} {:>6} {:<10} {:<10} {:>12} {:>12}",
        "PRODUCT", "SECTOR", "LOT", "QTY", "ENTERED", "EXPIRY", "UNIT COST", "SALE PRICE"
    )?;
    for e in entries {
        writeln!(
            out,
            "{:<24} {:<12} {:<8} {:>6} {:<10} {:<10} {:>12} {:>12}",
            e.product,
            e.sector,
            e.lot,
            e.quantity,
            e.entry_date,
            e.expiry_date,
            output.money(e.unit_cost),
            output.money(e.unit_sale_price),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use estoque_core::{Money, StockIntake};
    use estoque_store::MemoryStore;

    fn ledger_with(products: &[&str]) -> Ledger<MemoryStore> {
        let ledger = Ledger::new(MemoryStore::new());
        for (day, product) in (1..).zip(products) {
            let intake = StockIntake {
                product: product.to_string(),
                sector: "S1".to_string(),
                quantity: 2,
                expiry_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                unit_cost: Money::from_cents(150),
                unit_sale_price: Money::from_cents(400),
            };
            ledger
                .record_intake(intake, NaiveDate::from_ymd_opt(2024, 6, day).unwrap())
                .unwrap();
        }
        ledger
    }

    #[test]
    fn test_lists_entries_in_file_order() {
        let ledger = ledger_with(&["ZETA", "ALFA", "ZETA"]);
        let mut out = Vec::new();

        run(&ledger, &Output::text(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("PRODUCT"));
        assert!(lines[1].starts_with("ZETA") && lines[1].contains("LOT 1") && lines[1].contains("2024-06-01"));
        assert!(lines[2].starts_with("ALFA"));
        assert!(lines[3].starts_with("ZETA") && lines[3].contains("LOT 2"));
        assert!(lines[3].contains("R$ 1.50") && lines[3].contains("R$ 4.00"));
    }

    #[test]
    fn test_json_is_the_raw_entries() {
        let ledger = ledger_with(&["A", "B"]);
        let mut out = Vec::new();

        run(&ledger, &Output::new(true, "R$"), &mut out).unwrap();

        let entries: Vec<StockEntry> = serde_json::from_slice(&out).unwrap();
        assert_eq!(entries, ledger.load().unwrap().stock_entries);
    }

    #[test]
    fn test_empty_registry_message() {
        let ledger = Ledger::new(MemoryStore::new());
        let mut out = Vec::new();
        run(&ledger, &Output::text(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No stock entries recorded.\n");
    }
}
