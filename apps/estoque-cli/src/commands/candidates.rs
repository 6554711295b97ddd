//! # Candidates Command
//!
//! Lots the operator may sell from, one label per line, in the order the
//! checkout offers them.

use std::io::Write;

use estoque_store::{Ledger, TableStore};

use super::{optional_date, Output};
use crate::error::CliError;

pub fn run<S: TableStore, W: Write>(ledger: &Ledger<S>, output: &Output, out: &mut W) -> Result<(), CliError> {
    let candidates = ledger.load()?.candidates();

    if output.json {
        return output.write_json(out, &candidates);
    }

    if candidates.is_empty() {
        writeln!(out, "Nothing available for sale.")?;
        return Ok(());
    }

    for candidate in &candidates {
        writeln!(
            out,
            "{:<32} balance {:>5}  expires {}",
            candidate.label(),
            candidate.balance,
            optional_date(candidate.expiry_date),
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

    #[test]
    fn test_lists_lots_with_balance() {
        let ledger = Ledger::new(MemoryStore::new());
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        for quantity in [0, 5] {
            let intake = StockIntake {
                product: "LEITE".to_string(),
                sector: "FRIOS".to_string(),
                quantity,
                expiry_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
                unit_cost: Money::from_cents(300),
                unit_sale_price: Money::from_cents(550),
            };
            ledger.record_intake(intake, today).unwrap();
        }

        let mut out = Vec::new();
        run(&ledger, &Output::text(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("LEITE - LOT 2"));
        assert!(text.contains("expires 2024-07-01"));
    }

    #[test]
    fn test_empty_list_message() {
        let ledger = Ledger::new(MemoryStore::new());
        let mut out = Vec::new();
        run(&ledger, &Output::text(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Nothing available for sale.\n");
    }
}
