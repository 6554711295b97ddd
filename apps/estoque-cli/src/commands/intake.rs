//! # Intake Command
//!
//! Records received stock. The product's next lot label is assigned by the
//! ledger; the entry date is today.

use std::io::Write;

use chrono::NaiveDate;
use estoque_core::StockIntake;
use estoque_store::{Ledger, TableStore};
use tracing::debug;

use super::Output;
use crate::cli::IntakeArgs;
use crate::error::CliError;

pub fn run<S: TableStore, W: Write>(
    ledger: &Ledger<S>,
    args: IntakeArgs,
    output: &Output,
    out: &mut W,
) -> Result<(), CliError> {
    run_on(ledger, args, chrono::Local::now().date_naive(), output, out)
}

pub(crate) fn run_on<S: TableStore, W: Write>(
    ledger: &Ledger<S>,
    args: IntakeArgs,
    today: NaiveDate,
    output: &Output,
    out: &mut W,
) -> Result<(), CliError> {
    debug!(product = %args.product, quantity = args.quantity, "intake command");

    let intake = StockIntake {
        product: args.product,
        sector: args.sector,
        quantity: args.quantity,
        expiry_date: args.expiry,
        unit_cost: args.cost,
        unit_sale_price: args.price,
    };
    let entry = ledger.record_intake(intake, today)?;

    if output.json {
        return output.write_json(out, &entry);
    }

    writeln!(
        out,
        "Recorded {} {} in sector {}: {} units, expires {}, cost {}, price {}",
        entry.product,
        entry.lot,
        entry.sector,
        entry.quantity,
        entry.expiry_date,
        output.money(entry.unit_cost),
        output.money(entry.unit_sale_price),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use estoque_core::Money;
    use estoque_store::MemoryStore;

    fn args(product: &str, quantity: i64) -> IntakeArgs {
        IntakeArgs {
            product: product.to_string(),
            sector: "mercearia".to_string(),
            quantity,
            expiry: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            cost: Money::from_cents(250),
            price: Money::from_cents(600),
        }
    }

    #[test]
    fn test_intake_prints_assigned_lot() {
        let ledger = Ledger::new(MemoryStore::new());
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut out = Vec::new();

        run_on(&ledger, args("cafe", 10), today, &Output::text(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Recorded CAFE LOT 1 in sector MERCEARIA: 10 units, expires 2025-03-01, cost R$ 2.50, price R$ 6.00\n"
        );
    }

    #[test]
    fn test_invalid_intake_is_a_validation_error() {
        let ledger = Ledger::new(MemoryStore::new());
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut out = Vec::new();

        let err = run_on(&ledger, args("", 10), today, &Output::text(), &mut out).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(out.is_empty());
    }
}
