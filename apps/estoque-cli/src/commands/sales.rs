//! # Sales Command
//!
//! The full sales history, one line per sale record, in file order.

use std::io::Write;

use estoque_core::SaleRecord;
use estoque_store::{Ledger, TableStore};
use tracing::debug;

use super::Output;
use crate::error::CliError;

pub fn run<S: TableStore, W: Write>(ledger: &Ledger<S>, output: &Output, out: &mut W) -> Result<(), CliError> {
    let sales = ledger.load()?.sales;
    debug!(rows = sales.len(), "sales command");

    if output.json {
        return output.write_json(out, &sales);
    }
    write_sales(&sales, output, out)
}

fn write_sales<W: Write>(sales: &[SaleRecord], output: &Output, out: &mut W) -> Result<(), CliError> {
    if sales.is_empty() {
        writeln!(out, "No sales recorded.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<14} {:<19} {:<24} {:<8} {:>6} {:>12} {:>14}  {}",
        "SALE", "DATE", "PRODUCT", "LOT", "QTY", "UNIT PRICE", "TOTAL", "PAYMENT"
    )?;
    for s in sales {
        writeln!(
            out,
            "{:<14} {:<19} {:<24} {:<8} {:>6} {:>12} {:>14}  {}",
            s.sale_id.as_str(),
            s.sale_timestamp.format(estoque_core::SALE_TIMESTAMP_FORMAT).to_string(),
            s.product,
            s.lot,
            s.quantity,
            output.money(s.unit_price),
            output.money(s.total_value),
            s.payment_method,
        )?;
    }
    Ok(())
}
