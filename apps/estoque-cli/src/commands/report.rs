//! # Report Command
//!
//! Business summary followed by the current stock. An empty sales history
//! is shown as a notice; the stock section still renders.

use std::io::Write;

use estoque_core::{BusinessReport, ReconciledBalance};
use estoque_store::{Ledger, TableStore};
use serde::Serialize;

use super::stock::write_balances;
use super::Output;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ReportView<'a> {
    summary: &'a BusinessReport,
    stock: &'a [ReconciledBalance],
}

pub fn run<S: TableStore, W: Write>(ledger: &Ledger<S>, output: &Output, out: &mut W) -> Result<(), CliError> {
    let state = ledger.load()?;
    let balances = state.reconcile();
    let report = BusinessReport::build(&balances, &state.sales, &state.stock_entries);

    if output.json {
        let view = ReportView {
            summary: &report,
            stock: &balances,
        };
        return output.write_json(out, &view);
    }

    writeln!(out, "Revenue:             {}", output.money(report.total_revenue))?;
    writeln!(out, "Cost of goods sold:  {}", output.money(report.total_cost_of_goods_sold))?;
    writeln!(out, "Profit:              {}", output.money(report.total_profit))?;
    writeln!(out, "Inventory valuation: {}", output.money(report.inventory_valuation))?;
    writeln!(out, "Units sold:          {}", report.units_sold)?;
    writeln!(out, "Transactions:        {}", report.transactions)?;
    if let Some(best) = &report.best_selling {
        writeln!(out, "Best seller:         {} ({} units)", best.product, best.quantity)?;
    }
    if report.unmatched_sales > 0 {
        writeln!(out, "Sales without stock entry (zero cost): {}", report.unmatched_sales)?;
    }
    for notice in &report.notices {
        writeln!(out, "Note: {}", notice)?;
    }

    writeln!(out)?;
    write_balances(&balances, output, out)
}
