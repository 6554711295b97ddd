//! # Reporting View
//!
//! Business summary over reconciled stock and the full sales history. Pure
//! aggregation, nothing persisted.
//!
//! ## Figures
//! ```text
//! total_revenue          = Σ sale.total_value
//! total_cost_of_goods    = Σ sale.quantity × entry.unit_cost   (join on product, lot)
//! total_profit           = total_revenue − total_cost_of_goods
//! best_selling_product   = argmax_product Σ sale.quantity      (first in product order on ties)
//! inventory_valuation    = Σ balance.total_cost
//! ```
//!
//! A sale with no matching stock entry contributes zero cost and is counted
//! in `unmatched_sales`. When one lot sits in several sectors the first
//! matching entry in source order supplies the cost.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{LotKey, ReconciledBalance, SaleRecord, StockEntry};

/// The product with the most units sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSeller {
    pub product: String,
    pub quantity: i64,
}

/// Computes the best-selling product.
///
/// ## Errors
/// `CoreError::EmptyData` when there are no sales. Callers rendering a view
/// must catch it; [`BusinessReport::build`] does.
pub fn best_selling_product(sales: &[SaleRecord]) -> CoreResult<BestSeller> {
    let mut per_product: BTreeMap<&str, i64> = BTreeMap::new();
    for sale in sales {
        *per_product.entry(sale.product.as_str()).or_insert(0) += sale.quantity;
    }

    let mut best: Option<BestSeller> = None;
    for (product, quantity) in per_product {
        // strict > keeps the first product on ties
        if best.as_ref().map_or(true, |b| quantity > b.quantity) {
            best = Some(BestSeller {
                product: product.to_string(),
                quantity,
            });
        }
    }

    best.ok_or_else(|| CoreError::EmptyData {
        what: "best-selling product".to_string(),
    })
}

/// The business summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessReport {
    pub total_revenue: Money,
    pub total_cost_of_goods_sold: Money,
    pub total_profit: Money,
    pub inventory_valuation: Money,
    pub units_sold: i64,
    /// Distinct sale ids.
    pub transactions: usize,
    /// Sales whose (product, lot) has no stock entry.
    pub unmatched_sales: usize,
    pub best_selling: Option<BestSeller>,
    /// Conditions reported to the operator instead of failing the view.
    pub notices: Vec<String>,
}

impl BusinessReport {
    /// Builds the report. Never fails: an empty sales history becomes a
    /// notice and the stock figures are still filled in.
    pub fn build(
        balances: &[ReconciledBalance],
        sales: &[SaleRecord],
        entries: &[StockEntry],
    ) -> Self {
        // first entry per lot supplies the unit cost
        let mut cost_of: HashMap<LotKey, Money> = HashMap::with_capacity(entries.len());
        for entry in entries {
            cost_of.entry(entry.lot_key()).or_insert(entry.unit_cost);
        }

        let mut total_revenue = Money::zero();
        let mut total_cost = Money::zero();
        let mut unmatched_sales = 0;
        for sale in sales {
            total_revenue += sale.total_value;
            match cost_of.get(&sale.lot_key()) {
                Some(cost) => total_cost += cost.multiply_quantity(sale.quantity),
                None => unmatched_sales += 1,
            }
        }

        let mut notices = Vec::new();
        if unmatched_sales > 0 {
            warn!(unmatched_sales, "Sales without a matching stock entry count as zero cost");
            notices.push(format!(
                "{} sale line(s) have no matching stock entry; their cost counts as zero",
                unmatched_sales
            ));
        }

        let best_selling = match best_selling_product(sales) {
            Ok(best) => Some(best),
            Err(err) => {
                warn!(%err, "Best seller unavailable");
                notices.push(err.to_string());
                None
            }
        };

        let inventory_valuation = balances.iter().filter_map(|b| b.total_cost).sum();
        let transactions = sales.iter().map(|s| s.sale_id.as_str()).collect::<HashSet<_>>().len();

        BusinessReport {
            total_revenue,
            total_cost_of_goods_sold: total_cost,
            total_profit: total_revenue - total_cost,
            inventory_valuation,
            units_sold: sales.iter().map(|s| s.quantity).sum(),
            transactions,
            unmatched_sales,
            best_selling,
            notices,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
