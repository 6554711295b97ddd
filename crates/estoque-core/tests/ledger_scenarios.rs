//! End-to-end ledger scenarios on pure state: intake, sale, report.

use chrono::{NaiveDate, NaiveDateTime};
use estoque_core::{
    best_selling_product, build_sale_batch, build_stock_entry, CoreError, LedgerState, Money,
    PaymentMethod, SaleLineRequest, StockIntake, ValidationError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn now() -> NaiveDateTime {
    date(2024, 6, 2).and_hms_opt(14, 5, 9).unwrap()
}

fn intake(product: &str, quantity: i64) -> StockIntake {
    StockIntake {
        product: product.to_string(),
        sector: "S1".to_string(),
        quantity,
        expiry_date: date(2025, 1, 1),
        unit_cost: Money::from_cents(200),
        unit_sale_price: Money::from_cents(500),
    }
}

fn receive(state: &LedgerState, product: &str, quantity: i64) -> LedgerState {
    let entry = build_stock_entry(intake(product, quantity), &state.stock_entries, date(2024, 6, 1))
        .unwrap();
    state.with_stock_entry(entry)
}

fn line(product: &str, lot: &str, quantity: i64, price: i64) -> SaleLineRequest {
    SaleLineRequest {
        product: product.to_string(),
        lot: lot.to_string(),
        quantity,
        payment_method: PaymentMethod::Pix,
        unit_price: Money::from_cents(price),
    }
}

fn sell(state: &LedgerState, lines: &[SaleLineRequest]) -> LedgerState {
    let batch = build_sale_batch(lines, &state.reconcile(), &state.stock_entries, now()).unwrap();
    state.check_batch(&batch).unwrap();
    state.with_sales(&batch)
}

#[test]
fn intake_then_sale_then_report() {
    let state = receive(&LedgerState::default(), "A", 10);

    let balances = state.reconcile();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].lot, "LOT 1");
    assert_eq!(balances[0].sector.as_deref(), Some("S1"));
    assert_eq!(balances[0].balance, 10);
    assert_eq!(balances[0].total_cost, Some(Money::from_cents(2000)));

    let state = sell(&state, &[line("A", "LOT 1", 4, 500)]);

    let balances = state.reconcile();
    assert_eq!(balances[0].balance, 6);
    assert_eq!(balances[0].total_cost, Some(Money::from_cents(1200)));

    let report = state.report();
    assert_eq!(report.total_revenue, Money::from_cents(2000));
    assert_eq!(report.total_profit, Money::from_cents(1200));
    assert_eq!(report.best_selling.map(|b| b.product), Some("A".to_string()));
}

#[test]
fn third_intake_gets_lot_three() {
    let state = receive(&LedgerState::default(), "A", 1);
    let state = receive(&state, "A", 1);
    let state = receive(&state, "a ", 1);

    let lots: Vec<&str> = state.stock_entries.iter().map(|e| e.lot.as_str()).collect();
    assert_eq!(lots, vec!["LOT 1", "LOT 2", "LOT 3"]);

    // another product starts its own numbering
    let state = receive(&state, "B", 1);
    assert_eq!(state.stock_entries[3].lot, "LOT 1");
}

#[test]
fn empty_sales_history_still_renders_report() {
    let state = receive(&LedgerState::default(), "A", 10);

    assert!(matches!(
        best_selling_product(&state.sales),
        Err(CoreError::EmptyData { .. })
    ));

    let report = state.report();
    assert!(report.best_selling.is_none());
    assert_eq!(report.notices, vec!["No data to compute best-selling product".to_string()]);
    assert_eq!(report.inventory_valuation, Money::from_cents(2000));
}

#[test]
fn confirmed_batch_only_moves_sold_lots() {
    let state = receive(&LedgerState::default(), "A", 10);
    let state = receive(&state, "A", 5);
    let state = receive(&state, "B", 7);
    let before = state.reconcile();

    let after_state = sell(&state, &[line("A", "LOT 2", 3, 500), line("B", "LOT 1", 7, 650)]);
    let after = after_state.reconcile();

    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(after.iter()) {
        let sold = match (b.product.as_str(), b.lot.as_str()) {
            ("A", "LOT 2") => 3,
            ("B", "LOT 1") => 7,
            _ => 0,
        };
        assert_eq!(b.balance - a.balance, sold, "{} {}", b.product, b.lot);
    }

    // the depleted lot drops off the offered list
    let labels: Vec<String> = after_state.candidates().iter().map(|c| c.label()).collect();
    assert_eq!(labels, vec!["A - LOT 1", "A - LOT 2"]);
}

#[test]
fn underpriced_and_oversized_lines_never_become_records() {
    let state = receive(&LedgerState::default(), "A", 3);
    let batch = build_sale_batch(
        &[line("A", "LOT 1", 1, 499), line("A", "LOT 1", 4, 500)],
        &state.reconcile(),
        &state.stock_entries,
        now(),
    )
    .unwrap();

    assert!(batch.records.is_empty());
    assert!(matches!(batch.rejected[0].reason, ValidationError::PriceBelowFloor { .. }));
    assert!(matches!(
        batch.rejected[1].reason,
        ValidationError::QuantityExceedsBalance { .. }
    ));
    assert_eq!(state.with_sales(&batch), state);
}
