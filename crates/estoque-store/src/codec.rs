//! # Row Codec
//!
//! Converts between string rows and domain types.
//!
//! ## Cell Formats
//! ```text
//! ┌──────────────────────┬──────────────────────────┬──────────────────────┐
//! │ Field                │ Written as               │ Also accepted        │
//! ├──────────────────────┼──────────────────────────┼──────────────────────┤
//! │ quantity             │ 10                       │ 10.0, " 10 "         │
//! │ dates                │ 2025-01-01               │ 2025-01-01 00:00:00  │
//! │ sale timestamp       │ 2025-01-01 14:05:09      │ 2025-01-01T14:05:09  │
//! │ money                │ 12.50                    │ 12,50  1.234,56  R$  │
//! │ payment method       │ Cartão de Crédito        │ credit, pix, ...     │
//! └──────────────────────┴──────────────────────────┴──────────────────────┘
//! ```
//!
//! Reading is lenient because operators also edit the sheet by hand.
//! Writing always produces the left-hand column.

use chrono::{NaiveDate, NaiveDateTime};
use estoque_core::{
    Money, PaymentMethod, SaleId, SaleRecord, StockEntry, DATE_FORMAT, MAX_QUANTITY,
    SALE_TIMESTAMP_FORMAT,
};

use crate::error::{StoreError, StoreResult};
use crate::table::{columns, Table, TableName};

// =============================================================================
// Encode
// =============================================================================

pub fn encode_stock_entry(entry: &StockEntry) -> Vec<String> {
    vec![
        entry.product.clone(),
        entry.sector.clone(),
        entry.lot.clone(),
        entry.quantity.to_string(),
        entry.entry_date.format(DATE_FORMAT).to_string(),
        entry.expiry_date.format(DATE_FORMAT).to_string(),
        entry.unit_cost.to_string(),
        entry.unit_sale_price.to_string(),
    ]
}

pub fn encode_sale(record: &SaleRecord) -> Vec<String> {
    vec![
        record.sale_id.to_string(),
        record.product.clone(),
        record.lot.clone(),
        record.quantity.to_string(),
        record.payment_method.label().to_string(),
        record.sale_timestamp.format(SALE_TIMESTAMP_FORMAT).to_string(),
        record.unit_price.to_string(),
        record.total_value.to_string(),
    ]
}

/// Builds a whole stock-entries table with canonical headers.
pub fn stock_entries_table(entries: &[StockEntry]) -> Table {
    let mut table = Table::empty(TableName::StockEntries);
    table.rows = entries.iter().map(encode_stock_entry).collect();
    table
}

/// Builds a whole sales table with canonical headers.
pub fn sales_table(sales: &[SaleRecord]) -> Table {
    let mut table = Table::empty(TableName::Sales);
    table.rows = sales.iter().map(encode_sale).collect();
    table
}

// =============================================================================
// Decode
// =============================================================================

/// Reads one row by header name, tagging failures with row and column.
struct RowReader<'a> {
    table: TableName,
    row: usize,
    cells: &'a [String],
    indexes: &'a [usize],
}

impl<'a> RowReader<'a> {
    /// Cell for the n-th canonical column. Short rows read as blank.
    fn cell(&self, n: usize) -> &'a str {
        self.indexes
            .get(n)
            .and_then(|&i| self.cells.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    fn column(&self, n: usize) -> &'static str {
        self.table.columns().get(n).copied().unwrap_or("?")
    }

    fn malformed(&self, n: usize, reason: impl Into<String>) -> StoreError {
        StoreError::MalformedRow {
            table: self.table,
            row: self.row,
            column: self.column(n).to_string(),
            reason: reason.into(),
        }
    }

    fn text(&self, n: usize) -> StoreResult<String> {
        let value = self.cell(n);
        if value.is_empty() {
            return Err(self.malformed(n, "empty cell"));
        }
        Ok(value.to_string())
    }

    fn quantity(&self, n: usize) -> StoreResult<i64> {
        parse_quantity(self.cell(n)).map_err(|reason| self.malformed(n, reason))
    }

    fn money(&self, n: usize) -> StoreResult<Money> {
        self.cell(n)
            .parse::<Money>()
            .map_err(|e| self.malformed(n, e.to_string()))
    }

    fn date(&self, n: usize) -> StoreResult<NaiveDate> {
        parse_date(self.cell(n)).map_err(|reason| self.malformed(n, reason))
    }

    fn timestamp(&self, n: usize) -> StoreResult<NaiveDateTime> {
        parse_timestamp(self.cell(n)).map_err(|reason| self.malformed(n, reason))
    }

    fn payment_method(&self, n: usize) -> StoreResult<PaymentMethod> {
        self.cell(n)
            .parse::<PaymentMethod>()
            .map_err(|e| self.malformed(n, e.to_string()))
    }
}

fn rows<'a>(table: &'a Table, indexes: &'a [usize]) -> impl Iterator<Item = RowReader<'a>> + 'a {
    table
        .rows
        .iter()
        .enumerate()
        // blank lines left behind by hand edits
        .filter(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()))
        .map(move |(i, cells)| RowReader {
            table: table.name,
            row: i + 1,
            cells,
            indexes,
        })
}

/// Decodes every stock entry, in file order.
pub fn decode_stock_entries(table: &Table) -> StoreResult<Vec<StockEntry>> {
    let indexes = table.canonical_indexes()?;

    rows(table, &indexes)
        .map(|r| -> StoreResult<StockEntry> {
            Ok(StockEntry {
                product: r.text(0)?,
                sector: r.cell(1).to_string(),
                lot: r.text(2)?,
                quantity: r.quantity(3)?,
                entry_date: r.date(4)?,
                expiry_date: r.date(5)?,
                unit_cost: r.money(6)?,
                unit_sale_price: r.money(7)?,
            })
        })
        .collect()
}

/// Decodes every sale record, in file order.
pub fn decode_sales(table: &Table) -> StoreResult<Vec<SaleRecord>> {
    let indexes = table.canonical_indexes()?;

    rows(table, &indexes)
        .map(|r| -> StoreResult<SaleRecord> {
            Ok(SaleRecord {
                sale_id: SaleId::from(r.text(0)?),
                product: r.text(1)?,
                lot: r.text(2)?,
                quantity: r.quantity(3)?,
                payment_method: r.payment_method(4)?,
                sale_timestamp: r.timestamp(5)?,
                unit_price: r.money(6)?,
                total_value: r.money(7)?,
            })
        })
        .collect()
}

// =============================================================================
// Cell Parsers
// =============================================================================

fn parse_quantity(value: &str) -> Result<i64, String> {
    if value.is_empty() {
        return Err("empty cell".to_string());
    }
    let n = match value.parse::<i64>() {
        Ok(n) => n,
        // "10.0" from a spreadsheet that stored the number as float
        Err(_) => match value.split_once('.') {
            Some((whole, frac)) if frac.chars().all(|c| c == '0') => whole
                .parse::<i64>()
                .map_err(|_| format!("'{}' is not a whole number", value))?,
            _ => return Err(format!("'{}' is not a whole number", value)),
        },
    };
    if !(-MAX_QUANTITY..=MAX_QUANTITY).contains(&n) {
        return Err(format!("'{}' is outside -{max}..={max}", value, max = MAX_QUANTITY));
    }
    Ok(n)
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    if value.is_empty() {
        return Err("empty cell".to_string());
    }
    // a date written as a timestamp keeps only its date part
    let date_part = value.split(|c: char| c == ' ' || c == 'T').next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map_err(|e| format!("'{}' is not a date: {}", value, e))
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    if value.is_empty() {
        return Err("empty cell".to_string());
    }
    NaiveDateTime::parse_from_str(value, SALE_TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| format!("'{}' is not a timestamp: {}", value, e))
}

// =============================================================================
// Unit Tests
// =============================================================================
