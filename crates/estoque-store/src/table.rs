//! # Tables
//!
//! The two persisted tables as plain string grids, and the store trait that
//! reads and writes them whole.
//!
//! ## Canonical Headers
//! ```text
//! stock_entries: Produto | Setor | Lote | Quantidade | Data de Entrada |
//!                Data de Validade | Custo (R$) | Valor de Venda (R$)
//!
//! sales:         Código da Venda | Produto | Lote | Quantidade |
//!                Método de Pagamento | Data da Venda | Valor Unitário (R$) |
//!                Valor Total (R$)
//! ```
//!
//! The labels are the persisted contract shared with the spreadsheet the
//! operators already keep, so they stay in Portuguese.

use std::fmt;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Column Names
// =============================================================================

pub mod columns {
    pub const PRODUCT: &str = "Produto";
    pub const SECTOR: &str = "Setor";
    pub const LOT: &str = "Lote";
    pub const QUANTITY: &str = "Quantidade";
    pub const ENTRY_DATE: &str = "Data de Entrada";
    pub const EXPIRY_DATE: &str = "Data de Validade";
    pub const UNIT_COST: &str = "Custo (R$)";
    pub const UNIT_SALE_PRICE: &str = "Valor de Venda (R$)";

    pub const SALE_ID: &str = "Código da Venda";
    pub const PAYMENT_METHOD: &str = "Método de Pagamento";
    pub const SALE_TIMESTAMP: &str = "Data da Venda";
    pub const UNIT_PRICE: &str = "Valor Unitário (R$)";
    pub const TOTAL_VALUE: &str = "Valor Total (R$)";
}

const STOCK_ENTRY_COLUMNS: [&str; 8] = [
    columns::PRODUCT,
    columns::SECTOR,
    columns::LOT,
    columns::QUANTITY,
    columns::ENTRY_DATE,
    columns::EXPIRY_DATE,
    columns::UNIT_COST,
    columns::UNIT_SALE_PRICE,
];

const SALE_COLUMNS: [&str; 8] = [
    columns::SALE_ID,
    columns::PRODUCT,
    columns::LOT,
    columns::QUANTITY,
    columns::PAYMENT_METHOD,
    columns::SALE_TIMESTAMP,
    columns::UNIT_PRICE,
    columns::TOTAL_VALUE,
];

// =============================================================================
// Table Name
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableName {
    Sales,
    StockEntries,
}

impl TableName {
    pub const ALL: [TableName; 2] = [TableName::Sales, TableName::StockEntries];

    pub const fn as_str(&self) -> &'static str {
        match self {
            TableName::Sales => "sales",
            TableName::StockEntries => "stock_entries",
        }
    }

    /// Canonical header row.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            TableName::Sales => &SALE_COLUMNS,
            TableName::StockEntries => &STOCK_ENTRY_COLUMNS,
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Table
// =============================================================================

/// A whole table: one header row plus string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: TableName,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Header row only, no data.
    pub fn empty(name: TableName) -> Self {
        Table {
            name,
            headers: name.columns().iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a header, or `SchemaMismatch`.
    pub fn column_index(&self, column: &str) -> StoreResult<usize> {
        self.headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| StoreError::SchemaMismatch {
                table: self.name,
                column: column.to_string(),
            })
    }

    /// Resolves every canonical column once, in canonical order.
    pub fn canonical_indexes(&self) -> StoreResult<Vec<usize>> {
        self.name
            .columns()
            .iter()
            .map(|column| self.column_index(column))
            .collect()
    }
}

// =============================================================================
// Store Trait
// =============================================================================

/// Whole-table persistence.
///
/// Reads return the full table; writes replace it. A table that does not
/// exist yet reads as [`Table::empty`].
pub trait TableStore {
    fn read_table(&self, name: TableName) -> StoreResult<Table>;

    fn write_table(&self, table: &Table) -> StoreResult<()>;
}

impl<S: TableStore + ?Sized> TableStore for &S {
    fn read_table(&self, name: TableName) -> StoreResult<Table> {
        (**self).read_table(name)
    }

    fn write_table(&self, table: &Table) -> StoreResult<()> {
        (**self).write_table(table)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
