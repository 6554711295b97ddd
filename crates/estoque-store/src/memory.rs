//! In-memory table store for tests and dry runs.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::StoreResult;
use crate::table::{Table, TableName, TableStore};

/// Keeps tables in a map. Missing tables read as [`Table::empty`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<TableName, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tables written so far.
    pub fn table_count(&self) -> usize {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl TableStore for MemoryStore {
    fn read_table(&self, name: TableName) -> StoreResult<Table> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(tables.get(&name).cloned().unwrap_or_else(|| Table::empty(name)))
    }

    fn write_table(&self, table: &Table) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables.insert(table.name, table.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.read_table(TableName::Sales).unwrap(), Table::empty(TableName::Sales));
        assert_eq!(store.table_count(), 0);

        let mut table = Table::empty(TableName::Sales);
        table.rows.push(vec!["x".to_string()]);
        store.write_table(&table).unwrap();

        assert_eq!(store.read_table(TableName::Sales).unwrap(), table);
        assert_eq!(store.table_count(), 1);
    }
}
