//! Table stores
//!
//! Tables are persisted whole, keyed by unit and category. The in-memory
//! store backs tests and one-shot pipelines; the file store keeps one JSON
//! document per table under the `tables/` directory. Concurrent writers to
//! the same key are last-writer-wins.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetTable, TableKey};

use super::file_io::{read_json_optional, remove_if_exists, write_json_atomic};

/// Read/write access to stored tables
pub trait TableStore {
    fn get(&self, key: &TableKey) -> BudgetResult<Option<BudgetTable>>;

    /// Insert or replace the table under its own key
    fn put(&self, table: &BudgetTable) -> BudgetResult<()>;

    /// Remove a table; returns whether it existed
    fn remove(&self, key: &TableKey) -> BudgetResult<bool>;

    /// All stored keys, sorted
    fn keys(&self) -> BudgetResult<Vec<TableKey>>;

    /// Like [`get`](Self::get) but failing with `TableNotFound`
    fn require(&self, key: &TableKey) -> BudgetResult<BudgetTable> {
        self.get(key)?
            .ok_or_else(|| BudgetError::table_not_found(key.unit.clone(), key.category))
    }
}

fn lock_err(e: impl std::fmt::Display) -> BudgetError {
    BudgetError::Storage(format!("Failed to acquire lock: {}", e))
}

/// Table store held entirely in memory
#[derive(Default)]
pub struct MemoryTableStore {
    tables: RwLock<HashMap<TableKey, BudgetTable>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableStore for MemoryTableStore {
    fn get(&self, key: &TableKey) -> BudgetResult<Option<BudgetTable>> {
        let tables = self.tables.read().map_err(lock_err)?;
        Ok(tables.get(key).cloned())
    }

    fn put(&self, table: &BudgetTable) -> BudgetResult<()> {
        let mut tables = self.tables.write().map_err(lock_err)?;
        tables.insert(table.key(), table.clone());
        Ok(())
    }

    fn remove(&self, key: &TableKey) -> BudgetResult<bool> {
        let mut tables = self.tables.write().map_err(lock_err)?;
        Ok(tables.remove(key).is_some())
    }

    fn keys(&self) -> BudgetResult<Vec<TableKey>> {
        let tables = self.tables.read().map_err(lock_err)?;
        let mut keys: Vec<_> = tables.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// Table store with one JSON file per table
pub struct FileTableStore {
    dir: PathBuf,
}

impl FileTableStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &TableKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.file_stem()))
    }
}

impl TableStore for FileTableStore {
    fn get(&self, key: &TableKey) -> BudgetResult<Option<BudgetTable>> {
        read_json_optional(self.path_for(key))
    }

    fn put(&self, table: &BudgetTable) -> BudgetResult<()> {
        write_json_atomic(self.path_for(&table.key()), table)
    }

    fn remove(&self, key: &TableKey) -> BudgetResult<bool> {
        remove_if_exists(self.path_for(key))
    }

    fn keys(&self) -> BudgetResult<Vec<TableKey>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            BudgetError::Storage(format!("Failed to list {}: {}", self.dir.display(), e))
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| BudgetError::Storage(format!("Failed to list tables: {}", e)))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            // The stem is lossy, so the key comes from the document itself
            if let Some(table) = read_json_optional::<BudgetTable, _>(&path)? {
                keys.push(table.key());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetCategory, LineItem, Money};
    use tempfile::TempDir;

    fn table(unit: &str, category: BudgetCategory) -> BudgetTable {
        let mut table = BudgetTable::new(unit, category);
        let mut item = LineItem::blank(category);
        item.total = Money::from_units(640);
        table.push(item).unwrap();
        table
    }

    fn exercise(store: &dyn TableStore) {
        let vpo = table("VPO", BudgetCategory::Missions);
        let vpe = table("VPE", BudgetCategory::Consulting);
        store.put(&vpo).unwrap();
        store.put(&vpe).unwrap();

        assert_eq!(store.get(&vpo.key()).unwrap(), Some(vpo.clone()));
        assert_eq!(store.keys().unwrap(), vec![vpe.key(), vpo.key()]);

        let missing = TableKey::new("VPO", BudgetCategory::Consulting);
        assert!(store.get(&missing).unwrap().is_none());
        assert!(store.require(&missing).unwrap_err().is_not_found());

        assert!(store.remove(&vpo.key()).unwrap());
        assert!(!store.remove(&vpo.key()).unwrap());
        assert_eq!(store.keys().unwrap(), vec![vpe.key()]);
    }

    #[test]
    fn test_memory_store() {
        exercise(&MemoryTableStore::new());
    }

    #[test]
    fn test_file_store() {
        let temp_dir = TempDir::new().unwrap();
        exercise(&FileTableStore::new(temp_dir.path().join("tables")));
    }

    #[test]
    fn test_file_store_keeps_unit_spelling() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileTableStore::new(temp_dir.path().to_path_buf());
        let t = table("VP Operaciones", BudgetCategory::Missions);
        store.put(&t).unwrap();
        assert_eq!(store.keys().unwrap()[0].unit, "VP Operaciones");
    }
}
