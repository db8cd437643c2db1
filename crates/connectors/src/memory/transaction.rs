use crate::{memory::adapter::MemoryState, sql::base::error::DbError};
use model::{core::value::FieldValue, records::row::RowData};
use std::collections::BTreeMap;
use tokio::sync::OwnedMutexGuard;

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    staged: BTreeMap<String, Vec<RowData>>,
}

impl MemoryTransaction {
    pub(crate) fn new(guard: OwnedMutexGuard<MemoryState>) -> Self {
        let staged = guard.tables.clone();
        Self { guard, staged }
    }

    fn table_mut(&mut self, table: &str) -> Result<&mut Vec<RowData>, DbError> {
        self.staged
            .get_mut(table)
            .ok_or_else(|| DbError::UnknownTable(table.to_string()))
    }

    pub fn truncate(&mut self, table: &str) -> Result<(), DbError> {
        if self.guard.truncate_rejected.contains(table) {
            return Err(DbError::Write(format!(
                "cannot truncate table \"{table}\": referenced in a foreign key constraint"
            )));
        }
        self.table_mut(table)?.clear();
        Ok(())
    }

    pub fn delete_all(&mut self, table: &str) -> Result<u64, DbError> {
        let rows = self.table_mut(table)?;
        let deleted = rows.len() as u64;
        rows.clear();
        Ok(deleted)
    }

    pub fn insert_rows(
        &mut self,
        table: &str,
        columns: &[&str],
        rows: &[RowData],
    ) -> Result<u64, DbError> {
        if self.guard.insert_rejected.contains(table) {
            return Err(DbError::Write(format!(
                "insert into \"{table}\" rejected by the store"
            )));
        }

        let stored = self.table_mut(table)?;
        stored.extend(rows.iter().map(|row| {
            let field_values = columns
                .iter()
                .map(|col| FieldValue::new(col, row.get_value(col)))
                .collect();
            RowData::new(table, field_values)
        }));
        Ok(rows.len() as u64)
    }

    pub fn commit(mut self) {
        self.guard.tables = std::mem::take(&mut self.staged);
    }

    pub fn rollback(self) {}
}
