use crate::sql::base::dialect::Dialect;
use model::records::row::RowData;

pub struct QueryGenerator<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> QueryGenerator<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    pub fn truncate(&self, table: &str) -> String {
        format!("TRUNCATE TABLE {}", self.dialect.quote_identifier(table))
    }

    pub fn delete_all(&self, table: &str) -> String {
        format!("DELETE FROM {}", self.dialect.quote_identifier(table))
    }

    pub fn count(&self, table: &str) -> String {
        format!("SELECT COUNT(*) FROM {}", self.dialect.quote_identifier(table))
    }

    /// Renders one multi-row INSERT with inline literals.
    ///
    /// Literals rather than bind parameters keep a chunk to a single statement
    /// no matter how many columns it has, and let the server cast each literal
    /// to the column type (numeric, date, varchar).
    pub fn insert_batch(&self, table: &str, columns: &[&str], rows: &[RowData]) -> String {
        if rows.is_empty() || columns.is_empty() {
            return String::new();
        }

        let mut sql = String::from("INSERT INTO ");
        sql.push_str(&self.dialect.quote_identifier(table));
        sql.push_str(" (");
        let quoted_columns: Vec<String> = columns
            .iter()
            .map(|c| self.dialect.quote_identifier(c))
            .collect();
        sql.push_str(&quoted_columns.join(", "));
        sql.push_str(") VALUES ");

        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push('(');
            for (j, value) in row.values_for(columns).iter().enumerate() {
                if j > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(&value.to_string());
            }
            sql.push(')');
        }

        sql
    }
}
