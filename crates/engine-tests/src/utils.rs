use bigdecimal::BigDecimal;
use connectors::memory::MemoryAdapter;
use model::{core::value::Value, records::row::RowData};
use serde_json::json;
use std::str::FromStr;

/// `count` product records with codes `P0000..` and quantity `i.5`.
pub fn products(count: usize) -> Vec<serde_json::Value> {
    coded_products("P", count)
}

pub fn coded_products(prefix: &str, count: usize) -> Vec<serde_json::Value> {
    (0..count)
        .map(|i| json!({"code": format!("{prefix}{i:04}"), "quantity": format!("{i}.5")}))
        .collect()
}

/// Product codes as stored, in insertion order.
pub async fn product_codes(store: &MemoryAdapter) -> Vec<String> {
    column(store, "acc_product", "code")
        .await
        .iter()
        .filter_map(Value::as_string)
        .collect()
}

pub async fn stored_rows(store: &MemoryAdapter, table: &str) -> Vec<RowData> {
    store.rows(table).await.expect("table exists")
}

pub async fn assert_row_count(store: &MemoryAdapter, table: &str, expected: usize) {
    let rows = stored_rows(store, table).await;
    assert_eq!(rows.len(), expected, "row count of {table}");
}

/// Values of `field` across all stored rows, in insertion order.
pub async fn column(store: &MemoryAdapter, table: &str, field: &str) -> Vec<Value> {
    stored_rows(store, table)
        .await
        .iter()
        .map(|row| row.get_value(field))
        .collect()
}

pub fn decimal(text: &str) -> Value {
    Value::Decimal(BigDecimal::from_str(text).expect("valid decimal"))
}
