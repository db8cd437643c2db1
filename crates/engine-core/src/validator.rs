use crate::registry::TableDescriptor;
use model::{
    core::value::{FieldValue, Value},
    records::{record::RawRecord, row::RowData},
};
use serde::Serialize;

/// One problem found in an incoming record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub record_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub error: String,
    pub record: serde_json::Value,
}

#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub valid: Vec<RowData>,
    pub errors: Vec<ValidationError>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Applies `descriptor`'s rules to every record of a batch.
///
/// A record with any error contributes nothing to `valid`. Missing required
/// fields are all reported; field processing stops at the first field that
/// fails, so later fields of that record go unchecked.
pub fn validate(records: &[serde_json::Value], descriptor: &TableDescriptor) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for (index, record) in records.iter().enumerate() {
        let errors_before = outcome.errors.len();
        let mut push_error = |field: Option<&str>, error: String| {
            outcome.errors.push(ValidationError {
                record_index: index,
                field: field.map(str::to_string),
                error,
                record: record.clone(),
            });
        };

        let Some(fields): Option<&RawRecord> = record.as_object() else {
            push_error(
                None,
                format!("Record processing failed: expected an object, got {record}"),
            );
            continue;
        };

        for required in &descriptor.required {
            let missing = match fields.get(*required) {
                None | Some(serde_json::Value::Null) => true,
                Some(serde_json::Value::String(s)) => s.is_empty(),
                Some(_) => false,
            };
            if missing {
                push_error(
                    Some(*required),
                    format!("Required field \"{required}\" is missing or empty"),
                );
            }
        }

        let mut field_values = Vec::with_capacity(fields.len());
        for (name, raw) in fields {
            let Some(spec) = descriptor.field_spec(name) else {
                push_error(
                    Some(name.as_str()),
                    format!("Field \"{name}\" is not a column of {}", descriptor.name),
                );
                break;
            };

            let value = Value::from_json(raw);
            let value = match spec.coercion {
                Some(kind) => match kind.apply(value) {
                    Ok(coerced) => coerced,
                    Err(err) => {
                        push_error(
                            Some(name.as_str()),
                            format!("Field \"{name}\" processing failed: {err}"),
                        );
                        break;
                    }
                },
                None => value,
            };
            field_values.push(FieldValue::new(name, value));
        }

        if outcome.errors.len() == errors_before {
            outcome
                .valid
                .push(RowData::new(descriptor.name, field_values));
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::registry;
    use bigdecimal::BigDecimal;
    use serde_json::json;
    use std::str::FromStr;

    fn table(name: &str) -> &'static TableDescriptor {
        registry().lookup(name).unwrap()
    }

    #[test]
    fn test_valid_product_record_is_coerced() {
        let records = vec![json!({"code": "A1", "quantity": "10.5"})];
        let outcome = validate(&records, table("acc_product"));

        assert!(outcome.is_valid());
        assert_eq!(outcome.valid.len(), 1);
        let row = &outcome.valid[0];
        assert_eq!(row.get_value("code"), Value::String("A1".into()));
        assert_eq!(
            row.get_value("quantity"),
            Value::Decimal(BigDecimal::from_str("10.50000").unwrap())
        );
    }

    #[test]
    fn test_float_key_becomes_integer() {
        let records = vec![json!({"slno": 12.0})];
        let outcome = validate(&records, table("acc_invmast"));
        assert_eq!(outcome.valid[0].get_value("slno"), Value::Int(12));
    }

    #[test]
    fn test_field_order_follows_the_record() {
        let records = vec![json!({"quantity": 1, "name": "Bolt", "code": "B7"})];
        let outcome = validate(&records, table("acc_product"));
        assert_eq!(outcome.valid[0].field_names(), vec!["quantity", "name", "code"]);
    }

    #[test]
    fn test_missing_required_fields_exclude_record_once() {
        let records = vec![
            json!({"invno": 1, "code": "X"}),
            json!({"quantity": "2"}),
            json!({"invno": "", "code": null}),
        ];
        let outcome = validate(&records, table("acc_invdetails"));

        assert_eq!(outcome.valid.len(), 1);
        let indexes: Vec<_> = outcome.errors.iter().map(|e| e.record_index).collect();
        assert_eq!(indexes, vec![1, 1, 2, 2]);
        assert_eq!(outcome.errors[0].field.as_deref(), Some("invno"));
        assert_eq!(outcome.errors[1].field.as_deref(), Some("code"));
        assert_eq!(outcome.errors[0].record, records[1]);
    }

    #[test]
    fn test_coercion_failure_stops_the_record() {
        let records = vec![json!({"code": "A1", "quantity": "lots", "billedcost": "also bad"})];
        let outcome = validate(&records, table("acc_product"));

        assert!(outcome.valid.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].field.as_deref(), Some("quantity"));
        assert!(outcome.errors[0].error.starts_with("Field \"quantity\" processing failed"));
    }

    #[test]
    fn test_whitespace_only_required_value_is_present() {
        let records = vec![json!({"id": "  ", "pass_field": "x"})];
        let outcome = validate(&records, table("acc_users"));
        assert!(outcome.is_valid());
        assert_eq!(outcome.valid[0].get_value("id"), Value::String(String::new()));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let records = vec![json!({"code": "A1", "colour": "red"})];
        let outcome = validate(&records, table("acc_product"));
        assert!(outcome.valid.is_empty());
        assert_eq!(outcome.errors[0].field.as_deref(), Some("colour"));
    }

    #[test]
    fn test_non_object_record_is_rejected() {
        let records = vec![json!(["A1", 2]), json!({"code": "A2"})];
        let outcome = validate(&records, table("acc_product"));
        assert_eq!(outcome.valid.len(), 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].record_index, 0);
        assert!(outcome.errors[0].field.is_none());
    }

    #[test]
    fn test_nullable_fields_may_be_null() {
        let records = vec![json!({"slno": "5", "invdate": null})];
        let outcome = validate(&records, table("acc_invmast"));
        assert!(outcome.is_valid());
        assert_eq!(outcome.valid[0].get_value("invdate"), Value::Null);
    }
}
