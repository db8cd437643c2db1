//! Static table configuration.
//!
//! The registry is built once at first use and never mutated. Each
//! descriptor lists the destination columns in insert order, the fields a
//! record must carry, and the coercion rule for each field that has one.

use crate::coercion::CoercionKind;
use lazy_static::lazy_static;
use serde::Serialize;

const QUANTITY: CoercionKind = CoercionKind::DecimalQuantity {
    precision: 15,
    scale: 5,
};
const COST: CoercionKind = CoercionKind::DecimalQuantity {
    precision: 14,
    scale: 5,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub coercion: Option<CoercionKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableDescriptor {
    pub name: &'static str,
    pub model: &'static str,
    pub fields: Vec<FieldSpec>,
    pub required: Vec<&'static str>,
}

impl TableDescriptor {
    fn new(name: &'static str, model: &'static str) -> Self {
        Self {
            name,
            model,
            fields: Vec::new(),
            required: Vec::new(),
        }
    }

    fn field(mut self, name: &'static str) -> Self {
        self.fields.push(FieldSpec {
            name,
            coercion: None,
        });
        self
    }

    fn coerced(mut self, name: &'static str, coercion: CoercionKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            coercion: Some(coercion),
        });
        self
    }

    fn require(mut self, fields: &[&'static str]) -> Self {
        self.required.extend_from_slice(fields);
        self
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| *r == name)
    }

    /// Destination columns in insert order.
    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

pub struct TableRegistry {
    tables: Vec<TableDescriptor>,
}

impl TableRegistry {
    fn builtin() -> Self {
        use CoercionKind::*;

        let tables = vec![
            TableDescriptor::new("acc_users", "AccUsers")
                .coerced("id", TrimmedString)
                .coerced("pass_field", TrimmedString)
                .coerced("role", TrimmedString)
                .require(&["id", "pass_field"]),
            TableDescriptor::new("acc_invmast", "AccInvMast")
                .coerced("slno", IntegerKey)
                .coerced("invdate", IsoDate)
                .require(&["slno"]),
            TableDescriptor::new("acc_invdetails", "AccInvDetails")
                .coerced("invno", IntegerKey)
                .field("code")
                .coerced("quantity", QUANTITY)
                .require(&["invno", "code"]),
            TableDescriptor::new("acc_product", "AccProduct")
                .field("code")
                .field("name")
                .coerced("quantity", QUANTITY)
                .coerced("openingquantity", QUANTITY)
                .field("stockcatagory")
                .field("unit")
                .field("product")
                .field("brand")
                .coerced("billedcost", COST)
                .coerced("basicprice", QUANTITY)
                .coerced("partqty", QUANTITY)
                .require(&["code"]),
            TableDescriptor::new("acc_purchasemaster", "AccPurchaseMaster")
                .coerced("slno", IntegerKey)
                .coerced("date", IsoDate)
                .coerced("pdate", IsoDate)
                .require(&["slno"]),
            TableDescriptor::new("acc_purchasedetails", "AccPurchaseDetails")
                .coerced("billno", IntegerKey)
                .field("code")
                .coerced("quantity", QUANTITY)
                .require(&["billno", "code"]),
            TableDescriptor::new("acc_production", "AccProduction")
                .field("productionno")
                .coerced("date", IsoDate)
                .require(&["productionno"]),
            TableDescriptor::new("acc_productiondetails", "AccProductionDetails")
                .field("masterno")
                .field("code")
                .coerced("qty", QUANTITY)
                .require(&["masterno", "code"]),
        ];

        TableRegistry { tables }
    }

    /// Case-insensitive lookup by table identifier.
    pub fn lookup(&self, table: &str) -> Option<&TableDescriptor> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(table.trim()))
    }

    pub fn supported_tables(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.iter()
    }
}

lazy_static! {
    static ref REGISTRY: TableRegistry = TableRegistry::builtin();
}

pub fn registry() -> &'static TableRegistry {
    &REGISTRY
}
