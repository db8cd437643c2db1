/// A record exactly as received from the wire: field name to untyped scalar,
/// in the order the sender wrote the fields.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;
