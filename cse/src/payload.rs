use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};

use crate::constants::{GENERATION_TIME_FIELD, GENERATION_TIME_FORMAT};
use crate::error::{CseError, CseResult};

/// A scalar field value.
///
/// The wire payload only ever carries JSON scalars; arrays and nested
/// objects are unrepresentable by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Number),
    Bool(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(s) => Value::String(s),
            FieldValue::Number(n) => Value::Number(n),
            FieldValue::Bool(b) => Value::Bool(b),
        }
    }
}

/// The canonical plaintext payload: caller-supplied fields in insertion
/// order, with `generationtime` appended at serialization time.
#[derive(Debug, Clone, Default)]
pub(crate) struct Payload {
    fields: Map<String, Value>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. A later insert with the same name wins.
    pub fn insert(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields.insert(name.to_owned(), value.into().into());
    }

    /// Add a field only when a value is present.
    pub fn insert_opt<V: Into<FieldValue>>(&mut self, name: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(name, value);
        }
    }

    /// Serialize to the single-line JSON plaintext for the given instant.
    ///
    /// The public pipeline always passes `Utc::now()`; the parameter exists
    /// so tests can pin the exact plaintext bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CseError::SerializationFailure`] on an encoder error.
    pub fn to_json(&self, generated_at: DateTime<Utc>) -> CseResult<String> {
        let mut fields = self.fields.clone();
        fields.insert(
            GENERATION_TIME_FIELD.to_owned(),
            Value::String(format_generation_time(generated_at)),
        );
        serde_json::to_string(&fields).map_err(|e| CseError::SerializationFailure(e.to_string()))
    }
}

/// UTC instant at millisecond precision with a trailing `Z`.
fn format_generation_time(at: DateTime<Utc>) -> String {
    at.format(GENERATION_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_instant() -> DateTime<Utc> {
        DateTime::from_timestamp(1, 500_000_000).unwrap()
    }

    #[test]
    fn generation_time_formatting() {
        assert_eq!(
            format_generation_time(DateTime::from_timestamp(0, 0).unwrap()),
            "1970-01-01T00:00:00.000Z"
        );
        assert_eq!(
            format_generation_time(fixed_instant()),
            "1970-01-01T00:00:01.500Z"
        );
    }

    #[test]
    fn empty_payload_still_carries_generation_time() {
        let json = Payload::new().to_json(fixed_instant()).unwrap();
        assert_eq!(json, r#"{"generationtime":"1970-01-01T00:00:01.500Z"}"#);
    }

    #[test]
    fn fields_keep_insertion_order() {
        let mut payload = Payload::new();
        payload.insert("number", "4111111111111111");
        payload.insert("cvc", "737");
        let json = payload.to_json(fixed_instant()).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"number":"4111111111111111","cvc":"737","#,
                r#""generationtime":"1970-01-01T00:00:01.500Z"}"#
            )
        );
    }

    #[test]
    fn absent_values_are_skipped() {
        let mut payload = Payload::new();
        payload.insert_opt("number", Some("4111111111111111"));
        payload.insert_opt::<&str>("cvc", None);
        let json = payload.to_json(fixed_instant()).unwrap();
        assert!(json.contains(r#""number""#));
        assert!(!json.contains("cvc"));
    }

    #[test]
    fn duplicate_names_take_the_last_value() {
        let mut payload = Payload::new();
        payload.insert("field", "first");
        payload.insert("field", "second");
        let json = payload.to_json(fixed_instant()).unwrap();
        assert!(json.contains(r#""field":"second""#));
        assert!(!json.contains("first"));
    }

    #[test]
    fn scalar_variants_render_as_json_scalars() {
        let mut payload = Payload::new();
        payload.insert("text", "abc");
        payload.insert("count", 3i64);
        payload.insert("flag", true);
        let json = payload.to_json(fixed_instant()).unwrap();
        assert!(json.contains(r#""text":"abc""#));
        assert!(json.contains(r#""count":3"#));
        assert!(json.contains(r#""flag":true"#));
    }

    #[test]
    fn output_is_single_line() {
        let mut payload = Payload::new();
        payload.insert("holderName", "J. Doe");
        let json = payload.to_json(fixed_instant()).unwrap();
        assert!(!json.contains('\n'));
    }
}
