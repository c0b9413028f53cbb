//! Projection of a Diffbot JSON response into flat field access.
//!
//! Diffbot responses have no fixed schema: the field set depends on the
//! extraction method and on what the server found on the page. Rather than
//! deserializing into typed structs, [`DiffbotResult`] wraps the parsed
//! [`Value`] and offers scalar projection over its first-level fields,
//! leaving nested data to be read through [`DiffbotResult::json`].

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Error, Result};

/// Placeholder returned by [`DiffbotResult::field`] for array and object
/// values, which have no flat string representation.
pub const OBJECT_SENTINEL: &str = "<object>";

/// Placeholder returned by [`DiffbotResult::field`] for values that cannot
/// be classified as any supported JSON kind.
pub const UNKNOWN_SENTINEL: &str = "<unknown>";

/// A parsed Diffbot response paired with the extraction method that
/// produced it.
///
/// Only constructible from a syntactically valid JSON document; a parse
/// failure never yields a partially populated result. Immutable once built.
#[derive(Debug, Clone)]
pub struct DiffbotResult {
    method: String,
    json: Value,
}

impl DiffbotResult {
    /// Parse a raw response body into a result.
    ///
    /// Fails with [`Error::MalformedResponse`] (carrying the raw body) if
    /// the body is not valid JSON.
    pub fn parse(method: impl Into<String>, body: &str) -> Result<Self> {
        let json = serde_json::from_str(body).map_err(|source| Error::MalformedResponse {
            source,
            body: body.to_string(),
        })?;

        Ok(Self {
            method: method.into(),
            json,
        })
    }

    /// The extraction method this response was produced by.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The full parsed document, for callers who need nested data.
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Project a first-level field to a string.
    ///
    /// A missing key is a normal case, not an error (the server's field set
    /// is not statically known) and yields `""`. Scalars are rendered as
    /// their canonical string form; arrays and nested objects yield the
    /// [`OBJECT_SENTINEL`] placeholder and must be read via [`Self::json`].
    pub fn field(&self, name: &str) -> String {
        match self.json.get(name) {
            Some(value) => scalar_repr(value),
            None => String::new(),
        }
    }

    /// Flatten every first-level field through [`Self::field`].
    ///
    /// Only the first nesting level is visited; nested structures show up
    /// as [`OBJECT_SENTINEL`] placeholders. If the root of the document is
    /// not an object the map is empty.
    pub fn all_fields(&self) -> BTreeMap<String, String> {
        match self.json.as_object() {
            Some(members) => members
                .keys()
                .map(|name| (name.clone(), self.field(name)))
                .collect(),
            None => BTreeMap::new(),
        }
    }
}

/// Render a single JSON value as a flat string.
///
/// Floats keep full input precision (Rust's shortest-roundtrip `f64`
/// formatting); no narrowing cast is applied.
fn scalar_repr(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else if let Some(f) = n.as_f64() {
                f.to_string()
            } else {
                UNKNOWN_SENTINEL.to_string()
            }
        }
        Value::Array(_) | Value::Object(_) => OBJECT_SENTINEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_doc() -> DiffbotResult {
        DiffbotResult::parse(
            "article",
            r#"{"a":1,"b":2.5,"c":true,"d":null,"e":[1,2],"f":{"x":1}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = DiffbotResult::parse("article", "not json").unwrap_err();
        match err {
            Error::MalformedResponse { body, .. } => assert_eq!(body, "not json"),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_keeps_method_provenance() {
        let res = DiffbotResult::parse("classifier", r#"{"title":"Hi"}"#).unwrap();
        assert_eq!(res.method(), "classifier");
        assert_eq!(res.field("title"), "Hi");
    }

    #[test]
    fn test_field_scalar_projection() {
        let res = mixed_doc();
        assert_eq!(res.field("a"), "1");
        assert_eq!(res.field("b"), "2.5");
        assert_eq!(res.field("c"), "true");
        assert_eq!(res.field("d"), "");
        assert_eq!(res.field("e"), OBJECT_SENTINEL);
        assert_eq!(res.field("f"), OBJECT_SENTINEL);
        assert_eq!(res.field("missing"), "");
    }

    #[test]
    fn test_field_large_unsigned() {
        let res = DiffbotResult::parse("article", r#"{"n":18446744073709551615}"#).unwrap();
        assert_eq!(res.field("n"), "18446744073709551615");
    }

    #[test]
    fn test_field_float_precision() {
        // Full input precision is preserved; a whole-number float drops
        // its fractional part in shortest-roundtrip formatting.
        let res = DiffbotResult::parse("article", r#"{"p":0.30000000000000004,"q":2.0}"#).unwrap();
        assert_eq!(res.field("p"), "0.30000000000000004");
        assert_eq!(res.field("q"), "2");
    }

    #[test]
    fn test_all_fields_first_level_only() {
        let res = mixed_doc();
        let fields = res.all_fields();

        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            vec!["a", "b", "c", "d", "e", "f"]
        );
        assert_eq!(fields["a"], "1");
        assert_eq!(fields["b"], "2.5");
        assert_eq!(fields["c"], "true");
        assert_eq!(fields["d"], "");
        assert_eq!(fields["e"], OBJECT_SENTINEL);
        assert_eq!(fields["f"], OBJECT_SENTINEL);
    }

    #[test]
    fn test_all_fields_non_object_root() {
        let res = DiffbotResult::parse("article", "[1,2,3]").unwrap();
        assert!(res.all_fields().is_empty());

        let res = DiffbotResult::parse("article", "42").unwrap();
        assert!(res.all_fields().is_empty());
    }

    #[test]
    fn test_projection_is_idempotent() {
        let res = mixed_doc();
        assert_eq!(res.field("b"), res.field("b"));
        assert_eq!(res.all_fields(), res.all_fields());
    }

    #[test]
    fn test_json_exposes_nested_data() {
        let res = mixed_doc();
        assert_eq!(res.json()["f"]["x"], 1);
        assert_eq!(res.json()["e"][1], 2);
    }
}
