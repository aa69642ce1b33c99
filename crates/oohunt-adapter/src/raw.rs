//! Typed access to loosely-shaped upstream product documents.
//!
//! Providers disagree on field names and types, so every read goes through
//! [`RawRecord`], which applies one presence rule: `null`, `false`, `0`
//! and `""` count as absent and fall through to the next candidate key.
//! [`RawRecord::explicit_number`] is the exception, for values where zero
//! is meaningful.

use serde_json::{Map, Value};

use crate::error::AdaptError;

/// Returns `true` when `value` carries a usable signal.
#[must_use]
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Short JSON type name used in error messages.
#[must_use]
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A borrowed view over one product document or one of its offers.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    fields: &'a Map<String, Value>,
    /// Prepended to field names in errors, e.g. `"offers[0]."`.
    scope: &'static str,
}

impl<'a> RawRecord<'a> {
    #[must_use]
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields, scope: "" }
    }

    fn scoped(fields: &'a Map<String, Value>, scope: &'static str) -> Self {
        Self { fields, scope }
    }

    fn field_name(&self, key: &str) -> String {
        format!("{}{key}", self.scope)
    }

    /// The value under `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|v| is_present(v))
    }

    /// Reads a numeric field. Numeric strings such as `"12.99"` are accepted;
    /// a string that parses to zero counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::UnexpectedType`] for non-numeric JSON types and
    /// [`AdaptError::InvalidNumber`] for strings that are not finite numbers.
    pub fn number(&self, key: &str) -> Result<Option<f64>, AdaptError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(v).filter(|v| *v != 0.0)),
                _ => Err(AdaptError::InvalidNumber {
                    field: self.field_name(key),
                    value: s.clone(),
                }),
            },
            Some(other) => Err(self.unexpected(key, "number", other)),
        }
    }

    /// Reads a numeric field where an explicit zero is a real value. Only a
    /// missing key or `null` counts as absent.
    ///
    /// # Errors
    ///
    /// Same as [`RawRecord::number`].
    pub fn explicit_number(&self, key: &str) -> Result<Option<f64>, AdaptError> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(AdaptError::InvalidNumber {
                    field: self.field_name(key),
                    value: s.clone(),
                }),
            },
            Some(other) => Err(self.unexpected(key, "number", other)),
        }
    }

    /// Reads a non-negative whole-number field such as a review count.
    ///
    /// # Errors
    ///
    /// Same as [`RawRecord::number`], plus [`AdaptError::InvalidNumber`] for
    /// negative values.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn count(&self, key: &str) -> Result<Option<u64>, AdaptError> {
        match self.number(key)? {
            None => Ok(None),
            Some(v) if v < 0.0 => Err(AdaptError::InvalidNumber {
                field: self.field_name(key),
                value: v.to_string(),
            }),
            // Non-negative and finite, so the cast saturates at worst.
            Some(v) => Ok(Some(v.round() as u64)),
        }
    }

    /// Reads a text field. Numbers are stringified so numeric ids survive.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::UnexpectedType`] for booleans, arrays and objects.
    pub fn text(&self, key: &str) -> Result<Option<String>, AdaptError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => text_value(value)
                .map(Some)
                .ok_or_else(|| self.unexpected(key, "string", value)),
        }
    }

    /// Reads the first present key of `keys` as text.
    ///
    /// # Errors
    ///
    /// Fails if the first present value has the wrong type; later keys are
    /// not consulted in that case.
    pub fn first_text(&self, keys: &[&str]) -> Result<Option<String>, AdaptError> {
        match keys.iter().find(|key| self.get(key).is_some()) {
            Some(key) => self.text(key),
            None => Ok(None),
        }
    }

    /// Reads a flag field using the presence rule.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Like [`RawRecord::first_text`], but skips values of the wrong type
    /// instead of failing.
    #[must_use]
    pub fn lenient_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .find_map(|key| self.get(key).and_then(text_value))
    }

    /// Like [`RawRecord::number`], but yields `None` for unreadable values.
    #[must_use]
    pub fn lenient_number(&self, key: &str) -> Option<f64> {
        self.number(key).ok().flatten()
    }

    /// Like [`RawRecord::count`], but yields `None` for unreadable values.
    #[must_use]
    pub fn lenient_count(&self, key: &str) -> Option<u64> {
        self.count(key).ok().flatten()
    }

    /// The authoritative offer: the first element of `offers`, when present.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::UnexpectedType`] when `offers` is not an array or
    /// its first element is not an object.
    pub fn main_offer(&self) -> Result<Option<RawRecord<'a>>, AdaptError> {
        let offers = match self.get("offers") {
            None => return Ok(None),
            Some(Value::Array(offers)) => offers,
            Some(other) => return Err(self.unexpected("offers", "array", other)),
        };

        match offers.first() {
            None => Ok(None),
            Some(first) if !is_present(first) => Ok(None),
            Some(Value::Object(fields)) => Ok(Some(RawRecord::scoped(fields, "offers[0]."))),
            Some(other) => Err(AdaptError::UnexpectedType {
                field: self.field_name("offers[0]"),
                expected: "object",
                found: kind_of(other),
            }),
        }
    }

    /// Display category: `product_group`, then `binding`, then the first
    /// entry of `categories`.
    ///
    /// # Errors
    ///
    /// Fails when the chosen value has the wrong type.
    pub fn category(&self) -> Result<Option<String>, AdaptError> {
        if let Some(found) = self.first_text(&["product_group", "binding"])? {
            return Ok(Some(found));
        }

        match self.get("categories") {
            None => Ok(None),
            Some(Value::Array(categories)) => match categories.first().filter(|v| is_present(v)) {
                None => Ok(None),
                Some(first) => text_value(first).map(Some).ok_or_else(|| {
                    AdaptError::UnexpectedType {
                        field: self.field_name("categories[0]"),
                        expected: "string",
                        found: kind_of(first),
                    }
                }),
            },
            Some(other) => Err(self.unexpected("categories", "array", other)),
        }
    }

    /// Every category label the document carries, in priority order. Used
    /// for store-style equality filtering.
    #[must_use]
    pub fn category_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = ["product_group", "binding"]
            .iter()
            .filter_map(|key| self.get(key).and_then(text_value))
            .collect();

        if let Some(Value::Array(categories)) = self.get("categories") {
            labels.extend(
                categories
                    .iter()
                    .filter(|v| is_present(v))
                    .filter_map(text_value),
            );
        }

        labels
    }

    fn unexpected(&self, key: &str, expected: &'static str, found: &Value) -> AdaptError {
        AdaptError::UnexpectedType {
            field: self.field_name(key),
            expected,
            found: kind_of(found),
        }
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
