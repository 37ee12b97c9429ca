//! Lenient field access over loosely shaped model output.
//!
//! Every field the normalizer derives goes through [`Fields`]: an ordered list
//! of candidate keys, the first one yielding non-empty text wins, and the caller
//! supplies the terminal default.

use serde_json::{Map, Value};

static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();

/// Read-only view over a JSON object. Non-object values behave like `{}`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub(crate) fn of(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Self { map },
            _ => Self::empty(),
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            map: EMPTY.get_or_init(Map::new),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    pub(crate) fn has_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|key| self.map.contains_key(*key))
    }

    /// Nested object under `key`; null, missing and non-object values read as `{}`.
    pub(crate) fn object(&self, key: &str) -> Fields<'a> {
        self.get(key).map(Fields::of).unwrap_or_else(Fields::empty)
    }

    /// First candidate with non-empty text.
    pub(crate) fn text(&self, candidates: &[&str]) -> Option<String> {
        candidates
            .iter()
            .filter_map(|key| self.get(key).and_then(scalar_text))
            .find(|text| !text.is_empty())
    }

    pub(crate) fn text_or(&self, candidates: &[&str], default: &str) -> String {
        self.text(candidates)
            .unwrap_or_else(|| default.to_string())
    }

    /// Shorthand for `text_or(candidates, "")`.
    pub(crate) fn text_or_empty(&self, candidates: &[&str]) -> String {
        self.text_or(candidates, "")
    }

    /// Positive integer under `key`, accepting numeric strings.
    pub(crate) fn positive_int(&self, key: &str) -> Option<u32> {
        let number = match self.get(key)? {
            Value::Number(number) => number.as_u64().or_else(|| {
                number
                    .as_f64()
                    .filter(|float| float.fract() == 0.0 && *float >= 1.0)
                    .map(|float| float as u64)
            }),
            Value::String(text) => text.trim().parse::<u64>().ok(),
            _ => None,
        }?;
        u32::try_from(number).ok().filter(|day| *day > 0)
    }
}

/// Text form of a scalar. Null and containers have none.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
