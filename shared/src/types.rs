use std::fmt;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// A single value inside a [`LogRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i128),
    Float(f64),
    Bool(bool),
    Null,
}

impl FieldValue {
    /// Canonical wire rendering: locale independent, `null` for nulls,
    /// `True`/`False` for booleans.
    pub fn to_wire_string(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Integer(value) => value.to_string(),
            FieldValue::Float(value) => render_float(*value),
            FieldValue::Bool(true) => "True".to_string(),
            FieldValue::Bool(false) => "False".to_string(),
            FieldValue::Null => "null".to_string(),
        }
    }
}

// f64's Display never switches to exponent notation and always uses '.'.
fn render_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        value.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire_string())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
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

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        // Widen through the shortest decimal form so 0.1f32 stays "0.1".
        let widened = value.to_string().parse::<f64>().unwrap_or(value as f64);
        FieldValue::Float(widened)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Integer(value as i128)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Ordered field name → value mapping submitted as one log row.
///
/// Insertion order is kept and becomes the order of the `keys` wire field.
/// Inserting an existing name replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogRecord {
    fields: Vec<(String, FieldValue)>,
}

impl LogRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        let name = name.into();
        let value = value.into();

        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for LogRecord
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = LogRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    #[serde(with = "big_uint")]
    pub score: BigUint,
}

/// Top-N standings, highest score first as ordered by the remote service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingResponse {
    #[serde(default)]
    pub ranking: Vec<RankingEntry>,
}

impl RankingResponse {
    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankingEntry> {
        self.ranking.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRankResponse {
    #[serde(with = "big_uint")]
    pub score: BigUint,
    /// 1-based position; 0 when the score is not ranked.
    pub rank: u64,
}

impl ScoreRankResponse {
    pub fn is_ranked(&self) -> bool {
        self.rank > 0
    }

    pub fn position(&self) -> Option<u64> {
        self.is_ranked().then_some(self.rank)
    }
}

/// Exact decimal (de)serialization for [`BigUint`] scores.
///
/// Accepts JSON numbers of any size as well as digit strings. Relies on
/// serde_json's `arbitrary_precision` so large numbers keep their literal text.
pub mod big_uint {
    use num_bigint::BigUint;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(number) => parse_decimal(&number.to_string()).map_err(D::Error::custom),
            Value::String(text) => parse_decimal(text.trim()).map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected an integer score, got {}",
                other
            ))),
        }
    }

    pub fn parse_decimal(digits: &str) -> Result<BigUint, String> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("invalid score literal: {:?}", digits));
        }
        BigUint::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| format!("invalid score literal: {:?}", digits))
    }
}
