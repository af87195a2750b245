use std::fmt;

use serde::ser::{self, Impossible, Serialize, Serializer};
use serde_json::{Number, Value};
use shared::errors::{GasError, Result};
use shared::{FieldValue, LogRecord};
use tracing::debug;

/// Converts a typed record into an ordered [`LogRecord`].
///
/// The record must serialize as a struct or map with at least one field;
/// fields come out in declaration order. An empty map is a
/// [`GasError::Validation`]; anything else without fields is a
/// [`GasError::Marshal`] naming the record type.
pub fn to_field_map<R>(record: &R) -> Result<LogRecord>
where
    R: Serialize + ?Sized,
{
    let type_name = std::any::type_name::<R>();
    let shape = record_shape(record);

    let value = serde_json::to_value(record).map_err(|e| {
        debug!(record_type = type_name, error = %e, "Record could not be serialized");
        GasError::Marshal { type_name }
    })?;

    let object = match value {
        Value::Object(object) if !object.is_empty() => object,
        Value::Object(_) if shape == Shape::Map => {
            return Err(GasError::Validation(
                "can not send log because fields are null or empty".to_string(),
            ))
        }
        _ => return Err(GasError::Marshal { type_name }),
    };

    Ok(object
        .into_iter()
        .map(|(name, value)| (name, field_value(value)))
        .collect())
}

fn field_value(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(flag) => FieldValue::Bool(flag),
        Value::String(text) => FieldValue::Text(text),
        Value::Number(number) => number_value(&number),
        nested @ (Value::Array(_) | Value::Object(_)) => FieldValue::Text(nested.to_string()),
    }
}

fn number_value(number: &Number) -> FieldValue {
    let literal = number.to_string();

    if let Ok(integer) = literal.parse::<i128>() {
        return FieldValue::Integer(integer);
    }

    // Integers wider than i128 keep their exact digits.
    let digits = literal.strip_prefix('-').unwrap_or(&literal);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return FieldValue::Text(literal);
    }

    match number.as_f64() {
        Some(float) => FieldValue::Float(float),
        None => FieldValue::Text(literal),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Struct,
    Map,
    Other,
}

fn record_shape<R>(record: &R) -> Shape
where
    R: Serialize + ?Sized,
{
    match record.serialize(ShapeDetector) {
        Err(Detected(shape)) => shape,
        Ok(()) => Shape::Other,
    }
}

/// Stops at the outermost container and reports what it was.
struct ShapeDetector;

#[derive(Debug)]
struct Detected(Shape);

impl fmt::Display for Detected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record serializes as {:?}", self.0)
    }
}

impl std::error::Error for Detected {}

impl ser::Error for Detected {
    fn custom<T: fmt::Display>(_msg: T) -> Self {
        Detected(Shape::Other)
    }
}

macro_rules! detect_other {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> std::result::Result<(), Detected> {
                Err(Detected(Shape::Other))
            }
        )*
    };
}

impl Serializer for ShapeDetector {
    type Ok = ();
    type Error = Detected;
    type SerializeSeq = Impossible<(), Detected>;
    type SerializeTuple = Impossible<(), Detected>;
    type SerializeTupleStruct = Impossible<(), Detected>;
    type SerializeTupleVariant = Impossible<(), Detected>;
    type SerializeMap = Impossible<(), Detected>;
    type SerializeStruct = Impossible<(), Detected>;
    type SerializeStructVariant = Impossible<(), Detected>;

    detect_other!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    );

    fn serialize_none(self) -> std::result::Result<(), Detected> {
        Err(Detected(Shape::Other))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> std::result::Result<(), Detected> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> std::result::Result<(), Detected> {
        Err(Detected(Shape::Other))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> std::result::Result<(), Detected> {
        Err(Detected(Shape::Other))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> std::result::Result<(), Detected> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> std::result::Result<(), Detected> {
        Err(Detected(Shape::Other))
    }

    fn serialize_seq(self, _len: Option<usize>) -> std::result::Result<Self::SerializeSeq, Detected> {
        Err(Detected(Shape::Other))
    }

    fn serialize_tuple(self, _len: usize) -> std::result::Result<Self::SerializeTuple, Detected> {
        Err(Detected(Shape::Other))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> std::result::Result<Self::SerializeTupleStruct, Detected> {
        Err(Detected(Shape::Other))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> std::result::Result<Self::SerializeTupleVariant, Detected> {
        Err(Detected(Shape::Other))
    }

    fn serialize_map(self, _len: Option<usize>) -> std::result::Result<Self::SerializeMap, Detected> {
        Err(Detected(Shape::Map))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> std::result::Result<Self::SerializeStruct, Detected> {
        Err(Detected(Shape::Struct))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> std::result::Result<Self::SerializeStructVariant, Detected> {
        Err(Detected(Shape::Other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct PlayLog {
        player_name: String,
        score: i32,
        is_clear: bool,
    }

    #[derive(Serialize)]
    struct Empty {}

    #[derive(Serialize)]
    struct Unit;

    #[derive(Serialize)]
    struct Mixed {
        note: Option<String>,
        ratio: f64,
        huge: u128,
        tags: Vec<&'static str>,
        #[serde(skip)]
        #[allow(dead_code)]
        internal: u32,
    }

    #[test]
    fn test_fields_follow_declaration_order() {
        let log = PlayLog {
            player_name: "Hero_Alpha".to_string(),
            score: 100,
            is_clear: true,
        };

        let record = to_field_map(&log).unwrap();

        assert_eq!(
            record.keys().collect::<Vec<_>>(),
            vec!["PlayerName", "Score", "IsClear"]
        );
        assert_eq!(record.get("PlayerName"), Some(&FieldValue::Text("Hero_Alpha".to_string())));
        assert_eq!(record.get("Score"), Some(&FieldValue::Integer(100)));
        assert_eq!(record.get("IsClear"), Some(&FieldValue::Bool(true)));
    }

    #[test]
    fn test_value_conversions() {
        let mixed = Mixed {
            note: None,
            ratio: 0.25,
            huge: u128::MAX,
            tags: vec!["a", "b"],
            internal: 7,
        };

        let record = to_field_map(&mixed).unwrap();

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["note", "ratio", "huge", "tags"]);
        assert_eq!(record.get("note"), Some(&FieldValue::Null));
        assert_eq!(record.get("ratio"), Some(&FieldValue::Float(0.25)));
        assert_eq!(
            record.get("huge").map(FieldValue::to_wire_string),
            Some(u128::MAX.to_string())
        );
        assert_eq!(
            record.get("tags"),
            Some(&FieldValue::Text(r#"["a","b"]"#.to_string()))
        );
    }

    #[test]
    fn test_empty_record_is_marshal_error() {
        let error = to_field_map(&Empty {}).unwrap_err();
        match error {
            GasError::Marshal { type_name } => assert!(type_name.ends_with("Empty")),
            other => panic!("Expected Marshal error, got {:?}", other),
        }

        assert!(to_field_map(&Unit).unwrap_err().is_marshal());
    }

    #[test]
    fn test_non_struct_is_marshal_error() {
        assert!(to_field_map(&42).unwrap_err().is_marshal());
        assert!(to_field_map("text").unwrap_err().is_marshal());
        assert!(to_field_map(&vec![1, 2, 3]).unwrap_err().is_marshal());
    }

    #[test]
    fn test_shape_of_outer_container() {
        assert_eq!(record_shape(&Empty {}), Shape::Struct);
        assert_eq!(record_shape(&BTreeMap::<String, u32>::new()), Shape::Map);
        assert_eq!(record_shape(&Some(HashMap::<String, u32>::new())), Shape::Map);
        assert_eq!(record_shape(&Unit), Shape::Other);
        assert_eq!(record_shape(&vec![1, 2]), Shape::Other);
    }

    #[test]
    fn test_empty_map_is_validation_error() {
        assert!(to_field_map(&HashMap::<String, String>::new())
            .unwrap_err()
            .is_validation());
        assert!(to_field_map(&BTreeMap::<&str, i32>::new())
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_maps_are_accepted() {
        let mut map = BTreeMap::new();
        map.insert("Event", "GameStart");
        map.insert("SceneName", "Level_01");

        let record = to_field_map(&map).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("Event"), Some(&FieldValue::Text("GameStart".to_string())));
    }
}
