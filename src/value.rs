use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use std::fmt;

/// Core value types exchanged with the database.
///
/// `Null` is the "no value" marker and is distinct from zero or empty values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Boolean(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the variant, used in conversion diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
            Value::Boolean(_) => "boolean",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "'{v}'"),
            Value::Blob(v) => write!(f, "<{} bytes>", v.len()),
            Value::Boolean(v) => write!(f, "{v}"),
        }
    }
}

/// A value that could not be converted into a field's declared type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot convert {found} value {value} into {expected}")]
pub struct ConversionError {
    pub expected: &'static str,
    pub found: &'static str,
    pub value: String,
}

impl ConversionError {
    fn new(expected: &'static str, value: &Value) -> Self {
        Self {
            expected,
            found: value.kind(),
            value: value.to_string(),
        }
    }
}

/// Conversion from a database value into a record field type.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ConversionError>;
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(v) => Some(*v),
        Value::Boolean(v) => Some(i64::from(*v)),
        Value::Real(v) if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 => {
            Some(*v as i64)
        }
        Value::Text(v) => v.trim().parse().ok(),
        _ => None,
    }
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self, ConversionError> {
                    integral(value)
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(|| ConversionError::new(stringify!($ty), value))
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Integer(value as i64)
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32);

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Real(v) => Ok(*v),
            Value::Integer(v) => Ok(*v as f64),
            Value::Text(v) => v
                .trim()
                .parse()
                .map_err(|_| ConversionError::new("f64", value)),
            _ => Err(ConversionError::new("f64", value)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        f64::from_value(value)
            .map(|v| v as f32)
            .map_err(|_| ConversionError::new("f32", value))
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Boolean(v) => Ok(*v),
            Value::Integer(v) => Ok(*v != 0),
            Value::Text(v) => match v.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(ConversionError::new("bool", value)),
            },
            _ => Err(ConversionError::new("bool", value)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            Value::Integer(v) => Ok(v.to_string()),
            Value::Real(v) => Ok(v.to_string()),
            Value::Boolean(v) => Ok(v.to_string()),
            _ => Err(ConversionError::new("String", value)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Blob(v) => Ok(v.clone()),
            Value::Text(v) => Ok(v.as_bytes().to_vec()),
            _ => Err(ConversionError::new("Vec<u8>", value)),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        Ok(value.clone())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Real(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::Integer(v),
            ValueRef::Real(v) => Value::Real(v),
            ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
            ValueRef::Blob(v) => Value::Blob(v.to_vec()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Value::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            Value::Integer(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            Value::Real(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            Value::Text(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Value::Blob(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Blob(&v[..]))),
            Value::Boolean(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v)))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_convert_with_range_checks() {
        assert_eq!(i32::from_value(&Value::Integer(42)), Ok(42));
        assert_eq!(i64::from_value(&Value::Real(7.0)), Ok(7));
        assert_eq!(u8::from_value(&Value::Text(" 12 ".into())), Ok(12));
        assert_eq!(i32::from_value(&Value::Boolean(true)), Ok(1));

        let err = u8::from_value(&Value::Integer(300)).unwrap_err();
        assert_eq!(err.expected, "u8");
        assert_eq!(err.found, "integer");

        assert!(i64::from_value(&Value::Real(1.5)).is_err());
        assert!(i64::from_value(&Value::Real(9.223372036854775808e18)).is_err());
        assert_eq!(i64::from_value(&Value::Real(-9.223372036854775808e18)), Ok(i64::MIN));
        assert!(i32::from_value(&Value::Blob(vec![1])).is_err());
    }

    #[test]
    fn floats_accept_integers_and_text() {
        assert_eq!(f64::from_value(&Value::Real(3.8)), Ok(3.8));
        assert_eq!(f64::from_value(&Value::Integer(4)), Ok(4.0));
        assert_eq!(f32::from_value(&Value::Text("2.5".into())), Ok(2.5));
        assert!(f64::from_value(&Value::Text("abc".into())).is_err());
    }

    #[test]
    fn bools_follow_sqlite_storage() {
        assert_eq!(bool::from_value(&Value::Integer(0)), Ok(false));
        assert_eq!(bool::from_value(&Value::Integer(5)), Ok(true));
        assert_eq!(bool::from_value(&Value::Text("TRUE".into())), Ok(true));
        assert!(bool::from_value(&Value::Text("maybe".into())).is_err());
    }

    #[test]
    fn strings_take_display_form_of_scalars() {
        assert_eq!(String::from_value(&Value::Text("Ana".into())), Ok("Ana".into()));
        assert_eq!(String::from_value(&Value::Integer(9)), Ok("9".into()));
        assert!(String::from_value(&Value::Blob(vec![0xff])).is_err());
    }

    #[test]
    fn null_maps_to_none_only_for_options() {
        assert_eq!(Option::<f64>::from_value(&Value::Null), Ok(None));
        assert_eq!(Option::<f64>::from_value(&Value::Real(1.0)), Ok(Some(1.0)));
        assert!(f64::from_value(&Value::Null).is_err());
    }

    #[test]
    fn options_encode_absent_values_as_null() {
        assert_eq!(Value::from(None::<f64>), Value::Null);
        assert_eq!(Value::from(Some(3.8)), Value::Real(3.8));
        assert_eq!(Value::from("Ana"), Value::Text("Ana".into()));
        assert_eq!(Value::from(7u16), Value::Integer(7));
    }

    #[test]
    fn sqlite_refs_become_values() {
        assert_eq!(Value::from(ValueRef::Null), Value::Null);
        assert_eq!(Value::from(ValueRef::Text(b"x")), Value::Text("x".into()));
        assert_eq!(Value::from(ValueRef::Blob(&[1, 2])), Value::Blob(vec![1, 2]));
    }
}
