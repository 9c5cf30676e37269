//! Field values attached to log entries

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Fields of a log entry, kept sorted by key.
pub type Fields = BTreeMap<String, FieldValue>;

/// A scalar field value. Serialized untagged, so numbers and booleans stay typed in JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("<nil>"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Str(s) => f.write_str(s),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value.into())
                }
            }
        )+
    };
}

impl_from!(Bool: bool);
impl_from!(Int: i8, i16, i32, i64);
impl_from!(UInt: u8, u16, u32, u64);
impl_from!(Float: f32, f64);
impl_from!(Str: String, &str, &String);

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        FieldValue::UInt(value as u64)
    }
}

impl From<isize> for FieldValue {
    fn from(value: isize) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Build a [`Fields`] map from `key => value` pairs.
///
/// ```
/// let fields = logger::fields! { "service" => "billing", "port" => 8080, "debug" => false };
/// assert_eq!(fields.len(), 3);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            fields.insert(::std::string::String::from($key), $crate::FieldValue::from($value));
        )+
        fields
    }};
}
