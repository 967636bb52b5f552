use std::fmt;

use ordered_float::NotNan;
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::{
    database::{DataType, Value},
    Error, Result,
};

/// A literal written in a statement, or the value a parameter or function
/// was resolved to.
///
/// `DbNull` is SQL `NULL`; `Absent` is "no value at all" (for example a
/// function that produced nothing). Both read as `Null` at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlLiteralValue {
    String(String),
    Int(i32),
    Float(NotNan<f32>),
    Double(NotNan<f64>),
    Decimal(Decimal),
    Boolean(bool),
    DbNull,
    Absent,
}

impl SqlLiteralValue {
    /// `None` for NaN.
    pub fn float(v: f32) -> Option<Self> {
        NotNan::new(v).ok().map(SqlLiteralValue::Float)
    }

    /// `None` for NaN.
    pub fn double(v: f64) -> Option<Self> {
        NotNan::new(v).ok().map(SqlLiteralValue::Double)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlLiteralValue::DbNull | SqlLiteralValue::Absent)
    }

    pub fn data_type(&self) -> Option<DataType> {
        match self {
            SqlLiteralValue::String(_) => Some(DataType::String),
            SqlLiteralValue::Int(_) => Some(DataType::Int),
            SqlLiteralValue::Float(_) => Some(DataType::Float),
            SqlLiteralValue::Double(_) => Some(DataType::Double),
            SqlLiteralValue::Decimal(_) => Some(DataType::Decimal),
            SqlLiteralValue::Boolean(_) => Some(DataType::Boolean),
            SqlLiteralValue::DbNull | SqlLiteralValue::Absent => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            SqlLiteralValue::String(s) => Value::String(s.clone()),
            SqlLiteralValue::Int(i) => Value::Int(*i),
            SqlLiteralValue::Float(f) => Value::Float(f.into_inner()),
            SqlLiteralValue::Double(d) => Value::Double(d.into_inner()),
            SqlLiteralValue::Decimal(d) => Value::Decimal(*d),
            SqlLiteralValue::Boolean(b) => Value::Bool(*b),
            SqlLiteralValue::DbNull | SqlLiteralValue::Absent => Value::Null,
        }
    }

    /// Literal for a runtime value. Integers that do not fit an `Int` become
    /// decimals; dates and ids become strings.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => SqlLiteralValue::DbNull,
            Value::Bool(b) => SqlLiteralValue::Boolean(*b),
            Value::Byte(v) => SqlLiteralValue::Int(*v as i32),
            Value::Short(v) => SqlLiteralValue::Int(*v as i32),
            Value::Int(v) => SqlLiteralValue::Int(*v),
            Value::Long(v) => match i32::try_from(*v) {
                Ok(small) => SqlLiteralValue::Int(small),
                Err(_) => SqlLiteralValue::Decimal(Decimal::from(*v)),
            },
            Value::Float(v) => Self::float(*v).unwrap_or(SqlLiteralValue::DbNull),
            Value::Double(v) => Self::double(*v).unwrap_or(SqlLiteralValue::DbNull),
            Value::Decimal(d) => SqlLiteralValue::Decimal(*d),
            Value::String(s) => SqlLiteralValue::String(s.clone()),
            other @ (Value::DateTime(_) | Value::Guid(_)) => SqlLiteralValue::String(other.to_string()),
        }
    }

    /// Integer used for `LIMIT`/`OFFSET`. Only numeric literals qualify.
    pub fn as_limit(&self) -> Result<i64> {
        let converted = match self {
            SqlLiteralValue::Int(i) => Some(*i as i64),
            SqlLiteralValue::Float(f) => Some(f.into_inner().round() as i64),
            SqlLiteralValue::Double(d) => Some(d.into_inner().round() as i64),
            SqlLiteralValue::Decimal(d) => d.round().to_i64(),
            _ => None,
        };
        converted.ok_or_else(|| Error::UnsupportedLimitValue(self.to_string()))
    }
}

impl fmt::Display for SqlLiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlLiteralValue::String(s) => write!(f, "'{}'", s),
            SqlLiteralValue::Int(i) => write!(f, "{}", i),
            SqlLiteralValue::Float(v) => write!(f, "{}", v.into_inner()),
            SqlLiteralValue::Double(v) => write!(f, "{}", v.into_inner()),
            SqlLiteralValue::Decimal(d) => write!(f, "{}", d),
            SqlLiteralValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            SqlLiteralValue::DbNull => write!(f, "DBNull"),
            SqlLiteralValue::Absent => write!(f, "NULL"),
        }
    }
}

impl From<&str> for SqlLiteralValue {
    fn from(v: &str) -> Self { SqlLiteralValue::String(v.to_string()) }
}
impl From<String> for SqlLiteralValue {
    fn from(v: String) -> Self { SqlLiteralValue::String(v) }
}
impl From<i32> for SqlLiteralValue {
    fn from(v: i32) -> Self { SqlLiteralValue::Int(v) }
}
impl From<bool> for SqlLiteralValue {
    fn from(v: bool) -> Self { SqlLiteralValue::Boolean(v) }
}
impl From<Decimal> for SqlLiteralValue {
    fn from(v: Decimal) -> Self { SqlLiteralValue::Decimal(v) }
}
