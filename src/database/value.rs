use std::{cmp::Ordering, fmt};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use uuid::Uuid;

use crate::{database::DataType, Error, Result};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// A single cell produced by a table source or by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    String(String),
    DateTime(NaiveDateTime),
    Guid(Uuid),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Type of the value, `None` for `Null`.
    pub fn data_type(&self) -> Option<DataType> {
        let ty = match self {
            Value::Null => return None,
            Value::Bool(_) => DataType::Boolean,
            Value::Byte(_) => DataType::Byte,
            Value::Short(_) => DataType::Short,
            Value::Int(_) => DataType::Int,
            Value::Long(_) => DataType::Long,
            Value::Float(_) => DataType::Float,
            Value::Double(_) => DataType::Double,
            Value::Decimal(_) => DataType::Decimal,
            Value::String(_) => DataType::String,
            Value::DateTime(_) => DataType::DateTime,
            Value::Guid(_) => DataType::Guid,
        };
        Some(ty)
    }

    /// Convert the value to `to`.
    ///
    /// `Null` stays `Null`. Every value converts to `String`; numbers convert
    /// between each other when the target can hold them; strings are parsed.
    pub fn cast(&self, to: DataType) -> Result<Value> {
        if self.is_null() || self.data_type() == Some(to) {
            return Ok(self.clone());
        }

        let converted = match to {
            DataType::String => Some(Value::String(self.to_string())),
            DataType::Byte => self.to_i64().and_then(|i| u8::try_from(i).ok()).map(Value::Byte),
            DataType::Short => self.to_i64().and_then(|i| i16::try_from(i).ok()).map(Value::Short),
            DataType::Int => self.to_i64().and_then(|i| i32::try_from(i).ok()).map(Value::Int),
            DataType::Long => self.to_i64().map(Value::Long),
            DataType::Float => self.to_f64().map(|f| Value::Float(f as f32)),
            DataType::Double => self.to_f64().map(Value::Double),
            DataType::Decimal => self.to_decimal().map(Value::Decimal),
            DataType::Boolean => match self {
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "1" => Some(Value::Bool(true)),
                    "false" | "0" => Some(Value::Bool(false)),
                    _ => None,
                },
                other => other.to_i64().map(|i| Value::Bool(i != 0)),
            },
            DataType::DateTime => match self {
                Value::String(s) => Self::parse_datetime(s).map(Value::DateTime),
                _ => None,
            },
            DataType::Guid => match self {
                Value::String(s) => Uuid::parse_str(s.trim()).ok().map(Value::Guid),
                _ => None,
            },
        };

        converted.ok_or_else(|| Error::InvalidCast { value: self.to_string(), to })
    }

    /// Order two values of the same variant. Values of different variants,
    /// and `Null`, are not comparable: harmonize them with [`Value::cast`] first.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Byte(a), Value::Byte(b)) => Some(a.cmp(b)),
            (Value::Short(a), Value::Short(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Long(a), Value::Long(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::Guid(a), Value::Guid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(*v as i64),
            Value::Short(v) => Some(*v as i64),
            Value::Int(v) => Some(*v as i64),
            Value::Long(v) => Some(*v),
            Value::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Value::Double(v) if v.fract() == 0.0 => Some(*v as i64),
            Value::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Byte(v) => Some(*v as f64),
            Value::Short(v) => Some(*v as f64),
            Value::Int(v) => Some(*v as f64),
            Value::Long(v) => Some(*v as f64),
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            Value::Decimal(d) => d.to_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Byte(v) => Some(Decimal::from(*v)),
            Value::Short(v) => Some(Decimal::from(*v)),
            Value::Int(v) => Some(Decimal::from(*v)),
            Value::Long(v) => Some(Decimal::from(*v)),
            Value::Float(v) => Decimal::from_f32_retain(*v),
            Value::Double(v) => Decimal::from_f64_retain(*v),
            Value::Decimal(d) => Some(*d),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Best-effort conversion of a JSON value, without a target type.
    pub fn infer_from_json(json: &serde_json::Value) -> Value {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    match i32::try_from(i) {
                        Ok(small) => Value::Int(small),
                        Err(_) => Value::Long(i),
                    }
                } else if let Some(u) = n.as_u64() {
                    Value::Decimal(Decimal::from(u))
                } else {
                    n.as_f64().map(Value::Double).unwrap_or(Value::Null)
                }
            }
            Json::String(s) => Value::String(s.clone()),
            other => Value::String(other.to_string()),
        }
    }

    /// Convert a JSON value into a cell of type `ty`.
    pub fn from_json(json: &serde_json::Value, ty: DataType) -> Result<Value> {
        Self::infer_from_json(json).cast(ty)
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Byte(v) => Json::from(*v),
            Value::Short(v) => Json::from(*v),
            Value::Int(v) => Json::from(*v),
            Value::Long(v) => Json::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(*v as f64).map(Json::Number).unwrap_or(Json::Null),
            Value::Double(v) => serde_json::Number::from_f64(*v).map(Json::Number).unwrap_or(Json::Null),
            Value::Decimal(d) => d
                .to_f64()
                .and_then(serde_json::Number::from_f64)
                .map(Json::Number)
                .unwrap_or_else(|| Json::String(d.to_string())),
            Value::String(s) => Json::String(s.clone()),
            Value::DateTime(dt) => Json::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            Value::Guid(g) => Json::String(g.to_string()),
        }
    }

    fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "{}", s),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Guid(g) => write!(f, "{}", g),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self { Value::Bool(v) }
}
impl From<u8> for Value {
    fn from(v: u8) -> Self { Value::Byte(v) }
}
impl From<i16> for Value {
    fn from(v: i16) -> Self { Value::Short(v) }
}
impl From<i32> for Value {
    fn from(v: i32) -> Self { Value::Int(v) }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self { Value::Long(v) }
}
impl From<f32> for Value {
    fn from(v: f32) -> Self { Value::Float(v) }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self { Value::Double(v) }
}
impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self { Value::Decimal(v) }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self { Value::String(v.to_string()) }
}
impl From<String> for Value {
    fn from(v: String) -> Self { Value::String(v) }
}
impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self { Value::DateTime(v) }
}
impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self { Value::Guid(v) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
