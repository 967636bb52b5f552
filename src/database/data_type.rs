use std::{collections::HashMap, fmt, str::FromStr};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Column and value type understood by the resolver and the engine.
///
/// Numeric variants are ordered by precedence (see [`DataType::common_type`]);
/// the remaining variants only compare with themselves, except that anything
/// can be promoted to `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 8-bit unsigned integer
    Byte,
    /// 16-bit integer
    Short,
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Long,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// Fixed point decimal
    Decimal,
    /// UTF-8 text
    String,
    /// Boolean
    Boolean,
    /// Date and time without offset
    DateTime,
    /// 128-bit unique identifier
    Guid,
}

static NUMERIC_PRECEDENCE: Lazy<HashMap<DataType, u8>> = Lazy::new(|| {
    HashMap::from([
        (DataType::Byte, 1),
        (DataType::Short, 2),
        (DataType::Int, 3),
        (DataType::Long, 4),
        (DataType::Float, 5),
        (DataType::Double, 6),
        (DataType::Decimal, 7),
    ])
});

impl DataType {
    /// Whether the type takes part in numeric promotion.
    pub fn is_numeric(&self) -> bool {
        NUMERIC_PRECEDENCE.contains_key(self)
    }

    /// Whether the type holds whole numbers only.
    pub fn is_integral(&self) -> bool {
        matches!(self, DataType::Byte | DataType::Short | DataType::Int | DataType::Long)
    }

    /// Type both operands of a comparison are converted to before comparing.
    ///
    /// Equal types are kept as they are. When either side is `String` the
    /// other side is promoted to `String`. Two numeric types meet at the one
    /// with the higher precedence (`Byte < Short < Int < Long < Float < Double
    /// < Decimal`). Any other pairing has no common type.
    pub fn common_type(a: DataType, b: DataType) -> Option<DataType> {
        if a == b {
            return Some(a);
        }
        if a == DataType::String || b == DataType::String {
            return Some(DataType::String);
        }
        match (NUMERIC_PRECEDENCE.get(&a), NUMERIC_PRECEDENCE.get(&b)) {
            (Some(pa), Some(pb)) => Some(if pa >= pb { a } else { b }),
            _ => None,
        }
    }

    /// Promote two inferred types to a common representative for schema merging.
    ///
    /// Numeric types widen; for different non-numeric types the left-hand
    /// (first seen) type is preserved.
    pub fn promote(a: DataType, b: DataType) -> DataType {
        if a.is_numeric() && b.is_numeric() {
            return Self::common_type(a, b).unwrap_or(a);
        }
        a
    }

    /// Classify a JSON value into the type used when inferring a schema.
    ///
    /// Returns `None` for JSON null: nullability is tracked separately.
    /// Objects and arrays are stored as their serialized text.
    pub fn of_json(value: &serde_json::Value) -> Option<DataType> {
        use serde_json::Value as Json;
        match value {
            Json::Null => None,
            Json::Bool(_) => Some(DataType::Boolean),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    if i32::try_from(i).is_ok() {
                        Some(DataType::Int)
                    } else {
                        Some(DataType::Long)
                    }
                } else if n.is_u64() {
                    Some(DataType::Decimal)
                } else {
                    Some(DataType::Double)
                }
            }
            Json::String(_) | Json::Array(_) | Json::Object(_) => Some(DataType::String),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Byte => "byte",
            DataType::Short => "short",
            DataType::Int => "int",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Decimal => "decimal",
            DataType::String => "string",
            DataType::Boolean => "bool",
            DataType::DateTime => "datetime",
            DataType::Guid => "guid",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DataType {
    type Err = Error;

    /// Maps common SQL type names (as found in `CREATE TABLE`) to a `DataType`.
    fn from_str(s: &str) -> Result<Self> {
        let ty = match s.trim().to_ascii_lowercase().as_str() {
            "byte" | "tinyint" => DataType::Byte,
            "short" | "smallint" => DataType::Short,
            "int" | "integer" | "int4" | "mediumint" => DataType::Int,
            "long" | "bigint" | "int8" => DataType::Long,
            "float" | "real" | "float4" => DataType::Float,
            "double" | "float8" | "double precision" => DataType::Double,
            "decimal" | "numeric" | "money" => DataType::Decimal,
            "string" | "text" | "varchar" | "nvarchar" | "char" | "nchar" | "clob" => DataType::String,
            "bool" | "boolean" | "bit" => DataType::Boolean,
            "datetime" | "timestamp" | "date" => DataType::DateTime,
            "guid" | "uuid" | "uniqueidentifier" => DataType::Guid,
            other => return Err(Error::Other(format!("Unknown data type {}", other))),
        };
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn common_type_follows_numeric_precedence() {
        use DataType::*;
        assert_eq!(DataType::common_type(Byte, Short), Some(Short));
        assert_eq!(DataType::common_type(Long, Int), Some(Long));
        assert_eq!(DataType::common_type(Int, Double), Some(Double));
        assert_eq!(DataType::common_type(Double, Decimal), Some(Decimal));
        assert_eq!(DataType::common_type(Float, Long), Some(Float));
    }

    #[test]
    fn common_type_promotes_to_string_and_rejects_unrelated() {
        use DataType::*;
        assert_eq!(DataType::common_type(Int, String), Some(String));
        assert_eq!(DataType::common_type(String, Decimal), Some(String));
        assert_eq!(DataType::common_type(Boolean, Boolean), Some(Boolean));
        assert_eq!(DataType::common_type(Boolean, Int), None);
        assert_eq!(DataType::common_type(DateTime, Guid), None);
    }

    #[test]
    fn of_json_classifies_values() {
        assert_eq!(DataType::of_json(&json!(null)), None);
        assert_eq!(DataType::of_json(&json!(true)), Some(DataType::Boolean));
        assert_eq!(DataType::of_json(&json!(12)), Some(DataType::Int));
        assert_eq!(DataType::of_json(&json!(5_000_000_000i64)), Some(DataType::Long));
        assert_eq!(DataType::of_json(&json!(1.5)), Some(DataType::Double));
        assert_eq!(DataType::of_json(&json!("x")), Some(DataType::String));
        assert_eq!(DataType::of_json(&json!([1, 2])), Some(DataType::String));
    }

    #[test]
    fn promote_widens_numbers_and_keeps_first_otherwise() {
        assert_eq!(DataType::promote(DataType::Int, DataType::Double), DataType::Double);
        assert_eq!(DataType::promote(DataType::Long, DataType::Int), DataType::Long);
        assert_eq!(DataType::promote(DataType::String, DataType::Int), DataType::String);
        assert_eq!(DataType::promote(DataType::Boolean, DataType::String), DataType::Boolean);
    }

    #[test]
    fn parses_sql_type_names() {
        assert_eq!("VARCHAR".parse::<DataType>().unwrap(), DataType::String);
        assert_eq!("bigint".parse::<DataType>().unwrap(), DataType::Long);
        assert_eq!(" Integer ".parse::<DataType>().unwrap(), DataType::Int);
        assert!("blob".parse::<DataType>().is_err());
    }
}
