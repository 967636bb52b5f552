use std::fmt;

use crate::database::Value;

/// Three-valued logic used when predicates are evaluated.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    pub fn and(&self, b: Self) -> Self {
        match (self, b) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::Unknown, _) | (_, Self::Unknown) => Self::Unknown,
            (Self::True, Self::True) => Self::True,
        }
    }

    pub fn or(&self, b: Self) -> Self {
        match (self, b) {
            (Self::True, _) | (_, Self::True) => Self::True,
            (Self::Unknown, _) | (_, Self::Unknown) => Self::Unknown,
            (Self::False, Self::False) => Self::False,
        }
    }

    /// Only `True` lets a row through a filter.
    pub fn is_true(&self) -> bool {
        matches!(self, Self::True)
    }

    /// `Null` is `Unknown`; any other non-boolean value has no truth value.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::from(*b)),
            Value::Null => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::True => Value::Bool(true),
            Self::False => Value::Bool(false),
            Self::Unknown => Value::Null,
        }
    }
}

impl From<bool> for Truth {
    fn from(b: bool) -> Self {
        if b { Self::True } else { Self::False }
    }
}

impl fmt::Display for Truth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => write!(f, "True"),
            Self::False => write!(f, "False"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

impl fmt::Debug for Truth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Truth({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kleene_tables() {
        use Truth::*;
        assert_eq!(True.and(Unknown), Unknown);
        assert_eq!(False.and(Unknown), False);
        assert_eq!(True.or(Unknown), True);
        assert_eq!(False.or(Unknown), Unknown);
        assert_eq!(Unknown.and(Unknown), Unknown);
        assert_eq!(False.or(False), False);
    }

    #[test]
    fn values_map_to_truth() {
        assert_eq!(Truth::from_value(&Value::Bool(true)), Some(Truth::True));
        assert_eq!(Truth::from_value(&Value::Null), Some(Truth::Unknown));
        assert_eq!(Truth::from_value(&Value::Int(1)), None);
        assert_eq!(Truth::Unknown.to_value(), Value::Null);
        assert_eq!(format!("{:?}", Truth::False), "Truth(False)");
    }
}
