use std::fmt;

/// A statement parameter: `?` or a named one such as `@id`.
///
/// Named parameters are equal when their names are; positional parameters
/// are all equal to each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlParameter {
    Positional,
    Named(String),
}

impl SqlParameter {
    pub const POSITIONAL_CHAR: char = '?';
    pub const NAMED_MARKER: char = '@';

    pub fn named(name: &str) -> Self {
        SqlParameter::Named(name.to_string())
    }

    /// Name without its leading `@`, for named parameters.
    pub fn normalized_name(&self) -> Option<&str> {
        match self {
            SqlParameter::Positional => None,
            SqlParameter::Named(name) => Some(Self::normalize(name)),
        }
    }

    pub fn normalize(name: &str) -> &str {
        name.strip_prefix(Self::NAMED_MARKER).unwrap_or(name)
    }
}

impl fmt::Display for SqlParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParameter::Positional => write!(f, "{}", Self::POSITIONAL_CHAR),
            SqlParameter::Named(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_by_kind_and_name() {
        assert_eq!(SqlParameter::Positional, SqlParameter::Positional);
        assert_eq!(SqlParameter::named("@id"), SqlParameter::named("@id"));
        assert_ne!(SqlParameter::named("@id"), SqlParameter::named("@name"));
        assert_ne!(SqlParameter::named("?"), SqlParameter::Positional);
    }

    #[test]
    fn normalization_strips_marker() {
        assert_eq!(SqlParameter::named("@id").normalized_name(), Some("id"));
        assert_eq!(SqlParameter::named("id").normalized_name(), Some("id"));
        assert_eq!(SqlParameter::Positional.normalized_name(), None);
        assert_eq!(SqlParameter::Positional.to_string(), "?");
    }
}
