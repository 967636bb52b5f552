use serde::{Deserialize, Serialize};

use crate::Result;

/// Per-connection settings consulted by the reference resolver.
///
/// `default_database` is assigned to every table that was written without a
/// database qualifier. `case_insensitive` governs every name comparison made
/// while resolving (table names, aliases, column names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub default_database: Option<String>,
    pub case_insensitive: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { default_database: None, case_insensitive: true }
    }
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_database(database: &str) -> Self {
        Self {
            default_database: Some(database.to_string()),
            ..Self::default()
        }
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_insensitive = false;
        self
    }

    /// Parse a config from JSON, e.g. `{"default_database":"Sales"}`.
    /// Missing keys take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compare two names under this connection's case rules.
    pub fn names_match(&self, a: &str, b: &str) -> bool {
        if self.case_insensitive {
            a.chars()
                .flat_map(char::to_lowercase)
                .eq(b.chars().flat_map(char::to_lowercase))
        } else {
            a == b
        }
    }

    /// Like [`ConnectionConfig::names_match`] for optional names: two absent
    /// names match, an absent and a present one do not.
    pub fn optional_names_match(&self, a: Option<&str>, b: Option<&str>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.names_match(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_case_insensitive_without_database() {
        let cfg = ConnectionConfig::new();
        assert!(cfg.case_insensitive);
        assert!(cfg.default_database.is_none());
        assert!(cfg.names_match("Customers", "CUSTOMERS"));
    }

    #[test]
    fn case_sensitive_compares_exactly() {
        let cfg = ConnectionConfig::with_default_database("Sales").case_sensitive();
        assert_eq!(cfg.default_database.as_deref(), Some("Sales"));
        assert!(!cfg.names_match("Name", "nAMe"));
        assert!(cfg.names_match("Name", "Name"));
    }

    #[test]
    fn loads_from_json_with_defaults() {
        let cfg = ConnectionConfig::from_json_str(r#"{ "default_database": "Sales" }"#).unwrap();
        assert_eq!(cfg, ConnectionConfig::with_default_database("Sales"));

        let cfg = ConnectionConfig::from_json_str(r#"{ "case_insensitive": false }"#).unwrap();
        assert!(!cfg.case_insensitive);

        assert!(ConnectionConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn optional_names() {
        let cfg = ConnectionConfig::new();
        assert!(cfg.optional_names_match(None, None));
        assert!(cfg.optional_names_match(Some("a"), Some("A")));
        assert!(!cfg.optional_names_match(Some("a"), None));
    }
}
