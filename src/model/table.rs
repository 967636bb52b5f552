use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// A table mentioned by a statement.
///
/// Identity is `(database_name, table_name)` compared case-insensitively;
/// the alias only takes part in name resolution.
#[derive(Debug, Clone, Default)]
pub struct SqlTable {
    pub database_name: Option<String>,
    pub table_name: String,
    pub table_alias: Option<String>,
}

impl SqlTable {
    pub fn new(database_name: Option<&str>, table_name: &str) -> Self {
        Self {
            database_name: database_name.map(str::to_string),
            table_name: table_name.to_string(),
            table_alias: None,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.table_alias = Some(alias.to_string());
        self
    }

    /// Alias if present, table name otherwise.
    pub fn display_name(&self) -> &str {
        self.table_alias.as_deref().unwrap_or(&self.table_name)
    }
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

fn eq_folded(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => folded(a).eq(folded(b)),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for SqlTable {
    fn eq(&self, other: &Self) -> bool {
        eq_folded(self.database_name.as_deref(), other.database_name.as_deref())
            && eq_folded(Some(&self.table_name), Some(&other.table_name))
    }
}

impl Eq for SqlTable {}

impl Hash for SqlTable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let Some(db) = &self.database_name {
            folded(db).for_each(|c| c.hash(state));
        }
        state.write_u8(0xff);
        folded(&self.table_name).for_each(|c| c.hash(state));
    }
}

impl fmt::Display for SqlTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(db) = &self.database_name {
            write!(f, "{}.", db)?;
        }
        write!(f, "{}", self.table_name)?;
        if let Some(alias) = &self.table_alias {
            write!(f, " AS {}", alias)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn identity_ignores_case_and_alias() {
        let a = SqlTable::new(Some("Sales"), "Customers").with_alias("c");
        let b = SqlTable::new(Some("SALES"), "customers");
        assert_eq!(a, b);

        let mut map = HashMap::new();
        map.insert(a, 1);
        assert_eq!(map.get(&b), Some(&1));
    }

    #[test]
    fn database_is_part_of_identity() {
        assert_ne!(SqlTable::new(Some("A"), "T"), SqlTable::new(Some("B"), "T"));
        assert_ne!(SqlTable::new(None, "T"), SqlTable::new(Some("B"), "T"));
    }

    #[test]
    fn display_includes_database_and_alias() {
        let t = SqlTable::new(Some("Sales"), "Customers").with_alias("c");
        assert_eq!(t.to_string(), "Sales.Customers AS c");
        assert_eq!(SqlTable::new(None, "Orders").to_string(), "Orders");
        assert_eq!(t.display_name(), "c");
    }
}
