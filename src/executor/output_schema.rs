use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::Arc,
};

use crate::{
    database::{DataType, Value, ValueResolver},
    executor::{level_of, Row, RowLayout},
    model::{SelectColumn, SqlColumn, SqlSelectDefinition, SqlTable},
    Error, Result,
};

/// Where the values of an output column come from.
#[derive(Clone)]
pub enum ColumnSource {
    /// A column of one of the FROM/JOIN tables; `level` is the table's
    /// position in the join chain.
    Table { table: SqlTable, level: usize, column: String },
    /// Computed for every row.
    Resolver(ValueResolver),
}

impl fmt::Debug for ColumnSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table { table, level, column } => f
                .debug_struct("Table")
                .field("table", table)
                .field("level", level)
                .field("column", column)
                .finish(),
            Self::Resolver(_) => write!(f, "Resolver(<fn>)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputColumn {
    pub name: String,
    pub data_type: DataType,
    pub source: ColumnSource,
}

/// Columns of a result set, in projection order.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    columns: Vec<OutputColumn>,
    layout: Arc<RowLayout>,
}

struct Candidate {
    column_name: Option<String>,
    alias: Option<String>,
    data_type: DataType,
    source: ColumnSource,
}

impl OutputSchema {
    pub const COUNT_COLUMN: &'static str = "Count";

    /// Fails when two columns end up with the same name.
    pub fn new(columns: Vec<OutputColumn>) -> Result<Self> {
        let mut layout = RowLayout::with_capacity(columns.len());
        for c in &columns {
            if !layout.insert(c.name.clone()) {
                return Err(Error::DuplicateColumn(c.name.clone()));
            }
        }
        Ok(Self { columns, layout: Arc::new(layout) })
    }

    /// Schema of a `COUNT(*)` result.
    pub fn count() -> Self {
        let column = OutputColumn {
            name: Self::COUNT_COLUMN.to_string(),
            data_type: DataType::Long,
            source: ColumnSource::Resolver(Arc::new(|| Value::Null)),
        };
        Self { layout: Arc::new(std::iter::once(column.name.clone()).collect()), columns: vec![column] }
    }

    /// Output columns of a resolved SELECT, plus whether it is a `COUNT(*)`
    /// query (in which case the returned schema is the count schema).
    ///
    /// Columns take their alias, or their name. A name shared by several
    /// projection items is prefixed with the owning table's name, or with
    /// the table's alias when the table appears more than once.
    pub fn from_select(select: &SqlSelectDefinition) -> Result<(Self, bool)> {
        if Self::is_count_all(select)? {
            return Ok((Self::count(), true));
        }

        let tables: Vec<SqlTable> = select.tables().into_iter().cloned().collect();
        let mut candidates = Vec::with_capacity(select.columns.len());
        let mut unnamed = 0;
        for item in &select.columns {
            match item {
                SelectColumn::Column(c) => candidates.push(Self::table_candidate(c, &tables)?),
                SelectColumn::AllColumns(all) => {
                    for c in &all.columns {
                        candidates.push(Self::table_candidate(c, &tables)?);
                    }
                }
                SelectColumn::Function(f) => {
                    let resolver = f
                        .function
                        .calculate_value
                        .clone()
                        .ok_or_else(|| Error::MissingValueResolver(f.function.to_string()))?;
                    candidates.push(Candidate {
                        column_name: Some(f.function.function_name.clone()),
                        alias: f.column_alias.clone(),
                        data_type: f.function.value_type.unwrap_or(DataType::String),
                        source: ColumnSource::Resolver(resolver),
                    });
                }
                SelectColumn::Literal(l) => {
                    let alias = l.column_alias.clone().unwrap_or_else(|| {
                        unnamed += 1;
                        format!("Column{}", unnamed)
                    });
                    let value = l.value.to_value();
                    candidates.push(Candidate {
                        column_name: None,
                        alias: Some(alias),
                        data_type: l.value.data_type().unwrap_or(DataType::String),
                        source: ColumnSource::Resolver(Arc::new(move || value.clone())),
                    });
                }
                SelectColumn::Parameter(p) => return Err(Error::UnresolvedParameter(p.parameter.to_string())),
                SelectColumn::Aggregate(_) => return Err(Error::UnsupportedAggregate(item.to_string())),
            }
        }

        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for c in &candidates {
            if let Some(name) = c.column_name.as_deref() {
                *occurrences.entry(name).or_default() += 1;
            }
        }

        // a name shared by two levels of the same table (a self-join) is
        // prefixed with the alias instead
        let mut per_table: HashMap<(&str, String), HashSet<usize>> = HashMap::new();
        for c in &candidates {
            if let (Some(name), ColumnSource::Table { table, level, .. }) = (c.column_name.as_deref(), &c.source) {
                per_table.entry((name, table.table_name.to_lowercase())).or_default().insert(*level);
            }
        }

        let columns = candidates
            .iter()
            .map(|c| {
                let duplicate = c.column_name.as_deref().is_some_and(|n| occurrences[n] > 1);
                let shared_table = match (c.column_name.as_deref(), &c.source) {
                    (Some(name), ColumnSource::Table { table, .. }) => {
                        per_table.get(&(name, table.table_name.to_lowercase())).is_some_and(|l| l.len() > 1)
                    }
                    _ => false,
                };
                Ok(OutputColumn {
                    name: Self::output_name(c, duplicate, shared_table)?,
                    data_type: c.data_type,
                    source: c.source.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((Self::new(columns)?, false))
    }

    pub fn columns(&self) -> &[OutputColumn] {
        &self.columns
    }

    pub fn layout(&self) -> &Arc<RowLayout> {
        &self.layout
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.layout.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Exact name first, then the first case-insensitive match.
    pub fn get(&self, name: &str) -> Option<&OutputColumn> {
        self.layout
            .get_index_of(name)
            .or_else(|| self.layout.iter().position(|n| n.eq_ignore_ascii_case(name)))
            .map(|i| &self.columns[i])
    }

    /// Build an output row from the rows chosen at each level of the join chain.
    pub fn project(&self, rows: &[Row]) -> Result<Row> {
        let values = self
            .columns
            .iter()
            .map(|c| match &c.source {
                ColumnSource::Resolver(resolver) => Ok(resolver()),
                ColumnSource::Table { table, level, column } => rows
                    .get(*level)
                    .and_then(|r| r.get(column))
                    .cloned()
                    .ok_or_else(|| Error::ColumnNotFound { table: table.to_string(), column: column.clone() }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Row::new(self.layout.clone(), values))
    }

    fn is_count_all(select: &SqlSelectDefinition) -> Result<bool> {
        let mut count = false;
        for item in &select.columns {
            if let SelectColumn::Aggregate(a) = item {
                if !a.is_count() || a.argument.is_some() {
                    return Err(Error::UnsupportedAggregate(item.to_string()));
                }
                count = true;
            }
        }
        if count && select.columns.len() > 1 {
            return Err(Error::CountNotAlone);
        }
        Ok(count)
    }

    fn table_candidate(column: &SqlColumn, tables: &[SqlTable]) -> Result<Candidate> {
        let table = column
            .table_ref
            .as_ref()
            .ok_or_else(|| Error::UnboundColumn(column.to_string()))?;
        let level = level_of(tables, table).ok_or_else(|| Error::TableNotFound(table.to_string()))?;
        Ok(Candidate {
            column_name: Some(column.column_name.clone()),
            alias: column.column_alias.clone(),
            data_type: column.column_type.unwrap_or(DataType::String),
            source: ColumnSource::Table { table: table.clone(), level, column: column.column_name.clone() },
        })
    }

    fn output_name(candidate: &Candidate, duplicate: bool, shared_table: bool) -> Result<String> {
        if let Some(alias) = candidate.alias.as_deref().filter(|a| !a.is_empty()) {
            return Ok(alias.to_string());
        }
        let name = candidate.column_name.clone().unwrap_or_default();
        if !duplicate {
            return Ok(name);
        }
        match &candidate.source {
            ColumnSource::Table { table, .. } if shared_table => Ok(format!("{}.{}", table.display_name(), name)),
            ColumnSource::Table { table, .. } => Ok(format!("{}.{}", table.table_name, name)),
            ColumnSource::Resolver(_) => Err(Error::DuplicateColumn(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SqlAggregate, SqlAllColumns, SqlExpression, SqlFunction, SqlLiteralValue};

    fn customers() -> SqlTable {
        SqlTable::new(Some("Sales"), "Customers").with_alias("c")
    }

    fn orders() -> SqlTable {
        SqlTable::new(Some("Sales"), "Orders").with_alias("o")
    }

    fn bound(table: &SqlTable, name: &str, ty: DataType) -> SelectColumn {
        SelectColumn::Column(SqlColumn::bound(table, name, ty))
    }

    fn joined() -> SqlSelectDefinition {
        let on = crate::model::SqlBinaryExpression::new(
            SqlExpression::value(1),
            crate::model::SqlBinaryOperator::Equal,
            SqlExpression::value(1),
        );
        SqlSelectDefinition::from_table(customers()).with_join(crate::model::SqlJoin::inner(orders(), on))
    }

    fn names(schema: &OutputSchema) -> Vec<&str> {
        schema.names().map(String::as_str).collect()
    }

    #[test]
    fn duplicate_names_get_table_prefix() {
        let select = joined()
            .with_column(bound(&customers(), "ID", DataType::Int))
            .with_column(bound(&orders(), "ID", DataType::Long))
            .with_column(bound(&customers(), "CustomerName", DataType::String));
        let (schema, count) = OutputSchema::from_select(&select).unwrap();
        assert!(!count);
        assert_eq!(names(&schema), vec!["Customers.ID", "Orders.ID", "CustomerName"]);
        assert_eq!(schema.columns()[1].data_type, DataType::Long);
    }

    #[test]
    fn aliases_win_and_untyped_columns_are_strings() {
        let mut untyped = SqlColumn::bound(&customers(), "Notes", DataType::Int);
        untyped.column_type = None;
        let select = joined()
            .with_column(bound(&customers(), "ID", DataType::Int).with_alias("CustomerID"))
            .with_column(bound(&orders(), "ID", DataType::Int))
            .with_column(SelectColumn::Column(untyped));
        let (schema, _) = OutputSchema::from_select(&select).unwrap();
        assert_eq!(names(&schema), vec!["CustomerID", "Orders.ID", "Notes"]);
        assert_eq!(schema.get("notes").unwrap().data_type, DataType::String);
    }

    #[test]
    fn wildcards_expand_in_order() {
        let all = SqlAllColumns {
            table_name: None,
            table_refs: vec![customers(), orders()],
            columns: vec![
                SqlColumn::bound(&customers(), "ID", DataType::Int),
                SqlColumn::bound(&customers(), "CustomerName", DataType::String),
                SqlColumn::bound(&orders(), "ID", DataType::Int),
                SqlColumn::bound(&orders(), "CustomerID", DataType::Int),
            ],
        };
        let (schema, _) = OutputSchema::from_select(&joined().with_column(SelectColumn::AllColumns(all))).unwrap();
        assert_eq!(names(&schema), vec!["Customers.ID", "CustomerName", "Orders.ID", "CustomerID"]);
        assert!(matches!(schema.columns()[3].source, ColumnSource::Table { level: 1, .. }));
    }

    #[test]
    fn count_must_be_alone() {
        let count = SelectColumn::Aggregate(SqlAggregate::count_all());
        let alone = SqlSelectDefinition::from_table(customers()).with_column(count.clone());
        let (schema, is_count) = OutputSchema::from_select(&alone).unwrap();
        assert!(is_count);
        assert_eq!(names(&schema), vec!["Count"]);
        assert_eq!(schema.columns()[0].data_type, DataType::Long);

        let crowded = alone.with_column(bound(&customers(), "ID", DataType::Int));
        assert_eq!(OutputSchema::from_select(&crowded).unwrap_err(), Error::CountNotAlone);
    }

    #[test]
    fn other_aggregates_are_unsupported() {
        let max = SqlAggregate {
            aggregate_name: "MAX".into(),
            argument: Some(SqlExpression::column("ID")),
            column_alias: None,
        };
        let select = SqlSelectDefinition::from_table(customers()).with_column(SelectColumn::Aggregate(max));
        assert!(matches!(OutputSchema::from_select(&select), Err(Error::UnsupportedAggregate(_))));
    }

    #[test]
    fn functions_need_a_resolver() {
        let select = SqlSelectDefinition::new().with_column(SelectColumn::function(SqlFunction::new("NOW")));
        assert!(matches!(OutputSchema::from_select(&select), Err(Error::MissingValueResolver(_))));

        let f = SqlFunction::new("ANSWER").with_resolver(DataType::Int, Arc::new(|| Value::Int(42)));
        let select = SqlSelectDefinition::new()
            .with_column(SelectColumn::function(f))
            .with_column(SelectColumn::literal(SqlLiteralValue::from("x")));
        let (schema, _) = OutputSchema::from_select(&select).unwrap();
        assert_eq!(names(&schema), vec!["ANSWER", "Column1"]);
        let row = schema.project(&[]).unwrap();
        assert_eq!(row.values(), &[Value::Int(42), Value::from("x")]);
    }

    #[test]
    fn duplicate_function_names_cannot_be_prefixed() {
        let f = SqlFunction::new("ANSWER").with_resolver(DataType::Int, Arc::new(|| Value::Int(42)));
        let select = SqlSelectDefinition::new()
            .with_column(SelectColumn::function(f.clone()))
            .with_column(SelectColumn::function(f));
        assert_eq!(OutputSchema::from_select(&select).unwrap_err(), Error::DuplicateColumn("ANSWER".into()));
    }

    #[test]
    fn names_differing_in_case_stay_distinct() {
        let select = SqlSelectDefinition::from_table(customers())
            .with_column(bound(&customers(), "Name", DataType::String))
            .with_column(bound(&customers(), "nAMe", DataType::String));
        let (schema, _) = OutputSchema::from_select(&select).unwrap();
        assert_eq!(names(&schema), vec!["Name", "nAMe"]);
    }

    #[test]
    fn self_join_duplicates_are_prefixed_with_the_alias() {
        let e = SqlTable::new(Some("Sales"), "Employees").with_alias("e");
        let m = SqlTable::new(Some("Sales"), "Employees").with_alias("m");
        let on = crate::model::SqlBinaryExpression::new(
            SqlExpression::value(1),
            crate::model::SqlBinaryOperator::Equal,
            SqlExpression::value(1),
        );
        let select = SqlSelectDefinition::from_table(e.clone())
            .with_join(crate::model::SqlJoin::inner(m.clone(), on))
            .with_column(bound(&e, "Name", DataType::String))
            .with_column(bound(&m, "Name", DataType::String))
            .with_column(bound(&m, "ID", DataType::Int));
        let (schema, _) = OutputSchema::from_select(&select).unwrap();
        assert_eq!(names(&schema), vec!["e.Name", "m.Name", "ID"]);
        assert!(matches!(schema.columns()[1].source, ColumnSource::Table { level: 1, .. }));
    }
}
