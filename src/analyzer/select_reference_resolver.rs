use std::fmt;

use crate::{
    analyzer::{TableFinder, TableWithColumnType},
    database::{ConnectionConfig, FunctionProvider, TableSchemaProvider},
    model::{
        SelectColumn, SqlAllColumns, SqlColumn, SqlColumnRef, SqlExpression, SqlFunction, SqlSelectDefinition,
        SqlTable,
    },
};

/// Resolution outcome; the error is the reason stored on the statement.
type Resolution<T = ()> = std::result::Result<T, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Select,
    JoinOn,
    Where,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Select => write!(f, "SELECT"),
            Clause::JoinOn => write!(f, "JOIN ON"),
            Clause::Where => write!(f, "WHERE"),
        }
    }
}

/// Binds the names of a SELECT statement to tables, columns and types.
///
/// Runs in two phases. Tables first get their database (the connection's
/// default one when none was written). Then projection columns, the ON
/// conditions in join order and WHERE are bound against the schemas of the
/// FROM/JOIN tables.
///
/// Problems with the statement itself are not errors: the first one is
/// stored as the statement's invalid reference reason and resolution stops.
pub struct SelectReferenceResolver<'a> {
    config: &'a ConnectionConfig,
    schema_provider: &'a dyn TableSchemaProvider,
    function_provider: Option<&'a dyn FunctionProvider>,
}

impl<'a> SelectReferenceResolver<'a> {
    pub fn new(
        config: &'a ConnectionConfig,
        schema_provider: &'a dyn TableSchemaProvider,
        function_provider: Option<&'a dyn FunctionProvider>,
    ) -> Self {
        Self { config, schema_provider, function_provider }
    }

    pub fn resolve(&self, select: &mut SqlSelectDefinition) {
        if select.invalid_references() {
            return;
        }

        let outcome = self
            .resolve_tables_database(select)
            .and_then(|_| self.resolve_references(select));

        if let Err(reason) = outcome {
            tracing::debug!(target: "sqlblocks::analyzer", %reason, "invalid references");
            select.set_invalid_reference_reason(reason);
        }
    }

    fn resolve_tables_database(&self, select: &mut SqlSelectDefinition) -> Resolution {
        tracing::debug!(target: "sqlblocks::analyzer", "resolving table databases");
        for table in select.tables_mut() {
            if table.database_name.as_deref().is_some_and(|db| !db.is_empty()) {
                continue;
            }
            match &self.config.default_database {
                Some(default) if !default.is_empty() => table.database_name = Some(default.clone()),
                _ => {
                    return Err(format!(
                        "The table {} has no database specified and no default database has been provided.",
                        table
                    ))
                }
            }
        }
        Ok(())
    }

    fn resolve_references(&self, select: &mut SqlSelectDefinition) -> Resolution {
        let tables: Vec<SqlTable> = select.tables().into_iter().cloned().collect();
        let finder = TableFinder::new(tables, self.schema_provider, self.config);

        tracing::debug!(target: "sqlblocks::analyzer", tables = finder.tables().len(), "binding projection");
        for column in select.columns.iter_mut() {
            match column {
                SelectColumn::Column(c) => self.bind_projected_column(c, &finder)?,
                SelectColumn::AllColumns(all) => self.expand_all_columns(all, &finder)?,
                SelectColumn::Function(f) => self.assign_function(&mut f.function),
                SelectColumn::Aggregate(_) | SelectColumn::Parameter(_) | SelectColumn::Literal(_) => {}
            }
        }

        let projected: Vec<SqlColumn> = select
            .columns
            .iter()
            .filter_map(|c| match c {
                SelectColumn::Column(c) => Some(c.clone()),
                _ => None,
            })
            .collect();

        for column in select.columns.iter_mut() {
            if let SelectColumn::Aggregate(aggregate) = column {
                if let Some(argument) = &mut aggregate.argument {
                    self.bind_expression(argument, Clause::Select, &projected, &finder)?;
                }
            }
        }

        tracing::debug!(target: "sqlblocks::analyzer", joins = select.joins.len(), "binding join conditions");
        for join in select.joins.iter_mut() {
            self.bind_expression(&mut join.condition.left, Clause::JoinOn, &projected, &finder)?;
            self.bind_expression(&mut join.condition.right, Clause::JoinOn, &projected, &finder)?;
        }

        if let Some(where_clause) = &mut select.where_clause {
            tracing::debug!(target: "sqlblocks::analyzer", "binding where clause");
            self.bind_expression(where_clause, Clause::Where, &projected, &finder)?;
        }
        Ok(())
    }

    fn bind_projected_column(&self, column: &mut SqlColumn, finder: &TableFinder) -> Resolution {
        let tables = finder.tables();
        let owner = if tables.len() == 1 && column.table_name.is_none() {
            tables.first()
        } else {
            self.qualified_owner(column.database_name.as_deref(), column.table_name.as_deref(), finder)
        };

        if let Some(table) = owner {
            let column_type = finder.column_type(table, &column.column_name).ok_or_else(|| {
                format!(
                    "The column {} in the SELECT statement either directly or indirectly references the table {}, but the schema of this table does not contain this column.",
                    column, table
                )
            })?;
            column.column_type = Some(column_type);
            column.table_ref = Some(table.clone());
            return Ok(());
        }

        if column.table_name.is_some() {
            return Err(format!(
                "The column {} in the SELECT statement does not reference a table in the FROM/JOIN statements.",
                column
            ));
        }

        let TableWithColumnType { table, column_type } = Self::single_owner(
            finder.possible_tables(&column.column_name),
            || format!(
                "The column {} in the SELECT statement does not directly refer to a table and no tables claim a column of this name in their schema.",
                column
            ),
            || format!(
                "The column {} in the SELECT statement does not directly refer to a table, but multiple tables claim a column of this name in their schema. The column is ambiguous as a result.",
                column
            ),
        )?;
        column.column_type = Some(column_type);
        column.table_ref = Some(table);
        Ok(())
    }

    /// Table a qualifier points at. An alias wins over a table name.
    fn qualified_owner<'f>(
        &self,
        database_name: Option<&str>,
        table_name: Option<&str>,
        finder: &'f TableFinder,
    ) -> Option<&'f SqlTable> {
        let table_name = table_name?;
        let tables = finder.tables();
        if database_name.is_none() {
            if let Some(aliased) = tables.iter().find(|t| finder.is_alias_of(table_name, t)) {
                return Some(aliased);
            }
        }
        tables
            .iter()
            .find(|t| finder.references_table(database_name, Some(table_name), t))
    }

    fn expand_all_columns(&self, all: &mut SqlAllColumns, finder: &TableFinder) -> Resolution {
        all.table_refs = match &all.table_name {
            Some(table_name) => {
                let table = self.qualified_owner(None, Some(table_name.as_str()), finder).ok_or_else(|| {
                    format!(
                        "The {}.* column in the SELECT statement does not reference a table in the FROM/JOIN statements.",
                        table_name
                    )
                })?;
                vec![table.clone()]
            }
            None => finder.tables().to_vec(),
        };

        all.columns.clear();
        for table in &all.table_refs {
            let columns = self
                .schema_provider
                .get_columns(table)
                .ok_or_else(|| format!("The schema provider returned no columns for the table {}.", table))?;
            all.columns
                .extend(columns.iter().map(|c| SqlColumn::bound(table, &c.name, c.data_type)));
        }
        Ok(())
    }

    fn assign_function(&self, function: &mut SqlFunction) {
        if let Some(provider) = self.function_provider {
            function.value_type = provider.get_data_type(function);
            function.calculate_value = provider.get_data_value(function);
        }
    }

    fn bind_expression(
        &self,
        expression: &mut SqlExpression,
        clause: Clause,
        projected: &[SqlColumn],
        finder: &TableFinder,
    ) -> Resolution {
        match expression {
            SqlExpression::BinExpr(binary) => {
                self.bind_expression(&mut binary.left, clause, projected, finder)?;
                self.bind_expression(&mut binary.right, clause, projected, finder)
            }
            SqlExpression::Column(column_ref) => self.bind_column_ref(column_ref, clause, projected, finder),
            SqlExpression::Parameter(_) | SqlExpression::Function(_) | SqlExpression::Value(_) => Ok(()),
        }
    }

    fn bind_column_ref(
        &self,
        column_ref: &mut SqlColumnRef,
        clause: Clause,
        projected: &[SqlColumn],
        finder: &TableFinder,
    ) -> Resolution {
        if let Some(column) = projected.iter().find(|c| column_ref.refers_to(c, self.config)) {
            column_ref.column = Some(column.clone());
            return Ok(());
        }

        let found = match finder.matched_table(column_ref)? {
            Some(found) => found,
            None => self.hunt_for_table(column_ref, clause, finder)?,
        };

        column_ref.column = Some(SqlColumn::bound(&found.table, &column_ref.column_name, found.column_type));
        Ok(())
    }

    fn hunt_for_table(&self, column_ref: &SqlColumnRef, clause: Clause, finder: &TableFinder) -> Resolution<TableWithColumnType> {
        let possible = finder.possible_tables(&column_ref.column_name);

        if let Some(table_name) = &column_ref.table_name {
            return possible
                .into_iter()
                .find(|t| finder.references_table(column_ref.database_name.as_deref(), Some(table_name.as_str()), &t.table))
                .ok_or_else(|| {
                    format!(
                        "The column {} in the {} statement, specifies the table name {}, but there is either no table with that name or the table does not have a column by this name.",
                        column_ref, clause, table_name
                    )
                });
        }

        Self::single_owner(
            possible,
            || format!(
                "The column {} in the {} statement does not directly refer to a column of the SELECT columns and no tables claim a column of this name in their schema.",
                column_ref, clause
            ),
            || format!(
                "The column {} in the {} statement does not directly refer to a table, but multiple tables claim a column of this name in their schema. The column is ambiguous as a result.",
                column_ref, clause
            ),
        )
    }

    fn single_owner(
        mut possible: Vec<TableWithColumnType>,
        no_owner: impl FnOnce() -> String,
        ambiguous: impl FnOnce() -> String,
    ) -> Resolution<TableWithColumnType> {
        match possible.len() {
            0 => Err(no_owner()),
            1 => Ok(possible.remove(0)),
            _ => Err(ambiguous()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        database::{DataType, MemoryDatabase, MemoryTable, Value, ValueResolver},
        model::{SqlAggregate, SqlBinaryOperator, SqlJoin},
    };

    fn sales() -> MemoryDatabase {
        MemoryDatabase::new("Sales")
            .with_table(MemoryTable::with_columns(
                "Customers",
                &[("ID", DataType::Int), ("CustomerName", DataType::String)],
            ))
            .unwrap()
            .with_table(MemoryTable::with_columns(
                "Orders",
                &[("ID", DataType::Int), ("CustomerID", DataType::Int), ("Total", DataType::Decimal)],
            ))
            .unwrap()
    }

    fn config() -> ConnectionConfig {
        ConnectionConfig::with_default_database("Sales")
    }

    fn resolve(select: &mut SqlSelectDefinition, config: &ConnectionConfig) {
        select.resolve_references(config, &sales(), None);
    }

    fn customers_join_orders() -> SqlSelectDefinition {
        SqlSelectDefinition::from_table(SqlTable::new(None, "Customers").with_alias("c"))
            .with_join(SqlJoin::inner(
                SqlTable::new(None, "Orders").with_alias("o"),
                crate::model::SqlBinaryExpression::new(
                    SqlExpression::qualified("c", "ID"),
                    SqlBinaryOperator::Equal,
                    SqlExpression::qualified("o", "CustomerID"),
                ),
            ))
    }

    fn where_ref(select: &SqlSelectDefinition) -> &SqlColumnRef {
        match select.where_clause.as_ref().and_then(|w| w.as_binary()).map(|b| &b.left) {
            Some(SqlExpression::Column(r)) => r,
            other => panic!("unexpected where clause {:?}", other),
        }
    }

    #[test]
    fn default_database_is_applied() {
        let mut select = SqlSelectDefinition::from_table(SqlTable::new(None, "Customers"))
            .with_column(SelectColumn::column("CustomerName"));
        resolve(&mut select, &config());

        assert!(!select.invalid_references(), "{:?}", select.invalid_reference_reason());
        assert_eq!(select.table.as_ref().unwrap().database_name.as_deref(), Some("Sales"));
        let SelectColumn::Column(c) = &select.columns[0] else { panic!() };
        assert_eq!(c.column_type, Some(DataType::String));
        assert_eq!(c.table_ref, Some(SqlTable::new(Some("Sales"), "Customers")));
    }

    #[test]
    fn missing_default_database_is_reported() {
        let mut select = SqlSelectDefinition::from_table(SqlTable::new(None, "Customers"))
            .with_column(SelectColumn::column("CustomerName"));
        resolve(&mut select, &ConnectionConfig::new());

        assert_eq!(
            select.invalid_reference_reason(),
            Some("The table Customers has no database specified and no default database has been provided.")
        );
        // stops before binding
        let SelectColumn::Column(c) = &select.columns[0] else { panic!() };
        assert!(!c.is_resolved());
    }

    #[test]
    fn alias_takes_precedence_over_table_name() {
        // FROM Customers AS Orders JOIN Orders AS Customers
        let mut select = SqlSelectDefinition::from_table(SqlTable::new(None, "Customers").with_alias("Orders"))
            .with_column(SelectColumn::qualified("Orders", "CustomerName"))
            .with_column(SelectColumn::qualified("Customers", "Total"))
            .with_join(SqlJoin::inner(
                SqlTable::new(None, "Orders").with_alias("Customers"),
                crate::model::SqlBinaryExpression::new(
                    SqlExpression::qualified("Orders", "ID"),
                    SqlBinaryOperator::Equal,
                    SqlExpression::qualified("Customers", "CustomerID"),
                ),
            ));
        resolve(&mut select, &config());

        assert!(!select.invalid_references(), "{:?}", select.invalid_reference_reason());
        let owners: Vec<_> = select
            .columns
            .iter()
            .map(|c| match c {
                SelectColumn::Column(c) => c.table_ref.as_ref().unwrap().table_name.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(owners, vec!["Customers", "Orders"]);

        let on = &select.joins[0].condition;
        let SqlExpression::Column(right) = &on.right else { panic!() };
        assert_eq!(right.bound_table().unwrap().table_name, "Orders");
    }

    #[test]
    fn ambiguous_and_unknown_columns_are_reported() {
        let mut select = customers_join_orders().with_column(SelectColumn::column("ID"));
        resolve(&mut select, &config());
        assert!(select.invalid_reference_reason().unwrap().contains("ambiguous"));

        let mut select = customers_join_orders().with_column(SelectColumn::column("Nope"));
        resolve(&mut select, &config());
        assert!(select.invalid_reference_reason().unwrap().contains("no tables claim"));

        let mut select = customers_join_orders().with_column(SelectColumn::qualified("x", "ID"));
        resolve(&mut select, &config());
        assert!(select
            .invalid_reference_reason()
            .unwrap()
            .contains("does not reference a table in the FROM/JOIN"));
    }

    #[test]
    fn qualified_column_missing_from_schema_is_a_hard_failure() {
        let mut select = customers_join_orders().with_column(SelectColumn::qualified("c", "Total"));
        resolve(&mut select, &config());
        assert!(select
            .invalid_reference_reason()
            .unwrap()
            .contains("the schema of this table does not contain this column"));
    }

    #[test]
    fn wildcards_expand_in_schema_order() {
        let mut select = customers_join_orders()
            .with_column(SelectColumn::all())
            .with_column(SelectColumn::AllColumns(SqlAllColumns::of_table("o")));
        resolve(&mut select, &config());
        assert!(!select.invalid_references());

        let SelectColumn::AllColumns(all) = &select.columns[0] else { panic!() };
        let names: Vec<_> = all
            .columns
            .iter()
            .map(|c| format!("{}.{}", c.table_name.as_deref().unwrap(), c.column_name))
            .collect();
        assert_eq!(
            names,
            vec!["Customers.ID", "Customers.CustomerName", "Orders.ID", "Orders.CustomerID", "Orders.Total"]
        );

        let SelectColumn::AllColumns(orders) = &select.columns[1] else { panic!() };
        assert_eq!(orders.table_refs, vec![SqlTable::new(Some("Sales"), "Orders")]);
        assert_eq!(orders.columns.len(), 3);
        assert_eq!(orders.columns[2].column_type, Some(DataType::Decimal));

        let mut select = customers_join_orders().with_column(SelectColumn::AllColumns(SqlAllColumns::of_table("x")));
        resolve(&mut select, &config());
        assert_eq!(
            select.invalid_reference_reason(),
            Some("The x.* column in the SELECT statement does not reference a table in the FROM/JOIN statements.")
        );
    }

    #[test]
    fn where_references_bind_to_hidden_columns_or_projection() {
        let mut select = customers_join_orders()
            .with_column(SelectColumn::qualified("c", "CustomerName").with_alias("Name"))
            .with_where(SqlExpression::binary(
                SqlExpression::column("Total"),
                SqlBinaryOperator::GreaterThan,
                SqlExpression::value(10),
            ));
        resolve(&mut select, &config());
        assert!(!select.invalid_references(), "{:?}", select.invalid_reference_reason());

        let total = where_ref(&select);
        let hidden = total.column.as_ref().unwrap();
        assert_eq!(hidden.table_ref, Some(SqlTable::new(Some("Sales"), "Orders")));
        assert_eq!(hidden.column_type, Some(DataType::Decimal));
        assert_eq!(hidden.column_alias, None);

        let mut select = customers_join_orders()
            .with_column(SelectColumn::qualified("c", "CustomerName").with_alias("Name"))
            .with_where(SqlExpression::binary(
                SqlExpression::column("name"),
                SqlBinaryOperator::Like,
                SqlExpression::value("J%"),
            ));
        resolve(&mut select, &config());
        assert!(!select.invalid_references());
        assert_eq!(where_ref(&select).column.as_ref().unwrap().column_alias.as_deref(), Some("Name"));
    }

    #[test]
    fn where_failures_name_their_clause() {
        let mut select = customers_join_orders()
            .with_column(SelectColumn::qualified("c", "CustomerName"))
            .with_where(SqlExpression::binary(SqlExpression::column("ID"), SqlBinaryOperator::Equal, SqlExpression::value(1)));
        resolve(&mut select, &config());
        let reason = select.invalid_reference_reason().unwrap();
        assert!(reason.contains("WHERE") && reason.contains("ambiguous"), "{}", reason);

        let mut select = SqlSelectDefinition::from_table(SqlTable::new(None, "Customers"))
            .with_column(SelectColumn::column("ID"))
            .with_join(SqlJoin::inner(
                SqlTable::new(None, "Orders"),
                crate::model::SqlBinaryExpression::new(
                    SqlExpression::qualified("Customers", "ID"),
                    SqlBinaryOperator::Equal,
                    SqlExpression::qualified("Orders", "Missing"),
                ),
            ));
        resolve(&mut select, &config());
        // the projected ID is ambiguous before the ON condition is reached
        assert!(select.invalid_reference_reason().unwrap().contains("SELECT"));

        let mut select = SqlSelectDefinition::from_table(SqlTable::new(None, "Customers"))
            .with_column(SelectColumn::qualified("Customers", "ID"))
            .with_join(SqlJoin::inner(
                SqlTable::new(None, "Orders"),
                crate::model::SqlBinaryExpression::new(
                    SqlExpression::qualified("Customers", "ID"),
                    SqlBinaryOperator::Equal,
                    SqlExpression::qualified("Orders", "Missing"),
                ),
            ));
        resolve(&mut select, &config());
        assert!(select.invalid_reference_reason().unwrap().contains("JOIN ON"));
    }

    #[test]
    fn database_qualified_references_need_a_matching_table() {
        let mut select = SqlSelectDefinition::from_table(SqlTable::new(None, "Customers"))
            .with_column(SelectColumn::column("CustomerName"))
            .with_where(SqlExpression::binary(
                SqlExpression::Column(SqlColumnRef::new(Some("Other"), Some("Customers"), "ID")),
                SqlBinaryOperator::Equal,
                SqlExpression::value(1),
            ));
        resolve(&mut select, &config());
        assert!(select.invalid_reference_reason().unwrap().contains("specifies the database"));

        let mut select = SqlSelectDefinition::from_table(SqlTable::new(None, "Customers"))
            .with_column(SelectColumn::column("CustomerName"))
            .with_where(SqlExpression::binary(
                SqlExpression::Column(SqlColumnRef::new(Some("Sales"), Some("Customers"), "ID")),
                SqlBinaryOperator::Equal,
                SqlExpression::value(1),
            ));
        resolve(&mut select, &config());
        assert!(!select.invalid_references());
        assert_eq!(where_ref(&select).column.as_ref().unwrap().column_type, Some(DataType::Int));
    }

    #[test]
    fn case_sensitive_connections_do_not_fold_names() {
        let mut select = SqlSelectDefinition::from_table(SqlTable::new(None, "Customers"))
            .with_column(SelectColumn::column("customername"));
        resolve(&mut select, &config().case_sensitive());
        assert!(select.invalid_references());

        let mut select = SqlSelectDefinition::from_table(SqlTable::new(None, "Customers"))
            .with_column(SelectColumn::column("customername"));
        resolve(&mut select, &config());
        assert!(!select.invalid_references());
    }

    #[test]
    fn resolution_is_deterministic() {
        let build = || {
            customers_join_orders()
                .with_column(SelectColumn::all())
                .with_column(SelectColumn::column("Total"))
                .with_where(SqlExpression::binary(
                    SqlExpression::qualified("c", "CustomerName"),
                    SqlBinaryOperator::Like,
                    SqlExpression::value("J%"),
                ))
        };
        let mut a = build();
        let mut b = build();
        resolve(&mut a, &config());
        resolve(&mut b, &config());
        assert!(!a.invalid_references());
        assert_eq!(a, b);

        // resolving again changes nothing
        let snapshot = a.clone();
        resolve(&mut a, &config());
        assert_eq!(a, snapshot);
    }

    #[test]
    fn aggregate_arguments_are_bound() {
        let mut select = SqlSelectDefinition::from_table(SqlTable::new(None, "Orders")).with_column(
            SelectColumn::Aggregate(SqlAggregate {
                aggregate_name: "MAX".into(),
                argument: Some(SqlExpression::column("Total")),
                column_alias: None,
            }),
        );
        resolve(&mut select, &config());
        let SelectColumn::Aggregate(a) = &select.columns[0] else { panic!() };
        let Some(SqlExpression::Column(r)) = &a.argument else { panic!() };
        assert_eq!(r.column.as_ref().unwrap().column_type, Some(DataType::Decimal));
    }

    struct Clock;

    impl FunctionProvider for Clock {
        fn get_data_type(&self, _function: &SqlFunction) -> Option<DataType> {
            Some(DataType::Int)
        }
        fn get_data_value(&self, _function: &SqlFunction) -> Option<ValueResolver> {
            Some(Arc::new(|| Value::Int(12)))
        }
    }

    #[test]
    fn function_columns_get_type_and_resolver() {
        let mut select = SqlSelectDefinition::new().with_column(SelectColumn::function(SqlFunction::new("HOUR")));
        select.resolve_references(&config(), &sales(), Some(&Clock));

        let SelectColumn::Function(f) = &select.columns[0] else { panic!() };
        assert_eq!(f.function.value_type, Some(DataType::Int));
        assert_eq!((f.function.calculate_value.as_ref().unwrap())(), Value::Int(12));

        let mut without = SqlSelectDefinition::new().with_column(SelectColumn::function(SqlFunction::new("HOUR")));
        resolve(&mut without, &config());
        let SelectColumn::Function(f) = &without.columns[0] else { panic!() };
        assert!(f.function.calculate_value.is_none());
    }
}
