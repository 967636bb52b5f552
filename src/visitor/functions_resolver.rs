use crate::{
    database::FunctionProvider,
    model::{SqlExpression, SqlFunction, SqlLiteralValue},
    visitor::SqlVisitor,
    Result,
};

/// Replaces statement-scoped functions (`LAST_INSERT_ID()`, `NOW()`, ...)
/// with the literal they evaluate to.
///
/// The callback returns `None` for functions that have to be evaluated per
/// row; those are left in place.
pub struct FunctionsResolver<F>
where
    F: FnMut(&SqlFunction) -> Option<SqlLiteralValue>,
{
    evaluate: F,
}

impl<F> FunctionsResolver<F>
where
    F: FnMut(&SqlFunction) -> Option<SqlLiteralValue>,
{
    pub fn new(evaluate: F) -> Self {
        Self { evaluate }
    }
}

impl<'a> FunctionsResolver<Box<dyn FnMut(&SqlFunction) -> Option<SqlLiteralValue> + 'a>> {
    /// Evaluate every function the provider knows once, right now.
    pub fn from_provider(provider: &'a dyn FunctionProvider) -> Self {
        Self::new(Box::new(move |function: &SqlFunction| {
            let resolver = provider.get_data_value(function)?;
            Some(SqlLiteralValue::from_value(&resolver()))
        }))
    }
}

impl<F> SqlVisitor for FunctionsResolver<F>
where
    F: FnMut(&SqlFunction) -> Option<SqlLiteralValue>,
{
    fn visit_function(&mut self, function: &SqlFunction) -> Result<Option<SqlExpression>> {
        let value = (self.evaluate)(function);
        if let Some(value) = &value {
            tracing::trace!(target: "sqlblocks::visitor", %function, %value, "function resolved");
        }
        Ok(value.map(SqlExpression::Value))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        database::{DataType, Value, ValueResolver},
        model::{SelectColumn, SqlBinaryOperator, SqlSelectDefinition, SqlTable},
    };

    struct LastInsertId;

    impl FunctionProvider for LastInsertId {
        fn get_data_type(&self, function: &SqlFunction) -> Option<DataType> {
            function.function_name.eq_ignore_ascii_case("LAST_INSERT_ID").then_some(DataType::Long)
        }

        fn get_data_value(&self, function: &SqlFunction) -> Option<ValueResolver> {
            self.get_data_type(function)?;
            Some(Arc::new(|| Value::Long(42)))
        }
    }

    fn select() -> SqlSelectDefinition {
        SqlSelectDefinition::from_table(SqlTable::new(None, "Orders"))
            .with_column(SelectColumn::function(SqlFunction::new("LAST_INSERT_ID")))
            .with_column(SelectColumn::function(SqlFunction::new("UPPER")).with_alias("u"))
            .with_where(SqlExpression::binary(
                SqlExpression::column("ID"),
                SqlBinaryOperator::Equal,
                SqlExpression::Function(SqlFunction::new("last_insert_id")),
            ))
    }

    #[test]
    fn provider_functions_become_literals() {
        let mut def = select();
        def.resolve_functions(&LastInsertId).unwrap();

        assert_eq!(def.columns[0], SelectColumn::literal(SqlLiteralValue::Int(42)).with_alias("Column1"));
        assert!(matches!(&def.columns[1], SelectColumn::Function(f) if f.function.function_name == "UPPER"));
        assert_eq!(def.where_clause.unwrap().to_string(), "(ID = 42)");
    }

    #[test]
    fn callbacks_decide_what_is_statement_scoped() {
        let mut seen = Vec::new();
        let mut resolver = FunctionsResolver::new(|f: &SqlFunction| {
            seen.push(f.function_name.clone());
            (f.function_name == "UPPER").then(|| SqlLiteralValue::from("X"))
        });

        let mut def = select();
        def.accept(&mut resolver).unwrap();
        assert_eq!(seen, vec!["LAST_INSERT_ID", "UPPER", "last_insert_id"]);
        assert_eq!(def.columns[1], SelectColumn::literal("X".into()).with_alias("u"));
    }
}
