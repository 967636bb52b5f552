use std::{fmt, sync::Arc};

use crate::{
    database::{DataType, ValueResolver},
    model::SqlExpression,
};

/// A function call such as `LAST_INSERT_ID()` or `UPPER(name)`.
///
/// `calculate_value` must be set for functions that are still present when
/// the engine runs; statement-scoped functions are usually replaced by a
/// literal beforehand.
#[derive(Clone)]
pub struct SqlFunction {
    pub function_name: String,
    pub arguments: Vec<SqlExpression>,
    pub value_type: Option<DataType>,
    pub calculate_value: Option<ValueResolver>,
}

impl SqlFunction {
    pub fn new(function_name: &str) -> Self {
        Self {
            function_name: function_name.to_string(),
            arguments: Vec::new(),
            value_type: None,
            calculate_value: None,
        }
    }

    pub fn with_args(mut self, arguments: Vec<SqlExpression>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_resolver(mut self, value_type: DataType, resolver: ValueResolver) -> Self {
        self.value_type = Some(value_type);
        self.calculate_value = Some(resolver);
        self
    }
}

impl PartialEq for SqlFunction {
    fn eq(&self, other: &Self) -> bool {
        self.function_name == other.function_name
            && self.arguments == other.arguments
            && self.value_type == other.value_type
            && match (&self.calculate_value, &other.calculate_value) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl fmt::Debug for SqlFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlFunction")
            .field("function_name", &self.function_name)
            .field("arguments", &self.arguments)
            .field("value_type", &self.value_type)
            .field("calculate_value", &self.calculate_value.as_ref().map(|_| "<resolver>"))
            .finish()
    }
}

impl fmt::Display for SqlFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.arguments.iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.function_name, args.join(", "))
    }
}
