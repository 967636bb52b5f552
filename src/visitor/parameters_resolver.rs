use std::collections::HashMap;

use serde_json::{Map, Value as Json};

use crate::{
    database::Value,
    model::{SqlExpression, SqlLimitValue, SqlLiteralValue, SqlParameter},
    visitor::SqlVisitor,
    Error, Result,
};

#[derive(Debug, Clone)]
enum ParameterValues {
    Named(HashMap<String, SqlLiteralValue>),
    Positional { values: Vec<SqlLiteralValue>, next: usize },
}

/// Replaces parameters with caller-supplied literals.
///
/// Works either by name (`@id` and `id` are the same parameter) or by
/// position, in which case values are consumed in walk order. Mixing the two
/// kinds, an unknown name, or running out of positional values is an error.
///
/// `LIMIT`/`OFFSET` parameters are replaced by the integer their literal
/// converts to.
#[derive(Debug, Clone)]
pub struct ParametersResolver {
    values: ParameterValues,
}

impl ParametersResolver {
    pub fn named<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, SqlLiteralValue)>,
        K: AsRef<str>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| (SqlParameter::normalize(k.as_ref()).to_string(), v))
            .collect();
        Self { values: ParameterValues::Named(values) }
    }

    pub fn positional(values: Vec<SqlLiteralValue>) -> Self {
        Self { values: ParameterValues::Positional { values, next: 0 } }
    }

    /// Named parameters from a JSON object such as `{"@id": 1, "name": "John"}`.
    pub fn from_json(object: &Map<String, Json>) -> Self {
        Self::named(
            object
                .iter()
                .map(|(k, v)| (k, SqlLiteralValue::from_value(&Value::infer_from_json(v)))),
        )
    }

    /// Number of positional values handed out so far.
    pub fn consumed(&self) -> usize {
        match &self.values {
            ParameterValues::Named(_) => 0,
            ParameterValues::Positional { next, .. } => *next,
        }
    }

    /// Value for `parameter`; positional values are consumed.
    pub fn resolve(&mut self, parameter: &SqlParameter) -> Result<SqlLiteralValue> {
        match (&mut self.values, parameter) {
            (ParameterValues::Named(values), SqlParameter::Named(name)) => {
                let name = SqlParameter::normalize(name);
                values
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::UnknownParameter(name.to_string()))
            }
            (ParameterValues::Positional { values, next }, SqlParameter::Positional) => {
                let value = values.get(*next).cloned().ok_or(Error::NotEnoughParameters(values.len()))?;
                *next += 1;
                Ok(value)
            }
            (ParameterValues::Named(_), SqlParameter::Positional) => Err(Error::InvalidParameterKind(format!(
                "named values were supplied but the positional parameter {} was found",
                parameter
            ))),
            (ParameterValues::Positional { .. }, SqlParameter::Named(_)) => Err(Error::InvalidParameterKind(format!(
                "positional values were supplied but the named parameter {} was found",
                parameter
            ))),
        }
    }
}

impl SqlVisitor for ParametersResolver {
    fn visit_parameter(&mut self, parameter: &SqlParameter) -> Result<Option<SqlExpression>> {
        let value = self.resolve(parameter)?;
        tracing::trace!(target: "sqlblocks::visitor", %parameter, %value, "parameter resolved");
        Ok(Some(SqlExpression::Value(value)))
    }

    fn visit_limit(&mut self, limit: &SqlLimitValue) -> Result<Option<SqlLimitValue>> {
        match limit {
            SqlLimitValue::Value(_) => Ok(None),
            SqlLimitValue::Parameter(p) => {
                let value = self.resolve(p)?;
                Ok(Some(SqlLimitValue::Value(value.as_limit()?)))
            }
        }
    }
}
