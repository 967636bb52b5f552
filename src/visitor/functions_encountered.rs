use std::collections::HashSet;

use crate::{
    model::{SqlExpression, SqlFunction},
    visitor::SqlVisitor,
    Result,
};

/// Records the names of the functions met during a walk, split into the ones
/// the caller listed (`specified`) and the rest. With no list every function
/// is unspecified, which answers "are there any functions at all".
#[derive(Debug, Default)]
pub struct FunctionsEncountered {
    known: HashSet<String>,
    pub specified: HashSet<String>,
    pub unspecified: HashSet<String>,
}

impl FunctionsEncountered {
    pub fn new<I, S>(known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { known: known.into_iter().map(Into::into).collect(), ..Self::default() }
    }
}

impl SqlVisitor for FunctionsEncountered {
    fn visit_function(&mut self, function: &SqlFunction) -> Result<Option<SqlExpression>> {
        let name = function.function_name.clone();
        if self.known.contains(&name) {
            self.specified.insert(name);
        } else {
            self.unspecified.insert(name);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SqlBinaryOperator;

    #[test]
    fn splits_known_and_unknown_names() {
        let e = SqlExpression::binary(
            SqlExpression::Function(SqlFunction::new("NOW")),
            SqlBinaryOperator::And,
            SqlExpression::Function(SqlFunction::new("RAND")),
        );

        let mut v = FunctionsEncountered::new(["NOW"]);
        e.inspect(&mut v).unwrap();
        assert!(v.specified.contains("NOW"));
        assert_eq!(v.unspecified.len(), 1);

        let mut any = FunctionsEncountered::default();
        e.inspect(&mut any).unwrap();
        assert_eq!(any.unspecified.len(), 2);
        assert!(any.specified.is_empty());
    }
}
