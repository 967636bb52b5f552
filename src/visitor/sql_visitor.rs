use crate::{
    model::{SqlBinaryExpression, SqlColumnRef, SqlExpression, SqlFunction, SqlLimitValue, SqlLiteralValue, SqlParameter},
    Result,
};

/// Callbacks for walking a statement.
///
/// Every leaf callback may hand back a replacement node; the walker owning the
/// leaf does the swap. `Ok(None)` leaves the node as it is. All methods
/// default to "no change", so visitors only implement what they care about.
///
/// `visit_binary` is called before the operands of a binary expression are
/// walked. Function arguments are not walked.
pub trait SqlVisitor {
    fn visit_binary(&mut self, _binary: &SqlBinaryExpression) -> Result<()> {
        Ok(())
    }

    fn visit_column(&mut self, _column: &SqlColumnRef) -> Result<Option<SqlExpression>> {
        Ok(None)
    }

    fn visit_parameter(&mut self, _parameter: &SqlParameter) -> Result<Option<SqlExpression>> {
        Ok(None)
    }

    fn visit_function(&mut self, _function: &SqlFunction) -> Result<Option<SqlExpression>> {
        Ok(None)
    }

    fn visit_value(&mut self, _value: &SqlLiteralValue) -> Result<Option<SqlExpression>> {
        Ok(None)
    }

    fn visit_limit(&mut self, _limit: &SqlLimitValue) -> Result<Option<SqlLimitValue>> {
        Ok(None)
    }
}
