use std::cmp::Ordering;

use regex::Regex;

use crate::{
    database::{DataType, Value},
    executor::Truth,
    model::SqlBinaryOperator,
    Error, Result,
};

/// Scalar building blocks of predicate evaluation.
pub struct Eval;

impl Eval {
    /// Type both sides of a comparison are converted to. `None` when a side's
    /// type is not known up front; the values' own types decide then.
    pub fn harmonize(left: Option<DataType>, right: Option<DataType>) -> Result<Option<DataType>> {
        match (left, right) {
            (Some(l), Some(r)) => DataType::common_type(l, r)
                .map(Some)
                .ok_or(Error::TypeMismatch { left: l, right: r }),
            _ => Ok(None),
        }
    }

    /// Compare two cells. A comparison with a `Null` side is `False`.
    pub fn compare(left: &Value, op: SqlBinaryOperator, right: &Value, target: Option<DataType>) -> Result<Truth> {
        let (Some(lt), Some(rt)) = (left.data_type(), right.data_type()) else {
            return Ok(Truth::False);
        };
        let target = match target {
            Some(t) => t,
            None => Self::harmonize(Some(lt), Some(rt))?.unwrap_or(lt),
        };
        let l = left.cast(target)?;
        let r = right.cast(target)?;
        let ord = l.compare(&r);
        let t = match (op, ord) {
            (SqlBinaryOperator::Equal, Some(Ordering::Equal)) => true,
            (SqlBinaryOperator::LessThan, Some(Ordering::Less)) => true,
            (SqlBinaryOperator::LessThanEqual, Some(Ordering::Less | Ordering::Equal)) => true,
            (SqlBinaryOperator::GreaterThan, Some(Ordering::Greater)) => true,
            (SqlBinaryOperator::GreaterThanEqual, Some(Ordering::Greater | Ordering::Equal)) => true,
            _ => false,
        };
        Ok(Truth::from(t))
    }

    /// Anchored regex for a LIKE pattern: `%` is any run of characters, `_`
    /// exactly one, everything else literal.
    pub fn like_regex(pattern: &str) -> Result<Regex> {
        let mut re = String::from("(?s)^");
        for ch in pattern.chars() {
            match ch {
                '%' => re.push_str(".*"),
                '_' => re.push('.'),
                c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }
        re.push('$');
        Regex::new(&re).map_err(|e| Error::InvalidLikePattern(format!("{}: {}", pattern, e)))
    }

    /// A `Null` value never matches.
    pub fn like(value: &Value, regex: &Regex) -> Result<Truth> {
        match value.cast(DataType::String)? {
            Value::String(s) => Ok(Truth::from(regex.is_match(&s))),
            _ => Ok(Truth::False),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn like(value: &str, pattern: &str) -> bool {
        Eval::like(&Value::from(value), &Eval::like_regex(pattern).unwrap()).unwrap().is_true()
    }

    #[test]
    fn like_translates_wildcards() {
        assert!(like("John", "J%"));
        assert!(like("Jane", "J%"));
        assert!(!like("Bob", "J%"));
        assert!(like("Dan", "_a_"));
        assert!(!like("Dana", "_a_"));
        assert!(like("", "%"));
    }

    #[test]
    fn like_escapes_regex_metacharacters() {
        assert!(like("a.b", "a.b"));
        assert!(!like("axb", "a.b"));
        assert!(like("(1+1)*", "(1+1)*"));
        assert!(like("line\nbreak", "line%"));
    }

    #[test]
    fn like_on_null_is_false() {
        let re = Eval::like_regex("%").unwrap();
        assert_eq!(Eval::like(&Value::Null, &re).unwrap(), Truth::False);
        assert_eq!(Eval::like(&Value::Int(42), &Eval::like_regex("4_").unwrap()).unwrap(), Truth::True);
    }

    #[test]
    fn comparisons_promote_numbers() {
        let t = Eval::harmonize(Some(DataType::Long), Some(DataType::Int)).unwrap();
        assert_eq!(t, Some(DataType::Long));
        assert!(Eval::compare(&Value::Long(1), SqlBinaryOperator::Equal, &Value::Int(1), t).unwrap().is_true());

        let d = Value::Decimal(Decimal::new(105, 1));
        assert!(Eval::compare(&d, SqlBinaryOperator::GreaterThan, &Value::Int(10), None).unwrap().is_true());
        assert!(Eval::compare(&Value::Int(3), SqlBinaryOperator::LessThanEqual, &Value::Double(3.0), None)
            .unwrap()
            .is_true());
    }

    #[test]
    fn strings_win_over_numbers() {
        let t = Eval::harmonize(Some(DataType::String), Some(DataType::Int)).unwrap();
        assert_eq!(t, Some(DataType::String));
        assert!(Eval::compare(&Value::from("7"), SqlBinaryOperator::Equal, &Value::Int(7), t).unwrap().is_true());
    }

    #[test]
    fn null_never_compares_true() {
        for op in [SqlBinaryOperator::Equal, SqlBinaryOperator::LessThan, SqlBinaryOperator::GreaterThanEqual] {
            assert_eq!(Eval::compare(&Value::Null, op, &Value::Null, None).unwrap(), Truth::False);
            assert_eq!(Eval::compare(&Value::Int(1), op, &Value::Null, None).unwrap(), Truth::False);
        }
    }

    #[test]
    fn unrelated_types_do_not_harmonize() {
        assert_eq!(
            Eval::harmonize(Some(DataType::Boolean), Some(DataType::Int)).unwrap_err(),
            Error::TypeMismatch { left: DataType::Boolean, right: DataType::Int }
        );
        assert_eq!(Eval::harmonize(None, Some(DataType::Int)).unwrap(), None);
    }
}
