use regex::Regex;

use crate::{
    database::{DataType, Value},
    executor::{Eval, Row, Truth},
    model::{SqlBinaryExpression, SqlBinaryOperator, SqlExpression, SqlTable},
    Error, Result,
};

#[derive(Debug)]
enum Operand {
    Constant(Value),
    Cell { level: usize, table: String, column: String },
    Nested(Box<Node>),
}

#[derive(Debug)]
struct TypedOperand {
    operand: Operand,
    data_type: Option<DataType>,
}

#[derive(Debug)]
enum Pattern {
    /// Literal pattern, compiled once. `None` for a `NULL` pattern.
    Fixed(Option<Regex>),
    Dynamic(TypedOperand),
}

#[derive(Debug)]
enum Node {
    Compare { left: TypedOperand, op: SqlBinaryOperator, right: TypedOperand, target: Option<DataType> },
    Like { value: TypedOperand, pattern: Pattern },
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Truth(TypedOperand),
}

/// A WHERE or ON condition compiled against the tables of a join chain.
///
/// `levels` are the FROM table followed by the JOIN tables reached so far;
/// the last one is the table whose rows are being filtered. Column references
/// are turned into positions in that chain once, so evaluating a row only
/// does name lookups on the rows themselves.
#[derive(Debug)]
pub struct Predicate {
    root: Node,
}

impl Predicate {
    pub fn compile(expr: &SqlExpression, levels: &[SqlTable]) -> Result<Self> {
        let root = match expr {
            SqlExpression::BinExpr(bin) => Self::compile_node(bin, levels)?,
            leaf => Node::Truth(Self::boolean_operand(leaf, levels)?),
        };
        Ok(Self { root })
    }

    pub fn compile_binary(expr: &SqlBinaryExpression, levels: &[SqlTable]) -> Result<Self> {
        Ok(Self { root: Self::compile_node(expr, levels)? })
    }

    /// Both conditions have to hold.
    pub fn and(self, other: Predicate) -> Self {
        Self { root: Node::And(Box::new(self.root), Box::new(other.root)) }
    }

    /// Evaluate against `candidate`, the row of the last level, with the
    /// rows already chosen for the earlier levels in `reached`.
    pub fn eval(&self, reached: &[Row], candidate: &Row) -> Result<Truth> {
        Self::eval_node(&self.root, reached, candidate)
    }

    pub fn matches(&self, reached: &[Row], candidate: &Row) -> Result<bool> {
        self.eval(reached, candidate).map(|t| t.is_true())
    }

    fn compile_node(expr: &SqlBinaryExpression, levels: &[SqlTable]) -> Result<Node> {
        let node = match expr.operator {
            SqlBinaryOperator::And | SqlBinaryOperator::Or => {
                let left = Box::new(Self::logical_side(&expr.left, levels)?);
                let right = Box::new(Self::logical_side(&expr.right, levels)?);
                if expr.operator == SqlBinaryOperator::And {
                    Node::And(left, right)
                } else {
                    Node::Or(left, right)
                }
            }
            SqlBinaryOperator::Like => {
                let value = Self::operand(&expr.left, levels)?;
                let pattern = match Self::operand(&expr.right, levels)? {
                    TypedOperand { operand: Operand::Constant(p), .. } if p.is_null() => Pattern::Fixed(None),
                    TypedOperand { operand: Operand::Constant(p), .. } => {
                        Pattern::Fixed(Some(Eval::like_regex(&p.to_string())?))
                    }
                    dynamic => Pattern::Dynamic(dynamic),
                };
                Node::Like { value, pattern }
            }
            op => {
                let left = Self::operand(&expr.left, levels)?;
                let right = Self::operand(&expr.right, levels)?;
                let target = Eval::harmonize(left.data_type, right.data_type)?;
                Node::Compare { left, op, right, target }
            }
        };
        Ok(node)
    }

    fn logical_side(expr: &SqlExpression, levels: &[SqlTable]) -> Result<Node> {
        match expr {
            SqlExpression::BinExpr(bin) => Self::compile_node(bin, levels),
            leaf => Ok(Node::Truth(Self::boolean_operand(leaf, levels)?)),
        }
    }

    fn boolean_operand(expr: &SqlExpression, levels: &[SqlTable]) -> Result<TypedOperand> {
        let operand = Self::operand(expr, levels)?;
        match operand.data_type {
            Some(t) if t != DataType::Boolean => Err(Error::TypeMismatch { left: DataType::Boolean, right: t }),
            _ => Ok(operand),
        }
    }

    fn operand(expr: &SqlExpression, levels: &[SqlTable]) -> Result<TypedOperand> {
        let typed = match expr {
            SqlExpression::Value(v) => TypedOperand { operand: Operand::Constant(v.to_value()), data_type: v.data_type() },
            SqlExpression::Column(column_ref) => {
                let column = column_ref
                    .column
                    .as_ref()
                    .ok_or_else(|| Error::UnboundColumn(column_ref.to_string()))?;
                let table = column
                    .table_ref
                    .as_ref()
                    .ok_or_else(|| Error::UnboundColumn(column_ref.to_string()))?;
                let level = level_of(levels, table).ok_or_else(|| {
                    Error::Other(format!(
                        "Column {} belongs to table {}, which is not available at this point of the query",
                        column_ref, table
                    ))
                })?;
                TypedOperand {
                    operand: Operand::Cell {
                        level,
                        table: table.display_name().to_string(),
                        column: column.column_name.clone(),
                    },
                    data_type: column.column_type,
                }
            }
            SqlExpression::BinExpr(bin) => TypedOperand {
                operand: Operand::Nested(Box::new(Self::compile_node(bin, levels)?)),
                data_type: Some(DataType::Boolean),
            },
            SqlExpression::Parameter(p) => return Err(Error::UnresolvedParameter(p.to_string())),
            SqlExpression::Function(f) => return Err(Error::UnresolvedFunction(f.to_string())),
        };
        Ok(typed)
    }

    fn eval_node(node: &Node, reached: &[Row], candidate: &Row) -> Result<Truth> {
        match node {
            Node::Compare { left, op, right, target } => {
                let l = Self::value(left, reached, candidate)?;
                let r = Self::value(right, reached, candidate)?;
                Eval::compare(&l, *op, &r, *target)
            }
            Node::Like { value, pattern } => {
                let v = Self::value(value, reached, candidate)?;
                match pattern {
                    Pattern::Fixed(None) => Ok(Truth::False),
                    Pattern::Fixed(Some(re)) => Eval::like(&v, re),
                    Pattern::Dynamic(p) => {
                        let p = Self::value(p, reached, candidate)?;
                        if p.is_null() {
                            return Ok(Truth::False);
                        }
                        Eval::like(&v, &Eval::like_regex(&p.to_string())?)
                    }
                }
            }
            Node::And(l, r) => {
                let l = Self::eval_node(l, reached, candidate)?;
                if l == Truth::False {
                    return Ok(Truth::False);
                }
                Ok(l.and(Self::eval_node(r, reached, candidate)?))
            }
            Node::Or(l, r) => {
                let l = Self::eval_node(l, reached, candidate)?;
                if l == Truth::True {
                    return Ok(Truth::True);
                }
                Ok(l.or(Self::eval_node(r, reached, candidate)?))
            }
            Node::Truth(operand) => {
                let v = Self::value(operand, reached, candidate)?;
                Truth::from_value(&v).ok_or_else(|| Error::InvalidCast { value: v.to_string(), to: DataType::Boolean })
            }
        }
    }

    fn value(operand: &TypedOperand, reached: &[Row], candidate: &Row) -> Result<Value> {
        match &operand.operand {
            Operand::Constant(v) => Ok(v.clone()),
            Operand::Nested(node) => Self::eval_node(node, reached, candidate).map(|t| t.to_value()),
            Operand::Cell { level, table, column } => {
                let row = if *level == reached.len() {
                    candidate
                } else {
                    reached.get(*level).ok_or_else(|| {
                        Error::Other(format!("No row of table {} is available while evaluating {}", table, column))
                    })?
                };
                row.get(column)
                    .cloned()
                    .ok_or_else(|| Error::ColumnNotFound { table: table.clone(), column: column.clone() })
            }
        }
    }
}

/// Position of `table` in a join chain. The alias decides between several
/// occurrences of the same table.
pub fn level_of(levels: &[SqlTable], table: &SqlTable) -> Option<usize> {
    levels
        .iter()
        .position(|t| t == table && t.table_alias == table.table_alias)
        .or_else(|| levels.iter().position(|t| t == table))
}
