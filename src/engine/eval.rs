//! Expression and condition evaluation.

use std::cmp::Ordering;

use crate::dsl::{Condition, Expr};

use super::env::Environment;
use super::error::EngineError;
use super::value::Value;

/// Arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn from_token(token: &str) -> Result<Self, EngineError> {
        match token {
            "+" => Ok(ArithOp::Add),
            "-" => Ok(ArithOp::Sub),
            "*" => Ok(ArithOp::Mul),
            "/" => Ok(ArithOp::Div),
            other => Err(EngineError::UnsupportedOperator(other.to_string())),
        }
    }

    fn token(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn from_token(token: &str) -> Result<Self, EngineError> {
        match token {
            "<" => Ok(CompareOp::Lt),
            ">" => Ok(CompareOp::Gt),
            "<=" => Ok(CompareOp::Le),
            ">=" => Ok(CompareOp::Ge),
            "==" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::Ne),
            other => Err(EngineError::UnsupportedOperator(other.to_string())),
        }
    }

    fn token(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }
}

/// Reduce an expression to a value.
pub fn evaluate(expr: &Expr, env: &Environment) -> Result<Value, EngineError> {
    match expr {
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Int(i) => Ok(Value::Int(*i)),
        Expr::Float(f) => Ok(Value::Float(*f)),
        Expr::Text(s) => Ok(env
            .get(s)
            .cloned()
            .unwrap_or_else(|| Value::from(s.as_str()))),
        Expr::List(items) => items
            .iter()
            .map(|item| evaluate(item, env))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Expr::Binary(bin) => {
            let left = evaluate(&bin.left, env)?;
            let right = evaluate(&bin.right, env)?;
            let op = ArithOp::from_token(&bin.op)?;
            apply_arith(op, left, right)
        }
    }
}

/// Reduce a condition to a boolean.
pub fn evaluate_condition(cond: &Condition, env: &Environment) -> Result<bool, EngineError> {
    let left = evaluate(&cond.left, env)?;
    let right = evaluate(&cond.right, env)?;
    let op = CompareOp::from_token(&cond.op)?;
    compare(op, &left, &right)
}

pub fn apply_arith(op: ArithOp, left: Value, right: Value) -> Result<Value, EngineError> {
    match (op, left, right) {
        (ArithOp::Add, l @ Value::Str(_), r) | (ArithOp::Add, l, r @ Value::Str(_)) => {
            Ok(Value::from(format!("{l}{r}")))
        }
        (ArithOp::Add, Value::List(mut l), Value::List(r)) => {
            l.extend(r);
            Ok(Value::List(l))
        }
        (op, Value::Int(a), Value::Int(b)) if op != ArithOp::Div => {
            let exact = match op {
                ArithOp::Add => a.checked_add(b),
                ArithOp::Sub => a.checked_sub(b),
                _ => a.checked_mul(b),
            };
            // Overflow degrades to float rather than wrapping.
            Ok(exact.map(Value::Int).unwrap_or_else(|| {
                Value::Float(float_op(op, a as f64, b as f64))
            }))
        }
        (op, l, r) => match (l.as_f64(), r.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(float_op(op, a, b))),
            _ => Err(EngineError::TypeMismatch {
                op: op.token().to_string(),
                left: l.type_name(),
                right: r.type_name(),
            }),
        },
    }
}

fn float_op(op: ArithOp, a: f64, b: f64) -> f64 {
    match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div if b == 0.0 => f64::INFINITY,
        ArithOp::Div => a / b,
    }
}

pub fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, EngineError> {
    let ordering = left.partial_order(right);
    match op {
        CompareOp::Eq => Ok(left.loose_eq(right)),
        CompareOp::Ne => Ok(!left.loose_eq(right)),
        _ => {
            let Some(ord) = ordering else {
                // NaN against a number is simply false; other pairs are a type error.
                if left.is_numeric() && right.is_numeric() {
                    return Ok(false);
                }
                return Err(EngineError::TypeMismatch {
                    op: op.token().to_string(),
                    left: left.type_name(),
                    right: right.type_name(),
                });
            };
            Ok(match op {
                CompareOp::Lt => ord == Ordering::Less,
                CompareOp::Gt => ord == Ordering::Greater,
                CompareOp::Le => ord != Ordering::Greater,
                CompareOp::Ge => ord != Ordering::Less,
                CompareOp::Eq => ord == Ordering::Equal,
                CompareOp::Ne => ord != Ordering::Equal,
            })
        }
    }
}
