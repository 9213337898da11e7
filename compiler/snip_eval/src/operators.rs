//! Binary and unary operator implementations.
//!
//! Every operator is total: mismatched operand types coerce rather than
//! fail, so these functions return plain values.

use std::cmp::Ordering;

use snip_ir::{BinaryOp, UnaryOp};

use crate::Value;

/// Evaluate `left op right`.
pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Mod => Value::Number(remainder(left.to_number(), right.to_number())),
        BinaryOp::Pow => Value::Number(power(left.to_number(), right.to_number())),
        BinaryOp::LooseEq => Value::Bool(left.loose_equals(right)),
        BinaryOp::LooseNe => Value::Bool(!left.loose_equals(right)),
        BinaryOp::StrictEq => Value::Bool(left.strict_equals(right)),
        BinaryOp::StrictNe => Value::Bool(!left.strict_equals(right)),
        BinaryOp::Lt => compare(left, right, |o| o == Ordering::Less),
        BinaryOp::Le => compare(left, right, |o| o != Ordering::Greater),
        BinaryOp::Gt => compare(left, right, |o| o == Ordering::Greater),
        BinaryOp::Ge => compare(left, right, |o| o != Ordering::Less),
    }
}

/// Evaluate a unary operator other than `typeof` of an unbound name,
/// which the evaluator handles before the operand is looked up.
pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> Value {
    match op {
        UnaryOp::Not => Value::Bool(!operand.is_truthy()),
        UnaryOp::Neg => Value::Number(-operand.to_number()),
        UnaryOp::Plus => Value::Number(operand.to_number()),
        UnaryOp::Typeof => Value::string(operand.type_of()),
    }
}

/// `+`: concatenation if either side is (or renders as) a string,
/// numeric addition otherwise.
fn add(left: &Value, right: &Value) -> Value {
    if is_stringy(left) || is_stringy(right) {
        let mut text = left.to_display();
        text.push_str(&right.to_display());
        Value::string(text)
    } else {
        Value::Number(left.to_number() + right.to_number())
    }
}

/// Values whose primitive form is a string.
fn is_stringy(value: &Value) -> bool {
    !matches!(
        value,
        Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_)
    )
}

/// `%` keeps the sign of the dividend.
fn remainder(a: f64, b: f64) -> f64 {
    if b == 0.0 || a.is_infinite() || a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if b.is_infinite() {
        return a;
    }
    a % b
}

fn power(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() {
        return f64::NAN;
    }
    // `1 ** Infinity` is NaN, unlike `powf`.
    if base.abs() == 1.0 && exponent.is_infinite() {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// Relational comparison. Two strings compare lexicographically; anything
/// else compares numerically and is false when either side is `NaN`.
fn compare(left: &Value, right: &Value, accept: impl Fn(Ordering) -> bool) -> Value {
    let ordering = match (left, right) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    };
    Value::Bool(ordering.is_some_and(accept))
}
