//! `Number.prototype` methods.

use crate::errors::range_error;
use crate::native::arg;
use crate::value::number_to_string;
use crate::Value;

pub(crate) fn number_method(n: f64, name: &str) -> Option<Value> {
    let method = match name {
        "toFixed" => Value::native(name, move |interp, args| {
            let digits = arg(&args, 0).to_number();
            let digits = if digits.is_nan() { 0.0 } else { digits.trunc() };
            if !(0.0..=100.0).contains(&digits) {
                return Err(range_error(
                    interp,
                    "toFixed() digits argument must be between 0 and 100",
                ));
            }
            if !n.is_finite() || n.abs() >= 1e21 {
                return Ok(Value::string(number_to_string(n)));
            }
            Ok(Value::string(format!("{n:.prec$}", prec = digits as usize)))
        }),
        "toString" => Value::native(name, move |interp, args| {
            let radix = match arg(&args, 0) {
                Value::Undefined => 10.0,
                other => other.to_number().trunc(),
            };
            if !(2.0..=36.0).contains(&radix) {
                return Err(range_error(
                    interp,
                    "toString() radix must be between 2 and 36",
                ));
            }
            Ok(Value::string(to_radix(n, radix as u32)))
        }),
        _ => return None,
    };
    Some(method)
}

/// Integral values in any radix; fractional values fall back to decimal.
fn to_radix(n: f64, radix: u32) -> String {
    if radix == 10 || !n.is_finite() || n.fract() != 0.0 || n.abs() >= 9_007_199_254_740_992.0 {
        return number_to_string(n);
    }
    let mut magnitude = n.abs() as u64;
    if magnitude == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while magnitude > 0 {
        let digit = (magnitude % u64::from(radix)) as u32;
        digits.push(char::from_digit(digit, radix).unwrap_or('?'));
        magnitude /= u64::from(radix);
    }
    if n < 0.0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}
