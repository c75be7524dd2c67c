//! Numeric results of [`sum`](crate::ArrayContainer::sum) and
//! [`product`](crate::ArrayContainer::product).
//!
//! Arithmetic starts in integers and promotes to floating point on the first
//! overflow or the first float operand, the way loosely typed array sums do.

use std::fmt;

use crate::error::{Error, Result};
use crate::key::Key;
use crate::value::Value;

/// An integer-or-float accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub const ZERO: Number = Number::Int(0);
    pub const ONE: Number = Number::Int(1);

    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Returns the integer value, or `None` for floats.
    #[inline]
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(i),
            Number::Float(_) => None,
        }
    }

    #[inline]
    pub fn is_float(self) -> bool {
        matches!(self, Number::Float(_))
    }

    pub fn add(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_add(b)
                .map_or_else(|| Number::Float(a as f64 + b as f64), Number::Int),
            (a, b) => Number::Float(a.as_f64() + b.as_f64()),
        }
    }

    pub fn mul(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_mul(b)
                .map_or_else(|| Number::Float(a as f64 * b as f64), Number::Int),
            (a, b) => Number::Float(a.as_f64() * b.as_f64()),
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Number::ZERO
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write_float(f, *x),
        }
    }
}

/// Significant digits kept when a float is printed.
const FLOAT_DIGITS: usize = 14;

/// Writes `x` the way a `print_r` dump does: 14 significant digits, no
/// trailing zeros, `E` notation below `1e-4` and from `1e14` up, and
/// `INF`/`-INF`/`NAN` for the non-finite values.
pub(crate) fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("NAN");
    }
    if x.is_infinite() {
        return f.write_str(if x < 0.0 { "-INF" } else { "INF" });
    }
    if x.is_sign_negative() {
        f.write_str("-")?;
    }
    if x == 0.0 {
        return f.write_str("0");
    }

    // "d.ddddddddddddde<exp>", already rounded to FLOAT_DIGITS.
    let sci = format!("{:.*e}", FLOAT_DIGITS - 1, x.abs());
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return write!(f, "{}", x.abs());
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return write!(f, "{}", x.abs());
    };
    let digits = mantissa.replace('.', "");
    let digits = digits.trim_end_matches('0');
    // Position of the decimal point relative to the first digit.
    let point = exp + 1;

    if point < -3 || point > FLOAT_DIGITS as i32 {
        let (lead, rest) = digits.split_at(1);
        let rest = if rest.is_empty() { "0" } else { rest };
        let sign = if exp < 0 { '-' } else { '+' };
        write!(f, "{lead}.{rest}E{sign}{}", exp.unsigned_abs())
    } else if point <= 0 {
        write!(f, "0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else {
        let point = point as usize;
        if digits.len() <= point {
            write!(f, "{digits}{}", "0".repeat(point - digits.len()))
        } else {
            let (whole, fraction) = digits.split_at(point);
            write!(f, "{whole}.{fraction}")
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

impl PartialEq<i64> for Number {
    fn eq(&self, other: &i64) -> bool {
        *self == Number::Int(*other)
    }
}

impl PartialEq<f64> for Number {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == *other
    }
}

/// Parses a numeric string: integer first, then float. Surrounding whitespace
/// is ignored.
pub fn parse_numeric(s: &str) -> Option<Number> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::Int(i));
    }
    match s.parse::<f64>() {
        // `inf` and `NaN` parse as floats but are not numeric strings.
        Ok(f) if f.is_finite() => Some(Number::Float(f)),
        _ => None,
    }
}

/// Coercion of a container value into a [`Number`].
///
/// `key` is the entry being coerced; implementations report it in
/// [`ErrorKind::TypeMismatch`](crate::ErrorKind::TypeMismatch).
pub trait ToNumber {
    fn to_number(&self, key: &Key) -> Result<Number>;
}

macro_rules! impl_to_number_lossless {
    ($($t:ty),*) => {
        $(
            impl ToNumber for $t {
                #[inline]
                fn to_number(&self, _key: &Key) -> Result<Number> {
                    Ok(Number::Int(i64::from(*self)))
                }
            }
        )*
    };
}

impl_to_number_lossless!(i8, i16, i32, i64, u8, u16, u32, bool);

macro_rules! impl_to_number_wide {
    ($($t:ty),*) => {
        $(
            impl ToNumber for $t {
                #[inline]
                fn to_number(&self, _key: &Key) -> Result<Number> {
                    Ok(i64::try_from(*self).map_or(Number::Float(*self as f64), Number::Int))
                }
            }
        )*
    };
}

impl_to_number_wide!(u64, usize, i128, u128, isize);

impl ToNumber for f32 {
    #[inline]
    fn to_number(&self, _key: &Key) -> Result<Number> {
        Ok(Number::Float(f64::from(*self)))
    }
}

impl ToNumber for f64 {
    #[inline]
    fn to_number(&self, _key: &Key) -> Result<Number> {
        Ok(Number::Float(*self))
    }
}

impl ToNumber for Number {
    #[inline]
    fn to_number(&self, _key: &Key) -> Result<Number> {
        Ok(*self)
    }
}

impl ToNumber for str {
    fn to_number(&self, key: &Key) -> Result<Number> {
        parse_numeric(self).ok_or_else(|| Error::type_mismatch(key.clone(), "non-numeric string"))
    }
}

impl ToNumber for String {
    fn to_number(&self, key: &Key) -> Result<Number> {
        self.as_str().to_number(key)
    }
}

impl ToNumber for Value {
    fn to_number(&self, key: &Key) -> Result<Number> {
        match self {
            Value::Null => Ok(Number::ZERO),
            Value::Bool(b) => b.to_number(key),
            Value::Int(i) => Ok(Number::Int(*i)),
            Value::Float(f) => Ok(Number::Float(*f)),
            Value::Str(s) => s.to_number(key),
        }
    }
}

/// `None` counts as zero.
impl<T: ToNumber> ToNumber for Option<T> {
    fn to_number(&self, key: &Key) -> Result<Number> {
        match self {
            Some(v) => v.to_number(key),
            None => Ok(Number::ZERO),
        }
    }
}

impl<T: ToNumber + ?Sized> ToNumber for &T {
    #[inline]
    fn to_number(&self, key: &Key) -> Result<Number> {
        (**self).to_number(key)
    }
}

impl<T: ToNumber + ?Sized> ToNumber for Box<T> {
    #[inline]
    fn to_number(&self, key: &Key) -> Result<Number> {
        (**self).to_number(key)
    }
}

impl<T: ToNumber + ?Sized> ToNumber for std::rc::Rc<T> {
    #[inline]
    fn to_number(&self, key: &Key) -> Result<Number> {
        (**self).to_number(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_number_int_overflow_promotes_to_float() {
        let big = Number::Int(i64::MAX);
        assert_eq!(big.add(Number::ONE), Number::Float(i64::MAX as f64 + 1.0));
        assert!(big.mul(Number::Int(2)).is_float());
        assert_eq!(Number::Int(2).add(Number::Int(3)), Number::Int(5));
        assert_eq!(Number::Int(2).mul(Number::Float(1.5)), Number::Float(3.0));
    }

    #[test]
    fn test_number_parse_numeric() {
        assert_eq!(parse_numeric("42"), Some(Number::Int(42)));
        assert_eq!(parse_numeric(" -7 "), Some(Number::Int(-7)));
        assert_eq!(parse_numeric("1.5"), Some(Number::Float(1.5)));
        assert_eq!(parse_numeric("1e3"), Some(Number::Float(1000.0)));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("abc"), None);
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("NaN"), None);
    }

    #[test]
    fn test_number_value_coercion() {
        let key = Key::Index(0);
        assert_eq!(Value::Null.to_number(&key).unwrap(), Number::ZERO);
        assert_eq!(Value::Bool(true).to_number(&key).unwrap(), Number::ONE);
        assert_eq!(Value::from("12").to_number(&key).unwrap(), Number::Int(12));
        assert_eq!(Some(3u8).to_number(&key).unwrap(), Number::Int(3));
        assert_eq!(None::<i32>.to_number(&key).unwrap(), Number::ZERO);
        assert_eq!(u64::MAX.to_number(&key).unwrap(), Number::Float(u64::MAX as f64));
    }

    #[test]
    fn test_number_non_numeric_string_is_type_mismatch() {
        let err = Value::from("apple").to_number(&Key::from("fruit")).unwrap_err();
        match err.kind() {
            ErrorKind::TypeMismatch { key, .. } => assert_eq!(key, &Key::from("fruit")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Int(21).to_string(), "21");
        assert_eq!(Number::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_number_display_float_dump_format() {
        assert_eq!(Number::Float(f64::INFINITY).to_string(), "INF");
        assert_eq!(Number::Float(f64::NEG_INFINITY).to_string(), "-INF");
        assert_eq!(Number::Float(f64::NAN).to_string(), "NAN");
        assert_eq!(Number::Float(1e20).to_string(), "1.0E+20");
        assert_eq!(Number::Float(-2.5e15).to_string(), "-2.5E+15");
        assert_eq!(Number::Float(1e14).to_string(), "1.0E+14");
        assert_eq!(Number::Float(1e13).to_string(), "10000000000000");
        assert_eq!(Number::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Number::Float(0.00001).to_string(), "1.0E-5");
        assert_eq!(Number::Float(0.1 + 0.2).to_string(), "0.3");
        assert_eq!(Number::Float(2.0).to_string(), "2");
        assert_eq!(Number::Float(-0.0).to_string(), "-0");
        assert_eq!(Number::Float(123.456).to_string(), "123.456");
        // Promoted past i64::MAX.
        assert_eq!(Number::Int(i64::MAX).add(Number::ONE).to_string(), "9.2233720368548E+18");
    }
}
