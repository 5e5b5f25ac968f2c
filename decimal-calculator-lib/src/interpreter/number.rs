use crate::error::{EvaluationError, Result};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Neg;
use std::str::FromStr;

/// Adjusted exponents in this range are displayed without an exponent.
const PLAIN_NOTATION: std::ops::Range<i64> = -6..28;

/// An arbitrary-precision decimal number, `coefficient * 10^exponent`.
///
/// Numbers are always kept in canonical form: the coefficient has no trailing zeros
/// and zero is stored with exponent 0, so two numbers are equal exactly when their
/// representations are.
///
/// Arithmetic lives on [`Context`](crate::interpreter::context::Context), which rounds
/// every result to its precision.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Number {
    pub(crate) coefficient: BigInt,
    pub(crate) exponent: i64,
}

/// How to discard digits when a number is brought to a coarser exponent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rounding {
    /// Towards zero.
    Down,
    /// Towards negative infinity.
    Floor,
    /// Towards positive infinity.
    Ceiling,
    /// To the nearest neighbour, ties to the even one.
    HalfEven,
}

impl Number {
    pub fn new(coefficient: BigInt, exponent: i64) -> Number {
        if coefficient.is_zero() {
            return Number::zero();
        }
        let ten = BigInt::from(10);
        let mut coefficient = coefficient;
        let mut exponent = exponent;
        loop {
            let (quotient, remainder) = coefficient.div_rem(&ten);
            if !remainder.is_zero() {
                break;
            }
            coefficient = quotient;
            exponent += 1;
        }
        Number {
            coefficient,
            exponent,
        }
    }

    pub fn zero() -> Number {
        Number {
            coefficient: BigInt::zero(),
            exponent: 0,
        }
    }

    pub fn one() -> Number {
        Number {
            coefficient: BigInt::one(),
            exponent: 0,
        }
    }

    /// Converts a double exactly, digit for digit of its binary value.
    pub fn from_f64(value: f64) -> Result<Number> {
        if value.is_nan() {
            return Err(EvaluationError::domain("result is not a number"));
        }
        if value.is_infinite() {
            return Err(EvaluationError::overflow("result out of floating point range"));
        }
        let (mantissa, exponent, sign) = num_traits::Float::integer_decode(value);
        let coefficient = BigInt::from(mantissa) * BigInt::from(sign);
        if exponent >= 0 {
            Ok(Number::new(coefficient << exponent as usize, 0))
        } else {
            // 2^-k == 5^k * 10^-k
            let halvings = exponent.unsigned_abs() as usize;
            let fives = num_traits::pow(BigInt::from(5), halvings);
            Ok(Number::new(coefficient * fives, -(halvings as i64)))
        }
    }

    /// The nearest double; values beyond its range become infinite or zero.
    pub fn to_f64(&self) -> f64 {
        format!("{}e{}", self.coefficient, self.exponent)
            .parse()
            .unwrap_or(f64::NAN)
    }

    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.coefficient.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.coefficient.is_positive()
    }

    pub fn is_integral(&self) -> bool {
        self.exponent >= 0
    }

    pub fn abs(&self) -> Number {
        Number {
            coefficient: self.coefficient.abs(),
            exponent: self.exponent,
        }
    }

    /// The exponent of the most significant digit, i.e. `floor(log10(|self|))`.
    pub fn adjusted(&self) -> i64 {
        self.exponent + digit_count(&self.coefficient) - 1
    }

    pub(crate) fn digits(&self) -> i64 {
        digit_count(&self.coefficient)
    }

    /// The value as an `i64`, if it is integral and fits.
    pub fn to_i64(&self) -> Option<i64> {
        if !self.is_integral() || self.adjusted() > 18 {
            return None;
        }
        (&self.coefficient * pow10(self.exponent as u64)).to_i64()
    }

    /// An estimate of `log10(|self|)`, accurate to double precision.
    pub(crate) fn log10_estimate(&self) -> f64 {
        let digits = self.coefficient.magnitude().to_str_radix(10);
        let leading = &digits[..digits.len().min(17)];
        let mantissa: f64 = leading.parse().unwrap_or(1.0);
        mantissa.log10() + (self.exponent + (digits.len() - leading.len()) as i64) as f64
    }

    /// Brings the number to the given exponent, discarding digits below it.
    ///
    /// Numbers that already have no digits below `exponent` are returned unchanged.
    pub fn quantize(&self, exponent: i64, rounding: Rounding) -> Number {
        if self.exponent >= exponent {
            return self.clone();
        }
        // Far below the target digit, only the sign can influence the outcome.
        let (coefficient, own_exponent) = if self.adjusted() < exponent - 1 {
            (self.coefficient.signum(), exponent - 2)
        } else {
            (self.coefficient.clone(), self.exponent)
        };
        let divisor = pow10((exponent - own_exponent) as u64);
        let (quotient, remainder) = coefficient.div_rem(&divisor);
        let quotient = match rounding {
            Rounding::Down => quotient,
            Rounding::Floor if remainder.is_negative() => quotient - 1,
            Rounding::Ceiling if remainder.is_positive() => quotient + 1,
            Rounding::Floor | Rounding::Ceiling => quotient,
            Rounding::HalfEven => round_half_even(quotient, &remainder, &divisor),
        };
        Number::new(quotient, exponent)
    }
}

fn round_half_even(quotient: BigInt, remainder: &BigInt, divisor: &BigInt) -> BigInt {
    let doubled = remainder.abs() * 2u32;
    match doubled.cmp(divisor) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + remainder.signum(),
        Ordering::Equal if quotient.is_odd() => quotient + remainder.signum(),
        Ordering::Equal => quotient,
    }
}

pub(crate) fn pow10(exponent: u64) -> BigInt {
    num_traits::pow(BigInt::from(10), exponent as usize)
}

pub(crate) fn digit_count(value: &BigInt) -> i64 {
    if value.is_zero() {
        1
    } else {
        value.magnitude().to_str_radix(10).len() as i64
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::new(value, 0)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::new(BigInt::from(value), 0)
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        Number {
            coefficient: -self.coefficient,
            exponent: self.exponent,
        }
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        -self.clone()
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        let sign_order = self.coefficient.sign().cmp(&other.coefficient.sign());
        if sign_order != Ordering::Equal || self.is_zero() {
            return sign_order;
        }
        let magnitude_order = match self.adjusted().cmp(&other.adjusted()) {
            Ordering::Equal => {
                let exponent = self.exponent.min(other.exponent);
                let left = self.coefficient.abs() * pow10((self.exponent - exponent) as u64);
                let right = other.coefficient.abs() * pow10((other.exponent - exponent) as u64);
                left.cmp(&right)
            }
            order => order,
        };
        if self.is_negative() {
            magnitude_order.reverse()
        } else {
            magnitude_order
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let digits = self.coefficient.magnitude().to_str_radix(10);
        let sign = if self.is_negative() { "-" } else { "" };
        let adjusted = self.adjusted();

        if !PLAIN_NOTATION.contains(&adjusted) {
            let (first, rest) = digits.split_at(1);
            let separator = if rest.is_empty() { "" } else { "." };
            return write!(f, "{}{}{}{}e{:+}", sign, first, separator, rest, adjusted);
        }

        if self.exponent >= 0 {
            return write!(f, "{}{}{}", sign, digits, "0".repeat(self.exponent as usize));
        }
        let point = digits.len() as i64 + self.exponent;
        if point > 0 {
            let (integer, fraction) = digits.split_at(point as usize);
            write!(f, "{}{}.{}", sign, integer, fraction)
        } else {
            write!(f, "{}0.{}{}", sign, "0".repeat(point.unsigned_abs() as usize), digits)
        }
    }
}

impl Debug for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for Number {
    type Err = EvaluationError;

    /// Reads the canonical text form: `[-]digits[.digits][e[+-]digits]`.
    fn from_str(text: &str) -> Result<Number> {
        let malformed = || EvaluationError::MalformedNumber {
            lexeme: text.to_string(),
            position: 0,
        };
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (mantissa, exponent) = match unsigned.split_once(|c: char| c == 'e' || c == 'E') {
            Some((mantissa, exponent)) => {
                (mantissa, exponent.parse::<i64>().map_err(|_| malformed())?)
            }
            None => (unsigned, 0),
        };
        let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let digits = format!("{}{}", integer, fraction);
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(malformed());
        }
        let coefficient = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(malformed)?;
        let coefficient = if negative { -coefficient } else { coefficient };
        Ok(Number::new(coefficient, exponent - fraction.len() as i64))
    }
}
