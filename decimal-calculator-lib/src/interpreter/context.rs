use crate::error::{EvaluationError, Result};
use crate::interpreter::number::{digit_count, pow10, Number, Rounding};
use num_bigint::BigInt;
use num_integer::{Integer, Roots};
use num_traits::{One, Signed, Zero};

/// Significant digits every result is rounded to.
pub const DEFAULT_PRECISION: u32 = 28;
/// Largest adjusted exponent a result may have.
pub const DEFAULT_MAX_EXPONENT: i64 = 999_999;
/// Largest operand accepted by factorial.
pub const MAX_FACTORIAL_INPUT: i64 = 100;

/// Extra digits carried by intermediate results of multi-step operations.
const GUARD_DIGITS: u32 = 10;
const LOGARITHM_ITERATIONS: usize = 8;

/// The arithmetic context: every operation rounds its result to `precision`
/// significant digits (half to even) and fails when the result's adjusted exponent
/// exceeds `max_exponent`. Results too small to represent become zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Context {
    pub precision: u32,
    pub max_exponent: i64,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            precision: DEFAULT_PRECISION,
            max_exponent: DEFAULT_MAX_EXPONENT,
        }
    }
}

impl Context {
    /// A context for intermediate results: more digits, and room beyond the exponent
    /// range so that only the final rounding can overflow.
    fn working(&self, extra_digits: u32) -> Context {
        Context {
            precision: self.precision + extra_digits,
            max_exponent: self.max_exponent.saturating_mul(2),
        }
    }

    fn digits(&self) -> i64 {
        i64::from(self.precision)
    }

    pub fn round(&self, number: Number) -> Result<Number> {
        let excess = number.digits() - self.digits();
        let number = if excess > 0 {
            let exponent = number.exponent + excess;
            number.quantize(exponent, Rounding::HalfEven)
        } else {
            number
        };

        let adjusted = number.adjusted();
        if adjusted > self.max_exponent {
            Err(EvaluationError::overflow(format!(
                "result exceeds the exponent limit of {}",
                self.max_exponent
            )))
        } else if adjusted < -self.max_exponent {
            Ok(Number::zero())
        } else {
            Ok(number)
        }
    }

    /// Fails when a result of the given decimal magnitude cannot be represented,
    /// and tells whether it is so small that it rounds to zero.
    fn underflows(&self, magnitude: f64) -> Result<bool> {
        if magnitude > (self.max_exponent + 1) as f64 {
            return Err(EvaluationError::overflow(format!(
                "result exceeds the exponent limit of {}",
                self.max_exponent
            )));
        }
        Ok(magnitude < -((self.max_exponent + self.digits() + 1) as f64))
    }

    pub fn add(&self, left: &Number, right: &Number) -> Result<Number> {
        if left.is_zero() {
            return self.round(right.clone());
        }
        if right.is_zero() {
            return self.round(left.clone());
        }
        let (left, right) = (self.collapse(left, right), self.collapse(right, left));
        let exponent = left.exponent.min(right.exponent);
        let sum = align(&left, exponent) + align(&right, exponent);
        self.round(Number::new(sum, exponent))
    }

    /// An operand far below the precision window of the other only matters through
    /// its sign, so it is replaced by a single digit just below that window.
    fn collapse(&self, number: &Number, other: &Number) -> Number {
        let window = self.digits() + 2;
        if other.adjusted() - number.adjusted() > window {
            Number::new(number.coefficient.signum(), other.adjusted() - window - 1)
        } else {
            number.clone()
        }
    }

    pub fn subtract(&self, left: &Number, right: &Number) -> Result<Number> {
        self.add(left, &-right)
    }

    pub fn multiply(&self, left: &Number, right: &Number) -> Result<Number> {
        let product = &left.coefficient * &right.coefficient;
        self.round(Number::new(product, left.exponent + right.exponent))
    }

    pub fn divide(&self, dividend: &Number, divisor: &Number) -> Result<Number> {
        if divisor.is_zero() {
            return Err(EvaluationError::domain("division by zero"));
        }
        if dividend.is_zero() {
            return Ok(Number::zero());
        }
        let shift = (self.digits() + 2 + divisor.digits() - dividend.digits()).max(0);
        let numerator = &dividend.coefficient * pow10(shift as u64);
        let (quotient, remainder) = numerator.div_rem(&divisor.coefficient);
        let exponent = dividend.exponent - divisor.exponent - shift;

        let result = if remainder.is_zero() {
            Number::new(quotient, exponent)
        } else {
            // A trailing sticky digit keeps an inexact quotient off exact ties.
            let sticky = remainder.signum() * divisor.coefficient.signum();
            Number::new(quotient * 10 + sticky, exponent - 1)
        };
        self.round(result)
    }

    /// Raises `base` to `exponent`. Integral exponents use repeated squaring,
    /// fractional ones `exp(exponent * ln(base))`.
    pub fn power(&self, base: &Number, exponent: &Number) -> Result<Number> {
        if exponent.is_integral() {
            return self.integral_power(base, exponent);
        }
        if base.is_negative() {
            return Err(EvaluationError::domain(
                "negative number cannot be raised to a fractional power",
            ));
        }
        if base.is_zero() {
            return if exponent.is_positive() {
                Ok(Number::zero())
            } else {
                Err(EvaluationError::domain(
                    "zero cannot be raised to a negative power",
                ))
            };
        }
        if *base == Number::one() {
            return Ok(Number::one());
        }

        let magnitude = base.log10_estimate() * exponent.to_f64();
        if self.underflows(magnitude)? {
            return Ok(Number::zero());
        }
        let extra_digits = magnitude.abs().log10().max(0.0).ceil() as u32;
        let working = self.working(GUARD_DIGITS + extra_digits);
        let logarithm = working.ln(base)?;
        let product = working.multiply(exponent, &logarithm)?;
        self.round(working.exp(&product)?)
    }

    fn integral_power(&self, base: &Number, exponent: &Number) -> Result<Number> {
        if exponent.is_zero() {
            return if base.is_zero() {
                Err(EvaluationError::domain("0 ** 0 is undefined"))
            } else {
                Ok(Number::one())
            };
        }
        if base.is_zero() {
            return if exponent.is_negative() {
                Err(EvaluationError::domain(
                    "zero cannot be raised to a negative power",
                ))
            } else {
                Ok(Number::zero())
            };
        }
        // Canonical integers with a positive exponent end in zero, so they are even.
        let odd = exponent.exponent == 0 && exponent.coefficient.is_odd();
        if base.abs() == Number::one() {
            return Ok(if base.is_negative() && odd {
                -Number::one()
            } else {
                Number::one()
            });
        }

        let magnitude = base.log10_estimate() * exponent.to_f64();
        if !magnitude.is_finite() || exponent.adjusted() > 40 {
            let grows = (base.abs() > Number::one()) == exponent.is_positive();
            return if grows {
                Err(EvaluationError::overflow("power is too large"))
            } else {
                Ok(Number::zero())
            };
        }
        if self.underflows(magnitude)? {
            return Ok(Number::zero());
        }

        let working = self.working(exponent.adjusted() as u32 + 3);
        let mut remaining = exponent.coefficient.abs() * pow10(exponent.exponent as u64);
        let mut result = Number::one();
        let mut square = base.clone();
        loop {
            if remaining.is_odd() {
                result = working.multiply(&result, &square)?;
            }
            remaining = remaining >> 1usize;
            if remaining.is_zero() {
                break;
            }
            square = working.multiply(&square, &square)?;
        }
        if exponent.is_negative() {
            result = working.divide(&Number::one(), &result)?;
        }
        self.round(result)
    }

    pub fn sqrt(&self, number: &Number) -> Result<Number> {
        if number.is_negative() {
            return Err(EvaluationError::domain(
                "square root of a negative number",
            ));
        }
        if number.is_zero() {
            return Ok(Number::zero());
        }
        let mut coefficient = number.coefficient.clone();
        let mut exponent = number.exponent;
        if exponent % 2 != 0 {
            coefficient *= 10;
            exponent -= 1;
        }
        let mut shift = (2 * (self.digits() + 2) - digit_count(&coefficient)).max(0);
        if shift % 2 != 0 {
            shift += 1;
        }
        let scaled = coefficient * pow10(shift as u64);
        let root = Roots::sqrt(&scaled);
        let exponent = (exponent - shift) / 2;

        let result = if &root * &root == scaled {
            Number::new(root, exponent)
        } else {
            Number::new(root * 10 + 1, exponent - 1)
        };
        self.round(result)
    }

    /// `e` raised to `power`, by Taylor series on `power / 2^k` squared `k` times.
    pub fn exp(&self, power: &Number) -> Result<Number> {
        if power.is_zero() {
            return Ok(Number::one());
        }
        let value = power.to_f64();
        if self.underflows(value / std::f64::consts::LN_10)? {
            return Ok(Number::zero());
        }

        let halvings = if value.abs() < 0.5 {
            0
        } else {
            (value.abs() / 0.5).log2().ceil() as u32 + 1
        };
        let working = self.working(GUARD_DIGITS + halvings / 3 + 1);
        let reduced = working.divide(power, &Number::from(BigInt::one() << halvings))?;

        let mut sum = Number::one();
        let mut term = Number::one();
        for n in 1_i64.. {
            term = working.divide(&working.multiply(&term, &reduced)?, &Number::from(n))?;
            if term.is_zero() || term.adjusted() < sum.adjusted() - working.digits() - 1 {
                break;
            }
            sum = working.add(&sum, &term)?;
        }
        for _ in 0..halvings {
            sum = working.multiply(&sum, &sum)?;
        }
        self.round(sum)
    }

    /// The natural logarithm, computed as `ln(m) + k * ln(10)` for `m * 10^k`.
    pub fn ln(&self, number: &Number) -> Result<Number> {
        if !number.is_positive() {
            return Err(EvaluationError::domain(
                "logarithm of a non-positive number",
            ));
        }
        if *number == Number::one() {
            return Ok(Number::zero());
        }
        let adjusted = number.adjusted();
        let scale_digits = adjusted.unsigned_abs().to_string().len() as u32;
        let working = self.working(GUARD_DIGITS + scale_digits + cancelled_digits(number)?);

        let mantissa = Number::new(number.coefficient.clone(), number.exponent - adjusted);
        let mut logarithm = working.ln_reduced(&mantissa)?;
        if adjusted != 0 {
            let ln_10 = working.ln_reduced(&Number::from(10_i64))?;
            let scaled = working.multiply(&ln_10, &Number::from(adjusted))?;
            logarithm = working.add(&logarithm, &scaled)?;
        }
        self.round(logarithm)
    }

    /// Natural logarithm of a number between 1 and 10, refined from the double
    /// precision estimate by Halley's iteration `y += 2 (x - e^y) / (x + e^y)`.
    fn ln_reduced(&self, number: &Number) -> Result<Number> {
        if *number == Number::one() {
            return Ok(Number::zero());
        }
        let two = Number::from(2_i64);
        let mut logarithm = Number::from_f64(number.to_f64().ln())?;
        for _ in 0..LOGARITHM_ITERATIONS {
            let power = self.exp(&logarithm)?;
            let numerator = self.multiply(&two, &self.subtract(number, &power)?)?;
            let correction = self.divide(&numerator, &self.add(number, &power)?)?;
            logarithm = self.add(&logarithm, &correction)?;
            if correction.is_zero() || correction.adjusted() < logarithm.adjusted() - self.digits()
            {
                break;
            }
        }
        Ok(logarithm)
    }

    /// The base 10 logarithm; exact for powers of ten.
    pub fn log10(&self, number: &Number) -> Result<Number> {
        if !number.is_positive() {
            return Err(EvaluationError::domain(
                "logarithm of a non-positive number",
            ));
        }
        if number.coefficient.is_one() {
            return Ok(Number::from(number.exponent));
        }
        let working = self.working(GUARD_DIGITS);
        let logarithm = working.divide(
            &working.ln(number)?,
            &working.ln(&Number::from(10_i64))?,
        )?;
        self.round(logarithm)
    }

    /// `n!` for integral `0 <= n <= MAX_FACTORIAL_INPUT`.
    pub fn factorial(&self, number: &Number) -> Result<Number> {
        if *number > Number::from(MAX_FACTORIAL_INPUT) {
            return Err(EvaluationError::overflow(format!(
                "factorial input too big (max={})",
                MAX_FACTORIAL_INPUT
            )));
        }
        let n = match number.to_i64() {
            Some(n) if n >= 0 => n,
            _ => {
                return Err(EvaluationError::domain(
                    "factorial() only accepts non-negative integral values",
                ))
            }
        };
        let product = (2..=n).fold(BigInt::one(), |product, factor| product * factor);
        self.round(Number::from(product))
    }
}

fn align(number: &Number, exponent: i64) -> BigInt {
    &number.coefficient * pow10((number.exponent - exponent) as u64)
}

/// Leading digits of a logarithm near 0 that cancel when `number` lies close to 1.
fn cancelled_digits(number: &Number) -> Result<u32> {
    let adjusted = number.adjusted();
    if adjusted != 0 && adjusted != -1 {
        return Ok(0);
    }
    let exact = Context {
        precision: number.digits() as u32 + 2,
        ..Context::default()
    };
    let distance = exact.subtract(number, &Number::one())?;
    if distance.is_zero() {
        return Ok(0);
    }
    Ok((-distance.adjusted()).max(0) as u32)
}
