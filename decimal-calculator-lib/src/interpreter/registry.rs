//! # Functions and constants
//!
//! The names an expression may refer to. Both tables are immutable statics shared by
//! every evaluation.
//!
//! Functions run on one of two backends: trigonometric, hyperbolic and most
//! logarithmic functions are computed in double precision and converted exactly to a
//! decimal, while the rest are computed in decimal arithmetic under the context.
use crate::error::{EvaluationError, Result};
use crate::interpreter::context::Context;
use crate::interpreter::number::{Number, Rounding};
use num_bigint::BigInt;
use std::fmt;
use std::fmt::Formatter;

/// How many arguments a function takes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arity {
    One,
    Two,
    OneOrTwo,
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::One => count == 1,
            Arity::Two => count == 2,
            Arity::OneOrTwo => count == 1 || count == 2,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Arity::One => write!(f, "1"),
            Arity::Two => write!(f, "2"),
            Arity::OneOrTwo => write!(f, "1 or 2"),
        }
    }
}

type Unary = fn(&Context, &Number) -> Result<Number>;
type Binary = fn(&Context, &Number, &Number) -> Result<Number>;

#[derive(Copy, Clone)]
pub enum Implementation {
    /// Computed in double precision; the result is converted exactly, then rounded.
    Float(fn(f64) -> f64),
    FloatPair(fn(f64, f64) -> f64),
    Decimal(Unary),
    DecimalPair(Binary),
    /// Separate implementations for one and for two arguments.
    Overloaded(Unary, Binary),
}

/// The values the first argument of a function must lie in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Domain {
    Unrestricted,
    Positive,
    /// `[-1, 1]`
    UnitInterval,
    /// `(-1, 1)`
    OpenUnitInterval,
    AtLeastOne,
    /// Everything except zero and the negative integers.
    NoGammaPoles,
}

impl Domain {
    fn contains(&self, argument: &Number) -> bool {
        match self {
            Domain::Unrestricted => true,
            Domain::Positive => argument.is_positive(),
            Domain::UnitInterval => argument.abs() <= Number::one(),
            Domain::OpenUnitInterval => argument.abs() < Number::one(),
            Domain::AtLeastOne => *argument >= Number::one(),
            Domain::NoGammaPoles => argument.is_positive() || !argument.is_integral(),
        }
    }
}

pub struct Function {
    pub name: &'static str,
    pub domain: Domain,
    pub implementation: Implementation,
}

impl Function {
    const fn new(name: &'static str, domain: Domain, implementation: Implementation) -> Function {
        Function {
            name,
            domain,
            implementation,
        }
    }

    pub fn arity(&self) -> Arity {
        match self.implementation {
            Implementation::Float(_) | Implementation::Decimal(_) => Arity::One,
            Implementation::FloatPair(_) | Implementation::DecimalPair(_) => Arity::Two,
            Implementation::Overloaded(_, _) => Arity::OneOrTwo,
        }
    }

    pub fn check_arity(&self, given: usize) -> Result<()> {
        if self.arity().accepts(given) {
            Ok(())
        } else {
            Err(EvaluationError::Arity {
                function: self.name.to_string(),
                expected: self.arity(),
                given,
            })
        }
    }

    /// Applies the function to its arguments.
    ///
    /// # Arguments
    ///
    /// * `arguments`: One or two arguments, as the arity of the function allows.
    /// * `context`: The context the result is rounded to.
    ///
    /// returns: The function value, or why it has none.
    ///
    /// # Examples
    ///
    /// ```
    /// use decimal_calculator::interpreter::context::Context;
    /// use decimal_calculator::interpreter::registry::find_function;
    /// use decimal_calculator::Number;
    ///
    /// let hypot = find_function("hypot").unwrap();
    /// let arguments = [Number::from(3_i64), Number::from(4_i64)];
    /// let length = hypot.call(&arguments, &Context::default()).unwrap();
    /// assert_eq!(length, Number::from(5_i64));
    /// ```
    pub fn call(&self, arguments: &[Number], context: &Context) -> Result<Number> {
        self.check_arity(arguments.len())?;
        if let Some(first) = arguments.first() {
            if !self.domain.contains(first) {
                return Err(EvaluationError::domain(format!(
                    "{}({}) is undefined",
                    self.name, first
                )));
            }
        }

        match (self.implementation, arguments) {
            (Implementation::Float(function), [x]) => from_float(function(x.to_f64()), context),
            (Implementation::FloatPair(function), [x, y]) => {
                from_float(function(x.to_f64(), y.to_f64()), context)
            }
            (Implementation::Decimal(function), [x])
            | (Implementation::Overloaded(function, _), [x]) => function(context, x),
            (Implementation::DecimalPair(function), [x, y])
            | (Implementation::Overloaded(_, function), [x, y]) => function(context, x, y),
            _ => Err(EvaluationError::Arity {
                function: self.name.to_string(),
                expected: self.arity(),
                given: arguments.len(),
            }),
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity())
    }
}

fn from_float(value: f64, context: &Context) -> Result<Number> {
    context.round(Number::from_f64(value)?)
}

static FUNCTIONS: [Function; 31] = [
    Function::new("abs", Domain::Unrestricted, Implementation::Decimal(absolute)),
    Function::new("acos", Domain::UnitInterval, Implementation::Float(f64::acos)),
    Function::new("acosh", Domain::AtLeastOne, Implementation::Float(f64::acosh)),
    Function::new("asin", Domain::UnitInterval, Implementation::Float(f64::asin)),
    Function::new("asinh", Domain::Unrestricted, Implementation::Float(f64::asinh)),
    Function::new("atan", Domain::Unrestricted, Implementation::Float(f64::atan)),
    Function::new("atanh", Domain::OpenUnitInterval, Implementation::Float(f64::atanh)),
    Function::new("ceil", Domain::Unrestricted, Implementation::Decimal(ceiling)),
    Function::new("cos", Domain::Unrestricted, Implementation::Float(f64::cos)),
    Function::new("cosh", Domain::Unrestricted, Implementation::Float(f64::cosh)),
    Function::new("degrees", Domain::Unrestricted, Implementation::Float(f64::to_degrees)),
    Function::new("distance", Domain::Unrestricted, Implementation::FloatPair(f64::hypot)),
    Function::new("exp", Domain::Unrestricted, Implementation::Decimal(Context::exp)),
    Function::new("factorial", Domain::Unrestricted, Implementation::Decimal(Context::factorial)),
    Function::new("floor", Domain::Unrestricted, Implementation::Decimal(floor)),
    Function::new("gamma", Domain::NoGammaPoles, Implementation::Float(libm::tgamma)),
    Function::new("hypot", Domain::Unrestricted, Implementation::FloatPair(f64::hypot)),
    Function::new("int", Domain::Unrestricted, Implementation::Overloaded(truncate, parse_in_base)),
    Function::new("ln", Domain::Positive, Implementation::Float(f64::ln)),
    Function::new("log", Domain::Positive, Implementation::Overloaded(Context::log10, logarithm_in_base)),
    Function::new("log10", Domain::Positive, Implementation::Float(f64::log10)),
    Function::new("log2", Domain::Positive, Implementation::Float(f64::log2)),
    Function::new("pow", Domain::Unrestricted, Implementation::DecimalPair(Context::power)),
    Function::new("radians", Domain::Unrestricted, Implementation::Float(f64::to_radians)),
    Function::new("round", Domain::Unrestricted, Implementation::Overloaded(round_to_integer, round_to_places)),
    Function::new("sin", Domain::Unrestricted, Implementation::Float(f64::sin)),
    Function::new("sinh", Domain::Unrestricted, Implementation::Float(f64::sinh)),
    Function::new("sqrt", Domain::Unrestricted, Implementation::Decimal(Context::sqrt)),
    Function::new("tan", Domain::Unrestricted, Implementation::Float(f64::tan)),
    Function::new("tanh", Domain::Unrestricted, Implementation::Float(f64::tanh)),
    Function::new("trunc", Domain::Unrestricted, Implementation::Decimal(truncate)),
];

fn absolute(context: &Context, x: &Number) -> Result<Number> {
    context.round(x.abs())
}

fn ceiling(context: &Context, x: &Number) -> Result<Number> {
    context.round(x.quantize(0, Rounding::Ceiling))
}

fn floor(context: &Context, x: &Number) -> Result<Number> {
    context.round(x.quantize(0, Rounding::Floor))
}

fn truncate(context: &Context, x: &Number) -> Result<Number> {
    context.round(x.quantize(0, Rounding::Down))
}

fn round_to_integer(context: &Context, x: &Number) -> Result<Number> {
    context.round(x.quantize(0, Rounding::HalfEven))
}

/// Rounds half to even at `places` digits after the point; negative places round
/// to tens, hundreds and so on.
fn round_to_places(context: &Context, x: &Number, places: &Number) -> Result<Number> {
    let places = places.to_i64().ok_or_else(|| {
        EvaluationError::domain(format!(
            "round() needs an integral number of places, not {}",
            places
        ))
    })?;
    context.round(x.quantize(places.saturating_neg(), Rounding::HalfEven))
}

/// Reads the digits of an integral number as an integer written in `base`.
fn parse_in_base(context: &Context, x: &Number, base: &Number) -> Result<Number> {
    let radix = match base.to_i64() {
        Some(radix @ 2..=36) => radix as u32,
        _ => {
            return Err(EvaluationError::domain(
                "int() base must be an integer between 2 and 36",
            ))
        }
    };
    let text = x.to_string();
    let value = BigInt::parse_bytes(text.as_bytes(), radix).ok_or_else(|| {
        EvaluationError::domain(format!(
            "invalid literal for int() with base {}: {}",
            radix, text
        ))
    })?;
    context.round(Number::from(value))
}

fn logarithm_in_base(context: &Context, x: &Number, base: &Number) -> Result<Number> {
    if !base.is_positive() || *base == Number::one() {
        return Err(EvaluationError::domain(format!(
            "log() base must be positive and not 1, not {}",
            base
        )));
    }
    from_float(x.to_f64().ln() / base.to_f64().ln(), context)
}

/// A named value, stored to the context's full precision.
#[derive(Debug)]
pub struct Constant {
    pub name: &'static str,
    coefficient: u128,
    exponent: i64,
}

impl Constant {
    pub fn value(&self) -> Number {
        Number::new(BigInt::from(self.coefficient), self.exponent)
    }
}

static CONSTANTS: [Constant; 2] = [
    Constant {
        name: "e",
        coefficient: 2718281828459045235360287471,
        exponent: -27,
    },
    Constant {
        name: "pi",
        coefficient: 3141592653589793238462643383,
        exponent: -27,
    },
];

pub fn find_function(name: &str) -> Option<&'static Function> {
    FUNCTIONS.iter().find(|function| function.name == name)
}

pub fn find_constant(name: &str) -> Option<&'static Constant> {
    CONSTANTS.iter().find(|constant| constant.name == name)
}
