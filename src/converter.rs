/*

converter.rs - Unit conversion strategies
Copyright (C) 2022  Kian Kasad

This file is part of Dimensional.

Dimensional is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, version 3 of the License.

Dimensional is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with Dimensional.  If not, see <https://www.gnu.org/licenses/>.

*/

//! # Unit conversion strategies
//!
//! A [`UnitConverter`] moves values between a unit and the base unit of its
//! [dimension family][1]. Almost every unit is [linear][UnitConverter::Linear]:
//! a multiplication by an exact [`Rational`]. The affine temperature scales
//! need an offset as well, so they use a pair of
//! [delegate][UnitConverter::Delegate] functions instead.
//!
//! [1]: crate::dimension::DimensionFamily

use std::{fmt, sync::Arc};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::rational::{ArithmeticError, Rational};

/// A value→value conversion function. [`None`] signals overflow.
pub type ConvertFn = Arc<dyn Fn(Decimal) -> Option<Decimal> + Send + Sync>;

/// # Conversion strategy
///
/// Converts values of a unit to and from its family's base unit.
#[derive(Clone)]
pub enum UnitConverter {
    /// Multiplication by an exact factor: `base = value * factor`.
    Linear(Rational),

    /// Arbitrary forward (to base) and inverse (from base) functions.
    Delegate {
        /// Converts a value of the unit into the base unit.
        forward: ConvertFn,
        /// Converts a value of the base unit into the unit.
        inverse: ConvertFn,
    },
}

impl UnitConverter {
    /// Create a linear converter.
    ///
    /// ## Errors
    ///
    /// A zero factor cannot be inverted and is rejected with
    /// [`ArithmeticError::DivideByZero`].
    pub fn linear(factor: Rational) -> Result<Self, ArithmeticError> {
        if factor.is_zero() {
            Err(ArithmeticError::DivideByZero)
        } else {
            Ok(Self::Linear(factor))
        }
    }

    /// Create a delegate converter from a forward and inverse function.
    pub fn delegate<F, I>(forward: F, inverse: I) -> Self
    where
        F: Fn(Decimal) -> Option<Decimal> + Send + Sync + 'static,
        I: Fn(Decimal) -> Option<Decimal> + Send + Sync + 'static,
    {
        Self::Delegate {
            forward: Arc::new(forward),
            inverse: Arc::new(inverse),
        }
    }

    /// Create an affine converter: `base = value * scale + offset`.
    pub fn affine(scale: Rational, offset: Decimal) -> Result<Self, ArithmeticError> {
        if scale.is_zero() {
            return Err(ArithmeticError::DivideByZero);
        }
        let numer = Decimal::from(scale.numer());
        let denom = Decimal::from(scale.denom());
        Ok(Self::delegate(
            move |v| v.checked_mul(numer)?.checked_div(denom)?.checked_add(offset),
            move |v| v.checked_sub(offset)?.checked_mul(denom)?.checked_div(numer),
        ))
    }

    /// Whether conversions through this converter are exact.
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Linear(_))
    }

    /// The linear factor, if this is a linear converter.
    pub fn factor(&self) -> Option<Rational> {
        match self {
            Self::Linear(factor) => Some(*factor),
            Self::Delegate { .. } => None,
        }
    }

    /// Convert a value of this unit into the base unit.
    pub fn to_base(&self, value: Decimal) -> Result<Decimal, ConversionError> {
        match self {
            Self::Linear(factor) => scale(value, factor.numer(), factor.denom()),
            Self::Delegate { forward, .. } => {
                forward(value).ok_or_else(|| ArithmeticError::Overflow.into())
            }
        }
    }

    /// Convert a value of the base unit into this unit.
    pub fn from_base(&self, value: Decimal) -> Result<Decimal, ConversionError> {
        match self {
            Self::Linear(factor) => scale(value, factor.denom(), factor.numer()),
            Self::Delegate { inverse, .. } => {
                inverse(value).ok_or_else(|| ArithmeticError::Overflow.into())
            }
        }
    }
}

impl fmt::Debug for UnitConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear(factor) => f.debug_tuple("Linear").field(factor).finish(),
            Self::Delegate { .. } => f.write_str("Delegate"),
        }
    }
}

/// Convert a value between two units of the same dimension.
///
/// If either side is a delegate, the value makes a round trip through the
/// base unit. Otherwise the two linear factors are combined into one exact
/// ratio first, so only a single multiplication and division touch the
/// value.
///
/// ```
/// use dimensional::{converter::{convert, UnitConverter}, rational::Rational};
/// use rust_decimal::Decimal;
///
/// let inch = UnitConverter::Linear(Rational::new(127, 5000).unwrap());
/// let foot = UnitConverter::Linear(Rational::new(381, 1250).unwrap());
/// assert_eq!(convert(Decimal::from(24), &inch, &foot).unwrap(), Decimal::from(2));
/// ```
pub fn convert(
    value: Decimal,
    from: &UnitConverter,
    to: &UnitConverter,
) -> Result<Decimal, ConversionError> {
    match (from, to) {
        (UnitConverter::Linear(from_factor), UnitConverter::Linear(to_factor)) => {
            match from_factor.checked_div(to_factor) {
                Ok(ratio) => scale(value, ratio.numer(), ratio.denom()),
                Err(ArithmeticError::Overflow) => {
                    tracing::debug!(
                        %from_factor,
                        %to_factor,
                        "conversion ratio overflows, converting through base unit"
                    );
                    to.from_base(from.to_base(value)?)
                }
                Err(err) => Err(err.into()),
            }
        }
        _ => to.from_base(from.to_base(value)?),
    }
}

/// Compute `value * numer / denom`.
///
/// Multiplying first keeps terminating results exact. If the product
/// overflows [`Decimal`], the division is done first instead.
fn scale(value: Decimal, numer: i64, denom: i64) -> Result<Decimal, ConversionError> {
    let numer = Decimal::from(numer);
    let denom = Decimal::from(denom);
    if denom.is_zero() {
        return Err(ArithmeticError::DivideByZero.into());
    }
    value
        .checked_mul(numer)
        .and_then(|product| product.checked_div(denom))
        .or_else(|| {
            value
                .checked_div(denom)
                .and_then(|quotient| quotient.checked_mul(numer))
        })
        .ok_or_else(|| ArithmeticError::Overflow.into())
}

/// # Conversion error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The converted value or factor left the representable range.
    #[error("Arithmetic error during conversion: {0}")]
    Arithmetic(#[from] ArithmeticError),

    /// The two units have different signatures.
    #[error("Cannot convert between units that describe different quantities: `{0}` and `{1}`")]
    IncompatibleUnits(String, String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rat_util_macros::rat;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn celsius() -> UnitConverter {
        UnitConverter::affine(Rational::ONE, dec("273.15")).unwrap()
    }

    fn fahrenheit() -> UnitConverter {
        UnitConverter::affine(rat!(5, 9), dec("255.3722222222222222222222222")).unwrap()
    }

    #[test]
    fn linear_to_and_from_base() {
        let km = UnitConverter::linear(rat!(1000)).unwrap();
        assert_eq!(km.to_base(dec("1.5")).unwrap(), dec("1500"));
        assert_eq!(km.from_base(dec("250")).unwrap(), dec("0.25"));
        assert!(km.is_exact());
        assert_eq!(km.factor(), Some(rat!(1000)));
    }

    #[test]
    fn zero_factor_rejected() {
        assert_eq!(
            UnitConverter::linear(Rational::ZERO).unwrap_err(),
            ArithmeticError::DivideByZero
        );
    }

    #[test]
    fn delegate_round_trip() {
        let c = celsius();
        assert!(!c.is_exact());
        assert_eq!(c.factor(), None);
        assert_eq!(c.to_base(dec("100")).unwrap(), dec("373.15"));
        assert_eq!(c.from_base(dec("273.15")).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn linear_pair_uses_direct_ratio() {
        let inch = UnitConverter::Linear(rat!(127, 5000));
        let foot = UnitConverter::Linear(rat!(381, 1250));
        assert_eq!(convert(dec("12"), &inch, &foot).unwrap(), Decimal::ONE);
        assert_eq!(convert(dec("1"), &foot, &inch).unwrap(), dec("12"));
    }

    #[test]
    fn delegate_pair_goes_through_base() {
        let kelvin = UnitConverter::Linear(Rational::ONE);
        assert_eq!(convert(dec("0"), &celsius(), &kelvin).unwrap(), dec("273.15"));
        assert_eq!(convert(dec("373.15"), &kelvin, &celsius()).unwrap(), dec("100"));
        let boiling = convert(dec("100"), &celsius(), &fahrenheit()).unwrap();
        assert!((boiling - dec("212")).abs() < dec("0.0000000001"));
    }

    #[test]
    fn overflow_is_reported() {
        let huge = UnitConverter::Linear(Rational::from_integer(i64::MAX));
        let unit = UnitConverter::Linear(Rational::ONE);
        assert_eq!(
            convert(Decimal::MAX, &huge, &unit),
            Err(ConversionError::Arithmetic(ArithmeticError::Overflow))
        );
    }
}
