/*

eval.rs - Evaluation of composite unit expressions
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

//! Evaluation of [composite unit expressions][CompositeExpr]

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    ast::*,
    dimension::{DimensionSignature, ExponentOverflow},
    rational::{ArithmeticError, Rational},
    resolver::UnitResolver,
};

/// # Composite unit
///
/// The reduced form of a composite unit expression: the dimension it
/// measures, and the exact factor which converts a value in this unit to the
/// base units of that dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CompositeUnit {
    signature: DimensionSignature,
    factor: Rational,
}

impl CompositeUnit {
    /// The empty product, `1`.
    pub const UNITY: Self = Self {
        signature: DimensionSignature::DIMENSIONLESS,
        factor: Rational::ONE,
    };

    /// Create a unit from its signature and factor-to-base.
    pub fn new(signature: DimensionSignature, factor: Rational) -> Self {
        Self { signature, factor }
    }

    /// The dimension this unit measures.
    pub fn signature(&self) -> DimensionSignature {
        self.signature
    }

    /// Returns the conversion factor as a decimal
    pub fn factor(&self) -> Decimal {
        self.factor.to_decimal()
    }

    /// Returns the exact conversion factor
    pub fn factor_exact(&self) -> Rational {
        self.factor
    }

    /// Multiply two units.
    ///
    /// Factors whose exact product does not fit are combined through
    /// [`Rational::approximating_mul()`], which logs a warning.
    pub fn multiply(&self, rhs: &Self) -> Result<Self, EvalError> {
        Ok(Self {
            signature: self.signature.multiply(&rhs.signature)?,
            factor: self.factor.approximating_mul(&rhs.factor)?,
        })
    }

    /// Divide one unit by another, approximating like
    /// [`multiply()`][Self::multiply].
    pub fn divide(&self, rhs: &Self) -> Result<Self, EvalError> {
        Ok(Self {
            signature: self.signature.divide(&rhs.signature)?,
            factor: self.factor.approximating_div(&rhs.factor)?,
        })
    }

    /// Raise the unit to an integer power.
    ///
    /// Negative powers divide, so `s.pow(-2)` is `1/s^2`. A factor whose
    /// exact power does not fit is built up by repeated
    /// [`Rational::approximating_mul()`].
    pub fn pow(&self, exp: i32) -> Result<Self, EvalError> {
        let signature = self.signature.pow(exp)?;
        let factor = match self.factor.checked_pow(exp) {
            Err(ArithmeticError::Overflow) => {
                let base = if exp < 0 {
                    self.factor.reciprocal()?
                } else {
                    self.factor
                };
                (0..exp.unsigned_abs())
                    .try_fold(Rational::ONE, |acc, _| acc.approximating_mul(&base))?
            }
            other => other?,
        };
        Ok(Self { signature, factor })
    }
}

impl Default for CompositeUnit {
    fn default() -> Self {
        Self::UNITY
    }
}

impl Atom {
    /// Resolve the atom's unit name through the catalog and apply its
    /// exponent.
    pub fn eval(&self, resolver: &UnitResolver) -> Result<CompositeUnit, EvalError> {
        let unit = resolver
            .lookup(&self.name)
            .ok_or_else(|| EvalError::UnknownUnit(self.name.clone()))?;
        if !unit.converter().is_exact() {
            return Err(EvalError::NonLinearUnit(self.name.clone()));
        }
        CompositeUnit::new(unit.signature(), unit.factor_exact()).pow(self.exponent)
    }
}

impl Product {
    /// Multiply the evaluated atoms together. The empty product is
    /// [`CompositeUnit::UNITY`].
    pub fn eval(&self, resolver: &UnitResolver) -> Result<CompositeUnit, EvalError> {
        self.0.iter().try_fold(CompositeUnit::UNITY, |acc, atom| {
            acc.multiply(&atom.eval(resolver)?)
        })
    }
}

impl CompositeExpr {
    /// Evaluate the expression to a [`CompositeUnit`].
    ///
    /// Every atom must name a linear unit in the resolver's catalog. No
    /// partial result is produced when any of them does not.
    pub fn eval(&self, resolver: &UnitResolver) -> Result<CompositeUnit, EvalError> {
        let numerator = self.numerator.eval(resolver)?;
        match &self.denominator {
            Some(den) => numerator.divide(&den.eval(resolver)?),
            None => Ok(numerator),
        }
    }
}

/// Errors raised while evaluating a composite expression.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    /// An atom names no unit in the catalog.
    #[error("Unknown unit `{0}`")]
    UnknownUnit(String),

    /// An atom names a unit with an offset scale, like `degC`.
    #[error("Unit `{0}` has an offset scale and cannot be combined with other units")]
    NonLinearUnit(String),

    /// A signature exponent left the `i8` range.
    #[error(transparent)]
    Exponent(#[from] ExponentOverflow),

    /// The combined factor cannot be represented.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{parser::Parser, rat_util_macros::rat};

    fn eval(src: &str) -> Result<CompositeUnit, EvalError> {
        Parser::new(src)
            .parse()
            .unwrap()
            .eval(UnitResolver::standard())
    }

    #[test]
    fn exponents_repeat() {
        let unit = eval("km^2").unwrap();
        assert_eq!(unit.signature(), DimensionSignature::AREA);
        assert_eq!(unit.factor_exact(), rat!(1_000_000));

        let unit = eval("s^-2").unwrap();
        assert_eq!(unit.signature(), DimensionSignature::TIME.pow(-2).unwrap());
        assert_eq!(eval("m/s^2").unwrap().signature(), DimensionSignature::ACCELERATION);
    }

    #[test]
    fn zero_exponent_is_unity() {
        assert_eq!(eval("m^0").unwrap(), CompositeUnit::UNITY);
    }

    #[test]
    fn cancellation() {
        let unit = eval("m/m").unwrap();
        assert!(unit.signature().is_dimensionless());
        assert_eq!(unit.factor_exact(), Rational::ONE);

        let unit = eval("km/m").unwrap();
        assert!(unit.signature().is_dimensionless());
        assert_eq!(unit.factor_exact(), rat!(1000));
    }

    #[test]
    fn imperial_factors() {
        // 1 in·lbf = 0.0254 m × 4.4482216152605 N
        let unit = eval("in*lbf").unwrap();
        assert_eq!(unit.signature(), DimensionSignature::ENERGY);
        assert_eq!(
            unit.factor_exact(),
            rat!(127, 5000).checked_mul(&rat!(44482216152605, 10000000000000)).unwrap()
        );
    }

    #[test]
    fn approximated_factors() {
        // The exact factor would need a denominator of 5 * 10^19
        let unit = eval("lbf*in^2/s^3").unwrap();
        assert_eq!(
            unit.signature(),
            DimensionSignature::from([3, 1, -5, 0, 0, 0, 0])
        );
        assert!(unit.factor_exact() > Rational::ZERO);
        let error = (unit.factor() - Decimal::new(2869814657301464180, 21)).abs();
        assert!(error < Decimal::new(1, 18), "{}", unit.factor());

        let unit = eval("lbf^2").unwrap();
        assert_eq!(unit.signature(), DimensionSignature::FORCE.pow(2).unwrap());
        let error = (unit.factor() - Decimal::new(1978667553847073168, 17)).abs();
        assert!(error < Decimal::new(1, 15), "{}", unit.factor());
    }

    #[test]
    fn exponent_overflow() {
        assert!(matches!(eval("m^200"), Err(EvalError::Exponent(_))));
        assert!(matches!(eval("km^20"), Err(EvalError::Arithmetic(_))));
    }
}
