/*

format.rs - Formatting of signatures and values
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

//! Formatting of [dimension signatures][DimensionSignature] and numbers
//!
//! [`CompositeFormatter`] renders a signature as a canonical composite unit
//! string, the inverse of the [composite parser][1]. The [`Formatter`] trait
//! renders numbers for display with a given precision.
//!
//! [1]: crate::parser

use std::fmt::{self, Display};

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use strum::{EnumCount, IntoEnumIterator};
use thiserror::Error;

use crate::{
    dimension::{BaseQuantity, DimensionSignature},
    rational::Rational,
};

/// Formatting of numbers to a fixed number of decimal places.
///
/// Integral values print without a fractional part.
pub trait Formatter {
    /// Render the value rounded to `precision` decimal places.
    fn format(&self, precision: usize) -> String;
}

impl Formatter for Decimal {
    fn format(&self, precision: usize) -> String {
        if self.fract().is_zero() {
            self.normalize().to_string()
        } else {
            let dp = u32::try_from(precision).unwrap_or(u32::MAX);
            format!("{:.*}", precision, self.round_dp(dp))
        }
    }
}

impl Formatter for Rational {
    fn format(&self, precision: usize) -> String {
        if self.is_integer() {
            self.numer().to_string()
        } else {
            self.to_decimal().format(precision)
        }
    }
}

/// Default middle-dot join symbol
pub const DEFAULT_SEPARATOR: &str = "·";

static DEFAULT_FORMATTER: Lazy<CompositeFormatter> = Lazy::new(CompositeFormatter::default);

/// # Composite unit formatter
///
/// Renders a [`DimensionSignature`] using one token per base quantity, in the
/// canonical base quantity order. Positive exponents go to the numerator and
/// negative exponents to the denominator. Exponents are written with a caret
/// when their magnitude is greater than one.
///
/// ```
/// use dimensional::{dimension::DimensionSignature, format::CompositeFormatter};
///
/// let formatter = CompositeFormatter::default();
/// assert_eq!(formatter.format(&DimensionSignature::FORCE), "m·kg/s^2");
/// assert_eq!(formatter.format(&DimensionSignature::FREQUENCY), "1/s");
/// assert_eq!(formatter.format(&DimensionSignature::DIMENSIONLESS), "");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeFormatter {
    tokens: [String; BaseQuantity::COUNT],
    separator: String,
}

impl Default for CompositeFormatter {
    /// SI base unit tokens joined with a middle dot.
    fn default() -> Self {
        Self {
            tokens: BaseQuantity::iter()
                .map(|bq| bq.si_token().to_string())
                .collect::<Vec<_>>()
                .try_into()
                .unwrap_or_default(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl CompositeFormatter {
    /// Create a formatter with caller-supplied base tokens.
    ///
    /// Exactly one non-empty token is required per base quantity, in
    /// canonical order.
    pub fn with_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, FormatError> {
        if tokens.len() != BaseQuantity::COUNT {
            return Err(FormatError::InvalidArgument(format!(
                "expected {} base tokens, got {}",
                BaseQuantity::COUNT,
                tokens.len()
            )));
        }
        if let Some(i) = tokens.iter().position(|t| t.as_ref().trim().is_empty()) {
            return Err(FormatError::InvalidArgument(format!(
                "base token for {} is empty",
                BaseQuantity::iter().nth(i).map_or_else(String::new, |bq| bq.to_string())
            )));
        }
        let tokens: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
        Ok(Self {
            tokens: tokens.try_into().map_err(|_| {
                FormatError::InvalidArgument("wrong number of base tokens".to_string())
            })?,
            separator: DEFAULT_SEPARATOR.to_string(),
        })
    }

    /// Replace the join symbol placed between units.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// The token printed for each base quantity, in [`BaseQuantity`] order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The string placed between factors.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Render a signature. Dimensionless signatures render as an empty string.
    pub fn format(&self, signature: &DimensionSignature) -> String {
        let mut numerator = Vec::new();
        let mut denominator = Vec::new();
        for (bq, exp) in signature.components() {
            let token = &self.tokens[bq as usize];
            let part = match exp.unsigned_abs() {
                1 => token.clone(),
                n => format!("{}^{}", token, n),
            };
            if exp > 0 {
                numerator.push(part);
            } else {
                denominator.push(part);
            }
        }

        let numerator = numerator.join(&self.separator);
        let denominator = denominator.join(&self.separator);
        match (numerator.is_empty(), denominator.is_empty()) {
            (true, true) => String::new(),
            (false, true) => numerator,
            (true, false) => format!("1/{}", denominator),
            (false, false) => format!("{}/{}", numerator, denominator),
        }
    }
}

/// Render a signature with the SI base tokens.
pub fn format_signature(signature: &DimensionSignature) -> String {
    DEFAULT_FORMATTER.format(signature)
}

/// Render a signature with caller-supplied base tokens.
pub fn format_signature_with<S: AsRef<str>>(
    signature: &DimensionSignature,
    tokens: &[S],
) -> Result<String, FormatError> {
    Ok(CompositeFormatter::with_tokens(tokens)?.format(signature))
}

impl Display for DimensionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_signature(self))
    }
}

/// Errors raised while configuring a [`CompositeFormatter`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The token list has the wrong length or an empty token.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rat_util_macros::rat;

    #[test]
    fn to_dec_string() {
        const PRECISION: usize = 3;
        let cases: Vec<(Rational, &'static str)> = vec![
            (rat!(7, 2), "3.500"),
            (rat!(-1, 3), "-0.333"),
            (rat!(20), "20"),
            (rat!(2, 3), "0.667"),
        ];
        for (rat, expected_result) in cases {
            assert_eq!(rat.format(PRECISION), expected_result);
        }
    }

    #[test]
    fn decimal_to_string() {
        assert_eq!(Decimal::new(2000, 2).format(5), "20");
        assert_eq!(Decimal::new(15, 1).format(2), "1.50");
    }

    #[test]
    fn standard_signatures() {
        use DimensionSignature as S;
        let cases = [
            (S::DIMENSIONLESS, ""),
            (S::LENGTH, "m"),
            (S::AREA, "m^2"),
            (S::VELOCITY, "m/s"),
            (S::ACCELERATION, "m/s^2"),
            (S::FORCE, "m·kg/s^2"),
            (S::ENERGY, "m^2·kg/s^2"),
            (S::FREQUENCY, "1/s"),
            (S::DENSITY, "kg/m^3"),
            (S::VOLTAGE, "m^2·kg/s^3·A"),
        ];
        for (sig, expected) in cases {
            assert_eq!(format_signature(&sig), expected);
            assert_eq!(sig.to_string(), expected);
        }
    }

    #[test]
    fn deterministic() {
        let sig = DimensionSignature::RESISTANCE;
        assert_eq!(format_signature(&sig), format_signature(&sig));
    }

    #[test]
    fn custom_tokens() {
        let tokens = ["ft", "lb", "s", "A", "R", "mol", "cd"];
        assert_eq!(
            format_signature_with(&DimensionSignature::VELOCITY, &tokens).unwrap(),
            "ft/s"
        );
        let formatter = CompositeFormatter::with_tokens(&tokens)
            .unwrap()
            .with_separator("*");
        assert_eq!(formatter.format(&DimensionSignature::ENERGY), "ft^2*lb/s^2");
    }

    #[test]
    fn invalid_tokens() {
        assert!(matches!(
            format_signature_with(&DimensionSignature::LENGTH, &["m", "kg"]),
            Err(FormatError::InvalidArgument(_))
        ));
        assert!(matches!(
            CompositeFormatter::with_tokens(&["m", "kg", "s", "", "K", "mol", "cd"]),
            Err(FormatError::InvalidArgument(_))
        ));
    }
}
