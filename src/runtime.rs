/*

runtime.rs - Interactive command runtime
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

//! Execution runtime for Dimensional.
//!
//! A [`Runtime`] evaluates one line of input at a time. A line is one of:
//!
//!  - `<unit>`: describe a unit or composite unit expression
//!  - `<value> <unit>`: express a quantity in base units
//!  - `<value> <unit> to <unit>`: convert a quantity
//!  - `<value> <unit> * <value> <unit>` (or `/`): multiply or divide two
//!    quantities
//!  - `precision <digits>`: set the number of decimal places shown

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{
    converter::ConversionError,
    format::{CompositeFormatter, Formatter},
    math::{self, DimensionalResult, MathError},
    operation::Operation,
    resolver::{NormalizedUnit, ResolveError, UnitResolver},
};

/// One parsed line of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// `<unit>`: describe a unit.
    Describe(&'a str),
    /// `<value> <unit>`: convert a quantity to base units.
    Quantity {
        /// Value in `unit`
        value: Decimal,
        /// Unit string, not yet resolved
        unit: &'a str,
    },
    /// `<value> <unit> to <unit>`
    Convert {
        /// Value in `from`
        value: Decimal,
        /// Source unit string
        from: &'a str,
        /// Target unit string
        to: &'a str,
    },
    /// `<value> <unit> <op> <value> <unit>`, where `<op>` is `*` or `/`.
    Combine {
        /// Multiplication or division
        operation: Operation,
        /// Left operand and its unit string
        left: (Decimal, &'a str),
        /// Right operand and its unit string
        right: (Decimal, &'a str),
    },
    /// `precision <n>`
    SetPrecision(usize),
}

impl<'a> Command<'a> {
    /// Keyword which starts a [`SetPrecision`][Self::SetPrecision] command.
    pub const PRECISION_KEYWORD: &'static str = "precision";
    /// Separator between the units of a [`Convert`][Self::Convert] command.
    pub const CONVERT_KEYWORD: &'static str = " to ";

    /// Split a line into a command and its unit strings.
    ///
    /// Unit strings may contain spaces, so anything that is not recognized
    /// as another command is taken to be a unit to describe.
    pub fn parse(line: &'a str) -> Result<Self, RuntimeError> {
        let line = line.trim();
        let words: Vec<&str> = line.split_whitespace().collect();
        let first = match words.first() {
            Some(first) => *first,
            None => return Err(RuntimeError::Syntax("empty input".to_string())),
        };

        if first == Self::PRECISION_KEYWORD {
            return match words[1..] {
                [digits] => digits
                    .parse()
                    .map(Command::SetPrecision)
                    .map_err(|_| RuntimeError::InvalidNumber(digits.to_string())),
                _ => Err(RuntimeError::Syntax(format!(
                    "expected `{} <digits>`",
                    Self::PRECISION_KEYWORD
                ))),
            };
        }

        if let Some((quantity, to)) = line.split_once(Self::CONVERT_KEYWORD) {
            let (value, from) = split_quantity(quantity).ok_or_else(|| {
                RuntimeError::Syntax("expected `<value> <unit> to <unit>`".to_string())
            })?;
            let to = to.trim();
            if from.is_empty() || to.is_empty() {
                return Err(RuntimeError::Syntax(
                    "expected `<value> <unit> to <unit>`".to_string(),
                ));
            }
            return Ok(Command::Convert { value, from, to });
        }

        if let [lhs_value, lhs_unit, op, rhs_value, rhs_unit] = words[..] {
            if let Ok(operation @ (Operation::Multiply | Operation::Divide)) =
                Operation::from_str(op)
            {
                if let Some(lhs_value) = parse_number(lhs_value) {
                    let rhs_value = parse_number(rhs_value)
                        .ok_or_else(|| RuntimeError::InvalidNumber(rhs_value.to_string()))?;
                    return Ok(Command::Combine {
                        operation,
                        left: (lhs_value, lhs_unit),
                        right: (rhs_value, rhs_unit),
                    });
                }
            }
        }

        match split_quantity(line) {
            Some((value, unit)) if !unit.is_empty() => Ok(Command::Quantity { value, unit }),
            _ => Ok(Command::Describe(line)),
        }
    }

    /// The unit strings named by the command.
    pub fn units(&self) -> Vec<&'a str> {
        match *self {
            Command::Describe(unit) | Command::Quantity { unit, .. } => vec![unit],
            Command::Convert { from, to, .. } => vec![from, to],
            Command::Combine { left, right, .. } => vec![left.1, right.1],
            Command::SetPrecision(_) => Vec::new(),
        }
    }
}

/// Split `<value> <unit>` into its parts. Returns `None` if the text does not
/// start with a number.
fn split_quantity(text: &str) -> Option<(Decimal, &str)> {
    let text = text.trim();
    let (value, unit) = text
        .split_once(char::is_whitespace)
        .unwrap_or((text, ""));
    parse_number(value).map(|value| (value, unit.trim()))
}

fn parse_number(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Result of evaluating a line.
#[derive(Clone, Debug)]
pub enum Output {
    /// A described unit.
    Unit(NormalizedUnit),
    /// A quantity converted to another unit.
    Conversion {
        /// Input value
        value: Decimal,
        /// Canonical token of the source unit
        from: String,
        /// Converted value
        result: Decimal,
        /// Name of the target unit
        to: String,
    },
    /// The result of a multiplication or division.
    Result(DimensionalResult),
    /// The new output precision.
    Precision(usize),
}

/// Execution runtime for Dimensional.
///
/// Holds the resolver used for unit names and user preferences like output
/// format precision.
#[derive(Debug)]
pub struct Runtime<'r> {
    resolver: &'r UnitResolver,
    precision: usize,
    formatter: CompositeFormatter,
}

impl Runtime<'static> {
    /// Create a runtime over the standard resolver.
    pub fn new() -> Self {
        Self::with_resolver(UnitResolver::standard())
    }
}

impl Default for Runtime<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Runtime<'r> {
    /// Number of decimal places printed by default.
    pub const DEFAULT_PRECISION: usize = 5;

    /// Create a runtime over a custom resolver.
    pub fn with_resolver(resolver: &'r UnitResolver) -> Self {
        Self {
            resolver,
            precision: Self::DEFAULT_PRECISION,
            formatter: CompositeFormatter::default(),
        }
    }

    /// Replace the formatter used for composite unit names.
    pub fn with_formatter(mut self, formatter: CompositeFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// The resolver used for unit names.
    pub fn resolver(&self) -> &'r UnitResolver {
        self.resolver
    }

    /// Number of decimal places printed.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Parse and run one line of input.
    ///
    /// A `precision` command changes the runtime's precision.
    pub fn evaluate(&mut self, input: &str) -> Result<Output, RuntimeError> {
        let resolver = self.resolver;
        match Command::parse(input)? {
            Command::Describe(unit) => Ok(Output::Unit(resolver.resolve(unit)?)),

            Command::Quantity { value, unit } => {
                let unit = resolver.resolve(unit)?;
                let result = unit.converter().to_base(value)?;
                Ok(Output::Conversion {
                    value,
                    from: unit.token().to_string(),
                    result,
                    to: self.base_name(&unit),
                })
            }

            Command::Convert { value, from, to } => {
                let from = resolver.resolve(from)?;
                let to = resolver.resolve(to)?;
                let result = resolver.convert_between(value, &from, &to)?;
                Ok(Output::Conversion {
                    value,
                    from: from.token().to_string(),
                    result,
                    to: to.token().to_string(),
                })
            }

            Command::Combine {
                operation,
                left,
                right,
            } => {
                let lhs = resolver.resolve(left.1)?;
                let rhs = resolver.resolve(right.1)?;
                let result = match operation {
                    Operation::Divide => math::divide(&lhs, &rhs, left.0, right.0)?,
                    _ => math::multiply(&lhs, &rhs, left.0, right.0)?,
                };
                Ok(Output::Result(result))
            }

            Command::SetPrecision(precision) => {
                self.precision = precision;
                Ok(Output::Precision(precision))
            }
        }
    }

    /// Render an [`Output`] for display.
    pub fn format(&self, output: &Output) -> String {
        match output {
            Output::Unit(unit) => self.describe_unit(unit),
            Output::Conversion {
                value,
                from,
                result,
                to,
            } => format!(
                "{} {} = {} {}",
                value.format(self.precision),
                from,
                result.format(self.precision),
                to
            ),
            Output::Result(result) => result.describe(
                self.precision,
                self.resolver.known_signatures(),
                &self.formatter,
            ),
            Output::Precision(precision) => format!("Precision set to {}", precision),
        }
    }

    /// Name of the unit values of `unit` are converted to by
    /// [`UnitConverter::to_base`][1].
    ///
    /// [1]: crate::converter::UnitConverter::to_base
    fn base_name(&self, unit: &NormalizedUnit) -> String {
        match self.resolver.get_base_unit(unit.family()) {
            Ok(base) => base.to_string(),
            Err(_) => self.formatter.format(&unit.signature()),
        }
    }

    fn describe_unit(&self, unit: &NormalizedUnit) -> String {
        let signature = unit.signature();
        let kind = format!("{}: {}", unit.family(), signature.to_symbolic());
        let base = self.base_name(unit);
        if unit.converter().is_exact() {
            format!(
                "1 {} = {} {} [{}]",
                unit.token(),
                unit.factor_exact().format(self.precision),
                base,
                kind
            )
        } else {
            format!("{} [{}], offset scale over {}", unit.token(), kind, base)
        }
    }
}

/// Errors raised while evaluating a line.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RuntimeError {
    /// The line is not a recognized command.
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// A value is not a decimal number.
    #[error("`{0}` is not a number")]
    InvalidNumber(String),

    /// A unit could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A multiplication or division failed.
    #[error(transparent)]
    Math(#[from] MathError),

    /// A value could not be converted.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
