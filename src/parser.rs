/*

parser.rs - Composite unit expression parser
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

/*!

# Composite unit parser

Parses composite unit expressions into [expression trees][1] and, given a
[resolver][2], reduces them to a dimension signature and an exact conversion
factor.

The accepted grammar is:

```text
expr    := product ( '/' product )?
product := atom ( ( '*' | '·' ) atom )*
atom    := name ( '^' ( '-' | '+' )? digits )?
name    := letter+
```

A numerator written as the literal `1` is also accepted when a denominator
follows, so `1/s` parses. This is the form the [formatter][3] produces for
signatures with only negative exponents.

Parsing is all-or-nothing: any syntax error or unresolvable unit name fails
the whole expression.

## Examples

```
use dimensional::{dimension::DimensionSignature, parser, resolver::UnitResolver};

let resolver = UnitResolver::standard();
let unit = parser::parse("N*m", resolver).unwrap();
assert_eq!(unit.signature(), DimensionSignature::ENERGY);

assert!(parser::try_parse("m**s", resolver).is_none());
assert!(!parser::is_valid_composite("m/s/kg", resolver));
```

[1]: crate::ast
[2]: crate::resolver::UnitResolver
[3]: crate::format::CompositeFormatter
*/

use std::iter::Peekable;

use thiserror::Error;

use crate::{
    ast::{Atom, CompositeExpr, Product},
    eval::{CompositeUnit, EvalError},
    lexer::{Lexer, Token},
    operation::Operation,
    resolver::UnitResolver,
};

/// # Composite unit parser
///
/// Recursive descent parser over the [`Token`] stream of a [`Lexer`].
#[derive(Debug)]
pub struct Parser<'a> {
    src: &'a str,
    tokens: Peekable<Lexer<'a>>,
}

impl<'a> Parser<'a> {
    /// Create a new [`Parser`] for an expression string.
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            tokens: Lexer::new(src).peekable(),
        }
    }

    /// Parse the whole input into a [`CompositeExpr`].
    pub fn parse(mut self) -> Result<CompositeExpr, ParseError> {
        if self.src.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        if let Some(tok @ Token::Operator(_)) = self.tokens.peek() {
            return Err(ParseError::UnexpectedToken(tok.clone()));
        }

        let numerator = if matches!(self.tokens.peek(), Some(Token::Number(n)) if n == "1") {
            self.tokens.next();
            match self.tokens.peek() {
                Some(Token::Operator(Operation::Divide)) => Product::default(),
                Some(tok) => return Err(ParseError::UnexpectedToken(tok.clone())),
                None => return Err(ParseError::UnexpectedEnd),
            }
        } else {
            self.parse_product()?
        };

        let denominator = match self.tokens.next() {
            None => None,
            Some(Token::Operator(Operation::Divide)) => Some(self.parse_product()?),
            Some(tok) => return Err(unexpected(tok)),
        };

        match self.tokens.next() {
            None => Ok(CompositeExpr::new(numerator, denominator)),
            Some(Token::Operator(Operation::Divide)) => Err(ParseError::MultipleDivisions),
            Some(tok) => Err(unexpected(tok)),
        }
    }

    fn parse_product(&mut self) -> Result<Product, ParseError> {
        let mut atoms = vec![self.parse_atom()?];
        while let Some(Token::Operator(Operation::Multiply)) = self.tokens.peek() {
            self.tokens.next();
            atoms.push(self.parse_atom()?);
        }
        Ok(Product::new(atoms))
    }

    /// Parse one atom. Always called at the start of input or directly after
    /// an operator.
    fn parse_atom(&mut self) -> Result<Atom, ParseError> {
        let name = match self.tokens.next() {
            Some(Token::Ident(name)) => name,
            Some(Token::Operator(op)) => return Err(ParseError::ConsecutiveOperators(op)),
            Some(tok) => return Err(unexpected(tok)),
            None => return Err(ParseError::UnexpectedEnd),
        };

        if let Some(Token::Operator(Operation::Raise)) = self.tokens.peek() {
            self.tokens.next();
            let exponent = self.parse_exponent()?;
            Ok(Atom::new(name, exponent))
        } else {
            Ok(Atom::new(name, 1))
        }
    }

    fn parse_exponent(&mut self) -> Result<i32, ParseError> {
        let mut text = String::new();
        let digits = match self.tokens.next() {
            Some(Token::Minus) => {
                text.push('-');
                self.tokens.next()
            }
            Some(Token::Plus) => self.tokens.next(),
            tok => tok,
        };
        match digits {
            Some(Token::Number(digits)) => {
                text.push_str(&digits);
                text.parse().map_err(|_| ParseError::InvalidExponent(text))
            }
            Some(Token::Operator(op)) => Err(ParseError::ConsecutiveOperators(op)),
            Some(tok) => Err(unexpected(tok)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}

fn unexpected(tok: Token) -> ParseError {
    match tok {
        Token::Illegal(c) => ParseError::IllegalCharacter(c),
        tok => ParseError::UnexpectedToken(tok),
    }
}

/// Parse a composite unit expression and evaluate it against `resolver`.
pub fn parse(expr: &str, resolver: &UnitResolver) -> Result<CompositeUnit, CompositeError> {
    let tree = Parser::new(expr).parse()?;
    Ok(tree.eval(resolver)?)
}

/// Parse a composite unit expression, discarding the reason for failure.
pub fn try_parse(expr: &str, resolver: &UnitResolver) -> Option<CompositeUnit> {
    parse(expr, resolver).ok()
}

/// Tests whether `expr` is a well-formed composite of resolvable units.
/// Tests whether `expr` parses and evaluates to a unit.
pub fn is_valid_composite(expr: &str, resolver: &UnitResolver) -> bool {
    try_parse(expr, resolver).is_some()
}

/// # Syntax errors
///
/// Errors which occur when the text of an expression does not match the
/// composite unit grammar.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The expression is empty or whitespace only.
    #[error("Empty unit expression")]
    Empty,

    /// A character outside the grammar.
    #[error("Illegal character `{0}`")]
    IllegalCharacter(char),

    /// A token which cannot appear at its position.
    #[error("Unexpected {0}")]
    UnexpectedToken(Token),

    /// The expression ends after an operator.
    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    /// Two operators with no unit between them.
    #[error("Operator `{0}` follows another operator")]
    ConsecutiveOperators(Operation),

    /// More than one `/`.
    #[error("Only one division is allowed in a unit expression")]
    MultipleDivisions,

    /// An exponent which is not an integer in range.
    #[error("Invalid exponent `{0}`")]
    InvalidExponent(String),
}

/// # Composite unit errors
///
/// Any reason a composite unit expression can fail to produce a unit.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompositeError {
    /// The text does not match the grammar.
    #[error("Syntax error: {0}")]
    Parse(#[from] ParseError),

    /// The expression parsed, but does not describe a unit.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{dimension::DimensionSignature, rat_util_macros::rat};

    fn tree(src: &str) -> Result<String, ParseError> {
        Parser::new(src).parse().map(|expr| expr.to_string())
    }

    #[test]
    fn accepted_syntax() {
        let cases = [
            ("m", "m"),
            ("kg*m^2/s^2", "kg*m^2/s^2"),
            ("kg · m / s ^ 2", "kg*m/s^2"),
            ("s^-1", "s^-1"),
            ("s^+3", "s^3"),
            ("1/s", "1/s"),
            ("m·kg/s^2·A", "m*kg/s^2*A"),
        ];
        for (src, expected) in cases {
            assert_eq!(tree(src), Ok(expected.to_string()), "{:?}", src);
        }
    }

    #[test]
    fn rejected_syntax() {
        use Operation::*;
        let cases = [
            ("", ParseError::Empty),
            ("   ", ParseError::Empty),
            ("m**s", ParseError::ConsecutiveOperators(Multiply)),
            ("m··s", ParseError::ConsecutiveOperators(Multiply)),
            ("m*·s", ParseError::ConsecutiveOperators(Multiply)),
            ("m//s", ParseError::ConsecutiveOperators(Divide)),
            ("m/s/kg", ParseError::MultipleDivisions),
            ("m/", ParseError::UnexpectedEnd),
            ("m^", ParseError::UnexpectedEnd),
            ("*m", ParseError::UnexpectedToken(Token::Operator(Multiply))),
            ("m_s", ParseError::IllegalCharacter('_')),
            ("m2", ParseError::UnexpectedToken(Token::Number("2".to_string()))),
            ("1", ParseError::UnexpectedEnd),
            ("2/s", ParseError::UnexpectedToken(Token::Number("2".to_string()))),
            ("m^x", ParseError::UnexpectedToken(Token::Ident("x".to_string()))),
            (
                "m^99999999999",
                ParseError::InvalidExponent("99999999999".to_string()),
            ),
        ];
        for (src, err) in cases {
            assert_eq!(tree(src), Err(err), "{:?}", src);
        }
    }

    #[test]
    fn evaluates_against_resolver() {
        let resolver = UnitResolver::standard();
        let unit = parse("N*m", resolver).unwrap();
        assert_eq!(unit.signature(), DimensionSignature::ENERGY);
        assert_eq!(unit.factor_exact(), rat!(1));

        let unit = parse("km/h", resolver).unwrap();
        assert_eq!(unit.signature(), DimensionSignature::VELOCITY);
        assert_eq!(unit.factor_exact(), rat!(5, 18));

        let unit = parse("1/s", resolver).unwrap();
        assert_eq!(unit.signature(), DimensionSignature::FREQUENCY);
    }

    #[test]
    fn rejects_unknown_atoms() {
        let resolver = UnitResolver::standard();
        assert_eq!(
            parse("xyz*abc", resolver),
            Err(CompositeError::Eval(EvalError::UnknownUnit("xyz".to_string())))
        );
        assert!(!is_valid_composite("m*abc", resolver));
        assert!(is_valid_composite("kg*m/s^2", resolver));
    }

    #[test]
    fn rejects_affine_atoms() {
        let resolver = UnitResolver::standard();
        assert_eq!(
            parse("degC/s", resolver),
            Err(CompositeError::Eval(EvalError::NonLinearUnit("degC".to_string())))
        );
    }
}
