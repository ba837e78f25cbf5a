/*

lexer.rs - Composite unit expression lexer
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

# Unit expression lexer

Transforms composite unit expression strings into [`Token`] streams. This is
a hand-written scanner over the composite grammar: letters form unit names,
digits form exponents, and `*`, `·`, `/`, `^`, `+` and `-` are single
character tokens. Whitespace separates tokens and is otherwise ignored.

## Examples

```
use dimensional::{
    lexer::{Lexer, Token::*},
    operation::Operation::*,
};

let mut lexer = Lexer::new("kg·m/s^-2");
assert_eq!(lexer.next(), Some(Ident(String::from("kg"))));
assert_eq!(lexer.next(), Some(Operator(Multiply)));
assert_eq!(lexer.next(), Some(Ident(String::from("m"))));
assert_eq!(lexer.next(), Some(Operator(Divide)));
assert_eq!(lexer.next(), Some(Ident(String::from("s"))));
assert_eq!(lexer.next(), Some(Operator(Raise)));
assert_eq!(lexer.next(), Some(Minus));
assert_eq!(lexer.next(), Some(Number(String::from("2"))));
assert_eq!(lexer.next(), None);
```

*/

use std::{iter::Peekable, str::Chars};

use strum_macros::{Display, IntoStaticStr};

use crate::operation::Operation;

/// # Expression syntax token
///
/// Represents a single piece of a unit expression in text syntax.
#[derive(Clone, Display, Debug, IntoStaticStr, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Token {
    /// ## Operator token
    ///
    /// Represents an operator, like `*` or `/`.
    Operator(Operation),

    /// ## Number token
    ///
    /// A run of ASCII digits, like `2` in `m^2`.
    Number(String),

    /// ## Identifier token
    ///
    /// A run of letters naming a unit, like `kg`.
    #[strum(serialize = "unit name")]
    Ident(String),

    /// ## Plus sign
    #[strum(serialize = "'+'")]
    Plus,

    /// ## Minus sign
    #[strum(serialize = "'-'")]
    Minus,

    /// ## Illegal token
    ///
    /// Represents a character which cannot appear in a unit expression.
    Illegal(char),
}

/// # Expression lexer
///
/// Processes input strings into [`Token`] streams.
///
/// This struct implements [`Iterator<Item = Token>`][2], so it can be used like
/// any other iterator over [`Token`]s.
///
/// See [module-level documentation][1] for an example usage.
///
/// [1]: crate::lexer
/// [2]: Iterator
#[derive(Clone, Debug)]
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new [`Lexer`] for an expression string.
    pub fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        // consume whitespace
        collect_chars(&mut self.chars, |c| c.is_whitespace());

        let c = *self.chars.peek()?;
        if c.is_ascii_digit() {
            Some(Token::Number(collect_chars(&mut self.chars, |c| {
                c.is_ascii_digit()
            })))
        } else if c.is_alphabetic() {
            Some(Token::Ident(collect_chars(&mut self.chars, |c| {
                c.is_alphabetic()
            })))
        } else {
            // every remaining token is a single character
            self.chars.next();
            Some(match c {
                '+' => Token::Plus,
                '-' => Token::Minus,
                _ => match Operation::from_char(c) {
                    Some(op) => Token::Operator(op),
                    None => Token::Illegal(c),
                },
            })
        }
    }
}

/// Collect a series of contiguous characters matching a predicate into a string
///
/// # Example
///
/// ```ignore
/// # use dimensional::lexer::collect_chars;
/// let mut chars = "123 + 456".chars().peekable();
/// assert_eq!(&collect_chars(&mut chars, |c| c.is_numeric()),  "123");
/// assert_eq!(&collect_chars(&mut chars, |c| !c.is_numeric()), " + ");
/// assert_eq!(&collect_chars(&mut chars, |c| c.is_numeric()),  "456");
/// ```
fn collect_chars<F>(chars: &mut Peekable<Chars>, predicate: F) -> String
where
    F: Fn(&char) -> bool,
{
    let mut res = String::new();
    while let Some(c) = chars.next_if(&predicate) {
        res.push(c);
    }
    res
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Tests the [Lexer]'s ability to tokenize input strings
    #[test]
    fn tokenize() {
        macro_rules! toks {
            ( o $b:literal ) => {
                Token::Operator(Operation::from_char($b).unwrap())
            };
            ( n $b:literal ) => {
                Token::Number(stringify!($b).to_string())
            };
            ( i $b:ident ) => {
                Token::Ident(stringify!($b).to_string())
            };
            ( il $b:literal ) => {
                Token::Illegal($b)
            };
            ( p + ) => { Token::Plus };
            ( p - ) => { Token::Minus };
            ( $( $a:tt $b:tt ),+ $(,)? ) => {
                vec![ $( toks!($a $b), )+ ]
            }
        }
        let cases: Vec<(&'static str, Vec<Token>)> = vec![
            ("", vec![]),
            ("   ", vec![]),
            ("m", toks!(i m,)),
            ("kg*m", toks!(i kg, o '*', i m)),
            ("kg · m", toks!(i kg, o '·', i m)),
            ("m/s^2", toks!(i m, o '/', i s, o '^', n 2)),
            ("s^-1", toks!(i s, o '^', p -, n 1)),
            ("s^+3", toks!(i s, o '^', p +, n 3)),
            ("m**s", toks!(i m, o '*', o '*', i s)),
            ("1/s", toks!(n 1, o '/', i s)),
            ("m2", toks!(i m, n 2)),
            ("µm", vec![Token::Ident("µm".to_string())]),
            ("m_s", toks!(i m, il '_', i s)),
            ("(m)", toks!(il '(', i m, il ')')),
        ];
        for (src, toks) in cases {
            let result: Vec<Token> = Lexer::new(src).collect();
            assert_eq!(result, toks, "{:?}", src);
        }
    }

    #[test]
    fn token_names() {
        assert_eq!(Token::Ident(String::new()).to_string(), "unit name");
        assert_eq!(Token::Number(String::new()).to_string(), "number");
        assert_eq!(Token::Minus.to_string(), "'-'");
    }
}
