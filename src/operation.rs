/*

operation.rs - Composite unit operators
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

//! Operators of the composite unit grammar

use std::str::FromStr;

use strum_macros::{Display, EnumString};

/// # Unit operator
///
/// Joins the atoms of a composite unit expression such as `kg·m/s^2`.
#[derive(Copy, Clone, Debug, EnumString, Display, PartialEq, Eq)]
pub enum Operation {
    /// ## Unit multiplication
    ///
    /// Written as either `*` or the middle dot `·`.
    #[strum(to_string = "*", serialize = "·")]
    Multiply,

    /// ## Unit division
    ///
    /// At most one may appear at the top level of an expression.
    #[strum(serialize = "/")]
    Divide,

    /// ## Exponentiation
    ///
    /// Raises the preceding unit name to an integer power.
    #[strum(serialize = "^")]
    Raise,
}

impl Operation {
    /// Get the operator a character denotes, if any.
    pub fn from_char(c: char) -> Option<Self> {
        let mut buf = [0; 4];
        Self::from_str(c.encode_utf8(&mut buf)).ok()
    }

    /// Test whether this operator joins two unit terms.
    pub fn is_join(self) -> bool {
        matches!(self, Operation::Multiply | Operation::Divide)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn operator_names() {
        assert_eq!(Operation::Multiply.to_string(), "*");
        assert_eq!(Operation::Divide.to_string(), "/");
        assert_eq!(Operation::Raise.to_string(), "^");
    }

    #[test]
    fn from_characters() {
        macro_rules! cases {
            ( $( $a:literal $b:ident ),+ $(,)? ) => {
                $( assert_eq!(Operation::from_char($a), Some(Operation::$b)); )+
            };
        }
        cases! {
            '*' Multiply,
            '·' Multiply,
            '/' Divide,
            '^' Raise,
        };
        assert_eq!(Operation::from_char('+'), None);
        assert_eq!(Operation::from_char('m'), None);
    }

    #[test]
    fn joins() {
        assert!(Operation::Multiply.is_join());
        assert!(Operation::Divide.is_join());
        assert!(!Operation::Raise.is_join());
    }
}
