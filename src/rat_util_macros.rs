/*

rat_util_macros.rs - Utility macros for rational types
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

//! Helper macros for creating [`Rational`][1] instances
//!
//! [1]: crate::rational::Rational

/// Create a [`Rational`][1] from integer literals.
///
/// The two-argument form is evaluated at compile time, so a zero denominator
/// or an unrepresentable value is a compile error rather than a runtime one.
///
/// [1]: crate::rational::Rational
macro_rules! rat {
    ( $a:expr ) => {
        $crate::rational::Rational::from_integer($a as i64)
    };
    ( $a:expr , $b:expr ) => {{
        const RAT: $crate::rational::Rational = $crate::rational::Rational::from_static($a, $b);
        RAT
    }};
}

// Required to be able to import macros in other modules
pub(crate) use rat;
