/*

lib.rs - Dimensional library crate
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

// Don't allow unwrapping Results and Options
#![deny(clippy::unwrap_used)]
// Warn about additional compiler diagnostics. These don't affect the behavior
// or performance of Dimensional, but they generally lead to cleaner code.
#![warn(
    missing_docs,
    missing_copy_implementations,
    missing_debug_implementations,
    unreachable_pub,
    unused_extern_crates,
    macro_use_extern_crate
)]

//! # Dimensional
//!
//! Dimensional is an exact dimensional algebra engine for physical units.
//!
//! Units are described by [dimension signatures][1] over the seven SI base
//! quantities and by exact [rational][2] conversion factors. The
//! [resolver][3] turns unit names, aliases, and composite expressions like
//! `kg*m^2/s^2` into normalized units, which can be [converted][4] or
//! [multiplied and divided][5] without accumulating rounding error.
//!
//! See the [`Runtime`][6] struct for a line-oriented front end, which is
//! what the `dimensional` binary wraps.
//!
//! [1]: crate::dimension::DimensionSignature
//! [2]: crate::rational::Rational
//! [3]: crate::resolver::UnitResolver
//! [4]: crate::resolver::UnitResolver::convert
//! [5]: crate::math
//! [6]: crate::runtime::Runtime

pub mod ast;
pub mod catalog;
pub mod converter;
pub mod dimension;
pub mod eval;
pub mod format;
pub mod known;
pub mod lexer;
pub mod math;
pub mod operation;
pub mod parser;
mod rat_util_macros;
pub mod rational;
pub mod resolver;
pub mod runtime;
