/*

ast.rs - Composite unit expression tree
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
# Composite unit expression tree

Dimensional represents a composite unit expression such as `kg·m^2/s^2` as a
small, fixed-depth tree. An expression ([`CompositeExpr`]) is a numerator
[`Product`] optionally divided by a denominator [`Product`]. A product is a
sequence of [`Atom`]s, each of which is a unit name raised to an integer
exponent.

There is no nesting beyond this: the grammar allows a single top-level
division and no parentheses.

The tree can be turned back into text with its [`Display`] implementation,
which always uses `*` as the join operator and omits exponents of one.

See the [`parser` module][1] for a way to create expression trees from text,
and the [`eval` module][2] for a way to reduce them to a signature and
conversion factor.

[1]: crate::parser
[2]: crate::eval
*/

use std::fmt::{self, Display};

/// # Unit atom
///
/// A single unit name with an exponent, like `s^-2`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Atom {
    pub(crate) name: String,
    pub(crate) exponent: i32,
}

impl Atom {
    /// Create a new [`Atom`].
    pub fn new(name: impl Into<String>, exponent: i32) -> Self {
        Self {
            name: name.into(),
            exponent,
        }
    }

    /// Returns the unit name of the atom
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the exponent the unit is raised to
    pub fn exponent(&self) -> i32 {
        self.exponent
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exponent {
            1 => write!(f, "{}", self.name),
            exp => write!(f, "{}^{}", self.name, exp),
        }
    }
}

/// # Product of atoms
///
/// An empty product stands for the unity `1`, which can only be written as
/// the numerator of a fraction, as in `1/s`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Product(pub(crate) Vec<Atom>);

impl Product {
    /// Create a product from its atoms.
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self(atoms)
    }

    /// Returns the atoms of the product, in source order
    pub fn atoms(&self) -> &[Atom] {
        &self.0
    }

    /// Tests whether this is the unity product.
    pub fn is_unity(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unity() {
            return write!(f, "1");
        }
        for (i, atom) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            write!(f, "{}", atom)?;
        }
        Ok(())
    }
}

/// # Composite unit expression
///
/// The root of the tree: `numerator` or `numerator / denominator`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeExpr {
    pub(crate) numerator: Product,
    pub(crate) denominator: Option<Product>,
}

impl CompositeExpr {
    /// Create a new [`CompositeExpr`].
    pub fn new(numerator: Product, denominator: Option<Product>) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// The product above the division, or the whole expression.
    pub fn numerator(&self) -> &Product {
        &self.numerator
    }

    /// The product below the division, if there is one.
    pub fn denominator(&self) -> Option<&Product> {
        self.denominator.as_ref()
    }

    /// Iterate over every atom in the expression, numerator first.
    ///
    /// Each atom is paired with a flag which is `true` for atoms of the
    /// denominator.
    pub fn atoms(&self) -> impl Iterator<Item = (&Atom, bool)> {
        self.numerator.0.iter().map(|atom| (atom, false)).chain(
            self.denominator
                .iter()
                .flat_map(|den| den.0.iter().map(|atom| (atom, true))),
        )
    }
}

impl Display for CompositeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.numerator)?;
        if let Some(den) = &self.denominator {
            write!(f, "/{}", den)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn display() {
        let expr = CompositeExpr::new(
            Product::new(vec![Atom::new("kg", 1), Atom::new("m", 2)]),
            Some(Product::new(vec![Atom::new("s", 2)])),
        );
        assert_eq!(expr.to_string(), "kg*m^2/s^2");

        let expr = CompositeExpr::new(
            Product::default(),
            Some(Product::new(vec![Atom::new("s", 1)])),
        );
        assert_eq!(expr.to_string(), "1/s");

        let expr = CompositeExpr::new(Product::new(vec![Atom::new("s", -1)]), None);
        assert_eq!(expr.to_string(), "s^-1");
    }

    #[test]
    fn atoms_in_order() {
        let expr = CompositeExpr::new(
            Product::new(vec![Atom::new("N", 1), Atom::new("m", 1)]),
            Some(Product::new(vec![Atom::new("s", 1)])),
        );
        let names: Vec<(&str, bool)> = expr.atoms().map(|(a, d)| (a.name(), d)).collect();
        assert_eq!(names, vec![("N", false), ("m", false), ("s", true)]);
    }
}
