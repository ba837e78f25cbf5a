/*

resolver.rs - Unit name resolution
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

# Unit resolver

Turns unit strings into [`NormalizedUnit`]s: a canonical token, the exact
factor relative to the base unit of its family, the family itself, its
dimension signature, and the converter used to move values in and out of it.

Catalog names and aliases are tried first. Anything else is handed to the
[composite parser][1], whose atoms are in turn looked up in the catalog only,
so resolution never recurses more than one level.

## Examples

```
use dimensional::{dimension::DimensionFamily, resolver::UnitResolver};
use rust_decimal::Decimal;

let resolver = UnitResolver::standard();

let unit = resolver.resolve("kilometres").unwrap();
assert_eq!(unit.token().as_str(), "km");
assert_eq!(unit.factor(), Decimal::from(1000));

let unit = resolver.resolve("kg*m^2/s^2").unwrap();
assert_eq!(unit.family(), DimensionFamily::Energy);

let feet = resolver.convert(Decimal::from(36), "in", "ft").unwrap();
assert_eq!(feet, Decimal::from(3));
```

[1]: crate::parser
*/

use std::collections::{hash_map::Entry, HashMap};

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError, UnitDefinition, UnitToken},
    converter::{self, ConversionError, UnitConverter},
    dimension::{DimensionFamily, DimensionSignature},
    eval::CompositeUnit,
    known::KnownSignatures,
    parser::{self, CompositeError},
    rational::{ArithmeticError, Rational},
};

static STANDARD_RESOLVER: Lazy<UnitResolver> = Lazy::new(|| {
    UnitResolver::with_known_signatures(
        Catalog::standard().clone(),
        KnownSignatures::standard().clone(),
    )
});

/// # Normalized unit
///
/// A unit string after resolution.
#[derive(Clone, Debug)]
pub struct NormalizedUnit {
    token: UnitToken,
    factor: Rational,
    family: DimensionFamily,
    signature: DimensionSignature,
    converter: UnitConverter,
}

impl NormalizedUnit {
    /// Create a linear unit with the given factor.
    pub fn new(
        token: UnitToken,
        factor: Rational,
        family: DimensionFamily,
        signature: DimensionSignature,
    ) -> Result<Self, ArithmeticError> {
        Ok(Self {
            token,
            factor,
            family,
            signature,
            converter: UnitConverter::linear(factor)?,
        })
    }

    /// Canonical token, or the trimmed expression for composite units.
    pub fn token(&self) -> &UnitToken {
        &self.token
    }

    /// Factor relative to the family's base unit, as a decimal.
    pub fn factor(&self) -> Decimal {
        self.factor.to_decimal()
    }

    /// Factor relative to the family's base unit.
    pub fn factor_exact(&self) -> Rational {
        self.factor
    }

    /// The family the unit belongs to.
    pub fn family(&self) -> DimensionFamily {
        self.family
    }

    /// The unit's dimension signature.
    pub fn signature(&self) -> DimensionSignature {
        self.signature
    }

    /// The converter between this unit and its base unit.
    pub fn converter(&self) -> &UnitConverter {
        &self.converter
    }

    /// The unit as a [`CompositeUnit`], dropping its name and converter.
    pub fn as_composite(&self) -> CompositeUnit {
        CompositeUnit::new(self.signature, self.factor)
    }
}

/// # Unit resolver
///
/// An index over a [`Catalog`]. Immutable once built, so one resolver can be
/// shared between threads.
#[derive(Debug)]
pub struct UnitResolver {
    catalog: Catalog,
    index: HashMap<String, usize>,
    bases: HashMap<DimensionFamily, usize>,
    known: KnownSignatures,
}

impl UnitResolver {
    /// Build a resolver over `catalog` using the standard known signatures.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_known_signatures(catalog, KnownSignatures::standard().clone())
    }

    /// Build a resolver over `catalog` with a custom signature map.
    ///
    /// When two definitions share a canonical name, the first is kept and
    /// later ones are ignored entirely. Aliases are indexed after all
    /// canonical names, and never shadow one. The base unit of each family is
    /// its first kept definition with a factor of one and an exact converter.
    pub fn with_known_signatures(catalog: Catalog, known: KnownSignatures) -> Self {
        let mut index = HashMap::new();
        let mut kept = Vec::with_capacity(catalog.len());
        for (i, def) in catalog.iter().enumerate() {
            match index.entry(def.name().as_str().to_owned()) {
                Entry::Vacant(entry) => {
                    entry.insert(i);
                    kept.push(i);
                }
                Entry::Occupied(entry) => {
                    tracing::debug!(
                        unit = %def.name(),
                        first = *entry.get(),
                        duplicate = i,
                        "skipping duplicate unit definition"
                    );
                }
            }
        }

        let mut bases = HashMap::new();
        for &i in &kept {
            let def = &catalog.iter().as_slice()[i];
            for alias in def.aliases() {
                if let Entry::Vacant(entry) = index.entry(alias.clone()) {
                    entry.insert(i);
                } else {
                    tracing::debug!(%alias, unit = %def.name(), "alias already taken");
                }
            }
            if def.factor() == Rational::ONE && def.converter().is_exact() {
                bases.entry(def.family()).or_insert(i);
            }
        }

        tracing::debug!(
            definitions = catalog.len(),
            names = index.len(),
            families = bases.len(),
            "built unit resolver"
        );

        Self {
            catalog,
            index,
            bases,
            known,
        }
    }

    /// The resolver over the built-in catalog and signature map.
    pub fn standard() -> &'static UnitResolver {
        &STANDARD_RESOLVER
    }

    /// The catalog this resolver indexes.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The signature map used to name composite units.
    pub fn known_signatures(&self) -> &KnownSignatures {
        &self.known
    }

    /// Every indexed name, canonical names and aliases alike.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    fn index_of(&self, unit: &str) -> Option<usize> {
        self.index.get(unit).copied()
    }

    fn def(&self, i: usize) -> &UnitDefinition {
        &self.catalog.iter().as_slice()[i]
    }

    /// The catalog definition a name or alias refers to.
    pub fn definition(&self, unit: &str) -> Option<&UnitDefinition> {
        self.index_of(unit).map(|i| self.def(i))
    }

    /// Map a name or alias to its canonical token. Matching is
    /// case-sensitive, so `mA` and `MA` are different units.
    pub fn try_normalize(&self, unit: &str) -> Option<&UnitToken> {
        self.definition(unit).map(UnitDefinition::name)
    }

    /// Like [`try_normalize`][Self::try_normalize], but unknown names are an
    /// error.
    pub fn normalize(&self, unit: &str) -> Result<&UnitToken, ResolveError> {
        self.try_normalize(unit)
            .ok_or_else(|| ResolveError::UnknownUnit(unit.to_string()))
    }

    /// Resolve a catalog name or alias, without trying composite parsing.
    pub fn lookup(&self, unit: &str) -> Option<NormalizedUnit> {
        let i = self.index_of(unit)?;
        let def = self.def(i);
        let factor = if self.bases.get(&def.family()) == Some(&i) {
            Rational::ONE
        } else {
            def.factor()
        };
        Some(NormalizedUnit {
            token: def.name().clone(),
            factor,
            family: def.family(),
            signature: def.family().signature().unwrap_or_default(),
            converter: def.converter().clone(),
        })
    }

    /// Resolve a unit string, falling back to composite parsing when it is
    /// not a catalog name.
    pub fn resolve(&self, unit: &str) -> Result<NormalizedUnit, ResolveError> {
        if let Some(unit) = self.lookup(unit) {
            return Ok(unit);
        }

        let composite = match parser::parse(unit, self) {
            Ok(composite) => composite,
            Err(err) if has_operator(unit) => {
                return Err(ResolveError::MalformedComposite(unit.to_string(), err))
            }
            Err(_) => return Err(ResolveError::UnknownUnit(unit.to_string())),
        };

        let signature = composite.signature();
        Ok(NormalizedUnit::new(
            UnitToken::new(unit.trim())?,
            composite.factor_exact(),
            self.known.family_of(&signature),
            signature,
        )?)
    }

    /// Like [`resolve`][Self::resolve], discarding the error.
    pub fn try_resolve(&self, unit: &str) -> Option<NormalizedUnit> {
        self.resolve(unit).ok()
    }

    /// The token of the base unit of `family`.
    pub fn get_base_unit(&self, family: DimensionFamily) -> Result<&UnitToken, ResolveError> {
        self.bases
            .get(&family)
            .map(|&i| self.def(i).name())
            .ok_or(ResolveError::MissingBaseUnit(family))
    }

    /// Tests whether `unit` is a catalog name or alias.
    ///
    /// Composite expressions are not catalog names; use
    /// [`is_valid_composite`][Self::is_valid_composite] for those.
    pub fn is_valid_unit(&self, unit: &str) -> bool {
        !unit.is_empty() && !unit.contains(char::is_whitespace) && self.index.contains_key(unit)
    }

    /// Tests whether `expr` is a valid composite expression over this catalog.
    pub fn is_valid_composite(&self, expr: &str) -> bool {
        parser::is_valid_composite(expr, self)
    }

    /// Parse and evaluate a composite expression over this catalog.
    pub fn try_parse_composite(&self, expr: &str) -> Option<CompositeUnit> {
        parser::try_parse(expr, self)
    }

    /// Convert `value` from one unit to another.
    ///
    /// Both units are resolved, and must have the same signature.
    pub fn convert(&self, value: Decimal, from: &str, to: &str) -> Result<Decimal, ResolveError> {
        self.convert_between(value, &self.resolve(from)?, &self.resolve(to)?)
    }

    /// Convert `value` between two resolved units.
    pub fn convert_between(
        &self,
        value: Decimal,
        from: &NormalizedUnit,
        to: &NormalizedUnit,
    ) -> Result<Decimal, ResolveError> {
        if from.signature != to.signature {
            return Err(ConversionError::IncompatibleUnits(
                from.token.to_string(),
                to.token.to_string(),
            )
            .into());
        }
        Ok(converter::convert(value, &from.converter, &to.converter)?)
    }
}

fn has_operator(unit: &str) -> bool {
    unit.contains(['*', '·', '/', '^'])
}

/// Errors raised while resolving or converting units.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The name is not in the catalog and is not a composite expression.
    #[error("Unknown unit `{0}`")]
    UnknownUnit(String),

    /// The input looks like a composite expression but does not parse.
    #[error("Malformed unit expression `{0}`: {1}")]
    MalformedComposite(String, #[source] CompositeError),

    /// The catalog has no base unit for the family.
    #[error("No base unit is defined for {0}")]
    MissingBaseUnit(DimensionFamily),

    /// A conversion between units failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// A factor cannot be represented.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    /// A token built from the input was rejected.
    #[error(transparent)]
    InvalidArgument(#[from] CatalogError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rat_util_macros::rat;

    fn def(name: &str, family: DimensionFamily, factor: Rational, aliases: &[&str]) -> UnitDefinition {
        UnitDefinition::linear(name, family, factor, aliases.iter().copied()).unwrap()
    }

    /// Gram and millisecond based catalog
    fn milli_catalog() -> Catalog {
        use DimensionFamily::*;
        Catalog::new(vec![
            def("g", Mass, Rational::ONE, &["gram"]),
            def("kg", Mass, rat!(1000), &["kilogram"]),
            def("ms", Time, Rational::ONE, &[]),
            def("s", Time, rat!(1000), &["sec"]),
            def("m", Length, Rational::ONE, &[]),
        ])
    }

    #[test]
    fn composite_factor_follows_catalog_bases() {
        let resolver = UnitResolver::new(milli_catalog());
        let unit = resolver.resolve("kg*m^2/s^2").unwrap();
        assert_eq!(unit.signature(), DimensionSignature::ENERGY);
        assert_eq!(unit.family(), DimensionFamily::Energy);
        assert_eq!(unit.factor(), Decimal::from_str("0.001").unwrap());
        assert_eq!(unit.factor_exact(), rat!(1, 1000));
        assert_eq!(unit.token().as_str(), "kg*m^2/s^2");
    }

    #[test]
    fn catalog_path() {
        let resolver = UnitResolver::new(milli_catalog());
        let unit = resolver.resolve("kilogram").unwrap();
        assert_eq!(unit.token().as_str(), "kg");
        assert_eq!(unit.factor_exact(), rat!(1000));
        assert_eq!(unit.family(), DimensionFamily::Mass);
        assert_eq!(resolver.get_base_unit(DimensionFamily::Mass).unwrap().as_str(), "g");
        assert_eq!(resolver.get_base_unit(DimensionFamily::Time).unwrap().as_str(), "ms");
        assert_eq!(
            resolver.get_base_unit(DimensionFamily::Force),
            Err(ResolveError::MissingBaseUnit(DimensionFamily::Force))
        );
    }

    #[test]
    fn duplicates_keep_first() {
        use DimensionFamily::*;
        let resolver = UnitResolver::new(Catalog::new(vec![
            def("m", Length, Rational::ONE, &["metre"]),
            def("km", Length, rat!(1000), &["k"]),
            def("m", Length, rat!(2), &["meter"]),
            def("k", Length, rat!(3), &[]),
        ]));
        assert_eq!(resolver.lookup("m").unwrap().factor_exact(), Rational::ONE);
        assert!(resolver.lookup("meter").is_none());
        // a canonical name beats an earlier alias
        assert_eq!(resolver.lookup("k").unwrap().factor_exact(), rat!(3));
        assert_eq!(resolver.tokens().count(), 4);
    }

    #[test]
    fn normalization() {
        let resolver = UnitResolver::standard();
        assert_eq!(resolver.normalize("metres").unwrap().as_str(), "m");
        assert_eq!(resolver.normalize("°C").unwrap().as_str(), "degC");
        assert_eq!(
            resolver.normalize("Meter"),
            Err(ResolveError::UnknownUnit("Meter".to_string()))
        );
        assert!(resolver.try_normalize("").is_none());
    }

    #[test]
    fn resolution_failures() {
        let resolver = UnitResolver::standard();
        assert_eq!(
            resolver.resolve("furlong").unwrap_err(),
            ResolveError::UnknownUnit("furlong".to_string())
        );
        assert!(matches!(
            resolver.resolve("m**s"),
            Err(ResolveError::MalformedComposite(..))
        ));
        assert!(matches!(
            resolver.resolve("xyz*abc"),
            Err(ResolveError::MalformedComposite(..))
        ));
        assert!(resolver.try_resolve("").is_none());
    }

    #[test]
    fn unknown_composite_family() {
        let resolver = UnitResolver::standard();
        let unit = resolver.resolve("m^5").unwrap();
        assert_eq!(unit.family(), DimensionFamily::Unknown);
    }

    #[test]
    fn unit_validity() {
        let resolver = UnitResolver::standard();
        assert!(resolver.is_valid_unit("kg"));
        assert!(resolver.is_valid_unit("N·m"));
        assert!(!resolver.is_valid_unit(""));
        assert!(!resolver.is_valid_unit("k g"));
        assert!(!resolver.is_valid_unit("kg*m"));
        assert!(resolver.is_valid_composite("kg*m"));
        assert!(resolver.try_parse_composite("kg*m").is_some());
    }

    #[test]
    fn conversions() {
        let resolver = UnitResolver::standard();
        let dec = |s: &str| Decimal::from_str(s).unwrap();
        assert_eq!(resolver.convert(dec("1"), "mi", "km").unwrap(), dec("1.609344"));
        assert_eq!(resolver.convert(dec("100"), "degC", "degF").unwrap(), dec("212"));
        assert_eq!(resolver.convert(dec("3.6"), "km/h", "m/s").unwrap(), dec("1"));
        assert_eq!(resolver.convert(dec("1"), "kWh", "MJ").unwrap(), dec("3.6"));
        assert_eq!(
            resolver.convert(dec("1"), "m", "s"),
            Err(ResolveError::Conversion(ConversionError::IncompatibleUnits(
                "m".to_string(),
                "s".to_string()
            )))
        );
    }

    #[test]
    fn standard_bases_exist() {
        use strum::IntoEnumIterator;
        let resolver = UnitResolver::standard();
        for family in DimensionFamily::iter().filter(|f| *f != DimensionFamily::Unknown) {
            let base = resolver.get_base_unit(family).unwrap();
            assert_eq!(resolver.lookup(base.as_str()).unwrap().factor_exact(), Rational::ONE);
        }
    }
}
