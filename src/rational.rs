/*

rational.rs - Exact rational arithmetic for Dimensional
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

//! # Exact rational numbers
//!
//! Every conversion factor in Dimensional is held as a [`Rational`]: a
//! fraction of two 64-bit integers kept in lowest terms with a positive
//! denominator. Arithmetic is checked. Results that do not fit in 64 bits
//! produce an [`ArithmeticError::Overflow`] instead of wrapping.
//!
//! ```
//! use dimensional::rational::Rational;
//!
//! let half = Rational::new(4, 8).unwrap();
//! assert_eq!(half, Rational::new(1, 2).unwrap());
//! assert!(Rational::new(1, 0).is_err());
//!
//! let sum = half.checked_add(&Rational::new(1, 3).unwrap()).unwrap();
//! assert_eq!(sum.to_string(), "5/6");
//! ```

use std::{
    cmp::Ordering,
    fmt::{self, Display},
};

use num::Integer;
use rust_decimal::Decimal;
use thiserror::Error;

/// # Exact fraction
///
/// Invariants: `gcd(|numer|, denom) == 1`, `denom > 0`, and zero is always
/// stored as `0/1`. Because the representation is canonical, structural
/// equality and hashing coincide with numeric equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Rational {
    numer: i64,
    denom: i64,
}

impl Rational {
    /// The rational number `0/1`.
    pub const ZERO: Self = Self { numer: 0, denom: 1 };

    /// The rational number `1/1`.
    pub const ONE: Self = Self { numer: 1, denom: 1 };

    /// Create a normalized [`Rational`] from a numerator and denominator.
    ///
    /// ## Errors
    ///
    /// Returns [`ArithmeticError::DivideByZero`] if `denom` is zero, and
    /// [`ArithmeticError::Overflow`] if normalizing would leave the 64-bit
    /// range (only possible with `i64::MIN` inputs).
    pub fn new(numer: i64, denom: i64) -> Result<Self, ArithmeticError> {
        if denom == 0 {
            return Err(ArithmeticError::DivideByZero);
        }
        Self::from_wide(i128::from(numer), i128::from(denom))
    }

    /// Create a [`Rational`] equal to an integer.
    pub const fn from_integer(n: i64) -> Self {
        Self { numer: n, denom: 1 }
    }

    /// Compile-time constructor used by the [`rat!`][1] macro.
    ///
    /// Panics (which is a compile error in a `const` context) on a zero
    /// denominator or a value that does not fit after reduction.
    ///
    /// [1]: crate::rat_util_macros::rat
    pub(crate) const fn from_static(numer: i64, denom: i64) -> Self {
        if denom == 0 {
            panic!("rational literal with zero denominator");
        }
        let mut n = numer as i128;
        let mut d = denom as i128;
        if d < 0 {
            n = -n;
            d = -d;
        }
        let mut a = if n < 0 { -n } else { n };
        let mut b = d;
        while b != 0 {
            let t = a % b;
            a = b;
            b = t;
        }
        n /= a;
        d /= a;
        if n > i64::MAX as i128 || n < i64::MIN as i128 || d > i64::MAX as i128 {
            panic!("rational literal out of range");
        }
        Self {
            numer: n as i64,
            denom: d as i64,
        }
    }

    /// Normalize a fraction computed in 128-bit intermediates.
    ///
    /// `denom` must be non-zero.
    fn from_wide(numer: i128, denom: i128) -> Result<Self, ArithmeticError> {
        debug_assert!(denom != 0);
        let (numer, denom) = if denom < 0 {
            (
                numer.checked_neg().ok_or(ArithmeticError::Overflow)?,
                denom.checked_neg().ok_or(ArithmeticError::Overflow)?,
            )
        } else {
            (numer, denom)
        };
        if numer == 0 {
            return Ok(Self::ZERO);
        }
        let g = numer.gcd(&denom);
        let numer = i64::try_from(numer / g).map_err(|_| ArithmeticError::Overflow)?;
        let denom = i64::try_from(denom / g).map_err(|_| ArithmeticError::Overflow)?;
        Ok(Self { numer, denom })
    }

    /// Get the numerator.
    pub const fn numer(&self) -> i64 {
        self.numer
    }

    /// Get the (always positive) denominator.
    pub const fn denom(&self) -> i64 {
        self.denom
    }

    /// Test whether this value is zero.
    pub const fn is_zero(&self) -> bool {
        self.numer == 0
    }

    /// Test whether this value is an integer.
    pub const fn is_integer(&self) -> bool {
        self.denom == 1
    }

    /// Test whether this value is strictly positive.
    pub const fn is_positive(&self) -> bool {
        self.numer > 0
    }

    /// Checked addition.
    pub fn checked_add(&self, rhs: &Self) -> Result<Self, ArithmeticError> {
        let lhs_part = i128::from(self.numer) * i128::from(rhs.denom);
        let rhs_part = i128::from(rhs.numer) * i128::from(self.denom);
        let numer = lhs_part
            .checked_add(rhs_part)
            .ok_or(ArithmeticError::Overflow)?;
        Self::from_wide(numer, i128::from(self.denom) * i128::from(rhs.denom))
    }

    /// Checked subtraction.
    pub fn checked_sub(&self, rhs: &Self) -> Result<Self, ArithmeticError> {
        let lhs_part = i128::from(self.numer) * i128::from(rhs.denom);
        let rhs_part = i128::from(rhs.numer) * i128::from(self.denom);
        let numer = lhs_part
            .checked_sub(rhs_part)
            .ok_or(ArithmeticError::Overflow)?;
        Self::from_wide(numer, i128::from(self.denom) * i128::from(rhs.denom))
    }

    /// Checked multiplication.
    pub fn checked_mul(&self, rhs: &Self) -> Result<Self, ArithmeticError> {
        Self::from_wide(
            i128::from(self.numer) * i128::from(rhs.numer),
            i128::from(self.denom) * i128::from(rhs.denom),
        )
    }

    /// Checked division.
    ///
    /// ## Errors
    ///
    /// Returns [`ArithmeticError::DivideByZero`] if `rhs` is zero.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, ArithmeticError> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivideByZero);
        }
        Self::from_wide(
            i128::from(self.numer) * i128::from(rhs.denom),
            i128::from(self.denom) * i128::from(rhs.numer),
        )
    }

    /// Checked negation.
    pub fn checked_neg(&self) -> Result<Self, ArithmeticError> {
        Ok(Self {
            numer: self.numer.checked_neg().ok_or(ArithmeticError::Overflow)?,
            denom: self.denom,
        })
    }

    /// Get `1 / self`.
    ///
    /// ## Errors
    ///
    /// Returns [`ArithmeticError::DivideByZero`] if `self` is zero.
    pub fn reciprocal(&self) -> Result<Self, ArithmeticError> {
        if self.is_zero() {
            return Err(ArithmeticError::DivideByZero);
        }
        Self::from_wide(i128::from(self.denom), i128::from(self.numer))
    }

    /// Raise to an integer power.
    ///
    /// Negative exponents take the reciprocal first, so zero raised to a
    /// negative power is a [`ArithmeticError::DivideByZero`].
    pub fn checked_pow(&self, exp: i32) -> Result<Self, ArithmeticError> {
        let base = if exp < 0 { self.reciprocal()? } else { *self };
        let exp = exp.unsigned_abs();
        // Powers of coprime integers stay coprime, so no reduction is needed.
        Ok(Self {
            numer: base
                .numer
                .checked_pow(exp)
                .ok_or(ArithmeticError::Overflow)?,
            denom: base
                .denom
                .checked_pow(exp)
                .ok_or(ArithmeticError::Overflow)?,
        })
    }

    /// Get the decimal value of this fraction.
    ///
    /// Non-terminating fractions are rounded to the 28 significant digits
    /// [`Decimal`] can hold.
    pub fn to_decimal(&self) -> Decimal {
        // The denominator is positive and both parts fit in 64 bits, so the
        // quotient cannot overflow.
        Decimal::from(self.numer) / Decimal::from(self.denom)
    }

    /// Create a [`Rational`] from a decimal value.
    ///
    /// The value is first reconstructed exactly as `mantissa / 10^scale`
    /// reduced to lowest terms. When that fraction does not fit in 64 bits,
    /// the value is approximated by the simplest fraction that reproduces the
    /// same decimal through [`to_decimal()`][Self::to_decimal], or failing
    /// that the closest continued-fraction convergent that fits.
    /// Approximations are reported with a `tracing` warning. Use
    /// [`from_decimal_exact()`][Self::from_decimal_exact] to reject them
    /// instead.
    ///
    /// ## Errors
    ///
    /// Returns [`ArithmeticError::Overflow`] if even the integer part of
    /// `value` does not fit in 64 bits, or if `value` is non-zero but smaller
    /// than any 64-bit fraction.
    pub fn from_decimal(value: Decimal) -> Result<Self, ArithmeticError> {
        if let Ok(exact) = Self::from_decimal_exact(value) {
            return Ok(exact);
        }
        let approximation = Self::approximate(value)?;
        tracing::warn!(
            %value,
            %approximation,
            "decimal has no exact 64-bit rational form, approximating"
        );
        Ok(approximation)
    }

    /// Create a [`Rational`] from a decimal value without approximating.
    ///
    /// ## Errors
    ///
    /// Returns [`ArithmeticError::Inexact`] if `mantissa / 10^scale` does not
    /// fit in 64 bits after reduction.
    pub fn from_decimal_exact(value: Decimal) -> Result<Self, ArithmeticError> {
        // scale <= 28, and 10^28 fits in an i128
        let denom = 10i128.pow(value.scale());
        Self::from_wide(value.mantissa(), denom).map_err(|_| ArithmeticError::Inexact(value))
    }

    /// Multiply, falling back to [`Decimal`] arithmetic when the exact
    /// product does not fit in 64 bits.
    ///
    /// The decimal result is turned back into a fraction with
    /// [`from_decimal()`][Self::from_decimal], and the fallback is reported
    /// with a `tracing` warning.
    ///
    /// ## Errors
    ///
    /// Returns [`ArithmeticError::Overflow`] if the decimal product overflows
    /// too, or is non-zero but smaller than any 64-bit fraction.
    pub fn approximating_mul(&self, rhs: &Self) -> Result<Self, ArithmeticError> {
        self.approximating(rhs, Self::checked_mul, Decimal::checked_mul)
    }

    /// Divide, falling back to [`Decimal`] arithmetic like
    /// [`approximating_mul()`][Self::approximating_mul].
    ///
    /// ## Errors
    ///
    /// Returns [`ArithmeticError::DivideByZero`] if `rhs` is zero, and
    /// [`ArithmeticError::Overflow`] as for
    /// [`approximating_mul()`][Self::approximating_mul].
    pub fn approximating_div(&self, rhs: &Self) -> Result<Self, ArithmeticError> {
        self.approximating(rhs, Self::checked_div, Decimal::checked_div)
    }

    fn approximating<R, D>(
        &self,
        rhs: &Self,
        exact: R,
        approx: D,
    ) -> Result<Self, ArithmeticError>
    where
        R: Fn(&Self, &Self) -> Result<Self, ArithmeticError>,
        D: Fn(Decimal, Decimal) -> Option<Decimal>,
    {
        match exact(self, rhs) {
            Err(ArithmeticError::Overflow) => {
                let value = approx(self.to_decimal(), rhs.to_decimal())
                    .ok_or(ArithmeticError::Overflow)?;
                tracing::warn!(
                    lhs = %self,
                    %rhs,
                    %value,
                    "rational overflows, using decimal arithmetic"
                );
                // Neither operand is zero here, so a zero result is an underflow.
                if value.is_zero() {
                    return Err(ArithmeticError::Overflow);
                }
                Self::from_decimal(value)
            }
            other => other,
        }
    }

    /// Approximate `value` by a fraction that fits in 64 bits.
    ///
    /// Looks for the simplest fraction among the values which round to
    /// `value`, first assuming [`to_decimal()`][Self::to_decimal] rounds to
    /// nearest and then that it truncates. The first one that reproduces
    /// `value` wins. Otherwise the closest convergent that fits is used.
    fn approximate(value: Decimal) -> Result<Self, ArithmeticError> {
        let target = value.abs();
        let mantissa = target.mantissa();
        let unit = 10i128.pow(target.scale());

        // mantissa < 2^96 and unit <= 10^28, so none of these overflow
        let intervals = [
            ((2 * mantissa - 1, 2 * unit), (2 * mantissa + 1, 2 * unit)),
            ((mantissa, unit), (mantissa + 1, unit)),
        ];
        let best = match intervals
            .into_iter()
            .filter_map(|(lo, hi)| simplest_between(lo, hi))
            .find(|candidate| candidate.to_decimal() == target)
        {
            Some(best) => best,
            None => Self::closest_convergent(target)?,
        };

        if best.is_zero() {
            return Err(ArithmeticError::Overflow);
        }
        if value.is_sign_negative() {
            best.checked_neg()
        } else {
            Ok(best)
        }
    }

    /// Last continued-fraction convergent of a non-negative `target` that
    /// fits in 64 bits.
    fn closest_convergent(target: Decimal) -> Result<Self, ArithmeticError> {
        let mut n = target.mantissa();
        let mut d = 10i128.pow(target.scale());

        let (mut h_prev, mut h) = (0i128, 1i128);
        let (mut k_prev, mut k) = (1i128, 0i128);
        let mut best: Option<Self> = None;

        while d != 0 {
            let a = n / d;
            let next = a
                .checked_mul(h)
                .and_then(|x| x.checked_add(h_prev))
                .zip(a.checked_mul(k).and_then(|x| x.checked_add(k_prev)));
            let (h_next, k_next) = match next {
                Some((h_next, k_next))
                    if h_next <= i128::from(i64::MAX) && k_next <= i128::from(i64::MAX) =>
                {
                    (h_next, k_next)
                }
                _ => break,
            };

            // Convergents are always in lowest terms with a positive denominator.
            let candidate = Self {
                numer: h_next as i64,
                denom: k_next as i64,
            };
            best = Some(candidate);
            if candidate.to_decimal() == target {
                break;
            }

            (h_prev, h) = (h, h_next);
            (k_prev, k) = (k, k_next);
            (n, d) = (d, n - a * d);
        }

        best.ok_or(ArithmeticError::Overflow)
    }
}

/// The fraction with the smallest denominator strictly between `lo` and `hi`.
///
/// Both bounds are non-negative `(numer, denom)` pairs with `lo < hi`.
/// Returns [`None`] if that fraction does not fit in 64 bits.
fn simplest_between(lo: (i128, i128), hi: (i128, i128)) -> Option<Rational> {
    let ((mut p, mut q), (mut r, mut s)) = (lo, hi);
    let (mut h_prev, mut h) = (0i128, 1i128);
    let (mut k_prev, mut k) = (1i128, 0i128);
    loop {
        let t = p / q;
        // s == 0 stands for an unbounded upper end.
        let last = s == 0 || t.checked_add(1)?.checked_mul(s)? < r;
        let term = if last { t + 1 } else { t };
        (h_prev, h) = (h, term.checked_mul(h)?.checked_add(h_prev)?);
        (k_prev, k) = (k, term.checked_mul(k)?.checked_add(k_prev)?);
        if h > i128::from(i64::MAX) || k > i128::from(i64::MAX) {
            return None;
        }
        if last {
            return Some(Rational {
                numer: h as i64,
                denom: k as i64,
            });
        }
        // Both ends have integer part t. Continue with the reciprocals of
        // their fractional parts, which swaps the ends.
        (p, q, r, s) = (s, r - t * s, q, p - t * q);
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_integer(n)
    }
}

impl From<Rational> for Decimal {
    fn from(r: Rational) -> Self {
        r.to_decimal()
    }
}

impl TryFrom<Decimal> for Rational {
    type Error = ArithmeticError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl Ord for Rational {
    /// Compares by cross-multiplication. The products of two 64-bit values
    /// always fit in 128 bits, so the comparison cannot overflow.
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = i128::from(self.numer) * i128::from(other.denom);
        let rhs = i128::from(other.numer) * i128::from(self.denom);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

/// # Arithmetic error
///
/// Raised by checked [`Rational`] operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    /// Division by a zero value, or a zero denominator.
    #[error("Division by zero")]
    DivideByZero,

    /// A numerator or denominator left the 64-bit range.
    #[error("Arithmetic overflow: result does not fit in a 64-bit rational")]
    Overflow,

    /// A decimal value has no exact 64-bit rational representation.
    #[error("`{0}` has no exact 64-bit rational representation")]
    Inexact(Decimal),
}
