//! Fixed-point money and share quantities.
//!
//! # Scale
//!
//! Both types store an `i64` at 1e-6 scale:
//!
//! - [`Micros`]: 1 unit of currency = `Micros(1_000_000)`. Used for amounts
//!   and per-share prices.
//! - [`Quantity`]: 1 share = `Quantity(1_000_000)`. Produced by dividing an
//!   amount by a price and rounding to a configured number of decimals
//!   (at most six).
//!
//! There is no `From<i64>` for either type and no arithmetic between them;
//! callers must be deliberate about which raw integer means what.
//!
//! # Rounding
//!
//! All rounding in this crate is round-half-away-from-zero, done on exact
//! integer quotients widened to `i128`. For the positive values produced by
//! valid requests this is the familiar round-half-up.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::{CENT_MICROS, MICROS_SCALE};

/// Largest supported share precision: quantities are stored at 1e-6.
pub const MAX_SHARE_DECIMAL_PLACES: u32 = 6;

// ---------------------------------------------------------------------------
// Micros newtype
// ---------------------------------------------------------------------------

/// A fixed-point monetary amount at 1e-6 scale (micros).
///
/// 1 unit = `Micros(1_000_000)`; one cent = `Micros(10_000)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Micros(i64);

impl Micros {
    /// Zero monetary amount.
    pub const ZERO: Micros = Micros(0);

    /// Maximum representable value.
    pub const MAX: Micros = Micros(i64::MAX);

    /// Minimum representable value.
    pub const MIN: Micros = Micros(i64::MIN);

    /// Construct from a raw micros count.
    #[inline]
    pub const fn new(raw: i64) -> Self {
        Micros(raw)
    }

    /// Construct from a whole number of currency units.
    ///
    /// `Micros::from_units(100)` is 100.00.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Micros(units * MICROS_SCALE)
    }

    /// Extract the underlying raw `i64`.
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Round to the nearest whole cent, half away from zero.
    ///
    /// `1.005` → `1.01`, `-1.005` → `-1.01`, `1.004999` → `1.00`.
    pub fn round_to_cents(self) -> Micros {
        let cents = div_round_half_away(self.0 as i128, CENT_MICROS as i128);
        Micros(saturate_i64(cents * CENT_MICROS as i128))
    }

    /// `true` if the amount is a whole number of cents.
    #[inline]
    pub fn is_whole_cents(self) -> bool {
        self.0 % CENT_MICROS == 0
    }

    /// Saturating addition; clamps at [`Micros::MAX`].
    #[inline]
    pub fn saturating_add(self, rhs: Micros) -> Micros {
        Micros(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction; clamps at [`Micros::MIN`].
    #[inline]
    pub fn saturating_sub(self, rhs: Micros) -> Micros {
        Micros(self.0.saturating_sub(rhs.0))
    }

    /// `true` if this amount is strictly positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// `true` if this amount is strictly negative.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Add for Micros {
    type Output = Micros;
    #[inline]
    fn add(self, rhs: Micros) -> Micros {
        Micros(self.0 + rhs.0)
    }
}

impl Sub for Micros {
    type Output = Micros;
    #[inline]
    fn sub(self, rhs: Micros) -> Micros {
        Micros(self.0 - rhs.0)
    }
}

impl Neg for Micros {
    type Output = Micros;
    #[inline]
    fn neg(self) -> Micros {
        Micros(-self.0)
    }
}

impl AddAssign for Micros {
    #[inline]
    fn add_assign(&mut self, rhs: Micros) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Micros {
    #[inline]
    fn sub_assign(&mut self, rhs: Micros) {
        self.0 -= rhs.0;
    }
}

impl Sum for Micros {
    fn sum<I: Iterator<Item = Micros>>(iter: I) -> Micros {
        iter.fold(Micros::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Micros> for Micros {
    fn sum<I: Iterator<Item = &'a Micros>>(iter: I) -> Micros {
        iter.copied().sum()
    }
}

impl std::fmt::Display for Micros {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_scaled(self.0, f)
    }
}

// ---------------------------------------------------------------------------
// Quantity newtype
// ---------------------------------------------------------------------------

/// A share quantity at 1e-6 scale.
///
/// Always a multiple of `10^(6 - precision)` when produced by
/// [`Quantity::from_allocation`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(i64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    #[inline]
    pub const fn new(raw: i64) -> Self {
        Quantity(raw)
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// `round(amount / price, precision)`, half away from zero.
    ///
    /// `price` must be strictly positive; `precision` must not exceed
    /// [`MAX_SHARE_DECIMAL_PLACES`]. Both are guaranteed by
    /// [`crate::AllocatorConfig`] and [`crate::PortfolioItem`]; violating
    /// them is a programming error.
    ///
    /// Saturates at `i64::MAX` shares-micros for absurd amount/price ratios.
    pub fn from_allocation(amount: Micros, price: Micros, precision: u32) -> Quantity {
        debug_assert!(price.is_positive(), "price must be > 0");
        debug_assert!(precision <= MAX_SHARE_DECIMAL_PLACES);

        let step = 10_i128.pow(MAX_SHARE_DECIMAL_PLACES - precision);
        let places = 10_i128.pow(precision);

        // amount / price is dimensionless; scale the numerator so the quotient
        // lands directly on the requested decimal position.
        let scaled = div_round_half_away(amount.raw() as i128 * places, price.raw() as i128);
        Quantity(saturate_i64(scaled * step))
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_scaled(self.0, f)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Integer division rounding half away from zero. `den` must be > 0.
pub(crate) fn div_round_half_away(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0);
    let q = num / den;
    let r = num % den;
    if 2 * r.abs() >= den {
        q + num.signum()
    } else {
        q
    }
}

pub(crate) fn saturate_i64(v: i128) -> i64 {
    i64::try_from(v).unwrap_or(if v < 0 { i64::MIN } else { i64::MAX })
}

fn fmt_scaled(raw: i64, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let whole = raw / MICROS_SCALE;
    let frac = (raw % MICROS_SCALE).abs();
    // Values in (-1, 0) truncate to a whole part of 0 and would lose the sign.
    if raw < 0 && whole == 0 {
        write!(f, "-{whole}.{frac:06}")
    } else {
        write!(f, "{whole}.{frac:06}")
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
