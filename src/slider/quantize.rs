//! Tick snapping in exact decimal arithmetic.
//!
//! Binary floats make a value that reads `0.35` at one decimal place land on
//! either side of a tick depending on the bits it happens to carry. Every value
//! is therefore converted to its shortest decimal form, rounded half-up to the
//! configured precision, and only then divided by the tick width.

use crate::config::ResolvedConfig;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Magnitude beyond which values are rejected, keeping every intermediate
/// product comfortably inside the 96-bit decimal mantissa.
const MAX_MAGNITUDE: f64 = 1e15;

const HALF_UP: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Converts a float to the decimal it prints as.
pub(crate) fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() || value.abs() > MAX_MAGNITUDE {
        return None;
    }
    value.to_string().parse().ok()
}

/// Rounds half away from zero to `precision` places, keeping trailing zeros.
///
/// Used for published values, so `-2.5` and `2.5` read symmetrically.
pub(crate) fn round_half_up(value: Decimal, precision: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(precision, HALF_UP);
    rounded.rescale(precision);
    rounded
}

/// Rounds to `dp` places with exact ties going toward positive infinity.
fn round_ties_up(value: Decimal, dp: u32) -> Decimal {
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    value.round_dp_with_strategy(dp, strategy)
}

/// Maps arbitrary values onto the evenly spaced tick grid anchored at the
/// start value.
///
/// Ticks sit at `start + k * tick_width`. When `start` is not a multiple of the
/// tick width this grid differs from snapping to `k * tick_width`, which would
/// put ticks at positions the slider never marks.
#[derive(Debug, Clone, PartialEq)]
pub struct TickQuantizer {
    origin: Decimal,
    /// Signed: negative for descending ranges.
    tick_width: Decimal,
    num_ticks: u32,
    precision: u32,
}

impl TickQuantizer {
    pub fn new(config: &ResolvedConfig) -> Self {
        let origin = config.start_decimal();
        let range = config.end_decimal() - origin;
        Self {
            origin,
            tick_width: range / Decimal::from(config.num_ticks()),
            num_ticks: config.num_ticks(),
            precision: config.precision(),
        }
    }

    pub fn tick_width(&self) -> Decimal {
        self.tick_width
    }

    /// Nearest tick index for `value`. A value exactly between two ticks goes
    /// to the one with the larger value, for ascending and descending ranges alike.
    pub fn tick_index(&self, value: f64) -> Option<i64> {
        let offset = round_ties_up(to_decimal(value)? - self.origin, self.precision);
        let steps = offset.checked_div(self.tick_width)?;
        let index = if self.tick_width.is_sign_positive() {
            round_ties_up(steps, 0)
        } else {
            -round_ties_up(-steps, 0)
        };
        index.to_i64()
    }

    pub fn tick_value(&self, index: i64) -> Decimal {
        self.origin + Decimal::from(index) * self.tick_width
    }

    /// Value of the tick nearest to `value`.
    ///
    /// Non-finite or oversized input is returned untouched; the engine never
    /// passes such values.
    pub fn quantize(&self, value: f64) -> f64 {
        self.tick_index(value)
            .and_then(|index| Decimal::from(index).checked_mul(self.tick_width))
            .and_then(|offset| self.origin.checked_add(offset))
            .and_then(|tick| tick.to_f64())
            .unwrap_or(value)
    }

    pub fn is_on_tick(&self, value: f64) -> bool {
        self.quantize(value) == value
    }

    /// Values of every major tick, start to end inclusive.
    pub fn tick_values(&self) -> impl Iterator<Item = Decimal> + '_ {
        (0..=i64::from(self.num_ticks)).map(|index| self.tick_value(index))
    }
}
