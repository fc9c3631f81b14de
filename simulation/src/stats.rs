//! Stat arithmetic shared by every character
//!
//! Attributes are plain integers kept inside [`STAT_MIN`, `STAT_MAX`]. Fractional
//! deltas are turned into whole points with [`round_stochastic`], which keeps the
//! expected value intact across many small adjustments.

use rand::Rng;
use rand_distr::Exp1;

pub const STAT_MIN: i32 = 0;
pub const STAT_MAX: i32 = 100;

/// Rate applied to the unit exponential in [`exponential_sample`].
/// Higher values pull samples harder towards the lower bound.
const TAIL_RATE: f64 = 3.0;

/// Clamp `value` into `[lo, hi]`.
pub fn clamp<T: PartialOrd>(value: T, lo: T, hi: T) -> T {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// Apply `delta` to a stat and clamp the result into the stat range.
pub fn change_stat(current: i32, delta: i32) -> i32 {
    clamp(current.saturating_add(delta), STAT_MIN, STAT_MAX)
}

/// Round `x` up with probability equal to its fractional part, down otherwise.
///
/// `3.3` becomes `4` 30% of the time and `3` the rest. Whole numbers are
/// returned unchanged without consuming randomness.
pub fn round_stochastic<R: Rng + ?Sized>(rng: &mut R, x: f64) -> i32 {
    round_stochastic_wide(rng, x) as i32
}

/// [`round_stochastic`] for money-sized values.
pub fn round_money<R: Rng + ?Sized>(rng: &mut R, x: f64) -> i64 {
    round_stochastic_wide(rng, x)
}

fn round_stochastic_wide<R: Rng + ?Sized>(rng: &mut R, x: f64) -> i64 {
    let floor = x.floor();
    let fraction = x - floor;
    if fraction > 0.0 && rng.gen::<f64>() < fraction {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

/// Draw from `[min, max)` with most of the mass just above `min` and a long
/// tail that approaches (but never reaches) `max`.
///
/// Used for lottery jackpots and inheritances.
pub fn exponential_sample<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    let x: f64 = rng.sample::<f64, _>(Exp1) / TAIL_RATE;
    min + (max - min) * (x / (1.0 + x))
}
