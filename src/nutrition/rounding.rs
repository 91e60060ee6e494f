//! Ceiling-based rounding
//!
//! Nutrient magnitudes are always rounded *up*, so stored content errs on the
//! side of slightly more fat, sugar or salt than measured.

use std::sync::OnceLock;

/// Number of cached powers of ten (10^0 through 10^8)
const CACHED_POWERS: usize = 9;

/// Scaled values closer than this to a whole number are treated as that number
const SNAP_TOLERANCE: f64 = 1e-9;

/// Lookup table of powers of ten, filled on first use
fn powers_of_ten() -> &'static [f64; CACHED_POWERS] {
    static POWERS: OnceLock<[f64; CACHED_POWERS]> = OnceLock::new();
    POWERS.get_or_init(|| {
        let mut table = [1.0; CACHED_POWERS];
        for i in 1..CACHED_POWERS {
            table[i] = table[i - 1] * 10.0;
        }
        table
    })
}

fn power_of_ten(n: u32) -> f64 {
    powers_of_ten()
        .get(n as usize)
        .copied()
        .unwrap_or_else(|| 10f64.powi(n as i32))
}

/// Ceiling that ignores binary noise left over from decimal arithmetic
/// (e.g. `1.1 * 100.0 == 110.00000000000001`).
pub fn ceil_tolerant(value: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() < SNAP_TOLERANCE {
        nearest
    } else {
        value.ceil()
    }
}

/// Round a number up to `n` decimal places.
///
/// A scaled value within 1e-9 of a whole number counts as that number, so a
/// true fraction below that threshold (e.g. `1.0000000000001` at n = 2)
/// is not rounded up.
pub fn round_up_to_n_decimal_places(number: f64, n: u32) -> f64 {
    let scale = power_of_ten(n);
    ceil_tolerant(number * scale) / scale
}

/// Round a number up to 2 decimal places
pub fn round_up_to_2_decimal_places(number: f64) -> f64 {
    round_up_to_n_decimal_places(number, 2)
}
