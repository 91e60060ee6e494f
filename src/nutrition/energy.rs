//! Energy content
//!
//! Energy is kept as a kcal/kJ pair. Whichever side is set, the other is
//! derived from it, and both are rounded up to whole units.

use std::fmt;

use serde::Serialize;

use super::rounding::ceil_tolerant;

/// Kilojoules per kilocalorie
pub const KJ_PER_KCAL: f64 = 4.184;

/// Energy in whole kilocalories and kilojoules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Energy {
    kcal: i64,
    kj: i64,
}

impl Energy {
    /// Energy from a kilocalorie value
    pub fn from_kcal(kcal: f64) -> Self {
        let mut energy = Self::default();
        energy.set_kcal(kcal);
        energy
    }

    /// Energy from a kilojoule value
    pub fn from_kj(kj: f64) -> Self {
        let mut energy = Self::default();
        energy.set_kj(kj);
        energy
    }

    /// Energy from a stored kcal/kJ pair, taken as is
    pub fn from_parts(kcal: i64, kj: i64) -> Self {
        Self { kcal, kj }
    }

    pub fn kcal(&self) -> i64 {
        self.kcal
    }

    pub fn kj(&self) -> i64 {
        self.kj
    }

    /// Set kilocalories, recomputing kilojoules
    pub fn set_kcal(&mut self, kcal: f64) {
        self.kcal = ceil_tolerant(kcal) as i64;
        self.kj = ceil_tolerant(kcal * KJ_PER_KCAL) as i64;
    }

    /// Set kilojoules, recomputing kilocalories
    pub fn set_kj(&mut self, kj: f64) {
        self.kj = ceil_tolerant(kj) as i64;
        self.kcal = ceil_tolerant(kj / KJ_PER_KCAL) as i64;
    }

    // Sums are taken in f64; results past the i64 range saturate in `set_kcal`.
    pub fn add(&self, other: &Energy) -> Self {
        Self::from_kcal(self.kcal as f64 + other.kcal as f64)
    }

    pub fn subtract(&self, other: &Energy) -> Self {
        Self::from_kcal(self.kcal as f64 - other.kcal as f64)
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::from_kcal(self.kcal as f64 * factor)
    }
}

impl std::ops::Add for Energy {
    type Output = Energy;

    fn add(self, other: Energy) -> Energy {
        Energy::add(&self, &other)
    }
}

impl std::ops::Sub for Energy {
    type Output = Energy;

    fn sub(self, other: Energy) -> Energy {
        self.subtract(&other)
    }
}

impl std::ops::Mul<f64> for Energy {
    type Output = Energy;

    fn mul(self, factor: f64) -> Energy {
        self.scale(factor)
    }
}

impl std::ops::Mul<Energy> for f64 {
    type Output = Energy;

    fn mul(self, energy: Energy) -> Energy {
        energy.scale(self)
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kcal ({} kJ)", self.kcal, self.kj)
    }
}
