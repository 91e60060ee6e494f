//! Nutrient content of a food
//!
//! Bundles the five tracked nutrients for a food's stated weight. Values are
//! not normalised to 100 g.

use std::fmt;

use serde::Serialize;

use super::energy::Energy;
use super::nutrient::{Carbohydrates, Fat, Protein, Salt};

/// Energy, fat, carbohydrates, protein and salt of one food
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Nutrients {
    pub energy: Energy,
    pub fat: Fat,
    pub carbohydrates: Carbohydrates,
    pub protein: Protein,
    pub salt: Salt,
}

impl Nutrients {
    pub fn new(
        energy: Energy,
        fat: Fat,
        carbohydrates: Carbohydrates,
        protein: Protein,
        salt: Salt,
    ) -> Self {
        Self {
            energy,
            fat,
            carbohydrates,
            protein,
            salt,
        }
    }

    /// All nutrients at zero
    pub fn zero() -> Self {
        Self::default()
    }

    /// Add another nutrient content to this one
    pub fn add(&self, other: &Nutrients) -> Self {
        Self {
            energy: self.energy.add(&other.energy),
            fat: self.fat.add(&other.fat),
            carbohydrates: self.carbohydrates.add(&other.carbohydrates),
            protein: self.protein.add(&other.protein),
            salt: self.salt.add(&other.salt),
        }
    }

    /// Subtract another nutrient content from this one. Results may be negative.
    pub fn subtract(&self, other: &Nutrients) -> Self {
        Self {
            energy: self.energy.subtract(&other.energy),
            fat: self.fat.subtract(&other.fat),
            carbohydrates: self.carbohydrates.subtract(&other.carbohydrates),
            protein: self.protein.subtract(&other.protein),
            salt: self.salt.subtract(&other.salt),
        }
    }

    /// Scale all nutrients by a factor
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            energy: self.energy.scale(factor),
            fat: self.fat.scale(factor),
            carbohydrates: self.carbohydrates.scale(factor),
            protein: self.protein.scale(factor),
            salt: self.salt.scale(factor),
        }
    }
}

impl std::ops::Add for Nutrients {
    type Output = Nutrients;

    fn add(self, other: Nutrients) -> Nutrients {
        Nutrients::add(&self, &other)
    }
}

impl std::ops::Sub for Nutrients {
    type Output = Nutrients;

    fn sub(self, other: Nutrients) -> Nutrients {
        self.subtract(&other)
    }
}

impl std::ops::Mul<f64> for Nutrients {
    type Output = Nutrients;

    fn mul(self, factor: f64) -> Nutrients {
        self.scale(factor)
    }
}

impl std::ops::Mul<Nutrients> for f64 {
    type Output = Nutrients;

    fn mul(self, nutrients: Nutrients) -> Nutrients {
        nutrients.scale(self)
    }
}

impl std::iter::Sum for Nutrients {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrients::zero(), |acc, n| acc + n)
    }
}

impl fmt::Display for Nutrients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Energy: {}", self.energy)?;
        writeln!(f, "Fat: {}", self.fat)?;
        writeln!(f, "Carbohydrates: {}", self.carbohydrates)?;
        writeln!(f, "Protein: {}", self.protein)?;
        writeln!(f, "Salt: {}", self.salt)
    }
}
