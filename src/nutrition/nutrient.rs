//! Gram-measured nutrients
//!
//! Fat, carbohydrates, protein and salt. Every field is rounded up to two
//! decimal places when a value is built, including values produced by
//! arithmetic.

use std::fmt;

use serde::Serialize;

use super::rounding::round_up_to_2_decimal_places;

/// Generates `add`/`subtract`/`scale` and the matching operators for a
/// nutrient whose constructor takes its fields in the listed order.
macro_rules! nutrient_arithmetic {
    ($ty:ident { $($field:ident),+ }) => {
        impl $ty {
            pub fn add(&self, other: &$ty) -> Self {
                Self::new($(self.$field + other.$field),+)
            }

            pub fn subtract(&self, other: &$ty) -> Self {
                Self::new($(self.$field - other.$field),+)
            }

            pub fn scale(&self, factor: f64) -> Self {
                Self::new($(self.$field * factor),+)
            }
        }

        impl std::ops::Add for $ty {
            type Output = $ty;

            fn add(self, other: $ty) -> $ty {
                $ty::add(&self, &other)
            }
        }

        impl std::ops::Sub for $ty {
            type Output = $ty;

            fn sub(self, other: $ty) -> $ty {
                self.subtract(&other)
            }
        }

        impl std::ops::Mul<f64> for $ty {
            type Output = $ty;

            fn mul(self, factor: f64) -> $ty {
                self.scale(factor)
            }
        }

        impl std::ops::Mul<$ty> for f64 {
            type Output = $ty;

            fn mul(self, value: $ty) -> $ty {
                value.scale(self)
            }
        }
    };
}

/// Fat content in grams
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Fat {
    total: f64,
    saturated: f64,
}

impl Fat {
    pub fn new(total: f64, saturated: f64) -> Self {
        Self {
            total: round_up_to_2_decimal_places(total),
            saturated: round_up_to_2_decimal_places(saturated),
        }
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn saturated(&self) -> f64 {
        self.saturated
    }
}

nutrient_arithmetic!(Fat { total, saturated });

impl fmt::Display for Fat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total: {}, Saturated: {}", self.total, self.saturated)
    }
}

/// Carbohydrate content in grams
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Carbohydrates {
    total: f64,
    sugar: f64,
}

impl Carbohydrates {
    pub fn new(total: f64, sugar: f64) -> Self {
        Self {
            total: round_up_to_2_decimal_places(total),
            sugar: round_up_to_2_decimal_places(sugar),
        }
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn sugar(&self) -> f64 {
        self.sugar
    }
}

nutrient_arithmetic!(Carbohydrates { total, sugar });

impl fmt::Display for Carbohydrates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total: {}, Sugar: {}", self.total, self.sugar)
    }
}

/// Protein content in grams
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Protein {
    total: f64,
}

impl Protein {
    pub fn new(total: f64) -> Self {
        Self {
            total: round_up_to_2_decimal_places(total),
        }
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

nutrient_arithmetic!(Protein { total });

impl fmt::Display for Protein {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total: {}", self.total)
    }
}

/// Salt content in grams
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Salt {
    total: f64,
}

impl Salt {
    pub fn new(total: f64) -> Self {
        Self {
            total: round_up_to_2_decimal_places(total),
        }
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

nutrient_arithmetic!(Salt { total });

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total: {}", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_fats() {
        for (total, saturated) in [(10.0, 7.0), (15.0, 5.0), (20.0, 10.0)] {
            let fat = Fat::new(total, saturated);
            assert_eq!(fat.total(), total);
            assert_eq!(fat.saturated(), saturated);
        }
    }

    #[test]
    fn test_make_salts_and_proteins() {
        for total in [5.0, 10.0, 15.0] {
            assert_eq!(Salt::new(total).total(), total);
        }
        for total in [30.0, 45.0, 60.0] {
            assert_eq!(Protein::new(total).total(), total);
        }
    }

    #[test]
    fn test_construction_rounds_up() {
        let fat = Fat::new(10.22222, 9.333);
        assert_eq!(fat.total(), 10.23);
        assert_eq!(fat.saturated(), 9.34);

        let carbs = Carbohydrates::new(132.1321321, 25.43891);
        assert_eq!(carbs.total(), 132.14);
        assert_eq!(carbs.sugar(), 25.44);

        assert_eq!(Salt::new(0.004).total(), 0.01);
    }

    #[test]
    fn test_add_and_subtract() {
        let sum = Fat::new(30.0, 15.0) + Fat::new(20.0, 10.0);
        assert_eq!(sum, Fat::new(50.0, 25.0));

        let difference = Carbohydrates::new(70.0, 40.0) - Carbohydrates::new(50.0, 30.0);
        assert_eq!(difference, Carbohydrates::new(20.0, 10.0));

        assert_eq!(Protein::new(0.1) + Protein::new(0.2), Protein::new(0.3));
    }

    #[test]
    fn test_subtraction_may_go_negative() {
        let salt = Salt::new(2.5) - Salt::new(3.5);
        assert_eq!(salt.total(), -1.0);
    }

    #[test]
    fn test_scale() {
        assert_eq!(0.5 * Fat::new(30.0, 15.0), Fat::new(15.0, 7.5));
        assert_eq!(Carbohydrates::new(14.0, 10.0) * 0.0, Carbohydrates::new(0.0, 0.0));
        assert_eq!(Protein::new(3.1).scale(1.0), Protein::new(3.1));
        // 0.333 rounds up, not to nearest
        assert_eq!(Salt::new(1.0).scale(1.0 / 3.0).total(), 0.34);
    }

    #[test]
    fn test_display() {
        assert_eq!(Fat::new(10.0, 7.0).to_string(), "Total: 10, Saturated: 7");
        assert_eq!(Carbohydrates::new(14.0, 10.0).to_string(), "Total: 14, Sugar: 10");
        assert_eq!(Salt::new(0.2).to_string(), "Total: 0.2");
    }
}
