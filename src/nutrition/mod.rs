//! Nutrition value types
//!
//! Nutrient value objects, their aggregate, and the rounding policy they share.

pub mod energy;
pub mod nutrient;
pub mod nutrients;
pub mod rounding;

pub use energy::{Energy, KJ_PER_KCAL};
pub use nutrient::{Carbohydrates, Fat, Protein, Salt};
pub use nutrients::Nutrients;
pub use rounding::{round_up_to_2_decimal_places, round_up_to_n_decimal_places};
