//! Targeting and range geometry.
//!
//! Two layers, both pure:
//! - [`pattern`]: weapon archetype + range → ordered relative offsets
//! - [`resolver`]: offsets + bounds + line of sight → valid / blocked positions,
//!   threat ranges, splash areas and the inverse "who can hit this tile" query
//!
//! Nothing here mutates battle state; the outcome processor consumes the
//! results to decide what it is allowed to resolve.

mod error;
pub mod pattern;
pub mod resolver;

pub use error::TargetingError;
pub use pattern::{
    DistanceMetric, RangePattern, WeaponArchetype, effective_range, generate_pattern,
    pattern_for_weapon, validate_range,
};
pub use resolver::{TargetingResolver, TargetingResult};
