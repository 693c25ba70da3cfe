//! Experience awards and level curves.
//!
//! Level is a deterministic, non-decreasing function of cumulative experience.
//! Which function is a strategy: [`LevelCurve`] is the seam, with a
//! data-driven [`ExperienceTable`] and the flat [`LinearCurve`]
//! (`experience / 100 + 1`) provided.

use crate::config::ExperienceConfig;
use crate::error::{CoreError, ErrorKind};

/// Maps cumulative experience to a level (1-based).
///
/// Implementations must be monotonic: more experience never yields a lower level.
pub trait LevelCurve: Send + Sync {
    fn level_for(&self, experience: u64) -> u32;
}

/// One level per fixed block of experience.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearCurve {
    pub experience_per_level: u64,
}

impl LinearCurve {
    pub const DEFAULT_EXPERIENCE_PER_LEVEL: u64 = 100;

    pub const fn new(experience_per_level: u64) -> Self {
        Self {
            experience_per_level,
        }
    }
}

impl Default for LinearCurve {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EXPERIENCE_PER_LEVEL)
    }
}

impl LevelCurve for LinearCurve {
    fn level_for(&self, experience: u64) -> u32 {
        let per_level = self.experience_per_level.max(1);
        u32::try_from(experience / per_level)
            .unwrap_or(u32::MAX - 1)
            .saturating_add(1)
    }
}

/// Errors raised when building an [`ExperienceTable`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelingError {
    #[error("experience thresholds must be strictly ascending (index {index}: {value} <= {previous})")]
    NotAscending {
        index: usize,
        previous: u64,
        value: u64,
    },

    #[error("first experience threshold must be positive")]
    ZeroThreshold,
}

impl CoreError for LevelingError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            LevelingError::NotAscending { .. } => "LEVELING_NOT_ASCENDING",
            LevelingError::ZeroThreshold => "LEVELING_ZERO_THRESHOLD",
        }
    }
}

/// Data-driven level table.
///
/// `thresholds[i]` is the cumulative experience needed to reach level `i + 2`.
/// Experience beyond the last threshold stays at the maximum level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExperienceTable {
    thresholds: Vec<u64>,
}

impl ExperienceTable {
    pub fn new(thresholds: Vec<u64>) -> Result<Self, LevelingError> {
        if thresholds.first() == Some(&0) {
            return Err(LevelingError::ZeroThreshold);
        }
        for (index, pair) in thresholds.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(LevelingError::NotAscending {
                    index: index + 1,
                    previous: pair[0],
                    value: pair[1],
                });
            }
        }
        Ok(Self { thresholds })
    }

    pub fn max_level(&self) -> u32 {
        self.thresholds.len() as u32 + 1
    }

    /// Experience required to reach `level`, if the table defines it.
    pub fn threshold_for(&self, level: u32) -> Option<u64> {
        match level {
            0 => None,
            1 => Some(0),
            n => self.thresholds.get(n as usize - 2).copied(),
        }
    }
}

impl LevelCurve for ExperienceTable {
    fn level_for(&self, experience: u64) -> u32 {
        let reached = self.thresholds.partition_point(|&t| t <= experience);
        reached as u32 + 1
    }
}

/// Inputs describing what earned an experience award.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AwardContext {
    /// `target_level - recipient_level`.
    pub level_delta: i64,
    pub critical: bool,
    pub target_defeated: bool,
}

/// Experience before the per-battle ceiling.
///
/// `floor(base × max(0.1, 1 + Δlevel·k) × (1.5 if critical))`, plus the flat
/// defeat bonus when the outcome records a kill.
pub fn scaled_award(config: &ExperienceConfig, base: u32, context: AwardContext) -> u64 {
    let (numerator, denominator) = if context.critical {
        ExperienceConfig::CRITICAL_MULTIPLIER
    } else {
        (1, 1)
    };
    let scale = u128::from(config.level_scale_per_mille(context.level_delta));
    let raw = u128::from(base) * scale * u128::from(numerator)
        / (1000 * u128::from(denominator));

    let mut award = u64::try_from(raw).unwrap_or(u64::MAX);
    if context.target_defeated {
        award = award.saturating_add(u64::from(config.defeat_bonus));
    }
    award
}

/// Clamps an award so the battle total never exceeds `ceiling`.
pub fn cap_award(award: u64, earned_this_battle: u64, ceiling: u64) -> u64 {
    award.min(ceiling.saturating_sub(earned_this_battle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_curve_matches_placeholder_formula() {
        let curve = LinearCurve::default();
        assert_eq!(curve.level_for(0), 1);
        assert_eq!(curve.level_for(99), 1);
        assert_eq!(curve.level_for(100), 2);
        assert_eq!(curve.level_for(250), 3);
    }

    #[test]
    fn table_lookup() {
        let table = ExperienceTable::new(vec![100, 250, 500]).unwrap();
        assert_eq!(table.level_for(0), 1);
        assert_eq!(table.level_for(100), 2);
        assert_eq!(table.level_for(499), 3);
        assert_eq!(table.level_for(10_000), 4);
        assert_eq!(table.max_level(), 4);
        assert_eq!(table.threshold_for(3), Some(250));
        assert_eq!(table.threshold_for(9), None);
    }

    #[test]
    fn table_rejects_unsorted_thresholds() {
        assert_eq!(
            ExperienceTable::new(vec![100, 100]),
            Err(LevelingError::NotAscending {
                index: 1,
                previous: 100,
                value: 100
            })
        );
        assert_eq!(ExperienceTable::new(vec![0, 5]), Err(LevelingError::ZeroThreshold));
    }

    #[test]
    fn curves_are_monotonic() {
        let table = ExperienceTable::new(vec![10, 30, 60, 100]).unwrap();
        let linear = LinearCurve::default();
        let curves: [&dyn LevelCurve; 2] = [&table, &linear];
        for curve in curves {
            let mut previous = curve.level_for(0);
            for experience in 1..1_000 {
                let level = curve.level_for(experience);
                assert!(level >= previous);
                previous = level;
            }
        }
    }

    #[test]
    fn award_with_level_gap_crit_and_kill() {
        let config = ExperienceConfig::default();
        let context = AwardContext {
            level_delta: 20,
            critical: true,
            target_defeated: true,
        };
        // 10 × 3.0 × 1.5 = 45, + 50 defeat bonus
        assert_eq!(scaled_award(&config, 10, context), 95);
        assert_eq!(cap_award(95, 0, 200), 95);
    }

    #[test]
    fn award_floor_for_large_negative_gap() {
        let config = ExperienceConfig::default();
        let context = AwardContext {
            level_delta: -30,
            ..AwardContext::default()
        };
        // scale floors at 0.1
        assert_eq!(scaled_award(&config, 50, context), 5);
    }

    #[test]
    fn negative_gaps_land_on_whole_awards() {
        let config = ExperienceConfig::default();
        let award = |base, level_delta, critical| {
            scaled_award(
                &config,
                base,
                AwardContext {
                    level_delta,
                    critical,
                    target_defeated: false,
                },
            )
        };
        assert_eq!(award(10, -7, false), 3);
        assert_eq!(award(10, -8, false), 2);
        assert_eq!(award(5, -8, false), 1);
        // 10 × 0.3 × 1.5 = 4.5, 10 × 0.2 × 1.5 = 3
        assert_eq!(award(10, -7, true), 4);
        assert_eq!(award(10, -8, true), 3);
    }

    #[test]
    fn whole_products_are_never_rounded_down() {
        let config = ExperienceConfig::default();
        for base in 1..=200u32 {
            for level_delta in -9..=40i64 {
                let tenths = u64::from(base) * (10 + level_delta) as u64;
                let context = AwardContext {
                    level_delta,
                    ..AwardContext::default()
                };
                assert_eq!(
                    scaled_award(&config, base, context),
                    tenths / 10,
                    "{base} at {level_delta}"
                );
            }
        }
    }

    #[test]
    fn cap_respects_earlier_awards() {
        assert_eq!(cap_award(95, 150, 200), 50);
        assert_eq!(cap_award(95, 250, 200), 0);
    }
}
