//! Range pattern generation.
//!
//! Maps a weapon archetype and a numeric range onto an ordered list of
//! relative offsets. Generation is pure: the same inputs always produce the
//! same offsets in the same order, and the origin offset is never included.

use std::collections::BTreeSet;

use crate::config::TargetingConfig;
use crate::grid::Offset;
use crate::weapon::WeaponProfile;

use super::error::TargetingError;

/// Weapon class determining how relative offsets are generated.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WeaponArchetype {
    /// Adjacent tiles (4, or 8 with diagonals).
    Melee,
    /// Four cardinal rays of length `range`.
    Line,
    /// Every tile within Manhattan distance `range`.
    Radial,
    /// Horizontal then vertical bars of half-length `range`.
    Cross,
    /// Every tile within Chebyshev distance `min(2, range)`.
    Area,
}

/// Distance metric an archetype's reach is measured in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceMetric {
    Manhattan,
    Chebyshev,
}

impl DistanceMetric {
    pub fn measure(self, offset: Offset) -> u32 {
        match self {
            DistanceMetric::Manhattan => offset.manhattan(),
            DistanceMetric::Chebyshev => offset.chebyshev(),
        }
    }
}

impl WeaponArchetype {
    pub const ALL: [WeaponArchetype; 5] = [
        WeaponArchetype::Melee,
        WeaponArchetype::Line,
        WeaponArchetype::Radial,
        WeaponArchetype::Cross,
        WeaponArchetype::Area,
    ];

    /// Area archetype reach never exceeds this radius.
    pub const AREA_MAX_RADIUS: u32 = 2;

    /// Parses a data tag, falling back to [`WeaponArchetype::Radial`] for
    /// unknown tags. The flag reports whether the fallback was taken.
    pub fn parse_lenient(tag: &str) -> (Self, bool) {
        match tag.parse::<Self>() {
            Ok(archetype) => (archetype, false),
            Err(_) => (Self::Radial, true),
        }
    }

    /// Parses a data tag, rejecting unknown tags.
    pub fn parse_strict(tag: &str) -> Result<Self, TargetingError> {
        tag.parse::<Self>()
            .map_err(|_| TargetingError::UnknownArchetype(tag.to_owned()))
    }

    pub fn metric(self) -> DistanceMetric {
        match self {
            WeaponArchetype::Melee | WeaponArchetype::Area => DistanceMetric::Chebyshev,
            WeaponArchetype::Line | WeaponArchetype::Radial | WeaponArchetype::Cross => {
                DistanceMetric::Manhattan
            }
        }
    }

    /// Maximum distance (in [`Self::metric`]) a pattern of this archetype reaches.
    pub fn reach(self, effective_range: u32) -> u32 {
        match self {
            WeaponArchetype::Melee => 1,
            WeaponArchetype::Area => effective_range.min(Self::AREA_MAX_RADIUS),
            WeaponArchetype::Line | WeaponArchetype::Radial | WeaponArchetype::Cross => {
                effective_range
            }
        }
    }
}

// ============================================================================
// Range Pattern
// ============================================================================

/// Ordered set of relative offsets produced for one weapon.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangePattern {
    pub archetype: WeaponArchetype,
    pub requested_range: i32,
    pub effective_range: u32,
    offsets: Vec<Offset>,
}

impl RangePattern {
    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    pub fn iter(&self) -> impl Iterator<Item = Offset> + '_ {
        self.offsets.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn contains(&self, offset: Offset) -> bool {
        self.offsets.contains(&offset)
    }

    /// True when the requested range had to be clamped (non-positive or above the cap).
    pub fn was_clamped(&self) -> bool {
        i64::from(self.requested_range) != i64::from(self.effective_range)
    }

    /// Largest Chebyshev extent of any offset; bounds the inverse search box.
    pub fn extent(&self) -> u32 {
        self.offsets.iter().map(|o| o.chebyshev()).max().unwrap_or(0)
    }
}

/// Clamps a requested range into `[1, cap]`.
pub fn effective_range(requested: i32, cap: u32) -> u32 {
    let cap = cap.max(1);
    if requested <= 0 {
        1
    } else {
        (requested as u32).min(cap)
    }
}

/// Strict range check: rejects ranges above the cap instead of clamping.
pub fn validate_range(requested: i32, cap: u32) -> Result<u32, TargetingError> {
    let cap = cap.max(1);
    if requested > 0 && requested as u32 > cap {
        return Err(TargetingError::RangeExceedsCap { requested, cap });
    }
    Ok(effective_range(requested, cap))
}

/// Generates the relative pattern for an archetype.
pub fn generate_pattern(
    archetype: WeaponArchetype,
    range: i32,
    diagonals_allowed: bool,
    cap: u32,
) -> RangePattern {
    let effective = effective_range(range, cap);
    let r = effective as i32;

    let offsets = match archetype {
        WeaponArchetype::Melee => melee_offsets(diagonals_allowed),
        WeaponArchetype::Line => line_offsets(r),
        WeaponArchetype::Radial => filled_offsets(r, DistanceMetric::Manhattan),
        WeaponArchetype::Cross => cross_offsets(r),
        WeaponArchetype::Area => filled_offsets(
            archetype.reach(effective) as i32,
            DistanceMetric::Chebyshev,
        ),
    };

    RangePattern {
        archetype,
        requested_range: range,
        effective_range: effective,
        offsets,
    }
}

/// Pattern for a concrete weapon.
///
/// An explicit weapon pattern wins over generation. Explicit offsets are
/// stripped of the origin and duplicates (first occurrence kept) and of any
/// offset further than the configured cap in Chebyshev distance.
pub fn pattern_for_weapon(weapon: &WeaponProfile, config: &TargetingConfig) -> RangePattern {
    let cap = config.range_cap();

    match &weapon.pattern {
        Some(explicit) => {
            let mut seen = BTreeSet::new();
            let offsets = explicit
                .iter()
                .copied()
                .filter(|o| !o.is_zero() && o.chebyshev() <= cap)
                .filter(|o| seen.insert(*o))
                .collect();

            RangePattern {
                archetype: weapon.archetype,
                requested_range: weapon.range,
                effective_range: effective_range(weapon.range, cap),
                offsets,
            }
        }
        None => generate_pattern(
            weapon.archetype,
            weapon.range,
            config.diagonal_attack_allowed,
            cap,
        ),
    }
}

// ============================================================================
// Archetype Generators
// ============================================================================

/// North, east, south, west.
const CARDINALS: [Offset; 4] = [
    Offset::new(0, -1),
    Offset::new(1, 0),
    Offset::new(0, 1),
    Offset::new(-1, 0),
];

/// North-east, south-east, south-west, north-west.
const DIAGONALS: [Offset; 4] = [
    Offset::new(1, -1),
    Offset::new(1, 1),
    Offset::new(-1, 1),
    Offset::new(-1, -1),
];

fn melee_offsets(diagonals_allowed: bool) -> Vec<Offset> {
    let mut offsets = CARDINALS.to_vec();
    if diagonals_allowed {
        offsets.extend_from_slice(&DIAGONALS);
    }
    offsets
}

fn line_offsets(range: i32) -> Vec<Offset> {
    CARDINALS
        .iter()
        .flat_map(|dir| (1..=range).map(move |step| Offset::new(dir.dx * step, dir.dy * step)))
        .collect()
}

fn cross_offsets(range: i32) -> Vec<Offset> {
    let horizontal = (-range..=range)
        .filter(|&dx| dx != 0)
        .map(|dx| Offset::new(dx, 0));
    let vertical = (-range..=range)
        .filter(|&dy| dy != 0)
        .map(|dy| Offset::new(0, dy));
    horizontal.chain(vertical).collect()
}

/// Row-major scan of every offset with `1 <= metric <= radius`.
fn filled_offsets(radius: i32, metric: DistanceMetric) -> Vec<Offset> {
    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let offset = Offset::new(dx, dy);
            let distance = metric.measure(offset);
            if distance >= 1 && distance <= radius as u32 {
                offsets.push(offset);
            }
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAP: u32 = TargetingConfig::DEFAULT_MAX_CALCULATION_RANGE;

    #[test]
    fn no_pattern_contains_origin() {
        for archetype in WeaponArchetype::ALL {
            for range in -2..=25 {
                for diagonals in [false, true] {
                    let pattern = generate_pattern(archetype, range, diagonals, CAP);
                    assert!(
                        !pattern.contains(Offset::ZERO),
                        "{archetype} range {range} contains origin"
                    );
                }
            }
        }
    }

    #[test]
    fn melee_counts() {
        assert_eq!(generate_pattern(WeaponArchetype::Melee, 1, false, CAP).len(), 4);
        assert_eq!(generate_pattern(WeaponArchetype::Melee, 1, true, CAP).len(), 8);
        // Range is irrelevant for melee.
        assert_eq!(generate_pattern(WeaponArchetype::Melee, 7, true, CAP).len(), 8);
    }

    #[test]
    fn line_has_four_rays() {
        let pattern = generate_pattern(WeaponArchetype::Line, 3, true, CAP);
        assert_eq!(pattern.len(), 12);
        assert!(pattern.iter().all(Offset::is_axis_aligned));
        assert_eq!(
            &pattern.offsets()[..3],
            &[Offset::new(0, -1), Offset::new(0, -2), Offset::new(0, -3)]
        );
    }

    #[test]
    fn radial_is_manhattan_diamond() {
        let pattern = generate_pattern(WeaponArchetype::Radial, 2, true, CAP);
        // 2r(r+1) tiles for a diamond without its centre.
        assert_eq!(pattern.len(), 12);
        assert!(pattern.iter().all(|o| (1..=2).contains(&o.manhattan())));
        assert!(!pattern.contains(Offset::new(2, 1)));
    }

    #[test]
    fn cross_lists_horizontal_before_vertical() {
        let pattern = generate_pattern(WeaponArchetype::Cross, 2, true, CAP);
        assert_eq!(
            pattern.offsets(),
            &[
                Offset::new(-2, 0),
                Offset::new(-1, 0),
                Offset::new(1, 0),
                Offset::new(2, 0),
                Offset::new(0, -2),
                Offset::new(0, -1),
                Offset::new(0, 1),
                Offset::new(0, 2),
            ]
        );
    }

    #[test]
    fn area_radius_is_capped_at_two() {
        let small = generate_pattern(WeaponArchetype::Area, 1, true, CAP);
        assert_eq!(small.len(), 8);
        let large = generate_pattern(WeaponArchetype::Area, 9, true, CAP);
        assert_eq!(large.len(), 24);
        assert!(large.iter().all(|o| o.chebyshev() <= 2));
    }

    #[test]
    fn ranges_clamp_into_bounds() {
        assert_eq!(effective_range(0, CAP), 1);
        assert_eq!(effective_range(-4, CAP), 1);
        assert_eq!(effective_range(50, CAP), CAP);
        assert_eq!(effective_range(5, 0), 1);

        let pattern = generate_pattern(WeaponArchetype::Line, 50, true, CAP);
        assert!(pattern.was_clamped());
        assert_eq!(pattern.effective_range, CAP);
        assert_eq!(pattern.len(), 4 * CAP as usize);
    }

    #[test]
    fn strict_range_rejects_over_cap() {
        assert_eq!(validate_range(3, 5), Ok(3));
        assert_eq!(
            validate_range(6, 5),
            Err(TargetingError::RangeExceedsCap {
                requested: 6,
                cap: 5
            })
        );
    }

    #[test]
    fn every_offset_respects_archetype_metric() {
        for archetype in WeaponArchetype::ALL {
            for range in 1..=6 {
                let pattern = generate_pattern(archetype, range, true, CAP);
                let reach = archetype.reach(pattern.effective_range);
                for offset in pattern.iter() {
                    assert!(archetype.metric().measure(offset) <= reach);
                }
            }
        }
    }

    #[test]
    fn unknown_tag_falls_back_to_radial() {
        assert_eq!(WeaponArchetype::parse_lenient("SPEAR"), (WeaponArchetype::Radial, true));
        assert_eq!(WeaponArchetype::parse_lenient("Line"), (WeaponArchetype::Line, false));
        assert!(WeaponArchetype::parse_strict("trebuchet").is_err());
    }

    #[test]
    fn explicit_pattern_is_sanitised() {
        let weapon = WeaponProfile::melee().with_pattern([
            Offset::new(0, 0),
            Offset::new(2, 0),
            Offset::new(2, 0),
            Offset::new(0, 30),
            Offset::new(-1, 1),
        ]);
        let pattern = pattern_for_weapon(&weapon, &TargetingConfig::default());
        assert_eq!(pattern.offsets(), &[Offset::new(2, 0), Offset::new(-1, 1)]);
    }

    #[test]
    fn generation_is_deterministic() {
        for archetype in WeaponArchetype::ALL {
            let a = generate_pattern(archetype, 4, true, CAP);
            let b = generate_pattern(archetype, 4, true, CAP);
            assert_eq!(a, b);
        }
    }
}
