//! Targeting resolution against bounds and line of sight.

use crate::config::TargetingConfig;
use crate::grid::{GridBounds, GridOracle, Position, line_between};
use crate::weapon::WeaponProfile;

use super::error::TargetingError;
use super::pattern::{RangePattern, pattern_for_weapon, validate_range};

/// Absolute positions a weapon reaches from one origin, split by line of sight.
///
/// Both lists follow the weapon pattern's order. Positions outside the
/// resolver's bounds appear in neither list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetingResult {
    pub origin: Position,
    pub valid_positions: Vec<Position>,
    pub blocked_positions: Vec<Position>,
    /// The weapon range was clamped before generation.
    pub range_clamped: bool,
}

impl TargetingResult {
    pub fn is_valid(&self, position: Position) -> bool {
        self.valid_positions.contains(&position)
    }

    pub fn is_blocked(&self, position: Position) -> bool {
        self.blocked_positions.contains(&position)
    }
}

/// Stateless targeting queries over an optional bounded, optionally obstructed grid.
///
/// The resolver borrows everything it needs and holds no mutable state, so a
/// single instance can serve any number of readers.
#[derive(Clone, Copy)]
pub struct TargetingResolver<'a> {
    config: &'a TargetingConfig,
    bounds: Option<GridBounds>,
    grid: Option<&'a dyn GridOracle>,
}

impl<'a> TargetingResolver<'a> {
    /// Resolver with no bounds and no obstacles.
    pub fn new(config: &'a TargetingConfig) -> Self {
        Self {
            config,
            bounds: None,
            grid: None,
        }
    }

    /// Resolver bounded by and blocked by `grid`.
    pub fn on_grid(config: &'a TargetingConfig, grid: &'a dyn GridOracle) -> Self {
        Self::new(config).with_bounds(grid.bounds()).with_grid(grid)
    }

    pub fn with_bounds(mut self, bounds: GridBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_grid(mut self, grid: &'a dyn GridOracle) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn config(&self) -> &TargetingConfig {
        self.config
    }

    fn in_bounds(&self, position: Position) -> bool {
        self.bounds.is_none_or(|bounds| bounds.contains(position))
    }

    pub fn pattern(&self, weapon: &WeaponProfile) -> RangePattern {
        pattern_for_weapon(weapon, self.config)
    }

    /// Classifies every in-bounds position of the weapon pattern around `attacker`.
    pub fn resolve(&self, attacker: Position, weapon: &WeaponProfile) -> TargetingResult {
        let pattern = self.pattern(weapon);
        self.resolve_pattern(attacker, &pattern)
    }

    /// Like [`Self::resolve`] but rejects a weapon range above the cap
    /// instead of clamping it.
    pub fn resolve_strict(
        &self,
        attacker: Position,
        weapon: &WeaponProfile,
    ) -> Result<TargetingResult, TargetingError> {
        validate_range(weapon.range, self.config.range_cap())?;
        Ok(self.resolve(attacker, weapon))
    }

    fn resolve_pattern(&self, attacker: Position, pattern: &RangePattern) -> TargetingResult {
        let mut valid_positions = Vec::with_capacity(pattern.len());
        let mut blocked_positions = Vec::new();

        for position in pattern.iter().map(|offset| attacker.offset(offset)) {
            if !self.in_bounds(position) {
                continue;
            }
            if self.is_blocked(attacker, position) {
                blocked_positions.push(position);
            } else {
                valid_positions.push(position);
            }
        }

        TargetingResult {
            origin: attacker,
            valid_positions,
            blocked_positions,
            range_clamped: pattern.was_clamped(),
        }
    }

    /// Line-of-sight test between an attacker and a target tile.
    ///
    /// Adjacent tiles (Manhattan distance 1) are never blocked unless the
    /// tile itself is impassable. Farther tiles are blocked when any tile
    /// strictly between the endpoints is impassable, or occupied while unit
    /// blocking is enabled.
    pub fn is_blocked(&self, from: Position, to: Position) -> bool {
        if !self.config.obstacle_blocking {
            return false;
        }
        let Some(grid) = self.grid else {
            return false;
        };

        if !grid.is_passable(to) {
            return true;
        }
        if from.manhattan(to) <= 1 {
            return false;
        }

        let path = line_between(from, to);
        let intermediate = &path[1..path.len() - 1];
        intermediate.iter().any(|&tile| {
            !grid.is_passable(tile) || (self.config.unit_blocking && grid.is_occupied(tile))
        })
    }

    /// Every position `unit` can currently hit with `weapon`.
    pub fn threat_range(&self, unit: Position, weapon: &WeaponProfile) -> Vec<Position> {
        self.resolve(unit, weapon).valid_positions
    }

    pub fn is_position_threatened(
        &self,
        position: Position,
        unit: Position,
        weapon: &WeaponProfile,
    ) -> bool {
        self.can_hit(&self.pattern(weapon), unit, position)
    }

    /// Membership test equivalent to `resolve(origin).is_valid(target)`
    /// without materialising the whole result.
    fn can_hit(&self, pattern: &RangePattern, origin: Position, target: Position) -> bool {
        pattern.contains(origin.offset_to(target))
            && self.in_bounds(target)
            && !self.is_blocked(origin, target)
    }

    /// Splash region around an already resolved impact point.
    ///
    /// Radius zero yields just `center`. Otherwise every in-bounds position
    /// within Manhattan distance `aoe_radius` (clamped to the range cap),
    /// row-major. Line of sight is not consulted.
    pub fn area_of_effect(&self, center: Position, weapon: &WeaponProfile) -> Vec<Position> {
        if weapon.aoe_radius == 0 {
            return vec![center];
        }

        let radius = weapon.aoe_radius.min(self.config.range_cap()) as i32;
        let mut area = Vec::new();
        for y in (center.y - radius)..=(center.y + radius) {
            for x in (center.x - radius)..=(center.x + radius) {
                let position = Position::new(x, y);
                if center.manhattan(position) <= radius as u32 && self.in_bounds(position) {
                    area.push(position);
                }
            }
        }
        area
    }

    /// Inverse query: every origin from which `weapon` could hit `target`.
    ///
    /// Candidates are drawn from the weapon's bounding box around `target`,
    /// so the cost is bounded by the range cap rather than the map size.
    /// Origins outside the bounds are skipped. Results are row-major.
    pub fn attacking_positions(&self, target: Position, weapon: &WeaponProfile) -> Vec<Position> {
        let pattern = self.pattern(weapon);
        let extent = pattern.extent() as i32;

        let mut origins = Vec::new();
        for y in (target.y - extent)..=(target.y + extent) {
            for x in (target.x - extent)..=(target.x + extent) {
                let origin = Position::new(x, y);
                if origin == target || !self.in_bounds(origin) {
                    continue;
                }
                if self.can_hit(&pattern, origin, target) {
                    origins.push(origin);
                }
            }
        }
        origins
    }
}
