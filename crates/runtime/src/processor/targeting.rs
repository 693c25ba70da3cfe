//! Roster-aware targeting queries.
//!
//! Thin adapters over [`TargetingResolver`]: weapons come from the caller's
//! [`EquipmentOracle`], the board from an optional [`GridOracle`], and living
//! roster members count as occupants for unit blocking.

use battle_core::{
    CombatantId, EquipmentOracle, Faction, GridOracle, Position, TargetingResolver,
    TargetingResult,
};

use super::BattleProcessor;
use crate::error::{BattleError, Result, rejected};
use crate::roster::OccupiedGrid;

impl BattleProcessor {
    /// Tiles `unit` can currently hit with its active weapon.
    pub fn threat_range(
        &self,
        unit: CombatantId,
        equipment: &dyn EquipmentOracle,
        grid: Option<&dyn GridOracle>,
    ) -> Result<TargetingResult> {
        let attacker = self
            .roster
            .get(unit)
            .map_err(|e| rejected("threat_range", e))?;
        if attacker.is_defeated() {
            return Err(rejected("threat_range", BattleError::Defeated(unit)));
        }

        let weapon = equipment.weapon_or_unarmed(unit);
        let occupied = grid.map(|grid| OccupiedGrid {
            grid,
            roster: &self.roster,
        });
        let resolver = self.resolver(occupied.as_ref().map(|g| g as &dyn GridOracle));
        Ok(resolver.resolve(attacker.position, &weapon))
    }

    /// Living hostile combatants standing in `unit`'s threat range, in
    /// threat-range order.
    pub fn targets_in_range(
        &self,
        unit: CombatantId,
        equipment: &dyn EquipmentOracle,
        grid: Option<&dyn GridOracle>,
    ) -> Result<Vec<CombatantId>> {
        let faction = self.roster.get(unit)?.faction;
        let threat = self.threat_range(unit, equipment, grid)?;

        Ok(threat
            .valid_positions
            .iter()
            .filter_map(|&position| self.roster.at(position))
            .filter(|target| faction.is_hostile_to(target.faction))
            .map(|target| target.id)
            .collect())
    }

    /// Living hostile combatants whose active weapon can reach `position`.
    pub fn threatened_by(
        &self,
        position: Position,
        faction: Faction,
        equipment: &dyn EquipmentOracle,
        grid: Option<&dyn GridOracle>,
    ) -> Vec<CombatantId> {
        let occupied = grid.map(|grid| OccupiedGrid {
            grid,
            roster: &self.roster,
        });
        let resolver = self.resolver(occupied.as_ref().map(|g| g as &dyn GridOracle));

        self.roster
            .living()
            .filter(|unit| unit.faction.is_hostile_to(faction))
            .filter(|unit| {
                let weapon = equipment.weapon_or_unarmed(unit.id);
                resolver.is_position_threatened(position, unit.position, &weapon)
            })
            .map(|unit| unit.id)
            .collect()
    }

    fn resolver<'a>(&'a self, grid: Option<&'a dyn GridOracle>) -> TargetingResolver<'a> {
        let resolver = TargetingResolver::new(&self.config.targeting);
        match grid {
            Some(grid) => resolver.with_bounds(grid.bounds()).with_grid(grid),
            None => resolver,
        }
    }
}
