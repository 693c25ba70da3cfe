//! Combatants owned by one battle.

use battle_core::{Combatant, CombatantId, Faction, GridBounds, GridOracle, Position};
use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};

/// Ordered set of combatants in one encounter.
///
/// Iteration follows insertion order, which is also the order of every
/// post-battle pass.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    units: Vec<Combatant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, combatant: Combatant) -> Result<()> {
        if self.contains(combatant.id) {
            return Err(BattleError::DuplicateCombatant(combatant.id));
        }
        self.units.push(combatant);
        Ok(())
    }

    pub fn remove(&mut self, id: CombatantId) -> Result<Combatant> {
        let index = self
            .units
            .iter()
            .position(|unit| unit.id == id)
            .ok_or(BattleError::UnknownCombatant(id))?;
        Ok(self.units.remove(index))
    }

    pub fn get(&self, id: CombatantId) -> Result<&Combatant> {
        self.units
            .iter()
            .find(|unit| unit.id == id)
            .ok_or(BattleError::UnknownCombatant(id))
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Result<&mut Combatant> {
        self.units
            .iter_mut()
            .find(|unit| unit.id == id)
            .ok_or(BattleError::UnknownCombatant(id))
    }

    pub fn contains(&self, id: CombatantId) -> bool {
        self.units.iter().any(|unit| unit.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.units.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.units.iter_mut()
    }

    /// Ids in pass order.
    pub fn ids(&self) -> Vec<CombatantId> {
        self.units.iter().map(|unit| unit.id).collect()
    }

    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.units.iter().filter(|unit| unit.is_alive())
    }

    /// Living combatant standing on `position`, if any.
    pub fn at(&self, position: Position) -> Option<&Combatant> {
        self.living().find(|unit| unit.position == position)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn tally(&self) -> FactionCounts {
        let mut counts = FactionCounts::default();
        for unit in &self.units {
            let headcount = counts.get_mut(unit.faction);
            headcount.total += 1;
            if unit.is_alive() {
                headcount.living += 1;
            }
        }
        counts
    }
}

/// Living and total members of one faction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headcount {
    pub living: u32,
    pub total: u32,
}

impl Headcount {
    /// The faction fielded units and none are left standing.
    pub fn wiped_out(&self) -> bool {
        self.total > 0 && self.living == 0
    }
}

/// Per-faction headcounts carried on condition notifications.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionCounts {
    pub player: Headcount,
    pub ally: Headcount,
    pub enemy: Headcount,
    pub neutral: Headcount,
}

impl FactionCounts {
    pub fn get(&self, faction: Faction) -> Headcount {
        match faction {
            Faction::Player => self.player,
            Faction::Ally => self.ally,
            Faction::Enemy => self.enemy,
            Faction::Neutral => self.neutral,
        }
    }

    fn get_mut(&mut self, faction: Faction) -> &mut Headcount {
        match faction {
            Faction::Player => &mut self.player,
            Faction::Ally => &mut self.ally,
            Faction::Enemy => &mut self.enemy,
            Faction::Neutral => &mut self.neutral,
        }
    }
}

/// Grid view that also treats living roster members as occupants.
///
/// Lets unit blocking see the battle's own combatants without the caller
/// keeping the map's occupancy in sync.
pub(crate) struct OccupiedGrid<'a> {
    pub grid: &'a dyn GridOracle,
    pub roster: &'a Roster,
}

impl GridOracle for OccupiedGrid<'_> {
    fn bounds(&self) -> GridBounds {
        self.grid.bounds()
    }

    fn is_passable(&self, position: Position) -> bool {
        self.grid.is_passable(position)
    }

    fn is_occupied(&self, position: Position) -> bool {
        self.grid.is_occupied(position) || self.roster.at(position).is_some()
    }
}
