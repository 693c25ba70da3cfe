//! Weapon profiles consumed by the targeting resolver.
//!
//! Profiles are immutable values loaded and validated outside the battle core.
//! The core only reads them; inventory and equipment rules stay with the
//! [`EquipmentOracle`] implementor.

use crate::combatant::CombatantId;
use crate::grid::Offset;
use crate::targeting::WeaponArchetype;

/// Attack geometry of a weapon.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponProfile {
    pub archetype: WeaponArchetype,

    /// Requested range. Values `<= 0` clamp to 1, values above the configured
    /// cap clamp to the cap.
    pub range: i32,

    /// Explicit relative pattern. When present it replaces the archetype's
    /// generated pattern.
    pub pattern: Option<Vec<Offset>>,

    /// Splash radius (Manhattan) around the impact point. Zero hits only the
    /// impact tile.
    pub aoe_radius: u32,
}

impl WeaponProfile {
    pub fn new(archetype: WeaponArchetype, range: i32) -> Self {
        Self {
            archetype,
            range,
            pattern: None,
            aoe_radius: 0,
        }
    }

    /// Sword-like: adjacent tiles only.
    pub fn melee() -> Self {
        Self::new(WeaponArchetype::Melee, 1)
    }

    /// Spear-like: four straight rays.
    pub fn line(range: i32) -> Self {
        Self::new(WeaponArchetype::Line, range)
    }

    /// Bow-like: Manhattan diamond.
    pub fn radial(range: i32) -> Self {
        Self::new(WeaponArchetype::Radial, range)
    }

    /// Staff-like: horizontal and vertical bars through the wielder.
    pub fn cross(range: i32) -> Self {
        Self::new(WeaponArchetype::Cross, range)
    }

    /// Axe-like: Chebyshev ring of at most radius 2.
    pub fn area(range: i32) -> Self {
        Self::new(WeaponArchetype::Area, range)
    }

    pub fn with_pattern(mut self, pattern: impl IntoIterator<Item = Offset>) -> Self {
        self.pattern = Some(pattern.into_iter().collect());
        self
    }

    pub fn with_aoe_radius(mut self, radius: u32) -> Self {
        self.aoe_radius = radius;
        self
    }
}

impl Default for WeaponProfile {
    fn default() -> Self {
        Self::melee()
    }
}

/// Resolves the weapon a combatant currently wields.
///
/// Implemented by the equipment layer; the battle core treats it as an opaque
/// stat provider.
pub trait EquipmentOracle {
    fn active_weapon(&self, combatant: CombatantId) -> Option<WeaponProfile>;

    /// Weapon used when nothing is equipped.
    fn unarmed(&self) -> WeaponProfile {
        WeaponProfile::melee()
    }

    fn weapon_or_unarmed(&self, combatant: CombatantId) -> WeaponProfile {
        self.active_weapon(combatant)
            .unwrap_or_else(|| self.unarmed())
    }
}

impl<F> EquipmentOracle for F
where
    F: Fn(CombatantId) -> Option<WeaponProfile>,
{
    fn active_weapon(&self, combatant: CombatantId) -> Option<WeaponProfile> {
        self(combatant)
    }
}
