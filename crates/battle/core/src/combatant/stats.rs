//! Stat block and level-up growth.

/// Base combat stats of a combatant.
///
/// The equipment layer is treated as an opaque provider: whatever it resolves
/// is folded into these numbers before the combatant enters battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    pub max_hp: u32,
    pub max_mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl StatBlock {
    pub const fn new(max_hp: u32, max_mp: u32, attack: u32, defense: u32, speed: u32) -> Self {
        Self {
            max_hp,
            max_mp,
            attack,
            defense,
            speed,
        }
    }

    /// Returns the stats raised by `growth`, saturating at `u32::MAX`.
    pub fn grown(self, growth: &StatGrowth) -> Self {
        Self {
            max_hp: self.max_hp.saturating_add(growth.hp),
            max_mp: self.max_mp.saturating_add(growth.mp),
            attack: self.attack.saturating_add(growth.attack),
            defense: self.defense.saturating_add(growth.defense),
            speed: self.speed.saturating_add(growth.speed),
        }
    }
}

/// Stat increases granted by a level-up.
///
/// `stat_increase = levels_gained × 5`, distributed as HP 100%, MP 50%,
/// ATK 30%, DEF 30%, SPD 20% (each floored).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatGrowth {
    pub levels_gained: u32,
    pub stat_increase: u32,
    pub hp: u32,
    pub mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl StatGrowth {
    pub const POINTS_PER_LEVEL: u32 = 5;

    const HP_PERCENT: u32 = 100;
    const MP_PERCENT: u32 = 50;
    const ATTACK_PERCENT: u32 = 30;
    const DEFENSE_PERCENT: u32 = 30;
    const SPEED_PERCENT: u32 = 20;

    pub fn for_levels(levels_gained: u32) -> Self {
        let stat_increase = levels_gained.saturating_mul(Self::POINTS_PER_LEVEL);
        let share = |percent: u32| (u64::from(stat_increase) * u64::from(percent) / 100) as u32;

        Self {
            levels_gained,
            stat_increase,
            hp: share(Self::HP_PERCENT),
            mp: share(Self::MP_PERCENT),
            attack: share(Self::ATTACK_PERCENT),
            defense: share(Self::DEFENSE_PERCENT),
            speed: share(Self::SPEED_PERCENT),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels_gained == 0
    }
}
