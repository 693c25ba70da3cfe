//! Combatant state.
//!
//! This module contains all types specific to combatants:
//! - Combatant: Grid-positioned entity with HP, stats and effects
//! - StatBlock / StatGrowth: Base stats and level-up increases
//! - Status: Tick-based status effects
//!
//! # Invariants
//!
//! - `0 <= hp <= stats.max_hp` and `0 <= mp <= stats.max_mp` at all times
//! - [`LifeState`] moves `Active → Defeated` exactly once, on the call that
//!   takes HP from a positive value to zero
//! - Experience and level only ever increase
//!
//! HP, MP, stats, life state and progression are private and only change
//! through the methods below, which uphold these invariants.

mod error;
pub mod stats;
pub mod status;

pub use error::CombatantError;
pub use stats::{StatBlock, StatGrowth};
pub use status::{StatusApplication, StatusEffect, StatusEffectKind, StatusEffects, TickEffect};

use std::fmt;

use bitflags::bitflags;

use crate::grid::Position;

/// Unique identifier for a combatant within one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Combatant faction (allegiance).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    /// Player-controlled units. The only faction that earns experience.
    Player,
    /// Computer-controlled units fighting alongside the player.
    Ally,
    /// Hostile units.
    Enemy,
    /// Bystanders and objects.
    Neutral,
}

impl Faction {
    pub fn is_player(self) -> bool {
        matches!(self, Faction::Player)
    }

    /// Player and allies form one side; enemies the other; neutrals are hostile to no one.
    pub fn is_hostile_to(self, other: Faction) -> bool {
        matches!(
            (self, other),
            (Faction::Player | Faction::Ally, Faction::Enemy)
                | (Faction::Enemy, Faction::Player | Faction::Ally)
        )
    }
}

/// Life cycle of a combatant within one battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifeState {
    #[default]
    Active,
    /// Terminal.
    Defeated,
}

bitflags! {
    /// Per-turn action bookkeeping.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActionFlags: u8 {
        const HAS_ACTED = 1 << 0;
        const HAS_MOVED = 1 << 1;
    }
}

/// Level and cumulative experience of a battle-capable combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progression {
    pub level: u32,
    pub experience: u64,
}

impl Progression {
    pub const fn new(level: u32, experience: u64) -> Self {
        Self { level, experience }
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// What a combatant can take part in, fixed at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleCapability {
    /// Can be damaged and defeated; never gains experience or levels.
    #[default]
    Basic,
    /// Full participant with level and experience.
    BattleCapable(Progression),
}

/// Result of [`Combatant::take_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageApplication {
    pub requested: u32,
    /// `min(requested, previous_hp)`.
    pub actual: u32,
    /// `requested - actual`.
    pub overkill: u32,
    pub previous_hp: u32,
    pub current_hp: u32,
    /// This call performed the `Active → Defeated` transition.
    pub defeated_now: bool,
}

/// A grid-positioned participant in battle resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub position: Position,
    pub faction: Faction,

    stats: StatBlock,
    hp: u32,
    mp: u32,
    life: LifeState,
    capability: BattleCapability,

    /// Active status effects, applied in order each tick.
    pub status_effects: StatusEffects,

    pub flags: ActionFlags,
    pub attacks_remaining: u32,
    pub moves_remaining: u32,
}

impl Combatant {
    /// Creates a basic combatant at full HP/MP with one attack and one move.
    pub fn new(id: CombatantId, faction: Faction, position: Position, stats: StatBlock) -> Self {
        Self {
            id,
            position,
            faction,
            stats,
            hp: stats.max_hp,
            mp: stats.max_mp,
            life: if stats.max_hp == 0 {
                LifeState::Defeated
            } else {
                LifeState::Active
            },
            capability: BattleCapability::Basic,
            status_effects: StatusEffects::empty(),
            flags: ActionFlags::empty(),
            attacks_remaining: 1,
            moves_remaining: 1,
        }
    }

    /// Marks the combatant battle-capable with the given progression.
    pub fn with_progression(mut self, progression: Progression) -> Self {
        self.capability = BattleCapability::BattleCapable(progression);
        self
    }

    /// Sets current HP (clamped to max). Starting at zero HP places the
    /// combatant directly in the defeated state without a transition.
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp.min(self.stats.max_hp);
        self.life = if self.hp == 0 {
            LifeState::Defeated
        } else {
            LifeState::Active
        };
        self
    }

    pub fn with_mp(mut self, mp: u32) -> Self {
        self.mp = mp.min(self.stats.max_mp);
        self
    }

    pub fn with_status(mut self, effect: StatusEffect) -> Result<Self, CombatantError> {
        self.status_effects.add(effect)?;
        Ok(self)
    }

    // ===== accessors =====

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn mp(&self) -> u32 {
        self.mp
    }

    pub fn life(&self) -> LifeState {
        self.life
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Active
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.life == LifeState::Defeated
    }

    pub fn capability(&self) -> BattleCapability {
        self.capability
    }

    pub fn progression(&self) -> Option<Progression> {
        match self.capability {
            BattleCapability::BattleCapable(progression) => Some(progression),
            BattleCapability::Basic => None,
        }
    }

    /// Level used for experience scaling. Basic combatants count as level 1.
    pub fn effective_level(&self) -> u32 {
        self.progression().map_or(1, |p| p.level)
    }

    pub fn has_acted(&self) -> bool {
        self.flags.contains(ActionFlags::HAS_ACTED)
    }

    pub fn has_moved(&self) -> bool {
        self.flags.contains(ActionFlags::HAS_MOVED)
    }

    /// Alive, not stunned, and holding at least one attack slot.
    pub fn can_act(&self) -> bool {
        self.is_alive()
            && self.attacks_remaining > 0
            && !self.has_acted()
            && !self.status_effects.prevents_action()
    }

    // ===== mutation =====

    /// Reduces HP by `amount`, clamped at zero.
    ///
    /// Fires the defeat transition only when HP moves from positive to zero;
    /// damaging a unit already at zero reports the whole amount as overkill.
    pub fn take_damage(&mut self, amount: u32) -> DamageApplication {
        let previous_hp = self.hp;
        let actual = amount.min(previous_hp);
        self.hp = previous_hp - actual;

        let defeated_now = previous_hp > 0 && self.hp == 0 && self.life == LifeState::Active;
        if defeated_now {
            self.life = LifeState::Defeated;
        }

        DamageApplication {
            requested: amount,
            actual,
            overkill: amount - actual,
            previous_hp,
            current_hp: self.hp,
            defeated_now,
        }
    }

    /// Restores up to `amount` HP, capped at max. Defeated combatants are not healed.
    ///
    /// Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.is_defeated() {
            return 0;
        }
        let restored = amount.min(self.stats.max_hp - self.hp);
        self.hp += restored;
        restored
    }

    /// Adds experience and returns the new total.
    pub fn gain_experience(&mut self, amount: u64) -> Result<u64, CombatantError> {
        match &mut self.capability {
            BattleCapability::BattleCapable(progression) => {
                progression.experience = progression.experience.saturating_add(amount);
                Ok(progression.experience)
            }
            BattleCapability::Basic => Err(CombatantError::NotBattleCapable(self.id)),
        }
    }

    /// Raises the level to `level` (never lowers it), grows stats and fully
    /// restores HP and MP to the new maxima.
    pub fn level_up(&mut self, level: u32, growth: &StatGrowth) -> Result<(), CombatantError> {
        let BattleCapability::BattleCapable(progression) = &mut self.capability else {
            return Err(CombatantError::NotBattleCapable(self.id));
        };
        progression.level = progression.level.max(level);

        self.stats = self.stats.grown(growth);
        self.hp = self.stats.max_hp;
        self.mp = self.stats.max_mp;
        Ok(())
    }

    /// Gives back one attack and one move and clears the turn flags.
    pub fn refresh_actions(&mut self) {
        self.attacks_remaining = 1;
        self.moves_remaining = 1;
        self.flags.remove(ActionFlags::HAS_ACTED | ActionFlags::HAS_MOVED);
    }

    pub fn exhaust_actions(&mut self) {
        self.attacks_remaining = 0;
        self.moves_remaining = 0;
    }

    pub fn mark_acted(&mut self) {
        self.flags.insert(ActionFlags::HAS_ACTED | ActionFlags::HAS_MOVED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knight(hp: u32) -> Combatant {
        Combatant::new(
            CombatantId(1),
            Faction::Player,
            Position::new(2, 2),
            StatBlock::new(hp, 10, 8, 6, 5),
        )
        .with_progression(Progression::default())
    }

    #[test]
    fn damage_clamps_and_reports_overkill() {
        let mut unit = knight(10);
        let applied = unit.take_damage(25);
        assert_eq!(applied.actual, 10);
        assert_eq!(applied.overkill, 15);
        assert_eq!(applied.current_hp, 0);
        assert!(applied.defeated_now);
        assert!(unit.is_defeated());
    }

    #[test]
    fn defeat_transition_fires_once() {
        let mut unit = knight(5);
        assert!(unit.take_damage(5).defeated_now);
        let again = unit.take_damage(3);
        assert!(!again.defeated_now);
        assert_eq!(again.actual, 0);
        assert_eq!(again.overkill, 3);
    }

    #[test]
    fn zero_damage_keeps_unit_alive() {
        let mut unit = knight(5);
        let applied = unit.take_damage(0);
        assert_eq!(applied.current_hp, 5);
        assert!(!applied.defeated_now);
        assert!(unit.is_alive());
    }

    #[test]
    fn heal_caps_at_max_and_skips_defeated() {
        let mut unit = knight(20).with_hp(15);
        assert_eq!(unit.heal(10), 5);
        assert_eq!(unit.hp(), 20);

        unit.take_damage(20);
        assert_eq!(unit.heal(10), 0);
        assert_eq!(unit.hp(), 0);
    }

    #[test]
    fn starting_at_zero_hp_is_defeated() {
        let unit = knight(10).with_hp(0);
        assert!(unit.is_defeated());
    }

    #[test]
    fn basic_units_cannot_gain_experience() {
        let mut crate_prop = Combatant::new(
            CombatantId(9),
            Faction::Neutral,
            Position::ORIGIN,
            StatBlock::new(5, 0, 0, 0, 0),
        );
        assert_eq!(
            crate_prop.gain_experience(10),
            Err(CombatantError::NotBattleCapable(CombatantId(9)))
        );
    }

    #[test]
    fn level_up_restores_resources() {
        let mut unit = knight(30).with_hp(4).with_mp(1);
        unit.level_up(3, &StatGrowth::for_levels(2)).unwrap();
        assert_eq!(unit.stats().max_hp, 40);
        assert_eq!(unit.hp(), 40);
        assert_eq!(unit.mp(), 15);
        assert_eq!(unit.progression().map(|p| p.level), Some(3));
    }

    #[test]
    fn stun_prevents_action() {
        let unit = knight(10)
            .with_status(StatusEffect::new(StatusEffectKind::Stun, 1, 0))
            .unwrap();
        assert!(!unit.can_act());
    }

    #[test]
    fn hostility() {
        assert!(Faction::Player.is_hostile_to(Faction::Enemy));
        assert!(Faction::Enemy.is_hostile_to(Faction::Ally));
        assert!(!Faction::Player.is_hostile_to(Faction::Ally));
        assert!(!Faction::Neutral.is_hostile_to(Faction::Enemy));
    }
}
