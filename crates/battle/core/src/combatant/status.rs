//! Status effect system for combatants.
//!
//! Status effects are temporary conditions counted in whole ticks. Each
//! post-battle pass applies every effect once, then decrements its remaining
//! duration and removes it on the tick it reaches zero.
//!
//! # Dispatch
//!
//! What an effect *does* on a tick is decided by [`StatusEffectKind::tick_effect`],
//! one arm per kind. Adding a kind means adding a variant and its arm; the
//! processor only ever sees the resulting [`TickEffect`].

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

use super::CombatantId;
use super::error::CombatantError;

/// Types of status effects.
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
pub enum StatusEffectKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    /// HP loss each tick.
    Poison,

    /// Fire damage each tick.
    Burn,

    // ========================================================================
    // Recovery
    // ========================================================================
    /// HP recovery each tick, capped at max HP.
    Regen,

    // ========================================================================
    // Conditions (no per-tick HP change)
    // ========================================================================
    /// Cannot act.
    Stun,

    /// Extra movement.
    Haste,

    /// Defense bonus.
    Shield,
}

/// Per-tick consequence of an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickEffect {
    Damage(u32),
    Heal(u32),
    None,
}

impl StatusEffectKind {
    pub fn tick_effect(self, power: u32) -> TickEffect {
        match self {
            StatusEffectKind::Poison | StatusEffectKind::Burn => TickEffect::Damage(power),
            StatusEffectKind::Regen => TickEffect::Heal(power),
            StatusEffectKind::Stun | StatusEffectKind::Haste | StatusEffectKind::Shield => {
                TickEffect::None
            }
        }
    }

    /// Whether the effect prevents the bearer from acting.
    pub fn prevents_action(self) -> bool {
        matches!(self, StatusEffectKind::Stun)
    }

    pub fn is_harmful(self) -> bool {
        matches!(
            self,
            StatusEffectKind::Poison | StatusEffectKind::Burn | StatusEffectKind::Stun
        )
    }
}

/// A single status effect with its remaining duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    /// Ticks left. Never zero while the effect is stored.
    pub remaining: u32,
    pub power: u32,
    pub source: Option<CombatantId>,
}

impl StatusEffect {
    pub const fn new(kind: StatusEffectKind, duration: u32, power: u32) -> Self {
        Self {
            kind,
            remaining: duration,
            power,
            source: None,
        }
    }

    pub const fn from_source(mut self, source: CombatantId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn tick_effect(&self) -> TickEffect {
        self.kind.tick_effect(self.power)
    }
}

/// How [`StatusEffects::add`] stored an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusApplication {
    Added,
    /// Same kind from the same source was already present; the longer
    /// duration and the stronger power were kept.
    Refreshed,
}

/// Ordered, bounded list of active effects on one combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn add(&mut self, effect: StatusEffect) -> Result<StatusApplication, CombatantError> {
        if effect.remaining == 0 {
            return Err(CombatantError::ZeroDuration(effect.kind));
        }

        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|e| e.kind == effect.kind && e.source == effect.source)
        {
            existing.remaining = existing.remaining.max(effect.remaining);
            existing.power = existing.power.max(effect.power);
            return Ok(StatusApplication::Refreshed);
        }

        self.effects
            .try_push(effect)
            .map_err(|_| CombatantError::StatusCapacity {
                capacity: BattleConfig::MAX_STATUS_EFFECTS,
            })?;
        Ok(StatusApplication::Added)
    }

    /// Decrements every effect by one tick and removes those that hit zero.
    ///
    /// Returns the removed effects in their original order.
    pub fn advance(&mut self) -> Vec<StatusEffect> {
        let mut expired = Vec::new();
        for effect in self.effects.iter_mut() {
            effect.remaining = effect.remaining.saturating_sub(1);
        }
        self.effects.retain(|e| {
            if e.remaining == 0 {
                expired.push(*e);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn remove(&mut self, kind: StatusEffectKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn prevents_action(&self) -> bool {
        self.effects.iter().any(|e| e.kind.prevents_action())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
