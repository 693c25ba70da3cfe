//! Damage, healing, status application and defeat handling.

use battle_core::{CombatantId, DamageApplication, StatusApplication, StatusEffect};
use tracing::{debug, info};

use super::BattleProcessor;
use crate::error::{BattleError, Result, rejected};
use crate::events::{BattleEvent, HealthThreshold};

impl BattleProcessor {
    /// Removes up to `amount` HP from `target`.
    ///
    /// Negative amounts are rejected. When this call takes the target from
    /// positive HP to zero, the defeat side effects run before it
    /// returns; hitting a unit already at zero reports everything as overkill
    /// and triggers nothing.
    pub fn apply_damage(
        &mut self,
        target: CombatantId,
        amount: i64,
        source: Option<CombatantId>,
    ) -> Result<DamageApplication> {
        if amount < 0 {
            return Err(rejected("apply_damage", BattleError::NegativeDamage(amount)));
        }
        let amount = u32::try_from(amount).unwrap_or(u32::MAX);

        let unit = self
            .roster
            .get_mut(target)
            .map_err(|e| rejected("apply_damage", e))?;
        let applied = unit.take_damage(amount);
        let threshold = HealthThreshold::from_hp(applied.current_hp, unit.stats().max_hp);

        debug!(
            target = %target,
            source = ?source,
            damage = applied.actual,
            overkill = applied.overkill,
            hp = applied.current_hp,
            "damage applied"
        );
        self.events.publish(BattleEvent::DamageApplied {
            target,
            damage: applied.actual,
            overkill: applied.overkill,
            previous_hp: applied.previous_hp,
            current_hp: applied.current_hp,
            was_defeated: applied.defeated_now,
            source,
            threshold,
        });

        if applied.defeated_now {
            self.apply_defeat(target)?;
        }
        Ok(applied)
    }

    /// Checks that `unit` is down and settles its defeat.
    ///
    /// Defeat is settled by the damage that drops a unit to zero HP, so a
    /// unit already in the defeated state is left untouched and nothing is
    /// published.
    pub fn handle_unit_defeated(&mut self, unit: CombatantId) -> Result<()> {
        let combatant = self
            .roster
            .get(unit)
            .map_err(|e| rejected("handle_unit_defeated", e))?;
        if combatant.hp() > 0 {
            let hp = combatant.hp();
            return Err(rejected(
                "handle_unit_defeated",
                BattleError::NotDefeated { unit, hp },
            ));
        }
        if combatant.is_defeated() {
            debug!(unit = %unit, "defeat already settled");
            return Ok(());
        }
        self.apply_defeat(unit)
    }

    fn apply_defeat(&mut self, unit: CombatantId) -> Result<()> {
        let defeat = self.config.defeat.clone();
        let combatant = self.roster.get_mut(unit)?;

        if defeat.mark_as_acted {
            combatant.mark_acted();
        }
        if defeat.clear_status_effects {
            combatant.status_effects.clear();
        }
        if defeat.exhaust_actions {
            combatant.exhaust_actions();
        }

        let (faction, position) = (combatant.faction, combatant.position);
        info!(unit = %unit, %faction, %position, "unit defeated");
        if defeat.notify {
            self.events.publish(BattleEvent::UnitDefeated {
                unit,
                faction,
                position,
            });
        }
        Ok(())
    }

    /// Restores up to `amount` HP (capped at max). Returns the HP restored;
    /// defeated units are not revived and restore nothing.
    pub fn heal(&mut self, unit: CombatantId, amount: u32) -> Result<u32> {
        let combatant = self
            .roster
            .get_mut(unit)
            .map_err(|e| rejected("heal", e))?;
        let restored = combatant.heal(amount);
        debug!(unit = %unit, restored, hp = combatant.hp(), "hp restored");
        Ok(restored)
    }

    /// Adds (or refreshes) a status effect on a living unit.
    pub fn apply_status_effect(
        &mut self,
        unit: CombatantId,
        effect: StatusEffect,
    ) -> Result<StatusApplication> {
        let combatant = self
            .roster
            .get_mut(unit)
            .map_err(|e| rejected("apply_status_effect", e))?;
        if combatant.is_defeated() {
            return Err(rejected("apply_status_effect", BattleError::Defeated(unit)));
        }

        let application = combatant
            .status_effects
            .add(effect)
            .map_err(|e| rejected("apply_status_effect", e.into()))?;
        debug!(
            unit = %unit,
            kind = %effect.kind,
            remaining = effect.remaining,
            ?application,
            "status effect applied"
        );
        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{Combatant, CoreError, ErrorKind, StatusEffectKind};
    use tokio::sync::broadcast::error::TryRecvError;

    use super::super::test_support::*;
    use super::*;
    use crate::events::Topic;

    #[test]
    fn negative_damage_is_a_validation_error() {
        let mut processor = processor([enemy(2, 10)]);
        let err = processor.apply_damage(CombatantId(2), -1, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(processor.combatant(CombatantId(2)).unwrap().hp(), 10);
    }

    #[test]
    fn unknown_target_is_a_validation_error() {
        let mut processor = processor(Vec::<Combatant>::new());
        let err = processor.apply_damage(CombatantId(7), 3, None).unwrap_err();
        assert_eq!(err, BattleError::UnknownCombatant(CombatantId(7)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn lethal_damage_runs_defeat_handling_once() {
        let mut processor = processor([enemy(2, 10)]);
        let mut combat = processor.events().subscribe(Topic::Combat);

        let applied = processor.apply_damage(CombatantId(2), 25, Some(CombatantId(1))).unwrap();
        assert_eq!((applied.actual, applied.overkill), (10, 15));

        assert!(matches!(
            combat.try_recv(),
            Ok(BattleEvent::DamageApplied { was_defeated: true, threshold: HealthThreshold::Defeated, .. })
        ));
        assert!(matches!(combat.try_recv(), Ok(BattleEvent::UnitDefeated { .. })));

        // Zero-to-zero hit: damage notification only, no second defeat.
        let again = processor.apply_damage(CombatantId(2), 4, None).unwrap();
        assert!(!again.defeated_now);
        assert!(matches!(
            combat.try_recv(),
            Ok(BattleEvent::DamageApplied { was_defeated: false, damage: 0, overkill: 4, .. })
        ));
        assert_eq!(combat.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn defeat_handling_requires_zero_hp() {
        let mut processor = processor([enemy(2, 10)]);
        let err = processor.handle_unit_defeated(CombatantId(2)).unwrap_err();
        assert_eq!(
            err,
            BattleError::NotDefeated {
                unit: CombatantId(2),
                hp: 10
            }
        );
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn settled_defeat_is_not_repeated() {
        let mut processor = processor([enemy(2, 5)]);
        processor.apply_damage(CombatantId(2), 5, None).unwrap();
        processor.roster.get_mut(CombatantId(2)).unwrap().refresh_actions();
        let mut combat = processor.events().subscribe(Topic::Combat);

        assert_eq!(processor.handle_unit_defeated(CombatantId(2)), Ok(()));
        assert_eq!(processor.handle_unit_defeated(CombatantId(2)), Ok(()));
        assert_eq!(combat.try_recv(), Err(TryRecvError::Empty));

        let unit = processor.combatant(CombatantId(2)).unwrap();
        assert_eq!(unit.attacks_remaining, 1);
        assert!(!unit.has_acted());
    }

    #[test]
    fn defeat_side_effects_follow_config() {
        let mut processor = processor([enemy(2, 5)]);
        processor
            .apply_status_effect(CombatantId(2), StatusEffect::new(StatusEffectKind::Burn, 3, 1))
            .unwrap();
        processor.config.defeat.clear_status_effects = false;

        processor.apply_damage(CombatantId(2), 5, None).unwrap();
        let unit = processor.combatant(CombatantId(2)).unwrap();
        assert!(unit.has_acted());
        assert_eq!(unit.attacks_remaining, 0);
        assert!(unit.status_effects.has(StatusEffectKind::Burn));
    }

    #[test]
    fn status_on_defeated_unit_is_rejected() {
        let mut processor = processor([enemy(2, 5)]);
        processor.apply_damage(CombatantId(2), 5, None).unwrap();
        let err = processor
            .apply_status_effect(CombatantId(2), StatusEffect::new(StatusEffectKind::Poison, 2, 1))
            .unwrap_err();
        assert_eq!(err, BattleError::Defeated(CombatantId(2)));
    }
}
