//! Experience grants and level-ups.

use battle_core::{
    AwardContext, BattleOutcome, CombatantId, StatGrowth, cap_award, scaled_award,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::BattleProcessor;
use crate::error::{BattleError, Result, rejected};
use crate::events::BattleEvent;

/// What a single experience grant did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceGrant {
    pub unit: CombatantId,
    /// Experience actually added after scaling and the per-battle ceiling.
    pub gained: u64,
    pub total: u64,
    pub old_level: u32,
    pub new_level: u32,
}

impl ExperienceGrant {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.old_level
    }
}

impl BattleProcessor {
    /// Grants `base` experience to a living player unit.
    ///
    /// The award is scaled by the level gap to the outcome's target, boosted
    /// for critical hits, topped up with the defeat bonus for kills, and
    /// capped so the unit never exceeds the per-battle ceiling. A resulting
    /// level increase runs [`Self::handle_level_up`].
    pub fn grant_experience(
        &mut self,
        unit: CombatantId,
        base: u32,
        outcome: Option<&BattleOutcome>,
    ) -> Result<ExperienceGrant> {
        self.check_experience_eligible(unit)
            .map_err(|e| rejected("grant_experience", e))?;

        let recipient_level = self.roster.get(unit)?.effective_level();
        let context = match outcome {
            Some(outcome) => {
                // A target that already left the roster scales as an equal.
                let target_level = self
                    .roster
                    .get(outcome.target())
                    .map_or(recipient_level, |target| target.effective_level());
                AwardContext {
                    level_delta: i64::from(target_level) - i64::from(recipient_level),
                    critical: outcome.is_critical(),
                    target_defeated: outcome.target_defeated(),
                }
            }
            None => AwardContext::default(),
        };

        let experience = &self.config.experience;
        let award = scaled_award(experience, base, context);
        let earned = self.experience_this_battle(unit);
        let gained = cap_award(award, earned, u64::from(experience.max_per_battle));

        let combatant = self.roster.get_mut(unit)?;
        let total = combatant
            .gain_experience(gained)
            .map_err(|e| rejected("grant_experience", e.into()))?;
        *self.battle_experience.entry(unit).or_default() += gained;
        self.ledger.record_experience(unit, gained);

        let new_level = self.level_curve.level_for(total).max(recipient_level);
        debug!(unit = %unit, base, award, gained, total, "experience granted");

        if new_level > recipient_level {
            self.handle_level_up(unit, new_level, recipient_level)?;
        }

        self.events.publish(BattleEvent::ExperienceGranted {
            unit,
            gained,
            total,
            leveled_up: new_level > recipient_level,
            new_level,
        });

        Ok(ExperienceGrant {
            unit,
            gained,
            total,
            old_level: recipient_level,
            new_level,
        })
    }

    /// Experience for the attacker of a recorded outcome.
    ///
    /// Hits dealing at least the configured minimum earn the attack-hit base;
    /// misses and evasions earn nothing beyond the defeat bonus. Overkill is
    /// added one-for-one when enabled.
    pub fn grant_attack_experience(&mut self, outcome: &BattleOutcome) -> Result<ExperienceGrant> {
        let experience = &self.config.experience;
        let landed = !outcome.is_evaded() && outcome.damage() >= experience.minimum_damage;

        let mut base = if landed { experience.attack_hit } else { 0 };
        if experience.grant_overkill {
            base = base.saturating_add(outcome.overkill());
        }
        self.grant_experience(outcome.attacker(), base, Some(outcome))
    }

    /// Flat experience for a support action (heal, buff).
    pub fn grant_support_experience(&mut self, unit: CombatantId) -> Result<ExperienceGrant> {
        let base = self.config.experience.support;
        self.grant_experience(unit, base, None)
    }

    /// Raises `unit` from `old_level` to `new_level`, growing its stats and
    /// restoring HP and MP to the new maxima.
    pub fn handle_level_up(
        &mut self,
        unit: CombatantId,
        new_level: u32,
        old_level: u32,
    ) -> Result<StatGrowth> {
        if new_level <= old_level {
            return Err(rejected(
                "handle_level_up",
                BattleError::InvalidLevelUp {
                    unit,
                    old: old_level,
                    new: new_level,
                },
            ));
        }

        let growth = StatGrowth::for_levels(new_level - old_level);
        let combatant = self
            .roster
            .get_mut(unit)
            .map_err(|e| rejected("handle_level_up", e))?;
        combatant
            .level_up(new_level, &growth)
            .map_err(|e| rejected("handle_level_up", e.into()))?;

        info!(
            unit = %unit,
            old_level,
            new_level,
            stat_increase = growth.stat_increase,
            "unit leveled up"
        );
        self.events.publish(BattleEvent::UnitLevelUp {
            unit,
            new_level,
            old_level,
            stat_increase: growth,
        });
        Ok(growth)
    }

    fn check_experience_eligible(&self, unit: CombatantId) -> Result<()> {
        let combatant = self.roster.get(unit)?;
        if combatant.is_defeated() || combatant.hp() == 0 {
            return Err(BattleError::Defeated(unit));
        }
        if !combatant.faction.is_player() {
            return Err(BattleError::NotPlayer {
                unit,
                faction: combatant.faction,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{
        CombatantError, CoreError, ErrorKind, ExperienceConfig, ExperienceTable, Faction, Tick,
    };

    use super::super::test_support::*;
    use super::*;
    use crate::events::Topic;

    fn outcome(attacker: u32, target: u32, damage: u32) -> battle_core::BattleOutcomeBuilder {
        BattleOutcome::builder()
            .attacker(CombatantId(attacker))
            .target(CombatantId(target))
            .damage(damage)
            .at(Tick(1))
    }

    #[test]
    fn defeated_and_non_player_units_are_ineligible() {
        let mut processor = processor([player(1, 1), enemy(2, 10), player(3, 1).with_hp(0)]);

        let err = processor.grant_experience(CombatantId(2), 10, None).unwrap_err();
        assert!(matches!(err, BattleError::NotPlayer { faction: Faction::Enemy, .. }));
        assert_eq!(err.kind(), ErrorKind::State);

        let err = processor.grant_experience(CombatantId(3), 10, None).unwrap_err();
        assert_eq!(err, BattleError::Defeated(CombatantId(3)));
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn basic_player_units_cannot_earn() {
        let mut processor = processor([player(1, 1)]);
        let basic = battle_core::Combatant::new(
            CombatantId(5),
            Faction::Player,
            battle_core::Position::ORIGIN,
            battle_core::StatBlock::new(5, 0, 1, 1, 1),
        );
        processor.add_combatant(basic).unwrap();

        assert_eq!(
            processor.grant_experience(CombatantId(5), 10, None),
            Err(BattleError::Combatant(CombatantError::NotBattleCapable(CombatantId(5))))
        );
        assert_eq!(processor.experience_this_battle(CombatantId(5)), 0);
    }

    #[test]
    fn per_battle_ceiling_caps_and_resets() {
        let mut processor = processor([player(1, 1)]);
        processor.config.experience = ExperienceConfig::default().with_max_per_battle(40);

        assert_eq!(processor.grant_support_experience(CombatantId(1)).unwrap().gained, 15);
        assert_eq!(processor.grant_support_experience(CombatantId(1)).unwrap().gained, 15);
        assert_eq!(processor.grant_support_experience(CombatantId(1)).unwrap().gained, 10);
        assert_eq!(processor.grant_support_experience(CombatantId(1)).unwrap().gained, 0);
        assert_eq!(processor.experience_this_battle(CombatantId(1)), 40);

        processor.begin_battle();
        assert_eq!(processor.grant_support_experience(CombatantId(1)).unwrap().gained, 15);
        assert_eq!(processor.grant_support_experience(CombatantId(1)).unwrap().total, 70);
    }

    #[test]
    fn attack_experience_ignores_misses_but_pays_kills() {
        let mut processor = processor([player(1, 1), enemy(2, 10)]);

        let miss = outcome(1, 2, 0).build().unwrap();
        assert_eq!(processor.grant_attack_experience(&miss).unwrap().gained, 0);

        let hit = outcome(1, 2, 4).build().unwrap();
        assert_eq!(processor.grant_attack_experience(&hit).unwrap().gained, 10);

        let kill = outcome(1, 2, 6).target_defeated(true).build().unwrap();
        assert_eq!(processor.grant_attack_experience(&kill).unwrap().gained, 60);
    }

    #[test]
    fn veteran_hitting_a_weaker_enemy_earns_exact_share() {
        let weak = enemy(2, 50).with_progression(battle_core::Progression::new(1, 0));
        let mut processor = processor([player(1, 8), weak]);

        // 10 × (1 - 7 × 0.1) = 3
        let grant = processor
            .grant_attack_experience(&outcome(1, 2, 4).build().unwrap())
            .unwrap();
        assert_eq!(grant.gained, 3);

        // 10 × 0.3 × 1.5 = 4.5
        let crit = outcome(1, 2, 4).critical(true).build().unwrap();
        assert_eq!(processor.grant_attack_experience(&crit).unwrap().gained, 4);
    }

    #[test]
    fn overkill_experience_is_opt_in() {
        let mut processor = processor([player(1, 1), enemy(2, 10)]);
        processor.config.experience = ExperienceConfig::default().with_overkill(true);

        let hit = outcome(1, 2, 10).overkill(7).build().unwrap();
        assert_eq!(processor.grant_attack_experience(&hit).unwrap().gained, 17);
    }

    #[test]
    fn crossing_a_threshold_levels_up() {
        let table = ExperienceTable::new(vec![20, 40]).unwrap();
        let mut processor = processor([player(1, 1)]).with_level_curve(table);
        let mut progression = processor.events().subscribe(Topic::Progression);

        let grant = processor.grant_experience(CombatantId(1), 45, None).unwrap();
        assert_eq!((grant.old_level, grant.new_level), (1, 3));
        assert!(grant.leveled_up());

        assert!(matches!(
            progression.try_recv(),
            Ok(BattleEvent::UnitLevelUp { new_level: 3, old_level: 1, .. })
        ));
        assert!(matches!(
            progression.try_recv(),
            Ok(BattleEvent::ExperienceGranted { gained: 45, leveled_up: true, new_level: 3, .. })
        ));
    }

    #[test]
    fn level_up_must_increase() {
        let mut processor = processor([player(1, 2)]);
        let err = processor.handle_level_up(CombatantId(1), 2, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
