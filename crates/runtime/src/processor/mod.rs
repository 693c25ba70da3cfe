//! Battle outcome processor.
//!
//! [`BattleProcessor`] owns the roster of one encounter and is the only code
//! that mutates combatants during resolution. Every operation is synchronous
//! and bounded; callers serialise access (one turn loop per processor).
//!
//! Operations are split by concern:
//! - [`damage`]: damage, healing, status application and defeat handling
//! - [`experience`]: experience grants and level-ups
//! - [`post_battle`]: the four-pass post-battle update
//! - [`targeting`]: roster-aware threat and target queries

mod damage;
mod experience;
mod post_battle;
mod targeting;

pub use experience::ExperienceGrant;
pub use post_battle::{ConditionCheck, PostBattleReport};

use std::collections::BTreeMap;

use battle_core::{
    BattleConfig, BattleOutcome, Combatant, CombatantId, LevelCurve, LinearCurve,
};
use tracing::debug;

use crate::error::{Result, rejected};
use crate::events::{BattleEvent, EventBus};
use crate::ledger::BattleLedger;
use crate::roster::Roster;

/// Stateful battle resolution engine.
pub struct BattleProcessor {
    config: BattleConfig,
    events: EventBus,
    roster: Roster,
    ledger: BattleLedger,
    level_curve: Box<dyn LevelCurve>,
    /// Experience granted per combatant since the last `begin_battle`.
    battle_experience: BTreeMap<CombatantId, u64>,
}

impl BattleProcessor {
    /// Processor with an empty roster, an unbounded ledger and the linear
    /// placeholder level curve.
    pub fn new(config: BattleConfig, events: EventBus) -> Self {
        Self {
            config,
            events,
            roster: Roster::new(),
            ledger: BattleLedger::new(),
            level_curve: Box::new(LinearCurve::default()),
            battle_experience: BTreeMap::new(),
        }
    }

    /// Replaces the level curve (e.g. with an `ExperienceTable`).
    pub fn with_level_curve(mut self, curve: impl LevelCurve + 'static) -> Self {
        self.level_curve = Box::new(curve);
        self
    }

    pub fn with_ledger(mut self, ledger: BattleLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn ledger(&self) -> &BattleLedger {
        &self.ledger
    }

    pub fn level_curve(&self) -> &dyn LevelCurve {
        self.level_curve.as_ref()
    }

    // ========================================================================
    // Roster
    // ========================================================================

    pub fn add_combatant(&mut self, combatant: Combatant) -> Result<()> {
        let id = combatant.id;
        self.roster
            .insert(combatant)
            .map_err(|e| rejected("add_combatant", e))?;
        debug!(unit = %id, "combatant joined");
        Ok(())
    }

    pub fn remove_combatant(&mut self, id: CombatantId) -> Result<Combatant> {
        let combatant = self
            .roster
            .remove(id)
            .map_err(|e| rejected("remove_combatant", e))?;
        self.battle_experience.remove(&id);
        Ok(combatant)
    }

    pub fn combatant(&self, id: CombatantId) -> Result<&Combatant> {
        self.roster.get(id)
    }

    /// Starts a new battle: resets per-battle experience ceilings and gives
    /// every living combatant a fresh set of actions.
    pub fn begin_battle(&mut self) {
        self.battle_experience.clear();
        for unit in self.roster.iter_mut().filter(|unit| unit.is_alive()) {
            unit.refresh_actions();
        }
        debug!(combatants = self.roster.len(), "battle started");
    }

    /// Experience `unit` has earned since the last [`Self::begin_battle`].
    pub fn experience_this_battle(&self, unit: CombatantId) -> u64 {
        self.battle_experience.get(&unit).copied().unwrap_or(0)
    }

    // ========================================================================
    // Ledger
    // ========================================================================

    /// Appends `outcome` to the ledger and publishes the updated summary.
    ///
    /// Both participants must be on the roster. Returns the battle count.
    pub fn record_battle_outcome(&mut self, outcome: &BattleOutcome) -> Result<u64> {
        for id in [outcome.attacker(), outcome.target()] {
            self.roster
                .get(id)
                .map_err(|e| rejected("record_battle_outcome", e))?;
        }

        let battle_count = self.ledger.append(*outcome);
        let summary = self.ledger.statistics().summary();
        debug!(
            attacker = %outcome.attacker(),
            target = %outcome.target(),
            damage = outcome.damage(),
            class = %outcome.class(),
            battle_count,
            "battle outcome recorded"
        );

        self.events.publish(BattleEvent::BattleResultRecorded {
            outcome: *outcome,
            battle_count,
            summary,
        });
        Ok(battle_count)
    }
}

impl std::fmt::Debug for BattleProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleProcessor")
            .field("config", &self.config)
            .field("roster", &self.roster)
            .field("ledger_len", &self.ledger.len())
            .field("battle_experience", &self.battle_experience)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::BattleError;
    use crate::events::Topic;

    #[test]
    fn record_requires_known_participants() {
        let mut processor = processor([player(1, 1)]);
        let outcome = BattleOutcome::builder()
            .attacker(CombatantId(1))
            .target(CombatantId(9))
            .damage(3)
            .build()
            .unwrap();

        assert_eq!(
            processor.record_battle_outcome(&outcome),
            Err(BattleError::UnknownCombatant(CombatantId(9)))
        );
        assert!(processor.ledger().is_empty());
    }

    #[test]
    fn record_publishes_summary() {
        let mut processor = processor([player(1, 1), enemy(2, 10)]);
        let mut ledger_events = processor.events().subscribe(Topic::Ledger);
        let outcome = BattleOutcome::builder()
            .attacker(CombatantId(1))
            .target(CombatantId(2))
            .damage(6)
            .critical(true)
            .build()
            .unwrap();

        assert_eq!(processor.record_battle_outcome(&outcome), Ok(1));
        match ledger_events.try_recv() {
            Ok(BattleEvent::BattleResultRecorded {
                battle_count,
                summary,
                ..
            }) => {
                assert_eq!(battle_count, 1);
                assert_eq!(summary.crits, 1);
                assert_eq!(summary.total_damage, 6);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn duplicate_combatants_are_rejected() {
        let mut processor = processor([player(1, 1)]);
        assert_eq!(
            processor.add_combatant(player(1, 2)),
            Err(BattleError::DuplicateCombatant(CombatantId(1)))
        );
    }
}
