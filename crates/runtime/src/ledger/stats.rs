//! Aggregate counters derived from recorded outcomes.

use std::collections::BTreeMap;

use battle_core::{BattleOutcome, CombatantId, HitClass};
use serde::{Deserialize, Serialize};

/// Running totals for a single combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantRecord {
    pub damage_dealt: u64,
    pub damage_received: u64,
    pub hits: u32,
    pub misses: u32,
    pub evasions: u32,
    pub crits: u32,
    pub kills: u32,
    pub defeats: u32,
    pub experience_gained: u64,
}

/// Global counters plus one [`CombatantRecord`] per participant.
///
/// Counters only ever grow. Evicting outcomes from a bounded ledger does not
/// touch them; only a full reset does.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStatistics {
    pub battles: u64,
    pub total_damage: u64,
    pub total_experience: u64,
    pub defeats: u64,
    pub crits: u64,
    pub hits: u64,
    pub misses: u64,
    pub evasions: u64,
    /// Rolling mean of damage per recorded outcome.
    pub average_damage: f64,
    pub combatants: BTreeMap<CombatantId, CombatantRecord>,
}

impl AggregateStatistics {
    pub fn record_outcome(&mut self, outcome: &BattleOutcome) {
        let damage = u64::from(outcome.damage());

        self.battles += 1;
        self.total_damage += damage;
        self.average_damage += (damage as f64 - self.average_damage) / self.battles as f64;

        match outcome.class() {
            HitClass::Hit => self.hits += 1,
            HitClass::Miss => self.misses += 1,
            HitClass::Evaded => self.evasions += 1,
        }
        if outcome.is_critical() {
            self.crits += 1;
        }
        if outcome.target_defeated() {
            self.defeats += 1;
        }

        let attacker = self.combatants.entry(outcome.attacker()).or_default();
        attacker.damage_dealt += damage;
        match outcome.class() {
            HitClass::Hit => attacker.hits += 1,
            HitClass::Miss => attacker.misses += 1,
            HitClass::Evaded => {}
        }
        if outcome.is_critical() {
            attacker.crits += 1;
        }
        if outcome.target_defeated() {
            attacker.kills += 1;
        }

        let target = self.combatants.entry(outcome.target()).or_default();
        target.damage_received += damage;
        if outcome.is_evaded() {
            target.evasions += 1;
        }
        if outcome.target_defeated() {
            target.defeats += 1;
        }
    }

    pub fn record_experience(&mut self, unit: CombatantId, amount: u64) {
        self.total_experience += amount;
        self.combatants.entry(unit).or_default().experience_gained += amount;
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&CombatantRecord> {
        self.combatants.get(&id)
    }

    pub fn summary(&self) -> StatisticsSummary {
        StatisticsSummary {
            battles: self.battles,
            total_damage: self.total_damage,
            total_experience: self.total_experience,
            defeats: self.defeats,
            crits: self.crits,
            average_damage: self.average_damage,
        }
    }
}

/// Headline numbers attached to `battle-result-recorded` notifications.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub battles: u64,
    pub total_damage: u64,
    pub total_experience: u64,
    pub defeats: u64,
    pub crits: u64,
    pub average_damage: f64,
}
