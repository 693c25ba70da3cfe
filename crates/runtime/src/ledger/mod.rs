//! Append-only battle history.
//!
//! The ledger keeps the resolved [`BattleOutcome`]s in order, optionally
//! bounded (oldest evicted first), together with the [`AggregateStatistics`]
//! derived from every outcome ever appended. Entries are never edited; the
//! only destructive operation is a full [`BattleLedger::reset`].

mod stats;

pub use stats::{AggregateStatistics, CombatantRecord, StatisticsSummary};

use std::collections::VecDeque;

use battle_core::{BattleOutcome, CombatantId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default)]
pub struct BattleLedger {
    outcomes: VecDeque<BattleOutcome>,
    capacity: Option<usize>,
    evicted: u64,
    statistics: AggregateStatistics,
}

impl BattleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger retaining at most `capacity` outcomes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Appends an outcome and returns the number of outcomes recorded so far,
    /// including evicted ones.
    pub fn append(&mut self, outcome: BattleOutcome) -> u64 {
        self.statistics.record_outcome(&outcome);
        self.outcomes.push_back(outcome);

        if let Some(capacity) = self.capacity {
            while self.outcomes.len() > capacity {
                self.outcomes.pop_front();
                self.evicted += 1;
            }
        }
        self.statistics.battles
    }

    pub fn record_experience(&mut self, unit: CombatantId, amount: u64) {
        self.statistics.record_experience(unit, amount);
    }

    /// The last `count` outcomes, oldest first.
    pub fn recent(&self, count: usize) -> Vec<BattleOutcome> {
        let skip = self.outcomes.len().saturating_sub(count);
        self.outcomes.iter().skip(skip).copied().collect()
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &BattleOutcome> {
        self.outcomes.iter()
    }

    pub fn statistics(&self) -> &AggregateStatistics {
        &self.statistics
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Drops every outcome and zeroes all counters. Capacity is kept.
    pub fn reset(&mut self) {
        self.outcomes.clear();
        self.evicted = 0;
        self.statistics = AggregateStatistics::default();
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            outcomes: self.outcomes.iter().copied().collect(),
            evicted: self.evicted,
            statistics: self.statistics.clone(),
        }
    }
}

/// Owned, read-only copy of a ledger at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub outcomes: Vec<BattleOutcome>,
    /// Outcomes dropped by the capacity bound before this snapshot.
    pub evicted: u64,
    pub statistics: AggregateStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::Tick;

    fn outcome(tick: u64, damage: u32) -> BattleOutcome {
        BattleOutcome::builder()
            .attacker(CombatantId(1))
            .target(CombatantId(2))
            .damage(damage)
            .at(Tick(tick))
            .build()
            .unwrap()
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut ledger = BattleLedger::new();
        for tick in 0..5 {
            ledger.append(outcome(tick, 1));
        }
        let recent: Vec<_> = ledger.recent(2).iter().map(|o| o.timestamp()).collect();
        assert_eq!(recent, vec![Tick(3), Tick(4)]);
        assert_eq!(ledger.recent(50).len(), 5);
    }

    #[test]
    fn bounded_ledger_evicts_oldest_but_keeps_counters() {
        let mut ledger = BattleLedger::with_capacity(2);
        for tick in 0..4 {
            ledger.append(outcome(tick, 5));
        }

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.outcomes.len(), 2);
        assert_eq!(snapshot.outcomes[0].timestamp(), Tick(2));
        assert_eq!(snapshot.evicted, 2);
        assert_eq!(snapshot.statistics.battles, 4);
        assert_eq!(snapshot.statistics.total_damage, 20);
    }

    #[test]
    fn snapshot_is_detached() {
        let mut ledger = BattleLedger::new();
        ledger.append(outcome(0, 3));
        let snapshot = ledger.snapshot();

        ledger.append(outcome(1, 3));
        assert_eq!(snapshot.outcomes.len(), 1);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn reset_clears_everything() {
        let mut ledger = BattleLedger::with_capacity(3);
        ledger.append(outcome(0, 3));
        ledger.record_experience(CombatantId(1), 10);
        ledger.reset();

        assert!(ledger.is_empty());
        assert_eq!(ledger.statistics(), &AggregateStatistics::default());
        assert_eq!(ledger.capacity(), Some(3));
    }
}
