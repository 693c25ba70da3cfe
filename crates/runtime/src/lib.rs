//! Stateful battle resolution on top of `battle-core`.
//!
//! This crate owns the mutable half of a battle: the roster of combatants, the
//! outcome processor that applies damage, defeat, experience and status ticks,
//! the append-only ledger, and the topic-based event bus that carries every
//! notification out. Consumers construct a [`BattleProcessor`] with a
//! [`BattleConfig`](battle_core::BattleConfig) and an [`EventBus`], subscribe
//! to the topics they care about, and drive it from their turn loop.
//!
//! Modules are organized by responsibility:
//! - [`processor`] hosts the outcome state machine
//! - [`ledger`] records outcomes and aggregate statistics
//! - [`events`] provides topic-based event bus for notification routing
//! - [`roster`] stores the encounter's combatants
pub mod error;
pub mod events;
pub mod ledger;
pub mod processor;
pub mod roster;

pub use error::{BattleError, Result};
pub use events::{BattleEvent, ConditionReason, EventBus, HealthThreshold, Topic};
pub use ledger::{
    AggregateStatistics, BattleLedger, CombatantRecord, LedgerSnapshot, StatisticsSummary,
};
pub use processor::{BattleProcessor, ConditionCheck, ExperienceGrant, PostBattleReport};
pub use roster::{FactionCounts, Headcount, Roster};
