//! Battle notifications published by the processor.
//!
//! Every notification is fire-and-forget: the processor never reads anything
//! back from subscribers.

use battle_core::{
    BattleOutcome, CombatantId, Faction, Position, StatGrowth, StatusEffectKind, Tick,
};
use serde::{Deserialize, Serialize};

use crate::ledger::StatisticsSummary;
use crate::roster::FactionCounts;

/// High-level battle events, one variant per notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// HP was removed from a combatant.
    DamageApplied {
        target: CombatantId,
        /// HP actually removed.
        damage: u32,
        overkill: u32,
        previous_hp: u32,
        current_hp: u32,
        /// This hit performed the defeat transition.
        was_defeated: bool,
        source: Option<CombatantId>,
        threshold: HealthThreshold,
    },

    /// A combatant reached zero HP and its defeat side effects were applied.
    UnitDefeated {
        unit: CombatantId,
        faction: Faction,
        position: Position,
    },

    ExperienceGranted {
        unit: CombatantId,
        gained: u64,
        total: u64,
        leveled_up: bool,
        new_level: u32,
    },

    UnitLevelUp {
        unit: CombatantId,
        new_level: u32,
        old_level: u32,
        stat_increase: StatGrowth,
    },

    BattleResultRecorded {
        outcome: BattleOutcome,
        battle_count: u64,
        summary: StatisticsSummary,
    },

    /// Every enemy is down. The encounter is not ended by the processor.
    VictoryConditionMet {
        reason: ConditionReason,
        counts: FactionCounts,
        at: Tick,
    },

    /// Every player unit is down. The encounter is not ended by the processor.
    DefeatConditionMet {
        reason: ConditionReason,
        counts: FactionCounts,
        at: Tick,
    },

    /// Cosmetic removal request for a defeated combatant.
    UnitCleanup {
        unit: CombatantId,
        faction: Faction,
        position: Position,
    },

    /// A status effect ran out during a post-battle tick.
    StatusExpired {
        unit: CombatantId,
        kind: StatusEffectKind,
    },
}

/// Why a victory or defeat condition fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionReason {
    AllEnemiesDefeated,
    AllPlayersDefeated,
}

impl ConditionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionReason::AllEnemiesDefeated => "all enemies defeated",
            ConditionReason::AllPlayersDefeated => "all player units defeated",
        }
    }
}

/// Health bands reported with damage notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthThreshold {
    /// 100% HP
    Full,
    /// 75-99% HP
    Healthy,
    /// 25-74% HP
    Wounded,
    /// 1-24% HP
    Critical,
    /// 0 HP
    Defeated,
}

impl HealthThreshold {
    /// Calculate health threshold from current and max HP.
    pub fn from_hp(current: u32, max: u32) -> Self {
        if current == 0 {
            Self::Defeated
        } else if max == 0 {
            Self::Full
        } else {
            let percent = u64::from(current) * 100 / u64::from(max);
            match percent {
                100.. => Self::Full,
                75..=99 => Self::Healthy,
                25..=74 => Self::Wounded,
                _ => Self::Critical,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds() {
        assert_eq!(HealthThreshold::from_hp(10, 10), HealthThreshold::Full);
        assert_eq!(HealthThreshold::from_hp(8, 10), HealthThreshold::Healthy);
        assert_eq!(HealthThreshold::from_hp(5, 10), HealthThreshold::Wounded);
        assert_eq!(HealthThreshold::from_hp(2, 10), HealthThreshold::Critical);
        assert_eq!(HealthThreshold::from_hp(0, 10), HealthThreshold::Defeated);
    }
}
