//! Unified error type surfaced by the battle processor.
//!
//! Wraps the per-domain errors of `battle-core` and adds the roster and state
//! checks that only make sense once combatants are owned by a processor.
use battle_core::{
    CombatantError, CombatantId, CoreError, ErrorKind, Faction, LevelingError, OutcomeError,
    TargetingError,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BattleError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("unknown combatant {0}")]
    UnknownCombatant(CombatantId),

    #[error("combatant {0} is already on the roster")]
    DuplicateCombatant(CombatantId),

    #[error("damage amount must not be negative (got {0})")]
    NegativeDamage(i64),

    #[error("battle has no combatants")]
    EmptyRoster,

    #[error("combatant {unit} is not defeated ({hp} HP left)")]
    NotDefeated { unit: CombatantId, hp: u32 },

    #[error("combatant {0} is defeated")]
    Defeated(CombatantId),

    #[error("combatant {unit} belongs to {faction}, only the player side earns experience")]
    NotPlayer { unit: CombatantId, faction: Faction },

    #[error("level-up for {unit} must raise the level (old {old}, new {new})")]
    InvalidLevelUp { unit: CombatantId, old: u32, new: u32 },

    #[error(transparent)]
    Outcome(#[from] OutcomeError),

    #[error(transparent)]
    Combatant(#[from] CombatantError),

    #[error(transparent)]
    Targeting(#[from] TargetingError),

    #[error(transparent)]
    Leveling(#[from] LevelingError),
}

impl CoreError for BattleError {
    fn kind(&self) -> ErrorKind {
        match self {
            BattleError::UnknownCombatant(_)
            | BattleError::DuplicateCombatant(_)
            | BattleError::NegativeDamage(_)
            | BattleError::EmptyRoster
            | BattleError::InvalidLevelUp { .. } => ErrorKind::Validation,
            BattleError::NotDefeated { .. }
            | BattleError::Defeated(_)
            | BattleError::NotPlayer { .. } => ErrorKind::State,
            BattleError::Outcome(e) => e.kind(),
            BattleError::Combatant(e) => e.kind(),
            BattleError::Targeting(e) => e.kind(),
            BattleError::Leveling(e) => e.kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            BattleError::UnknownCombatant(_) => "BATTLE_UNKNOWN_COMBATANT",
            BattleError::DuplicateCombatant(_) => "BATTLE_DUPLICATE_COMBATANT",
            BattleError::NegativeDamage(_) => "BATTLE_NEGATIVE_DAMAGE",
            BattleError::EmptyRoster => "BATTLE_EMPTY_ROSTER",
            BattleError::NotDefeated { .. } => "BATTLE_NOT_DEFEATED",
            BattleError::Defeated(_) => "BATTLE_DEFEATED",
            BattleError::NotPlayer { .. } => "BATTLE_NOT_PLAYER",
            BattleError::InvalidLevelUp { .. } => "BATTLE_INVALID_LEVEL_UP",
            BattleError::Outcome(e) => e.error_code(),
            BattleError::Combatant(e) => e.error_code(),
            BattleError::Targeting(e) => e.error_code(),
            BattleError::Leveling(e) => e.error_code(),
        }
    }
}

/// Logs a rejected operation and hands the error back for propagation.
pub(crate) fn rejected(operation: &'static str, error: BattleError) -> BattleError {
    tracing::warn!(
        operation,
        code = error.error_code(),
        kind = %error.kind(),
        "{error}"
    );
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{ErrorSeverity, OperationStatus};

    #[test]
    fn taxonomy() {
        assert_eq!(BattleError::NegativeDamage(-1).kind(), ErrorKind::Validation);
        assert_eq!(
            BattleError::NotDefeated {
                unit: CombatantId(1),
                hp: 3
            }
            .kind(),
            ErrorKind::State
        );
        let range = BattleError::from(TargetingError::RangeExceedsCap {
            requested: 30,
            cap: 20,
        });
        assert_eq!(range.kind(), ErrorKind::Range);
        assert_eq!(range.error_code(), "TARGETING_RANGE_EXCEEDS_CAP");
        assert_eq!(range.severity(), ErrorSeverity::Recoverable);
    }

    #[test]
    fn operation_status_flattens_battle_errors() {
        let result: Result<()> = Err(BattleError::Defeated(CombatantId(4)));
        let status = OperationStatus::from_result(&result);
        assert!(!status.success);
        assert_eq!(status.kind, Some(ErrorKind::State));
        assert_eq!(status.code, Some("BATTLE_DEFEATED"));
        assert_eq!(status.message.as_deref(), Some("combatant #4 is defeated"));
    }
}
