use crate::error::{CoreError, ErrorKind};

use super::CombatantId;
use super::status::StatusEffectKind;

/// Errors raised while mutating a single combatant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantError {
    #[error("status effect {0} has zero duration")]
    ZeroDuration(StatusEffectKind),

    #[error("status effect list is full ({capacity} entries)")]
    StatusCapacity { capacity: usize },

    #[error("combatant {0} has no battle progression (basic unit)")]
    NotBattleCapable(CombatantId),
}

impl CoreError for CombatantError {
    fn kind(&self) -> ErrorKind {
        match self {
            CombatantError::ZeroDuration(_) => ErrorKind::Validation,
            CombatantError::StatusCapacity { .. } | CombatantError::NotBattleCapable(_) => {
                ErrorKind::State
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CombatantError::ZeroDuration(_) => "COMBATANT_ZERO_DURATION",
            CombatantError::StatusCapacity { .. } => "COMBATANT_STATUS_CAPACITY",
            CombatantError::NotBattleCapable(_) => "COMBATANT_NOT_BATTLE_CAPABLE",
        }
    }
}
