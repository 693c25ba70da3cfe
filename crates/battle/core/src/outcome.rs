//! Resolved attack outcomes.
//!
//! A [`BattleOutcome`] is created once per resolved attack and never mutated
//! afterwards. Construction goes through [`BattleOutcomeBuilder`] so that
//! required fields are checked before the outcome reaches the ledger.

use std::fmt;

use crate::combatant::CombatantId;
use crate::error::{CoreError, ErrorKind};

/// Logical battle clock supplied by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// How an attack landed, derived from the outcome flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HitClass {
    Hit,
    /// Connected for zero damage.
    Miss,
    Evaded,
}

/// Errors raised by [`BattleOutcomeBuilder::build`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OutcomeError {
    #[error("battle outcome is missing its {0}")]
    MissingField(&'static str),

    #[error("inconsistent battle outcome: {0}")]
    Inconsistent(&'static str),
}

impl CoreError for OutcomeError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            OutcomeError::MissingField(_) => "OUTCOME_MISSING_FIELD",
            OutcomeError::Inconsistent(_) => "OUTCOME_INCONSISTENT",
        }
    }
}

/// Immutable record of one resolved attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOutcome {
    attacker: CombatantId,
    target: CombatantId,
    damage: u32,
    overkill: u32,
    critical: bool,
    evaded: bool,
    target_defeated: bool,
    timestamp: Tick,
}

impl BattleOutcome {
    pub fn builder() -> BattleOutcomeBuilder {
        BattleOutcomeBuilder::default()
    }

    pub fn attacker(&self) -> CombatantId {
        self.attacker
    }

    pub fn target(&self) -> CombatantId {
        self.target
    }

    /// Final damage dealt (already clamped to the target's HP).
    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn overkill(&self) -> u32 {
        self.overkill
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub fn is_evaded(&self) -> bool {
        self.evaded
    }

    pub fn target_defeated(&self) -> bool {
        self.target_defeated
    }

    pub fn timestamp(&self) -> Tick {
        self.timestamp
    }

    pub fn class(&self) -> HitClass {
        if self.evaded {
            HitClass::Evaded
        } else if self.damage == 0 {
            HitClass::Miss
        } else {
            HitClass::Hit
        }
    }
}

/// Builder for [`BattleOutcome`]. Attacker, target and damage are required.
#[derive(Clone, Debug, Default)]
pub struct BattleOutcomeBuilder {
    attacker: Option<CombatantId>,
    target: Option<CombatantId>,
    damage: Option<u32>,
    overkill: u32,
    critical: bool,
    evaded: bool,
    target_defeated: bool,
    timestamp: Tick,
}

impl BattleOutcomeBuilder {
    pub fn attacker(mut self, attacker: CombatantId) -> Self {
        self.attacker = Some(attacker);
        self
    }

    pub fn target(mut self, target: CombatantId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn damage(mut self, damage: u32) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn overkill(mut self, overkill: u32) -> Self {
        self.overkill = overkill;
        self
    }

    pub fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    pub fn evaded(mut self, evaded: bool) -> Self {
        self.evaded = evaded;
        self
    }

    pub fn target_defeated(mut self, defeated: bool) -> Self {
        self.target_defeated = defeated;
        self
    }

    pub fn at(mut self, timestamp: Tick) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn build(self) -> Result<BattleOutcome, OutcomeError> {
        let attacker = self.attacker.ok_or(OutcomeError::MissingField("attacker"))?;
        let target = self.target.ok_or(OutcomeError::MissingField("target"))?;
        let damage = self.damage.ok_or(OutcomeError::MissingField("damage"))?;

        if self.evaded && (damage > 0 || self.target_defeated) {
            return Err(OutcomeError::Inconsistent(
                "an evaded attack cannot deal damage or defeat its target",
            ));
        }
        if self.evaded && self.critical {
            return Err(OutcomeError::Inconsistent("an evaded attack cannot be critical"));
        }

        Ok(BattleOutcome {
            attacker,
            target,
            damage,
            overkill: self.overkill,
            critical: self.critical,
            evaded: self.evaded,
            target_defeated: self.target_defeated,
            timestamp: self.timestamp,
        })
    }
}
