//! Deterministic battle rules and data types for tactical grid combat.
//!
//! `battle-core` defines the pure half of battle resolution: grid geometry,
//! weapon range patterns, line-of-sight targeting, the combatant data model,
//! leveling curves and the shared error taxonomy. Nothing in this crate logs,
//! performs I/O or reads a clock; the stateful outcome processor lives in
//! `battle-runtime` and drives everything through the types re-exported here.
pub mod combatant;
pub mod config;
pub mod error;
pub mod grid;
pub mod leveling;
pub mod outcome;
pub mod targeting;
pub mod weapon;

pub use combatant::{
    ActionFlags, BattleCapability, Combatant, CombatantError, CombatantId, DamageApplication,
    Faction, LifeState, Progression, StatBlock, StatGrowth, StatusApplication, StatusEffect,
    StatusEffectKind, StatusEffects, TickEffect,
};
pub use config::{BattleConfig, DefeatConfig, ExperienceConfig, TargetingConfig};
pub use error::{CoreError, ErrorKind, ErrorSeverity, OperationStatus};
pub use grid::{GridBounds, GridOracle, Offset, Position, Terrain, TileGrid, line_between};
pub use leveling::{
    AwardContext, ExperienceTable, LevelCurve, LevelingError, LinearCurve, cap_award,
    scaled_award,
};
pub use outcome::{BattleOutcome, BattleOutcomeBuilder, HitClass, OutcomeError, Tick};
pub use targeting::{
    DistanceMetric, RangePattern, TargetingError, TargetingResolver, TargetingResult,
    WeaponArchetype, effective_range, generate_pattern, pattern_for_weapon, validate_range,
};
pub use weapon::{EquipmentOracle, WeaponProfile};
