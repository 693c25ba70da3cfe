/// Battle configuration constants and tunable parameters.
///
/// Split into the three concerns that consume it: experience awards, defeat
/// side effects and targeting geometry. Every field has a documented default
/// exposed as an associated constant on the owning struct.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    pub experience: ExperienceConfig,
    pub defeat: DefeatConfig,
    pub targeting: TargetingConfig,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 8;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_experience(mut self, experience: ExperienceConfig) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_defeat(mut self, defeat: DefeatConfig) -> Self {
        self.defeat = defeat;
        self
    }

    pub fn with_targeting(mut self, targeting: TargetingConfig) -> Self {
        self.targeting = targeting;
        self
    }
}

/// Experience award tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExperienceConfig {
    /// Base award for landing a hit.
    pub attack_hit: u32,
    /// Flat bonus added when the outcome records a kill.
    pub defeat_bonus: u32,
    /// Per-level scaling factor `k` in `1 + Δlevel·k`.
    pub level_difference_multiplier: f64,
    /// Ceiling on experience a single combatant may gain in one battle.
    pub max_per_battle: u32,
    /// Flat award for support actions (heals, buffs).
    pub support: u32,
    /// Whether damage past zero HP is converted into extra experience.
    pub grant_overkill: bool,
    /// Hits dealing less than this earn no hit experience.
    pub minimum_damage: u32,
}

impl ExperienceConfig {
    pub const DEFAULT_ATTACK_HIT: u32 = 10;
    pub const DEFAULT_DEFEAT_BONUS: u32 = 50;
    pub const DEFAULT_LEVEL_DIFFERENCE_MULTIPLIER: f64 = 0.1;
    pub const DEFAULT_MAX_PER_BATTLE: u32 = 200;
    pub const DEFAULT_SUPPORT: u32 = 15;
    pub const DEFAULT_MINIMUM_DAMAGE: u32 = 1;

    /// Lower bound on the level-difference scale factor, in thousandths.
    pub const MIN_LEVEL_SCALE_PER_MILLE: u64 = 100;
    /// Critical-hit multiplier as `numerator / denominator` (×1.5).
    pub const CRITICAL_MULTIPLIER: (u64, u64) = (3, 2);

    pub fn new() -> Self {
        Self {
            attack_hit: Self::DEFAULT_ATTACK_HIT,
            defeat_bonus: Self::DEFAULT_DEFEAT_BONUS,
            level_difference_multiplier: Self::DEFAULT_LEVEL_DIFFERENCE_MULTIPLIER,
            max_per_battle: Self::DEFAULT_MAX_PER_BATTLE,
            support: Self::DEFAULT_SUPPORT,
            grant_overkill: false,
            minimum_damage: Self::DEFAULT_MINIMUM_DAMAGE,
        }
    }

    pub fn with_max_per_battle(mut self, max_per_battle: u32) -> Self {
        self.max_per_battle = max_per_battle;
        self
    }

    pub fn with_level_difference_multiplier(mut self, multiplier: f64) -> Self {
        self.level_difference_multiplier = multiplier;
        self
    }

    pub fn with_overkill(mut self, grant_overkill: bool) -> Self {
        self.grant_overkill = grant_overkill;
        self
    }

    /// Scale factor for a level gap in thousandths: `max(0.1, 1 + Δlevel·k)`.
    ///
    /// `level_delta` is `target_level - recipient_level`, so punching up pays more.
    /// `k` is rounded to three decimals so the product is exact.
    pub fn level_scale_per_mille(&self, level_delta: i64) -> u64 {
        let k = (self.level_difference_multiplier * 1000.0).round() as i64;
        let scale = level_delta.saturating_mul(k).saturating_add(1000);
        u64::try_from(scale)
            .unwrap_or(0)
            .max(Self::MIN_LEVEL_SCALE_PER_MILLE)
    }
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Side effects applied when a combatant is defeated.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefeatConfig {
    /// Mark the unit as having acted and moved.
    pub mark_as_acted: bool,
    /// Drop every status effect on the unit.
    pub clear_status_effects: bool,
    /// Zero the remaining attack/move counters.
    pub exhaust_actions: bool,
    /// Publish the `unit-defeated` notification.
    pub notify: bool,
}

impl DefeatConfig {
    pub fn new() -> Self {
        Self {
            mark_as_acted: true,
            clear_status_effects: true,
            exhaust_actions: true,
            notify: true,
        }
    }
}

impl Default for DefeatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Targeting geometry switches.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TargetingConfig {
    /// Ranges above this are clamped before pattern generation.
    pub max_calculation_range: u32,
    /// Impassable tiles block ranged line of sight.
    pub obstacle_blocking: bool,
    /// Occupied tiles block ranged line of sight.
    pub unit_blocking: bool,
    /// Melee patterns include the four diagonal neighbours.
    pub diagonal_attack_allowed: bool,
}

impl TargetingConfig {
    pub const DEFAULT_MAX_CALCULATION_RANGE: u32 = 20;

    pub fn new() -> Self {
        Self {
            max_calculation_range: Self::DEFAULT_MAX_CALCULATION_RANGE,
            obstacle_blocking: true,
            unit_blocking: false,
            diagonal_attack_allowed: true,
        }
    }

    pub fn with_max_calculation_range(mut self, max_calculation_range: u32) -> Self {
        self.max_calculation_range = max_calculation_range;
        self
    }

    pub fn with_obstacle_blocking(mut self, enabled: bool) -> Self {
        self.obstacle_blocking = enabled;
        self
    }

    pub fn with_unit_blocking(mut self, enabled: bool) -> Self {
        self.unit_blocking = enabled;
        self
    }

    pub fn with_diagonals(mut self, allowed: bool) -> Self {
        self.diagonal_attack_allowed = allowed;
        self
    }

    /// Effective range cap; a configured cap of zero still permits range 1.
    pub fn range_cap(&self) -> u32 {
        self.max_calculation_range.max(1)
    }
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self::new()
    }
}
