//! Post-battle update: status ticks, condition check, action reset, cleanup.
//!
//! The four passes run in order over the whole roster. The first failure
//! aborts the remaining passes and is returned to the caller.

use battle_core::{BattleOutcome, CombatantId, TickEffect, Tick};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::BattleProcessor;
use crate::error::{BattleError, Result, rejected};
use crate::events::{BattleEvent, ConditionReason};
use crate::roster::FactionCounts;

/// Result of the condition pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionCheck {
    pub counts: FactionCounts,
    pub victory: bool,
    pub defeat: bool,
}

/// What [`BattleProcessor::update_post_battle`] did, pass by pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostBattleReport {
    /// Effects applied during the status tick.
    pub effects_applied: usize,
    /// Effects that reached zero duration and were removed.
    pub effects_expired: usize,
    /// Units defeated by damage-over-time during the tick.
    pub defeated_by_effects: Vec<CombatantId>,
    pub conditions: ConditionCheck,
    /// Living units whose actions were refreshed.
    pub refreshed: usize,
    /// Defeated units announced for cleanup.
    pub cleaned_up: Vec<CombatantId>,
}

impl BattleProcessor {
    /// Runs the post-battle passes after `outcome` has been resolved.
    pub fn update_post_battle(&mut self, outcome: &BattleOutcome) -> Result<PostBattleReport> {
        if self.roster.is_empty() {
            return Err(rejected("update_post_battle", BattleError::EmptyRoster));
        }

        let mut report = PostBattleReport::default();
        self.tick_status_effects(&mut report)?;
        report.conditions = self.check_conditions(outcome.timestamp());
        report.refreshed = self.reset_action_availability();
        report.cleaned_up = self.announce_cleanup();

        debug!(
            at = %outcome.timestamp(),
            applied = report.effects_applied,
            expired = report.effects_expired,
            refreshed = report.refreshed,
            "post-battle update complete"
        );
        Ok(report)
    }

    /// Pass (a): apply every effect once, then advance durations.
    ///
    /// Living units have their effects applied in list order; a unit that
    /// dies mid-list stops applying. Every unit's durations advance by one.
    fn tick_status_effects(&mut self, report: &mut PostBattleReport) -> Result<()> {
        for id in self.roster.ids() {
            let (alive, effects) = {
                let unit = self.roster.get(id)?;
                (
                    unit.is_alive(),
                    unit.status_effects.iter().copied().collect::<Vec<_>>(),
                )
            };

            if alive {
                for effect in effects {
                    match effect.tick_effect() {
                        TickEffect::Damage(amount) => {
                            let applied =
                                self.apply_damage(id, i64::from(amount), effect.source)?;
                            if applied.defeated_now {
                                report.defeated_by_effects.push(id);
                            }
                        }
                        TickEffect::Heal(amount) => {
                            self.heal(id, amount)?;
                        }
                        TickEffect::None => {}
                    }
                    report.effects_applied += 1;
                    if self.roster.get(id)?.is_defeated() {
                        break;
                    }
                }
            }

            let expired = self.roster.get_mut(id)?.status_effects.advance();
            report.effects_expired += expired.len();
            for effect in expired {
                debug!(unit = %id, kind = %effect.kind, "status effect expired");
                self.events.publish(BattleEvent::StatusExpired {
                    unit: id,
                    kind: effect.kind,
                });
            }
        }
        Ok(())
    }

    /// Pass (b): count survivors per faction and signal wipe-outs.
    ///
    /// Only factions that fielded units can trigger a condition. The
    /// processor signals; ending the encounter is the caller's decision.
    fn check_conditions(&self, at: Tick) -> ConditionCheck {
        let counts = self.roster.tally();
        let check = ConditionCheck {
            counts,
            victory: counts.enemy.wiped_out(),
            defeat: counts.player.wiped_out(),
        };

        if check.victory {
            let reason = ConditionReason::AllEnemiesDefeated;
            info!(%at, reason = reason.as_str(), "victory condition met");
            self.events.publish(BattleEvent::VictoryConditionMet { reason, counts, at });
        }
        if check.defeat {
            let reason = ConditionReason::AllPlayersDefeated;
            info!(%at, reason = reason.as_str(), "defeat condition met");
            self.events.publish(BattleEvent::DefeatConditionMet { reason, counts, at });
        }
        check
    }

    /// Pass (c): living units regain their action slots, defeated units get none.
    fn reset_action_availability(&mut self) -> usize {
        let mut refreshed = 0;
        for unit in self.roster.iter_mut() {
            if unit.is_alive() {
                unit.refresh_actions();
                refreshed += 1;
            } else {
                unit.exhaust_actions();
            }
        }
        refreshed
    }

    /// Pass (d): one cleanup notification per defeated unit.
    fn announce_cleanup(&self) -> Vec<CombatantId> {
        let mut cleaned = Vec::new();
        for unit in self.roster.iter().filter(|unit| unit.is_defeated()) {
            self.events.publish(BattleEvent::UnitCleanup {
                unit: unit.id,
                faction: unit.faction,
                position: unit.position,
            });
            cleaned.push(unit.id);
        }
        cleaned
    }
}
