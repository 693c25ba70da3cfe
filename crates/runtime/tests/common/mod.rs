#![allow(dead_code)]

use battle_core::{
    BattleConfig, Combatant, CombatantId, Faction, Position, Progression, StatBlock,
};
use battle_runtime::{BattleEvent, BattleProcessor, EventBus};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn hero(id: u32, level: u32, position: Position) -> Combatant {
    Combatant::new(
        CombatantId(id),
        Faction::Player,
        position,
        StatBlock::new(30, 10, 8, 6, 5),
    )
    .with_progression(Progression::new(level, 0))
}

pub fn monster(id: u32, hp: u32, level: u32, position: Position) -> Combatant {
    Combatant::new(
        CombatantId(id),
        Faction::Enemy,
        position,
        StatBlock::new(hp, 0, 5, 3, 4),
    )
    .with_progression(Progression::new(level, 0))
}

pub fn processor_with(units: impl IntoIterator<Item = Combatant>) -> BattleProcessor {
    init_tracing();
    let mut processor = BattleProcessor::new(BattleConfig::default(), EventBus::new());
    for unit in units {
        processor.add_combatant(unit).expect("fixture ids are unique");
    }
    processor.begin_battle();
    processor
}

/// Drains every event currently buffered on `rx`.
pub fn drain(rx: &mut broadcast::Receiver<BattleEvent>) -> Vec<BattleEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
