//! Topic-based event bus for battle notifications.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need. The bus is constructed explicitly and handed to the
//! processor; there is no global listener registry.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::{BattleEvent, ConditionReason, HealthThreshold};
