//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::BattleEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Damage, defeats and status expiry
    Combat,
    /// Experience and level-ups
    Progression,
    /// Victory / defeat conditions
    Condition,
    /// Ledger appends
    Ledger,
    /// Cosmetic cleanup requests
    Cleanup,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Combat,
        Topic::Progression,
        Topic::Condition,
        Topic::Ledger,
        Topic::Cleanup,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

impl BattleEvent {
    pub fn topic(&self) -> Topic {
        match self {
            BattleEvent::DamageApplied { .. }
            | BattleEvent::UnitDefeated { .. }
            | BattleEvent::StatusExpired { .. } => Topic::Combat,
            BattleEvent::ExperienceGranted { .. } | BattleEvent::UnitLevelUp { .. } => {
                Topic::Progression
            }
            BattleEvent::VictoryConditionMet { .. } | BattleEvent::DefeatConditionMet { .. } => {
                Topic::Condition
            }
            BattleEvent::BattleResultRecorded { .. } => Topic::Ledger,
            BattleEvent::UnitCleanup { .. } => Topic::Cleanup,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels are created up front for every topic, so
/// publishing and subscribing never fail. Receivers can be drained with
/// `try_recv` from synchronous code.
pub struct EventBus {
    channels: Arc<[broadcast::Sender<BattleEvent>; Topic::ALL.len()]>,
}

impl EventBus {
    /// Default number of buffered events per topic.
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic (at least 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(std::array::from_fn(|_| broadcast::channel(capacity).0)),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<BattleEvent> {
        &self.channels[topic.index()]
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: BattleEvent) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BattleEvent> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic, in request order.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> Vec<(Topic, broadcast::Receiver<BattleEvent>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for topic in Topic::ALL {
            map.entry(&topic, &self.subscriber_count(topic));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{CombatantId, StatusEffectKind};
    use tokio::sync::broadcast::error::TryRecvError;

    fn expired(unit: u32) -> BattleEvent {
        BattleEvent::StatusExpired {
            unit: CombatantId(unit),
            kind: StatusEffectKind::Poison,
        }
    }

    #[test]
    fn topics_index_their_own_channel() {
        for (i, topic) in Topic::ALL.into_iter().enumerate() {
            assert_eq!(topic.index(), i);
        }
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(expired(1));
        assert_eq!(bus.subscriber_count(Topic::Combat), 0);
    }

    #[test]
    fn subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut combat = bus.subscribe(Topic::Combat);
        let mut cleanup = bus.subscribe(Topic::Cleanup);

        bus.publish(expired(1));

        assert_eq!(combat.try_recv(), Ok(expired(1)));
        assert_eq!(combat.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(cleanup.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn clones_share_channels() {
        let bus = EventBus::with_capacity(0);
        let mut rx = bus.clone().subscribe(Topic::Combat);
        bus.publish(expired(2));
        assert_eq!(rx.try_recv(), Ok(expired(2)));
    }

    #[tokio::test]
    async fn async_receivers_work_too() {
        let bus = EventBus::default();
        let mut receivers = bus.subscribe_multiple(&[Topic::Combat, Topic::Ledger]);
        bus.publish(expired(3));

        let (topic, rx) = &mut receivers[0];
        assert_eq!(*topic, Topic::Combat);
        assert_eq!(rx.recv().await.ok(), Some(expired(3)));
    }
}
