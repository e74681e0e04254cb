//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use battle_core::{BattleEvent, EventCategory};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Round lifecycle, grants, battle over
    Round,
    /// Health, deaths, statuses
    Unit,
    /// Mask lifecycle and deck economy
    Mask,
    /// Command lifecycle, steps, previews, input requests
    Action,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Round, Topic::Unit, Topic::Mask, Topic::Action];

    const fn index(self) -> usize {
        match self {
            Topic::Round => 0,
            Topic::Unit => 1,
            Topic::Mask => 2,
            Topic::Action => 3,
        }
    }
}

impl From<EventCategory> for Topic {
    fn from(category: EventCategory) -> Self {
        match category {
            EventCategory::Round => Topic::Round,
            EventCategory::Unit => Topic::Unit,
            EventCategory::Mask => Topic::Mask,
            EventCategory::Action => Topic::Action,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels are created up front, one per topic.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<[broadcast::Sender<BattleEvent>; 4]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL.map(|_| broadcast::channel(capacity).0);
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to the topic matching its category
    pub fn publish(&self, event: BattleEvent) {
        let topic = Topic::from(event.category());
        if self.channels[topic.index()].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BattleEvent> {
        self.channels[topic.index()].subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<BattleEvent>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Number of live receivers on `topic`.
    pub fn receiver_count(&self, topic: Topic) -> usize {
        self.channels[topic.index()].receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
