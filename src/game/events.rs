//! Effect event bus
//!
//! The simulator publishes discrete presentation cues (hits, dodges, impacts,
//! knockouts, round starts). Consumers either drain the in-core queue once per
//! frame or hold a subscriber channel. Publishing never blocks: a full queue
//! drops its oldest entry and a full subscriber misses the event.

use std::collections::VecDeque;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};

use crate::game::state::CombatantId;
use crate::util::vec3::Vec3;

/// Discrete simulation events for renderers and audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectEvent {
    /// A round began (session start or post-knockout reset)
    RoundStart { round: u32 },
    /// A swing started
    AttackStarted { attacker: CombatantId },
    /// An attack landed
    Hit {
        attacker: CombatantId,
        target: CombatantId,
        damage: u32,
        remaining_health: u32,
    },
    /// Cosmetic evasive move
    Dodge {
        combatant: CombatantId,
        /// Normalised movement direction at the time of the dodge
        direction: Vec3,
    },
    /// Body-to-body collision
    Impact {
        /// Midpoint between the two bodies after separation
        point: Vec3,
        /// Contact normal pointing from player two toward player one
        normal: Vec3,
        speed_one: f32,
        speed_two: f32,
        /// Combatant awarded an impact point, if any
        scorer: Option<CombatantId>,
    },
    /// Health reached zero
    Knockout {
        winner: CombatantId,
        loser: CombatantId,
        round: u32,
    },
}

/// An event stamped with the tick that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmittedEvent {
    pub tick: u64,
    pub time: f64,
    pub event: EffectEvent,
}

/// Outbound event queue with optional channel subscribers
pub struct EventBus {
    queue: VecDeque<EmittedEvent>,
    capacity: usize,
    subscribers: Vec<Sender<EmittedEvent>>,
    /// Events lost to a full queue or a full subscriber
    dropped: u64,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity.min(256)),
            capacity: capacity.max(1),
            subscribers: Vec::new(),
            dropped: 0,
        }
    }

    /// Queue an event and fan it out to subscribers without blocking
    pub fn publish(&mut self, event: EmittedEvent) {
        let dropped = &mut self.dropped;
        self.subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                *dropped += 1;
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });

        if self.queue.len() == self.capacity {
            self.queue.pop_front();
            self.dropped += 1;
        }
        self.queue.push_back(event);
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<EmittedEvent> {
        self.queue.drain(..).collect()
    }

    /// Open a bounded subscriber channel
    pub fn subscribe(&mut self, capacity: usize) -> EventSubscriber {
        let (sender, receiver) = bounded(capacity.max(1));
        self.subscribers.push(sender);
        EventSubscriber { receiver }
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        // Several seconds of worst-case traffic at 60 Hz
        Self::new(1024)
    }
}

/// Receiving end handed to a presentation or audio collaborator
pub struct EventSubscriber {
    receiver: Receiver<EmittedEvent>,
}

impl EventSubscriber {
    /// Everything received since the last drain
    pub fn drain(&self) -> Vec<EmittedEvent> {
        self.receiver.try_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_start(tick: u64) -> EmittedEvent {
        EmittedEvent {
            tick,
            time: tick as f64 / 60.0,
            event: EffectEvent::RoundStart { round: 1 },
        }
    }

    #[test]
    fn test_publish_and_drain() {
        let mut bus = EventBus::new(10);
        bus.publish(round_start(1));
        bus.publish(round_start(2));
        assert_eq!(bus.pending(), 2);

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tick, 1);
        assert_eq!(events[1].tick, 2);
        assert_eq!(bus.pending(), 0);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let mut bus = EventBus::new(2);
        for tick in 1..=3 {
            bus.publish(round_start(tick));
        }
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tick, 2);
        assert_eq!(bus.dropped(), 1);
    }

    #[test]
    fn test_subscriber_receives_once() {
        let mut bus = EventBus::new(10);
        let sub = bus.subscribe(10);
        bus.publish(round_start(1));

        assert_eq!(sub.drain().len(), 1);
        assert!(sub.is_empty());
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_full_subscriber_does_not_block() {
        let mut bus = EventBus::new(10);
        let sub = bus.subscribe(1);
        bus.publish(round_start(1));
        bus.publish(round_start(2));

        let received = sub.drain();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].tick, 1);
        assert_eq!(bus.dropped(), 1);
        // The in-core queue still has both
        assert_eq!(bus.pending(), 2);
    }

    #[test]
    fn test_disconnected_subscriber_removed() {
        let mut bus = EventBus::new(10);
        let sub = bus.subscribe(4);
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        bus.publish(round_start(1));
        assert_eq!(bus.subscriber_count(), 0);
    }
}
