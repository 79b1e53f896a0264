use rapier2d::prelude::*;
use std::sync::{Arc, Mutex};

/// Collision layers for filtering what objects can collide with each other
///
/// Hitboxes and hazards are sensors, so their filters only decide which
/// trigger events get reported, never physical response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionLayer {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// The player character body
    Player = 0b0000_0010,

    /// Enemy bodies
    Enemy = 0b0000_0100,

    /// Floors, platforms and walls (the "ground layer" sensing queries target)
    Ground = 0b0000_1000,

    /// Hazards such as spikes
    Hazard = 0b0001_0000,

    /// Player attack hitboxes
    PlayerHitbox = 0b0010_0000,

    /// Sensors (trigger zones, etc.) - don't cause physical collision
    Sensor = 0b1000_0000,
}

impl CollisionLayer {
    /// Membership bits of this layer
    pub fn bits(self) -> Group {
        Group::from_bits_truncate(self as u32)
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        use CollisionLayer::*;

        let filter = match self {
            // Players touch geometry, enemies and hazards, never other players
            Player => Ground.bits() | Enemy.bits() | Hazard.bits() | Sensor.bits(),

            // Enemies touch geometry, the player and the player's hitboxes
            Enemy => Ground.bits() | Player.bits() | PlayerHitbox.bits(),

            // Geometry blocks every body
            Ground => Player.bits() | Enemy.bits() | Default.bits(),

            // Hazards report the player only
            Hazard => Player.bits(),

            // Hitboxes report enemies only
            PlayerHitbox => Enemy.bits(),

            Sensor | Default => Group::ALL,
        };

        InteractionGroups::new(self.bits(), filter)
    }

    /// Query groups that only match colliders on this layer
    pub fn query_groups(self) -> InteractionGroups {
        InteractionGroups::new(Group::ALL, self.bits())
    }
}

/// Custom collision event for game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    /// Two colliders started touching (or a sensor started overlapping)
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        sensor: bool,
    },

    /// Two colliders stopped touching
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        sensor: bool,
    },
}

impl CollisionEvent {
    /// The pair of colliders involved
    pub fn colliders(&self) -> (ColliderHandle, ColliderHandle) {
        match *self {
            Self::Started {
                collider1,
                collider2,
                ..
            }
            | Self::Stopped {
                collider1,
                collider2,
                ..
            } => (collider1, collider2),
        }
    }
}

/// Queue for storing collision events during physics step
///
/// rapier reports events through a shared reference, hence the interior mutability.
pub struct CollisionEventQueue {
    events: Arc<Mutex<Vec<CollisionEvent>>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(32))),
        }
    }

    /// Clear all events (call at start of physics step)
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Take all collision events from this step
    pub fn drain(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|mut events| events.drain(..).collect())
            .unwrap_or_default()
    }

    fn push(&self, event: CollisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::prelude::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match event {
            rapier2d::prelude::CollisionEvent::Started(h1, h2, flags) => {
                self.push(CollisionEvent::Started {
                    collider1: h1,
                    collider2: h2,
                    sensor: flags.contains(CollisionEventFlags::SENSOR),
                });
            }
            rapier2d::prelude::CollisionEvent::Stopped(h1, h2, flags) => {
                self.push(CollisionEvent::Stopped {
                    collider1: h1,
                    collider2: h2,
                    sensor: flags.contains(CollisionEventFlags::SENSOR),
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
