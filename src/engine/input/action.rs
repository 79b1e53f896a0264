// Game action definitions and the per-tick input snapshot

use glam::Vec2;

/// Discrete buttons the simulation reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Jump,
    Attack,
    Dash,
}

/// Press or release of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Pressed,
    Released,
}

/// Everything one fixed tick needs to know about the player's input
///
/// The move vector is continuous and sampled; button edges are
/// one-shot and seen by exactly one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Move vector, each component in [-1, 1]
    pub move_axis: Vec2,
    pub jump_pressed: bool,
    pub jump_released: bool,
    /// Whether jump is down after this tick's edges, in the order they
    /// happened. `None` when there were no jump edges.
    pub jump_held: Option<bool>,
    pub attack_pressed: bool,
    pub dash_pressed: bool,
}

impl TickInput {
    /// Input with only a move vector and no button edges
    pub fn moving(x: f32, y: f32) -> Self {
        Self {
            move_axis: Vec2::new(x, y),
            ..Default::default()
        }
    }

    /// Builder-style helper that adds one edge
    pub fn with(mut self, action: Action, edge: Edge) -> Self {
        match (action, edge) {
            (Action::Jump, Edge::Pressed) => {
                self.jump_pressed = true;
                self.jump_held = Some(true);
            }
            (Action::Jump, Edge::Released) => {
                self.jump_released = true;
                self.jump_held = Some(false);
            }
            (Action::Attack, Edge::Pressed) => self.attack_pressed = true,
            (Action::Dash, Edge::Pressed) => self.dash_pressed = true,
            // Releasing attack or dash has no effect on the simulation
            (Action::Attack | Action::Dash, Edge::Released) => {}
        }
        self
    }

    /// Jump button state at the end of this tick, given its state before.
    /// Without ordering information a release wins.
    pub fn jump_held_after(&self, before: bool) -> bool {
        self.jump_held.unwrap_or(if self.jump_released {
            false
        } else {
            before || self.jump_pressed
        })
    }
}
