// Input latching between the frame loop and the fixed-step loop

use super::action::{Action, Edge, TickInput};
use crate::core::math::clamp_axis;
use glam::Vec2;
use std::collections::VecDeque;

/// Maximum number of latched edges to store
const MAX_BUFFER_SIZE: usize = 30;

/// Latches input reported by the frame loop until the next fixed tick drains it
///
/// Frames and ticks run at different rates, so a press reported during a frame
/// with no tick must survive until a tick happens, and a press must not be seen
/// twice when one frame runs several ticks.
#[derive(Debug, Default)]
pub struct InputSampler {
    move_axis: Vec2,
    edges: VecDeque<(Action, Edge)>,
}

impl InputSampler {
    /// Create a new sampler
    pub fn new() -> Self {
        Self {
            move_axis: Vec2::ZERO,
            edges: VecDeque::with_capacity(MAX_BUFFER_SIZE),
        }
    }

    /// Report the current move vector (clamped into [-1, 1])
    pub fn set_move(&mut self, axis: Vec2) {
        self.move_axis = clamp_axis(axis);
    }

    /// Report a button press
    pub fn press(&mut self, action: Action) {
        self.push(action, Edge::Pressed);
    }

    /// Report a button release
    pub fn release(&mut self, action: Action) {
        self.push(action, Edge::Released);
    }

    fn push(&mut self, action: Action, edge: Edge) {
        self.edges.push_back((action, edge));

        // Keep buffer size under control
        if self.edges.len() > MAX_BUFFER_SIZE {
            self.edges.pop_front();
        }
    }

    /// Drain the latched edges into the input for one fixed tick
    pub fn take_tick(&mut self) -> TickInput {
        self.edges
            .drain(..)
            .fold(TickInput::moving(self.move_axis.x, self.move_axis.y), |input, (action, edge)| {
                input.with(action, edge)
            })
    }

    /// Number of edges waiting for a tick
    pub fn pending(&self) -> usize {
        self.edges.len()
    }
}
