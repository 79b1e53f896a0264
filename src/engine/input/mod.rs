// Input handling system
//
// The simulation only sees an abstract surface: a continuous move vector
// plus discrete button edges. Device handling lives outside this crate.
//
// - `action`: buttons, edges and the per-tick snapshot
// - `buffer`: latches frame-rate input until a fixed tick consumes it

pub mod action;
pub mod buffer;

// Re-export commonly used types
pub use action::{Action, Edge, TickInput};
pub use buffer::InputSampler;
