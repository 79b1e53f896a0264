/// Game loop timing and control system
///
/// Implements a fixed timestep simulation driven by a variable-rate frame loop.
/// The frame loop only samples input and reads state; every simulation mutation
/// happens inside a fixed step, so controllers always see the same `dt`.
use std::time::Duration;

/// Target physics/update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of physics steps per frame to prevent spiral of death
const MAX_PHYSICS_STEPS: u32 = 5;

/// Simulation clock advanced once per fixed step
///
/// Every timed window in the game (dash, attack, invulnerability, death fade)
/// is stored as an absolute end time on this clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimClock {
    now: f32,
    tick: u64,
    dt: f32,
}

impl SimClock {
    pub fn new(dt: f32) -> Self {
        Self {
            now: 0.0,
            tick: 0,
            dt,
        }
    }

    /// Seconds of simulated time since the session started
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Number of fixed steps executed so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Length of one fixed step in seconds
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Move the clock forward by one fixed step
    pub fn advance(&mut self) {
        self.tick += 1;
        // Derive from the tick count so long sessions don't drift
        self.now = self.tick as f32 * self.dt;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(FIXED_TIMESTEP)
    }
}

/// Game loop timing state
#[derive(Debug)]
pub struct GameLoop {
    /// Accumulated time for fixed timestep updates
    accumulator: Duration,

    /// Whether the game is paused
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total updates executed
    update_count: u64,

    /// Delta time for rendering (time since last frame)
    frame_delta: f32,
}

impl GameLoop {
    /// Create a new game loop
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            paused: false,
            frame_count: 0,
            update_count: 0,
            frame_delta: 0.0,
        }
    }

    /// Begin a new frame that lasted `frame_time`, returns the number of fixed updates to run
    pub fn begin_frame(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;
        self.frame_delta = frame_time.as_secs_f32();

        // If paused, don't accumulate time for updates
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut updates = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && updates < MAX_PHYSICS_STEPS {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            updates += 1;
        }

        // Drop the backlog we refused to simulate instead of carrying it forward
        if updates == MAX_PHYSICS_STEPS && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::warn!(
                "Frame took {:.1} ms, dropping simulation backlog",
                self.frame_delta * 1000.0
            );
            self.accumulator = Duration::ZERO;
        }

        self.update_count += updates as u64;
        updates
    }

    /// Get the fixed timestep for physics updates (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Get the delta time of the last frame (in seconds)
    pub fn frame_delta(&self) -> f32 {
        self.frame_delta
    }

    /// Get the interpolation alpha for smooth presentation between physics steps
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / FIXED_TIMESTEP
    }

    /// Get total number of frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of updates executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Check if game is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the game
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    /// Resume the game
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Simulation resumed");
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
