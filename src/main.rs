use std::time::Duration;

use anyhow::Result;
use glam::Vec2;
use log::info;

use platformer_sim::engine::game_loop::GameLoop;
use platformer_sim::engine::input::{Action, InputSampler};
use platformer_sim::game::characters::CharacterStats;
use platformer_sim::game::enemies::EnemyTuning;
use platformer_sim::game::hazards::SpikeTuning;
use platformer_sim::game::{SimEvent, Simulation};

/// Length of the scripted run in seconds
const SESSION_LENGTH: f32 = 8.0;

/// Alternating frame times, to exercise input latching across uneven frames
const FRAME_TIMES: [Duration; 3] = [
    Duration::from_micros(6_944),
    Duration::from_micros(16_667),
    Duration::from_micros(33_333),
];

/// Scripted player input for the frame starting at `t`
fn script(sampler: &mut InputSampler, t: f32, previous: f32) {
    let crossed = |at: f32| previous < at && t >= at;

    let axis = match t {
        t if t < 1.0 => Vec2::ZERO,
        t if t < 3.0 => Vec2::X,
        t if t < 5.0 => Vec2::NEG_X,
        _ => Vec2::ZERO,
    };
    sampler.set_move(axis);

    if crossed(1.5) || crossed(4.2) {
        sampler.press(Action::Jump);
    }
    if crossed(1.8) || crossed(4.6) {
        sampler.release(Action::Jump);
    }
    if crossed(2.5) {
        sampler.press(Action::Dash);
    }
    if crossed(3.2) || crossed(3.6) || crossed(4.0) {
        sampler.press(Action::Attack);
    }
}

fn build_arena() -> Result<Simulation> {
    let mut sim = Simulation::new();

    // Floor, left wall and a ledge
    sim.add_platform(Vec2::new(0.0, 0.0), Vec2::new(60.0, 1.0));
    sim.add_platform(Vec2::new(-12.0, 3.0), Vec2::new(1.0, 6.0));
    sim.add_platform(Vec2::new(8.0, 3.0), Vec2::new(4.0, 0.5));

    sim.spawn_player(CharacterStats::default(), Vec2::new(0.0, 1.5))?;
    if let Some(player) = sim.player_mut() {
        player.grant_dash();
    }
    sim.spawn_enemy(EnemyTuning::default(), Vec2::new(6.0, 1.0))?;
    sim.spawn_spike(SpikeTuning::default(), Vec2::new(-6.0, 0.75))?;

    Ok(sim)
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting headless session ({}s)", SESSION_LENGTH);

    let mut sim = build_arena()?;
    let mut game_loop = GameLoop::new();
    let mut sampler = InputSampler::new();

    let mut elapsed = 0.0_f32;
    let mut previous = -1.0_f32;
    let mut frame = 0usize;

    while elapsed < SESSION_LENGTH {
        let frame_time = FRAME_TIMES[frame % FRAME_TIMES.len()];
        frame += 1;

        script(&mut sampler, elapsed, previous);
        previous = elapsed;
        elapsed += frame_time.as_secs_f32();

        for _ in 0..game_loop.begin_frame(frame_time) {
            let input = sampler.take_tick();
            sim.tick(&input);
        }

        for event in sim.drain_events() {
            match event {
                SimEvent::TrailSample { .. } => log::trace!("{:?}", event),
                _ => info!("[{:>6.3}] {:?}", sim.now(), event),
            }
        }
    }

    if let Some(view) = sim.player_view() {
        info!(
            "Session over after {} ticks: player at ({:.2}, {:.2}), health {}/{}, pose {:?}",
            sim.tick_count(),
            view.position.x,
            view.position.y,
            view.health,
            view.max_health,
            view.pose
        );
    }
    for view in sim.enemy_views() {
        info!(
            "Enemy {} at ({:.2}, {:.2}), {:?}, health {}",
            view.id, view.position.x, view.position.y, view.mode, view.health
        );
    }

    Ok(())
}
