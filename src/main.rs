use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use duel_arena_core::config::{RunnerConfig, SimConfig};
use duel_arena_core::game::events::{EffectEvent, EmittedEvent};
use duel_arena_core::game::input::{ControlFlags, ControlSnapshot};
use duel_arena_core::game::input_buffer::InputSender;
use duel_arena_core::game::session::DuelSession;

/// Random stand-in for two players: each holds a direction for a while and
/// swings now and then.
struct SoakScript {
    rng: StdRng,
    held: [ControlFlags; 2],
    hold_ticks: [u32; 2],
}

impl SoakScript {
    const ATTACK_CHANCE: f64 = 0.05;

    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            held: [ControlFlags::default(); 2],
            hold_ticks: [0; 2],
        }
    }

    fn next_frame(&mut self) -> ControlSnapshot {
        for i in 0..2 {
            if self.hold_ticks[i] == 0 {
                self.hold_ticks[i] = self.rng.gen_range(10..=40);
                self.held[i] = ControlFlags {
                    move_left: self.rng.gen_bool(0.3),
                    move_right: self.rng.gen_bool(0.3),
                    move_forward: self.rng.gen_bool(0.3),
                    move_backward: self.rng.gen_bool(0.3),
                    attack: false,
                };
            }
            self.hold_ticks[i] -= 1;
            self.held[i].attack = self.rng.gen_bool(Self::ATTACK_CHANCE);
        }
        ControlSnapshot {
            one: self.held[0],
            two: self.held[1],
        }
    }
}

fn log_event(emitted: &EmittedEvent) {
    match &emitted.event {
        EffectEvent::Knockout { winner, round, .. } => {
            info!(tick = emitted.tick, round, "Player {} wins the round", winner.number());
        }
        EffectEvent::RoundStart { round } => info!(tick = emitted.tick, "Round {} begins", round),
        event => debug!(tick = emitted.tick, ?event, "Effect"),
    }
}

fn submit(sender: &InputSender, controls: ControlSnapshot) {
    if let Err(e) = sender.send_controls(controls) {
        warn!("Dropped control frame: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Duel Arena v{}", env!("CARGO_PKG_VERSION"));

    let config = SimConfig::load_or_default();
    config.validate()?;
    let runner = RunnerConfig::load_or_default();
    info!(
        "Configuration loaded: {} Hz, {:?} arena (half extent {}), {}s run, seed {:#x}, realtime={}",
        config.tick_rate,
        config.arena_shape,
        config.arena_half_extent,
        runner.run_seconds,
        runner.seed,
        runner.realtime
    );

    let dt = Duration::from_secs_f64(config.dt());
    let total_ticks = (runner.run_seconds * config.tick_rate as f64).round() as u64;

    let mut session = DuelSession::new(config);
    let sender = session.sender();
    let mut script = SoakScript::new(runner.seed);
    session.start();

    if runner.realtime {
        // The script feeds controls on its own timer, like a device thread would
        let script_sender = sender.clone();
        let feeder = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(dt);
            loop {
                ticker.tick().await;
                if script_sender.send_controls(script.next_frame()).is_err() {
                    break;
                }
            }
        });

        tokio::select! {
            _ = session.run_realtime(Duration::from_secs_f64(runner.run_seconds), log_event) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
            }
        }
        feeder.abort();
    } else {
        let soak = async {
            for _ in 0..total_ticks {
                submit(&sender, script.next_frame());
                for event in session.advance(dt) {
                    log_event(&event);
                }
                // Let the signal handler run between batches
                if session.simulator().state().tick % 600 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        };

        tokio::select! {
            _ = soak => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
            }
        }
    }

    info!("Tick performance: {}", session.performance.status_message());
    let dropped = session.simulator().events_dropped();
    if dropped > 0 {
        warn!(dropped, "Events evicted before they were drained");
    }
    let summary = session.finish();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
