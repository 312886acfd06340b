//! Duel session - fixed-timestep runner around the simulator
//!
//! Frames of arbitrary length are folded into an accumulator and consumed in
//! whole simulation ticks, so the duel advances at the configured tick rate
//! no matter how often the host renders. Inputs arrive through an
//! [`InputBuffer`] and only the newest control frame is applied.
//!
//! Events reach the host one way: [`DuelSession::advance`] drains the
//! simulator's event queue after stepping.

use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::game::constants::physics;
use crate::game::events::EmittedEvent;
use crate::game::input::{self, ControlSnapshot, Intent};
use crate::game::input_buffer::{InputBuffer, InputMessage, InputSender, SessionCommand};
use crate::game::match_result::MatchSummary;
use crate::game::performance::TickMonitor;
use crate::game::simulator::CombatSimulator;
use crate::game::state::{DuelSnapshot, TIME_EPSILON};

/// Seconds between periodic status lines in the realtime driver
const STATUS_INTERVAL_SECS: u64 = 30;

pub struct DuelSession {
    simulator: CombatSimulator,
    inputs: InputBuffer,
    /// Held controls, replaced by each newer frame from the buffer
    controls: ControlSnapshot,
    /// Intents fed to the simulator; a control frame rewrites both, an
    /// analog message only its own player
    intents: [Intent; 2],
    /// Unsimulated wall time in seconds
    accumulator: f64,
    max_steps: u32,
    pub performance: TickMonitor,
}

impl DuelSession {
    pub fn new(config: SimConfig) -> Self {
        let performance = TickMonitor::new(config.tick_rate);
        Self {
            simulator: CombatSimulator::new(config),
            inputs: InputBuffer::default(),
            controls: ControlSnapshot::default(),
            intents: [Intent::default(); 2],
            accumulator: 0.0,
            max_steps: physics::MAX_STEPS_PER_FRAME,
            performance,
        }
    }

    /// Cap on simulation ticks per [`advance`](Self::advance) call
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Handle for an input source
    pub fn sender(&self) -> InputSender {
        self.inputs.sender()
    }

    pub fn simulator(&self) -> &CombatSimulator {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut CombatSimulator {
        &mut self.simulator
    }

    pub fn snapshot(&self) -> DuelSnapshot {
        self.simulator.snapshot()
    }

    /// Controls that will drive the next tick
    pub fn controls(&self) -> ControlSnapshot {
        self.controls
    }

    /// Fraction of a tick left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f64 {
        (self.accumulator / self.simulator.config().dt()).clamp(0.0, 1.0)
    }

    /// Intents that will drive the next tick
    pub fn intents(&self) -> [Intent; 2] {
        self.intents
    }

    /// Apply everything queued in the input buffer. Commands run in arrival
    /// order; of several control frames only the newest is kept. Analog
    /// input with non-finite axes is logged and ignored.
    pub fn apply_inputs(&mut self) {
        for message in self.inputs.drain() {
            match message {
                InputMessage::Controls(controls) => {
                    self.controls = controls;
                    self.intents = input::map_snapshot(&controls);
                }
                InputMessage::Axes { combatant, x, z, attack } => match Intent::from_axes(x, z, attack) {
                    Ok(intent) => self.intents[combatant.index()] = intent,
                    Err(e) => warn!(player = combatant.number(), "Rejected analog input: {}", e),
                },
                InputMessage::Command(SessionCommand::StartSession) => self.simulator.start_session(),
                InputMessage::Command(SessionCommand::RestartRound) => self.simulator.restart_round(),
            }
        }
    }

    /// Run exactly one simulation tick with the held intents. Its events stay
    /// queued in the simulator until the next drain.
    pub fn step(&mut self) {
        self.performance.tick_start();
        self.simulator.tick_intents(&self.intents);
        self.performance.tick_end();
    }

    /// Feed one frame of wall time. Returns every event produced since the
    /// last drain: commands applied this frame and every tick run.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<EmittedEvent> {
        self.apply_inputs();

        let dt = self.simulator.config().dt();
        self.accumulator += elapsed.as_secs_f64();

        let mut steps = 0;
        while self.accumulator + TIME_EPSILON >= dt && steps < self.max_steps {
            self.step();
            self.accumulator = (self.accumulator - dt).max(0.0);
            steps += 1;
        }

        if self.accumulator + TIME_EPSILON >= dt {
            warn!(
                dropped_ms = self.accumulator * 1000.0,
                steps, "Simulation behind real time, dropping backlog"
            );
            self.accumulator = 0.0;
        }

        self.simulator.drain_events()
    }

    pub fn start(&mut self) {
        self.simulator.start_session();
    }

    /// End the session and summarise it
    pub fn finish(&mut self) -> MatchSummary {
        self.accumulator = 0.0;
        self.simulator.end_session()
    }

    /// Drive the session in real time on a tokio interval until `run_for`
    /// has elapsed. Every event is handed to `on_event` as it is produced.
    pub async fn run_realtime<F>(&mut self, run_for: Duration, mut on_event: F)
    where
        F: FnMut(&EmittedEvent),
    {
        let tick_rate = self.simulator.config().tick_rate;
        let mut ticker = interval(Duration::from_secs_f64(self.simulator.config().dt()));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("Duel loop started at {} Hz", tick_rate);
        let start = Instant::now();
        let mut last = start;
        let mut next_status = Duration::from_secs(STATUS_INTERVAL_SECS);

        while start.elapsed() < run_for {
            ticker.tick().await;
            let now = Instant::now();
            let frame = now - last;
            last = now;

            for event in self.advance(frame) {
                on_event(&event);
            }

            if start.elapsed() >= next_status {
                next_status += Duration::from_secs(STATUS_INTERVAL_SECS);
                let snapshot = self.snapshot();
                info!(
                    "Duel: {}s, tick {}, round {}, score {}-{} | Perf: {}",
                    start.elapsed().as_secs(),
                    snapshot.tick,
                    snapshot.round,
                    snapshot.combatants[0].score,
                    snapshot.combatants[1].score,
                    self.performance.status_message()
                );
            }
        }

        debug!(
            ticks = self.simulator.state().tick,
            dropped = self.simulator.events_dropped(),
            "Duel loop finished"
        );
    }
}
