//! Combat simulator - the per-tick duel state machine
//!
//! Tick order (later steps rely on the corrected state of earlier ones):
//! 1. map inputs and start attacks
//! 2. seek toward the opponent when idle and far apart
//! 3. accelerate from input, apply friction
//! 4. integrate position
//! 5. confine to the arena
//! 6. face the opponent
//! 7. attack-hit arbitration
//! 8. knockout scoring and deferred round reset
//! 9. engagement pull
//! 10. dodge cues
//! 11. body collision, impact scoring, re-engagement
//! 12. publish events
//!
//! The simulator is the only writer of duel state. Timers are timestamp
//! comparisons against the simulation clock, so a run is fully determined by
//! its config and input sequence.

use smallvec::SmallVec;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SimConfig;
use crate::game::events::{EffectEvent, EmittedEvent, EventBus, EventSubscriber};
use crate::game::input::{self, ControlSnapshot, Intent};
use crate::game::match_result::{self, MatchStats, MatchSummary};
use crate::game::state::{
    window_elapsed, CombatantId, DuelSnapshot, DuelState, GamePhase, PendingReset, StatusWindows,
    TIME_EPSILON,
};
use crate::game::systems::{collision, physics, resolve};

/// Events produced by a single tick. Rarely more than a couple.
type TickEvents = SmallVec<[EmittedEvent; 4]>;

pub struct CombatSimulator {
    config: SimConfig,
    state: DuelState,
    bus: EventBus,
    stats: MatchStats,
    session_id: Uuid,
    session_started_at: f64,
}

impl CombatSimulator {
    /// Create a simulator with both combatants at their spawn points.
    /// Nothing moves until [`start_session`](Self::start_session).
    pub fn new(config: SimConfig) -> Self {
        let state = DuelState::new(config.spawn_one, config.spawn_two, config.max_health);
        Self {
            config,
            state,
            bus: EventBus::default(),
            stats: MatchStats::default(),
            session_id: Uuid::new_v4(),
            session_started_at: 0.0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &DuelState {
        &self.state
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn windows(&self) -> StatusWindows {
        StatusWindows {
            attack_duration: self.config.attack_duration,
            stagger_duration: self.config.stagger_duration,
        }
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> DuelSnapshot {
        self.state.snapshot(self.windows())
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<EmittedEvent> {
        self.bus.drain()
    }

    /// Events queued and not yet drained
    pub fn pending_events(&self) -> usize {
        self.bus.pending()
    }

    /// Events evicted from the queue because nobody drained it in time
    pub fn events_dropped(&self) -> u64 {
        self.bus.dropped()
    }

    /// Open a channel that receives every future event
    pub fn subscribe(&mut self, capacity: usize) -> EventSubscriber {
        self.bus.subscribe(capacity)
    }

    /// Enter play from round one. Positions, velocities and health are
    /// reinitialised; scores are kept. Any pending knockout reset is cancelled.
    /// Coming from the menu also opens a new session: fresh id and stats.
    pub fn start_session(&mut self) {
        if self.state.phase != GamePhase::Playing {
            self.stats.reset();
            self.session_id = Uuid::new_v4();
            self.session_started_at = self.state.time;
            info!(session = %self.session_id, "Duel session started");
        }
        self.state.phase = GamePhase::Playing;
        self.state.round = 1;
        self.state.reset_round(self.config.max_health);

        let mut events = TickEvents::new();
        self.emit(&mut events, EffectEvent::RoundStart { round: 1 });
        self.publish(&events);
    }

    /// Restart the current round. Same reinitialisation as
    /// [`start_session`](Self::start_session) without touching the round counter.
    pub fn restart_round(&mut self) {
        if self.state.phase != GamePhase::Playing {
            self.start_session();
            return;
        }
        self.state.reset_round(self.config.max_health);
        info!(round = self.state.round, "Round restarted");

        let mut events = TickEvents::new();
        self.emit(&mut events, EffectEvent::RoundStart { round: self.state.round });
        self.publish(&events);
    }

    /// Leave play and summarise the session
    pub fn end_session(&mut self) -> MatchSummary {
        self.state.phase = GamePhase::Menu;
        self.state.pending_reset = None;
        let summary = match_result::summarize(self.session_id, &self.state, &self.stats, self.session_started_at);
        info!(
            session = %self.session_id,
            rounds = summary.rounds_played,
            score_one = summary.results[0].score,
            score_two = summary.results[1].score,
            "Duel session ended"
        );
        summary
    }

    /// Advance the simulation by one tick with keyboard-style controls
    pub fn tick(&mut self, controls: &ControlSnapshot) {
        self.tick_intents(&input::map_snapshot(controls));
    }

    /// Advance the simulation by one tick with already-mapped intents.
    /// Events go to the bus; take them with [`drain_events`](Self::drain_events)
    /// or a subscriber.
    pub fn tick_intents(&mut self, intents: &[Intent; 2]) {
        self.state.tick += 1;
        self.state.time = self.state.tick as f64 * self.config.dt();

        let mut events = TickEvents::new();

        if self.state.phase == GamePhase::Playing {
            if self.state.pending_reset.is_some() {
                self.update_knockout(&mut events);
            } else {
                Self::step(&self.config, &mut self.state, intents, &mut events);
            }
        }

        self.publish(&events);
    }

    /// While a knockout is pending the bodies stay frozen; once the delay
    /// elapses both combatants are reset for the next round.
    fn update_knockout(&mut self, events: &mut TickEvents) {
        let Some(pending) = self.state.pending_reset else {
            return;
        };

        // A reset belongs to exactly one knockout
        if pending.knockout_id != self.state.knockouts {
            self.state.pending_reset = None;
            return;
        }
        if self.state.time + TIME_EPSILON < pending.fire_at {
            return;
        }

        self.state.reset_round(self.config.max_health);
        self.state.round += 1;
        info!(round = self.state.round, "Round reset after knockout");
        self.emit(events, EffectEvent::RoundStart { round: self.state.round });
    }

    fn step(config: &SimConfig, state: &mut DuelState, intents: &[Intent; 2], events: &mut TickEvents) {
        let now = state.time;

        // 1. attacks
        for id in CombatantId::BOTH {
            let combatant = state.get_mut(id);
            if intents[id.index()].attack && combatant.can_attack(now, config.attack_cooldown) {
                combatant.last_attack_at = Some(now);
                Self::push(state, events, EffectEvent::AttackStarted { attacker: id });
            }
        }

        // 2-5. movement from start-of-tick positions
        let start = [state.combatants[0].position, state.combatants[1].position];
        let mut velocity_change = [0.0f32; 2];
        for id in CombatantId::BOTH {
            let i = id.index();
            let combatant = state.get_mut(id);
            physics::apply_intent(combatant, &intents[i], start[1 - i], config);
            physics::integrate(combatant, config);
            velocity_change[i] = (combatant.velocity - combatant.previous_velocity).horizontal_length();
        }

        // 6. facing
        let [p1, p2] = [state.combatants[0].position, state.combatants[1].position];
        state.combatants[0].facing = p1.yaw_toward(p2);
        state.combatants[1].facing = p2.yaw_toward(p1);

        let contact = collision::test(p1, config.body_radius, p2, config.body_radius);
        let distance = contact.distance;

        // 7-8. attack hits
        for id in CombatantId::BOTH {
            if !window_elapsed(now, state.last_collision_at, config.hit_debounce) {
                break;
            }
            let (attacker, target) = state.pair_mut(id);
            if !attacker.is_attacking(now, config.attack_duration) || distance >= config.melee_range {
                continue;
            }

            let remaining = target.apply_damage(config.attack_damage);
            target.staggered_at = Some(now);
            state.last_collision_at = Some(now);
            debug!(attacker = id.number(), remaining, "Hit landed");
            Self::push(
                state,
                events,
                EffectEvent::Hit {
                    attacker: id,
                    target: id.opponent(),
                    damage: config.attack_damage,
                    remaining_health: remaining,
                },
            );

            if remaining == 0 {
                Self::knockout(config, state, id, events);
                return;
            }
        }

        // 9. engagement pull
        if distance > config.pull_distance && !contact.collided {
            Self::pull_together(state, config.pull_accel);
        }

        // 10. dodge cues
        for id in CombatantId::BOTH {
            let i = id.index();
            let (me, other) = state.pair_mut(id);
            let near = collision::near_miss(
                me.position,
                config.body_radius,
                other.position,
                config.body_radius,
                config.dodge_near_miss_padding,
            );
            let swerved = velocity_change[i] > config.dodge_velocity_change;
            let brushed = near.collided && !contact.collided && me.speed() > config.dodge_min_speed;

            if (swerved || brushed) && window_elapsed(now, me.last_dodge_at, config.dodge_debounce) {
                me.last_dodge_at = Some(now);
                let direction = me.velocity.horizontal().normalize();
                Self::push(state, events, EffectEvent::Dodge { combatant: id, direction });
            }
            let me = state.get_mut(id);
            me.previous_velocity = me.velocity;
        }

        // 11. body collision
        if contact.collided && window_elapsed(now, state.last_collision_at, config.hit_debounce) {
            Self::impact(config, state, contact, events);
        }
    }

    fn knockout(config: &SimConfig, state: &mut DuelState, winner: CombatantId, events: &mut TickEvents) {
        let loser = winner.opponent();
        let round = state.round;

        state.get_mut(winner).score += 1;
        state.get_mut(loser).defeated = true;
        state.knockouts += 1;
        state.pending_reset = Some(PendingReset {
            knockout_id: state.knockouts,
            fire_at: state.time + config.knockout_reset_delay,
        });

        info!(
            winner = winner.number(),
            round,
            score_one = state.combatants[0].score,
            score_two = state.combatants[1].score,
            "Knockout"
        );
        Self::push(state, events, EffectEvent::Knockout { winner, loser, round });
    }

    fn impact(config: &SimConfig, state: &mut DuelState, contact: collision::Contact, events: &mut TickEvents) {
        let [one, two] = &mut state.combatants;

        let speed_one = one.speed();
        let speed_two = two.speed();

        let resolution = resolve::resolve(
            one.position,
            one.velocity,
            config.body_mass,
            two.position,
            two.velocity,
            config.body_mass,
            config.restitution,
        );
        one.velocity = resolution.velocity_a;
        two.velocity = resolution.velocity_b;

        let (a, b) = resolve::separate(one.position, two.position, contact.normal, contact.penetration);
        one.position = a;
        two.position = b;
        physics::confine(one, config);
        physics::confine(two, config);

        let scorer = if speed_one > speed_two + config.impact_score_margin {
            Some(CombatantId::One)
        } else if speed_two > speed_one + config.impact_score_margin {
            Some(CombatantId::Two)
        } else {
            None
        };
        if let Some(id) = scorer {
            state.get_mut(id).score += 1;
        }

        state.last_collision_at = Some(state.time);
        let [p1, p2] = [state.combatants[0].position, state.combatants[1].position];
        debug!(speed_one, speed_two, scorer = ?scorer.map(CombatantId::number), "Impact");
        Self::push(
            state,
            events,
            EffectEvent::Impact {
                point: p1.lerp(p2, 0.5),
                normal: contact.normal,
                speed_one,
                speed_two,
                scorer,
            },
        );

        if p1.horizontal_distance_to(p2) > config.reengage_distance {
            Self::pull_together(state, config.reengage_accel);
        }
    }

    /// Accelerate both combatants toward each other
    fn pull_together(state: &mut DuelState, accel: f32) {
        let [one, two] = &mut state.combatants;
        let (p1, p2) = (one.position, two.position);
        physics::accelerate_toward(one, p2, accel);
        physics::accelerate_toward(two, p1, accel);
    }

    fn push(state: &DuelState, events: &mut TickEvents, event: EffectEvent) {
        events.push(EmittedEvent {
            tick: state.tick,
            time: state.time,
            event,
        });
    }

    fn emit(&self, events: &mut TickEvents, event: EffectEvent) {
        Self::push(&self.state, events, event);
    }

    fn publish(&mut self, events: &TickEvents) {
        for emitted in events {
            self.stats.record(&emitted.event);
            self.bus.publish(emitted.clone());
        }
    }
}
