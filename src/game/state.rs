//! Duel state definitions
//!
//! The simulator owns exactly two [`Combatant`] records plus the pairwise
//! contact timestamp. The presentation layer only ever sees a
//! [`DuelSnapshot`] copy.

use serde::{Deserialize, Serialize};

use crate::util::vec3::Vec3;

/// Slack for comparing derived simulation times (tick * dt)
pub const TIME_EPSILON: f64 = 1e-9;

/// Speed below which a combatant counts as standing still
const MOVING_SPEED: f32 = 0.005;

/// True once strictly more than `window` seconds have passed since `since`.
/// A timer that never fired counts as elapsed.
#[inline]
pub fn window_elapsed(now: f64, since: Option<f64>, window: f64) -> bool {
    match since {
        Some(t) => now - t > window + TIME_EPSILON,
        None => true,
    }
}

/// True while fewer than `duration` seconds have passed since `since`
#[inline]
pub fn window_active(now: f64, since: Option<f64>, duration: f64) -> bool {
    match since {
        Some(t) => now - t < duration - TIME_EPSILON,
        None => false,
    }
}

/// Player slot identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantId {
    One,
    Two,
}

impl CombatantId {
    pub const BOTH: [CombatantId; 2] = [CombatantId::One, CombatantId::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            CombatantId::One => 0,
            CombatantId::Two => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> CombatantId {
        match self {
            CombatantId::One => CombatantId::Two,
            CombatantId::Two => CombatantId::One,
        }
    }

    /// Player number as shown to users (1 or 2)
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

/// Presentation-visible combatant state, derived each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatantStatus {
    Idle,
    Moving,
    /// Swing in progress; hit checks against the opponent are live
    Attacking,
    /// Hit reaction window
    Staggered,
    /// Knocked out, waiting for the round reset
    Defeated,
}

/// Timer windows used to derive [`CombatantStatus`]
#[derive(Debug, Clone, Copy)]
pub struct StatusWindows {
    pub attack_duration: f64,
    pub stagger_duration: f64,
}

/// One player's simulated body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Yaw about the vertical axis, always recomputed to face the opponent
    pub facing: f32,
    pub health: u32,
    pub score: u32,
    /// Simulation time the last attack started
    pub last_attack_at: Option<f64>,
    /// Simulation time the last landed hit staggered this combatant
    pub staggered_at: Option<f64>,
    /// Simulation time of the last dodge event
    pub last_dodge_at: Option<f64>,
    /// Velocity at the end of the previous tick's dodge check
    pub previous_velocity: Vec3,
    pub defeated: bool,
    /// Where this combatant stands at the start of every round
    pub spawn: Vec3,
}

impl Combatant {
    pub fn new(id: CombatantId, spawn: Vec3, max_health: u32) -> Self {
        Self {
            id,
            position: spawn,
            velocity: Vec3::ZERO,
            facing: 0.0,
            health: max_health,
            score: 0,
            last_attack_at: None,
            staggered_at: None,
            last_dodge_at: None,
            previous_velocity: Vec3::ZERO,
            defeated: false,
            spawn,
        }
    }

    /// Back to the spawn point with full health. Score and id survive.
    pub fn reset_for_round(&mut self, max_health: u32) {
        self.position = self.spawn;
        self.velocity = Vec3::ZERO;
        self.previous_velocity = Vec3::ZERO;
        self.health = max_health;
        self.last_attack_at = None;
        self.staggered_at = None;
        self.last_dodge_at = None;
        self.defeated = false;
    }

    /// Subtract damage, saturating at zero. Returns remaining health.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.horizontal_length()
    }

    pub fn is_attacking(&self, now: f64, attack_duration: f64) -> bool {
        window_active(now, self.last_attack_at, attack_duration)
    }

    pub fn is_staggered(&self, now: f64, stagger_duration: f64) -> bool {
        window_active(now, self.staggered_at, stagger_duration)
    }

    pub fn can_attack(&self, now: f64, cooldown: f64) -> bool {
        !self.defeated && window_elapsed(now, self.last_attack_at, cooldown)
    }

    pub fn status(&self, now: f64, windows: StatusWindows) -> CombatantStatus {
        if self.defeated {
            CombatantStatus::Defeated
        } else if self.is_staggered(now, windows.stagger_duration) {
            CombatantStatus::Staggered
        } else if self.is_attacking(now, windows.attack_duration) {
            CombatantStatus::Attacking
        } else if self.speed() > MOVING_SPEED {
            CombatantStatus::Moving
        } else {
            CombatantStatus::Idle
        }
    }
}

/// Whether the session is accepting play
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Menu shown, nothing moves
    #[default]
    Menu,
    /// Match in progress
    Playing,
}

/// Deferred round reset scheduled by a knockout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PendingReset {
    /// Knockout this reset belongs to; a reset for any other knockout is stale
    pub knockout_id: u64,
    pub fire_at: f64,
}

/// Complete duel state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuelState {
    pub tick: u64,
    /// Simulation clock in seconds
    pub time: f64,
    pub phase: GamePhase,
    /// Current round number (1-based once a session starts)
    pub round: u32,
    pub combatants: [Combatant; 2],
    /// Last hit or impact on the pair, shared by both combatants
    pub last_collision_at: Option<f64>,
    pub pending_reset: Option<PendingReset>,
    /// Number of knockouts so far; identifies the current knockout
    pub knockouts: u64,
}

impl DuelState {
    pub fn new(spawn_one: Vec3, spawn_two: Vec3, max_health: u32) -> Self {
        Self {
            tick: 0,
            time: 0.0,
            phase: GamePhase::Menu,
            round: 0,
            combatants: [
                Combatant::new(CombatantId::One, spawn_one, max_health),
                Combatant::new(CombatantId::Two, spawn_two, max_health),
            ],
            last_collision_at: None,
            pending_reset: None,
            knockouts: 0,
        }
    }

    #[inline]
    pub fn get(&self, id: CombatantId) -> &Combatant {
        &self.combatants[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: CombatantId) -> &mut Combatant {
        &mut self.combatants[id.index()]
    }

    /// Both combatants mutably, ordered as (`id`, opponent)
    pub fn pair_mut(&mut self, id: CombatantId) -> (&mut Combatant, &mut Combatant) {
        let [one, two] = &mut self.combatants;
        match id {
            CombatantId::One => (one, two),
            CombatantId::Two => (two, one),
        }
    }

    /// Horizontal centre distance between the two combatants
    pub fn separation(&self) -> f32 {
        self.combatants[0]
            .position
            .horizontal_distance_to(self.combatants[1].position)
    }

    /// Reinitialise both bodies for a fresh round; cancels any pending reset
    pub fn reset_round(&mut self, max_health: u32) {
        for combatant in &mut self.combatants {
            combatant.reset_for_round(max_health);
        }
        self.last_collision_at = None;
        self.pending_reset = None;
    }

    /// Score leader, `None` on a tie
    pub fn leader(&self) -> Option<CombatantId> {
        let [one, two] = &self.combatants;
        match one.score.cmp(&two.score) {
            std::cmp::Ordering::Greater => Some(CombatantId::One),
            std::cmp::Ordering::Less => Some(CombatantId::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn snapshot(&self, windows: StatusWindows) -> DuelSnapshot {
        let view = |c: &Combatant| CombatantSnapshot {
            id: c.id,
            position: c.position,
            velocity: c.velocity,
            facing: c.facing,
            health: c.health,
            score: c.score,
            status: c.status(self.time, windows),
        };
        DuelSnapshot {
            tick: self.tick,
            time: self.time,
            phase: self.phase,
            round: self.round,
            combatants: [view(&self.combatants[0]), view(&self.combatants[1])],
        }
    }
}

/// Read-only per-combatant view for renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub id: CombatantId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub facing: f32,
    pub health: u32,
    pub score: u32,
    pub status: CombatantStatus,
}

/// Read-only per-frame view of the duel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelSnapshot {
    pub tick: u64,
    pub time: f64,
    pub phase: GamePhase,
    pub round: u32,
    pub combatants: [CombatantSnapshot; 2],
}

impl DuelSnapshot {
    pub fn get(&self, id: CombatantId) -> &CombatantSnapshot {
        &self.combatants[id.index()]
    }
}
