use std::str::FromStr;

use crate::game::constants::{arena, body, combat, dodge, engagement, physics, spawn};
use crate::game::systems::bounds::{self, ArenaShape};
use crate::util::vec3::Vec3;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be finite and greater than 0 (got {value})")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must lie in [{min}, {max}] (got {value})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("arena half extent {half_extent} leaves no room for a body of radius {radius}")]
    ArenaTooSmall { half_extent: f32, radius: f32 },
    #[error("spawn point {0:?} lies outside the arena")]
    SpawnOutsideArena(Vec3),
}

/// Tuning for one duel simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Velocity gained per tick for a full movement intent
    pub move_speed: f32,
    /// Exponential velocity decay factor applied every tick
    pub friction: f32,
    /// Arena outline
    pub arena_shape: ArenaShape,
    pub arena_center: Vec3,
    pub arena_half_extent: f32,
    pub body_radius: f32,
    pub body_mass: f32,
    pub restitution: f32,
    pub max_health: u32,
    pub attack_damage: u32,
    pub melee_range: f32,
    pub attack_duration: f64,
    pub attack_cooldown: f64,
    pub stagger_duration: f64,
    pub hit_debounce: f64,
    pub knockout_reset_delay: f64,
    pub impact_score_margin: f32,
    pub seek_distance: f32,
    pub seek_accel: f32,
    pub pull_distance: f32,
    pub pull_accel: f32,
    pub reengage_distance: f32,
    pub reengage_accel: f32,
    pub dodge_velocity_change: f32,
    pub dodge_near_miss_padding: f32,
    pub dodge_min_speed: f32,
    pub dodge_debounce: f64,
    pub spawn_one: Vec3,
    pub spawn_two: Vec3,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: physics::TICK_RATE,
            move_speed: physics::MOVE_SPEED,
            friction: physics::FRICTION,
            arena_shape: ArenaShape::Square,
            arena_center: arena::CENTER,
            arena_half_extent: arena::HALF_EXTENT,
            body_radius: body::RADIUS,
            body_mass: body::MASS,
            restitution: body::RESTITUTION,
            max_health: combat::MAX_HEALTH,
            attack_damage: combat::ATTACK_DAMAGE,
            melee_range: combat::MELEE_RANGE,
            attack_duration: combat::ATTACK_DURATION,
            attack_cooldown: combat::ATTACK_COOLDOWN,
            stagger_duration: combat::STAGGER_DURATION,
            hit_debounce: combat::HIT_DEBOUNCE,
            knockout_reset_delay: combat::KNOCKOUT_RESET_DELAY,
            impact_score_margin: combat::IMPACT_SCORE_MARGIN,
            seek_distance: engagement::SEEK_DISTANCE,
            seek_accel: engagement::SEEK_ACCEL,
            pull_distance: engagement::PULL_DISTANCE,
            pull_accel: engagement::PULL_ACCEL,
            reengage_distance: engagement::REENGAGE_DISTANCE,
            reengage_accel: engagement::REENGAGE_ACCEL,
            dodge_velocity_change: dodge::VELOCITY_CHANGE,
            dodge_near_miss_padding: dodge::NEAR_MISS_PADDING,
            dodge_min_speed: dodge::MIN_SPEED,
            dodge_debounce: dodge::DEBOUNCE,
            spawn_one: spawn::PLAYER_ONE,
            spawn_two: spawn::PLAYER_TWO,
        }
    }
}

/// Parse `name` from the environment into `target`, keeping the current value
/// (and warning) when the variable is present but unparsable.
fn override_from_env<T: FromStr>(name: &str, target: &mut T) {
    if let Ok(raw) = std::env::var(name) {
        match raw.trim().parse::<T>() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!("Invalid {} '{}', using default", name, raw),
        }
    }
}

impl SimConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        override_from_env("DUEL_TICK_RATE", &mut config.tick_rate);
        override_from_env("DUEL_ARENA_SHAPE", &mut config.arena_shape);
        override_from_env("DUEL_ARENA_HALF_EXTENT", &mut config.arena_half_extent);
        override_from_env("DUEL_MOVE_SPEED", &mut config.move_speed);
        override_from_env("DUEL_FRICTION", &mut config.friction);
        override_from_env("DUEL_RESTITUTION", &mut config.restitution);
        override_from_env("DUEL_MAX_HEALTH", &mut config.max_health);
        override_from_env("DUEL_ATTACK_DAMAGE", &mut config.attack_damage);
        override_from_env("DUEL_KNOCKOUT_DELAY", &mut config.knockout_reset_delay);

        config
    }

    /// Seconds of simulation time per tick
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate as f64
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1000).contains(&self.tick_rate) {
            return Err(ConfigError::OutOfRange {
                name: "tick_rate",
                value: self.tick_rate as f64,
                min: 1.0,
                max: 1000.0,
            });
        }

        let positives: [(&'static str, f64); 9] = [
            ("move_speed", self.move_speed as f64),
            ("arena_half_extent", self.arena_half_extent as f64),
            ("body_radius", self.body_radius as f64),
            ("body_mass", self.body_mass as f64),
            ("max_health", self.max_health as f64),
            ("attack_damage", self.attack_damage as f64),
            ("melee_range", self.melee_range as f64),
            ("attack_duration", self.attack_duration),
            ("knockout_reset_delay", self.knockout_reset_delay),
        ];
        for (name, value) in positives {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ConfigError::OutOfRange {
                name: "restitution",
                value: self.restitution as f64,
                min: 0.0,
                max: 1.0,
            });
        }
        // Friction must decay velocity without zeroing it
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "friction",
                value: self.friction as f64,
                min: 0.0,
                max: 1.0,
            });
        }

        if self.arena_half_extent <= self.body_radius {
            return Err(ConfigError::ArenaTooSmall {
                half_extent: self.arena_half_extent,
                radius: self.body_radius,
            });
        }

        for spawn in [self.spawn_one, self.spawn_two] {
            let clamped = bounds::clamp(
                self.arena_shape,
                spawn,
                self.arena_center,
                self.arena_half_extent,
                self.body_radius,
            );
            if !clamped.approx_eq(spawn, 1e-4) {
                return Err(ConfigError::SpawnOutsideArena(spawn));
            }
        }

        Ok(())
    }
}

/// Headless runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// How many seconds of simulation to run
    pub run_seconds: f64,
    /// Seed for the soak-test control script
    pub seed: u64,
    /// Pace ticks against the wall clock instead of running flat out
    pub realtime: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            run_seconds: 60.0,
            seed: 0x5eed,
            realtime: false,
        }
    }
}

impl RunnerConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        override_from_env("DUEL_RUN_SECONDS", &mut config.run_seconds);
        override_from_env("DUEL_SEED", &mut config.seed);
        override_from_env("DUEL_REALTIME", &mut config.realtime);

        if !(config.run_seconds.is_finite() && config.run_seconds > 0.0) {
            tracing::warn!("DUEL_RUN_SECONDS must be > 0, using default");
            config.run_seconds = Self::default().run_seconds;
        }

        config
    }
}
