//! Default tuning values for the duel simulation.
//!
//! Velocities are expressed in units per tick and accelerations in units per
//! tick squared; timers are in seconds of simulation time.

/// Physics constants - CRITICAL: FRICTION = 0.85 is a multiplier (exponential decay), NOT drag!
pub mod physics {
    /// Velocity gained per tick for a full-strength movement intent
    pub const MOVE_SPEED: f32 = 0.08;
    /// Friction factor applied as: velocity *= FRICTION
    pub const FRICTION: f32 = 0.85;
    /// Simulation tick rate in Hz
    pub const TICK_RATE: u32 = 60;
    /// Delta time per tick in seconds
    pub const DT: f64 = 1.0 / 60.0;
    /// Maximum number of fixed steps run for a single frame before dropping time
    pub const MAX_STEPS_PER_FRAME: u32 = 5;
}

/// Arena constants
pub mod arena {
    use crate::util::vec3::Vec3;

    /// Arena centre (Y is the body height)
    pub const CENTER: Vec3 = Vec3::new(0.0, 0.5, 0.0);
    /// Half of the arena side length (square) or the arena radius (circle)
    pub const HALF_EXTENT: f32 = 7.5;
}

/// Combatant body constants
pub mod body {
    /// Collision radius of a combatant
    pub const RADIUS: f32 = 0.8;
    /// Mass used for collision response
    pub const MASS: f32 = 1.0;
    /// Coefficient of restitution for body-to-body impacts
    pub const RESTITUTION: f32 = 0.9;
}

/// Melee combat constants
pub mod combat {
    /// Health a combatant starts each round with
    pub const MAX_HEALTH: u32 = 100;
    /// Damage dealt by a landed attack
    pub const ATTACK_DAMAGE: u32 = 20;
    /// Horizontal distance within which an active attack lands
    pub const MELEE_RANGE: f32 = 2.0;
    /// How long an attack stays active after it starts
    pub const ATTACK_DURATION: f64 = 0.3;
    /// Minimum time between two attack starts
    pub const ATTACK_COOLDOWN: f64 = 1.0;
    /// Hit reaction window
    pub const STAGGER_DURATION: f64 = 0.5;
    /// Minimum time between two contact events (hit or impact) on the pair
    pub const HIT_DEBOUNCE: f64 = 0.5;
    /// Delay between a knockout and the round reset
    pub const KNOCKOUT_RESET_DELAY: f64 = 3.0;
    /// Speed margin a combatant needs over its opponent to win an impact point
    pub const IMPACT_SCORE_MARGIN: f32 = 0.1;
}

/// Automatic engagement constants
pub mod engagement {
    /// Idle combatants seek the opponent beyond this separation
    pub const SEEK_DISTANCE: f32 = 2.0;
    /// Seek acceleration (weaker than MOVE_SPEED so input always dominates)
    pub const SEEK_ACCEL: f32 = 0.008;
    /// Both combatants are pulled together beyond this separation
    pub const PULL_DISTANCE: f32 = 4.0;
    /// Mutual pull acceleration
    pub const PULL_ACCEL: f32 = 0.015;
    /// After an impact, combatants farther apart than this re-engage
    pub const REENGAGE_DISTANCE: f32 = 2.5;
    /// Re-engagement acceleration
    pub const REENGAGE_ACCEL: f32 = 0.025;
}

/// Dodge (cosmetic) trigger constants
pub mod dodge {
    /// Per-tick velocity change that counts as a dodge
    pub const VELOCITY_CHANGE: f32 = 0.3;
    /// Extra radius of the near-miss test
    pub const NEAR_MISS_PADDING: f32 = 1.5;
    /// Minimum speed for a near miss to count
    pub const MIN_SPEED: f32 = 0.1;
    /// Minimum time between two dodge events of the same combatant
    pub const DEBOUNCE: f64 = 1.0;
}

/// Spawn constants
pub mod spawn {
    use crate::util::vec3::Vec3;

    /// Player one spawn point
    pub const PLAYER_ONE: Vec3 = Vec3::new(3.0, 0.5, 0.0);
    /// Player two spawn point
    pub const PLAYER_TWO: Vec3 = Vec3::new(-3.0, 0.5, 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friction_is_decay_factor() {
        assert!(physics::FRICTION > 0.0 && physics::FRICTION < 1.0);
    }

    #[test]
    fn test_five_hits_knock_out() {
        assert_eq!(combat::MAX_HEALTH / combat::ATTACK_DAMAGE, 5);
    }

    #[test]
    fn test_seek_weaker_than_input() {
        assert!(engagement::SEEK_ACCEL < physics::MOVE_SPEED);
        assert!(engagement::SEEK_ACCEL < engagement::PULL_ACCEL);
        assert!(engagement::PULL_ACCEL < engagement::REENGAGE_ACCEL);
    }

    #[test]
    fn test_spawns_inside_arena() {
        let limit = arena::HALF_EXTENT - body::RADIUS;
        for spawn in [spawn::PLAYER_ONE, spawn::PLAYER_TWO] {
            assert!((spawn.x - arena::CENTER.x).abs() <= limit);
            assert!((spawn.z - arena::CENTER.z).abs() <= limit);
        }
    }

    #[test]
    fn test_tick_duration_matches_rate() {
        assert!((physics::DT * physics::TICK_RATE as f64 - 1.0).abs() < 1e-9);
    }
}
