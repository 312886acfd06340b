use crate::config::SimConfig;
use crate::game::input::Intent;
use crate::game::state::Combatant;
use crate::util::vec3::Vec3;

/// Apply this tick's movement intent.
///
/// With a movement intent the body accelerates by `intent * move_speed`.
/// Without one it drifts toward the opponent with the weaker seek
/// acceleration, but only when farther apart than the seek distance.
/// Returns true if the player steered manually.
pub fn apply_intent(combatant: &mut Combatant, intent: &Intent, opponent: Vec3, config: &SimConfig) -> bool {
    if intent.has_movement() {
        combatant.velocity += intent.movement.horizontal() * config.move_speed;
        return true;
    }

    if combatant.position.horizontal_distance_to(opponent) > config.seek_distance {
        accelerate_toward(combatant, opponent, config.seek_accel);
    }
    false
}

/// Add `accel` to the velocity in the horizontal direction of `target`
#[inline]
pub fn accelerate_toward(combatant: &mut Combatant, target: Vec3, accel: f32) {
    combatant.velocity += combatant.position.horizontal_direction_to(target) * accel;
}

/// Integrate one tick
/// CRITICAL: Uses exponential friction (velocity *= FRICTION), NOT additive drag
///
/// Friction decays the velocity, the position advances by one tick of
/// velocity, and the result is confined to the arena.
pub fn integrate(combatant: &mut Combatant, config: &SimConfig) {
    combatant.velocity *= config.friction;
    combatant.position += combatant.velocity;
    confine(combatant, config);
}

/// Clamp the combatant into the arena
#[inline]
pub fn confine(combatant: &mut Combatant, config: &SimConfig) {
    combatant.position = config.arena_shape.clamp(
        combatant.position,
        config.arena_center,
        config.arena_half_extent,
        config.body_radius,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::CombatantId;
    use crate::game::systems::bounds::ArenaShape;

    fn create_combatant(position: Vec3, velocity: Vec3) -> Combatant {
        let mut c = Combatant::new(CombatantId::One, position, 100);
        c.velocity = velocity;
        c
    }

    #[test]
    fn test_exponential_friction() {
        let config = SimConfig::default();
        let mut c = create_combatant(Vec3::new(0.0, 0.5, 0.0), Vec3::planar(0.2, 0.0));

        integrate(&mut c, &config);

        assert!((c.velocity.x - 0.2 * 0.85).abs() < 1e-6);
        assert!((c.position.x - 0.17).abs() < 1e-6);
    }

    #[test]
    fn test_friction_is_not_linear() {
        let config = SimConfig::default();
        let mut c = create_combatant(Vec3::new(0.0, 0.5, 0.0), Vec3::planar(1.0, 0.0));

        for _ in 0..10 {
            integrate(&mut c, &config);
        }

        // 0.85^10 ≈ 0.1969; an additive drag would have stopped it entirely
        assert!((c.velocity.x - 0.85f32.powi(10)).abs() < 1e-5);
    }

    #[test]
    fn test_intent_accelerates() {
        let config = SimConfig::default();
        let mut c = create_combatant(Vec3::new(3.0, 0.5, 0.0), Vec3::ZERO);
        let intent = Intent {
            movement: Vec3::planar(0.0, -1.0),
            attack: false,
        };

        let steered = apply_intent(&mut c, &intent, Vec3::new(-3.0, 0.5, 0.0), &config);

        assert!(steered);
        assert!((c.velocity.z + config.move_speed).abs() < 1e-6);
        assert_eq!(c.velocity.x, 0.0);
    }

    #[test]
    fn test_idle_seeks_distant_opponent() {
        let config = SimConfig::default();
        let mut c = create_combatant(Vec3::new(3.0, 0.5, 0.0), Vec3::ZERO);

        let steered = apply_intent(&mut c, &Intent::default(), Vec3::new(-3.0, 0.5, 0.0), &config);

        assert!(!steered);
        assert!((c.velocity.x + config.seek_accel).abs() < 1e-6);
    }

    #[test]
    fn test_idle_does_not_seek_close_opponent() {
        let config = SimConfig::default();
        let mut c = create_combatant(Vec3::new(1.0, 0.5, 0.0), Vec3::ZERO);

        apply_intent(&mut c, &Intent::default(), Vec3::new(-0.5, 0.5, 0.0), &config);

        assert_eq!(c.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_seek_weaker_than_input() {
        let config = SimConfig::default();
        let opponent = Vec3::new(-3.0, 0.5, 0.0);
        let mut seeking = create_combatant(Vec3::new(3.0, 0.5, 0.0), Vec3::ZERO);
        let mut fleeing = create_combatant(Vec3::new(3.0, 0.5, 0.0), Vec3::ZERO);

        apply_intent(&mut seeking, &Intent::default(), opponent, &config);
        apply_intent(
            &mut fleeing,
            &Intent {
                movement: Vec3::planar(1.0, 0.0),
                attack: false,
            },
            opponent,
            &config,
        );

        assert!(fleeing.velocity.length() > seeking.velocity.length());
    }

    #[test]
    fn test_integrate_confines_to_arena() {
        let config = SimConfig::default();
        let mut c = create_combatant(Vec3::new(6.6, 0.5, 0.0), Vec3::planar(2.0, 0.0));

        integrate(&mut c, &config);

        let limit = config.arena_half_extent - config.body_radius;
        assert!((c.position.x - limit).abs() < 1e-6);
        assert_eq!(c.position.y, 0.5);
    }

    #[test]
    fn test_confine_follows_arena_shape() {
        let config = SimConfig {
            arena_shape: ArenaShape::Circle,
            ..SimConfig::default()
        };
        let mut c = create_combatant(Vec3::new(6.0, 0.5, 6.0), Vec3::ZERO);

        confine(&mut c, &config);

        let limit = config.arena_half_extent - config.body_radius;
        let from_center = c.position.horizontal_distance_to(config.arena_center);
        assert!((from_center - limit).abs() < 1e-5);
        assert!((c.position.x - c.position.z).abs() < 1e-6);
    }

    #[test]
    fn test_physics_determinism() {
        let config = SimConfig::default();
        let mut a = create_combatant(Vec3::new(1.0, 0.5, 1.0), Vec3::planar(0.3, -0.2));
        let mut b = a.clone();
        let intent = Intent {
            movement: Vec3::planar(1.0, 1.0),
            attack: false,
        };

        for _ in 0..100 {
            apply_intent(&mut a, &intent, Vec3::ZERO, &config);
            integrate(&mut a, &config);
            apply_intent(&mut b, &intent, Vec3::ZERO, &config);
            integrate(&mut b, &config);
        }

        assert_eq!(a.position, b.position);
        assert_eq!(a.velocity, b.velocity);
    }
}
