//! Two-body impulse response along the contact normal

use crate::game::systems::collision::contact_normal;
use crate::util::vec3::Vec3;

/// Post-collision velocities for both bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub velocity_a: Vec3,
    pub velocity_b: Vec3,
}

/// Resolve a collision between A and B.
///
/// Each velocity is split into a component along the B→A normal and a
/// tangential remainder. The 1-D collision formula, scaled by `restitution`
/// (0 = perfectly inelastic, 1 = perfectly elastic), is applied to the
/// normal components only; tangential components pass through unchanged.
/// Bodies that are already separating along the normal are left alone.
pub fn resolve(
    pos_a: Vec3,
    vel_a: Vec3,
    mass_a: f32,
    pos_b: Vec3,
    vel_b: Vec3,
    mass_b: f32,
    restitution: f32,
) -> Resolution {
    debug_assert!(mass_a > 0.0 && mass_b > 0.0, "masses must be positive");

    let (normal, _) = contact_normal(pos_a, pos_b);

    let va_n = vel_a.dot(normal);
    let vb_n = vel_b.dot(normal);

    // Closing speed along the normal; <= 0 means the pair is separating
    if vb_n - va_n <= 0.0 {
        return Resolution {
            velocity_a: vel_a,
            velocity_b: vel_b,
        };
    }

    let total = mass_a + mass_b;
    let va_n_new = ((mass_a - restitution * mass_b) * va_n + (1.0 + restitution) * mass_b * vb_n) / total;
    let vb_n_new = ((mass_b - restitution * mass_a) * vb_n + (1.0 + restitution) * mass_a * va_n) / total;

    Resolution {
        velocity_a: vel_a + normal * (va_n_new - va_n),
        velocity_b: vel_b + normal * (vb_n_new - vb_n),
    }
}

/// Positional correction: push A and B apart along the B→A `normal` by half
/// the penetration each. Returns the corrected positions.
pub fn separate(pos_a: Vec3, pos_b: Vec3, normal: Vec3, penetration: f32) -> (Vec3, Vec3) {
    let push = normal.horizontal() * (penetration.max(0.0) * 0.5);
    (pos_a + push, pos_b - push)
}
