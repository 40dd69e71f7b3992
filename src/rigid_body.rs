//! Force application and Newton-Euler integration.

use glam::{Quat, Vec3};

use crate::ecs::components::physics::RigidBody;
use crate::ecs::components::transform::Transform;

/// Apply gravity to every dynamic body: `F += g * m`.
pub fn apply_gravity(world: &mut hecs::World, gravity: Vec3) {
    for (_, rb) in world.query_mut::<&mut RigidBody>() {
        if !rb.is_static() {
            rb.force_accumulator += gravity * rb.mass;
        }
    }
}

/// Apply a force at a world-space point, accumulating the lever-arm
/// torque `(point - position) x force`.
pub fn apply_force_at_point(
    world: &mut hecs::World,
    entity: hecs::Entity,
    force: Vec3,
    point: Vec3,
) {
    if let Ok((rb, transform)) = world.query_one_mut::<(&mut RigidBody, &Transform)>(entity) {
        rb.apply_force(force);
        rb.apply_torque((point - transform.position).cross(force));
    }
}

/// Integrate every body by `dt`.
///
/// Static bodies do not move, but their accumulators are still cleared:
/// forces applied between steps never carry over.
pub fn integrate(world: &mut hecs::World, dt: f32) {
    for (_, (rb, transform)) in world.query_mut::<(&mut RigidBody, &mut Transform)>() {
        if rb.is_static() {
            rb.clear_accumulators();
            continue;
        }

        // Linear: p += v*dt + a*dt^2/2, then v += a*dt
        let accel = rb.force_accumulator * rb.inv_mass;
        transform.position += rb.linear_velocity * dt + accel * (0.5 * dt * dt);
        rb.linear_velocity += accel * dt;

        // Angular: omega += (I^-1 * tau) * dt
        let ang_accel = rb.inv_inertia * rb.torque_accumulator;
        rb.angular_velocity += ang_accel * dt;

        // q' = q + 0.5 * dt * omega_quat * q, renormalized to bound drift
        let omega = rb.angular_velocity;
        if omega.length_squared() > 1e-10 {
            let omega_quat = Quat::from_xyzw(omega.x, omega.y, omega.z, 0.0);
            let q_dot = omega_quat * transform.rotation * 0.5;
            transform.rotation = Quat::from_xyzw(
                transform.rotation.x + q_dot.x * dt,
                transform.rotation.y + q_dot.y * dt,
                transform.rotation.z + q_dot.z * dt,
                transform.rotation.w + q_dot.w * dt,
            )
            .normalize();
        }

        rb.clear_accumulators();
    }
}
