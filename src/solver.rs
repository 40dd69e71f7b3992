//! Impulse-based contact resolution with positional correction.

use glam::Vec3;

use crate::contact::Contact;
use crate::ecs::components::physics::RigidBody;
use crate::ecs::components::transform::Transform;
use crate::EPSILON;

/// Fraction of the remaining penetration corrected per substep.
const CORRECTION_PERCENT: f32 = 0.2;
/// Penetration tolerated before positional correction kicks in.
const PENETRATION_SLOP: f32 = 0.01;

#[derive(Clone, Copy)]
struct BodyState {
    inv_mass: f32,
    velocity: Vec3,
}

/// Resolve a single contact with the given pair material.
///
/// Pushes the bodies apart proportionally to their inverse masses, then
/// applies a restitution impulse along the normal and a Coulomb friction
/// impulse along the tangent, clamped to `mu * |j|`. `restitution` and
/// `friction` apply to the pair as a whole; the caller decides where they
/// come from (the world passes its configured defaults). Pairs whose
/// combined inverse mass is zero are left untouched.
pub fn resolve_contact(
    world: &mut hecs::World,
    contact: &Contact,
    restitution: f32,
    friction: f32,
) {
    let (a, b) = match (
        body_state(world, contact.body_a),
        body_state(world, contact.body_b),
    ) {
        (Some(a), Some(b)) => (a, b),
        _ => return,
    };

    let inv_mass_sum = a.inv_mass + b.inv_mass;
    if inv_mass_sum == 0.0 {
        return;
    }

    let normal = contact.normal;

    // Positional correction above the slop, split by inverse mass
    let correction =
        (contact.penetration - PENETRATION_SLOP).max(0.0) / inv_mass_sum * CORRECTION_PERCENT;
    if correction > 0.0 {
        nudge_position(world, contact.body_a, -normal * (correction * a.inv_mass));
        nudge_position(world, contact.body_b, normal * (correction * b.inv_mass));
    }

    let relative_velocity = b.velocity - a.velocity;
    let contact_velocity = relative_velocity.dot(normal);
    if contact_velocity > 0.0 {
        // Already separating
        return;
    }

    let j = -(1.0 + restitution) * contact_velocity / inv_mass_sum;
    apply_linear_impulse(world, contact.body_a, contact.body_b, normal * j);

    // Coulomb friction: arrest tangential motion, clamped to mu * |j|
    let relative_velocity =
        linear_velocity(world, contact.body_b) - linear_velocity(world, contact.body_a);
    let tangent_velocity = relative_velocity - normal * relative_velocity.dot(normal);
    let tangent_len = tangent_velocity.length();
    if tangent_len <= EPSILON {
        return;
    }

    let tangent = tangent_velocity / tangent_len;
    let max_friction = friction * j.abs();
    let jt = (-tangent_len / inv_mass_sum).clamp(-max_friction, max_friction);
    apply_linear_impulse(world, contact.body_a, contact.body_b, tangent * jt);
}

fn body_state(world: &hecs::World, entity: hecs::Entity) -> Option<BodyState> {
    let rb = world.get::<&RigidBody>(entity).ok()?;
    Some(BodyState {
        inv_mass: rb.inv_mass,
        velocity: rb.linear_velocity,
    })
}

fn linear_velocity(world: &hecs::World, entity: hecs::Entity) -> Vec3 {
    world
        .get::<&RigidBody>(entity)
        .map(|rb| rb.linear_velocity)
        .unwrap_or(Vec3::ZERO)
}

/// Apply an equal-and-opposite impulse to the pair's linear velocities.
fn apply_linear_impulse(
    world: &mut hecs::World,
    entity_a: hecs::Entity,
    entity_b: hecs::Entity,
    impulse: Vec3,
) {
    if let Ok(mut rb) = world.get::<&mut RigidBody>(entity_a) {
        let inv_mass = rb.inv_mass;
        rb.linear_velocity -= impulse * inv_mass;
    }
    if let Ok(mut rb) = world.get::<&mut RigidBody>(entity_b) {
        let inv_mass = rb.inv_mass;
        rb.linear_velocity += impulse * inv_mass;
    }
}

fn nudge_position(world: &mut hecs::World, entity: hecs::Entity, delta: Vec3) {
    if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
        transform.position += delta;
    }
}
