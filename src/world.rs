//! Simulation world: configuration and the per-substep pipeline.

use glam::Vec3;
use tracing::trace;

use crate::broadphase::UniformGrid;
use crate::constraint::{AnyConstraint, Constraint};
use crate::contact::Contact;
use crate::ecs::components::physics::{Collider, ColliderShape, RigidBody};
use crate::ecs::components::transform::Transform;
use crate::{narrowphase, rigid_body, solver};

/// Broad-phase cell size used by the world.
const GRID_CELL_SIZE: f32 = 2.0;

/// Configuration for the simulation.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: (0, -9.81, 0).
    pub gravity: Vec3,
    /// Fixed timestep for each substep in seconds. Default: 1/60.
    pub fixed_timestep: f32,
    /// Restitution passed to the resolver for every contact. Default: 0.5.
    pub restitution: f32,
    /// Friction coefficient passed to the resolver for every contact.
    /// Default: 0.4.
    pub friction: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_timestep: 1.0 / 60.0,
            restitution: 0.5,
            friction: 0.4,
        }
    }
}

/// Owns the substep pipeline: force accumulation, integration, broad
/// phase, narrow phase, contact resolution, constraint solving.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    broadphase: UniformGrid,
    contacts: Vec<Contact>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl PhysicsWorld {
    /// Create a physics world with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            broadphase: UniformGrid::new(GRID_CELL_SIZE),
            contacts: Vec::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PhysicsConfig {
        &mut self.config
    }

    /// Broad-phase cell size.
    pub fn cell_size(&self) -> f32 {
        self.broadphase.cell_size()
    }

    /// Contacts recorded by the most recent substep.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Advance the world by one fixed substep.
    ///
    /// Phases run strictly in order: gravity, integration, broad phase,
    /// narrow phase with resolution in pair-emission order, then each
    /// constraint's pre-solve/solve/post-solve in addition order.
    pub fn step(&mut self, world: &mut hecs::World, constraints: &mut [AnyConstraint]) {
        let dt = self.config.fixed_timestep;

        // 1. Gravity into the force accumulators
        rigid_body::apply_gravity(world, self.config.gravity);

        // 2. Newton-Euler integration
        rigid_body::integrate(world, dt);

        // 3. Broad phase
        let pairs = self.broadphase.find_pairs(world);

        // 4. Narrow phase + contact resolution
        self.contacts.clear();
        for (entity_a, entity_b) in pairs {
            if both_static(world, entity_a, entity_b) {
                continue;
            }

            let info = match (shape_of(world, entity_a), shape_of(world, entity_b)) {
                (Some((shape_a, ta)), Some((shape_b, tb))) => {
                    narrowphase::detect_collision(&shape_a, &ta, &shape_b, &tb)
                }
                _ => None,
            };

            if let Some(info) = info {
                let contact = Contact {
                    body_a: entity_a,
                    body_b: entity_b,
                    normal: info.normal,
                    penetration: info.penetration,
                    point: info.point,
                };
                solver::resolve_contact(
                    world,
                    &contact,
                    self.config.restitution,
                    self.config.friction,
                );
                self.contacts.push(contact);
            }
        }
        trace!(contacts = self.contacts.len(), "substep resolved");

        // 5. Constraints in addition order
        for constraint in constraints.iter_mut() {
            constraint.pre_solve(world, dt);
            constraint.solve(world, dt);
            constraint.post_solve(world);
        }
    }
}

fn both_static(world: &hecs::World, entity_a: hecs::Entity, entity_b: hecs::Entity) -> bool {
    let static_a = world
        .get::<&RigidBody>(entity_a)
        .map(|rb| rb.is_static())
        .unwrap_or(true);
    let static_b = world
        .get::<&RigidBody>(entity_b)
        .map(|rb| rb.is_static())
        .unwrap_or(true);
    static_a && static_b
}

fn shape_of(world: &hecs::World, entity: hecs::Entity) -> Option<(ColliderShape, Transform)> {
    let collider = world.get::<&Collider>(entity).ok()?;
    let transform = world.get::<&Transform>(entity).ok()?;
    Some((collider.shape, *transform))
}
