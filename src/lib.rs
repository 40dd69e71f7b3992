//! Impulse-based 3D rigid body physics engine.
//!
//! # Architecture
//!
//! One call to [`Engine::update`] clamps the wall-clock delta and runs up
//! to a bounded number of fixed substeps. Each substep executes the
//! pipeline in order:
//!
//! 1. Accumulate gravity into the force accumulators
//! 2. Integrate Newton-Euler dynamics
//! 3. Broadphase collision detection (uniform grid)
//! 4. Narrowphase collision detection (sphere, AABB, SAT)
//! 5. Resolve contacts (impulses + positional correction)
//! 6. Solve articulated constraints
//!
//! Bodies live in a [`hecs::World`] as `Transform` + `RigidBody` +
//! `Collider` components; `hecs::Entity` is the body handle. The engine
//! owns the world, so constraints refer to bodies by entity and never by
//! pointer.

pub mod broadphase;
pub mod constraint;
pub mod contact;
pub mod ecs;
pub mod engine;
pub mod narrowphase;
pub mod rigid_body;
pub mod scene;
pub mod solver;
pub mod world;

/// Near-zero threshold shared by the collision and constraint code.
pub const EPSILON: f32 = 1e-6;

// Re-export commonly used types
pub use broadphase::UniformGrid;
pub use constraint::{
    AnyConstraint, ConeTwistConstraint, Constraint, DistanceConstraint, HingeConstraint,
    HingeDriver, PointToPointConstraint, SliderConstraint,
};
pub use contact::{Contact, ContactInfo};
pub use ecs::components::physics::{Collider, ColliderShape, RigidBody};
pub use ecs::components::transform::Transform;
pub use engine::debug_draw::{DebugDrawData, DebugLine, DebugPoint, DebugText};
pub use engine::{BodySnapshot, Engine, EngineError, Settings};
pub use scene::{SceneBody, SceneData, SceneError};
pub use world::{PhysicsConfig, PhysicsWorld};

// Re-export glam for convenience
pub use glam;
