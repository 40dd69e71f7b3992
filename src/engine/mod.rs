//! Fixed-timestep scheduler around the physics world, with body and
//! constraint factories, state snapshots, and debug-draw output.

pub mod debug_draw;

use std::collections::VecDeque;
use std::path::Path;

use glam::{Quat, Vec3};
use thiserror::Error;
use tracing::{info, trace};

use crate::constraint::{
    AnyConstraint, ConeTwistConstraint, DistanceConstraint, HingeConstraint, HingeDriver,
    PointToPointConstraint, SliderConstraint,
};
use crate::contact::Contact;
use crate::ecs::components::physics::{Collider, ColliderShape, RigidBody};
use crate::ecs::components::transform::Transform;
use crate::scene::{self, SceneError};
use crate::world::{PhysicsConfig, PhysicsWorld};

use self::debug_draw::DebugDrawData;

/// Half extent of the slab standing in for an infinite plane.
const PLANE_HALF_EXTENT: f32 = 500.0;
/// Half thickness of the plane slab along its normal.
const PLANE_HALF_THICKNESS: f32 = 0.5;
/// Platform dimensions for kinematic hinges.
const PLATFORM_HALF_EXTENTS: Vec3 = Vec3::new(2.0, 0.25, 2.0);
/// Half extent of the debug grid floor.
const GRID_HALF_EXTENT: f32 = 20.0;
/// Number of frame-time samples in the FPS window.
const FPS_WINDOW: usize = 120;
/// Screen size of contact debug points.
const CONTACT_POINT_SIZE: f32 = 6.0;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A configuration value was rejected.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Engine configuration and debug-draw switches.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Substep length in seconds. Default: 1/60.
    pub fixed_time_step: f32,
    /// Upper bound on the wall-clock delta consumed per update. Default: 0.25.
    pub max_time_step: f32,
    /// Maximum substeps per update. Default: 4.
    pub max_sub_steps: u32,
    /// Gravity vector. Default: (0, -9.81, 0).
    pub gravity: Vec3,
    /// Restitution the world resolves every contact with; also stamped
    /// onto factory-created bodies. Default: 0.5.
    pub default_restitution: f32,
    /// Friction the world resolves every contact with; also stamped onto
    /// factory-created bodies. Default: 0.3.
    pub default_friction: f32,
    pub show_debug_draw: bool,
    pub show_colliders: bool,
    pub show_contacts: bool,
    pub show_grid: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fixed_time_step: 1.0 / 60.0,
            max_time_step: 0.25,
            max_sub_steps: 4,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            default_restitution: 0.5,
            default_friction: 0.3,
            show_debug_draw: true,
            show_colliders: true,
            show_contacts: false,
            show_grid: true,
        }
    }
}

/// Snapshot of a body's pose and shape for host-side consumption.
#[derive(Debug, Clone, Copy)]
pub struct BodySnapshot {
    pub position: Vec3,
    pub orientation: Quat,
    pub shape: ColliderShape,
    pub mass: f32,
}

/// Owns the bodies, constraints and the stepping loop.
///
/// Host code reads body state only between [`Engine::update`] calls.
pub struct Engine {
    settings: Settings,
    world: hecs::World,
    physics: PhysicsWorld,
    constraints: Vec<AnyConstraint>,
    bodies: Vec<hecs::Entity>,
    debug_draw: DebugDrawData,
    frame_times: VecDeque<f32>,
    elapsed: f32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let physics = PhysicsWorld::new(PhysicsConfig {
            gravity: settings.gravity,
            fixed_timestep: settings.fixed_time_step,
            restitution: settings.default_restitution,
            friction: settings.default_friction,
        });
        info!(
            fixed_time_step = settings.fixed_time_step,
            max_sub_steps = settings.max_sub_steps,
            "engine initialized"
        );
        Self {
            settings,
            world: hecs::World::new(),
            physics,
            constraints: Vec::new(),
            bodies: Vec::new(),
            debug_draw: DebugDrawData::default(),
            frame_times: VecDeque::with_capacity(FPS_WINDOW),
            elapsed: 0.0,
        }
    }

    /// Advance the simulation by a wall-clock delta.
    ///
    /// Negative deltas clamp to zero; a NaN delta is left alone and
    /// propagates through the elapsed clock and the stepping budget (no
    /// substep runs). The budget is the delta clamped to `max_time_step`,
    /// consumed in up to `max_sub_steps` fixed substeps. Debug geometry
    /// is rebuilt afterwards when enabled.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt < 0.0 { 0.0 } else { dt };
        self.elapsed += dt;
        if dt > 0.0 {
            if self.frame_times.len() == FPS_WINDOW {
                self.frame_times.pop_front();
            }
            self.frame_times.push_back(dt);
        }

        // Comparison instead of f32::min so NaN is not silently replaced
        let mut budget = if dt > self.settings.max_time_step {
            self.settings.max_time_step
        } else {
            dt
        };
        let mut substeps = 0u32;
        while budget > 0.0 && substeps < self.settings.max_sub_steps {
            self.physics.step(&mut self.world, &mut self.constraints);
            budget -= self.settings.fixed_time_step;
            substeps += 1;
        }
        trace!(substeps, "engine update");

        if self.settings.show_debug_draw {
            self.rebuild_debug_draw();
        }
    }

    fn spawn_body(&mut self, position: Vec3, shape: ColliderShape, mass: f32) -> hecs::Entity {
        let mut rb = RigidBody::new(mass);
        rb.restitution = self.settings.default_restitution;
        rb.friction = self.settings.default_friction;
        let entity = self
            .world
            .spawn((Transform::from_position(position), rb, Collider { shape }));
        self.bodies.push(entity);
        entity
    }

    /// Create a sphere body.
    pub fn create_sphere(&mut self, position: Vec3, radius: f32, mass: f32) -> hecs::Entity {
        self.spawn_body(position, ColliderShape::Sphere { radius }, mass)
    }

    /// Create an axis-aligned box body. `size` is the full extents.
    pub fn create_box(&mut self, position: Vec3, size: Vec3, mass: f32) -> hecs::Entity {
        self.spawn_body(
            position,
            ColliderShape::Box {
                half_extents: size * 0.5,
            },
            mass,
        )
    }

    /// Create a box body whose orientation participates in collision.
    pub fn create_oriented_box(&mut self, position: Vec3, size: Vec3, mass: f32) -> hecs::Entity {
        self.spawn_body(
            position,
            ColliderShape::OrientedBox {
                half_extents: size * 0.5,
            },
            mass,
        )
    }

    /// Create a plane as a large thin slab centred at `normal * distance`,
    /// thin along the normal's dominant axis. `mass` is normally 0.
    pub fn create_plane(&mut self, normal: Vec3, distance: f32, mass: f32) -> hecs::Entity {
        let normal = normal.normalize_or_zero();
        let mut half_extents = Vec3::splat(PLANE_HALF_EXTENT);
        half_extents[dominant_axis(normal)] = PLANE_HALF_THICKNESS;
        self.spawn_body(
            normal * distance,
            ColliderShape::Box { half_extents },
            mass,
        )
    }

    /// Add a constraint and return its handle.
    pub fn add_constraint(&mut self, constraint: AnyConstraint) -> usize {
        self.constraints.push(constraint);
        self.constraints.len() - 1
    }

    /// Pin a world-space anchor point on both bodies together.
    pub fn create_point_to_point(
        &mut self,
        body_a: hecs::Entity,
        body_b: hecs::Entity,
        anchor: Vec3,
    ) -> usize {
        let constraint = PointToPointConstraint::new(&self.world, body_a, body_b, anchor);
        self.add_constraint(AnyConstraint::PointToPoint(constraint))
    }

    /// Hinge two bodies about a world-space anchor and axis.
    pub fn create_hinge(
        &mut self,
        body_a: hecs::Entity,
        body_b: hecs::Entity,
        anchor: Vec3,
        axis: Vec3,
    ) -> usize {
        let constraint = HingeConstraint::new(&self.world, body_a, body_b, anchor, axis);
        self.add_constraint(AnyConstraint::Hinge(constraint))
    }

    /// Constrain two bodies to translate along a shared axis.
    pub fn create_slider(
        &mut self,
        body_a: hecs::Entity,
        body_b: hecs::Entity,
        anchor: Vec3,
        axis: Vec3,
    ) -> usize {
        let constraint = SliderConstraint::new(&self.world, body_a, body_b, anchor, axis);
        self.add_constraint(AnyConstraint::Slider(constraint))
    }

    /// Keep two body centres a fixed distance apart.
    pub fn create_distance(
        &mut self,
        body_a: hecs::Entity,
        body_b: hecs::Entity,
        length: f32,
    ) -> usize {
        let constraint = DistanceConstraint::new(&self.world, body_a, body_b, length);
        self.add_constraint(AnyConstraint::Distance(constraint))
    }

    /// Cone-twist joint with explicit swing and twist spans (radians).
    /// Spans of pi leave the joint effectively unlimited.
    pub fn create_cone_twist(
        &mut self,
        body_a: hecs::Entity,
        body_b: hecs::Entity,
        anchor: Vec3,
        axis: Vec3,
        swing_span1: f32,
        swing_span2: f32,
        twist_span: f32,
    ) -> usize {
        let constraint = ConeTwistConstraint::new(&self.world, body_a, body_b, anchor, axis)
            .with_spans(swing_span1, swing_span2, twist_span);
        self.add_constraint(AnyConstraint::ConeTwist(constraint))
    }

    /// Create a kinematic hinge: an engine-owned static platform pinned at
    /// `pivot` whose angle the host drives each frame (or that advances
    /// itself by `angular_velocity` while `rotating` is set).
    pub fn create_kinematic_hinge(
        &mut self,
        pivot: Vec3,
        axis: Vec3,
        angular_velocity: f32,
        rotating: bool,
    ) -> usize {
        let body = self.spawn_body(
            pivot,
            ColliderShape::OrientedBox {
                half_extents: PLATFORM_HALF_EXTENTS,
            },
            0.0,
        );
        let driver = HingeDriver::new(body, pivot, axis, angular_velocity, rotating);
        self.add_constraint(AnyConstraint::Driver(driver))
    }

    /// Set the target angle of a kinematic hinge. Unknown handles and
    /// non-driver constraints are ignored.
    pub fn set_kinematic_hinge_angle(&mut self, handle: usize, angle: f32) {
        if let Some(AnyConstraint::Driver(driver)) = self.constraints.get_mut(handle) {
            driver.target_angle = angle;
        }
    }

    pub fn toggle_debug_draw(&mut self) {
        self.settings.show_debug_draw = !self.settings.show_debug_draw;
    }

    pub fn toggle_colliders(&mut self) {
        self.settings.show_colliders = !self.settings.show_colliders;
    }

    pub fn toggle_contacts(&mut self) {
        self.settings.show_contacts = !self.settings.show_contacts;
    }

    pub fn toggle_grid(&mut self) {
        self.settings.show_grid = !self.settings.show_grid;
    }

    /// Despawn every engine-owned body and drop all constraints.
    pub fn reset_scene(&mut self) {
        self.world.clear();
        self.bodies.clear();
        self.constraints.clear();
        self.debug_draw.clear();
        info!("scene reset");
    }

    pub fn body_count(&self) -> u32 {
        self.bodies.len() as u32
    }

    /// Snapshot the i-th body (insertion order).
    pub fn body_snapshot(&self, index: u32) -> Option<BodySnapshot> {
        let entity = *self.bodies.get(index as usize)?;
        let transform = self.world.get::<&Transform>(entity).ok()?;
        let collider = self.world.get::<&Collider>(entity).ok()?;
        let rb = self.world.get::<&RigidBody>(entity).ok()?;
        Some(BodySnapshot {
            position: transform.position,
            orientation: transform.rotation,
            shape: collider.shape,
            mass: rb.mass,
        })
    }

    /// Live body handles in insertion order.
    pub fn body_handles(&self) -> &[hecs::Entity] {
        &self.bodies
    }

    /// Contacts recorded by the most recent substep.
    pub fn contacts(&self) -> &[Contact] {
        self.physics.contacts()
    }

    pub fn debug_draw_data(&self) -> &DebugDrawData {
        &self.debug_draw
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Rolling average frame rate over the recent update window.
    pub fn average_fps(&self) -> f32 {
        let total: f32 = self.frame_times.iter().sum();
        if total > 0.0 {
            self.frame_times.len() as f32 / total
        } else {
            0.0
        }
    }

    /// Wall-clock seconds consumed by `update` so far.
    pub fn elapsed_time(&self) -> f32 {
        self.elapsed
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    /// Change the fixed timestep. Non-positive or non-finite values are
    /// rejected.
    pub fn set_time_step(&mut self, dt: f32) -> Result<(), EngineError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(EngineError::InvalidParameter(
                "fixed_time_step must be positive",
            ));
        }
        self.settings.fixed_time_step = dt;
        self.physics.config_mut().fixed_timestep = dt;
        Ok(())
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.settings.gravity = gravity;
        self.physics.config_mut().gravity = gravity;
    }

    /// Serialize settings and bodies to the line-oriented scene format.
    pub fn save_scene(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let snapshots: Vec<BodySnapshot> = (0..self.body_count())
            .filter_map(|i| self.body_snapshot(i))
            .collect();
        scene::write_scene(path.as_ref(), &self.settings, &snapshots)?;
        info!(bodies = snapshots.len(), "scene saved");
        Ok(())
    }

    /// Load a scene file, replacing the current scene.
    ///
    /// The scene is reset before reading, so a failed read or parse
    /// leaves the world empty.
    pub fn load_scene(&mut self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        self.reset_scene();
        let data = scene::read_scene(path.as_ref())?;

        self.settings.fixed_time_step = data.fixed_time_step;
        self.settings.max_time_step = data.max_time_step;
        self.settings.max_sub_steps = data.max_sub_steps;
        self.settings.gravity = data.gravity;
        self.settings.default_restitution = data.default_restitution;
        self.settings.default_friction = data.default_friction;
        {
            let config = self.physics.config_mut();
            config.fixed_timestep = data.fixed_time_step;
            config.gravity = data.gravity;
            config.restitution = data.default_restitution;
            config.friction = data.default_friction;
        }

        for body in &data.bodies {
            self.spawn_body(body.position, body.shape, body.mass);
        }
        info!(bodies = data.bodies.len(), "scene loaded");
        Ok(())
    }

    fn rebuild_debug_draw(&mut self) {
        self.debug_draw.clear();

        if self.settings.show_colliders {
            for &entity in &self.bodies {
                let pose = self.world.get::<&Transform>(entity).map(|t| *t);
                let collider = self.world.get::<&Collider>(entity).map(|c| *c);
                if let (Ok(pose), Ok(collider)) = (pose, collider) {
                    match collider.shape {
                        ColliderShape::Sphere { radius } => debug_draw::push_sphere_wireframe(
                            &mut self.debug_draw.lines,
                            pose.position,
                            radius,
                            debug_draw::COLLIDER_COLOR,
                        ),
                        ColliderShape::Box { half_extents } => debug_draw::push_box_wireframe(
                            &mut self.debug_draw.lines,
                            pose.position,
                            Quat::IDENTITY,
                            half_extents,
                            debug_draw::COLLIDER_COLOR,
                        ),
                        ColliderShape::OrientedBox { half_extents } => {
                            debug_draw::push_box_wireframe(
                                &mut self.debug_draw.lines,
                                pose.position,
                                pose.rotation,
                                half_extents,
                                debug_draw::COLLIDER_COLOR,
                            )
                        }
                    }
                }
            }
        }

        if self.settings.show_contacts {
            for contact in self.physics.contacts() {
                self.debug_draw.points.push(debug_draw::DebugPoint {
                    position: contact.point,
                    color: debug_draw::CONTACT_COLOR,
                    size: CONTACT_POINT_SIZE,
                });
            }
        }

        if self.settings.show_grid {
            debug_draw::push_grid(
                &mut self.debug_draw.lines,
                GRID_HALF_EXTENT,
                self.physics.cell_size(),
                debug_draw::GRID_COLOR,
            );
        }

        self.debug_draw.texts.push(debug_draw::DebugText {
            text: format!(
                "bodies: {}  contacts: {}  fps: {:.1}",
                self.bodies.len(),
                self.physics.contacts().len(),
                self.average_fps()
            ),
            position: Vec3::ZERO,
            color: debug_draw::TEXT_COLOR,
        });
    }
}

fn dominant_axis(v: Vec3) -> usize {
    let a = v.abs();
    if a.x >= a.y && a.x >= a.z {
        0
    } else if a.y >= a.z {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert!((settings.fixed_time_step - 1.0 / 60.0).abs() < 1e-10);
        assert_eq!(settings.max_time_step, 0.25);
        assert_eq!(settings.max_sub_steps, 4);
        assert_eq!(settings.gravity, Vec3::new(0.0, -9.81, 0.0));
        assert_eq!(settings.default_restitution, 0.5);
        assert_eq!(settings.default_friction, 0.3);
    }

    #[test]
    fn test_factories_and_snapshots() {
        let mut engine = Engine::new();
        let sphere = engine.create_sphere(Vec3::new(0.0, 5.0, 0.0), 1.0, 2.0);
        engine.create_box(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0), 1.0);
        engine.create_plane(Vec3::Y, 0.0, 0.0);

        assert_eq!(engine.body_count(), 3);

        let snap = engine.body_snapshot(0).unwrap();
        assert_eq!(snap.position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(snap.mass, 2.0);
        assert!(matches!(snap.shape, ColliderShape::Sphere { radius } if radius == 1.0));

        let snap = engine.body_snapshot(1).unwrap();
        assert!(
            matches!(snap.shape, ColliderShape::Box { half_extents } if half_extents == Vec3::new(1.0, 2.0, 3.0))
        );

        // Plane is a static thin slab
        let snap = engine.body_snapshot(2).unwrap();
        assert_eq!(snap.mass, 0.0);
        assert!(
            matches!(snap.shape, ColliderShape::Box { half_extents } if half_extents.y == 0.5 && half_extents.x == 500.0)
        );

        assert!(engine.body_snapshot(3).is_none());

        // Factory bodies carry the settings' default material
        let rb = engine.world().get::<&RigidBody>(sphere).unwrap();
        assert_eq!(rb.restitution, 0.5);
        assert_eq!(rb.friction, 0.3);
    }

    #[test]
    fn test_update_clamps_negative_dt() {
        let mut engine = Engine::new();
        let body = engine.create_sphere(Vec3::ZERO, 1.0, 1.0);

        engine.update(-5.0);

        let snap = engine.body_snapshot(0).unwrap();
        assert_eq!(snap.position, Vec3::ZERO);
        let _ = body;
    }

    #[test]
    fn test_nan_dt_propagates() {
        let mut engine = Engine::new();
        engine.create_sphere(Vec3::new(0.0, 5.0, 0.0), 1.0, 1.0);

        engine.update(f32::NAN);

        // NaN is not clamped away: it poisons the elapsed clock and the
        // stepping budget, so no substep runs.
        assert!(engine.elapsed_time().is_nan());
        let snap = engine.body_snapshot(0).unwrap();
        assert_eq!(snap.position, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_update_bounds_substeps() {
        let mut engine = Engine::new();
        engine.create_sphere(Vec3::new(0.0, 100.0, 0.0), 1.0, 1.0);

        // A huge wall delta is clamped to max_time_step and at most
        // max_sub_steps substeps: 4 * 1/60 s of simulated fall.
        engine.update(1000.0);

        let snap = engine.body_snapshot(0).unwrap();
        let dt = 1.0 / 60.0;
        let mut expected = 100.0;
        let mut velocity = 0.0;
        for _ in 0..4 {
            let accel = -9.81;
            expected += velocity * dt + 0.5 * accel * dt * dt;
            velocity += accel * dt;
        }
        assert_relative_eq!(snap.position.y, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_head_on_spheres_through_engine() {
        let mut engine = Engine::with_settings(Settings {
            gravity: Vec3::ZERO,
            default_friction: 0.0,
            ..Settings::default()
        });
        let a = engine.create_sphere(Vec3::new(-2.0, 0.0, 0.0), 1.0, 1.0);
        let b = engine.create_sphere(Vec3::new(2.0, 0.0, 0.0), 1.0, 1.0);
        engine
            .world_mut()
            .get::<&mut RigidBody>(a)
            .unwrap()
            .linear_velocity = Vec3::new(5.0, 0.0, 0.0);
        engine
            .world_mut()
            .get::<&mut RigidBody>(b)
            .unwrap()
            .linear_velocity = Vec3::new(-5.0, 0.0, 0.0);

        for _ in 0..120 {
            engine.update(1.0 / 60.0);
        }

        let pa = engine.body_snapshot(0).unwrap().position;
        let pb = engine.body_snapshot(1).unwrap().position;
        let va = engine.world().get::<&RigidBody>(a).unwrap().linear_velocity;
        let vb = engine.world().get::<&RigidBody>(b).unwrap().linear_velocity;

        assert!(pa.x <= pb.x, "bodies must not cross");
        assert!((va.x + vb.x).abs() < 1e-4, "momentum conserved");
        assert!(va.x.abs() <= 5.0 + 1e-4 && vb.x.abs() <= 5.0 + 1e-4);
    }

    #[test]
    fn test_kinematic_hinge_driver() {
        let mut engine = Engine::new();
        let handle = engine.create_kinematic_hinge(Vec3::new(0.0, 1.0, 0.0), Vec3::Y, 0.0, false);
        assert_eq!(engine.body_count(), 1);

        engine.set_kinematic_hinge_angle(handle, 1.0);
        engine.update(1.0 / 60.0);

        let snap = engine.body_snapshot(0).unwrap();
        assert_eq!(snap.position, Vec3::new(0.0, 1.0, 0.0));
        let expected = Quat::from_axis_angle(Vec3::Y, 1.0);
        assert!(snap.orientation.dot(expected).abs() > 1.0 - 1e-5);

        // Out-of-range handles are a silent no-op
        engine.set_kinematic_hinge_angle(99, 2.0);
    }

    #[test]
    fn test_reset_scene() {
        let mut engine = Engine::new();
        engine.create_sphere(Vec3::ZERO, 1.0, 1.0);
        engine.create_kinematic_hinge(Vec3::ZERO, Vec3::Y, 1.0, true);
        assert_eq!(engine.body_count(), 2);

        engine.reset_scene();
        assert_eq!(engine.body_count(), 0);
        assert_eq!(engine.world().len(), 0);
        assert!(engine.body_snapshot(0).is_none());
    }

    #[test]
    fn test_set_time_step_rejects_bad_values() {
        let mut engine = Engine::new();
        assert!(engine.set_time_step(0.0).is_err());
        assert!(engine.set_time_step(-1.0).is_err());
        assert!(engine.set_time_step(f32::NAN).is_err());
        assert!(engine.set_time_step(1.0 / 120.0).is_ok());
        assert!((engine.settings().fixed_time_step - 1.0 / 120.0).abs() < 1e-10);
    }

    #[test]
    fn test_average_fps() {
        let mut engine = Engine::new();
        for _ in 0..10 {
            engine.update(1.0 / 50.0);
        }
        assert_relative_eq!(engine.average_fps(), 50.0, epsilon = 1e-2);
        assert_relative_eq!(engine.elapsed_time(), 10.0 / 50.0, epsilon = 1e-5);
    }

    #[test]
    fn test_debug_draw_rebuilt() {
        let mut engine = Engine::new();
        engine.create_sphere(Vec3::ZERO, 1.0, 1.0);
        engine.create_box(Vec3::new(3.0, 0.0, 0.0), Vec3::ONE, 1.0);

        engine.update(1.0 / 60.0);

        let data = engine.debug_draw_data();
        // Sphere circles + box edges + grid floor
        assert!(data.lines.len() > 12 + 48);
        assert_eq!(data.texts.len(), 1);
        assert!(data.texts[0].text.contains("bodies: 2"));
    }

    #[test]
    fn test_toggles() {
        let mut engine = Engine::new();
        let colliders = engine.settings().show_colliders;
        engine.toggle_colliders();
        assert_eq!(engine.settings().show_colliders, !colliders);
        let grid = engine.settings().show_grid;
        engine.toggle_grid();
        assert_eq!(engine.settings().show_grid, !grid);
        let contacts = engine.settings().show_contacts;
        engine.toggle_contacts();
        assert_eq!(engine.settings().show_contacts, !contacts);
        let debug = engine.settings().show_debug_draw;
        engine.toggle_debug_draw();
        assert_eq!(engine.settings().show_debug_draw, !debug);
    }
}
