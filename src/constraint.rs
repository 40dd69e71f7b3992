//! Articulated constraints solved with per-row impulses.
//!
//! Every joint follows the same pattern: `pre_solve` converts body-local
//! anchors and axes into world space with the bodies' current transforms,
//! `solve` applies impulse rows of the form
//! `lambda = -(J*v + error / dt) / inv_mass_sum` along a Jacobian
//! direction (the `error / dt` bias closes the position error over one
//! substep, the `J*v` term cancels relative velocity along the row), and
//! `post_solve` is a cleanup hook. Linear rows use the inverse masses;
//! angular rows project the inverse inertia tensors onto the row
//! direction. A row whose combined inverse mass vanishes (both bodies
//! static) is skipped.

use glam::{Quat, Vec3};

use crate::ecs::components::physics::RigidBody;
use crate::ecs::components::transform::Transform;
use crate::EPSILON;

pub trait Constraint {
    /// Refresh cached world-space anchors/axes from current transforms.
    fn pre_solve(&mut self, world: &mut hecs::World, dt: f32);

    /// Apply velocity impulses driving the constraint error to zero
    /// over `dt`.
    fn solve(&mut self, world: &mut hecs::World, dt: f32);

    /// Per-step cleanup hook.
    fn post_solve(&mut self, _world: &mut hecs::World) {}
}

/// Sum type over every joint so the engine can keep a homogeneous,
/// unboxed constraint list and reach the kinematic driver without
/// downcasting.
#[derive(Debug, Clone)]
pub enum AnyConstraint {
    PointToPoint(PointToPointConstraint),
    Hinge(HingeConstraint),
    Slider(SliderConstraint),
    Distance(DistanceConstraint),
    ConeTwist(ConeTwistConstraint),
    Driver(HingeDriver),
}

impl Constraint for AnyConstraint {
    fn pre_solve(&mut self, world: &mut hecs::World, dt: f32) {
        match self {
            AnyConstraint::PointToPoint(c) => c.pre_solve(world, dt),
            AnyConstraint::Hinge(c) => c.pre_solve(world, dt),
            AnyConstraint::Slider(c) => c.pre_solve(world, dt),
            AnyConstraint::Distance(c) => c.pre_solve(world, dt),
            AnyConstraint::ConeTwist(c) => c.pre_solve(world, dt),
            AnyConstraint::Driver(c) => c.pre_solve(world, dt),
        }
    }

    fn solve(&mut self, world: &mut hecs::World, dt: f32) {
        match self {
            AnyConstraint::PointToPoint(c) => c.solve(world, dt),
            AnyConstraint::Hinge(c) => c.solve(world, dt),
            AnyConstraint::Slider(c) => c.solve(world, dt),
            AnyConstraint::Distance(c) => c.solve(world, dt),
            AnyConstraint::ConeTwist(c) => c.solve(world, dt),
            AnyConstraint::Driver(c) => c.solve(world, dt),
        }
    }

    fn post_solve(&mut self, world: &mut hecs::World) {
        match self {
            AnyConstraint::PointToPoint(c) => c.post_solve(world),
            AnyConstraint::Hinge(c) => c.post_solve(world),
            AnyConstraint::Slider(c) => c.post_solve(world),
            AnyConstraint::Distance(c) => c.post_solve(world),
            AnyConstraint::ConeTwist(c) => c.post_solve(world),
            AnyConstraint::Driver(c) => c.post_solve(world),
        }
    }
}

#[derive(Clone, Copy)]
struct BodyFrame {
    position: Vec3,
    rotation: Quat,
}

fn body_frame(world: &hecs::World, entity: hecs::Entity) -> BodyFrame {
    world
        .get::<&Transform>(entity)
        .map(|t| BodyFrame {
            position: t.position,
            rotation: t.rotation,
        })
        .unwrap_or(BodyFrame {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        })
}

fn inv_mass(world: &hecs::World, entity: hecs::Entity) -> f32 {
    world
        .get::<&RigidBody>(entity)
        .map(|rb| rb.inv_mass)
        .unwrap_or(0.0)
}

/// Effective inverse mass of an angular row along `dir`.
fn angular_inv_mass(world: &hecs::World, entity: hecs::Entity, dir: Vec3) -> f32 {
    world
        .get::<&RigidBody>(entity)
        .map(|rb| dir.dot(rb.inv_inertia * dir))
        .unwrap_or(0.0)
}

fn relative_linear_velocity(
    world: &hecs::World,
    entity_a: hecs::Entity,
    entity_b: hecs::Entity,
) -> Vec3 {
    let velocity = |entity| {
        world
            .get::<&RigidBody>(entity)
            .map(|rb| rb.linear_velocity)
            .unwrap_or(Vec3::ZERO)
    };
    velocity(entity_b) - velocity(entity_a)
}

fn relative_angular_velocity(
    world: &hecs::World,
    entity_a: hecs::Entity,
    entity_b: hecs::Entity,
) -> Vec3 {
    let velocity = |entity| {
        world
            .get::<&RigidBody>(entity)
            .map(|rb| rb.angular_velocity)
            .unwrap_or(Vec3::ZERO)
    };
    velocity(entity_b) - velocity(entity_a)
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

/// Apply an equal-and-opposite impulse to the pair's angular velocities.
fn apply_angular_impulse(
    world: &mut hecs::World,
    entity_a: hecs::Entity,
    entity_b: hecs::Entity,
    impulse: Vec3,
) {
    if let Ok(mut rb) = world.get::<&mut RigidBody>(entity_a) {
        let delta = rb.inv_inertia * impulse;
        rb.angular_velocity -= delta;
    }
    if let Ok(mut rb) = world.get::<&mut RigidBody>(entity_b) {
        let delta = rb.inv_inertia * impulse;
        rb.angular_velocity += delta;
    }
}

/// Full three-dimensional linear row: drive the anchor `error` (pointing
/// from A's anchor toward B's) to zero over `dt`, cancelling relative
/// velocity on the way.
fn solve_linear_row(
    world: &mut hecs::World,
    entity_a: hecs::Entity,
    entity_b: hecs::Entity,
    error: Vec3,
    dt: f32,
) {
    let inv_mass_sum = inv_mass(world, entity_a) + inv_mass(world, entity_b);
    if inv_mass_sum < EPSILON {
        return;
    }
    let relative = relative_linear_velocity(world, entity_a, entity_b);
    let impulse = -(relative + error / dt) / inv_mass_sum;
    if impulse.length_squared() < EPSILON * EPSILON {
        return;
    }
    apply_linear_impulse(world, entity_a, entity_b, impulse);
}

/// Scalar linear row along a fixed unit direction with a signed position
/// error.
fn solve_linear_row_along(
    world: &mut hecs::World,
    entity_a: hecs::Entity,
    entity_b: hecs::Entity,
    dir: Vec3,
    error: f32,
    dt: f32,
) {
    let inv_mass_sum = inv_mass(world, entity_a) + inv_mass(world, entity_b);
    if inv_mass_sum < EPSILON {
        return;
    }
    let relative = relative_linear_velocity(world, entity_a, entity_b).dot(dir);
    let lambda = -(relative + error / dt) / inv_mass_sum;
    if lambda.abs() < EPSILON {
        return;
    }
    apply_linear_impulse(world, entity_a, entity_b, dir * lambda);
}

/// One angular row: drive the rotation `error` vector to zero over `dt`.
fn solve_angular_row(
    world: &mut hecs::World,
    entity_a: hecs::Entity,
    entity_b: hecs::Entity,
    error: Vec3,
    dt: f32,
) {
    let len = error.length();
    if len < EPSILON {
        return;
    }
    let dir = error / len;
    let inv_mass_sum =
        angular_inv_mass(world, entity_a, dir) + angular_inv_mass(world, entity_b, dir);
    if inv_mass_sum < EPSILON {
        return;
    }
    let relative = relative_angular_velocity(world, entity_a, entity_b).dot(dir);
    let lambda = -(relative + len / dt) / inv_mass_sum;
    apply_angular_impulse(world, entity_a, entity_b, dir * lambda);
}

/// Pins a body-local anchor point on each body to the same world position.
#[derive(Debug, Clone)]
pub struct PointToPointConstraint {
    pub body_a: hecs::Entity,
    pub body_b: hecs::Entity,
    pub local_anchor_a: Vec3,
    pub local_anchor_b: Vec3,
    world_anchor_a: Vec3,
    world_anchor_b: Vec3,
}

impl PointToPointConstraint {
    /// Anchor both bodies at `world_anchor`, converted into each body's
    /// local space with its current transform.
    pub fn new(
        world: &hecs::World,
        body_a: hecs::Entity,
        body_b: hecs::Entity,
        world_anchor: Vec3,
    ) -> Self {
        let frame_a = body_frame(world, body_a);
        let frame_b = body_frame(world, body_b);
        Self {
            body_a,
            body_b,
            local_anchor_a: frame_a.rotation.conjugate() * (world_anchor - frame_a.position),
            local_anchor_b: frame_b.rotation.conjugate() * (world_anchor - frame_b.position),
            world_anchor_a: world_anchor,
            world_anchor_b: world_anchor,
        }
    }

    /// Anchor separation, pointing from A's anchor toward B's. Valid after
    /// `pre_solve`.
    fn anchor_error(&self) -> Vec3 {
        self.world_anchor_b - self.world_anchor_a
    }
}

impl Constraint for PointToPointConstraint {
    fn pre_solve(&mut self, world: &mut hecs::World, _dt: f32) {
        let frame_a = body_frame(world, self.body_a);
        let frame_b = body_frame(world, self.body_b);
        self.world_anchor_a = frame_a.position + frame_a.rotation * self.local_anchor_a;
        self.world_anchor_b = frame_b.position + frame_b.rotation * self.local_anchor_b;
    }

    fn solve(&mut self, world: &mut hecs::World, dt: f32) {
        solve_linear_row(world, self.body_a, self.body_b, self.anchor_error(), dt);
    }
}

/// Point-to-point plus alignment of a body-local axis on each body.
#[derive(Debug, Clone)]
pub struct HingeConstraint {
    point: PointToPointConstraint,
    pub local_axis_a: Vec3,
    pub local_axis_b: Vec3,
    world_axis_a: Vec3,
    world_axis_b: Vec3,
}

impl HingeConstraint {
    pub fn new(
        world: &hecs::World,
        body_a: hecs::Entity,
        body_b: hecs::Entity,
        world_anchor: Vec3,
        world_axis: Vec3,
    ) -> Self {
        let axis = world_axis.normalize_or_zero();
        let frame_a = body_frame(world, body_a);
        let frame_b = body_frame(world, body_b);
        Self {
            point: PointToPointConstraint::new(world, body_a, body_b, world_anchor),
            local_axis_a: frame_a.rotation.conjugate() * axis,
            local_axis_b: frame_b.rotation.conjugate() * axis,
            world_axis_a: axis,
            world_axis_b: axis,
        }
    }

    pub fn body_a(&self) -> hecs::Entity {
        self.point.body_a
    }

    pub fn body_b(&self) -> hecs::Entity {
        self.point.body_b
    }
}

impl Constraint for HingeConstraint {
    fn pre_solve(&mut self, world: &mut hecs::World, dt: f32) {
        self.point.pre_solve(world, dt);
        let frame_a = body_frame(world, self.point.body_a);
        let frame_b = body_frame(world, self.point.body_b);
        self.world_axis_a = frame_a.rotation * self.local_axis_a;
        self.world_axis_b = frame_b.rotation * self.local_axis_b;
    }

    fn solve(&mut self, world: &mut hecs::World, dt: f32) {
        self.point.solve(world, dt);
        // Axis misalignment rotates each body toward the shared axis
        let error = self.world_axis_a.cross(self.world_axis_b);
        solve_angular_row(world, self.point.body_a, self.point.body_b, error, dt);
    }
}

/// Point row, axis-alignment row, and a translational row cancelling
/// anchor separation along the shared axis.
#[derive(Debug, Clone)]
pub struct SliderConstraint {
    point: PointToPointConstraint,
    pub local_axis_a: Vec3,
    pub local_axis_b: Vec3,
    world_axis_a: Vec3,
    world_axis_b: Vec3,
}

impl SliderConstraint {
    pub fn new(
        world: &hecs::World,
        body_a: hecs::Entity,
        body_b: hecs::Entity,
        world_anchor: Vec3,
        world_axis: Vec3,
    ) -> Self {
        let axis = world_axis.normalize_or_zero();
        let frame_a = body_frame(world, body_a);
        let frame_b = body_frame(world, body_b);
        Self {
            point: PointToPointConstraint::new(world, body_a, body_b, world_anchor),
            local_axis_a: frame_a.rotation.conjugate() * axis,
            local_axis_b: frame_b.rotation.conjugate() * axis,
            world_axis_a: axis,
            world_axis_b: axis,
        }
    }
}

impl Constraint for SliderConstraint {
    fn pre_solve(&mut self, world: &mut hecs::World, dt: f32) {
        self.point.pre_solve(world, dt);
        let frame_a = body_frame(world, self.point.body_a);
        let frame_b = body_frame(world, self.point.body_b);
        self.world_axis_a = frame_a.rotation * self.local_axis_a;
        self.world_axis_b = frame_b.rotation * self.local_axis_b;
    }

    fn solve(&mut self, world: &mut hecs::World, dt: f32) {
        self.point.solve(world, dt);

        let axis_error = self.world_axis_a.cross(self.world_axis_b);
        solve_angular_row(world, self.point.body_a, self.point.body_b, axis_error, dt);

        let along = self.point.anchor_error().dot(self.world_axis_a);
        solve_linear_row_along(
            world,
            self.point.body_a,
            self.point.body_b,
            self.world_axis_a,
            along,
            dt,
        );
    }
}

/// Drives the separation of two anchor points to a rest length.
#[derive(Debug, Clone)]
pub struct DistanceConstraint {
    pub body_a: hecs::Entity,
    pub body_b: hecs::Entity,
    pub local_anchor_a: Vec3,
    pub local_anchor_b: Vec3,
    pub rest_length: f32,
    world_anchor_a: Vec3,
    world_anchor_b: Vec3,
}

impl DistanceConstraint {
    /// Constrain the centre-to-centre distance of two bodies.
    pub fn new(
        world: &hecs::World,
        body_a: hecs::Entity,
        body_b: hecs::Entity,
        rest_length: f32,
    ) -> Self {
        let frame_a = body_frame(world, body_a);
        let frame_b = body_frame(world, body_b);
        Self {
            body_a,
            body_b,
            local_anchor_a: Vec3::ZERO,
            local_anchor_b: Vec3::ZERO,
            rest_length,
            world_anchor_a: frame_a.position,
            world_anchor_b: frame_b.position,
        }
    }
}

impl Constraint for DistanceConstraint {
    fn pre_solve(&mut self, world: &mut hecs::World, _dt: f32) {
        let frame_a = body_frame(world, self.body_a);
        let frame_b = body_frame(world, self.body_b);
        self.world_anchor_a = frame_a.position + frame_a.rotation * self.local_anchor_a;
        self.world_anchor_b = frame_b.position + frame_b.rotation * self.local_anchor_b;
    }

    fn solve(&mut self, world: &mut hecs::World, dt: f32) {
        let diff = self.world_anchor_b - self.world_anchor_a;
        let dist = diff.length();
        if dist < EPSILON {
            // Coinciding anchors give no direction to correct along
            return;
        }
        let dir = diff / dist;
        solve_linear_row_along(
            world,
            self.body_a,
            self.body_b,
            dir,
            dist - self.rest_length,
            dt,
        );
    }
}

/// Point-to-point with swing and twist limits about a reference axis.
#[derive(Debug, Clone)]
pub struct ConeTwistConstraint {
    point: PointToPointConstraint,
    pub local_axis_a: Vec3,
    pub local_axis_b: Vec3,
    pub swing_span1: f32,
    pub swing_span2: f32,
    pub twist_span: f32,
    world_axis_a: Vec3,
    world_axis_b: Vec3,
    rotation_a: Quat,
    rotation_b: Quat,
}

impl ConeTwistConstraint {
    /// Swing and twist spans start at pi (effectively unlimited); tighten
    /// them with [`ConeTwistConstraint::with_spans`].
    pub fn new(
        world: &hecs::World,
        body_a: hecs::Entity,
        body_b: hecs::Entity,
        world_anchor: Vec3,
        world_axis: Vec3,
    ) -> Self {
        let axis = world_axis.normalize_or_zero();
        let frame_a = body_frame(world, body_a);
        let frame_b = body_frame(world, body_b);
        Self {
            point: PointToPointConstraint::new(world, body_a, body_b, world_anchor),
            local_axis_a: frame_a.rotation.conjugate() * axis,
            local_axis_b: frame_b.rotation.conjugate() * axis,
            swing_span1: std::f32::consts::PI,
            swing_span2: std::f32::consts::PI,
            twist_span: std::f32::consts::PI,
            world_axis_a: axis,
            world_axis_b: axis,
            rotation_a: frame_a.rotation,
            rotation_b: frame_b.rotation,
        }
    }

    pub fn with_spans(mut self, swing_span1: f32, swing_span2: f32, twist_span: f32) -> Self {
        self.swing_span1 = swing_span1;
        self.swing_span2 = swing_span2;
        self.twist_span = twist_span;
        self
    }

    /// Signed twist of B relative to A about A's local reference axis,
    /// from the swing-twist decomposition of the relative rotation.
    fn twist_angle(&self) -> f32 {
        let relative = self.rotation_a.conjugate() * self.rotation_b;
        let axis_part = Vec3::new(relative.x, relative.y, relative.z).dot(self.local_axis_a);
        let mut twist = 2.0 * axis_part.atan2(relative.w);
        if twist > std::f32::consts::PI {
            twist -= std::f32::consts::TAU;
        } else if twist < -std::f32::consts::PI {
            twist += std::f32::consts::TAU;
        }
        twist
    }
}

impl Constraint for ConeTwistConstraint {
    fn pre_solve(&mut self, world: &mut hecs::World, dt: f32) {
        self.point.pre_solve(world, dt);
        let frame_a = body_frame(world, self.point.body_a);
        let frame_b = body_frame(world, self.point.body_b);
        self.rotation_a = frame_a.rotation;
        self.rotation_b = frame_b.rotation;
        self.world_axis_a = frame_a.rotation * self.local_axis_a;
        self.world_axis_b = frame_b.rotation * self.local_axis_b;
    }

    fn solve(&mut self, world: &mut hecs::World, dt: f32) {
        self.point.solve(world, dt);

        // Swing: angle between the reference axes, limited by the smaller span
        let swing = self
            .world_axis_a
            .dot(self.world_axis_b)
            .clamp(-1.0, 1.0)
            .acos();
        let swing_limit = self.swing_span1.min(self.swing_span2);
        if swing > swing_limit {
            let hinge = self.world_axis_a.cross(self.world_axis_b);
            if hinge.length() >= EPSILON {
                let error = hinge.normalize() * (swing - swing_limit);
                solve_angular_row(world, self.point.body_a, self.point.body_b, error, dt);
            }
        }

        // Twist about A's axis
        let twist = self.twist_angle();
        let excess = twist.abs() - self.twist_span;
        if excess > EPSILON {
            let error = self.world_axis_a * (twist.signum() * excess);
            solve_angular_row(world, self.point.body_a, self.point.body_b, error, dt);
        }
    }
}

/// Single-body kinematic driver: pins its body at a pivot and rotates it
/// about a fixed axis to a host-set target angle. Distinct from
/// [`HingeConstraint`] so the two-body solve path never sees a missing
/// companion body.
#[derive(Debug, Clone)]
pub struct HingeDriver {
    pub body: hecs::Entity,
    pub pivot: Vec3,
    pub axis: Vec3,
    /// Angle advance per second while `rotating` is set.
    pub angular_velocity: f32,
    pub rotating: bool,
    /// Driven angle, set by the host or advanced by `angular_velocity`.
    pub target_angle: f32,
}

impl HingeDriver {
    pub fn new(
        body: hecs::Entity,
        pivot: Vec3,
        axis: Vec3,
        angular_velocity: f32,
        rotating: bool,
    ) -> Self {
        Self {
            body,
            pivot,
            axis: axis.normalize_or_zero(),
            angular_velocity,
            rotating,
            target_angle: 0.0,
        }
    }
}

impl Constraint for HingeDriver {
    fn pre_solve(&mut self, _world: &mut hecs::World, dt: f32) {
        if self.rotating {
            self.target_angle += self.angular_velocity * dt;
        }
    }

    fn solve(&mut self, world: &mut hecs::World, _dt: f32) {
        if self.axis.length_squared() < EPSILON {
            return;
        }
        if let Ok(mut transform) = world.get::<&mut Transform>(self.body) {
            transform.position = self.pivot;
            transform.rotation = Quat::from_axis_angle(self.axis, self.target_angle).normalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn step_constraint(c: &mut impl Constraint, world: &mut hecs::World, dt: f32) {
        c.pre_solve(world, dt);
        c.solve(world, dt);
        c.post_solve(world);
    }

    fn spawn(world: &mut hecs::World, position: Vec3, mass: f32) -> hecs::Entity {
        world.spawn((Transform::from_position(position), RigidBody::new(mass)))
    }

    #[test]
    fn test_point_to_point_pulls_anchors_together() {
        let mut world = hecs::World::new();
        let a = spawn(&mut world, Vec3::ZERO, 1.0);
        let b = spawn(&mut world, Vec3::new(2.0, 0.0, 0.0), 1.0);

        // Anchor at A's centre: B must be pulled toward it
        let mut c = PointToPointConstraint::new(&world, a, b, Vec3::ZERO);
        // Move B so its anchor drifts off the pivot
        world.get::<&mut Transform>(b).unwrap().position = Vec3::new(3.0, 0.0, 0.0);
        step_constraint(&mut c, &mut world, 1.0 / 60.0);

        let va = world.get::<&RigidBody>(a).unwrap().linear_velocity;
        let vb = world.get::<&RigidBody>(b).unwrap().linear_velocity;
        assert!(va.x > 0.0, "A moves toward B's anchor");
        assert!(vb.x < 0.0, "B moves back toward the pivot");
        // Equal masses: momentum stays zero
        assert_relative_eq!((va + vb).length(), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_point_to_point_static_partner() {
        let mut world = hecs::World::new();
        let anchor_body = spawn(&mut world, Vec3::ZERO, 0.0);
        let swinging = spawn(&mut world, Vec3::new(1.0, 0.0, 0.0), 1.0);

        let mut c = PointToPointConstraint::new(&world, anchor_body, swinging, Vec3::ZERO);
        world.get::<&mut Transform>(swinging).unwrap().position = Vec3::new(1.5, 0.0, 0.0);
        step_constraint(&mut c, &mut world, 1.0 / 60.0);

        assert_eq!(
            world.get::<&RigidBody>(anchor_body).unwrap().linear_velocity,
            Vec3::ZERO
        );
        assert!(world.get::<&RigidBody>(swinging).unwrap().linear_velocity.x < 0.0);
    }

    #[test]
    fn test_both_static_rows_skipped() {
        let mut world = hecs::World::new();
        let a = spawn(&mut world, Vec3::ZERO, 0.0);
        let b = spawn(&mut world, Vec3::new(5.0, 0.0, 0.0), 0.0);

        let mut c = DistanceConstraint::new(&world, a, b, 1.0);
        step_constraint(&mut c, &mut world, 1.0 / 60.0);

        assert_eq!(world.get::<&RigidBody>(a).unwrap().linear_velocity, Vec3::ZERO);
        assert_eq!(world.get::<&RigidBody>(b).unwrap().linear_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_distance_constraint_restores_length() {
        let mut world = hecs::World::new();
        let a = spawn(&mut world, Vec3::ZERO, 1.0);
        let b = spawn(&mut world, Vec3::new(4.0, 0.0, 0.0), 1.0);

        let mut c = DistanceConstraint::new(&world, a, b, 2.0);
        step_constraint(&mut c, &mut world, 1.0 / 60.0);

        // Too far apart: the bodies accelerate toward each other
        let va = world.get::<&RigidBody>(a).unwrap().linear_velocity;
        let vb = world.get::<&RigidBody>(b).unwrap().linear_velocity;
        assert!(va.x > 0.0);
        assert!(vb.x < 0.0);
        assert_relative_eq!(va.x, -vb.x, epsilon = 1e-4);
    }

    #[test]
    fn test_distance_constraint_satisfied_is_noop() {
        let mut world = hecs::World::new();
        let a = spawn(&mut world, Vec3::ZERO, 1.0);
        let b = spawn(&mut world, Vec3::new(2.0, 0.0, 0.0), 1.0);

        let mut c = DistanceConstraint::new(&world, a, b, 2.0);
        step_constraint(&mut c, &mut world, 1.0 / 60.0);

        assert_eq!(world.get::<&RigidBody>(a).unwrap().linear_velocity, Vec3::ZERO);
        assert_eq!(world.get::<&RigidBody>(b).unwrap().linear_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_hinge_aligns_axes() {
        let mut world = hecs::World::new();
        let a = spawn(&mut world, Vec3::ZERO, 1.0);
        let b = spawn(&mut world, Vec3::new(1.0, 0.0, 0.0), 1.0);

        let mut c = HingeConstraint::new(&world, a, b, Vec3::new(0.5, 0.0, 0.0), Vec3::Z);
        // Tilt B's hinge axis away from Z
        world.get::<&mut Transform>(b).unwrap().rotation = Quat::from_rotation_x(0.3);
        step_constraint(&mut c, &mut world, 1.0 / 60.0);

        // The angular row spins both bodies toward a common axis
        let wa = world.get::<&RigidBody>(a).unwrap().angular_velocity;
        let wb = world.get::<&RigidBody>(b).unwrap().angular_velocity;
        assert!(wa.length() > 0.0);
        assert!(wb.length() > 0.0);
        assert_relative_eq!((wa + wb).length(), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_slider_cancels_off_axis_drift() {
        let mut world = hecs::World::new();
        let a = spawn(&mut world, Vec3::ZERO, 0.0);
        let b = spawn(&mut world, Vec3::new(1.0, 0.0, 0.0), 1.0);

        let mut c = SliderConstraint::new(&world, a, b, Vec3::ZERO, Vec3::X);
        // Push B off the slider axis
        world.get::<&mut Transform>(b).unwrap().position = Vec3::new(1.0, 0.5, 0.0);
        step_constraint(&mut c, &mut world, 1.0 / 60.0);

        let vb = world.get::<&RigidBody>(b).unwrap().linear_velocity;
        assert!(vb.y < 0.0, "off-axis drift is pulled back");
    }

    #[test]
    fn test_cone_twist_inside_limits_is_noop() {
        let mut world = hecs::World::new();
        let a = spawn(&mut world, Vec3::ZERO, 1.0);
        let b = spawn(&mut world, Vec3::new(1.0, 0.0, 0.0), 1.0);

        let mut c = ConeTwistConstraint::new(&world, a, b, Vec3::new(0.5, 0.0, 0.0), Vec3::X);
        // Small swing, well inside the default spans
        world.get::<&mut Transform>(b).unwrap().rotation = Quat::from_rotation_z(0.2);
        step_constraint(&mut c, &mut world, 1.0 / 60.0);

        assert_eq!(
            world.get::<&RigidBody>(a).unwrap().angular_velocity,
            Vec3::ZERO
        );
        assert_eq!(
            world.get::<&RigidBody>(b).unwrap().angular_velocity,
            Vec3::ZERO
        );
    }

    #[test]
    fn test_cone_twist_swing_limit() {
        let mut world = hecs::World::new();
        let a = spawn(&mut world, Vec3::ZERO, 1.0);
        let b = spawn(&mut world, Vec3::new(1.0, 0.0, 0.0), 1.0);

        let mut c = ConeTwistConstraint::new(&world, a, b, Vec3::new(0.5, 0.0, 0.0), Vec3::X)
            .with_spans(0.5, 0.5, PI);
        // Swing B's axis 90 degrees, past the 0.5 rad limit
        world.get::<&mut Transform>(b).unwrap().rotation = Quat::from_rotation_z(FRAC_PI_2);
        step_constraint(&mut c, &mut world, 1.0 / 60.0);

        let wb = world.get::<&RigidBody>(b).unwrap().angular_velocity;
        assert!(wb.length() > 0.0, "swing beyond the limit is corrected");
    }

    #[test]
    fn test_cone_twist_twist_limit() {
        let mut world = hecs::World::new();
        let a = spawn(&mut world, Vec3::ZERO, 1.0);
        let b = spawn(&mut world, Vec3::new(1.0, 0.0, 0.0), 1.0);

        let mut c = ConeTwistConstraint::new(&world, a, b, Vec3::new(0.5, 0.0, 0.0), Vec3::X)
            .with_spans(PI, PI, 0.25);
        // Twist B about the shared axis past the limit; the axes stay
        // aligned so only the twist row can fire.
        world.get::<&mut Transform>(b).unwrap().rotation = Quat::from_rotation_x(1.0);
        step_constraint(&mut c, &mut world, 1.0 / 60.0);

        let wb = world.get::<&RigidBody>(b).unwrap().angular_velocity;
        assert!(wb.x < 0.0, "twist beyond the limit unwinds");
    }

    #[test]
    fn test_hinge_driver_pins_and_rotates() {
        let mut world = hecs::World::new();
        let platform = spawn(&mut world, Vec3::new(0.0, 1.0, 0.0), 0.0);

        let mut driver = HingeDriver::new(platform, Vec3::new(0.0, 1.0, 0.0), Vec3::Y, 2.0, true);
        step_constraint(&mut driver, &mut world, 0.5);

        let transform = world.get::<&Transform>(platform).unwrap();
        assert_eq!(transform.position, Vec3::new(0.0, 1.0, 0.0));
        // rotating at 2 rad/s for 0.5 s
        assert_relative_eq!(driver.target_angle, 1.0, epsilon = 1e-6);
        let expected = Quat::from_axis_angle(Vec3::Y, 1.0);
        assert!(transform.rotation.dot(expected).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn test_hinge_driver_host_angle() {
        let mut world = hecs::World::new();
        let platform = spawn(&mut world, Vec3::ZERO, 0.0);

        let mut driver = HingeDriver::new(platform, Vec3::ZERO, Vec3::Y, 0.0, false);
        driver.target_angle = FRAC_PI_2;
        step_constraint(&mut driver, &mut world, 1.0 / 60.0);

        // Not rotating: the host-set angle is used verbatim
        assert_relative_eq!(driver.target_angle, FRAC_PI_2, epsilon = 1e-6);
        let transform = world.get::<&Transform>(platform).unwrap();
        let expected = Quat::from_axis_angle(Vec3::Y, FRAC_PI_2);
        assert!(transform.rotation.dot(expected).abs() > 1.0 - 1e-5);
    }
}
