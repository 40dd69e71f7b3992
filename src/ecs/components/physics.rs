//! Physics components attached to body entities.

use glam::{Mat3, Vec3};

/// Collider shape. Both box variants store half extents; only
/// [`ColliderShape::OrientedBox`] feeds the body orientation into
/// collision detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    OrientedBox { half_extents: Vec3 },
}

/// Collision detection component.
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub shape: ColliderShape,
}

/// Rigid body state and mass properties.
///
/// A body with `inv_mass == 0` is static: integration and impulses skip
/// it entirely.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub mass: f32,
    pub inv_mass: f32,
    /// Inverse inertia tensor. Identity for dynamic bodies, zero for
    /// static ones.
    pub inv_inertia: Mat3,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub force_accumulator: Vec3,
    pub torque_accumulator: Vec3,
    /// Coefficient of restitution (0.0 - 1.0).
    pub restitution: f32,
    /// Coulomb friction coefficient.
    pub friction: f32,
}

impl RigidBody {
    /// Create a rigid body with the given mass. A non-positive mass yields
    /// a static body.
    pub fn new(mass: f32) -> Self {
        let mut rb = Self {
            mass: 0.0,
            inv_mass: 0.0,
            inv_inertia: Mat3::ZERO,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force_accumulator: Vec3::ZERO,
            torque_accumulator: Vec3::ZERO,
            restitution: 0.3,
            friction: 0.5,
        };
        rb.set_mass(mass);
        rb
    }

    /// Create a static rigid body.
    pub fn new_static() -> Self {
        Self::new(0.0)
    }

    /// Set the mass. `mass <= 0` makes the body static; otherwise the
    /// inverse inertia tensor is the identity (unit inertia).
    pub fn set_mass(&mut self, mass: f32) {
        if mass <= 0.0 {
            self.mass = 0.0;
            self.inv_mass = 0.0;
            self.inv_inertia = Mat3::ZERO;
        } else {
            self.mass = mass;
            self.inv_mass = 1.0 / mass;
            self.inv_inertia = Mat3::IDENTITY;
        }
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Accumulate a force through the centre of mass.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force_accumulator += force;
    }

    /// Accumulate a torque.
    pub fn apply_torque(&mut self, torque: Vec3) {
        self.torque_accumulator += torque;
    }

    /// Zero both accumulators.
    pub fn clear_accumulators(&mut self) {
        self.force_accumulator = Vec3::ZERO;
        self.torque_accumulator = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_mass_properties() {
        let rb = RigidBody::new(2.0);
        assert_eq!(rb.mass, 2.0);
        assert_eq!(rb.inv_mass, 0.5);
        assert_eq!(rb.inv_inertia, Mat3::IDENTITY);
        assert!(!rb.is_static());
    }

    #[test]
    fn test_non_positive_mass_is_static() {
        let rb = RigidBody::new(0.0);
        assert!(rb.is_static());
        assert_eq!(rb.inv_inertia, Mat3::ZERO);

        let rb = RigidBody::new(-5.0);
        assert!(rb.is_static());
        assert_eq!(rb.mass, 0.0);
        assert_eq!(rb.inv_mass, 0.0);
    }

    #[test]
    fn test_set_mass_switches_static() {
        let mut rb = RigidBody::new(1.0);
        rb.set_mass(0.0);
        assert!(rb.is_static());
        rb.set_mass(4.0);
        assert!(!rb.is_static());
        assert_eq!(rb.inv_mass, 0.25);
    }

    #[test]
    fn test_force_accumulation() {
        let mut rb = RigidBody::new(1.0);
        rb.apply_force(Vec3::new(1.0, 0.0, 0.0));
        rb.apply_force(Vec3::new(2.0, 3.0, 0.0));
        rb.apply_torque(Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(rb.force_accumulator, Vec3::new(3.0, 3.0, 0.0));
        assert_eq!(rb.torque_accumulator, Vec3::new(0.0, 0.0, 5.0));

        rb.clear_accumulators();
        assert_eq!(rb.force_accumulator, Vec3::ZERO);
        assert_eq!(rb.torque_accumulator, Vec3::ZERO);
    }

    #[test]
    fn test_default_material() {
        let rb = RigidBody::new(1.0);
        assert_eq!(rb.restitution, 0.3);
        assert_eq!(rb.friction, 0.5);
    }
}
