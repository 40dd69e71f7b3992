//! Contact data produced by the narrow phase.

use glam::Vec3;

/// Geometric result of a narrow-phase test.
#[derive(Debug, Clone, Copy)]
pub struct ContactInfo {
    /// Contact normal (from shape A to shape B).
    pub normal: Vec3,
    /// Penetration depth (> 0 means overlap).
    pub penetration: f32,
    /// Contact point in world space.
    pub point: Vec3,
}

impl ContactInfo {
    /// Swap the roles of A and B.
    pub fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

/// A contact between two bodies, resolved by the solver and retained
/// until the next substep for inspection and debug draw.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub body_a: hecs::Entity,
    pub body_b: hecs::Entity,
    /// Contact normal (from A to B).
    pub normal: Vec3,
    pub penetration: f32,
    pub point: Vec3,
}
