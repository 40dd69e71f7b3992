//! Narrowphase collision detection: sphere, AABB, and SAT tests.

use glam::{Mat3, Quat, Vec3};

use crate::contact::ContactInfo;
use crate::ecs::components::physics::ColliderShape;
use crate::ecs::components::transform::Transform;
use crate::EPSILON;

const AXES: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];

/// Sphere vs sphere intersection test.
///
/// Coincident centres have no usable direction; the +X axis stands in and
/// the two radii overlap fully.
pub fn sphere_sphere(
    center_a: Vec3,
    radius_a: f32,
    center_b: Vec3,
    radius_b: f32,
) -> Option<ContactInfo> {
    let diff = center_b - center_a;
    let dist_sq = diff.length_squared();
    let radius_sum = radius_a + radius_b;

    if dist_sq >= radius_sum * radius_sum {
        return None;
    }

    let dist = dist_sq.sqrt();
    if dist < EPSILON {
        return Some(ContactInfo {
            normal: Vec3::X,
            penetration: radius_sum,
            point: center_a,
        });
    }

    let normal = diff / dist;
    let penetration = radius_sum - dist;
    Some(ContactInfo {
        normal,
        penetration,
        point: center_a + normal * (radius_a - penetration * 0.5),
    })
}

/// Axis-aligned box vs axis-aligned box.
///
/// The axis with the smallest positive overlap carries the contact; equal
/// overlaps resolve in x, y, z order. The normal is signed so it points
/// from A's centre toward B's (+axis when the centres coincide on it).
pub fn aabb_aabb(
    center_a: Vec3,
    half_a: Vec3,
    center_b: Vec3,
    half_b: Vec3,
) -> Option<ContactInfo> {
    let diff = center_b - center_a;
    let overlap = half_a + half_b - diff.abs();
    if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
        return None;
    }

    let mut axis = 0;
    if overlap.y < overlap[axis] {
        axis = 1;
    }
    if overlap.z < overlap[axis] {
        axis = 2;
    }

    let mut normal = Vec3::ZERO;
    normal[axis] = if diff[axis] < 0.0 { -1.0 } else { 1.0 };

    // Centre of the overlap region
    let min = (center_a - half_a).max(center_b - half_b);
    let max = (center_a + half_a).min(center_b + half_b);

    Some(ContactInfo {
        normal,
        penetration: overlap[axis],
        point: (min + max) * 0.5,
    })
}

/// Oriented box vs oriented box via the Separating Axis Theorem.
///
/// The 15 candidate axes are the six face normals plus the nine edge-edge
/// cross products; cross axes shorter than the epsilon are degenerate and
/// skipped. Any axis with a non-positive overlap separates the boxes;
/// otherwise the minimum-overlap axis is the contact normal, flipped so it
/// points from A to B.
pub fn sat_obb_obb(
    center_a: Vec3,
    rotation_a: Quat,
    half_a: Vec3,
    center_b: Vec3,
    rotation_b: Quat,
    half_b: Vec3,
) -> Option<ContactInfo> {
    let mat_a = Mat3::from_quat(rotation_a);
    let mat_b = Mat3::from_quat(rotation_b);
    let axes_a = [mat_a.x_axis, mat_a.y_axis, mat_a.z_axis];
    let axes_b = [mat_b.x_axis, mat_b.y_axis, mat_b.z_axis];
    let t = center_b - center_a;

    let mut min_overlap = f32::MAX;
    let mut best_axis = Vec3::ZERO;

    // A's face normals
    for axis in axes_a {
        match overlap_on_axis(axis, &axes_a, half_a, &axes_b, half_b, t) {
            Some(overlap) if overlap < min_overlap => {
                min_overlap = overlap;
                best_axis = axis;
            }
            Some(_) => {}
            None => return None,
        }
    }

    // B's face normals
    for axis in axes_b {
        match overlap_on_axis(axis, &axes_a, half_a, &axes_b, half_b, t) {
            Some(overlap) if overlap < min_overlap => {
                min_overlap = overlap;
                best_axis = axis;
            }
            Some(_) => {}
            None => return None,
        }
    }

    // Edge-edge cross products
    for a in axes_a {
        for b in axes_b {
            let axis = a.cross(b);
            let len = axis.length();
            if len < EPSILON {
                // Parallel edges
                continue;
            }
            let axis = axis / len;
            match overlap_on_axis(axis, &axes_a, half_a, &axes_b, half_b, t) {
                Some(overlap) if overlap < min_overlap => {
                    min_overlap = overlap;
                    best_axis = axis;
                }
                Some(_) => {}
                None => return None,
            }
        }
    }

    if best_axis.dot(t) < 0.0 {
        best_axis = -best_axis;
    }

    let proj_a = projection_radius(best_axis, &axes_a, half_a);
    Some(ContactInfo {
        normal: best_axis,
        penetration: min_overlap,
        point: center_a + best_axis * (proj_a - min_overlap * 0.5),
    })
}

/// Projection radius of an oriented box onto a unit axis.
fn projection_radius(axis: Vec3, axes: &[Vec3; 3], half: Vec3) -> f32 {
    half.x * axes[0].dot(axis).abs()
        + half.y * axes[1].dot(axis).abs()
        + half.z * axes[2].dot(axis).abs()
}

/// Overlap of two projected boxes on a single axis. None if separating.
fn overlap_on_axis(
    axis: Vec3,
    axes_a: &[Vec3; 3],
    half_a: Vec3,
    axes_b: &[Vec3; 3],
    half_b: Vec3,
    t: Vec3,
) -> Option<f32> {
    let overlap = projection_radius(axis, axes_a, half_a) + projection_radius(axis, axes_b, half_b)
        - t.dot(axis).abs();
    (overlap > 0.0).then_some(overlap)
}

/// Sphere vs oriented box: clamp the sphere centre into box space and
/// compare against the closest surface point. The returned normal points
/// from the sphere to the box; an axis-aligned box is the
/// identity-rotation call.
pub fn sphere_obb(
    center: Vec3,
    radius: f32,
    box_center: Vec3,
    box_rotation: Quat,
    half: Vec3,
) -> Option<ContactInfo> {
    let local = box_rotation.conjugate() * (center - box_center);
    let clamped = local.clamp(-half, half);
    let to_center = local - clamped;
    let dist_sq = to_center.length_squared();

    if dist_sq >= radius * radius {
        return None;
    }

    if dist_sq < EPSILON * EPSILON {
        // Centre inside the box: escape through the shallowest face
        let mut min_pen = f32::MAX;
        let mut local_normal = -AXES[0];
        for i in 0..3 {
            let pen_pos = half[i] - local[i];
            if pen_pos < min_pen {
                min_pen = pen_pos;
                local_normal = -AXES[i];
            }
            let pen_neg = half[i] + local[i];
            if pen_neg < min_pen {
                min_pen = pen_neg;
                local_normal = AXES[i];
            }
        }
        return Some(ContactInfo {
            normal: box_rotation * local_normal,
            penetration: radius + min_pen,
            point: center,
        });
    }

    let dist = dist_sq.sqrt();
    Some(ContactInfo {
        normal: box_rotation * (-to_center / dist),
        penetration: radius - dist,
        point: box_center + box_rotation * clamped,
    })
}

/// Detect a collision between two shapes, dispatching to the matching
/// test. The returned normal points from `a` to `b`.
pub fn detect_collision(
    shape_a: &ColliderShape,
    transform_a: &Transform,
    shape_b: &ColliderShape,
    transform_b: &Transform,
) -> Option<ContactInfo> {
    match (*shape_a, *shape_b) {
        (ColliderShape::Sphere { radius: ra }, ColliderShape::Sphere { radius: rb }) => {
            sphere_sphere(transform_a.position, ra, transform_b.position, rb)
        }
        (
            ColliderShape::Box { half_extents: ha },
            ColliderShape::Box { half_extents: hb },
        ) => aabb_aabb(transform_a.position, ha, transform_b.position, hb),
        (
            ColliderShape::OrientedBox { half_extents: ha },
            ColliderShape::OrientedBox { half_extents: hb },
        ) => sat_obb_obb(
            transform_a.position,
            transform_a.rotation,
            ha,
            transform_b.position,
            transform_b.rotation,
            hb,
        ),
        // An AABB is an oriented box with identity orientation
        (
            ColliderShape::OrientedBox { half_extents: ha },
            ColliderShape::Box { half_extents: hb },
        ) => sat_obb_obb(
            transform_a.position,
            transform_a.rotation,
            ha,
            transform_b.position,
            Quat::IDENTITY,
            hb,
        ),
        (
            ColliderShape::Box { half_extents: ha },
            ColliderShape::OrientedBox { half_extents: hb },
        ) => sat_obb_obb(
            transform_a.position,
            Quat::IDENTITY,
            ha,
            transform_b.position,
            transform_b.rotation,
            hb,
        ),
        (ColliderShape::Sphere { radius }, ColliderShape::Box { half_extents }) => sphere_obb(
            transform_a.position,
            radius,
            transform_b.position,
            Quat::IDENTITY,
            half_extents,
        ),
        (ColliderShape::Sphere { radius }, ColliderShape::OrientedBox { half_extents }) => {
            sphere_obb(
                transform_a.position,
                radius,
                transform_b.position,
                transform_b.rotation,
                half_extents,
            )
        }
        (ColliderShape::Box { half_extents }, ColliderShape::Sphere { radius }) => sphere_obb(
            transform_b.position,
            radius,
            transform_a.position,
            Quat::IDENTITY,
            half_extents,
        )
        .map(ContactInfo::flipped),
        (ColliderShape::OrientedBox { half_extents }, ColliderShape::Sphere { radius }) => {
            sphere_obb(
                transform_b.position,
                radius,
                transform_a.position,
                transform_a.rotation,
                half_extents,
            )
            .map(ContactInfo::flipped)
        }
    }
}
