//! Debug-visualization geometry: plain line/point/text data a host
//! renderer can consume directly.

use glam::{Quat, Vec3};

pub const COLLIDER_COLOR: [f32; 4] = [0.2, 0.9, 0.3, 1.0];
pub const CONTACT_COLOR: [f32; 4] = [1.0, 0.25, 0.2, 1.0];
pub const GRID_COLOR: [f32; 4] = [0.3, 0.3, 0.35, 1.0];
pub const TEXT_COLOR: [f32; 4] = [0.9, 0.9, 0.9, 1.0];

/// Segments per debug circle.
const CIRCLE_SEGMENTS: u32 = 16;

#[derive(Debug, Clone, Copy)]
pub struct DebugLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy)]
pub struct DebugPoint {
    pub position: Vec3,
    pub color: [f32; 4],
    pub size: f32,
}

#[derive(Debug, Clone)]
pub struct DebugText {
    pub text: String,
    pub position: Vec3,
    pub color: [f32; 4],
}

/// Everything the host needs to draw one frame of debug output.
#[derive(Debug, Clone, Default)]
pub struct DebugDrawData {
    pub lines: Vec<DebugLine>,
    pub points: Vec<DebugPoint>,
    pub texts: Vec<DebugText>,
}

impl DebugDrawData {
    pub fn clear(&mut self) {
        self.lines.clear();
        self.points.clear();
        self.texts.clear();
    }
}

/// Append the twelve edges of a box.
pub fn push_box_wireframe(
    lines: &mut Vec<DebugLine>,
    center: Vec3,
    rotation: Quat,
    half_extents: Vec3,
    color: [f32; 4],
) {
    let mut corners = [Vec3::ZERO; 8];
    for (i, corner) in corners.iter_mut().enumerate() {
        let local = Vec3::new(
            if i & 1 == 0 { -half_extents.x } else { half_extents.x },
            if i & 2 == 0 { -half_extents.y } else { half_extents.y },
            if i & 4 == 0 { -half_extents.z } else { half_extents.z },
        );
        *corner = center + rotation * local;
    }

    const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (2, 3),
        (4, 5),
        (6, 7),
        (0, 2),
        (1, 3),
        (4, 6),
        (5, 7),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];
    for (i, j) in EDGES {
        lines.push(DebugLine {
            start: corners[i],
            end: corners[j],
            color,
        });
    }
}

/// Append three axis-aligned great circles approximating a sphere.
pub fn push_sphere_wireframe(
    lines: &mut Vec<DebugLine>,
    center: Vec3,
    radius: f32,
    color: [f32; 4],
) {
    for axis in 0..3 {
        let mut prev = circle_point(center, radius, axis, 0);
        for segment in 1..=CIRCLE_SEGMENTS {
            let next = circle_point(center, radius, axis, segment);
            lines.push(DebugLine {
                start: prev,
                end: next,
                color,
            });
            prev = next;
        }
    }
}

fn circle_point(center: Vec3, radius: f32, axis: usize, segment: u32) -> Vec3 {
    let theta = segment as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
    let (sin, cos) = theta.sin_cos();
    let offset = match axis {
        0 => Vec3::new(0.0, cos, sin),
        1 => Vec3::new(cos, 0.0, sin),
        _ => Vec3::new(cos, sin, 0.0),
    };
    center + offset * radius
}

/// Append a square grid of lines on the y = 0 plane.
pub fn push_grid(lines: &mut Vec<DebugLine>, half_extent: f32, spacing: f32, color: [f32; 4]) {
    if spacing <= 0.0 {
        return;
    }
    let count = (half_extent / spacing).floor() as i32;
    for i in -count..=count {
        let offset = i as f32 * spacing;
        lines.push(DebugLine {
            start: Vec3::new(-half_extent, 0.0, offset),
            end: Vec3::new(half_extent, 0.0, offset),
            color,
        });
        lines.push(DebugLine {
            start: Vec3::new(offset, 0.0, -half_extent),
            end: Vec3::new(offset, 0.0, half_extent),
            color,
        });
    }
}
