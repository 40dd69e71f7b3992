//! Line-oriented scene persistence.
//!
//! Format:
//!
//! ```text
//! settings
//! <fixed_time_step> <max_time_step> <max_sub_steps>
//! <gravity.x> <gravity.y> <gravity.z>
//! <default_restitution> <default_friction>
//! bodies
//! <count>
//! <shape> <x> <y> <z> <hx> <hy> <hz> <mass>
//! ```
//!
//! Shape 0 is a sphere (radius in `hx`), 1 an axis-aligned box, 2 an
//! oriented box. Body lines with an unknown shape integer are discarded.

use std::fs;
use std::path::Path;

use glam::Vec3;
use thiserror::Error;
use tracing::warn;

use crate::ecs::components::physics::ColliderShape;
use crate::engine::{BodySnapshot, Settings};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("scene parse: {0}")]
    Parse(String),
}

/// Parsed contents of a scene file.
#[derive(Debug, Clone)]
pub struct SceneData {
    pub fixed_time_step: f32,
    pub max_time_step: f32,
    pub max_sub_steps: u32,
    pub gravity: Vec3,
    pub default_restitution: f32,
    pub default_friction: f32,
    pub bodies: Vec<SceneBody>,
}

#[derive(Debug, Clone, Copy)]
pub struct SceneBody {
    pub shape: ColliderShape,
    pub position: Vec3,
    pub mass: f32,
}

fn shape_tag(shape: &ColliderShape) -> (i32, Vec3) {
    match *shape {
        ColliderShape::Sphere { radius } => (0, Vec3::new(radius, 0.0, 0.0)),
        ColliderShape::Box { half_extents } => (1, half_extents),
        ColliderShape::OrientedBox { half_extents } => (2, half_extents),
    }
}

/// Write settings and bodies to `path`.
pub fn write_scene(
    path: &Path,
    settings: &Settings,
    bodies: &[BodySnapshot],
) -> Result<(), SceneError> {
    let mut out = String::new();
    out.push_str("settings\n");
    out.push_str(&format!(
        "{} {} {}\n",
        settings.fixed_time_step, settings.max_time_step, settings.max_sub_steps
    ));
    out.push_str(&format!(
        "{} {} {}\n",
        settings.gravity.x, settings.gravity.y, settings.gravity.z
    ));
    out.push_str(&format!(
        "{} {}\n",
        settings.default_restitution, settings.default_friction
    ));
    out.push_str("bodies\n");
    out.push_str(&format!("{}\n", bodies.len()));
    for body in bodies {
        let (tag, extents) = shape_tag(&body.shape);
        out.push_str(&format!(
            "{} {} {} {} {} {} {} {}\n",
            tag,
            body.position.x,
            body.position.y,
            body.position.z,
            extents.x,
            extents.y,
            extents.z,
            body.mass
        ));
    }
    fs::write(path, out)?;
    Ok(())
}

/// Read and parse a scene file.
pub fn read_scene(path: &Path) -> Result<SceneData, SceneError> {
    let text = fs::read_to_string(path)?;
    parse_scene(&text)
}

fn parse_scene(text: &str) -> Result<SceneData, SceneError> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    expect_header(lines.next(), "settings")?;
    let steps = parse_numbers(lines.next(), 3, "timestep settings")?;
    let gravity = parse_numbers(lines.next(), 3, "gravity")?;
    let material = parse_numbers(lines.next(), 2, "default material")?;

    expect_header(lines.next(), "bodies")?;
    let count = parse_numbers(lines.next(), 1, "body count")?[0] as usize;

    let mut bodies = Vec::with_capacity(count);
    for index in 0..count {
        let line = lines
            .next()
            .ok_or_else(|| SceneError::Parse(format!("missing body line {index}")))?;
        let values = parse_numbers(Some(line), 8, "body")?;
        let position = Vec3::new(values[1], values[2], values[3]);
        let extents = Vec3::new(values[4], values[5], values[6]);
        let mass = values[7];

        let shape = match values[0] as i32 {
            0 => ColliderShape::Sphere { radius: extents.x },
            1 => ColliderShape::Box {
                half_extents: extents,
            },
            2 => ColliderShape::OrientedBox {
                half_extents: extents,
            },
            other => {
                warn!(shape = other, "discarding body with unknown shape");
                continue;
            }
        };
        bodies.push(SceneBody {
            shape,
            position,
            mass,
        });
    }

    Ok(SceneData {
        fixed_time_step: steps[0],
        max_time_step: steps[1],
        max_sub_steps: steps[2] as u32,
        gravity: Vec3::new(gravity[0], gravity[1], gravity[2]),
        default_restitution: material[0],
        default_friction: material[1],
        bodies,
    })
}

fn expect_header(line: Option<&str>, header: &str) -> Result<(), SceneError> {
    match line {
        Some(found) if found == header => Ok(()),
        Some(found) => Err(SceneError::Parse(format!(
            "expected {header:?} header, found {found:?}"
        ))),
        None => Err(SceneError::Parse(format!("missing {header:?} header"))),
    }
}

fn parse_numbers(line: Option<&str>, want: usize, what: &str) -> Result<Vec<f32>, SceneError> {
    let line = line.ok_or_else(|| SceneError::Parse(format!("missing {what} line")))?;
    let values: Result<Vec<f32>, _> = line.split_whitespace().map(str::parse).collect();
    let values = values.map_err(|_| SceneError::Parse(format!("bad {what} line: {line:?}")))?;
    if values.len() != want {
        return Err(SceneError::Parse(format!(
            "expected {want} values for {what}, got {}",
            values.len()
        )));
    }
    Ok(values)
}
