//! Broadphase collision detection using a uniform spatial hash grid.

use std::collections::HashMap;

use glam::{IVec3, Vec3};

use crate::ecs::components::physics::Collider;
use crate::ecs::components::transform::Transform;

/// Forward half of the 3x3x3 neighbour stencil. Visiting only these
/// offsets from each occupied cell emits every neighbouring cell pair
/// exactly once.
const FORWARD_NEIGHBOURS: [IVec3; 13] = [
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 1, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(1, 1, 0),
    IVec3::new(-1, -1, 1),
    IVec3::new(0, -1, 1),
    IVec3::new(1, -1, 1),
    IVec3::new(-1, 0, 1),
    IVec3::new(0, 0, 1),
    IVec3::new(1, 0, 1),
    IVec3::new(-1, 1, 1),
    IVec3::new(0, 1, 1),
    IVec3::new(1, 1, 1),
];

/// Uniform grid bucketing bodies by the cell containing their centre.
///
/// The grid is rebuilt from scratch every substep; nothing persists
/// across rebuilds. Static bodies are inserted like dynamic ones, and
/// static-static filtering is left to the resolution pass.
pub struct UniformGrid {
    cell_size: f32,
    cells: HashMap<IVec3, Vec<hecs::Entity>>,
}

impl UniformGrid {
    /// Create a grid. `cell_size` must be positive.
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0);
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell coordinate containing a world position. `floor` resolves
    /// boundary ties downward: a body at 2.0 with cell size 2.0 lands in
    /// cell 1.
    pub fn cell_coord(&self, position: Vec3) -> IVec3 {
        (position / self.cell_size).floor().as_ivec3()
    }

    /// Rebuild the grid from the world and emit candidate pairs: every
    /// unordered pair of bodies sharing a cell or occupying neighbouring
    /// cells, each emitted once. Occupied cells are visited in sorted
    /// coordinate order so emission order is stable across runs.
    pub fn find_pairs(&mut self, world: &hecs::World) -> Vec<(hecs::Entity, hecs::Entity)> {
        self.cells.clear();
        for (entity, (transform, _)) in world.query::<(&Transform, &Collider)>().iter() {
            let coord = self.cell_coord(transform.position);
            self.cells.entry(coord).or_default().push(entity);
        }

        let mut coords: Vec<IVec3> = self.cells.keys().copied().collect();
        coords.sort_unstable_by_key(|c| (c.x, c.y, c.z));

        let mut pairs = Vec::new();
        for coord in &coords {
            let members = &self.cells[coord];

            for i in 0..members.len() {
                for j in (i + 1)..members.len() {
                    pairs.push((members[i], members[j]));
                }
            }

            for offset in FORWARD_NEIGHBOURS {
                if let Some(neighbours) = self.cells.get(&(*coord + offset)) {
                    for &a in members {
                        for &b in neighbours {
                            pairs.push((a, b));
                        }
                    }
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::physics::ColliderShape;

    fn spawn_at(world: &mut hecs::World, position: Vec3) -> hecs::Entity {
        world.spawn((
            Transform::from_position(position),
            Collider {
                shape: ColliderShape::Sphere { radius: 0.5 },
            },
        ))
    }

    fn unordered_contains(
        pairs: &[(hecs::Entity, hecs::Entity)],
        a: hecs::Entity,
        b: hecs::Entity,
    ) -> bool {
        pairs.iter().any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    #[test]
    fn test_cell_coord_boundary() {
        let grid = UniformGrid::new(2.0);
        assert_eq!(grid.cell_coord(Vec3::new(2.0, 0.0, 0.0)), IVec3::new(1, 0, 0));
        assert_eq!(
            grid.cell_coord(Vec3::new(1.999, -0.001, 0.0)),
            IVec3::new(0, -1, 0)
        );
    }

    #[test]
    fn test_same_and_adjacent_cells() {
        let mut world = hecs::World::new();
        let a = spawn_at(&mut world, Vec3::new(1.0, 1.0, 1.0));
        let b = spawn_at(&mut world, Vec3::new(1.5, 1.5, 1.5));
        let c = spawn_at(&mut world, Vec3::new(3.0, 3.0, 3.0));

        // a and b share cell (0,0,0); c sits in (1,1,1), diagonally
        // adjacent to it, so all three unordered pairs must appear.
        let mut grid = UniformGrid::new(2.0);
        let pairs = grid.find_pairs(&world);
        assert_eq!(pairs.len(), 3);
        assert!(unordered_contains(&pairs, a, b));
        assert!(unordered_contains(&pairs, a, c));
        assert!(unordered_contains(&pairs, b, c));
    }

    #[test]
    fn test_far_apart_bodies_emit_nothing() {
        let mut world = hecs::World::new();
        spawn_at(&mut world, Vec3::new(1.0, 1.0, 1.0));
        spawn_at(&mut world, Vec3::new(5.0, 5.0, 5.0));
        spawn_at(&mut world, Vec3::new(-3.0, -3.0, -3.0));

        let mut grid = UniformGrid::new(2.0);
        let pairs = grid.find_pairs(&world);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_nearby_bodies_always_paired() {
        // Any two bodies within one cell size on every axis land in the
        // same or neighbouring cells and must be paired.
        let mut world = hecs::World::new();
        let a = spawn_at(&mut world, Vec3::new(1.9, 0.1, 3.9));
        let b = spawn_at(&mut world, Vec3::new(2.1, -0.1, 2.05));

        let mut grid = UniformGrid::new(2.0);
        let pairs = grid.find_pairs(&world);
        assert!(unordered_contains(&pairs, a, b));
    }

    #[test]
    fn test_no_duplicate_pairs() {
        let mut world = hecs::World::new();
        // Cluster spanning several mutually adjacent cells
        for i in 0..4 {
            for j in 0..4 {
                spawn_at(&mut world, Vec3::new(i as f32, j as f32, 0.0));
            }
        }

        let mut grid = UniformGrid::new(2.0);
        let pairs = grid.find_pairs(&world);
        for (idx, &(a, b)) in pairs.iter().enumerate() {
            assert_ne!(a, b);
            for &(c, d) in &pairs[idx + 1..] {
                assert!(
                    !((a == c && b == d) || (a == d && b == c)),
                    "duplicate pair emitted"
                );
            }
        }
    }

    #[test]
    fn test_rebuild_clears_previous_state() {
        let mut world = hecs::World::new();
        let a = spawn_at(&mut world, Vec3::ZERO);
        let b = spawn_at(&mut world, Vec3::new(0.5, 0.0, 0.0));

        let mut grid = UniformGrid::new(2.0);
        assert_eq!(grid.find_pairs(&world).len(), 1);

        // Move one body far away; a fresh rebuild must not remember the
        // old cell membership.
        world.get::<&mut Transform>(b).unwrap().position = Vec3::new(100.0, 0.0, 0.0);
        let pairs = grid.find_pairs(&world);
        assert!(pairs.is_empty());
        let _ = a;
    }
}
