//! hecs component definitions for physics bodies.
//!
//! A body is an entity carrying [`components::transform::Transform`],
//! [`components::physics::RigidBody`] and [`components::physics::Collider`].

pub mod components;
