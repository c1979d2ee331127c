//! Rigid-body physics for scene primitives.
//!
//! Bodies are spheres or axis-aligned cubes moving at constant velocity
//! between contacts. Each step integrates positions, then resolves every
//! overlapping pair with an impulse along the contact normal.
//!
//! # Invariants
//! - Mass is positive and finite for every body.
//! - Zero-size shapes never collide.
//! - Separating pairs are never pushed together.

mod body;
mod collision;
mod world;

pub use body::{BodyShape, PhysicsError, RigidBody};
pub use collision::{Contact, detect};
pub use world::{ContactEvent, PhysicsWorld};
