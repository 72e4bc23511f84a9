//! Frame-stepped scene of entities kept in a quadtree.
mod behaviour;
mod entity;
mod world;

pub use behaviour::{Behaviour, Context};
pub use entity::{Entity, EntityId, Hitbox};
pub use world::{World, WorldConfig};
