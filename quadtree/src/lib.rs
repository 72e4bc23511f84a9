//! Dynamic quadtree over axis-aligned entity bounds.
//!
//! Entities live in exactly one node: the deepest node whose region fully
//! contains their bounds, as far as lazy descent has pushed them. Nodes are
//! kept in an arena and addressed by [`NodeId`]; parent, child and owner links
//! are arena indices.
pub mod error;
pub mod quadtree;

pub use error::{QuadtreeError, QuadtreeResult};
pub use quadtree::{Config, NodeId, QuadTree};
pub use common::shapes;
