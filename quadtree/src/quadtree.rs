use crate::error::{validate_bounds, validate_world_dims, QuadtreeError, QuadtreeResult};
use common::shapes::Rectangle;
use fxhash::FxHashMap;
use smallvec::SmallVec;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, info, trace, warn};

mod api;
mod config;
mod core;
mod maintenance;
mod query;
mod relocate;

pub use config::Config;

/// Handle of a node in the tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

// Fixed quadrant order used for descent and traversal.
pub(crate) const NW: usize = 0;
pub(crate) const NE: usize = 1;
pub(crate) const SW: usize = 2;
pub(crate) const SE: usize = 3;

pub(crate) type NodeStack = SmallVec<[NodeId; 64]>;

struct QuadNode<K> {
    region: Rectangle,
    parent: Option<NodeId>,
    children: Option<[NodeId; 4]>,
    entities: Vec<K>,
    depth: u32,
}

impl<K: PartialEq> QuadNode<K> {
    fn new(region: Rectangle, parent: Option<NodeId>, depth: u32) -> Self {
        Self {
            region,
            parent,
            children: None,
            entities: Vec::new(),
            depth,
        }
    }

    fn is_partitioned(&self) -> bool {
        self.children.is_some()
    }

    // Returns false if the entity was already owned here.
    fn add_entity(&mut self, key: K) -> bool {
        if self.entities.contains(&key) {
            return false;
        }
        self.entities.push(key);
        true
    }

    fn remove_entity(&mut self, key: &K) -> bool {
        match self.entities.iter().position(|owned| owned == key) {
            Some(pos) => {
                // Keep insertion order stable for deterministic traversal.
                self.entities.remove(pos);
                true
            }
            None => false,
        }
    }
}

// The index's view of an entity: its bounds and the back-reference to the owning node.
// An escaped entity was moved outside the root region; it stays with its owner but its
// bounds no longer fit there.
#[derive(Clone, Copy, Debug)]
struct EntityRecord {
    bounds: Rectangle,
    owner: Option<NodeId>,
    escaped: bool,
}

/// Quadtree spatial index keyed by caller-chosen entity identities.
pub struct QuadTree<K> {
    nodes: Vec<QuadNode<K>>,
    records: FxHashMap<K, EntityRecord>,
    // Escaped entities, tested by every query regardless of node pruning.
    escaped: Vec<K>,
    config: Config,
}

impl<K> QuadTree<K>
where
    K: Copy + Eq + Hash + Debug,
{
    pub fn new_with_config(bounding_box: Rectangle, config: Config) -> QuadtreeResult<Self> {
        config.validate()?;
        validate_world_dims(bounding_box.width, bounding_box.height)?;
        validate_bounds(&bounding_box)?;
        let mut nodes = Vec::with_capacity(config.pool_size.max(1));
        nodes.push(QuadNode::new(bounding_box, None, 0));
        Ok(Self {
            nodes,
            records: FxHashMap::default(),
            escaped: Vec::new(),
            config,
        })
    }

    pub fn new(bounding_box: Rectangle) -> QuadtreeResult<Self> {
        Self::new_with_config(bounding_box, Config::default())
    }

    /// Tree covering `(0, 0, width, height)`.
    pub fn with_size(width: f32, height: f32) -> QuadtreeResult<Self> {
        Self::new(Rectangle::new(0.0, 0.0, width, height))
    }

    #[inline(always)]
    fn node(&self, id: NodeId) -> &QuadNode<K> {
        &self.nodes[id.index()]
    }

    #[inline(always)]
    fn node_mut(&mut self, id: NodeId) -> &mut QuadNode<K> {
        &mut self.nodes[id.index()]
    }

    #[inline(always)]
    fn root_node(&self) -> &QuadNode<K> {
        self.node(NodeId::ROOT)
    }

    fn bounds_of(&self, key: &K) -> Option<Rectangle> {
        self.records.get(key).map(|record| record.bounds)
    }

    fn set_owner(&mut self, key: K, owner: NodeId) {
        if let Some(record) = self.records.get_mut(&key) {
            record.owner = Some(owner);
        }
    }

    fn out_of_bounds(&self, bounds: Rectangle) -> QuadtreeError {
        QuadtreeError::OutOfBounds {
            bounds,
            region: self.root_node().region,
        }
    }
}
