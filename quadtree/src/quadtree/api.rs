use super::*;
use std::fmt;

impl<K> QuadTree<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.records.contains_key(key)
    }

    /// Bounds the entity was last indexed or moved with.
    pub fn bounds(&self, key: &K) -> Option<Rectangle> {
        self.bounds_of(key)
    }

    /// Whether the entity's last move took it outside the root region.
    pub fn is_escaped(&self, key: &K) -> bool {
        self.records.get(key).map_or(false, |record| record.escaped)
    }

    /// Entities whose last move took them outside the root region.
    pub fn escaped(&self) -> &[K] {
        &self.escaped
    }

    /// The node recorded as the entity's owner.
    pub fn owner(&self, key: &K) -> Option<NodeId> {
        self.records.get(key).and_then(|record| record.owner)
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn root_region(&self) -> Rectangle {
        self.root_node().region
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn region(&self, node: NodeId) -> Option<Rectangle> {
        self.nodes.get(node.index()).map(|quad| quad.region)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index()).and_then(|quad| quad.parent)
    }

    /// Children in NW, NE, SW, SE order, or None for a leaf.
    pub fn children(&self, node: NodeId) -> Option<[NodeId; 4]> {
        self.nodes.get(node.index()).and_then(|quad| quad.children)
    }

    pub fn is_partitioned(&self, node: NodeId) -> bool {
        self.nodes
            .get(node.index())
            .map_or(false, |quad| quad.is_partitioned())
    }

    /// Entities owned by `node` itself, not by its descendants.
    pub fn entities_in(&self, node: NodeId) -> &[K] {
        self.nodes
            .get(node.index())
            .map(|quad| quad.entities.as_slice())
            .unwrap_or(&[])
    }

    pub fn depth(&self, node: NodeId) -> Option<u32> {
        self.nodes.get(node.index()).map(|quad| quad.depth)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn all_node_bounding_boxes(&self, bounding_boxes: &mut Vec<Rectangle>) {
        bounding_boxes.extend(self.nodes.iter().map(|quad| quad.region));
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, node: NodeId) -> fmt::Result {
        let quad = self.node(node);
        let r = quad.region;
        writeln!(
            f,
            "{:indent$}[{}, {}, {}, {}] {:?}",
            "",
            r.x,
            r.y,
            r.width,
            r.height,
            quad.entities,
            indent = quad.depth as usize * 2
        )?;
        if let Some(children) = quad.children {
            for child in children {
                self.fmt_node(f, child)?;
            }
        }
        Ok(())
    }
}

// One line per node, indented by depth.
impl<K> fmt::Display for QuadTree<K>
where
    K: Copy + Eq + Hash + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, NodeId::ROOT)
    }
}
