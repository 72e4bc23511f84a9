use super::*;

impl<K> QuadTree<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Rebuild the tree over a new root region of `width` x `height`, keeping
    /// the root's top-left corner.
    ///
    /// Every indexed entity is re-inserted in traversal order. Entities that the
    /// new region no longer contains are dropped from the index and returned.
    /// Invalid dimensions are rejected before anything is touched.
    pub fn resize(&mut self, width: f32, height: f32) -> QuadtreeResult<Vec<K>> {
        validate_world_dims(width, height)?;
        let old = self.root_node().region;
        let region = Rectangle::new(old.x, old.y, width, height);
        info!(?old, new = ?region, entities = self.records.len(), "resizing quadtree");

        let survivors: Vec<(K, Rectangle)> = self
            .all_entities()
            .into_iter()
            .filter_map(|key| self.bounds_of(&key).map(|bounds| (key, bounds)))
            .collect();

        self.reset_nodes(region);
        self.records.clear();
        self.escaped.clear();

        let mut dropped = Vec::new();
        for (key, bounds) in survivors {
            if !region.contains_rect(&bounds) {
                dropped.push(key);
                continue;
            }
            self.records.insert(
                key,
                EntityRecord {
                    bounds,
                    owner: None,
                    escaped: false,
                },
            );
            self.insert_into(NodeId::ROOT, key, bounds);
        }
        if !dropped.is_empty() {
            warn!(count = dropped.len(), ?region, "entities outside resized region dropped");
        }
        Ok(dropped)
    }

    /// Release every node and entity. The tree stays usable with an empty root
    /// covering the same region.
    pub fn destroy(&mut self) {
        let region = self.root_node().region;
        self.reset_nodes(region);
        self.records.clear();
        self.escaped.clear();
    }

    fn reset_nodes(&mut self, region: Rectangle) {
        self.nodes.truncate(1);
        let root = self.node_mut(NodeId::ROOT);
        root.region = region;
        root.children = None;
        root.entities.clear();
    }
}
