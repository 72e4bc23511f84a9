use super::*;

impl<K> QuadTree<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Index `key` under `bounds`.
    ///
    /// Bounds outside the root region are rejected with
    /// [`QuadtreeError::OutOfBounds`] and the entity stays unindexed. Inserting a
    /// key that is already indexed relocates it to the new bounds.
    pub fn insert(&mut self, key: K, bounds: Rectangle) -> QuadtreeResult<NodeId> {
        validate_bounds(&bounds)?;
        if self.records.contains_key(&key) {
            return self.relocate(key, bounds);
        }
        if !self.root_node().region.contains_rect(&bounds) {
            warn!(
                ?key,
                ?bounds,
                region = ?self.root_node().region,
                "root region doesn't contain entity, insert skipped"
            );
            return Err(self.out_of_bounds(bounds));
        }

        self.records.insert(
            key,
            EntityRecord {
                bounds,
                owner: None,
                escaped: false,
            },
        );
        Ok(self.insert_into(NodeId::ROOT, key, bounds))
    }

    // Descend from `node` while a single child fully contains the bounds, then adopt.
    // The caller guarantees that `node` contains `bounds`.
    pub(super) fn insert_into(&mut self, mut node: NodeId, key: K, bounds: Rectangle) -> NodeId {
        while let Some(child) = self.containing_child(node, &bounds) {
            node = child;
        }
        self.adopt(node, key)
    }

    // Add to the node's own set and partition once it reaches capacity.
    // Returns the node that owns the entity afterwards.
    pub(super) fn adopt(&mut self, node: NodeId, key: K) -> NodeId {
        self.node_mut(node).add_entity(key);
        self.set_owner(key, node);

        let over_capacity = {
            let quad = self.node(node);
            !quad.is_partitioned() && quad.entities.len() >= self.config.node_capacity
        };
        if over_capacity && self.partition(node) {
            return self
                .records
                .get(&key)
                .and_then(|record| record.owner)
                .unwrap_or(node);
        }
        node
    }

    /// First child (NW, NE, SW, SE) whose region fully contains `bounds`.
    pub(super) fn containing_child(&self, node: NodeId, bounds: &Rectangle) -> Option<NodeId> {
        let children = self.node(node).children?;
        children
            .into_iter()
            .find(|child| self.node(*child).region.contains_rect(bounds))
    }

    // Split a leaf into four quadrants and push its entities down where they fit.
    // Refused (returns false) if a quadrant would be smaller than the minimum cell size.
    fn partition(&mut self, node: NodeId) -> bool {
        let (region, depth) = {
            let quad = self.node(node);
            debug_assert!(!quad.is_partitioned(), "partition is one-way");
            (quad.region, quad.depth)
        };

        let half_width = region.width / 2.0;
        let half_height = region.height / 2.0;
        if half_width < self.config.min_cell_width || half_height < self.config.min_cell_height {
            trace!(?node, ?region, "partition refused, node stays an over-capacity leaf");
            return false;
        }

        let first = self.nodes.len() as u32;
        for quadrant in region.quadrants() {
            self.nodes.push(QuadNode::new(quadrant, Some(node), depth + 1));
        }
        let children = [
            NodeId(first + NW as u32),
            NodeId(first + NE as u32),
            NodeId(first + SW as u32),
            NodeId(first + SE as u32),
        ];
        self.node_mut(node).children = Some(children);
        trace!(?node, ?region, depth, "partitioned");

        let entities = std::mem::take(&mut self.node_mut(node).entities);
        let mut kept = Vec::with_capacity(entities.len());
        for key in entities {
            let child = self
                .bounds_of(&key)
                .and_then(|bounds| self.containing_child(node, &bounds).map(|child| (child, bounds)));
            match child {
                Some((child, bounds)) => {
                    self.insert_into(child, key, bounds);
                }
                None => kept.push(key),
            }
        }
        self.node_mut(node).entities = kept;
        true
    }
}
