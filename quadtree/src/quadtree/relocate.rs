use super::*;

impl<K> QuadTree<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Re-settle an indexed entity after its bounds changed.
    ///
    /// The owner is found through the entity's back-reference, falling back to a
    /// full tree search. From the owner the entity is pushed down one level if a
    /// child now contains it, or up to the nearest ancestor that still contains it.
    /// If not even the root contains the new bounds, [`QuadtreeError::OutOfBounds`]
    /// is returned. The entity then stays with its owner but the new bounds are
    /// recorded, and queries keep finding it where it actually is until a later
    /// move brings it back inside.
    pub fn relocate(&mut self, key: K, bounds: Rectangle) -> QuadtreeResult<NodeId> {
        validate_bounds(&bounds)?;
        let Some(owner) = self.owner_lookup(&key) else {
            debug!(?key, "relocate of an entity that isn't indexed");
            return Err(QuadtreeError::NotFound);
        };

        let target = match self.ascent_target(owner, &bounds) {
            Ok(target) => target,
            Err(err) => {
                warn!(
                    ?key,
                    ?bounds,
                    region = ?self.root_node().region,
                    "root region doesn't contain moved entity, left at its last valid node"
                );
                if !self.is_escaped(&key) {
                    self.escaped.push(key);
                }
                self.records.insert(
                    key,
                    EntityRecord {
                        bounds,
                        owner: Some(owner),
                        escaped: true,
                    },
                );
                return Err(err);
            }
        };

        if self.is_escaped(&key) {
            self.escaped.retain(|stray| *stray != key);
        }
        self.records.insert(
            key,
            EntityRecord {
                bounds,
                owner: Some(owner),
                escaped: false,
            },
        );

        Ok(match target {
            None => self.entity_move_down(owner, key, bounds),
            Some(ancestor) => {
                self.node_mut(owner).remove_entity(&key);
                self.insert_into(ancestor, key, bounds)
            }
        })
    }

    /// Remove `key` from the index. Removing an entity that isn't indexed is a
    /// no-op and returns false.
    pub fn remove(&mut self, key: K) -> bool {
        let owner = self.owner_lookup(&key);
        let record = self.records.remove(&key);
        if record.map_or(false, |record| record.escaped) {
            self.escaped.retain(|stray| *stray != key);
        }
        match owner {
            Some(owner) => {
                self.node_mut(owner).remove_entity(&key);
                true
            }
            None => {
                if record.is_none() {
                    debug!(?key, "remove of an entity that isn't indexed");
                }
                false
            }
        }
    }

    /// Search every node for `key`, ignoring the back-reference.
    pub fn find_node(&self, key: &K) -> Option<NodeId> {
        let mut stack = NodeStack::new();
        stack.push(NodeId::ROOT);
        while let Some(node) = stack.pop() {
            let quad = self.node(node);
            if quad.entities.contains(key) {
                return Some(node);
            }
            if let Some(children) = quad.children {
                stack.extend(children.into_iter().rev());
            }
        }
        None
    }

    // Back-reference first, full search second.
    pub(super) fn owner_lookup(&mut self, key: &K) -> Option<NodeId> {
        let recorded = self.records.get(key).and_then(|record| record.owner);
        if let Some(owner) = recorded {
            if self.node(owner).entities.contains(key) {
                return Some(owner);
            }
        }
        let found = self.find_node(key)?;
        debug!(?key, node = ?found, "back-reference missing, owner found by search");
        if let Some(record) = self.records.get_mut(key) {
            record.owner = Some(found);
        }
        Some(found)
    }

    // None when the owner still contains the bounds, Some(ancestor) for the
    // nearest containing ancestor, Err when even the root doesn't contain them.
    fn ascent_target(&self, owner: NodeId, bounds: &Rectangle) -> QuadtreeResult<Option<NodeId>> {
        if self.node(owner).region.contains_rect(bounds) {
            return Ok(None);
        }
        let mut current = self.node(owner).parent;
        while let Some(node) = current {
            if self.node(node).region.contains_rect(bounds) {
                return Ok(Some(node));
            }
            current = self.node(node).parent;
        }
        Err(self.out_of_bounds(*bounds))
    }

    // Descent is lazy: at most one level per move.
    fn entity_move_down(&mut self, owner: NodeId, key: K, bounds: Rectangle) -> NodeId {
        match self.containing_child(owner, &bounds) {
            Some(child) => {
                self.node_mut(owner).remove_entity(&key);
                self.adopt(child, key)
            }
            None => owner,
        }
    }

    #[cfg(test)]
    pub(crate) fn forget_owner(&mut self, key: &K) {
        if let Some(record) = self.records.get_mut(key) {
            record.owner = None;
        }
    }
}
