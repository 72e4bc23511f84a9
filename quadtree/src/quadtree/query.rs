use super::*;

impl<K> QuadTree<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Every entity whose bounds contain the point, edges included. Escaped
    /// entities are tested after the tree walk.
    pub fn query_point(&self, x: f32, y: f32) -> Vec<K> {
        let mut out = Vec::new();
        self.query_point_with(x, y, |key| out.push(key));
        out
    }

    pub fn query_point_with<F>(&self, x: f32, y: f32, mut f: F)
    where
        F: FnMut(K),
    {
        let mut stack = NodeStack::new();
        stack.push(NodeId::ROOT);
        while let Some(node) = stack.pop() {
            let quad = self.node(node);
            if !quad.region.contains_point(x, y) {
                continue;
            }
            for key in &quad.entities {
                if let Some(record) = self.records.get(key) {
                    if !record.escaped && record.bounds.contains_point(x, y) {
                        f(*key);
                    }
                }
            }
            if let Some(children) = quad.children {
                stack.extend(children.into_iter().rev());
            }
        }
        for key in &self.escaped {
            if let Some(bounds) = self.bounds_of(key) {
                if bounds.contains_point(x, y) {
                    f(*key);
                }
            }
        }
    }

    /// Every entity whose bounds touch or overlap `rect`.
    pub fn query_rect(&self, rect: &Rectangle) -> Vec<K> {
        let mut out = Vec::new();
        self.query_rect_with(rect, |key| out.push(key));
        out
    }

    pub fn query_rect_with<F>(&self, rect: &Rectangle, mut f: F)
    where
        F: FnMut(K),
    {
        let mut stack = NodeStack::new();
        stack.push(NodeId::ROOT);
        while let Some(node) = stack.pop() {
            let quad = self.node(node);
            if !quad.region.intersects(rect) {
                continue;
            }
            for key in &quad.entities {
                if let Some(record) = self.records.get(key) {
                    if !record.escaped && record.bounds.intersects(rect) {
                        f(*key);
                    }
                }
            }
            if let Some(children) = quad.children {
                stack.extend(children.into_iter().rev());
            }
        }
        for key in &self.escaped {
            if let Some(bounds) = self.bounds_of(key) {
                if bounds.intersects(rect) {
                    f(*key);
                }
            }
        }
    }

    /// All indexed entities, node by node in pre-order (a node's own entities,
    /// then its NW, NE, SW and SE subtrees).
    pub fn all_entities(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.records.len());
        let mut stack = NodeStack::new();
        stack.push(NodeId::ROOT);
        while let Some(node) = stack.pop() {
            let quad = self.node(node);
            out.extend_from_slice(&quad.entities);
            if let Some(children) = quad.children {
                stack.extend(children.into_iter().rev());
            }
        }
        out
    }
}
