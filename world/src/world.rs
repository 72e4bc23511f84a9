use crate::behaviour::{Behaviour, Context};
use crate::entity::{Entity, EntityId};
use collisions::CollisionSource;
use common::shapes::Rectangle;
use fxhash::FxHashMap;
use quadtree::{Config, QuadTree, QuadtreeError, QuadtreeResult};
use smallvec::SmallVec;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub index: Config,
}

impl WorldConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            index: Config::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(1024.0, 1024.0)
    }
}

/// Frame-stepped scene over a quadtree.
///
/// A tick runs in three fixed phases:
/// 1. entities queued with [`World::add`] enter the index (`added_to_world`),
/// 2. every indexed entity is updated in index traversal order, moving inline,
/// 3. entities queued with [`World::remove`] leave the index (`removed_from_world`).
///
/// Queries issued mid-tick therefore don't see this tick's additions until the
/// next tick, and still see entities marked for removal.
pub struct World {
    width: f32,
    height: f32,
    index: QuadTree<EntityId>,
    entities: FxHashMap<EntityId, Entity>,
    addable: Vec<EntityId>,
    removable: Vec<EntityId>,
    responses: VecDeque<(EntityId, EntityId)>,
    next_id: u32,
}

impl World {
    pub fn new(config: WorldConfig) -> QuadtreeResult<Self> {
        let region = Rectangle::new(0.0, 0.0, config.width, config.height);
        let index = QuadTree::new_with_config(region, config.index)?;
        Ok(Self {
            width: config.width,
            height: config.height,
            index,
            entities: FxHashMap::default(),
            addable: Vec::new(),
            removable: Vec::new(),
            responses: VecDeque::new(),
            next_id: 0,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn region(&self) -> Rectangle {
        Rectangle::new(0.0, 0.0, self.width, self.height)
    }

    pub fn index(&self) -> &QuadTree<EntityId> {
        &self.index
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Queue `entity` for the start of the next tick.
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entities.insert(id, entity);
        self.addable.push(id);
        id
    }

    pub fn add_all<I>(&mut self, entities: I) -> Vec<EntityId>
    where
        I: IntoIterator<Item = Entity>,
    {
        entities.into_iter().map(|entity| self.add(entity)).collect()
    }

    /// Queue `id` for removal at the end of the current tick. Returns false if
    /// it is unknown or already queued.
    pub fn remove(&mut self, id: EntityId) -> bool {
        if !self.entities.contains_key(&id) || self.removable.contains(&id) {
            return false;
        }
        self.removable.push(id);
        true
    }

    pub fn is_pending(&self, id: EntityId) -> bool {
        self.addable.contains(&id)
    }

    pub fn tick(&mut self, delta: u32) {
        self.flush_additions(delta);
        for id in self.index.all_entities() {
            let Some(entity) = self.entities.get(&id) else {
                continue;
            };
            if entity.active {
                self.run_hook(id, delta, |behaviour, ctx| behaviour.update(ctx));
            }
            self.check_world_boundaries(id, delta);
        }
        self.flush_removals(delta);
    }

    /// Drop every entity, pending ones included. Indexed entities get
    /// `removed_from_world`.
    pub fn clear(&mut self) {
        info!(entities = self.index.len(), "clearing world");
        for id in self.index.all_entities() {
            self.run_hook(id, 0, |behaviour, ctx| behaviour.removed_from_world(ctx));
        }
        self.index.destroy();
        self.entities.clear();
        self.addable.clear();
        self.removable.clear();
        self.responses.clear();
    }

    /// Rebuild the index for a `width` x `height` world. Entities that no
    /// longer fit are removed from the world and returned.
    pub fn resize(&mut self, width: f32, height: f32) -> QuadtreeResult<Vec<EntityId>> {
        let dropped = self.index.resize(width, height)?;
        self.width = width;
        self.height = height;
        for id in &dropped {
            self.run_hook(*id, 0, |behaviour, ctx| behaviour.removed_from_world(ctx));
            self.entities.remove(id);
        }
        Ok(dropped)
    }

    pub fn set_position(&mut self, id: EntityId, x: f32, y: f32) -> QuadtreeResult<()> {
        let bounds = self
            .entities
            .get(&id)
            .ok_or(QuadtreeError::NotFound)?
            .bounds()
            .at(x, y);
        self.set_bounds(id, bounds)
    }

    /// Update the entity's bounds and, if it is indexed, re-settle it.
    ///
    /// Bounds outside the world return `OutOfBounds`, but both the entity and
    /// the index keep them, so queries and collisions still find it there.
    pub fn set_bounds(&mut self, id: EntityId, bounds: Rectangle) -> QuadtreeResult<()> {
        let entity = self.entities.get_mut(&id).ok_or(QuadtreeError::NotFound)?;
        entity.set_bounds(bounds);
        if self.index.contains(&id) {
            self.index.relocate(id, bounds)?;
        }
        Ok(())
    }

    /// First entity of any of `types` hit by `id`'s hitbox placed at `(x, y)`.
    /// Both participants get `collision_response`.
    pub fn collide(&mut self, id: EntityId, types: &[&str], x: f32, y: f32) -> Option<EntityId> {
        let hit = self.collide_inner(id, types, x, y, true);
        self.deliver_responses(0);
        hit
    }

    pub fn collide_all(&mut self, id: EntityId, types: &[&str], x: f32, y: f32) -> Vec<EntityId> {
        let hits = self.collide_all_inner(id, types, x, y, true);
        self.deliver_responses(0);
        hits
    }

    pub fn collide_with(&mut self, id: EntityId, other: EntityId, x: f32, y: f32) -> bool {
        let hit = self.collide_with_inner(id, other, x, y, true);
        self.deliver_responses(0);
        hit
    }

    pub(crate) fn collide_inner(
        &mut self,
        id: EntityId,
        types: &[&str],
        x: f32,
        y: f32,
        respond: bool,
    ) -> Option<EntityId> {
        let hitbox = self.entities.get(&id)?.hitbox.at(x, y);
        let mut pairs: SmallVec<[(EntityId, EntityId); 2]> = SmallVec::new();
        let hit = collisions::collide(&self.index, &*self, id, &hitbox, types, |a, b| {
            pairs.push((a, b))
        });
        if respond {
            self.responses.extend(pairs);
        }
        hit
    }

    pub(crate) fn collide_all_inner(
        &mut self,
        id: EntityId,
        types: &[&str],
        x: f32,
        y: f32,
        respond: bool,
    ) -> Vec<EntityId> {
        let Some(hitbox) = self.entities.get(&id).map(|entity| entity.hitbox.at(x, y)) else {
            return Vec::new();
        };
        let mut pairs = Vec::new();
        let hits = collisions::collide_all(&self.index, &*self, id, &hitbox, types, |a, b| {
            pairs.push((a, b))
        });
        if respond {
            self.responses.extend(pairs);
        }
        hits
    }

    pub(crate) fn collide_with_inner(
        &mut self,
        id: EntityId,
        other: EntityId,
        x: f32,
        y: f32,
        respond: bool,
    ) -> bool {
        let Some(hitbox) = self.entities.get(&id).map(|entity| entity.hitbox.at(x, y)) else {
            return false;
        };
        let mut pairs: SmallVec<[(EntityId, EntityId); 2]> = SmallVec::new();
        let hit = collisions::collide_with(&*self, id, &hitbox, other, |a, b| pairs.push((a, b)));
        if respond {
            self.responses.extend(pairs);
        }
        hit
    }

    /// Indexed entities in update order.
    pub fn entities(&self) -> Vec<EntityId> {
        self.index.all_entities()
    }

    pub fn entities_of_type(&self, tag: &str) -> Vec<EntityId> {
        self.index
            .all_entities()
            .into_iter()
            .filter(|id| self.entities.get(id).map_or(false, |e| e.is_type(tag)))
            .collect()
    }

    pub fn count_of_type(&self, tag: &str) -> usize {
        self.entities_of_type(tag).len()
    }

    /// Number of indexed entities; pending additions aren't counted.
    pub fn count(&self) -> usize {
        self.index.len()
    }

    pub fn entities_at(&self, x: f32, y: f32) -> Vec<EntityId> {
        self.index.query_point(x, y)
    }

    pub fn entities_in(&self, rect: &Rectangle) -> Vec<EntityId> {
        self.index.query_rect(rect)
    }

    /// Entities touching `viewport`, ordered by depth for drawing.
    pub fn visible(&self, viewport: &Rectangle) -> Vec<EntityId> {
        let mut visible = self.index.query_rect(viewport);
        visible.sort_by_key(|id| self.entities.get(id).map_or(0, |e| e.depth));
        visible
    }

    /// True unless an entity at `depth` covers the point.
    pub fn is_empty_at(&self, x: f32, y: f32, depth: i32) -> bool {
        let mut empty = true;
        self.index.query_point_with(x, y, |id| {
            if self.entities.get(&id).map_or(false, |e| e.depth == depth) {
                empty = false;
            }
        });
        empty
    }

    pub fn entity_at(&self, x: f32, y: f32) -> Option<EntityId> {
        self.index.query_point(x, y).into_iter().next()
    }

    pub fn contains(&self, rect: &Rectangle) -> bool {
        self.region().contains_rect(rect)
    }

    /// Case-insensitive lookup by name, indexed entities first, then pending ones.
    pub fn find(&self, name: &str) -> Option<EntityId> {
        let matches = |id: &EntityId| self.entities.get(id).map_or(false, |e| e.name_matches(name));
        self.index
            .all_entities()
            .into_iter()
            .find(matches)
            .or_else(|| self.addable.iter().copied().find(matches))
    }

    fn flush_additions(&mut self, delta: u32) {
        let pending = std::mem::take(&mut self.addable);
        if pending.is_empty() {
            return;
        }
        debug!(count = pending.len(), "adding entities");
        for id in pending {
            let Some(bounds) = self.entities.get(&id).map(Entity::bounds) else {
                continue;
            };
            match self.index.insert(id, bounds) {
                Ok(_) => self.run_hook(id, delta, |behaviour, ctx| behaviour.added_to_world(ctx)),
                Err(err) => {
                    warn!(?id, %err, "entity dropped instead of added");
                    self.entities.remove(&id);
                }
            }
        }
    }

    fn flush_removals(&mut self, delta: u32) {
        let pending = std::mem::take(&mut self.removable);
        if pending.is_empty() {
            return;
        }
        debug!(count = pending.len(), "removing entities");
        for id in pending {
            // Entities whose add never flushed are notified too.
            self.index.remove(id);
            self.run_hook(id, delta, |behaviour, ctx| behaviour.removed_from_world(ctx));
            self.addable.retain(|pending| *pending != id);
            self.entities.remove(&id);
        }
    }

    // Notify once when an entity leaves the world, then wrap it if asked to.
    fn check_world_boundaries(&mut self, id: EntityId, delta: u32) {
        let region = self.region();
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        if region.contains_rect(&entity.bounds()) {
            entity.left_world = false;
            return;
        }
        if !entity.left_world {
            entity.left_world = true;
            self.run_hook(id, delta, |behaviour, ctx| behaviour.left_world_boundaries(ctx));
        }
        self.wrap(id);
    }

    // Entities wrap once fully past an edge and reappear inside the opposite one.
    fn wrap(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get(&id) else {
            return;
        };
        let bounds = entity.bounds();
        let (mut x, mut y) = (bounds.x, bounds.y);
        if entity.wrap_horizontal {
            if bounds.right() < 0.0 {
                x = self.width - bounds.width;
            } else if bounds.left() > self.width {
                x = 0.0;
            }
        }
        if entity.wrap_vertical {
            if bounds.bottom() < 0.0 {
                y = self.height - bounds.height;
            } else if bounds.top() > self.height {
                y = 0.0;
            }
        }
        if (x, y) != (bounds.x, bounds.y) {
            if let Err(err) = self.set_position(id, x, y) {
                debug!(?id, %err, "wrapped entity still outside the world");
            }
        }
    }

    fn run_hook<F>(&mut self, id: EntityId, delta: u32, hook: F)
    where
        F: FnOnce(&mut dyn Behaviour, &mut Context<'_>),
    {
        let Some(mut behaviour) = self.take_behaviour(id) else {
            return;
        };
        let mut ctx = Context {
            world: self,
            id,
            delta,
            respond: true,
        };
        hook(behaviour.as_mut(), &mut ctx);
        self.restore_behaviour(id, behaviour);
        self.deliver_responses(delta);
    }

    // Responses are delivered in the order the collisions were found. Collisions
    // detected from inside a response aren't reported.
    fn deliver_responses(&mut self, delta: u32) {
        while let Some((target, other)) = self.responses.pop_front() {
            let Some(mut behaviour) = self.take_behaviour(target) else {
                continue;
            };
            let mut ctx = Context {
                world: self,
                id: target,
                delta,
                respond: false,
            };
            behaviour.collision_response(&mut ctx, other);
            self.restore_behaviour(target, behaviour);
        }
    }

    fn take_behaviour(&mut self, id: EntityId) -> Option<Box<dyn Behaviour>> {
        self.entities.get_mut(&id)?.behaviour.take()
    }

    fn restore_behaviour(&mut self, id: EntityId, behaviour: Box<dyn Behaviour>) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.behaviour = Some(behaviour);
        }
    }
}

impl CollisionSource<EntityId> for World {
    fn hitbox(&self, key: EntityId) -> Option<Rectangle> {
        self.entities.get(&key).map(Entity::hitbox_rect)
    }

    fn is_collidable(&self, key: EntityId) -> bool {
        self.entities.get(&key).map_or(false, |e| e.collidable)
    }

    fn has_any_type(&self, key: EntityId, types: &[&str]) -> bool {
        self.entities.get(&key).map_or(false, |e| e.is_any_type(types))
    }
}
