use crate::entity::{Entity, EntityId};
use crate::world::World;
use common::shapes::Rectangle;
use quadtree::{QuadtreeError, QuadtreeResult};

/// Per-entity game logic. Every hook has an empty default.
#[allow(unused_variables)]
pub trait Behaviour {
    /// Runs once per tick for active entities, in index traversal order.
    fn update(&mut self, ctx: &mut Context<'_>) {}

    /// Called for each side of a collision reported by the `collide*`
    /// methods. Collisions detected from inside this hook are not reported again.
    fn collision_response(&mut self, ctx: &mut Context<'_>, other: EntityId) {}

    /// Runs when the entity is flushed into the index at the start of a tick.
    fn added_to_world(&mut self, ctx: &mut Context<'_>) {}

    /// Runs once the entity is out of the index, before it is dropped. Also runs
    /// for an entity removed before its add was flushed.
    fn removed_from_world(&mut self, ctx: &mut Context<'_>) {}

    /// Runs when the entity's bounds first stop being inside the world.
    fn left_world_boundaries(&mut self, ctx: &mut Context<'_>) {}
}

/// The world as seen from one entity's hook.
pub struct Context<'w> {
    pub(crate) world: &'w mut World,
    pub(crate) id: EntityId,
    pub(crate) delta: u32,
    pub(crate) respond: bool,
}

impl<'w> Context<'w> {
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Milliseconds passed since the previous tick.
    pub fn delta(&self) -> u32 {
        self.delta
    }

    pub fn world(&self) -> &World {
        &*self.world
    }

    /// The entity this hook runs for.
    pub fn entity(&self) -> Option<&Entity> {
        self.world.get(self.id)
    }

    pub fn entity_mut(&mut self) -> Option<&mut Entity> {
        self.world.get_mut(self.id)
    }

    pub fn bounds(&self) -> Option<Rectangle> {
        self.entity().map(Entity::bounds)
    }

    /// Move by `(dx, dy)` and re-settle the entity in the index immediately,
    /// so entities updated later this tick see the new position.
    pub fn move_by(&mut self, dx: f32, dy: f32) -> QuadtreeResult<()> {
        let bounds = self.bounds().ok_or(QuadtreeError::NotFound)?;
        self.world.set_position(self.id, bounds.x + dx, bounds.y + dy)
    }

    pub fn set_position(&mut self, x: f32, y: f32) -> QuadtreeResult<()> {
        self.world.set_position(self.id, x, y)
    }

    /// First collidable entity of any of `types` hit by this entity's hitbox
    /// placed at `(x, y)`.
    pub fn collide(&mut self, types: &[&str], x: f32, y: f32) -> Option<EntityId> {
        self.world.collide_inner(self.id, types, x, y, self.respond)
    }

    pub fn collide_all(&mut self, types: &[&str], x: f32, y: f32) -> Vec<EntityId> {
        self.world.collide_all_inner(self.id, types, x, y, self.respond)
    }

    pub fn collide_with(&mut self, other: EntityId, x: f32, y: f32) -> bool {
        self.world.collide_with_inner(self.id, other, x, y, self.respond)
    }

    /// Whether `(x, y)` lies inside this entity's hitbox.
    pub fn collide_point(&self, x: f32, y: f32) -> bool {
        collisions::collide_point(&*self.world, self.id, x, y)
    }

    pub fn entities_at(&self, x: f32, y: f32) -> Vec<EntityId> {
        self.world.entities_at(x, y)
    }

    pub fn entities_in(&self, rect: &Rectangle) -> Vec<EntityId> {
        self.world.entities_in(rect)
    }

    /// Queue an entity; it joins the index at the start of the next tick.
    pub fn add(&mut self, entity: Entity) -> EntityId {
        self.world.add(entity)
    }

    pub fn remove(&mut self, id: EntityId) -> bool {
        self.world.remove(id)
    }

    pub fn remove_self(&mut self) -> bool {
        self.world.remove(self.id)
    }
}
