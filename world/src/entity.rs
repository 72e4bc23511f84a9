use crate::behaviour::Behaviour;
use common::shapes::Rectangle;
use smallvec::SmallVec;
use std::fmt;

/// Handle of an entity in a [`World`](crate::World).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32);

impl EntityId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Collision rectangle relative to the entity's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hitbox {
    pub x_offset: f32,
    pub y_offset: f32,
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    pub fn new(x_offset: f32, y_offset: f32, width: f32, height: f32) -> Self {
        Self {
            x_offset,
            y_offset,
            width,
            height,
        }
    }

    /// World-space hitbox for an entity whose top-left corner is at `(x, y)`.
    pub fn at(&self, x: f32, y: f32) -> Rectangle {
        Rectangle::new(x + self.x_offset, y + self.y_offset, self.width, self.height)
    }
}

pub struct Entity {
    pub name: Option<String>,
    bounds: Rectangle,
    pub hitbox: Hitbox,
    types: SmallVec<[String; 4]>,
    /// Other entities only collide with this one while set.
    pub collidable: bool,
    /// Inactive entities skip `update` but are still boundary-checked.
    pub active: bool,
    pub depth: i32,
    pub wrap_horizontal: bool,
    pub wrap_vertical: bool,
    pub(crate) left_world: bool,
    pub(crate) behaviour: Option<Box<dyn Behaviour>>,
}

impl Entity {
    /// Entity at `(x, y)` whose hitbox covers its whole bounds.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            name: None,
            bounds: Rectangle::new(x, y, width, height),
            hitbox: Hitbox::new(0.0, 0.0, width, height),
            types: SmallVec::new(),
            collidable: true,
            active: true,
            depth: 0,
            wrap_horizontal: false,
            wrap_vertical: false,
            left_world: false,
            behaviour: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_type(mut self, tag: impl Into<String>) -> Self {
        self.add_type(tag);
        self
    }

    pub fn with_hitbox(mut self, hitbox: Hitbox) -> Self {
        self.hitbox = hitbox;
        self.collidable = true;
        self
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_wrap(mut self, horizontal: bool, vertical: bool) -> Self {
        self.wrap_horizontal = horizontal;
        self.wrap_vertical = vertical;
        self
    }

    pub fn with_behaviour(mut self, behaviour: impl Behaviour + 'static) -> Self {
        self.behaviour = Some(Box::new(behaviour));
        self
    }

    /// Bounds used by the spatial index. Positions change through the world
    /// so the index stays in sync.
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub(crate) fn set_bounds(&mut self, bounds: Rectangle) {
        self.bounds = bounds;
    }

    pub fn x(&self) -> f32 {
        self.bounds.x
    }

    pub fn y(&self) -> f32 {
        self.bounds.y
    }

    pub fn hitbox_rect(&self) -> Rectangle {
        self.hitbox.at(self.bounds.x, self.bounds.y)
    }

    /// Returns false if the tag was already present.
    pub fn add_type(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.is_type(&tag) {
            return false;
        }
        self.types.push(tag);
        true
    }

    pub fn remove_type(&mut self, tag: &str) {
        self.types.retain(|t| t != tag);
    }

    pub fn clear_types(&mut self) {
        self.types.clear();
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn is_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }

    pub fn is_any_type(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.is_type(tag))
    }

    pub fn has_left_world(&self) -> bool {
        self.left_world
    }

    pub(crate) fn name_matches(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .map_or(false, |own| own.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name: {}, types: [{}], depth: {}, x: {}, y: {}, width: {}, height: {}",
            self.name.as_deref().unwrap_or("-"),
            self.types.join(", "),
            self.depth,
            self.bounds.x,
            self.bounds.y,
            self.bounds.width,
            self.bounds.height
        )
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("bounds", &self.bounds)
            .field("hitbox", &self.hitbox)
            .field("types", &self.types)
            .field("collidable", &self.collidable)
            .field("active", &self.active)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}
