//! Hitbox collision queries on top of the quadtree.
//!
//! The index places entities by their bounds; candidates from a range query are
//! filtered by collidability and type tag, then tested hitbox against hitbox.
use common::shapes::Rectangle;
use quadtree::QuadTree;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::trace;

mod contact;

pub use contact::{
    hitboxes_overlap, min_translation, penetration, Penetration, ShapeWithPosition,
};

/// What the collision queries need to know about indexed entities.
///
/// Hitboxes are world-space and are expected to lie inside the entity's
/// indexed bounds; a hitbox poking outside them can be missed by the range query.
pub trait CollisionSource<K> {
    fn hitbox(&self, key: K) -> Option<Rectangle>;
    fn is_collidable(&self, key: K) -> bool;
    fn has_any_type(&self, key: K, types: &[&str]) -> bool;
}

/// First entity of any of `types` whose hitbox overlaps `hitbox`, which is the
/// subject's hitbox at the position being tested. The subject itself is skipped.
///
/// On a hit `on_collision` runs for both participants, `(subject, other)` then
/// `(other, subject)`.
pub fn collide<K, S, F>(
    index: &QuadTree<K>,
    source: &S,
    subject: K,
    hitbox: &Rectangle,
    types: &[&str],
    mut on_collision: F,
) -> Option<K>
where
    K: Copy + Eq + Hash + Debug,
    S: CollisionSource<K> + ?Sized,
    F: FnMut(K, K),
{
    if types.is_empty() {
        return None;
    }
    let other = index
        .query_rect(hitbox)
        .into_iter()
        .find(|other| is_hit(source, subject, hitbox, *other, Some(types)))?;
    trace!(?subject, ?other, "collision");
    on_collision(subject, other);
    on_collision(other, subject);
    Some(other)
}

/// Every entity of any of `types` whose hitbox overlaps `hitbox`, notifying
/// each pair once in both directions.
pub fn collide_all<K, S, F>(
    index: &QuadTree<K>,
    source: &S,
    subject: K,
    hitbox: &Rectangle,
    types: &[&str],
    mut on_collision: F,
) -> Vec<K>
where
    K: Copy + Eq + Hash + Debug,
    S: CollisionSource<K> + ?Sized,
    F: FnMut(K, K),
{
    let mut hits = Vec::new();
    if types.is_empty() {
        return hits;
    }
    index.query_rect_with(hitbox, |other| {
        if is_hit(source, subject, hitbox, other, Some(types)) {
            hits.push(other);
        }
    });
    for other in &hits {
        on_collision(subject, *other);
        on_collision(*other, subject);
    }
    if !hits.is_empty() {
        trace!(?subject, count = hits.len(), "collisions");
    }
    hits
}

/// Test the subject's hitbox against one specific entity, regardless of its types.
pub fn collide_with<K, S, F>(
    source: &S,
    subject: K,
    hitbox: &Rectangle,
    other: K,
    mut on_collision: F,
) -> bool
where
    K: Copy + Eq + Debug,
    S: CollisionSource<K> + ?Sized,
    F: FnMut(K, K),
{
    if !is_hit(source, subject, hitbox, other, None) {
        return false;
    }
    on_collision(subject, other);
    on_collision(other, subject);
    true
}

/// Whether the point lies inside the entity's hitbox. The right and bottom
/// edges are exclusive.
pub fn collide_point<K, S>(source: &S, key: K, x: f32, y: f32) -> bool
where
    S: CollisionSource<K> + ?Sized,
{
    source.hitbox(key).map_or(false, |hitbox| {
        x >= hitbox.left() && x < hitbox.right() && y >= hitbox.top() && y < hitbox.bottom()
    })
}

fn is_hit<K, S>(source: &S, subject: K, hitbox: &Rectangle, other: K, types: Option<&[&str]>) -> bool
where
    K: Copy + Eq,
    S: CollisionSource<K> + ?Sized,
{
    if other == subject || !source.is_collidable(other) {
        return false;
    }
    if let Some(types) = types {
        if !source.has_any_type(other, types) {
            return false;
        }
    }
    source
        .hitbox(other)
        .map_or(false, |other_hitbox| hitboxes_overlap(hitbox, &other_hitbox))
}
