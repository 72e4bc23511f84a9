use common::shapes::Rectangle;
use nalgebra::{Isometry2, Vector2};
use parry2d::query;
use parry2d::shape::Cuboid;

/// A rectangle as a parry cuboid centred on its position.
pub struct ShapeWithPosition {
    pub shape: Cuboid,
    pub position: Isometry2<f32>,
}

impl ShapeWithPosition {
    pub fn from_rect(rect: &Rectangle) -> Self {
        Self {
            shape: Cuboid::new(Vector2::new(rect.width / 2.0, rect.height / 2.0)),
            position: Isometry2::translation(rect.center_x(), rect.center_y()),
        }
    }
}

/// Strict hitbox overlap: hitboxes that only share an edge don't collide.
pub fn hitboxes_overlap(a: &Rectangle, b: &Rectangle) -> bool {
    a.overlaps(b)
}

/// How deep `a` sits inside `b`, or None if they don't overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Unit normal pointing from `a` towards `b`.
    pub normal: (f32, f32),
    pub depth: f32,
}

pub fn penetration(a: &Rectangle, b: &Rectangle) -> Option<Penetration> {
    if !hitboxes_overlap(a, b) {
        return None;
    }
    let a = ShapeWithPosition::from_rect(a);
    let b = ShapeWithPosition::from_rect(b);
    let contact = query::contact(&a.position, &a.shape, &b.position, &b.shape, 0.0).ok()??;
    if contact.dist >= 0.0 {
        return None;
    }
    Some(Penetration {
        normal: (contact.normal1.x, contact.normal1.y),
        depth: -contact.dist,
    })
}

/// Smallest translation that pushes `hitbox` out of one of `others`, picked
/// among the overlapping ones by magnitude.
pub fn min_translation(hitbox: &Rectangle, others: &[Rectangle]) -> Option<(f32, f32)> {
    others
        .iter()
        .filter_map(|other| penetration(hitbox, other))
        .map(|p| (-p.normal.0 * p.depth, -p.normal.1 * p.depth))
        .min_by(|a, b| {
            let a_mag = a.0 * a.0 + a.1 * a.1;
            let b_mag = b.0 * b.0 + b.1 * b.1;
            a_mag.partial_cmp(&b_mag).unwrap_or(std::cmp::Ordering::Equal)
        })
        .filter(|(x, y)| (x * x + y * y).sqrt() >= 1e-6)
}
