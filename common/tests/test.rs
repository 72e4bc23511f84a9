use common::shapes::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_new_and_getters() {
    let rect = Rectangle::new(2.0, 3.0, 4.0, 6.0);
    assert_eq!(rect.width(), 4.0);
    assert_eq!(rect.height(), 6.0);
    assert_eq!(rect.left(), 2.0);
    assert_eq!(rect.right(), 6.0);
    assert_eq!(rect.top(), 3.0);
    assert_eq!(rect.bottom(), 9.0);
    assert_eq!(rect.center_x(), 4.0);
    assert_eq!(rect.center_y(), 6.0);
}

#[test]
fn test_contains_point_edges() {
    let rect = Rectangle::new(0.0, 0.0, 4.0, 6.0);
    assert!(rect.contains_point(0.0, 0.0));
    assert!(rect.contains_point(4.0, 6.0));
    assert!(rect.contains_point(2.0, 3.0));
    assert!(!rect.contains_point(4.1, 3.0));
    assert!(!rect.contains_point(2.0, -0.1));
}

#[test]
fn test_contains_rect() {
    let outer = Rectangle::new(0.0, 0.0, 100.0, 100.0);
    assert!(outer.contains_rect(&Rectangle::new(10.0, 10.0, 10.0, 10.0)));
    assert!(outer.contains_rect(&outer));
    assert!(outer.contains_rect(&Rectangle::new(90.0, 90.0, 10.0, 10.0)));
    assert!(!outer.contains_rect(&Rectangle::new(95.0, 10.0, 10.0, 10.0)));
    assert!(!outer.contains_rect(&Rectangle::new(-1.0, 10.0, 10.0, 10.0)));
}

#[test]
fn test_intersects_is_inclusive() {
    let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.intersects(&Rectangle::new(5.0, 5.0, 10.0, 10.0)));
    assert!(a.intersects(&Rectangle::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!a.intersects(&Rectangle::new(10.5, 0.0, 10.0, 10.0)));
    assert!(!a.intersects(&Rectangle::new(0.0, -20.0, 10.0, 10.0)));
}

#[test]
fn test_overlaps_is_strict() {
    let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.overlaps(&Rectangle::new(5.0, 5.0, 10.0, 10.0)));
    assert!(!a.overlaps(&Rectangle::new(10.0, 0.0, 10.0, 10.0)));
}

#[test]
fn test_quadrants_tile_parent() {
    let rect = Rectangle::new(0.0, 0.0, 1024.0, 512.0);
    let [nw, ne, sw, se] = rect.quadrants();
    assert_eq!(nw, Rectangle::new(0.0, 0.0, 512.0, 256.0));
    assert_eq!(ne, Rectangle::new(512.0, 0.0, 512.0, 256.0));
    assert_eq!(sw, Rectangle::new(0.0, 256.0, 512.0, 256.0));
    assert_eq!(se, Rectangle::new(512.0, 256.0, 512.0, 256.0));
}

#[test]
fn test_is_valid() {
    assert!(Rectangle::new(-5.0, 3.0, 0.0, 0.0).is_valid());
    assert!(!Rectangle::new(0.0, 0.0, -1.0, 1.0).is_valid());
    assert!(!Rectangle::new(f32::NAN, 0.0, 1.0, 1.0).is_valid());
    assert!(!Rectangle::new(0.0, 0.0, f32::INFINITY, 1.0).is_valid());
}

#[test]
fn test_translated() {
    let rect = Rectangle::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(rect.translated(10.0, -2.0), Rectangle::new(11.0, 0.0, 3.0, 4.0));
    assert_eq!(rect.at(0.0, 0.0), Rectangle::new(0.0, 0.0, 3.0, 4.0));
}

#[test]
fn test_get_random_rect_inside() {
    let rect = Rectangle::new(2.0, 3.0, 60.0, 80.0);

    // Use a fixed seed for reproducibility.
    let mut rng: StdRng = SeedableRng::seed_from_u64(123);

    for _ in 0..10 {
        let inner = rect.get_random_rect_inside(5.0, 7.0, &mut rng);
        assert!(rect.contains_rect(&inner));
    }
}

#[test]
fn test_get_random_rect_inside_small_rectangle() {
    let rect = Rectangle::new(2.0, 3.0, 2.0, 2.0);
    let mut rng: StdRng = SeedableRng::seed_from_u64(123);

    // Too large to fit: clamped to the top-left corner.
    let inner = rect.get_random_rect_inside(5.0, 5.0, &mut rng);
    assert_eq!((inner.x, inner.y), (rect.x, rect.y));
}
