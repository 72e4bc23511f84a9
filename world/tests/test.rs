use common::shapes::Rectangle;
use std::cell::RefCell;
use std::rc::Rc;
use world::{Behaviour, Context, Entity, EntityId, Hitbox, World, WorldConfig};

type Log = Rc<RefCell<Vec<String>>>;
type UpdateFn = Box<dyn FnMut(&mut Context<'_>, &Log)>;

// Records every hook it sees, optionally running a script on update.
struct Recorder {
    label: &'static str,
    log: Log,
    on_update: Option<UpdateFn>,
}

impl Recorder {
    fn new(label: &'static str, log: &Log) -> Self {
        Self {
            label,
            log: log.clone(),
            on_update: None,
        }
    }

    fn on_update<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Context<'_>, &Log) + 'static,
    {
        self.on_update = Some(Box::new(f));
        self
    }

    fn push(&self, event: String) {
        self.log.borrow_mut().push(event);
    }
}

impl Behaviour for Recorder {
    fn update(&mut self, ctx: &mut Context<'_>) {
        self.push(format!("{} update", self.label));
        if let Some(f) = self.on_update.as_mut() {
            f(ctx, &self.log);
        }
    }

    fn collision_response(&mut self, ctx: &mut Context<'_>, other: EntityId) {
        let other = ctx
            .world()
            .get(other)
            .and_then(|e| e.name.clone())
            .unwrap_or_default();
        self.push(format!("{} hit {}", self.label, other));
    }

    fn added_to_world(&mut self, _ctx: &mut Context<'_>) {
        self.push(format!("{} added", self.label));
    }

    fn removed_from_world(&mut self, _ctx: &mut Context<'_>) {
        self.push(format!("{} removed", self.label));
    }

    fn left_world_boundaries(&mut self, _ctx: &mut Context<'_>) {
        self.push(format!("{} left", self.label));
    }
}

fn world(width: f32, height: f32) -> World {
    World::new(WorldConfig::new(width, height)).unwrap()
}

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn events(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

fn named(label: &'static str, x: f32, y: f32, log: &Log) -> Entity {
    Entity::new(x, y, 10.0, 10.0)
        .with_name(label)
        .with_behaviour(Recorder::new(label, log))
}

#[test]
fn test_add_is_deferred_until_tick() {
    let log = new_log();
    let mut w = world(100.0, 100.0);
    let id = w.add(named("a", 10.0, 10.0, &log));

    assert_eq!(w.count(), 0);
    assert!(w.entities_at(15.0, 15.0).is_empty());
    assert!(w.is_pending(id));
    assert_eq!(w.find("a"), Some(id));

    w.tick(16);
    assert_eq!(w.count(), 1);
    assert!(!w.is_pending(id));
    assert_eq!(w.entities_at(15.0, 15.0), vec![id]);
    assert_eq!(events(&log), vec!["a added", "a update"]);
}

#[test]
fn test_add_outside_world_is_dropped() {
    let mut w = world(100.0, 100.0);
    let id = w.add(Entity::new(200.0, 200.0, 10.0, 10.0));
    w.tick(16);
    assert_eq!(w.count(), 0);
    assert!(w.get(id).is_none());
}

#[test]
fn test_remove_is_deferred_until_end_of_tick() {
    let log = new_log();
    let mut w = world(100.0, 100.0);
    let a = Entity::new(10.0, 10.0, 10.0, 10.0)
        .with_name("a")
        .with_behaviour(Recorder::new("a", &log).on_update(|ctx, log| {
            let b = ctx.world().find("b").unwrap();
            assert!(ctx.remove(b));
            assert!(!ctx.remove(b));
            let seen = ctx.entities_at(55.0, 55.0).len();
            log.borrow_mut().push(format!("b visible {seen}"));
        }));
    w.add(a);
    w.add(named("b", 50.0, 50.0, &log));

    w.tick(16);
    assert_eq!(
        events(&log),
        vec!["a added", "b added", "a update", "b visible 1", "b update", "b removed"]
    );
    assert_eq!(w.count(), 1);
    assert_eq!(w.find("b"), None);
    assert!(w.entities_at(55.0, 55.0).is_empty());
}

#[test]
fn test_remove_unknown_or_twice() {
    let mut w = world(100.0, 100.0);
    let id = w.add(Entity::new(10.0, 10.0, 10.0, 10.0));
    w.tick(16);
    assert!(w.remove(id));
    assert!(!w.remove(id));
    w.tick(16);
    assert!(!w.remove(id));
    assert_eq!(w.count(), 0);
}

#[test]
fn test_later_entities_see_earlier_moves() {
    // Both stay in the root node, so they update in insertion order.
    let log = new_log();
    let mut w = world(1000.0, 1000.0);
    let mover = Entity::new(10.0, 10.0, 10.0, 10.0).with_behaviour(
        Recorder::new("mover", &log).on_update(|ctx, _| {
            ctx.set_position(500.0, 500.0).unwrap();
        }),
    );
    let watcher = Entity::new(900.0, 900.0, 10.0, 10.0).with_behaviour(
        Recorder::new("watcher", &log).on_update(|ctx, log| {
            let seen = ctx.entities_at(505.0, 505.0).len();
            log.borrow_mut().push(format!("seen {seen}"));
        }),
    );
    w.add(mover);
    w.add(watcher);
    w.tick(16);
    assert_eq!(
        events(&log),
        vec!["mover added", "watcher added", "mover update", "watcher update", "seen 1"]
    );
}

#[test]
fn test_earlier_entities_miss_later_moves() {
    let log = new_log();
    let mut w = world(1000.0, 1000.0);
    let watcher = Entity::new(900.0, 900.0, 10.0, 10.0).with_behaviour(
        Recorder::new("watcher", &log).on_update(|ctx, log| {
            let seen = ctx.entities_at(505.0, 505.0).len();
            log.borrow_mut().push(format!("seen {seen}"));
        }),
    );
    let mover = Entity::new(10.0, 10.0, 10.0, 10.0).with_behaviour(
        Recorder::new("mover", &log).on_update(|ctx, _| {
            ctx.set_position(500.0, 500.0).unwrap();
        }),
    );
    w.add(watcher);
    w.add(mover);
    w.tick(16);
    assert!(events(&log).contains(&"seen 0".to_string()));
    w.tick(16);
    assert!(events(&log).contains(&"seen 1".to_string()));
}

#[test]
fn test_added_during_tick_joins_next_tick() {
    let log = new_log();
    let mut w = world(100.0, 100.0);
    let mut spawned = false;
    let spawner = Entity::new(10.0, 10.0, 10.0, 10.0).with_behaviour(
        Recorder::new("spawner", &log).on_update(move |ctx, log| {
            if spawned {
                return;
            }
            spawned = true;
            let child = ctx.add(
                Entity::new(60.0, 60.0, 10.0, 10.0)
                    .with_name("child")
                    .with_behaviour(Recorder::new("child", log)),
            );
            assert!(ctx.world().is_pending(child));
            let seen = ctx.entities_at(65.0, 65.0).len();
            log.borrow_mut().push(format!("child visible {seen}"));
        }),
    );
    w.add(spawner);

    w.tick(16);
    assert_eq!(w.count(), 1);
    assert!(w.find("CHILD").is_some());
    assert_eq!(
        events(&log),
        vec!["spawner added", "spawner update", "child visible 0"]
    );

    w.tick(16);
    assert_eq!(w.count(), 2);
    assert_eq!(
        &events(&log)[3..],
        &["child added", "spawner update", "child update"]
    );
}

#[test]
fn test_removing_pending_add_still_notifies() {
    let log = new_log();
    let mut w = world(100.0, 100.0);
    let mut spawned = false;
    let spawner = Entity::new(10.0, 10.0, 10.0, 10.0).with_behaviour(
        Recorder::new("spawner", &log).on_update(move |ctx, log| {
            if spawned {
                return;
            }
            spawned = true;
            let child = ctx.add(
                Entity::new(60.0, 60.0, 10.0, 10.0)
                    .with_name("child")
                    .with_behaviour(Recorder::new("child", log)),
            );
            assert!(ctx.remove(child));
        }),
    );
    w.add(spawner);

    w.tick(16);
    assert_eq!(
        events(&log),
        vec!["spawner added", "spawner update", "child removed"]
    );
    assert_eq!(w.find("child"), None);
    assert_eq!(w.count(), 1);

    w.tick(16);
    assert!(!events(&log).iter().any(|e| e == "child added"));
    assert_eq!(w.count(), 1);
}

#[test]
fn test_collision_notifies_both_sides() {
    let log = new_log();
    let mut w = world(100.0, 100.0);
    let player = Entity::new(10.0, 10.0, 10.0, 10.0)
        .with_name("player")
        .with_behaviour(Recorder::new("player", &log).on_update(|ctx, log| {
            let hit = ctx.collide(&["wall"], 25.0, 10.0);
            assert!(hit.is_some());
            assert!(ctx.collide(&["enemy"], 25.0, 10.0).is_none());
            assert!(ctx.collide_point(15.0, 15.0));
            log.borrow_mut().push("checked".to_string());
        }));
    let wall = Entity::new(30.0, 10.0, 10.0, 10.0)
        .with_name("wall")
        .with_type("wall")
        .with_behaviour(Recorder::new("wall", &log));
    w.add(player);
    w.add(wall);

    w.tick(16);
    assert_eq!(
        events(&log),
        vec![
            "player added",
            "wall added",
            "player update",
            "checked",
            "player hit wall",
            "wall hit player",
            "wall update"
        ]
    );
}

#[test]
fn test_hitbox_offset_and_collidable_flag() {
    let mut w = world(100.0, 100.0);
    let seeker = w.add(
        Entity::new(0.0, 0.0, 10.0, 10.0).with_hitbox(Hitbox::new(2.0, 2.0, 6.0, 6.0)),
    );
    let target = w.add(Entity::new(9.0, 0.0, 10.0, 10.0).with_type("crate"));
    w.tick(16);

    // Bounds overlap at x 9..10, the seeker's hitbox ends at 8.
    assert_eq!(w.collide(seeker, &["crate"], 0.0, 0.0), None);
    assert_eq!(w.collide(seeker, &["crate"], 3.0, 0.0), Some(target));
    assert!(w.collide_with(seeker, target, 3.0, 0.0));

    w.get_mut(target).unwrap().collidable = false;
    assert_eq!(w.collide(seeker, &["crate"], 3.0, 0.0), None);
    assert!(w.collide_all(seeker, &["crate"], 3.0, 0.0).is_empty());
}

#[test]
fn test_leaving_world_notifies_once_without_wrap() {
    let log = new_log();
    let mut w = world(100.0, 100.0);
    let id = w.add(
        Entity::new(5.0, 50.0, 10.0, 10.0).with_behaviour(
            Recorder::new("e", &log).on_update(|ctx, _| {
                assert!(ctx.move_by(-20.0, 0.0).is_err());
            }),
        ),
    );
    w.tick(16);
    w.tick(16);
    w.tick(16);

    let lefts = events(&log).iter().filter(|e| *e == "e left").count();
    assert_eq!(lefts, 1);
    let entity = w.get(id).unwrap();
    assert!(entity.has_left_world());
    assert_eq!(entity.x(), -55.0);
    // The index follows the entity outside the world.
    assert_eq!(
        w.index().bounds(&id),
        Some(Rectangle::new(-55.0, 50.0, 10.0, 10.0))
    );
    assert!(w.index().is_escaped(&id));
    assert_eq!(w.entities_at(-50.0, 55.0), vec![id]);
    assert!(w.entities_at(10.0, 55.0).is_empty());
}

#[test]
fn test_entity_past_world_edge_is_still_found() {
    let mut w = world(1024.0, 1024.0);
    let a = w.add(Entity::new(10.0, 10.0, 10.0, 10.0).with_name("a"));
    let b = w.add(
        Entity::new(1000.0, 100.0, 20.0, 20.0)
            .with_name("b")
            .with_type("wall"),
    );
    w.tick(16);

    assert!(w.set_position(b, 1010.0, 100.0).is_err());
    assert_eq!(w.get(b).unwrap().x(), 1010.0);
    assert_eq!(w.index().bounds(&b), Some(Rectangle::new(1010.0, 100.0, 20.0, 20.0)));

    // a's hitbox at 1021..1031 overlaps b's real hitbox 1010..1030.
    assert_eq!(w.collide(a, &["wall"], 1021.0, 105.0), Some(b));
    assert_eq!(w.entities_at(1025.0, 110.0), vec![b]);
    assert!(w.entities_at(1005.0, 110.0).is_empty());
    assert_eq!(
        w.entities_in(&Rectangle::new(1022.0, 0.0, 10.0, 200.0)),
        vec![b]
    );

    // Back inside, it is indexed normally again.
    w.set_position(b, 900.0, 100.0).unwrap();
    assert!(!w.index().is_escaped(&b));
    assert_eq!(w.entities_at(910.0, 110.0), vec![b]);
    assert!(w.entities_at(1025.0, 110.0).is_empty());
}

#[test]
fn test_wrap_horizontal() {
    let log = new_log();
    let mut w = world(100.0, 100.0);
    let id = w.add(
        Entity::new(5.0, 50.0, 10.0, 10.0)
            .with_wrap(true, false)
            .with_behaviour(Recorder::new("e", &log).on_update(|ctx, _| {
                let _ = ctx.move_by(-20.0, 0.0);
            })),
    );
    w.tick(16);
    assert_eq!(events(&log), vec!["e added", "e update", "e left"]);
    assert_eq!(w.get(id).unwrap().x(), 90.0);
    assert_eq!(w.entities_at(95.0, 55.0), vec![id]);

    w.tick(16);
    let entity = w.get(id).unwrap();
    assert_eq!(entity.x(), 70.0);
    assert!(!entity.has_left_world());
}

#[test]
fn test_clear() {
    let log = new_log();
    let mut w = world(100.0, 100.0);
    w.add(named("a", 10.0, 10.0, &log));
    w.add(named("b", 50.0, 50.0, &log));
    w.tick(16);
    let pending = w.add(named("c", 70.0, 70.0, &log));

    w.clear();
    assert_eq!(w.count(), 0);
    assert!(w.get(pending).is_none());
    let events = events(&log);
    assert!(events.contains(&"a removed".to_string()));
    assert!(events.contains(&"b removed".to_string()));
    assert!(!events.iter().any(|e| e.starts_with('c')));
}

#[test]
fn test_resize() {
    let log = new_log();
    let mut w = world(200.0, 200.0);
    let a = w.add(named("a", 10.0, 10.0, &log));
    let b = w.add(named("b", 150.0, 150.0, &log));
    w.tick(16);

    assert!(w.resize(0.0, 100.0).is_err());
    assert_eq!(w.width(), 200.0);
    assert_eq!(w.count(), 2);

    assert_eq!(w.resize(100.0, 100.0).unwrap(), vec![b]);
    assert_eq!(w.width(), 100.0);
    assert_eq!(w.entities(), vec![a]);
    assert!(w.get(b).is_none());
    assert!(events(&log).contains(&"b removed".to_string()));
}

#[test]
fn test_queries() {
    let mut w = world(100.0, 100.0);
    let rock1 = w.add(
        Entity::new(10.0, 10.0, 10.0, 10.0)
            .with_name("Rock")
            .with_type("rock")
            .with_depth(2),
    );
    let tree = w.add(
        Entity::new(12.0, 12.0, 4.0, 4.0)
            .with_type("tree")
            .with_depth(1),
    );
    let rock2 = w.add(
        Entity::new(50.0, 50.0, 10.0, 10.0)
            .with_type("rock")
            .with_depth(1),
    );
    w.tick(16);

    assert_eq!(w.count(), 3);
    assert_eq!(w.count_of_type("rock"), 2);
    assert_eq!(w.entities_of_type("tree"), vec![tree]);
    assert_eq!(w.find("rOcK"), Some(rock1));
    assert_eq!(w.find("missing"), None);

    assert!(!w.is_empty_at(15.0, 15.0, 1));
    assert!(!w.is_empty_at(11.0, 11.0, 2));
    assert!(w.is_empty_at(11.0, 11.0, 1));
    assert!(w.is_empty_at(80.0, 80.0, 1));

    assert_eq!(w.entity_at(55.0, 55.0), Some(rock2));
    assert_eq!(w.entity_at(90.0, 90.0), None);

    let mut in_rect = w.entities_in(&Rectangle::new(0.0, 0.0, 30.0, 30.0));
    in_rect.sort();
    assert_eq!(in_rect, vec![rock1, tree]);

    let visible = w.visible(&Rectangle::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(visible.len(), 3);
    assert_eq!(*visible.last().unwrap(), rock1);

    assert!(w.contains(&Rectangle::new(0.0, 0.0, 100.0, 100.0)));
    assert!(!w.contains(&Rectangle::new(95.0, 95.0, 10.0, 10.0)));
}
