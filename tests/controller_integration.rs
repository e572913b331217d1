//! Built-in controllers and widgets running inside the engine frame.

use std::sync::Arc;

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec2;

use strata::components::bounds::{Bounds, Rect};
use strata::components::camera::{Camera, EdgeScroll, FitWindow};
use strata::components::clickable::Clickable;
use strata::components::fadeout::MoveFadeRemove;
use strata::components::layer::{Layer, YSortLayer};
use strata::components::node::SceneNode;
use strata::components::sprite::{Label, Sprite};
use strata::components::tint::{Color, Tint};
use strata::components::waypoints::{Direction, WaypointFollower};
use strata::components::widgets::PagedPanel;
use strata::engine::Engine;
use strata::error::SceneError;
use strata::events::audio::AudioCmd;
use strata::events::pointer::{
    CheckboxToggled, DoubleClicked, LeftClicked, MouseExited, PageChanged,
};
use strata::events::waypoints::{DestinationReached, DirectionChanged, WaypointArrived};
use strata::resources::audio::AudioBridge;
use strata::resources::engineconfig::EngineConfig;
use strata::resources::input::{InputSnapshot, Key};
use strata::resources::theme::Theme;
use strata::systems::render::DrawList;
use strata::systems::scene::{
    add_child, children_of, parent_of, remove, set_position, spawn_camera, spawn_entity,
};
use strata::systems::widgets::{
    attach_paged_panel, next_page, prev_page, show_page, spawn_button, spawn_checkbox,
};
use strata::systems::ysort::refresh_y_sort;

#[derive(Resource, Default)]
struct Seen(Vec<String>);

fn make_engine() -> Engine {
    let mut engine = Engine::new(EngineConfig::new());
    engine.world_mut().init_resource::<Seen>();
    engine
}

fn attach(engine: &mut Engine, entity: Entity) {
    let screen = engine.screen();
    add_child(engine.world_mut(), screen, entity).unwrap();
}

fn seen(engine: &Engine) -> Vec<String> {
    engine.world().resource::<Seen>().0.clone()
}

fn frame(engine: &mut Engine, dt: f32, input: InputSnapshot) {
    engine.update(dt, &input);
}

fn theme() -> Arc<Theme> {
    Arc::new(Theme {
        click_sound: Some("click".into()),
        ..Theme::default()
    })
}

#[test]
fn waypoint_follower_reports_direction_arrivals_and_destination() {
    let mut engine = make_engine();
    let walker = spawn_entity(engine.world_mut(), Rect::new(0.0, 0.0, 4.0, 4.0), 0.0);
    let mut follower = WaypointFollower::new(10.0);
    follower.set_waypoints(
        Vec2::ZERO,
        [Vec2::new(5.0, 0.0), Vec2::new(5.0, 5.0), Vec2::new(20.0, 5.0)],
    );
    engine.world_mut().entity_mut(walker).insert(follower);
    attach(&mut engine, walker);

    let world = engine.world_mut();
    world.add_observer(|t: On<DirectionChanged>, mut seen: ResMut<Seen>| {
        seen.0.push(format!("dir {:?}", t.event().direction));
    });
    world.add_observer(|t: On<WaypointArrived>, mut seen: ResMut<Seen>| {
        let p = t.event().waypoint;
        seen.0.push(format!("at {},{}", p.x, p.y));
    });
    world.add_observer(|_: On<DestinationReached>, mut seen: ResMut<Seen>| {
        seen.0.push("done".into());
    });
    world.flush();

    frame(&mut engine, 1.0, InputSnapshot::default());
    assert_eq!(seen(&engine), vec!["dir Down", "at 5,0", "at 5,5"]);
    frame(&mut engine, 1.0, InputSnapshot::default());
    assert_eq!(
        engine.world().get::<Bounds>(walker).unwrap().position(),
        Vec2::new(15.0, 5.0)
    );
    frame(&mut engine, 1.0, InputSnapshot::default());
    assert_eq!(
        seen(&engine),
        vec!["dir Down", "at 5,0", "at 5,5", "dir Right", "at 20,5", "done"]
    );
    let follower = engine.world().get::<WaypointFollower>(walker).unwrap();
    assert!(follower.reached_destination());
    assert_eq!(follower.next_waypoint(), Err(SceneError::NoWaypoints));
    assert_eq!(follower.direction(), Some(Direction::Right));
}

#[test]
fn inactive_nodes_do_not_run_controllers() {
    let mut engine = make_engine();
    let walker = spawn_entity(engine.world_mut(), Rect::default(), 0.0);
    let mut follower = WaypointFollower::new(10.0);
    follower.set_waypoints(Vec2::ZERO, [Vec2::new(100.0, 0.0)]);
    engine
        .world_mut()
        .entity_mut(walker)
        .insert((follower, SceneNode::inactive()));
    attach(&mut engine, walker);

    frame(&mut engine, 1.0, InputSnapshot::default());
    assert_eq!(
        engine.world().get::<Bounds>(walker).unwrap().position(),
        Vec2::ZERO
    );
}

#[test]
fn camera_scrolls_at_edges_and_with_keys_within_bounds() {
    let mut engine = make_engine();
    let camera = spawn_camera(
        engine.world_mut(),
        Rect::new(0.0, 0.0, 400.0, 300.0),
        Rect::new(0.0, 0.0, 1000.0, 1000.0),
        0.0,
    );
    engine
        .world_mut()
        .entity_mut(camera)
        .insert(EdgeScroll::new(10.0, 100.0));
    attach(&mut engine, camera);
    let view = |engine: &Engine| engine.world().get::<Camera>(camera).unwrap().view;

    frame(&mut engine, 0.5, InputSnapshot::at(395.0, 150.0));
    assert_eq!(view(&engine).position(), Vec2::new(50.0, 0.0));

    frame(&mut engine, 0.5, InputSnapshot::at(2.0, 150.0));
    frame(&mut engine, 0.5, InputSnapshot::at(2.0, 150.0));
    assert_eq!(view(&engine).position(), Vec2::ZERO);

    frame(&mut engine, 0.5, InputSnapshot::at(200.0, 150.0).with_key(Key::Down));
    assert_eq!(view(&engine).position(), Vec2::new(0.0, 50.0));

    for _ in 0..40 {
        frame(&mut engine, 0.5, InputSnapshot::at(395.0, 295.0));
    }
    assert_eq!(view(&engine).position(), Vec2::new(600.0, 700.0));
}

#[test]
fn window_resize_refits_screen_and_cameras() {
    let mut engine = make_engine();
    let fitted = spawn_camera(
        engine.world_mut(),
        Rect::new(0.0, 0.0, 1280.0, 720.0),
        Rect::new(0.0, 0.0, 4000.0, 4000.0),
        0.0,
    );
    let fixed = spawn_camera(
        engine.world_mut(),
        Rect::new(0.0, 0.0, 200.0, 100.0),
        Rect::new(0.0, 0.0, 4000.0, 4000.0),
        0.0,
    );
    engine.world_mut().entity_mut(fitted).insert(FitWindow);
    attach(&mut engine, fitted);
    attach(&mut engine, fixed);

    engine.resize(800, 600);
    let world = engine.world();
    assert_eq!(world.get::<Camera>(fitted).unwrap().view.size(), Vec2::new(800.0, 600.0));
    assert_eq!(world.get::<Bounds>(fitted).unwrap().0, Rect::new(0.0, 0.0, 800.0, 600.0));
    assert_eq!(world.get::<Camera>(fixed).unwrap().view.size(), Vec2::new(200.0, 100.0));
    assert_eq!(
        world.get::<Bounds>(engine.screen()).unwrap().0,
        Rect::new(0.0, 0.0, 800.0, 600.0)
    );
}

#[test]
fn fade_controller_moves_fades_and_disposes() {
    let mut engine = make_engine();
    let toast = spawn_entity(engine.world_mut(), Rect::new(0.0, 0.0, 10.0, 10.0), 0.0);
    engine
        .world_mut()
        .entity_mut(toast)
        .insert(MoveFadeRemove::new(Direction::Right, 10.0, 1.0));
    attach(&mut engine, toast);

    frame(&mut engine, 0.25, InputSnapshot::default());
    frame(&mut engine, 0.25, InputSnapshot::default());
    let world = engine.world();
    assert_eq!(world.get::<Bounds>(toast).unwrap().position(), Vec2::new(5.0, 0.0));
    assert_eq!(world.get::<Tint>(toast).unwrap().alpha, 0.5);

    frame(&mut engine, 0.25, InputSnapshot::default());
    frame(&mut engine, 0.25, InputSnapshot::default());
    assert!(engine.world().get_entity(toast).is_err());
    assert!(children_of(engine.world(), engine.screen()).is_empty());
}

#[test]
fn fade_controller_can_keep_the_entity_alive() {
    let mut engine = make_engine();
    let toast = spawn_entity(engine.world_mut(), Rect::default(), 0.0);
    engine
        .world_mut()
        .entity_mut(toast)
        .insert(MoveFadeRemove::new(Direction::Up, 8.0, 0.5).keep_alive());
    attach(&mut engine, toast);

    for _ in 0..4 {
        frame(&mut engine, 0.25, InputSnapshot::default());
    }
    let world = engine.world();
    assert!(world.get_entity(toast).is_ok());
    assert_eq!(parent_of(world, toast), None);
    assert_eq!(world.get::<Bounds>(toast).unwrap().position(), Vec2::new(0.0, -4.0));
    assert_eq!(world.get::<Tint>(toast).unwrap().alpha, 0.0);
}

#[test]
fn y_sorted_entities_lower_on_screen_draw_first() {
    let mut engine = make_engine();
    let upper = spawn_entity(engine.world_mut(), Rect::new(0.0, 0.0, 8.0, 8.0), 0.0);
    let lower = spawn_entity(engine.world_mut(), Rect::new(0.0, 100.0, 8.0, 8.0), 0.0);
    for e in [upper, lower] {
        engine
            .world_mut()
            .entity_mut(e)
            .insert((Sprite::solid(Color::WHITE), YSortLayer::default()));
        attach(&mut engine, e);
    }
    refresh_y_sort(engine.world_mut());

    let mut draws = DrawList::new();
    engine.render(&mut draws);
    assert_eq!(draws.drawn_entities(), vec![lower, upper]);

    set_position(engine.world_mut(), upper, Vec2::new(0.0, 200.0)).unwrap();
    let layer = engine.world().get::<Layer>(upper).unwrap().0;
    assert!((layer + 0.2).abs() < 1e-6);
    draws.clear();
    engine.render(&mut draws);
    assert_eq!(draws.drawn_entities(), vec![upper, lower]);
}

#[test]
fn button_recolours_and_plays_its_click_sound() {
    let mut engine = make_engine();
    let (bridge, rx) = AudioBridge::channel();
    engine.world_mut().insert_resource(bridge);
    let theme = theme();
    let button = spawn_button(
        engine.world_mut(),
        Rect::new(10.0, 10.0, 100.0, 30.0),
        0.0,
        "OK",
        theme.clone(),
    );
    attach(&mut engine, button);
    let face = |engine: &Engine| engine.world().get::<Sprite>(button).unwrap().color;

    frame(&mut engine, 0.1, InputSnapshot::at(500.0, 500.0));
    assert_eq!(face(&engine), theme.idle);
    frame(&mut engine, 0.1, InputSnapshot::at(50.0, 20.0));
    assert_eq!(face(&engine), theme.hover);
    frame(&mut engine, 0.1, InputSnapshot::at(50.0, 20.0).with_left(true));
    assert_eq!(face(&engine), theme.pressed);
    assert!(rx.try_recv().is_err());
    frame(&mut engine, 0.1, InputSnapshot::at(50.0, 20.0));
    assert_eq!(face(&engine), theme.hover);
    assert_eq!(
        rx.try_recv(),
        Ok(AudioCmd::Play {
            id: "click".into()
        })
    );
    assert_eq!(
        engine.world().get::<Label>(button).unwrap().text,
        "OK".to_string()
    );
}

#[test]
fn only_the_foreground_widget_receives_the_click() {
    let mut engine = make_engine();
    let back = spawn_button(engine.world_mut(), Rect::new(0.0, 0.0, 50.0, 50.0), 2.0, "back", theme());
    let front = spawn_button(engine.world_mut(), Rect::new(0.0, 0.0, 50.0, 50.0), 1.0, "front", theme());
    attach(&mut engine, back);
    attach(&mut engine, front);
    engine
        .world_mut()
        .add_observer(|t: On<LeftClicked>, mut seen: ResMut<Seen>| {
            seen.0.push(format!("{:?}", t.event().entity));
        });
    engine.world_mut().flush();

    frame(&mut engine, 0.1, InputSnapshot::at(20.0, 20.0).with_left(true));
    frame(&mut engine, 0.1, InputSnapshot::at(20.0, 20.0));
    assert_eq!(seen(&engine), vec![format!("{:?}", front)]);
}

#[test]
fn quick_second_click_is_a_double_click() {
    let mut engine = make_engine();
    let button = spawn_button(engine.world_mut(), Rect::new(0.0, 0.0, 50.0, 50.0), 0.0, "b", theme());
    attach(&mut engine, button);
    engine
        .world_mut()
        .add_observer(|t: On<DoubleClicked>, mut seen: ResMut<Seen>| {
            seen.0.push(format!("double {:?}", t.event().entity));
        });
    engine.world_mut().flush();

    let at = || InputSnapshot::at(10.0, 10.0);
    for down in [true, false, true, false] {
        frame(&mut engine, 0.125, at().with_left(down));
    }
    assert_eq!(seen(&engine), vec![format!("double {:?}", button)]);

    // Far apart in time: no double click.
    frame(&mut engine, 0.125, at().with_left(true));
    frame(&mut engine, 0.125, at());
    frame(&mut engine, 1.0, at());
    frame(&mut engine, 0.125, at().with_left(true));
    frame(&mut engine, 0.125, at());
    assert_eq!(seen(&engine).len(), 1);
}

#[test]
fn checkbox_toggles_its_caption_and_notifies() {
    let mut engine = make_engine();
    let checkbox = spawn_checkbox(
        engine.world_mut(),
        Rect::new(0.0, 0.0, 120.0, 20.0),
        0.0,
        "Sound",
        false,
        theme(),
    );
    attach(&mut engine, checkbox);
    engine
        .world_mut()
        .add_observer(|t: On<CheckboxToggled>, mut seen: ResMut<Seen>| {
            seen.0.push(format!("checked {}", t.event().checked));
        });
    engine.world_mut().flush();
    let caption = |engine: &Engine| engine.world().get::<Label>(checkbox).unwrap().text.clone();
    assert_eq!(caption(&engine), "[ ] Sound");

    frame(&mut engine, 0.1, InputSnapshot::at(5.0, 5.0).with_left(true));
    frame(&mut engine, 0.1, InputSnapshot::at(5.0, 5.0));
    assert_eq!(caption(&engine), "[x] Sound");

    frame(&mut engine, 1.0, InputSnapshot::at(5.0, 5.0).with_left(true));
    frame(&mut engine, 0.1, InputSnapshot::at(5.0, 5.0));
    assert_eq!(caption(&engine), "[ ] Sound");
    assert_eq!(seen(&engine), vec!["checked true", "checked false"]);
}

#[test]
fn paged_panel_shows_one_page_at_a_time() {
    let mut engine = make_engine();
    let world = engine.world_mut();
    let panel = spawn_entity(world, Rect::new(0.0, 0.0, 200.0, 200.0), 0.0);
    let a = spawn_entity(world, Rect::default(), 0.0);
    let b = spawn_entity(world, Rect::default(), 0.0);
    let c = spawn_entity(world, Rect::default(), 0.0);
    world.add_observer(|t: On<PageChanged>, mut seen: ResMut<Seen>| {
        seen.0.push(format!("page {}", t.event().page));
    });
    world.flush();
    attach_paged_panel(world, panel, vec![vec![a], vec![b, c]]).unwrap();
    assert_eq!(children_of(world, panel), vec![a, b, c]);

    let visible = |world: &World| -> Vec<bool> {
        [a, b, c]
            .iter()
            .map(|e| world.get::<SceneNode>(*e).unwrap().visible)
            .collect()
    };
    assert_eq!(visible(world), vec![true, false, false]);

    assert_eq!(next_page(world, panel), Ok(1));
    assert_eq!(visible(world), vec![false, true, true]);
    assert!(!world.get::<SceneNode>(a).unwrap().active);
    assert_eq!(next_page(world, panel), Ok(0));
    assert_eq!(prev_page(world, panel), Ok(1));
    assert_eq!(
        show_page(world, panel, 7),
        Err(SceneError::PageOutOfRange { index: 7, count: 2 })
    );
    assert_eq!(world.get::<PagedPanel>(panel).unwrap().current(), 1);
    assert_eq!(seen(&engine), vec!["page 0", "page 1", "page 0", "page 1"]);

    assert_eq!(
        attach_paged_panel(engine.world_mut(), panel, Vec::new()),
        Err(SceneError::EmptyPagedPanel)
    );
}

#[test]
fn paged_panel_rejects_a_missing_panel() {
    let mut engine = make_engine();
    let world = engine.world_mut();
    let panel = spawn_entity(world, Rect::default(), 0.0);
    let member = spawn_entity(world, Rect::default(), 0.0);
    let holder = spawn_entity(world, Rect::default(), 0.0);
    add_child(world, holder, member).unwrap();
    world.despawn(panel);

    assert_eq!(
        attach_paged_panel(world, panel, vec![vec![member]]),
        Err(SceneError::MissingEntity(panel))
    );
    assert_eq!(parent_of(world, member), Some(holder));
}

#[test]
fn failed_paged_panel_leaves_members_detached() {
    let mut engine = make_engine();
    let world = engine.world_mut();
    let outer = spawn_entity(world, Rect::default(), 0.0);
    let panel = spawn_entity(world, Rect::default(), 0.0);
    add_child(world, outer, panel).unwrap();
    let loose = spawn_entity(world, Rect::default(), 0.0);

    // `outer` is the panel's parent, so attaching it as a page member is a cycle.
    let result = attach_paged_panel(world, panel, vec![vec![loose], vec![outer]]);
    assert!(matches!(result, Err(SceneError::CycleDetected { .. })));
    assert_eq!(parent_of(world, loose), None);
    assert!(children_of(world, panel).is_empty());
    assert!(world.get::<PagedPanel>(panel).is_none());
}

#[test]
fn detached_clickables_keep_their_pointer_state() {
    let mut engine = make_engine();
    let tile = spawn_entity(engine.world_mut(), Rect::new(0.0, 0.0, 50.0, 50.0), 0.0);
    engine.world_mut().entity_mut(tile).insert(Clickable::new());
    attach(&mut engine, tile);
    engine
        .world_mut()
        .add_observer(|t: On<MouseExited>, mut seen: ResMut<Seen>| {
            seen.0.push(format!("exit {:?}", t.event().entity));
        });
    engine.world_mut().flush();
    let hovered = |engine: &Engine| engine.world().get::<Clickable>(tile).unwrap().is_hovered();

    frame(&mut engine, 0.1, InputSnapshot::at(10.0, 10.0));
    assert!(hovered(&engine));

    remove(engine.world_mut(), tile).unwrap();
    frame(&mut engine, 0.1, InputSnapshot::at(300.0, 300.0));
    assert!(hovered(&engine));
    assert!(seen(&engine).is_empty());

    attach(&mut engine, tile);
    frame(&mut engine, 0.1, InputSnapshot::at(300.0, 300.0));
    assert!(!hovered(&engine));
    assert_eq!(seen(&engine), vec![format!("exit {:?}", tile)]);
}
