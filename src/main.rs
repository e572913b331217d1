//! Headless Strata demo.
//!
//! Builds a small scene (a scrolling camera over a procedurally filled
//! field, a wandering agent driven by a task controller, a button that
//! spawns fading toasts and a checkbox that pauses the agent), then feeds it
//! a scripted input sequence for a number of frames and prints the final
//! draw list.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --bin strata-demo -- --frames 240 --seed 7
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use crossbeam_channel::{Receiver, Sender, unbounded};
use glam::{IVec2, Vec2};
use log::{info, warn};

use strata::components::bounds::{Bounds, Rect};
use strata::components::camera::{Camera, EdgeScroll, FitWindow};
use strata::components::fadeout::MoveFadeRemove;
use strata::components::layer::YSortLayer;
use strata::components::node::SceneNode;
use strata::components::sprite::{Label, Sprite};
use strata::components::task::Task;
use strata::components::taskcontroller::TaskController;
use strata::components::tint::{Color, Tint};
use strata::components::waypoints::{Direction, WaypointFollower};
use strata::engine::Engine;
use strata::error::SceneError;
use strata::events::pointer::{CheckboxToggled, LeftClicked};
use strata::pathfinding::Grid;
use strata::resources::audio::{AudioPlayer, setup_audio, shutdown_audio};
use strata::resources::engineconfig::EngineConfig;
use strata::resources::input::{InputSnapshot, Key};
use strata::resources::windowsize::WindowSize;
use strata::resources::theme::Theme;
use strata::systems::render::DrawList;
use strata::systems::scene::{add_child, destroy, remove_all, spawn_camera, spawn_entity};
use strata::systems::widgets::{spawn_button, spawn_checkbox};
use strata::systems::ysort::refresh_y_sort;

const FIELD_SIZE: f32 = 2048.0;
const CELL: f32 = 32.0;
const TILE_SPACING: f32 = 128.0;

/// Strata headless demo
#[derive(Parser)]
#[command(version, about = "Runs a scripted headless Strata scene and prints the draw list.")]
struct Cli {
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// INI configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for procedural placement and wandering.
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

/// What UI observers ask the main loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiAction {
    Toast,
    Pause(bool),
}

struct LogPlayer;

impl AudioPlayer for LogPlayer {
    fn play(&mut self, id: &str) {
        info!("audio: play '{}'", id);
    }

    fn dispose(&mut self, id: &str) {
        info!("audio: dispose '{}'", id);
    }
}

struct Scene {
    camera: Entity,
    wanderer: Entity,
    button: Entity,
    checkbox: Entity,
}

fn main() -> Result<(), SceneError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = EngineConfig::new();
    if let Some(path) = &cli.config {
        config = EngineConfig::with_path(path);
        if let Err(e) = config.load_from_file() {
            warn!("{}, using defaults", e);
        }
    }

    let mut engine = Engine::new(config.clone());
    setup_audio(engine.world_mut(), LogPlayer);

    let (tx, rx) = unbounded::<UiAction>();
    let scene = build_scene(&mut engine, &config, cli.seed, tx)?;

    let mut draws = DrawList::new();
    let mut toasts = 0;
    for frame in 0..cli.frames {
        if frame == cli.frames / 2 {
            let (w, h) = (config.window_width * 3 / 4, config.window_height * 3 / 4);
            engine.resize(w, h);
            regenerate_field(engine.world_mut(), scene.camera, w as f32, h as f32, cli.seed)?;
        }
        draws.clear();
        let input = scripted_input(frame, &engine, &scene);
        engine.frame(cli.dt, &input, &mut draws);
        toasts += handle_actions(&mut engine, &scene, &rx)?;
    }

    let world = engine.world();
    info!(
        "{} frames, {} toasts, wanderer at {:?}, camera view {:?}",
        cli.frames,
        toasts,
        world.get::<Bounds>(scene.wanderer).map(|b| b.position()),
        world.get::<Camera>(scene.camera).map(|c| c.view),
    );
    for command in &draws.commands {
        println!("{:?}", command);
    }

    shutdown_audio(engine.world_mut());
    Ok(())
}

fn build_scene(
    engine: &mut Engine,
    config: &EngineConfig,
    seed: u64,
    tx: Sender<UiAction>,
) -> Result<Scene, SceneError> {
    let screen = engine.screen();
    let (w, h) = (config.window_width as f32, config.window_height as f32);
    let theme = Arc::new(Theme {
        click_sound: Some("click".into()),
        ..Theme::default()
    });
    let world = engine.world_mut();

    let camera = spawn_camera(
        world,
        Rect::new(0.0, 0.0, w, h),
        Rect::new(0.0, 0.0, FIELD_SIZE, FIELD_SIZE),
        10.0,
    );
    world.entity_mut(camera).insert((
        FitWindow,
        EdgeScroll::new(config.edge_threshold, config.scroll_speed),
    ));
    add_child(world, screen, camera)?;
    regenerate_field(world, camera, w, h, seed)?;

    let grid = Arc::new(build_grid(seed));
    let wanderer = spawn_entity(world, Rect::new(CELL * 2.0, CELL * 2.0, 24.0, 24.0), 0.0);
    let mut rng = fastrand::Rng::with_seed(seed);
    let wander_grid = grid.clone();
    world.entity_mut(wanderer).insert((
        Sprite::solid(Color::new(230, 80, 60, 255)),
        WaypointFollower::new(120.0),
        YSortLayer::default(),
        TaskController::with_factory(move |_world, _owner| {
            let goal = IVec2::new(
                rng.i32(0..wander_grid.width()),
                rng.i32(0..wander_grid.height()),
            );
            let pause = 0.5 + rng.f32();
            Some(
                Task::path_to(wander_grid.cell_center(goal), wander_grid.clone())
                    .then(Task::wait(pause)),
            )
        }),
    ));
    add_child(world, camera, wanderer)?;

    let button = spawn_button(world, Rect::new(16.0, 16.0, 120.0, 28.0), 0.0, "Toast", theme.clone());
    let checkbox = spawn_checkbox(
        world,
        Rect::new(16.0, 52.0, 160.0, 28.0),
        0.0,
        "Pause wanderer",
        false,
        theme,
    );
    add_child(world, screen, button)?;
    add_child(world, screen, checkbox)?;

    let toast_tx = tx.clone();
    world.add_observer(move |trigger: On<LeftClicked>| {
        if trigger.event().entity == button {
            let _ = toast_tx.send(UiAction::Toast);
        }
    });
    world.add_observer(move |trigger: On<CheckboxToggled>| {
        if trigger.event().entity == checkbox {
            let _ = tx.send(UiAction::Pause(trigger.event().checked));
        }
    });
    world.flush();
    refresh_y_sort(world);

    Ok(Scene {
        camera,
        wanderer,
        button,
        checkbox,
    })
}

fn build_grid(seed: u64) -> Grid {
    let cells = (FIELD_SIZE / CELL) as i32;
    let mut rng = fastrand::Rng::with_seed(seed ^ 0x5eed);
    let mut grid = Grid::open(cells, cells, CELL).with_diagonal(true);
    for _ in 0..(cells * cells / 8) {
        let cell = IVec2::new(rng.i32(0..cells), rng.i32(0..cells));
        if cell.x > 3 || cell.y > 3 {
            grid.set_walkable(cell, false);
        }
    }
    grid
}

/// Refill the camera with decoration tiles covering a `w`×`h` viewport.
fn regenerate_field(world: &mut World, camera: Entity, w: f32, h: f32, seed: u64) -> Result<(), SceneError> {
    for tile in remove_all(world, camera)? {
        if world.get::<Sprite>(tile).is_some_and(|s| s.tex_key == "grass") {
            destroy(world, tile)?;
        } else {
            add_child(world, camera, tile)?;
        }
    }
    let mut rng = fastrand::Rng::with_seed(seed);
    let cols = (w / TILE_SPACING).ceil() as i32 + 1;
    let rows = (h / TILE_SPACING).ceil() as i32 + 1;
    for y in 0..rows {
        for x in 0..cols {
            let jitter = Vec2::new(rng.f32(), rng.f32()) * TILE_SPACING * 0.5;
            let pos = Vec2::new(x as f32, y as f32) * TILE_SPACING + jitter;
            let tile = spawn_entity(world, Rect::new(pos.x, pos.y, 48.0, 48.0), 100.0);
            world
                .entity_mut(tile)
                .insert((Sprite::new("grass"), Tint::default().with_alpha(0.6)));
            add_child(world, camera, tile)?;
        }
    }
    Ok(())
}

/// Click the button, pause the wanderer, push the cursor to the right edge
/// so the camera scrolls, hold the down key, then resume the wanderer.
fn scripted_input(frame: u32, engine: &Engine, scene: &Scene) -> InputSnapshot {
    let centre = |e: Entity| {
        engine
            .world()
            .get::<Bounds>(e)
            .map_or(Vec2::ZERO, |b| b.0.center())
    };
    let button = centre(scene.button);
    let checkbox = centre(scene.checkbox);
    let size = engine.world().resource::<WindowSize>();
    let (w, h) = (size.w as f32, size.h as f32);
    match frame {
        0..=9 => InputSnapshot::at(w * 0.5, h * 0.5),
        10..=11 => InputSnapshot::at(button.x, button.y),
        12 => InputSnapshot::at(button.x, button.y).with_left(true),
        13..=19 => InputSnapshot::at(button.x, button.y),
        20 | 150 => InputSnapshot::at(checkbox.x, checkbox.y).with_left(true),
        21..=59 | 151.. => InputSnapshot::at(checkbox.x, checkbox.y),
        60..=119 => InputSnapshot::at(w - 2.0, h * 0.5),
        _ => InputSnapshot::at(w * 0.5, h * 0.5).with_key(Key::Down),
    }
}

fn handle_actions(engine: &mut Engine, scene: &Scene, rx: &Receiver<UiAction>) -> Result<u32, SceneError> {
    let mut toasts = 0;
    for action in rx.try_iter() {
        match action {
            UiAction::Toast => {
                let screen = engine.screen();
                let world = engine.world_mut();
                let toast = spawn_entity(world, Rect::new(160.0, 16.0, 200.0, 24.0), -1.0);
                world.entity_mut(toast).insert((
                    Label::new("Hello from Strata", "default", 16.0),
                    MoveFadeRemove::new(Direction::Down, 40.0, 1.5),
                ));
                add_child(world, screen, toast)?;
                toasts += 1;
            }
            UiAction::Pause(paused) => {
                if let Some(mut node) = engine.world_mut().get_mut::<SceneNode>(scene.wanderer) {
                    node.active = !paused;
                }
                info!("wanderer {}", if paused { "paused" } else { "resumed" });
            }
        }
    }
    Ok(toasts)
}
