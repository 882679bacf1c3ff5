//! Robot arm: an articulated arm you pose with the mouse
//!
//! Pick a joint group with 1-5 and drag to move it. Close the fingers near
//! the teapot and press space to pick it up; press space again to set it down.
//! Everything is drawn by a small software rasterizer at 512x512.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod arm;
mod config;
mod input;
mod placement;
mod prop;
mod rasterizer;
mod scene;

use std::path::PathBuf;

use clap::Parser;
use macroquad::prelude::{
    clear_background, draw_text, draw_texture_ex, get_fps, next_frame, screen_height, screen_width,
    Conf, DrawTextureParams, FilterMode, Texture2D, Vec2, BLACK, WHITE,
};

use app::AppState;
use config::ArmConfig;
use input::InputState;
use prop::PropModel;
use rasterizer::{Framebuffer, HEIGHT, WIDTH};
use scene::{draw_scene, FramebufferSink, SceneMeshes};

#[derive(Parser, Debug)]
#[command(name = "robot-arm", version, about = "Pose a robot arm and pick up a teapot")]
struct Cli {
    /// RON config file with rig dimensions, startup pose and grab rules
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Wavefront OBJ to use as the prop (overrides the config)
    #[arg(long, value_name = "OBJ")]
    prop: Option<PathBuf>,

    /// Write the built-in config to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Robot Arm v{}", VERSION),
        window_width: 768,
        window_height: 768,
        window_resizable: true,
        ..Default::default()
    }
}

fn load_config(cli: &Cli) -> ArmConfig {
    let mut config = match &cli.config {
        Some(path) => ArmConfig::load(path).unwrap_or_else(|e| {
            log::warn!("Could not load config {}: {}; using defaults", path.display(), e);
            ArmConfig::default()
        }),
        None => ArmConfig::default(),
    };
    if let Some(prop) = &cli.prop {
        config.prop.model_path = Some(prop.clone());
    }
    config
}

/// Scale the square framebuffer to the largest centred square that fits
fn blit_framebuffer(fb: &Framebuffer) {
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
    texture.set_filter(FilterMode::Nearest);

    let size = screen_width().min(screen_height());
    draw_texture_ex(
        &texture,
        (screen_width() - size) / 2.0,
        (screen_height() - size) / 2.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(Vec2::new(size, size)),
            ..Default::default()
        },
    );
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Some(path) = &cli.write_default_config {
        match ArmConfig::default().save(path) {
            Ok(()) => log::info!("Wrote default config to {}", path.display()),
            Err(e) => log::error!("Could not write {}: {}", path.display(), e),
        }
        return;
    }

    let config = load_config(&cli);
    let model = PropModel::load_or_stand_in(config.prop.model_path.as_deref());
    let meshes = SceneMeshes::new(model.mesh);

    let mut app = AppState::new(config, (screen_width(), screen_height()));
    app.place_prop();

    let mut input = InputState::new();
    let mut fb = Framebuffer::new(WIDTH, HEIGHT);
    let background = rasterizer::Color::new(20, 20, 28);

    log::info!("Robot Arm v{}", VERSION);

    loop {
        for event in input.poll() {
            app.handle_event(event);
        }
        if app.quit_requested() {
            break;
        }

        let frame = app.step();

        fb.clear(background);
        let stats = {
            let mut sink = FramebufferSink::new(&mut fb, &app.camera, &meshes);
            draw_scene(&mut sink, &frame.frames, frame.prop.as_ref(), &app.config.rig);
            sink.stats()
        };

        clear_background(BLACK);
        blit_framebuffer(&fb);

        let mut hud = app.hud_lines(get_fps());
        hud.push(format!("{} tris", stats.triangles_drawn));
        for (i, line) in hud.iter().enumerate() {
            draw_text(line, 10.0, 20.0 + i as f32 * 18.0, 18.0, WHITE);
        }

        next_frame().await;
    }
}
