//! Checkers scene viewer
//!
//! Loads a scene document in the background, then drives a few frames of
//! the component graph plus both captured-piece trays into a logging
//! render target. Usage: `checkers [scene-file]`.

mod aux_board;
mod log_renderer;

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use scene_engine::config::{Config, ConfigError, SceneConfig};
use scene_engine::foundation::logging;
use scene_engine::foundation::math::Mat4;
use scene_engine::geometry::GeometryError;
use scene_engine::render::RenderError;
use scene_engine::scene::{FrameState, SceneComposer, SceneError, SceneGraph, SceneLoader};
use thiserror::Error;

use aux_board::{AuxBoard, Player, TrayStyle};
use log_renderer::LogRenderer;

const CONFIG_FILE: &str = "checkers.toml";

/// Frames rendered before exiting
const FRAMES: usize = 3;

/// Poll interval while the scene loads, and animation time per frame
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Captured pieces shown in each tray: (player one, player two)
const CAPTURED: (usize, usize) = (3, 6);

/// Application-level errors
#[derive(Error, Debug)]
enum AppError {
    /// Configuration file problem
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Scene failed to load or render
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Render target failure outside the scene graph
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Tray geometry could not be built
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

fn main() {
    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let config = SceneConfig::load_or_default(CONFIG_FILE)?;
    logging::init_with_level(&config.log_level);

    let scene_file = std::env::args().nth(1).unwrap_or_else(|| config.default_scene.clone());
    let loader = SceneLoader::new(config);
    let mut pending = loader.load(&scene_file)?;
    let graph = loop {
        if let Some(result) = pending.poll() {
            break result?;
        }
        thread::sleep(FRAME_TIME);
    };

    if let Some(camera) = graph.default_camera() {
        log::info!(
            "Camera '{}' at {:?} looking at {:?}",
            graph.default_camera_id().unwrap_or_default(),
            camera.eye(),
            camera.target()
        );
    }

    let mut trays = [Player::One, Player::Two]
        .into_iter()
        .map(|player| AuxBoard::new(player, tray_style(&graph, player)))
        .collect::<Result<Vec<_>, _>>()?;
    for tray in &mut trays {
        let captured = match tray.player() {
            Player::One => CAPTURED.0,
            Player::Two => CAPTURED.1,
        };
        tray.reset_pieces(captured);
    }

    let mut renderer = LogRenderer::new();
    let mut composer = SceneComposer::new(&graph);
    for frame in 0..FRAMES {
        let time = FRAME_TIME.as_secs_f32() * frame as f32;
        let poses: HashMap<String, Mat4> = graph
            .animations()
            .iter()
            .map(|(id, animation)| (id.to_string(), animation.matrix_at(time)))
            .collect();

        let stats = composer.render(&mut renderer, &FrameState::with_material_index(frame), &poses)?;
        for tray in &mut trays {
            tray.render(&mut renderer)?;
        }

        log::info!(
            "Frame {frame}: {} components, {} draws, {} uploads",
            stats.components,
            stats.draws,
            stats.uploads
        );
        renderer.end_frame();
    }

    log::info!("{} geometries resident", renderer.uploaded());
    Ok(())
}

/// Tray appearance taken from the scene, falling back to defaults
fn tray_style(graph: &SceneGraph, player: Player) -> TrayStyle {
    let material = |id: &str| graph.materials().get(id).cloned().unwrap_or_default();
    // a tray holds the opponent's captured pieces
    let piece = match player {
        Player::One => "black_piece",
        Player::Two => "white_piece",
    };

    TrayStyle {
        material: material("tray"),
        texture: graph.textures().get("tray_wood").cloned(),
        piece_material: material(piece),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_engine::render::RecordingRenderer;
    use scene_engine::scene::{parse_str, NoAnimation};

    fn shipped_scene() -> SceneGraph {
        parse_str(include_str!("../../scenes/checkers.xml"), &SceneConfig::default()).unwrap()
    }

    #[test]
    fn test_shipped_scene_renders() {
        let graph = shipped_scene();
        assert_eq!(graph.root(), "room");
        assert_eq!(graph.default_camera_id(), Some("player_one"));

        let mut renderer = RecordingRenderer::new();
        let stats = SceneComposer::new(&graph)
            .render(&mut renderer, &FrameState::default(), &NoAnimation)
            .unwrap();
        assert_eq!(stats.components, graph.reachable().len() + 3, "piece is shared by four parents");
        assert_eq!(renderer.transform_depth(), 0);
    }

    #[test]
    fn test_tray_style_from_scene() {
        let graph = shipped_scene();
        let style = tray_style(&graph, Player::One);
        assert_eq!(style.texture.as_ref().map(|t| t.id.as_str()), Some("tray_wood"));
        assert_eq!(&style.piece_material, graph.materials().get("black_piece").unwrap());
        assert_eq!(&tray_style(&graph, Player::Two).piece_material, graph.materials().get("white_piece").unwrap());
    }
}
