//! Integration tests: parse, validate and render the board fixture
//!
//! The fixture exercises every block, every primitive kind, multi-material
//! cycling, texture inheritance, named transformations, an animation and a
//! highlight. Each test mutates the document text to hit one rule.

use std::collections::HashMap;

use crate::config::SceneConfig;
use crate::document::{DocumentError, MAX_DEPTH};
use crate::foundation::math::Mat4;
use crate::render::RecordingRenderer;
use crate::scene::{
    parse_str, Camera, FrameState, LightKind, NoAnimation, SceneComposer, SceneError, SceneGraph, SceneResult,
};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BOARD: &str = include_str!("board.xml");

    fn load(src: &str) -> SceneResult<SceneGraph> {
        parse_str(src, &SceneConfig::default())
    }

    fn board() -> SceneGraph {
        load(BOARD).unwrap()
    }

    /// Remove one top-level block from the document
    fn without_block(name: &str) -> String {
        let (start, end) = if name == "scene" {
            let start = BOARD.find("<scene ").unwrap();
            (start, start + BOARD[start..].find("/>").unwrap() + 2)
        } else {
            let open = format!("<{name}>");
            let close = format!("</{name}>");
            let start = BOARD.find(open.as_str()).or_else(|| BOARD.find(&format!("<{name} "))).unwrap();
            (start, BOARD.find(close.as_str()).unwrap() + close.len())
        };
        format!("{}{}", &BOARD[..start], &BOARD[end..])
    }

    fn render(graph: &SceneGraph, material_index: usize) -> RecordingRenderer {
        let mut renderer = RecordingRenderer::new();
        SceneComposer::new(graph)
            .render(&mut renderer, &FrameState::with_material_index(material_index), &NoAnimation)
            .unwrap();
        renderer
    }

    fn diffuse_red(graph: &SceneGraph, material: &str) -> f32 {
        graph.materials().get(material).unwrap().diffuse.r
    }

    #[test]
    fn test_board_tables() {
        let graph = board();

        assert_eq!(graph.root(), "room");
        assert_eq!(graph.axis_length(), 5.0);
        assert_eq!(graph.cameras().len(), 2, "camera without <to> is dropped");
        assert!(graph.cameras().get("broken").is_none());
        assert!(matches!(graph.default_camera(), Some(Camera::Perspective { .. })));
        assert!(matches!(graph.cameras().get("top"), Some(Camera::Orthographic { .. })));

        let lamp = graph.lights().get("lamp").unwrap();
        assert!(!lamp.enabled);
        assert!(matches!(lamp.kind, LightKind::Spot { .. }));

        assert_eq!(graph.primitives().len(), 6);
        assert_eq!(graph.components().len(), 9);
        assert_eq!(graph.materials().len(), 4);
        assert_eq!(graph.textures().len(), 2);
        assert_eq!(graph.animations().get("hop").unwrap().len(), 2);
    }

    #[test]
    fn test_unreachable_component_is_kept() {
        let graph = board();
        let reachable = graph.reachable();
        assert_eq!(reachable.len(), 8);
        assert!(!reachable.contains("spare"));
        assert!(graph.component("spare").is_some());
    }

    #[test]
    fn test_torus_buffer_sizes() {
        let graph = board();
        let ring = graph.primitives().get("ring").unwrap();
        assert_eq!(ring.geometry().vertex_count(), 25 * 9);
        assert_eq!(ring.geometry().triangle_count(), 2 * 24 * 8);
    }

    #[test]
    fn test_first_frame() {
        let graph = board();
        let mut renderer = RecordingRenderer::new();
        let stats = SceneComposer::new(&graph)
            .render(&mut renderer, &FrameState::default(), &NoAnimation)
            .unwrap();

        // knob is shared by both pieces and visited twice
        assert_eq!(stats.components, 9);
        assert_eq!(stats.draws, 8);
        assert_eq!(stats.uploads, 6);
        assert_eq!(renderer.transform_depth(), 0);

        let materials: Vec<f32> = renderer
            .draws()
            .iter()
            .map(|draw| draw.material.as_ref().unwrap().diffuse.r)
            .collect();
        let expected: Vec<f32> = ["ivory", "ivory", "ivory", "ebony", "gold", "gold", "ebony", "oak"]
            .into_iter()
            .map(|id| diffuse_red(&graph, id))
            .collect();
        assert_eq!(materials, expected);

        let textures: Vec<Option<(&str, f32, f32)>> = renderer
            .draws()
            .iter()
            .map(|draw| draw.texture.as_ref().map(|(id, s, t)| (id.as_str(), *s, *t)))
            .collect();
        assert_eq!(
            textures,
            vec![
                Some(("wood", 0.5, 0.5)),
                Some(("marble", 1.0, 1.0)),
                Some(("marble", 1.0, 1.0)),
                None,
                None,
                None,
                None,
                None,
            ]
        );

        let highlighted: Vec<bool> = renderer.draws().iter().map(|draw| draw.highlight.is_some()).collect();
        assert_eq!(highlighted, vec![false, true, false, false, false, false, false, false]);
    }

    #[test]
    fn test_material_cycling_between_frames() {
        let graph = board();
        let second = render(&graph, 1);

        let tile = second.draws()[0].material.as_ref().unwrap().diffuse.r;
        assert_eq!(tile, diffuse_red(&graph, "ebony"));

        // crown's second entry is inherit, so it takes black_king's ebony
        let crown_ring = second.draws()[4].material.as_ref().unwrap().diffuse.r;
        assert_eq!(crown_ring, diffuse_red(&graph, "ebony"));

        let third = render(&graph, 2);
        assert_eq!(
            third.draws()[0].material.as_ref().unwrap().diffuse.r,
            diffuse_red(&graph, "ivory")
        );
    }

    #[test]
    fn test_repeated_frames_are_identical() {
        let graph = board();
        let mut composer = SceneComposer::new(&graph);
        let frame = FrameState::with_material_index(3);

        let mut renderer = RecordingRenderer::new();
        composer.render(&mut renderer, &frame, &NoAnimation).unwrap();
        let first: Vec<Mat4> = renderer.draws().iter().map(|d| d.world).collect();

        renderer.clear_log();
        let stats = composer.render(&mut renderer, &frame, &NoAnimation).unwrap();
        let second: Vec<Mat4> = renderer.draws().iter().map(|d| d.world).collect();

        assert_eq!(stats.uploads, 0, "uploads are cached per composer");
        assert_eq!(renderer.upload_count(), 6);
        assert_eq!(first, second);
    }

    #[test]
    fn test_animation_applies_after_local_transform() {
        let graph = board();
        let hop = graph.animations().get("hop").unwrap().matrix_at(1.0);
        let mut poses: HashMap<String, Mat4> = HashMap::new();
        poses.insert("hop".to_string(), hop);

        let still = render(&graph, 0);
        let mut moving = RecordingRenderer::new();
        SceneComposer::new(&graph)
            .render(&mut moving, &FrameState::default(), &poses)
            .unwrap();

        let expected = still.draws()[1].world * hop;
        assert_relative_eq!(moving.draws()[1].world, expected, epsilon = 1e-5);
        assert_relative_eq!(moving.draws()[0].world, still.draws()[0].world);
    }

    #[test]
    fn test_inherit_at_root_renders_untextured() {
        let src = BOARD.replacen(r#"<texture id="none"/>"#, r#"<texture id="inherit"/>"#, 1);
        let graph = load(&src).unwrap();
        let renderer = render(&graph, 0);
        assert_eq!(renderer.draws().last().unwrap().texture, None);
    }

    #[test]
    fn test_every_block_is_required() {
        for block in crate::scene::parser::BLOCKS {
            let err = load(&without_block(block)).unwrap_err();
            assert!(
                matches!(err, SceneError::MissingBlock(name) if name == block),
                "removing <{block}> gave: {err}"
            );
        }
    }

    #[test]
    fn test_out_of_order_blocks_load() {
        let ambient_start = BOARD.find("<ambient>").unwrap();
        let ambient_end = BOARD.find("</ambient>").unwrap() + "</ambient>".len();
        let ambient = &BOARD[ambient_start..ambient_end];
        let moved = without_block("ambient").replacen("<views ", &format!("{ambient}\n<views "), 1);

        let graph = load(&moved).unwrap();
        assert_eq!(graph.components().len(), 9);
    }

    #[test]
    fn test_duplicate_material_names_id() {
        let src = BOARD.replacen(r#"<material id="ivory" shininess"#, r#"<material id="oak" shininess"#, 1);
        let err = load(&src).unwrap_err();
        assert!(matches!(err, SceneError::DuplicateId { kind: "material", .. }));
        assert!(err.to_string().contains("conflict: ID = oak"));
    }

    #[test]
    fn test_bad_attenuation_is_fatal() {
        let src = BOARD.replacen(
            r#"<attenuation constant="1" linear="0" quadratic="0"/>"#,
            r#"<attenuation constant="1" linear="1" quadratic="0"/>"#,
            1,
        );
        let err = load(&src).unwrap_err();
        assert!(err.to_string().contains("light 'ceiling'"), "{err}");
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let src = BOARD.replacen(
            r#"<primitiveref id="knob"/>
            </children>
        </component>

        <component id="tablecloth">"#,
            r#"<primitiveref id="knob"/>
                <componentref id="knob"/>
            </children>
        </component>

        <component id="tablecloth">"#,
            1,
        );
        assert_ne!(src, BOARD);
        assert!(matches!(load(&src), Err(SceneError::CycleDetected)));
    }

    #[test]
    fn test_cycle_through_ancestors() {
        let src = BOARD.replacen(
            r#"<primitiveref id="pennant"/>"#,
            r#"<primitiveref id="pennant"/>
                <componentref id="black_king"/>"#,
            1,
        );
        assert!(matches!(load(&src), Err(SceneError::CycleDetected)));
    }

    #[test]
    fn test_unreachable_cycle_still_fails() {
        let src = BOARD.replacen(
            r#"<component id="spare">
            <transformation/>
            <materials>
                <material id="gold"/>
            </materials>
            <texture id="none"/>
            <children>"#,
            r#"<component id="spare">
            <transformation/>
            <materials>
                <material id="gold"/>
            </materials>
            <texture id="none"/>
            <children>
                <componentref id="spare"/>"#,
            1,
        );
        assert_ne!(src, BOARD);
        assert!(matches!(load(&src), Err(SceneError::CycleDetected)));
    }

    #[test]
    fn test_dangling_child_is_reported() {
        let src = BOARD.replacen(r#"<componentref id="tablecloth"/>"#, r#"<componentref id="rug"/>"#, 1);
        match load(&src).unwrap_err() {
            SceneError::InvalidComponents(errors) => {
                assert!(errors.iter().any(|e| e.to_string().contains("ID = rug")));
            }
            other => panic!("expected invalid components, got {other}"),
        }
    }

    #[test]
    fn test_oversized_torus_count_is_fatal() {
        let src = BOARD.replacen(
            r#"<torus inner="0.05" outer="0.3" slices="8" loops="24"/>"#,
            r#"<torus inner="0.05" outer="0.3" slices="4294967295" loops="1"/>"#,
            1,
        );
        assert_ne!(src, BOARD);
        let err = load(&src).unwrap_err();
        assert!(matches!(
            err,
            SceneError::InvalidAttribute { ref context, ref attribute, .. }
                if context == "primitive 'ring'" && attribute == "slices"
        ));
    }

    #[test]
    fn test_oversized_patch_degree_is_fatal() {
        let src = BOARD.replacen(r#"degree_u="1" parts_u="4""#, r#"degree_u="9223372036854775807" parts_u="4""#, 1);
        assert_ne!(src, BOARD);
        let err = load(&src).unwrap_err();
        assert!(matches!(
            err,
            SceneError::InvalidAttribute { ref context, ref attribute, .. }
                if context == "primitive 'cloth'" && attribute == "degree_u"
        ));
    }

    #[test]
    fn test_deep_nesting_is_fatal() {
        let depth = 200_000;
        let deep = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        let src = BOARD.replacen("<primitives>", &format!("<primitives>{deep}"), 1);
        assert_ne!(src, BOARD);
        assert!(matches!(
            load(&src),
            Err(SceneError::Document(DocumentError::TooDeep { limit: MAX_DEPTH, .. }))
        ));
    }
}
