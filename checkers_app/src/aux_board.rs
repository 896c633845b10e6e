//! Captured-piece trays
//!
//! Each player has a tray beside the board where captured pieces are
//! parked in columns of four, stacking upward once a column is full.

use scene_engine::foundation::math::{Mat4, Mat4Ext, Vec3};
use scene_engine::geometry::{Cylinder, GeometryError, Patch, Primitive, Shape};
use scene_engine::render::{AppliedTexture, GeometryHandle, RenderResult, RenderTarget, TargetId, TransformScope};
use scene_engine::scene::{Material, Texture};

/// Pieces per column before stacking
const COLUMN: usize = 4;

/// Height of one stacked layer
const LAYER_HEIGHT: f32 = 0.2;

/// Tray patch subdivisions along each direction
const TRAY_PARTS: u32 = 20;

/// Which side of the board a tray belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    /// Tray on the +x side, filling toward +y
    One,
    /// Tray on the -x side, filling toward -y
    Two,
}

impl Player {
    /// Tray origin and extent: `(base_x, increment_x, base_y, increment_y)`
    const fn layout(self) -> (f32, f32, f32, f32) {
        match self {
            Self::One => (9.0, 2.0, 0.0, 5.0),
            Self::Two => (-1.0, -2.0, 8.0, -5.0),
        }
    }
}

/// Appearance of a tray and the pieces it holds
#[derive(Debug, Clone)]
pub struct TrayStyle {
    /// Tray material
    pub material: Material,
    /// Tray texture
    pub texture: Option<Texture>,
    /// Material of the captured (opponent) pieces
    pub piece_material: Material,
}

/// One player's captured-piece tray
#[derive(Debug)]
pub struct AuxBoard {
    player: Player,
    style: TrayStyle,
    tray: Primitive,
    piece: Primitive,
    slots: Vec<Vec3>,
    /// Tray and piece handles, valid only on the target that issued them
    handles: Option<(TargetId, GeometryHandle, GeometryHandle)>,
}

impl AuxBoard {
    /// Create an empty tray for `player`
    pub fn new(player: Player, style: TrayStyle) -> Result<Self, GeometryError> {
        let (base_x, inc_x, base_y, inc_y) = player.layout();
        let tray = Patch::new(
            TRAY_PARTS,
            TRAY_PARTS,
            vec![
                vec![[base_x, base_y, 0.0, 1.0], [base_x, base_y + inc_y, 0.0, 1.0]],
                vec![
                    [base_x + inc_x, base_y, 0.0, 1.0],
                    [base_x + inc_x, base_y + inc_y, 0.0, 1.0],
                ],
            ],
        )?;

        Ok(Self {
            player,
            style,
            tray: Primitive::new(format!("{player:?}_tray").to_lowercase(), Shape::Patch(tray)),
            piece: Primitive::new("captured_piece", Shape::Cylinder(Cylinder::new(0.4, 0.4, 0.2, 20, 1))),
            slots: Vec::new(),
            handles: None,
        })
    }

    /// Owner of this tray
    pub const fn player(&self) -> Player {
        self.player
    }

    /// Park one more captured piece
    pub fn add_piece(&mut self) {
        let (base_x, inc_x, base_y, _) = self.player.layout();
        let count = self.slots.len();
        let row = 1.0 + (count % COLUMN) as f32;
        let y = match self.player {
            Player::One => base_y + row,
            Player::Two => base_y - row,
        };
        let layer = match count {
            0..=3 => 0.0,
            4..=7 => 1.0,
            _ => 2.0,
        };
        self.slots.push(Vec3::new(base_x + inc_x / 2.0, y, layer * LAYER_HEIGHT));
    }

    /// Refill the tray with `captured` pieces
    pub fn reset_pieces(&mut self, captured: usize) {
        self.slots.clear();
        for _ in 0..captured {
            self.add_piece();
        }
    }

    /// Piece positions in tray order
    pub fn slots(&self) -> &[Vec3] {
        &self.slots
    }

    /// Draw the tray and its pieces
    pub fn render<R: RenderTarget + ?Sized>(&mut self, target: &mut R) -> RenderResult<()> {
        let id = target.target_id();
        let (tray, piece) = match self.handles {
            Some((uploaded_to, tray, piece)) if uploaded_to == id => (tray, piece),
            _ => {
                let tray = target.upload_geometry(self.tray.geometry())?;
                let piece = target.upload_geometry(self.piece.geometry())?;
                self.handles = Some((id, tray, piece));
                (tray, piece)
            }
        };

        target.apply_material(&self.style.material)?;
        target.apply_texture(self.style.texture.as_ref().map(|t| AppliedTexture::new(t, 1.0, 1.0)))?;
        target.set_highlight(None)?;
        target.draw_indexed(tray)?;

        target.apply_material(&self.style.piece_material)?;
        target.apply_texture(None)?;
        for slot in &self.slots {
            let mut scope = TransformScope::new(&mut *target);
            scope.push(&Mat4::identity().translated(slot));
            scope.target().draw_indexed(piece)?;
        }

        log::trace!("{:?} tray drawn with {} pieces", self.player, self.slots.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use scene_engine::render::RecordingRenderer;

    fn style() -> TrayStyle {
        TrayStyle {
            material: Material::default(),
            texture: Some(Texture::new("tray", "images/tray.jpg")),
            piece_material: Material {
                shininess: 60.0,
                ..Material::default()
            },
        }
    }

    #[test]
    fn test_first_player_layout() {
        let mut board = AuxBoard::new(Player::One, style()).unwrap();
        board.reset_pieces(6);

        let slots = board.slots();
        assert_eq!(slots.len(), 6);
        assert_relative_eq!(slots[0], Vec3::new(10.0, 1.0, 0.0));
        assert_relative_eq!(slots[3], Vec3::new(10.0, 4.0, 0.0));
        assert_relative_eq!(slots[4], Vec3::new(10.0, 1.0, 0.2));
        assert_relative_eq!(slots[5], Vec3::new(10.0, 2.0, 0.2));
    }

    #[test]
    fn test_second_player_mirrors() {
        let mut board = AuxBoard::new(Player::Two, style()).unwrap();
        board.reset_pieces(9);

        let slots = board.slots();
        assert_relative_eq!(slots[0], Vec3::new(-2.0, 7.0, 0.0));
        assert_relative_eq!(slots[2], Vec3::new(-2.0, 5.0, 0.0));
        assert_relative_eq!(slots[8], Vec3::new(-2.0, 7.0, 0.4));
    }

    #[test]
    fn test_reset_replaces_pieces() {
        let mut board = AuxBoard::new(Player::One, style()).unwrap();
        board.reset_pieces(12);
        board.reset_pieces(2);
        assert_eq!(board.slots().len(), 2);
        assert_relative_eq!(board.slots()[1], Vec3::new(10.0, 2.0, 0.0));
    }

    #[test]
    fn test_tray_covers_layout() {
        let board = AuxBoard::new(Player::Two, style()).unwrap();
        let geometry = board.tray.geometry();
        assert_eq!(geometry.vertex_count(), 21 * 21);

        let xs: Vec<f32> = geometry.vertices.iter().map(|v| v[0]).collect();
        let ys: Vec<f32> = geometry.vertices.iter().map(|v| v[1]).collect();
        let min_x = xs.iter().copied().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert_relative_eq!(min_x, -3.0, epsilon = 1e-5);
        assert_relative_eq!(max_y, 8.0, epsilon = 1e-5);
    }

    #[test]
    fn test_render_draws_tray_and_pieces() {
        let mut board = AuxBoard::new(Player::One, style()).unwrap();
        board.reset_pieces(5);

        let mut renderer = RecordingRenderer::new();
        board.render(&mut renderer).unwrap();
        board.render(&mut renderer).unwrap();

        assert_eq!(renderer.upload_count(), 2, "geometry uploaded once");
        assert_eq!(renderer.draws().len(), 2 * 6);
        assert_eq!(renderer.transform_depth(), 0);

        let draws = renderer.draws();
        assert_eq!(draws[0].texture, Some(("tray".to_string(), 1.0, 1.0)));
        assert_eq!(draws[1].texture, None);
        assert_eq!(draws[1].material.as_ref().unwrap().shininess, 60.0);
        assert_relative_eq!(draws[5].world, Mat4::identity().translated(&Vec3::new(10.0, 1.0, 0.2)));
    }

    #[test]
    fn test_each_target_gets_its_own_uploads() {
        let mut board = AuxBoard::new(Player::Two, style()).unwrap();
        board.reset_pieces(1);

        let mut first = RecordingRenderer::new();
        first.upload_geometry(board.piece.geometry()).unwrap();
        board.render(&mut first).unwrap();

        let mut second = RecordingRenderer::new();
        board.render(&mut second).unwrap();
        assert_eq!(second.upload_count(), 2);
        assert_eq!(second.draws().len(), 2);
        for draw in second.draws() {
            assert!(second.geometry(draw.handle).is_some());
        }

        board.render(&mut first).unwrap();
        assert_eq!(first.upload_count(), 5);
    }
}
