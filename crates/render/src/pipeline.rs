use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tilescape_common::{ATLAS_COLUMNS, ATLAS_ROWS, TextureVariant, Tile};

use crate::geometry::SIDE_COUNT;
use crate::renderer::FaceRenderer;

/// Which face of a tile a draw belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceKind {
    Front,
    /// Side `i` is the shared side quad turned by `i` quarter turns.
    Side(u8),
    Back,
}

impl FaceKind {
    /// Submission order for the faces of one tile.
    pub const DRAW_ORDER: [FaceKind; 6] = [
        FaceKind::Front,
        FaceKind::Side(0),
        FaceKind::Side(1),
        FaceKind::Side(2),
        FaceKind::Side(3),
        FaceKind::Back,
    ];

    pub fn texture(self) -> FaceTexture {
        match self {
            FaceKind::Front => FaceTexture::Atlas,
            FaceKind::Side(_) => FaceTexture::Side,
            FaceKind::Back => FaceTexture::Back,
        }
    }
}

/// Texture bound for a face draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceTexture {
    Atlas,
    Side,
    Back,
}

/// Axis-aligned rectangle in normalized texture space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl UvRect {
    /// The whole texture; leaves static texture coordinates unchanged.
    pub const FULL: UvRect = UvRect {
        min: Vec2::ZERO,
        max: Vec2::ONE,
    };

    /// Atlas cell shown by `variant`: column `v % 5`, row `v / 5`, each cell
    /// 0.2 wide and high.
    pub fn for_variant(variant: TextureVariant) -> Self {
        let cell = Vec2::new(1.0 / f32::from(ATLAS_COLUMNS), 1.0 / f32::from(ATLAS_ROWS));
        let col = f32::from(variant.column());
        let row = f32::from(variant.row());
        Self {
            min: Vec2::new(cell.x * col, cell.y * row),
            max: Vec2::new(cell.x * (col + 1.0), cell.y * (row + 1.0)),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Map a coordinate of the unit square into this rectangle.
    pub fn map(&self, uv: Vec2) -> Vec2 {
        self.min + uv * self.size()
    }
}

/// Atlas rectangle for a tile's front face.
pub fn atlas_uv_rect(variant: TextureVariant) -> UvRect {
    UvRect::for_variant(variant)
}

/// One quad submission with everything a backend needs to draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceDraw {
    pub face: FaceKind,
    pub texture: FaceTexture,
    /// Face-local to view space.
    pub model_view: Mat4,
    /// Remaps the face's static texture coordinates; [`UvRect::FULL`] for
    /// everything but the front face.
    pub uv: UvRect,
}

/// Perspective parameters. Depth maps to 0..1 as wgpu expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }
}

/// Computes per-face transforms for tiles and submits them to a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileTransformPipeline {
    /// Uniform scale taking the -1..1 quads down to one grid cell.
    pub face_scale: f32,
}

impl Default for TileTransformPipeline {
    fn default() -> Self {
        Self { face_scale: 0.5 }
    }
}

impl TileTransformPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Face-local to world transform.
    ///
    /// Applied right to left: scale, side turn about Z (sides only), the
    /// reveal rotation of `rise * pi` about X, then the move to the tile's
    /// cell. The reveal pivots about the tile centre, so this order is fixed.
    pub fn face_model(&self, tile: &Tile, face: FaceKind) -> Mat4 {
        let mut model = Mat4::from_translation(Vec3::new(tile.x as f32, tile.y as f32, 0.0))
            * Mat4::from_rotation_x(tile.rise * PI);
        if let FaceKind::Side(i) = face {
            model *= Mat4::from_rotation_z(f32::from(i % SIDE_COUNT) * FRAC_PI_2);
        }
        model * Mat4::from_scale(Vec3::splat(self.face_scale))
    }

    pub fn face_model_view(&self, tile: &Tile, face: FaceKind, camera: &Mat4) -> Mat4 {
        *camera * self.face_model(tile, face)
    }

    /// The six draws for one tile in [`FaceKind::DRAW_ORDER`].
    pub fn tile_faces(&self, tile: &Tile, camera: &Mat4) -> [FaceDraw; 6] {
        FaceKind::DRAW_ORDER.map(|face| FaceDraw {
            face,
            texture: face.texture(),
            model_view: self.face_model_view(tile, face, camera),
            uv: match face {
                FaceKind::Front => atlas_uv_rect(tile.variant),
                _ => UvRect::FULL,
            },
        })
    }

    /// Submit one frame: every face of every tile, tiles in slice order.
    pub fn draw<R: FaceRenderer + ?Sized>(
        &self,
        tiles: &[Tile],
        camera: &Mat4,
        projection: &Mat4,
        renderer: &mut R,
    ) {
        renderer.begin_frame(projection);
        for tile in tiles {
            for draw in &self.tile_faces(tile, camera) {
                renderer.draw_face(draw);
            }
        }
        renderer.end_frame();
        tracing::trace!(tiles = tiles.len(), draws = tiles.len() * 6, "frame submitted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawRecorder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tilescape_mapgen::generate;

    fn variant(index: u8) -> TextureVariant {
        TextureVariant::new(index).unwrap()
    }

    fn assert_rect(rect: UvRect, min: [f32; 2], max: [f32; 2]) {
        assert!(rect.min.abs_diff_eq(Vec2::from(min), 1e-6), "{rect:?}");
        assert!(rect.max.abs_diff_eq(Vec2::from(max), 1e-6), "{rect:?}");
    }

    #[test]
    fn atlas_cells_for_reference_variants() {
        assert_rect(atlas_uv_rect(variant(0)), [0.0, 0.0], [0.2, 0.2]);
        assert_rect(UvRect::for_variant(variant(12)), [0.4, 0.4], [0.6, 0.6]);
        assert_rect(UvRect::for_variant(variant(24)), [0.8, 0.8], [1.0, 1.0]);
        assert_rect(UvRect::for_variant(variant(7)), [0.4, 0.2], [0.6, 0.4]);
    }

    #[test]
    fn full_rect_leaves_coordinates_alone() {
        let uv = Vec2::new(0.3, 0.1);
        assert_eq!(UvRect::FULL.map(uv), uv);
        let cell = UvRect::for_variant(variant(6)).map(Vec2::ONE);
        assert!(cell.abs_diff_eq(Vec2::new(0.4, 0.4), 1e-6));
    }

    #[test]
    fn resting_front_face_is_translate_then_scale() {
        let pipeline = TileTransformPipeline::new();
        let tile = Tile::new(3, 2, variant(0));
        let model = pipeline.face_model(&tile, FaceKind::Front);
        let corner = model.transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!(corner.abs_diff_eq(Vec3::new(3.5, 2.5, 0.0), 1e-5));
    }

    #[test]
    fn unrisen_tile_is_flipped_about_x() {
        let pipeline = TileTransformPipeline::new();
        let tile = Tile {
            rise: 1.0,
            ..Tile::new(1, 1, variant(0))
        };
        let model = pipeline.face_model(&tile, FaceKind::Front);
        let corner = model.transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!(corner.abs_diff_eq(Vec3::new(1.5, 0.5, 0.0), 1e-5));
        // The back face ends up on top.
        let back = model.transform_point3(Vec3::new(0.0, 0.0, -0.1));
        assert!(back.abs_diff_eq(Vec3::new(1.0, 1.0, 0.05), 1e-5));
    }

    #[test]
    fn sides_sweep_around_the_tile() {
        let pipeline = TileTransformPipeline::new();
        let tile = Tile::new(0, 0, variant(0));
        let edge = Vec3::new(0.0, 1.0, 0.0);
        let expected = [
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(-0.5, 0.0, 0.0),
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
        ];
        for (i, want) in expected.iter().enumerate() {
            let model = pipeline.face_model(&tile, FaceKind::Side(i as u8));
            assert!(model.transform_point3(edge).abs_diff_eq(*want, 1e-5), "side {i}");
        }
    }

    #[test]
    fn rotation_happens_before_translation() {
        let pipeline = TileTransformPipeline::new();
        let tile = Tile {
            rise: 0.5,
            ..Tile::new(4, 0, variant(0))
        };
        // The tile centre stays on its cell whatever the reveal angle.
        let centre = pipeline
            .face_model(&tile, FaceKind::Side(2))
            .transform_point3(Vec3::ZERO);
        assert!(centre.abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn camera_is_applied_last() {
        let pipeline = TileTransformPipeline::new();
        let tile = Tile::new(2, 0, variant(0));
        let camera = Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0));
        let mv = pipeline.face_model_view(&tile, FaceKind::Back, &camera);
        let centre = mv.transform_point3(Vec3::ZERO);
        assert!(centre.abs_diff_eq(Vec3::new(2.0, 0.0, -10.0), 1e-5));
    }

    #[test]
    fn tile_faces_follow_draw_order_and_textures() {
        let pipeline = TileTransformPipeline::new();
        let faces = pipeline.tile_faces(&Tile::new(0, 0, variant(12)), &Mat4::IDENTITY);
        let kinds: Vec<FaceKind> = faces.iter().map(|f| f.face).collect();
        assert_eq!(kinds, FaceKind::DRAW_ORDER.to_vec());
        assert_eq!(faces[0].texture, FaceTexture::Atlas);
        assert!(faces[1..5].iter().all(|f| f.texture == FaceTexture::Side));
        assert_eq!(faces[5].texture, FaceTexture::Back);
        assert_rect(faces[0].uv, [0.4, 0.4], [0.6, 0.6]);
        assert!(faces[1..].iter().all(|f| f.uv == UvRect::FULL));
    }

    #[test]
    fn two_tiles_submit_twelve_draws() {
        // First seed whose second tile grows east of the origin.
        let tiles = (0..1000)
            .map(|seed| generate(8, 2, &mut StdRng::seed_from_u64(seed)).unwrap())
            .find(|tiles| (tiles[1].x, tiles[1].y) == (1, 0))
            .unwrap();
        assert_eq!((tiles[0].x, tiles[0].y, tiles[0].variant), (0, 0, variant(0)));

        let pipeline = TileTransformPipeline::new();
        let projection = Projection::default().matrix(16.0 / 9.0);
        let mut recorder = DrawRecorder::new();
        pipeline.draw(&tiles, &Mat4::IDENTITY, &projection, &mut recorder);

        let frame = recorder.last_frame().unwrap();
        assert_eq!(frame.projection, projection);
        assert_eq!(frame.draws.len(), 12);
        assert_rect(frame.draws[0].uv, [0.0, 0.0], [0.2, 0.2]);
        assert_eq!(frame.draws[6].uv, atlas_uv_rect(tiles[1].variant));
        let expected: Vec<FaceDraw> = tiles
            .iter()
            .flat_map(|tile| pipeline.tile_faces(tile, &Mat4::IDENTITY))
            .collect();
        assert_eq!(frame.draws, expected);
        let second_centre = frame.draws[6].model_view.transform_point3(Vec3::ZERO);
        assert!(second_centre.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn default_projection_is_45_degrees() {
        let projection = Projection::default();
        let m = projection.matrix(1.0);
        let expected = Mat4::perspective_rh(45f32.to_radians(), 1.0, 0.1, 100.0);
        assert_eq!(m, expected);
    }

    #[test]
    fn projection_fields_default_individually() {
        let projection: Projection = serde_json::from_str(r#"{"fov_y_degrees": 60.0}"#).unwrap();
        assert_eq!(projection.fov_y_degrees, 60.0);
        assert_eq!(projection.far, 100.0);
    }
}
