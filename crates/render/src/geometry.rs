use crate::pipeline::FaceKind;

/// Number of side faces around a tile.
pub const SIDE_COUNT: u8 = 4;

/// One triangle-strip vertex of a face quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

const fn vertex(position: [f32; 3], tex_coords: [f32; 2]) -> FaceVertex {
    FaceVertex {
        position,
        tex_coords,
    }
}

/// Static quad shared by every tile for one kind of face.
///
/// Quads span -1..1 in the tile plane and are scaled by half when drawn, so
/// a tile covers one grid cell. The prism is 0.1 deep along -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceGeometry {
    pub vertices: [FaceVertex; 4],
}

impl FaceGeometry {
    /// Front face. Its texture coordinates cover the unit square and are
    /// remapped per tile into the tile's atlas cell.
    pub const FRONT: FaceGeometry = FaceGeometry {
        vertices: [
            vertex([-1.0, -1.0, 0.0], [0.0, 0.0]),
            vertex([1.0, -1.0, 0.0], [1.0, 0.0]),
            vertex([-1.0, 1.0, 0.0], [0.0, 1.0]),
            vertex([1.0, 1.0, 0.0], [1.0, 1.0]),
        ],
    };

    /// Back face, wound the other way so it faces -Z.
    pub const BACK: FaceGeometry = FaceGeometry {
        vertices: [
            vertex([1.0, -1.0, -0.1], [0.0, 1.0]),
            vertex([-1.0, -1.0, -0.1], [1.0, 1.0]),
            vertex([1.0, 1.0, -0.1], [0.0, 0.0]),
            vertex([-1.0, 1.0, -0.1], [1.0, 0.0]),
        ],
    };

    /// The +Y edge strip; the other three sides are this quad turned about Z.
    pub const SIDE: FaceGeometry = FaceGeometry {
        vertices: [
            vertex([-1.0, 1.0, 0.0], [0.0, 0.0]),
            vertex([1.0, 1.0, 0.0], [1.0, 0.0]),
            vertex([-1.0, 1.0, -0.1], [0.0, 0.1]),
            vertex([1.0, 1.0, -0.1], [1.0, 0.1]),
        ],
    };

    pub fn for_face(face: FaceKind) -> &'static FaceGeometry {
        match face {
            FaceKind::Front => &Self::FRONT,
            FaceKind::Side(_) => &Self::SIDE,
            FaceKind::Back => &Self::BACK,
        }
    }
}
