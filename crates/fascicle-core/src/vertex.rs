//! Vertex layout shared by vertex sources and the buffer builder.

use glam::Vec3;

/// A single tract vertex: three `f32` coordinates, 12 bytes, no padding.
///
/// The layout matches a tightly packed `vec3<f32>` vertex attribute so a
/// slice of these can be uploaded without conversion.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TractVertex {
    /// XYZ position in dataset space.
    pub position: [f32; 3],
}

static_assertions::assert_eq_size!(TractVertex, [u8; 12]);

impl TractVertex {
    /// Number of `f32` components per vertex.
    pub const COMPONENTS: usize = 3;

    /// Construct a vertex from its coordinates.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
        }
    }

    /// The position as a [`Vec3`].
    pub fn to_vec3(self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

impl From<Vec3> for TractVertex {
    fn from(v: Vec3) -> Self {
        Self {
            position: v.to_array(),
        }
    }
}

impl From<[f32; 3]> for TractVertex {
    fn from(position: [f32; 3]) -> Self {
        Self { position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_12_bytes() {
        assert_eq!(std::mem::size_of::<TractVertex>(), 12);
        assert_eq!(
            std::mem::size_of::<TractVertex>(),
            TractVertex::COMPONENTS * std::mem::size_of::<f32>()
        );
    }

    #[test]
    fn test_vec3_conversion() {
        let v = TractVertex::from(Vec3::new(1.0, -2.5, 3.25));
        assert_eq!(v.position, [1.0, -2.5, 3.25]);
        assert_eq!(v.to_vec3(), Vec3::new(1.0, -2.5, 3.25));
    }

    #[test]
    fn test_cast_to_components() {
        let verts = [TractVertex::new(1.0, 2.0, 3.0), TractVertex::new(4.0, 5.0, 6.0)];
        let flat: &[f32] = bytemuck::cast_slice(&verts);
        assert_eq!(flat, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
