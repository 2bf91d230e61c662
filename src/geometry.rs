//! Host-side geometry.
//!
//! [`CpuGeometry`] holds vertex attributes in plain vectors before they are uploaded with
//! [`GpuGeometry`](crate::abs::GpuGeometry).

use glam::{Vec2, Vec3, vec2, vec3};

/// Vertex positions and texture coordinates kept in host memory.
///
/// Positions are 2D points in homogeneous form, so `z` is `1.0` for everything the quad builder
/// emits. Both lists are expected to have the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CpuGeometry {
    pub verts: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
}

impl CpuGeometry {
    /// Builds a `width` x `height` rectangle centred at the origin from two triangles.
    pub fn quad(width: f32, height: f32) -> Self {
        let half_width = width / 2.0;
        let half_height = height / 2.0;

        let verts = vec![
            vec3(-half_width, half_height, 1.0),
            vec3(-half_width, -half_height, 1.0),
            vec3(half_width, -half_height, 1.0),
            vec3(-half_width, half_height, 1.0),
            vec3(half_width, -half_height, 1.0),
            vec3(half_width, half_height, 1.0),
        ];

        let tex_coords = vec![
            vec2(0.0, 1.0),
            vec2(0.0, 0.0),
            vec2(1.0, 0.0),
            vec2(0.0, 1.0),
            vec2(1.0, 0.0),
            vec2(1.0, 1.0),
        ];

        Self { verts, tex_coords }
    }

    /// Returns the number of vertex positions.
    pub fn len(&self) -> usize {
        self.verts.len()
    }

    /// Returns true when there are no vertex positions.
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }
}
