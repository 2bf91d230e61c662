//! Drawable game objects.

use std::{path::Path, sync::Arc};

use glam::{Mat3, Vec3};

use crate::{
    abs::{GeometryError, GpuGeometry, Texture, TextureError, TextureFilter},
    geometry::CpuGeometry,
};

/// Errors produced while creating a [`RenderEntity`].
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Builds the 2D homogeneous transform `T(position) * R(theta) * S(scale)`.
pub fn transformation(position: Vec3, theta: f32, scale: f32) -> Mat3 {
    Mat3::from_scale_angle_translation(glam::Vec2::splat(scale), theta, position.truncate())
}

/// Geometry, texture and transform bundled into something the frame loop can draw.
///
/// Fields are public and meant to be assigned directly. After changing `position`, `theta` or
/// `scale`, call `update_transform`, `apply_transform` and `upload` in that order.
pub struct RenderEntity {
    pub cgeom: CpuGeometry,
    pub ggeom: GpuGeometry,
    pub texture: Texture,

    pub position: Vec3,
    /// Rotation in radians.
    pub theta: f32,
    pub scale: f32,
    pub transformation_matrix: Mat3,
}

impl RenderEntity {
    /// Loads the texture and creates empty geometry with the identity transform.
    pub fn new(
        gl: &Arc<glow::Context>,
        texture_path: impl AsRef<Path>,
        filter: TextureFilter,
    ) -> Result<Self, EntityError> {
        Ok(Self {
            cgeom: CpuGeometry::default(),
            ggeom: GpuGeometry::new(gl)?,
            texture: Texture::from_file(gl, texture_path, filter)?,
            position: Vec3::ZERO,
            theta: 0.0,
            scale: 1.0,
            transformation_matrix: Mat3::IDENTITY,
        })
    }

    /// Recomputes the transformation matrix from position, rotation and scale.
    pub fn update_transform(&mut self) {
        self.transformation_matrix = transformation(self.position, self.theta, self.scale);
    }

    /// Transforms the CPU vertices in place. No untransformed copy is kept.
    pub fn apply_transform(&mut self) {
        apply(&self.transformation_matrix, &mut self.cgeom);
    }

    /// Copies the CPU geometry into the GPU buffers.
    pub fn upload(&mut self) {
        self.ggeom.set_verts(&self.cgeom.verts);
        self.ggeom.set_tex_coords(&self.cgeom.tex_coords);
    }

    /// Binds geometry and texture, draws, and unbinds the texture.
    pub fn draw(&self) {
        self.ggeom.bind();
        self.texture.bind();
        self.ggeom.draw();
        self.texture.unbind();
    }
}

/// Overwrites every vertex of `geometry` with `matrix * vertex`.
pub fn apply(matrix: &Mat3, geometry: &mut CpuGeometry) {
    for vert in &mut geometry.verts {
        *vert = *matrix * *vert;
    }
}
