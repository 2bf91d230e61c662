//! Device-side geometry.
//!
//! [`GpuGeometry`] owns a vertex array object with one vertex buffer per attribute: positions at
//! location 0 and texture coordinates at location 1. Uploads are one-shot copies of whatever the
//! caller passes in; nothing is re-uploaded automatically.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use glow::HasContext;

/// Errors produced while creating GPU buffers.
#[derive(Debug, thiserror::Error)]
#[error("failed to create {object}: {message}")]
pub struct GeometryError {
    pub object: &'static str,
    pub message: String,
}

/// Converts an element count to the `GLsizei` a draw call takes. Counts past `i32::MAX` are
/// clamped instead of wrapping.
pub(crate) fn draw_count(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// A description of a `glDrawArrays` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCall {
    pub mode: u32,
    pub first: i32,
    pub count: i32,
}

impl DrawCall {
    /// Draws `count` vertices as independent triangles.
    pub fn triangles(count: usize) -> Self {
        Self {
            mode: glow::TRIANGLES,
            first: 0,
            count: draw_count(count),
        }
    }
}

/// A single attribute buffer.
struct VertexBuffer {
    id: glow::Buffer,
    location: u32,
    components: i32,
}

impl VertexBuffer {
    fn new(gl: &glow::Context, location: u32, components: i32) -> Result<Self, GeometryError> {
        let id = unsafe { gl.create_buffer() }.map_err(|message| GeometryError {
            object: "vertex buffer",
            message,
        })?;
        Ok(Self {
            id,
            location,
            components,
        })
    }

    /// Uploads `data` and points the attribute at it. The owning VAO must be bound.
    fn upload(&self, gl: &glow::Context, data: &[u8]) {
        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.id));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
            gl.vertex_attrib_pointer_f32(
                self.location,
                self.components,
                glow::FLOAT,
                false,
                self.components * std::mem::size_of::<f32>() as i32,
                0,
            );
            gl.enable_vertex_attrib_array(self.location);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }
}

/// Represents geometry stored on the GPU side.
pub struct GpuGeometry {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    verts: VertexBuffer,
    tex_coords: VertexBuffer,
    vertex_count: usize,
}

impl GpuGeometry {
    /// Creates empty buffers.
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self, GeometryError> {
        let vao = unsafe { gl.create_vertex_array() }.map_err(|message| GeometryError {
            object: "vertex array",
            message,
        })?;

        Ok(Self {
            gl: Arc::clone(gl),
            vao,
            verts: VertexBuffer::new(gl, 0, 3)?,
            tex_coords: VertexBuffer::new(gl, 1, 2)?,
            vertex_count: 0,
        })
    }

    /// Uploads vertex positions. The number of positions becomes the draw count.
    pub fn set_verts(&mut self, verts: &[Vec3]) {
        self.bind();
        self.verts.upload(&self.gl, bytemuck::cast_slice(verts));
        self.vertex_count = verts.len();
    }

    /// Uploads texture coordinates.
    pub fn set_tex_coords(&mut self, tex_coords: &[Vec2]) {
        self.bind();
        self.tex_coords.upload(&self.gl, bytemuck::cast_slice(tex_coords));
    }

    /// Selects this geometry as the source of the next draw call.
    pub fn bind(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
        }
    }

    /// Returns the draw call [`draw`](Self::draw) issues.
    pub fn draw_call(&self) -> DrawCall {
        DrawCall::triangles(self.vertex_count)
    }

    /// Draws the uploaded vertices as triangles. The geometry must be bound.
    pub fn draw(&self) {
        let call = self.draw_call();
        unsafe {
            self.gl.draw_arrays(call.mode, call.first, call.count);
        }
    }
}

impl Drop for GpuGeometry {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.verts.id);
            self.gl.delete_buffer(self.tex_coords.id);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
