//! Batches textured, tinted screen-space quads and draws them with a single mesh.

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec4};
use glow::HasContext;

use crate::abs::{GeometryError, Mesh, ShaderProgram, Texture, Vertex};

/// Vertex structure for overlay rendering.
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct OverlayVertex {
    pub position: Vec2,
    pub uv: Vec2,
    pub color: Vec4,
}

impl Vertex for OverlayVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<OverlayVertex>() as i32;
            let vec2 = std::mem::size_of::<Vec2>() as i32;

            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, stride, vec2);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(2, 4, glow::FLOAT, false, stride, vec2 * 2);
            gl.enable_vertex_attrib_array(2);
        }
    }
}

/// A single quad to draw, in pixels with the origin at the top-left of the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub rect: [Vec2; 2],
    pub uv_rect: [Vec2; 2],
    pub color: Vec4,
}

impl DrawCommand {
    /// Returns the command moved by `offset` and scaled about its new origin by `scale`.
    pub fn placed(mut self, offset: Vec2, scale: f32) -> Self {
        self.rect = [self.rect[0] * scale + offset, self.rect[1] * scale + offset];
        self
    }
}

/// CPU-side vertex and index lists of queued quads.
#[derive(Default)]
pub struct QuadBatch {
    pub vertices: Vec<OverlayVertex>,
    pub indices: Vec<u32>,
}

impl QuadBatch {
    /// Appends a command as two triangles.
    pub fn push(&mut self, command: &DrawCommand) {
        let base_index = self.vertices.len() as u32;
        let [min, max] = command.rect;
        let [uv_min, uv_max] = command.uv_rect;
        let color = command.color;

        self.vertices.extend_from_slice(&[
            OverlayVertex {
                position: Vec2::new(max.x, min.y),
                uv: Vec2::new(uv_max.x, uv_min.y),
                color,
            },
            OverlayVertex {
                position: min,
                uv: uv_min,
                color,
            },
            OverlayVertex {
                position: Vec2::new(min.x, max.y),
                uv: Vec2::new(uv_min.x, uv_max.y),
                color,
            },
            OverlayVertex {
                position: max,
                uv: uv_max,
                color,
            },
        ]);
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

/// Draws queued quads sampling one texture.
pub struct OverlayRenderer {
    gl: Arc<glow::Context>,
    shader_program: ShaderProgram,
    pub projection_matrix: Mat4,
    batch: QuadBatch,
    mesh: Option<Mesh>,
}

impl OverlayRenderer {
    pub fn new(gl: &Arc<glow::Context>, shader_program: ShaderProgram) -> Self {
        Self {
            gl: Arc::clone(gl),
            shader_program,
            projection_matrix: Mat4::IDENTITY,
            batch: QuadBatch::default(),
            mesh: None,
        }
    }

    /// Sets a pixel projection for a `width` x `height` viewport with y pointing down.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection_matrix =
            Mat4::orthographic_rh_gl(0.0, width as f32, height as f32, 0.0, -1.0, 1.0);
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.batch.push(&command);
    }

    /// Discards queued quads.
    pub fn clear(&mut self) {
        self.batch.clear();
    }

    /// Draws everything queued with `texture` and empties the batch.
    pub fn flush(&mut self, texture: &Texture) -> Result<(), GeometryError> {
        if self.batch.is_empty() {
            return Ok(());
        }

        match &mut self.mesh {
            Some(mesh) => mesh.update(&self.batch.vertices, &self.batch.indices),
            None => {
                self.mesh = Some(Mesh::new(
                    &self.gl,
                    &self.batch.vertices,
                    &self.batch.indices,
                )?)
            }
        }

        unsafe {
            self.gl.enable(glow::BLEND);
            self.gl
                .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        }

        self.shader_program.use_program();
        self.shader_program
            .set_uniform("u_projection", self.projection_matrix);
        self.shader_program.set_uniform("u_tex", 0);
        texture.bind();
        if let Some(mesh) = &self.mesh {
            mesh.draw();
        }
        texture.unbind();

        unsafe {
            self.gl.disable(glow::BLEND);
        }

        self.batch.clear();
        Ok(())
    }
}
