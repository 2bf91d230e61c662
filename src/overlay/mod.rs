//! Immediate-mode debug text drawn over the scene.
//!
//! Each frame follows the same cycle: [`Overlay::begin_frame`], any number of
//! [`Overlay::text`] calls, then [`Overlay::render`]. Nothing queued survives to the next frame.

pub mod font;
pub mod renderer;

use std::sync::Arc;

use glam::{Vec2, Vec4};

use crate::{
    abs::{GeometryError, ShaderError, ShaderProgram, TextureError},
    overlay::{font::Font, renderer::OverlayRenderer},
};

/// Glyph height in pixels at a font scale of 1.
pub const BASE_FONT_SIZE: f32 = 14.0;

const VERTEX_SHADER: &str = include_str!("shaders/vert.glsl");
const FRAGMENT_SHADER: &str = include_str!("shaders/frag.glsl");

/// Errors produced while setting up or drawing the overlay.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// The debug overlay.
pub struct Overlay {
    renderer: OverlayRenderer,
    font: Font,
}

impl Overlay {
    /// Compiles the overlay shader and uploads the font atlas.
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self, OverlayError> {
        let shader_program = ShaderProgram::from_sources(gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let overlay = Self {
            renderer: OverlayRenderer::new(gl, shader_program),
            font: Font::builtin(gl)?,
        };
        log::debug!("overlay initialised");
        Ok(overlay)
    }

    /// Starts a new overlay frame for a window of the given drawable size.
    pub fn begin_frame(&mut self, width: u32, height: u32) {
        self.renderer.clear();
        self.renderer.resize(width, height);
    }

    /// Queues `text` with its top-left corner at `position`, in pixels.
    pub fn text(&mut self, position: Vec2, scale: f32, color: Vec4, text: &str) {
        for command in font::layout(text, BASE_FONT_SIZE, color) {
            self.renderer.add_command(command.placed(position, scale));
        }
    }

    /// Draws everything queued this frame.
    pub fn render(&mut self) -> Result<(), GeometryError> {
        self.renderer.flush(self.font.atlas())
    }

    /// Releases the overlay's GPU resources.
    pub fn shutdown(self) {
        log::debug!("overlay shut down");
    }
}
