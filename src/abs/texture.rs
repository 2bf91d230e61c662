//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU representation of a GPU texture.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use glow::HasContext;
use image::GenericImageView;

/// Errors produced while loading or uploading a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load image {path}: {source}")]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("expected {expected} bytes of RGBA data, got {actual}")]
    DataSize { expected: usize, actual: usize },
    #[error("failed to create texture: {0}")]
    Create(String),
}

/// The sampling filter used for both minification and magnification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFilter {
    /// Looks best for low resolution pixel art.
    #[default]
    Nearest,
    Linear,
}

impl TextureFilter {
    /// Returns the matching OpenGL filter enum.
    pub fn gl_enum(self) -> u32 {
        match self {
            Self::Nearest => glow::NEAREST,
            Self::Linear => glow::LINEAR,
        }
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
    filter: TextureFilter,
    path: Option<PathBuf>,
    width: u32,
    height: u32,
}

impl Texture {
    /// Loads an image file and uploads it.
    ///
    /// The image is flipped vertically so that `v = 1` samples the top row.
    pub fn from_file(
        gl: &Arc<glow::Context>,
        path: impl AsRef<Path>,
        filter: TextureFilter,
    ) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TextureError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let (width, height) = image.dimensions();
        let data = image.flipv().to_rgba8().into_raw();

        let mut texture = Self::from_rgba(gl, width, height, &data, filter)?;
        texture.path = Some(path.to_path_buf());
        log::debug!("loaded {}x{} texture {}", width, height, path.display());
        Ok(texture)
    }

    /// Creates a new texture from the given raw RGBA data.
    pub fn from_rgba(
        gl: &Arc<glow::Context>,
        width: u32,
        height: u32,
        data: &[u8],
        filter: TextureFilter,
    ) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(TextureError::DataSize {
                expected,
                actual: data.len(),
            });
        }

        unsafe {
            let texture = gl.create_texture().map_err(TextureError::Create)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(data)),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                filter.gl_enum() as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                filter.gl_enum() as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
                filter,
                path: None,
                width,
                height,
            })
        }
    }

    /// Binds the texture to texture unit 0.
    pub fn bind(&self) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }

    /// Clears the texture binding of unit 0.
    pub fn unbind(&self) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0);
            self.gl.bind_texture(glow::TEXTURE_2D, None);
        }
    }

    /// Returns the raw texture handle.
    pub fn id(&self) -> glow::Texture {
        self.id
    }

    pub fn filter(&self) -> TextureFilter {
        self.filter
    }

    /// Returns the file the texture was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_maps_to_gl() {
        assert_eq!(TextureFilter::Nearest.gl_enum(), glow::NEAREST);
        assert_eq!(TextureFilter::Linear.gl_enum(), glow::LINEAR);
    }

    #[test]
    fn filter_parses_from_lowercase() {
        let filter: TextureFilter = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(filter, TextureFilter::Linear);
    }
}
