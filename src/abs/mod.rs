//! This module contains the thin OpenGL wrappers the renderer is built from: window and context
//! setup, shaders, textures, geometry buffers and debug output.

pub mod debug;
pub mod geometry;
pub mod mesh;
pub mod shader;
pub mod texture;
pub mod window;

pub use geometry::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;
pub use window::*;

