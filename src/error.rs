//! The error type of the composition root.

use crate::{
    abs::{GeometryError, ShaderError, WindowError},
    config::ConfigError,
    entity::EntityError,
    overlay::OverlayError,
};

/// Anything that stops the application from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("window: {0}")]
    Window(#[from] WindowError),
    #[error("shader: {0}")]
    Shader(#[from] ShaderError),
    #[error("entity: {0}")]
    Entity(#[from] EntityError),
    #[error("overlay: {0}")]
    Overlay(#[from] OverlayError),
    #[error("geometry: {0}")]
    Geometry(#[from] GeometryError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}
