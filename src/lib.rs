//! A starter template for 2D OpenGL assignments: a window, a hot-reloadable shader, two textured
//! quads and a debug text overlay.

pub mod abs;
pub mod app;
pub mod callbacks;
pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod overlay;
