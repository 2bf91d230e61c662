//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! Programs built from files remember their paths so they can be recompiled from disk while the
//! application is running. This module also provides the [`Uniform`] trait for setting uniform
//! variables in shader programs.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use glam::Mat4;
use glow::HasContext;

/// Errors produced while building a shader program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader source {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create {0}")]
    Create(String),
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: &'static str, log: String },
    #[error("shader program failed to link:\n{0}")]
    Link(String),
    #[error("shader program was not built from files and cannot be recompiled")]
    NotReloadable,
}

fn stage_name(shader_type: u32) -> &'static str {
    match shader_type {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}

/// The vertex and fragment source text of a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    /// Reads both stages from disk.
    pub fn load(vertex_path: &Path, fragment_path: &Path) -> Result<Self, ShaderError> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        Ok(Self {
            vertex: read(vertex_path)?,
            fragment: read(fragment_path)?,
        })
    }
}

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<glow::Context>, shader_type: u32, source: &str) -> Result<Self, ShaderError> {
        unsafe {
            let shader = gl
                .create_shader(shader_type)
                .map_err(ShaderError::Create)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(ShaderError::Compile {
                    stage: stage_name(shader_type),
                    log,
                });
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Sets the value of the uniform variable in the given shader program.
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str);
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            if let Some(loc) = gl.get_uniform_location(program, name) {
                gl.uniform_1_i32(Some(&loc), *self);
            }
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            if let Some(loc) = gl.get_uniform_location(program, name) {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, &self.to_cols_array());
            }
        }
    }
}

/// Represents an OpenGL shader program built from a vertex and a fragment shader.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
    paths: Option<(PathBuf, PathBuf)>,
}

impl ShaderProgram {
    /// Reads, compiles and links a program from the two source files.
    pub fn from_files(
        gl: &Arc<glow::Context>,
        vertex_path: impl Into<PathBuf>,
        fragment_path: impl Into<PathBuf>,
    ) -> Result<Self, ShaderError> {
        let vertex_path = vertex_path.into();
        let fragment_path = fragment_path.into();
        let sources = ShaderSources::load(&vertex_path, &fragment_path)?;
        let id = link(gl, &sources)?;
        log::info!(
            "built shader program from {} and {}",
            vertex_path.display(),
            fragment_path.display()
        );

        Ok(Self {
            gl: Arc::clone(gl),
            id,
            paths: Some((vertex_path, fragment_path)),
        })
    }

    /// Compiles and links a program from embedded source text. Such a program cannot be
    /// recompiled.
    pub fn from_sources(
        gl: &Arc<glow::Context>,
        vertex: &str,
        fragment: &str,
    ) -> Result<Self, ShaderError> {
        let sources = ShaderSources {
            vertex: vertex.to_owned(),
            fragment: fragment.to_owned(),
        };
        Ok(Self {
            gl: Arc::clone(gl),
            id: link(gl, &sources)?,
            paths: None,
        })
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Re-reads both source files and relinks.
    ///
    /// On failure the error is logged and returned, and the program that was active before the
    /// call stays in place.
    pub fn recompile(&mut self) -> Result<(), ShaderError> {
        let result = self
            .paths
            .as_ref()
            .ok_or(ShaderError::NotReloadable)
            .and_then(|(vertex, fragment)| ShaderSources::load(vertex, fragment))
            .and_then(|sources| link(&self.gl, &sources));

        match result {
            Ok(id) => {
                unsafe {
                    self.gl.delete_program(self.id);
                }
                self.id = id;
                log::info!("shader program recompiled");
                Ok(())
            }
            Err(e) => {
                log::error!("shader recompile failed, keeping previous program: {e}");
                Err(e)
            }
        }
    }

    /// Returns the raw program handle.
    pub fn id(&self) -> glow::Program {
        self.id
    }

    /// Returns the vertex and fragment paths for programs built from files.
    pub fn paths(&self) -> Option<(&Path, &Path)> {
        self.paths
            .as_ref()
            .map(|(vertex, fragment)| (vertex.as_path(), fragment.as_path()))
    }

    /// Sets a uniform variable in the shader program.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        value.set_uniform(&self.gl, self.id, name);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}

fn link(gl: &Arc<glow::Context>, sources: &ShaderSources) -> Result<glow::Program, ShaderError> {
    let vertex = Shader::new(gl, glow::VERTEX_SHADER, &sources.vertex)?;
    let fragment = Shader::new(gl, glow::FRAGMENT_SHADER, &sources.fragment)?;

    unsafe {
        let program = gl.create_program().map_err(ShaderError::Create)?;
        gl.attach_shader(program, vertex.id);
        gl.attach_shader(program, fragment.id);
        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(ShaderError::Link(log));
        }

        gl.detach_shader(program, vertex.id);
        gl.detach_shader(program, fragment.id);
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_reports_the_path() {
        let dir = std::env::temp_dir().join("skeleton2d-shader-missing");
        let vertex = dir.join("nope.vert");
        let fragment = dir.join("nope.frag");

        match ShaderSources::load(&vertex, &fragment) {
            Err(ShaderError::Io { path, .. }) => assert_eq!(path, vertex),
            other => panic!("expected an io error, got {other:?}"),
        }
    }

    #[test]
    fn loads_both_stages() {
        let dir = std::env::temp_dir().join("skeleton2d-shader-load");
        std::fs::create_dir_all(&dir).unwrap();
        let vertex = dir.join("a.vert");
        let fragment = dir.join("a.frag");
        std::fs::write(&vertex, "void main() {}").unwrap();
        std::fs::write(&fragment, "out vec4 c; void main() { c = vec4(1.0); }").unwrap();

        let sources = ShaderSources::load(&vertex, &fragment).unwrap();
        assert_eq!(sources.vertex, "void main() {}");
        assert!(sources.fragment.contains("vec4(1.0)"));
    }

    #[test]
    fn stage_names() {
        assert_eq!(stage_name(glow::VERTEX_SHADER), "vertex");
        assert_eq!(stage_name(glow::FRAGMENT_SHADER), "fragment");
    }
}
