//! Tests that need a live OpenGL context. Run them on a machine with a display:
//!
//! ```text
//! cargo test --test gl_context -- --ignored --test-threads=1
//! ```

use std::path::PathBuf;

use glow::HasContext;
use skeleton2d::{
    abs::{ShaderProgram, Texture, TextureFilter, Window},
    entity::RenderEntity,
    geometry::CpuGeometry,
};

const VERTEX: &str = "#version 330 core
layout (location = 0) in vec3 pos;
void main() { gl_Position = vec4(pos.xy, 0.0, 1.0); }
";
const FRAGMENT: &str = "#version 330 core
out vec4 color;
void main() { color = vec4(1.0); }
";

fn asset(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(path)
}

fn window() -> Window {
    Window::new(64, 64, "skeleton2d test").unwrap()
}

#[test]
#[ignore = "requires a display and an OpenGL 3.3 context"]
fn window_stays_open_until_close_is_requested() {
    let mut window = window();
    assert!(!window.should_close());

    window.poll_events();
    window.swap_buffers();
    assert!(!window.should_close());

    window.request_close();
    assert!(window.should_close());
}

#[test]
#[ignore = "requires a display and an OpenGL 3.3 context"]
fn failed_recompile_keeps_the_previous_program() {
    let window = window();
    let dir = std::env::temp_dir().join("skeleton2d-recompile");
    std::fs::create_dir_all(&dir).unwrap();
    let vertex = dir.join("test.vert");
    let fragment = dir.join("test.frag");
    std::fs::write(&vertex, VERTEX).unwrap();
    std::fs::write(&fragment, FRAGMENT).unwrap();

    let mut program = ShaderProgram::from_files(&window.gl, &vertex, &fragment).unwrap();
    let before = program.id();

    std::fs::write(&fragment, "#version 330 core\nthis is not glsl").unwrap();
    assert!(program.recompile().is_err());
    assert_eq!(program.id(), before);

    program.use_program();
    unsafe {
        assert_eq!(window.gl.get_error(), glow::NO_ERROR);
        assert_eq!(
            window.gl.get_parameter_i32(glow::CURRENT_PROGRAM) as u32,
            before.0.get()
        );
    }

    std::fs::write(&fragment, FRAGMENT).unwrap();
    assert!(program.recompile().is_ok());
}

#[test]
#[ignore = "requires a display and an OpenGL 3.3 context"]
fn program_from_sources_cannot_be_recompiled() {
    let window = window();
    let mut program = ShaderProgram::from_sources(&window.gl, VERTEX, FRAGMENT).unwrap();
    assert!(program.recompile().is_err());
    assert!(program.paths().is_none());
}

#[test]
#[ignore = "requires a display and an OpenGL 3.3 context"]
fn repeated_binds_keep_the_same_texture() {
    let window = window();
    let texture = Texture::from_file(&window.gl, asset("textures/ship.png"), TextureFilter::Nearest)
        .unwrap();
    assert_eq!(texture.dimensions(), (24, 16));

    let bound = || unsafe { window.gl.get_parameter_i32(glow::TEXTURE_BINDING_2D) as u32 };

    texture.bind();
    texture.bind();
    assert_eq!(bound(), texture.id().0.get());

    texture.unbind();
    assert_eq!(bound(), 0);
}

#[test]
#[ignore = "requires a display and an OpenGL 3.3 context"]
fn uploaded_quad_draws_six_triangle_vertices() {
    let window = window();
    let mut entity = RenderEntity::new(
        &window.gl,
        asset("textures/ship.png"),
        TextureFilter::Nearest,
    )
    .unwrap();
    entity.cgeom = CpuGeometry::quad(0.18, 0.12);
    entity.update_transform();
    entity.apply_transform();
    entity.upload();

    let call = entity.ggeom.draw_call();
    assert_eq!(call.mode, glow::TRIANGLES);
    assert_eq!(call.count, 6);

    let program = ShaderProgram::from_sources(&window.gl, VERTEX, FRAGMENT).unwrap();
    program.use_program();
    entity.draw();
    unsafe {
        assert_eq!(window.gl.get_error(), glow::NO_ERROR);
    }
}
