//! The composition root: builds the window, shader, entities and overlay, then runs the frame
//! loop until the window is closed.

use std::{cell::RefCell, rc::Rc};

use glam::{Vec2, Vec4};
use glow::HasContext;

use crate::{
    abs::{ShaderProgram, Window, debug},
    callbacks::SkeletonCallbacks,
    config::AppConfig,
    entity::RenderEntity,
    error::AppError,
    geometry::CpuGeometry,
    overlay::Overlay,
};

const SCORE_POSITION: Vec2 = Vec2::new(5.0, 5.0);
const SCORE_SCALE: f32 = 1.5;

/// Creates everything and runs the frame loop. Returns once the window has been closed.
pub fn run(config: &AppConfig) -> Result<(), AppError> {
    log::debug!("starting");

    let mut window = Window::new(
        config.window.width,
        config.window.height,
        &config.window.title,
    )?;

    // Must happen before the context is shared with any wrapper.
    debug::enable(&mut window);
    let gl = window.gl.clone();

    let shader = Rc::new(RefCell::new(ShaderProgram::from_files(
        &gl,
        &config.shaders.vertex,
        &config.shaders.fragment,
    )?));
    window.set_callbacks(Rc::new(RefCell::new(SkeletonCallbacks::new(Rc::clone(
        &shader,
    )))));

    let mut ship = RenderEntity::new(&gl, &config.textures.ship, config.textures.filter)?;
    let mut diamond = RenderEntity::new(&gl, &config.textures.diamond, config.textures.filter)?;

    ship.cgeom = CpuGeometry::quad(0.18, 0.12);
    diamond.cgeom = CpuGeometry::quad(0.10, 0.10);

    ship.update_transform();
    ship.apply_transform();

    ship.upload();
    diamond.upload();

    let mut overlay = Overlay::new(&gl)?;
    let entities = [&ship, &diamond];

    while !window.should_close() {
        // Placeholder until the game tracks a real score.
        let score = 0;
        window.poll_events();

        shader.borrow().use_program();

        unsafe {
            gl.enable(glow::FRAMEBUFFER_SRGB);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        for entity in entities {
            entity.draw();
        }

        // Overlay colours are already in display space.
        unsafe {
            gl.disable(glow::FRAMEBUFFER_SRGB);
        }

        overlay.begin_frame(window.width(), window.height());
        overlay.text(
            SCORE_POSITION,
            SCORE_SCALE,
            Vec4::ONE,
            &format!("Score: {score}"),
        );
        overlay.render()?;

        window.swap_buffers();
    }

    overlay.shutdown();
    log::info!("window closed, shutting down");
    Ok(())
}
