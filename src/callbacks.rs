//! The example input handler.

use std::{cell::RefCell, rc::Rc};

use sdl2::{
    keyboard::{Keycode, Mod, Scancode},
    mouse::MouseButton,
};

use crate::abs::{Action, CallbackInterface, ShaderProgram};

/// Returns true for the key event that reloads the shader: a fresh press of `R`. Held-key
/// repeats and releases are ignored.
pub fn recompiles_on(key: Keycode, action: Action) -> bool {
    key == Keycode::R && action == Action::Press
}

/// Recompiles the scene shader when `R` is pressed and logs left mouse button presses and
/// releases.
pub struct SkeletonCallbacks {
    shader: Rc<RefCell<ShaderProgram>>,
}

impl SkeletonCallbacks {
    pub fn new(shader: Rc<RefCell<ShaderProgram>>) -> Self {
        Self { shader }
    }
}

impl CallbackInterface for SkeletonCallbacks {
    fn key_callback(
        &mut self,
        key: Keycode,
        _scancode: Option<Scancode>,
        action: Action,
        _mods: Mod,
    ) {
        if recompiles_on(key, action) {
            // Failures are logged by recompile; the old program keeps drawing.
            let _ = self.shader.borrow_mut().recompile();
        }
    }

    fn mouse_button_callback(&mut self, button: MouseButton, action: Action, _mods: Mod) {
        if button != MouseButton::Left {
            return;
        }
        match action {
            Action::Press => log::info!("Left mouse button has been pressed"),
            Action::Release => log::info!("Left mouse button has been released"),
            Action::Repeat => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_fresh_r_press_recompiles() {
        assert!(recompiles_on(Keycode::R, Action::Press));
        assert!(!recompiles_on(Keycode::R, Action::Repeat));
        assert!(!recompiles_on(Keycode::R, Action::Release));
        assert!(!recompiles_on(Keycode::T, Action::Press));
    }
}
