//! SDL2 window and OpenGL context management.
//!
//! This module defines the [`Window`] struct which owns the SDL2 window, the OpenGL context and
//! the event pump, and the [`CallbackInterface`] trait through which input events are delivered.

use std::{cell::RefCell, rc::Rc, sync::Arc};

use glow::HasContext;
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::{Keycode, Mod, Scancode},
    mouse::MouseButton,
};

/// Errors that can occur while creating the window and its OpenGL context.
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("failed to initialise SDL: {0}")]
    Init(String),
    #[error("failed to initialise the video subsystem: {0}")]
    Video(String),
    #[error("failed to build the window: {0}")]
    Build(#[from] sdl2::video::WindowBuildError),
    #[error("failed to create the OpenGL context: {0}")]
    Context(String),
    #[error("failed to create the event pump: {0}")]
    EventPump(String),
}

/// What happened to a key or mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Press,
    Release,
    Repeat,
}

/// Receives input events from [`Window::poll_events`].
///
/// Every method has an empty default so implementers only override the events they care about.
pub trait CallbackInterface {
    fn key_callback(
        &mut self,
        _key: Keycode,
        _scancode: Option<Scancode>,
        _action: Action,
        _mods: Mod,
    ) {
    }

    fn mouse_button_callback(&mut self, _button: MouseButton, _action: Action, _mods: Mod) {}

    fn cursor_pos_callback(&mut self, _x: f64, _y: f64) {}

    fn scroll_callback(&mut self, _x: f64, _y: f64) {}

    fn window_size_callback(&mut self, _width: i32, _height: i32) {}
}

/// An SDL event reduced to what the window and its callbacks act upon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Close,
    Key {
        key: Keycode,
        scancode: Option<Scancode>,
        action: Action,
        mods: Mod,
    },
    MouseButton {
        button: MouseButton,
        action: Action,
        mods: Mod,
    },
    CursorPos {
        x: f64,
        y: f64,
    },
    Scroll {
        x: f64,
        y: f64,
    },
    Resize {
        width: i32,
        height: i32,
    },
}

/// Returns the modifier state in effect after `event`. Key events carry it; everything else
/// leaves `current` unchanged.
pub fn modifiers_after(event: &Event, current: Mod) -> Mod {
    match *event {
        Event::KeyDown { keymod, .. } | Event::KeyUp { keymod, .. } => keymod,
        _ => current,
    }
}

impl InputEvent {
    /// Translates an SDL event. `mods` is the modifier state to report for mouse buttons, since
    /// SDL does not attach it to mouse events. Key events report their own `keymod`.
    pub fn translate(event: &Event, mods: Mod) -> Option<Self> {
        match *event {
            Event::Quit { .. }
            | Event::Window {
                win_event: WindowEvent::Close,
                ..
            } => Some(Self::Close),
            Event::Window {
                win_event: WindowEvent::Resized(width, height),
                ..
            } => Some(Self::Resize { width, height }),
            Event::KeyDown {
                keycode: Some(key),
                scancode,
                keymod,
                repeat,
                ..
            } => Some(Self::Key {
                key,
                scancode,
                action: if repeat { Action::Repeat } else { Action::Press },
                mods: keymod,
            }),
            Event::KeyUp {
                keycode: Some(key),
                scancode,
                keymod,
                ..
            } => Some(Self::Key {
                key,
                scancode,
                action: Action::Release,
                mods: keymod,
            }),
            Event::MouseButtonDown { mouse_btn, .. } => Some(Self::MouseButton {
                button: mouse_btn,
                action: Action::Press,
                mods,
            }),
            Event::MouseButtonUp { mouse_btn, .. } => Some(Self::MouseButton {
                button: mouse_btn,
                action: Action::Release,
                mods,
            }),
            Event::MouseMotion { x, y, .. } => Some(Self::CursorPos {
                x: x as f64,
                y: y as f64,
            }),
            Event::MouseWheel { x, y, .. } => Some(Self::Scroll {
                x: x as f64,
                y: y as f64,
            }),
            _ => None,
        }
    }
}

/// The [`Window`] struct encapsulates the SDL2 window and the OpenGL context.
///
/// Fields drop in declaration order, so the callbacks (which may own GL objects) go before the
/// context they were created on.
pub struct Window {
    callbacks: Option<Rc<RefCell<dyn CallbackInterface>>>,
    should_close: bool,
    mods: Mod,
    event_pump: sdl2::EventPump,
    pub gl: Arc<glow::Context>,
    pub gl_context: sdl2::video::GLContext,
    pub window: sdl2::video::Window,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub sdl: sdl2::Sdl,
}

impl Window {
    /// Creates a window of the given size with a current OpenGL 3.3 core context.
    pub fn new(width: u32, height: u32, title: &str) -> Result<Self, WindowError> {
        let sdl = sdl2::init().map_err(WindowError::Init)?;
        let video_subsystem = sdl.video().map_err(WindowError::Video)?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_context_flags().debug().set();
        gl_attr.set_framebuffer_srgb_compatible(true);

        let window = video_subsystem
            .window(title, width, height)
            .opengl()
            .resizable()
            .build()?;
        let gl_context = window.gl_create_context().map_err(WindowError::Context)?;
        window
            .gl_make_current(&gl_context)
            .map_err(WindowError::Context)?;
        if let Err(e) = video_subsystem.gl_set_swap_interval(sdl2::video::SwapInterval::VSync) {
            log::warn!("vsync unavailable: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump().map_err(WindowError::EventPump)?;

        log::info!("created {width}x{height} window \"{title}\"");

        Ok(Self {
            callbacks: None,
            should_close: false,
            mods: Mod::NOMOD,
            event_pump,
            gl: Arc::new(gl),
            gl_context,
            window,
            video_subsystem,
            sdl,
        })
    }

    /// Installs the input handler, replacing any previous one.
    pub fn set_callbacks(&mut self, callbacks: Rc<RefCell<dyn CallbackInterface>>) {
        self.callbacks = Some(callbacks);
    }

    /// Returns true once the user has asked the window to close.
    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Marks the window as closing; the frame loop exits before its next iteration.
    pub fn request_close(&mut self) {
        self.should_close = true;
    }

    /// Presents the current frame.
    pub fn swap_buffers(&self) {
        self.window.gl_swap_window();
    }

    /// Returns the drawable width in pixels.
    pub fn width(&self) -> u32 {
        self.window.drawable_size().0
    }

    /// Returns the drawable height in pixels.
    pub fn height(&self) -> u32 {
        self.window.drawable_size().1
    }

    /// Drains pending SDL events and dispatches them to the installed callbacks.
    ///
    /// Mouse buttons report the modifiers of the most recent key event before them, so a click
    /// that follows a shift press in the same batch sees shift held.
    pub fn poll_events(&mut self) {
        let mut mods = self.mods;
        let events: Vec<InputEvent> = self
            .event_pump
            .poll_iter()
            .filter_map(|event| {
                mods = modifiers_after(&event, mods);
                InputEvent::translate(&event, mods)
            })
            .collect();
        self.mods = mods;

        for event in events {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::Close => {
                log::debug!("close requested");
                self.should_close = true;
                return;
            }
            InputEvent::Resize { width, height } => unsafe {
                self.gl.viewport(0, 0, width, height);
            },
            _ => {}
        }

        let Some(callbacks) = &self.callbacks else {
            return;
        };
        let mut callbacks = callbacks.borrow_mut();
        match event {
            InputEvent::Key {
                key,
                scancode,
                action,
                mods,
            } => callbacks.key_callback(key, scancode, action, mods),
            InputEvent::MouseButton {
                button,
                action,
                mods,
            } => callbacks.mouse_button_callback(button, action, mods),
            InputEvent::CursorPos { x, y } => callbacks.cursor_pos_callback(x, y),
            InputEvent::Scroll { x, y } => callbacks.scroll_callback(x, y),
            InputEvent::Resize { width, height } => callbacks.window_size_callback(width, height),
            InputEvent::Close => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_down(keycode: Keycode, scancode: Scancode, keymod: Mod, repeat: bool) -> Event {
        Event::KeyDown {
            timestamp: 0,
            window_id: 1,
            keycode: Some(keycode),
            scancode: Some(scancode),
            keymod,
            repeat,
        }
    }

    fn key_up(keycode: Keycode, scancode: Scancode, keymod: Mod) -> Event {
        Event::KeyUp {
            timestamp: 0,
            window_id: 1,
            keycode: Some(keycode),
            scancode: Some(scancode),
            keymod,
            repeat: false,
        }
    }

    fn mouse_down(mouse_btn: MouseButton) -> Event {
        Event::MouseButtonDown {
            timestamp: 0,
            window_id: 1,
            which: 0,
            mouse_btn,
            clicks: 1,
            x: 10,
            y: 20,
        }
    }

    fn mouse_up(mouse_btn: MouseButton) -> Event {
        Event::MouseButtonUp {
            timestamp: 0,
            window_id: 1,
            which: 0,
            mouse_btn,
            clicks: 1,
            x: 10,
            y: 20,
        }
    }

    fn key_action(event: &Event) -> Option<Action> {
        match InputEvent::translate(event, Mod::NOMOD) {
            Some(InputEvent::Key { action, .. }) => Some(action),
            _ => None,
        }
    }

    #[test]
    fn quit_and_window_close_are_close_requests() {
        let quit = Event::Quit { timestamp: 0 };
        assert_eq!(
            InputEvent::translate(&quit, Mod::NOMOD),
            Some(InputEvent::Close)
        );

        let close = Event::Window {
            timestamp: 0,
            window_id: 1,
            win_event: WindowEvent::Close,
        };
        assert_eq!(
            InputEvent::translate(&close, Mod::NOMOD),
            Some(InputEvent::Close)
        );
    }

    #[test]
    fn other_window_events_do_not_close() {
        let focus = Event::Window {
            timestamp: 0,
            window_id: 1,
            win_event: WindowEvent::FocusGained,
        };
        assert_eq!(InputEvent::translate(&focus, Mod::NOMOD), None);

        let resized = Event::Window {
            timestamp: 0,
            window_id: 1,
            win_event: WindowEvent::Resized(640, 480),
        };
        assert_eq!(
            InputEvent::translate(&resized, Mod::NOMOD),
            Some(InputEvent::Resize {
                width: 640,
                height: 480
            })
        );
    }

    #[test]
    fn first_key_down_is_a_press() {
        let event = key_down(Keycode::R, Scancode::R, Mod::LSHIFTMOD, false);
        assert_eq!(
            InputEvent::translate(&event, Mod::NOMOD),
            Some(InputEvent::Key {
                key: Keycode::R,
                scancode: Some(Scancode::R),
                action: Action::Press,
                mods: Mod::LSHIFTMOD,
            })
        );
    }

    #[test]
    fn held_key_down_is_a_repeat() {
        let event = key_down(Keycode::R, Scancode::R, Mod::NOMOD, true);
        assert_eq!(key_action(&event), Some(Action::Repeat));
    }

    #[test]
    fn key_up_is_a_release() {
        let event = key_up(Keycode::R, Scancode::R, Mod::NOMOD);
        assert_eq!(key_action(&event), Some(Action::Release));
    }

    #[test]
    fn mouse_buttons_press_and_release() {
        assert_eq!(
            InputEvent::translate(&mouse_down(MouseButton::Left), Mod::LCTRLMOD),
            Some(InputEvent::MouseButton {
                button: MouseButton::Left,
                action: Action::Press,
                mods: Mod::LCTRLMOD,
            })
        );
        assert_eq!(
            InputEvent::translate(&mouse_up(MouseButton::Right), Mod::NOMOD),
            Some(InputEvent::MouseButton {
                button: MouseButton::Right,
                action: Action::Release,
                mods: Mod::NOMOD,
            })
        );
    }

    #[test]
    fn clicks_see_modifiers_from_earlier_key_events() {
        let batch = [
            key_down(Keycode::LShift, Scancode::LShift, Mod::LSHIFTMOD, false),
            mouse_down(MouseButton::Left),
            key_up(Keycode::LShift, Scancode::LShift, Mod::NOMOD),
            mouse_up(MouseButton::Left),
        ];

        let mut mods = Mod::NOMOD;
        let mouse_mods: Vec<Mod> = batch
            .iter()
            .filter_map(|event| {
                mods = modifiers_after(event, mods);
                match InputEvent::translate(event, mods) {
                    Some(InputEvent::MouseButton { mods, .. }) => Some(mods),
                    _ => None,
                }
            })
            .collect();

        assert_eq!(mouse_mods, vec![Mod::LSHIFTMOD, Mod::NOMOD]);
    }
}
