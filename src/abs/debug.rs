//! OpenGL debug output.
//!
//! [`enable`] installs a debug message callback that forwards driver messages to the `log`
//! facade. It is called once by the composition root before the frame loop starts.

use glow::HasContext;

use crate::abs::Window;

/// Maps a `GL_DEBUG_SEVERITY_*` value to a log level.
pub fn severity_level(severity: u32) -> log::Level {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => log::Level::Error,
        glow::DEBUG_SEVERITY_MEDIUM => log::Level::Warn,
        glow::DEBUG_SEVERITY_LOW => log::Level::Info,
        _ => log::Level::Debug,
    }
}

fn source_name(source: u32) -> &'static str {
    match source {
        glow::DEBUG_SOURCE_API => "api",
        glow::DEBUG_SOURCE_WINDOW_SYSTEM => "window system",
        glow::DEBUG_SOURCE_SHADER_COMPILER => "shader compiler",
        glow::DEBUG_SOURCE_THIRD_PARTY => "third party",
        glow::DEBUG_SOURCE_APPLICATION => "application",
        _ => "other",
    }
}

fn type_name(kind: u32) -> &'static str {
    match kind {
        glow::DEBUG_TYPE_ERROR => "error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "deprecated behaviour",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "undefined behaviour",
        glow::DEBUG_TYPE_PORTABILITY => "portability",
        glow::DEBUG_TYPE_PERFORMANCE => "performance",
        glow::DEBUG_TYPE_MARKER => "marker",
        _ => "other",
    }
}

/// Enables synchronous debug output on the window's context.
///
/// Returns `false` if the driver has no debug output, or if the context is already shared with
/// other wrappers and so cannot be mutated.
pub fn enable(window: &mut Window) -> bool {
    let Some(gl) = std::sync::Arc::get_mut(&mut window.gl) else {
        log::warn!("GL context already shared, debug output not enabled");
        return false;
    };

    if !gl.supports_debug() {
        log::info!("GL debug output not supported by this driver");
        return false;
    }

    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(|source, kind, id, severity, message| {
            log::log!(
                target: "gl",
                severity_level(severity),
                "[{} {} {}] {}",
                source_name(source),
                type_name(kind),
                id,
                message
            );
        });
    }

    log::debug!("GL debug output enabled");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_map_to_levels() {
        assert_eq!(severity_level(glow::DEBUG_SEVERITY_HIGH), log::Level::Error);
        assert_eq!(severity_level(glow::DEBUG_SEVERITY_MEDIUM), log::Level::Warn);
        assert_eq!(severity_level(glow::DEBUG_SEVERITY_LOW), log::Level::Info);
        assert_eq!(
            severity_level(glow::DEBUG_SEVERITY_NOTIFICATION),
            log::Level::Debug
        );
    }
}
