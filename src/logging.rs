//! Logger setup.
//!
//! Output goes to stdout as `[HH:MM:SS LEVEL target] message`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Picks the level: a parseable `RUST_LOG` wins over the configured level.
pub fn resolve_level(configured: log::LevelFilter, rust_log: Option<&str>) -> log::LevelFilter {
    rust_log
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(configured)
}

/// Installs the global logger. Subsequent calls do nothing.
pub fn init(level: log::LevelFilter) {
    INIT.call_once(|| {
        let level = resolve_level(level, std::env::var("RUST_LOG").ok().as_deref());
        let result = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{} {:<5} {}] {}",
                    chrono::Local::now().format("%H:%M:%S"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(level)
            .chain(std::io::stdout())
            .apply();

        match result {
            Ok(()) => log::debug!("logging initialised at {level}"),
            Err(e) => eprintln!("failed to install logger: {e}"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_overrides_config() {
        assert_eq!(
            resolve_level(log::LevelFilter::Info, Some("trace")),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn unparseable_rust_log_is_ignored() {
        assert_eq!(
            resolve_level(log::LevelFilter::Warn, Some("skeleton2d=debug")),
            log::LevelFilter::Warn
        );
        assert_eq!(
            resolve_level(log::LevelFilter::Warn, None),
            log::LevelFilter::Warn
        );
    }
}
