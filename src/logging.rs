//! Process-wide logger bootstrap.
//!
//! The crate logs through the `log` facade. Embedding applications may install
//! their own logger; `init_logging` is for callers that want the stock
//! `env_logger` output. `RUST_LOG` overrides the default filter.

use std::sync::OnceLock;

use env_logger::Env;

static LOGGER_INSTALLED: OnceLock<bool> = OnceLock::new();

/// Install `env_logger` once per process.
///
/// Returns `true` if this crate's logger is active. Returns `false` when
/// another logger was already registered by the host; later calls report the
/// outcome of the first one and never panic.
pub fn init_logging(default_filter: &str) -> bool {
    *LOGGER_INSTALLED.get_or_init(|| {
        let installed = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
            .format_timestamp_millis()
            .try_init()
            .is_ok();
        if installed {
            log::debug!("Logging initialized (default filter `{}`)", default_filter);
        }
        installed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let first = init_logging("debug");
        let second = init_logging("trace");
        assert_eq!(first, second);
    }
}
