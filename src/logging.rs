// ── Diagnostics ───────────────────────────────────────────────────────────────
//
// `tracing` events go to stderr so they never interleave with the console
// front end's screen on stdout.  `RUST_LOG` wins over the settings file.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.  Safe to call more than once; only the
/// first call takes effect.
pub(crate) fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

/// Parse a settings-file directive, falling back to `info` if it is invalid.
fn filter_for(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("ignoring invalid log_level {directive:?}: {e}");
        EnvFilter::new("info")
    })
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::{filter::LevelFilter, Layer, Registry};

    use super::*;

    fn hint(filter: &EnvFilter) -> Option<LevelFilter> {
        <EnvFilter as Layer<Registry>>::max_level_hint(filter)
    }

    #[test]
    fn valid_directive_is_kept() {
        assert_eq!(hint(&filter_for("debug")), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn invalid_directive_falls_back_to_info() {
        assert_eq!(hint(&filter_for("app=notalevel")), Some(LevelFilter::INFO));
    }

    #[test]
    fn init_twice_does_not_panic() {
        init("warn");
        init("debug");
    }
}
