//! Diagnostics for the canvas engine, the exporter and the CLI.
//!
//! Logs are written to stderr so command output on stdout (a preference value,
//! an export report) stays pipeable.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much the CLI should log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Export and session milestones.
    #[default]
    Normal,
    /// Per-stroke and per-record detail.
    Verbose,
    /// Everything, including codec internals.
    Trace,
}

impl Verbosity {
    /// Derive the verbosity from a `-v` count and a `-q` flag; quiet wins.
    #[must_use]
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// The level this verbosity lets through for compendium's own targets.
    #[must_use]
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::ERROR,
            Self::Normal => LevelFilter::INFO,
            Self::Verbose => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }

    /// Filter directives used when `RUST_LOG` is unset.
    ///
    /// Dependencies stay at `warn` unless tracing everything.
    #[must_use]
    pub fn directives(self) -> String {
        let (deps, own) = match self {
            Self::Quiet => ("warn", "error"),
            Self::Normal => ("warn", "info"),
            Self::Verbose => ("warn", "debug"),
            Self::Trace => ("trace", "trace"),
        };
        format!("{deps},compendium={own}")
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `verbosity`. Calling this more than once
/// is harmless; later calls are ignored.
///
/// # Examples
///
/// ```no_run
/// use compendium::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(1, false));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= Verbosity::Verbose)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init();
}

/// Route warnings from code under test to the test harness output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("compendium=warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Verbosity::from_flags(0, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(1, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(2, false), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(7, false), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(2, true), Verbosity::Quiet);
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(Verbosity::Quiet.level_filter(), LevelFilter::ERROR);
        assert_eq!(Verbosity::Normal.level_filter(), LevelFilter::INFO);
        assert_eq!(Verbosity::Verbose.level_filter(), LevelFilter::DEBUG);
        assert_eq!(Verbosity::Trace.level_filter(), LevelFilter::TRACE);
    }

    #[test]
    fn test_directives_keep_dependencies_quiet() {
        assert_eq!(Verbosity::Quiet.directives(), "warn,compendium=error");
        assert_eq!(Verbosity::Normal.directives(), "warn,compendium=info");
        assert_eq!(Verbosity::Verbose.directives(), "warn,compendium=debug");
        assert_eq!(Verbosity::Trace.directives(), "trace,compendium=trace");
    }

    #[test]
    fn test_init_logging_is_repeatable() {
        init_test_logging();
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Trace);
    }
}
