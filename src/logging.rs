//! Stderr logger setup for the CLI.

/// Initialize the process-wide logger.
///
/// Verbose mode raises the level to Debug, otherwise only warnings
/// surface. `RUST_LOG` still overrides either. All output goes to
/// stderr so JSON on stdout stays machine-readable.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .init();
}
