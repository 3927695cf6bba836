//! Logging setup
//!
//! Logs go to stderr so they never mix with command output. The level comes
//! from `RUST_LOG`, defaulting to `warn` (`debug` with `--verbose`).

use log::LevelFilter;

/// Initialize the global logger
pub fn init(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_env("RUST_LOG")
        .format_timestamp_millis()
        .init();
}
