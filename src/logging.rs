//! Process-wide tracing subscriber

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber with the given filter (e.g. "info", "cyclestrong_lib=debug").
///
/// Logs go to stderr so command output on stdout stays machine-readable.
/// Safe to call more than once; later calls are ignored.
pub fn init(filter: &str) {
  let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}
