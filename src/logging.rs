use tracing::Level;

/// Warnings are always visible; verbose mode adds debug detail. Logs go to
/// stderr so piped data output stays clean.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}
