//! Logging initialization utilities.

use env_logger::Env;

/// Initialize logging. `RUST_LOG` wins over the level picked here.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = Env::default().default_filter_or(default_level);
    // Tests may initialize more than once.
    let _ = env_logger::Builder::from_env(env)
        .format_target(false)
        .try_init();
}
