use tracing_subscriber::EnvFilter;

const ENV_LOG: &str = "FLOWCTL_LOG";
const DEFAULT_DIRECTIVES: &str = "info,flowctl_runtime=debug";

/// Initialize a simple stdout tracing subscriber for development.
///
/// Filter directives come from `FLOWCTL_LOG`, falling back to
/// `info,flowctl_runtime=debug`.
pub fn init_stdout_tracing() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

/// Like [`init_stdout_tracing`], but does nothing if a global subscriber is
/// already installed. Useful in tests.
pub fn try_init_stdout_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_test_writer()
        .try_init()
        .is_ok()
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}
