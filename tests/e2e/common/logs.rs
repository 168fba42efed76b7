use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes `tracing` output once per test binary; safe to depend on
/// from every fixture regardless of run order.
#[rstest::fixture]
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}
