//! Test logging
//!
//! One-time tracing initialisation so test runs honour `RUST_LOG` the way
//! the services do. Safe to call from every test; only the first call
//! installs the subscriber.

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static INIT: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

/// Initialises tracing for tests, once per process
pub fn init_test_tracing() {
    Lazy::force(&INIT);
}
