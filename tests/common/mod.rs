use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static TRACING: Once = Once::new();

// Safe to call from every test; only the first call installs the subscriber.
// Output from concurrently running tests may interleave.
#[allow(dead_code)]
pub fn enable_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "transom=trace".into());

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
}
