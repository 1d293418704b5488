//! Test helpers: one-time log setup and a shared sample tree.

use std::env;
use std::sync::Once;

use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{ItemId, ParentId, TreeItem};

static TEST_SETUP: Once = Once::new();

/// Install the test logging subscriber once per process.
///
/// `RUST_LOG` wins when set, otherwise only this crate logs at debug.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let env_filter = match env::var("RUST_LOG") {
            Ok(directives) => EnvFilter::new(directives),
            Err(_) => EnvFilter::new("treegrid=debug"),
        };

        let layer = fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter);

        // another test binary helper may already own the global subscriber
        if tracing_subscriber::registry().with(layer).try_init().is_ok() {
            info!("test logging ready");
        }
    });
}

/// Four labeled items:
///
/// ```text
/// 1 (A)
/// ├── 2 (B)
/// │   └── 4 (D)
/// └── 3 (C)
/// ```
pub fn sample_items() -> Vec<TreeItem> {
    vec![
        TreeItem::labeled(1, ParentId::Root, "A"),
        TreeItem::labeled(2, ItemId::from(1), "B"),
        TreeItem::labeled(3, ItemId::from(1), "C"),
        TreeItem::labeled(4, ItemId::from(2), "D"),
    ]
}
