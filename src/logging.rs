// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "FINTRACK_LOG";
const DEFAULT_FILTER: &str = "warn";

static TRACING_INIT: Once = Once::new();

/// Installs the global subscriber once. Logs go to stderr.
///
/// Filter precedence: `FINTRACK_LOG`, `RUST_LOG`, then `fallback`
/// (usually the config file's `log_filter`), then `warn`.
pub fn init(fallback: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .or_else(|_| EnvFilter::try_new(fallback.unwrap_or(DEFAULT_FILTER)))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
