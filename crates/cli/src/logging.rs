// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log setup; artifacts go to stdout, so logs go to stderr

/// Level used when `RUST_LOG` is not set
pub fn default_directive(verbose: bool, debug: bool) -> &'static str {
    if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    }
}

pub fn init(verbose: bool, debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, debug)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(debug)
                .without_time(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_wins_over_verbose() {
        assert_eq!(default_directive(false, false), "warn");
        assert_eq!(default_directive(true, false), "info");
        assert_eq!(default_directive(true, true), "debug");
    }
}
