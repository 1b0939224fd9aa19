//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise `--verbose` selects debug output for
//! this crate and info for everything else.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "agent_runner=debug,info"
    } else {
        "agent_runner=info,warn"
    }
}

pub fn init_tracing(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}
