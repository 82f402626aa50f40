//! netwatch binary entry point.

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use nw_core::cli::{self, Cli};
use nw_core::scheduler::CancelFlag;

fn main() {
    // Verbosity is env-driven; diagnostics go to stderr so stdout stays
    // parseable command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let cancel = CancelFlag::new();
    let requester = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || requester.request()) {
        warn!(error = %e, "could not install ctrl-c handler; cancellation unavailable");
    }

    let code = cli::run(&args, &cancel);
    std::process::exit(code.as_i32());
}
