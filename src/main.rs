//! exptracker main entrypoint.

use exptracker::run;
use exptracker::ui::messages::error;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("EXPTRACKER_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(e.exit_code());
    }
}
