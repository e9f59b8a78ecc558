pub mod bench;
pub mod chart;
pub mod cli;
pub mod elements;
pub mod parse;
pub mod sorts;
pub mod table;
pub mod ticket;

/// Logs to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Writes the collected flame spans next to the working directory.
pub fn dump_flamegraph() -> std::io::Result<()> {
    flame::dump_html(std::fs::File::create("flamegraph.html")?)
}
