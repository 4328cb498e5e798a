//! TestUp CLI entry point

fn main() {
    // Warnings are the diagnostic channel; keep stdout for listings and summaries
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    testup::cli::run();
}
