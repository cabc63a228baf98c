use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber. `--verbose` forces debug output for this
/// crate, otherwise `RUST_LOG` applies with a `warn` fallback.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("allure_md=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
