use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the console subscriber. `RUST_LOG` wins over `base_level`.
///
/// Reports go to stdout, so log lines are written to stderr.
pub fn setup_logging(base_level: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(base_level))?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init()?;
    Ok(())
}
