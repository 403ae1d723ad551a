use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Map the `-v` count to a tracing level; zero keeps the ERROR default.
const fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize logging from the CLI verbosity count.
///
/// # Errors
///
/// Returns an error if subscriber initialization fails
pub fn init(verbosity: u8) -> Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .pretty();

    let filter = EnvFilter::builder()
        .with_default_directive(level_for(verbosity).into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("tokio=error".parse()?);

    let subscriber = Registry::default().with(fmt_layer).with(filter);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
