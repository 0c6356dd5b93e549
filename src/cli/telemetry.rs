use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays machine readable.
///
/// # Errors
/// Returns an error if a global subscriber is already set.
pub fn init(verbosity_level: Option<Level>, json: bool) -> Result<()> {
    // RUST_LOG=
    let env_filter = EnvFilter::builder()
        .with_default_directive(verbosity_level.unwrap_or(Level::ERROR).into())
        .from_env_lossy();

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_target(false);

        tracing::subscriber::set_global_default(
            Registry::default().with(fmt_layer).with(env_filter),
        )?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_target(false);

        tracing::subscriber::set_global_default(
            Registry::default().with(fmt_layer).with(env_filter),
        )?;
    }

    Ok(())
}
