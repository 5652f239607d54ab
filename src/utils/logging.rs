use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{fmt::writer::MakeWriterExt, EnvFilter};

pub const CLI_PREFIX: &str = "cli";

fn crate_filter(log_level: Option<LevelFilter>) -> EnvFilter {
    let level = log_level
        .map(|v| v.to_string())
        .unwrap_or_else(|| std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()));

    EnvFilter::new(format!(
        "{}={level}",
        env!("CARGO_PKG_NAME").replace("-", "_"),
    ))
}

/// Logs always go to stderr, stdout is reserved for reports. When `application_data_path` is
/// present logs are also written into a rolling file inside of it.
pub fn enable_logging(
    prefix: &str,
    application_data_path: Option<&Path>,
    log_level: Option<LevelFilter>,
) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(crate_filter(log_level))
        .with_target(false);

    match application_data_path {
        Some(path) => {
            let appender = tracing_appender::rolling::Builder::new()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix(prefix)
                .build(path.join("logs"))?;
            subscriber
                .with_writer(std::io::stderr.and(appender))
                .init();
        }
        None => subscriber.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});
