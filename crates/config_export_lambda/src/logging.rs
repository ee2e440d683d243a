//! JSON log output gated by the configured `LOG_LEVEL`.

use config_export_core::config::LogLevel;
use lambda_runtime::tracing;
use lambda_runtime::tracing::subscriber::fmt::MakeWriter;

pub fn tracing_level(level: LogLevel) -> tracing::Level {
    match level {
        LogLevel::Trace => tracing::Level::TRACE,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Warning => tracing::Level::WARN,
        LogLevel::Error => tracing::Level::ERROR,
    }
}

/// One JSON object per line on `writer`; events below `level` are dropped.
pub fn json_subscriber<W>(
    level: LogLevel,
    writer: W,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing::subscriber::fmt()
        .json()
        .with_max_level(tracing_level(level))
        .with_target(false)
        .without_time()
        .with_writer(writer)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_log_level() {
        assert_eq!(tracing_level(LogLevel::Trace), tracing::Level::TRACE);
        assert_eq!(tracing_level(LogLevel::Debug), tracing::Level::DEBUG);
        assert_eq!(tracing_level(LogLevel::Warning), tracing::Level::WARN);
        assert_eq!(tracing_level(LogLevel::Error), tracing::Level::ERROR);
        assert_eq!(tracing_level(LogLevel::default()), tracing::Level::INFO);
    }
}
