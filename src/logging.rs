use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// How the embedding application wants engine logs emitted. The engine only
/// emits `tracing` events; initializing a subscriber is the host's call, this
/// helper covers the common stdout / rolling-json-file setup.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
        }
    }
}

/// Install a global subscriber. Safe to call more than once: an
/// already-installed subscriber is tolerated (tests, embedding hosts that
/// bring their own), any other init failure is a hard configuration error.
pub fn init_tracing(config: &LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_target(true));

    let result = if config.enable_file_logs {
        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("revision-engine")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&config.log_dir)
            .expect("Failed to create rolling file appender");
        registry
            .with(fmt::layer().with_writer(file_appender).with_ansi(false).json())
            .try_init()
    } else {
        registry.try_init()
    };

    if let Err(e) = result {
        if !e.to_string().contains("already been set") {
            panic!("Failed to initialize tracing: {e}");
        }
    }
}
