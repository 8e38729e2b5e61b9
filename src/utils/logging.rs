use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` 기반 로깅 초기화 (기본 레벨 warn, 출력은 stderr)
pub fn init_logging() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}
