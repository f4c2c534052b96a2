use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日誌輸出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "compact" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

fn default_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = match (verbose, level) {
            (true, _) => "innodanc_dash=debug,tower_http=debug,info".to_string(),
            (false, Some(level)) => format!("innodanc_dash={},tower_http=info", level),
            (false, None) => "innodanc_dash=info".to_string(),
        };
        EnvFilter::new(directive)
    })
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(verbose, None, LogFormat::Compact);
}

/// `level` 來自設定檔 `[logging] level`，RUST_LOG 優先
pub fn init_logger(verbose: bool, level: Option<&str>, format: LogFormat) {
    let filter = default_filter(verbose, level);

    match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init(),
        // 部署在容器中時以 JSON 輸出方便集中收集
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init(),
    }
}
