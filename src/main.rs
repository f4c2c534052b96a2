use clap::Parser;
use innodanc_dash::core::{ConfigProvider, DataSource};
use innodanc_dash::utils::{logger, validation::Validate};
use innodanc_dash::{
    create_router, AppState, CliConfig, DashError, Dashboard, FilterSet, SqliteSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            exit_with(&e);
        }
    };

    // 初始化日誌
    logger::init_logger(cli.verbose, config.log_level(), cli.log_format(&config));

    tracing::info!("🚀 Starting {}", config.dashboard.name);
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    // 啟動時一次載入全部資料
    let source = SqliteSource::new(config.database_path());
    let snapshot = match source.load_snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => exit_with(&e),
    };

    let dashboard = Dashboard::new(snapshot, config.chart_settings());
    let summary = dashboard.summary(&FilterSet::new());
    tracing::info!(
        "📊 {} transactions from {} students, revenue {:.0}, {} teachers",
        summary.transaction_count,
        summary.student_count,
        summary.total_revenue,
        summary.teacher_count
    );
    if let (Some(first), Some(last)) = (summary.first_order, summary.last_order) {
        tracing::info!("📅 Orders from {} to {}", first, last);
    }

    let app = create_router(
        AppState::new(dashboard, config.dashboard.name.clone()),
        config.cors_enabled(),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("🌐 Dashboard API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("⚠️ Failed to listen for shutdown signal: {}", e);
    }
}

fn exit_with(e: &DashError) -> ! {
    tracing::error!(
        "❌ Dashboard startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 啟動失敗一律非零結束
    std::process::exit(e.exit_code().max(1));
}
