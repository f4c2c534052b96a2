use clap::Parser;
use innodanc_dash::core::{ConfigProvider, DataSource};
use innodanc_dash::domain::chart::{ChartId, DemographicView};
use innodanc_dash::utils::{logger, validation::Validate};
use innodanc_dash::{
    DashboardConfig, ExportEngine, ExportPipeline, FilterSet, LocalStorage, SqliteSource,
};

#[derive(Parser)]
#[command(name = "dash-export")]
#[command(about = "Export every dashboard chart as CSV/TSV/JSON")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "dashboard.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override database path from config
    #[arg(long)]
    database: Option<String>,

    /// Override export directory from config
    #[arg(long)]
    output_path: Option<String>,

    /// Override output formats from config (comma-separated)
    #[arg(long, value_delimiter = ',')]
    formats: Option<Vec<String>>,

    /// Override ZIP compression setting from config
    #[arg(long)]
    compress: Option<bool>,

    /// Dry run - show what would be exported without writing files
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting dashboard export");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match DashboardConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    apply_overrides(&mut config, &args);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 驗證時已確認可以轉換
    let filters = config.export_filters().into_filter_set()?;

    // 顯示配置摘要
    display_config_summary(&config, &filters, &args);

    let source = SqliteSource::new(config.database_path());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        perform_dry_run(&config, &source);
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path());
    let pipeline = ExportPipeline::new(source, storage, config, filters);
    let engine = ExportEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Export completed successfully!");
            println!("✅ Export completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Export failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut DashboardConfig, args: &Args) {
    if let Some(database) = &args.database {
        config.database.path = database.clone();
        tracing::info!("🔧 Database overridden to: {}", database);
    }
    if let Some(output_path) = &args.output_path {
        config.export.output_path = output_path.clone();
        tracing::info!("🔧 Output path overridden to: {}", output_path);
    }
    if let Some(formats) = &args.formats {
        config.export.output_formats = formats.clone();
        tracing::info!("🔧 Output formats overridden to: {}", formats.join(", "));
    }
    if let Some(compress) = args.compress {
        let compression = config
            .export
            .compression
            .get_or_insert_with(|| innodanc_dash::config::toml_config::CompressionConfig {
                enabled: compress,
                filename: None,
            });
        compression.enabled = compress;
        tracing::info!("🔧 Compression overridden to: {}", compress);
    }
}

fn display_config_summary(config: &DashboardConfig, filters: &FilterSet, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Dashboard: {}", config.dashboard.name);
    println!("  Database: {}", config.database_path());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if config.compression_enabled() {
        println!("  Archive: {}", config.archive_name());
    }

    if filters.is_unrestricted() {
        println!("  Filters: none");
    } else {
        println!("  Filters: {:?}", filters);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &DashboardConfig, source: &SqliteSource) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("🗄️ Data Source Analysis:");
    println!("  Path: {}", source.path().display());
    match source.verify_tables() {
        Ok(()) => println!("  ✅ All required tables present"),
        Err(e) => println!("  ❌ {}", e.user_friendly_message()),
    }

    println!();
    println!("📊 Charts:");
    let mut slugs = Vec::new();
    for id in ChartId::ALL {
        if id == ChartId::Demographics {
            slugs.extend(
                DemographicView::ALL
                    .into_iter()
                    .map(|view| format!("{}-{}", id, view.as_str())),
            );
        } else {
            slugs.push(id.to_string());
        }
    }
    for slug in &slugs {
        println!("  {}", slug);
    }

    println!();
    println!("💾 Files:");
    let mut count = 0;
    for format in config.output_formats() {
        match format.as_str() {
            "json" => {
                println!("  charts.json");
                count += 1;
            }
            other => {
                for slug in &slugs {
                    println!("  {}.{}", slug, other);
                }
                count += slugs.len();
            }
        }
    }

    if config.compression_enabled() {
        println!("  → {} files packed into {}", count, config.archive_name());
    } else {
        println!("  → {} files written to {}", count, config.output_path());
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
