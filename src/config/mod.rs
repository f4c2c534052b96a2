pub mod cli;
pub mod toml_config;

pub use toml_config::DashboardConfig;

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use super::DashboardConfig;
    use crate::utils::error::Result;
    use crate::utils::logger::LogFormat;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "innodanc-dash")]
    #[command(about = "Analytics dashboard API over the studio customer database")]
    pub struct CliConfig {
        /// Path to TOML configuration file
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// SQLite database path (overrides [database] path)
        #[arg(long)]
        pub database: Option<String>,

        /// Listen address (overrides [server] bind)
        #[arg(long)]
        pub bind: Option<String>,

        /// Allow cross-origin requests from any origin
        #[arg(long)]
        pub cors: bool,

        /// Export directory (overrides [export] output_path)
        #[arg(long)]
        pub output_path: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// 讀取設定檔（若有），再套用命令列覆蓋
        pub fn resolve(&self) -> Result<DashboardConfig> {
            let mut config = match &self.config {
                Some(path) => DashboardConfig::from_file(path)?,
                None => DashboardConfig::default(),
            };
            self.apply_overrides(&mut config);
            Ok(config)
        }

        pub fn apply_overrides(&self, config: &mut DashboardConfig) {
            if let Some(database) = &self.database {
                config.database.path = database.clone();
            }
            if let Some(bind) = &self.bind {
                config.server.bind = bind.clone();
            }
            if self.cors {
                config.server.cors = Some(true);
            }
            if let Some(output_path) = &self.output_path {
                config.export.output_path = output_path.clone();
            }
        }

        pub fn log_format(&self, config: &DashboardConfig) -> LogFormat {
            if self.json_logs {
                LogFormat::Json
            } else {
                config.log_format()
            }
        }
    }

}
