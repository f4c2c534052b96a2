use crate::core::filters::FilterParams;
use crate::core::ConfigProvider;
use crate::domain::model::ChartSettings;
use crate::utils::error::{DashError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATABASE_PATH: &str = "CustomerData.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8050";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_ARCHIVE_NAME: &str = "dashboard_export.zip";
pub const OUTPUT_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub dashboard: DashboardSection,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub export: ExportConfig,
    pub charts: Option<ChartsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSection {
    pub name: String,
    pub description: Option<String>,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            name: "Innodanc Dashboard".to_string(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATABASE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind: String,
    pub cors: Option<bool>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_addr(),
            cors: None,
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub filters: Option<FilterParams>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: default_output_formats(),
            compression: None,
            filters: None,
        }
    }
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["csv".to_string(), "json".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

/// `[charts]` 區段，未設定的欄位沿用預設上限
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartsConfig {
    pub teacher_trend_threshold: Option<usize>,
    pub teacher_trend_top: Option<usize>,
    pub heatmap_top_teachers: Option<usize>,
    pub age_histogram_bins: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl DashboardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DASH_DB_PATH})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("dashboard.name", &self.dashboard.name)?;
        validation::validate_path("database.path", &self.database.path)?;
        validation::validate_socket_addr("server.bind", &self.server.bind)?;
        validation::validate_path("export.output_path", &self.export.output_path)?;

        if self.export.output_formats.is_empty() {
            return Err(DashError::MissingConfigError {
                field: "export.output_formats".to_string(),
            });
        }
        validation::validate_allowed_values(
            "export.output_formats",
            &self.export.output_formats,
            &OUTPUT_FORMATS,
        )?;

        if let Some(compression) = &self.export.compression {
            if let Some(filename) = &compression.filename {
                validation::validate_non_empty_string("export.compression.filename", filename)?;
            }
        }

        // 匯出篩選條件要能轉成合法的 FilterSet
        if let Some(filters) = &self.export.filters {
            filters.clone().into_filter_set()?;
        }

        let charts = self.chart_settings();
        validation::validate_positive_number(
            "charts.teacher_trend_top",
            charts.teacher_trend_top,
            1,
        )?;
        validation::validate_positive_number(
            "charts.heatmap_top_teachers",
            charts.heatmap_top_teachers,
            1,
        )?;
        validation::validate_range("charts.age_histogram_bins", charts.age_histogram_bins, 1, 200)?;
        if charts.teacher_trend_top > charts.teacher_trend_threshold {
            return Err(DashError::InvalidConfigValueError {
                field: "charts.teacher_trend_top".to_string(),
                value: charts.teacher_trend_top.to_string(),
                reason: format!(
                    "Must not exceed charts.teacher_trend_threshold ({})",
                    charts.teacher_trend_threshold
                ),
            });
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if LogFormat::parse(format).is_none() {
                return Err(DashError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: "Allowed values: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn cors_enabled(&self) -> bool {
        self.server.cors.unwrap_or(false)
    }

    pub fn export_filters(&self) -> FilterParams {
        self.export.filters.clone().unwrap_or_default()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .and_then(LogFormat::parse)
            .unwrap_or_default()
    }
}

impl ConfigProvider for DashboardConfig {
    fn database_path(&self) -> &str {
        &self.database.path
    }

    fn bind_addr(&self) -> &str {
        &self.server.bind
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.export.output_formats
    }

    fn compression_enabled(&self) -> bool {
        self.export.compression.as_ref().map(|c| c.enabled).unwrap_or(true)
    }

    fn archive_name(&self) -> &str {
        self.export
            .compression
            .as_ref()
            .and_then(|c| c.filename.as_deref())
            .unwrap_or(DEFAULT_ARCHIVE_NAME)
    }

    fn chart_settings(&self) -> ChartSettings {
        let defaults = ChartSettings::default();
        let Some(charts) = &self.charts else {
            return defaults;
        };

        ChartSettings {
            teacher_trend_threshold: charts
                .teacher_trend_threshold
                .unwrap_or(defaults.teacher_trend_threshold),
            teacher_trend_top: charts.teacher_trend_top.unwrap_or(defaults.teacher_trend_top),
            heatmap_top_teachers: charts
                .heatmap_top_teachers
                .unwrap_or(defaults.heatmap_top_teachers),
            age_histogram_bins: charts.age_histogram_bins.unwrap_or(defaults.age_histogram_bins),
        }
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::DemographicView;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[dashboard]
name = "Studio Dashboard"

[database]
path = "./data/CustomerData.db"

[server]
bind = "0.0.0.0:9000"
cors = true

[export]
output_path = "./exports"
output_formats = ["csv", "tsv"]

[export.compression]
enabled = false

[export.filters]
start_date = "2024-01-01"
end_date = "2024-06-30"
cities = "台北市,新北市"
view = "age-course"

[charts]
teacher_trend_top = 3

[logging]
level = "debug"
format = "json"
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.dashboard.name, "Studio Dashboard");
        assert_eq!(config.database_path(), "./data/CustomerData.db");
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert!(config.cors_enabled());
        assert!(!config.compression_enabled());
        assert_eq!(config.output_formats(), ["csv", "tsv"]);
        assert_eq!(config.log_level(), Some("debug"));
        assert_eq!(config.log_format(), LogFormat::Json);

        let settings = config.chart_settings();
        assert_eq!(settings.teacher_trend_top, 3);
        assert_eq!(settings.teacher_trend_threshold, 10);

        let filters = config.export_filters();
        assert_eq!(filters.cities, vec!["台北市", "新北市"]);
        assert_eq!(filters.view, Some(DemographicView::AgeCourse));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();

        assert_eq!(config.database_path(), DEFAULT_DATABASE_PATH);
        assert_eq!(config.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(config.archive_name(), DEFAULT_ARCHIVE_NAME);
        assert!(config.compression_enabled());
        assert_eq!(config.chart_settings(), ChartSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_DASH_DB_PATH", "/srv/data/customers.db");

        let toml_content = r#"
[database]
path = "${TEST_DASH_DB_PATH}"
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.database.path, "/srv/data/customers.db");

        std::env::remove_var("TEST_DASH_DB_PATH");
    }

    #[test]
    fn test_config_validation() {
        let bad_format = r#"
[export]
output_path = "./output"
output_formats = ["csv", "xlsx"]
"#;
        let config = DashboardConfig::from_toml_str(bad_format).unwrap();
        assert!(config.validate().is_err());

        let bad_bind = r#"
[server]
bind = "localhost"
"#;
        let config = DashboardConfig::from_toml_str(bad_bind).unwrap();
        assert!(config.validate().is_err());

        let bad_filters = r#"
[export]
output_path = "./output"

[export.filters]
age_min = 50
age_max = 20
"#;
        let config = DashboardConfig::from_toml_str(bad_filters).unwrap();
        assert!(matches!(
            config.validate(),
            Err(DashError::InvalidFilterError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[dashboard]
name = "file-test"

[export]
output_path = "./output"
output_formats = ["json"]

[export.compression]
enabled = true
filename = "charts.zip"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = DashboardConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.dashboard.name, "file-test");
        assert_eq!(config.archive_name(), "charts.zip");
    }
}
