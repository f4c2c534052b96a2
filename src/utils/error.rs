use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing tables in database: {}", tables.join(", "))]
    MissingTablesError { tables: Vec<String> },

    #[error("No data was retrieved from the database: {dataset}")]
    EmptyDatasetError { dataset: String },

    #[error("Cannot parse date '{value}' in column {column}")]
    DateParseError { column: String, value: String },

    #[error("Invalid filter '{field}': {reason}")]
    InvalidFilterError { field: String, reason: String },

    #[error("Unknown chart: {name}")]
    UnknownChartError { name: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Database,
    Input,
    Configuration,
    Output,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashError::SqliteError(_)
            | DashError::MissingTablesError { .. }
            | DashError::EmptyDatasetError { .. }
            | DashError::DateParseError { .. } => ErrorCategory::Database,
            DashError::InvalidFilterError { .. } | DashError::UnknownChartError { .. } => {
                ErrorCategory::Input
            }
            DashError::ConfigValidationError { .. }
            | DashError::MissingConfigError { .. }
            | DashError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            DashError::ZipError(_)
            | DashError::CsvError(_)
            | DashError::IoError(_)
            | DashError::SerializationError(_) => ErrorCategory::Output,
            DashError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DashError::InvalidFilterError { .. } | DashError::UnknownChartError { .. } => {
                ErrorSeverity::Low
            }
            DashError::IoError(_) | DashError::ZipError(_) | DashError::CsvError(_) => {
                ErrorSeverity::Medium
            }
            DashError::SerializationError(_)
            | DashError::ConfigValidationError { .. }
            | DashError::MissingConfigError { .. }
            | DashError::InvalidConfigValueError { .. }
            | DashError::ProcessingError { .. } => ErrorSeverity::High,
            DashError::SqliteError(_)
            | DashError::MissingTablesError { .. }
            | DashError::EmptyDatasetError { .. }
            | DashError::DateParseError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DashError::SqliteError(_) => {
                "Check that the database path exists and is a readable SQLite file".to_string()
            }
            DashError::MissingTablesError { tables } => format!(
                "Import the missing tables ({}) into the database before starting",
                tables.join(", ")
            ),
            DashError::EmptyDatasetError { dataset } => {
                format!("Make sure the {} tables contain rows", dataset)
            }
            DashError::DateParseError { column, .. } => {
                format!("Store {} as YYYY-MM-DD or YYYY-MM-DD HH:MM:SS text", column)
            }
            DashError::InvalidFilterError { field, .. } => {
                format!("Correct the '{}' filter value and retry", field)
            }
            DashError::UnknownChartError { .. } => {
                "Use one of: monthly-revenue, booking-heatmap, demographics, teacher-class-trend, teacher-student-heatmap".to_string()
            }
            DashError::ConfigValidationError { field, .. }
            | DashError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting in the configuration file", field)
            }
            DashError::MissingConfigError { field } => {
                format!("Add the '{}' setting to the configuration file", field)
            }
            DashError::IoError(_) | DashError::ZipError(_) => {
                "Check that the output directory is writable and has free space".to_string()
            }
            DashError::CsvError(_) | DashError::SerializationError(_) => {
                "Re-run the export; if it keeps failing report the chart that broke".to_string()
            }
            DashError::ProcessingError { .. } => {
                "Inspect the source rows for unexpected values".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Database => format!("Could not load dashboard data: {}", self),
            ErrorCategory::Input => format!("Invalid request: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Output => format!("Could not write output: {}", self),
            ErrorCategory::Processing => format!("Could not build charts: {}", self),
        }
    }

    /// 依嚴重程度決定的程序退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub(crate) fn invalid_filter(field: &str, reason: impl Into<String>) -> Self {
        DashError::InvalidFilterError {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tables_message_lists_tables() {
        let err = DashError::MissingTablesError {
            tables: vec!["course_student".to_string(), "student_basic".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing tables in database: course_student, student_basic"
        );
        assert_eq!(err.category(), ErrorCategory::Database);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_filter_errors_are_low_severity() {
        let err = DashError::invalid_filter("age_min", "must not exceed age_max");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.exit_code(), 0);
        assert!(err.user_friendly_message().starts_with("Invalid request"));
    }
}
