use crate::utils::error::{DashError, Result};
use std::collections::HashSet;
use std::net::SocketAddr;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<SocketAddr> {
    if addr.trim().is_empty() {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: "Address cannot be empty".to_string(),
        });
    }

    addr.parse::<SocketAddr>()
        .map_err(|e| DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_allowed_values(field_name: &str, values: &[String], allowed: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed.iter().copied().collect();

    for value in values {
        if !allowed_set.contains(value.as_str()) {
            return Err(DashError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.clone(),
                reason: format!("Unsupported value. Allowed values: {}", allowed.join(", ")),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("server.bind", "127.0.0.1:8050").is_ok());
        assert!(validate_socket_addr("server.bind", "0.0.0.0:80").is_ok());
        assert!(validate_socket_addr("server.bind", "").is_err());
        assert!(validate_socket_addr("server.bind", "localhost").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("charts.teacher_trend_top", 5, 1).is_ok());
        assert!(validate_positive_number("charts.teacher_trend_top", 0, 1).is_err());
    }

    #[test]
    fn test_validate_allowed_values() {
        let formats = vec!["csv".to_string(), "json".to_string()];
        assert!(validate_allowed_values("export.output_formats", &formats, &["csv", "tsv", "json"]).is_ok());

        let invalid = vec!["xlsx".to_string()];
        assert!(validate_allowed_values("export.output_formats", &invalid, &["csv", "tsv", "json"]).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("charts.age_histogram_bins", 20, 1, 100).is_ok());
        assert!(validate_range("charts.age_histogram_bins", 0, 1, 100).is_err());
    }
}
