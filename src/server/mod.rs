//! HTTP/JSON interface over the dashboard.
//!
//! Every handler reads the shared snapshot and recomputes its chart on the
//! request path; nothing is cached between requests.

pub mod error;
pub mod routes;

pub use error::{AppError, ErrorResponse};
pub use routes::HealthResponse;

use crate::core::dashboard::Dashboard;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub name: String,
}

impl AppState {
    pub fn new(dashboard: Dashboard, name: impl Into<String>) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
            name: name.into(),
        }
    }
}

pub fn create_router(state: AppState, cors: bool) -> Router {
    let router = Router::new()
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http());

    let router = if cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{Chart, ChartData, ChartId, NO_DATA_MESSAGE};
    use crate::domain::model::{
        ChartSettings, CourseType, DemographicRow, Snapshot, TeacherSessionRow, TransactionRow,
    };
    use crate::domain::report::Summary;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::NaiveDate;
    use tower::ServiceExt;

    fn at(y: i32, m: u32, d: u32) -> Option<chrono::NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|date| date.and_hms_opt(9, 30, 0))
    }

    fn transaction(id: u32, student: &str, date: Option<chrono::NaiveDateTime>, amount: f64) -> TransactionRow {
        TransactionRow {
            transaction_id: Some(id.to_string()),
            student_id: Some(student.to_string()),
            order_date: date,
            customer_age: Some(28),
            customer_gender: Some("F".to_string()),
            city: Some("台北市".to_string()),
            region: Some("信義區".to_string()),
            course_type_name: Some("舞蹈".to_string()),
            amount,
        }
    }

    fn test_app() -> Router {
        let snapshot = Snapshot::new(
            vec![
                transaction(1, "S1", at(2024, 1, 8), 1200.0),
                transaction(2, "S1", at(2024, 2, 12), 1800.0),
                transaction(3, "S2", at(2024, 2, 14), 600.0),
            ],
            vec![DemographicRow {
                student_id: "S1".to_string(),
                age: Some(28),
                gender: "F".to_string(),
                city: Some("台北市".to_string()),
                learning_area: "信義區".to_string(),
                course_type_id: Some(3),
                course_type: CourseType::from_id(3),
            }],
            vec![TeacherSessionRow {
                teacher_id: Some("T1".to_string()),
                teacher_name: "Amy Lin".to_string(),
                student_id: Some("S1".to_string()),
                student_gender: "F".to_string(),
                student_age: Some(28),
                learning_city: Some("台北市".to_string()),
                learning_area: "信義區".to_string(),
                course_date: at(2024, 1, 9),
            }],
        );

        let dashboard = Dashboard::new(snapshot, ChartSettings::default());
        create_router(AppState::new(dashboard, "Test Dashboard"), false)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health_reports_row_counts() {
        let (status, body) = get(test_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);

        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.rows.transactions, 3);
        assert_eq!(health.rows.teacher_sessions, 1);
    }

    #[tokio::test]
    async fn test_summary_respects_date_filter() {
        let (status, body) = get(
            test_app(),
            "/api/summary?start_date=2024-02-01&end_date=2024-02-29",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let summary: Summary = serde_json::from_slice(&body).unwrap();
        assert_eq!(summary.transaction_count, 2);
        assert_eq!(summary.total_revenue, 2400.0);
        assert_eq!(summary.student_count, 2);
    }

    #[tokio::test]
    async fn test_single_chart_and_unknown_chart() {
        let (status, body) = get(test_app(), "/api/charts/monthly-revenue").await;
        assert_eq!(status, StatusCode::OK);
        let chart: Chart = serde_json::from_slice(&body).unwrap();
        assert_eq!(chart.id, ChartId::MonthlyRevenue);
        assert_eq!(chart.series()[0].labels, vec!["2024-01", "2024-02"]);

        let (status, body) = get(test_app(), "/api/charts/sales-funnel").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_filters_are_bad_requests() {
        for uri in [
            "/api/charts?age_min=60&age_max=20",
            "/api/charts?start_date=2024-03-01&end_date=2024-01-01",
            "/api/charts?start_date=yesterday&end_date=2024-01-01",
            "/api/charts?start_date=yesterday",
            "/api/charts?age_min=old",
            "/api/charts/demographics?view=pie",
        ] {
            let (status, body) = get(test_app(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
            assert!(error.error);
        }
    }

    #[tokio::test]
    async fn test_empty_filter_result_is_annotated() {
        let (status, body) = get(test_app(), "/api/charts?cities=%E9%AB%98%E9%9B%84%E5%B8%82").await;
        assert_eq!(status, StatusCode::OK);

        let charts: Vec<Chart> = serde_json::from_slice(&body).unwrap();
        assert_eq!(charts.len(), ChartId::ALL.len());
        for chart in charts {
            assert_eq!(chart.data, ChartData::Empty);
            assert_eq!(chart.annotation.as_deref(), Some(NO_DATA_MESSAGE));
        }
    }

    #[tokio::test]
    async fn test_chart_csv_download() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/charts/monthly-revenue/csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("Month,Monthly Revenue,Growth Rate (%)"));
        assert!(text.contains("2024-02,2400,100"));
    }
}
