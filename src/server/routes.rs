use super::error::AppError;
use super::AppState;
use crate::core::filters::{FilterParams, FilterSet};
use crate::core::table::Table;
use crate::domain::chart::{Chart, ChartId};
use crate::domain::model::RowCounts;
use crate::domain::report::{FilterOptions, Summary};
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

type Filters = std::result::Result<Query<FilterParams>, QueryRejection>;
type ChartPath = std::result::Result<Path<String>, PathRejection>;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub rows: RowCounts,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/filters", get(filter_options))
        .route("/api/summary", get(summary))
        .route("/api/charts", get(all_charts))
        .route("/api/charts/:chart", get(chart))
        .route("/api/charts/:chart/csv", get(chart_csv))
}

fn filter_set(query: Filters) -> Result<FilterSet, AppError> {
    let Query(params) = query?;
    Ok(params.into_filter_set()?)
}

fn chart_id(path: ChartPath) -> Result<ChartId, AppError> {
    let Path(name) = path?;
    Ok(name.parse::<ChartId>()?)
}

async fn index(State(state): State<AppState>) -> String {
    let counts = state.dashboard.row_counts();
    format!(
        "{} API\n\
         {} transactions, {} students, {} teacher sessions loaded\n\
         Charts: {}\n",
        state.name,
        counts.transactions,
        counts.demographics,
        counts.teacher_sessions,
        ChartId::ALL.map(|id| id.as_str()).join(", ")
    )
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        rows: state.dashboard.row_counts(),
    })
}

async fn filter_options(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(state.dashboard.filter_options())
}

async fn summary(
    State(state): State<AppState>,
    query: Filters,
) -> Result<Json<Summary>, AppError> {
    let filters = filter_set(query)?;
    Ok(Json(state.dashboard.summary(&filters)))
}

async fn all_charts(
    State(state): State<AppState>,
    query: Filters,
) -> Result<Json<Vec<Chart>>, AppError> {
    let filters = filter_set(query)?;
    Ok(Json(state.dashboard.render_all(&filters)))
}

async fn chart(
    State(state): State<AppState>,
    path: ChartPath,
    query: Filters,
) -> Result<Json<Chart>, AppError> {
    let id = chart_id(path)?;
    let filters = filter_set(query)?;
    tracing::debug!("Rendering {} ({:?})", id, filters);
    Ok(Json(state.dashboard.render(id, &filters)))
}

async fn chart_csv(
    State(state): State<AppState>,
    path: ChartPath,
    query: Filters,
) -> Result<impl IntoResponse, AppError> {
    let id = chart_id(path)?;
    let filters = filter_set(query)?;

    let rendered = state.dashboard.render(id, &filters);
    let body = Table::from_chart(&rendered).to_csv()?;
    let disposition = format!("attachment; filename=\"{}.csv\"", rendered.slug());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
