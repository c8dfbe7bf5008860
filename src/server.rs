use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::output::{corrected_to_csv, ProcessReport};
use crate::pipeline::{run_report, ReportRun};
use crate::record::{read_batch_from_str, IngestError};
use crate::schema::Column;

#[derive(Clone)]
struct ApiState {
    config: Config,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(error: IngestError) -> Self {
        warn!("rejected upload: {error}");
        Self::bad_request(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct TemplateResponse {
    column_count: usize,
    columns: Vec<&'static str>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ExportQuery {
    labels: Option<bool>,
}

fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/template", get(template))
        .route("/v1/process", post(process))
        .route("/v1/export", post(export))
        .route("/v1/config", get(show_config))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let app = router(ApiState { config });
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn template() -> Json<ApiResponse<TemplateResponse>> {
    let columns = Column::headers().collect::<Vec<_>>();
    ok(TemplateResponse {
        column_count: columns.len(),
        columns,
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn process(State(state): State<ApiState>, body: String) -> ApiResult<ProcessReport> {
    let run = run_upload(&state.config, body).await?;
    Ok(ok(run.report))
}

async fn export(
    State(state): State<ApiState>,
    Query(query): Query<ExportQuery>,
    body: String,
) -> std::result::Result<Response, ApiError> {
    let labels = query.labels.unwrap_or(state.config.export.display_labels);
    let run = run_upload(&state.config, body).await?;
    let csv = corrected_to_csv(&run.corrected, labels).map_err(ApiError::internal)?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", state.config.export.file_name),
        ),
    ];
    Ok((headers, csv).into_response())
}

async fn run_upload(config: &Config, body: String) -> std::result::Result<ReportRun, ApiError> {
    let batch = read_batch_from_str(&body)?;
    let engine = config.rule_engine();
    let fields = config.report.fields.clone();
    tokio::task::spawn_blocking(move || run_report(&engine, &batch, &fields))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::config::ConfigOverrides;
    use crate::output::batch_to_csv;
    use crate::record::{Batch, Record};

    fn state() -> ApiState {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            evaluation_date: NaiveDate::from_ymd_opt(2025, 3, 5),
            ..ConfigOverrides::default()
        });
        ApiState { config }
    }

    fn upload() -> String {
        let batch = Batch::new(vec![Record::default()
            .with(Column::Name, "BAG-0001")
            .with(Column::BagLotNo, "LOT-7")
            .with(Column::BagFlagStatus, "Normal Cargo")
            .with(Column::RouteType, "DIRECT")
            .with(Column::RoutePortDestination, "DAR ES SALAAM")
            .with(Column::BagExportTs, "2025-03-01 06:15:00")]);
        batch_to_csv(&batch).expect("csv")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let Json(response) = health().await;
        assert!(response.ok);
        assert_eq!(response.data.status, "ok");
    }

    #[tokio::test]
    async fn template_lists_all_columns() {
        let Json(response) = template().await;
        assert_eq!(response.data.column_count, 63);
        assert_eq!(response.data.columns[0], "name");
    }

    #[tokio::test]
    async fn process_returns_summary_and_discrepancies() {
        let result = process(State(state()), upload()).await;
        let Ok(Json(response)) = result else {
            panic!("process should succeed");
        };
        assert_eq!(response.data.summary.total_rows, 1);
        assert_eq!(response.data.summary.corrections, 6);
        assert!(response
            .data
            .discrepancies
            .iter()
            .all(|d| d.name == "BAG-0001" && d.bag_lot_no == "LOT-7"));
    }

    #[tokio::test]
    async fn bad_template_is_a_client_error() {
        let body = "name,BAG_LOT_NO_BAG_MIRROR\nBAG-1,LOT-1\n".to_string();
        let result = process(State(state()), body).await;
        let Err(error) = result else {
            panic!("short header must be rejected");
        };
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert!(error.message.contains("Expected 63 columns, but found 2"));
    }

    #[tokio::test]
    async fn export_sets_csv_headers() {
        let response = export(
            State(state()),
            Query(ExportQuery { labels: Some(false) }),
            upload(),
        )
        .await
        .expect("export");
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("text/csv; charset=utf-8")
        );
        assert_eq!(
            headers
                .get(header::CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok()),
            Some("attachment; filename=\"corrected_active_bag_report.csv\"")
        );
    }
}
