//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{dashboard, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vantage API",
        version = "0.2.0",
        description = "Web Traffic Analytics Dashboard REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Dashboard
        dashboard::get_unique_visitors,
    ),
    components(
        schemas(
            // Dashboard
            dashboard::DashboardQuery,
            dashboard::DashboardResponse,
            crate::models::unique_visitors::UniqueVisitorsParams,
            crate::models::unique_visitors::UniqueVisitorsRow,
            crate::models::unique_visitors::DateRange,
            crate::models::chart::ChartTick,
            crate::models::chart::ChartData,
            crate::models::chart::LineMarker,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "dashboard", description = "Aggregated visitor statistics for charting")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
