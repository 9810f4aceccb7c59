use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::{Extension, Json, Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use coursehub_config::CorsConfig;
use coursehub_observability::{logging_middleware, metrics_middleware};

use crate::docs::ApiDoc;
use crate::middleware::gate::PUBLIC;
use crate::middleware::routes::{EndpointInfo, RouteCatalog, RouteTable};
use crate::modules::auth::auth_routes;
use crate::modules::contact::contact_routes;
use crate::modules::courses::course_routes;
use crate::modules::payments::payment_routes;
use crate::modules::profile::profile_routes;
use crate::state::AppState;

/// Every API endpoint with the gates it enforces.
pub fn route_table(state: &AppState) -> RouteTable {
    RouteTable::new(Arc::new(state.jwt_config.clone()))
        .nest("/api/v1/auth", |routes| {
            auth_routes(routes, &state.rate_limit_config)
        })
        .nest("/api/v1/course", course_routes)
        .nest("/api/v1/payment", payment_routes)
        .nest("/api/v1/profile", profile_routes)
        .nest("/api/v1/reach", contact_routes)
        .get("/api/v1/routes", PUBLIC, list_routes)
}

pub fn init_router(state: AppState) -> Router {
    let (router, catalog) = route_table(&state).into_parts();
    let cors = cors_layer(&state.cors_config);

    router
        .with_state(state)
        .layer(Extension(catalog))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(cors)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
}

#[utoipa::path(
    get,
    path = "/api/v1/routes",
    responses(
        (status = 200, description = "Registered endpoints and their gates", body = Vec<EndpointInfo>)
    ),
    tag = "Meta"
)]
pub async fn list_routes(Extension(catalog): Extension<RouteCatalog>) -> Json<Vec<EndpointInfo>> {
    Json(catalog.0.iter().map(|endpoint| endpoint.describe()).collect())
}
