use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::{metrics_middleware, metrics_router};
use crate::middleware::auth::{API_KEY_HEADER, require_api_key};
use crate::modules::system::init_system_router;
use crate::modules::todos::init_todos_router;
use crate::state::AppState;

/// Prefix of the API-key guarded route group.
pub const API_PREFIX: &str = "/api/v2";

pub fn init_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_system_router())
        .nest(
            API_PREFIX,
            Router::new().nest(
                "/todo",
                init_todos_router()
                    .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key)),
            ),
        );

    if let Some(handle) = state.metrics.clone() {
        router = router.merge(metrics_router::<AppState>(handle));
    }

    router
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
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
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(API_KEY_HEADER),
        ])
}
