use axum::Json;
use tasklane_models::ServiceInfo;

pub const SERVICE_NAME: &str = "tasklane-service";

/// Liveness check; not behind the API key.
#[utoipa::path(
    get,
    path = "/service",
    responses((status = 200, description = "Service name and version", body = ServiceInfo)),
    tag = "System"
)]
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
