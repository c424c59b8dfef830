use tasklane_core::ErrorBody;
use tasklane_models::{
    MessageResponse, ServiceInfo,
    todos::{CreateTodoRequest, TodoResponse, UpdateTodoRequest},
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::system::controller::service_info,
        crate::modules::todos::controller::create_todo,
        crate::modules::todos::controller::get_all_todos,
        crate::modules::todos::controller::get_todo,
        crate::modules::todos::controller::update_todo,
        crate::modules::todos::controller::delete_todo,
    ),
    components(
        schemas(
            CreateTodoRequest,
            UpdateTodoRequest,
            TodoResponse,
            MessageResponse,
            ServiceInfo,
            ErrorBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Todos", description = "Todo CRUD endpoints"),
        (name = "System", description = "Service liveness")
    ),
    info(
        title = "Tasklane API",
        version = "0.1.0",
        description = "Todo CRUD service backed by PostgreSQL with an optional Redis cache.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-KEY"))),
            )
        }
    }
}
