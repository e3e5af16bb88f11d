//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::LastConnectionDto;
use crate::api::handlers::{connection, system, users};
use crate::error::{ErrorBody, ErrorResponse};

/// Path the OpenAPI JSON document is served at.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Generated OpenAPI 3 description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "user-connection-service",
        description = "Records user connection events and answers lookups by user and IP prefix."
    ),
    paths(
        connection::log_connection,
        users::find_users_by_ip,
        users::get_user_ips,
        users::get_last_connection,
        system::health_handler,
    ),
    components(schemas(LastConnectionDto, ErrorResponse, ErrorBody, system::HealthResponse)),
    tags(
        (name = "Connections", description = "Connection event logging"),
        (name = "Users", description = "Lookups by user and address"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;
