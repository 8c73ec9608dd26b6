//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer (users,
//! recycling, health) and the schema wrappers from
//! [`crate::inbound::http::schemas`], which describe domain types without
//! coupling them to utoipa.
//!
//! The generated document backs Swagger UI in debug builds and is exported
//! via `cargo run --bin openapi-dump`.

use crate::inbound::http::recycling::SubmitRecyclingBody;
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, MaterialKindSchema, RecyclingTransactionSchema,
    UserEnvelopeSchema, UserSchema,
};
use crate::inbound::http::users::RegisterUserBody;
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "DropMe backend API",
        description = "Recycling rewards: user registration, scored drop-off submissions and history."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::recycling::create_transaction,
        crate::inbound::http::recycling::list_user_transactions,
        crate::inbound::http::recycling::get_transaction,
        crate::inbound::http::recycling::delete_transaction,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        UserEnvelopeSchema,
        RecyclingTransactionSchema,
        MaterialKindSchema,
        ErrorSchema,
        ErrorCodeSchema,
        RegisterUserBody,
        SubmitRecyclingBody,
    )),
    tags(
        (name = "users", description = "User registration and balances"),
        (name = "recycling", description = "Recycling submissions and history"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
