//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users/register {"email":"ada@example.com"}
//! GET /api/v1/users/{user_id}
//! ```
//!
//! Both respond with `{"status": "success", "message": ..., "data": user}`.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::RegisterUserRequest;
use crate::domain::{User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::SuccessEnvelope;
use crate::inbound::http::schemas::{ErrorSchema, UserEnvelopeSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id};

/// Registration body for `POST /api/v1/users/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserBody {
    /// Email to register; trimmed and lower-cased before storage.
    #[schema(example = "ada@example.com")]
    pub email: String,
}

/// Register a new user with zero points.
///
/// # Errors
///
/// Returns `400` for a malformed email and `409` when it is taken.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use dropme_backend::inbound::http::users::register_user;
///
/// let _app = App::new().service(register_user);
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterUserBody,
    responses(
        (status = 201, description = "User registered", body = UserEnvelopeSchema),
        (status = 400, description = "Invalid email", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users/register")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserBody>,
) -> ApiResult<HttpResponse> {
    let RegisterUserBody { email } = payload.into_inner();
    let user = state
        .users_command
        .register(RegisterUserRequest { email })
        .await?;
    Ok(HttpResponse::Created().json(SuccessEnvelope::new("User registered successfully", user)))
}

/// Fetch a user and their point balance.
///
/// # Errors
///
/// Returns `400` for a malformed id and `404` for an unknown user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, format = "uuid", description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserEnvelopeSchema),
        (status = 400, description = "Malformed user id", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SuccessEnvelope<User>>> {
    let user_id: UserId = parse_user_id(path.into_inner(), FieldName::new("userId"))?;
    let user = state.users.get_user(&user_id).await?;
    Ok(web::Json(SuccessEnvelope::new("Success", user)))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
