//! Recycling submission and history handlers.
//!
//! ```text
//! POST /api/v1/recycling {"userId":"…","materialType":"plastic","weightKg":2.5}
//! GET /api/v1/recycling/user/{user_id}
//! GET /api/v1/recycling/{id}
//! DELETE /api/v1/recycling/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::SubmitRecyclingRequest;
use crate::domain::{Error, RecyclingRejection, RecyclingTransaction};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, RecyclingTransactionSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id, parse_uuid};

/// Submission body for `POST /api/v1/recycling`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRecyclingBody {
    /// Submitting user.
    #[schema(format = "uuid")]
    pub user_id: String,
    /// One of plastic, glass, metal or paper; case-insensitive.
    #[schema(example = "plastic")]
    pub material_type: String,
    /// Weight in kilograms; must be positive and finite.
    #[schema(example = 2.5)]
    pub weight_kg: f64,
}

impl TryFrom<SubmitRecyclingBody> for SubmitRecyclingRequest {
    type Error = Error;

    fn try_from(body: SubmitRecyclingBody) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: parse_user_id(body.user_id, FieldName::new("userId"))?,
            material_type: body.material_type,
            weight_kg: body.weight_kg,
        })
    }
}

/// Record a recycling drop-off and credit the user's points.
///
/// Rule rejections, including an unknown user, return 400 with
/// `details.reason`.
///
/// # Errors
///
/// Returns `400` for malformed bodies and rule rejections and `503` when
/// storage is unreachable.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use dropme_backend::inbound::http::recycling::create_transaction;
///
/// let _app = App::new().service(create_transaction);
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/recycling",
    request_body = SubmitRecyclingBody,
    responses(
        (status = 201, description = "Transaction recorded", body = RecyclingTransactionSchema),
        (status = 400, description = "Rule rejection, unknown user or malformed body", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["recycling"],
    operation_id = "createRecyclingTransaction"
)]
#[post("/recycling")]
pub async fn create_transaction(
    state: web::Data<HttpState>,
    payload: web::Json<SubmitRecyclingBody>,
) -> ApiResult<HttpResponse> {
    let request = SubmitRecyclingRequest::try_from(payload.into_inner())?;
    let transaction = state.recycling.submit(request).await?;
    Ok(HttpResponse::Created().json(transaction))
}

/// List a user's transactions, oldest first. Unknown users get an empty list.
///
/// # Errors
///
/// Returns `400` for a malformed user id.
#[utoipa::path(
    get,
    path = "/api/v1/recycling/user/{user_id}",
    params(("user_id" = String, Path, format = "uuid", description = "User identifier")),
    responses(
        (status = 200, description = "Transactions", body = [RecyclingTransactionSchema]),
        (status = 400, description = "Malformed user id", body = ErrorSchema)
    ),
    tags = ["recycling"],
    operation_id = "listUserRecyclingTransactions"
)]
#[get("/recycling/user/{user_id}")]
pub async fn list_user_transactions(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<RecyclingTransaction>>> {
    let user_id = parse_user_id(path.into_inner(), FieldName::new("userId"))?;
    let transactions = state.recycling_query.list_for_user(&user_id).await?;
    Ok(web::Json(transactions))
}

/// Fetch one transaction by id.
///
/// # Errors
///
/// Returns `400` for a malformed id and `404` when no transaction matches.
#[utoipa::path(
    get,
    path = "/api/v1/recycling/{id}",
    params(("id" = String, Path, format = "uuid", description = "Transaction identifier")),
    responses(
        (status = 200, description = "Transaction", body = RecyclingTransactionSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Recycling record not found", body = ErrorSchema)
    ),
    tags = ["recycling"],
    operation_id = "getRecyclingTransaction"
)]
#[get("/recycling/{id}")]
pub async fn get_transaction(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RecyclingTransaction>> {
    let id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    state
        .recycling_query
        .find_by_id(id)
        .await?
        .map(web::Json)
        .ok_or_else(|| Error::not_found("Recycling record not found"))
}

/// Transactions are immutable; this endpoint always answers 400 with
/// `details.reason = "operation_not_permitted"`.
///
/// # Errors
///
/// Always returns the refusal.
#[utoipa::path(
    delete,
    path = "/api/v1/recycling/{id}",
    params(("id" = String, Path, description = "Transaction identifier")),
    responses(
        (status = 400, description = "Deleting recycling records is not allowed", body = ErrorSchema)
    ),
    tags = ["recycling"],
    operation_id = "deleteRecyclingTransaction"
)]
#[delete("/recycling/{id}")]
pub async fn delete_transaction(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    let Ok(id) = parse_uuid(raw.clone(), FieldName::new("id")) else {
        debug!(id = %raw, "delete requested for malformed id");
        return Err(RecyclingRejection::OperationNotPermitted.into());
    };
    state.recycling.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "recycling_tests.rs"]
mod tests;
