//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their domain types but
//! live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or breaks a business rule.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The operation is refused by policy.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing service is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// Rule rejections carry `details.reason`, for example
/// `daily_limit_exceeded` or `duplicate_submission`.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Always `error`.
    #[schema(example = "error")]
    status: String,
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Daily recycling limit exceeded")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    #[schema(example = json!({"reason": "daily_limit_exceeded", "limit": 10}))]
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Stable user identifier.
    #[schema(format = "uuid", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    /// Normalised (trimmed, lower-case) email address.
    #[schema(example = "ada@example.com")]
    email: String,
    /// Accumulated reward points.
    #[schema(example = 120)]
    points: u64,
}

/// OpenAPI schema for a users endpoint body wrapping a
/// [`crate::domain::User`].
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserEnvelopeSchema {
    /// Always `success`.
    #[schema(example = "success")]
    status: String,
    /// Client-facing summary of the outcome.
    #[schema(example = "User registered successfully")]
    message: String,
    /// The user.
    data: UserSchema,
}

/// OpenAPI schema for [`crate::domain::MaterialKind`].
#[derive(ToSchema)]
#[schema(as = crate::domain::MaterialKind)]
pub enum MaterialKindSchema {
    /// 10 points per kilogram.
    #[schema(rename = "plastic")]
    Plastic,
    /// 8 points per kilogram.
    #[schema(rename = "glass")]
    Glass,
    /// 15 points per kilogram.
    #[schema(rename = "metal")]
    Metal,
    /// 5 points per kilogram.
    #[schema(rename = "paper")]
    Paper,
}

/// OpenAPI schema for [`crate::domain::RecyclingTransaction`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RecyclingTransaction)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RecyclingTransactionSchema {
    /// Transaction identifier.
    #[schema(format = "uuid")]
    id: String,
    /// Submitting user.
    #[schema(format = "uuid")]
    user_id: String,
    /// Canonical material name.
    material_type: MaterialKindSchema,
    /// Weight in kilograms.
    #[schema(example = 2.5)]
    weight_kg: f64,
    /// `floor(weightKg * rate)` at submission time.
    #[schema(example = 25)]
    points_earned: u64,
    /// Submission time (UTC).
    #[schema(format = "date-time")]
    created_at: String,
}
