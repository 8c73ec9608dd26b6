//! Domain primitives, aggregates and use-case services.
//!
//! Types here are immutable once built and carry their own invariants.
//! [`RecyclingService`] and [`UserService`] implement the driving ports in
//! [`ports`]; adapters only see those traits.

pub mod error;
pub mod ports;
pub mod recycling;
mod recycling_service;
mod trace_id;
pub mod user;
mod user_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::recycling::{
    DEFAULT_DAILY_LIMIT, DUPLICATE_WINDOW_MINUTES, MaterialKind, RecordGuard, RecordOutcome,
    RecyclingPolicy, RecyclingRejection, RecyclingTransaction, RecyclingTransactionDraft,
    UnknownMaterial, WeightKg, score,
};
pub use self::recycling_service::RecyclingService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EMAIL_MAX, Email, User, UserId, UserValidationError};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use dropme_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
