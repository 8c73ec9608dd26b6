//! `{status, message, data}` wrappers for JSON response bodies.
//!
//! Users endpoints wrap their payload in [`SuccessEnvelope`]. Every error
//! body carries `status: "error"` beside the domain error fields. Recycling
//! endpoints return bare resources.

use serde::Serialize;

use crate::domain::Error;

/// Outcome marker at the top of an enveloped body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    /// The request succeeded; `data` holds the payload.
    Success,
    /// The request failed; the body carries the error fields.
    Error,
}

/// Successful response body wrapping `data`.
///
/// # Examples
/// ```
/// use dropme_backend::inbound::http::envelope::SuccessEnvelope;
///
/// let body = serde_json::to_value(SuccessEnvelope::new("Success", 7)).expect("serialises");
/// assert_eq!(body["status"], "success");
/// assert_eq!(body["data"], 7);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope<T> {
    status: EnvelopeStatus,
    message: &'static str,
    data: T,
}

impl<T> SuccessEnvelope<T> {
    /// Wrap `data` with a client-facing message.
    #[must_use]
    pub const fn new(message: &'static str, data: T) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            message,
            data,
        }
    }
}

/// Error body: `status` plus the flattened domain error.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorEnvelope<'a> {
    status: EnvelopeStatus,
    #[serde(flatten)]
    error: &'a Error,
}

impl<'a> ErrorEnvelope<'a> {
    pub(crate) const fn new(error: &'a Error) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            error,
        }
    }
}
