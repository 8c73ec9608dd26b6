//! Driving port for recycling mutations.
//!
//! Submissions pass through weight validation and the rule checks before a
//! transaction is recorded. Deletion is part of the port but always refused.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Error, MaterialKind, RecyclingRejection, RecyclingTransaction, UserId, WeightKg,
};

/// Candidate submission as received from a caller.
///
/// The material stays a raw string so an unknown name is reported by the
/// scoring rule rather than by payload decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRecyclingRequest {
    /// Submitting user.
    pub user_id: UserId,
    /// Material name as submitted.
    pub material_type: String,
    /// Weight in kilograms as submitted.
    pub weight_kg: f64,
}

/// Driving port for recycling write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecyclingCommand: Send + Sync {
    /// Validate, score and record a submission.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use dropme_backend::domain::UserId;
    /// # use dropme_backend::domain::ports::{FixtureRecyclingCommand, RecyclingCommand, SubmitRecyclingRequest};
    /// # async fn example() -> Result<(), dropme_backend::domain::Error> {
    /// let command = FixtureRecyclingCommand;
    /// let transaction = command
    ///     .submit(SubmitRecyclingRequest {
    ///         user_id: UserId::random(),
    ///         material_type: "plastic".to_owned(),
    ///         weight_kg: 0.99,
    ///     })
    ///     .await?;
    /// assert_eq!(transaction.points_earned(), 9);
    /// # Ok(())
    /// # }
    /// ```
    async fn submit(&self, request: SubmitRecyclingRequest)
    -> Result<RecyclingTransaction, Error>;

    /// Refuse to delete a transaction, whether or not it exists.
    async fn delete(&self, id: Uuid) -> Result<(), Error>;
}

/// Fixture command that scores submissions without persisting them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecyclingCommand;

#[async_trait]
impl RecyclingCommand for FixtureRecyclingCommand {
    async fn submit(
        &self,
        request: SubmitRecyclingRequest,
    ) -> Result<RecyclingTransaction, Error> {
        let weight_kg = WeightKg::new(request.weight_kg)?;
        let material = request.material_type.parse::<MaterialKind>().map_err(|err| {
            RecyclingRejection::UnsupportedMaterial { material: err.0 }
        })?;
        Ok(RecyclingTransaction::scored(
            request.user_id,
            material,
            weight_kg,
            Utc::now(),
        )?)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), Error> {
        Err(RecyclingRejection::OperationNotPermitted.into())
    }
}
