//! Port for recycling transaction persistence.
//!
//! Adapters must record a transaction and credit the owner's balance as one
//! atomic unit: either both become visible or neither does.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    MaterialKind, RecordGuard, RecordOutcome, RecyclingTransaction, UserId, WeightKg,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recycling repository adapters.
    pub enum RecyclingRepositoryError {
        /// Repository connection could not be established.
        Connection {
            /// Adapter-supplied failure detail.
            message: String,
        } =>
            "recycling repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-supplied failure detail.
            message: String,
        } =>
            "recycling repository query failed: {message}",
    }
}

/// Port for writing transactions and reading a user's history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecyclingRepository: Send + Sync {
    /// Count the user's transactions created at or after `since`.
    async fn count_for_user_since(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<u64, RecyclingRepositoryError>;

    /// Whether the user has a transaction with exactly this material and
    /// weight created at or after `since`.
    async fn has_duplicate(
        &self,
        user_id: &UserId,
        material: MaterialKind,
        weight_kg: WeightKg,
        since: DateTime<Utc>,
    ) -> Result<bool, RecyclingRepositoryError>;

    /// Insert the transaction and add its points to the owner's balance.
    ///
    /// The cap and duplicate window in `guard` are re-checked against
    /// committed rows in the same atomic unit as the insert. When either is
    /// hit nothing is written and the matching [`RecordOutcome`] is returned.
    async fn record(
        &self,
        transaction: &RecyclingTransaction,
        guard: RecordGuard,
    ) -> Result<RecordOutcome, RecyclingRepositoryError>;

    /// Find a transaction by id.
    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<RecyclingTransaction>, RecyclingRepositoryError>;

    /// List a user's transactions, oldest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<RecyclingTransaction>, RecyclingRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecyclingRepository;

#[async_trait]
impl RecyclingRepository for FixtureRecyclingRepository {
    async fn count_for_user_since(
        &self,
        _user_id: &UserId,
        _since: DateTime<Utc>,
    ) -> Result<u64, RecyclingRepositoryError> {
        Ok(0)
    }

    async fn has_duplicate(
        &self,
        _user_id: &UserId,
        _material: MaterialKind,
        _weight_kg: WeightKg,
        _since: DateTime<Utc>,
    ) -> Result<bool, RecyclingRepositoryError> {
        Ok(false)
    }

    async fn record(
        &self,
        _transaction: &RecyclingTransaction,
        _guard: RecordGuard,
    ) -> Result<RecordOutcome, RecyclingRepositoryError> {
        Ok(RecordOutcome::Recorded)
    }

    async fn find_by_id(
        &self,
        _id: &Uuid,
    ) -> Result<Option<RecyclingTransaction>, RecyclingRepositoryError> {
        Ok(None)
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<RecyclingTransaction>, RecyclingRepositoryError> {
        Ok(Vec::new())
    }
}
