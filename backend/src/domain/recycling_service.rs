//! Recycling transaction writer and history queries.
//!
//! Submissions run the checks in a fixed order: weight, user existence,
//! daily limit, duplicate window and finally material scoring. The first
//! failure aborts before anything is written. Within one process, checks and
//! the write for a given user are serialised behind a per-user async mutex.
//! The repository re-checks the daily cap and duplicate window in the same
//! atomic unit as the insert, so replicas sharing one database hold the same
//! guarantees.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    RecyclingCommand, RecyclingQuery, RecyclingRepository, RecyclingRepositoryError,
    SubmitRecyclingRequest, UserRepository,
};
use crate::domain::user_service::map_user_repository_error;
use crate::domain::{
    Error, MaterialKind, RecordGuard, RecordOutcome, RecyclingPolicy, RecyclingRejection,
    RecyclingTransaction, UserId, WeightKg,
};

type UserLock = Arc<tokio::sync::Mutex<()>>;

fn map_repository_error(error: RecyclingRepositoryError) -> Error {
    match error {
        RecyclingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recycling repository unavailable: {message}"))
        }
        RecyclingRepositoryError::Query { message } => {
            Error::internal(format!("recycling repository error: {message}"))
        }
    }
}

fn reject(user_id: &UserId, material: &str, rejection: RecyclingRejection) -> Error {
    match rejection {
        RecyclingRejection::DailyLimitExceeded { .. } | RecyclingRejection::DuplicateSubmission => {
            warn!(%user_id, material, reason = rejection.reason(), "recycling submission rejected");
        }
        _ => {
            debug!(%user_id, material, reason = rejection.reason(), "recycling submission rejected");
        }
    }
    rejection.into()
}

/// Recycling service implementing the command and query driving ports.
pub struct RecyclingService<U, R> {
    user_repo: Arc<U>,
    recycling_repo: Arc<R>,
    clock: Arc<dyn Clock>,
    policy: RecyclingPolicy,
    user_locks: Mutex<HashMap<UserId, UserLock>>,
}

impl<U, R> RecyclingService<U, R> {
    /// Create a service over the user and recycling repositories.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use dropme_backend::domain::{RecyclingPolicy, RecyclingService};
    /// # use dropme_backend::domain::ports::{FixtureRecyclingRepository, FixtureUserRepository};
    /// # use mockable::DefaultClock;
    /// let service = RecyclingService::new(
    ///     Arc::new(FixtureUserRepository),
    ///     Arc::new(FixtureRecyclingRepository),
    ///     Arc::new(DefaultClock),
    ///     RecyclingPolicy::new(10),
    /// );
    /// ```
    #[must_use]
    pub fn new(
        user_repo: Arc<U>,
        recycling_repo: Arc<R>,
        clock: Arc<dyn Clock>,
        policy: RecyclingPolicy,
    ) -> Self {
        Self {
            user_repo,
            recycling_repo,
            clock,
            policy,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, user_id: &UserId) -> Result<UserLock, Error> {
        let mut locks = self
            .user_locks
            .lock()
            .map_err(|_| Error::internal("recycling lock registry poisoned"))?;
        // Drop locks nobody is holding or waiting on.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Ok(Arc::clone(locks.entry(*user_id).or_default()))
    }
}

impl<U, R> RecyclingService<U, R>
where
    U: UserRepository,
    R: RecyclingRepository,
{
    async fn evaluate(
        &self,
        user_id: UserId,
        material_type: &str,
        weight_kg: WeightKg,
        now: DateTime<Utc>,
        guard: RecordGuard,
    ) -> Result<RecyclingTransaction, Error> {
        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await
            .map_err(map_user_repository_error)?;
        if user.is_none() {
            return Err(reject(
                &user_id,
                material_type,
                RecyclingRejection::UserNotFound { user_id },
            ));
        }

        let today = self
            .recycling_repo
            .count_for_user_since(&user_id, guard.day_start)
            .await
            .map_err(map_repository_error)?;
        let limit = guard.daily_limit;
        if today >= u64::from(limit) {
            return Err(reject(
                &user_id,
                material_type,
                RecyclingRejection::DailyLimitExceeded { limit },
            ));
        }

        let parsed = material_type.parse::<MaterialKind>();
        // Stored materials are always canonical, so an unknown name cannot
        // match an earlier submission.
        if let Ok(material) = parsed {
            let duplicate = self
                .recycling_repo
                .has_duplicate(&user_id, material, weight_kg, guard.duplicate_since)
                .await
                .map_err(map_repository_error)?;
            if duplicate {
                return Err(reject(
                    &user_id,
                    material_type,
                    RecyclingRejection::DuplicateSubmission,
                ));
            }
        }

        let material = parsed.map_err(|err| {
            reject(
                &user_id,
                material_type,
                RecyclingRejection::UnsupportedMaterial { material: err.0 },
            )
        })?;
        RecyclingTransaction::scored(user_id, material, weight_kg, now)
            .map_err(|rejection| reject(&user_id, material_type, rejection))
    }
}

#[async_trait]
impl<U, R> RecyclingCommand for RecyclingService<U, R>
where
    U: UserRepository,
    R: RecyclingRepository,
{
    async fn submit(
        &self,
        request: SubmitRecyclingRequest,
    ) -> Result<RecyclingTransaction, Error> {
        let SubmitRecyclingRequest {
            user_id,
            material_type,
            weight_kg,
        } = request;

        let weight = WeightKg::new(weight_kg)
            .map_err(|rejection| reject(&user_id, &material_type, rejection))?;

        let lock = self.lock_for(&user_id)?;
        let _held = lock.lock().await;

        let now = self.clock.utc();
        let guard = self.policy.guard_at(now);
        let transaction = self
            .evaluate(user_id, &material_type, weight, now, guard)
            .await?;

        let outcome = self
            .recycling_repo
            .record(&transaction, guard)
            .await
            .map_err(map_repository_error)?;
        match outcome {
            RecordOutcome::Recorded => {}
            RecordOutcome::DailyLimitReached => {
                return Err(reject(
                    &user_id,
                    &material_type,
                    RecyclingRejection::DailyLimitExceeded {
                        limit: guard.daily_limit,
                    },
                ));
            }
            RecordOutcome::Duplicate => {
                return Err(reject(
                    &user_id,
                    &material_type,
                    RecyclingRejection::DuplicateSubmission,
                ));
            }
        }

        info!(
            %user_id,
            transaction_id = %transaction.id(),
            material = %transaction.material(),
            weight_kg = transaction.weight_kg().get(),
            points = transaction.points_earned(),
            "recycling submission recorded"
        );
        Ok(transaction)
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        debug!(transaction_id = %id, "refusing recycling deletion");
        Err(RecyclingRejection::OperationNotPermitted.into())
    }
}

#[async_trait]
impl<U, R> RecyclingQuery for RecyclingService<U, R>
where
    U: UserRepository,
    R: RecyclingRepository,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RecyclingTransaction>, Error> {
        self.recycling_repo
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<RecyclingTransaction>, Error> {
        self.recycling_repo
            .list_for_user(user_id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "recycling_service_tests.rs"]
mod tests;
