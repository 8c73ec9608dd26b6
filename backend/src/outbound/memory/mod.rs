//! In-process store implementing the user and recycling repository ports.
//!
//! Backs development runs without `DROPME_DATABASE_URL` and the HTTP
//! integration suite. One mutex guards users and transactions together so
//! `record` re-checks its guard, inserts and credits atomically, matching
//! the Diesel adapter.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    RecyclingRepository, RecyclingRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Email, MaterialKind, RecordGuard, RecordOutcome, RecyclingTransaction, User, UserId,
    WeightKg,
};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    transactions: Vec<RecyclingTransaction>,
}

impl MemoryState {
    fn count_since(&self, user_id: &UserId, since: DateTime<Utc>) -> usize {
        self.transactions
            .iter()
            .filter(|tx| tx.user_id() == user_id && tx.created_at() >= since)
            .count()
    }

    fn has_duplicate(
        &self,
        user_id: &UserId,
        material: MaterialKind,
        weight_kg: WeightKg,
        since: DateTime<Utc>,
    ) -> bool {
        self.transactions.iter().any(|tx| {
            tx.user_id() == user_id
                && tx.material() == material
                && tx.weight_kg() == weight_kg
                && tx.created_at() >= since
        })
    }
}

/// Shared in-memory store. Wrap in an `Arc` and hand the same instance to
/// both services.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(
        &self,
        poisoned: impl FnOnce(&'static str) -> E,
    ) -> Result<MutexGuard<'_, MemoryState>, E> {
        self.state
            .lock()
            .map_err(|_| poisoned("in-memory store lock poisoned"))
    }

    /// Number of stored transactions.
    ///
    /// # Errors
    ///
    /// Returns [`RecyclingRepositoryError::Query`] when the store lock is
    /// poisoned.
    #[cfg(any(test, feature = "test-support"))]
    pub fn transaction_count(&self) -> Result<usize, RecyclingRepositoryError> {
        let state = self.lock(RecyclingRepositoryError::query)?;
        Ok(state.transactions.len())
    }

    /// Insert a transaction without scoring, guarding or crediting.
    ///
    /// # Errors
    ///
    /// Returns [`RecyclingRepositoryError::Query`] when the store lock is
    /// poisoned.
    #[cfg(any(test, feature = "test-support"))]
    pub fn seed_transaction(
        &self,
        transaction: RecyclingTransaction,
    ) -> Result<(), RecyclingRepositoryError> {
        let mut state = self.lock(RecyclingRepositoryError::query)?;
        state.transactions.push(transaction);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock(UserPersistenceError::query)?;
        if state.users.values().any(|u| u.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state.users.values().find(|u| u.email() == email).cloned())
    }
}

#[async_trait]
impl RecyclingRepository for InMemoryStore {
    async fn count_for_user_since(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<u64, RecyclingRepositoryError> {
        let state = self.lock(RecyclingRepositoryError::query)?;
        u64::try_from(state.count_since(user_id, since))
            .map_err(|_| RecyclingRepositoryError::query("count overflow"))
    }

    async fn has_duplicate(
        &self,
        user_id: &UserId,
        material: MaterialKind,
        weight_kg: WeightKg,
        since: DateTime<Utc>,
    ) -> Result<bool, RecyclingRepositoryError> {
        let state = self.lock(RecyclingRepositoryError::query)?;
        Ok(state.has_duplicate(user_id, material, weight_kg, since))
    }

    async fn record(
        &self,
        transaction: &RecyclingTransaction,
        guard: RecordGuard,
    ) -> Result<RecordOutcome, RecyclingRepositoryError> {
        let mut state = self.lock(RecyclingRepositoryError::query)?;
        let owner_id = transaction.user_id();
        let Some(owner) = state.users.get(owner_id) else {
            return Err(RecyclingRepositoryError::query("referenced record missing"));
        };
        let credited = owner.credited(transaction.points_earned());

        let cap = usize::try_from(guard.daily_limit).unwrap_or(usize::MAX);
        if state.count_since(owner_id, guard.day_start) >= cap {
            return Ok(RecordOutcome::DailyLimitReached);
        }
        if state.has_duplicate(
            owner_id,
            transaction.material(),
            transaction.weight_kg(),
            guard.duplicate_since,
        ) {
            return Ok(RecordOutcome::Duplicate);
        }

        state.users.insert(*owner_id, credited);
        state.transactions.push(transaction.clone());
        Ok(RecordOutcome::Recorded)
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<RecyclingTransaction>, RecyclingRepositoryError> {
        let state = self.lock(RecyclingRepositoryError::query)?;
        Ok(state.transactions.iter().find(|tx| tx.id() == *id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<RecyclingTransaction>, RecyclingRepositoryError> {
        let state = self.lock(RecyclingRepositoryError::query)?;
        let mut listed: Vec<_> = state
            .transactions
            .iter()
            .filter(|tx| tx.user_id() == user_id)
            .cloned()
            .collect();
        listed.sort_by_key(RecyclingTransaction::created_at);
        Ok(listed)
    }
}
