//! PostgreSQL-backed `RecyclingRepository` implementation using Diesel ORM.
//!
//! `record` locks the owner's row with `SELECT ... FOR UPDATE`, re-checks the
//! daily cap and duplicate window, then inserts the transaction row and
//! increments the balance inside one database transaction. Concurrent
//! writers for the same user, in this process or another, queue on the row
//! lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{RecyclingRepository, RecyclingRepositoryError};
use crate::domain::{
    MaterialKind, RecordGuard, RecordOutcome, RecyclingTransaction, RecyclingTransactionDraft,
    UserId, WeightKg,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewRecyclingTransactionRow, RecyclingTransactionRow};
use super::pool::{DbPool, PoolError};
use super::schema::{recycling_transactions, users};

/// Diesel-backed implementation of the recycling repository port.
#[derive(Clone)]
pub struct DieselRecyclingRepository {
    pool: DbPool,
}

impl DieselRecyclingRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RecyclingRepositoryError {
    map_pool_error(error, RecyclingRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> RecyclingRepositoryError {
    map_diesel_error(
        error,
        RecyclingRepositoryError::query,
        RecyclingRepositoryError::connection,
    )
}

fn to_i64(value: u64, field: &str) -> Result<i64, RecyclingRepositoryError> {
    i64::try_from(value)
        .map_err(|_| RecyclingRepositoryError::query(format!("{field} exceeds column range")))
}

/// Convert a stored row into a domain transaction.
fn row_to_transaction(
    row: RecyclingTransactionRow,
) -> Result<RecyclingTransaction, RecyclingRepositoryError> {
    let RecyclingTransactionRow {
        id,
        user_id,
        material_type,
        weight_kg: stored_weight,
        points_earned: stored_points,
        created_at,
    } = row;

    let material = material_type
        .parse::<MaterialKind>()
        .map_err(|err| RecyclingRepositoryError::query(err.to_string()))?;
    let weight_kg = WeightKg::new(stored_weight)
        .map_err(|err| RecyclingRepositoryError::query(format!("stored weight: {err}")))?;
    let points_earned = u64::try_from(stored_points).map_err(|_| {
        RecyclingRepositoryError::query(format!("stored points negative: {stored_points}"))
    })?;

    Ok(RecyclingTransaction::new(RecyclingTransactionDraft {
        id,
        user_id: UserId::from(user_id),
        material,
        weight_kg,
        points_earned,
        created_at,
    }))
}

#[async_trait]
impl RecyclingRepository for DieselRecyclingRepository {
    async fn count_for_user_since(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<u64, RecyclingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let count: i64 = recycling_transactions::table
            .filter(recycling_transactions::user_id.eq(user_id.as_uuid()))
            .filter(recycling_transactions::created_at.ge(since))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        u64::try_from(count)
            .map_err(|_| RecyclingRepositoryError::query(format!("negative count: {count}")))
    }

    async fn has_duplicate(
        &self,
        user_id: &UserId,
        material: MaterialKind,
        weight_kg: WeightKg,
        since: DateTime<Utc>,
    ) -> Result<bool, RecyclingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::select(diesel::dsl::exists(
            recycling_transactions::table
                .filter(recycling_transactions::user_id.eq(user_id.as_uuid()))
                .filter(recycling_transactions::material_type.eq(material.as_str()))
                .filter(recycling_transactions::weight_kg.eq(weight_kg.get()))
                .filter(recycling_transactions::created_at.ge(since)),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(diesel_error)
    }

    async fn record(
        &self,
        transaction: &RecyclingTransaction,
        guard: RecordGuard,
    ) -> Result<RecordOutcome, RecyclingRepositoryError> {
        let points = to_i64(transaction.points_earned(), "points_earned")?;
        let owner = *transaction.user_id().as_uuid();
        let row = NewRecyclingTransactionRow {
            id: transaction.id(),
            user_id: owner,
            material_type: transaction.material().as_str(),
            weight_kg: transaction.weight_kg().get(),
            points_earned: points,
            created_at: transaction.created_at(),
        };
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let cap = i64::from(guard.daily_limit);

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                // Missing owner surfaces as NotFound and rolls back.
                users::table
                    .filter(users::id.eq(owner))
                    .select(users::id)
                    .for_update()
                    .first::<Uuid>(conn)
                    .await?;

                let today: i64 = recycling_transactions::table
                    .filter(recycling_transactions::user_id.eq(owner))
                    .filter(recycling_transactions::created_at.ge(guard.day_start))
                    .count()
                    .get_result(conn)
                    .await?;
                if today >= cap {
                    return Ok(RecordOutcome::DailyLimitReached);
                }

                let duplicate = diesel::select(diesel::dsl::exists(
                    recycling_transactions::table
                        .filter(recycling_transactions::user_id.eq(owner))
                        .filter(recycling_transactions::material_type.eq(row.material_type))
                        .filter(recycling_transactions::weight_kg.eq(row.weight_kg))
                        .filter(recycling_transactions::created_at.ge(guard.duplicate_since)),
                ))
                .get_result::<bool>(conn)
                .await?;
                if duplicate {
                    return Ok(RecordOutcome::Duplicate);
                }

                diesel::insert_into(recycling_transactions::table)
                    .values(&row)
                    .execute(conn)
                    .await?;

                diesel::update(users::table.filter(users::id.eq(owner)))
                    .set(users::points.eq(users::points + points))
                    .execute(conn)
                    .await?;
                Ok(RecordOutcome::Recorded)
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<RecyclingTransaction>, RecyclingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = recycling_transactions::table
            .filter(recycling_transactions::id.eq(id))
            .select(RecyclingTransactionRow::as_select())
            .first::<RecyclingTransactionRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_transaction).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<RecyclingTransaction>, RecyclingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<RecyclingTransactionRow> = recycling_transactions::table
            .filter(recycling_transactions::user_id.eq(user_id.as_uuid()))
            .order((
                recycling_transactions::created_at.asc(),
                recycling_transactions::id.asc(),
            ))
            .select(RecyclingTransactionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows.into_iter().map(row_to_transaction).collect()
    }
}
