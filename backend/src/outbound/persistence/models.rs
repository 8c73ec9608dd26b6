//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{recycling_transactions, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub points: i64,
}

/// Insertable struct for registering users. `points` and `created_at` use
/// column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
}

/// Row struct for reading from the recycling_transactions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recycling_transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecyclingTransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub material_type: String,
    pub weight_kg: f64,
    pub points_earned: i64,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for recording a transaction.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recycling_transactions)]
pub(crate) struct NewRecyclingTransactionRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub material_type: &'a str,
    pub weight_kg: f64,
    pub points_earned: i64,
    pub created_at: DateTime<Utc>,
}
