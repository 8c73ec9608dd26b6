//! Driving port for recycling reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, RecyclingTransaction, UserId};

/// Read access to recorded transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecyclingQuery: Send + Sync {
    /// Fetch one transaction; absence is not an error.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RecyclingTransaction>, Error>;

    /// A user's transactions, oldest first. Unknown users yield an empty list.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<RecyclingTransaction>, Error>;
}

/// Fixture query that knows no transactions.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecyclingQuery;

#[async_trait]
impl RecyclingQuery for FixtureRecyclingQuery {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<RecyclingTransaction>, Error> {
        Ok(None)
    }

    async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<RecyclingTransaction>, Error> {
        Ok(Vec::new())
    }
}
