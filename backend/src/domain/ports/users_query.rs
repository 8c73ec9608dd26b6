//! Driving port for user-facing queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch user-visible data
//! without importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Email, Error, User, UserId};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a user, failing with `not_found` when absent.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;
}

/// Fixture users query that always resolves to a zero-balance user.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersQuery;

#[async_trait]
impl UsersQuery for FixtureUsersQuery {
    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        const FIXTURE_EMAIL: &str = "ada@example.com";

        let email = Email::new(FIXTURE_EMAIL)
            .map_err(|err| Error::internal(format!("invalid fixture email: {err}")))?;
        Ok(User::new(*id, email, 0))
    }
}
