//! Driving port for user registration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Email, Error, User};

/// Registration payload; the email is validated by the use case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    /// Email as submitted, before trimming or validation.
    pub email: String,
}

/// Domain use-case port for creating users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a new user with a zero balance.
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error>;
}

/// Fixture command returning a fresh user without persisting it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersCommand;

#[async_trait]
impl UsersCommand for FixtureUsersCommand {
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        let email = Email::new(&request.email)
            .map_err(|err| Error::invalid_request(format!("invalid email: {err}")))?;
        Ok(User::register(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_registers_with_zero_points() {
        let user = FixtureUsersCommand
            .register(RegisterUserRequest {
                email: "Ada@Example.com".to_owned(),
            })
            .await
            .expect("fixture register succeeds");

        assert_eq!(user.points(), 0);
        assert_eq!(user.email().as_ref(), "ada@example.com");
    }
}
