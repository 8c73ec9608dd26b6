//! User registration and lookup services.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    RegisterUserRequest, UserPersistenceError, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{Email, Error, User, UserId};

const EMAIL_TAKEN: &str = "Email already registered";

fn email_taken() -> Error {
    Error::conflict(EMAIL_TAKEN).with_details(json!({ "reason": "email_already_registered" }))
}

pub(super) fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => email_taken(),
    }
}

/// User service implementing the registration and lookup driving ports.
#[derive(Clone)]
pub struct UserService<R> {
    user_repo: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a new service backed by the user repository.
    #[must_use]
    pub const fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        let email = Email::new(&request.email).map_err(|err| {
            Error::invalid_request(format!("invalid email: {err}"))
                .with_details(json!({ "field": "email" }))
        })?;

        let existing = self
            .user_repo
            .find_by_email(&email)
            .await
            .map_err(map_user_repository_error)?;
        if existing.is_some() {
            return Err(email_taken());
        }

        let user = User::register(email);
        // The unique index still guards against a concurrent registration.
        self.user_repo
            .insert(&user)
            .await
            .map_err(map_user_repository_error)?;

        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.user_repo
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockUserRepository;

    fn request(email: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            email: email.to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn register_persists_normalised_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email.as_ref() == "ada@example.com")
            .times(1)
            .return_once(|_| Ok(None));
        repo.expect_insert()
            .withf(|user| user.points() == 0)
            .times(1)
            .return_once(|_| Ok(()));

        let service = UserService::new(Arc::new(repo));
        let user = service
            .register(request("  Ada@Example.com "))
            .await
            .expect("registration succeeds");

        assert_eq!(user.email().as_ref(), "ada@example.com");
        assert_eq!(user.points(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn register_rejects_invalid_email_without_touching_storage() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(0);
        repo.expect_insert().times(0);

        let service = UserService::new(Arc::new(repo));
        let error = service
            .register(request("not-an-email"))
            .await
            .expect_err("invalid email");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details().and_then(|d| d.get("field")),
            Some(&json!("email"))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn register_rejects_taken_email_with_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(1).return_once(|email| {
            Ok(Some(User::register(email.clone())))
        });
        repo.expect_insert().times(0);

        let service = UserService::new(Arc::new(repo));
        let error = service
            .register(request("ada@example.com"))
            .await
            .expect_err("duplicate email");

        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.reason(), Some("email_already_registered"));
    }

    #[rstest]
    #[tokio::test]
    async fn register_maps_insert_race_to_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().return_once(|_| Ok(None));
        repo.expect_insert()
            .return_once(|_| Err(UserPersistenceError::duplicate_email("ada@example.com")));

        let service = UserService::new(Arc::new(repo));
        let error = service
            .register(request("ada@example.com"))
            .await
            .expect_err("duplicate email");

        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("bad sql"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn get_user_maps_repository_errors(
        #[case] failure: UserPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().return_once(move |_| Err(failure));

        let service = UserService::new(Arc::new(repo));
        let error = service
            .get_user(&UserId::random())
            .await
            .expect_err("repository failure");

        assert_eq!(error.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn get_user_reports_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));

        let service = UserService::new(Arc::new(repo));
        let error = service
            .get_user(&UserId::random())
            .await
            .expect_err("missing user");

        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "User not found");
    }
}
