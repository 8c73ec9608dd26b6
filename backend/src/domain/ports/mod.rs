//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) describe what the domain needs from storage
//! and expose typed errors generated by `define_port_error!`. Driving ports
//! (`*Command`, `*Query`) are the use-case entry points inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod recycling_command;
mod recycling_query;
mod recycling_repository;
mod user_repository;
mod users_command;
mod users_query;

pub use recycling_command::{FixtureRecyclingCommand, RecyclingCommand, SubmitRecyclingRequest};
#[cfg(test)]
pub use recycling_command::MockRecyclingCommand;
pub use recycling_query::{FixtureRecyclingQuery, RecyclingQuery};
#[cfg(test)]
pub use recycling_query::MockRecyclingQuery;
pub use recycling_repository::{
    FixtureRecyclingRepository, RecyclingRepository, RecyclingRepositoryError,
};
#[cfg(test)]
pub use recycling_repository::MockRecyclingRepository;
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use users_command::{FixtureUsersCommand, RegisterUserRequest, UsersCommand};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_query::{FixtureUsersQuery, UsersQuery};
#[cfg(test)]
pub use users_query::MockUsersQuery;
