//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureRecyclingCommand, FixtureRecyclingQuery, FixtureUsersCommand, FixtureUsersQuery,
    RecyclingCommand, RecyclingQuery, UsersCommand, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Registration use-case.
    pub users_command: Arc<dyn UsersCommand>,
    /// User lookup use-case.
    pub users: Arc<dyn UsersQuery>,
    /// Submission and deletion use-case.
    pub recycling: Arc<dyn RecyclingCommand>,
    /// Transaction history use-case.
    pub recycling_query: Arc<dyn RecyclingQuery>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            users_command: Arc::new(FixtureUsersCommand),
            users: Arc::new(FixtureUsersQuery),
            recycling: Arc::new(FixtureRecyclingCommand),
            recycling_query: Arc::new(FixtureRecyclingQuery),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration use-case.
    pub users_command: Arc<dyn UsersCommand>,
    /// User lookup use-case.
    pub users: Arc<dyn UsersQuery>,
    /// Submission and deletion use-case.
    pub recycling: Arc<dyn RecyclingCommand>,
    /// Transaction history use-case.
    pub recycling_query: Arc<dyn RecyclingQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use dropme_backend::domain::ports::FixtureRecyclingCommand;
    /// use dropme_backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let ports = HttpStatePorts {
    ///     recycling: Arc::new(FixtureRecyclingCommand),
    ///     ..HttpStatePorts::default()
    /// };
    /// let state = HttpState::new(ports);
    /// let _recycling = state.recycling.clone();
    /// ```
    #[must_use]
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users_command,
            users,
            recycling,
            recycling_query,
        } = ports;
        Self {
            users_command,
            users,
            recycling,
            recycling_query,
        }
    }
}
