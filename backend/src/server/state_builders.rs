//! Builders wiring domain services onto the configured repositories.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use dropme_backend::domain::ports::{RecyclingRepository, UserRepository};
use dropme_backend::domain::{RecyclingPolicy, RecyclingService, UserService};
use dropme_backend::inbound::http::state::{HttpState, HttpStatePorts};
use dropme_backend::outbound::memory::InMemoryStore;
use dropme_backend::outbound::persistence::{DieselRecyclingRepository, DieselUserRepository};

use super::ServerConfig;

/// Wire the user and recycling services over one pair of repositories.
///
/// Both services share the same user repository so balances credited by
/// submissions are visible to user lookups.
pub(crate) fn build_ports<U, R>(
    users: Arc<U>,
    recycling: Arc<R>,
    policy: RecyclingPolicy,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    R: RecyclingRepository + 'static,
{
    let user_service = Arc::new(UserService::new(users.clone()));
    let recycling_service = Arc::new(RecyclingService::new(
        users,
        recycling,
        Arc::new(DefaultClock),
        policy,
    ));
    HttpStatePorts {
        users_command: user_service.clone(),
        users: user_service,
        recycling: recycling_service.clone(),
        recycling_query: recycling_service,
    }
}

/// Build HTTP state from Diesel repositories when a pool is configured,
/// otherwise from a fresh in-memory store.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => build_ports(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselRecyclingRepository::new(pool.clone())),
            config.policy,
        ),
        None => {
            let store = Arc::new(InMemoryStore::new());
            build_ports(store.clone(), store, config.policy)
        }
    };
    web::Data::new(HttpState::new(ports))
}
