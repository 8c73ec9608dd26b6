//! HTTP inbound adapter exposing REST endpoints.

pub mod envelope;
pub mod error;
pub mod health;
pub mod recycling;
pub mod schemas;
pub mod state;
pub mod users;
pub mod validation;

pub use error::{ApiResult, json_config};

use actix_web::web;

/// Register the `/api/v1` resources.
///
/// `/recycling/user/{user_id}` is registered ahead of `/recycling/{id}`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use dropme_backend::inbound::http::api_routes;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(api_routes));
/// ```
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register_user)
        .service(users::get_user)
        .service(recycling::create_transaction)
        .service(recycling::list_user_transactions)
        .service(recycling::get_transaction)
        .service(recycling::delete_transaction);
}
