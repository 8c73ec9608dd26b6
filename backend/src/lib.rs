//! DropMe recycling rewards backend.
//!
//! Hexagonal layout: [`domain`] holds the scoring rules and services,
//! [`inbound`] the actix-web adapter and [`outbound`] the Diesel and
//! in-memory repositories.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
