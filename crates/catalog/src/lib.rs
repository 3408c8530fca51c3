//! Seller catalog core: companies with their addresses and weekly hours,
//! the services they offer, and price enrichment for service reads.
//! - `domain` holds plain aggregate types and their input shapes.
//! - `companies` / `services` follow repository → store → application service layering.
//! - `pricing` talks to the remote price calculator and degrades gracefully.
//! - `instrumentation` observes every SQL statement on a connection.

pub mod auth;
pub mod domain;
pub mod errors;
pub mod pagination;
pub mod companies;
pub mod services;
pub mod pricing;
pub mod instrumentation;
#[cfg(test)]
pub mod test_support;

pub use auth::{Caller, Role};
pub use companies::CompanyCatalog;
pub use services::ServiceCatalog;
