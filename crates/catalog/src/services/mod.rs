//! Services offered by a company: repository abstraction, `sea-orm` store,
//! DTOs and the application service that enriches reads with prices.

pub mod errors;
pub mod models;
pub mod repo;
pub mod repository;
pub mod service;

pub use errors::ServiceError;
pub use repository::ServiceRepository;
pub use service::ServiceCatalog;
