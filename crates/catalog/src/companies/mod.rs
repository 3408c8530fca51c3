//! Companies: repository abstraction, `sea-orm` store, DTOs and the
//! access-controlled application service.

pub mod errors;
pub mod models;
pub mod repo;
pub mod repository;
pub mod service;

pub use errors::CompanyError;
pub use repository::CompanyRepository;
pub use service::CompanyCatalog;
