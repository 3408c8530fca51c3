//! `sea-orm` entities for the seller catalog schema and the connection bootstrap.
//!
//! Tables: `companies`, `addresses`, `working_hours`, `services`,
//! `service_addresses`. Schema lives in the `migration` crate.

pub mod db;
pub mod company;
pub mod address;
pub mod working_hours;
pub mod service;
pub mod service_address;
