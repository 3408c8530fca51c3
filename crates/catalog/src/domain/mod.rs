//! Aggregate types and their create/update input shapes.

pub mod address;
pub mod company;
pub mod service;
pub mod working_hours;

pub use address::{Address, AddressInput, Coordinates};
pub use company::{Company, CompanyFilter, CreateCompanyInput, UpdateCompanyInput};
pub use service::{CreateServiceInput, Service, UpdateServiceInput};
pub use working_hours::{DaySchedule, TimeOfDay, WorkingHours};
