use std::sync::Arc;

use catalog::companies::CompanyRepository;
use catalog::pricing::PriceClient;
use catalog::services::ServiceRepository;
use catalog::{CompanyCatalog, ServiceCatalog};

pub type Companies = CompanyCatalog<dyn CompanyRepository>;
pub type Services = ServiceCatalog<dyn ServiceRepository, dyn CompanyRepository, dyn PriceClient>;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub companies: Arc<Companies>,
    pub services: Arc<Services>,
    pub service_name: Arc<str>,
}

impl AppState {
    /// Wire both application services over the given stores and price client.
    /// The service catalog shares the company store for manager checks.
    pub fn new(
        company_repo: Arc<dyn CompanyRepository>,
        service_repo: Arc<dyn ServiceRepository>,
        prices: Arc<dyn PriceClient>,
        service_name: &str,
    ) -> Self {
        Self {
            companies: Arc::new(CompanyCatalog::new(company_repo.clone())),
            services: Arc::new(ServiceCatalog::new(service_repo, company_repo, prices)),
            service_name: Arc::from(service_name),
        }
    }
}
