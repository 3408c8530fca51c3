use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::errors::ServiceError;
use super::models::{CreateServiceRequest, ServiceListResponse, ServiceResponse, UpdateServiceRequest};
use super::repository::ServiceRepository;
use crate::auth::Caller;
use crate::companies::CompanyRepository;
use crate::domain::{CreateServiceInput, UpdateServiceInput};
use crate::errors::StoreError;
use crate::pricing::{CalculatePricesRequest, PriceClient, PriceError};

/// Service business logic. Reads are enriched with prices from the
/// price client; any price failure other than "not found" leaves the
/// price fields empty instead of failing the read.
pub struct ServiceCatalog<S, C, P>
where
    S: ServiceRepository + ?Sized,
    C: CompanyRepository + ?Sized,
    P: PriceClient + ?Sized,
{
    services: Arc<S>,
    companies: Arc<C>,
    prices: Arc<P>,
}

impl<S, C, P> ServiceCatalog<S, C, P>
where
    S: ServiceRepository + ?Sized,
    C: CompanyRepository + ?Sized,
    P: PriceClient + ?Sized,
{
    pub fn new(services: Arc<S>, companies: Arc<C>, prices: Arc<P>) -> Self {
        Self { services, companies, prices }
    }

    #[instrument(skip(self, caller, req), fields(user_id = caller.user_id))]
    pub async fn create(&self, caller: &Caller, company_id: i64, req: CreateServiceRequest) -> Result<ServiceResponse, ServiceError> {
        self.check_access(caller, company_id).await?;
        let input = CreateServiceInput::from(req);
        validate_name(&input.name)?;
        validate_duration(input.average_duration)?;

        let service = self.services.create(company_id, input).await?;
        info!(company_id, service_id = service.id, "service_created");
        Ok(service.into())
    }

    /// Single service, priced for `user_id` when given.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use catalog::ServiceCatalog;
    /// use catalog::companies::repository::mock::InMemoryCompanyRepository;
    /// use catalog::domain::CreateServiceInput;
    /// use catalog::pricing::mock::{price, StubPriceClient};
    /// use catalog::services::{repository::mock::InMemoryServiceRepository, ServiceRepository};
    ///
    /// let services = Arc::new(InMemoryServiceRepository::new());
    /// services.register_company(1);
    /// let input = CreateServiceInput { name: "Wash".into(), description: None, average_duration: Some(30), address_ids: vec![] };
    /// let stored = tokio_test::block_on(services.create(1, input)).unwrap();
    ///
    /// let catalog = ServiceCatalog::new(
    ///     services,
    ///     Arc::new(InMemoryCompanyRepository::new()),
    ///     Arc::new(StubPriceClient::with_prices(vec![price(stored.id, 700.0)])),
    /// );
    /// let got = tokio_test::block_on(catalog.get_by_id(1, stored.id, Some(42))).unwrap();
    /// assert_eq!(got.price, Some(700.0));
    /// ```
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, company_id: i64, service_id: i64, user_id: Option<i64>) -> Result<ServiceResponse, ServiceError> {
        let mut resp = ServiceResponse::from(self.services.get_by_id(company_id, service_id).await?);
        self.enrich(company_id, user_id, std::slice::from_mut(&mut resp)).await?;
        Ok(resp)
    }

    #[instrument(skip(self))]
    pub async fn list_by_company(&self, company_id: i64, user_id: Option<i64>) -> Result<ServiceListResponse, ServiceError> {
        let mut list = ServiceListResponse::from(self.services.list_by_company(company_id).await?);
        self.enrich(company_id, user_id, &mut list.services).await?;
        Ok(list)
    }

    #[instrument(skip(self, caller, req), fields(user_id = caller.user_id))]
    pub async fn update(
        &self,
        caller: &Caller,
        company_id: i64,
        service_id: i64,
        req: UpdateServiceRequest,
    ) -> Result<ServiceResponse, ServiceError> {
        self.check_access(caller, company_id).await?;
        let input = UpdateServiceInput::from(req);
        if let Some(name) = &input.name {
            validate_name(name)?;
        }
        validate_duration(input.average_duration)?;

        let service = self.services.update(company_id, service_id, input).await?;
        info!(company_id, service_id, "service_updated");
        Ok(service.into())
    }

    #[instrument(skip(self, caller), fields(user_id = caller.user_id))]
    pub async fn delete(&self, caller: &Caller, company_id: i64, service_id: i64) -> Result<(), ServiceError> {
        self.check_access(caller, company_id).await?;
        self.services.delete(company_id, service_id).await?;
        info!(company_id, service_id, "service_deleted");
        Ok(())
    }

    /// Superuser, or a manager of `company_id`.
    async fn check_access(&self, caller: &Caller, company_id: i64) -> Result<(), ServiceError> {
        if caller.is_superuser() {
            return Ok(());
        }
        match self.companies.is_manager(company_id, caller.user_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ServiceError::AccessDenied),
            Err(StoreError::CompanyNotFound) => Err(ServiceError::CompanyNotFound),
            Err(e) => Err(ServiceError::Internal(e.to_string())),
        }
    }

    /// Merge prices into `services` by id. Services without a matching
    /// price entry are left as they are.
    async fn enrich(&self, company_id: i64, user_id: Option<i64>, services: &mut [ServiceResponse]) -> Result<(), ServiceError> {
        if services.is_empty() {
            return Ok(());
        }
        let req = CalculatePricesRequest {
            company_id,
            user_id,
            service_ids: services.iter().map(|s| s.id).collect(),
        };

        let resp = match self.prices.calculate_prices_with_graceful_degradation(&req).await {
            Ok(resp) => resp,
            Err(PriceError::PricesNotFound) => return Err(ServiceError::PricesNotFound),
            Err(e) => {
                warn!(company_id, error = %e, "serving services without prices");
                return Ok(());
            }
        };

        let by_id: HashMap<i64, _> = resp.prices.iter().map(|p| (p.service_id, p)).collect();
        for s in services.iter_mut() {
            if let Some(p) = by_id.get(&s.id) {
                s.enrich_with_price(p);
            }
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation("name is required".into()));
    }
    Ok(())
}

fn validate_duration(minutes: Option<i32>) -> Result<(), ServiceError> {
    match minutes {
        Some(m) if m <= 0 => Err(ServiceError::Validation("average_duration must be positive".into())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::repository::mock::InMemoryCompanyRepository;
    use crate::domain::{AddressInput, Coordinates, CreateCompanyInput, WorkingHours};
    use crate::pricing::mock::{price, StubPriceClient};
    use crate::services::repository::mock::InMemoryServiceRepository;

    type Catalog = ServiceCatalog<InMemoryServiceRepository, InMemoryCompanyRepository, StubPriceClient>;

    struct Fixture {
        catalog: Catalog,
        prices: Arc<StubPriceClient>,
        company_id: i64,
        address_ids: Vec<i64>,
    }

    /// One company managed by user 5 with two addresses, mirrored into the service mock.
    async fn fixture(prices: StubPriceClient) -> Fixture {
        let companies = Arc::new(InMemoryCompanyRepository::new());
        let company = companies
            .create(CreateCompanyInput {
                name: "Shine".into(),
                logo: None,
                description: None,
                tags: vec![],
                addresses: ["1", "2"]
                    .iter()
                    .map(|b| AddressInput {
                        city: "Kazan".into(),
                        street: "Baumana".into(),
                        building: b.to_string(),
                        coordinates: Coordinates { latitude: 55.79, longitude: 49.12 },
                    })
                    .collect(),
                working_hours: WorkingHours::default(),
                manager_ids: vec![5],
            })
            .await
            .unwrap();

        let services = Arc::new(InMemoryServiceRepository::new());
        services.register_company(company.id);
        for a in &company.addresses {
            services.register_address(company.id, a.id);
        }
        let prices = Arc::new(prices);
        Fixture {
            catalog: ServiceCatalog::new(services, companies, prices.clone()),
            prices,
            company_id: company.id,
            address_ids: company.addresses.iter().map(|a| a.id).collect(),
        }
    }

    fn create_req(name: &str, address_ids: Vec<i64>) -> CreateServiceRequest {
        CreateServiceRequest { name: name.into(), description: None, average_duration: Some(60), address_ids }
    }

    #[tokio::test]
    async fn manager_and_superuser_may_mutate() {
        let f = fixture(StubPriceClient::with_prices(vec![])).await;
        let manager = Caller::new(5, "manager");

        let s = f.catalog.create(&manager, f.company_id, create_req("Wash", f.address_ids.clone())).await.unwrap();
        assert_eq!(s.address_ids, f.address_ids);
        assert!(!s.is_priced());

        let updated = f
            .catalog
            .update(&Caller::superuser(1), f.company_id, s.id, UpdateServiceRequest { name: Some("Deluxe".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.name, "Deluxe");
        assert_eq!(updated.address_ids, f.address_ids);

        f.catalog.delete(&manager, f.company_id, s.id).await.unwrap();
        assert!(matches!(f.catalog.get_by_id(f.company_id, s.id, None).await, Err(ServiceError::ServiceNotFound)));
        // mutations never ask for prices
        assert_eq!(f.prices.calls(), 0);
    }

    #[tokio::test]
    async fn stranger_is_denied_and_unknown_company_is_not_found() {
        let f = fixture(StubPriceClient::with_prices(vec![])).await;
        let stranger = Caller::new(6, "manager");
        assert!(matches!(
            f.catalog.create(&stranger, f.company_id, create_req("Wash", vec![])).await,
            Err(ServiceError::AccessDenied)
        ));
        assert!(matches!(f.catalog.delete(&stranger, f.company_id, 1).await, Err(ServiceError::AccessDenied)));
        assert!(matches!(
            f.catalog.create(&stranger, 9999, create_req("Wash", vec![])).await,
            Err(ServiceError::CompanyNotFound)
        ));
        assert!(matches!(
            f.catalog.create(&Caller::superuser(1), 9999, create_req("Wash", vec![])).await,
            Err(ServiceError::CompanyNotFound)
        ));
    }

    #[tokio::test]
    async fn foreign_address_is_invalid_reference() {
        let f = fixture(StubPriceClient::with_prices(vec![])).await;
        let res = f.catalog.create(&Caller::superuser(1), f.company_id, create_req("Wash", vec![424242])).await;
        assert!(matches!(res, Err(ServiceError::InvalidReference(m)) if m.contains("424242")));
    }

    #[tokio::test]
    async fn validation_runs_after_access_check() {
        let f = fixture(StubPriceClient::with_prices(vec![])).await;
        let su = Caller::superuser(1);
        assert!(matches!(f.catalog.create(&su, f.company_id, create_req(" ", vec![])).await, Err(ServiceError::Validation(_))));
        let mut zero = create_req("Wash", vec![]);
        zero.average_duration = Some(0);
        assert!(matches!(f.catalog.create(&su, f.company_id, zero).await, Err(ServiceError::Validation(_))));
        assert!(matches!(
            f.catalog.create(&Caller::new(6, "x"), f.company_id, create_req(" ", vec![])).await,
            Err(ServiceError::AccessDenied)
        ));
    }

    #[tokio::test]
    async fn list_merges_prices_by_service_id() {
        // mock ids start at 1; only the first service has a price
        let f = fixture(StubPriceClient::with_prices(vec![price(1, 900.0)])).await;
        let su = Caller::superuser(1);
        let a = f.catalog.create(&su, f.company_id, create_req("A", vec![])).await.unwrap();
        let b = f.catalog.create(&su, f.company_id, create_req("B", vec![])).await.unwrap();
        assert_eq!(a.id, 1);

        let list = f.catalog.list_by_company(f.company_id, Some(77)).await.unwrap();
        assert_eq!(list.services.len(), 2);
        let by_id: HashMap<i64, &ServiceResponse> = list.services.iter().map(|s| (s.id, s)).collect();
        assert_eq!(by_id[&a.id].price, Some(900.0));
        assert_eq!(by_id[&a.id].currency.as_deref(), Some("RUB"));
        assert!(!by_id[&b.id].is_priced());

        let sent = f.prices.last_request().unwrap();
        assert_eq!(sent.company_id, f.company_id);
        assert_eq!(sent.user_id, Some(77));
        assert_eq!(sent.service_ids.len(), 2);
    }

    #[tokio::test]
    async fn unavailable_prices_degrade_silently() {
        let f = fixture(StubPriceClient::unavailable()).await;
        let su = Caller::superuser(1);
        let s = f.catalog.create(&su, f.company_id, create_req("A", vec![])).await.unwrap();

        let list = f.catalog.list_by_company(f.company_id, None).await.unwrap();
        assert_eq!(list.services.len(), 1);
        assert!(list.services.iter().all(|s| !s.is_priced()));

        let single = f.catalog.get_by_id(f.company_id, s.id, None).await.unwrap();
        assert!(!single.is_priced());
        assert_eq!(f.prices.calls(), 2);
    }

    #[tokio::test]
    async fn prices_not_found_propagates() {
        let f = fixture(StubPriceClient::not_found()).await;
        let s = f.catalog.create(&Caller::superuser(1), f.company_id, create_req("A", vec![])).await.unwrap();
        assert!(matches!(f.catalog.get_by_id(f.company_id, s.id, None).await, Err(ServiceError::PricesNotFound)));
        assert!(matches!(f.catalog.list_by_company(f.company_id, None).await, Err(ServiceError::PricesNotFound)));
    }

    #[tokio::test]
    async fn empty_list_skips_price_call() {
        let f = fixture(StubPriceClient::not_found()).await;
        let list = f.catalog.list_by_company(f.company_id, None).await.unwrap();
        assert!(list.services.is_empty());
        let unknown = f.catalog.list_by_company(9999, None).await.unwrap();
        assert!(unknown.services.is_empty());
        assert_eq!(f.prices.calls(), 0);
    }

    #[tokio::test]
    async fn wrong_company_scope_is_not_found() {
        let f = fixture(StubPriceClient::with_prices(vec![])).await;
        let su = Caller::superuser(1);
        let s = f.catalog.create(&su, f.company_id, create_req("A", vec![])).await.unwrap();
        assert!(matches!(f.catalog.get_by_id(f.company_id + 1, s.id, None).await, Err(ServiceError::ServiceNotFound)));
        assert!(matches!(
            f.catalog.update(&su, f.company_id + 1, s.id, UpdateServiceRequest::default()).await,
            Err(ServiceError::ServiceNotFound)
        ));
        assert!(matches!(f.catalog.delete(&su, f.company_id + 1, s.id).await, Err(ServiceError::ServiceNotFound)));
    }

    #[tokio::test]
    async fn update_clears_links_with_empty_list() {
        let f = fixture(StubPriceClient::with_prices(vec![])).await;
        let su = Caller::superuser(1);
        let s = f.catalog.create(&su, f.company_id, create_req("A", f.address_ids.clone())).await.unwrap();
        let cleared = f
            .catalog
            .update(&su, f.company_id, s.id, UpdateServiceRequest { address_ids: Some(vec![]), ..Default::default() })
            .await
            .unwrap();
        assert!(cleared.address_ids.is_empty());
    }
}
