use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::errors::CompanyError;
use super::models::{CompanyListResponse, CompanyResponse, CreateCompanyRequest, UpdateCompanyRequest};
use super::repository::CompanyRepository;
use crate::auth::Caller;
use crate::domain::{AddressInput, CompanyFilter, CreateCompanyInput, UpdateCompanyInput};

/// Company business service independent of web framework
pub struct CompanyCatalog<R: CompanyRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CompanyRepository + ?Sized> CompanyCatalog<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a company with its addresses and working hours. Superuser only.
    ///
    /// # Examples
    /// ```
    /// use catalog::{Caller, CompanyCatalog};
    /// use catalog::companies::{models::CreateCompanyRequest, repository::mock::InMemoryCompanyRepository, CompanyError};
    /// use std::sync::Arc;
    /// let svc = CompanyCatalog::new(Arc::new(InMemoryCompanyRepository::new()));
    /// let req: CreateCompanyRequest = serde_json::from_str(r#"{"name": "Wash & Go", "manager_ids": [7]}"#).unwrap();
    /// let denied = tokio_test::block_on(svc.create(&Caller::new(7, "manager"), req.clone()));
    /// assert!(matches!(denied, Err(CompanyError::SuperuserRequired)));
    /// let company = tokio_test::block_on(svc.create(&Caller::superuser(1), req)).unwrap();
    /// assert_eq!(company.manager_ids, vec![7]);
    /// ```
    #[instrument(skip(self, caller, req), fields(user_id = caller.user_id))]
    pub async fn create(&self, caller: &Caller, req: CreateCompanyRequest) -> Result<CompanyResponse, CompanyError> {
        if !caller.is_superuser() {
            return Err(CompanyError::SuperuserRequired);
        }
        let input = CreateCompanyInput::from(req);
        validate_create(&input)?;

        let company = self.repo.create(input).await?;
        info!(company_id = company.id, addresses = company.addresses.len(), "company_created");
        Ok(company.into())
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<CompanyResponse, CompanyError> {
        let company = self.repo.get_by_id(id).await?;
        Ok(company.into())
    }

    #[instrument(skip(self, filter), fields(tags = ?filter.tags, city = ?filter.city))]
    pub async fn list(&self, filter: CompanyFilter) -> Result<CompanyListResponse, CompanyError> {
        if let Some(p) = &filter.pagination {
            p.validate().map_err(CompanyError::Validation)?;
        }
        let (companies, page) = self.repo.list(&filter).await?;
        debug!(count = companies.len(), "companies listed");
        Ok(CompanyListResponse::new(companies, page))
    }

    /// Partial update. Superuser or a manager of the company.
    #[instrument(skip(self, caller, req), fields(user_id = caller.user_id))]
    pub async fn update(&self, caller: &Caller, id: i64, req: UpdateCompanyRequest) -> Result<CompanyResponse, CompanyError> {
        self.check_access(caller, id).await?;
        let input = UpdateCompanyInput::from(req);
        validate_update(&input)?;

        let company = self.repo.update(id, input).await?;
        info!(company_id = company.id, "company_updated");
        Ok(company.into())
    }

    /// Superuser only.
    #[instrument(skip(self, caller), fields(user_id = caller.user_id))]
    pub async fn delete(&self, caller: &Caller, id: i64) -> Result<(), CompanyError> {
        if !caller.is_superuser() {
            return Err(CompanyError::SuperuserRequired);
        }
        self.repo.delete(id).await?;
        info!(company_id = id, "company_deleted");
        Ok(())
    }

    async fn check_access(&self, caller: &Caller, company_id: i64) -> Result<(), CompanyError> {
        if caller.is_superuser() {
            return Ok(());
        }
        if self.repo.is_manager(company_id, caller.user_id).await? {
            Ok(())
        } else {
            Err(CompanyError::AccessDenied)
        }
    }
}

fn validate_name(name: &str) -> Result<(), CompanyError> {
    if name.trim().is_empty() {
        return Err(CompanyError::Validation("name is required".into()));
    }
    Ok(())
}

fn validate_addresses(addresses: &[AddressInput]) -> Result<(), CompanyError> {
    addresses.iter().try_for_each(|a| a.validate().map_err(CompanyError::Validation))
}

fn validate_create(input: &CreateCompanyInput) -> Result<(), CompanyError> {
    validate_name(&input.name)?;
    validate_addresses(&input.addresses)?;
    input.working_hours.validate().map_err(CompanyError::Validation)
}

fn validate_update(input: &UpdateCompanyInput) -> Result<(), CompanyError> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(addresses) = &input.addresses {
        validate_addresses(addresses)?;
    }
    if let Some(hours) = &input.working_hours {
        hours.validate().map_err(CompanyError::Validation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::models::{AddressRequest, CoordinatesDto, DayScheduleDto, WorkingHoursDto};
    use crate::companies::repository::mock::InMemoryCompanyRepository;
    use crate::domain::TimeOfDay;
    use crate::pagination::Pagination;

    fn catalog() -> CompanyCatalog<InMemoryCompanyRepository> {
        CompanyCatalog::new(Arc::new(InMemoryCompanyRepository::new()))
    }

    fn open_day(o: (u32, u32), c: (u32, u32)) -> DayScheduleDto {
        DayScheduleDto { is_open: true, open_time: TimeOfDay::new(o.0, o.1), close_time: TimeOfDay::new(c.0, c.1) }
    }

    fn full_week() -> WorkingHoursDto {
        let weekday = open_day((9, 0), (20, 0));
        WorkingHoursDto {
            monday: weekday,
            tuesday: weekday,
            wednesday: weekday,
            thursday: weekday,
            friday: open_day((9, 0), (22, 0)),
            saturday: open_day((10, 0), (18, 0)),
            sunday: DayScheduleDto::default(),
        }
    }

    fn addr(city: &str, building: &str) -> AddressRequest {
        AddressRequest {
            id: None,
            city: city.into(),
            street: "Pushkina".into(),
            building: building.into(),
            coordinates: CoordinatesDto { latitude: 59.93, longitude: 30.33 },
        }
    }

    fn request(name: &str, tags: &[&str], managers: &[i64]) -> CreateCompanyRequest {
        CreateCompanyRequest {
            name: name.into(),
            logo: None,
            description: Some("car care".into()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            addresses: vec![addr("Saint Petersburg", "10"), addr("Saint Petersburg", "12A")],
            working_hours: full_week(),
            manager_ids: managers.to_vec(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips_nested_collections() {
        let svc = catalog();
        let created = svc.create(&Caller::superuser(1), request("Shine", &["wash"], &[5])).await.unwrap();
        assert_eq!(created.addresses.len(), 2);
        assert_eq!(created.working_hours, full_week());

        let fetched = svc.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.working_hours.friday.close_time, TimeOfDay::new(22, 0));
        assert!(!fetched.working_hours.sunday.is_open);
        assert_eq!(fetched.working_hours.sunday.open_time, None);
    }

    #[tokio::test]
    async fn create_and_delete_require_superuser() {
        let svc = catalog();
        let manager = Caller::new(5, "manager");
        assert!(matches!(
            svc.create(&manager, request("Nope", &[], &[5])).await,
            Err(CompanyError::SuperuserRequired)
        ));

        let created = svc.create(&Caller::superuser(1), request("Shine", &[], &[5])).await.unwrap();
        assert!(matches!(svc.delete(&manager, created.id).await, Err(CompanyError::SuperuserRequired)));
        svc.delete(&Caller::superuser(1), created.id).await.unwrap();
        assert!(matches!(svc.get_by_id(created.id).await, Err(CompanyError::NotFound)));
        assert!(matches!(svc.delete(&Caller::superuser(1), created.id).await, Err(CompanyError::NotFound)));
    }

    #[tokio::test]
    async fn update_access_rules() {
        let svc = catalog();
        let created = svc.create(&Caller::superuser(1), request("Shine", &[], &[5])).await.unwrap();
        let rename = UpdateCompanyRequest { name: Some("Shine Plus".into()), ..Default::default() };

        let stranger = Caller::new(6, "manager");
        assert!(matches!(
            svc.update(&stranger, created.id, rename.clone()).await,
            Err(CompanyError::AccessDenied)
        ));

        let owner = Caller::new(5, "manager");
        let updated = svc.update(&owner, created.id, rename.clone()).await.unwrap();
        assert_eq!(updated.name, "Shine Plus");

        // manager check against a missing company is not-found, not access-denied
        assert!(matches!(svc.update(&owner, 9999, rename).await, Err(CompanyError::NotFound)));
    }

    #[tokio::test]
    async fn update_with_absent_fields_changes_nothing_else() {
        let svc = catalog();
        let created = svc.create(&Caller::superuser(1), request("Shine", &["wash", "polish"], &[5])).await.unwrap();

        let updated = svc
            .update(&Caller::superuser(1), created.id, UpdateCompanyRequest { logo: Some("logo.png".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.tags, created.tags);
        assert_eq!(updated.addresses, created.addresses);
        assert_eq!(updated.working_hours, created.working_hours);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.logo.as_deref(), Some("logo.png"));
    }

    #[tokio::test]
    async fn update_replaces_address_set() {
        let svc = catalog();
        let created = svc.create(&Caller::superuser(1), request("Shine", &[], &[5])).await.unwrap();
        let old: Vec<i64> = created.addresses.iter().map(|a| a.id).collect();

        let updated = svc
            .update(
                &Caller::superuser(1),
                created.id,
                UpdateCompanyRequest { addresses: Some(vec![addr("Moscow", "1")]), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(updated.addresses.len(), 1);
        assert_eq!(updated.addresses[0].city, "Moscow");
        assert!(!old.contains(&updated.addresses[0].id));

        let cleared = svc
            .update(&Caller::superuser(1), created.id, UpdateCompanyRequest { addresses: Some(vec![]), ..Default::default() })
            .await
            .unwrap();
        assert!(cleared.addresses.is_empty());
    }

    #[tokio::test]
    async fn validation_errors() {
        let svc = catalog();
        let su = Caller::superuser(1);
        assert!(matches!(svc.create(&su, request("   ", &[], &[])).await, Err(CompanyError::Validation(_))));

        let mut bad_hours = request("Shine", &[], &[]);
        bad_hours.working_hours.monday = DayScheduleDto { is_open: true, open_time: TimeOfDay::new(9, 0), close_time: None };
        assert!(matches!(svc.create(&su, bad_hours).await, Err(CompanyError::Validation(m)) if m.contains("monday")));

        let created = svc.create(&su, request("Shine", &[], &[])).await.unwrap();
        assert!(matches!(
            svc.update(&su, created.id, UpdateCompanyRequest { name: Some("".into()), ..Default::default() }).await,
            Err(CompanyError::Validation(_))
        ));

        let bad_page = CompanyFilter { pagination: Some(Pagination { page: 0, limit: 10 }), ..Default::default() };
        assert!(matches!(svc.list(bad_page).await, Err(CompanyError::Validation(_))));
    }

    #[tokio::test]
    async fn list_pagination_and_filters() {
        let svc = catalog();
        let su = Caller::superuser(1);
        for i in 0..25 {
            let tags: &[&str] = if i % 2 == 0 { &["even"] } else { &["odd"] };
            svc.create(&su, request(&format!("Company {i}"), tags, &[])).await.unwrap();
        }

        let all = svc.list(CompanyFilter::default()).await.unwrap();
        assert_eq!(all.companies.len(), 25);
        assert!(all.pagination.is_none());
        assert_eq!(all.companies[0].name, "Company 24");

        let page2 = svc
            .list(CompanyFilter { pagination: Some(Pagination { page: 2, limit: 10 }), ..Default::default() })
            .await
            .unwrap();
        let p = page2.pagination.unwrap();
        assert_eq!((p.page, p.limit, p.total_items, p.total_pages), (2, 10, 25, 3));
        assert_eq!(page2.companies.len(), 10);

        let even = svc
            .list(CompanyFilter {
                tags: vec!["even".into()],
                pagination: Some(Pagination { page: 1, limit: 10 }),
                ..Default::default()
            })
            .await
            .unwrap();
        let p = even.pagination.unwrap();
        assert_eq!(p.total_items, 13);
        assert_eq!(p.total_pages, 2);

        let by_city = svc
            .list(CompanyFilter { city: Some("Saint Petersburg".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(by_city.companies.len(), 25);
        let nowhere = svc.list(CompanyFilter { city: Some("Kazan".into()), ..Default::default() }).await.unwrap();
        assert!(nowhere.companies.is_empty());

        let err = svc
            .list(CompanyFilter { pagination: Some(Pagination { page: u64::MAX, limit: 100 }), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, CompanyError::Validation(_)));
    }
}
