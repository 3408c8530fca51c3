use async_trait::async_trait;

use crate::domain::{Company, CompanyFilter, CreateCompanyInput, UpdateCompanyInput};
use crate::errors::StoreError;
use crate::pagination::PageInfo;

/// Persistence for the company aggregate (company, addresses, working hours).
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert company, addresses and working hours atomically.
    async fn create(&self, input: CreateCompanyInput) -> Result<Company, StoreError>;
    async fn get_by_id(&self, id: i64) -> Result<Company, StoreError>;
    /// Newest first. Pagination info is returned only when the filter asks for a page.
    async fn list(&self, filter: &CompanyFilter) -> Result<(Vec<Company>, Option<PageInfo>), StoreError>;
    async fn update(&self, id: i64, input: UpdateCompanyInput) -> Result<Company, StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
    async fn is_manager(&self, company_id: i64, user_id: i64) -> Result<bool, StoreError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::Utc;

    use crate::domain::{Address, AddressInput};

    #[derive(Default)]
    struct State {
        next_company_id: i64,
        next_address_id: i64,
        companies: BTreeMap<i64, Company>,
    }

    impl State {
        fn materialize(&mut self, company_id: i64, inputs: Vec<AddressInput>) -> Vec<Address> {
            let now = Utc::now();
            inputs
                .into_iter()
                .map(|a| {
                    self.next_address_id += 1;
                    Address {
                        id: self.next_address_id,
                        company_id,
                        city: a.city,
                        street: a.street,
                        building: a.building,
                        coordinates: a.coordinates,
                        created_at: now,
                        updated_at: now,
                    }
                })
                .collect()
        }
    }

    #[derive(Default)]
    pub struct InMemoryCompanyRepository {
        state: Mutex<State>,
    }

    impl InMemoryCompanyRepository {
        pub fn new() -> Self { Self::default() }

        pub fn len(&self) -> usize { self.state.lock().unwrap().companies.len() }

        pub fn is_empty(&self) -> bool { self.len() == 0 }
    }

    #[async_trait]
    impl CompanyRepository for InMemoryCompanyRepository {
        async fn create(&self, input: CreateCompanyInput) -> Result<Company, StoreError> {
            let mut st = self.state.lock().unwrap();
            st.next_company_id += 1;
            let id = st.next_company_id;
            let addresses = st.materialize(id, input.addresses);
            let now = Utc::now();
            let company = Company {
                id,
                name: input.name,
                logo: input.logo,
                description: input.description,
                tags: input.tags,
                addresses,
                working_hours: input.working_hours,
                manager_ids: input.manager_ids,
                created_at: now,
                updated_at: now,
            };
            st.companies.insert(id, company.clone());
            Ok(company)
        }

        async fn get_by_id(&self, id: i64) -> Result<Company, StoreError> {
            let st = self.state.lock().unwrap();
            st.companies.get(&id).cloned().ok_or(StoreError::CompanyNotFound)
        }

        async fn list(&self, filter: &CompanyFilter) -> Result<(Vec<Company>, Option<PageInfo>), StoreError> {
            let st = self.state.lock().unwrap();
            let mut matching: Vec<Company> = st
                .companies
                .values()
                .filter(|c| filter.tags.is_empty() || c.tags.iter().any(|t| filter.tags.contains(t)))
                .filter(|c| match &filter.city {
                    Some(city) => c.addresses.iter().any(|a| &a.city == city),
                    None => true,
                })
                .cloned()
                .collect();
            // newest first; ids break ties between equal timestamps
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

            match filter.pagination {
                Some(p) => {
                    let total = matching.len() as u64;
                    let page = matching
                        .into_iter()
                        .skip(p.offset().and_then(|o| usize::try_from(o).ok()).unwrap_or(usize::MAX))
                        .take(p.limit as usize)
                        .collect();
                    Ok((page, Some(PageInfo { page: p.page, limit: p.limit, total })))
                }
                None => Ok((matching, None)),
            }
        }

        async fn update(&self, id: i64, input: UpdateCompanyInput) -> Result<Company, StoreError> {
            let mut st = self.state.lock().unwrap();
            if !st.companies.contains_key(&id) {
                return Err(StoreError::CompanyNotFound);
            }
            let new_addresses = input.addresses.map(|list| st.materialize(id, list));
            let company = st.companies.get_mut(&id).ok_or(StoreError::CompanyNotFound)?;
            if let Some(name) = input.name {
                company.name = name;
            }
            if let Some(logo) = input.logo {
                company.logo = Some(logo);
            }
            if let Some(description) = input.description {
                company.description = Some(description);
            }
            if let Some(tags) = input.tags {
                company.tags = tags;
            }
            if let Some(manager_ids) = input.manager_ids {
                company.manager_ids = manager_ids;
            }
            if let Some(addresses) = new_addresses {
                company.addresses = addresses;
            }
            if let Some(hours) = input.working_hours {
                company.working_hours = hours;
            }
            company.updated_at = Utc::now();
            Ok(company.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), StoreError> {
            let mut st = self.state.lock().unwrap();
            st.companies.remove(&id).map(|_| ()).ok_or(StoreError::CompanyNotFound)
        }

        async fn is_manager(&self, company_id: i64, user_id: i64) -> Result<bool, StoreError> {
            let st = self.state.lock().unwrap();
            st.companies
                .get(&company_id)
                .map(|c| c.is_managed_by(user_id))
                .ok_or(StoreError::CompanyNotFound)
        }
    }
}
