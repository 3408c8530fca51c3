use async_trait::async_trait;

use crate::domain::{CreateServiceInput, Service, UpdateServiceInput};
use crate::errors::StoreError;

/// Persistence for services and their address links. Every lookup is
/// scoped by `(company_id, service_id)`; a service under another company
/// is reported as `ServiceNotFound`.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Insert the service and its address links atomically.
    async fn create(&self, company_id: i64, input: CreateServiceInput) -> Result<Service, StoreError>;
    async fn get_by_id(&self, company_id: i64, service_id: i64) -> Result<Service, StoreError>;
    /// Newest first. An unknown company simply has no services.
    async fn list_by_company(&self, company_id: i64) -> Result<Vec<Service>, StoreError>;
    async fn update(&self, company_id: i64, service_id: i64, input: UpdateServiceInput) -> Result<Service, StoreError>;
    async fn delete(&self, company_id: i64, service_id: i64) -> Result<(), StoreError>;
}

/// Sorted, duplicate-free copy of `ids`.
pub(crate) fn normalize_address_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Mutex;

    use chrono::Utc;

    #[derive(Default)]
    struct State {
        next_id: i64,
        companies: BTreeSet<i64>,
        /// address id -> owning company
        addresses: BTreeMap<i64, i64>,
        services: BTreeMap<i64, Service>,
    }

    impl State {
        fn check_addresses(&self, company_id: i64, ids: &[i64]) -> Result<(), StoreError> {
            let foreign: Vec<i64> = ids
                .iter()
                .copied()
                .filter(|id| self.addresses.get(id) != Some(&company_id))
                .collect();
            if foreign.is_empty() {
                Ok(())
            } else {
                Err(StoreError::ForeignAddress { company_id, address_ids: foreign })
            }
        }

        fn scoped(&mut self, company_id: i64, service_id: i64) -> Result<&mut Service, StoreError> {
            self.services
                .get_mut(&service_id)
                .filter(|s| s.company_id == company_id)
                .ok_or(StoreError::ServiceNotFound)
        }
    }

    /// Companies and addresses must be registered before services can
    /// reference them, mirroring the foreign keys of the real schema.
    #[derive(Default)]
    pub struct InMemoryServiceRepository {
        state: Mutex<State>,
    }

    impl InMemoryServiceRepository {
        pub fn new() -> Self { Self::default() }

        pub fn register_company(&self, company_id: i64) {
            self.state.lock().unwrap().companies.insert(company_id);
        }

        pub fn register_address(&self, company_id: i64, address_id: i64) {
            let mut st = self.state.lock().unwrap();
            st.companies.insert(company_id);
            st.addresses.insert(address_id, company_id);
        }

        pub fn len(&self) -> usize { self.state.lock().unwrap().services.len() }

        pub fn is_empty(&self) -> bool { self.len() == 0 }
    }

    #[async_trait]
    impl ServiceRepository for InMemoryServiceRepository {
        async fn create(&self, company_id: i64, input: CreateServiceInput) -> Result<Service, StoreError> {
            let mut st = self.state.lock().unwrap();
            if !st.companies.contains(&company_id) {
                return Err(StoreError::CompanyNotFound);
            }
            let address_ids = normalize_address_ids(&input.address_ids);
            st.check_addresses(company_id, &address_ids)?;

            st.next_id += 1;
            let now = Utc::now();
            let service = Service {
                id: st.next_id,
                company_id,
                name: input.name,
                description: input.description,
                average_duration: input.average_duration,
                address_ids,
                created_at: now,
                updated_at: now,
            };
            st.services.insert(service.id, service.clone());
            Ok(service)
        }

        async fn get_by_id(&self, company_id: i64, service_id: i64) -> Result<Service, StoreError> {
            let mut st = self.state.lock().unwrap();
            st.scoped(company_id, service_id).map(|s| s.clone())
        }

        async fn list_by_company(&self, company_id: i64) -> Result<Vec<Service>, StoreError> {
            let st = self.state.lock().unwrap();
            let mut list: Vec<Service> = st.services.values().filter(|s| s.company_id == company_id).cloned().collect();
            list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(list)
        }

        async fn update(&self, company_id: i64, service_id: i64, input: UpdateServiceInput) -> Result<Service, StoreError> {
            let mut st = self.state.lock().unwrap();
            st.scoped(company_id, service_id)?;
            let address_ids = input.address_ids.as_deref().map(normalize_address_ids);
            if let Some(ids) = &address_ids {
                st.check_addresses(company_id, ids)?;
            }

            let service = st.scoped(company_id, service_id)?;
            if let Some(name) = input.name {
                service.name = name;
            }
            if let Some(description) = input.description {
                service.description = Some(description);
            }
            if let Some(minutes) = input.average_duration {
                service.average_duration = Some(minutes);
            }
            if let Some(ids) = address_ids {
                service.address_ids = ids;
            }
            service.updated_at = Utc::now();
            Ok(service.clone())
        }

        async fn delete(&self, company_id: i64, service_id: i64) -> Result<(), StoreError> {
            let mut st = self.state.lock().unwrap();
            st.scoped(company_id, service_id)?;
            st.services.remove(&service_id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::InMemoryServiceRepository;
    use super::*;

    fn input(name: &str, address_ids: Vec<i64>) -> CreateServiceInput {
        CreateServiceInput { name: name.into(), description: None, average_duration: Some(30), address_ids }
    }

    #[test]
    fn address_ids_are_sorted_and_deduplicated() {
        assert_eq!(normalize_address_ids(&[5, 1, 5, 3, 1]), vec![1, 3, 5]);
        assert!(normalize_address_ids(&[]).is_empty());
    }

    #[tokio::test]
    async fn mock_enforces_ownership_and_scope() {
        let repo = InMemoryServiceRepository::new();
        repo.register_address(1, 100);
        repo.register_address(2, 200);

        assert!(matches!(repo.create(3, input("x", vec![])).await, Err(StoreError::CompanyNotFound)));
        match repo.create(1, input("x", vec![100, 200])).await {
            Err(StoreError::ForeignAddress { company_id, address_ids }) => {
                assert_eq!(company_id, 1);
                assert_eq!(address_ids, vec![200]);
            }
            other => panic!("unexpected {other:?}"),
        }

        let s = repo.create(1, input("Wash", vec![100, 100])).await.unwrap();
        assert_eq!(s.address_ids, vec![100]);
        assert!(matches!(repo.get_by_id(2, s.id).await, Err(StoreError::ServiceNotFound)));
        assert!(matches!(repo.delete(2, s.id).await, Err(StoreError::ServiceNotFound)));
        repo.delete(1, s.id).await.unwrap();
        assert!(repo.is_empty());
    }
}
