use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use models::{address, company, working_hours};

use crate::companies::repository::CompanyRepository;
use crate::domain::{Address, AddressInput, Company, CompanyFilter, Coordinates, CreateCompanyInput, DaySchedule, UpdateCompanyInput, WorkingHours};
use crate::errors::StoreError;
use crate::pagination::PageInfo;

pub struct SeaOrmCompanyRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCompanyRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    /// Load addresses and working hours for an already fetched company row.
    async fn assemble<C: ConnectionTrait>(conn: &C, row: company::Model) -> Result<Company, StoreError> {
        let addresses = address::Entity::find()
            .filter(address::Column::CompanyId.eq(row.id))
            .order_by_asc(address::Column::Id)
            .all(conn)
            .await?;
        let hours = working_hours::Entity::find_by_id(row.id)
            .one(conn)
            .await?
            .ok_or_else(|| StoreError::Integrity(format!("company {} has no working hours", row.id)))?;
        Ok(company_from_rows(row, addresses, &hours))
    }
}

#[async_trait::async_trait]
impl CompanyRepository for SeaOrmCompanyRepository {
    async fn create(&self, input: CreateCompanyInput) -> Result<Company, StoreError> {
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;

        let row = company::ActiveModel {
            name: Set(input.name),
            logo: Set(input.logo),
            description: Set(input.description),
            tags: Set(input.tags),
            manager_ids: Set(input.manager_ids),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let addresses = insert_addresses(&txn, row.id, input.addresses, now).await?;
        let hours = working_hours_active(row.id, &input.working_hours).insert(&txn).await?;

        txn.commit().await?;
        debug!(company_id = row.id, addresses = addresses.len(), "company aggregate inserted");
        Ok(company_from_rows(row, addresses, &hours))
    }

    async fn get_by_id(&self, id: i64) -> Result<Company, StoreError> {
        let row = company::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::CompanyNotFound)?;
        Self::assemble(&self.db, row).await
    }

    async fn list(&self, filter: &CompanyFilter) -> Result<(Vec<Company>, Option<PageInfo>), StoreError> {
        let mut select = company::Entity::find();
        if !filter.tags.is_empty() {
            select = select.filter(Expr::cust_with_values(
                r#""companies"."tags" && $1"#,
                [filter.tags.clone()],
            ));
        }
        if let Some(city) = &filter.city {
            select = select.filter(
                company::Column::Id.in_subquery(
                    Query::select()
                        .column(address::Column::CompanyId)
                        .from(address::Entity)
                        .and_where(address::Column::City.eq(city.as_str()))
                        .to_owned(),
                ),
            );
        }

        // Total is counted over the same predicate as the page itself
        let page_info = match filter.pagination {
            Some(p) => {
                let total = select.clone().count(&self.db).await?;
                Some(PageInfo { page: p.page, limit: p.limit, total })
            }
            None => None,
        };

        let mut select = select
            .order_by_desc(company::Column::CreatedAt)
            .order_by_desc(company::Column::Id);
        if let Some(p) = filter.pagination {
            // nothing can live past the largest BIGINT offset
            let Some(offset) = p.offset() else { return Ok((Vec::new(), page_info)) };
            select = select.limit(p.limit).offset(offset);
        }
        let rows = select.all(&self.db).await?;

        let mut companies = Vec::with_capacity(rows.len());
        for row in rows {
            companies.push(Self::assemble(&self.db, row).await?);
        }
        Ok((companies, page_info))
    }

    async fn update(&self, id: i64, input: UpdateCompanyInput) -> Result<Company, StoreError> {
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;

        let mut stmt = company::Entity::update_many().col_expr(company::Column::UpdatedAt, Expr::value(now));
        if let Some(name) = input.name {
            stmt = stmt.col_expr(company::Column::Name, Expr::value(name));
        }
        if let Some(logo) = input.logo {
            stmt = stmt.col_expr(company::Column::Logo, Expr::value(logo));
        }
        if let Some(description) = input.description {
            stmt = stmt.col_expr(company::Column::Description, Expr::value(description));
        }
        if let Some(tags) = input.tags {
            stmt = stmt.col_expr(company::Column::Tags, Expr::value(tags));
        }
        if let Some(manager_ids) = input.manager_ids {
            stmt = stmt.col_expr(company::Column::ManagerIds, Expr::value(manager_ids));
        }
        let res = stmt.filter(company::Column::Id.eq(id)).exec(&txn).await?;
        if res.rows_affected == 0 {
            // dropping `txn` rolls back
            return Err(StoreError::CompanyNotFound);
        }

        if let Some(addresses) = input.addresses {
            address::Entity::delete_many()
                .filter(address::Column::CompanyId.eq(id))
                .exec(&txn)
                .await?;
            insert_addresses(&txn, id, addresses, now).await?;
        }
        if let Some(hours) = input.working_hours {
            working_hours_active(id, &hours).update(&txn).await?;
        }

        txn.commit().await?;
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        // addresses, working hours, services and links go with it (FK cascade)
        let res = company::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(StoreError::CompanyNotFound);
        }
        Ok(())
    }

    async fn is_manager(&self, company_id: i64, user_id: i64) -> Result<bool, StoreError> {
        let manager_ids: Vec<i64> = company::Entity::find_by_id(company_id)
            .select_only()
            .column(company::Column::ManagerIds)
            .into_tuple::<Vec<i64>>()
            .one(&self.db)
            .await?
            .ok_or(StoreError::CompanyNotFound)?;
        Ok(manager_ids.contains(&user_id))
    }
}

async fn insert_addresses<C: ConnectionTrait>(
    conn: &C,
    company_id: i64,
    inputs: Vec<AddressInput>,
    now: DateTime<FixedOffset>,
) -> Result<Vec<address::Model>, StoreError> {
    let mut rows = Vec::with_capacity(inputs.len());
    for a in inputs {
        let row = address::ActiveModel {
            company_id: Set(company_id),
            city: Set(a.city),
            street: Set(a.street),
            building: Set(a.building),
            latitude: Set(a.coordinates.latitude),
            longitude: Set(a.coordinates.longitude),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        rows.push(row);
    }
    Ok(rows)
}

fn working_hours_active(company_id: i64, wh: &WorkingHours) -> working_hours::ActiveModel {
    let t = |d: &DaySchedule| (d.is_open, d.open_time.map(|t| t.as_naive()), d.close_time.map(|t| t.as_naive()));
    let (mon, tue, wed, thu, fri, sat, sun) =
        (t(&wh.monday), t(&wh.tuesday), t(&wh.wednesday), t(&wh.thursday), t(&wh.friday), t(&wh.saturday), t(&wh.sunday));
    working_hours::ActiveModel {
        company_id: Set(company_id),
        monday_is_open: Set(mon.0),
        monday_open_time: Set(mon.1),
        monday_close_time: Set(mon.2),
        tuesday_is_open: Set(tue.0),
        tuesday_open_time: Set(tue.1),
        tuesday_close_time: Set(tue.2),
        wednesday_is_open: Set(wed.0),
        wednesday_open_time: Set(wed.1),
        wednesday_close_time: Set(wed.2),
        thursday_is_open: Set(thu.0),
        thursday_open_time: Set(thu.1),
        thursday_close_time: Set(thu.2),
        friday_is_open: Set(fri.0),
        friday_open_time: Set(fri.1),
        friday_close_time: Set(fri.2),
        saturday_is_open: Set(sat.0),
        saturday_open_time: Set(sat.1),
        saturday_close_time: Set(sat.2),
        sunday_is_open: Set(sun.0),
        sunday_open_time: Set(sun.1),
        sunday_close_time: Set(sun.2),
    }
}

fn working_hours_from_row(m: &working_hours::Model) -> WorkingHours {
    let day = |is_open: bool, open: Option<chrono::NaiveTime>, close: Option<chrono::NaiveTime>| DaySchedule {
        is_open,
        open_time: open.map(Into::into),
        close_time: close.map(Into::into),
    };
    WorkingHours {
        monday: day(m.monday_is_open, m.monday_open_time, m.monday_close_time),
        tuesday: day(m.tuesday_is_open, m.tuesday_open_time, m.tuesday_close_time),
        wednesday: day(m.wednesday_is_open, m.wednesday_open_time, m.wednesday_close_time),
        thursday: day(m.thursday_is_open, m.thursday_open_time, m.thursday_close_time),
        friday: day(m.friday_is_open, m.friday_open_time, m.friday_close_time),
        saturday: day(m.saturday_is_open, m.saturday_open_time, m.saturday_close_time),
        sunday: day(m.sunday_is_open, m.sunday_open_time, m.sunday_close_time),
    }
}

fn address_from_row(m: address::Model) -> Address {
    Address {
        id: m.id,
        company_id: m.company_id,
        city: m.city,
        street: m.street,
        building: m.building,
        coordinates: Coordinates { latitude: m.latitude, longitude: m.longitude },
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

fn company_from_rows(row: company::Model, addresses: Vec<address::Model>, hours: &working_hours::Model) -> Company {
    Company {
        id: row.id,
        name: row.name,
        logo: row.logo,
        description: row.description,
        tags: row.tags,
        addresses: addresses.into_iter().map(address_from_row).collect(),
        working_hours: working_hours_from_row(hours),
        manager_ids: row.manager_ids,
        created_at: row.created_at.with_timezone(&Utc),
        updated_at: row.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeOfDay;
    use crate::pagination::Pagination;
    use crate::test_support::get_db;

    fn hours() -> WorkingHours {
        let mut wh = WorkingHours::uniform(DaySchedule::open(TimeOfDay::new(9, 0).unwrap(), TimeOfDay::new(18, 0).unwrap()));
        wh.saturday = DaySchedule::open(TimeOfDay::new(10, 30).unwrap(), TimeOfDay::new(16, 45).unwrap());
        wh.sunday = DaySchedule::closed();
        wh
    }

    fn address(city: &str, building: &str) -> AddressInput {
        AddressInput {
            city: city.into(),
            street: "Lenina".into(),
            building: building.into(),
            coordinates: Coordinates { latitude: 55.7, longitude: 37.6 },
        }
    }

    fn unique(prefix: &str) -> String {
        format!("{prefix}-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default())
    }

    fn input(name: &str, tags: &[&str], addresses: Vec<AddressInput>) -> CreateCompanyInput {
        CreateCompanyInput {
            name: name.into(),
            logo: Some("https://cdn.example.com/logo.png".into()),
            description: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            addresses,
            working_hours: hours(),
            manager_ids: vec![100, 200],
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_same_aggregate() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmCompanyRepository::new(db);

        let created = repo
            .create(input("Detailing Pro", &["detailing"], vec![address("Kazan", "1"), address("Kazan", "2")]))
            .await?;
        assert_eq!(created.addresses.len(), 2);
        assert_eq!(created.working_hours, hours());
        assert!(created.addresses.iter().all(|a| a.company_id == created.id));

        let fetched = repo.get_by_id(created.id).await?;
        assert_eq!(fetched.addresses.len(), 2);
        assert_eq!(fetched.working_hours, created.working_hours);
        assert_eq!(fetched.tags, created.tags);
        assert_eq!(fetched.manager_ids, vec![100, 200]);
        assert_eq!(
            fetched.addresses.iter().map(|a| a.id).collect::<Vec<_>>(),
            created.addresses.iter().map(|a| a.id).collect::<Vec<_>>()
        );

        repo.delete(created.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_addresses_and_keeps_untouched_fields() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmCompanyRepository::new(db);
        let created = repo.create(input("Tyre Service", &["tyres"], vec![address("Omsk", "7")])).await?;
        let old_ids: Vec<i64> = created.addresses.iter().map(|a| a.id).collect();

        let updated = repo
            .update(
                created.id,
                UpdateCompanyInput {
                    description: Some("seasonal tyre change".into()),
                    addresses: Some(vec![address("Omsk", "8"), address("Tomsk", "9")]),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(updated.name, "Tyre Service");
        assert_eq!(updated.logo, created.logo);
        assert_eq!(updated.tags, created.tags);
        assert_eq!(updated.description.as_deref(), Some("seasonal tyre change"));
        assert_eq!(updated.addresses.len(), 2);
        assert!(updated.addresses.iter().all(|a| !old_ids.contains(&a.id)));
        assert!(updated.updated_at >= created.updated_at);

        let cleared = repo
            .update(created.id, UpdateCompanyInput { addresses: Some(vec![]), ..Default::default() })
            .await?;
        assert!(cleared.addresses.is_empty());

        repo.delete(created.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn update_overwrites_working_hours() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmCompanyRepository::new(db);
        let created = repo.create(input("Car Wash 24", &[], vec![])).await?;

        let all_night = WorkingHours::uniform(DaySchedule::open(TimeOfDay::new(0, 0).unwrap(), TimeOfDay::new(23, 59).unwrap()));
        let updated = repo
            .update(created.id, UpdateCompanyInput { working_hours: Some(all_night), ..Default::default() })
            .await?;
        assert_eq!(updated.working_hours, all_night);

        repo.delete(created.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmCompanyRepository::new(db);
        assert!(matches!(repo.get_by_id(i64::MAX).await, Err(StoreError::CompanyNotFound)));
        assert!(matches!(repo.delete(i64::MAX).await, Err(StoreError::CompanyNotFound)));
        assert!(matches!(repo.is_manager(i64::MAX, 1).await, Err(StoreError::CompanyNotFound)));
        assert!(matches!(
            repo.update(i64::MAX, UpdateCompanyInput { name: Some("x".into()), ..Default::default() }).await,
            Err(StoreError::CompanyNotFound)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn failed_update_leaves_no_partial_state() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmCompanyRepository::new(db);
        let created = repo.create(input("Atomic Wash", &[], vec![address("Perm", "1")])).await?;

        // the second address overflows the city column after the old set is already deleted
        let res = repo
            .update(
                created.id,
                UpdateCompanyInput {
                    name: Some("Renamed".into()),
                    addresses: Some(vec![address("Perm", "2"), address(&"x".repeat(500), "3")]),
                    ..Default::default()
                },
            )
            .await;
        assert!(res.is_err());
        let after = repo.get_by_id(created.id).await?;
        assert_eq!(after.addresses.len(), 1);
        assert_eq!(after.name, "Atomic Wash");

        repo.delete(created.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn is_manager_checks_membership() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmCompanyRepository::new(db);
        let created = repo.create(input("Managed Co", &[], vec![])).await?;
        assert!(repo.is_manager(created.id, 100).await?);
        assert!(!repo.is_manager(created.id, 300).await?);
        repo.delete(created.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_and_paginates_over_filtered_set() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmCompanyRepository::new(db);
        let tag = unique("tag");
        let city = unique("city");

        let mut ids = Vec::new();
        for i in 0..3 {
            let c = repo.create(input(&format!("Tagged {i}"), &[tag.as_str(), "common"], vec![address(&city, "1")])).await?;
            ids.push(c.id);
        }
        let other = repo.create(input("Other city", &[tag.as_str()], vec![address("Elsewhere", "5")])).await?;

        let (by_tag, page) = repo
            .list(&CompanyFilter { tags: vec![tag.clone(), "nope".into()], ..Default::default() })
            .await?;
        assert_eq!(by_tag.len(), 4);
        assert!(page.is_none());
        // newest first
        assert_eq!(by_tag[0].id, other.id);

        let (by_city, _) = repo.list(&CompanyFilter { city: Some(city.clone()), ..Default::default() }).await?;
        assert_eq!(by_city.iter().map(|c| c.id).collect::<Vec<_>>(), ids.iter().rev().copied().collect::<Vec<_>>());
        assert!(by_city.iter().all(|c| c.addresses.len() == 1));

        let (second, page) = repo
            .list(&CompanyFilter {
                tags: vec![tag.clone()],
                city: Some(city.clone()),
                pagination: Some(Pagination { page: 2, limit: 2 }),
            })
            .await?;
        let page = page.expect("pagination block");
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, ids[0]);

        let (beyond, page) = repo
            .list(&CompanyFilter {
                tags: vec![tag.clone()],
                pagination: Some(Pagination { page: 100_000_000_000_000_000, limit: 100 }),
                ..Default::default()
            })
            .await?;
        assert!(beyond.is_empty());
        assert_eq!(page.map(|p| p.total), Some(4));

        for id in ids.into_iter().chain([other.id]) {
            repo.delete(id).await?;
        }
        Ok(())
    }
}
