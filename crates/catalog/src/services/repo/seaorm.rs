use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::debug;

use models::{address, service, service_address};

use crate::domain::{CreateServiceInput, Service, UpdateServiceInput};
use crate::errors::StoreError;
use crate::services::repository::{normalize_address_ids, ServiceRepository};

pub struct SeaOrmServiceRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmServiceRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl ServiceRepository for SeaOrmServiceRepository {
    async fn create(&self, company_id: i64, input: CreateServiceInput) -> Result<Service, StoreError> {
        let now = Utc::now().fixed_offset();
        let address_ids = normalize_address_ids(&input.address_ids);
        let txn = self.db.begin().await?;

        let row = service::ActiveModel {
            company_id: Set(company_id),
            name: Set(input.name),
            description: Set(input.description),
            average_duration: Set(input.average_duration),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(company_fk_violation)?;

        ensure_owned(&txn, company_id, &address_ids).await?;
        link_addresses(&txn, row.id, &address_ids).await?;

        txn.commit().await?;
        debug!(company_id, service_id = row.id, links = address_ids.len(), "service inserted");
        Ok(service_from_row(row, address_ids))
    }

    async fn get_by_id(&self, company_id: i64, service_id: i64) -> Result<Service, StoreError> {
        let row = service::Entity::find_by_id(service_id)
            .filter(service::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(StoreError::ServiceNotFound)?;
        let address_ids = linked_addresses(&self.db, row.id).await?;
        Ok(service_from_row(row, address_ids))
    }

    async fn list_by_company(&self, company_id: i64) -> Result<Vec<Service>, StoreError> {
        let rows = service::Entity::find()
            .filter(service::Column::CompanyId.eq(company_id))
            .order_by_desc(service::Column::CreatedAt)
            .order_by_desc(service::Column::Id)
            .all(&self.db)
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // one query for all links of the listed services
        let links: Vec<(i64, i64)> = service_address::Entity::find()
            .select_only()
            .column(service_address::Column::ServiceId)
            .column(service_address::Column::AddressId)
            .filter(service_address::Column::ServiceId.is_in(rows.iter().map(|r| r.id)))
            .order_by_asc(service_address::Column::AddressId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await?;
        let mut by_service: HashMap<i64, Vec<i64>> = HashMap::new();
        for (service_id, address_id) in links {
            by_service.entry(service_id).or_default().push(address_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let ids = by_service.remove(&row.id).unwrap_or_default();
                service_from_row(row, ids)
            })
            .collect())
    }

    async fn update(&self, company_id: i64, service_id: i64, input: UpdateServiceInput) -> Result<Service, StoreError> {
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;

        let mut stmt = service::Entity::update_many().col_expr(service::Column::UpdatedAt, Expr::value(now));
        if let Some(name) = input.name {
            stmt = stmt.col_expr(service::Column::Name, Expr::value(name));
        }
        if let Some(description) = input.description {
            stmt = stmt.col_expr(service::Column::Description, Expr::value(description));
        }
        if let Some(minutes) = input.average_duration {
            stmt = stmt.col_expr(service::Column::AverageDuration, Expr::value(minutes));
        }
        let res = stmt
            .filter(service::Column::Id.eq(service_id))
            .filter(service::Column::CompanyId.eq(company_id))
            .exec(&txn)
            .await?;
        if res.rows_affected == 0 {
            return Err(StoreError::ServiceNotFound);
        }

        if let Some(ids) = input.address_ids {
            let ids = normalize_address_ids(&ids);
            ensure_owned(&txn, company_id, &ids).await?;
            service_address::Entity::delete_many()
                .filter(service_address::Column::ServiceId.eq(service_id))
                .exec(&txn)
                .await?;
            link_addresses(&txn, service_id, &ids).await?;
        }

        txn.commit().await?;
        self.get_by_id(company_id, service_id).await
    }

    async fn delete(&self, company_id: i64, service_id: i64) -> Result<(), StoreError> {
        let res = service::Entity::delete_many()
            .filter(service::Column::Id.eq(service_id))
            .filter(service::Column::CompanyId.eq(company_id))
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(StoreError::ServiceNotFound);
        }
        Ok(())
    }
}

/// The only foreign key on `services` points at `companies`.
fn company_fk_violation(e: DbErr) -> StoreError {
    match e.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => StoreError::CompanyNotFound,
        _ => StoreError::from(e),
    }
}

/// Fails with `ForeignAddress` listing every id not owned by `company_id`.
async fn ensure_owned<C: ConnectionTrait>(conn: &C, company_id: i64, ids: &[i64]) -> Result<(), StoreError> {
    if ids.is_empty() {
        return Ok(());
    }
    let owned: Vec<i64> = address::Entity::find()
        .select_only()
        .column(address::Column::Id)
        .filter(address::Column::CompanyId.eq(company_id))
        .filter(address::Column::Id.is_in(ids.iter().copied()))
        .into_tuple::<i64>()
        .all(conn)
        .await?;
    let foreign: Vec<i64> = ids.iter().copied().filter(|id| !owned.contains(id)).collect();
    if foreign.is_empty() {
        Ok(())
    } else {
        Err(StoreError::ForeignAddress { company_id, address_ids: foreign })
    }
}

async fn link_addresses<C: ConnectionTrait>(conn: &C, service_id: i64, ids: &[i64]) -> Result<(), StoreError> {
    if ids.is_empty() {
        return Ok(());
    }
    let links = ids.iter().map(|&address_id| service_address::ActiveModel {
        service_id: Set(service_id),
        address_id: Set(address_id),
    });
    service_address::Entity::insert_many(links).exec_without_returning(conn).await?;
    Ok(())
}

async fn linked_addresses<C: ConnectionTrait>(conn: &C, service_id: i64) -> Result<Vec<i64>, StoreError> {
    let ids = service_address::Entity::find()
        .select_only()
        .column(service_address::Column::AddressId)
        .filter(service_address::Column::ServiceId.eq(service_id))
        .order_by_asc(service_address::Column::AddressId)
        .into_tuple::<i64>()
        .all(conn)
        .await?;
    Ok(ids)
}

fn service_from_row(row: service::Model, address_ids: Vec<i64>) -> Service {
    Service {
        id: row.id,
        company_id: row.company_id,
        name: row.name,
        description: row.description,
        average_duration: row.average_duration,
        address_ids,
        created_at: row.created_at.with_timezone(&Utc),
        updated_at: row.updated_at.with_timezone(&Utc),
    }
}
