//! Catalog collaborator: flat CRUD over services and categories.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use models::{category, category_service, service};

use crate::errors::ServiceError;

fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

pub async fn list_services(db: &DatabaseConnection) -> Result<Vec<service::Model>, ServiceError> {
    service::Entity::find().all(db).await.map_err(db_err)
}

pub async fn create_service(
    db: &DatabaseConnection,
    name: &str,
    photo: Option<String>,
) -> Result<service::Model, ServiceError> {
    let created = service::create(db, name, photo).await?;
    Ok(created)
}

pub async fn update_service(
    db: &DatabaseConnection,
    id: Uuid,
    name: &str,
    photo: Option<String>,
) -> Result<service::Model, ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation("service name is required".into()));
    }
    let mut am: service::ActiveModel = service::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ServiceError::not_found("service"))?
        .into();
    am.name = Set(name.trim().to_string());
    if photo.is_some() {
        am.photo = Set(photo);
    }
    am.update(db).await.map_err(db_err)
}

pub async fn delete_service(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = service::Entity::delete_by_id(id).exec(db).await.map_err(db_err)?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("service"));
    }
    Ok(())
}

pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>, ServiceError> {
    category::Entity::find().all(db).await.map_err(db_err)
}

/// Create a category and attach an initial set of services to it.
pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
    photo: Option<String>,
    service_ids: &[Uuid],
) -> Result<category::Model, ServiceError> {
    let created = category::create(db, name, photo).await?;
    for sid in service_ids {
        attach_service(db, created.id, *sid).await?;
    }
    Ok(created)
}

/// Update a category. Omitted fields keep their value; a supplied service
/// list replaces the whole membership set.
pub async fn update_category(
    db: &DatabaseConnection,
    id: Uuid,
    name: Option<&str>,
    photo: Option<String>,
    service_ids: Option<&[Uuid]>,
) -> Result<category::Model, ServiceError> {
    let found = category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ServiceError::not_found("category"))?;

    let mut am: category::ActiveModel = found.into();
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(ServiceError::Validation("category name is required".into()));
        }
        am.name = Set(name.trim().to_string());
    }
    if photo.is_some() {
        am.photo = Set(photo);
    }
    let updated = am.update(db).await.map_err(db_err)?;

    if let Some(ids) = service_ids {
        category_service::Entity::delete_many()
            .filter(category_service::Column::CategoryId.eq(id))
            .exec(db)
            .await
            .map_err(db_err)?;
        for sid in ids {
            attach_service(db, id, *sid).await?;
        }
    }
    Ok(updated)
}

pub async fn attach_service(
    db: &DatabaseConnection,
    category_id: Uuid,
    service_id: Uuid,
) -> Result<(), ServiceError> {
    if service::Entity::find_by_id(service_id).one(db).await.map_err(db_err)?.is_none() {
        return Err(ServiceError::not_found("service"));
    }
    let am = category_service::ActiveModel {
        category_id: Set(category_id),
        service_id: Set(service_id),
    };
    // Re-attaching an already attached service is a no-op for the caller
    match am.insert(db).await {
        Ok(_) => Ok(()),
        Err(e) if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) => {
            Ok(())
        }
        Err(e) => Err(db_err(e)),
    }
}

pub async fn delete_category(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = category::Entity::delete_by_id(id).exec(db).await.map_err(db_err)?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("category"));
    }
    Ok(())
}

/// Services belonging to a category, via the membership table.
pub async fn services_of_category(
    db: &DatabaseConnection,
    category_id: Uuid,
) -> Result<Vec<service::Model>, ServiceError> {
    if category::Entity::find_by_id(category_id).one(db).await.map_err(db_err)?.is_none() {
        return Err(ServiceError::not_found("category"));
    }
    let links = category_service::Entity::find()
        .filter(category_service::Column::CategoryId.eq(category_id))
        .all(db)
        .await
        .map_err(db_err)?;
    let ids: Vec<Uuid> = links.iter().map(|l| l.service_id).collect();
    if ids.is_empty() {
        return Ok(vec![]);
    }
    service::Entity::find()
        .filter(service::Column::Id.is_in(ids))
        .all(db)
        .await
        .map_err(db_err)
}
