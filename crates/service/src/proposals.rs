//! Proposal registry collaborator: provider-authored sellable offerings.

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use models::{category_service, service, service_proposal, user};

use crate::errors::ServiceError;

fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

/// All proposals, most recent first.
pub async fn list_proposals(
    db: &DatabaseConnection,
) -> Result<Vec<service_proposal::Model>, ServiceError> {
    service_proposal::Entity::find()
        .order_by_desc(service_proposal::Column::CreatedAt)
        .all(db)
        .await
        .map_err(db_err)
}

/// The five newest proposals, for the landing page.
pub async fn list_recent(
    db: &DatabaseConnection,
) -> Result<Vec<service_proposal::Model>, ServiceError> {
    service_proposal::Entity::find()
        .order_by_desc(service_proposal::Column::CreatedAt)
        .limit(5)
        .all(db)
        .await
        .map_err(db_err)
}

pub async fn list_by_provider(
    db: &DatabaseConnection,
    provider_id: Uuid,
) -> Result<Vec<service_proposal::Model>, ServiceError> {
    service_proposal::Entity::find()
        .filter(service_proposal::Column::ProviderId.eq(provider_id))
        .order_by_desc(service_proposal::Column::CreatedAt)
        .all(db)
        .await
        .map_err(db_err)
}

pub async fn list_by_service(
    db: &DatabaseConnection,
    service_id: Uuid,
) -> Result<Vec<service_proposal::Model>, ServiceError> {
    service_proposal::Entity::find()
        .filter(service_proposal::Column::ServiceId.eq(service_id))
        .order_by_desc(service_proposal::Column::CreatedAt)
        .all(db)
        .await
        .map_err(db_err)
}

/// Available proposals for any service of a category.
pub async fn list_by_category(
    db: &DatabaseConnection,
    category_id: Uuid,
) -> Result<Vec<service_proposal::Model>, ServiceError> {
    let links = category_service::Entity::find()
        .filter(category_service::Column::CategoryId.eq(category_id))
        .all(db)
        .await
        .map_err(db_err)?;
    let service_ids: Vec<Uuid> = links.iter().map(|l| l.service_id).collect();
    if service_ids.is_empty() {
        return Ok(vec![]);
    }
    service_proposal::Entity::find()
        .filter(service_proposal::Column::ServiceId.is_in(service_ids))
        .filter(service_proposal::Column::Available.eq(true))
        .order_by_desc(service_proposal::Column::CreatedAt)
        .all(db)
        .await
        .map_err(db_err)
}

/// Create a proposal. Only provider accounts may publish, and the linked
/// service must exist.
pub async fn create_proposal(
    db: &DatabaseConnection,
    provider_id: Uuid,
    title: &str,
    service_id: Uuid,
    price: f64,
    description: &str,
) -> Result<service_proposal::Model, ServiceError> {
    let author = user::find_by_id(db, provider_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    if author.role != user::ROLE_PROVIDER {
        return Err(ServiceError::Validation(
            "only service providers can propose services".into(),
        ));
    }
    if service::Entity::find_by_id(service_id).one(db).await.map_err(db_err)?.is_none() {
        return Err(ServiceError::not_found("service"));
    }
    let created = service_proposal::create(
        db,
        service_proposal::NewProposal {
            title: title.to_string(),
            service_id,
            provider_id,
            price,
            description: description.to_string(),
        },
    )
    .await?;
    Ok(created)
}

/// Remove a proposal; only its author may do so.
pub async fn delete_proposal(
    db: &DatabaseConnection,
    id: Uuid,
    acting_provider: Uuid,
) -> Result<(), ServiceError> {
    let found = service_proposal::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ServiceError::not_found("service proposal"))?;
    if found.provider_id != acting_provider {
        return Err(ServiceError::Forbidden("you do not own this proposal".into()));
    }
    service_proposal::Entity::delete_by_id(id).exec(db).await.map_err(db_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn proposal_lifecycle() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;

        let svc = crate::catalog::create_service(&db, &format!("garden_{}", Uuid::new_v4()), None)
            .await?;
        let provider = models::user::create(
            &db,
            models::user::NewUser {
                first_name: "Nour".into(),
                last_name: "Gharbi".into(),
                email: format!("nour_{}@example.com", Uuid::new_v4()),
                password_hash: "x".repeat(32),
                role: models::user::ROLE_PROVIDER.into(),
                city: "Sousse".into(),
                phone: "21655555".into(),
                address: None,
                photo: None,
            },
        )
        .await?;
        let client = models::user::create(
            &db,
            models::user::NewUser {
                first_name: "Youssef".into(),
                last_name: "Mzali".into(),
                email: format!("youssef_{}@example.com", Uuid::new_v4()),
                password_hash: "x".repeat(32),
                role: models::user::ROLE_CLIENT.into(),
                city: "Sousse".into(),
                phone: "21644444".into(),
                address: None,
                photo: None,
            },
        )
        .await?;

        // Clients may not publish
        let denied =
            create_proposal(&db, client.id, "Lawn mowing", svc.id, 30.0, "Weekly").await;
        assert!(matches!(denied, Err(ServiceError::Validation(_))));

        let p = create_proposal(&db, provider.id, "Lawn mowing", svc.id, 30.0, "Weekly").await?;
        assert_eq!(list_by_provider(&db, provider.id).await?.len(), 1);
        assert_eq!(list_by_service(&db, svc.id).await?.len(), 1);

        // Only the author can delete
        let stranger = Uuid::new_v4();
        assert!(matches!(
            delete_proposal(&db, p.id, stranger).await,
            Err(ServiceError::Forbidden(_))
        ));
        delete_proposal(&db, p.id, provider.id).await?;

        models::user::Entity::delete_by_id(provider.id).exec(&db).await?;
        models::user::Entity::delete_by_id(client.id).exec(&db).await?;
        crate::catalog::delete_service(&db, svc.id).await?;
        Ok(())
    }
}
