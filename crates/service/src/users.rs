//! User directory collaborator: public provider discovery.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use models::user;

use crate::errors::ServiceError;

fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

/// All provider accounts, newest first. The password hash never serializes,
/// so the entity model is safe to hand to the boundary as-is.
pub async fn list_providers(db: &DatabaseConnection) -> Result<Vec<user::Model>, ServiceError> {
    user::Entity::find()
        .filter(user::Column::Role.eq(user::ROLE_PROVIDER))
        .order_by_desc(user::Column::CreatedAt)
        .all(db)
        .await
        .map_err(db_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use uuid::Uuid;

    #[tokio::test]
    async fn provider_listing_filters_by_role() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;

        let marker = format!("prov_{}@example.com", Uuid::new_v4());
        let provider = models::user::create(
            &db,
            models::user::NewUser {
                first_name: "Khalil".into(),
                last_name: "Ayari".into(),
                email: marker.clone(),
                password_hash: "x".repeat(32),
                role: user::ROLE_PROVIDER.into(),
                city: "Bizerte".into(),
                phone: "21633333".into(),
                address: None,
                photo: None,
            },
        )
        .await?;
        let client = models::user::create(
            &db,
            models::user::NewUser {
                first_name: "Ines".into(),
                last_name: "Baccar".into(),
                email: format!("cli_{}@example.com", Uuid::new_v4()),
                password_hash: "x".repeat(32),
                role: user::ROLE_CLIENT.into(),
                city: "Bizerte".into(),
                phone: "21622222".into(),
                address: None,
                photo: None,
            },
        )
        .await?;

        let providers = list_providers(&db).await?;
        assert!(providers.iter().any(|u| u.email == marker));
        assert!(providers.iter().all(|u| u.role == user::ROLE_PROVIDER));

        user::Entity::delete_by_id(provider.id).exec(&db).await?;
        user::Entity::delete_by_id(client.id).exec(&db).await?;
        Ok(())
    }
}
