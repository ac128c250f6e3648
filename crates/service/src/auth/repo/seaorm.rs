use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::user;

use crate::auth::domain::{AuthUser, NewAccount, UserRole};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_domain(u: user::Model) -> Result<AuthUser, AuthError> {
    let role = UserRole::parse(&u.role)
        .ok_or_else(|| AuthError::Repository(format!("corrupt role '{}'", u.role)))?;
    Ok(AuthUser {
        id: u.id,
        first_name: u.first_name,
        last_name: u.last_name,
        email: u.email,
        role,
        city: u.city,
        phone: u.phone,
        address: u.address,
        photo: u.photo,
    })
}

#[async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<(AuthUser, String)>, AuthError> {
        let found = user::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        match found {
            Some(u) => {
                let hash = u.password_hash.clone();
                Ok(Some((to_domain(u)?, hash)))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        let found = user::find_by_id(&self.db, id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        found.map(to_domain).transpose()
    }

    async fn create_account(&self, new: NewAccount) -> Result<AuthUser, AuthError> {
        let created = user::create(
            &self.db,
            user::NewUser {
                first_name: new.first_name,
                last_name: new.last_name,
                email: new.email,
                password_hash: new.password_hash,
                role: new.role.as_str().to_string(),
                city: new.city,
                phone: new.phone,
                address: new.address,
                photo: new.photo,
            },
        )
        .await
        .map_err(|e| match e {
            models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
            models::errors::ModelError::Db(msg) => AuthError::Repository(msg),
        })?;
        to_domain(created)
    }
}
