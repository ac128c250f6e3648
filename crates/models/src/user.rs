use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

pub const ROLE_CLIENT: &str = "client";
pub const ROLE_PROVIDER: &str = "provider";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub city: String,
    pub phone: String,
    pub address: Option<String>,
    pub photo: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !email.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_role(role: &str) -> Result<(), ModelError> {
    if role != ROLE_CLIENT && role != ROLE_PROVIDER {
        return Err(ModelError::Validation(format!(
            "role must be '{ROLE_CLIENT}' or '{ROLE_PROVIDER}'"
        )));
    }
    Ok(())
}

pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub city: String,
    pub phone: String,
    pub address: Option<String>,
    pub photo: Option<String>,
}

pub async fn create(db: &DatabaseConnection, new: NewUser) -> Result<Model, ModelError> {
    validate_email(&new.email)?;
    validate_role(&new.role)?;
    if new.first_name.trim().is_empty() || new.last_name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set(new.first_name),
        last_name: Set(new.last_name),
        email: Set(new.email),
        password_hash: Set(new.password_hash),
        role: Set(new.role),
        city: Set(new.city),
        phone: Set(new.phone),
        address: Set(new.address),
        photo: Set(new.photo),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}
