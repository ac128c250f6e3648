use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{service, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_proposal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub service_id: Uuid,
    pub provider_id: Uuid,
    pub price: f64,
    pub description: String,
    pub available: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Service, Provider }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(service::Entity)
                .from(Column::ServiceId)
                .to(service::Column::Id)
                .into(),
            Relation::Provider => Entity::belongs_to(user::Entity)
                .from(Column::ProviderId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub struct NewProposal {
    pub title: String,
    pub service_id: Uuid,
    pub provider_id: Uuid,
    pub price: f64,
    pub description: String,
}

pub async fn create(db: &DatabaseConnection, new: NewProposal) -> Result<Model, ModelError> {
    if new.title.trim().is_empty() || new.description.trim().is_empty() {
        return Err(ModelError::Validation("title and description are required".into()));
    }
    if new.price <= 0.0 {
        return Err(ModelError::Validation("price must be positive".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(new.title),
        service_id: Set(new.service_id),
        provider_id: Set(new.provider_id),
        price: Set(new.price),
        description: Set(new.description),
        available: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
