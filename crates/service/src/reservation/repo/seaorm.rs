use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use models::{reservation, service, service_proposal, user};

use crate::reservation::domain::{
    NewReservation, PartySummary, ProposalSummary, Reservation, ReservationStatus, Slot,
};
use crate::reservation::errors::ReservationError;
use crate::reservation::repository::{PartyDirectory, ReservationRepository};

/// SeaORM-backed reservation store. The partial unique index
/// `uniq_reservation_proposal_slot_confirmed` turns a lost confirm race into
/// a `UniqueConstraintViolation`, surfaced here as `Conflict`.
pub struct SeaOrmReservationRepository {
    pub db: DatabaseConnection,
}

fn map_db_err(e: DbErr) -> ReservationError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ReservationError::slot_taken(),
        _ => ReservationError::Repository(e.to_string()),
    }
}

fn to_domain(m: reservation::Model) -> Result<Reservation, ReservationError> {
    let slot = Slot::parse(&m.time)
        .map_err(|_| ReservationError::Repository(format!("corrupt slot label '{}'", m.time)))?;
    let status = ReservationStatus::parse(&m.status)
        .ok_or_else(|| ReservationError::Repository(format!("corrupt status '{}'", m.status)))?;
    Ok(Reservation {
        id: m.id,
        proposal_id: m.proposal_id,
        client_id: m.client_id,
        provider_id: m.provider_id,
        day: m.day,
        slot,
        status,
        created_at: m.created_at.with_timezone(&Utc),
    })
}

fn to_domain_all(rows: Vec<reservation::Model>) -> Result<Vec<Reservation>, ReservationError> {
    rows.into_iter().map(to_domain).collect()
}

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn insert(&self, new: NewReservation) -> Result<Reservation, ReservationError> {
        let now = Utc::now().into();
        let am = reservation::ActiveModel {
            id: Set(Uuid::new_v4()),
            proposal_id: Set(new.proposal_id),
            client_id: Set(new.client_id),
            provider_id: Set(new.provider_id),
            day: Set(new.day),
            time: Set(new.slot.label()),
            status: Set(ReservationStatus::Pending.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = am.insert(&self.db).await.map_err(map_db_err)?;
        to_domain(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, ReservationError> {
        let found = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        found.map(to_domain).transpose()
    }

    async fn confirmed_exists(
        &self,
        proposal_id: Uuid,
        slot: Slot,
        exclude: Option<Uuid>,
    ) -> Result<bool, ReservationError> {
        let mut query = reservation::Entity::find()
            .filter(reservation::Column::ProposalId.eq(proposal_id))
            .filter(reservation::Column::Time.eq(slot.label()))
            .filter(reservation::Column::Status.eq(ReservationStatus::Confirmed.as_str()));
        if let Some(id) = exclude {
            query = query.filter(reservation::Column::Id.ne(id));
        }
        let count = query.count(&self.db).await.map_err(map_db_err)?;
        Ok(count > 0)
    }

    async fn confirmed_for_provider_day(
        &self,
        provider_id: Uuid,
        day: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationError> {
        let rows = reservation::Entity::find()
            .filter(reservation::Column::ProviderId.eq(provider_id))
            .filter(reservation::Column::Day.eq(day))
            .filter(reservation::Column::Status.eq(ReservationStatus::Confirmed.as_str()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        to_domain_all(rows)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
    ) -> Result<Reservation, ReservationError> {
        let found = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| ReservationError::NotFound("reservation".into()))?;
        let mut am: reservation::ActiveModel = found.into();
        am.status = Set(status.as_str().to_string());
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await.map_err(map_db_err)?;
        to_domain(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ReservationError> {
        let res = reservation::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        if res.rows_affected == 0 {
            return Err(ReservationError::NotFound("reservation".into()));
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Reservation>, ReservationError> {
        let rows = reservation::Entity::find().all(&self.db).await.map_err(map_db_err)?;
        to_domain_all(rows)
    }

    async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<Reservation>, ReservationError> {
        let rows = reservation::Entity::find()
            .filter(reservation::Column::ClientId.eq(client_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        to_domain_all(rows)
    }

    async fn list_for_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Reservation>, ReservationError> {
        let rows = reservation::Entity::find()
            .filter(reservation::Column::ProviderId.eq(provider_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        to_domain_all(rows)
    }
}

/// Directory of the collaborator-owned records, read-only.
pub struct SeaOrmPartyDirectory {
    pub db: DatabaseConnection,
}

#[async_trait]
impl PartyDirectory for SeaOrmPartyDirectory {
    async fn find_user(&self, id: Uuid) -> Result<Option<PartySummary>, ReservationError> {
        let found = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(found.map(|u| PartySummary {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            phone: u.phone,
            city: u.city,
            address: u.address,
            photo: u.photo,
        }))
    }

    async fn find_proposal(&self, id: Uuid) -> Result<Option<ProposalSummary>, ReservationError> {
        let Some(p) = service_proposal::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };
        // The linked service may itself be gone; the summary survives
        let service_name = service::Entity::find_by_id(p.service_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(|s| s.name);
        Ok(Some(ProposalSummary { id: p.id, title: p.title, price: p.price, service_name }))
    }
}
