use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::domain::{
    NewReservation, PartySummary, ProposalSummary, Reservation, ReservationStatus, Slot,
};
use super::errors::ReservationError;

/// Persistence abstraction for reservations.
///
/// Implementations are the authoritative guard for the booking invariant:
/// `set_status(.., Confirmed)` must fail with [`ReservationError::Conflict`]
/// when another reservation already holds `Confirmed` for the same
/// `(proposal_id, slot)`. In Postgres this falls out of the partial unique
/// index; application pre-checks are an early exit only.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn insert(&self, new: NewReservation) -> Result<Reservation, ReservationError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, ReservationError>;
    /// Is any reservation other than `exclude` confirmed for this slot?
    async fn confirmed_exists(
        &self,
        proposal_id: Uuid,
        slot: Slot,
        exclude: Option<Uuid>,
    ) -> Result<bool, ReservationError>;
    async fn confirmed_for_provider_day(
        &self,
        provider_id: Uuid,
        day: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationError>;
    async fn set_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
    ) -> Result<Reservation, ReservationError>;
    async fn delete(&self, id: Uuid) -> Result<(), ReservationError>;
    async fn list_all(&self) -> Result<Vec<Reservation>, ReservationError>;
    async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<Reservation>, ReservationError>;
    async fn list_for_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Reservation>, ReservationError>;
}

/// Read access to the collaborator-owned records the engine references by
/// opaque id (users and proposals). Lookups return `None` for dangling ids.
#[async_trait]
pub trait PartyDirectory: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<PartySummary>, ReservationError>;
    async fn find_proposal(&self, id: Uuid) -> Result<Option<ProposalSummary>, ReservationError>;
}

/// Simple in-memory mocks for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockReservationRepository {
        rows: Mutex<Vec<Reservation>>,
    }

    #[async_trait]
    impl ReservationRepository for MockReservationRepository {
        async fn insert(&self, new: NewReservation) -> Result<Reservation, ReservationError> {
            let mut rows = self.rows.lock().unwrap();
            let r = Reservation {
                id: Uuid::new_v4(),
                proposal_id: new.proposal_id,
                client_id: new.client_id,
                provider_id: new.provider_id,
                day: new.day,
                slot: new.slot,
                status: ReservationStatus::Pending,
                created_at: Utc::now(),
            };
            rows.push(r.clone());
            Ok(r)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, ReservationError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|r| r.id == id).cloned())
        }

        async fn confirmed_exists(
            &self,
            proposal_id: Uuid,
            slot: Slot,
            exclude: Option<Uuid>,
        ) -> Result<bool, ReservationError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().any(|r| {
                r.proposal_id == proposal_id
                    && r.slot == slot
                    && r.status == ReservationStatus::Confirmed
                    && Some(r.id) != exclude
            }))
        }

        async fn confirmed_for_provider_day(
            &self,
            provider_id: Uuid,
            day: NaiveDate,
        ) -> Result<Vec<Reservation>, ReservationError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|r| {
                    r.provider_id == provider_id
                        && r.day == day
                        && r.status == ReservationStatus::Confirmed
                })
                .cloned()
                .collect())
        }

        async fn set_status(
            &self,
            id: Uuid,
            status: ReservationStatus,
        ) -> Result<Reservation, ReservationError> {
            let mut rows = self.rows.lock().unwrap();
            // Mirror the partial unique index semantics of the real store
            if status == ReservationStatus::Confirmed {
                let target = rows
                    .iter()
                    .find(|r| r.id == id)
                    .ok_or_else(|| ReservationError::NotFound("reservation".into()))?;
                let taken = rows.iter().any(|r| {
                    r.id != id
                        && r.proposal_id == target.proposal_id
                        && r.slot == target.slot
                        && r.status == ReservationStatus::Confirmed
                });
                if taken {
                    return Err(ReservationError::slot_taken());
                }
            }
            let row = rows
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| ReservationError::NotFound("reservation".into()))?;
            row.status = status;
            Ok(row.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<(), ReservationError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.id != id);
            if rows.len() == before {
                return Err(ReservationError::NotFound("reservation".into()));
            }
            Ok(())
        }

        async fn list_all(&self) -> Result<Vec<Reservation>, ReservationError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn list_for_client(
            &self,
            client_id: Uuid,
        ) -> Result<Vec<Reservation>, ReservationError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().filter(|r| r.client_id == client_id).cloned().collect())
        }

        async fn list_for_provider(
            &self,
            provider_id: Uuid,
        ) -> Result<Vec<Reservation>, ReservationError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().filter(|r| r.provider_id == provider_id).cloned().collect())
        }
    }

    #[derive(Default)]
    pub struct MockPartyDirectory {
        users: Mutex<HashMap<Uuid, PartySummary>>,
        proposals: Mutex<HashMap<Uuid, ProposalSummary>>,
    }

    impl MockPartyDirectory {
        pub fn add_user(&self, id: Uuid, first_name: &str) {
            self.users.lock().unwrap().insert(
                id,
                PartySummary {
                    id,
                    first_name: first_name.to_string(),
                    last_name: "Example".into(),
                    email: format!("{}@example.com", first_name.to_lowercase()),
                    phone: "21600000".into(),
                    city: "Tunis".into(),
                    address: None,
                    photo: None,
                },
            );
        }

        pub fn add_proposal(&self, id: Uuid, title: &str, price: f64) {
            self.proposals.lock().unwrap().insert(
                id,
                ProposalSummary {
                    id,
                    title: title.to_string(),
                    price,
                    service_name: Some("Cleaning".into()),
                },
            );
        }

        pub fn remove_proposal(&self, id: Uuid) {
            self.proposals.lock().unwrap().remove(&id);
        }
    }

    #[async_trait]
    impl PartyDirectory for MockPartyDirectory {
        async fn find_user(&self, id: Uuid) -> Result<Option<PartySummary>, ReservationError> {
            Ok(self.users.lock().unwrap().get(&id).cloned())
        }

        async fn find_proposal(
            &self,
            id: Uuid,
        ) -> Result<Option<ProposalSummary>, ReservationError> {
            Ok(self.proposals.lock().unwrap().get(&id).cloned())
        }
    }
}
