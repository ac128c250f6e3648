use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{
    AvailabilitySlot, CreateReservation, Reservation, ReservationStatus, ReservationView, Slot,
};
use super::errors::ReservationError;
use super::repository::{PartyDirectory, ReservationRepository};

/// Booking engine, independent of the web framework. Stateless per request;
/// every instance races only through the store, never through process-local
/// state.
pub struct ReservationService<R: ReservationRepository, D: PartyDirectory> {
    repo: Arc<R>,
    directory: Arc<D>,
}

impl<R: ReservationRepository, D: PartyDirectory> ReservationService<R, D> {
    pub fn new(repo: Arc<R>, directory: Arc<D>) -> Self {
        Self { repo, directory }
    }

    /// Compute the slot grid for one provider and one calendar day.
    ///
    /// A slot is unavailable exactly when a *confirmed* reservation holds its
    /// label; pending bookings never block the grid. Pure read.
    #[instrument(skip(self), fields(provider_id = %provider_id, date = %date))]
    pub async fn availability(
        &self,
        provider_id: Uuid,
        date: &str,
    ) -> Result<Vec<AvailabilitySlot>, ReservationError> {
        let day = super::domain::parse_day(date)?;
        if self.directory.find_user(provider_id).await?.is_none() {
            return Err(ReservationError::NotFound("service provider".into()));
        }
        let confirmed = self.repo.confirmed_for_provider_day(provider_id, day).await?;
        let slots = Slot::all()
            .map(|slot| AvailabilitySlot {
                time: slot.label(),
                is_available: !confirmed.iter().any(|r| r.slot == slot),
            })
            .collect();
        Ok(slots)
    }

    /// Take a booking. The new reservation always starts out pending.
    ///
    /// The conflict check here is an early exit; under concurrent confirms
    /// the partial unique index in the store is what actually holds the line.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateReservation) -> Result<Reservation, ReservationError> {
        let new = input.validate()?;
        if self.repo.confirmed_exists(new.proposal_id, new.slot, None).await? {
            debug!(proposal_id = %new.proposal_id, slot = %new.slot, "slot already confirmed");
            return Err(ReservationError::slot_taken());
        }
        let created = self.repo.insert(new).await?;
        info!(reservation_id = %created.id, proposal_id = %created.proposal_id,
              slot = %created.slot, "reservation_created");
        Ok(created)
    }

    /// Provider decision on a pending reservation.
    ///
    /// Only `confirmed` and `rejected` may be requested, only by the owning
    /// provider, and only out of `pending`. The confirm path re-validates the
    /// slot because two pending reservations may legitimately coexist until
    /// one of them is confirmed.
    #[instrument(skip(self), fields(reservation_id = %id, acting_user = %acting_user))]
    pub async fn update_status(
        &self,
        id: Uuid,
        requested: &str,
        acting_user: Uuid,
    ) -> Result<Reservation, ReservationError> {
        let requested = ReservationStatus::parse_requested(requested)?;
        let reservation = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ReservationError::NotFound("reservation".into()))?;
        if reservation.provider_id != acting_user {
            return Err(ReservationError::Forbidden(
                "you are not authorized to update this reservation status".into(),
            ));
        }
        reservation.status.transition(requested)?;
        if requested == ReservationStatus::Confirmed
            && self
                .repo
                .confirmed_exists(reservation.proposal_id, reservation.slot, Some(id))
                .await?
        {
            return Err(ReservationError::slot_taken());
        }
        let updated = self.repo.set_status(id, requested).await?;
        info!(reservation_id = %id, status = %updated.status, "reservation_status_updated");
        Ok(updated)
    }

    /// Cancel a reservation.
    ///
    /// Policy: the owning provider may cancel any of their reservations; the
    /// owning client may cancel as long as the booking is not yet confirmed.
    /// A confirmed booking needs the provider's consent to disappear.
    #[instrument(skip(self), fields(reservation_id = %id, acting_user = %acting_user))]
    pub async fn delete(&self, id: Uuid, acting_user: Uuid) -> Result<(), ReservationError> {
        let reservation = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ReservationError::NotFound("reservation".into()))?;
        let allowed = acting_user == reservation.provider_id
            || (acting_user == reservation.client_id
                && reservation.status != ReservationStatus::Confirmed);
        if !allowed {
            return Err(ReservationError::Forbidden(
                "you are not authorized to cancel this reservation".into(),
            ));
        }
        self.repo.delete(id).await?;
        info!(reservation_id = %id, "reservation_deleted");
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<ReservationView>, ReservationError> {
        let rows = self.repo.list_all().await?;
        self.expand(rows).await
    }

    pub async fn list_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<ReservationView>, ReservationError> {
        let rows = self.repo.list_for_client(client_id).await?;
        self.expand(rows).await
    }

    pub async fn list_for_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<ReservationView>, ReservationError> {
        let rows = self.repo.list_for_provider(provider_id).await?;
        self.expand(rows).await
    }

    /// Join each reservation with its proposal and party records. Dangling
    /// references come back as `None` rather than failing the whole view.
    async fn expand(
        &self,
        rows: Vec<Reservation>,
    ) -> Result<Vec<ReservationView>, ReservationError> {
        let mut views = Vec::with_capacity(rows.len());
        for r in rows {
            let proposal = self.directory.find_proposal(r.proposal_id).await?;
            let client = self.directory.find_user(r.client_id).await?;
            let provider = self.directory.find_user(r.provider_id).await?;
            views.push(ReservationView {
                id: r.id,
                day: r.day,
                slot: r.slot,
                status: r.status,
                proposal,
                client,
                provider,
            });
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::super::repository::mock::{MockPartyDirectory, MockReservationRepository};
    use super::*;

    struct Fixture {
        svc: ReservationService<MockReservationRepository, MockPartyDirectory>,
        directory: Arc<MockPartyDirectory>,
        proposal: Uuid,
        provider: Uuid,
        client: Uuid,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(MockReservationRepository::default());
        let directory = Arc::new(MockPartyDirectory::default());
        let proposal = Uuid::new_v4();
        let provider = Uuid::new_v4();
        let client = Uuid::new_v4();
        directory.add_user(provider, "Prov");
        directory.add_user(client, "Cli");
        directory.add_proposal(proposal, "House cleaning", 80.0);
        let svc = ReservationService::new(repo, directory.clone());
        Fixture { svc, directory, proposal, provider, client }
    }

    fn booking(f: &Fixture, time: &str) -> CreateReservation {
        CreateReservation {
            date: Some("2025-06-10".into()),
            time: Some(time.into()),
            proposal_id: Some(f.proposal),
            provider_id: Some(f.provider),
            client_id: Some(f.client),
        }
    }

    // Scenario A: a provider with no reservations has a fully open day
    #[tokio::test]
    async fn empty_day_is_fully_available() {
        let f = fixture();
        let slots = f.svc.availability(f.provider, "2025-06-10").await.unwrap();
        assert_eq!(slots.len(), 9);
        assert_eq!(slots[0].time, "09:00");
        assert_eq!(slots[8].time, "17:00");
        assert!(slots.iter().all(|s| s.is_available));
    }

    #[tokio::test]
    async fn availability_unknown_provider_is_not_found() {
        let f = fixture();
        let err = f.svc.availability(Uuid::new_v4(), "2025-06-10").await.unwrap_err();
        assert!(matches!(err, ReservationError::NotFound(_)));
    }

    #[tokio::test]
    async fn availability_rejects_garbage_dates() {
        let f = fixture();
        let err = f.svc.availability(f.provider, "tomorrow-ish").await.unwrap_err();
        assert!(matches!(err, ReservationError::Validation(_)));
    }

    // P5: reads are idempotent
    #[tokio::test]
    async fn availability_is_idempotent() {
        let f = fixture();
        let a = f.svc.availability(f.provider, "2025-06-10").await.unwrap();
        let b = f.svc.availability(f.provider, "2025-06-10").await.unwrap();
        assert_eq!(a, b);
    }

    // Scenario B + P3: confirming a booking closes exactly that slot
    #[tokio::test]
    async fn confirmation_closes_the_slot() {
        let f = fixture();
        let r = f.svc.create(booking(&f, "10:00")).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Pending);

        // Pending bookings do not block the grid
        let open = f.svc.availability(f.provider, "2025-06-10").await.unwrap();
        assert!(open.iter().all(|s| s.is_available));

        f.svc.update_status(r.id, "confirmed", f.provider).await.unwrap();
        let slots = f.svc.availability(f.provider, "2025-06-10").await.unwrap();
        for s in &slots {
            assert_eq!(s.is_available, s.time != "10:00", "slot {}", s.time);
        }
    }

    // Scenario C: booking a confirmed slot fails with a conflict
    #[tokio::test]
    async fn booking_a_confirmed_slot_conflicts() {
        let f = fixture();
        let r = f.svc.create(booking(&f, "10:00")).await.unwrap();
        f.svc.update_status(r.id, "confirmed", f.provider).await.unwrap();

        let mut second = booking(&f, "10:00");
        second.client_id = Some(Uuid::new_v4());
        let err = f.svc.create(second).await.unwrap_err();
        assert!(matches!(err, ReservationError::Conflict(_)));
    }

    // Scenario D + P2: self-booking never creates a record
    #[tokio::test]
    async fn self_booking_is_rejected() {
        let f = fixture();
        let mut input = booking(&f, "11:00");
        input.client_id = Some(f.provider);
        let err = f.svc.create(input).await.unwrap_err();
        assert!(matches!(err, ReservationError::Validation(_)));
        assert!(f.svc.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_requires_every_field() {
        let f = fixture();
        let mut input = booking(&f, "11:00");
        input.date = None;
        let err = f.svc.create(input).await.unwrap_err();
        assert!(matches!(err, ReservationError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_labels_outside_the_grid() {
        let f = fixture();
        let err = f.svc.create(booking(&f, "18:00")).await.unwrap_err();
        assert!(matches!(err, ReservationError::Validation(_)));
    }

    // Scenario E + P4: only the owning provider may decide
    #[tokio::test]
    async fn foreign_provider_cannot_update_status() {
        let f = fixture();
        let r = f.svc.create(booking(&f, "10:00")).await.unwrap();
        let stranger = Uuid::new_v4();
        for status in ["confirmed", "rejected"] {
            let err = f.svc.update_status(r.id, status, stranger).await.unwrap_err();
            assert!(matches!(err, ReservationError::Forbidden(_)));
        }
        // The client is not the provider either
        let err = f.svc.update_status(r.id, "confirmed", f.client).await.unwrap_err();
        assert!(matches!(err, ReservationError::Forbidden(_)));
    }

    #[tokio::test]
    async fn update_status_validates_requested_value() {
        let f = fixture();
        let r = f.svc.create(booking(&f, "10:00")).await.unwrap();
        let err = f.svc.update_status(r.id, "pending", f.provider).await.unwrap_err();
        assert!(matches!(err, ReservationError::Validation(_)));
        let err = f.svc.update_status(r.id, "cancelled", f.provider).await.unwrap_err();
        assert!(matches!(err, ReservationError::Validation(_)));
    }

    #[tokio::test]
    async fn update_status_unknown_reservation_is_not_found() {
        let f = fixture();
        let err = f.svc.update_status(Uuid::new_v4(), "confirmed", f.provider).await.unwrap_err();
        assert!(matches!(err, ReservationError::NotFound(_)));
    }

    // P1: two pending siblings may coexist, only one can ever be confirmed
    #[tokio::test]
    async fn sibling_pending_cannot_be_confirmed_after_first() {
        let f = fixture();
        let first = f.svc.create(booking(&f, "10:00")).await.unwrap();
        let mut second_input = booking(&f, "10:00");
        second_input.client_id = Some(Uuid::new_v4());
        let second = f.svc.create(second_input).await.unwrap();

        f.svc.update_status(first.id, "confirmed", f.provider).await.unwrap();
        let err = f.svc.update_status(second.id, "confirmed", f.provider).await.unwrap_err();
        assert!(matches!(err, ReservationError::Conflict(_)));

        // Rejecting the loser is still fine
        let rejected = f.svc.update_status(second.id, "rejected", f.provider).await.unwrap();
        assert_eq!(rejected.status, ReservationStatus::Rejected);
    }

    #[tokio::test]
    async fn terminal_states_admit_no_transition() {
        let f = fixture();
        let r = f.svc.create(booking(&f, "10:00")).await.unwrap();
        f.svc.update_status(r.id, "rejected", f.provider).await.unwrap();
        let err = f.svc.update_status(r.id, "confirmed", f.provider).await.unwrap_err();
        assert!(matches!(err, ReservationError::Validation(_)));
    }

    #[tokio::test]
    async fn client_may_cancel_pending_but_not_confirmed() {
        let f = fixture();
        let r = f.svc.create(booking(&f, "10:00")).await.unwrap();
        f.svc.update_status(r.id, "confirmed", f.provider).await.unwrap();
        let err = f.svc.delete(r.id, f.client).await.unwrap_err();
        assert!(matches!(err, ReservationError::Forbidden(_)));

        // The provider may remove a confirmed booking
        f.svc.delete(r.id, f.provider).await.unwrap();
        assert!(f.svc.list_all().await.unwrap().is_empty());

        let r2 = f.svc.create(booking(&f, "11:00")).await.unwrap();
        f.svc.delete(r2.id, f.client).await.unwrap();
    }

    #[tokio::test]
    async fn strangers_cannot_cancel() {
        let f = fixture();
        let r = f.svc.create(booking(&f, "10:00")).await.unwrap();
        let err = f.svc.delete(r.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ReservationError::Forbidden(_)));
    }

    #[tokio::test]
    async fn delete_unknown_reservation_is_not_found() {
        let f = fixture();
        let err = f.svc.delete(Uuid::new_v4(), f.client).await.unwrap_err();
        assert!(matches!(err, ReservationError::NotFound(_)));
    }

    #[tokio::test]
    async fn views_join_and_filter_per_party() {
        let f = fixture();
        let r = f.svc.create(booking(&f, "10:00")).await.unwrap();

        let all = f.svc.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        let view = &all[0];
        assert_eq!(view.id, r.id);
        assert_eq!(view.proposal.as_ref().unwrap().title, "House cleaning");
        assert_eq!(view.client.as_ref().unwrap().first_name, "Cli");
        assert_eq!(view.provider.as_ref().unwrap().first_name, "Prov");

        assert_eq!(f.svc.list_for_client(f.client).await.unwrap().len(), 1);
        assert_eq!(f.svc.list_for_provider(f.provider).await.unwrap().len(), 1);
        assert!(f.svc.list_for_client(f.provider).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn views_tolerate_dangling_proposal() {
        let f = fixture();
        f.svc.create(booking(&f, "10:00")).await.unwrap();
        f.directory.remove_proposal(f.proposal);

        let all = f.svc.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].proposal.is_none());
        assert!(all[0].client.is_some());
    }
}
