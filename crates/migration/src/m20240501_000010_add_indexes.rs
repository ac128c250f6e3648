//! Secondary indexes, plus the authoritative booking guard.
//!
//! `uniq_reservation_proposal_slot_confirmed` is a *partial* unique index on
//! `(proposal_id, time)` restricted to `status = 'confirmed'`. Two pending
//! reservations may share a slot; two confirmed ones may not, even when two
//! instances race on the confirm path. sea-query index builders carry no
//! predicate support, so this one goes through raw SQL.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reservation: provider/day lookups drive the availability grid
        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_provider_day")
                    .table(Reservation::Table)
                    .col(Reservation::ProviderId)
                    .col(Reservation::Day)
                    .to_owned(),
            )
            .await?;

        // Reservation: client view
        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_client")
                    .table(Reservation::Table)
                    .col(Reservation::ClientId)
                    .to_owned(),
            )
            .await?;

        // Proposal: provider and service listings
        manager
            .create_index(
                Index::create()
                    .name("idx_service_proposal_provider")
                    .table(ServiceProposal::Table)
                    .col(ServiceProposal::ProviderId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_proposal_service")
                    .table(ServiceProposal::Table)
                    .col(ServiceProposal::ServiceId)
                    .to_owned(),
            )
            .await?;

        // One confirmed reservation per (proposal, slot)
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uniq_reservation_proposal_slot_confirmed \
                 ON reservation (proposal_id, time) WHERE status = 'confirmed'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS uniq_reservation_proposal_slot_confirmed")
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_service_proposal_service")
                    .table(ServiceProposal::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_service_proposal_provider")
                    .table(ServiceProposal::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_reservation_client")
                    .table(Reservation::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_reservation_provider_day")
                    .table(Reservation::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Reservation { Table, ClientId, ProviderId, Day }

#[derive(DeriveIden)]
enum ServiceProposal { Table, ProviderId, ServiceId }
