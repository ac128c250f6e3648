//! Create `reservation` table.
//!
//! Party and proposal references are opaque ids without FK constraints:
//! deleting a user or proposal must leave booking history readable, and the
//! list views null out the missing side instead of failing.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservation::Table)
                    .if_not_exists()
                    .col(uuid(Reservation::Id).primary_key())
                    .col(uuid(Reservation::ProposalId).not_null())
                    .col(uuid(Reservation::ClientId).not_null())
                    .col(uuid(Reservation::ProviderId).not_null())
                    .col(date(Reservation::Day).not_null())
                    .col(string_len(Reservation::Time, 5).not_null())
                    .col(
                        string_len(Reservation::Status, 16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(timestamp_with_time_zone(Reservation::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Reservation::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reservation { Table, Id, ProposalId, ClientId, ProviderId, Day, Time, Status, CreatedAt, UpdatedAt }
