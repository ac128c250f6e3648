//! Create `service_proposal` table with FKs to `service` and `user`.
//!
//! A proposal is a provider-authored, priced offering of one service.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceProposal::Table)
                    .if_not_exists()
                    .col(uuid(ServiceProposal::Id).primary_key())
                    .col(string_len(ServiceProposal::Title, 255).not_null())
                    .col(uuid(ServiceProposal::ServiceId).not_null())
                    .col(uuid(ServiceProposal::ProviderId).not_null())
                    .col(double(ServiceProposal::Price).not_null())
                    .col(text(ServiceProposal::Description).not_null())
                    .col(boolean(ServiceProposal::Available).not_null().default(true))
                    .col(timestamp_with_time_zone(ServiceProposal::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ServiceProposal::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_proposal_service")
                            .from(ServiceProposal::Table, ServiceProposal::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_proposal_provider")
                            .from(ServiceProposal::Table, ServiceProposal::ProviderId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceProposal::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceProposal { Table, Id, Title, ServiceId, ProviderId, Price, Description, Available, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Service { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
