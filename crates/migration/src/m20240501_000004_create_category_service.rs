//! Create `category_service` join table (category membership of services).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CategoryService::Table)
                    .if_not_exists()
                    .col(uuid(CategoryService::CategoryId).not_null())
                    .col(uuid(CategoryService::ServiceId).not_null())
                    .primary_key(
                        Index::create()
                            .col(CategoryService::CategoryId)
                            .col(CategoryService::ServiceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_service_category")
                            .from(CategoryService::Table, CategoryService::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_service_service")
                            .from(CategoryService::Table, CategoryService::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CategoryService::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CategoryService { Table, CategoryId, ServiceId }

#[derive(DeriveIden)]
enum Category { Table, Id }

#[derive(DeriveIden)]
enum Service { Table, Id }
