//! Create `contact_request` table.
//!
//! One row per public contact-form submission, with a lifecycle status
//! (pending / in_progress / completed / archived) stored as a string.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContactRequest::Table)
                    .if_not_exists()
                    .col(uuid(ContactRequest::Id).primary_key())
                    .col(string_len(ContactRequest::FirstName, 128).not_null())
                    .col(string_len(ContactRequest::LastName, 128).not_null())
                    .col(string_len(ContactRequest::Email, 255).not_null())
                    .col(ColumnDef::new(ContactRequest::Phone).string_len(32).null())
                    .col(ColumnDef::new(ContactRequest::Subject).string_len(255).null())
                    .col(text(ContactRequest::Message).not_null())
                    .col(string_len(ContactRequest::Status, 32).not_null())
                    .col(timestamp_with_time_zone(ContactRequest::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ContactRequest::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContactRequest::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ContactRequest {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Subject,
    Message,
    Status,
    CreatedAt,
    UpdatedAt,
}
