//! Create `attachment` table with FK to `contact_request`.
//!
//! Files are stored by an external provider; only metadata is kept here.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attachment::Table)
                    .if_not_exists()
                    .col(uuid(Attachment::Id).primary_key())
                    .col(uuid(Attachment::ContactRequestId).not_null())
                    .col(string_len(Attachment::FileName, 255).not_null())
                    .col(text(Attachment::Url).not_null())
                    .col(big_integer(Attachment::SizeBytes).not_null())
                    .col(timestamp_with_time_zone(Attachment::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attachment_contact_request")
                            .from(Attachment::Table, Attachment::ContactRequestId)
                            .to(ContactRequest::Table, ContactRequest::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Attachment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Attachment { Table, Id, ContactRequestId, FileName, Url, SizeBytes, CreatedAt }

#[derive(DeriveIden)]
enum ContactRequest { Table, Id }
