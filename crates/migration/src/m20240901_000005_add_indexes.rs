use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ContactRequest: back-office lists filter by status and sort by date
        manager
            .create_index(
                Index::create()
                    .name("idx_contact_request_status")
                    .table(ContactRequest::Table)
                    .col(ContactRequest::Status)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_contact_request_created_at")
                    .table(ContactRequest::Table)
                    .col(ContactRequest::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Attachment: detail view loads by owning request
        manager
            .create_index(
                Index::create()
                    .name("idx_attachment_contact_request")
                    .table(Attachment::Table)
                    .col(Attachment::ContactRequestId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_contact_request_status")
                    .table(ContactRequest::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_contact_request_created_at")
                    .table(ContactRequest::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_attachment_contact_request")
                    .table(Attachment::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum ContactRequest { Table, Status, CreatedAt }

#[derive(DeriveIden)]
enum Attachment { Table, ContactRequestId }
