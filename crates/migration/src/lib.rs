//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240901_000001_create_admin;
mod m20240901_000002_create_admin_credentials;
mod m20240901_000003_create_contact_request;
mod m20240901_000004_create_attachment;
mod m20240901_000005_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240901_000001_create_admin::Migration),
            Box::new(m20240901_000002_create_admin_credentials::Migration),
            Box::new(m20240901_000003_create_contact_request::Migration),
            Box::new(m20240901_000004_create_attachment::Migration),
            // Indexes should always be applied last
            Box::new(m20240901_000005_add_indexes::Migration),
        ]
    }
}
