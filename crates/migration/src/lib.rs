pub use sea_orm_migration::prelude::*;

mod m20260702_090000_users_stores;
mod m20260702_110000_catalog;
mod m20260703_090000_contacts;
mod m20260703_150000_documents;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260702_090000_users_stores::Migration),
            Box::new(m20260702_110000_catalog::Migration),
            Box::new(m20260703_090000_contacts::Migration),
            Box::new(m20260703_150000_documents::Migration),
        ]
    }
}
