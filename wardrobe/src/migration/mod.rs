//! Versioned schema migrations, run by `wardrobe migrate` and on `serve`.

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_wardrobe_tables;
mod m20250101_000002_create_personal_access_tokens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_wardrobe_tables::Migration),
            Box::new(m20250101_000002_create_personal_access_tokens::Migration),
        ]
    }
}
