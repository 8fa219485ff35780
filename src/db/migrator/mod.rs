use sea_orm_migration::prelude::*;

mod m20251030_initial;
mod m20251031_add_users;
mod m20251104_add_link_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251030_initial::Migration),
            Box::new(m20251031_add_users::Migration),
            Box::new(m20251104_add_link_indexes::Migration),
        ]
    }
}
