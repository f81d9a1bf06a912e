use sea_orm_migration::prelude::*;

mod m20260501_000001_create_users;
mod m20260501_000002_create_profiles;
mod m20260501_000003_create_subjects;
mod m20260501_000004_create_lessons;
mod m20260501_000005_create_enrollments;
mod m20260501_000006_create_certificate_jobs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260501_000001_create_users::Migration),
            Box::new(m20260501_000002_create_profiles::Migration),
            Box::new(m20260501_000003_create_subjects::Migration),
            Box::new(m20260501_000004_create_lessons::Migration),
            Box::new(m20260501_000005_create_enrollments::Migration),
            Box::new(m20260501_000006_create_certificate_jobs::Migration),
        ]
    }
}
