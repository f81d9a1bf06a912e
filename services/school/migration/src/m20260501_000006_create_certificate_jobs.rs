use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CertificateJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CertificateJobs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CertificateJobs::StudentId).uuid().not_null())
                    .col(
                        ColumnDef::new(CertificateJobs::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CertificateJobs::IdempotencyKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CertificateJobs::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CertificateJobs::LastError).string())
                    .col(
                        ColumnDef::new(CertificateJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CertificateJobs::NextAttemptAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CertificateJobs::ProcessedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CertificateJobs::FailedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .from(CertificateJobs::Table, CertificateJobs::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for worker poll queries (unprocessed, unfailed, by next_attempt_at).
        manager
            .create_index(
                Index::create()
                    .table(CertificateJobs::Table)
                    .col(CertificateJobs::NextAttemptAt)
                    .name("idx_certificate_jobs_next_attempt_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CertificateJobs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CertificateJobs {
    Table,
    Id,
    StudentId,
    Payload,
    IdempotencyKey,
    Attempts,
    LastError,
    CreatedAt,
    NextAttemptAt,
    ProcessedAt,
    FailedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
