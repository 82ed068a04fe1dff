//! Create report table migration.

use sea_orm_migration::prelude::*;

use super::audit::{User, add_audit_columns};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Report::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Report::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Report::ReportedBy).big_integer().not_null())
            .col(ColumnDef::new(Report::TargetKind).string_len(32).not_null())
            .col(ColumnDef::new(Report::TargetId).big_integer().not_null())
            .col(ColumnDef::new(Report::Reason).text().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_report_reported_by")
                    .from(Report::Table, Report::ReportedBy)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut table, Report::Table, "report");

        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_target")
                    .table(Report::Table)
                    .col(Report::TargetKind)
                    .col(Report::TargetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_reported_by")
                    .table(Report::Table)
                    .col(Report::ReportedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum Report {
    Table,
    Id,
    ReportedBy,
    TargetKind,
    TargetId,
    Reason,
}
