//! Columns and foreign keys shared by tables that carry audit fields.

use sea_orm_migration::prelude::*;

#[derive(Iden, Clone, Copy)]
pub(crate) enum Audit {
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone, Copy)]
pub(crate) enum User {
    Table,
    Id,
}

/// Append `created_by`, `updated_by`, `created_at` and `updated_at` to a
/// table definition. Both actor columns cascade from `user`.
pub(crate) fn add_audit_columns<T>(stmt: &mut TableCreateStatement, table: T, name: &str)
where
    T: Iden + Clone + 'static,
{
    stmt.col(ColumnDef::new(Audit::CreatedBy).big_integer().not_null())
        .col(ColumnDef::new(Audit::UpdatedBy).big_integer().not_null())
        .col(
            ColumnDef::new(Audit::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Audit::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{name}_created_by"))
                .from(table.clone(), Audit::CreatedBy)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{name}_updated_by"))
                .from(table, Audit::UpdatedBy)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::Cascade),
        );
}
