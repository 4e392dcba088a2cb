use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employee {
    Table,
    Id,
    FirstName,
    LastName,
    Position,
    Department,
}

#[derive(DeriveIden)]
enum DirectReport {
    Table,
    ManagerId,
    Ordinal,
    ReportId,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employee::Id).string_len(64).not_null().primary_key())
                    .col(ColumnDef::new(Employee::FirstName).string_len(128).not_null())
                    .col(ColumnDef::new(Employee::LastName).string_len(128).not_null())
                    .col(ColumnDef::new(Employee::Position).string_len(128).not_null())
                    .col(ColumnDef::new(Employee::Department).string_len(128).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employee_department")
                    .table(Employee::Table)
                    .col(Employee::Department)
                    .to_owned(),
            )
            .await?;

        // Edges leave with their manager; incoming edges may dangle.
        manager
            .create_table(
                Table::create()
                    .table(DirectReport::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DirectReport::ManagerId).string_len(64).not_null())
                    .col(ColumnDef::new(DirectReport::Ordinal).integer().not_null())
                    .col(ColumnDef::new(DirectReport::ReportId).string_len(64).not_null())
                    .primary_key(
                        Index::create()
                            .col(DirectReport::ManagerId)
                            .col(DirectReport::Ordinal),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_direct_report_manager")
                            .from(DirectReport::Table, DirectReport::ManagerId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_direct_report_report")
                    .table(DirectReport::Table)
                    .col(DirectReport::ReportId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DirectReport::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employee::Table).to_owned())
            .await?;
        Ok(())
    }
}
