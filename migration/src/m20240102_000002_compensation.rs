use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Compensation {
    Table,
    Id,
    EmployeeId,
    SalaryCents,
    EffectiveDate,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No foreign key on employee_id: compensation may be recorded ahead
        // of the employee record and survives its replacement.
        manager
            .create_table(
                Table::create()
                    .table(Compensation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Compensation::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Compensation::EmployeeId).string_len(64).not_null())
                    .col(ColumnDef::new(Compensation::SalaryCents).big_integer().not_null())
                    .col(
                        ColumnDef::new(Compensation::EffectiveDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Compensation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(Expr::col(Compensation::SalaryCents).gte(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_compensation_employee")
                    .table(Compensation::Table)
                    .col(Compensation::EmployeeId)
                    .col(Compensation::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Compensation::Table).to_owned())
            .await?;
        Ok(())
    }
}
