use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Calibrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Calibrations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Calibrations::Timestamp)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Calibrations::HrThreshold)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Calibrations::MotionThreshold)
                            .double()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Calibrations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Calibrations {
    Table,
    Id,
    Timestamp,
    HrThreshold,
    MotionThreshold,
}
