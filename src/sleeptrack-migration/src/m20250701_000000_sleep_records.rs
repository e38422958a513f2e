use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SleepRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SleepRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SleepRecords::Timestamp)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SleepRecords::Day).date().not_null())
                    .col(ColumnDef::new(SleepRecords::HeartRate).double().not_null())
                    .col(ColumnDef::new(SleepRecords::Motion).double().not_null())
                    .col(
                        ColumnDef::new(SleepRecords::Stage)
                            .small_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sleep_records_day")
                    .table(SleepRecords::Table)
                    .col(SleepRecords::Day)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SleepRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum SleepRecords {
    Table,
    Id,
    Timestamp,
    Day,
    HeartRate,
    Motion,
    Stage,
}
