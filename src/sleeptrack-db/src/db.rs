use anyhow::anyhow;
use sea_orm::{
    ActiveValue::NotSet, ConnectOptions, Database, DatabaseConnection, EntityTrait, Set,
};
use sleeptrack_entities::sleep_records;
use sleeptrack_migration::{Migrator, MigratorTrait, OnConflict};
use sleeptrack_types::ClassificationRecord;

#[derive(Clone)]
pub struct DatabaseHandler {
    pub(crate) db: DatabaseConnection,
}

impl DatabaseHandler {
    /// Rows per INSERT, keeps the bound parameter count well under SQLite's limit.
    const INSERT_CHUNK: usize = 500;

    pub async fn new<C>(path: C) -> Self
    where
        C: Into<ConnectOptions>,
    {
        let db = Database::connect(path)
            .await
            .expect("Unable to connect to db");

        Migrator::up(&db, None)
            .await
            .expect("Error running migrations");

        Self { db }
    }

    /// Upserts records keyed by timestamp into the daily log.
    pub async fn create_records(&self, records: Vec<ClassificationRecord>) -> anyhow::Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let payloads = records
            .into_iter()
            .map(record_to_model)
            .collect::<anyhow::Result<Vec<_>>>()?;

        for chunk in payloads.chunks(Self::INSERT_CHUNK) {
            sleep_records::Entity::insert_many(chunk.to_vec())
                .on_conflict(
                    OnConflict::column(sleep_records::Column::Timestamp)
                        .update_columns([
                            sleep_records::Column::Day,
                            sleep_records::Column::HeartRate,
                            sleep_records::Column::Motion,
                            sleep_records::Column::Stage,
                        ])
                        .to_owned(),
                )
                .exec(&self.db)
                .await?;
        }

        Ok(())
    }
}

fn record_to_model(record: ClassificationRecord) -> anyhow::Result<sleep_records::ActiveModel> {
    let day = record
        .day()
        .ok_or_else(|| anyhow!("Timestamp out of range: {}", record.timestamp))?;

    Ok(sleep_records::ActiveModel {
        id: NotSet,
        timestamp: Set(record.timestamp),
        day: Set(day),
        heart_rate: Set(record.heart_rate),
        motion: Set(record.motion),
        stage: Set(record.stage.into()),
    })
}
