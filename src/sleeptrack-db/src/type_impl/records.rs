use chrono::NaiveDate;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use sleeptrack_entities::sleep_records;
use sleeptrack_types::{ClassificationRecord, Stage};

use crate::DatabaseHandler;

#[derive(Default, Debug)]
pub struct SearchRecords {
    /// Inclusive lower bound, Unix seconds.
    pub from: Option<i64>,
    /// Exclusive upper bound, Unix seconds.
    pub to: Option<i64>,
    pub limit: Option<u64>,
}

impl SearchRecords {
    pub(crate) fn conditions(self) -> Condition {
        Condition::all()
            .add_option(self.from.map(|from| sleep_records::Column::Timestamp.gte(from)))
            .add_option(self.to.map(|to| sleep_records::Column::Timestamp.lt(to)))
    }
}

impl DatabaseHandler {
    pub async fn search_records(
        &self,
        options: SearchRecords,
    ) -> anyhow::Result<Vec<ClassificationRecord>> {
        let limit = options.limit;
        sleep_records::Entity::find()
            .filter(options.conditions())
            .limit(limit)
            .order_by_asc(sleep_records::Column::Timestamp)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::parse_record)
            .collect()
    }

    /// The daily log: every record whose UTC date is `day`.
    pub async fn records_for_day(&self, day: NaiveDate) -> anyhow::Result<Vec<ClassificationRecord>> {
        sleep_records::Entity::find()
            .filter(sleep_records::Column::Day.eq(day))
            .order_by_asc(sleep_records::Column::Timestamp)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::parse_record)
            .collect()
    }

    pub async fn recorded_days(&self) -> anyhow::Result<Vec<NaiveDate>> {
        let days = sleep_records::Entity::find()
            .select_only()
            .column(sleep_records::Column::Day)
            .distinct()
            .order_by_asc(sleep_records::Column::Day)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(days)
    }

    pub async fn latest_record(&self) -> anyhow::Result<Option<ClassificationRecord>> {
        sleep_records::Entity::find()
            .order_by_desc(sleep_records::Column::Timestamp)
            .one(&self.db)
            .await?
            .map(Self::parse_record)
            .transpose()
    }

    fn parse_record(model: sleep_records::Model) -> anyhow::Result<ClassificationRecord> {
        let stage = Stage::try_from(model.stage)?;
        Ok(ClassificationRecord {
            timestamp: model.timestamp,
            heart_rate: model.heart_rate,
            motion: model.motion,
            stage,
        })
    }
}
