use sea_orm::{ActiveValue::NotSet, EntityTrait, QueryOrder, Set};
use sleeptrack_entities::calibrations;
use sleeptrack_migration::OnConflict;
use sleeptrack_types::Thresholds;

use crate::DatabaseHandler;

impl DatabaseHandler {
    pub async fn create_calibration(
        &self,
        timestamp: i64,
        thresholds: Thresholds,
    ) -> anyhow::Result<()> {
        let model = calibrations::ActiveModel {
            id: NotSet,
            timestamp: Set(timestamp),
            hr_threshold: Set(thresholds.heart_rate),
            motion_threshold: Set(thresholds.motion),
        };

        calibrations::Entity::insert(model)
            .on_conflict(
                OnConflict::column(calibrations::Column::Timestamp)
                    .update_columns([
                        calibrations::Column::HrThreshold,
                        calibrations::Column::MotionThreshold,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    /// Most recent thresholds together with the time they were computed.
    pub async fn latest_calibration(&self) -> anyhow::Result<Option<(i64, Thresholds)>> {
        let calibration = calibrations::Entity::find()
            .order_by_desc(calibrations::Column::Timestamp)
            .one(&self.db)
            .await?
            .map(|model| {
                (
                    model.timestamp,
                    Thresholds::new(model.hr_threshold, model.motion_threshold),
                )
            });

        Ok(calibration)
    }
}
