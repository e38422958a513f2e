use anyhow::Context as _;
use chrono::Utc;
use sleeptrack_algos::{
    Admission, ClassificationPipeline, SleepHistory, TickOutcome,
};
use sleeptrack_codec::encode_record;
use sleeptrack_db::DatabaseHandler;
use sleeptrack_types::{ClassificationRecord, SensorEvent, Thresholds};
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::watch,
    time::{Instant, MissedTickBehavior, interval, interval_at},
};

use crate::{StatusLine, sources::SensorSource};

/// Unix milliseconds to whole seconds, rounded to the nearest second.
pub fn unix_seconds(millis: i64) -> i64 {
    millis.saturating_add(500).div_euclid(1000)
}

/// Drives a [`ClassificationPipeline`] and hands its records to the
/// collaborators: the in-memory history, the line transport and the daily log.
pub struct SleepTracker<W> {
    pipeline: ClassificationPipeline,
    history: SleepHistory,
    transport: W,
    database: Option<DatabaseHandler>,
    pending: Vec<ClassificationRecord>,
}

impl<W> SleepTracker<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(
        pipeline: ClassificationPipeline,
        transport: W,
        database: Option<DatabaseHandler>,
    ) -> Self {
        let history = SleepHistory::new(pipeline.config().history_capacity);
        Self {
            pipeline,
            history,
            transport,
            database,
            pending: Vec::new(),
        }
    }

    pub fn pipeline(&self) -> &ClassificationPipeline {
        &self.pipeline
    }

    pub fn history(&self) -> &SleepHistory {
        &self.history
    }

    pub fn pending(&self) -> &[ClassificationRecord] {
        &self.pending
    }

    pub fn on_event(&mut self, event: SensorEvent) {
        match event {
            SensorEvent::HeartRate(sample) => {
                if self.pipeline.on_heart_rate(sample) == Admission::Rejected {
                    trace!(
                        "Dropped heart rate {} bpm at confidence {}",
                        sample.bpm, sample.confidence
                    );
                }
            }
            SensorEvent::Accel(sample) => {
                if self.pipeline.on_acceleration(sample).is_none() {
                    trace!("Dropped non-finite acceleration {:?}", sample);
                }
            }
        }
    }

    pub async fn on_tick(&mut self, timestamp: i64) -> TickOutcome {
        let outcome = self.pipeline.tick(timestamp);
        debug!("{}", StatusLine::new(&self.pipeline, &outcome));

        if outcome.provisional {
            return outcome;
        }

        let record = outcome.record;
        self.history.push(record);
        if let Err(error) = self.transmit(&record).await {
            warn!("Failed to send record: {}", error);
        }

        self.pending.push(record);
        let capacity = self.history.capacity();
        if self.pending.len() > capacity {
            let overflow = self.pending.len() - capacity;
            warn!("Daily log backlog full, dropping {} records", overflow);
            self.pending.drain(..overflow);
        }

        outcome
    }

    pub async fn on_calibrate(&mut self, timestamp: i64) -> Thresholds {
        let thresholds = self.pipeline.calibrate();
        info!(
            "Recalibrated thresholds: heart rate {:.2}, motion {:.4}",
            thresholds.heart_rate, thresholds.motion
        );

        if let Some(db) = &self.database {
            if let Err(error) = db.create_calibration(timestamp, thresholds).await {
                error!("Failed to store calibration: {}", error);
            }
        }

        self.flush().await;
        thresholds
    }

    /// Writes queued records to the daily log. On failure they stay queued.
    pub async fn flush(&mut self) {
        let Some(db) = &self.database else {
            self.pending.clear();
            return;
        };

        if self.pending.is_empty() {
            return;
        }

        match db.create_records(self.pending.clone()).await {
            Ok(()) => {
                debug!("Stored {} records", self.pending.len());
                self.pending.clear();
            }
            Err(error) => error!("Failed to store records: {}", error),
        }
    }

    async fn transmit(&mut self, record: &ClassificationRecord) -> anyhow::Result<()> {
        let line = encode_record(record)?;
        self.transport
            .write_all(line.as_bytes())
            .await
            .context("Writing record")?;
        self.transport.flush().await?;
        Ok(())
    }

    /// Serves the classification tick, the calibration tick and sensor events
    /// from one task until `shutdown` fires, so no two handlers ever overlap.
    /// When several are ready at once they run in that order.
    ///
    /// A failing or finished sensor stream only stops event intake; ticks keep
    /// emitting from the last smoothed values and queued records are still
    /// flushed on shutdown.
    pub async fn run<S>(
        &mut self,
        mut source: S,
        mut shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<()>
    where
        S: SensorSource,
    {
        let config = self.pipeline.config().clone();

        let mut ticks = interval(config.tick_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let first_calibration = if config.calibrate_on_start {
            Instant::now()
        } else {
            Instant::now() + config.calibration_interval
        };
        let mut calibrations = interval_at(first_calibration, config.calibration_interval);
        calibrations.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut source_open = true;
        info!("Tracking started");

        loop {
            tokio::select! {
                biased;

                _ = ticks.tick() => {
                    self.on_tick(unix_seconds(Utc::now().timestamp_millis())).await;
                }
                _ = calibrations.tick() => {
                    self.on_calibrate(Utc::now().timestamp()).await;
                }
                event = source.next_event(), if source_open => {
                    match event {
                        Ok(Some(event)) => self.on_event(event),
                        Ok(None) => {
                            info!("Sensor stream ended");
                            source_open = false;
                        }
                        Err(error) => {
                            error!("Sensor stream failed: {:#}", error);
                            source_open = false;
                        }
                    }
                }
                _ = shutdown.changed() => break,
            }
        }

        info!("Tracking stopped, {} records in history", self.history.len());
        self.flush().await;
        Ok(())
    }
}
