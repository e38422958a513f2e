//! Offline replay of a recorded sensor stream on a virtual clock.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::{SleepTracker, sources::LineSource, unix_seconds};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub skipped: usize,
    pub ticks: usize,
    pub records: usize,
    pub calibrations: usize,
}

/// Deadlines are Unix milliseconds; `None` once the next one would overflow.
#[derive(Debug, Clone, Copy)]
struct VirtualClock {
    now: i64,
    next_tick: Option<i64>,
    next_calibration: Option<i64>,
    tick_ms: i64,
    calibration_ms: i64,
}

enum Due {
    Tick(i64),
    Calibration(i64),
}

/// Whole milliseconds of a scheduling interval, at least one.
fn interval_millis(name: &str, interval: Duration) -> anyhow::Result<i64> {
    match i64::try_from(interval.as_millis()) {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => anyhow::bail!("{} interval {:?} cannot drive the replay clock", name, interval),
    }
}

impl VirtualClock {
    fn start(at: i64, tick_ms: i64, calibration_ms: i64, calibrate_on_start: bool) -> Self {
        Self {
            now: at,
            next_tick: Some(at),
            next_calibration: if calibrate_on_start {
                Some(at)
            } else {
                at.checked_add(calibration_ms)
            },
            tick_ms,
            calibration_ms,
        }
    }

    /// Next deadline at or before `until`. Ticks win ties.
    fn pop_due(&mut self, until: i64) -> Option<Due> {
        let tick = self.next_tick.filter(|at| *at <= until);
        let calibration = self.next_calibration.filter(|at| *at <= until);

        match (tick, calibration) {
            (Some(at), calibration) if calibration.is_none_or(|c| at <= c) => {
                self.next_tick = at.checked_add(self.tick_ms);
                Some(Due::Tick(at))
            }
            (_, Some(at)) => {
                self.next_calibration = at.checked_add(self.calibration_ms);
                Some(Due::Calibration(at))
            }
            _ => None,
        }
    }
}

/// Feeds every event of `source` through `tracker`, running the ticks and
/// calibrations that fall due between events in timestamp order.
///
/// The clock starts at the first timestamped event. Untimed events reuse the
/// last known time; timestamps that go backwards do not rewind the clock.
pub async fn replay<W, R>(
    tracker: &mut SleepTracker<W>,
    source: &mut LineSource<R>,
) -> anyhow::Result<ReplaySummary>
where
    W: AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
{
    let config = tracker.pipeline().config().clone();
    let tick_ms = interval_millis("tick", config.tick_interval)?;
    let calibration_ms = interval_millis("calibration", config.calibration_interval)?;
    let mut clock: Option<VirtualClock> = None;
    let mut summary = ReplaySummary::default();

    while let Some(timed) = source.next_timed().await? {
        if let Some(time) = timed.time_ms {
            let clock = clock.get_or_insert_with(|| {
                VirtualClock::start(time, tick_ms, calibration_ms, config.calibrate_on_start)
            });

            if time < clock.now {
                debug!("Event at {} ms is older than the clock, replaying at {}", time, clock.now);
            }
            clock.now = clock.now.max(time);

            while let Some(due) = clock.pop_due(clock.now) {
                match due {
                    Due::Tick(at) => {
                        summary.ticks += 1;
                        if !tracker.on_tick(unix_seconds(at)).await.provisional {
                            summary.records += 1;
                        }
                    }
                    Due::Calibration(at) => {
                        summary.calibrations += 1;
                        tracker.on_calibrate(unix_seconds(at)).await;
                    }
                }
            }
        }

        summary.events += 1;
        tracker.on_event(timed.event);
    }

    tracker.flush().await;
    summary.skipped = source.skipped();
    info!(
        "Replayed {} events: {} ticks, {} records, {} calibrations, {} skipped lines",
        summary.events, summary.ticks, summary.records, summary.calibrations, summary.skipped
    );
    Ok(summary)
}
