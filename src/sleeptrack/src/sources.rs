use std::{f64::consts::TAU, time::Duration};

use rand::{Rng, SeedableRng, rngs::StdRng};
use sleeptrack_codec::{LineDecoder, TimedEvent, decode_event};
use sleeptrack_types::{AccelSample, HeartRateSample, SensorEvent, Stage};
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    time::{Instant, Interval, MissedTickBehavior, interval},
};

/// Asynchronous stream of sensor events.
///
/// `next_event` is polled inside `tokio::select!` and must be cancel safe:
/// dropping the future before it completes may not lose an event.
#[allow(async_fn_in_trait)]
pub trait SensorSource {
    /// `Ok(None)` once the stream has ended.
    async fn next_event(&mut self) -> anyhow::Result<Option<SensorEvent>>;
}

/// Newline-delimited JSON sensor events read from any byte stream.
pub struct LineSource<R> {
    reader: R,
    decoder: LineDecoder,
    buffer: Vec<u8>,
    eof: bool,
    skipped: usize,
}

impl<R> LineSource<R>
where
    R: AsyncRead + Unpin,
{
    const READ_SIZE: usize = 1024;

    pub fn new(reader: R) -> Self {
        Self {
            reader,
            decoder: LineDecoder::new(),
            buffer: vec![0; Self::READ_SIZE],
            eof: false,
            skipped: 0,
        }
    }

    /// Lines that could not be decoded so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub async fn next_timed(&mut self) -> anyhow::Result<Option<TimedEvent>> {
        loop {
            let line = if self.eof {
                self.decoder.finish()
            } else {
                self.decoder.next_line()
            };

            match line {
                Some(Ok(line)) => match decode_event(&line) {
                    Ok(event) => return Ok(Some(event)),
                    Err(error) => {
                        self.skipped += 1;
                        warn!("Skipping sensor line {:?}: {}", line, error);
                    }
                },
                Some(Err(error)) => {
                    self.skipped += 1;
                    warn!("Skipping sensor input: {}", error);
                }
                None if self.eof => return Ok(None),
                None => {
                    let read = self.reader.read(&mut self.buffer).await?;
                    if read == 0 {
                        self.eof = true;
                    } else {
                        self.decoder.push(&self.buffer[..read]);
                    }
                }
            }
        }
    }
}

impl<R> SensorSource for LineSource<R>
where
    R: AsyncRead + Unpin,
{
    async fn next_event(&mut self) -> anyhow::Result<Option<SensorEvent>> {
        Ok(self.next_timed().await?.map(|timed| timed.event))
    }
}

/// Synthetic wearer cycling through the sleep stages, for demos and soak runs.
pub struct SimulatedSource {
    rng: StdRng,
    accel: Interval,
    heart: Interval,
    started: Instant,
}

#[derive(Debug, Clone, Copy)]
struct Physiology {
    bpm: f64,
    bpm_jitter: f64,
    movement: f64,
}

impl SimulatedSource {
    const HEART_RATE_INTERVAL: Duration = Duration::from_secs(1);
    const STAGE_LENGTH: Duration = Duration::from_secs(10 * 60);
    const NIGHT: [Stage; 6] = [
        Stage::Awake,
        Stage::Light,
        Stage::Deep,
        Stage::Light,
        Stage::Rem,
        Stage::Light,
    ];

    pub fn new(accel_poll_interval: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut accel = interval(accel_poll_interval);
        accel.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut heart = interval(Self::HEART_RATE_INTERVAL);
        heart.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            rng,
            accel,
            heart,
            started: Instant::now(),
        }
    }

    fn current_stage(&self) -> Stage {
        let segment = self.started.elapsed().as_secs() / Self::STAGE_LENGTH.as_secs();
        Self::NIGHT[segment as usize % Self::NIGHT.len()]
    }

    fn physiology(stage: Stage) -> Physiology {
        match stage {
            Stage::Awake => Physiology {
                bpm: 72.0,
                bpm_jitter: 6.0,
                movement: 0.6,
            },
            Stage::Light => Physiology {
                bpm: 60.0,
                bpm_jitter: 3.0,
                movement: 0.08,
            },
            Stage::Rem => Physiology {
                bpm: 64.0,
                bpm_jitter: 5.0,
                movement: 0.02,
            },
            Stage::Deep => Physiology {
                bpm: 52.0,
                bpm_jitter: 1.5,
                movement: 0.01,
            },
        }
    }

    fn heart_rate_sample(&mut self) -> HeartRateSample {
        let body = Self::physiology(self.current_stage());
        let bpm = body.bpm + self.rng.random_range(-body.bpm_jitter..=body.bpm_jitter);
        let confidence = self.rng.random_range(30..=100);
        HeartRateSample::new(bpm, confidence)
    }

    fn accel_sample(&mut self) -> AccelSample {
        let body = Self::physiology(self.current_stage());
        // Wrist resting mostly face up, tilted around the x axis.
        let tilt = self.rng.random_range(0.0..TAU) * body.movement;
        let jolt = self.rng.random_range(0.0..=body.movement);
        let scale = 1.0 + jolt;
        AccelSample::new(
            self.rng.random_range(-body.movement..=body.movement),
            tilt.sin() * scale,
            tilt.cos() * scale,
        )
    }
}

impl SensorSource for SimulatedSource {
    async fn next_event(&mut self) -> anyhow::Result<Option<SensorEvent>> {
        tokio::select! {
            _ = self.heart.tick() => Ok(Some(self.heart_rate_sample().into())),
            _ = self.accel.tick() => Ok(Some(self.accel_sample().into())),
        }
    }
}
