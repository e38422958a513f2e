#[macro_use]
extern crate log;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use sleeptrack::{
    PipelineArgs, SleepTracker,
    replay::replay,
    sources::{LineSource, SimulatedSource},
};
use sleeptrack_algos::{ClassificationPipeline, PipelineConfig, SleepReport};
use sleeptrack_codec::encode_record;
use sleeptrack_db::DatabaseHandler;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::watch,
};

type Transport = Box<dyn AsyncWrite + Unpin + Send>;
type Input = Box<dyn AsyncRead + Unpin + Send>;

#[derive(Parser)]
pub struct SleepTrackCli {
    #[arg(env, long, default_value = "sqlite://sleeptrack.db?mode=rwc")]
    pub database_url: String,
    #[clap(subcommand)]
    pub subcommand: SleepTrackCommand,
}

#[derive(Subcommand)]
pub enum SleepTrackCommand {
    ///
    /// Classify sleep stages live until interrupted
    /// Reads JSON sensor lines from `--input` ("-" for stdin), or simulates a wearer
    ///
    Track {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Where classification records are sent, stdout if omitted
        #[arg(long)]
        output: Option<PathBuf>,
        /// Seed for the simulated wearer
        #[arg(long)]
        seed: Option<u64>,
        /// Start from the last stored calibration instead of the initial thresholds
        #[arg(long)]
        resume_thresholds: bool,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    ///
    /// Replay a recorded sensor file on its own timestamps
    ///
    Replay {
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    ///
    /// Print the stage breakdown and a tip for one night
    ///
    Report {
        /// UTC date, latest recorded day if omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    ///
    /// Print a day's records in the wire format
    ///
    Export {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    ///
    /// List days with stored records
    ///
    Days,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenv() {
        println!("{}", error);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("sqlx::query", log::LevelFilter::Off)
        .filter_module("sea_orm_migration::migrator", log::LevelFilter::Off)
        .init();

    let cli = SleepTrackCli::parse();
    let db_handler = DatabaseHandler::new(cli.database_url).await;

    match cli.subcommand {
        SleepTrackCommand::Track {
            input,
            output,
            seed,
            resume_thresholds,
            pipeline,
        } => {
            let mut config = pipeline.into_config()?;
            if resume_thresholds {
                resume_from_calibration(&db_handler, &mut config).await?;
            }

            let accel_poll_interval = config.accel_poll_interval;
            let pipeline = ClassificationPipeline::new(config)?;
            let transport = open_output(output.as_deref()).await?;
            let mut tracker = SleepTracker::new(pipeline, transport, Some(db_handler));

            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            ctrlc::set_handler(move || {
                let _ = shutdown_tx.send(true);
            })?;

            match input {
                Some(path) => {
                    let source = LineSource::new(open_input(&path).await?);
                    tracker.run(source, shutdown_rx).await
                }
                None => {
                    let source = SimulatedSource::new(accel_poll_interval, seed);
                    tracker.run(source, shutdown_rx).await
                }
            }
        }
        SleepTrackCommand::Replay {
            input,
            output,
            pipeline,
        } => {
            let pipeline = ClassificationPipeline::new(pipeline.into_config()?)?;
            let transport = open_output(output.as_deref()).await?;
            let mut tracker = SleepTracker::new(pipeline, transport, Some(db_handler));
            let mut source = LineSource::new(open_input(&input).await?);

            let summary = replay(&mut tracker, &mut source).await?;
            if let Some(report) = tracker.history().report() {
                println!("{}", report);
            }
            debug!("{:?}", summary);
            Ok(())
        }
        SleepTrackCommand::Report { date } => {
            let Some(day) = pick_day(&db_handler, date).await? else {
                println!("No data yet!");
                return Ok(());
            };

            let records = db_handler.records_for_day(day).await?;
            match SleepReport::from_records(&records) {
                Some(report) => {
                    println!("{} ({} records)", day, report.total);
                    println!("{}", report);
                }
                None => println!("No data yet!"),
            }

            if let Some((_, thresholds)) = db_handler.latest_calibration().await? {
                println!(
                    "Thresholds: HR {:.1} Motion {:.3}",
                    thresholds.heart_rate, thresholds.motion
                );
            }
            Ok(())
        }
        SleepTrackCommand::Export { date } => {
            let Some(day) = pick_day(&db_handler, date).await? else {
                return Ok(());
            };

            for record in db_handler.records_for_day(day).await? {
                print!("{}", encode_record(&record)?);
            }
            Ok(())
        }
        SleepTrackCommand::Days => {
            for day in db_handler.recorded_days().await? {
                println!("{}", day);
            }
            Ok(())
        }
    }
}

async fn resume_from_calibration(
    db_handler: &DatabaseHandler,
    config: &mut PipelineConfig,
) -> anyhow::Result<()> {
    match db_handler.latest_calibration().await? {
        Some((timestamp, thresholds)) => {
            info!("Resuming thresholds calibrated at {}", timestamp);
            config.initial_hr_threshold = thresholds.heart_rate;
            config.initial_motion_threshold = thresholds.motion;
            config.validate()?;
        }
        None => warn!("No stored calibration, using initial thresholds"),
    }
    Ok(())
}

async fn pick_day(
    db_handler: &DatabaseHandler,
    date: Option<NaiveDate>,
) -> anyhow::Result<Option<NaiveDate>> {
    if date.is_some() {
        return Ok(date);
    }

    let latest = db_handler.latest_record().await?;
    Ok(latest.and_then(|record| record.day()))
}

async fn open_input(path: &Path) -> anyhow::Result<Input> {
    if path == Path::new("-") {
        return Ok(Box::new(tokio::io::stdin()));
    }

    let file = tokio::fs::File::open(path).await?;
    Ok(Box::new(file))
}

async fn open_output(path: Option<&Path>) -> anyhow::Result<Transport> {
    match path {
        Some(path) => Ok(Box::new(tokio::fs::File::create(path).await?)),
        None => Ok(Box::new(tokio::io::stdout())),
    }
}
