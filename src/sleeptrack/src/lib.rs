#[macro_use]
extern crate log;

mod args;
pub use args::PipelineArgs;

mod tracker;
pub use tracker::{SleepTracker, unix_seconds};

pub mod sources;

pub mod replay;

mod status;
pub use status::StatusLine;
