pub mod calibrations;
pub mod records;
