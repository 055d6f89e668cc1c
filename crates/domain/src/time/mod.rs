//! Time of day: timepoints, picker configuration, range limiting and
//! keyboard entry

mod config;
mod keyboard;
mod limiter;
mod timepoint;

pub use config::TimePickerConfig;
pub use keyboard::{AmPmKeys, DecodedTime, EnteredZeros, LegalTimeTree, NodeId, Token, TypedTime};
pub use limiter::{DefaultTimepointLimiter, TimepointLimiter, TimepointLimiterState};
pub use timepoint::{AmPm, Resolution, Timepoint, SECONDS_PER_DAY};
