//! Decision logic behind a multi-calendar date and time picker.
//!
//! - `time`: timepoints, time range limiting and rounding, keyboard entry
//! - `date`: the calendar abstraction, Gregorian and Persian calendars, date
//!   range limiting
//!
//! Nothing here renders or localizes; a dialog layer asks the limiters and
//! the keyboard tree what the user may pick.

pub mod date;
pub mod error;
pub mod time;

pub use error::PickerError;

// Re-export time types
pub use time::{
    AmPm, AmPmKeys, DecodedTime, DefaultTimepointLimiter, EnteredZeros, LegalTimeTree, NodeId,
    Resolution, TimePickerConfig, Timepoint, TimepointLimiter, TimepointLimiterState, Token,
    TypedTime,
};

// Re-export date types
pub use date::{
    Calendar, CalendarDay, DatePickerConfig, DatePickerConfigState, DateRangeLimiter,
    DateRangeLimiterState, DefaultDateRangeLimiter, GregorianCalendar, PersianCalendar,
};
