//! Calendar dates: the calendar abstraction, the calendars shipped with the
//! picker and date range limiting

mod calendar;
mod config;
mod limiter;
mod persian;

pub use calendar::{Calendar, CalendarDay, GregorianCalendar};
pub use config::{DatePickerConfig, DatePickerConfigState};
pub use limiter::{
    DateRangeLimiter, DateRangeLimiterState, DefaultDateRangeLimiter, DEFAULT_END_YEAR,
    DEFAULT_START_YEAR,
};
pub use persian::PersianCalendar;
