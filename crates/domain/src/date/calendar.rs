//! Calendar abstraction
//!
//! The date limiter works on any calendar system through the `Calendar` trait.
//! Every implementation maps its days onto the same linear `epoch_day` (days
//! since 0001-01-01 in the proleptic Gregorian calendar, counted the way
//! chrono's `num_days_from_ce` counts them), so ordering and distance never
//! depend on the calendar in use.
//!
//! Calendars keep raw field values: setting day 31 in a 30-day month is allowed
//! and stays visible until `clamp_day_of_month` is called.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PickerError;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// ============================================================================
// Calendar trait
// ============================================================================

/// A date in some calendar system, plus a time of day.
pub trait Calendar: Clone + fmt::Debug + Default {
    fn year(&self) -> i32;

    /// Month of the year, starting at 1.
    fn month(&self) -> u8;

    fn day_of_month(&self) -> u8;

    fn set_year(&mut self, year: i32);

    /// Clamped into `1..=months_in_year()`.
    fn set_month(&mut self, month: u8);

    /// Stored as given; may exceed the month's length until clamped.
    fn set_day_of_month(&mut self, day: u8);

    fn months_in_year(&self) -> u8;

    /// Length of the current month in the current year.
    fn actual_maximum_day_of_month(&self) -> u8;

    fn time_of_day(&self) -> NaiveTime;

    fn set_time_of_day(&mut self, time: NaiveTime);

    /// Linear day number; a day past the end of its month counts into the next.
    fn epoch_day(&self) -> i64;

    /// Moves to the given linear day, keeping the time of day.
    fn set_epoch_day(&mut self, day: i64);

    fn day_of_week(&self) -> Weekday {
        // Epoch day 1 was a Monday.
        WEEK[(self.epoch_day() - 1).rem_euclid(7) as usize]
    }

    fn trim_to_midnight(&mut self) {
        self.set_time_of_day(NaiveTime::MIN);
    }

    fn add_days(&mut self, days: i64) {
        let day = self.epoch_day();
        self.set_epoch_day(day + days);
    }

    /// Pulls the day of month back inside the current month.
    fn clamp_day_of_month(&mut self) {
        let max = self.actual_maximum_day_of_month();
        let day = self.day_of_month().clamp(1, max);
        if day != self.day_of_month() {
            self.set_day_of_month(day);
        }
    }

    fn set_date(&mut self, year: i32, month: u8, day: u8) {
        self.set_year(year);
        self.set_month(month);
        self.set_day_of_month(day);
    }

    fn calendar_day(&self) -> CalendarDay {
        CalendarDay {
            year: self.year(),
            month: self.month(),
            day: self.day_of_month(),
        }
    }
}

// ============================================================================
// CalendarDay
// ============================================================================

/// Calendar-neutral year/month/day triple, used in persisted limiter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDay {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl CalendarDay {
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// The day at midnight in calendar `C`.
    ///
    /// # Errors
    ///
    /// Returns `PickerError::Validation` if the day does not exist in `C`.
    pub fn to_calendar<C: Calendar>(&self) -> Result<C, PickerError> {
        let mut calendar = C::default();
        calendar.set_year(self.year);
        if calendar.year() != self.year {
            return Err(PickerError::validation(format!(
                "Year {} is outside the supported range of the calendar",
                self.year
            )));
        }
        if self.month == 0 || self.month > calendar.months_in_year() {
            return Err(PickerError::validation(format!(
                "Month {} does not exist in {}",
                self.month, self
            )));
        }
        calendar.set_month(self.month);
        calendar.set_day_of_month(1);
        if self.day == 0 || self.day > calendar.actual_maximum_day_of_month() {
            return Err(PickerError::validation(format!("{} does not exist", self)));
        }
        calendar.set_day_of_month(self.day);
        calendar.trim_to_midnight();
        Ok(calendar)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

// ============================================================================
// GregorianCalendar
// ============================================================================

/// Proleptic Gregorian calendar backed by chrono.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GregorianCalendar {
    year: i32,
    month: u8,
    day: u8,
    time: NaiveTime,
}

impl Default for GregorianCalendar {
    /// 1970-01-01 at midnight.
    fn default() -> Self {
        Self {
            year: 1970,
            month: 1,
            day: 1,
            time: NaiveTime::MIN,
        }
    }
}

impl GregorianCalendar {
    /// # Errors
    ///
    /// Returns `PickerError::Validation` if the date does not exist.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, PickerError> {
        NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day))
            .map(Self::from_date)
            .ok_or_else(|| {
                PickerError::validation(format!(
                    "{} is not a Gregorian date",
                    CalendarDay::new(year, month, day)
                ))
            })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month() as u8,
            day: date.day() as u8,
            time: NaiveTime::MIN,
        }
    }

    /// The chrono date, if the current fields name an existing day.
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day))
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = time;
        self
    }

    fn first_of_month(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), 1).unwrap_or(if self.year < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
    }
}

impl Calendar for GregorianCalendar {
    fn year(&self) -> i32 {
        self.year
    }

    fn month(&self) -> u8 {
        self.month
    }

    fn day_of_month(&self) -> u8 {
        self.day
    }

    fn set_year(&mut self, year: i32) {
        self.year = year.clamp(NaiveDate::MIN.year() + 1, NaiveDate::MAX.year() - 1);
    }

    fn set_month(&mut self, month: u8) {
        self.month = month.clamp(1, 12);
    }

    fn set_day_of_month(&mut self, day: u8) {
        self.day = day;
    }

    fn months_in_year(&self) -> u8 {
        12
    }

    fn actual_maximum_day_of_month(&self) -> u8 {
        match self.month {
            4 | 6 | 9 | 11 => 30,
            2 if NaiveDate::from_ymd_opt(self.year, 2, 29).is_some() => 29,
            2 => 28,
            _ => 31,
        }
    }

    fn time_of_day(&self) -> NaiveTime {
        self.time
    }

    fn set_time_of_day(&mut self, time: NaiveTime) {
        self.time = time;
    }

    fn epoch_day(&self) -> i64 {
        i64::from(self.first_of_month().num_days_from_ce()) + i64::from(self.day) - 1
    }

    fn set_epoch_day(&mut self, day: i64) {
        let date = i32::try_from(day)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .unwrap_or(if day < 0 {
                NaiveDate::MIN
            } else {
                NaiveDate::MAX
            });
        let time = self.time;
        *self = Self::from_date(date).with_time(time);
    }
}
