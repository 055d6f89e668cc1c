//! Solar Hijri (Persian) calendar
//!
//! Leap years follow the 33-year cycles between the break years below, which
//! track the arithmetic of the official calendar for years -61 to 3177.
//! Months 1-6 have 31 days, months 7-11 have 30 and Esfand has 29, or 30 in a
//! leap year.

use chrono::{Datelike, NaiveDate, NaiveTime};

use super::calendar::{Calendar, CalendarDay};
use crate::error::PickerError;

const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// Facts about one Persian year.
struct YearInfo {
    /// Years since the last leap year; 0 means this year is leap.
    leap: i32,
    /// Gregorian year in which the Persian year begins.
    gregorian_year: i32,
    /// Day of March on which Farvardin 1 falls.
    march_day: i32,
}

fn year_info(year: i32) -> YearInfo {
    let gregorian_year = year + 621;
    let mut leap_persian = -14;
    let mut previous_break = BREAKS[0];
    let mut jump = 0;
    for &next_break in &BREAKS[1..] {
        jump = next_break - previous_break;
        if year < next_break {
            break;
        }
        leap_persian += jump / 33 * 8 + jump % 33 / 4;
        previous_break = next_break;
    }

    let mut n = year - previous_break;
    leap_persian += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_persian += 1;
    }
    let leap_gregorian = gregorian_year / 4 - (gregorian_year / 100 + 1) * 3 / 4 - 150;
    let march_day = 20 + leap_persian - leap_gregorian;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    YearInfo {
        leap,
        gregorian_year,
        march_day,
    }
}

fn gregorian_epoch_day(year: i32, month: u32, day: u32) -> i64 {
    NaiveDate::from_ymd_opt(year, month, day).map_or(0, |date| i64::from(date.num_days_from_ce()))
}

/// Epoch day of Farvardin 1.
fn new_year_epoch_day(info: &YearInfo) -> i64 {
    gregorian_epoch_day(info.gregorian_year, 3, info.march_day as u32)
}

fn to_epoch_day(year: i32, month: u8, day: u8) -> i64 {
    let month = i64::from(month);
    new_year_epoch_day(&year_info(year)) + (month - 1) * 31 - month / 7 * (month - 7)
        + i64::from(day)
        - 1
}

fn from_epoch_day(epoch_day: i64) -> (i32, u8, u8) {
    let gregorian_year = i32::try_from(epoch_day)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .map_or(PersianCalendar::MIN_YEAR + 621, |date| date.year());
    let mut year = gregorian_year - 621;
    let info = year_info(year);
    let mut k = epoch_day - new_year_epoch_day(&info);

    if k >= 0 {
        if k <= 185 {
            return (year, (1 + k / 31) as u8, (k % 31 + 1) as u8);
        }
        k -= 186;
    } else {
        year -= 1;
        k += 179;
        if info.leap == 1 {
            k += 1;
        }
    }
    (year, (7 + k / 30) as u8, (k % 30 + 1) as u8)
}

/// Solar Hijri calendar with a time of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersianCalendar {
    year: i32,
    month: u8,
    day: u8,
    time: NaiveTime,
}

impl Default for PersianCalendar {
    /// 1348/10/11 (1970-01-01) at midnight.
    fn default() -> Self {
        Self {
            year: 1348,
            month: 10,
            day: 11,
            time: NaiveTime::MIN,
        }
    }
}

impl PersianCalendar {
    pub const MIN_YEAR: i32 = BREAKS[0];
    pub const MAX_YEAR: i32 = BREAKS[BREAKS.len() - 1] - 1;

    /// # Errors
    ///
    /// Returns `PickerError::Validation` if the date does not exist or its year
    /// is outside `MIN_YEAR..=MAX_YEAR`.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, PickerError> {
        CalendarDay::new(year, month, day).to_calendar()
    }

    pub fn from_gregorian(date: NaiveDate) -> Self {
        let mut calendar = Self::default();
        calendar.set_epoch_day(i64::from(date.num_days_from_ce()));
        calendar
    }

    pub fn to_gregorian(&self) -> Option<NaiveDate> {
        i32::try_from(self.epoch_day())
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
    }

    pub fn is_leap_year(year: i32) -> bool {
        year_info(year).leap == 0
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = time;
        self
    }
}

impl Calendar for PersianCalendar {
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
        self.year = year.clamp(Self::MIN_YEAR, Self::MAX_YEAR);
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
            1..=6 => 31,
            7..=11 => 30,
            _ if Self::is_leap_year(self.year) => 30,
            _ => 29,
        }
    }

    fn time_of_day(&self) -> NaiveTime {
        self.time
    }

    fn set_time_of_day(&mut self, time: NaiveTime) {
        self.time = time;
    }

    fn epoch_day(&self) -> i64 {
        to_epoch_day(self.year, self.month, self.day)
    }

    fn set_epoch_day(&mut self, day: i64) {
        let first = to_epoch_day(Self::MIN_YEAR, 1, 1);
        let last = to_epoch_day(Self::MAX_YEAR, 12, 29);
        let (year, month, day) = from_epoch_day(day.clamp(first, last));
        self.year = year;
        self.month = month;
        self.day = day;
    }
}
