//! Date range resolution
//!
//! `DateRangeLimiter` tells the date picker which days it may show as
//! selectable and where to move a day that is not. `DefaultDateRangeLimiter`
//! supports a year range, min/max dates, a selectable whitelist and a disabled
//! blacklist over any `Calendar`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::calendar::{Calendar, CalendarDay};
use crate::error::PickerError;

pub const DEFAULT_START_YEAR: i32 = 1900;
pub const DEFAULT_END_YEAR: i32 = 2100;

/// Decides which days a date picker may select.
pub trait DateRangeLimiter<C: Calendar>: fmt::Debug {
    /// First year the picker shows.
    fn min_year(&self) -> i32;

    /// Last year the picker shows.
    fn max_year(&self) -> i32;

    /// Earliest day the picker shows, at midnight.
    fn start_date(&self) -> C;

    /// Latest day the picker shows, at midnight.
    fn end_date(&self) -> C;

    /// Whether the given day may not be selected. Days that do not exist in
    /// the month are out of range.
    fn is_out_of_range(&self, year: i32, month: u8, day: u8) -> bool;

    /// Returns the selectable day nearest to `calendar`, at midnight.
    fn set_to_nearest_date(&self, calendar: C) -> C;
}

// ============================================================================
// Persisted state
// ============================================================================

/// Serializable snapshot of a `DefaultDateRangeLimiter`, independent of the
/// calendar it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeLimiterState {
    pub min_year: i32,
    pub max_year: i32,
    #[serde(default)]
    pub min_date: Option<CalendarDay>,
    #[serde(default)]
    pub max_date: Option<CalendarDay>,
    #[serde(default)]
    pub selectable_days: Vec<CalendarDay>,
    #[serde(default)]
    pub disabled_days: Vec<CalendarDay>,
}

impl Default for DateRangeLimiterState {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_START_YEAR,
            max_year: DEFAULT_END_YEAR,
            min_date: None,
            max_date: None,
            selectable_days: Vec::new(),
            disabled_days: Vec::new(),
        }
    }
}

// ============================================================================
// DefaultDateRangeLimiter
// ============================================================================

/// Limits selection by year range, min/max dates, selectable and disabled days.
///
/// Precedence: a disabled day is always out of range; otherwise, when
/// selectable days are set, only those are in range; otherwise the year range
/// and min/max dates decide. Stored days are clamped into their month and
/// trimmed to midnight, and keyed by epoch day.
#[derive(Debug, Clone)]
pub struct DefaultDateRangeLimiter<C: Calendar> {
    min_year: i32,
    max_year: i32,
    min_date: Option<C>,
    max_date: Option<C>,
    selectable_days: BTreeMap<i64, C>,
    disabled_days: BTreeMap<i64, C>,
}

impl<C: Calendar> Default for DefaultDateRangeLimiter<C> {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_START_YEAR,
            max_year: DEFAULT_END_YEAR,
            min_date: None,
            max_date: None,
            selectable_days: BTreeMap::new(),
            disabled_days: BTreeMap::new(),
        }
    }
}

impl<C: Calendar> DefaultDateRangeLimiter<C> {
    pub fn new() -> Self {
        Self::default()
    }

    // Configuration

    /// # Errors
    ///
    /// Returns `PickerError::InvalidRange` if `start_year > end_year`.
    pub fn set_year_range(&mut self, start_year: i32, end_year: i32) -> Result<(), PickerError> {
        if start_year > end_year {
            return Err(PickerError::invalid_range(format!(
                "start year {} is after end year {}",
                start_year, end_year
            )));
        }
        self.min_year = start_year;
        self.max_year = end_year;
        tracing::debug!(start_year, end_year, "Set year range");
        Ok(())
    }

    /// Sets the earliest selectable day.
    ///
    /// # Errors
    ///
    /// Returns `PickerError::InvalidRange` if the day is after the current
    /// maximum date.
    pub fn set_min_date(&mut self, min_date: C) -> Result<(), PickerError> {
        let min_date = normalize(min_date);
        if let Some(max_date) = &self.max_date {
            if min_date.epoch_day() > max_date.epoch_day() {
                return Err(PickerError::invalid_range(format!(
                    "minimum date {} is after maximum date {}",
                    min_date.calendar_day(),
                    max_date.calendar_day()
                )));
            }
        }
        tracing::debug!(min_date = %min_date.calendar_day(), "Set minimum date");
        self.min_date = Some(min_date);
        Ok(())
    }

    /// Sets the latest selectable day.
    ///
    /// # Errors
    ///
    /// Returns `PickerError::InvalidRange` if the day is before the current
    /// minimum date.
    pub fn set_max_date(&mut self, max_date: C) -> Result<(), PickerError> {
        let max_date = normalize(max_date);
        if let Some(min_date) = &self.min_date {
            if max_date.epoch_day() < min_date.epoch_day() {
                return Err(PickerError::invalid_range(format!(
                    "maximum date {} is before minimum date {}",
                    max_date.calendar_day(),
                    min_date.calendar_day()
                )));
            }
        }
        tracing::debug!(max_date = %max_date.calendar_day(), "Set maximum date");
        self.max_date = Some(max_date);
        Ok(())
    }

    pub fn clear_min_date(&mut self) {
        self.min_date = None;
    }

    pub fn clear_max_date(&mut self) {
        self.max_date = None;
    }

    /// Replaces the set of the only days that may be selected.
    pub fn set_selectable_days(&mut self, days: impl IntoIterator<Item = C>) {
        self.selectable_days = index_days(days);
        tracing::debug!(count = self.selectable_days.len(), "Replaced selectable days");
    }

    /// Replaces the set of days that may never be selected.
    pub fn set_disabled_days(&mut self, days: impl IntoIterator<Item = C>) {
        self.disabled_days = index_days(days);
        tracing::debug!(count = self.disabled_days.len(), "Replaced disabled days");
    }

    // Accessors

    pub fn min_date(&self) -> Option<&C> {
        self.min_date.as_ref()
    }

    pub fn max_date(&self) -> Option<&C> {
        self.max_date.as_ref()
    }

    /// Selectable days in chronological order.
    pub fn selectable_days(&self) -> Vec<C> {
        self.selectable_days.values().cloned().collect()
    }

    /// Disabled days in chronological order.
    pub fn disabled_days(&self) -> Vec<C> {
        self.disabled_days.values().cloned().collect()
    }

    /// Snapshot for persisting the configuration.
    pub fn state(&self) -> DateRangeLimiterState {
        DateRangeLimiterState {
            min_year: self.min_year,
            max_year: self.max_year,
            min_date: self.min_date.as_ref().map(Calendar::calendar_day),
            max_date: self.max_date.as_ref().map(Calendar::calendar_day),
            selectable_days: self.selectable_days.values().map(Calendar::calendar_day).collect(),
            disabled_days: self.disabled_days.values().map(Calendar::calendar_day).collect(),
        }
    }

    /// Rebuilds a limiter from a snapshot, re-validating it.
    ///
    /// # Errors
    ///
    /// Returns `PickerError::InvalidRange` for inverted year or date ranges and
    /// `PickerError::Validation` for days that do not exist in `C`.
    pub fn from_state(state: DateRangeLimiterState) -> Result<Self, PickerError> {
        let mut limiter = Self::default();
        limiter.set_year_range(state.min_year, state.max_year)?;
        if let Some(day) = state.min_date {
            limiter.set_min_date(day.to_calendar()?)?;
        }
        if let Some(day) = state.max_date {
            limiter.set_max_date(day.to_calendar()?)?;
        }
        limiter.set_selectable_days(to_calendars(&state.selectable_days)?);
        limiter.set_disabled_days(to_calendars(&state.disabled_days)?);
        Ok(limiter)
    }

    // Internals

    fn is_day_out_of_range(&self, day: &C) -> bool {
        let key = day.epoch_day();
        if self.disabled_days.contains_key(&key) {
            return true;
        }
        if !self.selectable_days.is_empty() {
            return !self.selectable_days.contains_key(&key);
        }
        self.is_before_min(day) || self.is_after_max(day)
    }

    fn is_before_min(&self, day: &C) -> bool {
        day.year() < self.min_year
            || self
                .min_date
                .as_ref()
                .is_some_and(|min| day.epoch_day() < min.epoch_day())
    }

    fn is_after_max(&self, day: &C) -> bool {
        day.year() > self.max_year
            || self
                .max_date
                .as_ref()
                .is_some_and(|max| day.epoch_day() > max.epoch_day())
    }

    /// Nearest selectable, non-disabled day; ties go to the earlier one.
    fn nearest_selectable(&self, key: i64) -> Option<C> {
        let usable = |(day, _): &(&i64, &C)| !self.disabled_days.contains_key(*day);
        let earlier = self.selectable_days.range(..key).rev().find(usable);
        let later = self.selectable_days.range(key..).find(usable);
        let nearest = match (earlier, later) {
            (Some(earlier), Some(later)) => {
                if key - earlier.0 <= later.0 - key {
                    earlier
                } else {
                    later
                }
            }
            (Some(earlier), None) => earlier,
            (None, Some(later)) => later,
            (None, None) => return None,
        };
        Some(nearest.1.clone())
    }

    /// Walks outward from `day` inside `[start_date, end_date]`, earlier first.
    fn nearest_in_span(&self, day: &C) -> Option<C> {
        let start = self.start_date().epoch_day();
        let end = self.end_date().epoch_day();
        if start > end {
            return None;
        }
        let origin = day.epoch_day().clamp(start, end);
        let mut candidate = day.clone();
        for offset in 0..=(end - start) {
            let earlier = origin - offset;
            let later = origin + offset;
            if earlier < start && later > end {
                break;
            }
            for key in [earlier, later] {
                if !(start..=end).contains(&key) {
                    continue;
                }
                candidate.set_epoch_day(key);
                if !self.is_day_out_of_range(&candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

impl<C: Calendar> DateRangeLimiter<C> for DefaultDateRangeLimiter<C> {
    fn min_year(&self) -> i32 {
        if let Some(first) = self.selectable_days.values().next() {
            return first.year();
        }
        self.min_date
            .as_ref()
            .map_or(self.min_year, |min| min.year().max(self.min_year))
    }

    fn max_year(&self) -> i32 {
        if let Some(last) = self.selectable_days.values().next_back() {
            return last.year();
        }
        self.max_date
            .as_ref()
            .map_or(self.max_year, |max| max.year().min(self.max_year))
    }

    fn start_date(&self) -> C {
        if let Some(first) = self.selectable_days.values().next() {
            return first.clone();
        }
        if let Some(min) = &self.min_date {
            return min.clone();
        }
        let mut start = C::default();
        start.set_date(self.min_year, 1, 1);
        start.trim_to_midnight();
        start
    }

    fn end_date(&self) -> C {
        if let Some(last) = self.selectable_days.values().next_back() {
            return last.clone();
        }
        if let Some(max) = &self.max_date {
            return max.clone();
        }
        let mut end = C::default();
        end.set_date(self.max_year, 1, 1);
        end.set_month(end.months_in_year());
        end.set_day_of_month(end.actual_maximum_day_of_month());
        end.trim_to_midnight();
        end
    }

    fn is_out_of_range(&self, year: i32, month: u8, day: u8) -> bool {
        let mut calendar = C::default();
        calendar.set_year(year);
        if calendar.year() != year || month == 0 || month > calendar.months_in_year() {
            return true;
        }
        calendar.set_month(month);
        calendar.set_day_of_month(1);
        if day == 0 || day > calendar.actual_maximum_day_of_month() {
            return true;
        }
        calendar.set_day_of_month(day);
        self.is_day_out_of_range(&calendar)
    }

    fn set_to_nearest_date(&self, calendar: C) -> C {
        let day = normalize(calendar);
        if !self.is_day_out_of_range(&day) {
            return day;
        }

        let nearest = if self.selectable_days.is_empty() {
            self.nearest_in_span(&day)
        } else {
            self.nearest_selectable(day.epoch_day())
        };
        nearest.unwrap_or_else(|| {
            tracing::warn!(
                day = %day.calendar_day(),
                "No selectable day in range, keeping the requested day"
            );
            day
        })
    }
}

impl<C: Calendar> Serialize for DefaultDateRangeLimiter<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.state().serialize(serializer)
    }
}

impl<'de, C: Calendar> Deserialize<'de> for DefaultDateRangeLimiter<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let state = DateRangeLimiterState::deserialize(deserializer)?;
        Self::from_state(state).map_err(serde::de::Error::custom)
    }
}

fn normalize<C: Calendar>(mut day: C) -> C {
    day.clamp_day_of_month();
    day.trim_to_midnight();
    day
}

pub(super) fn index_days<C: Calendar>(days: impl IntoIterator<Item = C>) -> BTreeMap<i64, C> {
    days.into_iter()
        .map(normalize)
        .map(|day| (day.epoch_day(), day))
        .collect()
}

pub(super) fn to_calendars<C: Calendar>(days: &[CalendarDay]) -> Result<Vec<C>, PickerError> {
    days.iter().map(CalendarDay::to_calendar::<C>).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::calendar::GregorianCalendar;
    use crate::date::persian::PersianCalendar;

    fn greg(year: i32, month: u8, day: u8) -> GregorianCalendar {
        GregorianCalendar::new(year, month, day).unwrap()
    }

    fn persian(year: i32, month: u8, day: u8) -> PersianCalendar {
        PersianCalendar::new(year, month, day).unwrap()
    }

    fn day_of<C: Calendar>(calendar: &C) -> CalendarDay {
        calendar.calendar_day()
    }

    mod configuration {
        use super::*;

        #[test]
        fn defaults_span_1900_to_2100() {
            let limiter = DefaultDateRangeLimiter::<GregorianCalendar>::new();
            assert_eq!(limiter.min_year(), 1900);
            assert_eq!(limiter.max_year(), 2100);
            assert_eq!(day_of(&limiter.start_date()), CalendarDay::new(1900, 1, 1));
            assert_eq!(day_of(&limiter.end_date()), CalendarDay::new(2100, 12, 31));
        }

        #[test]
        fn inverted_year_range_rejected() {
            let mut limiter = DefaultDateRangeLimiter::<GregorianCalendar>::new();
            let err = limiter.set_year_range(2030, 2020).unwrap_err();
            assert!(matches!(err, PickerError::InvalidRange(_)));
            assert_eq!(limiter.min_year(), 1900);
        }

        #[test]
        fn inverted_dates_rejected() {
            let mut limiter = DefaultDateRangeLimiter::new();
            limiter.set_min_date(greg(2024, 6, 1)).unwrap();
            assert!(matches!(
                limiter.set_max_date(greg(2024, 5, 31)),
                Err(PickerError::InvalidRange(_))
            ));
            limiter.set_max_date(greg(2024, 6, 1)).unwrap();
            assert!(matches!(
                limiter.set_min_date(greg(2024, 6, 2)),
                Err(PickerError::InvalidRange(_))
            ));
        }

        #[test]
        fn min_date_narrows_year_range() {
            let mut limiter = DefaultDateRangeLimiter::new();
            limiter.set_min_date(greg(2020, 5, 5)).unwrap();
            limiter.set_max_date(greg(2030, 1, 1)).unwrap();
            assert_eq!(limiter.min_year(), 2020);
            assert_eq!(limiter.max_year(), 2030);
            assert_eq!(day_of(&limiter.start_date()), CalendarDay::new(2020, 5, 5));
            assert_eq!(day_of(&limiter.end_date()), CalendarDay::new(2030, 1, 1));
        }

        #[test]
        fn stored_days_are_trimmed_to_midnight() {
            let noon = chrono::NaiveTime::from_hms_opt(12, 30, 0).unwrap();
            let mut limiter = DefaultDateRangeLimiter::new();
            limiter.set_min_date(greg(2024, 1, 1).with_time(noon)).unwrap();
            assert_eq!(limiter.min_date().unwrap().time_of_day(), chrono::NaiveTime::MIN);
        }

        #[test]
        fn selectable_days_define_bounds() {
            let mut limiter = DefaultDateRangeLimiter::new();
            limiter.set_selectable_days([greg(2025, 3, 1), greg(2023, 7, 4)]);
            assert_eq!(limiter.min_year(), 2023);
            assert_eq!(limiter.max_year(), 2025);
            assert_eq!(day_of(&limiter.start_date()), CalendarDay::new(2023, 7, 4));
            assert_eq!(day_of(&limiter.end_date()), CalendarDay::new(2025, 3, 1));
            assert_eq!(limiter.selectable_days().len(), 2);
        }
    }

    mod out_of_range {
        use super::*;

        #[test]
        fn min_max_bracket() {
            let mut limiter = DefaultDateRangeLimiter::<GregorianCalendar>::new();
            limiter.set_min_date(greg(2024, 3, 10)).unwrap();
            limiter.set_max_date(greg(2024, 3, 20)).unwrap();
            assert!(limiter.is_out_of_range(2024, 3, 9));
            assert!(!limiter.is_out_of_range(2024, 3, 10));
            assert!(!limiter.is_out_of_range(2024, 3, 20));
            assert!(limiter.is_out_of_range(2024, 3, 21));
        }

        #[test]
        fn year_range_applies() {
            let mut limiter = DefaultDateRangeLimiter::<GregorianCalendar>::new();
            limiter.set_year_range(2000, 2010).unwrap();
            assert!(limiter.is_out_of_range(1999, 12, 31));
            assert!(!limiter.is_out_of_range(2000, 1, 1));
            assert!(limiter.is_out_of_range(2011, 1, 1));
        }

        #[test]
        fn missing_days_are_out() {
            let limiter = DefaultDateRangeLimiter::<GregorianCalendar>::new();
            assert!(limiter.is_out_of_range(2023, 2, 29));
            assert!(limiter.is_out_of_range(2023, 13, 1));
            assert!(limiter.is_out_of_range(2023, 1, 0));
            assert!(!limiter.is_out_of_range(2024, 2, 29));
        }

        #[test]
        fn disabled_beats_selectable() {
            let mut limiter = DefaultDateRangeLimiter::<GregorianCalendar>::new();
            limiter.set_selectable_days([greg(2024, 5, 1), greg(2024, 5, 2)]);
            limiter.set_disabled_days([greg(2024, 5, 2)]);
            assert!(!limiter.is_out_of_range(2024, 5, 1));
            assert!(limiter.is_out_of_range(2024, 5, 2));
            assert!(limiter.is_out_of_range(2024, 5, 3));
        }

        #[test]
        fn selectable_days_ignore_min_max() {
            let mut limiter = DefaultDateRangeLimiter::<GregorianCalendar>::new();
            limiter.set_min_date(greg(2024, 6, 1)).unwrap();
            limiter.set_selectable_days([greg(2024, 5, 1)]);
            assert!(!limiter.is_out_of_range(2024, 5, 1));
        }

        #[test]
        fn persian_bounds() {
            let mut limiter = DefaultDateRangeLimiter::<PersianCalendar>::new();
            limiter.set_year_range(1390, 1410).unwrap();
            limiter.set_max_date(persian(1403, 12, 30)).unwrap();
            assert!(!limiter.is_out_of_range(1403, 12, 30));
            assert!(limiter.is_out_of_range(1404, 1, 1));
            assert!(limiter.is_out_of_range(1402, 12, 30));
            assert!(limiter.is_out_of_range(1389, 12, 29));
        }
    }

    mod nearest {
        use super::*;

        #[test]
        fn legal_day_is_kept_at_midnight() {
            let limiter = DefaultDateRangeLimiter::<GregorianCalendar>::new();
            let noon = chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap();
            let nearest = limiter.set_to_nearest_date(greg(2024, 5, 5).with_time(noon));
            assert_eq!(day_of(&nearest), CalendarDay::new(2024, 5, 5));
            assert_eq!(nearest.time_of_day(), chrono::NaiveTime::MIN);
        }

        #[test]
        fn persian_min_date_on_missing_day_clamps() {
            let mut min_date = persian(1403, 7, 30);
            min_date.set_day_of_month(31);

            let mut limiter = DefaultDateRangeLimiter::new();
            limiter.set_year_range(1300, 1500).unwrap();
            limiter.set_min_date(min_date).unwrap();
            assert_eq!(
                day_of(limiter.min_date().unwrap()),
                CalendarDay::new(1403, 7, 30)
            );

            for day in [29, 30] {
                let nearest = limiter.set_to_nearest_date(persian(1403, 7, day));
                assert_eq!(day_of(&nearest), CalendarDay::new(1403, 7, 30));
            }
        }

        #[test]
        fn overflowing_input_is_clamped_first() {
            let limiter = DefaultDateRangeLimiter::<GregorianCalendar>::new();
            let mut input = greg(2023, 2, 1);
            input.set_day_of_month(31);
            assert_eq!(
                day_of(&limiter.set_to_nearest_date(input)),
                CalendarDay::new(2023, 2, 28)
            );
        }

        #[test]
        fn before_min_moves_to_min_after_max_moves_to_max() {
            let mut limiter = DefaultDateRangeLimiter::new();
            limiter.set_min_date(greg(2024, 3, 10)).unwrap();
            limiter.set_max_date(greg(2024, 3, 20)).unwrap();
            assert_eq!(
                day_of(&limiter.set_to_nearest_date(greg(2020, 1, 1))),
                CalendarDay::new(2024, 3, 10)
            );
            assert_eq!(
                day_of(&limiter.set_to_nearest_date(greg(2024, 4, 1))),
                CalendarDay::new(2024, 3, 20)
            );
        }

        #[test]
        fn skips_disabled_min_date() {
            let mut limiter = DefaultDateRangeLimiter::new();
            limiter.set_min_date(greg(2024, 3, 10)).unwrap();
            limiter.set_disabled_days([greg(2024, 3, 10), greg(2024, 3, 11)]);
            assert_eq!(
                day_of(&limiter.set_to_nearest_date(greg(2024, 1, 1))),
                CalendarDay::new(2024, 3, 12)
            );
        }

        #[test]
        fn disabled_day_ties_go_earlier() {
            let mut limiter = DefaultDateRangeLimiter::new();
            limiter.set_disabled_days([greg(2024, 5, 10)]);
            assert_eq!(
                day_of(&limiter.set_to_nearest_date(greg(2024, 5, 10))),
                CalendarDay::new(2024, 5, 9)
            );
        }

        #[test]
        fn nearest_selectable_day() {
            let mut limiter = DefaultDateRangeLimiter::new();
            limiter.set_selectable_days([greg(2024, 5, 1), greg(2024, 5, 11), greg(2024, 5, 20)]);
            assert_eq!(
                day_of(&limiter.set_to_nearest_date(greg(2024, 5, 7))),
                CalendarDay::new(2024, 5, 11)
            );
            // 5 days either way
            assert_eq!(
                day_of(&limiter.set_to_nearest_date(greg(2024, 5, 6))),
                CalendarDay::new(2024, 5, 1)
            );
            assert_eq!(
                day_of(&limiter.set_to_nearest_date(greg(2030, 1, 1))),
                CalendarDay::new(2024, 5, 20)
            );
        }

        #[test]
        fn nearest_selectable_skips_disabled() {
            let mut limiter = DefaultDateRangeLimiter::new();
            limiter.set_selectable_days([greg(2024, 5, 1), greg(2024, 5, 11), greg(2024, 5, 20)]);
            limiter.set_disabled_days([greg(2024, 5, 11)]);
            assert_eq!(
                day_of(&limiter.set_to_nearest_date(greg(2024, 5, 12))),
                CalendarDay::new(2024, 5, 20)
            );
        }

        #[test]
        fn nothing_selectable_keeps_input() {
            let mut limiter = DefaultDateRangeLimiter::new();
            limiter.set_selectable_days([greg(2024, 5, 1)]);
            limiter.set_disabled_days([greg(2024, 5, 1)]);
            assert_eq!(
                day_of(&limiter.set_to_nearest_date(greg(2024, 5, 3))),
                CalendarDay::new(2024, 5, 3)
            );
        }

        #[test]
        fn result_is_in_range() {
            let mut limiter = DefaultDateRangeLimiter::new();
            limiter.set_year_range(2024, 2024).unwrap();
            limiter.set_disabled_days((1..=31).map(|day| greg(2024, 1, day)));
            for input in [greg(2023, 6, 1), greg(2024, 1, 15), greg(2025, 6, 1)] {
                let nearest = limiter.set_to_nearest_date(input);
                let day = day_of(&nearest);
                assert!(!limiter.is_out_of_range(day.year, day.month, day.day), "{}", day);
            }
        }
    }

    mod persistence {
        use super::*;

        #[test]
        fn json_round_trip() {
            let mut limiter = DefaultDateRangeLimiter::new();
            limiter.set_year_range(1400, 1410).unwrap();
            limiter.set_min_date(persian(1401, 1, 1)).unwrap();
            limiter.set_max_date(persian(1405, 6, 31)).unwrap();
            limiter.set_disabled_days([persian(1403, 12, 30)]);

            let json = serde_json::to_string(&limiter).unwrap();
            assert!(json.contains("\"minYear\":1400"));
            let restored: DefaultDateRangeLimiter<PersianCalendar> =
                serde_json::from_str(&json).unwrap();
            assert_eq!(restored.state(), limiter.state());
            assert!(restored.is_out_of_range(1403, 12, 30));
        }

        #[test]
        fn inverted_range_rejected_on_restore() {
            let json = r#"{"minYear": 2010, "maxYear": 2000}"#;
            let result: Result<DefaultDateRangeLimiter<GregorianCalendar>, _> =
                serde_json::from_str(json);
            assert!(result.is_err());
        }

        #[test]
        fn missing_day_rejected_on_restore() {
            let state = DateRangeLimiterState {
                disabled_days: vec![CalendarDay::new(2023, 2, 29)],
                ..DateRangeLimiterState::default()
            };
            assert!(matches!(
                DefaultDateRangeLimiter::<GregorianCalendar>::from_state(state),
                Err(PickerError::Validation(_))
            ));
        }

        #[test]
        fn works_as_trait_object() {
            let limiter: Box<dyn DateRangeLimiter<GregorianCalendar>> =
                Box::new(DefaultDateRangeLimiter::new());
            assert!(!limiter.is_out_of_range(2000, 1, 1));
        }
    }
}
