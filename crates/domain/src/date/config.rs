//! Date picker configuration
//!
//! Settings the month view reads besides the range limits: the weekday each
//! week row starts on and the days drawn highlighted.

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use super::calendar::{Calendar, CalendarDay};
use super::limiter::{index_days, to_calendars};
use crate::error::PickerError;

/// Weekdays numbered from 1 (Sunday) to 7 (Saturday).
const NUMBERED_WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Serializable snapshot of a `DatePickerConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatePickerConfigState {
    pub first_day_of_week: Weekday,
    #[serde(default)]
    pub highlighted_days: Vec<CalendarDay>,
}

impl Default for DatePickerConfigState {
    fn default() -> Self {
        Self {
            first_day_of_week: Weekday::Sun,
            highlighted_days: Vec::new(),
        }
    }
}

/// First day of the week and highlighted days for a calendar `C`.
///
/// Highlighted days are trimmed to midnight and keyed by epoch day, so the
/// same day given twice is stored once.
#[derive(Debug, Clone)]
pub struct DatePickerConfig<C: Calendar> {
    first_day_of_week: Weekday,
    highlighted_days: BTreeMap<i64, C>,
}

impl<C: Calendar> Default for DatePickerConfig<C> {
    fn default() -> Self {
        Self {
            first_day_of_week: Weekday::Sun,
            highlighted_days: BTreeMap::new(),
        }
    }
}

impl<C: Calendar> DatePickerConfig<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    pub fn set_first_day_of_week(&mut self, weekday: Weekday) {
        self.first_day_of_week = weekday;
        tracing::debug!(first_day_of_week = %weekday, "Set first day of week");
    }

    /// Sets the first day of the week from its number, 1 for Sunday through
    /// 7 for Saturday.
    ///
    /// # Errors
    ///
    /// Returns `PickerError::Validation` if `number` is outside `1..=7`.
    pub fn set_first_day_of_week_number(&mut self, number: u8) -> Result<(), PickerError> {
        let weekday = usize::from(number)
            .checked_sub(1)
            .and_then(|index| NUMBERED_WEEK.get(index))
            .ok_or_else(|| {
                PickerError::validation(format!(
                    "Day of week {} must be between 1 (Sunday) and 7 (Saturday)",
                    number
                ))
            })?;
        self.set_first_day_of_week(*weekday);
        Ok(())
    }

    /// The seven weekdays in the order a week row shows them.
    pub fn week_order(&self) -> [Weekday; 7] {
        std::array::from_fn(|offset| {
            (0..offset).fold(self.first_day_of_week, |weekday, _| weekday.succ())
        })
    }

    /// Replaces the set of highlighted days.
    pub fn set_highlighted_days(&mut self, days: impl IntoIterator<Item = C>) {
        self.highlighted_days = index_days(days);
        tracing::debug!(count = self.highlighted_days.len(), "Replaced highlighted days");
    }

    /// Highlighted days in chronological order.
    pub fn highlighted_days(&self) -> Vec<C> {
        self.highlighted_days.values().cloned().collect()
    }

    /// Whether the given day is highlighted. Days that do not exist are not.
    pub fn is_highlighted(&self, year: i32, month: u8, day: u8) -> bool {
        CalendarDay::new(year, month, day)
            .to_calendar::<C>()
            .is_ok_and(|day| self.highlighted_days.contains_key(&day.epoch_day()))
    }

    /// Snapshot for persisting the configuration.
    pub fn state(&self) -> DatePickerConfigState {
        DatePickerConfigState {
            first_day_of_week: self.first_day_of_week,
            highlighted_days: self.highlighted_days.values().map(Calendar::calendar_day).collect(),
        }
    }

    /// # Errors
    ///
    /// Returns `PickerError::Validation` for highlighted days that do not exist
    /// in `C`.
    pub fn from_state(state: DatePickerConfigState) -> Result<Self, PickerError> {
        let mut config = Self::default();
        config.set_first_day_of_week(state.first_day_of_week);
        config.set_highlighted_days(to_calendars(&state.highlighted_days)?);
        Ok(config)
    }
}

impl<C: Calendar> Serialize for DatePickerConfig<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.state().serialize(serializer)
    }
}

impl<'de, C: Calendar> Deserialize<'de> for DatePickerConfig<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let state = DatePickerConfigState::deserialize(deserializer)?;
        Self::from_state(state).map_err(serde::de::Error::custom)
    }
}
