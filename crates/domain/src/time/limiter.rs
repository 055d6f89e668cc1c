//! Time range and constraint resolution
//!
//! `TimepointLimiter` is the capability the picker consults on every render
//! and every drag frame. `DefaultTimepointLimiter` covers min/max bounds,
//! explicit selectable times and disabled times; callers with other needs can
//! plug in their own implementation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::timepoint::{Resolution, Timepoint, SECONDS_PER_DAY};
use crate::error::PickerError;

/// Decides which timepoints a time picker may select.
pub trait TimepointLimiter: std::fmt::Debug {
    /// Whether `point` is unselectable while the `active` face is showing.
    ///
    /// Only components up to `active` are compared: while the hour face is
    /// showing, hour 8 is selectable if any selectable time has hour 8.
    /// `resolution` is the finest component the picker offers.
    fn is_out_of_range(&self, point: Timepoint, active: Resolution, resolution: Resolution)
        -> bool;

    /// Whether no time before noon is selectable.
    fn is_am_disabled(&self) -> bool;

    /// Whether no time from noon onwards is selectable.
    fn is_pm_disabled(&self) -> bool;

    /// Returns the selectable timepoint nearest to `time`.
    ///
    /// `edited` names the component the user is dragging, if any; candidates
    /// that only change that component are preferred.
    fn round_to_nearest(
        &self,
        time: Timepoint,
        edited: Option<Resolution>,
        resolution: Resolution,
    ) -> Timepoint;
}

// =============================================================================
// Persisted state
// =============================================================================

/// Serializable snapshot of a `DefaultTimepointLimiter`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimepointLimiterState {
    pub min_time: Option<Timepoint>,
    pub max_time: Option<Timepoint>,
    #[serde(default)]
    pub selectable_times: Vec<Timepoint>,
    #[serde(default)]
    pub disabled_times: Vec<Timepoint>,
}

// =============================================================================
// DefaultTimepointLimiter
// =============================================================================

/// Limits selection by bounds, a selectable whitelist and a disabled blacklist.
///
/// Precedence: disabled times always lose, then the selectable set (when
/// non-empty) decides, and only without one do the min/max bounds apply.
///
/// Rounding with many consecutive disabled times and no selectable set walks
/// the day one resolution step at a time, so it gets slower as the disabled
/// runs get longer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "TimepointLimiterState",
    into = "TimepointLimiterState"
)]
pub struct DefaultTimepointLimiter {
    min_time: Option<Timepoint>,
    max_time: Option<Timepoint>,
    selectable_times: BTreeSet<Timepoint>,
    disabled_times: BTreeSet<Timepoint>,
    /// `selectable_times - disabled_times`, rebuilt by the setters.
    exclusive_selectable: BTreeSet<Timepoint>,
}

impl DefaultTimepointLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    // Configuration

    /// Sets the earliest selectable time.
    ///
    /// # Errors
    ///
    /// Returns `PickerError::InvalidRange` if `min_time` is after the current
    /// maximum.
    pub fn set_min_time(&mut self, min_time: Timepoint) -> Result<(), PickerError> {
        if let Some(max_time) = self.max_time {
            if min_time > max_time {
                return Err(PickerError::invalid_range(format!(
                    "minimum time {} is after maximum time {}",
                    min_time, max_time
                )));
            }
        }
        self.min_time = Some(min_time);
        tracing::debug!(%min_time, "Set minimum time");
        Ok(())
    }

    /// Sets the latest selectable time.
    ///
    /// # Errors
    ///
    /// Returns `PickerError::InvalidRange` if `max_time` is before the current
    /// minimum.
    pub fn set_max_time(&mut self, max_time: Timepoint) -> Result<(), PickerError> {
        if let Some(min_time) = self.min_time {
            if max_time < min_time {
                return Err(PickerError::invalid_range(format!(
                    "maximum time {} is before minimum time {}",
                    max_time, min_time
                )));
            }
        }
        self.max_time = Some(max_time);
        tracing::debug!(%max_time, "Set maximum time");
        Ok(())
    }

    /// Replaces the set of the only times that may be selected.
    ///
    /// Specify times only up to the picker's resolution (no seconds on a
    /// minute picker).
    pub fn set_selectable_times(&mut self, times: impl IntoIterator<Item = Timepoint>) {
        self.selectable_times = times.into_iter().collect();
        self.rebuild_exclusive();
        tracing::debug!(
            count = self.selectable_times.len(),
            "Replaced selectable times"
        );
    }

    /// Replaces the set of times that may never be selected.
    pub fn set_disabled_times(&mut self, times: impl IntoIterator<Item = Timepoint>) {
        self.disabled_times = times.into_iter().collect();
        self.rebuild_exclusive();
        tracing::debug!(count = self.disabled_times.len(), "Replaced disabled times");
    }

    /// Makes every time on the given interval grid selectable.
    ///
    /// A time is on the grid when its hour, minute and second are multiples of
    /// the respective interval. Pass 60 for components the picker does not show.
    ///
    /// # Errors
    ///
    /// Returns `PickerError::Validation` if `hour_interval` is outside 1-24 or
    /// either other interval is outside 1-60.
    pub fn set_time_interval(
        &mut self,
        hour_interval: u8,
        minute_interval: u8,
        second_interval: u8,
    ) -> Result<(), PickerError> {
        if !(1..=24).contains(&hour_interval) {
            return Err(PickerError::validation(format!(
                "hour interval {} must be between 1 and 24",
                hour_interval
            )));
        }
        for (name, interval) in [("minute", minute_interval), ("second", second_interval)] {
            if !(1..=60).contains(&interval) {
                return Err(PickerError::validation(format!(
                    "{} interval {} must be between 1 and 60",
                    name, interval
                )));
            }
        }

        let mut grid = Vec::new();
        for hour in (0..24).step_by(hour_interval as usize) {
            for minute in (0..60).step_by(minute_interval as usize) {
                for second in (0..60).step_by(second_interval as usize) {
                    grid.push(Timepoint::new(hour, minute, second)?);
                }
            }
        }
        self.set_selectable_times(grid);
        Ok(())
    }

    // Accessors

    pub fn min_time(&self) -> Option<Timepoint> {
        self.min_time
    }

    pub fn max_time(&self) -> Option<Timepoint> {
        self.max_time
    }

    /// Selectable times in ascending order.
    pub fn selectable_times(&self) -> Vec<Timepoint> {
        self.selectable_times.iter().copied().collect()
    }

    /// Disabled times in ascending order.
    pub fn disabled_times(&self) -> Vec<Timepoint> {
        self.disabled_times.iter().copied().collect()
    }

    /// Snapshot for persisting the configuration.
    pub fn state(&self) -> TimepointLimiterState {
        TimepointLimiterState {
            min_time: self.min_time,
            max_time: self.max_time,
            selectable_times: self.selectable_times(),
            disabled_times: self.disabled_times(),
        }
    }

    // Internals

    fn rebuild_exclusive(&mut self) {
        self.exclusive_selectable = self
            .selectable_times
            .difference(&self.disabled_times)
            .copied()
            .collect();
    }

    fn is_legal(&self, point: Timepoint, resolution: Resolution) -> bool {
        !self.is_out_of_range(point, Resolution::Second, resolution)
    }

    fn is_outside_bounds(&self, point: Timepoint, granularity: Resolution) -> bool {
        let point = point.truncate(granularity);
        let before_min = self
            .min_time
            .is_some_and(|min| point < min.truncate(granularity));
        let after_max = self
            .max_time
            .is_some_and(|max| point > max.truncate(granularity));
        before_min || after_max
    }

    /// Whether every second of `[start, end]` is out of range at full resolution.
    fn is_span_disabled(&self, start: Timepoint, end: Timepoint) -> bool {
        if !self.selectable_times.is_empty() {
            return self.exclusive_selectable.range(start..=end).next().is_none();
        }

        let low = self.min_time.map_or(start, |min| min.max(start));
        let high = self.max_time.map_or(end, |max| max.min(end));
        if low > high {
            return true;
        }
        let span = (high.to_seconds() - low.to_seconds() + 1) as usize;
        self.disabled_times.range(low..=high).count() >= span
    }

    /// Nearest legal candidate that differs from `time` only in `component`.
    fn nearest_along(
        &self,
        time: Timepoint,
        component: Resolution,
        resolution: Resolution,
    ) -> Option<Timepoint> {
        (0..component.value_count())
            .filter(|&value| value != time.get(component))
            .filter_map(|value| time.with(component, value).ok())
            .filter(|&candidate| self.is_legal(candidate, resolution))
            .min_by_key(|candidate| (candidate.distance(&time), *candidate))
    }

    /// Nearest legal timepoint anywhere in the day.
    fn nearest_in_day(&self, time: Timepoint, resolution: Resolution) -> Option<Timepoint> {
        if !self.selectable_times.is_empty() {
            let below = self
                .exclusive_selectable
                .range(..time)
                .rev()
                .copied()
                .find(|&candidate| self.is_legal(candidate, resolution));
            let above = self
                .exclusive_selectable
                .range(time..)
                .copied()
                .find(|&candidate| self.is_legal(candidate, resolution));
            return match (below, above) {
                (Some(below), Some(above)) => {
                    if below.distance(&time) <= above.distance(&time) {
                        Some(below)
                    } else {
                        Some(above)
                    }
                }
                (below, above) => below.or(above),
            };
        }

        let origin = time.to_seconds();
        let step = resolution.step_seconds();
        let mut offset = step;
        loop {
            let earlier = origin.checked_sub(offset);
            let later = Some(origin + offset).filter(|&s| s < SECONDS_PER_DAY);
            if earlier.is_none() && later.is_none() {
                return None;
            }
            for seconds in [earlier, later].into_iter().flatten() {
                if let Ok(candidate) = Timepoint::from_seconds(seconds) {
                    if self.is_legal(candidate, resolution) {
                        return Some(candidate);
                    }
                }
            }
            offset += step;
        }
    }
}

impl TimepointLimiter for DefaultTimepointLimiter {
    fn is_out_of_range(
        &self,
        point: Timepoint,
        active: Resolution,
        resolution: Resolution,
    ) -> bool {
        let granularity = active.min(resolution);

        // Disabled times only apply once the finest face is showing; one
        // disabled minute must not grey out its whole hour.
        if active >= resolution {
            let truncated = point.truncate(granularity);
            let disabled = self
                .disabled_times
                .range(truncated..)
                .next()
                .is_some_and(|d| d.matches(&point, granularity));
            if disabled {
                return true;
            }
        }

        if !self.selectable_times.is_empty() {
            let truncated = point.truncate(granularity);
            return !self
                .exclusive_selectable
                .range(truncated..)
                .next()
                .is_some_and(|s| s.matches(&point, granularity));
        }

        self.is_outside_bounds(point, granularity)
    }

    fn is_am_disabled(&self) -> bool {
        self.is_span_disabled(Timepoint::MIDNIGHT, Timepoint::LAST_BEFORE_NOON)
    }

    fn is_pm_disabled(&self) -> bool {
        self.is_span_disabled(Timepoint::NOON, Timepoint::END_OF_DAY)
    }

    fn round_to_nearest(
        &self,
        time: Timepoint,
        edited: Option<Resolution>,
        resolution: Resolution,
    ) -> Timepoint {
        if self.is_legal(time, resolution) {
            return time;
        }

        if let Some(component) = edited {
            if let Some(candidate) = self.nearest_along(time, component, resolution) {
                return candidate;
            }
        }

        match self.nearest_in_day(time, resolution) {
            Some(candidate) => candidate,
            None => {
                tracing::warn!(%time, %resolution, "No selectable time in the day, keeping input");
                time
            }
        }
    }
}

impl TryFrom<TimepointLimiterState> for DefaultTimepointLimiter {
    type Error = PickerError;

    fn try_from(state: TimepointLimiterState) -> Result<Self, Self::Error> {
        let mut limiter = Self::new();
        if let Some(min_time) = state.min_time {
            limiter.set_min_time(min_time)?;
        }
        if let Some(max_time) = state.max_time {
            limiter.set_max_time(max_time)?;
        }
        limiter.set_selectable_times(state.selectable_times);
        limiter.set_disabled_times(state.disabled_times);
        Ok(limiter)
    }
}

impl From<DefaultTimepointLimiter> for TimepointLimiterState {
    fn from(limiter: DefaultTimepointLimiter) -> Self {
        limiter.state()
    }
}
