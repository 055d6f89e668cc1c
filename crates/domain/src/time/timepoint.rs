//! Time-of-day value objects
//!
//! - `Timepoint` - validated hour/minute/second triple
//! - `Resolution` - which components of a `Timepoint` are significant
//! - `AmPm` - half of the day a `Timepoint` falls in

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PickerError;

/// Seconds in a day; `Timepoint::to_seconds` is always below this.
pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

// =============================================================================
// Resolution
// =============================================================================

/// A component of a `Timepoint`, ordered from coarse to fine.
///
/// Used for three related things: the finest component a picker cares about,
/// the picker face currently showing, and the component the user is dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Hour,
    Minute,
    Second,
}

impl Resolution {
    pub fn display_name(&self) -> &'static str {
        match self {
            Resolution::Hour => "Hour",
            Resolution::Minute => "Minute",
            Resolution::Second => "Second",
        }
    }

    /// Number of distinct values of this component (24 or 60).
    pub fn value_count(&self) -> u8 {
        match self {
            Resolution::Hour => 24,
            Resolution::Minute | Resolution::Second => 60,
        }
    }

    /// Length of one unit of this component, in seconds.
    pub fn step_seconds(&self) -> u32 {
        match self {
            Resolution::Hour => 3600,
            Resolution::Minute => 60,
            Resolution::Second => 1,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// =============================================================================
// AmPm
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmPm {
    Am,
    Pm,
}

impl AmPm {
    pub fn display_name(&self) -> &'static str {
        match self {
            AmPm::Am => "AM",
            AmPm::Pm => "PM",
        }
    }
}

impl fmt::Display for AmPm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// =============================================================================
// Timepoint
// =============================================================================

/// Unvalidated wire form of a `Timepoint`.
#[derive(Deserialize)]
struct RawTimepoint {
    hour: u8,
    minute: u8,
    second: u8,
}

/// A time of day with second precision.
///
/// Validation rules:
/// - hour in 0-23
/// - minute in 0-59
/// - second in 0-59
///
/// Ordering is by (hour, minute, second), which is also chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawTimepoint")]
pub struct Timepoint {
    hour: u8,
    minute: u8,
    second: u8,
}

impl Timepoint {
    /// 00:00:00
    pub const MIDNIGHT: Timepoint = Timepoint {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// 12:00:00
    pub const NOON: Timepoint = Timepoint {
        hour: 12,
        minute: 0,
        second: 0,
    };

    /// 11:59:59, the last second of the morning.
    pub const LAST_BEFORE_NOON: Timepoint = Timepoint {
        hour: 11,
        minute: 59,
        second: 59,
    };

    /// 23:59:59, the last second of the day.
    pub const END_OF_DAY: Timepoint = Timepoint {
        hour: 23,
        minute: 59,
        second: 59,
    };

    /// Create a new validated timepoint.
    ///
    /// # Errors
    ///
    /// Returns `PickerError::InvalidTimepoint` if any component is outside its
    /// natural range.
    pub fn new(hour: u8, minute: u8, second: u8) -> Result<Self, PickerError> {
        if hour > 23 {
            return Err(PickerError::invalid_timepoint(format!(
                "hour {} is outside 0-23",
                hour
            )));
        }
        if minute > 59 {
            return Err(PickerError::invalid_timepoint(format!(
                "minute {} is outside 0-59",
                minute
            )));
        }
        if second > 59 {
            return Err(PickerError::invalid_timepoint(format!(
                "second {} is outside 0-59",
                second
            )));
        }
        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    /// Create a timepoint from seconds since midnight.
    pub fn from_seconds(seconds: u32) -> Result<Self, PickerError> {
        if seconds >= SECONDS_PER_DAY {
            return Err(PickerError::invalid_timepoint(format!(
                "{} seconds is past the end of the day",
                seconds
            )));
        }
        Ok(Self {
            hour: (seconds / 3600) as u8,
            minute: (seconds / 60 % 60) as u8,
            second: (seconds % 60) as u8,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn is_am(&self) -> bool {
        self.hour < 12
    }

    pub fn is_pm(&self) -> bool {
        !self.is_am()
    }

    pub fn am_pm(&self) -> AmPm {
        if self.is_am() {
            AmPm::Am
        } else {
            AmPm::Pm
        }
    }

    /// Seconds since midnight.
    pub fn to_seconds(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    /// Returns a single component.
    pub fn get(&self, component: Resolution) -> u8 {
        match component {
            Resolution::Hour => self.hour,
            Resolution::Minute => self.minute,
            Resolution::Second => self.second,
        }
    }

    /// Returns a copy with one component replaced.
    pub fn with(&self, component: Resolution, value: u8) -> Result<Self, PickerError> {
        match component {
            Resolution::Hour => Self::new(value, self.minute, self.second),
            Resolution::Minute => Self::new(self.hour, value, self.second),
            Resolution::Second => Self::new(self.hour, self.minute, value),
        }
    }

    /// Zeroes every component finer than `resolution`.
    pub fn truncate(&self, resolution: Resolution) -> Self {
        match resolution {
            Resolution::Hour => Self {
                hour: self.hour,
                minute: 0,
                second: 0,
            },
            Resolution::Minute => Self {
                hour: self.hour,
                minute: self.minute,
                second: 0,
            },
            Resolution::Second => *self,
        }
    }

    /// True if both timepoints agree on every component up to `resolution`.
    pub fn matches(&self, other: &Timepoint, resolution: Resolution) -> bool {
        self.truncate(resolution) == other.truncate(resolution)
    }

    /// Absolute distance in seconds. Never wraps across midnight.
    pub fn distance(&self, other: &Timepoint) -> u32 {
        self.to_seconds().abs_diff(other.to_seconds())
    }
}

impl TryFrom<RawTimepoint> for Timepoint {
    type Error = PickerError;

    fn try_from(raw: RawTimepoint) -> Result<Self, Self::Error> {
        Self::new(raw.hour, raw.minute, raw.second)
    }
}

impl fmt::Display for Timepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tp(hour: u8, minute: u8, second: u8) -> Timepoint {
        Timepoint::new(hour, minute, second).unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn valid_timepoint() {
            let t = tp(13, 45, 30);
            assert_eq!(t.hour(), 13);
            assert_eq!(t.minute(), 45);
            assert_eq!(t.second(), 30);
        }

        #[test]
        fn hour_24_rejected() {
            let err = Timepoint::new(24, 0, 0).unwrap_err();
            assert!(matches!(err, PickerError::InvalidTimepoint(_)));
            assert!(err.to_string().contains("hour 24"));
        }

        #[test]
        fn minute_60_rejected() {
            assert!(Timepoint::new(0, 60, 0).is_err());
        }

        #[test]
        fn second_60_rejected() {
            assert!(Timepoint::new(0, 0, 60).is_err());
        }

        #[test]
        fn from_seconds_round_trips() {
            let t = tp(7, 8, 9);
            assert_eq!(Timepoint::from_seconds(t.to_seconds()).unwrap(), t);
            assert_eq!(
                Timepoint::from_seconds(SECONDS_PER_DAY - 1).unwrap(),
                Timepoint::END_OF_DAY
            );
        }

        #[test]
        fn from_seconds_past_end_of_day_rejected() {
            assert!(Timepoint::from_seconds(SECONDS_PER_DAY).is_err());
        }

        #[test]
        fn with_replaces_one_component() {
            let t = tp(9, 15, 30);
            assert_eq!(t.with(Resolution::Minute, 45).unwrap(), tp(9, 45, 30));
            assert!(t.with(Resolution::Hour, 24).is_err());
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn ordered_by_hour_then_minute_then_second() {
            assert!(tp(9, 59, 59) < tp(10, 0, 0));
            assert!(tp(10, 0, 59) < tp(10, 1, 0));
            assert!(tp(10, 1, 0) < tp(10, 1, 1));
        }

        #[test]
        fn am_pm_boundary_is_noon() {
            assert!(tp(11, 59, 59).is_am());
            assert!(Timepoint::NOON.is_pm());
            assert_eq!(Timepoint::MIDNIGHT.am_pm(), AmPm::Am);
            assert_eq!(tp(23, 0, 0).am_pm(), AmPm::Pm);
        }

        #[test]
        fn distance_does_not_wrap() {
            assert_eq!(
                Timepoint::MIDNIGHT.distance(&Timepoint::END_OF_DAY),
                SECONDS_PER_DAY - 1
            );
            assert_eq!(tp(10, 0, 0).distance(&tp(9, 59, 0)), 60);
        }
    }

    mod masking {
        use super::*;

        #[test]
        fn truncate_zeroes_finer_fields() {
            let t = tp(9, 41, 17);
            assert_eq!(t.truncate(Resolution::Hour), tp(9, 0, 0));
            assert_eq!(t.truncate(Resolution::Minute), tp(9, 41, 0));
            assert_eq!(t.truncate(Resolution::Second), t);
        }

        #[test]
        fn matches_compares_up_to_resolution() {
            let a = tp(9, 41, 17);
            let b = tp(9, 12, 0);
            assert!(a.matches(&b, Resolution::Hour));
            assert!(!a.matches(&b, Resolution::Minute));
        }

        #[test]
        fn resolutions_ordered_coarse_to_fine() {
            assert!(Resolution::Hour < Resolution::Minute);
            assert!(Resolution::Minute < Resolution::Second);
            assert_eq!(Resolution::Minute.step_seconds(), 60);
        }
    }

    mod serde_support {
        use super::*;

        #[test]
        fn serializes_as_fields() {
            let json = serde_json::to_string(&tp(8, 5, 0)).unwrap();
            assert_eq!(json, r#"{"hour":8,"minute":5,"second":0}"#);
        }

        #[test]
        fn deserialize_validates() {
            let ok: Timepoint = serde_json::from_str(r#"{"hour":8,"minute":5,"second":0}"#).unwrap();
            assert_eq!(ok, tp(8, 5, 0));

            let bad = serde_json::from_str::<Timepoint>(r#"{"hour":25,"minute":0,"second":0}"#);
            assert!(bad.is_err());
        }

        #[test]
        fn display_is_zero_padded() {
            assert_eq!(tp(8, 5, 3).to_string(), "08:05:03");
        }
    }
}
