use serde::{Deserialize, Serialize};

use super::timepoint::Resolution;

// =============================================================================
// Time Picker Configuration
// =============================================================================

/// Which components a time picker shows and how hours are entered.
///
/// Seconds can only be shown together with minutes, so the setters keep the
/// two flags consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTimePickerConfig")]
pub struct TimePickerConfig {
    is_24_hour_mode: bool,
    enable_minutes: bool,
    enable_seconds: bool,
}

/// Unnormalized wire form of a `TimePickerConfig`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimePickerConfig {
    is_24_hour_mode: bool,
    enable_minutes: bool,
    enable_seconds: bool,
}

impl From<RawTimePickerConfig> for TimePickerConfig {
    /// Seconds without minutes is read as seconds with minutes.
    fn from(raw: RawTimePickerConfig) -> Self {
        Self::new(raw.is_24_hour_mode)
            .with_minutes(raw.enable_minutes)
            .with_seconds(raw.enable_seconds)
    }
}

impl Default for TimePickerConfig {
    fn default() -> Self {
        Self {
            is_24_hour_mode: false,
            enable_minutes: true,
            enable_seconds: false,
        }
    }
}

impl TimePickerConfig {
    /// Hours and minutes, in the given hour mode.
    pub fn new(is_24_hour_mode: bool) -> Self {
        Self {
            is_24_hour_mode,
            ..Self::default()
        }
    }

    pub fn with_minutes(mut self, enable: bool) -> Self {
        self.set_minutes_enabled(enable);
        self
    }

    pub fn with_seconds(mut self, enable: bool) -> Self {
        self.set_seconds_enabled(enable);
        self
    }

    /// Disabling minutes also disables seconds.
    pub fn set_minutes_enabled(&mut self, enable: bool) {
        if !enable {
            self.enable_seconds = false;
        }
        self.enable_minutes = enable;
    }

    /// Enabling seconds also enables minutes.
    pub fn set_seconds_enabled(&mut self, enable: bool) {
        if enable {
            self.enable_minutes = true;
        }
        self.enable_seconds = enable;
    }

    pub fn is_24_hour_mode(&self) -> bool {
        self.is_24_hour_mode
    }

    pub fn minutes_enabled(&self) -> bool {
        self.enable_minutes
    }

    pub fn seconds_enabled(&self) -> bool {
        self.enable_seconds
    }

    /// The finest component the picker lets the user choose.
    pub fn resolution(&self) -> Resolution {
        if self.enable_seconds {
            Resolution::Second
        } else if self.enable_minutes {
            Resolution::Minute
        } else {
            Resolution::Hour
        }
    }

    /// Number of digit slots a complete keyboard entry fills.
    pub fn digit_slots(&self) -> usize {
        match self.resolution() {
            Resolution::Hour => 2,
            Resolution::Minute => 4,
            Resolution::Second => 6,
        }
    }

    /// The face to show after a value was picked on `face`, if any.
    pub fn next_face(&self, face: Resolution) -> Option<Resolution> {
        match face {
            Resolution::Hour if self.enable_minutes => Some(Resolution::Minute),
            Resolution::Minute if self.enable_seconds => Some(Resolution::Second),
            _ => None,
        }
    }
}
