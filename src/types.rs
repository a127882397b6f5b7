//! Shared primitive aliases, constants, and care-state enums.

use serde::{Deserialize, Serialize};

/// Unique plant key within a store.
pub type PlantName = String;
/// Unique species key within a catalog.
pub type SpeciesName = String;

/// Interval used by the add-plant flow and the raw health check when nothing else is known.
pub const ADD_PLANT_DEFAULT_INTERVAL_DAYS: u32 = 7;
/// Interval used by the seasonal reminder when neither plant nor species provides one.
pub const SEASONAL_FALLBACK_INTERVAL_DAYS: u32 = 14;

/// Timestamp format used for every event log entry.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Date format used for repotting dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar season, northern-hemisphere months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// December through February.
    Winter,
    /// March through May.
    Spring,
    /// June through August.
    Summer,
    /// September through November.
    Autumn,
}

impl Season {
    /// Maps a 1-based month number to its season.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Self::Winter,
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            _ => Self::Autumn,
        }
    }

    /// Watering interval multiplier for the season.
    pub fn watering_multiplier(self) -> f64 {
        match self {
            Self::Winter => 1.5,
            Self::Summer => 0.7,
            Self::Spring | Self::Autumn => 1.0,
        }
    }

    /// Lowercase key used in species seasonal care tables.
    pub fn key(self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
        }
    }
}

/// Tri-state urgency signal derived from watering recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthState {
    /// Watered within the interval.
    Healthy,
    /// At the interval or one day past it.
    Warning,
    /// More than one day past the interval, or never watered.
    Critical,
}

impl HealthState {
    /// Indicator colour name.
    pub fn color(self) -> &'static str {
        match self {
            Self::Healthy => "green",
            Self::Warning => "yellow",
            Self::Critical => "red",
        }
    }
}

/// Countdown to the next watering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WateringReminder {
    /// The plant was never watered.
    NoHistory,
    /// Due date reached or passed; `days_left <= 0`.
    Overdue {
        /// Whole days until the due date.
        days_left: i64,
    },
    /// Due in the future.
    Pending {
        /// Whole days until the due date.
        days_left: i64,
    },
}

/// Countdown to the next scheduled repotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepottingReminder {
    /// No repotting date stored.
    Unset,
    /// The date has passed.
    Overdue {
        /// Whole days until the date (negative).
        days_left: i64,
    },
    /// Zero to seven days away.
    DueSoon {
        /// Whole days until the date.
        days_left: i64,
    },
    /// More than seven days away.
    Scheduled {
        /// Whole days until the date.
        days_left: i64,
    },
}

/// Ordering applied to plant listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Alphabetical by name.
    #[default]
    Name,
    /// Ascending stored watering interval.
    WateringFrequency,
    /// Most recently watered first; never-watered plants last.
    LastWatering,
}
