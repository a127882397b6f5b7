//! Health inference from watering recency.
//!
//! This deliberately uses the plant's stored interval, not the seasonal one
//! the reminder uses.

use chrono::NaiveDateTime;

use crate::{
    plant::Plant,
    schedule::whole_days,
    types::{ADD_PLANT_DEFAULT_INTERVAL_DAYS, HealthState},
};

/// Stored watering interval, or the add-plant default when none was stored.
pub fn raw_interval(plant: &Plant) -> u32 {
    plant
        .watering_frequency
        .unwrap_or(ADD_PLANT_DEFAULT_INTERVAL_DAYS)
}

/// Whole days since the last watering, or `None` without history.
pub fn elapsed_days(plant: &Plant, now: NaiveDateTime) -> Option<i64> {
    plant
        .last_watering()
        .map(|last| whole_days(now - last.date))
}

/// Classifies watering urgency for `plant` at `now`.
pub fn health_state(plant: &Plant, now: NaiveDateTime) -> HealthState {
    let Some(elapsed) = elapsed_days(plant, now) else {
        return HealthState::Critical;
    };
    classify(elapsed, raw_interval(plant))
}

/// Threshold rule shared by the indicator and the tests.
pub fn classify(elapsed: i64, interval: u32) -> HealthState {
    let interval = i64::from(interval);
    if elapsed < interval {
        HealthState::Healthy
    } else if elapsed <= interval + 1 {
        HealthState::Warning
    } else {
        HealthState::Critical
    }
}
