//! Seasonal watering interval and reminder countdowns.
//!
//! Every function takes the current time explicitly; nothing here reads the
//! system clock or caches a season.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::{
    plant::Plant,
    species::{SpeciesCatalog, SpeciesData},
    types::{RepottingReminder, SEASONAL_FALLBACK_INTERVAL_DAYS, Season, WateringReminder},
};

const SECONDS_PER_DAY: i64 = 86_400;
/// Repotting within this many days counts as due soon.
pub const REPOTTING_DUE_SOON_DAYS: i64 = 7;

/// Whole days in `delta`, rounded toward negative infinity.
pub fn whole_days(delta: TimeDelta) -> i64 {
    delta.num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Season of the calendar date `today`.
pub fn season_on(today: NaiveDate) -> Season {
    Season::from_month(today.month())
}

/// Watering interval multiplier for `season`.
pub fn seasonal_multiplier(season: Season) -> f64 {
    season.watering_multiplier()
}

/// Applies the seasonal multiplier to `base`, truncating toward zero.
pub fn seasonal_interval(base: u32, season: Season) -> u32 {
    (f64::from(base) * seasonal_multiplier(season)) as u32
}

/// Interval before seasonal adjustment: plant override, species base, then the fallback.
pub fn base_interval(plant: &Plant, catalog: &SpeciesCatalog) -> u32 {
    plant
        .watering_frequency
        .or_else(|| {
            plant
                .species
                .as_deref()
                .and_then(|name| catalog.lookup(name))
                .and_then(SpeciesData::base_interval)
        })
        .unwrap_or(SEASONAL_FALLBACK_INTERVAL_DAYS)
}

/// Seasonally adjusted watering interval for `plant` on `today`.
pub fn effective_watering_interval(plant: &Plant, catalog: &SpeciesCatalog, today: NaiveDate) -> u32 {
    seasonal_interval(base_interval(plant, catalog), season_on(today))
}

/// Countdown to the next watering using the seasonal interval.
pub fn days_until_next_watering(
    plant: &Plant,
    catalog: &SpeciesCatalog,
    now: NaiveDateTime,
) -> WateringReminder {
    let Some(last) = plant.last_watering() else {
        return WateringReminder::NoHistory;
    };
    let interval = effective_watering_interval(plant, catalog, now.date());
    let due = last.date + TimeDelta::days(i64::from(interval));
    let days_left = whole_days(due - now);
    if days_left <= 0 {
        WateringReminder::Overdue { days_left }
    } else {
        WateringReminder::Pending { days_left }
    }
}

/// Countdown to the stored repotting date, measured from midnight of that date.
pub fn days_until_repotting(plant: &Plant, now: NaiveDateTime) -> RepottingReminder {
    let Some(date) = plant.next_repotting else {
        return RepottingReminder::Unset;
    };
    let days_left = whole_days(date.and_time(NaiveTime::MIN) - now);
    if days_left < 0 {
        RepottingReminder::Overdue { days_left }
    } else if days_left <= REPOTTING_DUE_SOON_DAYS {
        RepottingReminder::DueSoon { days_left }
    } else {
        RepottingReminder::Scheduled { days_left }
    }
}

/// Seasonal care recommendation for `species` in `season`.
pub fn seasonal_care(species: &SpeciesData, season: Season) -> Option<&str> {
    species.seasonal_care.for_season(season)
}

/// General cactus care advice shown alongside profiles.
pub fn care_tips() -> &'static str {
    "Cactus care tips\n\
     \n\
     1. Watering\n\
     - Most cactuses need infrequent watering: every 7-14 days in summer, every 3-4 weeks in winter.\n\
     - Let the soil dry out completely between waterings.\n\
     - Use room-temperature water and never leave the pot standing in water.\n\
     \n\
     2. Light\n\
     - Cactuses love bright light; south or east windows suit them best.\n\
     - Winter may call for supplemental grow lights.\n\
     \n\
     3. Temperature\n\
     - 20-30°C in summer.\n\
     - 10-15°C in winter for the dormancy period.\n\
     \n\
     4. Soil\n\
     - Use a well-drained mix of sand, perlite and soil in equal parts.\n\
     - The pot must have drainage holes.\n\
     \n\
     5. Fertilizer\n\
     - Feed once a month in spring and summer with a low-nitrogen cactus fertilizer.\n\
     \n\
     6. Repotting\n\
     - Repot every 1-2 years in spring once the pot becomes cramped.\n"
}
