//! Achievement state records and the progress rules that advance them.
//!
//! Every record carries a `completed` flag that only ever moves from `false`
//! to `true`. Counters may keep moving after completion (photo and repotting
//! counts keep accumulating, the streak resets on a missed watering), but the
//! flag stays set.

use chrono::{NaiveDate, NaiveDateTime};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{health, op::CareOp, persist::lenient, plant::Plant, types::PlantName};

/// Consecutive on-time days needed for stable watering.
pub const STABLE_WATERING_TARGET_DAYS: u32 = 30;
/// Store-wide photos needed for the photo collector.
pub const PHOTO_COLLECTOR_TARGET: u32 = 10;
/// Already-due repotting schedules needed for repotting master.
pub const REPOTTING_MASTER_TARGET: u32 = 3;
/// Growth measurements on a single plant needed for growth master.
pub const GROWTH_MASTER_TARGET: u32 = 5;

/// Streak of days where every plant was watered on time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StableWatering {
    /// Set once the streak reaches the target.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub completed: bool,
    /// Current streak length.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub days: u32,
    /// Calendar day of the last streak increment.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_checked: Option<NaiveDate>,
}

/// Store-wide photo counter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhotoCollector {
    /// Set once the count reaches the target.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub completed: bool,
    /// Photos added since the store was created.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub photos: u32,
}

/// Counter of repotting dates scheduled for today or earlier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepottingMaster {
    /// Set once the count reaches the target.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub completed: bool,
    /// Schedules that targeted a non-future date.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub repottings: u32,
}

/// Per-plant growth measurement counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrowthMaster {
    /// Set the first time any plant reaches the target.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub completed: bool,
    /// Growth event count by plant name.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub growths: HashMap<PlantName, u32>,
}

/// All achievement records owned by the plant store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AchievementState {
    /// Stable watering streak.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub stable_watering: StableWatering,
    /// Photo collector.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub photo_collector: PhotoCollector,
    /// Repotting master.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub repotting_master: RepottingMaster,
    /// Growth master.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub growth_master: GrowthMaster,
}

/// Achievement identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementKind {
    /// Thirty days without a missed watering.
    StableWatering,
    /// Ten photos added.
    PhotoCollector,
    /// Three already-due repottings scheduled.
    RepottingMaster,
    /// Five growth measurements on one plant.
    GrowthMaster,
}

impl AchievementKind {
    /// Human-readable title and goal.
    pub fn title(self) -> &'static str {
        match self {
            Self::StableWatering => "Stable gardener: 30 days without a missed watering",
            Self::PhotoCollector => "Cactus photographer: add 10 photos",
            Self::RepottingMaster => "Repotting master: repot 3 cactuses",
            Self::GrowthMaster => "Growth master: 5 growth measurements for one cactus",
        }
    }
}

/// Display row for one achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementProgress {
    /// Which achievement.
    pub kind: AchievementKind,
    /// Completion flag.
    pub completed: bool,
    /// Current counter value.
    pub current: u32,
    /// Counter value that completes it.
    pub target: u32,
}

impl AchievementState {
    /// Progress rows in display order.
    pub fn progress(&self) -> Vec<AchievementProgress> {
        let best_growth = self.growth_master.growths.values().copied().max().unwrap_or(0);
        vec![
            AchievementProgress {
                kind: AchievementKind::StableWatering,
                completed: self.stable_watering.completed,
                current: self.stable_watering.days,
                target: STABLE_WATERING_TARGET_DAYS,
            },
            AchievementProgress {
                kind: AchievementKind::PhotoCollector,
                completed: self.photo_collector.completed,
                current: self.photo_collector.photos,
                target: PHOTO_COLLECTOR_TARGET,
            },
            AchievementProgress {
                kind: AchievementKind::RepottingMaster,
                completed: self.repotting_master.completed,
                current: self.repotting_master.repottings,
                target: REPOTTING_MASTER_TARGET,
            },
            AchievementProgress {
                kind: AchievementKind::GrowthMaster,
                completed: self.growth_master.completed,
                current: best_growth,
                target: GROWTH_MASTER_TARGET,
            },
        ]
    }

    /// Completion flags in display order.
    pub fn completion_flags(&self) -> [bool; 4] {
        [
            self.stable_watering.completed,
            self.photo_collector.completed,
            self.repotting_master.completed,
            self.growth_master.completed,
        ]
    }
}

/// Advances the counters affected by `op`.
///
/// `plants` must already reflect the op.
pub fn observe_op(
    state: &mut AchievementState,
    plants: &HashMap<PlantName, Plant>,
    op: &CareOp,
    today: NaiveDate,
) {
    match op {
        CareOp::PhotoAdded { .. } => {
            let rec = &mut state.photo_collector;
            rec.photos = rec.photos.saturating_add(1);
            if rec.photos >= PHOTO_COLLECTOR_TARGET && !rec.completed {
                rec.completed = true;
                tracing::info!("photo collector achievement completed");
            }
        }
        CareOp::RepottingScheduled { date, .. } => {
            if *date > today {
                return;
            }
            let rec = &mut state.repotting_master;
            rec.repottings = rec.repottings.saturating_add(1);
            if rec.repottings >= REPOTTING_MASTER_TARGET && !rec.completed {
                rec.completed = true;
                tracing::info!("repotting master achievement completed");
            }
        }
        CareOp::GrowthRecorded { name, .. } => {
            let Some(plant) = plants.get(name) else {
                return;
            };
            let count = u32::try_from(plant.growth.len()).unwrap_or(u32::MAX);
            let rec = &mut state.growth_master;
            rec.growths.insert(name.clone(), count);
            if count >= GROWTH_MASTER_TARGET && !rec.completed {
                rec.completed = true;
                tracing::info!(plant = %name, "growth master achievement completed");
            }
        }
        CareOp::PlantAdded { .. }
        | CareOp::Watered { .. }
        | CareOp::Fertilized { .. }
        | CareOp::Patched { .. } => {}
    }
}

/// Runs the stable-watering streak check over every plant.
///
/// A plant past `interval + 1` days resets the streak on any call. The
/// increment happens at most once per calendar day.
pub fn check_stable_watering<'a>(
    state: &mut StableWatering,
    plants: impl IntoIterator<Item = &'a Plant>,
    now: NaiveDateTime,
) {
    let all_on_time = plants.into_iter().all(|plant| match health::elapsed_days(plant, now) {
        Some(elapsed) => elapsed <= i64::from(health::raw_interval(plant)) + 1,
        None => true,
    });

    if !all_on_time {
        if state.days != 0 {
            tracing::debug!(streak = state.days, "stable watering streak reset");
        }
        state.days = 0;
        return;
    }

    if state.completed {
        return;
    }

    let today = now.date();
    if state.last_checked == Some(today) {
        return;
    }
    state.last_checked = Some(today);
    state.days = state.days.saturating_add(1);
    if state.days >= STABLE_WATERING_TARGET_DAYS {
        state.completed = true;
        tracing::info!("stable watering achievement completed");
    }
}
