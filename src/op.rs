//! Description of each mutation applied to the plant store.

use chrono::{NaiveDate, NaiveDateTime};

use crate::{plant::PlantPatch, types::PlantName};

/// Applied mutation, returned by every store write and routed to the achievement tracker.
#[derive(Debug, Clone, PartialEq)]
pub enum CareOp {
    /// A plant was created.
    PlantAdded {
        /// New plant name.
        name: PlantName,
    },
    /// Watering events were appended.
    Watered {
        /// Plants that received a watering event.
        names: Vec<PlantName>,
        /// Event timestamp.
        at: NaiveDateTime,
    },
    /// A growth measurement was appended.
    GrowthRecorded {
        /// Measured plant.
        name: PlantName,
        /// Height in centimeters.
        height: f64,
    },
    /// A photo reference was appended.
    PhotoAdded {
        /// Photographed plant.
        name: PlantName,
        /// Image path.
        path: String,
    },
    /// Fertilizer events were appended.
    Fertilized {
        /// Plants that received a fertilizer event.
        names: Vec<PlantName>,
    },
    /// A repotting date was stored.
    RepottingScheduled {
        /// Plant to repot.
        name: PlantName,
        /// Scheduled date.
        date: NaiveDate,
    },
    /// Plain fields were edited.
    Patched {
        /// Edited plant.
        name: PlantName,
        /// Fields that were written.
        patch: PlantPatch,
    },
}

impl CareOp {
    /// Short kind label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlantAdded { .. } => "plant_added",
            Self::Watered { .. } => "watered",
            Self::GrowthRecorded { .. } => "growth_recorded",
            Self::PhotoAdded { .. } => "photo_added",
            Self::Fertilized { .. } => "fertilized",
            Self::RepottingScheduled { .. } => "repotting_scheduled",
            Self::Patched { .. } => "patched",
        }
    }
}
