//! Plant record, event log entries, draft, and patch types.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, de::Error};

use crate::{
    persist::lenient,
    types::{PlantName, SpeciesName},
};

/// One watering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WateringEvent {
    /// When the plant was watered.
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    /// Free-text comment.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub comment: String,
}

/// One height measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthEvent {
    /// When the measurement was taken.
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    /// Height in centimeters.
    #[serde(deserialize_with = "positive_height")]
    pub height: f64,
    /// Free-text comment.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub comment: String,
}

/// One photo reference. The image itself lives outside the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoEvent {
    /// When the photo was added.
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    /// Filesystem path of the image.
    pub path: String,
}

/// One fertilizer application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerEvent {
    /// When the fertilizer was applied.
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    /// Fertilizer product or type.
    #[serde(rename = "type")]
    pub fertilizer: String,
    /// Dosage as entered, e.g. `5 ml/l`.
    pub dosage: String,
    /// Free-text comment.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub comment: String,
}

/// Authoritative plant record with its append-only event logs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Plant {
    /// Species key; `None` when unspecified.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub species: Option<SpeciesName>,
    /// User-set watering interval in days.
    #[serde(default, deserialize_with = "lenient::interval")]
    pub watering_frequency: Option<u32>,
    /// Next planned repotting date.
    #[serde(default, with = "optional_date")]
    pub next_repotting: Option<NaiveDate>,
    /// Free-text notes.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub notes: String,
    /// Watering log, oldest first.
    #[serde(default, deserialize_with = "lenient::events")]
    pub watering: Vec<WateringEvent>,
    /// Growth log, oldest first.
    #[serde(default, deserialize_with = "lenient::events")]
    pub growth: Vec<GrowthEvent>,
    /// Photo log, oldest first.
    #[serde(default, deserialize_with = "lenient::events")]
    pub photos: Vec<PhotoEvent>,
    /// Fertilizer log, oldest first.
    #[serde(default, deserialize_with = "lenient::events")]
    pub fertilizers: Vec<FertilizerEvent>,
}

impl Plant {
    /// Most recent watering, if any.
    pub fn last_watering(&self) -> Option<&WateringEvent> {
        self.watering.last()
    }

    /// Tallest recorded height in centimeters.
    pub fn max_height(&self) -> Option<f64> {
        self.growth.iter().map(|g| g.height).reduce(f64::max)
    }
}

/// Insert payload used to create a new [`Plant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantDraft {
    /// Unique plant name.
    pub name: PlantName,
    /// Species key, if chosen.
    pub species: Option<SpeciesName>,
    /// Watering interval in days.
    pub watering_frequency: u32,
}

/// Sparse field edit where each `Some` overwrites the record value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlantPatch {
    /// Replacement notes.
    pub notes: Option<String>,
    /// Replacement watering interval.
    pub watering_frequency: Option<u32>,
    /// Replacement species key.
    pub species: Option<SpeciesName>,
}

impl PlantPatch {
    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies this patch in place to `plant`.
    pub fn apply_to(&self, plant: &mut Plant) {
        if let Some(v) = &self.notes {
            plant.notes = v.clone();
        }
        if let Some(v) = self.watering_frequency {
            plant.watering_frequency = Some(v);
        }
        if let Some(v) = &self.species {
            plant.species = Some(v.clone());
        }
    }
}

fn positive_height<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let height = Option::<f64>::deserialize(deserializer)?;
    match height {
        Some(h) if h.is_finite() && h > 0.0 => Ok(h),
        other => Err(D::Error::custom(format!("height must be a positive number, got {other:?}"))),
    }
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::types::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(D::Error::custom)
    }
}

mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::DATE_FORMAT;

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        let parsed = match &raw {
            serde_json::Value::Null => return Ok(None),
            serde_json::Value::String(s) if s.trim().is_empty() => return Ok(None),
            serde_json::Value::String(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok(),
            _ => None,
        };
        if parsed.is_none() {
            tracing::warn!(value = %raw, "invalid repotting date dropped");
        }
        Ok(parsed)
    }
}
