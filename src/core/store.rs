use std::{cmp::Reverse, fmt};

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use hashbrown::HashMap;

use crate::{
    achievements::{self, AchievementState},
    op::CareOp,
    persist::document::{CURRENT_DOCUMENT_VERSION, StoreDocument},
    plant::{FertilizerEvent, GrowthEvent, PhotoEvent, Plant, PlantDraft, PlantPatch, WateringEvent},
    types::{PlantName, SortKey},
};

/// Reasons a store write is rejected. A rejected write leaves the store untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    MissingPlant(PlantName),
    AlreadyExists(PlantName),
    EmptyName,
    InvalidHeight(f64),
    InvalidInterval,
    MissingField(&'static str),
    EmptySelection,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPlant(name) => write!(f, "no plant named '{name}'"),
            Self::AlreadyExists(name) => write!(f, "a plant named '{name}' already exists"),
            Self::EmptyName => f.write_str("plant name is empty"),
            Self::InvalidHeight(h) => write!(f, "height must be a positive number, got {h}"),
            Self::InvalidInterval => f.write_str("watering interval must be positive"),
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::EmptySelection => f.write_str("select at least one plant"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Authoritative in-memory plant records and achievement state.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlantStore {
    plants: HashMap<PlantName, Plant>,
    achievements: AchievementState,
}

impl PlantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(doc: StoreDocument) -> Self {
        Self {
            plants: doc.cactuses.into_iter().collect(),
            achievements: doc.achievements,
        }
    }

    pub fn export_document(&self) -> StoreDocument {
        StoreDocument {
            version: CURRENT_DOCUMENT_VERSION,
            cactuses: self
                .plants
                .iter()
                .map(|(name, plant)| (name.clone(), plant.clone()))
                .collect(),
            achievements: self.achievements.clone(),
        }
    }

    /// Creates a plant. Names are trimmed and must be unique.
    pub fn add_plant(&mut self, draft: PlantDraft) -> Result<CareOp, StoreError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.plants.contains_key(&name) {
            return Err(StoreError::AlreadyExists(name));
        }
        if draft.watering_frequency == 0 {
            return Err(StoreError::InvalidInterval);
        }

        let species = draft
            .species
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let plant = Plant {
            species,
            watering_frequency: Some(draft.watering_frequency),
            ..Plant::default()
        };
        self.plants.insert(name.clone(), plant);
        Ok(CareOp::PlantAdded { name })
    }

    pub fn record_watering(
        &mut self,
        name: &str,
        comment: &str,
        at: NaiveDateTime,
    ) -> Result<CareOp, StoreError> {
        self.bulk_water(&[name], comment, at)
    }

    /// Appends a watering event to every selected plant, or to none if any name is unknown.
    pub fn bulk_water<S: AsRef<str>>(
        &mut self,
        names: &[S],
        comment: &str,
        at: NaiveDateTime,
    ) -> Result<CareOp, StoreError> {
        let names = self.resolve_selection(names)?;
        let date = to_minute(at);
        for name in &names {
            if let Some(plant) = self.plants.get_mut(name) {
                plant.watering.push(WateringEvent {
                    date,
                    comment: comment.to_string(),
                });
            }
        }
        Ok(CareOp::Watered { names, at: date })
    }

    pub fn record_growth(
        &mut self,
        name: &str,
        height: f64,
        comment: &str,
        at: NaiveDateTime,
    ) -> Result<CareOp, StoreError> {
        if !height.is_finite() || height <= 0.0 {
            return Err(StoreError::InvalidHeight(height));
        }
        let plant = self.plant_mut(name)?;
        plant.growth.push(GrowthEvent {
            date: to_minute(at),
            height,
            comment: comment.to_string(),
        });
        Ok(CareOp::GrowthRecorded {
            name: name.to_string(),
            height,
        })
    }

    pub fn add_photo(&mut self, name: &str, path: &str, at: NaiveDateTime) -> Result<CareOp, StoreError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(StoreError::MissingField("photo path"));
        }
        let plant = self.plant_mut(name)?;
        plant.photos.push(PhotoEvent {
            date: to_minute(at),
            path: path.to_string(),
        });
        Ok(CareOp::PhotoAdded {
            name: name.to_string(),
            path: path.to_string(),
        })
    }

    pub fn record_fertilizer(
        &mut self,
        name: &str,
        fertilizer: &str,
        dosage: &str,
        comment: &str,
        at: NaiveDateTime,
    ) -> Result<CareOp, StoreError> {
        self.bulk_fertilize(&[name], fertilizer, dosage, comment, at)
    }

    /// Appends a fertilizer event to every selected plant, or to none if validation fails.
    pub fn bulk_fertilize<S: AsRef<str>>(
        &mut self,
        names: &[S],
        fertilizer: &str,
        dosage: &str,
        comment: &str,
        at: NaiveDateTime,
    ) -> Result<CareOp, StoreError> {
        let fertilizer = fertilizer.trim();
        let dosage = dosage.trim();
        if fertilizer.is_empty() {
            return Err(StoreError::MissingField("fertilizer type"));
        }
        if dosage.is_empty() {
            return Err(StoreError::MissingField("dosage"));
        }
        let names = self.resolve_selection(names)?;
        let date = to_minute(at);
        for name in &names {
            if let Some(plant) = self.plants.get_mut(name) {
                plant.fertilizers.push(FertilizerEvent {
                    date,
                    fertilizer: fertilizer.to_string(),
                    dosage: dosage.to_string(),
                    comment: comment.to_string(),
                });
            }
        }
        Ok(CareOp::Fertilized { names })
    }

    /// Stores the next repotting date, replacing any previous one.
    pub fn schedule_repotting(&mut self, name: &str, date: NaiveDate) -> Result<CareOp, StoreError> {
        let plant = self.plant_mut(name)?;
        plant.next_repotting = Some(date);
        Ok(CareOp::RepottingScheduled {
            name: name.to_string(),
            date,
        })
    }

    /// Overwrites the fields set in `patch`.
    pub fn patch(&mut self, name: &str, patch: PlantPatch) -> Result<CareOp, StoreError> {
        if patch.watering_frequency == Some(0) {
            return Err(StoreError::InvalidInterval);
        }
        let plant = self.plant_mut(name)?;
        patch.apply_to(plant);
        Ok(CareOp::Patched {
            name: name.to_string(),
            patch,
        })
    }

    /// Routes an applied op to the achievement counters.
    pub fn observe(&mut self, op: &CareOp, now: NaiveDateTime) {
        achievements::observe_op(&mut self.achievements, &self.plants, op, now.date());
    }

    pub fn check_stable_watering(&mut self, now: NaiveDateTime) {
        achievements::check_stable_watering(
            &mut self.achievements.stable_watering,
            self.plants.values(),
            now,
        );
    }

    pub fn get(&self, name: &str) -> Option<&Plant> {
        self.plants.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plants.contains_key(name)
    }

    /// Arbitrary order.
    pub fn plants(&self) -> impl Iterator<Item = (&str, &Plant)> {
        self.plants.iter().map(|(name, plant)| (name.as_str(), plant))
    }

    pub fn names(&self) -> Vec<&str> {
        self.sorted_names(SortKey::Name)
    }

    /// Plant names in the requested order, ties broken by name.
    pub fn sorted_names(&self, key: SortKey) -> Vec<&str> {
        let mut entries: Vec<(&str, &Plant)> = self.plants().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        match key {
            SortKey::Name => {}
            SortKey::WateringFrequency => {
                entries.sort_by_key(|(_, plant)| plant.watering_frequency.unwrap_or(u32::MAX));
            }
            SortKey::LastWatering => {
                entries.sort_by_key(|(_, plant)| Reverse(plant.last_watering().map(|w| w.date)));
            }
        }
        entries.into_iter().map(|(name, _)| name).collect()
    }

    pub fn achievements(&self) -> &AchievementState {
        &self.achievements
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    fn plant_mut(&mut self, name: &str) -> Result<&mut Plant, StoreError> {
        self.plants
            .get_mut(name)
            .ok_or_else(|| StoreError::MissingPlant(name.to_string()))
    }

    fn resolve_selection<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<PlantName>, StoreError> {
        if names.is_empty() {
            return Err(StoreError::EmptySelection);
        }
        let mut out: Vec<PlantName> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if !self.plants.contains_key(name) {
                return Err(StoreError::MissingPlant(name.to_string()));
            }
            if !out.iter().any(|n| n == name) {
                out.push(name.to_string());
            }
        }
        Ok(out)
    }
}

fn to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}
