//! Service facade that owns the store, the species catalog, and the sink.
//!
//! Every mutating call applies the write to the store, routes the resulting
//! [`CareOp`] to the achievement counters, and saves the whole document before
//! returning. A rejected write is never saved.

use std::{fmt, path::Path};

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    achievements::AchievementProgress,
    core::store::{PlantStore, StoreError},
    health,
    op::CareOp,
    persist::{DocumentSink, PersistError},
    plant::{PhotoEvent, Plant, PlantDraft, PlantPatch},
    schedule,
    species::{SpeciesCatalog, SpeciesData},
    types::{HealthState, RepottingReminder, Season, WateringReminder},
};

/// Failure of a garden operation.
#[derive(Debug)]
pub enum GardenError {
    /// The write was rejected and nothing was saved.
    Store(StoreError),
    /// The write was applied in memory but saving failed.
    Persist(PersistError),
}

impl fmt::Display for GardenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => err.fmt(f),
            Self::Persist(err) => write!(f, "failed to save care log: {err}"),
        }
    }
}

impl std::error::Error for GardenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Persist(err) => Some(err),
        }
    }
}

impl From<StoreError> for GardenError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<PersistError> for GardenError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

/// Whether a photo's file can still be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoStatus {
    Available,
    NotFound,
}

/// Everything a plant profile view shows, computed at one instant.
#[derive(Debug, Clone)]
pub struct PlantProfile<'a> {
    pub name: &'a str,
    pub plant: &'a Plant,
    /// Species data, empty when unknown or unspecified.
    pub species: &'a SpeciesData,
    /// Indicator state from the raw interval.
    pub health: HealthState,
    /// Seasonal watering countdown.
    pub watering: WateringReminder,
    pub repotting: RepottingReminder,
    /// Seasonally adjusted interval in days.
    pub effective_interval: u32,
    pub season: Season,
    /// Seasonal care text, if the species has any.
    pub seasonal_care: Option<&'a str>,
    /// Fertilizer advice, if the species has any.
    pub fertilizer_advice: Option<&'a str>,
    pub growth_count: usize,
    /// Photos with file availability.
    pub photos: Vec<(&'a PhotoEvent, PhotoStatus)>,
}

/// Care log service: store, catalog, and save-on-every-write persistence.
pub struct Garden<S: DocumentSink> {
    store: PlantStore,
    catalog: SpeciesCatalog,
    sink: S,
}

impl<S: DocumentSink> Garden<S> {
    /// Loads the store from `sink`, then saves it back.
    ///
    /// A missing document starts an empty store. So does one that is not JSON
    /// at all, after the sink has moved it aside. I/O failures are returned.
    pub fn open(mut sink: S, catalog: SpeciesCatalog) -> Result<Self, GardenError> {
        let store = match sink.load() {
            Ok(Some(doc)) => {
                tracing::debug!(plants = doc.cactuses.len(), "care log loaded");
                PlantStore::from_document(doc)
            }
            Ok(None) => {
                tracing::info!("no care log found, starting fresh");
                PlantStore::new()
            }
            Err(PersistError::Corrupt(err)) => {
                tracing::warn!(error = %err, "care log is not valid JSON, moving it aside and starting fresh");
                sink.preserve_unreadable()?;
                PlantStore::new()
            }
            Err(err) => return Err(err.into()),
        };

        let mut garden = Self { store, catalog, sink };
        garden.save()?;
        Ok(garden)
    }

    pub fn store(&self) -> &PlantStore {
        &self.store
    }

    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Adds a plant. Without an explicit interval the species base applies, or 7 days.
    pub fn add_plant(
        &mut self,
        name: &str,
        species: Option<&str>,
        interval: Option<u32>,
        now: NaiveDateTime,
    ) -> Result<CareOp, GardenError> {
        let watering_frequency = interval.unwrap_or_else(|| self.catalog.default_interval(species));
        let result = self.store.add_plant(PlantDraft {
            name: name.to_string(),
            species: species.map(str::to_string),
            watering_frequency,
        });
        self.commit(result, now)
    }

    pub fn water(&mut self, name: &str, comment: &str, now: NaiveDateTime) -> Result<CareOp, GardenError> {
        let result = self.store.record_watering(name, comment, now);
        self.commit(result, now)
    }

    /// Records the same watering for every named plant.
    pub fn bulk_water<N: AsRef<str>>(
        &mut self,
        names: &[N],
        comment: &str,
        now: NaiveDateTime,
    ) -> Result<CareOp, GardenError> {
        let result = self.store.bulk_water(names, comment, now);
        self.commit(result, now)
    }

    /// Records a height measurement in centimeters.
    pub fn record_growth(
        &mut self,
        name: &str,
        height: f64,
        comment: &str,
        now: NaiveDateTime,
    ) -> Result<CareOp, GardenError> {
        let result = self.store.record_growth(name, height, comment, now);
        self.commit(result, now)
    }

    pub fn add_photo(&mut self, name: &str, path: &str, now: NaiveDateTime) -> Result<CareOp, GardenError> {
        let result = self.store.add_photo(name, path, now);
        self.commit(result, now)
    }

    pub fn fertilize(
        &mut self,
        name: &str,
        fertilizer: &str,
        dosage: &str,
        comment: &str,
        now: NaiveDateTime,
    ) -> Result<CareOp, GardenError> {
        let result = self
            .store
            .record_fertilizer(name, fertilizer, dosage, comment, now);
        self.commit(result, now)
    }

    /// Records the same fertilizer application for every named plant.
    pub fn bulk_fertilize<N: AsRef<str>>(
        &mut self,
        names: &[N],
        fertilizer: &str,
        dosage: &str,
        comment: &str,
        now: NaiveDateTime,
    ) -> Result<CareOp, GardenError> {
        let result = self
            .store
            .bulk_fertilize(names, fertilizer, dosage, comment, now);
        self.commit(result, now)
    }

    pub fn schedule_repotting(
        &mut self,
        name: &str,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<CareOp, GardenError> {
        let result = self.store.schedule_repotting(name, date);
        self.commit(result, now)
    }

    pub fn edit_notes(&mut self, name: &str, notes: &str, now: NaiveDateTime) -> Result<CareOp, GardenError> {
        self.patch(
            name,
            PlantPatch {
                notes: Some(notes.to_string()),
                ..PlantPatch::default()
            },
            now,
        )
    }

    /// Overrides the watering interval in days.
    pub fn set_watering_interval(
        &mut self,
        name: &str,
        days: u32,
        now: NaiveDateTime,
    ) -> Result<CareOp, GardenError> {
        self.patch(
            name,
            PlantPatch {
                watering_frequency: Some(days),
                ..PlantPatch::default()
            },
            now,
        )
    }

    pub fn patch(&mut self, name: &str, patch: PlantPatch, now: NaiveDateTime) -> Result<CareOp, GardenError> {
        let result = self.store.patch(name, patch);
        self.commit(result, now)
    }

    /// Runs the stable watering check and saves.
    pub fn check_achievements(&mut self, now: NaiveDateTime) -> Result<(), GardenError> {
        self.store.check_stable_watering(now);
        self.save()
    }

    /// Profile view: runs the achievement check, then computes the profile.
    /// An unknown name fails before the check runs.
    pub fn view_profile(&mut self, name: &str, now: NaiveDateTime) -> Result<PlantProfile<'_>, GardenError> {
        if !self.store.contains(name) {
            return Err(StoreError::MissingPlant(name.to_string()).into());
        }
        self.check_achievements(now)?;
        self.profile(name, now)
    }

    /// Progress rows as last checked. Does not run the stable watering check.
    pub fn achievement_progress(&self) -> Vec<AchievementProgress> {
        self.store.achievements().progress()
    }

    /// Computes a plant profile without touching achievement state.
    pub fn profile(&self, name: &str, now: NaiveDateTime) -> Result<PlantProfile<'_>, GardenError> {
        let (name, plant) = self
            .store
            .plants()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| StoreError::MissingPlant(name.to_string()))?;
        let species = plant
            .species
            .as_deref()
            .map_or(self.catalog.get(""), |s| self.catalog.get(s));
        let today = now.date();
        let season = schedule::season_on(today);

        Ok(PlantProfile {
            name,
            plant,
            species,
            health: health::health_state(plant, now),
            watering: schedule::days_until_next_watering(plant, &self.catalog, now),
            repotting: schedule::days_until_repotting(plant, now),
            effective_interval: schedule::effective_watering_interval(plant, &self.catalog, today),
            season,
            seasonal_care: schedule::seasonal_care(species, season),
            fertilizer_advice: species.fertilizer_recommendation.as_deref(),
            growth_count: plant.growth.len(),
            photos: photo_availability(plant),
        })
    }

    fn commit(&mut self, result: Result<CareOp, StoreError>, now: NaiveDateTime) -> Result<CareOp, GardenError> {
        let op = match result {
            Ok(op) => op,
            Err(err) => {
                tracing::debug!(error = %err, "care write rejected");
                return Err(err.into());
            }
        };
        self.store.observe(&op, now);
        self.save()?;
        tracing::info!(op = op.kind(), "care log updated");
        Ok(op)
    }

    fn save(&mut self) -> Result<(), GardenError> {
        self.sink.save(&self.store.export_document())?;
        Ok(())
    }
}

/// Checks every photo path of `plant` on disk.
pub fn photo_availability(plant: &Plant) -> Vec<(&PhotoEvent, PhotoStatus)> {
    plant
        .photos
        .iter()
        .map(|photo| {
            let status = if Path::new(&photo.path).exists() {
                PhotoStatus::Available
            } else {
                PhotoStatus::NotFound
            };
            (photo, status)
        })
        .collect()
}
