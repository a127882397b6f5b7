//! Static species reference data and its on-disk catalog.

use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    persist::json::{read_json, write_json_atomic},
    types::{ADD_PLANT_DEFAULT_INTERVAL_DAYS, Season, SpeciesName},
};

/// Care text for each season.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeasonalCare {
    /// December through February.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winter: Option<String>,
    /// March through May.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spring: Option<String>,
    /// June through August.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summer: Option<String>,
    /// September through November.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autumn: Option<String>,
}

impl SeasonalCare {
    /// Text for `season`, if the catalog has any.
    pub fn for_season(&self, season: Season) -> Option<&str> {
        match season {
            Season::Winter => self.winter.as_deref(),
            Season::Spring => self.spring.as_deref(),
            Season::Summer => self.summer.as_deref(),
            Season::Autumn => self.autumn.as_deref(),
        }
    }
}

/// Reference care data for one species. Every field may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpeciesData {
    /// Common (vernacular) name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// Base watering interval in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watering_frequency: Option<u32>,
    /// Light needs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_requirements: Option<String>,
    /// Comfortable temperature range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_range: Option<String>,
    /// Preferred soil mix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
    /// Fertilizer advice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fertilizer_recommendation: Option<String>,
    /// Per-season care text.
    #[serde(default)]
    pub seasonal_care: SeasonalCare,
}

impl SpeciesData {
    /// Positive base interval, if the catalog provides one.
    pub fn base_interval(&self) -> Option<u32> {
        self.watering_frequency.filter(|days| *days > 0)
    }
}

/// Species lookup table keyed by exact name.
#[derive(Debug, Clone, Default)]
pub struct SpeciesCatalog {
    entries: HashMap<SpeciesName, SpeciesData>,
    fallback: SpeciesData,
}

impl SpeciesCatalog {
    /// Builds a catalog from explicit entries.
    pub fn from_entries(entries: HashMap<SpeciesName, SpeciesData>) -> Self {
        Self {
            entries,
            fallback: SpeciesData::default(),
        }
    }

    /// Built-in species set used on first run.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "Echinocactus grusonii".to_string(),
            species(
                "Golden barrel",
                14,
                "Bright direct light",
                "15-30°C",
                "Sandy, well-drained",
                "Low-nitrogen cactus fertilizer once a month in spring and summer",
                [
                    "Water once every 3-4 weeks, keep at 10-15°C",
                    "Resume regular watering, move to the brightest window",
                    "Water when the soil is fully dry, protect from midday scorch",
                    "Reduce watering gradually before dormancy",
                ],
            ),
        );
        entries.insert(
            "Opuntia microdasys".to_string(),
            species(
                "Bunny ears",
                10,
                "Bright diffused light",
                "18-28°C",
                "Sand and perlite mix",
                "Half-strength liquid fertilizer every 3 weeks during growth",
                [
                    "Keep almost dry and cool to encourage flowering",
                    "Start light watering and repot if pads crowd the pot",
                    "Water generously once the soil dries, fertilize during growth",
                    "Cut watering back and stop fertilizing",
                ],
            ),
        );
        entries.insert(
            "Mammillaria elongata".to_string(),
            species(
                "Golden lace cactus",
                12,
                "Bright light, partial shade",
                "15-25°C",
                "Loose, well-drained",
                "Phosphorus-rich cactus fertilizer monthly from March to August",
                [
                    "Keep dry and cool, water only if stems shrivel",
                    "Increase light slowly to avoid sunburn",
                    "Regular watering after the soil dries, good airflow",
                    "Water sparingly and prepare for winter rest",
                ],
            ),
        );
        Self::from_entries(entries)
    }

    /// Loads the catalog at `path`, writing the built-in set if the file is missing or unreadable.
    pub fn load_or_bootstrap(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match read_json::<HashMap<SpeciesName, SpeciesData>>(path) {
            Ok(Some(entries)) => {
                tracing::debug!(path = %path.display(), count = entries.len(), "species catalog loaded");
                return Self::from_entries(entries);
            }
            Ok(None) => {
                tracing::info!(path = %path.display(), "species catalog missing, writing built-in set");
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "species catalog unreadable, writing built-in set");
            }
        }

        let catalog = Self::builtin();
        if let Err(err) = write_json_atomic(path, &catalog.entries) {
            tracing::warn!(path = %path.display(), error = %err, "failed to persist built-in species catalog");
        }
        catalog
    }

    /// Data for `name`, or an empty record for unknown species.
    pub fn get(&self, name: &str) -> &SpeciesData {
        self.entries.get(name).unwrap_or(&self.fallback)
    }

    /// Data for `name` only when the species is known.
    pub fn lookup(&self, name: &str) -> Option<&SpeciesData> {
        self.entries.get(name)
    }

    /// Species names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Interval the add-plant flow proposes for `species`.
    pub fn default_interval(&self, species: Option<&str>) -> u32 {
        species
            .and_then(|name| self.lookup(name))
            .and_then(SpeciesData::base_interval)
            .unwrap_or(ADD_PLANT_DEFAULT_INTERVAL_DAYS)
    }

    /// Number of known species.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the catalog has no species.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn species(
    common_name: &str,
    watering_frequency: u32,
    light: &str,
    temperature: &str,
    soil: &str,
    fertilizer: &str,
    [winter, spring, summer, autumn]: [&str; 4],
) -> SpeciesData {
    SpeciesData {
        common_name: Some(common_name.to_string()),
        watering_frequency: Some(watering_frequency),
        light_requirements: Some(light.to_string()),
        temperature_range: Some(temperature.to_string()),
        soil_type: Some(soil.to_string()),
        fertilizer_recommendation: Some(fertilizer.to_string()),
        seasonal_care: SeasonalCare {
            winter: Some(winter.to_string()),
            spring: Some(spring.to_string()),
            summer: Some(summer.to_string()),
            autumn: Some(autumn.to_string()),
        },
    }
}
