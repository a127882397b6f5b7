//! Symptom-to-cause lookup over a static rule table.

use std::{fmt, str::FromStr};

/// Observable symptom, declared in canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symptom {
    /// Body turning yellow.
    Yellowing,
    /// Soft, mushy base or stem.
    SoftBase,
    /// Wrinkled or shrivelled body.
    Wrinkling,
    /// Brown spots on the skin.
    BrownSpots,
    /// White cottony tufts.
    WhiteCottonySpots,
    /// Pale, stretched new growth.
    Etiolation,
    /// No new growth during the season.
    NotGrowing,
    /// Red or brown discoloration.
    RedDiscoloration,
}

const ALL_SYMPTOMS: [Symptom; 8] = [
    Symptom::Yellowing,
    Symptom::SoftBase,
    Symptom::Wrinkling,
    Symptom::BrownSpots,
    Symptom::WhiteCottonySpots,
    Symptom::Etiolation,
    Symptom::NotGrowing,
    Symptom::RedDiscoloration,
];

impl Symptom {
    /// Label shown in symptom pickers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Yellowing => "Yellowing",
            Self::SoftBase => "Soft or mushy base",
            Self::Wrinkling => "Wrinkled or shrivelled body",
            Self::BrownSpots => "Brown spots",
            Self::WhiteCottonySpots => "White cottony spots",
            Self::Etiolation => "Stretched pale growth",
            Self::NotGrowing => "Not growing",
            Self::RedDiscoloration => "Red or brown discoloration",
        }
    }

    /// Stable kebab-case key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Yellowing => "yellowing",
            Self::SoftBase => "soft-base",
            Self::Wrinkling => "wrinkling",
            Self::BrownSpots => "brown-spots",
            Self::WhiteCottonySpots => "white-cottony-spots",
            Self::Etiolation => "etiolation",
            Self::NotGrowing => "not-growing",
            Self::RedDiscoloration => "red-discoloration",
        }
    }

    fn rules(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Yellowing => &[
                (
                    "Overwatering",
                    "Let the soil dry out completely and water less often",
                ),
                (
                    "Not enough light",
                    "Move the cactus to a brighter spot gradually",
                ),
            ],
            Self::SoftBase => &[(
                "Root or stem rot from excess moisture",
                "Stop watering, cut away soft tissue, dry the cuttings and repot in fresh dry soil",
            )],
            Self::Wrinkling => &[
                (
                    "Underwatering",
                    "Water thoroughly and then keep a regular schedule",
                ),
                (
                    "Root damage",
                    "Unpot, inspect the roots, trim dead ones and repot",
                ),
            ],
            Self::BrownSpots => &[
                (
                    "Sunburn",
                    "Shade from midday sun and acclimatise slowly to strong light",
                ),
                (
                    "Fungal infection",
                    "Improve airflow, avoid wetting the body, apply a fungicide",
                ),
            ],
            Self::WhiteCottonySpots => &[(
                "Mealybugs",
                "Wipe them off with alcohol on a cotton swab and isolate the plant",
            )],
            Self::Etiolation => &[(
                "Insufficient light",
                "Provide more direct light or a grow lamp",
            )],
            Self::NotGrowing => &[
                (
                    "Dormancy period",
                    "Normal in winter, keep cool and dry until spring",
                ),
                (
                    "Pot too small or soil exhausted",
                    "Repot into a slightly larger pot with fresh cactus mix",
                ),
            ],
            Self::RedDiscoloration => &[
                (
                    "Light or temperature stress",
                    "Reduce exposure to intense sun and cold drafts",
                ),
                (
                    "Nutrient deficiency",
                    "Feed with a balanced cactus fertilizer during the growth season",
                ),
            ],
        }
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for a symptom string that matches no known symptom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSymptom(pub String);

impl fmt::Display for UnknownSymptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown symptom: {}", self.0)
    }
}

impl std::error::Error for UnknownSymptom {}

impl FromStr for Symptom {
    type Err = UnknownSymptom;

    /// Accepts the kebab key or the label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ALL_SYMPTOMS
            .iter()
            .copied()
            .find(|sym| sym.key().eq_ignore_ascii_case(needle) || sym.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownSymptom(s.to_string()))
    }
}

/// One likely cause with its remedy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnosis {
    /// Symptom the entry came from.
    pub symptom: Symptom,
    /// Likely cause.
    pub cause: &'static str,
    /// Suggested remedy.
    pub remedy: &'static str,
}

/// Every symptom in canonical order.
pub fn all_symptoms() -> &'static [Symptom] {
    &ALL_SYMPTOMS
}

/// Diagnoses the selected symptoms.
///
/// Output order follows the canonical symptom order, so any ordering of the
/// same selection yields the same result. An empty selection yields an empty
/// result.
pub fn diagnose(symptoms: &[Symptom]) -> Vec<Diagnosis> {
    let mut selected = symptoms.to_vec();
    selected.sort_unstable();
    selected.dedup();

    selected
        .into_iter()
        .flat_map(|symptom| {
            symptom.rules().iter().map(move |&(cause, remedy)| Diagnosis {
                symptom,
                cause,
                remedy,
            })
        })
        .collect()
}

/// Parses free-form symptom labels and diagnoses the recognised ones.
pub fn diagnose_labels<S: AsRef<str>>(labels: &[S]) -> Vec<Diagnosis> {
    let symptoms: Vec<Symptom> = labels
        .iter()
        .filter_map(|label| match label.as_ref().parse::<Symptom>() {
            Ok(symptom) => Some(symptom),
            Err(err) => {
                tracing::warn!(%err, "ignoring symptom");
                None
            }
        })
        .collect();
    diagnose(&symptoms)
}
