//! Persisted store document and its load-time migration.

use std::{borrow::Cow, collections::BTreeMap};

use serde::{Deserialize, Serialize};

use super::lenient;
use crate::{achievements::AchievementState, plant::Plant, types::PlantName};

/// Version written by this crate.
pub const CURRENT_DOCUMENT_VERSION: u32 = 2;
/// Version assumed for documents that carry no version key.
pub const LEGACY_DOCUMENT_VERSION: u32 = 1;

/// Species markers older documents used for "no species chosen".
const UNSPECIFIED_SPECIES_MARKERS: [&str; 2] = ["", "Не указан"];

/// Whole persisted state: every plant plus achievement progress.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Schema version.
    #[serde(default = "legacy_version", deserialize_with = "lenient::or_default")]
    pub version: u32,
    /// Plants keyed by name.
    #[serde(default, deserialize_with = "lenient::entries")]
    pub cactuses: BTreeMap<PlantName, Plant>,
    /// Achievement records.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub achievements: AchievementState,
}

fn legacy_version() -> u32 {
    LEGACY_DOCUMENT_VERSION
}

impl StoreDocument {
    /// Empty document at the current version.
    pub fn empty() -> Self {
        Self {
            version: CURRENT_DOCUMENT_VERSION,
            ..Self::default()
        }
    }
}

/// Parses and migrates a document from JSON bytes.
///
/// Bare `NaN`/`Infinity` literals, as Python's `json` module writes them,
/// load as `null`. Individual bad values are dropped field by field, so
/// the error case is JSON that does not parse at all.
pub fn decode(bytes: &[u8]) -> serde_json::Result<StoreDocument> {
    let doc: StoreDocument = serde_json::from_slice(&null_non_finite(bytes))?;
    Ok(migrate(doc))
}

fn null_non_finite(bytes: &[u8]) -> Cow<'_, [u8]> {
    const TOKENS: [&[u8]; 3] = [b"-Infinity", b"Infinity", b"NaN"];

    let mut out: Option<Vec<u8>> = None;
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
        } else if b == b'"' {
            in_string = true;
        } else if let Some(token) = TOKENS.iter().find(|t| bytes[i..].starts_with(t)) {
            out.get_or_insert_with(|| bytes[..i].to_vec())
                .extend_from_slice(b"null");
            i += token.len();
            continue;
        }
        if let Some(buf) = out.as_mut() {
            buf.push(b);
        }
        i += 1;
    }
    out.map_or(Cow::Borrowed(bytes), Cow::Owned)
}

/// Brings a freshly parsed document up to [`CURRENT_DOCUMENT_VERSION`].
///
/// Missing keys were already defaulted by deserialization; this step handles
/// value-level changes between versions.
pub fn migrate(mut doc: StoreDocument) -> StoreDocument {
    if doc.version < 2 {
        for plant in doc.cactuses.values_mut() {
            let unspecified = plant
                .species
                .as_deref()
                .is_some_and(|s| UNSPECIFIED_SPECIES_MARKERS.contains(&s.trim()));
            if unspecified {
                plant.species = None;
            }
        }
        tracing::debug!(from = doc.version, to = 2, plants = doc.cactuses.len(), "migrated store document");
        doc.version = 2;
    }
    doc
}
