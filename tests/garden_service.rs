use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tempfile::NamedTempFile;

use cactuslog::{
    config::{AppConfig, DATA_DIR_ENV, DEFAULT_LOG_FILTER, LOG_ENV},
    core::store::StoreError,
    garden::{Garden, GardenError, PhotoStatus},
    input::{self, InputError},
    persist::{DocumentSink, MemorySink, PersistError, PersistResult, document::StoreDocument},
    species::SpeciesCatalog,
    types::{HealthState, RepottingReminder, Season, WateringReminder},
};

fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, m, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .expect("valid timestamp")
}

fn garden() -> Garden<MemorySink> {
    Garden::open(MemorySink::new(), SpeciesCatalog::builtin()).expect("open")
}

struct FailingSink;

impl DocumentSink for FailingSink {
    fn load(&mut self) -> PersistResult<Option<StoreDocument>> {
        Ok(None)
    }

    fn save(&mut self, _doc: &StoreDocument) -> PersistResult<()> {
        Err(PersistError::Message("disk full".to_string()))
    }
}

#[test]
fn every_accepted_write_is_saved_and_rejected_ones_are_not() {
    let mut garden = garden();
    assert_eq!(garden.sink().saves(), 1);

    garden.add_plant("A", None, None, at(7, 1, 9)).expect("add");
    assert_eq!(garden.sink().saves(), 2);

    let dup = garden.add_plant("A", None, None, at(7, 1, 9));
    assert!(matches!(dup, Err(GardenError::Store(StoreError::AlreadyExists(_)))));
    let missing = garden.water("Ghost", "", at(7, 1, 9));
    assert!(matches!(missing, Err(GardenError::Store(StoreError::MissingPlant(_)))));
    assert_eq!(garden.sink().saves(), 2);

    garden.water("A", "", at(7, 1, 10)).expect("water");
    garden.edit_notes("A", "east window", at(7, 1, 10)).expect("notes");
    assert_eq!(garden.sink().saves(), 4);

    let saved = garden.sink().document().expect("saved doc");
    assert_eq!(saved.cactuses["A"].notes, "east window");
    assert_eq!(saved.cactuses["A"].watering.len(), 1);
}

#[test]
fn open_resumes_from_stored_document() {
    let mut first = garden();
    first.add_plant("Keep", None, Some(4), at(7, 1, 9)).expect("add");
    let doc = first.sink().document().cloned().expect("doc");

    let second = Garden::open(MemorySink::with_document(doc), SpeciesCatalog::builtin()).expect("open");
    assert_eq!(second.store().get("Keep").and_then(|p| p.watering_frequency), Some(4));
}

#[test]
fn save_failure_is_reported() {
    let result = Garden::open(FailingSink, SpeciesCatalog::builtin());
    assert!(matches!(result, Err(GardenError::Persist(PersistError::Message(_)))));
}

#[test]
fn add_plant_interval_defaults() {
    let mut garden = garden();
    let now = at(4, 1, 9);
    garden.add_plant("Bunny", Some("Opuntia microdasys"), None, now).expect("add");
    garden.add_plant("Odd", Some("Unlisted"), None, now).expect("add");
    garden.add_plant("Plain", None, None, now).expect("add");
    garden.add_plant("Custom", Some("Opuntia microdasys"), Some(3), now).expect("add");

    let interval = |name: &str| garden.store().get(name).and_then(|p| p.watering_frequency);
    assert_eq!(interval("Bunny"), Some(10));
    assert_eq!(interval("Odd"), Some(7));
    assert_eq!(interval("Plain"), Some(7));
    assert_eq!(interval("Custom"), Some(3));
}

#[test]
fn profile_combines_reminders_and_species_care() {
    let mut garden = garden();
    let now = at(7, 10, 9);
    garden
        .add_plant("Goldie", Some("Echinocactus grusonii"), None, now)
        .expect("add");
    garden.water("Goldie", "", now - TimeDelta::days(20)).expect("water");
    garden
        .schedule_repotting("Goldie", NaiveDate::from_ymd_opt(2025, 7, 14).expect("date"), now)
        .expect("repot");
    garden.record_growth("Goldie", 6.0, "", now).expect("growth");

    let photo = NamedTempFile::new().expect("temp photo");
    let photo_path = photo.path().to_str().expect("utf-8 path").to_string();
    garden.add_photo("Goldie", &photo_path, now).expect("photo");
    garden.add_photo("Goldie", "/definitely/missing.jpg", now).expect("photo");

    let profile = garden.view_profile("Goldie", now).expect("profile");
    assert_eq!(profile.season, Season::Summer);
    assert_eq!(profile.effective_interval, 9);
    assert_eq!(profile.watering, WateringReminder::Overdue { days_left: -11 });
    assert_eq!(profile.health, HealthState::Critical);
    assert_eq!(profile.repotting, RepottingReminder::DueSoon { days_left: 3 });
    assert_eq!(profile.growth_count, 1);
    assert_eq!(profile.species.common_name.as_deref(), Some("Golden barrel"));
    assert!(profile.seasonal_care.is_some());
    assert!(profile.fertilizer_advice.is_some());
    assert_eq!(profile.photos.len(), 2);
    assert_eq!(profile.photos[0].1, PhotoStatus::Available);
    assert_eq!(profile.photos[1].1, PhotoStatus::NotFound);
    assert!(Path::new(&profile.photos[0].0.path).exists());
}

#[test]
fn view_profile_runs_achievement_check() {
    let mut garden = garden();
    let now = at(5, 1, 9);
    garden.add_plant("A", None, Some(7), now).expect("add");
    garden.water("A", "", now).expect("water");
    let saves = garden.sink().saves();

    garden.view_profile("A", now).expect("profile");
    assert_eq!(garden.store().achievements().stable_watering.days, 1);
    assert_eq!(garden.sink().saves(), saves + 1);

    let missing = garden.profile("Ghost", now);
    assert!(matches!(missing, Err(GardenError::Store(StoreError::MissingPlant(_)))));
}

#[test]
fn view_profile_of_unknown_plant_leaves_streak_alone() {
    let mut garden = garden();
    let now = at(5, 1, 9);
    garden.add_plant("A", None, Some(7), now).expect("add");
    garden.water("A", "", now).expect("water");
    let saves = garden.sink().saves();

    let missing = garden.view_profile("Ghost", now);
    assert!(matches!(missing, Err(GardenError::Store(StoreError::MissingPlant(_)))));
    assert_eq!(garden.store().achievements().stable_watering.days, 0);
    assert_eq!(garden.store().achievements().stable_watering.last_checked, None);
    assert_eq!(garden.sink().saves(), saves);
}

#[test]
fn achievement_progress_is_read_only() {
    let mut garden = garden();
    let now = at(5, 1, 9);
    garden.add_plant("A", None, Some(7), now).expect("add");
    garden.water("A", "", now).expect("water");
    garden.add_photo("A", "/photos/a.jpg", now).expect("photo");
    let saves = garden.sink().saves();

    let rows = garden.achievement_progress();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().any(|row| row.current == 1 && !row.completed));
    assert_eq!(garden.store().achievements().stable_watering.days, 0);
    assert_eq!(garden.sink().saves(), saves);

    let again = garden.achievement_progress();
    assert_eq!(again, rows);
}

#[test]
fn unknown_species_profile_has_no_care_text() {
    let mut garden = garden();
    let now = at(1, 10, 9);
    garden.add_plant("Mystery", Some("Unlisted"), None, now).expect("add");
    let profile = garden.profile("Mystery", now).expect("profile");
    assert_eq!(profile.season, Season::Winter);
    // Stored interval 7, winter multiplier 1.5.
    assert_eq!(profile.effective_interval, 10);
    assert_eq!(profile.watering, WateringReminder::NoHistory);
    assert_eq!(profile.repotting, RepottingReminder::Unset);
    assert_eq!(profile.seasonal_care, None);
    assert_eq!(profile.fertilizer_advice, None);
}

#[test]
fn input_parsing_rejects_bad_values() {
    assert_eq!(input::parse_height(" 12.5 "), Ok(12.5));
    assert!(matches!(input::parse_height("tall"), Err(InputError::InvalidNumber { .. })));
    assert!(matches!(input::parse_height("inf"), Err(InputError::InvalidNumber { .. })));
    assert!(matches!(input::parse_height("0"), Err(InputError::NotPositive { .. })));
    assert!(matches!(input::parse_height("-4"), Err(InputError::NotPositive { .. })));

    assert_eq!(input::parse_interval("7"), Ok(7));
    assert!(matches!(input::parse_interval("0"), Err(InputError::NotPositive { .. })));
    assert!(matches!(input::parse_interval("-3"), Err(InputError::NotPositive { .. })));
    assert!(matches!(input::parse_interval("3.5"), Err(InputError::InvalidNumber { .. })));

    assert_eq!(input::parse_date("2025-03-15"), Ok(NaiveDate::from_ymd_opt(2025, 3, 15).expect("date")));
    assert_eq!(
        input::parse_date("15.03.2025"),
        Err(InputError::InvalidDate {
            value: "15.03.2025".to_string()
        })
    );

    assert_eq!(input::require_text("dosage", "  5 ml "), Ok("5 ml"));
    assert_eq!(input::require_text("dosage", "   "), Err(InputError::Empty { field: "dosage" }));
}

#[test]
fn config_prefers_cli_dir_then_environment() {
    let defaults = AppConfig::resolve_with(None, |_| None);
    assert_eq!(defaults.data_file, Path::new(".").join("cactus_data.json"));
    assert_eq!(defaults.species_file, Path::new(".").join("cactus_species.json"));
    assert_eq!(defaults.log_filter, DEFAULT_LOG_FILTER);

    let env = |key: &str| match key {
        k if k == DATA_DIR_ENV => Some("/var/lib/cactus".to_string()),
        k if k == LOG_ENV => Some("cactuslog=debug".to_string()),
        _ => None,
    };
    let from_env = AppConfig::resolve_with(None, env);
    assert_eq!(from_env.data_file, Path::new("/var/lib/cactus/cactus_data.json"));
    assert_eq!(from_env.log_filter, "cactuslog=debug");

    let from_cli = AppConfig::resolve_with(Some(Path::new("/srv/garden")), env);
    assert_eq!(from_cli.species_file, Path::new("/srv/garden/cactus_species.json"));
}
