use std::fs;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use proptest::prelude::*;
use tempfile::tempdir;

use cactuslog::{
    achievements::AchievementState,
    core::store::PlantStore,
    garden::{Garden, GardenError},
    persist::{
        DocumentSink, PersistError,
        document::{self, StoreDocument},
        json::{self, JsonFileSink},
    },
    plant::{PlantDraft, PlantPatch},
    species::SpeciesCatalog,
};

fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, m, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .expect("valid timestamp")
}

#[test]
fn garden_writes_and_reloads_json_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("cactus_data.json");

    {
        let mut garden = Garden::open(JsonFileSink::new(&path), SpeciesCatalog::builtin()).expect("open");
        assert!(path.exists());
        garden
            .add_plant("Goldie", Some("Echinocactus grusonii"), None, at(7, 10, 9))
            .expect("add");
        garden.water("Goldie", "first", at(7, 10, 9)).expect("water");
        garden
            .fertilize("Goldie", "Cactus mix", "5 ml/l", "", at(7, 11, 9))
            .expect("fertilize");
        garden
            .schedule_repotting("Goldie", NaiveDate::from_ymd_opt(2025, 9, 1).expect("date"), at(7, 11, 9))
            .expect("repot");
    }

    let garden = Garden::open(JsonFileSink::new(&path), SpeciesCatalog::builtin()).expect("reopen");
    let plant = garden.store().get("Goldie").expect("plant survives");
    assert_eq!(plant.species.as_deref(), Some("Echinocactus grusonii"));
    assert_eq!(plant.watering_frequency, Some(14));
    assert_eq!(plant.watering.len(), 1);
    assert_eq!(plant.fertilizers[0].fertilizer, "Cactus mix");
    assert_eq!(plant.next_repotting, NaiveDate::from_ymd_opt(2025, 9, 1));
    assert!(!dir.path().join("cactus_data.json.tmp").exists());
}

#[test]
fn saved_document_uses_flat_json_keys() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("data.json");
    let mut garden = Garden::open(JsonFileSink::new(&path), SpeciesCatalog::builtin()).expect("open");
    garden.add_plant("A", None, Some(5), at(7, 10, 9)).expect("add");
    garden.water("A", "", at(7, 10, 9)).expect("water");
    garden.fertilize("A", "NPK", "2 g", "", at(7, 10, 9)).expect("fertilize");

    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).expect("read")).expect("json");
    assert_eq!(raw["version"], 2);
    let plant = &raw["cactuses"]["A"];
    assert_eq!(plant["watering_frequency"], 5);
    assert_eq!(plant["watering"][0]["date"], "2025-07-10 09:00");
    assert_eq!(plant["fertilizers"][0]["type"], "NPK");
    assert!(raw["achievements"]["stable_watering"].is_object());
}

#[test]
fn legacy_document_is_migrated_with_defaults() {
    let legacy = r#"{
        "cactuses": {
            "Old": {
                "species": "Не указан",
                "watering": [{"date": "2024-05-01 10:00"}],
                "next_repotting": ""
            },
            "Named": {"species": "Opuntia microdasys", "watering_frequency": 9}
        }
    }"#;

    let doc = document::decode(legacy.as_bytes()).expect("decode");
    assert_eq!(doc.version, 2);
    let old = &doc.cactuses["Old"];
    assert_eq!(old.species, None);
    assert_eq!(old.watering_frequency, None);
    assert_eq!(old.next_repotting, None);
    assert_eq!(old.watering[0].comment, "");
    assert!(old.growth.is_empty());
    assert_eq!(doc.cactuses["Named"].species.as_deref(), Some("Opuntia microdasys"));
    assert_eq!(doc.achievements, AchievementState::default());
}

#[test]
fn current_document_keeps_species_text() {
    let mut doc = StoreDocument::empty();
    doc.cactuses.insert(
        "Literal".to_string(),
        cactuslog::plant::Plant {
            species: Some("Не указан".to_string()),
            ..Default::default()
        },
    );
    let migrated = document::migrate(doc.clone());
    assert_eq!(migrated, doc);
}

#[test]
fn corrupt_document_is_kept_aside_and_replaced() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("cactus_data.json");
    fs::write(&path, b"{ not json").expect("write");

    let mut sink = JsonFileSink::new(&path);
    assert!(matches!(sink.load(), Err(PersistError::Corrupt(_))));

    let garden = Garden::open(JsonFileSink::new(&path), SpeciesCatalog::builtin()).expect("open");
    assert!(garden.store().is_empty());

    let aside = json::corrupt_path(&path);
    assert_eq!(aside, dir.path().join("cactus_data.json.corrupt"));
    assert_eq!(fs::read(&aside).expect("kept aside"), b"{ not json");

    let reloaded = JsonFileSink::new(&path).load().expect("load").expect("document");
    assert_eq!(reloaded, StoreDocument::empty());
}

#[test]
fn bad_values_are_dropped_without_losing_the_log() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("cactus_data.json");
    fs::write(
        &path,
        r#"{
            "version": 2,
            "cactuses": {
                "Spiky": {
                    "watering_frequency": -3,
                    "watering": [
                        {"date": "2025-07-01 09:00", "comment": "ok"},
                        {"date": "yesterday"}
                    ],
                    "photos": "none"
                },
                "Round": {
                    "watering_frequency": 10,
                    "next_repotting": "soon",
                    "growth": [
                        {"date": "2025-07-01 09:00", "height": NaN},
                        {"date": "2025-07-02 09:00", "height": 4.5, "comment": "NaN cm"}
                    ]
                },
                "Broken": 42
            },
            "achievements": {
                "stable_watering": {"completed": true, "days": "lots"},
                "photo_collector": {"completed": true, "photos": 10}
            }
        }"#,
    )
    .expect("write");

    let garden = Garden::open(JsonFileSink::new(&path), SpeciesCatalog::builtin()).expect("open");
    assert_eq!(garden.store().names(), vec!["Round", "Spiky"]);

    let spiky = garden.store().get("Spiky").expect("spiky");
    assert_eq!(spiky.watering_frequency, None);
    assert_eq!(spiky.watering.len(), 1);
    assert_eq!(spiky.watering[0].comment, "ok");
    assert!(spiky.photos.is_empty());

    let round = garden.store().get("Round").expect("round");
    assert_eq!(round.watering_frequency, Some(10));
    assert_eq!(round.next_repotting, None);
    assert_eq!(round.growth.len(), 1);
    assert_eq!(round.growth[0].height, 4.5);
    assert_eq!(round.growth[0].comment, "NaN cm");

    let achievements = garden.store().achievements();
    assert!(achievements.stable_watering.completed);
    assert_eq!(achievements.stable_watering.days, 0);
    assert!(achievements.photo_collector.completed);
    assert!(!json::corrupt_path(&path).exists());

    let on_disk = JsonFileSink::new(&path).load().expect("load").expect("document");
    assert_eq!(on_disk.cactuses.len(), 2);
    assert!(on_disk.achievements.stable_watering.completed);
    assert!(on_disk.achievements.photo_collector.completed);
}

#[test]
fn unreadable_path_is_an_error_not_a_fresh_start() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("cactus_data.json");
    fs::create_dir(&path).expect("dir in the way");

    let result = Garden::open(JsonFileSink::new(&path), SpeciesCatalog::builtin());
    assert!(matches!(result, Err(GardenError::Persist(PersistError::Io(_)))));
    assert!(path.is_dir());
    assert!(!json::corrupt_path(&path).exists());
}

#[test]
fn missing_document_loads_as_none() {
    let dir = tempdir().expect("tempdir");
    let mut sink = JsonFileSink::new(dir.path().join("absent.json"));
    assert!(sink.load().expect("load").is_none());
}

#[test]
fn species_catalog_bootstraps_when_missing() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("cactus_species.json");

    let catalog = SpeciesCatalog::load_or_bootstrap(&path);
    assert_eq!(catalog.len(), 3);
    assert!(path.exists());

    let reloaded = SpeciesCatalog::load_or_bootstrap(&path);
    assert_eq!(reloaded.names(), catalog.names());
    assert_eq!(
        reloaded.lookup("Opuntia microdasys").and_then(|s| s.watering_frequency),
        Some(10)
    );
}

#[test]
fn species_catalog_reads_custom_entries() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("cactus_species.json");
    fs::write(
        &path,
        r#"{"Astrophytum asterias": {"common_name": "Sand dollar", "watering_frequency": 20,
            "seasonal_care": {"winter": "Keep dry"}}}"#,
    )
    .expect("write");

    let catalog = SpeciesCatalog::load_or_bootstrap(&path);
    assert_eq!(catalog.len(), 1);
    let data = catalog.get("Astrophytum asterias");
    assert_eq!(data.common_name.as_deref(), Some("Sand dollar"));
    assert_eq!(data.light_requirements, None);
    assert_eq!(catalog.default_interval(Some("Astrophytum asterias")), 20);
    assert_eq!(catalog.default_interval(Some("Unknown")), 7);
    assert_eq!(catalog.default_interval(None), 7);
}

#[test]
fn corrupt_species_catalog_falls_back_to_builtin() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("cactus_species.json");
    fs::write(&path, b"[1, 2").expect("write");

    let catalog = SpeciesCatalog::load_or_bootstrap(&path);
    assert_eq!(catalog.len(), SpeciesCatalog::builtin().len());
    assert!(catalog.lookup("Mammillaria elongata").is_some());
}

#[derive(Debug, Clone)]
enum Care {
    Water { plant: usize, comment: String },
    Grow { plant: usize, tenths: u32, comment: String },
    Photo { plant: usize },
    Fertilize { plant: usize, dosage: u8 },
    Repot { plant: usize, offset: i64 },
    Notes { plant: usize, notes: String },
    Check,
}

fn care_strategy() -> impl Strategy<Value = Care> {
    let text = "[a-z ]{0,12}";
    prop_oneof![
        (0usize..4, text).prop_map(|(plant, comment)| Care::Water { plant, comment }),
        (0usize..4, 1u32..5000, text).prop_map(|(plant, tenths, comment)| Care::Grow {
            plant,
            tenths,
            comment,
        }),
        (0usize..4).prop_map(|plant| Care::Photo { plant }),
        (0usize..4, any::<u8>()).prop_map(|(plant, dosage)| Care::Fertilize { plant, dosage }),
        (0usize..4, -30i64..30).prop_map(|(plant, offset)| Care::Repot { plant, offset }),
        (0usize..4, text).prop_map(|(plant, notes)| Care::Notes { plant, notes }),
        Just(Care::Check),
    ]
}

fn apply(store: &mut PlantStore, names: &[String], care: Care, now: NaiveDateTime) {
    let pick = |i: usize| names[i % names.len()].as_str();
    let op = match care {
        Care::Water { plant, comment } => store.record_watering(pick(plant), &comment, now),
        Care::Grow {
            plant,
            tenths,
            comment,
        } => store.record_growth(pick(plant), f64::from(tenths) / 10.0, &comment, now),
        Care::Photo { plant } => store.add_photo(pick(plant), "/photos/cactus.jpg", now),
        Care::Fertilize { plant, dosage } => {
            store.record_fertilizer(pick(plant), "Cactus mix", &format!("{dosage} ml"), "", now)
        }
        Care::Repot { plant, offset } => {
            store.schedule_repotting(pick(plant), now.date() + TimeDelta::days(offset))
        }
        Care::Notes { plant, notes } => store.patch(
            pick(plant),
            PlantPatch {
                notes: Some(notes),
                ..PlantPatch::default()
            },
        ),
        Care::Check => {
            store.check_stable_watering(now);
            return;
        }
    };
    let op = op.expect("valid care action");
    store.observe(&op, now);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_store_survives_a_json_file_round_trip(
        names in prop::collection::btree_set("[A-Za-z]{1,8}", 1..4),
        species in prop::collection::vec(prop::option::of(Just("Opuntia microdasys")), 4),
        actions in prop::collection::vec(care_strategy(), 0..40),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let mut store = PlantStore::new();
        for (i, name) in names.iter().enumerate() {
            store
                .add_plant(PlantDraft {
                    name: name.clone(),
                    species: species[i].map(str::to_string),
                    watering_frequency: 3 + i as u32,
                })
                .expect("add");
        }
        let mut now = at(3, 1, 8);
        for care in actions {
            apply(&mut store, &names, care, now);
            now += TimeDelta::hours(13);
        }

        let dir = tempdir().expect("tempdir");
        let mut sink = JsonFileSink::new(dir.path().join("cactus_data.json"));
        sink.save(&store.export_document()).expect("save");
        let doc = sink.load().expect("load").expect("document");
        prop_assert_eq!(PlantStore::from_document(doc), store);
    }
}
