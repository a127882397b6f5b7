use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use cactuslog::{
    core::store::PlantStore,
    health,
    plant::PlantDraft,
    schedule,
    species::SpeciesCatalog,
};

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 7, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap_or_default()
}

fn populated_store(plants: u32) -> PlantStore {
    let mut store = PlantStore::new();
    let start = base_time();
    for i in 0..plants {
        let name = format!("Cactus {i}");
        let _ = store
            .add_plant(PlantDraft {
                name: name.clone(),
                species: Some("Opuntia microdasys".to_string()),
                watering_frequency: 5 + i % 10,
            })
            .expect("add");
        for w in 0..12 {
            let at = start + TimeDelta::days(i64::from(w * 3 + i % 3));
            let _ = store.record_watering(&name, "", at).expect("water");
        }
    }
    store
}

fn bench_reminder_scan(c: &mut Criterion) {
    let catalog = SpeciesCatalog::builtin();
    let now = base_time() + TimeDelta::days(40);
    let mut group = c.benchmark_group("reminder_scan");
    for size in [50u32, 500] {
        let store = populated_store(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| {
                store
                    .plants()
                    .map(|(_, plant)| {
                        (
                            health::health_state(plant, now),
                            schedule::days_until_next_watering(plant, &catalog, now),
                            schedule::days_until_repotting(plant, now),
                        )
                    })
                    .count()
            });
        });
    }
    group.finish();
}

fn bench_stable_check(c: &mut Criterion) {
    let store = populated_store(500);
    let now = base_time() + TimeDelta::days(40);
    c.bench_function("stable_watering_check_500", |b| {
        b.iter(|| {
            let mut scratch = store.clone();
            for day in 0..30 {
                scratch.check_stable_watering(now + TimeDelta::days(day));
            }
            scratch.achievements().stable_watering.days
        });
    });
}

criterion_group!(benches, bench_reminder_scan, bench_stable_check);
criterion_main!(benches);
