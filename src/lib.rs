//! Cactus care log: seasonal watering schedules, health inference, symptom
//! diagnosis, and achievements over a whole-file JSON store.
//!
//! # Examples
//!
//! In-memory usage with [`garden::Garden`]:
//! ```
//! use chrono::NaiveDate;
//! use cactuslog::{
//!     garden::Garden,
//!     persist::MemorySink,
//!     species::SpeciesCatalog,
//!     types::{HealthState, WateringReminder},
//! };
//!
//! let now = NaiveDate::from_ymd_opt(2025, 7, 10)
//!     .and_then(|d| d.and_hms_opt(9, 0, 0))
//!     .expect("valid time");
//! let mut garden = Garden::open(MemorySink::new(), SpeciesCatalog::builtin()).expect("open");
//! garden
//!     .add_plant("Goldie", Some("Echinocactus grusonii"), None, now)
//!     .expect("add");
//! garden.water("Goldie", "first drink", now).expect("water");
//!
//! let profile = garden.view_profile("Goldie", now).expect("profile");
//! assert_eq!(profile.health, HealthState::Healthy);
//! assert_eq!(profile.effective_interval, 9);
//! assert_eq!(profile.watering, WateringReminder::Pending { days_left: 9 });
//! ```
//!
//! File-backed usage with [`persist::json::JsonFileSink`]:
//! ```no_run
//! use cactuslog::{
//!     config::AppConfig,
//!     garden::Garden,
//!     persist::json::JsonFileSink,
//!     species::SpeciesCatalog,
//! };
//!
//! let cfg = AppConfig::resolve(None);
//! let catalog = SpeciesCatalog::load_or_bootstrap(&cfg.species_file);
//! let garden = Garden::open(JsonFileSink::new(&cfg.data_file), catalog).expect("open");
//! println!("{} plants", garden.store().len());
//! ```
#![warn(missing_docs)]

/// Achievement records and progress rules.
pub mod achievements;
/// Growth animation step machine and driver.
pub mod animation;
/// Data paths and log filter resolution.
pub mod config;
/// Authoritative in-memory plant store.
pub mod core;
/// Symptom diagnosis.
pub mod diagnosis;
/// Save-on-every-write service facade.
pub mod garden;
/// Health inference.
pub mod health;
/// User input validation.
pub mod input;
/// Store mutation descriptions.
pub mod op;
/// Document storage abstraction and JSON implementation.
pub mod persist;
/// Plant records and event logs.
pub mod plant;
/// Seasonal scheduling and reminders.
pub mod schedule;
/// Species reference catalog.
pub mod species;
/// Shared primitive types, enums, and constants.
pub mod types;
