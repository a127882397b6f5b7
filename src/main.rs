use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cactuslog::{
    animation::{self, GrowthAnimation},
    config::AppConfig,
    diagnosis,
    garden::{Garden, PhotoStatus, PlantProfile},
    input,
    persist::json::JsonFileSink,
    schedule,
    species::SpeciesCatalog,
    types::{RepottingReminder, SortKey, WateringReminder},
};

#[derive(Parser)]
#[command(name = "cactuslog")]
#[command(about = "Track watering, growth, and care of potted cactuses")]
struct Cli {
    /// Directory holding cactus_data.json and cactus_species.json
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a new cactus
    Add(AddArgs),
    /// List cactuses
    List {
        #[arg(long, value_enum, default_value_t = SortArg::Name)]
        sort: SortArg,
    },
    /// Show a cactus profile with reminders and health
    Show { name: String },
    /// Record a watering
    Water {
        name: String,
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Record a watering for several cactuses at once
    BulkWater {
        #[arg(required = true)]
        names: Vec<String>,
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Record a height measurement
    Growth {
        name: String,
        /// Height in centimeters
        #[arg(long)]
        height: String,
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Attach a photo by path
    Photo { name: String, path: String },
    /// Record a fertilizer application
    Fertilize {
        name: String,
        #[command(flatten)]
        dose: FertilizerArgs,
    },
    /// Record a fertilizer application for several cactuses at once
    BulkFertilize {
        #[arg(required = true)]
        names: Vec<String>,
        #[command(flatten)]
        dose: FertilizerArgs,
    },
    /// Schedule the next repotting (YYYY-MM-DD)
    Repot { name: String, date: String },
    /// Replace the notes of a cactus
    Notes { name: String, text: String },
    /// Change the watering interval in days
    Interval { name: String, days: String },
    /// Suggest causes and remedies for symptoms
    Diagnose { symptoms: Vec<String> },
    /// List known symptoms
    Symptoms,
    /// List known species
    Species,
    /// Show achievement progress
    Achievements,
    /// Print general care tips
    Tips,
    /// Play the growth animation as text frames
    Animate { name: String },
}

#[derive(Args, Debug)]
struct AddArgs {
    /// Cactus name
    #[arg(short = 'n', long = "name")]
    name: String,
    /// Species from the catalog
    #[arg(short = 's', long = "species")]
    species: Option<String>,
    /// Watering interval in days (defaults to the species value or 7)
    #[arg(short = 'i', long = "interval")]
    interval: Option<String>,
}

#[derive(Args, Debug)]
struct FertilizerArgs {
    /// Fertilizer type
    #[arg(short = 't', long = "type")]
    fertilizer: String,
    /// Dosage, e.g. "5 ml/l"
    #[arg(short, long)]
    dosage: String,
    #[arg(short, long, default_value = "")]
    comment: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Name,
    Frequency,
    LastWatering,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Name => SortKey::Name,
            SortArg::Frequency => SortKey::WateringFrequency,
            SortArg::LastWatering => SortKey::LastWatering,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::resolve(cli.data_dir.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new(cactuslog::config::DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let catalog = SpeciesCatalog::load_or_bootstrap(&cfg.species_file);
    let mut garden = Garden::open(JsonFileSink::new(&cfg.data_file), catalog)
        .with_context(|| format!("opening care log at {}", cfg.data_file.display()))?;
    let now = Local::now().naive_local();

    run(cli.command, &mut garden, now)
}

fn run(command: Commands, garden: &mut Garden<JsonFileSink>, now: NaiveDateTime) -> Result<()> {
    match command {
        Commands::Add(args) => {
            let interval = args
                .interval
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(input::parse_interval)
                .transpose()?;
            let name = input::require_text("cactus name", &args.name)?;
            garden.add_plant(name, args.species.as_deref(), interval, now)?;
            println!("Added '{name}'");
        }
        Commands::List { sort } => {
            let store = garden.store();
            if store.is_empty() {
                println!("No cactuses yet");
            }
            for name in store.sorted_names(sort.into()) {
                let Ok(profile) = garden.profile(name, now) else {
                    continue;
                };
                println!(
                    "{name:<24} every {:>3} days  health: {:<6}  {}",
                    profile.plant.watering_frequency.unwrap_or_default(),
                    profile.health.color(),
                    watering_text(profile.watering),
                );
            }
        }
        Commands::Show { name } => {
            let profile = garden.view_profile(&name, now)?;
            print_profile(&profile);
        }
        Commands::Water { name, comment } => {
            garden.water(&name, &comment, now)?;
            println!("Watering recorded for '{name}'");
        }
        Commands::BulkWater { names, comment } => {
            garden.bulk_water(&names, &comment, now)?;
            println!("Watering recorded for {} cactuses", names.len());
        }
        Commands::Growth {
            name,
            height,
            comment,
        } => {
            let height = input::parse_height(&height)?;
            garden.record_growth(&name, height, &comment, now)?;
            println!("Growth of {height} cm recorded for '{name}'");
        }
        Commands::Photo { name, path } => {
            let path = input::require_text("photo path", &path)?;
            garden.add_photo(&name, path, now)?;
            println!("Photo added to '{name}'");
        }
        Commands::Fertilize { name, dose } => {
            let (fertilizer, dosage) = validate_dose(&dose)?;
            garden.fertilize(&name, fertilizer, dosage, &dose.comment, now)?;
            println!("Fertilizer recorded for '{name}'");
        }
        Commands::BulkFertilize { names, dose } => {
            let (fertilizer, dosage) = validate_dose(&dose)?;
            garden.bulk_fertilize(&names, fertilizer, dosage, &dose.comment, now)?;
            println!("Fertilizer recorded for {} cactuses", names.len());
        }
        Commands::Repot { name, date } => {
            let date = input::parse_date(&date)?;
            garden.schedule_repotting(&name, date, now)?;
            println!("Repotting for '{name}' scheduled on {date}");
        }
        Commands::Notes { name, text } => {
            garden.edit_notes(&name, &text, now)?;
            println!("Notes saved for '{name}'");
        }
        Commands::Interval { name, days } => {
            let days = input::parse_interval(&days)?;
            garden.set_watering_interval(&name, days, now)?;
            println!("Watering interval for '{name}' set to {days} days");
        }
        Commands::Diagnose { symptoms } => {
            if symptoms.is_empty() {
                anyhow::bail!("select at least one symptom (see `cactuslog symptoms`)");
            }
            let results = diagnosis::diagnose_labels(&symptoms);
            if results.is_empty() {
                println!("No known symptoms selected");
            }
            for d in results {
                println!("[{}]\n  cause:  {}\n  remedy: {}", d.symptom, d.cause, d.remedy);
            }
        }
        Commands::Symptoms => {
            for symptom in diagnosis::all_symptoms() {
                println!("{:<22} {}", symptom.key(), symptom.label());
            }
        }
        Commands::Species => {
            let catalog = garden.catalog();
            for name in catalog.names() {
                let data = catalog.get(name);
                println!(
                    "{name:<26} {:<22} every {} days",
                    data.common_name.as_deref().unwrap_or("unknown"),
                    data.watering_frequency.unwrap_or_default(),
                );
            }
        }
        Commands::Achievements => {
            for row in garden.achievement_progress() {
                let status = if row.completed {
                    "achieved".to_string()
                } else {
                    format!("{}/{}", row.current, row.target)
                };
                println!("{:<58} {status}", row.kind.title());
            }
        }
        Commands::Tips => print!("{}", schedule::care_tips()),
        Commands::Animate { name } => {
            let plant = garden
                .store()
                .get(&name)
                .with_context(|| format!("no plant named '{name}'"))?;
            let anim = GrowthAnimation::for_plant(plant, now);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .context("starting animation runtime")?;
            runtime.block_on(animation::play(anim, animation::FRAME_PERIOD, |frame| {
                let bar = "#".repeat((frame.height_px / 10.0) as usize);
                println!("{:>2} {:<25} {:>5.1}px {}", frame.step, bar, frame.height_px, frame.health.color());
            }));
        }
    }
    Ok(())
}

fn validate_dose(dose: &FertilizerArgs) -> Result<(&str, &str)> {
    let fertilizer = input::require_text("fertilizer type", &dose.fertilizer)?;
    let dosage = input::require_text("dosage", &dose.dosage)?;
    Ok((fertilizer, dosage))
}

fn watering_text(reminder: WateringReminder) -> String {
    match reminder {
        WateringReminder::NoHistory => "no watering history".to_string(),
        WateringReminder::Overdue { .. } => "time to water!".to_string(),
        WateringReminder::Pending { days_left } => format!("next watering in {days_left} days"),
    }
}

fn repotting_text(reminder: RepottingReminder, plant_date: Option<chrono::NaiveDate>) -> String {
    match reminder {
        RepottingReminder::Unset => "repotting date not set".to_string(),
        RepottingReminder::Overdue { .. } => "time to repot!".to_string(),
        RepottingReminder::DueSoon { days_left } => format!("repotting in {days_left} days"),
        RepottingReminder::Scheduled { .. } => match plant_date {
            Some(date) => format!("repotting scheduled for {date}"),
            None => "repotting scheduled".to_string(),
        },
    }
}

fn print_profile(p: &PlantProfile<'_>) {
    println!("== {} ==", p.name);
    println!(
        "Species: {} ({})",
        p.plant.species.as_deref().unwrap_or("unspecified"),
        p.species.common_name.as_deref().unwrap_or("unknown"),
    );
    println!(
        "Seasonal care ({}): {}",
        p.season.key(),
        p.seasonal_care.unwrap_or("no recommendations")
    );
    println!(
        "Fertilizer: {}",
        p.fertilizer_advice.unwrap_or("no recommendations")
    );
    println!("Health: {}", p.health.color());
    println!("Watering interval this season: {} days", p.effective_interval);
    println!("{}", watering_text(p.watering));
    println!("{}", repotting_text(p.repotting, p.plant.next_repotting));
    println!("Growth measurements: {}/5 (growth master)", p.growth_count);
    println!(
        "Notes: {}",
        if p.plant.notes.is_empty() { "no notes" } else { p.plant.notes.as_str() }
    );

    println!("\nWatering:");
    for w in &p.plant.watering {
        println!("  {} - {}", w.date.format(cactuslog::types::TIMESTAMP_FORMAT), w.comment);
    }
    println!("Growth:");
    for g in &p.plant.growth {
        println!("  {} - {} cm - {}", g.date.format(cactuslog::types::TIMESTAMP_FORMAT), g.height, g.comment);
    }
    println!("Photos:");
    for (photo, status) in &p.photos {
        let marker = match status {
            PhotoStatus::Available => "",
            PhotoStatus::NotFound => " (not found)",
        };
        println!("  {} - {}{marker}", photo.date.format(cactuslog::types::TIMESTAMP_FORMAT), photo.path);
    }
    println!("Fertilizers:");
    for f in &p.plant.fertilizers {
        println!(
            "  {} - {} ({}) - {}",
            f.date.format(cactuslog::types::TIMESTAMP_FORMAT),
            f.fertilizer,
            f.dosage,
            f.comment
        );
    }
}
