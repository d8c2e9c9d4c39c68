use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tipple_core::*;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "tipple")]
#[command(about = "Real-time BAC estimation from logged drinks, water and snacks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Evaluate as if the current time were this RFC 3339 timestamp
    #[arg(long, global = true, value_parser = parse_ts)]
    now: Option<DateTime<Utc>>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new session (replaces the active one)
    Start {
        /// Body weight in kilograms
        #[arg(long)]
        weight: Option<f64>,

        /// male, female or other (selects the default body-water ratio)
        #[arg(long)]
        sex: Option<String>,

        /// Explicit body-water ratio (clamped to 0.40-0.85)
        #[arg(long)]
        ratio: Option<f64>,

        /// Exact session start time
        #[arg(long, value_parser = parse_ts, conflicts_with = "backdate")]
        started_at: Option<DateTime<Utc>>,

        /// Minutes the night has already been going
        #[arg(long)]
        backdate: Option<i64>,
    },

    /// Log a drink from the catalog
    Drink {
        /// Beverage id (see `tipple catalog`)
        beverage: String,

        /// Container id; defaults to the beverage's usual serving
        #[arg(long)]
        container: Option<String>,

        /// Servings, in steps of 0.5
        #[arg(long, default_value_t = 1.0)]
        quantity: f64,

        /// Override the beverage's default ABV
        #[arg(long)]
        abv: Option<f64>,

        /// When the drink was had (defaults to now)
        #[arg(long, value_parser = parse_ts)]
        at: Option<DateTime<Utc>>,
    },

    /// Log a drink with a free-form volume and strength
    CustomDrink {
        #[arg(long)]
        volume: f64,

        /// ml or fl-oz
        #[arg(long, default_value = "ml")]
        unit: String,

        #[arg(long)]
        abv: f64,

        #[arg(long, value_parser = parse_ts)]
        at: Option<DateTime<Utc>>,
    },

    /// Log water
    Water {
        /// Water serving id
        #[arg(default_value = "glass")]
        serving: String,

        #[arg(long, default_value_t = 1.0)]
        quantity: f64,

        #[arg(long, value_parser = parse_ts)]
        at: Option<DateTime<Utc>>,
    },

    /// Log a snack
    Snack {
        /// Snack option id
        option: String,

        #[arg(long, default_value_t = 1.0)]
        quantity: f64,

        #[arg(long, value_parser = parse_ts)]
        at: Option<DateTime<Utc>>,
    },

    /// Remove a logged event by id
    Remove {
        id: String,
    },

    /// Show the current estimate (default)
    Status,

    /// Show the BAC trend used for charting
    Trend {
        /// Also export the points to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Apply a JSON array of events to the active session
    Apply {
        file: PathBuf,
    },

    /// Clear all events and restart the session clock
    Reset,

    /// List catalog tables
    Catalog,

    /// Delete the active session
    End,
}

fn parse_ts(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    parse_timestamp(raw).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    tipple_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let ctx = Ctx {
        store: JsonFileStore::new(data_dir.join("sessions")),
        catalog,
        config,
        now: cli.now.unwrap_or_else(Utc::now),
        json: cli.json,
    };

    match cli.command {
        Some(Commands::Start {
            weight,
            sex,
            ratio,
            started_at,
            backdate,
        }) => cmd_start(&ctx, weight, sex, ratio, started_at, backdate),
        Some(Commands::Drink {
            beverage,
            container,
            quantity,
            abv,
            at,
        }) => {
            let order = DrinkOrder {
                beverage_id: beverage,
                container_id: container,
                quantity,
                abv_percent: abv,
                timestamp: at.unwrap_or(ctx.now),
            };
            let drink = ctx.catalog.resolve_drink(&order)?;
            cmd_log(&ctx, |session| session.add_drink(drink))
        }
        Some(Commands::CustomDrink {
            volume,
            unit,
            abv,
            at,
        }) => {
            let unit: VolumeUnit = unit.parse()?;
            if !volume.is_finite() || volume < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "volume must be a non-negative number, got {volume}"
                )));
            }
            let ml = convert_volume(volume, unit, VolumeUnit::Milliliter);
            let drink = DrinkEvent::new(
                input::CUSTOM_BEVERAGE_ID,
                input::CUSTOM_CONTAINER_ID,
                1.0,
                ml,
                abv,
                at.unwrap_or(ctx.now),
            )?;
            cmd_log(&ctx, |session| session.add_drink(drink))
        }
        Some(Commands::Water {
            serving,
            quantity,
            at,
        }) => {
            let water = ctx.catalog.resolve_water(&WaterOrder {
                water_option_id: serving,
                quantity,
                timestamp: at.unwrap_or(ctx.now),
            })?;
            cmd_log(&ctx, |session| session.add_hydration(water))
        }
        Some(Commands::Snack {
            option,
            quantity,
            at,
        }) => {
            let snack = ctx.catalog.resolve_snack(&SnackOrder {
                snack_option_id: option,
                quantity,
                timestamp: at.unwrap_or(ctx.now),
            })?;
            cmd_log(&ctx, |session| session.add_snack(snack))
        }
        Some(Commands::Remove { id }) => cmd_remove(&ctx, &id),
        Some(Commands::Trend { csv }) => cmd_trend(&ctx, csv.as_deref()),
        Some(Commands::Apply { file }) => cmd_apply(&ctx, &file),
        Some(Commands::Reset) => cmd_reset(&ctx),
        Some(Commands::Catalog) => cmd_catalog(&ctx),
        Some(Commands::End) => cmd_end(&ctx),
        Some(Commands::Status) | None => cmd_status(&ctx),
    }
}

struct Ctx {
    store: JsonFileStore,
    catalog: &'static Catalog,
    config: Config,
    now: DateTime<Utc>,
    json: bool,
}

impl Ctx {
    fn snapshot(&self, session: &Session) -> BacSnapshot {
        evaluate(session, self.catalog, &self.config.model, self.now)
    }
}

fn cmd_start(
    ctx: &Ctx,
    weight: Option<f64>,
    sex: Option<String>,
    ratio: Option<f64>,
    started_at: Option<DateTime<Utc>>,
    backdate: Option<i64>,
) -> Result<()> {
    let mut profile = ctx.config.profile.clone();
    if let Some(weight) = weight {
        profile.weight_kg = weight;
    }
    if let Some(sex) = sex {
        profile.sex = sex.parse()?;
        // A sex given on the command line picks the catalog ratio for it
        profile.body_water_ratio = None;
    }
    if ratio.is_some() {
        profile.body_water_ratio = ratio;
    }

    let ratio = profile.body_water_ratio_for(ctx.catalog);
    let session = match started_at {
        Some(at) => Session::new(profile.weight_kg, ratio, at)?,
        None => Session::start_backdated(
            profile.weight_kg,
            ratio,
            ctx.now,
            backdate.unwrap_or(ctx.config.model.backdate_minutes),
        )?,
    };

    let previous = ctx.store.active();
    ctx.store.save(&session)?;
    ctx.store.set_active(session.id)?;

    // The replaced session is not reachable any more
    match previous {
        Ok(Some(old)) => match ctx.store.delete(old) {
            Ok(()) | Err(Error::SessionNotFound(_)) => {}
            Err(e) => tracing::warn!("Could not remove previous session {}: {}", old, e),
        },
        Ok(None) => {}
        Err(e) => tracing::warn!("Ignoring unreadable active pointer: {}", e),
    }

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!("✓ Session started");
        println!("  Id:      {}", session.id);
        println!("  Started: {}", session.start.to_rfc3339());
        println!(
            "  Profile: {} kg, body-water ratio {:.3}",
            session.body_weight_kg, session.body_water_ratio
        );
    }
    Ok(())
}

/// Load the active session, apply one mutation, persist, and report
fn cmd_log<F>(ctx: &Ctx, f: F) -> Result<()>
where
    F: FnOnce(&mut Session) -> Result<Uuid>,
{
    let (session, id) = ctx.store.update_active(f)?;

    let snapshot = ctx.snapshot(&session);
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("✓ Logged event {}", id);
        display_summary(&snapshot);
    }
    Ok(())
}

fn cmd_remove(ctx: &Ctx, raw_id: &str) -> Result<()> {
    let id = Uuid::parse_str(raw_id.trim())
        .map_err(|e| Error::InvalidInput(format!("invalid event id '{}': {}", raw_id, e)))?;

    let (session, removed) = ctx.store.update_active(|session| {
        session
            .remove_event(id)
            .ok_or_else(|| Error::State(format!("No event {} in the active session", id)))
    })?;

    let kind = match removed {
        RemovedEvent::Drink(_) => "drink",
        RemovedEvent::Hydration(_) => "water",
        RemovedEvent::Snack(_) => "snack",
    };
    let snapshot = ctx.snapshot(&session);
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("✓ Removed {} {}", kind, id);
        display_summary(&snapshot);
    }
    Ok(())
}

fn cmd_status(ctx: &Ctx) -> Result<()> {
    let session = ctx.store.load_active()?;
    let snapshot = ctx.snapshot(&session);

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        display_snapshot(&session, &snapshot);
    }
    Ok(())
}

fn cmd_trend(ctx: &Ctx, csv: Option<&Path>) -> Result<()> {
    let session = ctx.store.load_active()?;
    let points = trend_points(&session, &ctx.config.model, ctx.now);

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&points)?);
    } else {
        let synthetic = points.first().map(|p| p.synthetic).unwrap_or(false);
        if synthetic {
            println!("BAC trend (estimated backfill - not enough drinks logged yet)");
        } else {
            println!("BAC trend");
        }
        for point in &points {
            let bar = "█".repeat((point.normalized() * 30.0).round() as usize);
            println!(
                "  {}  {:.3}  {}",
                point.timestamp.format("%H:%M"),
                point.bac,
                bar
            );
        }
    }

    if let Some(path) = csv {
        let count = tipple_core::export::write_trend_csv(&points, path)?;
        if !ctx.json {
            println!("✓ Exported {} points to {}", count, path.display());
        }
    }
    Ok(())
}

fn cmd_apply(ctx: &Ctx, file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)?;
    let inputs: Vec<InputEvent> = serde_json::from_str(&contents)?;

    let (session, ids) = ctx.store.update_active(|session| session.apply_inputs(&inputs))?;

    let snapshot = ctx.snapshot(&session);
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("✓ Applied {} events", ids.len());
        display_summary(&snapshot);
    }
    Ok(())
}

fn cmd_reset(ctx: &Ctx) -> Result<()> {
    let start = ctx.now - Duration::minutes(ctx.config.model.backdate_minutes);
    let (session, ()) = ctx.store.update_active(|session| {
        session.reset(start);
        Ok(())
    })?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!("✓ Session reset");
        println!("  Started: {}", session.start.to_rfc3339());
    }
    Ok(())
}

fn cmd_end(ctx: &Ctx) -> Result<()> {
    let id = ctx
        .store
        .active()?
        .ok_or_else(|| Error::State("No active session to end".into()))?;
    ctx.store.delete(id)?;

    if ctx.json {
        let ended = serde_json::json!({ "ended": id });
        println!("{}", serde_json::to_string_pretty(&ended)?);
    } else {
        println!("✓ Session {} ended", id);
    }
    Ok(())
}

fn cmd_catalog(ctx: &Ctx) -> Result<()> {
    let catalog = ctx.catalog;

    let mut beverages: Vec<_> = catalog.beverages.values().collect();
    beverages.sort_by(|a, b| a.id.cmp(&b.id));
    println!("Beverages:");
    for b in beverages {
        println!(
            "  {:<10} {:>5.1}%  {:<24} (serving: {})",
            b.id, b.default_abv_percent, b.name, b.default_container_id
        );
    }

    let mut containers: Vec<_> = catalog.containers.values().collect();
    containers.sort_by(|a, b| a.id.cmp(&b.id));
    println!("\nContainers:");
    for c in containers {
        println!("  {:<15} {:>5.0} ml  {}", c.id, c.volume_ml, c.name);
    }

    let mut waters: Vec<_> = catalog.water_servings.values().collect();
    waters.sort_by(|a, b| a.id.cmp(&b.id));
    println!("\nWater:");
    for w in waters {
        println!("  {:<10} {:>5.0} ml  {}", w.id, w.volume_ml, w.name);
    }

    let mut snacks: Vec<_> = catalog.snacks.values().collect();
    snacks.sort_by(|a, b| a.id.cmp(&b.id));
    println!("\nSnacks:");
    for s in snacks {
        println!("  {:<10} x{:.2}  {}", s.id, s.absorption_modifier, s.name);
    }
    Ok(())
}

fn display_summary(snapshot: &BacSnapshot) {
    println!(
        "  BAC {:.3} ({}) · rest {} min",
        snapshot.bac, snapshot.risk_level, snapshot.rest_minutes
    );
}

fn display_snapshot(session: &Session, snapshot: &BacSnapshot) {
    println!("\n╭─────────────────────────────────────────╮");
    println!(
        "│  BAC {:.3}  ·  {}",
        snapshot.bac,
        snapshot.risk_level.as_str().to_uppercase()
    );
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", snapshot.recommended_action);
    match &snapshot.character_level {
        Some(level) => println!(
            "  Intoxication {:.0}% · {}: {}",
            snapshot.intoxication_percent, level.label, level.message
        ),
        None => println!("  Intoxication {:.0}%", snapshot.intoxication_percent),
    }
    println!();
    println!(
        "  Drinks:    {} servings, {:.1} g alcohol, {:.0} ml",
        snapshot.total_servings, snapshot.total_alcohol_grams, snapshot.total_volume_ml
    );
    println!(
        "  Pace:      {:.1} / 10 ({})",
        snapshot.pace_score, snapshot.pace_label
    );
    println!(
        "  Hydration: score {:.0} (rest x{:.2})",
        snapshot.hydration_score, snapshot.hydration_modifier
    );
    if snapshot.snack_modifier < 1.0 {
        println!("  Snack:     active (rest x{:.2})", snapshot.snack_modifier);
    }
    println!("  Elapsed:   {:.2} h", snapshot.hours_since_start);
    println!();
    println!(
        "  Rest {} min (baseline {} min)",
        snapshot.rest_minutes, snapshot.baseline_rest_minutes
    );
    if snapshot.minutes_to_target > 0 {
        println!(
            "  {} min until BAC drops below 0.050",
            snapshot.minutes_to_target
        );
    }
    if let Some(minutes) = snapshot.minutes_for_latest_drink {
        println!("  Your last drink alone takes ~{} min to clear", minutes);
    }
    println!();
    println!("  Session {}", session.id);
}
