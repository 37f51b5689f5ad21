//! betonera-tui: a terminal app for recording concrete inspection measurements
//!
//! Inspections hold a grid of layers, measurements and points filled in from
//! the keyboard. Completed inspections export to a workbook and an image, and
//! each one keeps a checklist of site photos.

mod app;
mod cli;
mod data;
mod dialog;
mod export;
mod grid;
mod photos;
mod screens;
mod search;
mod ui;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{AppConfig, Cli, Commands};
use data::{Inspection, SettingsStore, Storage};
use grid::AxisOrder;
use photos::{expected_items, find_item, PhotoStore, Section};

/// Send logs to the log file; the terminal belongs to the TUI
fn init_logging(config: &AppConfig) -> Result<()> {
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", config.data_dir))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file: {:?}", config.log_path))?;

    let filter = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn list_command(storage: &Storage, json: bool) -> Result<()> {
    let summaries = storage.list_inspections()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    for s in &summaries {
        let mark = if s.is_complete() { "✓" } else { "✗" };
        println!(
            "{:>6}  {:<32} {:>2}/{:<2} {mark}  exports: {}",
            s.inspection.number,
            s.inspection.name,
            s.filled,
            s.total(),
            s.inspection.export_count
        );
    }
    Ok(())
}

fn export_command(storage: &Storage, config: &AppConfig, number: i64) -> Result<()> {
    let Some(inspection) = storage.find_by_number(number)? else {
        bail!("No inspection with number {number}");
    };
    let outcome =
        export::export_inspection(storage, &config.excel_dir, &config.image_dir, inspection.id)?;
    println!("{}", outcome.workbook.display());
    println!("{}", outcome.image.display());
    Ok(())
}

fn find_inspection(storage: &Storage, number: i64) -> Result<Inspection> {
    storage
        .find_by_number(number)?
        .ok_or_else(|| anyhow!("No inspection with number {number}"))
}

fn photos_command(storage: &Storage, config: &AppConfig, number: i64) -> Result<()> {
    let inspection = find_inspection(storage, number)?;
    let store = PhotoStore::new(&config.photo_dir);
    let counts = store.counts(&inspection)?;
    let progress = store.progress(&inspection, &expected_items(inspection.machine_room))?;

    println!(
        "{}  machine room: {}  photos {}/{}",
        inspection.title(),
        inspection.machine_room.label(),
        progress.taken,
        progress.total
    );
    for section in Section::for_machine_room(inspection.machine_room) {
        println!("\n{}", section.title());
        for item in section.items() {
            let count = counts.get(&item.id).copied().unwrap_or(0);
            let mark = if count > 0 { "✓" } else { "✗" };
            println!("  {mark} {:>3}  {:<40} {count}", item.id, item.name);
        }
    }
    Ok(())
}

fn attach_command(
    storage: &Storage,
    config: &AppConfig,
    number: i64,
    item: u32,
    files: &[PathBuf],
) -> Result<()> {
    let inspection = find_inspection(storage, number)?;
    let Some(item) = find_item(item) else {
        bail!("No checklist item {item}");
    };
    let store = PhotoStore::new(&config.photo_dir);
    for file in files {
        let dest = store.attach(&inspection, item, file)?;
        println!("{}", dest.display());
    }
    Ok(())
}

fn order_command(storage: &Storage, value: Option<String>) -> Result<()> {
    match value {
        None => println!("{}", storage.axis_order().to_setting()),
        Some(value) => {
            let Some(order) = AxisOrder::parse(&value) else {
                bail!(
                    "Invalid order {value:?}: expected the three keys mantos, mediciones, puntos separated by commas"
                );
            };
            storage.set_axis_order(order)?;
            println!("{}", order.to_setting());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();
    let config = AppConfig::from_cli(&cli);
    init_logging(&config)?;

    let command = cli.command();
    if command == Commands::Open {
        return app::run(config);
    }

    let storage = Storage::open(&config.db_path)?;
    match command {
        Commands::Open => {}
        Commands::List { json } => list_command(&storage, json)?,
        Commands::Export { number } => export_command(&storage, &config, number)?,
        Commands::Order { value } => order_command(&storage, value)?,
        Commands::Photos { number } => photos_command(&storage, &config, number)?,
        Commands::Attach {
            number,
            item,
            files,
        } => attach_command(&storage, &config, number, item, &files)?,
    }

    Ok(())
}
