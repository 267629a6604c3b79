// SPDX-License-Identifier: MIT
//
// Kartenwerk — photo-to-print timeline card generator.
//
// Entry point. Initialises logging, resolves photo dates and labels, and
// drives the export pipeline.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use kartenwerk_cards::CardSheetExporter;
use kartenwerk_core::error::Result;
use kartenwerk_core::{AppConfig, CardId, TimelineCard};
use kartenwerk_intake::{LabelCache, photo_date};
use kartenwerk_tone::ToneOptions;

const DEFAULT_CACHE_FILE: &str = "kartenwerk-labels.json";

#[derive(Parser)]
#[command(name = "kartenwerk", version, about = "Turn photos into printable timeline game cards")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render photos into a double-sided card sheet PDF.
    Export {
        /// Photo files, in the order they should appear on the sheet.
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Output PDF path.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Event label for one photo, as FILENAME=LABEL. Repeatable. Photos
    /// without a label fall back to the label cache.
        #[arg(short, long = "label", value_name = "FILENAME=LABEL")]
        labels: Vec<String>,
        /// Label cache file.
        #[arg(long, default_value = DEFAULT_CACHE_FILE)]
        cache: PathBuf,
    },
    /// Drop expired entries from the label cache.
    PurgeCache {
        #[arg(long, default_value = DEFAULT_CACHE_FILE)]
        cache: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run(Cli::parse()) {
        error!(error = %err, "export failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::default();
    match cli.command {
        Command::Export {
            images,
            out,
            labels,
            cache,
        } => export(&config, &images, out, &labels, &cache),
        Command::PurgeCache { cache } => purge_cache(&config, &cache),
    }
}

fn export(
    config: &AppConfig,
    images: &[PathBuf],
    out: Option<PathBuf>,
    label_args: &[String],
    cache_path: &PathBuf,
) -> Result<()> {
    let labels = parse_labels(label_args);
    let mut cache = LabelCache::open(cache_path, config.cache_retention_days)?;

    let mut cards = Vec::with_capacity(images.len());
    for path in images {
        match build_card(path, &labels, &mut cache) {
            Ok(card) => cards.push(card),
            Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable photo"),
        }
    }
    cache.save()?;

    // Timeline order: oldest first. Cards with only a year sort ahead of
    // dated cards within that year.
    cards.sort_by_key(|card| (card.year, card.full_date));

    let mut exporter = CardSheetExporter::with_tone_options(tone_options(config))?;
    let pdf = exporter.export(&cards)?;

    let out = out.unwrap_or_else(|| PathBuf::from(&config.output_path));
    std::fs::write(&out, &pdf)?;
    info!(cards = cards.len(), out = %out.display(), bytes = pdf.len(), "card sheet written");
    Ok(())
}

/// Build one card: read the photo, resolve its date, and pick a label from
/// the command line or the cache.
fn build_card(
    path: &PathBuf,
    labels: &HashMap<String, String>,
    cache: &mut LabelCache,
) -> Result<TimelineCard> {
    let image = std::fs::read(path)?;
    let date = photo_date(path);
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    // An EXIF date is a real capture date and prints with its month; a
    // filesystem fallback only pins the year.
    let from_exif = date.source.starts_with("EXIF");
    let full_date = from_exif.then_some(date.taken);

    let key = LabelCache::cache_key(&filename, full_date);
    let event_name = match labels.get(&filename) {
        Some(label) => {
            cache.insert(key, label.clone());
            label.clone()
        }
        None => cache.get(&key).map(str::to_owned).unwrap_or_default(),
    };
    if event_name.is_empty() {
        warn!(filename = %filename, "no event label, banner will print as placeholder");
    }

    // Years outside the playable range usually mean a broken clock or a
    // scanner default; clamp rather than refuse the card.
    let year = date.taken.year().clamp(1000, 2100);

    Ok(TimelineCard {
        id: CardId::new(),
        image,
        filename,
        event_name,
        year,
        full_date,
        date_source: date.source,
    })
}

/// Card tone preset with the user's configured switches applied.
fn tone_options(config: &AppConfig) -> ToneOptions {
    ToneOptions {
        add_grain: config.add_grain,
        enable_local_contrast: config.enable_local_contrast,
        enable_dithering: config.enable_dithering,
        ..ToneOptions::card_preset()
    }
}

fn purge_cache(config: &AppConfig, cache_path: &PathBuf) -> Result<()> {
    let mut cache = LabelCache::open(cache_path, config.cache_retention_days)?;
    let purged = cache.purge_expired();
    cache.save()?;
    info!(purged, remaining = cache.len(), "label cache purged");
    Ok(())
}

/// Parse repeated FILENAME=LABEL arguments; malformed ones are skipped with
/// a warning.
fn parse_labels(args: &[String]) -> HashMap<String, String> {
    let mut labels = HashMap::new();
    for arg in args {
        match arg.split_once('=') {
            Some((file, label)) if !file.is_empty() => {
                labels.insert(file.to_string(), label.to_string());
            }
            _ => warn!(arg = %arg, "ignoring malformed label, expected FILENAME=LABEL"),
        }
    }
    labels
}
