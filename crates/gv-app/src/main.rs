//! Command-line exhibition viewer
//!
//! Loads a catalog, applies filters from the command line and walks the
//! feed page by page the way the scrolling view would.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use gv_core::prefs::JsonFileBackend;
use gv_core::{ArtworkId, Hotspot, LoadOutcome, PreferenceBackend, Preferences, VisibilityReport};
use gv_data::{load_catalog, FilterOptions, JsonFileSource, SortOption, ViewerConfig};
use gv_views::{artwork_link, ViewerSession};

mod demo;
mod logger;

#[derive(Debug, Parser)]
#[command(name = "gv-viewer")]
#[command(about = "Browse an exhibition catalog feed from the terminal")]
struct Cli {
    /// Exhibition JSON file; the built-in sample when omitted
    catalog: Option<PathBuf>,

    /// Viewer configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Free-text search
    #[arg(long)]
    query: Option<String>,

    #[arg(long)]
    section: Option<String>,

    #[arg(long)]
    artist: Option<String>,

    /// Substring of the medium, case-sensitive
    #[arg(long)]
    medium: Option<String>,

    /// Inclusive year range, e.g. 1870-1880
    #[arg(long, value_parser = parse_years)]
    years: Option<(u16, u16)>,

    #[arg(long, default_value = "chronological")]
    sort: SortOption,

    /// Open the feed at a deep link such as "?artwork=12"
    #[arg(long)]
    link: Option<String>,

    /// Number of pages to load
    #[arg(long, default_value = "1")]
    pages: usize,

    /// Preference file (favorites, font size, theme, view mode)
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Toggle an artwork in the favorites
    #[arg(long, value_delimiter = ',')]
    toggle_favorite: Vec<ArtworkId>,

    /// Hotspot list JSON; the sample hotspots when omitted
    #[arg(long)]
    hotspots: Option<PathBuf>,

    /// Click a hotspot and jump to the artwork it points at
    #[arg(long)]
    click: Option<String>,

    /// List artists with their page slug and avatar
    #[arg(long)]
    artists: bool,

    /// Start the audio guide for the current artwork at this volume (0-1)
    #[arg(long)]
    audio: Option<f32>,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

fn parse_years(value: &str) -> Result<(u16, u16), String> {
    let (min, max) = value
        .split_once('-')
        .ok_or_else(|| format!("expected MIN-MAX, got '{}'", value))?;
    let min: u16 = min.trim().parse().map_err(|_| format!("invalid year '{}'", min))?;
    let max: u16 = max.trim().parse().map_err(|_| format!("invalid year '{}'", max))?;
    if min > max {
        return Err(format!("range start {} is after end {}", min, max));
    }
    Ok((min, max))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    let config = match &cli.config {
        Some(path) => ViewerConfig::from_path(path).with_context(|| format!("reading config {:?}", path))?,
        None => ViewerConfig::default(),
    };

    let catalog = match &cli.catalog {
        Some(path) => load_catalog(&JsonFileSource::new(path))
            .await
            .with_context(|| format!("loading catalog {:?}", path))?,
        None => load_catalog(&demo::sample_source()).await?,
    };

    let session = ViewerSession::new(catalog, &config);
    session.set_sort(cli.sort);
    session.set_filters(FilterOptions {
        section: cli.section.clone(),
        artist: cli.artist.clone(),
        medium: cli.medium.clone(),
        year_range: cli.years,
        search_query: cli.query.clone(),
    });

    println!(
        "{} ({}), {} of {} artworks, sorted by {}",
        session.catalog().title(),
        session.catalog().data().venue,
        session.result_count(),
        session.catalog().len(),
        session.sort_by()
    );

    let hotspots = match &cli.hotspots {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading hotspots {:?}", path))?;
            serde_json::from_str::<Vec<Hotspot>>(&text)?
        }
        None => demo::sample_hotspots()?,
    };
    session.hotspots().set_hotspots(hotspots);

    if let Some(link) = &cli.link {
        match session.open_deep_link(link) {
            Some(outcome) => info!("Deep link {} opened: {:?}", link, outcome),
            None => warn!("Deep link {} names no artwork", link),
        }
    }

    if let Some(hotspot) = &cli.click {
        match session.click_hotspot(hotspot)? {
            Some(target) => {
                session.jump_to(target);
            }
            None => info!("Hotspot {} has no artwork", hotspot),
        }
    }

    walk_feed(&session, cli.pages);

    if let Some(current) = session.current_artwork() {
        println!("Current: [{}] {} ({})", current.id, current.title, artwork_link("/feed", current.id));
        for related in session.related(current.id) {
            println!("  related: [{}] {} by {}", related.id, related.title, related.artist);
        }
    }

    if let Some(volume) = cli.audio {
        session.audio().set_volume(volume);
        match session.play_current_guide() {
            Some(id) => println!("Audio guide: artwork {} at volume {:.2}", id, session.audio().volume()),
            None => warn!("No current artwork to play a guide for"),
        }
    }

    let backend: Arc<dyn PreferenceBackend> = match &cli.prefs {
        Some(path) => Arc::new(JsonFileBackend::open(path)),
        None => Arc::new(gv_core::prefs::MemoryBackend::new()),
    };
    let prefs = Preferences::open(backend);
    debug!(
        "Preferences: theme {:?}, font {:?} ({}x), view {:?}",
        prefs.theme.get(),
        prefs.font_size.get(),
        prefs.font_size.get().scale(),
        prefs.view_mode.get()
    );
    show_favorites(&session, &prefs, &cli.toggle_favorite)?;

    if cli.artists {
        for artist in session.catalog().artists() {
            let avatar = session.assets().avatar(artist);
            let slug = session.catalog().slug_for(artist).unwrap_or_default();
            println!("{:<32} /artists/{:<28} {}", artist, slug, avatar.url());
        }
    }

    Ok(())
}

/// Load `pages` pages, marking the first artwork of each new page as the
/// one scrolled into view
fn walk_feed(session: &ViewerSession, pages: usize) {
    let mut printed = 0;
    for _ in 0..pages.max(1) {
        if let LoadOutcome::Skipped(state) = session.sentinel_visible() {
            info!("Feed did not grow ({:?})", state);
        }

        let items = session.feed_items();
        for (position, artwork) in items.iter().enumerate().skip(printed) {
            println!(
                "{:>4}. [{}] {} - {} ({}, {})",
                position + 1,
                artwork.id,
                artwork.title,
                artwork.artist,
                artwork.year,
                artwork.medium
            );
        }
        if let Some(first_new) = items.get(printed) {
            session.report_visibility(&[VisibilityReport::new(first_new.id, 1.0)]);
        }
        printed = items.len();

        if !session.feed_snapshot().has_more() {
            println!("-- end of feed --");
            break;
        }
    }
}

fn show_favorites(session: &ViewerSession, prefs: &Preferences, toggles: &[ArtworkId]) -> Result<()> {
    for &id in toggles {
        if session.catalog().artwork(id).is_none() {
            bail!("no artwork with id {}", id);
        }
        let added = prefs.favorites.toggle(id)?;
        info!("Artwork {} {} favorites", id, if added { "added to" } else { "removed from" });
    }

    if prefs.favorites.is_empty() {
        return Ok(());
    }
    println!("Favorites ({}):", prefs.favorites.len());
    for id in prefs.favorites.ids() {
        match session.catalog().artwork(id) {
            Some(artwork) => println!("  [{}] {}", id, artwork.title),
            None => println!("  [{}] (not in this catalog)", id),
        }
    }
    Ok(())
}
