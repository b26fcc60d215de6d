use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use cocktail_hub::config::{self, Settings};
use cocktail_hub::favorites::FavoritesStore;
use cocktail_hub::index::{LoadOptions, spawn_progressive_load};
use cocktail_hub::logic::scrub::{ListViewport, Scrubber};
use cocktail_hub::logic::{ingredient_line, resolve_detail, resolve_facets, resolve_favorites};
use cocktail_hub::sources::{CatalogSource, CocktailDb, CurlImageCache, ImageCache};
use cocktail_hub::state::{BrowserState, CatalogItem, FavoriteSet};

#[derive(Parser)]
#[command(name = "cocktail-hub")]
#[command(about = "Browse, filter and bookmark cocktails from TheCocktailDB")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the whole catalog progressively and list the filtered view
    Browse {
        /// Case-insensitive name search
        #[arg(short, long, default_value = "")]
        search: String,
        /// Keep only these categories (repeatable)
        #[arg(short, long)]
        category: Vec<String>,
        /// Keep drinks using any of these ingredients (repeatable)
        #[arg(short, long)]
        ingredient: Vec<String>,
        /// Start the listing at the first drink under this rail letter
        #[arg(short, long)]
        letter: Option<char>,
    },
    /// Show the full recipe of one drink
    Show {
        id: String,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add or remove a drink id from favorites
    Favorite { id: String },
    /// List favorites, re-fetched from the API
    Favorites,
    /// List the categories and ingredients offered by the API
    Facets,
}

/// What: Route `tracing` output to `<config>/logs/cocktail-hub.log`.
///
/// Output:
/// - Guard that flushes the non-blocking writer on drop; `None` if the subscriber was already set.
///
/// Details:
/// - `--debug` wins over `RUST_LOG`, which wins over `log_level` from settings.
fn init_logging(settings: &Settings, debug: bool) -> Option<WorkerGuard> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&settings.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let appender = tracing_appender::rolling::never(config::logs_dir(), "cocktail-hub.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|()| guard)
}

fn print_item(item: &CatalogItem, favorites: &FavoriteSet) {
    let mark = if favorites.contains(&item.id) { '*' } else { ' ' };
    if item.category.is_empty() {
        println!("{mark} {:>6}  {}", item.id, item.name);
    } else {
        println!("{mark} {:>6}  {} [{}]", item.id, item.name, item.category);
    }
}

fn print_detail(item: &CatalogItem) {
    println!("{} ({})", item.name, item.id);
    if !item.category.is_empty() {
        println!("Category: {}", item.category);
    }
    if !item.ingredients.is_empty() {
        println!("Ingredients:");
        for ing in &item.ingredients {
            println!("  - {}", ingredient_line(ing));
        }
    }
    if !item.instructions.is_empty() {
        println!("Instructions:\n  {}", item.instructions);
    }
    if !item.image.is_empty() {
        println!("Image: {}", item.image);
    }
}

/// What: Run a progressive load to completion, feeding its events into `state`.
///
/// Details:
/// - Progress goes to stderr. Ctrl-C cancels the load and keeps what was merged so far.
async fn load_catalog(settings: &Settings, source: Arc<dyn CatalogSource>, state: &mut BrowserState) {
    let images: Arc<dyn ImageCache> = Arc::new(CurlImageCache::from_settings(settings));
    let (tx, mut rx) = mpsc::unbounded_channel();
    state.begin_load();
    let handle = spawn_progressive_load(source, images, LoadOptions::from_settings(settings), tx);
    loop {
        tokio::select! {
            ev = rx.recv() => {
                let Some(ev) = ev else { break };
                if state.apply_load_event(ev) {
                    break;
                }
                if state.loading() && state.progress() > 0 {
                    eprint!("\rloading {:>3}%  ({} drinks)", state.progress(), state.snapshot().len());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("load interrupted by user");
                handle.cancel();
            }
        }
    }
    eprintln!();
}

/// What: Load the catalog, then apply filters and the optional rail jump.
///
/// Details:
/// - The listing starts at the row the scrubber scrolled to.
async fn browse(
    settings: &Settings,
    source: Arc<dyn CatalogSource>,
    search: String,
    categories: Vec<String>,
    ingredients: Vec<String>,
    letter: Option<char>,
) -> ExitCode {
    let mut state = BrowserState::new();
    state.set_search_text(search);
    for c in &categories {
        state.toggle_category(c);
    }
    for i in &ingredients {
        state.toggle_ingredient(i);
    }
    load_catalog(settings, source, &mut state).await;

    let view = Arc::clone(state.view());
    let favorites = FavoritesStore::new(FavoritesStore::default_path()).load();
    let mut start = 0;
    if let Some(letter) = letter {
        let rows = crossterm::terminal::size().map_or(24, |(_, h)| h);
        let mut viewport = ListViewport::new(view.len());
        viewport.set_viewport_rows(rows);
        let mut scrubber = Scrubber::from_settings(settings, f32::from(rows));
        match scrubber.tap(letter, &view, &mut viewport, Instant::now()) {
            Some((Some(row), _)) => start = row,
            Some((None, _)) => {
                eprintln!("No drinks under '{letter}'");
                return ExitCode::SUCCESS;
            }
            None => {
                eprintln!("'{letter}' is not on the rail");
                return ExitCode::FAILURE;
            }
        }
    }
    for item in view.iter().skip(start) {
        print_item(item, &favorites);
    }
    eprintln!(
        "{} of {} drinks",
        view.len().saturating_sub(start),
        state.snapshot().len()
    );
    ExitCode::SUCCESS
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let loaded = config::read_settings();
    let settings = loaded.as_ref().map_or_else(|_| Settings::default(), Settings::clone);
    let _log_guard = init_logging(&settings, cli.debug);
    if let Err(e) = &loaded {
        tracing::warn!(path = %e.path.display(), error = %e.source, "failed to read settings; using defaults");
        eprintln!("warning: {e}; using default settings");
    }
    tracing::info!(api = %settings.api_base_url, "cocktail-hub starting");

    let source: Arc<dyn CatalogSource> = Arc::new(CocktailDb::from_settings(&settings));
    let store = FavoritesStore::new(FavoritesStore::default_path());

    match cli.command {
        Commands::Browse {
            search,
            category,
            ingredient,
            letter,
        } => browse(&settings, source, search, category, ingredient, letter).await,
        Commands::Show { id, json } => match resolve_detail(&*source, &id).await {
            Some(item) if json => match serde_json::to_string_pretty(&item) {
                Ok(s) => {
                    println!("{s}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to encode {id}: {e}");
                    ExitCode::FAILURE
                }
            },
            Some(item) => {
                print_detail(&item);
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("No details available for '{id}'");
                ExitCode::FAILURE
            }
        },
        Commands::Favorite { id } => {
            let current = store.load();
            let next = store.toggle(&current, &id);
            if next.len() > current.len() {
                println!("Added {} to favorites", id.trim());
            } else if next.len() < current.len() {
                println!("Removed {} from favorites", id.trim());
            } else {
                eprintln!("Nothing to toggle");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Commands::Favorites => {
            let ids = store.load();
            if ids.is_empty() {
                println!("No favorites yet");
                return ExitCode::SUCCESS;
            }
            let items = resolve_favorites(&*source, &ids).await;
            for item in &items {
                print_item(item, &ids);
            }
            if items.len() < ids.len() {
                eprintln!("{} favorite(s) could not be resolved", ids.len() - items.len());
            }
            ExitCode::SUCCESS
        }
        Commands::Facets => {
            let facets = resolve_facets(&*source, || async {
                eprintln!("Facet lists unavailable; loading the catalog instead");
                let mut state = BrowserState::new();
                load_catalog(&settings, Arc::clone(&source), &mut state).await;
                Arc::clone(state.snapshot())
            })
            .await;
            println!("Categories:");
            for c in &facets.categories {
                println!("  {c}");
            }
            println!("Ingredients:");
            for i in &facets.ingredients {
                println!("  {i}");
            }
            ExitCode::SUCCESS
        }
    }
}
