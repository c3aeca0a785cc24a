mod load;


use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use graph::engine::GraphCore;
use graph::layout::PhysicsConfig;
use graph::note::NoteStore;
use query::card::{deck_catalog, filter_decks, tag_catalog};
use query::{DeckId, FilterState, SortDirection, SortField, SortSpec, filter_and_sort, tokenize};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::Level;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

#[derive(Parser, Debug)]
#[command(name = "doughub", about = "Card search and note graph tools")]
struct Cli {
    /// Log debug events to stderr.
    #[arg(long, short, global = true, env = "DOUGHUB_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter and sort a card collection.
    Search(SearchArgs),
    /// Print the tokens a query splits into.
    Tokens { query: String },
    /// List decks with card counts.
    Decks {
        cards: PathBuf,
        /// Only decks whose name contains this text.
        #[arg(long)]
        filter: Option<String>,
    },
    /// List tags with card counts.
    Tags { cards: PathBuf },
    /// Recompute every note's links from its content.
    Links { notes: PathBuf },
    /// Search notes by title and content, most recent first.
    Notes {
        notes: PathBuf,
        #[arg(default_value = "")]
        query: String,
    },
    /// Run the force layout and print final node positions.
    Layout(LayoutArgs),
}

#[derive(Args, Debug)]
struct SearchArgs {
    cards: PathBuf,

    #[arg(default_value = "")]
    query: String,

    #[arg(long, env = "DOUGHUB_SORT", default_value = "modified")]
    sort: SortField,

    #[arg(long, env = "DOUGHUB_SORT_DIRECTION", default_value = "desc")]
    direction: SortDirection,

    #[arg(long, default_value_t = false)]
    show_suspended: bool,

    #[arg(long = "deck", help = "Deck id from `doughub decks`; repeatable")]
    decks: Vec<DeckId>,

    #[arg(long = "tag", help = "Required tag; repeatable")]
    tags: Vec<String>,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    notes: PathBuf,

    #[arg(long, default_value_t = 300)]
    frames: u32,

    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 600.0)]
    height: f64,

    #[arg(long, env = "DOUGHUB_GRAPH_SEED", default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable environment file"),
    }

    match cli.command {
        Command::Search(args) => run_search(args),
        Command::Tokens { query } => print_json(&tokenize(&query)),
        Command::Decks { cards, filter } => run_decks(&cards, filter.as_deref()),
        Command::Tags { cards } => print_json(&tag_catalog(&read_cards(&cards)?)),
        Command::Links { notes } => run_links(&notes),
        Command::Notes { notes, query } => run_notes(&notes, &query),
        Command::Layout(args) => run_layout(args),
    }
}

fn run_search(args: SearchArgs) -> Result<(), CliError> {
    let cards = read_cards(&args.cards)?;
    let filter = FilterState {
        show_suspended: args.show_suspended,
        selected_decks: args.decks,
        selected_tags: args.tags,
        now: Some(OffsetDateTime::now_utc()),
    };
    let sort = SortSpec::new(args.sort, args.direction);

    let visible = filter_and_sort(&cards, &args.query, &filter, sort);
    tracing::info!(total = cards.len(), matched = visible.len(), "search complete");
    print_json(&visible)
}

fn run_decks(path: &Path, filter: Option<&str>) -> Result<(), CliError> {
    let decks = deck_catalog(&read_cards(path)?);
    match filter {
        Some(text) => print_json(&filter_decks(&decks, text)),
        None => print_json(&decks),
    }
}

fn run_links(path: &Path) -> Result<(), CliError> {
    let mut store = NoteStore::from_notes(load::parse_notes(&read_file(path)?)?);
    store.relink_all();
    print_json(&store.into_notes())
}

fn run_notes(path: &Path, query: &str) -> Result<(), CliError> {
    let store = NoteStore::from_notes(load::parse_notes(&read_file(path)?)?);
    print_json(&store.search(query))
}

fn run_layout(args: LayoutArgs) -> Result<(), CliError> {
    let notes = load::parse_notes(&read_file(&args.notes)?)?;

    let mut core = GraphCore::new(PhysicsConfig::from_env(), args.seed);
    core.set_viewport(args.width, args.height);
    core.load_notes(notes);
    for _ in 0..args.frames {
        core.tick(1.0);
    }

    tracing::info!(
        nodes = core.layout.nodes().len(),
        links = core.layout.links().len(),
        frames = args.frames,
        "layout settled"
    );
    print_json(&core.layout.nodes())
}

fn read_cards(path: &Path) -> Result<Vec<query::Card>, CliError> {
    let now = OffsetDateTime::now_utc().format(&Rfc3339)?;
    Ok(load::parse_cards(&read_file(path)?, &now)?)
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
