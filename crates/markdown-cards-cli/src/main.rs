use anyhow::Result;
use futures::future::join_all;
use markdown_cards_config::{CardSettings, Config};
use markdown_cards_engine::parsing::frontmatter;
use markdown_cards_engine::{
    ContentCache, ContentLoader, DocumentStore, FsDocumentStore, HttpImageProbe,
    ImageSourceOptions, Note, TextSourceOptions, io,
};
use relative_path::RelativePathBuf;
use std::{env, path::PathBuf, process, sync::Arc};

/// Builds the loader options for one note from its frontmatter.
fn source_options(body: &str, note: &Note, cards: &CardSettings) -> (ImageSourceOptions, TextSourceOptions) {
    let images = ImageSourceOptions {
        property_images: frontmatter::property_values(body, &cards.image_property),
        fallback: cards.embed_fallback,
        embeds: cards.embed_options(),
    };
    let text = TextSourceOptions {
        property_text: frontmatter::property_values(body, &cards.text_property)
            .into_iter()
            .next(),
        fallback_to_content: cards.fallback_to_content,
        omit_first_line: cards.omit_first_line,
        title: note.title().to_string(),
        max_chars: cards.excerpt_length,
    };
    (images, text)
}

async fn load_card(
    store: &FsDocumentStore,
    loader: &ContentLoader,
    cache: &ContentCache,
    cards: &CardSettings,
    note: &Note,
) {
    let body = store.read_body(note.path()).await.unwrap_or_else(|e| {
        log::warn!("Reading properties of {} failed: {e}", note.path());
        String::new()
    });
    let (images, text) = source_options(&body, note, cards);
    futures::join!(
        loader.ensure_images_loaded(note.path(), &images, cache),
        loader.ensure_text_loaded(note.path(), &text, cache),
    );
}

fn print_card(note: &Note, cache: &ContentCache) {
    println!("{} ({})", note.title(), note.path());
    match cache.text_preview(note.path()) {
        Some(text) if !text.is_empty() => println!("  {text}"),
        _ => println!("  (no preview)"),
    }
    for image in cache.images(note.path()).unwrap_or_default() {
        println!("  image: {image}");
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // Determine notes path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();
    log::info!("Config path: {}", config_path.display());

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let (notes_path, from_config) = match (args.len(), &config) {
        (2, _) => (PathBuf::from(&args[1]), false),
        (1, Some(config)) => (config.notes_path.clone(), true),
        (1, None) => {
            eprintln!("Error: No notes path provided and no config file found");
            eprintln!("Usage: {} <notes-folder-path>", args[0]);
            eprintln!("Or create a config file at {}", config_path.display());
            process::exit(1);
        }
        _ => {
            let program_name = args.first().map_or("markdown-cards", String::as_str);
            eprintln!("Usage: {program_name} [notes-folder-path]");
            process::exit(1);
        }
    };
    let cards = config.map(|config| config.cards).unwrap_or_default();

    if let Err(e) = io::validate_notes_dir(&notes_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Notes path '{}'{} is invalid: {e}",
            notes_path.display(),
            source
        );
        process::exit(1);
    }

    let store = Arc::new(FsDocumentStore::open(&notes_path)?);
    let max_images = cards.max_images();
    let loader = ContentLoader::new(store.clone(), Arc::new(HttpImageProbe::default()))
        .with_max_images(move || max_images);
    let cache = ContentCache::new();

    let notes: Vec<Note> = io::scan_markdown_files(store.root())?
        .iter()
        .filter_map(|path| path.strip_prefix(store.root()).ok())
        .filter_map(|relative| RelativePathBuf::from_path(relative).ok())
        .map(Note::new)
        .collect();
    log::info!("Loading {} cards from {}", notes.len(), store.root().display());

    join_all(
        notes
            .iter()
            .map(|note| load_card(&store, &loader, &cache, &cards, note)),
    )
    .await;

    for note in &notes {
        print_card(note, &cache);
    }
    Ok(())
}
