//! Corpus Graph demo binary
//!
//! Loads a corpus fixture into the in-memory store, prints the chapter
//! listing and walks a verse with the token navigator.

use anyhow::Context;
use clap::{Arg, Command};
use corpus_graph::core::types::WordType;
use corpus_graph::core::Config;
use corpus_graph::corpus::model::{Chapter, Location, Token, Verse};
use corpus_graph::{CorpusStore, DependencyGraphManager, MemStore, TokenNavigator};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// One chapter of the JSON corpus fixture.
#[derive(Debug, Deserialize)]
struct ChapterRecord {
    chapter_number: u16,
    chapter_name: String,
    verses: Vec<VerseRecord>,
}

/// One verse of the JSON corpus fixture.
#[derive(Debug, Deserialize)]
struct VerseRecord {
    verse_number: u16,
    tokens: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let matches = Command::new("corpus-graph")
        .version(corpus_graph::VERSION)
        .about("Hierarchically addressed corpus with dependency-graph annotations.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("corpus")
                .long("corpus")
                .value_name("FILE")
                .help("Corpus fixture to ingest (JSON)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("chapter")
                .long("chapter")
                .value_name("N")
                .help("Chapter to walk in the navigation demo"),
        )
        .arg(
            Arg::new("verse")
                .long("verse")
                .value_name("N")
                .help("Verse to start the navigation demo from"),
        )
        .get_matches();

    // Load configuration
    let mut config = if let Some(config_path) = matches.get_one::<String>("config") {
        Config::from_file(config_path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.clone();
    }
    if let Some(corpus) = matches.get_one::<String>("corpus") {
        config.storage.corpus_file = Some(corpus.into());
    }
    config.validate()?;

    corpus_graph::init(&config)?;

    let store = Arc::new(MemStore::new());
    if let Some(path) = &config.storage.corpus_file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading corpus fixture {}", path.display()))?;
        let chapters: Vec<ChapterRecord> =
            serde_json::from_str(&contents).context("parsing corpus fixture")?;
        ingest(&*store, &chapters)?;
        info!(chapters = chapters.len(), "corpus fixture ingested");
    }

    let manager = DependencyGraphManager::new(store.clone());
    println!("Chapters:");
    for summary in manager.chapters() {
        println!(
            "  {:>3}  {}  ({} verses)",
            summary.chapter_number, summary.chapter_name, summary.verse_count
        );
    }

    let chapter: u16 = matches
        .get_one::<String>("chapter")
        .map(|s| s.parse())
        .transpose()
        .context("parsing --chapter")?
        .unwrap_or(1);
    let verse: u16 = matches
        .get_one::<String>("verse")
        .map(|s| s.parse())
        .transpose()
        .context("parsing --verse")?
        .unwrap_or(1);

    walk(store, chapter, verse);
    Ok(())
}

/// Load fixture records into the store, giving every token one default noun
/// location.
fn ingest(store: &dyn CorpusStore, chapters: &[ChapterRecord]) -> anyhow::Result<()> {
    for chapter in chapters {
        store.save_chapter(Chapter::new(
            chapter.chapter_number,
            chapter.chapter_name.clone(),
            chapter.verses.len() as u16,
        ))?;
        for verse in &chapter.verses {
            let mut record = Verse::new(chapter.chapter_number, verse.verse_number);
            record.token_count = verse.tokens.len() as u16;
            for (index, text) in verse.tokens.iter().enumerate() {
                let token_number = index as u16 + 1;
                let mut token = Token::new(
                    chapter.chapter_number,
                    verse.verse_number,
                    token_number,
                    text.clone(),
                );
                let location = Location::new(
                    chapter.chapter_number,
                    verse.verse_number,
                    token_number,
                    1,
                    WordType::Noun,
                );
                token.locations.push(location.address());
                store.save_location(location)?;
                record.tokens.push(token.address());
                store.save_token(token)?;
            }
            store.save_verse(record)?;
        }
    }
    Ok(())
}

/// Walk the token sequence forward from (chapter, verse, 1) until the corpus
/// runs out, printing each token.
fn walk(store: Arc<MemStore>, chapter_number: u16, verse_number: u16) {
    let tokens = store.verse_tokens(chapter_number, verse_number);
    let Some(first) = tokens.into_iter().next() else {
        println!("No tokens at {}:{}", chapter_number, verse_number);
        return;
    };

    let navigator = TokenNavigator::new(store);
    println!("Token walk from {}:", first.display_name());
    let mut current = first;
    loop {
        println!("  {}  {}", current.display_name(), current.text);
        match navigator.next(&current) {
            Some(next) => current = next,
            None => break,
        }
    }
}
