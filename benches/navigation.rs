//! Benchmarks for token navigation and range queries over a seeded corpus.

use corpus_graph::core::types::{TokenAddress, WordType};
use corpus_graph::corpus::model::{Chapter, Location, Token, Verse};
use corpus_graph::graph::{TokenRangeGroup, VerseTokenRange};
use corpus_graph::{CorpusStore, DependencyGraphManager, MemStore, TokenNavigator};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const CHAPTERS: u16 = 10;
const VERSES_PER_CHAPTER: u16 = 10;
const TOKENS_PER_VERSE: u16 = 10;

fn seeded_store() -> Arc<MemStore> {
    let store = Arc::new(MemStore::new());
    for chapter_number in 1..=CHAPTERS {
        store
            .save_chapter(Chapter::new(
                chapter_number,
                format!("chapter-{}", chapter_number),
                VERSES_PER_CHAPTER,
            ))
            .unwrap();
        for verse_number in 1..=VERSES_PER_CHAPTER {
            let mut verse = Verse::new(chapter_number, verse_number);
            verse.token_count = TOKENS_PER_VERSE;
            for token_number in 1..=TOKENS_PER_VERSE {
                let mut token = Token::new(
                    chapter_number,
                    verse_number,
                    token_number,
                    format!("w{}", token_number),
                );
                let location =
                    Location::new(chapter_number, verse_number, token_number, 1, WordType::Noun);
                token.locations.push(location.address());
                store.save_location(location).unwrap();
                verse.tokens.push(token.address());
                store.save_token(token).unwrap();
            }
            store.save_verse(verse).unwrap();
        }
    }
    store
}

fn bench_sequential_walk(c: &mut Criterion) {
    let store = seeded_store();
    let navigator = TokenNavigator::new(store.clone());
    let first = store.token(&TokenAddress::new(1, 1, 1)).unwrap();

    c.bench_function("sequential_walk_full_corpus", |b| {
        b.iter(|| {
            let mut count = 0usize;
            let mut current = first.clone();
            while let Some(next) = navigator.next(black_box(&current)) {
                current = next;
                count += 1;
            }
            count
        })
    });
}

fn bench_random_neighbours(c: &mut Criterion) {
    let store = seeded_store();
    let navigator = TokenNavigator::new(store.clone());
    let mut rng = StdRng::seed_from_u64(42);
    let tokens: Vec<Token> = (0..256)
        .map(|_| {
            let address = TokenAddress::new(
                rng.gen_range(1..=CHAPTERS),
                rng.gen_range(1..=VERSES_PER_CHAPTER),
                rng.gen_range(1..=TOKENS_PER_VERSE),
            );
            store.token(&address).unwrap()
        })
        .collect();

    c.bench_function("random_next_previous", |b| {
        let mut index = 0usize;
        b.iter(|| {
            let token = &tokens[index % tokens.len()];
            index += 1;
            (
                navigator.next(black_box(token)),
                navigator.previous(black_box(token)),
            )
        })
    });
}

fn bench_range_query(c: &mut Criterion) {
    let store = seeded_store();
    let manager = DependencyGraphManager::new(store);
    let group = TokenRangeGroup::new(
        3,
        vec![
            VerseTokenRange::new(2, 1, TOKENS_PER_VERSE),
            VerseTokenRange::new(5, 3, 7),
            VerseTokenRange::new(9, 1, 4),
        ],
    );

    c.bench_function("tokens_in_group_three_ranges", |b| {
        b.iter(|| manager.tokens_in_group(black_box(&group)))
    });
}

criterion_group!(
    benches,
    bench_sequential_walk,
    bench_random_neighbours,
    bench_range_query
);
criterion_main!(benches);
