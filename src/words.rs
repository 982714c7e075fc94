use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;

static WORDLIST_DIR: Dir = include_dir!("src/wordlists");

/// How many words a session requests per batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Last-resort pool used when the embedded word list cannot be loaded.
const FALLBACK_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
    "say", "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their",
    "what", "so", "up", "out", "if", "about", "who", "get", "which", "go", "me", "when", "make",
    "can", "like", "time", "no", "just", "him", "know", "take", "people", "into", "year", "your",
    "good", "some", "could", "them", "see", "other", "than", "then", "now", "look", "only",
    "come", "its", "over", "think", "also",
];

#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

fn load_embedded(name: &str) -> Option<WordList> {
    let file = WORDLIST_DIR.get_file(format!("{name}.json"))?;
    let text = file.contents_utf8()?;
    serde_json::from_str::<WordList>(text)
        .ok()
        .filter(|list| !list.words.is_empty())
}

/// Produces the ordered word sequences sessions type against. The session
/// core only relies on batches being non-empty and finite.
pub trait WordSupplier {
    /// Produce the next batch of target words, `count` long when the
    /// underlying pool is non-empty.
    fn next_batch(&mut self, count: usize) -> Vec<String>;
}

/// Production supplier. Owns its cached word pool (loaded once, reused across
/// sessions) instead of leaning on any ambient global; a missing or malformed
/// embedded list degrades to the fallback pool rather than failing the
/// session.
pub struct CachedWordSupplier {
    pool: Vec<String>,
}

impl CachedWordSupplier {
    pub fn new() -> Self {
        let pool = match load_embedded("english") {
            Some(list) => list.words,
            None => FALLBACK_WORDS.iter().map(|w| w.to_string()).collect(),
        };
        Self { pool }
    }
}

impl Default for CachedWordSupplier {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSupplier for CachedWordSupplier {
    fn next_batch(&mut self, count: usize) -> Vec<String> {
        if self.pool.is_empty() {
            return Vec::new();
        }

        let mut rng = rand::thread_rng();
        let mut batch = Vec::with_capacity(count);
        while batch.len() < count {
            let mut pass = self.pool.clone();
            pass.shuffle(&mut rng);
            let take = (count - batch.len()).min(pass.len());
            batch.extend(pass.into_iter().take(take));
        }
        batch
    }
}

/// Deterministic supplier for tests: cycles a fixed sequence.
pub struct FixedWordSupplier {
    words: Vec<String>,
}

impl FixedWordSupplier {
    pub fn new(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl WordSupplier for FixedWordSupplier {
    fn next_batch(&mut self, count: usize) -> Vec<String> {
        self.words.iter().cloned().cycle().take(count).collect()
    }
}
