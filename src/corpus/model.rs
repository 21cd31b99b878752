//! Corpus entities: chapters, verses, tokens, locations and morphological
//! entries
//!
//! Entities are plain serde-friendly records keyed by their composite
//! address. Mutual references (verse → tokens, token → locations,
//! location ↔ morphological entry) are held as addresses rather than owned
//! objects so that each record can be persisted independently.

use crate::core::types::{LocationAddress, TokenAddress, WordType};
use serde::{Deserialize, Serialize};

/// A chapter of the corpus. Immutable once ingested except for `verse_count`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter number, 1..=114, unique
    pub chapter_number: u16,
    /// Chapter name
    pub chapter_name: String,
    /// Number of verses currently in the chapter
    pub verse_count: u16,
}

impl Chapter {
    /// Create a new chapter record.
    pub fn new(chapter_number: u16, chapter_name: impl Into<String>, verse_count: u16) -> Self {
        Self {
            chapter_number,
            chapter_name: chapter_name.into(),
            verse_count,
        }
    }
}

/// Sparse chapter projection used for chapter listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSummary {
    /// Chapter number
    pub chapter_number: u16,
    /// Number of verses in the chapter
    pub verse_count: u16,
    /// Chapter name
    pub chapter_name: String,
}

/// A verse, keyed by (chapter, verse). Mutated when tokens are merged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Chapter number
    pub chapter_number: u16,
    /// Verse number within the chapter, 1-based
    pub verse_number: u16,
    /// Number of tokens currently in the verse
    pub token_count: u16,
    /// Ordered token references
    pub tokens: Vec<TokenAddress>,
}

impl Verse {
    /// Create a verse record with no tokens yet.
    pub fn new(chapter_number: u16, verse_number: u16) -> Self {
        Self {
            chapter_number,
            verse_number,
            token_count: 0,
            tokens: Vec::new(),
        }
    }
}

/// A token, keyed by (chapter, verse, token).
///
/// `token_number` is 1-based and dense within its verse; any mutation that
/// removes tokens must renumber the remainder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Chapter number
    pub chapter_number: u16,
    /// Verse number within the chapter
    pub verse_number: u16,
    /// Token number within the verse, 1-based and dense
    pub token_number: u16,
    /// Raw token text
    pub text: String,
    /// Hidden tokens are synthesized for dependency graphs (implied/elided
    /// words) and never belong to the displayed verse text
    pub hidden: bool,
    /// Ordered location references
    pub locations: Vec<LocationAddress>,
}

impl Token {
    /// Create a visible token with no locations yet.
    pub fn new(
        chapter_number: u16,
        verse_number: u16,
        token_number: u16,
        text: impl Into<String>,
    ) -> Self {
        Self {
            chapter_number,
            verse_number,
            token_number,
            text: text.into(),
            hidden: false,
            locations: Vec::new(),
        }
    }

    /// Composite address of this token.
    pub fn address(&self) -> TokenAddress {
        TokenAddress::new(self.chapter_number, self.verse_number, self.token_number)
    }

    /// Canonical display name, the alternate unique key.
    pub fn display_name(&self) -> String {
        self.address().display_name()
    }
}

/// A location within a token, keyed by (chapter, verse, token, location).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Chapter number
    pub chapter_number: u16,
    /// Verse number within the chapter
    pub verse_number: u16,
    /// Token number within the verse
    pub token_number: u16,
    /// Location number within the token, 1-based
    pub location_number: u16,
    /// Grammatical word type
    pub word_type: WordType,
    /// Back-reference to a morphological entry by display name. Must always
    /// agree with the entry's forward reference list.
    pub morphological_entry: Option<String>,
}

impl Location {
    /// Create a location with no morphological entry bound.
    pub fn new(
        chapter_number: u16,
        verse_number: u16,
        token_number: u16,
        location_number: u16,
        word_type: WordType,
    ) -> Self {
        Self {
            chapter_number,
            verse_number,
            token_number,
            location_number,
            word_type,
            morphological_entry: None,
        }
    }

    /// Composite address of this location.
    pub fn address(&self) -> LocationAddress {
        LocationAddress::new(
            self.chapter_number,
            self.verse_number,
            self.token_number,
            self.location_number,
        )
    }

    /// Canonical display name.
    pub fn display_name(&self) -> String {
        self.address().display_name()
    }
}

/// A dictionary entry derived from root letters and a morphological template.
///
/// Keyed by its derived display name. Owns the list of locations that
/// reference it; `detach` is the only sanctioned way to drop one side of the
/// bidirectional reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologicalEntry {
    /// Root letters of the entry
    pub root_letters: String,
    /// Morphological template (form) name
    pub form: String,
    /// Locations referencing this entry
    pub locations: Vec<LocationAddress>,
}

impl MorphologicalEntry {
    /// Create an entry with no referencing locations.
    pub fn new(root_letters: impl Into<String>, form: impl Into<String>) -> Self {
        Self {
            root_letters: root_letters.into(),
            form: form.into(),
            locations: Vec::new(),
        }
    }

    /// Derived display name, the unique key: root letters plus template.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.root_letters, self.form)
    }

    /// Derive the display name for a (root letters, form) pair without
    /// building an entry.
    pub fn derive_display_name(root_letters: &str, form: &str) -> String {
        format!("{} {}", root_letters, form)
    }

    /// Remove a referencing location. Returns true when the list changed, in
    /// which case the entry must be re-saved by the caller.
    pub fn detach(&mut self, address: &LocationAddress) -> bool {
        let before = self.locations.len();
        self.locations.retain(|loc| loc != address);
        self.locations.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_display_name() {
        let token = Token::new(2, 255, 7, "word");
        assert_eq!(token.display_name(), "2:255:7");
        assert_eq!(token.address(), TokenAddress::new(2, 255, 7));
        assert!(!token.hidden);
    }

    #[test]
    fn test_entry_display_name() {
        let entry = MorphologicalEntry::new("ktb", "form-i");
        assert_eq!(entry.display_name(), "ktb form-i");
        assert_eq!(
            MorphologicalEntry::derive_display_name("ktb", "form-i"),
            entry.display_name()
        );
    }

    #[test]
    fn test_detach_removes_only_matching() {
        let mut entry = MorphologicalEntry::new("ktb", "form-i");
        let a = LocationAddress::new(1, 1, 1, 1);
        let b = LocationAddress::new(1, 1, 2, 1);
        entry.locations.push(a);
        entry.locations.push(b);

        assert!(entry.detach(&a));
        assert_eq!(entry.locations, vec![b]);
        // detaching an address that is not present reports no change
        assert!(!entry.detach(&a));
    }
}
