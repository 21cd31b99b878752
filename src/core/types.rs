//! Core type definitions for the corpus address space and graph layer
//!
//! Composite numeric addresses identify every corpus unit: a chapter holds
//! verses, a verse holds tokens, a token holds locations. Addresses double as
//! unique keys and as the source of canonical display names used for
//! alternate lookups.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lowest valid chapter number.
pub const CHAPTER_MIN: i32 = 1;

/// Highest valid chapter number.
pub const CHAPTER_MAX: i32 = 114;

/// Sentinel verse/token number meaning "resolve to the last item in scope".
pub const SENTINEL_LAST: i32 = -1;

/// Returns true if `chapter_number` falls inside the valid chapter range.
pub fn chapter_in_range(chapter_number: i32) -> bool {
    (CHAPTER_MIN..=CHAPTER_MAX).contains(&chapter_number)
}

/// Unique identifier for a graph node row.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Composite (chapter, verse, token) address of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenAddress {
    /// Chapter number, 1..=114
    pub chapter_number: u16,
    /// Verse number within the chapter, 1-based
    pub verse_number: u16,
    /// Token number within the verse, 1-based and dense
    pub token_number: u16,
}

impl TokenAddress {
    /// Create a token address from concrete components.
    pub fn new(chapter_number: u16, verse_number: u16, token_number: u16) -> Self {
        Self {
            chapter_number,
            verse_number,
            token_number,
        }
    }

    /// Build an address from signed components, returning `None` when any
    /// component is non-positive or the chapter is out of range. Used by the
    /// navigator, which walks through transient 0/-1 values.
    pub fn checked(chapter_number: i32, verse_number: i32, token_number: i32) -> Option<Self> {
        if !chapter_in_range(chapter_number) || verse_number < 1 || token_number < 1 {
            return None;
        }
        Some(Self {
            chapter_number: chapter_number as u16,
            verse_number: verse_number as u16,
            token_number: token_number as u16,
        })
    }

    /// Canonical display name, usable as an alternate unique key.
    pub fn display_name(&self) -> String {
        format!(
            "{}:{}:{}",
            self.chapter_number, self.verse_number, self.token_number
        )
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Composite (chapter, verse, token, location) address of a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationAddress {
    /// Chapter number, 1..=114
    pub chapter_number: u16,
    /// Verse number within the chapter, 1-based
    pub verse_number: u16,
    /// Token number within the verse, 1-based
    pub token_number: u16,
    /// Location number within the token, 1-based
    pub location_number: u16,
}

impl LocationAddress {
    /// Create a location address from concrete components.
    pub fn new(
        chapter_number: u16,
        verse_number: u16,
        token_number: u16,
        location_number: u16,
    ) -> Self {
        Self {
            chapter_number,
            verse_number,
            token_number,
            location_number,
        }
    }

    /// Address of the owning token.
    pub fn token_address(&self) -> TokenAddress {
        TokenAddress::new(self.chapter_number, self.verse_number, self.token_number)
    }

    /// Canonical display name, usable as an alternate unique key.
    pub fn display_name(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.chapter_number, self.verse_number, self.token_number, self.location_number
        )
    }
}

impl fmt::Display for LocationAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Grammatical word type carried by a location.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordType {
    /// Noun (the default for freshly created locations)
    #[default]
    Noun,
    /// Pronoun
    ProNoun,
    /// Verb
    Verb,
    /// Particle
    Particle,
}

/// Type tag for the polymorphic graph-node variants.
///
/// Every variant except `Root` is stored in its own typed collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GraphNodeType {
    /// Node anchored to a concrete corpus token
    Terminal,
    /// Node for an elided word synthesized into the text
    Implied,
    /// Node for a hidden (non-displayed) word
    Hidden,
    /// Node referencing a token outside the graph's own span
    Reference,
    /// Part-of-speech annotation owned by a terminal-like node
    PartOfSpeech,
    /// Phrase grouping node
    Phrase,
    /// Typed relationship between two nodes
    Relationship,
    /// Synthetic graph root; never persisted
    Root,
}

impl GraphNodeType {
    /// All node types in dispatch order.
    pub const ALL: [GraphNodeType; 8] = [
        GraphNodeType::Terminal,
        GraphNodeType::Implied,
        GraphNodeType::Hidden,
        GraphNodeType::Reference,
        GraphNodeType::PartOfSpeech,
        GraphNodeType::Phrase,
        GraphNodeType::Relationship,
        GraphNodeType::Root,
    ];

    /// Whether this variant exclusively owns part-of-speech child nodes that
    /// must be deleted before the node itself.
    pub fn owns_part_of_speech(&self) -> bool {
        matches!(
            self,
            GraphNodeType::Terminal
                | GraphNodeType::Implied
                | GraphNodeType::Hidden
                | GraphNodeType::Reference
        )
    }
}

impl fmt::Display for GraphNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphNodeType::Terminal => "terminal",
            GraphNodeType::Implied => "implied",
            GraphNodeType::Hidden => "hidden",
            GraphNodeType::Reference => "reference",
            GraphNodeType::PartOfSpeech => "part_of_speech",
            GraphNodeType::Phrase => "phrase",
            GraphNodeType::Relationship => "relationship",
            GraphNodeType::Root => "root",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_range() {
        assert!(chapter_in_range(1));
        assert!(chapter_in_range(114));
        assert!(!chapter_in_range(0));
        assert!(!chapter_in_range(115));
        assert!(!chapter_in_range(-1));
    }

    #[test]
    fn test_checked_address() {
        assert_eq!(
            TokenAddress::checked(2, 3, 4),
            Some(TokenAddress::new(2, 3, 4))
        );
        assert_eq!(TokenAddress::checked(0, 1, 1), None);
        assert_eq!(TokenAddress::checked(1, 0, 1), None);
        assert_eq!(TokenAddress::checked(1, 1, SENTINEL_LAST), None);
        assert_eq!(TokenAddress::checked(115, 1, 1), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TokenAddress::new(1, 7, 3).display_name(), "1:7:3");
        assert_eq!(LocationAddress::new(1, 7, 3, 2).display_name(), "1:7:3:2");
        assert_eq!(
            LocationAddress::new(1, 7, 3, 2).token_address(),
            TokenAddress::new(1, 7, 3)
        );
    }

    #[test]
    fn test_pos_ownership() {
        assert!(GraphNodeType::Terminal.owns_part_of_speech());
        assert!(GraphNodeType::Implied.owns_part_of_speech());
        assert!(GraphNodeType::Hidden.owns_part_of_speech());
        assert!(GraphNodeType::Reference.owns_part_of_speech());
        assert!(!GraphNodeType::PartOfSpeech.owns_part_of_speech());
        assert!(!GraphNodeType::Phrase.owns_part_of_speech());
        assert!(!GraphNodeType::Relationship.owns_part_of_speech());
        assert!(!GraphNodeType::Root.owns_part_of_speech());
    }
}
