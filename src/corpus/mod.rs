//! Corpus layer: hierarchical addressing, entities and sequence navigation

pub mod address;
pub mod model;
pub mod navigator;

pub use address::AddressSpace;
pub use model::{Chapter, ChapterSummary, Location, MorphologicalEntry, Token, Verse};
pub use navigator::TokenNavigator;
