//! Interlinear glossed text reconstruction.
//!
//! Word rows carry whitespace-separated morpheme and gloss token lists that
//! were segmented independently; this module re-joins them into aligned
//! morpheme/gloss lines and assembles one IGT example per utterance-level
//! group of word rows.
mod assembler;
mod morphemes;

pub use assembler::IgtAssembler;
pub use morphemes::{
    combine_morphemes, harmonize_separators, split_morphemes, StreamKind, MORPHEME_SEPARATORS,
};
