//! # Glossline
//!
//! Glossline converts multi-corpus collections of time-aligned phonetic and
//! word-level transcription exports into a single normalized relational
//! dataset: a phones table, a words table and a derived table of interlinear
//! glossed text examples, all keyed by globally-namespaced identifiers.
//!
//! The crate can be used as a command line tool (`glossline convert <raw>
//! <dst>`) or as a lib to drive the conversion from other projects.
pub mod error;
pub mod igt;
pub mod io;
pub mod metadata;
pub mod normalize;
pub mod pipeline;
pub mod records;
