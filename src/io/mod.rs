/*! Corpus I/O.

Readers for the raw per-corpus export files, the grouped cursor used to walk
them, and writers for the output tables.
!*/
pub mod grouped;
pub mod reader;
pub mod writer;

pub use grouped::Grouped;
pub use writer::TableWriter;
