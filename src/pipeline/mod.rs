//! Conversion pipeline.
//!
//! The module provides a light [pipeline::Pipeline] trait and the [Convert]
//! pipeline that reconciles the phone and word streams of each corpus into
//! the output tables.
pub mod convert;
pub mod ledger;
pub mod phones;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod words;

pub use convert::Convert;
pub use ledger::IntervalLedger;
pub use phones::PhoneAligner;
pub use pipeline::Pipeline;
pub use words::WordProcessor;
