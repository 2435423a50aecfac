//! Corpus conversion pipeline.
//!
//! Reads the raw per-corpus exports and produces the normalized tables:
//!
//! 1. Load reference data (speakers, media index, phone inventory).
//! 1. Walk the phone stream grouped by word ID, reconstructing word
//!    intervals and utterance IDs (phones.csv).
//! 1. Walk the word stream grouped by (file, tx, ft), assembling IGT
//!    examples and reconciling every row against the interval ledger
//!    (words.csv, examples.csv).
//! 1. Fail the run if any interval was left unreconciled.
//!
//! The phone pass must complete before the word pass starts: the ledger is
//! only authoritative once the phone stream is exhausted.
use std::path::PathBuf;

use log::{info, warn};

use crate::error::Error;
use crate::io::reader::{read_metadata_rows, read_phone_rows, read_word_rows};
use crate::io::{Grouped, TableWriter};
use crate::metadata::{MediaIndex, PhoneInventory, SpeakerInventory};
use crate::pipeline::{IntervalLedger, PhoneAligner, Pipeline, WordProcessor};

pub struct Convert {
    raw: PathBuf,
    dst: PathBuf,
    inventory: Option<PathBuf>,
}

impl Convert {
    pub fn new(raw: PathBuf, dst: PathBuf, inventory: Option<PathBuf>) -> Self {
        if inventory.is_none() {
            warn!("No phone inventory provided! IPA links will be empty.");
        }
        Self {
            raw,
            dst,
            inventory,
        }
    }
}

impl Pipeline<()> for Convert {
    fn version() -> &'static str {
        "0.3.0"
    }

    fn run(&self) -> Result<(), Error> {
        if !self.dst.exists() {
            warn!("Destination dir does not exist. Creating");
            std::fs::create_dir_all(&self.dst)?;
        }

        let inventory = match &self.inventory {
            Some(path) => PhoneInventory::from_tsv(path)?,
            None => PhoneInventory::default(),
        };
        let metadata_rows = read_metadata_rows(&self.raw)?;
        let speakers = SpeakerInventory::from_rows(&metadata_rows)?;
        let media = MediaIndex::load(&self.raw)?;
        info!(
            "loaded {} speakers, {} phone parameters",
            speakers.records().len(),
            inventory.records().len()
        );

        // phone pass
        let phone_rows = read_phone_rows(&self.raw)?;
        info!("processing {} phone rows", phone_rows.len());
        let mut ledger = IntervalLedger::default();
        let mut aligner = PhoneAligner::new(&speakers, &inventory);
        let mut phones = Vec::new();
        for (word_id, group) in Grouped::new(phone_rows.into_iter(), |r| r.word_id.clone()) {
            aligner.consume_group(&word_id, &group, &mut ledger, &mut phones)?;
        }
        info!(
            "reconstructed {} word intervals from {} phones",
            ledger.len(),
            phones.len()
        );

        let mut writer = TableWriter::create(&self.dst.join("phones.csv"))?;
        writer.write_all(&phones)?;
        writer.finish()?;

        // word pass
        let word_rows = read_word_rows(&self.raw)?;
        info!("processing {} word rows", word_rows.len());
        let mut processor = WordProcessor::new(&media);
        for ((file, tx, ft), group) in Grouped::new(word_rows.into_iter(), |r| r.group_key()) {
            processor.consume_group(&file, &tx, &ft, &group, &mut ledger)?;
        }
        let (words, examples) = processor.into_tables();
        info!("{} words, {} examples", words.len(), examples.len());

        let mut writer = TableWriter::create(&self.dst.join("words.csv"))?;
        writer.write_all(&words)?;
        writer.finish()?;

        let mut writer = TableWriter::create(&self.dst.join("examples.csv"))?;
        writer.write_all(&examples)?;
        writer.finish()?;

        let mut writer = TableWriter::create(&self.dst.join("speakers.csv"))?;
        writer.write_all(speakers.records())?;
        writer.finish()?;

        let mut writer = TableWriter::create(&self.dst.join("parameters.csv"))?;
        writer.write_all(inventory.records())?;
        writer.finish()?;

        // every phone-derived word must have found its word row
        ledger.finish()?;
        info!("run complete");
        Ok(())
    }
}
