//! Raw corpus export readers.
//!
//! Each corpus ships `{corpus}_ph.csv`, `{corpus}_wd.csv` and
//! `{corpus}_metadata.csv` files. Files are read in name order so the
//! per-corpus sort of the exports carries over to the row streams. One
//! corpus exports tab-delimited files, so the delimiter is sniffed from the
//! first line of each file.
//!
//! The corpus code is inferred from the file-name prefix. A `lang` column
//! disagreeing with it is a known packaging defect: it is reported once per
//! corpus and the inferred code wins.
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use glob::glob;
use log::warn;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::Error;
use crate::normalize::{normalize, FieldKind};

/// A raw row tagged with the corpus it was read from.
pub trait RawRow: DeserializeOwned {
    /// Corpus code declared inside the row, if any.
    fn declared_corpus(&self) -> &str;
    /// Called once per row with the corpus code inferred from the file name.
    fn attach_corpus(&mut self, corpus: &str);
}

/// One row of a `*_ph.csv` phone-tier export.
#[derive(Debug, Clone, Deserialize)]
pub struct PhoneRow {
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub core_extended: String,
    #[serde(default)]
    pub speaker: String,
    #[serde(rename = "ph_ID")]
    pub id: String,
    pub ph: String,
    pub start: Decimal,
    pub end: Decimal,
    #[serde(rename = "wd_ID")]
    pub word_id: String,
    /// Corpus code inferred from the file name.
    #[serde(skip)]
    pub corpus: String,
}

impl PhoneRow {
    pub fn is_extended(&self) -> bool {
        self.core_extended == "extended"
    }
}

impl RawRow for PhoneRow {
    fn declared_corpus(&self) -> &str {
        &self.lang
    }

    fn attach_corpus(&mut self, corpus: &str) {
        self.corpus = corpus.to_string();
    }
}

/// One row of a `*_wd.csv` word-tier export.
#[derive(Debug, Clone, Deserialize)]
pub struct WordRow {
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub core_extended: String,
    #[serde(default)]
    pub speaker: String,
    #[serde(rename = "wd_ID")]
    pub id: String,
    #[serde(default)]
    pub wd: String,
    pub start: Decimal,
    pub end: Decimal,
    #[serde(rename = "ref", default)]
    pub reference: String,
    #[serde(default)]
    pub tx: String,
    #[serde(default)]
    pub ft: String,
    #[serde(rename = "mb_ID", default)]
    pub morpheme_ids: String,
    #[serde(rename = "mb", default)]
    pub morphemes: String,
    #[serde(default)]
    pub ps: String,
    #[serde(rename = "gl", default)]
    pub glosses: String,
    /// Corpus code inferred from the file name.
    #[serde(skip)]
    pub corpus: String,
}

impl WordRow {
    pub fn is_extended(&self) -> bool {
        self.core_extended == "extended"
    }

    /// Utterance-level grouping key.
    pub fn group_key(&self) -> (String, String, String) {
        (self.file.clone(), self.tx.clone(), self.ft.clone())
    }
}

impl RawRow for WordRow {
    fn declared_corpus(&self) -> &str {
        &self.lang
    }

    fn attach_corpus(&mut self, corpus: &str) {
        self.corpus = corpus.to_string();
        self.tx = normalize(&self.tx, FieldKind::Transcription, corpus);
        self.ft = normalize(&self.ft, FieldKind::Translation, corpus);
    }
}

/// One row of a `*_metadata.csv` file/session export.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub extended: String,
    #[serde(default)]
    pub spk_code: String,
    #[serde(default)]
    pub spk_age: String,
    #[serde(default)]
    pub spk_sex: String,
    #[serde(default)]
    pub spk_age_c: String,
    #[serde(skip)]
    pub corpus: String,
}

impl MetadataRow {
    pub fn is_extended(&self) -> bool {
        self.extended == "yes"
    }
}

impl RawRow for MetadataRow {
    fn declared_corpus(&self) -> &str {
        ""
    }

    fn attach_corpus(&mut self, corpus: &str) {
        self.corpus = corpus.to_string();
    }
}

/// Corpus code from a `{corpus}_<kind>.csv` file name.
fn corpus_code(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('_').next())
        .unwrap_or_default()
        .to_string()
}

/// Even gloss abbreviations come in a tab-delimited file: sniff the first
/// line instead of trusting the extension.
fn sniff_delimiter(path: &Path) -> Result<u8, Error> {
    let mut first_line = String::new();
    BufReader::new(File::open(path)?).read_line(&mut first_line)?;
    Ok(if first_line.contains('\t') { b'\t' } else { b',' })
}

fn read_rows<T: RawRow>(raw: &Path, suffix: &str) -> Result<Vec<T>, Error> {
    let pattern = raw.join(format!("*{}", suffix));
    let pattern = pattern
        .to_str()
        .ok_or_else(|| Error::Custom(format!("non-utf8 raw dir: {:?}", raw)))?;

    let mut paths = glob(pattern)?.collect::<Result<Vec<PathBuf>, _>>()?;
    paths.sort();

    let mut rows = Vec::new();
    let mut mismatched: HashSet<String> = HashSet::new();
    for path in paths {
        let corpus = corpus_code(&path);
        let delimiter = sniff_delimiter(&path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_path(&path)?;
        for row in reader.deserialize() {
            let mut row: T = row?;
            let declared = row.declared_corpus();
            if !declared.is_empty() && declared != corpus && mismatched.insert(corpus.clone()) {
                warn!(
                    "corpus code mismatch in {:?}: rows declare {:?}",
                    path, declared
                );
            }
            row.attach_corpus(&corpus);
            rows.push(row);
        }
    }
    Ok(rows)
}

/// All phone rows under `raw`, in file-name order.
pub fn read_phone_rows(raw: &Path) -> Result<Vec<PhoneRow>, Error> {
    read_rows(raw, "_ph.csv")
}

/// All word rows under `raw`, in file-name order. `tx`/`ft` fields are
/// normalized on read.
pub fn read_word_rows(raw: &Path) -> Result<Vec<WordRow>, Error> {
    read_rows(raw, "_wd.csv")
}

/// All session-metadata rows under `raw`, in file-name order.
pub fn read_metadata_rows(raw: &Path) -> Result<Vec<MetadataRow>, Error> {
    read_rows(raw, "_metadata.csv")
}
