//! Corpus reference data.
//!
//! Inventories loaded once per run and consulted by the pipeline stages: the
//! speakers declared in session metadata, the audio files known per corpus,
//! and the injected grapheme-to-IPA phone inventory.
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

use glob::glob;
use log::debug;
use serde::Deserialize;

use crate::error::Error;
use crate::io::reader::MetadataRow;
use crate::records::{global_id, ParameterRecord, SpeakerRecord};

/// Speakers declared by the core session metadata.
///
/// `spk_code`, `spk_age` and `spk_sex` are `/`-separated parallel lists; the
/// age-certainty column may be a matching list or a single value covering
/// all speakers of the session.
#[derive(Debug, Default)]
pub struct SpeakerInventory {
    ids: HashSet<String>,
    records: Vec<SpeakerRecord>,
}

impl SpeakerInventory {
    pub fn from_rows(rows: &[MetadataRow]) -> Result<Self, Error> {
        let mut inventory = Self::default();
        for row in rows {
            // only core sessions declare normalized speakers
            if row.is_extended() {
                continue;
            }
            let codes: Vec<&str> = row.spk_code.split('/').collect();
            let ages: Vec<&str> = row.spk_age.split('/').collect();
            let sexes: Vec<&str> = row.spk_sex.split('/').collect();
            if codes.len() != ages.len() || codes.len() != sexes.len() {
                return Err(Error::RaggedSpeakerRow(format!(
                    "{}: {:?} / {:?} / {:?}",
                    row.corpus, row.spk_code, row.spk_age, row.spk_sex
                )));
            }
            let certainties: Vec<&str> = if row.spk_age_c.contains('/') {
                row.spk_age_c.split('/').collect()
            } else {
                vec![row.spk_age_c.as_str(); codes.len()]
            };

            for (i, code) in codes.iter().enumerate() {
                let id = global_id(&row.corpus, code);
                if !inventory.ids.insert(id.clone()) {
                    continue;
                }
                let age = match ages[i] {
                    "na" => None,
                    a => Some(a.parse::<u32>().map_err(|_| {
                        Error::Custom(format!("bad speaker age {:?} in {}", a, row.corpus))
                    })?),
                };
                inventory.records.push(SpeakerRecord {
                    id,
                    language_id: row.corpus.clone(),
                    age,
                    age_assignment_certain: certainties
                        .get(i)
                        .copied()
                        .unwrap_or_default()
                        .to_string(),
                    sex: sexes[i].to_string(),
                });
            }
        }
        debug!("loaded {} speakers", inventory.records.len());
        Ok(inventory)
    }

    pub fn contains(&self, global_speaker_id: &str) -> bool {
        self.ids.contains(global_speaker_id)
    }

    pub fn records(&self) -> &[SpeakerRecord] {
        &self.records
    }
}

/// Audio files known per corpus, from the `{corpus}_files.json` indexes.
///
/// Word rows only get a file reference when their file appears here.
#[derive(Debug, Default)]
pub struct MediaIndex {
    files: HashMap<String, HashSet<String>>,
}

impl MediaIndex {
    pub fn load(raw: &Path) -> Result<Self, Error> {
        let pattern = raw.join("*_files.json");
        let pattern = pattern
            .to_str()
            .ok_or_else(|| Error::Custom(format!("non-utf8 raw dir: {:?}", raw)))?;

        let mut index = Self::default();
        for path in glob(pattern)? {
            let path = path?;
            let corpus = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.split('_').next())
                .unwrap_or_default()
                .to_string();
            let entries: HashMap<String, serde_json::Value> =
                serde_json::from_reader(File::open(&path)?)?;
            debug!("{}: {} media files", corpus, entries.len());
            index.files.insert(corpus, entries.into_keys().collect());
        }
        Ok(index)
    }

    pub fn contains(&self, corpus: &str, file_id: &str) -> bool {
        self.files
            .get(corpus)
            .map(|files| files.contains(file_id))
            .unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
struct InventoryRow {
    #[serde(rename = "Grapheme")]
    grapheme: String,
    #[serde(rename = "IPA", default)]
    ipa: String,
}

/// Injected grapheme-to-IPA mapping.
///
/// Maps X-SAMPA graphemes to sequential parameter IDs; graphemes without an
/// IPA correspondence are absent and look up to `None`. The mapping itself
/// is opaque to the pipeline.
#[derive(Debug, Default)]
pub struct PhoneInventory {
    ids: HashMap<String, String>,
    records: Vec<ParameterRecord>,
}

impl PhoneInventory {
    /// Load from a tab-delimited file with `Grapheme` and `IPA` columns.
    pub fn from_tsv(path: &Path) -> Result<Self, Error> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_path(path)?;

        let mut inventory = Self::default();
        for row in reader.deserialize() {
            let row: InventoryRow = row?;
            if row.ipa.is_empty() || inventory.ids.contains_key(&row.grapheme) {
                continue;
            }
            let id = (inventory.records.len() + 1).to_string();
            inventory.ids.insert(row.grapheme.clone(), id.clone());
            inventory.records.push(ParameterRecord {
                id,
                grapheme: row.grapheme,
                ipa: row.ipa,
            });
        }
        debug!("loaded {} phone parameters", inventory.records.len());
        Ok(inventory)
    }

    pub fn lookup(&self, grapheme: &str) -> Option<&str> {
        self.ids.get(grapheme).map(String::as_str)
    }

    pub fn records(&self) -> &[ParameterRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn metadata_row(corpus: &str, codes: &str, ages: &str, sexes: &str) -> MetadataRow {
        MetadataRow {
            name: "session".to_string(),
            extended: String::new(),
            spk_code: codes.to_string(),
            spk_age: ages.to_string(),
            spk_sex: sexes.to_string(),
            spk_age_c: "certain".to_string(),
            corpus: corpus.to_string(),
        }
    }

    #[test]
    fn test_speakers_split() {
        let rows = vec![metadata_row("beja1238", "SP1/SP2", "34/na", "m/f")];
        let speakers = SpeakerInventory::from_rows(&rows).unwrap();

        assert!(speakers.contains("beja1238_SP1"));
        assert!(speakers.contains("beja1238_SP2"));
        assert!(!speakers.contains("beja1238_SP3"));
        assert_eq!(speakers.records()[0].age, Some(34));
        assert_eq!(speakers.records()[1].age, None);
        assert_eq!(speakers.records()[1].sex, "f");
    }

    #[test]
    fn test_speakers_deduplicated_across_sessions() {
        let rows = vec![
            metadata_row("beja1238", "SP1", "34", "m"),
            metadata_row("beja1238", "SP1", "34", "m"),
        ];
        let speakers = SpeakerInventory::from_rows(&rows).unwrap();
        assert_eq!(speakers.records().len(), 1);
    }

    #[test]
    fn test_speakers_ragged_is_fatal() {
        let rows = vec![metadata_row("beja1238", "SP1/SP2", "34", "m/f")];
        assert!(matches!(
            SpeakerInventory::from_rows(&rows),
            Err(Error::RaggedSpeakerRow(_))
        ));
    }

    #[test]
    fn test_extended_sessions_skipped() {
        let mut row = metadata_row("beja1238", "SP1", "34", "m");
        row.extended = "yes".to_string();
        let speakers = SpeakerInventory::from_rows(&[row]).unwrap();
        assert!(speakers.records().is_empty());
    }

    #[test]
    fn test_media_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join("beja1238_files.json")).unwrap();
        write!(
            f,
            "{{\"doreco_beja1238_01\": [\"https://example.org/01.wav\", 123]}}"
        )
        .unwrap();
        drop(f);

        let media = MediaIndex::load(dir.path()).unwrap();
        assert!(media.contains("beja1238", "doreco_beja1238_01"));
        assert!(!media.contains("beja1238", "doreco_beja1238_02"));
        assert!(!media.contains("even1259", "doreco_beja1238_01"));
    }

    #[test]
    fn test_phone_inventory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orthography.tsv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "Grapheme\tIPA").unwrap();
        writeln!(f, "tS\tt\u{361}\u{283}").unwrap();
        writeln!(f, "Q\t").unwrap();
        writeln!(f, "a\ta").unwrap();
        drop(f);

        let inventory = PhoneInventory::from_tsv(&path).unwrap();
        assert_eq!(inventory.lookup("tS"), Some("1"));
        // no IPA correspondence: opaque lookup returns None
        assert_eq!(inventory.lookup("Q"), None);
        assert_eq!(inventory.lookup("a"), Some("2"));
        assert_eq!(inventory.records().len(), 2);
    }
}
