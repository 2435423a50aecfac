//! Word-stream processing.
//!
//! Walks word rows grouped by (file, transcription, translation), assembling
//! one IGT example per groupable utterance and reconciling every row against
//! the phone-derived interval ledger.
use log::debug;

use crate::error::Error;
use crate::igt::IgtAssembler;
use crate::io::reader::WordRow;
use crate::metadata::MediaIndex;
use crate::records::{global_id, ExampleRecord, WordRecord, FILLER, SILENT_PAUSE};

use super::ledger::IntervalLedger;

/// Consumes word groups, producing word and example records.
pub struct WordProcessor<'a> {
    media: &'a MediaIndex,
    assembler: IgtAssembler,
    words: Vec<WordRecord>,
    examples: Vec<ExampleRecord>,
}

impl<'a> WordProcessor<'a> {
    pub fn new(media: &'a MediaIndex) -> Self {
        Self {
            media,
            assembler: IgtAssembler::new(),
            words: Vec::new(),
            examples: Vec::new(),
        }
    }

    /// Whether a group is glossable at all: non-empty transcription and a
    /// translation that is neither the filler nor the pause marker.
    fn glossable(tx: &str, ft: &str) -> bool {
        !tx.is_empty() && !ft.is_empty() && ft != FILLER && ft != SILENT_PAUSE
    }

    /// Consume one (file, tx, ft) group of word rows.
    pub fn consume_group(
        &mut self,
        file: &str,
        tx: &str,
        ft: &str,
        rows: &[WordRow],
        ledger: &mut IntervalLedger,
    ) -> Result<(), Error> {
        let example_id = if Self::glossable(tx, ft) {
            let file_id = self.group_file_id(file, rows);
            match self.assembler.assemble(rows, tx, ft, file_id.as_deref()) {
                Some(example) => {
                    let id = example.id.clone();
                    self.examples.push(example);
                    Some(id)
                }
                None => None,
            }
        } else {
            debug!("skipping non-glossable group {:?}/{:?}", file, ft);
            None
        };

        for row in rows {
            let word_id = global_id(&row.corpus, &row.id);
            // Speakers are only normalized for words with core phones, so
            // the link is attached on successful reconciliation only.
            let speaker_id = ledger
                .reconcile(&word_id, row.start, row.end)?
                .map(|_| global_id(&row.corpus, &row.speaker));
            let core = !row.is_extended();
            self.words.push(WordRecord {
                language_id: row.corpus.clone(),
                file_id: (core && self.media.contains(&row.corpus, &row.file))
                    .then(|| row.file.clone()),
                core,
                speaker_id,
                example_id: example_id.clone(),
                id: word_id,
                wd: row.wd.clone(),
                start: row.start,
                end: row.end,
                duration: row.end - row.start,
                reference: row.reference.clone(),
                tx: row.tx.clone(),
                ft: row.ft.clone(),
                ps: row.ps.clone(),
                gl: row.glosses.clone(),
            });
        }
        Ok(())
    }

    /// File reference for an example: only when every row of the group is
    /// core and the file is a known media file.
    fn group_file_id(&self, file: &str, rows: &[WordRow]) -> Option<String> {
        let corpus = &rows.first()?.corpus;
        let all_core = rows.iter().all(|row| !row.is_extended());
        (all_core && self.media.contains(corpus, file)).then(|| file.to_string())
    }

    pub fn into_tables(self) -> (Vec<WordRecord>, Vec<ExampleRecord>) {
        (self.words, self.examples)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 2)
    }

    fn word_row(corpus: &str, id: &str, tx: &str, ft: &str, start: i64, end: i64) -> WordRow {
        WordRow {
            lang: corpus.to_string(),
            file: "f1".to_string(),
            core_extended: "core".to_string(),
            speaker: "SP1".to_string(),
            id: id.to_string(),
            wd: "word".to_string(),
            start: dec(start),
            end: dec(end),
            reference: String::new(),
            tx: tx.to_string(),
            ft: ft.to_string(),
            morpheme_ids: "m1".to_string(),
            morphemes: "gaw".to_string(),
            ps: "N".to_string(),
            glosses: "house".to_string(),
            corpus: corpus.to_string(),
        }
    }

    #[test]
    fn test_example_linked_and_interval_consumed() {
        let media = MediaIndex::default();
        let mut ledger = IntervalLedger::default();
        ledger.open("beja1238_w1".to_string(), dec(10));
        ledger.close("beja1238_w1", dec(45));

        let rows = vec![word_row("beja1238", "w1", "gaw", "a house", 10, 50)];
        let mut processor = WordProcessor::new(&media);
        processor
            .consume_group("f1", "gaw", "a house", &rows, &mut ledger)
            .unwrap();

        let (words, examples) = processor.into_tables();
        assert_eq!(examples.len(), 1);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].example_id.as_deref(), Some("beja1238-1"));
        assert_eq!(words[0].speaker_id.as_deref(), Some("beja1238_SP1"));
        assert_eq!(words[0].id, "beja1238_w1");
        assert!(ledger.finish().is_ok());
    }

    #[test]
    fn test_filler_translation_produces_no_example() {
        let media = MediaIndex::default();
        let mut ledger = IntervalLedger::default();

        let rows = vec![word_row("beja1238", "w1", "gaw", FILLER, 10, 50)];
        let mut processor = WordProcessor::new(&media);
        processor
            .consume_group("f1", "gaw", FILLER, &rows, &mut ledger)
            .unwrap();

        let (words, examples) = processor.into_tables();
        assert!(examples.is_empty());
        assert_eq!(words[0].example_id, None);
    }

    #[test]
    fn test_pause_translation_produces_no_example() {
        let media = MediaIndex::default();
        let mut ledger = IntervalLedger::default();

        let rows = vec![word_row("beja1238", "w1", "gaw", SILENT_PAUSE, 10, 50)];
        let mut processor = WordProcessor::new(&media);
        processor
            .consume_group("f1", "gaw", SILENT_PAUSE, &rows, &mut ledger)
            .unwrap();

        let (_, examples) = processor.into_tables();
        assert!(examples.is_empty());
    }

    #[test]
    fn test_extended_word_without_interval() {
        let media = MediaIndex::default();
        let mut ledger = IntervalLedger::default();

        let mut row = word_row("beja1238", "w1", "gaw", "a house", 10, 50);
        row.core_extended = "extended".to_string();
        let mut processor = WordProcessor::new(&media);
        processor
            .consume_group("f1", "gaw", "a house", &[row], &mut ledger)
            .unwrap();

        let (words, _) = processor.into_tables();
        assert!(!words[0].core);
        assert_eq!(words[0].speaker_id, None);
        assert_eq!(words[0].file_id, None);
    }

    #[test]
    fn test_containment_violation_propagates() {
        let media = MediaIndex::default();
        let mut ledger = IntervalLedger::default();
        ledger.open("beja1238_w1".to_string(), dec(5));
        ledger.close("beja1238_w1", dec(60));

        let rows = vec![word_row("beja1238", "w1", "gaw", "a house", 10, 50)];
        let mut processor = WordProcessor::new(&media);
        let result = processor.consume_group("f1", "gaw", "a house", &rows, &mut ledger);
        assert!(matches!(result, Err(Error::Containment { .. })));
    }
}
