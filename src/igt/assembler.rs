//! IGT example assembly.
use std::collections::{HashMap, HashSet};

use itertools::izip;
use log::debug;

use crate::io::reader::WordRow;
use crate::records::{Conformance, ExampleRecord, NON_OVERT};

use super::morphemes::{combine_morphemes, harmonize_separators, split_morphemes, StreamKind};

/// Assembles one IGT example per utterance-level group of word rows.
///
/// Example IDs are sequential per corpus. The counter advances for every
/// group the assembler sees, including groups that end up producing no
/// example, so ID sequences stay stable when annotation coverage varies.
#[derive(Debug, Default)]
pub struct IgtAssembler {
    counters: HashMap<String, u64>,
}

impl IgtAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the example for a group of word rows sharing a
    /// (file, transcription, translation) triple.
    ///
    /// Returns `None` when the group carries no morpheme annotation at all
    /// (some corpora gloss only at the word level); such groups contribute
    /// words with no example link.
    pub fn assemble(
        &mut self,
        rows: &[WordRow],
        tx: &str,
        ft: &str,
        file_id: Option<&str>,
    ) -> Option<ExampleRecord> {
        let corpus = rows.first()?.corpus.clone();
        let counter = self.counters.entry(corpus.clone()).or_insert(0);
        *counter += 1;
        let id = format!("{}-{}", corpus, counter);

        // Aggregate morphemes per word, deduplicating by morpheme ID across
        // the whole group: rows linked to the same utterance repeat the
        // utterance's morpheme data.
        let mut seen: HashSet<String> = HashSet::new();
        let mut morphemes: Vec<String> = Vec::new();
        let mut glosses: Vec<String> = Vec::new();
        for row in rows {
            let mut word_morphemes = Vec::new();
            let mut word_glosses = Vec::new();
            for (mb, gl, mb_id) in izip!(
                row.morphemes.split_whitespace(),
                row.glosses.split_whitespace(),
                row.morpheme_ids.split_whitespace()
            ) {
                if seen.insert(mb_id.to_string()) {
                    word_morphemes.push(mb.to_string());
                    word_glosses.push(gl.to_string());
                }
            }
            if !word_morphemes.is_empty() {
                morphemes.push(combine_morphemes(&word_morphemes, StreamKind::Morpheme));
            }
            if !word_glosses.is_empty() {
                glosses.push(combine_morphemes(&word_glosses, StreamKind::Gloss));
            }
        }

        if !morphemes.iter().any(|m| !m.is_empty()) {
            debug!("{}: no morphemes, skipping example", id);
            return None;
        }

        let conformance = classify(&morphemes, &glosses);
        let (mut morphemes, mut glosses) = if morphemes.len() == glosses.len() {
            harmonize_separators(&morphemes, &glosses)
        } else {
            (morphemes, glosses)
        };
        align_slots(&mut morphemes, &mut glosses);

        let (start, end) = match file_id {
            Some(_) => (
                Some(rows.first()?.start),
                Some(rows.last()?.end),
            ),
            None => (None, None),
        };

        Some(ExampleRecord {
            id,
            language_id: corpus,
            primary_text: tx.to_string(),
            analyzed_word: morphemes,
            gloss: glosses,
            translated_text: ft.to_string(),
            conformance,
            file_id: file_id.map(str::to_string),
            start,
            end,
            duration: end.and_then(|e| start.map(|s| e - s)),
        })
    }
}

/// Structural conformance check: word counts, per-word morpheme counts, and
/// a non-empty gloss for every overt morpheme.
fn classify(morphemes: &[String], glosses: &[String]) -> Conformance {
    if morphemes.len() != glosses.len() {
        return Conformance::Misaligned;
    }
    for (morpheme, gloss) in morphemes.iter().zip(glosses.iter()) {
        let mparts = split_morphemes(morpheme);
        let gparts = split_morphemes(gloss);
        if mparts.len() != gparts.len() {
            return Conformance::WordAligned;
        }
        let ungapped = mparts
            .iter()
            .zip(gparts.iter())
            .step_by(2)
            .all(|(m, g)| m.is_empty() || !g.is_empty());
        if !ungapped {
            return Conformance::WordAligned;
        }
    }
    Conformance::MorphemeAligned
}

/// Keep the two lines index-aligned: empty slots become the non-overt
/// placeholder and the shorter line is padded with it.
fn align_slots(morphemes: &mut Vec<String>, glosses: &mut Vec<String>) {
    for slot in morphemes.iter_mut().chain(glosses.iter_mut()) {
        if slot.is_empty() {
            *slot = NON_OVERT.to_string();
        }
    }
    let len = morphemes.len().max(glosses.len());
    morphemes.resize(len, NON_OVERT.to_string());
    glosses.resize(len, NON_OVERT.to_string());
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn word_row(corpus: &str, mb: &str, gl: &str, mb_id: &str, start: i64, end: i64) -> WordRow {
        WordRow {
            lang: corpus.to_string(),
            file: "f1".to_string(),
            core_extended: String::new(),
            speaker: "SP1".to_string(),
            id: "w1".to_string(),
            wd: "word".to_string(),
            start: Decimal::new(start, 2),
            end: Decimal::new(end, 2),
            reference: String::new(),
            tx: "tx".to_string(),
            ft: "ft".to_string(),
            morpheme_ids: mb_id.to_string(),
            morphemes: mb.to_string(),
            ps: String::new(),
            glosses: gl.to_string(),
            corpus: corpus.to_string(),
        }
    }

    #[test]
    fn test_example_ids_sequential_per_corpus() {
        let mut assembler = IgtAssembler::new();
        let rows = vec![word_row("beja1238", "gaw", "house", "m1", 0, 50)];
        let ex = assembler.assemble(&rows, "tx", "ft", None).unwrap();
        assert_eq!(ex.id, "beja1238-1");

        let rows = vec![word_row("beja1238", "tak", "man", "m2", 50, 90)];
        let ex = assembler.assemble(&rows, "tx", "ft", None).unwrap();
        assert_eq!(ex.id, "beja1238-2");

        let rows = vec![word_row("even1259", "bej", "come", "m1", 0, 40)];
        let ex = assembler.assemble(&rows, "tx", "ft", None).unwrap();
        assert_eq!(ex.id, "even1259-1");
    }

    #[test]
    fn test_counter_advances_on_skipped_group() {
        let mut assembler = IgtAssembler::new();
        // no morpheme annotation: no example, but the ID is consumed
        let rows = vec![word_row("beja1238", "", "", "", 0, 50)];
        assert!(assembler.assemble(&rows, "tx", "ft", None).is_none());

        let rows = vec![word_row("beja1238", "gaw", "house", "m1", 50, 90)];
        let ex = assembler.assemble(&rows, "tx", "ft", None).unwrap();
        assert_eq!(ex.id, "beja1238-2");
    }

    #[test]
    fn test_duplicate_morpheme_ids_dropped() {
        let mut assembler = IgtAssembler::new();
        let rows = vec![
            word_row("beja1238", "gaw i", "house PL", "m1 m2", 0, 50),
            // repeats m2, adds m3
            word_row("beja1238", "i tak", "PL man", "m2 m3", 50, 90),
        ];
        let ex = assembler.assemble(&rows, "tx", "ft", None).unwrap();
        assert_eq!(ex.analyzed_word, vec!["gaw-i", "tak"]);
        assert_eq!(ex.gloss, vec!["house-PL", "man"]);
        assert_eq!(ex.conformance, Conformance::MorphemeAligned);
    }

    #[test]
    fn test_harmonization_applied() {
        let mut assembler = IgtAssembler::new();
        let rows = vec![word_row("kama1351", "anē=n", "DEM1.A-ART", "m1", 0, 50)];
        let ex = assembler.assemble(&rows, "tx", "ft", None).unwrap();
        assert_eq!(ex.analyzed_word, vec!["anē=n"]);
        assert_eq!(ex.gloss, vec!["DEM1.A=ART"]);
    }

    #[test]
    fn test_non_overt_placeholder_keeps_alignment() {
        let mut assembler = IgtAssembler::new();
        // a bare separator combines to the empty string
        let rows = vec![
            word_row("beja1238", "gaw", "house", "m1", 0, 50),
            word_row("beja1238", "=", "x", "m2", 50, 90),
        ];
        let ex = assembler.assemble(&rows, "tx", "ft", None).unwrap();
        assert_eq!(ex.analyzed_word, vec!["gaw", NON_OVERT]);
        assert_eq!(ex.gloss, vec!["house", "x"]);
        assert_eq!(ex.analyzed_word.len(), ex.gloss.len());
    }

    #[test]
    fn test_classify() {
        let strings = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            classify(&strings(&["a-b"]), &strings(&["A-B", "C"])),
            Conformance::Misaligned
        );
        // overt morpheme with an empty gloss slot
        assert_eq!(
            classify(&strings(&["a-b"]), &strings(&["A-"])),
            Conformance::WordAligned
        );
        assert_eq!(
            classify(&strings(&["a-b"]), &strings(&["A-B"])),
            Conformance::MorphemeAligned
        );
    }

    #[test]
    fn test_word_aligned_on_segmentation_mismatch() {
        let mut assembler = IgtAssembler::new();
        let rows = vec![word_row("beja1238", "gaw=i", "house.PL", "m1", 0, 50)];
        let ex = assembler.assemble(&rows, "tx", "ft", None).unwrap();
        assert_eq!(ex.conformance, Conformance::WordAligned);
        // part counts differ: both lines pass through unharmonized
        assert_eq!(ex.analyzed_word, vec!["gaw=i"]);
        assert_eq!(ex.gloss, vec!["house.PL"]);
    }

    #[test]
    fn test_file_span() {
        let mut assembler = IgtAssembler::new();
        let rows = vec![
            word_row("beja1238", "gaw", "house", "m1", 10, 50),
            word_row("beja1238", "tak", "man", "m2", 50, 90),
        ];
        let ex = assembler
            .assemble(&rows, "tx", "ft", Some("doreco_beja1238_01"))
            .unwrap();
        assert_eq!(ex.file_id.as_deref(), Some("doreco_beja1238_01"));
        assert_eq!(ex.start, Some(Decimal::new(10, 2)));
        assert_eq!(ex.end, Some(Decimal::new(90, 2)));
        assert_eq!(ex.duration, Some(Decimal::new(80, 2)));

        let rows = vec![word_row("beja1238", "gaw", "house", "m3", 10, 50)];
        let ex = assembler.assemble(&rows, "tx", "ft", None).unwrap();
        assert_eq!(ex.file_id, None);
        assert_eq!(ex.start, None);
    }
}
