//! Phone-stream word-interval reconstruction.
//!
//! Walks phone rows grouped by word ID, rebuilding each word's time interval
//! from its bounding phones and assigning utterance IDs at silent-pause
//! boundaries. Known per-corpus export defects are repaired on the way in;
//! anything violating the ordering assumptions of the stream is fatal.
use log::debug;
use rust_decimal::Decimal;

use crate::error::Error;
use crate::io::reader::PhoneRow;
use crate::metadata::{PhoneInventory, SpeakerInventory};
use crate::records::{global_id, PhoneRecord, TokenType, SILENT_PAUSE};

use super::ledger::IntervalLedger;

/// Corpus whose exports embed a stray prefix (separated by a space) in some
/// word IDs.
const SPACED_WID_CORPUS: &str = "even1259";

/// Speaker-code prefix carrying a stray leading digit.
const STRAY_DIGIT_SPEAKER: &str = "yuca1254_0";

/// State threaded through the phone stream of a run.
///
/// The utterance counter is global to the run but bumped on corpus switches,
/// so utterances never bleed across corpus boundaries.
pub struct PhoneAligner<'a> {
    speakers: &'a SpeakerInventory,
    inventory: &'a PhoneInventory,
    utterance: u64,
    corpus: Option<String>,
    last_end: Option<Decimal>,
}

impl<'a> PhoneAligner<'a> {
    pub fn new(speakers: &'a SpeakerInventory, inventory: &'a PhoneInventory) -> Self {
        Self {
            speakers,
            inventory,
            utterance: 0,
            corpus: None,
            last_end: None,
        }
    }

    /// Consume one word's phone group, appending its phone records to `out`
    /// and its interval to the ledger.
    pub fn consume_group(
        &mut self,
        word_id: &str,
        rows: &[PhoneRow],
        ledger: &mut IntervalLedger,
        out: &mut Vec<PhoneRecord>,
    ) -> Result<(), Error> {
        let first = match rows.first() {
            Some(first) => first,
            None => return Ok(()),
        };
        // only core phones are reconstructed
        if first.is_extended() {
            debug!("skipping extended word {}", word_id);
            return Ok(());
        }

        let corpus = first.corpus.clone();
        if self.corpus.as_deref() != Some(&corpus) {
            // a new corpus: make sure we are not conflating utterances
            self.utterance += 1;
            self.corpus = Some(corpus.clone());
        }

        let global_wid = global_id(&corpus, repair_word_id(word_id, &corpus)?);
        let speaker = repair_speaker(&global_id(&corpus, &first.speaker));
        if !self.speakers.contains(&speaker) {
            return Err(Error::UnknownSpeaker(speaker));
        }

        ledger.open(global_wid.clone(), first.start);

        let mut last_core_end = first.start;
        for (i, row) in rows.iter().enumerate() {
            // a trailing extended phone ends the word like stream exhaustion
            if row.is_extended() {
                break;
            }
            if i > 0 {
                if let Some(last_end) = self.last_end {
                    if row.start < last_end {
                        return Err(Error::PhoneOrder {
                            phone_id: global_id(&corpus, &row.id),
                            start: row.start,
                            last_end,
                        });
                    }
                }
            }

            let pause = row.ph == SILENT_PAUSE;
            if pause {
                // silent pauses delimit utterances and belong to none
                self.utterance += 1;
            }

            out.push(PhoneRecord {
                id: global_id(&corpus, &row.id),
                ph: row.ph.clone(),
                ipa: self.inventory.lookup(&row.ph).map(str::to_string),
                start: row.start,
                end: row.end,
                duration: row.end - row.start,
                word_id: global_wid.clone(),
                utterance_id: (!pause).then(|| self.utterance.to_string()),
                token_type: TokenType::of(&row.ph),
            });
            self.last_end = Some(row.end);
            last_core_end = row.end;
        }

        ledger.close(&global_wid, last_core_end);
        Ok(())
    }
}

/// Keep only the final space-delimited component of a word ID, a known
/// export artifact whitelisted for one corpus.
fn repair_word_id<'w>(word_id: &'w str, corpus: &str) -> Result<&'w str, Error> {
    let last = word_id.split_whitespace().last().unwrap_or(word_id);
    if last != word_id && corpus != SPACED_WID_CORPUS {
        return Err(Error::MalformedWordId(format!("{}: {:?}", corpus, word_id)));
    }
    Ok(last)
}

/// Remove the stray leading digit of a known speaker-code typo.
fn repair_speaker(speaker: &str) -> String {
    if speaker.starts_with(STRAY_DIGIT_SPEAKER) {
        speaker.replacen("_0", "_", 1)
    } else {
        speaker.to_string()
    }
}
