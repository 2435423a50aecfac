//! Word-interval reconciliation ledger.
use std::collections::HashMap;

use log::error;
use rust_decimal::Decimal;

use crate::error::Error;
use crate::records::WordInterval;

/// Live map of phone-derived word intervals.
///
/// Entries are opened and closed by the phone stage and consumed by the word
/// stage. A run is only consistent when every phone-derived word found
/// exactly one word row: containment violations and leftover entries are
/// fatal.
#[derive(Debug, Default)]
pub struct IntervalLedger {
    intervals: HashMap<String, WordInterval>,
}

impl IntervalLedger {
    /// Open the interval for a word at its first phone's start.
    pub fn open(&mut self, word_id: String, start: Decimal) {
        self.intervals.insert(word_id, WordInterval { start, end: None });
    }

    /// Close the interval at the word's last phone's end.
    pub fn close(&mut self, word_id: &str, end: Decimal) {
        if let Some(interval) = self.intervals.get_mut(word_id) {
            interval.end = Some(end);
        }
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Match a word row against its phone-derived interval.
    ///
    /// Unknown IDs return `Ok(None)`: the word has no core phones. A present
    /// interval must be contained by the row's boundaries; on success it is
    /// removed and returned.
    pub fn reconcile(
        &mut self,
        word_id: &str,
        start: Decimal,
        end: Decimal,
    ) -> Result<Option<WordInterval>, Error> {
        let interval = match self.intervals.remove(word_id) {
            Some(interval) => interval,
            None => return Ok(None),
        };
        let interval_end = interval.end.ok_or_else(|| {
            Error::Custom(format!("interval for {} was never closed", word_id))
        })?;
        if start > interval.start || interval_end > end {
            return Err(Error::Containment {
                word_id: word_id.to_string(),
            });
        }
        Ok(Some(interval))
    }

    /// End-of-run check: every interval must have been reconciled.
    pub fn finish(&self) -> Result<(), Error> {
        if self.intervals.is_empty() {
            return Ok(());
        }
        for word_id in self.intervals.keys() {
            error!("unreconciled word interval: {}", word_id);
        }
        Err(Error::Unreconciled(self.intervals.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 2)
    }

    #[test]
    fn test_reconcile_contained() {
        let mut ledger = IntervalLedger::default();
        ledger.open("beja1238_w1".to_string(), dec(10));
        ledger.close("beja1238_w1", dec(50));

        let interval = ledger.reconcile("beja1238_w1", dec(10), dec(55)).unwrap();
        assert_eq!(
            interval,
            Some(WordInterval {
                start: dec(10),
                end: Some(dec(50)),
            })
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_reconcile_unknown_word() {
        let mut ledger = IntervalLedger::default();
        assert!(ledger
            .reconcile("beja1238_w9", dec(0), dec(100))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_containment_violation_is_fatal() {
        let mut ledger = IntervalLedger::default();
        ledger.open("beja1238_w1".to_string(), dec(10));
        ledger.close("beja1238_w1", dec(50));

        // word row starts after the first phone
        assert!(matches!(
            ledger.reconcile("beja1238_w1", dec(20), dec(55)),
            Err(Error::Containment { .. })
        ));
    }

    #[test]
    fn test_finish_reports_leftovers() {
        let mut ledger = IntervalLedger::default();
        assert!(ledger.finish().is_ok());

        ledger.open("beja1238_w1".to_string(), dec(10));
        ledger.close("beja1238_w1", dec(50));
        assert!(matches!(ledger.finish(), Err(Error::Unreconciled(1))));
    }
}
