//! Raw field cleanup.
//!
//! Corpus exports come with encoding artifacts and per-corpus annotation
//! conventions in their transcription (`tx`) and translation (`ft`) fields.
//! [normalize] best-efforts cleanup and never fails: anything unrecognized
//! passes through unchanged.
//!
//! Corpus-specific behavior lives in [PATCHES], a declarative
//! `(corpus, field) -> transform` table, so supporting a new corpus quirk is
//! a data change, not a code change.
use std::collections::HashMap;

use itertools::Itertools;
use lazy_static::lazy_static;

/// Which raw field a string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `tx`: phrase-level transcription.
    Transcription,
    /// `ft`: free translation.
    Translation,
}

/// Sentinel some corpora use for an absent translation.
const EMPTY_SENTINEL: &str = "EMPTY";

lazy_static! {
    /// Known mis-decoded byte sequences and their intended characters.
    static ref MOJIBAKE: HashMap<&'static str, &'static str> = [
        ("â\u{80}\u{9d}", "”"),
        ("â\u{80}\u{9c}", "“"),
        // doubled left-to-right marks
        ("\u{200e}\u{200e}", ""),
    ]
    .into_iter()
    .collect();
}

struct CorpusPatch {
    corpus: &'static str,
    field: FieldKind,
    apply: fn(&str) -> String,
}

/// bain1259 stores "french | english" translations; only the second language
/// is kept.
fn keep_after_pipe(s: &str) -> String {
    match s.split_once('|') {
        Some((_, rest)) => rest.trim().to_string(),
        None => s.to_string(),
    }
}

/// Trailing `/` or `//` marks truncation in some transcription conventions.
fn strip_trailing_slashes(s: &str) -> String {
    let mut s = s.trim();
    while let Some(stripped) = s.strip_suffix('/') {
        s = stripped.trim_end();
    }
    s.to_string()
}

static PATCHES: &[CorpusPatch] = &[
    CorpusPatch {
        corpus: "bain1259",
        field: FieldKind::Translation,
        apply: keep_after_pipe,
    },
    CorpusPatch {
        corpus: "bain1259",
        field: FieldKind::Transcription,
        apply: strip_trailing_slashes,
    },
    CorpusPatch {
        corpus: "anal1239",
        field: FieldKind::Transcription,
        apply: strip_trailing_slashes,
    },
    CorpusPatch {
        corpus: "beja1238",
        field: FieldKind::Transcription,
        apply: strip_trailing_slashes,
    },
];

/// Strip one layer of surrounding quotes: `'...'` or `` `...' ``.
fn strip_quotes(s: &str) -> &str {
    let quoted = (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
        || (s.starts_with('`') && s.ends_with('\'') && s.len() >= 2);
    if quoted {
        s[1..s.len() - 1].trim()
    } else {
        s
    }
}

/// Clean a raw `tx`/`ft` field.
pub fn normalize(text: &str, field: FieldKind, corpus: &str) -> String {
    let mut s = text.trim().to_string();
    for (broken, fixed) in MOJIBAKE.iter() {
        s = s.replace(broken, fixed);
    }

    for patch in PATCHES {
        if patch.corpus == corpus && patch.field == field {
            s = (patch.apply)(&s);
        }
    }

    if field == FieldKind::Translation {
        s = strip_quotes(&s).to_string();
        if s == EMPTY_SENTINEL {
            s.clear();
        }
    }

    // Normalize whitespace.
    s.split_whitespace().join(" ")
}
