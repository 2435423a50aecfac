//! Output record types.
//!
//! One struct per output table, each serializable straight into a CSV row.
//! Every record is keyed by a globally-namespaced identifier of the form
//! `{corpus}_{local}`, so rows from different corpora never collide.
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Marker inserted by the forced-alignment service for manually verified
/// silent pauses. Pauses delimit utterances.
pub const SILENT_PAUSE: &str = "<p:>";

/// Marker used by annotators for filler content.
pub const FILLER: &str = "****";

/// Placeholder for a non-overt (zero) morpheme or gloss slot, used instead of
/// an empty string so morpheme and gloss sequences stay index-aligned.
pub const NON_OVERT: &str = "Ø";

/// Namespace a corpus-local identifier.
pub fn global_id(corpus: &str, local: &str) -> String {
    format!("{}_{}", corpus, local)
}

/// Classification of a phone-tier token.
///
/// Not every row of the phone tier is an actual phone: the tier also carries
/// pause markers and bracketed annotation labels such as `<<fp>word>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Xsampa,
    Label,
    Pause,
}

impl TokenType {
    /// Classify a raw token: the pause marker, a `<<`-prefixed label, or an
    /// X-SAMPA phone.
    pub fn of(token: &str) -> Self {
        if token == SILENT_PAUSE {
            TokenType::Pause
        } else if token.starts_with("<<") {
            TokenType::Label
        } else {
            TokenType::Xsampa
        }
    }
}

/// One row of the phones table.
#[derive(Debug, Clone, Serialize)]
pub struct PhoneRecord {
    #[serde(rename = "ph_ID")]
    pub id: String,
    pub ph: String,
    #[serde(rename = "IPA")]
    pub ipa: Option<String>,
    pub start: Decimal,
    pub end: Decimal,
    pub duration: Decimal,
    #[serde(rename = "wd_ID")]
    pub word_id: String,
    /// Utterance ID. Unset for silent pauses, which delimit utterances but
    /// belong to none.
    #[serde(rename = "u_ID")]
    pub utterance_id: Option<String>,
    #[serde(rename = "Token_Type")]
    pub token_type: TokenType,
}

/// One row of the words table.
#[derive(Debug, Clone, Serialize)]
pub struct WordRecord {
    #[serde(rename = "Language_ID")]
    pub language_id: String,
    #[serde(rename = "File_ID")]
    pub file_id: Option<String>,
    pub core: bool,
    /// Only populated for core words, i.e. words with a reconciled
    /// phone-derived interval.
    #[serde(rename = "Speaker_ID")]
    pub speaker_id: Option<String>,
    #[serde(rename = "Example_ID")]
    pub example_id: Option<String>,
    #[serde(rename = "wd_ID")]
    pub id: String,
    pub wd: String,
    pub start: Decimal,
    pub end: Decimal,
    pub duration: Decimal,
    #[serde(rename = "ref")]
    pub reference: String,
    pub tx: String,
    pub ft: String,
    pub ps: String,
    pub gl: String,
}

/// Structural conformance of an IGT example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Conformance {
    /// Word counts match, every word has matching morpheme segmentation on
    /// both lines, and every morpheme has a non-empty gloss.
    MorphemeAligned,
    /// Word counts match but some word's morpheme segmentation does not.
    WordAligned,
    /// Morpheme and gloss line lengths differ.
    Misaligned,
}

/// One interlinear-glossed-text example, covering all word rows that share a
/// (file, transcription, translation) triple.
#[derive(Debug, Clone, Serialize)]
pub struct ExampleRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Language_ID")]
    pub language_id: String,
    #[serde(rename = "Primary_Text")]
    pub primary_text: String,
    #[serde(rename = "Analyzed_Word", serialize_with = "join_tab")]
    pub analyzed_word: Vec<String>,
    #[serde(rename = "Gloss", serialize_with = "join_tab")]
    pub gloss: Vec<String>,
    #[serde(rename = "Translated_Text")]
    pub translated_text: String,
    #[serde(rename = "Conformance")]
    pub conformance: Conformance,
    #[serde(rename = "File_ID")]
    pub file_id: Option<String>,
    pub start: Option<Decimal>,
    pub end: Option<Decimal>,
    pub duration: Option<Decimal>,
}

/// One row of the speakers reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Language_ID")]
    pub language_id: String,
    pub age: Option<u32>,
    pub age_assignment_certain: String,
    pub sex: String,
}

/// One row of the phone-inventory (parameters) reference table.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Grapheme")]
    pub grapheme: String,
    #[serde(rename = "IPA")]
    pub ipa: String,
}

/// Time interval of a word, as witnessed by its phones.
///
/// Opened on the word's first core phone, closed on its last, deleted when
/// the matching word row is reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordInterval {
    pub start: Decimal,
    pub end: Option<Decimal>,
}

/// Tab-join a token sequence for CSV output (CLDF list-valued column).
fn join_tab<S>(tokens: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&tokens.join("\t"))
}
