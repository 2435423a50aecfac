//! Error enum
use rust_decimal::Decimal;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Csv(csv::Error),
    Serde(serde_json::Error),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    Decimal(rust_decimal::Error),
    /// A phone starts before the previously emitted phone ended.
    PhoneOrder {
        phone_id: String,
        start: Decimal,
        last_end: Decimal,
    },
    /// A word row does not contain its phone-derived interval.
    Containment { word_id: String },
    /// A phone references a speaker missing from the corpus metadata.
    UnknownSpeaker(String),
    /// A word ID with an embedded space outside the whitelisted corpus.
    MalformedWordId(String),
    /// Speaker metadata columns (code/age/sex) have differing lengths.
    RaggedSpeakerRow(String),
    /// Word intervals left unconsumed after the word stream ended.
    Unreconciled(usize),
    Custom(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<rust_decimal::Error> for Error {
    fn from(e: rust_decimal::Error) -> Error {
        Error::Decimal(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
