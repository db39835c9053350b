
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PassageError {
    // ------------- parse errors -------------
    #[error("Too many parts in '{input}'")]
    TooManyParts { input: String },
    #[error("Book is missing in '{input}'")]
    MissingBook { input: String },
    #[error("Book and chapter are missing in '{input}'")]
    MissingBookOrChapter { input: String },
    #[error("Cannot understand '{text}' as a chapter or verse")]
    NotANumber { text: String },
    #[error("Unknown book '{name}'")]
    UnknownBook { name: String },
    #[error("No such verse: {message}")]
    NoSuchVerse { message: String },
    // ------------- bounds errors -------------
    #[error("Offset {offset} is out of range, the count is {count}")]
    OutOfRange { offset: usize, count: usize },
    // ------------- format errors -------------
    #[error("Unknown passage format: {0}")]
    UnknownPassageFormat(u32),
    #[error("Corrupt range: start {start} with cardinality {count}")]
    CorruptRange { start: u32, count: u32 },
    #[error("Truncated data: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },
    #[error("Invalid versification layout: {0}")]
    InvalidLayout(String),
    #[error("Unknown versification '{0}'")]
    UnknownVersification(String),
    #[error("Versification mismatch: expected {expected}, found {found}")]
    MismatchedVersification { expected: String, found: String },
    // ------------- mutation errors -------------
    #[error("Cannot alter a read-only passage")]
    ReadOnly,
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
    #[error("Lock poisoned: {0}")]
    Lock(String),
    // ------------- ambient -------------
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, PassageError>;

impl PassageError {
    /// True for the errors that come from reading reference text.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::TooManyParts { .. }
                | Self::MissingBook { .. }
                | Self::MissingBookOrChapter { .. }
                | Self::NotANumber { .. }
                | Self::UnknownBook { .. }
                | Self::NoSuchVerse { .. }
        )
    }
}

// Helper conversions
impl<T> From<std::sync::PoisonError<T>> for PassageError {
    fn from(e: std::sync::PoisonError<T>) -> Self { Self::Lock(e.to_string()) }
}
