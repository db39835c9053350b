use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::book::BibleBook;
use crate::error::{PassageError, Result};
use crate::versification::{same_versification, Ordinal, Versification};

// ------------- Verse -------------
/// A single verse, addressed by its ordinal in a versification. A verse
/// may carry a sub-identifier naming a fragment of it, e.g. `Gen.1.1!a`.
#[derive(Clone)]
pub struct Verse {
    v11n: Arc<Versification>,
    ordinal: Ordinal,
    book: BibleBook,
    chapter: u16,
    verse: u16,
    sub_identifier: Option<String>,
}

impl Verse {
    pub fn new(v11n: &Arc<Versification>, book: BibleBook, chapter: u16, verse: u16) -> Result<Self> {
        let ordinal = v11n.ordinal(book, chapter, verse)?;
        Ok(Self {
            v11n: Arc::clone(v11n),
            ordinal,
            book,
            chapter,
            verse,
            sub_identifier: None,
        })
    }
    pub fn from_ordinal(v11n: &Arc<Versification>, ordinal: Ordinal) -> Result<Self> {
        if ordinal < 1 || ordinal > v11n.max_ordinal() {
            return Err(PassageError::NoSuchVerse {
                message: format!("ordinal should be between 1 and {} (given {})", v11n.max_ordinal(), ordinal),
            });
        }
        Ok(Self::at(v11n, ordinal))
    }
    // the ordinal is clamped onto the versification
    pub(crate) fn at(v11n: &Arc<Versification>, ordinal: Ordinal) -> Self {
        let ordinal = ordinal.clamp(1, v11n.max_ordinal());
        let (book, chapter, verse) = v11n.locate(ordinal);
        Self {
            v11n: Arc::clone(v11n),
            ordinal,
            book,
            chapter,
            verse,
            sub_identifier: None,
        }
    }
    pub fn with_sub_identifier(mut self, sub_identifier: impl Into<String>) -> Self {
        let sub_identifier = sub_identifier.into();
        self.sub_identifier = if sub_identifier.is_empty() { None } else { Some(sub_identifier) };
        self
    }
    /// The same verse without any sub-identifier.
    pub fn whole(&self) -> Verse {
        Self {
            sub_identifier: None,
            ..self.clone()
        }
    }

    pub fn versification(&self) -> &Arc<Versification> {
        &self.v11n
    }
    pub fn ordinal(&self) -> Ordinal {
        self.ordinal
    }
    pub fn book(&self) -> BibleBook {
        self.book
    }
    pub fn chapter(&self) -> u16 {
        self.chapter
    }
    pub fn verse(&self) -> u16 {
        self.verse
    }
    pub fn sub_identifier(&self) -> Option<&str> {
        self.sub_identifier.as_deref()
    }

    // ------------- ordinal arithmetic -------------
    /// The verse `n` verses later, clamped to the last verse.
    pub fn add(&self, n: u32) -> Verse {
        Self::at(&self.v11n, self.v11n.clamp(self.ordinal as i64 + n as i64))
    }
    /// The verse `n` verses earlier, clamped to the first verse.
    pub fn subtract(&self, n: u32) -> Verse {
        Self::at(&self.v11n, self.v11n.clamp(self.ordinal as i64 - n as i64))
    }
    /// How many verses `other` lies after this one (negative when before).
    pub fn distance(&self, other: &Verse) -> i64 {
        other.ordinal as i64 - self.ordinal as i64
    }
    pub fn is_same_chapter(&self, other: &Verse) -> bool {
        self.book == other.book && self.chapter == other.chapter
    }
    pub fn is_same_book(&self, other: &Verse) -> bool {
        self.book == other.book
    }
    pub fn is_start_of_chapter(&self) -> bool {
        self.verse == 1
    }
    pub fn is_end_of_chapter(&self) -> bool {
        self.verse == self.v11n.last_verse(self.book, self.chapter)
    }
    pub fn is_start_of_book(&self) -> bool {
        self.chapter == 1 && self.verse == 1
    }
    pub fn is_end_of_book(&self) -> bool {
        self.chapter == self.v11n.last_chapter(self.book) && self.is_end_of_chapter()
    }
    pub fn is_same_versification(&self, other: &Verse) -> bool {
        same_versification(&self.v11n, &other.v11n)
    }

    // ------------- naming -------------
    pub fn name(&self) -> String {
        self.name_relative(None)
    }
    /// The shortest name that is unambiguous after `base`: "Gen 1:1",
    /// "2:1" in another chapter of the same book, "5" in the same chapter.
    pub fn name_relative(&self, base: Option<&Verse>) -> String {
        let single_chapter = self.v11n.last_chapter(self.book) == 1;
        match base {
            Some(base) if base.book == self.book => {
                if single_chapter || base.chapter == self.chapter {
                    self.verse.to_string()
                } else {
                    format!("{}:{}", self.chapter, self.verse)
                }
            }
            _ => {
                if single_chapter {
                    format!("{} {}", self.book.short_name(), self.verse)
                } else {
                    format!("{} {}:{}", self.book.short_name(), self.chapter, self.verse)
                }
            }
        }
    }
    /// `Gen.1.1`, with `!sub` appended when there is a sub-identifier.
    pub fn osis_ref(&self) -> String {
        match &self.sub_identifier {
            Some(sub) => format!("{}.{}.{}!{}", self.book.osis(), self.chapter, self.verse, sub),
            None => format!("{}.{}.{}", self.book.osis(), self.chapter, self.verse),
        }
    }
    pub fn osis_id(&self) -> String {
        self.osis_ref()
    }
}

impl PartialEq for Verse {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal == other.ordinal
            && self.sub_identifier == other.sub_identifier
            && self.is_same_versification(other)
    }
}
impl Eq for Verse {}

impl Hash for Verse {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordinal.hash(state);
        self.sub_identifier.hash(state);
    }
}

// Verses are ordered by ordinal; the sub-identifier only separates
// fragments of the same verse so that ordering agrees with equality.
impl Ord for Verse {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal
            .cmp(&other.ordinal)
            .then_with(|| self.sub_identifier.cmp(&other.sub_identifier))
    }
}
impl PartialOrd for Verse {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Verse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for Verse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Verse({} #{} in {})", self.osis_ref(), self.ordinal, self.v11n.name())
    }
}
