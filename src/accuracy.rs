use std::fmt;
use std::sync::Arc;

use crate::book::BibleBook;
use crate::error::{PassageError, Result};
use crate::range::VerseRange;
use crate::tokenizer::tokenize;
use crate::verse::Verse;
use crate::versification::Versification;

/// Separates the start of a range from its end.
pub const RANGE_DELIMITER: char = '-';

// ------------- AccuracyType -------------
/// How precisely a list of parts identifies a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccuracyType {
    /// "Gen 1:1", or "Jude 5" for a book with a single chapter
    BookVerse,
    /// "Gen 1"
    BookChapter,
    /// "Gen"
    BookOnly,
    /// "1:1", with the book taken from context
    ChapterVerse,
    /// "1" where the context is a chapter
    ChapterOnly,
    /// "1" where the context is a verse
    VerseOnly,
}

impl AccuracyType {
    pub fn is_verse(self) -> bool {
        matches!(self, AccuracyType::BookVerse | AccuracyType::ChapterVerse | AccuracyType::VerseOnly)
    }
    pub fn is_chapter(self) -> bool {
        matches!(self, AccuracyType::BookChapter | AccuracyType::ChapterOnly)
    }
    pub fn is_book(self) -> bool {
        self == AccuracyType::BookOnly
    }

    /// Classifies the parts of a reference. `verse_accuracy` is the accuracy
    /// of the start of the range when `parts` is its end, and `basis` the
    /// range preceding this one in a list.
    pub fn from_text(
        v11n: &Versification,
        original: &str,
        parts: &[String],
        verse_accuracy: Option<AccuracyType>,
        basis: Option<&VerseRange>,
    ) -> Result<AccuracyType> {
        match reference_parts(parts).len() {
            1 => {
                if v11n.is_book_name(&parts[0]) {
                    return Ok(AccuracyType::BookOnly);
                }
                check_number(&parts[0])?;
                match verse_accuracy {
                    Some(accuracy) if accuracy.is_verse() => Ok(AccuracyType::VerseOnly),
                    // "Gen-3" runs to the end of chapter 3
                    Some(_) => Ok(AccuracyType::ChapterOnly),
                    None => match basis {
                        Some(basis) if basis.is_whole_chapter() => Ok(AccuracyType::ChapterOnly),
                        Some(_) => Ok(AccuracyType::VerseOnly),
                        None => Err(PassageError::MissingBookOrChapter { input: original.to_string() }),
                    },
                }
            }
            2 => match v11n.book(&parts[0]) {
                Some(book) if v11n.last_chapter(book) == 1 => Ok(AccuracyType::BookVerse),
                Some(_) => Ok(AccuracyType::BookChapter),
                None => {
                    check_number(&parts[0])?;
                    check_number(&parts[1])?;
                    Ok(AccuracyType::ChapterVerse)
                }
            },
            3 => {
                if !v11n.is_book_name(&parts[0]) {
                    return Err(PassageError::UnknownBook { name: parts[0].clone() });
                }
                check_number(&parts[1])?;
                check_number(&parts[2])?;
                Ok(AccuracyType::BookVerse)
            }
            _ => Err(PassageError::TooManyParts { input: original.to_string() }),
        }
    }

    /// The first verse the parts refer to.
    pub fn create_start_verse(
        self,
        v11n: &Arc<Versification>,
        original: &str,
        basis: Option<&VerseRange>,
        parts: &[String],
    ) -> Result<Verse> {
        let verse = match self {
            AccuracyType::BookVerse => return self.book_verse(v11n, parts),
            AccuracyType::BookChapter => {
                let book = book_of(v11n, &parts[0])?;
                let chapter = number(&parts[1], v11n.last_chapter(book))?;
                Verse::new(v11n, book, chapter, 1)?
            }
            AccuracyType::BookOnly => Verse::new(v11n, book_of(v11n, &parts[0])?, 1, 1)?,
            AccuracyType::ChapterVerse => {
                let basis = basis.ok_or_else(|| PassageError::MissingBook { input: original.to_string() })?;
                let book = basis.end().book();
                let chapter = number(&parts[0], v11n.last_chapter(book))?;
                let verse = number(&parts[1], v11n.last_verse(book, chapter))?;
                Verse::new(v11n, book, chapter, verse)?
            }
            AccuracyType::ChapterOnly => {
                let basis = basis.ok_or_else(|| PassageError::MissingBook { input: original.to_string() })?;
                let book = basis.end().book();
                let chapter = number(&parts[0], v11n.last_chapter(book))?;
                Verse::new(v11n, book, chapter, 1)?
            }
            AccuracyType::VerseOnly => {
                let basis = basis.ok_or_else(|| PassageError::MissingBookOrChapter { input: original.to_string() })?;
                let (book, chapter) = (basis.end().book(), basis.end().chapter());
                let verse = number(&parts[0], v11n.last_verse(book, chapter))?;
                Verse::new(v11n, book, chapter, verse)?
            }
        };
        Ok(self.with_sub_identifier(verse, parts))
    }

    /// The last verse the parts refer to, given the start of the range.
    pub fn create_end_verse(self, v11n: &Arc<Versification>, start: &Verse, parts: &[String]) -> Result<Verse> {
        let verse = match self {
            AccuracyType::BookVerse => return self.book_verse(v11n, parts),
            AccuracyType::BookChapter => {
                let book = book_of(v11n, &parts[0])?;
                let chapter = number(&parts[1], v11n.last_chapter(book))?;
                Verse::new(v11n, book, chapter, v11n.last_verse(book, chapter).max(1))?
            }
            AccuracyType::BookOnly => {
                let book = book_of(v11n, &parts[0])?;
                let chapter = v11n.last_chapter(book);
                Verse::new(v11n, book, chapter, v11n.last_verse(book, chapter))?
            }
            AccuracyType::ChapterVerse => {
                let book = start.book();
                let chapter = number(&parts[0], v11n.last_chapter(book))?;
                let verse = number(&parts[1], v11n.last_verse(book, chapter))?;
                Verse::new(v11n, book, chapter, verse)?
            }
            AccuracyType::ChapterOnly => {
                let book = start.book();
                let chapter = number(&parts[0], v11n.last_chapter(book))?;
                Verse::new(v11n, book, chapter, v11n.last_verse(book, chapter).max(1))?
            }
            AccuracyType::VerseOnly => {
                let (book, chapter) = (start.book(), start.chapter());
                let verse = number(&parts[0], v11n.last_verse(book, chapter))?;
                Verse::new(v11n, book, chapter, verse)?
            }
        };
        Ok(self.with_sub_identifier(verse, parts))
    }

    fn book_verse(self, v11n: &Arc<Versification>, parts: &[String]) -> Result<Verse> {
        let book = book_of(v11n, &parts[0])?;
        let verse = if reference_parts(parts).len() == 3 {
            let chapter = number(&parts[1], v11n.last_chapter(book))?;
            let verse = number(&parts[2], v11n.last_verse(book, chapter))?;
            Verse::new(v11n, book, chapter, verse)?
        } else {
            let verse = number(&parts[1], v11n.last_verse(book, 1))?;
            Verse::new(v11n, book, 1, verse)?
        };
        Ok(self.with_sub_identifier(verse, parts))
    }

    fn with_sub_identifier(self, verse: Verse, parts: &[String]) -> Verse {
        match parts.last().and_then(|p| p.strip_prefix('!')) {
            Some(sub) if self.is_verse() => verse.with_sub_identifier(sub),
            _ => verse,
        }
    }
}

impl fmt::Display for AccuracyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccuracyType::BookVerse => "BOOK_VERSE",
            AccuracyType::BookChapter => "BOOK_CHAPTER",
            AccuracyType::BookOnly => "BOOK_ONLY",
            AccuracyType::ChapterVerse => "CHAPTER_VERSE",
            AccuracyType::ChapterOnly => "CHAPTER_ONLY",
            AccuracyType::VerseOnly => "VERSE_ONLY",
        };
        write!(f, "{}", name)
    }
}

// a trailing sub-identifier does not count as a part
fn reference_parts(parts: &[String]) -> &[String] {
    match parts.last() {
        Some(last) if last.starts_with('!') => &parts[..parts.len() - 1],
        _ => parts,
    }
}

fn is_end_marker(text: &str) -> bool {
    text == "$" || text == "ff"
}

fn check_number(text: &str) -> Result<()> {
    if is_end_marker(text) || (!text.is_empty() && text.chars().all(|c| c.is_ascii_digit())) {
        Ok(())
    } else {
        Err(PassageError::NotANumber { text: text.to_string() })
    }
}

// end markers resolve to `last`
fn number(text: &str, last: u16) -> Result<u16> {
    if is_end_marker(text) {
        return Ok(last);
    }
    text.parse::<u16>().map_err(|_| PassageError::NotANumber { text: text.to_string() })
}

fn book_of(v11n: &Versification, name: &str) -> Result<BibleBook> {
    v11n.book(name).ok_or_else(|| PassageError::UnknownBook { name: name.to_string() })
}

// ------------- parsing -------------
/// Parses a single verse reference such as "Gen 1:1" or, given a basis, "5".
pub fn parse_verse(v11n: &Arc<Versification>, text: &str, basis: Option<&VerseRange>) -> Result<Verse> {
    let parts = tokenize(text)?;
    let accuracy = AccuracyType::from_text(v11n, text, &parts, None, basis)?;
    accuracy.create_start_verse(v11n, text, basis, &parts)
}

/// Parses a range reference such as "Gen 1:1-5", "Gen 1-3" or "Gen".
/// `basis` is the range preceding this one, used to complete partial
/// references like "10" or "2:3".
pub fn parse_range(v11n: &Arc<Versification>, text: &str, basis: Option<&VerseRange>) -> Result<VerseRange> {
    let pieces: Vec<&str> = text.split(RANGE_DELIMITER).collect();
    if pieces.len() > 2 {
        return Err(PassageError::TooManyParts { input: text.to_string() });
    }
    let start_parts = tokenize(pieces[0])?;
    let start_accuracy = AccuracyType::from_text(v11n, text, &start_parts, None, basis)?;
    let start = start_accuracy.create_start_verse(v11n, text, basis, &start_parts)?;
    let end = match pieces.get(1) {
        Some(end_text) => {
            let end_parts = tokenize(end_text)?;
            let end_accuracy = AccuracyType::from_text(v11n, text, &end_parts, Some(start_accuracy), basis)?;
            end_accuracy.create_end_verse(v11n, &start, &end_parts)?
        }
        None => start_accuracy.create_end_verse(v11n, &start, &start_parts)?,
    };
    VerseRange::new(&start, &end)
}
