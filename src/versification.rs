use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::sync::Arc;

// used to keep the one-to-one mapping between a book and its position in the layout
use bimap::BiMap;

// a fast hashing algo for the name lookups, where keys are short strings
use seahash::SeaHasher;

use lazy_static::lazy_static;

use crate::book::{normalize_name, BibleBook};
use crate::error::{PassageError, Result};
use crate::range::VerseRange;

pub type NameHasher = BuildHasherDefault<SeaHasher>;

/// A dense index of a verse within a versification, starting at 1.
pub type Ordinal = u32;

// ------------- Versification -------------
/// The layout of books, chapters and verses that assigns every verse an
/// ordinal in `[1, max_ordinal]`. Chapters and verses are 1-based.
#[derive(Debug)]
pub struct Versification {
    name: String,
    books: BiMap<BibleBook, usize>,
    // verses per chapter, indexed by book position and chapter - 1
    last_verses: Vec<Vec<u16>>,
    // ordinal of verse 1 of each chapter, indexed the same way
    chapter_starts: Vec<Vec<Ordinal>>,
    // ordinal of verse 1 of each book
    book_starts: Vec<(Ordinal, BibleBook)>,
    max_ordinal: Ordinal,
    names: HashMap<String, BibleBook, NameHasher>,
}

impl Versification {
    /// Builds a versification from `(book, verses per chapter)` pairs, in
    /// the order the ordinals should be assigned.
    pub fn new(name: impl Into<String>, layout: Vec<(BibleBook, Vec<u16>)>) -> Result<Self> {
        let name = name.into();
        if layout.is_empty() {
            return Err(PassageError::InvalidLayout(format!("{} has no books", name)));
        }
        let mut seen = BiMap::new();
        for (position, (book, chapters)) in layout.iter().enumerate() {
            if seen.insert_no_overwrite(*book, position).is_err() {
                return Err(PassageError::InvalidLayout(format!("{} lists {} twice", name, book.osis())));
            }
            if chapters.is_empty() {
                return Err(PassageError::InvalidLayout(format!("{} has no chapters", book.osis())));
            }
            if let Some(chapter) = chapters.iter().position(|v| *v == 0) {
                return Err(PassageError::InvalidLayout(format!("{} {} has no verses", book.osis(), chapter + 1)));
            }
        }
        Ok(Self::build(name, layout))
    }

    fn build(name: String, layout: Vec<(BibleBook, Vec<u16>)>) -> Self {
        let mut books = BiMap::new();
        let mut last_verses = Vec::with_capacity(layout.len());
        let mut chapter_starts = Vec::with_capacity(layout.len());
        let mut book_starts = Vec::with_capacity(layout.len());
        let mut names = HashMap::<String, BibleBook, NameHasher>::default();
        let mut next: Ordinal = 1;
        for (position, (book, chapters)) in layout.into_iter().enumerate() {
            books.insert(book, position);
            book_starts.push((next, book));
            let mut starts = Vec::with_capacity(chapters.len());
            for verses in &chapters {
                starts.push(next);
                next += *verses as Ordinal;
            }
            chapter_starts.push(starts);
            last_verses.push(chapters);
            let spellings = [book.osis(), book.short_name(), book.full_name()];
            for spelling in spellings.iter().chain(book.alternates().iter()) {
                names.entry(normalize_name(spelling)).or_insert(book);
            }
        }
        Self {
            name,
            books,
            last_verses,
            chapter_starts,
            book_starts,
            max_ordinal: next - 1,
            names,
        }
    }

    /// The King James layout of the 66 canonical books.
    pub fn kjv() -> Arc<Versification> {
        Arc::clone(&KJV)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn max_ordinal(&self) -> Ordinal {
        self.max_ordinal
    }
    /// The range from the first verse to the last.
    pub fn all_verses(self: &Arc<Self>) -> VerseRange {
        VerseRange::whole_versification(self)
    }
    pub fn book_count(&self) -> usize {
        self.book_starts.len()
    }
    pub fn books(&self) -> impl Iterator<Item = BibleBook> + '_ {
        (0..self.book_count()).filter_map(move |p| self.book_at(p))
    }
    pub fn contains_book(&self, book: BibleBook) -> bool {
        self.books.contains_left(&book)
    }
    pub fn book_position(&self, book: BibleBook) -> Option<usize> {
        self.books.get_by_left(&book).copied()
    }
    pub fn book_at(&self, position: usize) -> Option<BibleBook> {
        self.books.get_by_right(&position).copied()
    }
    /// The number of chapters in the book, 0 for books outside this versification.
    pub fn last_chapter(&self, book: BibleBook) -> u16 {
        self.book_position(book)
            .map(|p| self.last_verses[p].len() as u16)
            .unwrap_or(0)
    }
    /// The number of verses in the chapter, 0 when the chapter does not exist.
    pub fn last_verse(&self, book: BibleBook, chapter: u16) -> u16 {
        self.book_position(book)
            .and_then(|p| self.last_verses[p].get((chapter as usize).wrapping_sub(1)))
            .copied()
            .unwrap_or(0)
    }

    /// Finds a book by any of its names. Exact spellings win, after that the
    /// first book in order whose OSIS id or full name starts with `name`.
    pub fn book(&self, name: &str) -> Option<BibleBook> {
        let wanted = normalize_name(name);
        if !wanted.chars().any(|c| c.is_alphabetic()) {
            return None;
        }
        if let Some(book) = self.names.get(&wanted) {
            return Some(*book);
        }
        self.books().find(|book| {
            normalize_name(book.osis()).starts_with(&wanted)
                || normalize_name(book.full_name()).starts_with(&wanted)
        })
    }
    pub fn is_book_name(&self, name: &str) -> bool {
        self.book(name).is_some()
    }

    pub fn validate(&self, book: BibleBook, chapter: u16, verse: u16) -> Result<()> {
        let last_chapter = self.last_chapter(book);
        if last_chapter == 0 {
            return Err(PassageError::NoSuchVerse {
                message: format!("{} is not part of {}", book.osis(), self.name),
            });
        }
        if chapter < 1 || chapter > last_chapter {
            return Err(PassageError::NoSuchVerse {
                message: format!("chapter should be between 1 and {} for {} (given {})", last_chapter, book.short_name(), chapter),
            });
        }
        let last_verse = self.last_verse(book, chapter);
        if verse < 1 || verse > last_verse {
            return Err(PassageError::NoSuchVerse {
                message: format!("verse should be between 1 and {} for {} {} (given {})", last_verse, book.short_name(), chapter, verse),
            });
        }
        Ok(())
    }

    pub fn ordinal(&self, book: BibleBook, chapter: u16, verse: u16) -> Result<Ordinal> {
        self.validate(book, chapter, verse)?;
        let position = self.book_position(book).unwrap_or_default();
        Ok(self.chapter_starts[position][chapter as usize - 1] + verse as Ordinal - 1)
    }

    /// The book, chapter and verse of an ordinal.
    pub fn decode(&self, ordinal: Ordinal) -> Option<(BibleBook, u16, u16)> {
        if ordinal < 1 || ordinal > self.max_ordinal {
            return None;
        }
        Some(self.locate(ordinal))
    }

    // ordinals outside the space are clamped onto it
    pub(crate) fn locate(&self, ordinal: Ordinal) -> (BibleBook, u16, u16) {
        let ordinal = ordinal.clamp(1, self.max_ordinal);
        let position = self.book_starts.partition_point(|(start, _)| *start <= ordinal) - 1;
        let starts = &self.chapter_starts[position];
        let chapter = starts.partition_point(|start| *start <= ordinal) - 1;
        let verse = ordinal - starts[chapter] + 1;
        (self.book_starts[position].1, chapter as u16 + 1, verse as u16)
    }

    pub fn clamp(&self, ordinal: i64) -> Ordinal {
        ordinal.clamp(1, self.max_ordinal as i64) as Ordinal
    }

    /// The first and last ordinal of a book, if it is part of this versification.
    pub fn book_span(&self, book: BibleBook) -> Option<(Ordinal, Ordinal)> {
        let position = self.book_position(book)?;
        let start = self.book_starts[position].0;
        let end = self
            .book_starts
            .get(position + 1)
            .map(|(next, _)| next - 1)
            .unwrap_or(self.max_ordinal);
        Some((start, end))
    }

    /// The first and last ordinal of a chapter, if it exists.
    pub fn chapter_span(&self, book: BibleBook, chapter: u16) -> Option<(Ordinal, Ordinal)> {
        let last = self.last_verse(book, chapter);
        if last == 0 {
            return None;
        }
        let position = self.book_position(book)?;
        let start = self.chapter_starts[position][chapter as usize - 1];
        Some((start, start + last as Ordinal - 1))
    }

    /// Repairs a reference whose chapter or verse overflows: the excess rolls
    /// forward into the following chapters and books. Zero counts as 1 and
    /// anything past the end of the versification becomes its last verse.
    pub fn patch(&self, book: BibleBook, chapter: u16, verse: u16) -> Ordinal {
        let Some(mut position) = self.book_position(book) else {
            return self.max_ordinal;
        };
        let mut chapter = chapter.max(1) as usize;
        let mut verse = verse.max(1) as u32;
        while chapter > self.last_verses[position].len() {
            chapter -= self.last_verses[position].len();
            position += 1;
            if position >= self.book_count() {
                return self.max_ordinal;
            }
        }
        loop {
            let last = self.last_verses[position][chapter - 1] as u32;
            if verse <= last {
                return self.chapter_starts[position][chapter - 1] + verse - 1;
            }
            verse -= last;
            chapter += 1;
            if chapter > self.last_verses[position].len() {
                chapter = 1;
                position += 1;
                if position >= self.book_count() {
                    return self.max_ordinal;
                }
            }
        }
    }
}

impl PartialEq for Versification {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
impl Eq for Versification {}

/// True when both handles describe the same versification.
pub fn same_versification(a: &Arc<Versification>, b: &Arc<Versification>) -> bool {
    Arc::ptr_eq(a, b) || a.name == b.name
}

// ------------- Versifications -------------
/// The known versifications, by name, with one of them the default.
#[derive(Debug, Clone)]
pub struct Versifications {
    known: HashMap<String, Arc<Versification>, NameHasher>,
    default_name: String,
}

impl Versifications {
    pub fn new() -> Self {
        let mut known = HashMap::<String, Arc<Versification>, NameHasher>::default();
        let kjv = Versification::kjv();
        let default_name = kjv.name().to_string();
        known.insert(default_name.to_uppercase(), kjv);
        Self { known, default_name }
    }
    pub fn register(&mut self, v11n: Arc<Versification>) {
        self.known.insert(v11n.name().to_uppercase(), v11n);
    }
    pub fn get(&self, name: &str) -> Result<Arc<Versification>> {
        self.known
            .get(&name.trim().to_uppercase())
            .cloned()
            .ok_or_else(|| PassageError::UnknownVersification(name.to_string()))
    }
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        let v11n = self.get(name)?;
        self.default_name = v11n.name().to_string();
        Ok(())
    }
    pub fn default_versification(&self) -> Arc<Versification> {
        self.get(&self.default_name).unwrap_or_else(|_| Versification::kjv())
    }
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.known.values().map(|v| v.name().to_string()).collect();
        names.sort();
        names
    }
}

impl Default for Versifications {
    fn default() -> Self {
        Self::new()
    }
}

// ------------- KJV -------------
lazy_static! {
    static ref KJV: Arc<Versification> = Arc::new(Versification::build(
        "KJV".to_string(),
        KJV_LAYOUT.iter().map(|(book, chapters)| (*book, chapters.to_vec())).collect(),
    ));
}

const KJV_LAYOUT: &[(BibleBook, &[u16])] = &[
    (BibleBook::Gen, &[31, 25, 24, 26, 32, 22, 24, 22, 29, 32, 32, 20, 18, 24, 21, 16, 27, 33, 38, 18, 34, 24, 20, 67, 34, 35, 46, 22, 35, 43, 55, 32, 20, 31, 29, 43, 36, 30, 23, 23, 57, 38, 34, 34, 28, 34, 31, 22, 33, 26]),
    (BibleBook::Exod, &[22, 25, 22, 31, 23, 30, 25, 32, 35, 29, 10, 51, 22, 31, 27, 36, 16, 27, 25, 26, 36, 31, 33, 18, 40, 37, 21, 43, 46, 38, 18, 35, 23, 35, 35, 38, 29, 31, 43, 38]),
    (BibleBook::Lev, &[17, 16, 17, 35, 19, 30, 38, 36, 24, 20, 47, 8, 59, 57, 33, 34, 16, 30, 37, 27, 24, 33, 44, 23, 55, 46, 34]),
    (BibleBook::Num, &[54, 34, 51, 49, 31, 27, 89, 26, 23, 36, 35, 16, 33, 45, 41, 50, 13, 32, 22, 29, 35, 41, 30, 25, 18, 65, 23, 31, 40, 16, 54, 42, 56, 29, 34, 13]),
    (BibleBook::Deut, &[46, 37, 29, 49, 33, 25, 26, 20, 29, 22, 32, 32, 18, 29, 23, 22, 20, 22, 21, 20, 23, 30, 25, 22, 19, 19, 26, 68, 29, 20, 30, 52, 29, 12]),
    (BibleBook::Josh, &[18, 24, 17, 24, 15, 27, 26, 35, 27, 43, 23, 24, 33, 15, 63, 10, 18, 28, 51, 9, 45, 34, 16, 33]),
    (BibleBook::Judg, &[36, 23, 31, 24, 31, 40, 25, 35, 57, 18, 40, 15, 25, 20, 20, 31, 13, 31, 30, 48, 25]),
    (BibleBook::Ruth, &[22, 23, 18, 22]),
    (BibleBook::Sam1, &[28, 36, 21, 22, 12, 21, 17, 22, 27, 27, 15, 25, 23, 52, 35, 23, 58, 30, 24, 42, 15, 23, 29, 22, 44, 25, 12, 25, 11, 31, 13]),
    (BibleBook::Sam2, &[27, 32, 39, 12, 25, 23, 29, 18, 13, 19, 27, 31, 39, 33, 37, 23, 29, 33, 43, 26, 22, 51, 39, 25]),
    (BibleBook::Kgs1, &[53, 46, 28, 34, 18, 38, 51, 66, 28, 29, 43, 33, 34, 31, 34, 34, 24, 46, 21, 43, 29, 53]),
    (BibleBook::Kgs2, &[18, 25, 27, 44, 27, 33, 20, 29, 37, 36, 21, 21, 25, 29, 38, 20, 41, 37, 37, 21, 26, 20, 37, 20, 30]),
    (BibleBook::Chr1, &[54, 55, 24, 43, 26, 81, 40, 40, 44, 14, 47, 40, 14, 17, 29, 43, 27, 17, 19, 8, 30, 19, 32, 31, 31, 32, 34, 21, 30]),
    (BibleBook::Chr2, &[17, 18, 17, 22, 14, 42, 22, 18, 31, 19, 23, 16, 22, 15, 19, 14, 19, 34, 11, 37, 20, 12, 21, 27, 28, 23, 9, 27, 36, 27, 21, 33, 25, 33, 27, 23]),
    (BibleBook::Ezra, &[11, 70, 13, 24, 17, 22, 28, 36, 15, 44]),
    (BibleBook::Neh, &[11, 20, 32, 23, 19, 19, 73, 18, 38, 39, 36, 47, 31]),
    (BibleBook::Esth, &[22, 23, 15, 17, 14, 14, 10, 17, 32, 3]),
    (BibleBook::Job, &[22, 13, 26, 21, 27, 30, 21, 22, 35, 22, 20, 25, 28, 22, 35, 22, 16, 21, 29, 29, 34, 30, 17, 25, 6, 14, 23, 28, 25, 31, 40, 22, 33, 37, 16, 33, 24, 41, 30, 24, 34, 17]),
    (BibleBook::Ps, &[6, 12, 8, 8, 12, 10, 17, 9, 20, 18, 7, 8, 6, 7, 5, 11, 15, 50, 14, 9, 13, 31, 6, 10, 22, 12, 14, 9, 11, 12, 24, 11, 22, 22, 28, 12, 40, 22, 13, 17, 13, 11, 5, 26, 17, 11, 9, 14, 20, 23, 19, 9, 6, 7, 23, 13, 11, 11, 17, 12, 8, 12, 11, 10, 13, 20, 7, 35, 36, 5, 24, 20, 28, 23, 10, 12, 20, 72, 13, 19, 16, 8, 18, 12, 13, 17, 7, 18, 52, 17, 16, 15, 5, 23, 11, 13, 12, 9, 9, 5, 8, 28, 22, 35, 45, 48, 43, 13, 31, 7, 10, 10, 9, 8, 18, 19, 2, 29, 176, 7, 8, 9, 4, 8, 5, 6, 5, 6, 8, 8, 3, 18, 3, 3, 21, 26, 9, 8, 24, 13, 10, 7, 12, 15, 21, 10, 20, 14, 9, 6]),
    (BibleBook::Prov, &[33, 22, 35, 27, 23, 35, 27, 36, 18, 32, 31, 28, 25, 35, 33, 33, 28, 24, 29, 30, 31, 29, 35, 34, 28, 28, 27, 28, 27, 33, 31]),
    (BibleBook::Eccl, &[18, 26, 22, 16, 20, 12, 29, 17, 18, 20, 10, 14]),
    (BibleBook::Song, &[17, 17, 11, 16, 16, 13, 13, 14]),
    (BibleBook::Isa, &[31, 22, 26, 6, 30, 13, 25, 22, 21, 34, 16, 6, 22, 32, 9, 14, 14, 7, 25, 6, 17, 25, 18, 23, 12, 21, 13, 29, 24, 33, 9, 20, 24, 17, 10, 22, 38, 22, 8, 31, 29, 25, 28, 28, 25, 13, 15, 22, 26, 11, 23, 15, 12, 17, 13, 12, 21, 14, 21, 22, 11, 12, 19, 12, 25, 24]),
    (BibleBook::Jer, &[19, 37, 25, 31, 31, 30, 34, 22, 26, 25, 23, 17, 27, 22, 21, 21, 27, 23, 15, 18, 14, 30, 40, 10, 38, 24, 22, 17, 32, 24, 40, 44, 26, 22, 19, 32, 21, 28, 18, 16, 18, 22, 13, 30, 5, 28, 7, 47, 39, 46, 64, 34]),
    (BibleBook::Lam, &[22, 22, 66, 22, 22]),
    (BibleBook::Ezek, &[28, 10, 27, 17, 17, 14, 27, 18, 11, 22, 25, 28, 23, 23, 8, 63, 24, 32, 14, 49, 32, 31, 49, 27, 17, 21, 36, 26, 21, 26, 18, 32, 33, 31, 15, 38, 28, 23, 29, 49, 26, 20, 27, 31, 25, 24, 23, 35]),
    (BibleBook::Dan, &[21, 49, 30, 37, 31, 28, 28, 27, 27, 21, 45, 13]),
    (BibleBook::Hos, &[11, 23, 5, 19, 15, 11, 16, 14, 17, 15, 12, 14, 16, 9]),
    (BibleBook::Joel, &[20, 32, 21]),
    (BibleBook::Amos, &[15, 16, 15, 13, 27, 14, 17, 14, 15]),
    (BibleBook::Obad, &[21]),
    (BibleBook::Jonah, &[17, 10, 10, 11]),
    (BibleBook::Mic, &[16, 13, 12, 13, 15, 16, 20]),
    (BibleBook::Nah, &[15, 13, 19]),
    (BibleBook::Hab, &[17, 20, 19]),
    (BibleBook::Zeph, &[18, 15, 20]),
    (BibleBook::Hag, &[15, 23]),
    (BibleBook::Zech, &[21, 13, 10, 14, 11, 15, 14, 23, 17, 12, 17, 14, 9, 21]),
    (BibleBook::Mal, &[14, 17, 18, 6]),
    (BibleBook::Matt, &[25, 23, 17, 25, 48, 34, 29, 34, 38, 42, 30, 50, 58, 36, 39, 28, 27, 35, 30, 34, 46, 46, 39, 51, 46, 75, 66, 20]),
    (BibleBook::Mark, &[45, 28, 35, 41, 43, 56, 37, 38, 50, 52, 33, 44, 37, 72, 47, 20]),
    (BibleBook::Luke, &[80, 52, 38, 44, 39, 49, 50, 56, 62, 42, 54, 59, 35, 35, 32, 31, 37, 43, 48, 47, 38, 71, 56, 53]),
    (BibleBook::John, &[51, 25, 36, 54, 47, 71, 53, 59, 41, 42, 57, 50, 38, 31, 27, 33, 26, 40, 42, 31, 25]),
    (BibleBook::Acts, &[26, 47, 26, 37, 42, 15, 60, 40, 43, 48, 30, 25, 52, 28, 41, 40, 34, 28, 41, 38, 40, 30, 35, 27, 27, 32, 44, 31]),
    (BibleBook::Rom, &[32, 29, 31, 25, 21, 23, 25, 39, 33, 21, 36, 21, 14, 23, 33, 27]),
    (BibleBook::Cor1, &[31, 16, 23, 21, 13, 20, 40, 13, 27, 33, 34, 31, 13, 40, 58, 24]),
    (BibleBook::Cor2, &[24, 17, 18, 18, 21, 18, 16, 24, 15, 18, 33, 21, 14]),
    (BibleBook::Gal, &[24, 21, 29, 31, 26, 18]),
    (BibleBook::Eph, &[23, 22, 21, 32, 33, 24]),
    (BibleBook::Phil, &[30, 30, 21, 23]),
    (BibleBook::Col, &[29, 23, 25, 18]),
    (BibleBook::Thess1, &[10, 20, 13, 18, 28]),
    (BibleBook::Thess2, &[12, 17, 18]),
    (BibleBook::Tim1, &[20, 15, 16, 16, 25, 21]),
    (BibleBook::Tim2, &[18, 26, 17, 22]),
    (BibleBook::Titus, &[16, 15, 15]),
    (BibleBook::Phlm, &[25]),
    (BibleBook::Heb, &[14, 18, 19, 16, 14, 20, 28, 13, 28, 39, 40, 29, 25]),
    (BibleBook::Jas, &[27, 26, 18, 17, 20]),
    (BibleBook::Pet1, &[25, 25, 22, 19, 14]),
    (BibleBook::Pet2, &[21, 22, 18]),
    (BibleBook::John1, &[10, 29, 24, 21, 21]),
    (BibleBook::John2, &[13]),
    (BibleBook::John3, &[14]),
    (BibleBook::Jude, &[25]),
    (BibleBook::Rev, &[20, 29, 22, 11, 14, 17, 17, 13, 21, 11, 19, 17, 18, 20, 8, 21, 18, 24, 21, 15, 27, 21]),
];
