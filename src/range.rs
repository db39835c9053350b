use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{PassageError, Result};
use crate::restriction::RestrictionType;
use crate::verse::Verse;
use crate::versification::{same_versification, Ordinal, Versification};

// ------------- VerseRange -------------
/// A contiguous span of verses. The start never comes after the end and
/// the cardinality is always the distance between them plus one.
#[derive(Clone)]
pub struct VerseRange {
    v11n: Arc<Versification>,
    start: Verse,
    end: Verse,
    count: u32,
}

impl VerseRange {
    /// A range between two verses, given in either order.
    pub fn new(start: &Verse, end: &Verse) -> Result<Self> {
        if !start.is_same_versification(end) {
            return Err(PassageError::MismatchedVersification {
                expected: start.versification().name().to_string(),
                found: end.versification().name().to_string(),
            });
        }
        let (start, end) = if start.ordinal() <= end.ordinal() { (start, end) } else { (end, start) };
        Ok(Self {
            v11n: Arc::clone(start.versification()),
            start: start.clone(),
            end: end.clone(),
            count: (end.ordinal() - start.ordinal()) + 1,
        })
    }
    pub(crate) fn from_ordinals(v11n: &Arc<Versification>, start: Ordinal, end: Ordinal) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let start = Verse::at(v11n, start);
        let end = Verse::at(v11n, end);
        Self {
            v11n: Arc::clone(v11n),
            count: end.ordinal() - start.ordinal() + 1,
            start,
            end,
        }
    }
    /// Every verse of the versification.
    pub fn whole_versification(v11n: &Arc<Versification>) -> Self {
        Self::from_ordinals(v11n, 1, v11n.max_ordinal())
    }
    /// The smallest range covering both ranges.
    pub fn merge(a: &VerseRange, b: &VerseRange) -> Self {
        let start = a.start.ordinal().min(b.start.ordinal());
        let end = a.end.ordinal().max(b.end.ordinal());
        Self::from_ordinals(&a.v11n, start, end)
    }

    pub fn versification(&self) -> &Arc<Versification> {
        &self.v11n
    }
    pub fn start(&self) -> &Verse {
        &self.start
    }
    pub fn end(&self) -> &Verse {
        &self.end
    }
    pub fn cardinality(&self) -> u32 {
        self.count
    }
    pub fn verses(&self) -> impl Iterator<Item = Verse> + '_ {
        (self.start.ordinal()..=self.end.ordinal()).map(move |o| Verse::at(&self.v11n, o))
    }

    // ------------- algebra -------------
    fn compatible(&self, that: &VerseRange) -> bool {
        same_versification(&self.v11n, &that.v11n)
    }
    /// True when the ranges overlap or touch, so that their union is contiguous.
    pub fn adjacent_to(&self, that: &VerseRange) -> bool {
        if !self.compatible(that) {
            return false;
        }
        let (this_start, this_end) = (self.start.ordinal() as i64, self.end.ordinal() as i64);
        let (that_start, that_end) = (that.start.ordinal() as i64, that.end.ordinal() as i64);
        (that_start >= this_start - 1 && that_start <= this_end + 1)
            || (this_start >= that_start - 1 && this_start <= that_end + 1)
    }
    /// True when the ranges share at least one verse.
    pub fn overlaps(&self, that: &VerseRange) -> bool {
        if !self.compatible(that) {
            return false;
        }
        let (this_start, this_end) = (self.start.ordinal(), self.end.ordinal());
        let (that_start, that_end) = (that.start.ordinal(), that.end.ordinal());
        (that_start >= this_start && that_start <= this_end)
            || (this_start >= that_start && this_start <= that_end)
    }
    pub fn contains_verse(&self, verse: &Verse) -> bool {
        same_versification(&self.v11n, verse.versification())
            && verse.ordinal() >= self.start.ordinal()
            && verse.ordinal() <= self.end.ordinal()
    }
    pub fn contains_range(&self, that: &VerseRange) -> bool {
        self.compatible(that)
            && that.start.ordinal() >= self.start.ordinal()
            && that.end.ordinal() <= self.end.ordinal()
    }
    /// The parts of `a` that `b` does not cover: none, one or two ranges.
    pub fn remainder(a: &VerseRange, b: &VerseRange) -> Vec<VerseRange> {
        if !a.overlaps(b) {
            return vec![a.clone()];
        }
        let mut parts = Vec::with_capacity(2);
        if a.start.ordinal() < b.start.ordinal() {
            parts.push(Self::from_ordinals(&a.v11n, a.start.ordinal(), b.start.ordinal() - 1));
        }
        if a.end.ordinal() > b.end.ordinal() {
            parts.push(Self::from_ordinals(&a.v11n, b.end.ordinal() + 1, a.end.ordinal()));
        }
        parts
    }
    /// The verses both ranges share, if any.
    pub fn intersection(a: &VerseRange, b: &VerseRange) -> Option<VerseRange> {
        if !a.overlaps(b) {
            return None;
        }
        let start = a.start.ordinal().max(b.start.ordinal());
        let end = a.end.ordinal().min(b.end.ordinal());
        Some(Self::from_ordinals(&a.v11n, start, end))
    }
    pub fn blur(&self, by: u32, restrict: RestrictionType) -> VerseRange {
        restrict.blur(self, by, by)
    }

    // ------------- shape -------------
    pub fn is_whole_chapter(&self) -> bool {
        self.start.is_same_chapter(&self.end) && self.is_whole_chapters()
    }
    pub fn is_whole_chapters(&self) -> bool {
        self.start.is_start_of_chapter() && self.end.is_end_of_chapter()
    }
    pub fn is_whole_book(&self) -> bool {
        self.start.is_same_book(&self.end) && self.is_whole_books()
    }
    pub fn is_whole_books(&self) -> bool {
        self.start.is_start_of_book() && self.end.is_end_of_book()
    }
    pub fn spans_books(&self) -> bool {
        !self.start.is_same_book(&self.end)
    }
    pub fn spans_chapters(&self) -> bool {
        !self.start.is_same_chapter(&self.end)
    }

    // ------------- naming -------------
    pub fn name(&self) -> String {
        self.name_relative(None)
    }
    /// The name of the range, leaving out whatever `base` already implies.
    pub fn name_relative(&self, base: Option<&Verse>) -> String {
        let (start, end) = (&self.start, &self.end);
        let start_book = start.book().short_name();
        let end_book = end.book().short_name();
        if self.spans_books() {
            if self.is_whole_books() {
                return format!("{}-{}", start_book, end_book);
            }
            if self.is_whole_chapters() {
                // a single chapter book is named alone, "Jude 1" would mean its first verse
                let tail = if self.v11n.last_chapter(end.book()) == 1 {
                    end_book.to_string()
                } else {
                    format!("{} {}", end_book, end.chapter())
                };
                return format!("{} {}-{}", start_book, start.chapter(), tail);
            }
            return format!("{}-{}", start.name_relative(base), end.name());
        }
        if self.is_whole_book() {
            return start_book.to_string();
        }
        if self.spans_chapters() {
            if self.is_whole_chapters() {
                return format!("{} {}-{}", start_book, start.chapter(), end.chapter());
            }
            return format!("{}-{}:{}", start.name_relative(base), end.chapter(), end.verse());
        }
        if self.is_whole_chapter() {
            return format!("{} {}", start_book, start.chapter());
        }
        if start.verse() != end.verse() {
            return format!("{}-{}", start.name_relative(base), end.verse());
        }
        start.name_relative(base)
    }
    /// `Gen`, `Gen.1`, `Gen.1-Gen.3` or `Gen.1.1-Gen.1.5`, as coarse as the range allows.
    pub fn osis_ref(&self) -> String {
        let (start, end) = (&self.start, &self.end);
        if self.is_whole_books() {
            if self.spans_books() {
                return format!("{}-{}", start.book().osis(), end.book().osis());
            }
            return start.book().osis().to_string();
        }
        if self.is_whole_chapters() {
            let first = format!("{}.{}", start.book().osis(), start.chapter());
            if self.spans_chapters() {
                return format!("{}-{}.{}", first, end.book().osis(), end.chapter());
            }
            return first;
        }
        if self.count == 1 {
            return start.osis_ref();
        }
        format!("{}-{}", start.osis_ref(), end.osis_ref())
    }
    /// Space separated OSIS ids of every book, chapter or verse in the range.
    pub fn osis_id(&self) -> String {
        if self.is_whole_books() {
            let first = self.v11n.book_position(self.start.book()).unwrap_or(0);
            let last = self.v11n.book_position(self.end.book()).unwrap_or(first);
            return (first..=last)
                .filter_map(|p| self.v11n.book_at(p))
                .map(|b| b.osis())
                .collect::<Vec<_>>()
                .join(" ");
        }
        if self.is_whole_chapters() {
            let mut ids = Vec::new();
            let mut ordinal = self.start.ordinal();
            while ordinal <= self.end.ordinal() {
                let verse = Verse::at(&self.v11n, ordinal);
                ids.push(format!("{}.{}", verse.book().osis(), verse.chapter()));
                ordinal += self.v11n.last_verse(verse.book(), verse.chapter()) as Ordinal;
            }
            return ids.join(" ");
        }
        self.verses().map(|v| v.osis_id()).collect::<Vec<_>>().join(" ")
    }
}

impl From<&Verse> for VerseRange {
    fn from(verse: &Verse) -> Self {
        Self {
            v11n: Arc::clone(verse.versification()),
            start: verse.clone(),
            end: verse.clone(),
            count: 1,
        }
    }
}

impl From<Verse> for VerseRange {
    fn from(verse: Verse) -> Self {
        VerseRange::from(&verse)
    }
}

impl From<&VerseRange> for VerseRange {
    fn from(range: &VerseRange) -> Self {
        range.clone()
    }
}

impl PartialEq for VerseRange {
    fn eq(&self, other: &Self) -> bool {
        self.start.ordinal() == other.start.ordinal() && self.count == other.count && self.compatible(other)
    }
}
impl Eq for VerseRange {}

impl Hash for VerseRange {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.ordinal().hash(state);
        self.count.hash(state);
    }
}

// earlier starts first, and for equal starts the shorter range first
impl Ord for VerseRange {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .ordinal()
            .cmp(&other.start.ordinal())
            .then_with(|| self.count.cmp(&other.count))
    }
}
impl PartialOrd for VerseRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VerseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for VerseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerseRange({} #{}+{})", self.osis_ref(), self.start.ordinal(), self.count)
    }
}
