//! The passage engine: a mutable, ordered, duplicate free set of verses
//! over one of four interchangeable stores.
//!
//! * `Distinct` keeps single verses, best for a few scattered references.
//! * `Ranged` keeps merged verse ranges, best for long contiguous spans.
//! * `Bitwise` keeps one bit per verse, best for bulk set algebra.
//! * `Rocket` is bitwise for writes and builds distinct and ranged copies
//!   on [`Passage::optimize_reads`] for read heavy phases.
//!
//! Whatever the store, verses come out in ordinal order and the same
//! references give the same names, OSIS strings and set algebra.

mod batch;
mod bitwise;
mod distinct;
mod event;
mod ranged;
mod rocket;
mod store;

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Weak};

use serde::Deserialize;

use crate::accuracy::parse_range;
use crate::error::{PassageError, Result};
use crate::key::{Key, SharedKey};
use crate::range::VerseRange;
use crate::restriction::RestrictionType;
use crate::verse::Verse;
use crate::versification::{same_versification, Ordinal, Versification};

pub use batch::Batch;
pub use event::{EventKind, Listeners, PassageEvent, PassageListener};

use bitwise::BitwiseStore;
use distinct::DistinctStore;
use ranged::RangedStore;
use rocket::RocketStore;
use store::{intersect_spans, Storage, Store};

pub(crate) use store::{spans_of, Span};

/// Characters that separate the references of a list.
pub const LIST_DELIMITERS: &[char] = &[',', ';', '\n', '\r', '\t'];

// ------------- PassageKind -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassageKind {
    #[default]
    Rocket,
    Bitwise,
    Distinct,
    Ranged,
}

impl PassageKind {
    pub fn from_name(name: &str) -> Option<PassageKind> {
        match name.trim().to_lowercase().as_str() {
            "rocket" | "speed" => Some(PassageKind::Rocket),
            "bitwise" | "write_speed" => Some(PassageKind::Bitwise),
            "distinct" | "size" => Some(PassageKind::Distinct),
            "ranged" | "mix" => Some(PassageKind::Ranged),
            _ => None,
        }
    }
    pub fn name(self) -> &'static str {
        match self {
            PassageKind::Rocket => "rocket",
            PassageKind::Bitwise => "bitwise",
            PassageKind::Distinct => "distinct",
            PassageKind::Ranged => "ranged",
        }
    }
}

impl fmt::Display for PassageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Splits a reference list such as "Gen 1:1-5, 7; Exod 2" into ranges.
/// Each reference may lean on the one before it, so "7" above means
/// Gen 1:7.
pub fn parse_ranges(v11n: &Arc<Versification>, text: &str) -> Result<Vec<VerseRange>> {
    let mut ranges: Vec<VerseRange> = Vec::new();
    for part in text.split(LIST_DELIMITERS) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let range = parse_range(v11n, part, ranges.last())?;
        ranges.push(range);
    }
    Ok(ranges)
}

/// Turns ascending spans into ranges; with the chapter restriction a span
/// is cut at every chapter end it crosses.
pub(crate) fn ranges_of(v11n: &Arc<Versification>, spans: &[Span], restrict: RestrictionType) -> Vec<VerseRange> {
    let mut ranges = Vec::with_capacity(spans.len());
    for &(start, end) in spans {
        match restrict {
            RestrictionType::None => ranges.push(VerseRange::from_ordinals(v11n, start, end)),
            RestrictionType::Chapter => {
                let mut from = start;
                while from <= end {
                    let verse = Verse::at(v11n, from);
                    let last = v11n.last_verse(verse.book(), verse.chapter());
                    let to = (from + (last - verse.verse()) as Ordinal).min(end);
                    ranges.push(VerseRange::from_ordinals(v11n, from, to));
                    from = to + 1;
                }
            }
        }
    }
    ranges
}

fn span_of(range: &VerseRange) -> Span {
    (range.start().ordinal(), range.end().ordinal())
}

// ------------- Passage -------------
pub struct Passage {
    v11n: Arc<Versification>,
    store: Store,
    listeners: Listeners,
    suppress_events: u32,
    skip_normalization: u32,
    pending: Option<PassageEvent>,
    original_name: Option<String>,
    parent: Option<Weak<dyn Key + Send + Sync>>,
}

impl Passage {
    pub fn new(kind: PassageKind, v11n: &Arc<Versification>) -> Self {
        let store = match kind {
            PassageKind::Distinct => Store::Distinct(DistinctStore::new()),
            PassageKind::Ranged => Store::Ranged(RangedStore::new(v11n)),
            PassageKind::Bitwise => Store::Bitwise(BitwiseStore::new()),
            PassageKind::Rocket => Store::Rocket(RocketStore::new(v11n)),
        };
        Self {
            v11n: Arc::clone(v11n),
            store,
            listeners: Listeners::default(),
            suppress_events: 0,
            skip_normalization: 0,
            pending: None,
            original_name: None,
            parent: None,
        }
    }
    /// Parses a reference list into a new passage.
    pub fn parse(kind: PassageKind, v11n: &Arc<Versification>, text: &str) -> Result<Self> {
        let mut passage = Self::new(kind, v11n);
        passage.add_verses(text)?;
        Ok(passage)
    }
    /// A passage holding every verse of the versification.
    pub fn whole(kind: PassageKind, v11n: &Arc<Versification>) -> Self {
        let mut passage = Self::new(kind, v11n);
        passage.store.add_span((1, v11n.max_ordinal()));
        passage.normalize();
        passage
    }
    /// A copy of this passage using another store.
    pub fn with_kind(&self, kind: PassageKind) -> Passage {
        let mut copy = Self::new(kind, &self.v11n);
        for span in self.store.spans() {
            copy.store.add_span(span);
        }
        copy.normalize();
        copy
    }

    pub fn kind(&self) -> PassageKind {
        match self.store {
            Store::Distinct(_) => PassageKind::Distinct,
            Store::Ranged(_) => PassageKind::Ranged,
            Store::Bitwise(_) => PassageKind::Bitwise,
            Store::Rocket(_) => PassageKind::Rocket,
        }
    }
    pub fn versification(&self) -> &Arc<Versification> {
        &self.v11n
    }

    fn check_versification(&self, other: &Arc<Versification>) -> Result<()> {
        if same_versification(&self.v11n, other) {
            Ok(())
        } else {
            Err(PassageError::MismatchedVersification {
                expected: self.v11n.name().to_string(),
                found: other.name().to_string(),
            })
        }
    }
    fn verse_of(&self, ordinal: Ordinal) -> Verse {
        Verse::at(&self.v11n, ordinal)
    }

    // ------------- reading -------------
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
    pub fn count_verses(&self) -> usize {
        self.store.len()
    }
    pub fn count_ranges(&self, restrict: RestrictionType) -> usize {
        match restrict {
            RestrictionType::None => self.store.spans().len(),
            RestrictionType::Chapter => self.ranges(restrict).len(),
        }
    }
    /// True when some range holds more than one verse.
    pub fn has_ranges(&self, restrict: RestrictionType) -> bool {
        self.ranges(restrict).iter().any(|r| r.cardinality() > 1)
    }
    pub fn books_in_passage(&self) -> usize {
        let mut books = BTreeSet::new();
        for (start, end) in self.store.spans() {
            let first = self.v11n.book_position(self.verse_of(start).book()).unwrap_or(0);
            let last = self.v11n.book_position(self.verse_of(end).book()).unwrap_or(first);
            books.extend(first..=last);
        }
        books.len()
    }
    /// The verses in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = Verse> + '_ {
        self.store.ordinals().map(move |o| Verse::at(&self.v11n, o))
    }
    /// The verses merged into ranges; with the chapter restriction no range
    /// crosses a chapter boundary.
    pub fn ranges(&self, restrict: RestrictionType) -> Vec<VerseRange> {
        ranges_of(&self.v11n, &self.store.spans(), restrict)
    }
    pub fn verse_at(&self, offset: usize) -> Result<Verse> {
        self.store
            .nth(offset)
            .map(|o| self.verse_of(o))
            .ok_or_else(|| PassageError::OutOfRange {
                offset,
                count: self.count_verses(),
            })
    }
    pub fn range_at(&self, offset: usize, restrict: RestrictionType) -> Result<VerseRange> {
        let ranges = self.ranges(restrict);
        let count = ranges.len();
        ranges
            .into_iter()
            .nth(offset)
            .ok_or(PassageError::OutOfRange { offset, count })
    }
    pub fn index_of(&self, verse: &Verse) -> Option<usize> {
        if !same_versification(&self.v11n, verse.versification()) {
            return None;
        }
        self.store.rank(verse.ordinal())
    }
    pub fn first_verse(&self) -> Option<Verse> {
        self.store.ordinals().next().map(|o| self.verse_of(o))
    }
    pub fn last_verse(&self) -> Option<Verse> {
        self.store.spans().last().map(|(_, end)| self.verse_of(*end))
    }
    pub fn contains_verse(&self, verse: &Verse) -> bool {
        same_versification(&self.v11n, verse.versification()) && self.store.contains(verse.ordinal())
    }
    pub fn contains_range(&self, range: &VerseRange) -> bool {
        same_versification(&self.v11n, range.versification()) && self.store.contains_span(span_of(range))
    }
    pub fn contains_all(&self, key: &dyn Key) -> bool {
        key.to_ranges().iter().all(|r| self.contains_range(r))
    }

    // ------------- naming -------------
    /// "Gen 1:1-5, 7, 2:3": every range named relative to the start of the
    /// one before it.
    pub fn name(&self) -> String {
        if let Some(name) = &self.original_name {
            return name.clone();
        }
        let mut names = Vec::new();
        let mut base: Option<Verse> = None;
        for range in self.ranges(RestrictionType::None) {
            names.push(range.name_relative(base.as_ref()));
            base = Some(range.start().clone());
        }
        names.join(", ")
    }
    pub fn osis_ref(&self) -> String {
        self.ranges(RestrictionType::None)
            .iter()
            .map(|r| r.osis_ref())
            .collect::<Vec<_>>()
            .join(" ")
    }
    pub fn osis_id(&self) -> String {
        self.ranges(RestrictionType::None)
            .iter()
            .map(|r| r.osis_id())
            .collect::<Vec<_>>()
            .join(" ")
    }
    /// "3 verses in 2 books".
    pub fn overview(&self) -> String {
        let verses = self.count_verses();
        let books = self.books_in_passage();
        format!(
            "{} {} in {} {}",
            verses,
            if verses == 1 { "verse" } else { "verses" },
            books,
            if books == 1 { "book" } else { "books" }
        )
    }
    pub(crate) fn set_original_name(&mut self, name: impl Into<String>) {
        self.original_name = Some(name.into());
    }

    // ------------- guards and events -------------
    /// Holds back normalization and events until the guard is dropped.
    pub fn batch(&mut self) -> Batch<'_> {
        Batch::new(self, true, true)
    }
    /// Holds back events until the guard is dropped.
    pub fn suppress_events(&mut self) -> Batch<'_> {
        Batch::new(self, true, false)
    }
    /// Holds back normalization until the guard is dropped.
    pub fn protect_normalization(&mut self) -> Batch<'_> {
        Batch::new(self, false, true)
    }
    pub fn is_batching(&self) -> bool {
        self.suppress_events > 0 || self.skip_normalization > 0
    }
    pub fn add_listener(&mut self, listener: Arc<dyn PassageListener>) {
        self.listeners.add(listener);
    }
    pub fn remove_listener(&mut self, listener: &Arc<dyn PassageListener>) -> bool {
        self.listeners.remove(listener)
    }
    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    fn normalize(&mut self) {
        if self.skip_normalization == 0 {
            self.store.normalize();
        }
    }
    fn fire(&mut self, kind: EventKind, start: Option<Verse>, end: Option<Verse>) {
        self.original_name = None;
        let event = PassageEvent::new(kind, start, end);
        if self.suppress_events > 0 {
            match &mut self.pending {
                Some(pending) => pending.absorb(event),
                None => self.pending = Some(event),
            }
        } else {
            self.listeners.notify(&event);
        }
    }

    // ------------- writing -------------
    /// Adds a verse or a range. Sub-identifiers are not kept.
    pub fn add(&mut self, key: impl Into<VerseRange>) -> Result<()> {
        let range = key.into();
        self.check_versification(range.versification())?;
        self.store.add_span(span_of(&range));
        self.normalize();
        self.fire(EventKind::Added, Some(range.start().whole()), Some(range.end().whole()));
        Ok(())
    }
    pub fn remove(&mut self, key: impl Into<VerseRange>) -> Result<()> {
        let range = key.into();
        self.check_versification(range.versification())?;
        self.store.remove_span(span_of(&range));
        self.normalize();
        self.fire(EventKind::Removed, Some(range.start().whole()), Some(range.end().whole()));
        Ok(())
    }
    /// Sets a single ordinal, bypassing range handling where the store allows.
    pub fn add_versified_ordinal(&mut self, ordinal: Ordinal) -> Result<()> {
        if ordinal < 1 || ordinal > self.v11n.max_ordinal() {
            return Err(PassageError::NoSuchVerse {
                message: format!("ordinal should be between 1 and {} (given {})", self.v11n.max_ordinal(), ordinal),
            });
        }
        match &mut self.store {
            Store::Bitwise(bits) => bits.add_versified_ordinal(ordinal),
            store => store.add_span((ordinal, ordinal)),
        }
        self.normalize();
        let verse = self.verse_of(ordinal);
        self.fire(EventKind::Added, Some(verse.clone()), Some(verse));
        Ok(())
    }
    /// Parses a reference list and adds it. Nothing is added when any part
    /// of the text fails to parse.
    pub fn add_verses(&mut self, text: &str) -> Result<()> {
        let ranges = parse_ranges(&self.v11n, text)?;
        let mut batch = self.batch();
        for range in &ranges {
            batch.add(range)?;
        }
        Ok(())
    }
    pub fn add_all(&mut self, key: &dyn Key) -> Result<()> {
        if key.is_empty() {
            return Ok(());
        }
        let mut batch = self.batch();
        if let Some(other) = key.as_passage() {
            batch.check_versification(other.versification())?;
            if batch.store.union_fast(&other.store) {
                batch.fire(EventKind::Added, other.first_verse(), other.last_verse());
                return Ok(());
            }
        }
        for range in key.to_ranges() {
            batch.add(&range)?;
        }
        Ok(())
    }
    pub fn remove_all(&mut self, key: &dyn Key) -> Result<()> {
        if key.is_empty() {
            return Ok(());
        }
        let mut batch = self.batch();
        if let Some(other) = key.as_passage() {
            batch.check_versification(other.versification())?;
            if batch.store.difference_fast(&other.store) {
                batch.fire(EventKind::Removed, other.first_verse(), other.last_verse());
                return Ok(());
            }
        }
        for range in key.to_ranges() {
            batch.remove(&range)?;
        }
        Ok(())
    }
    /// Keeps only the verses that are also in `key`.
    pub fn retain_all(&mut self, key: &dyn Key) -> Result<()> {
        let (start, end) = (self.first_verse(), self.last_verse());
        let mut batch = self.batch();
        let fast = match key.as_passage() {
            Some(other) => {
                batch.check_versification(other.versification())?;
                batch.store.intersect_fast(&other.store)
            }
            None => false,
        };
        if !fast {
            let mut theirs = Vec::new();
            for range in key.to_ranges() {
                batch.check_versification(range.versification())?;
                theirs.push(span_of(&range));
            }
            let kept = intersect_spans(&batch.store.spans(), &theirs);
            batch.store.clear();
            for span in kept {
                batch.store.add_span(span);
            }
        }
        batch.fire(EventKind::Removed, start, end);
        Ok(())
    }
    pub fn clear(&mut self) {
        self.store.clear();
        self.fire(EventKind::Removed, None, None);
    }
    /// Widens every range by `by` verses on each side, within `restrict`.
    pub fn blur(&mut self, by: u32, restrict: RestrictionType) {
        if by == 0 {
            return;
        }
        let ranges = self.ranges(restrict);
        let mut batch = self.batch();
        for range in ranges {
            let blurred = restrict.blur(&range, by, by);
            batch.store.add_span(span_of(&blurred));
        }
        batch.fire(EventKind::Changed, None, None);
    }
    /// Keeps the first `count` verses and returns the rest, or `None` when
    /// there are no more than `count` verses.
    pub fn trim_verses(&mut self, count: usize) -> Option<Passage> {
        let split = self.store.nth(count)?;
        Some(self.split_off(split))
    }
    /// Keeps the first `count` ranges and returns the rest, or `None` when
    /// there are no more than `count` ranges.
    pub fn trim_ranges(&mut self, count: usize, restrict: RestrictionType) -> Option<Passage> {
        let split = self.ranges(restrict).get(count)?.start().ordinal();
        Some(self.split_off(split))
    }
    // everything from `split` on moves into the returned passage
    fn split_off(&mut self, split: Ordinal) -> Passage {
        let mut remainder = self.clone();
        remainder.listeners = Listeners::default();
        remainder.original_name = None;
        if split > 1 {
            remainder.store.remove_span((1, split - 1));
            remainder.store.normalize();
        }
        let max = self.v11n.max_ordinal();
        let mut batch = self.batch();
        batch.store.remove_span((split, max));
        let first_removed = batch.verse_of(split);
        batch.fire(EventKind::Removed, Some(first_removed), None);
        drop(batch);
        remainder
    }
    /// Builds the read caches of a rocket passage; other stores ignore it.
    pub fn optimize_reads(&mut self) {
        if let Store::Rocket(rocket) = &mut self.store {
            rocket.optimize_reads();
        }
    }
    pub fn is_read_optimized(&self) -> bool {
        matches!(&self.store, Store::Rocket(rocket) if rocket.is_optimized())
    }

    // ------------- tree -------------
    pub fn set_parent(&mut self, parent: &SharedKey) {
        self.parent = Some(Arc::downgrade(parent));
    }
}

impl Clone for Passage {
    fn clone(&self) -> Self {
        Self {
            v11n: Arc::clone(&self.v11n),
            store: self.store.clone(),
            listeners: self.listeners.clone(),
            suppress_events: 0,
            skip_normalization: 0,
            pending: None,
            original_name: self.original_name.clone(),
            parent: self.parent.clone(),
        }
    }
}

impl PartialEq for Passage {
    fn eq(&self, other: &Self) -> bool {
        same_versification(&self.v11n, &other.v11n) && self.store.spans() == other.store.spans()
    }
}
impl Eq for Passage {}

// passages order by their first verse, then by what follows
impl Ord for Passage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.store
            .spans()
            .cmp(&other.store.spans())
            .then_with(|| self.v11n.name().cmp(other.v11n.name()))
    }
}
impl PartialOrd for Passage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passage")
            .field("kind", &self.kind())
            .field("versification", &self.v11n.name())
            .field("osis", &self.osis_ref())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Key for Passage {
    fn name(&self) -> String {
        Passage::name(self)
    }
    fn osis_ref(&self) -> String {
        Passage::osis_ref(self)
    }
    fn osis_id(&self) -> String {
        Passage::osis_id(self)
    }
    fn cardinality(&self) -> usize {
        self.count_verses()
    }
    fn is_empty(&self) -> bool {
        Passage::is_empty(self)
    }
    fn to_ranges(&self) -> Vec<VerseRange> {
        self.ranges(RestrictionType::None)
    }
    fn get(&self, index: usize) -> Option<Verse> {
        self.verse_at(index).ok()
    }
    fn index_of(&self, verse: &Verse) -> Option<usize> {
        Passage::index_of(self, verse)
    }
    fn contains(&self, key: &dyn Key) -> bool {
        self.contains_all(key)
    }
    fn as_passage(&self) -> Option<&Passage> {
        Some(self)
    }
    fn add_all(&mut self, key: &dyn Key) -> Result<()> {
        Passage::add_all(self, key)
    }
    fn remove_all(&mut self, key: &dyn Key) -> Result<()> {
        Passage::remove_all(self, key)
    }
    fn retain_all(&mut self, key: &dyn Key) -> Result<()> {
        Passage::retain_all(self, key)
    }
    fn clear(&mut self) -> Result<()> {
        Passage::clear(self);
        Ok(())
    }
    fn blur(&mut self, by: u32, restrict: RestrictionType) -> Result<()> {
        Passage::blur(self, by, restrict);
        Ok(())
    }
    fn parent(&self) -> Option<SharedKey> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }
}
