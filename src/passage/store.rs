use roaring::RoaringBitmap;

use crate::versification::Ordinal;

use super::bitwise::BitwiseStore;
use super::distinct::DistinctStore;
use super::ranged::RangedStore;
use super::rocket::RocketStore;

/// An inclusive run of ordinals.
pub(crate) type Span = (Ordinal, Ordinal);

/// The operations every backing store offers, in terms of ordinals.
/// Spans passed in are always ordered and inside the versification.
pub(crate) trait Storage {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn contains(&self, ordinal: Ordinal) -> bool;
    fn contains_span(&self, span: Span) -> bool {
        (span.0..=span.1).all(|o| self.contains(o))
    }
    fn add_span(&mut self, span: Span);
    fn remove_span(&mut self, span: Span);
    fn clear(&mut self);
    /// The ordinal at a zero based position.
    fn nth(&self, n: usize) -> Option<Ordinal>;
    /// The zero based position of an ordinal that is present.
    fn rank(&self, ordinal: Ordinal) -> Option<usize>;
    /// The content as maximal runs, in ascending order.
    fn spans(&self) -> Vec<Span>;
    fn ordinals(&self) -> Box<dyn Iterator<Item = Ordinal> + '_>;
    /// Restores the canonical form after deferred writes.
    fn normalize(&mut self) {}
}

/// Collapses ascending ordinals into maximal runs.
pub(crate) fn spans_of(ordinals: impl Iterator<Item = Ordinal>) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    for ordinal in ordinals {
        match spans.last_mut() {
            Some(last) if last.1 + 1 == ordinal => last.1 = ordinal,
            _ => spans.push((ordinal, ordinal)),
        }
    }
    spans
}

/// Intersects two ascending span lists.
pub(crate) fn intersect_spans(a: &[Span], b: &[Span]) -> Vec<Span> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let start = a[i].0.max(b[j].0);
        let end = a[i].1.min(b[j].1);
        if start <= end {
            result.push((start, end));
        }
        if a[i].1 < b[j].1 {
            i += 1;
        } else {
            j += 1;
        }
    }
    result
}

// ------------- Store -------------
/// The interchangeable backing stores of a passage.
#[derive(Clone)]
pub(crate) enum Store {
    Distinct(DistinctStore),
    Ranged(RangedStore),
    Bitwise(BitwiseStore),
    Rocket(RocketStore),
}

macro_rules! dispatch {
    ($store:expr, $inner:ident => $body:expr) => {
        match $store {
            Store::Distinct($inner) => $body,
            Store::Ranged($inner) => $body,
            Store::Bitwise($inner) => $body,
            Store::Rocket($inner) => $body,
        }
    };
}

impl Storage for Store {
    fn len(&self) -> usize {
        dispatch!(self, s => s.len())
    }
    fn contains(&self, ordinal: Ordinal) -> bool {
        dispatch!(self, s => s.contains(ordinal))
    }
    fn contains_span(&self, span: Span) -> bool {
        dispatch!(self, s => s.contains_span(span))
    }
    fn add_span(&mut self, span: Span) {
        dispatch!(self, s => s.add_span(span))
    }
    fn remove_span(&mut self, span: Span) {
        dispatch!(self, s => s.remove_span(span))
    }
    fn clear(&mut self) {
        dispatch!(self, s => s.clear())
    }
    fn nth(&self, n: usize) -> Option<Ordinal> {
        dispatch!(self, s => s.nth(n))
    }
    fn rank(&self, ordinal: Ordinal) -> Option<usize> {
        dispatch!(self, s => s.rank(ordinal))
    }
    fn spans(&self) -> Vec<Span> {
        dispatch!(self, s => s.spans())
    }
    fn ordinals(&self) -> Box<dyn Iterator<Item = Ordinal> + '_> {
        dispatch!(self, s => s.ordinals())
    }
    fn normalize(&mut self) {
        dispatch!(self, s => s.normalize())
    }
}

// ------------- same shape set algebra -------------
// each returns false when the two stores have no shortcut in common
impl Store {
    pub fn bitmap(&self) -> Option<&RoaringBitmap> {
        match self {
            Store::Bitwise(s) => Some(s.bits()),
            Store::Rocket(s) => Some(s.bits()),
            _ => None,
        }
    }
    fn bitmap_mut(&mut self) -> Option<&mut RoaringBitmap> {
        match self {
            Store::Bitwise(s) => Some(s.bits_mut()),
            Store::Rocket(s) => Some(s.bits_mut()),
            _ => None,
        }
    }

    pub fn union_fast(&mut self, other: &Store) -> bool {
        if let Some(theirs) = other.bitmap() {
            if let Some(mine) = self.bitmap_mut() {
                *mine |= theirs;
                return true;
            }
        }
        match (self, other) {
            (Store::Distinct(mine), Store::Distinct(theirs)) => mine.union_with(theirs),
            (Store::Ranged(mine), Store::Ranged(theirs)) => mine.union_with(theirs),
            _ => return false,
        }
        true
    }

    pub fn difference_fast(&mut self, other: &Store) -> bool {
        if let Some(theirs) = other.bitmap() {
            if let Some(mine) = self.bitmap_mut() {
                *mine -= theirs;
                return true;
            }
        }
        match (self, other) {
            (Store::Distinct(mine), Store::Distinct(theirs)) => {
                mine.difference_with(theirs);
                true
            }
            _ => false,
        }
    }

    pub fn intersect_fast(&mut self, other: &Store) -> bool {
        if let Some(theirs) = other.bitmap() {
            if let Some(mine) = self.bitmap_mut() {
                *mine &= theirs;
                return true;
            }
        }
        match (self, other) {
            (Store::Distinct(mine), Store::Distinct(theirs)) => {
                mine.intersect_with(theirs);
                true
            }
            _ => false,
        }
    }
}
