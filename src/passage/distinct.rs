use std::collections::BTreeSet;

use crate::versification::Ordinal;

use super::store::{spans_of, Span, Storage};

// ------------- DistinctStore -------------
/// An ordered set of single verses. Cheap for a few scattered verses.
#[derive(Debug, Clone, Default)]
pub(crate) struct DistinctStore {
    verses: BTreeSet<Ordinal>,
}

impl DistinctStore {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn from_ordinals(ordinals: impl Iterator<Item = Ordinal>) -> Self {
        Self {
            verses: ordinals.collect(),
        }
    }
    pub fn union_with(&mut self, other: &DistinctStore) {
        self.verses.extend(other.verses.iter().copied());
    }
    pub fn difference_with(&mut self, other: &DistinctStore) {
        self.verses.retain(|o| !other.verses.contains(o));
    }
    pub fn intersect_with(&mut self, other: &DistinctStore) {
        self.verses.retain(|o| other.verses.contains(o));
    }
}

impl Storage for DistinctStore {
    fn len(&self) -> usize {
        self.verses.len()
    }
    fn contains(&self, ordinal: Ordinal) -> bool {
        self.verses.contains(&ordinal)
    }
    fn contains_span(&self, span: Span) -> bool {
        self.verses.range(span.0..=span.1).count() == (span.1 - span.0 + 1) as usize
    }
    fn add_span(&mut self, span: Span) {
        self.verses.extend(span.0..=span.1);
    }
    fn remove_span(&mut self, span: Span) {
        let mut tail = self.verses.split_off(&span.0);
        let mut kept = tail.split_off(&(span.1 + 1));
        self.verses.append(&mut kept);
    }
    fn clear(&mut self) {
        self.verses.clear();
    }
    fn nth(&self, n: usize) -> Option<Ordinal> {
        self.verses.iter().nth(n).copied()
    }
    fn rank(&self, ordinal: Ordinal) -> Option<usize> {
        if !self.verses.contains(&ordinal) {
            return None;
        }
        Some(self.verses.range(..ordinal).count())
    }
    fn spans(&self) -> Vec<Span> {
        spans_of(self.verses.iter().copied())
    }
    fn ordinals(&self) -> Box<dyn Iterator<Item = Ordinal> + '_> {
        Box::new(self.verses.iter().copied())
    }
}
