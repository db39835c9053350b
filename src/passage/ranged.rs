use std::collections::BTreeSet;
use std::sync::Arc;

use crate::range::VerseRange;
use crate::versification::{Ordinal, Versification};

use super::store::{Span, Storage};

// ------------- RangedStore -------------
/// An ordered set of verse ranges. Once normalized no two ranges overlap
/// or touch, so large contiguous passages stay small.
#[derive(Clone)]
pub(crate) struct RangedStore {
    v11n: Arc<Versification>,
    ranges: BTreeSet<VerseRange>,
}

impl RangedStore {
    pub fn new(v11n: &Arc<Versification>) -> Self {
        Self {
            v11n: Arc::clone(v11n),
            ranges: BTreeSet::new(),
        }
    }
    pub fn from_spans(v11n: &Arc<Versification>, spans: &[Span]) -> Self {
        let mut store = Self::new(v11n);
        for span in spans {
            store.add_span(*span);
        }
        store.normalize();
        store
    }
    pub fn union_with(&mut self, other: &RangedStore) {
        self.ranges.extend(other.ranges.iter().cloned());
    }

    // walks the ranges in order merging anything that touches
    fn merged(&self) -> Vec<Span> {
        let mut spans: Vec<Span> = Vec::with_capacity(self.ranges.len());
        for range in &self.ranges {
            let (start, end) = (range.start().ordinal(), range.end().ordinal());
            match spans.last_mut() {
                Some(last) if start <= last.1 + 1 => last.1 = last.1.max(end),
                _ => spans.push((start, end)),
            }
        }
        spans
    }
}

impl Storage for RangedStore {
    fn len(&self) -> usize {
        self.merged().iter().map(|(s, e)| (e - s + 1) as usize).sum()
    }
    fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
    fn contains(&self, ordinal: Ordinal) -> bool {
        self.ranges
            .iter()
            .take_while(|r| r.start().ordinal() <= ordinal)
            .any(|r| r.end().ordinal() >= ordinal)
    }
    fn contains_span(&self, span: Span) -> bool {
        self.merged().iter().any(|(s, e)| *s <= span.0 && *e >= span.1)
    }
    fn add_span(&mut self, span: Span) {
        self.ranges.insert(VerseRange::from_ordinals(&self.v11n, span.0, span.1));
    }
    fn remove_span(&mut self, span: Span) {
        let cut = VerseRange::from_ordinals(&self.v11n, span.0, span.1);
        let touched: Vec<VerseRange> = self.ranges.iter().filter(|r| r.overlaps(&cut)).cloned().collect();
        for range in touched {
            self.ranges.remove(&range);
            for rest in VerseRange::remainder(&range, &cut) {
                self.ranges.insert(rest);
            }
        }
    }
    fn clear(&mut self) {
        self.ranges.clear();
    }
    fn nth(&self, n: usize) -> Option<Ordinal> {
        let mut left = Ordinal::try_from(n).ok()?;
        for (start, end) in self.merged() {
            let size = end - start + 1;
            if left < size {
                return Some(start + left);
            }
            left -= size;
        }
        None
    }
    fn rank(&self, ordinal: Ordinal) -> Option<usize> {
        let mut before = 0usize;
        for (start, end) in self.merged() {
            if ordinal < start {
                return None;
            }
            if ordinal <= end {
                return Some(before + (ordinal - start) as usize);
            }
            before += (end - start + 1) as usize;
        }
        None
    }
    fn spans(&self) -> Vec<Span> {
        self.merged()
    }
    fn ordinals(&self) -> Box<dyn Iterator<Item = Ordinal> + '_> {
        Box::new(self.merged().into_iter().flat_map(|(s, e)| s..=e))
    }
    fn normalize(&mut self) {
        let merged = self.merged();
        if merged.len() == self.ranges.len() {
            return;
        }
        self.ranges = merged
            .into_iter()
            .map(|(s, e)| VerseRange::from_ordinals(&self.v11n, s, e))
            .collect();
    }
}
