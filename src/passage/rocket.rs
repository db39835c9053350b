use std::sync::Arc;

use roaring::RoaringBitmap;

use crate::versification::{Ordinal, Versification};

use super::bitwise::BitwiseStore;
use super::distinct::DistinctStore;
use super::ranged::RangedStore;
use super::store::{Span, Storage};

// ------------- RocketStore -------------
/// A bitwise store that can be asked to keep distinct and ranged copies of
/// itself for fast reads. Every write throws the copies away again.
#[derive(Clone)]
pub(crate) struct RocketStore {
    v11n: Arc<Versification>,
    bits: BitwiseStore,
    cache: Option<ReadCache>,
}

#[derive(Clone)]
struct ReadCache {
    distinct: DistinctStore,
    ranged: RangedStore,
}

impl RocketStore {
    pub fn new(v11n: &Arc<Versification>) -> Self {
        Self {
            v11n: Arc::clone(v11n),
            bits: BitwiseStore::new(),
            cache: None,
        }
    }
    /// Builds the read caches from the bitset.
    pub fn optimize_reads(&mut self) {
        if self.cache.is_some() {
            return;
        }
        let spans = self.bits.spans();
        self.cache = Some(ReadCache {
            distinct: DistinctStore::from_ordinals(self.bits.ordinals()),
            ranged: RangedStore::from_spans(&self.v11n, &spans),
        });
    }
    pub fn is_optimized(&self) -> bool {
        self.cache.is_some()
    }
    fn optimize_writes(&mut self) {
        self.cache = None;
    }
    pub fn bits(&self) -> &RoaringBitmap {
        self.bits.bits()
    }
    pub fn bits_mut(&mut self) -> &mut RoaringBitmap {
        self.optimize_writes();
        self.bits.bits_mut()
    }
}

impl Storage for RocketStore {
    fn len(&self) -> usize {
        self.bits.len()
    }
    fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
    fn contains(&self, ordinal: Ordinal) -> bool {
        self.bits.contains(ordinal)
    }
    fn contains_span(&self, span: Span) -> bool {
        match &self.cache {
            Some(cache) => cache.ranged.contains_span(span),
            None => self.bits.contains_span(span),
        }
    }
    fn add_span(&mut self, span: Span) {
        self.optimize_writes();
        self.bits.add_span(span);
    }
    fn remove_span(&mut self, span: Span) {
        self.optimize_writes();
        self.bits.remove_span(span);
    }
    fn clear(&mut self) {
        self.optimize_writes();
        self.bits.clear();
    }
    fn nth(&self, n: usize) -> Option<Ordinal> {
        match &self.cache {
            Some(cache) => cache.distinct.nth(n),
            None => self.bits.nth(n),
        }
    }
    fn rank(&self, ordinal: Ordinal) -> Option<usize> {
        self.bits.rank(ordinal)
    }
    fn spans(&self) -> Vec<Span> {
        match &self.cache {
            Some(cache) => cache.ranged.spans(),
            None => self.bits.spans(),
        }
    }
    fn ordinals(&self) -> Box<dyn Iterator<Item = Ordinal> + '_> {
        match &self.cache {
            Some(cache) => cache.distinct.ordinals(),
            None => self.bits.ordinals(),
        }
    }
}
