// the "roaring bitmaps" give compressed bitsets with fast set algebra
use roaring::RoaringBitmap;

use crate::versification::Ordinal;

use super::store::{spans_of, Span, Storage};

// ------------- BitwiseStore -------------
/// One bit per ordinal. Writes and set algebra are cheap, naming needs a scan.
#[derive(Debug, Clone, Default)]
pub(crate) struct BitwiseStore {
    bits: RoaringBitmap,
}

impl BitwiseStore {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn bits(&self) -> &RoaringBitmap {
        &self.bits
    }
    pub fn bits_mut(&mut self) -> &mut RoaringBitmap {
        &mut self.bits
    }
    /// Sets one ordinal directly.
    pub fn add_versified_ordinal(&mut self, ordinal: Ordinal) {
        self.bits.insert(ordinal);
    }
}

impl Storage for BitwiseStore {
    fn len(&self) -> usize {
        self.bits.len() as usize
    }
    fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
    fn contains(&self, ordinal: Ordinal) -> bool {
        self.bits.contains(ordinal)
    }
    fn add_span(&mut self, span: Span) {
        self.bits.insert_range(span.0..=span.1);
    }
    fn remove_span(&mut self, span: Span) {
        self.bits.remove_range(span.0..=span.1);
    }
    fn clear(&mut self) {
        self.bits.clear();
    }
    fn nth(&self, n: usize) -> Option<Ordinal> {
        u32::try_from(n).ok().and_then(|n| self.bits.select(n))
    }
    fn rank(&self, ordinal: Ordinal) -> Option<usize> {
        if !self.bits.contains(ordinal) {
            return None;
        }
        Some(self.bits.rank(ordinal) as usize - 1)
    }
    fn spans(&self) -> Vec<Span> {
        spans_of(self.bits.iter())
    }
    fn ordinals(&self) -> Box<dyn Iterator<Item = Ordinal> + '_> {
        Box::new(self.bits.iter())
    }
}
