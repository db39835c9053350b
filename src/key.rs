use std::fmt;
use std::sync::Arc;

use crate::error::{PassageError, Result};
use crate::passage::Passage;
use crate::range::VerseRange;
use crate::restriction::RestrictionType;
use crate::tally::PassageTally;
use crate::verse::Verse;

/// A shared handle to a key that may act as the parent of others.
pub type SharedKey = Arc<dyn Key + Send + Sync>;

// ------------- Key -------------
/// What callers such as the book and search layers need from a set of
/// references, whatever its shape.
pub trait Key: fmt::Display {
    /// The human readable name, e.g. "Gen 1:1-5, 7".
    fn name(&self) -> String;
    fn osis_ref(&self) -> String;
    fn osis_id(&self) -> String;
    /// The number of verses.
    fn cardinality(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.cardinality() == 0
    }
    /// The content as ascending, merged ranges.
    fn to_ranges(&self) -> Vec<VerseRange>;
    fn get(&self, index: usize) -> Option<Verse>;
    fn index_of(&self, verse: &Verse) -> Option<usize>;
    /// True when every verse of `key` is also in this key.
    fn contains(&self, key: &dyn Key) -> bool;
    fn as_passage(&self) -> Option<&Passage> {
        None
    }
    fn as_tally(&self) -> Option<&PassageTally> {
        None
    }

    fn add_all(&mut self, key: &dyn Key) -> Result<()>;
    fn remove_all(&mut self, key: &dyn Key) -> Result<()>;
    fn retain_all(&mut self, key: &dyn Key) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
    fn blur(&mut self, by: u32, restrict: RestrictionType) -> Result<()>;

    fn parent(&self) -> Option<SharedKey> {
        None
    }
    fn can_have_children(&self) -> bool {
        false
    }
    fn child_count(&self) -> usize {
        0
    }
}

// ------------- Verse and VerseRange as keys -------------
// both are values, so anything that would change them is refused

impl Key for Verse {
    fn name(&self) -> String {
        Verse::name(self)
    }
    fn osis_ref(&self) -> String {
        Verse::osis_ref(self)
    }
    fn osis_id(&self) -> String {
        Verse::osis_id(self)
    }
    fn cardinality(&self) -> usize {
        1
    }
    fn to_ranges(&self) -> Vec<VerseRange> {
        vec![VerseRange::from(self)]
    }
    fn get(&self, index: usize) -> Option<Verse> {
        (index == 0).then(|| self.clone())
    }
    fn index_of(&self, verse: &Verse) -> Option<usize> {
        (verse.ordinal() == self.ordinal() && verse.is_same_versification(self)).then_some(0)
    }
    fn contains(&self, key: &dyn Key) -> bool {
        let me = VerseRange::from(self);
        key.to_ranges().iter().all(|r| me.contains_range(r))
    }
    fn add_all(&mut self, _key: &dyn Key) -> Result<()> {
        Err(PassageError::Unsupported("a verse cannot be added to"))
    }
    fn remove_all(&mut self, _key: &dyn Key) -> Result<()> {
        Err(PassageError::Unsupported("a verse cannot be removed from"))
    }
    fn retain_all(&mut self, _key: &dyn Key) -> Result<()> {
        Err(PassageError::Unsupported("a verse cannot be retained"))
    }
    fn clear(&mut self) -> Result<()> {
        Err(PassageError::Unsupported("a verse cannot be cleared"))
    }
    fn blur(&mut self, _by: u32, _restrict: RestrictionType) -> Result<()> {
        Err(PassageError::Unsupported("a verse cannot be blurred in place"))
    }
}

impl Key for VerseRange {
    fn name(&self) -> String {
        VerseRange::name(self)
    }
    fn osis_ref(&self) -> String {
        VerseRange::osis_ref(self)
    }
    fn osis_id(&self) -> String {
        VerseRange::osis_id(self)
    }
    fn cardinality(&self) -> usize {
        VerseRange::cardinality(self) as usize
    }
    fn to_ranges(&self) -> Vec<VerseRange> {
        vec![self.clone()]
    }
    fn get(&self, index: usize) -> Option<Verse> {
        u32::try_from(index)
            .ok()
            .filter(|i| *i < VerseRange::cardinality(self))
            .map(|i| self.start().add(i))
    }
    fn index_of(&self, verse: &Verse) -> Option<usize> {
        self.contains_verse(verse)
            .then(|| self.start().distance(verse) as usize)
    }
    fn contains(&self, key: &dyn Key) -> bool {
        key.to_ranges().iter().all(|r| self.contains_range(r))
    }
    fn add_all(&mut self, _key: &dyn Key) -> Result<()> {
        Err(PassageError::Unsupported("a verse range cannot be added to"))
    }
    fn remove_all(&mut self, _key: &dyn Key) -> Result<()> {
        Err(PassageError::Unsupported("a verse range cannot be removed from"))
    }
    fn retain_all(&mut self, _key: &dyn Key) -> Result<()> {
        Err(PassageError::Unsupported("a verse range cannot be retained"))
    }
    fn clear(&mut self) -> Result<()> {
        Err(PassageError::Unsupported("a verse range cannot be cleared"))
    }
    fn blur(&mut self, _by: u32, _restrict: RestrictionType) -> Result<()> {
        Err(PassageError::Unsupported("a verse range cannot be blurred in place"))
    }
}
