use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::error::{PassageError, Result};
use crate::key::{Key, SharedKey};
use crate::passage::Passage;
use crate::range::VerseRange;
use crate::restriction::RestrictionType;
use crate::tally::PassageTally;
use crate::verse::Verse;

pub type ReadOnlyPassage = ReadOnly<Passage>;
pub type SynchronizedPassage = Synchronized<Passage>;

// ------------- ReadOnly -------------
/// A key that refuses writes. Whether a refused write is an error or is
/// dropped with a warning is fixed when the wrapper is made.
pub struct ReadOnly<K: Key> {
    inner: K,
    ignore: bool,
}

impl<K: Key> ReadOnly<K> {
    pub fn new(inner: K, ignore: bool) -> Self {
        Self { inner, ignore }
    }
    pub fn inner(&self) -> &K {
        &self.inner
    }
    pub fn ignores_writes(&self) -> bool {
        self.ignore
    }
    fn refuse(&self, operation: &'static str) -> Result<()> {
        if self.ignore {
            warn!(operation, key = %self.inner.name(), "ignoring write to a read-only key");
            Ok(())
        } else {
            Err(PassageError::ReadOnly)
        }
    }
}

impl<K: Key> fmt::Display for ReadOnly<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl<K: Key> Key for ReadOnly<K> {
    fn name(&self) -> String {
        self.inner.name()
    }
    fn osis_ref(&self) -> String {
        self.inner.osis_ref()
    }
    fn osis_id(&self) -> String {
        self.inner.osis_id()
    }
    fn cardinality(&self) -> usize {
        self.inner.cardinality()
    }
    fn to_ranges(&self) -> Vec<VerseRange> {
        self.inner.to_ranges()
    }
    fn get(&self, index: usize) -> Option<Verse> {
        self.inner.get(index)
    }
    fn index_of(&self, verse: &Verse) -> Option<usize> {
        self.inner.index_of(verse)
    }
    fn contains(&self, key: &dyn Key) -> bool {
        self.inner.contains(key)
    }
    fn as_passage(&self) -> Option<&Passage> {
        self.inner.as_passage()
    }
    fn as_tally(&self) -> Option<&PassageTally> {
        self.inner.as_tally()
    }
    fn add_all(&mut self, _key: &dyn Key) -> Result<()> {
        self.refuse("add_all")
    }
    fn remove_all(&mut self, _key: &dyn Key) -> Result<()> {
        self.refuse("remove_all")
    }
    fn retain_all(&mut self, _key: &dyn Key) -> Result<()> {
        self.refuse("retain_all")
    }
    fn clear(&mut self) -> Result<()> {
        self.refuse("clear")
    }
    fn blur(&mut self, _by: u32, _restrict: RestrictionType) -> Result<()> {
        self.refuse("blur")
    }
    fn parent(&self) -> Option<SharedKey> {
        self.inner.parent()
    }
}

// ------------- Synchronized -------------
/// A key behind one mutex, to be shared between threads in an `Arc`. Every
/// call holds the lock for its whole duration.
pub struct Synchronized<K: Key> {
    inner: Mutex<K>,
}

impl<K: Key> Synchronized<K> {
    pub fn new(inner: K) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }
    pub fn lock(&self) -> Result<MutexGuard<'_, K>> {
        Ok(self.inner.lock()?)
    }
    /// Runs `f` with shared access under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&K) -> R) -> Result<R> {
        let guard = self.lock()?;
        Ok(f(&guard))
    }
    /// Runs `f` with exclusive access under the lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut K) -> Result<R>) -> Result<R> {
        let mut guard = self.lock()?;
        f(&mut guard)
    }
    pub fn into_inner(self) -> Result<K> {
        Ok(self.inner.into_inner()?)
    }
    // reads through the trait cannot report a poisoned lock, so they see
    // whatever state the panicking writer left
    fn guard(&self) -> MutexGuard<'_, K> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
    fn inner_mut(&mut self) -> Result<&mut K> {
        Ok(self.inner.get_mut()?)
    }
}

impl<K: Key> fmt::Display for Synchronized<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.guard(), f)
    }
}

impl<K: Key> Key for Synchronized<K> {
    fn name(&self) -> String {
        self.guard().name()
    }
    fn osis_ref(&self) -> String {
        self.guard().osis_ref()
    }
    fn osis_id(&self) -> String {
        self.guard().osis_id()
    }
    fn cardinality(&self) -> usize {
        self.guard().cardinality()
    }
    fn to_ranges(&self) -> Vec<VerseRange> {
        self.guard().to_ranges()
    }
    fn get(&self, index: usize) -> Option<Verse> {
        self.guard().get(index)
    }
    fn index_of(&self, verse: &Verse) -> Option<usize> {
        self.guard().index_of(verse)
    }
    fn contains(&self, key: &dyn Key) -> bool {
        // the ranges are taken first so that a key may be checked against itself
        let ranges = key.to_ranges();
        let guard = self.guard();
        ranges.iter().all(|range| guard.contains(range))
    }
    fn add_all(&mut self, key: &dyn Key) -> Result<()> {
        self.inner_mut()?.add_all(key)
    }
    fn remove_all(&mut self, key: &dyn Key) -> Result<()> {
        self.inner_mut()?.remove_all(key)
    }
    fn retain_all(&mut self, key: &dyn Key) -> Result<()> {
        self.inner_mut()?.retain_all(key)
    }
    fn clear(&mut self) -> Result<()> {
        self.inner_mut()?.clear()
    }
    fn blur(&mut self, by: u32, restrict: RestrictionType) -> Result<()> {
        self.inner_mut()?.blur(by, restrict)
    }
    fn parent(&self) -> Option<SharedKey> {
        self.guard().parent()
    }
}
