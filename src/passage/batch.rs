use std::ops::{Deref, DerefMut};

use super::Passage;

// ------------- Batch -------------
/// Holds back normalization and change events on a passage for as long as
/// it lives. Dropping the last guard normalizes once and then reports one
/// event covering everything that changed, also when leaving through `?`.
///
/// Guards nest: a batch dereferences to its passage, so `batch.batch()`
/// opens an inner one.
pub struct Batch<'a> {
    passage: &'a mut Passage,
    events: bool,
    normalize: bool,
}

impl<'a> Batch<'a> {
    pub(super) fn new(passage: &'a mut Passage, events: bool, normalize: bool) -> Self {
        if events {
            passage.suppress_events += 1;
        }
        if normalize {
            passage.skip_normalization += 1;
        }
        Self {
            passage,
            events,
            normalize,
        }
    }
}

impl Deref for Batch<'_> {
    type Target = Passage;
    fn deref(&self) -> &Passage {
        self.passage
    }
}

impl DerefMut for Batch<'_> {
    fn deref_mut(&mut self) -> &mut Passage {
        self.passage
    }
}

impl Drop for Batch<'_> {
    fn drop(&mut self) {
        if self.normalize {
            self.passage.skip_normalization -= 1;
            if self.passage.skip_normalization == 0 {
                self.passage.normalize();
            }
        }
        if self.events {
            self.passage.suppress_events -= 1;
            if self.passage.suppress_events == 0 {
                if let Some(event) = self.passage.pending.take() {
                    self.passage.listeners.notify(&event);
                }
            }
        }
    }
}
