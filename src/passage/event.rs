use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::verse::Verse;

// ------------- PassageEvent -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Added,
    Removed,
    Changed,
}

/// Describes a change to a passage. The endpoints are the interval that
/// was touched; `None` means the change may reach anywhere in the passage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageEvent {
    kind: EventKind,
    start: Option<Verse>,
    end: Option<Verse>,
}

impl PassageEvent {
    pub fn new(kind: EventKind, start: Option<Verse>, end: Option<Verse>) -> Self {
        Self { kind, start, end }
    }
    pub fn kind(&self) -> EventKind {
        self.kind
    }
    pub fn start(&self) -> Option<&Verse> {
        self.start.as_ref()
    }
    pub fn end(&self) -> Option<&Verse> {
        self.end.as_ref()
    }

    // folds a later event into this one so that a batch reports once
    pub(crate) fn absorb(&mut self, later: PassageEvent) {
        if self.kind != later.kind {
            self.kind = EventKind::Changed;
        }
        self.start = match (self.start.take(), later.start) {
            (Some(a), Some(b)) => Some(a.min(b)),
            _ => None,
        };
        self.end = match (self.end.take(), later.end) {
            (Some(a), Some(b)) => Some(a.max(b)),
            _ => None,
        };
    }
}

impl fmt::Display for PassageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let describe = |v: Option<&Verse>| v.map(|v| v.name()).unwrap_or_else(|| "*".to_string());
        write!(f, "{:?} {}..{}", self.kind, describe(self.start()), describe(self.end()))
    }
}

// ------------- PassageListener -------------
/// Observes changes to a passage. Listeners are called synchronously on the
/// mutating thread and must not modify the passage they observe.
pub trait PassageListener: Send + Sync {
    fn verses_added(&self, event: &PassageEvent);
    fn verses_removed(&self, event: &PassageEvent);
    fn verses_changed(&self, event: &PassageEvent);
}

/// The registry of listeners attached to one passage. Cloning a passage
/// shares its listeners.
#[derive(Clone, Default)]
pub struct Listeners {
    list: Vec<Arc<dyn PassageListener>>,
}

impl Listeners {
    pub fn add(&mut self, listener: Arc<dyn PassageListener>) {
        self.list.push(listener);
    }
    /// Removes a listener, matched by identity.
    pub fn remove(&mut self, listener: &Arc<dyn PassageListener>) -> bool {
        let before = self.list.len();
        let target = Arc::as_ptr(listener) as *const ();
        self.list.retain(|l| Arc::as_ptr(l) as *const () != target);
        self.list.len() != before
    }
    pub fn len(&self) -> usize {
        self.list.len()
    }
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
    pub fn notify(&self, event: &PassageEvent) {
        if self.list.is_empty() {
            return;
        }
        trace!(listeners = self.list.len(), event = %event, "notifying passage listeners");
        for listener in &self.list {
            match event.kind {
                EventKind::Added => listener.verses_added(event),
                EventKind::Removed => listener.verses_removed(event),
                EventKind::Changed => listener.verses_changed(event),
            }
        }
    }
}
