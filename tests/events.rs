use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use passage::book::BibleBook::{self, *};
use passage::passage::{EventKind, PassageEvent, PassageListener};
use passage::{Passage, PassageKind, RestrictionType, Verse, Versification};

#[derive(Default)]
struct Counter {
    added: AtomicUsize,
    removed: AtomicUsize,
    changed: AtomicUsize,
    last: Mutex<Option<PassageEvent>>,
}

impl Counter {
    fn total(&self) -> usize {
        self.added.load(Ordering::SeqCst) + self.removed.load(Ordering::SeqCst) + self.changed.load(Ordering::SeqCst)
    }
    fn last(&self) -> PassageEvent {
        self.last.lock().unwrap().clone().unwrap()
    }
    fn record(&self, counter: &AtomicUsize, event: &PassageEvent) {
        counter.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(event.clone());
    }
}

impl PassageListener for Counter {
    fn verses_added(&self, event: &PassageEvent) {
        self.record(&self.added, event);
    }
    fn verses_removed(&self, event: &PassageEvent) {
        self.record(&self.removed, event);
    }
    fn verses_changed(&self, event: &PassageEvent) {
        self.record(&self.changed, event);
    }
}

fn v(book: BibleBook, chapter: u16, verse: u16) -> Verse {
    Verse::new(&Versification::kjv(), book, chapter, verse).unwrap()
}

fn watched(kind: PassageKind) -> (Passage, Arc<Counter>, Arc<dyn PassageListener>) {
    let counter = Arc::new(Counter::default());
    let listener: Arc<dyn PassageListener> = counter.clone();
    let mut passage = Passage::new(kind, &Versification::kjv());
    passage.add_listener(Arc::clone(&listener));
    (passage, counter, listener)
}

#[test]
fn every_change_is_reported() {
    let (mut p, counter, _) = watched(PassageKind::Ranged);
    p.add(v(Gen, 1, 1)).unwrap();
    assert_eq!(counter.added.load(Ordering::SeqCst), 1);
    let event = counter.last();
    assert_eq!(event.kind(), EventKind::Added);
    assert_eq!(event.start(), Some(&v(Gen, 1, 1)));

    p.remove(v(Gen, 1, 1)).unwrap();
    assert_eq!(counter.removed.load(Ordering::SeqCst), 1);

    p.clear();
    assert_eq!(counter.removed.load(Ordering::SeqCst), 2);
    assert_eq!(counter.last().start(), None);
}

#[test]
fn a_batch_reports_once() {
    let (mut p, counter, _) = watched(PassageKind::Bitwise);
    {
        let mut batch = p.batch();
        batch.add(v(Gen, 1, 5)).unwrap();
        batch.add(v(Gen, 1, 1)).unwrap();
        batch.add(v(Exod, 1, 1)).unwrap();
        assert!(batch.is_batching());
        assert_eq!(counter.total(), 0);
    }
    assert_eq!(counter.total(), 1);
    let event = counter.last();
    assert_eq!(event.kind(), EventKind::Added);
    assert_eq!(event.start(), Some(&v(Gen, 1, 1)));
    assert_eq!(event.end(), Some(&v(Exod, 1, 1)));

    p.add_verses("Gen 2:1-3, 5; Exod 3").unwrap();
    assert_eq!(counter.total(), 2);
}

#[test]
fn mixed_changes_are_reported_as_changed() {
    let (mut p, counter, _) = watched(PassageKind::Distinct);
    {
        let mut batch = p.suppress_events();
        batch.add(v(Gen, 1, 1)).unwrap();
        batch.remove(v(Gen, 1, 1)).unwrap();
    }
    assert_eq!(counter.changed.load(Ordering::SeqCst), 1);
    assert_eq!(counter.total(), 1);

    p.add(v(Gen, 1, 3)).unwrap();
    p.blur(1, RestrictionType::None);
    assert_eq!(counter.changed.load(Ordering::SeqCst), 2);
    assert_eq!(p.name(), "Gen 1:2-4");
}

#[test]
fn nested_guards_release_on_the_outermost_drop() {
    let (mut p, counter, _) = watched(PassageKind::Rocket);
    {
        let mut outer = p.batch();
        {
            let mut inner = outer.protect_normalization();
            inner.add(v(Gen, 1, 2)).unwrap();
        }
        assert!(outer.is_batching());
        assert_eq!(counter.total(), 0);
    }
    assert!(!p.is_batching());
    assert_eq!(counter.total(), 1);
}

#[test]
fn guards_are_released_when_an_operation_fails() {
    let tiny = Arc::new(Versification::new("Tiny", vec![(Gen, vec![3])]).unwrap());
    let mut foreign = Passage::new(PassageKind::Distinct, &tiny);
    foreign.add(Verse::new(&tiny, Gen, 1, 1).unwrap()).unwrap();

    let (mut p, counter, _) = watched(PassageKind::Distinct);
    assert!(p.add_all(&foreign).is_err());
    assert!(!p.is_batching());
    assert_eq!(counter.total(), 0);

    p.add(v(Gen, 1, 1)).unwrap();
    assert_eq!(counter.total(), 1);
}

#[test]
fn listeners_can_be_removed_and_are_shared_by_clones() {
    let (mut p, counter, listener) = watched(PassageKind::Ranged);
    let mut copy = p.clone();
    copy.add(v(Gen, 1, 1)).unwrap();
    assert_eq!(counter.total(), 1);

    assert_eq!(p.listeners().len(), 1);
    assert!(p.remove_listener(&listener));
    assert!(!p.remove_listener(&listener));
    assert!(p.listeners().is_empty());
    p.add(v(Gen, 1, 2)).unwrap();
    assert_eq!(counter.total(), 1);
}

#[test]
fn events_describe_themselves() {
    let event = PassageEvent::new(EventKind::Added, Some(v(Gen, 1, 1)), None);
    assert_eq!(event.to_string(), "Added Gen 1:1..*");
}
