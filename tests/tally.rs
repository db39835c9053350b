use std::sync::Arc;

use passage::book::BibleBook::{self, *};
use passage::tally::MAX_TALLY;
use passage::{
    Key, Order, Passage, PassageError, PassageKind, PassageTally, RestrictionType, Verse, VerseRange,
    Versification,
};

fn v(book: BibleBook, chapter: u16, verse: u16) -> Verse {
    Verse::new(&Versification::kjv(), book, chapter, verse).unwrap()
}

fn p(text: &str) -> Passage {
    Passage::parse(PassageKind::Distinct, &Versification::kjv(), text).unwrap()
}

// Gen 1:1 three times, Gen 1:2, 1:3 and 1:5 once
fn sample() -> PassageTally {
    let mut tally = PassageTally::new(&Versification::kjv());
    tally.add(&p("Gen 1:1-3")).unwrap();
    tally.add(&p("Gen 1:1, 5")).unwrap();
    tally.add(&v(Gen, 1, 1)).unwrap();
    tally
}

#[test]
fn ranks_accumulate_per_verse() {
    let tally = sample();
    assert_eq!(tally.count_verses(), 4);
    assert_eq!(tally.tally_of(&v(Gen, 1, 1)), 3);
    assert_eq!(tally.tally_of(&v(Gen, 1, 2)), 1);
    assert_eq!(tally.tally_of(&v(Gen, 1, 4)), 0);
    assert_eq!(tally.total(), 6);
    assert_eq!(tally.max_rank(), 3);
    assert!(!tally.is_empty());
}

#[test]
fn biblical_order_names_ranges() {
    let tally = sample();
    assert_eq!(tally.order(), Order::Biblical);
    assert_eq!(tally.name(), "Gen 1:1-3, 5");
    assert_eq!(tally.to_string(), "Gen 1:1-3, 5");
    assert_eq!(tally.osis_ref(), "Gen.1.1-Gen.1.3 Gen.1.5");
    assert_eq!(tally.verse_at(3).unwrap(), v(Gen, 1, 5));
    assert_eq!(tally.name_limited(1), "Gen 1:1-3");
}

#[test]
fn tally_order_puts_the_best_first() {
    let mut tally = sample();
    tally.add(&v(Gen, 1, 5)).unwrap();
    tally.set_order(Order::Tally);
    assert_eq!(tally.name(), "Gen 1:1, 5, 2, 3");
    assert_eq!(tally.name_limited(2), "Gen 1:1, 5");
    assert_eq!(tally.verse_at(1).unwrap(), v(Gen, 1, 5));
    assert_eq!(tally.index_of(&v(Gen, 1, 3)), Some(3));
    assert_eq!(tally.index_of(&v(Gen, 1, 4)), None);
    assert_eq!(tally.ranked()[0], (v(Gen, 1, 1), 3));
    assert_eq!(tally.ranked()[1], (v(Gen, 1, 5), 2));
    assert_eq!(
        tally.ordered_ranges(),
        vec![
            VerseRange::new(&v(Gen, 1, 1), &v(Gen, 1, 3)).unwrap(),
            VerseRange::from(v(Gen, 1, 5)),
        ]
    );
}

#[test]
fn name_and_tally_shows_shares_of_the_maximum() {
    let tally = sample();
    assert_eq!(
        tally.name_and_tally(0),
        "Gen 1:1 (100%), Gen 1:2 (33%), Gen 1:3 (33%), Gen 1:5 (33%)"
    );
    assert_eq!(tally.name_and_tally(1), "Gen 1:1 (100%)");
    assert_eq!(PassageTally::new(&Versification::kjv()).name_and_tally(0), "");
}

#[test]
fn removing_lowers_or_drops_ranks() {
    let mut tally = sample();
    tally.un_add(&v(Gen, 1, 2)).unwrap();
    assert_eq!(tally.tally_of(&v(Gen, 1, 2)), 0);
    assert_eq!(tally.count_verses(), 3);
    assert_eq!(tally.max_rank(), 3, "the maximum only moves up");

    tally.un_add(&v(Gen, 1, 1)).unwrap();
    assert_eq!(tally.tally_of(&v(Gen, 1, 1)), 2);

    tally.remove(&v(Gen, 1, 1)).unwrap();
    assert_eq!(tally.tally_of(&v(Gen, 1, 1)), 0);
    assert_eq!(tally.name(), "Gen 1:3, 5");

    tally.un_add(&v(Gen, 1, 4)).unwrap();
    assert_eq!(tally.tally_of(&v(Gen, 1, 4)), 0, "ranks never go below zero");

    tally.clear();
    assert!(tally.is_empty());
    assert_eq!(tally.max_rank(), 0);
}

#[test]
fn tallies_combine_rank_for_rank() {
    let tally = sample();
    let mut other = PassageTally::new(&Versification::kjv());
    other.add_all(&tally).unwrap();
    assert_eq!(other, tally);
    assert_eq!(other.max_rank(), 3);

    other.add_all(&tally).unwrap();
    assert_eq!(other.tally_of(&v(Gen, 1, 1)), 6);
    assert_eq!(other.max_rank(), 6);

    other.un_add_all(&tally).unwrap();
    assert_eq!(other.tally_of(&v(Gen, 1, 1)), 3);

    let mut plain = PassageTally::new(&Versification::kjv());
    plain.add_all(&p("Gen 1:1-2")).unwrap();
    assert_eq!(plain.tally_of(&v(Gen, 1, 2)), 1);
    assert_eq!(plain.max_rank(), 1);
}

#[test]
fn retain_keeps_ranks_inside_the_key() {
    let mut tally = sample();
    tally.retain_all(&p("Gen 1:2-5")).unwrap();
    assert_eq!(tally.name(), "Gen 1:2-3, 5");
    assert_eq!(tally.tally_of(&v(Gen, 1, 2)), 1);
    assert_eq!(tally.tally_of(&v(Gen, 1, 1)), 0);
    assert_eq!(tally.count_verses(), 3);
}

#[test]
fn blur_spreads_with_falloff() {
    let mut tally = PassageTally::new(&Versification::kjv());
    tally.add(&v(Gen, 1, 3)).unwrap();
    tally.blur(2, RestrictionType::None);
    let ranks: Vec<u32> = (1..=5).map(|n| tally.tally_of(&v(Gen, 1, n))).collect();
    assert_eq!(ranks, vec![1, 2, 3, 2, 1]);
    assert_eq!(tally.max_rank(), 3);
    assert_eq!(tally.count_verses(), 5);

    let mut edge = PassageTally::new(&Versification::kjv());
    edge.add(&v(Gen, 1, 31)).unwrap();
    edge.blur(2, RestrictionType::Chapter);
    assert_eq!(edge.name(), "Gen 1:29-31");
    assert_eq!(edge.tally_of(&v(Gen, 2, 1)), 0);

    let mut open = PassageTally::new(&Versification::kjv());
    open.add(&v(Gen, 1, 31)).unwrap();
    open.blur(1, RestrictionType::None);
    assert_eq!(open.tally_of(&v(Gen, 2, 1)), 1);
}

#[test]
fn blurring_by_the_largest_width_caps_ranks() {
    let mut chapter = PassageTally::new(&Versification::kjv());
    chapter.add_count(&v(Gen, 1, 5), 2).unwrap();
    chapter.blur(u32::MAX, RestrictionType::Chapter);
    assert_eq!(chapter.name(), "Gen 1");
    assert_eq!(chapter.tally_of(&v(Gen, 1, 31)), MAX_TALLY);
    assert_eq!(chapter.tally_of(&v(Gen, 2, 1)), 0);
    assert_eq!(chapter.max_rank(), MAX_TALLY);

    let mut everything = PassageTally::new(&Versification::kjv());
    everything.add_count(&v(Gen, 1, 5), 2).unwrap();
    everything.blur(u32::MAX, RestrictionType::None);
    assert_eq!(everything.count_verses(), 31102);
    assert_eq!(everything.tally_of(&v(Rev, 22, 21)), MAX_TALLY);
}

#[test]
fn flatten_levels_every_rank() {
    let mut tally = sample();
    tally.flatten();
    assert_eq!(tally.tally_of(&v(Gen, 1, 1)), 1);
    assert_eq!(tally.max_rank(), 1);
    assert_eq!(tally.total(), 4);
}

#[test]
fn trimming_follows_the_current_order() {
    let mut tally = sample();
    tally.set_order(Order::Tally);
    let rest = tally.trim_verses(1).unwrap();
    assert_eq!(tally.name(), "Gen 1:1");
    assert_eq!(rest.count_verses(), 3);
    assert_eq!(rest.max_rank(), 1);
    assert_eq!(rest.order(), Order::Tally);
    assert!(tally.trim_verses(1).is_none());

    let mut ranges = sample();
    let rest = ranges.trim_ranges(1, RestrictionType::None).unwrap();
    assert_eq!(ranges.name(), "Gen 1:1-3");
    assert_eq!(rest.name(), "Gen 1:5");
}

#[test]
fn ranks_are_capped() {
    let mut tally = PassageTally::new(&Versification::kjv());
    tally.add_count(&v(Gen, 1, 1), 30_000).unwrap();
    assert_eq!(tally.tally_of(&v(Gen, 1, 1)), MAX_TALLY);
    assert_eq!(tally.max_rank(), MAX_TALLY);
}

#[test]
fn a_tally_is_a_key() {
    let tally = sample();
    assert_eq!(Key::cardinality(&tally), 4);
    assert!(Key::contains(&tally, &p("Gen 1:1-3")));
    assert!(!Key::contains(&tally, &p("Gen 1:4")));
    assert_eq!(tally.to_passage(PassageKind::Bitwise).unwrap().name(), "Gen 1:1-3, 5");

    let tiny = Arc::new(Versification::new("Tiny", vec![(Gen, vec![3])]).unwrap());
    let mut other = sample();
    assert!(matches!(
        other.add(&Verse::new(&tiny, Gen, 1, 1).unwrap()),
        Err(PassageError::MismatchedVersification { .. })
    ));
    assert!(other.add_all(&PassageTally::new(&tiny)).is_err());
}
