//! Property tests over random passages.
//!
//! Passages are built from random (start ordinal, extra verses) pairs, so
//! they cover scattered verses, long runs and runs crossing chapter and
//! book boundaries.

use std::collections::BTreeSet;

use proptest::prelude::*;

use passage::codec::{from_binary, to_binary};
use passage::{Passage, PassageKind, RestrictionType, Verse, VerseRange, Versification};

const MAX: u32 = 31_102;

const KINDS: [PassageKind; 4] = [
    PassageKind::Distinct,
    PassageKind::Ranged,
    PassageKind::Bitwise,
    PassageKind::Rocket,
];

fn range(start: u32, extra: u32) -> VerseRange {
    let v11n = Versification::kjv();
    let first = Verse::from_ordinal(&v11n, start).unwrap();
    let last = Verse::from_ordinal(&v11n, (start + extra).min(MAX)).unwrap();
    VerseRange::new(&first, &last).unwrap()
}

fn build(kind: PassageKind, spans: &[(u32, u32)]) -> Passage {
    let mut passage = Passage::new(kind, &Versification::kjv());
    for &(start, extra) in spans {
        passage.add(range(start, extra)).unwrap();
    }
    passage
}

fn ordinals(spans: &[(u32, u32)]) -> BTreeSet<u32> {
    spans
        .iter()
        .flat_map(|&(start, extra)| start..=(start + extra).min(MAX))
        .collect()
}

fn spans() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((1u32..=MAX, 0u32..60), 0..25)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ordinals_decode_and_name_back(ordinal in 1u32..=MAX) {
        let v11n = Versification::kjv();
        let verse = Verse::from_ordinal(&v11n, ordinal).unwrap();
        prop_assert_eq!(verse.ordinal(), ordinal);
        let parsed = Passage::parse(PassageKind::Distinct, &v11n, &verse.name()).unwrap();
        prop_assert_eq!(parsed.first_verse(), Some(verse));
    }

    #[test]
    fn stores_hold_exactly_the_verses_added(spans in spans()) {
        let expected: Vec<u32> = ordinals(&spans).into_iter().collect();
        for kind in KINDS {
            let passage = build(kind, &spans);
            let actual: Vec<u32> = passage.iter().map(|v| v.ordinal()).collect();
            prop_assert_eq!(&actual, &expected);
            prop_assert_eq!(passage.count_verses(), expected.len());
        }
    }

    #[test]
    fn ranges_are_canonical(spans in spans()) {
        let reference = build(PassageKind::Distinct, &spans);
        let ranges = reference.ranges(RestrictionType::None);
        for pair in ranges.windows(2) {
            prop_assert!(pair[0].end().ordinal() + 1 < pair[1].start().ordinal());
            prop_assert!(!pair[0].adjacent_to(&pair[1]));
        }
        for range in reference.ranges(RestrictionType::Chapter) {
            prop_assert!(range.start().is_same_chapter(range.end()));
        }
        for kind in KINDS {
            let passage = build(kind, &spans);
            prop_assert_eq!(passage.ranges(RestrictionType::None), ranges.clone());
            prop_assert_eq!(passage.name(), reference.name());
        }
    }

    #[test]
    fn names_parse_back_to_the_same_passage(spans in spans()) {
        let passage = build(PassageKind::Ranged, &spans);
        let parsed = Passage::parse(PassageKind::Distinct, &Versification::kjv(), &passage.name()).unwrap();
        prop_assert_eq!(parsed, passage);
    }

    #[test]
    fn binary_form_round_trips(spans in spans()) {
        let v11n = Versification::kjv();
        let passage = build(PassageKind::Bitwise, &spans);
        let bytes = to_binary(&passage);
        for kind in KINDS {
            prop_assert_eq!(&from_binary(&bytes, &v11n, kind).unwrap(), &passage);
        }
    }

    #[test]
    fn set_algebra_matches_sets(a in spans(), b in spans(), mine in 0usize..4, theirs in 0usize..4) {
        let (left, right) = (ordinals(&a), ordinals(&b));
        let other = build(KINDS[theirs], &b);

        let mut union = build(KINDS[mine], &a);
        union.add_all(&other).unwrap();
        let expected: Vec<u32> = left.union(&right).copied().collect();
        prop_assert_eq!(union.iter().map(|v| v.ordinal()).collect::<Vec<_>>(), expected);

        let mut intersection = build(KINDS[mine], &a);
        intersection.retain_all(&other).unwrap();
        let expected: Vec<u32> = left.intersection(&right).copied().collect();
        prop_assert_eq!(intersection.iter().map(|v| v.ordinal()).collect::<Vec<_>>(), expected);

        let mut difference = build(KINDS[mine], &a);
        difference.remove_all(&other).unwrap();
        let expected: Vec<u32> = left.difference(&right).copied().collect();
        prop_assert_eq!(difference.iter().map(|v| v.ordinal()).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn adjacency_is_symmetric(a in (1u32..=MAX, 0u32..60), b in (1u32..=MAX, 0u32..60)) {
        let (x, y) = (range(a.0, a.1), range(b.0, b.1));
        prop_assert_eq!(x.adjacent_to(&y), y.adjacent_to(&x));
        prop_assert_eq!(x.overlaps(&y), y.overlaps(&x));
        prop_assert_eq!(x.overlaps(&y), VerseRange::intersection(&x, &y).is_some());
    }
}
