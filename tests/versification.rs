use std::sync::Arc;

use passage::{BibleBook, PassageError, Versification, Versifications};

fn tiny() -> Arc<Versification> {
    Arc::new(
        Versification::new(
            "Tiny",
            vec![(BibleBook::Gen, vec![3, 2]), (BibleBook::Exod, vec![4])],
        )
        .unwrap(),
    )
}

#[test]
fn kjv_layout_matches_known_counts() {
    let kjv = Versification::kjv();
    assert_eq!(kjv.name(), "KJV");
    assert_eq!(kjv.max_ordinal(), 31102);
    assert_eq!(kjv.book_count(), 66);
    assert_eq!(kjv.last_chapter(BibleBook::Gen), 50);
    assert_eq!(kjv.last_chapter(BibleBook::Jude), 1);
    assert_eq!(kjv.last_verse(BibleBook::Gen, 1), 31);
    assert_eq!(kjv.last_verse(BibleBook::Ps, 119), 176);
    assert_eq!(kjv.last_verse(BibleBook::Gen, 51), 0, "missing chapters have no verses");
}

#[test]
fn ordinals_are_dense_from_one() {
    let kjv = Versification::kjv();
    assert_eq!(kjv.ordinal(BibleBook::Gen, 1, 1).unwrap(), 1);
    assert_eq!(kjv.ordinal(BibleBook::Gen, 2, 1).unwrap(), 32);
    assert_eq!(kjv.ordinal(BibleBook::Exod, 1, 1).unwrap(), 1534);
    assert_eq!(kjv.ordinal(BibleBook::Matt, 1, 1).unwrap(), 23146);
    assert_eq!(kjv.ordinal(BibleBook::Rev, 22, 21).unwrap(), 31102);
    assert_eq!(kjv.decode(1534), Some((BibleBook::Exod, 1, 1)));
    assert_eq!(kjv.decode(23145), Some((BibleBook::Mal, 4, 6)));
    assert_eq!(kjv.decode(0), None);
    assert_eq!(kjv.decode(31103), None);
}

#[test]
fn every_ordinal_decodes_and_encodes_back() {
    let kjv = Versification::kjv();
    for ordinal in 1..=kjv.max_ordinal() {
        let (book, chapter, verse) = kjv.decode(ordinal).unwrap();
        assert_eq!(kjv.ordinal(book, chapter, verse).unwrap(), ordinal);
    }
}

#[test]
fn validate_names_the_bound_that_failed() {
    let kjv = Versification::kjv();
    assert!(kjv.validate(BibleBook::Gen, 1, 31).is_ok());
    match kjv.validate(BibleBook::Gen, 1, 32) {
        Err(PassageError::NoSuchVerse { message }) => assert!(message.contains("31"), "{}", message),
        other => panic!("expected NoSuchVerse, got {:?}", other),
    }
    match kjv.validate(BibleBook::Gen, 51, 1) {
        Err(PassageError::NoSuchVerse { message }) => assert!(message.contains("50"), "{}", message),
        other => panic!("expected NoSuchVerse, got {:?}", other),
    }
    assert!(kjv.validate(BibleBook::Gen, 0, 1).is_err());
}

#[test]
fn book_names_are_found_leniently() {
    let kjv = Versification::kjv();
    assert_eq!(kjv.book("Gen"), Some(BibleBook::Gen));
    assert_eq!(kjv.book("genesis"), Some(BibleBook::Gen));
    assert_eq!(kjv.book("GE"), Some(BibleBook::Gen));
    assert_eq!(kjv.book("1 Cor"), Some(BibleBook::Cor1));
    assert_eq!(kjv.book("1cor"), Some(BibleBook::Cor1));
    assert_eq!(kjv.book("Revelation"), Some(BibleBook::Rev));
    assert_eq!(kjv.book("Song of Songs"), Some(BibleBook::Song));
    assert_eq!(kjv.book("Deu"), Some(BibleBook::Deut), "prefix of the OSIS id");
    assert_eq!(kjv.book("1"), None, "a name needs a letter");
    assert_eq!(kjv.book("Xyz"), None);
    assert!(kjv.is_book_name("Jude"));
}

#[test]
fn patch_rolls_overflow_forward() {
    let kjv = Versification::kjv();
    assert_eq!(kjv.patch(BibleBook::Gen, 1, 32), 32, "Gen 1:32 is Gen 2:1");
    assert_eq!(kjv.patch(BibleBook::Gen, 51, 1), 1534, "Gen 51:1 is Exod 1:1");
    assert_eq!(kjv.patch(BibleBook::Gen, 0, 0), 1);
    assert_eq!(kjv.patch(BibleBook::Rev, 22, 22), kjv.max_ordinal());
}

#[test]
fn custom_layouts_are_validated() {
    let v11n = tiny();
    assert_eq!(v11n.max_ordinal(), 9);
    assert_eq!(v11n.ordinal(BibleBook::Exod, 1, 1).unwrap(), 6);
    assert!(v11n.contains_book(BibleBook::Exod));
    assert!(!v11n.contains_book(BibleBook::Lev));
    assert_eq!(v11n.book("Lev"), None);
    assert_eq!(v11n.books().collect::<Vec<_>>(), vec![BibleBook::Gen, BibleBook::Exod]);

    assert!(matches!(Versification::new("Empty", vec![]), Err(PassageError::InvalidLayout(_))));
    assert!(matches!(
        Versification::new("Twice", vec![(BibleBook::Gen, vec![1]), (BibleBook::Gen, vec![1])]),
        Err(PassageError::InvalidLayout(_))
    ));
    assert!(matches!(
        Versification::new("Hollow", vec![(BibleBook::Gen, vec![3, 0])]),
        Err(PassageError::InvalidLayout(_))
    ));
}

#[test]
fn registry_finds_versifications_by_name() {
    let mut registry = Versifications::new();
    assert_eq!(registry.get("kjv").unwrap().name(), "KJV");
    assert!(matches!(registry.get("NRSV"), Err(PassageError::UnknownVersification(_))));

    registry.register(tiny());
    registry.set_default("tiny").unwrap();
    assert_eq!(registry.default_versification().name(), "Tiny");
    assert_eq!(registry.names(), vec!["KJV".to_string(), "Tiny".to_string()]);
    assert!(registry.set_default("NRSV").is_err());
    assert_eq!(registry.default_versification().name(), "Tiny");
}
