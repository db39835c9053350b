use passage::accuracy::{parse_range, parse_verse, AccuracyType};
use passage::book::BibleBook::{self, *};
use passage::tokenizer::tokenize;
use passage::{PassageError, Verse, VerseRange, Versification};

fn v(book: BibleBook, chapter: u16, verse: u16) -> Verse {
    Verse::new(&Versification::kjv(), book, chapter, verse).unwrap()
}

fn range(text: &str) -> VerseRange {
    parse_range(&Versification::kjv(), text, None).unwrap()
}

fn accuracy(text: &str) -> AccuracyType {
    let parts = tokenize(text).unwrap();
    AccuracyType::from_text(&Versification::kjv(), text, &parts, None, None).unwrap()
}

#[test]
fn tokenizer_splits_books_numbers_and_markers() {
    assert_eq!(tokenize("Gen 1:1").unwrap(), vec!["Gen", "1", "1"]);
    assert_eq!(tokenize("Gen.1.1").unwrap(), vec!["Gen", "1", "1"]);
    assert_eq!(tokenize("1 Cor 13:4").unwrap(), vec!["1 Cor", "13", "4"]);
    assert_eq!(tokenize("Song of Songs 2").unwrap(), vec!["Song of Songs", "2"]);
    assert_eq!(tokenize("Gen 1ff").unwrap(), vec!["Gen", "1", "ff"]);
    assert_eq!(tokenize("Gen 3:$").unwrap(), vec!["Gen", "3", "$"]);
    assert_eq!(tokenize("Gen 1:1!a").unwrap(), vec!["Gen", "1", "1", "!a"]);
    assert_eq!(tokenize("Gen1").unwrap(), vec!["Gen", "1"]);
}

#[test]
fn tokenizer_limits_the_number_of_parts() {
    assert!(tokenize("1 2 3 4 5 6 7 8").is_ok());
    assert!(matches!(
        tokenize("1 2 3 4 5 6 7 8 9"),
        Err(PassageError::TooManyParts { .. })
    ));
}

#[test]
fn accuracy_is_read_from_the_parts() {
    assert_eq!(accuracy("Gen 1:1"), AccuracyType::BookVerse);
    assert_eq!(accuracy("Jude 5"), AccuracyType::BookVerse);
    assert_eq!(accuracy("Gen 1"), AccuracyType::BookChapter);
    assert_eq!(accuracy("Gen"), AccuracyType::BookOnly);
    assert_eq!(AccuracyType::BookVerse.to_string(), "BOOK_VERSE");
    assert!(AccuracyType::VerseOnly.is_verse());
    assert!(AccuracyType::ChapterOnly.is_chapter());
    assert!(AccuracyType::BookOnly.is_book());
}

#[test]
fn single_references_cover_what_they_name() {
    assert_eq!(range("Gen 1:1"), VerseRange::from(v(Gen, 1, 1)));
    let chapter = range("Gen 1");
    assert_eq!(chapter.start(), &v(Gen, 1, 1));
    assert_eq!(chapter.end(), &v(Gen, 1, 31));
    let book = range("Gen");
    assert_eq!(book.end(), &v(Gen, 50, 26));
    assert_eq!(range("Jude 5"), VerseRange::from(v(Jude, 1, 5)));
    assert_eq!(range("Rev 22:$"), VerseRange::from(v(Rev, 22, 21)));
}

#[test]
fn range_ends_complete_from_the_start() {
    assert_eq!(range("Gen 1:2-10"), VerseRange::new(&v(Gen, 1, 2), &v(Gen, 1, 10)).unwrap());
    assert_eq!(range("Gen 1:1-2:3"), VerseRange::new(&v(Gen, 1, 1), &v(Gen, 2, 3)).unwrap());
    assert_eq!(range("Gen 1-3").name(), "Gen 1-3");
    assert_eq!(range("Gen-3").name(), "Gen 1-3", "a bare number after a book is a chapter");
    assert_eq!(range("Gen 1-Exod 2").name(), "Gen 1-Exod 2");
    assert_eq!(range("Gen 1:5-ff"), VerseRange::new(&v(Gen, 1, 5), &v(Gen, 1, 31)).unwrap());
    assert_eq!(range("Gen-Exod").name(), "Gen-Exod");
}

#[test]
fn osis_ref_parses_back_to_the_same_range() {
    let original = range("Gen 1:2-10");
    assert_eq!(original.osis_ref(), "Gen.1.2-Gen.1.10");
    assert_eq!(range(&original.osis_ref()), original);
    for text in ["Gen 1", "Gen 1-3", "Gen", "1 Cor 13:4-7", "Gen 50:1-Exod 1:3"] {
        let parsed = range(text);
        assert_eq!(range(&parsed.osis_ref()), parsed, "{}", text);
        assert_eq!(range(&parsed.name()), parsed, "{}", text);
    }
}

#[test]
fn basis_fills_in_partial_references() {
    let kjv = Versification::kjv();
    let gen2 = range("Gen 2");
    let ten = parse_range(&kjv, "10", Some(&gen2)).unwrap();
    assert_eq!(ten.name(), "Gen 10", "a number after a chapter is a chapter");

    let verse = range("Gen 1:1");
    assert_eq!(parse_range(&kjv, "5", Some(&verse)).unwrap(), VerseRange::from(v(Gen, 1, 5)));
    assert_eq!(parse_range(&kjv, "3:4", Some(&verse)).unwrap(), VerseRange::from(v(Gen, 3, 4)));
}

#[test]
fn sub_identifiers_are_kept_on_verses() {
    let kjv = Versification::kjv();
    let verse = parse_verse(&kjv, "Gen 1:1!a", None).unwrap();
    assert_eq!(verse.sub_identifier(), Some("a"));
    assert_eq!(verse.osis_ref(), "Gen.1.1!a");
    assert_eq!(verse.whole(), v(Gen, 1, 1));
}

#[test]
fn bad_text_gives_parse_errors() {
    let kjv = Versification::kjv();
    assert!(matches!(parse_range(&kjv, "1:1", None), Err(PassageError::MissingBook { .. })));
    assert!(matches!(parse_range(&kjv, "5", None), Err(PassageError::MissingBookOrChapter { .. })));
    assert!(matches!(parse_range(&kjv, "Gen 1:1-2-3", None), Err(PassageError::TooManyParts { .. })));
    assert!(matches!(parse_range(&kjv, "Xyz 1:1", None), Err(PassageError::UnknownBook { .. })));
    assert!(matches!(parse_range(&kjv, "Gen 51", None), Err(PassageError::NoSuchVerse { .. })));
    assert!(matches!(parse_range(&kjv, "Gen 1:99999", None), Err(PassageError::NotANumber { .. })));
    for text in ["1:1", "Gen 1:1-2-3", "Xyz 1:1", "Gen 51", "Gen x"] {
        let error = parse_range(&kjv, text, None).unwrap_err();
        assert!(error.is_parse_error(), "{}: {}", text, error);
    }
}
