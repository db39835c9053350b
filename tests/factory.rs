use std::fs;
use std::sync::Arc;
use std::thread;

use passage::book::BibleBook::{self, *};
use passage::factory::{mung_osis_ref, normalize};
use passage::wrapper::Synchronized;
use passage::{
    Key, PassageError, PassageKeyFactory, PassageKind, RestrictionType, Settings, Verse, Versification,
};

fn v(book: BibleBook, chapter: u16, verse: u16) -> Verse {
    Verse::new(&Versification::kjv(), book, chapter, verse).unwrap()
}

fn factory() -> PassageKeyFactory {
    PassageKeyFactory::new(&Settings::default()).unwrap()
}

#[test]
fn default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.default_kind, PassageKind::Rocket);
    assert_eq!(settings.default_versification, "KJV");
    assert_eq!(settings.blur_restriction, RestrictionType::Chapter);
    assert!(!settings.persistent_naming);
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn settings_are_read_from_a_file() {
    let path = std::env::temp_dir().join(format!("passage-settings-{}.toml", std::process::id()));
    fs::write(
        &path,
        "default_kind = \"bitwise\"\ndefault_versification = \"kjv\"\npersistent_naming = true\n",
    )
    .unwrap();
    let settings = Settings::load_from(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(settings.default_kind, PassageKind::Bitwise);
    assert!(settings.persistent_naming);
    assert_eq!(settings.blur_restriction, RestrictionType::Chapter, "missing keys keep their default");

    let factory = PassageKeyFactory::new(&settings).unwrap();
    assert_eq!(factory.kind(), PassageKind::Bitwise);
    assert_eq!(factory.default_versification().name(), "KJV");
    assert_eq!(factory.create_empty().kind(), PassageKind::Bitwise);

    let missing = std::env::temp_dir().join("passage-settings-that-do-not-exist.toml");
    assert!(matches!(Settings::load_from(&missing), Err(PassageError::Config(_))));
}

#[test]
fn unknown_versifications_are_refused() {
    let settings = Settings {
        default_versification: "NRSV".to_string(),
        ..Settings::default()
    };
    assert!(matches!(
        PassageKeyFactory::new(&settings),
        Err(PassageError::UnknownVersification(_))
    ));
}

#[test]
fn loose_text_is_normalized() {
    assert_eq!(normalize("Ge 1:26  3:22  31:7, 53"), "Ge 1:26, 3:22, 31:7, 53");
    assert_eq!(normalize("Gen 1:1 2 3"), "Gen 1:1, 2, 3");
    assert_eq!(normalize("Gen 1:1-5"), "Gen 1:1-5");
    assert_eq!(mung_osis_ref("Gen.1.1 Gen.1.3"), "Gen.1.1;Gen.1.3");
}

#[test]
fn get_key_retries_before_failing() {
    let factory = factory();
    assert_eq!(factory.get_key("Gen 1:1-3, 5").unwrap().name(), "Gen 1:1-3, 5");
    assert_eq!(factory.get_key("Ge 1:26  3:22").unwrap().name(), "Gen 1:26, 3:22");
    assert_eq!(factory.get_key("Gen.1.1 Gen.1.3").unwrap().name(), "Gen 1:1, 3");
    assert_eq!(factory.get_key("Gen 1:1").unwrap().kind(), PassageKind::Rocket);

    let error = factory.get_key("Xyz").unwrap_err();
    assert!(matches!(error, PassageError::NotANumber { .. }), "{}", error);

    assert!(factory.get_valid_key("Xyz").is_empty());
    assert_eq!(factory.get_valid_key("Jude 3").name(), "Jude 3");
}

#[test]
fn factory_builds_empty_whole_and_tally_keys() {
    let factory = factory();
    assert!(factory.create_empty().is_empty());
    assert_eq!(factory.whole_bible().count_verses(), 31102);
    assert!(factory.create_tally().is_empty());
    assert_eq!(factory.versifications().names(), vec!["KJV".to_string()]);
    assert_eq!(factory.settings(), &Settings::default());
}

#[test]
fn persistent_naming_keeps_the_text_until_a_change() {
    let settings = Settings {
        persistent_naming: true,
        ..Settings::default()
    };
    let factory = PassageKeyFactory::new(&settings).unwrap();
    let mut p = factory.get_key(" gen 1:1-3 ").unwrap();
    assert_eq!(p.name(), "gen 1:1-3");
    assert_eq!(p.osis_ref(), "Gen.1.1-Gen.1.3");
    p.add(v(Gen, 1, 4)).unwrap();
    assert_eq!(p.name(), "Gen 1:1-4");
}

#[test]
fn read_only_wrappers_refuse_or_ignore_writes() {
    let factory = factory();
    let other = factory.get_key("Exod 1:1").unwrap();

    let mut strict = factory.read_only(factory.get_key("Gen 1:1-3").unwrap(), false);
    assert!(!strict.ignores_writes());
    assert!(matches!(strict.add_all(&other), Err(PassageError::ReadOnly)));
    assert!(matches!(Key::clear(&mut strict), Err(PassageError::ReadOnly)));
    assert!(matches!(Key::blur(&mut strict, 1, RestrictionType::None), Err(PassageError::ReadOnly)));
    assert_eq!(strict.name(), "Gen 1:1-3");
    assert_eq!(strict.to_string(), "Gen 1:1-3");

    let mut quiet = factory.read_only(factory.get_key("Gen 1:1-3").unwrap(), true);
    quiet.add_all(&other).unwrap();
    quiet.retain_all(&other).unwrap();
    assert_eq!(quiet.cardinality(), 3);
    assert_eq!(quiet.inner().name(), "Gen 1:1-3");
    assert_eq!(quiet.get(2), Some(v(Gen, 1, 3)));
    assert!(quiet.as_passage().is_some());

    let mut target = factory.create_empty();
    target.add_all(&quiet).unwrap();
    assert_eq!(target.name(), "Gen 1:1-3");
}

#[test]
fn synchronized_passages_are_shared_between_threads() {
    let factory = factory();
    let shared = Arc::new(factory.synchronized(factory.create_empty()));
    let handles: Vec<_> = (1..=4u16)
        .map(|chapter| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for verse in 1..=10 {
                    let verse = v(Gen, chapter, verse);
                    shared.write(|p| p.add(verse)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(shared.read(|p| p.count_verses()).unwrap(), 40);
    assert_eq!(shared.name(), "Gen 1:1-10, 2:1-10, 3:1-10, 4:1-10");
    assert!(Key::contains(&*shared, &*shared));

    let shared = Arc::try_unwrap(shared).ok().unwrap();
    assert_eq!(shared.into_inner().unwrap().count_verses(), 40);
}

#[test]
fn synchronized_keys_forward_writes() {
    let mut shared = Synchronized::new(factory().get_key("Gen 1:1-5").unwrap());
    shared.remove_all(&v(Gen, 1, 3)).unwrap();
    assert_eq!(shared.to_string(), "Gen 1:1-2, 4-5");
    Key::blur(&mut shared, 1, RestrictionType::Chapter).unwrap();
    assert_eq!(shared.name(), "Gen 1:1-6");
    assert_eq!(shared.lock().unwrap().count_verses(), 6);
}
