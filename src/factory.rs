use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::Result;
use crate::passage::{Passage, PassageKind};
use crate::tally::PassageTally;
use crate::versification::{Versification, Versifications};
use crate::wrapper::{ReadOnlyPassage, SynchronizedPassage};

lazy_static! {
    // two numbers (or end markers) with only whitespace between them
    static ref NUMBER_GAP: Regex = Regex::new(r"(\d+|\$|\bff\b)\s+(\d+|\$|\bff\b)").unwrap();
}

/// Puts a list delimiter between numbers that are only separated by
/// whitespace, so "Ge 1:26  3:22  31:7, 53" reads as "Ge 1:26, 3:22, 31:7, 53".
pub fn normalize(text: &str) -> String {
    let mut normalized = text.to_string();
    while NUMBER_GAP.is_match(&normalized) {
        normalized = NUMBER_GAP.replace_all(&normalized, "$1, $2").into_owned();
    }
    normalized
}

/// Reads OSIS style lists such as "Gen.1.1 Gen.1.3" by treating every space
/// as a list delimiter.
pub fn mung_osis_ref(text: &str) -> String {
    text.replace(' ', ";")
}

// ------------- PassageKeyFactory -------------
/// Makes passages the way the settings ask for: the store kind, the
/// versification and whether parsed passages keep their original name.
#[derive(Debug, Clone)]
pub struct PassageKeyFactory {
    settings: Settings,
    versifications: Versifications,
}

impl PassageKeyFactory {
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_versifications(settings, Versifications::new())
    }
    pub fn with_versifications(settings: &Settings, mut versifications: Versifications) -> Result<Self> {
        versifications.set_default(&settings.default_versification)?;
        Ok(Self {
            settings: settings.clone(),
            versifications,
        })
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    pub fn versifications(&self) -> &Versifications {
        &self.versifications
    }
    pub fn default_versification(&self) -> Arc<Versification> {
        self.versifications.default_versification()
    }
    pub fn kind(&self) -> PassageKind {
        self.settings.default_kind
    }

    pub fn create_empty(&self) -> Passage {
        Passage::new(self.kind(), &self.default_versification())
    }
    pub fn create_tally(&self) -> PassageTally {
        PassageTally::new(&self.default_versification())
    }
    pub fn whole_bible(&self) -> Passage {
        Passage::whole(self.kind(), &self.default_versification())
    }

    /// Parses `text` in the default versification.
    pub fn get_key(&self, text: &str) -> Result<Passage> {
        self.get_key_in(&self.default_versification(), text)
    }
    /// Parses `text`, retrying with whitespace separated numbers split into
    /// a list and then with spaces read as delimiters. The first error is
    /// the one reported when every attempt fails.
    pub fn get_key_in(&self, v11n: &Arc<Versification>, text: &str) -> Result<Passage> {
        let kind = self.kind();
        let first = match Passage::parse(kind, v11n, text) {
            Ok(passage) => return Ok(self.named(passage, text)),
            Err(e) if e.is_parse_error() => e,
            Err(e) => return Err(e),
        };
        let normalized = normalize(text);
        if normalized != text {
            debug!(text, normalized = %normalized, error = %first, "retrying normalized reference");
            if let Ok(passage) = Passage::parse(kind, v11n, &normalized) {
                return Ok(self.named(passage, text));
            }
        }
        let munged = mung_osis_ref(text);
        if munged != text {
            debug!(text, munged = %munged, "retrying reference as an OSIS list");
            if let Ok(passage) = Passage::parse(kind, v11n, &munged) {
                return Ok(self.named(passage, text));
            }
        }
        Err(first)
    }
    /// Like [`get_key`](Self::get_key) but gives an empty passage for text
    /// that cannot be read.
    pub fn get_valid_key(&self, text: &str) -> Passage {
        match self.get_key(text) {
            Ok(passage) => passage,
            Err(e) => {
                warn!(error = %e, text, "unreadable reference, using an empty passage");
                self.create_empty()
            }
        }
    }
    fn named(&self, mut passage: Passage, text: &str) -> Passage {
        if self.settings.persistent_naming {
            passage.set_original_name(text.trim());
        }
        passage
    }

    /// Wraps a passage against writes; `ignore` picks between dropping them
    /// quietly and failing with `ReadOnly`.
    pub fn read_only(&self, passage: Passage, ignore: bool) -> ReadOnlyPassage {
        ReadOnlyPassage::new(passage, ignore)
    }
    pub fn synchronized(&self, passage: Passage) -> SynchronizedPassage {
        SynchronizedPassage::new(passage)
    }
}
