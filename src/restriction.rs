use serde::Deserialize;

use crate::range::VerseRange;
use crate::verse::Verse;

// ------------- RestrictionType -------------
/// Limits how far blurring and range splitting may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictionType {
    /// Anything within the versification.
    #[default]
    None,
    /// Nothing crosses a chapter boundary.
    Chapter,
}

impl RestrictionType {
    pub fn from_name(name: &str) -> Option<RestrictionType> {
        match name.trim().to_lowercase().as_str() {
            "none" => Some(RestrictionType::None),
            "chapter" => Some(RestrictionType::Chapter),
            _ => None,
        }
    }

    /// Whether two verses may share a range under this restriction.
    pub fn is_same_scope(self, a: &Verse, b: &Verse) -> bool {
        match self {
            RestrictionType::None => true,
            RestrictionType::Chapter => a.is_same_chapter(b),
        }
    }

    /// Widens a range by `down` verses before and `up` verses after it.
    pub fn blur(self, range: &VerseRange, down: u32, up: u32) -> VerseRange {
        let v11n = range.versification();
        match self {
            RestrictionType::None => {
                let start = range.start().ordinal() as i64 - down as i64;
                let end = range.end().ordinal() as i64 + up as i64;
                VerseRange::from_ordinals(v11n, v11n.clamp(start), v11n.clamp(end))
            }
            RestrictionType::Chapter => {
                let start = range.start();
                let end = range.end();
                let first = start.verse().saturating_sub(down.min(u16::MAX as u32) as u16).max(1);
                let last_verse = v11n.last_verse(end.book(), end.chapter()) as u32;
                let last = (end.verse() as u32).saturating_add(up).min(last_verse);
                let start_ordinal = start.ordinal() - (start.verse() - first) as u32;
                let end_ordinal = end.ordinal() + (last - end.verse() as u32);
                VerseRange::from_ordinals(v11n, start_ordinal, end_ordinal)
            }
        }
    }

    pub fn blur_verse(self, verse: &Verse, down: u32, up: u32) -> VerseRange {
        self.blur(&VerseRange::from(verse), down, up)
    }

    /// A range of up to `count` verses starting at `start`.
    pub fn to_range(self, start: &Verse, count: u32) -> VerseRange {
        let v11n = start.versification();
        let count = count.max(1);
        let mut end = v11n.clamp(start.ordinal() as i64 + count as i64 - 1);
        if self == RestrictionType::Chapter {
            let last_verse = v11n.last_verse(start.book(), start.chapter()) as u32;
            end = end.min(start.ordinal() + (last_verse - start.verse() as u32));
        }
        VerseRange::from_ordinals(v11n, start.ordinal(), end)
    }
}
