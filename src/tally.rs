use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

use crate::error::{PassageError, Result};
use crate::key::Key;
use crate::passage::{
    ranges_of, spans_of, EventKind, Listeners, Passage, PassageEvent, PassageKind, PassageListener, Span,
};
use crate::range::VerseRange;
use crate::restriction::RestrictionType;
use crate::verse::Verse;
use crate::versification::{same_versification, Ordinal, Versification};

/// The highest rank a single verse can reach.
pub const MAX_TALLY: u32 = 20_000;

// ------------- Order -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    /// Ordinal order, exactly like a passage.
    #[default]
    Biblical,
    /// Highest rank first, equal ranks in ordinal order.
    Tally,
}

// ------------- PassageTally -------------
/// A passage where every verse carries a rank, used to collect search hits
/// and list the best matches first.
///
/// `max_rank` is the sum of the counts added rather than the highest rank
/// on the board, so that a verse hit by every search reads as 100%. It is
/// recomputed from the board after `blur` and `flatten`.
#[derive(Clone)]
pub struct PassageTally {
    v11n: Arc<Versification>,
    board: Vec<u32>,
    size: usize,
    max: u32,
    order: Order,
    listeners: Listeners,
}

impl PassageTally {
    pub fn new(v11n: &Arc<Versification>) -> Self {
        Self {
            v11n: Arc::clone(v11n),
            board: vec![0; v11n.max_ordinal() as usize + 1],
            size: 0,
            max: 0,
            order: Order::default(),
            listeners: Listeners::default(),
        }
    }
    pub fn versification(&self) -> &Arc<Versification> {
        &self.v11n
    }
    pub fn order(&self) -> Order {
        self.order
    }
    pub fn set_order(&mut self, order: Order) {
        self.order = order;
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
    pub fn count_verses(&self) -> usize {
        self.size
    }
    /// The sum of all ranks.
    pub fn total(&self) -> u64 {
        self.board.iter().map(|r| *r as u64).sum()
    }
    pub fn max_rank(&self) -> u32 {
        self.max
    }
    pub fn tally_of(&self, verse: &Verse) -> u32 {
        if !same_versification(&self.v11n, verse.versification()) {
            return 0;
        }
        self.board[verse.ordinal() as usize]
    }
    /// The position of a verse in the current order.
    pub fn index_of(&self, verse: &Verse) -> Option<usize> {
        if self.tally_of(verse) == 0 {
            return None;
        }
        self.ordered().iter().position(|o| *o == verse.ordinal())
    }

    // ------------- iteration -------------
    // ranked ordinals in the current order; only the nonzero entries are sorted
    fn ordered(&self) -> Vec<Ordinal> {
        let mut ranked: Vec<Ordinal> = self.ordinals().collect();
        if self.order == Order::Tally {
            ranked.sort_by_key(|o| Reverse(self.board[*o as usize]));
        }
        ranked
    }
    fn ordinals(&self) -> impl Iterator<Item = Ordinal> + '_ {
        self.board
            .iter()
            .enumerate()
            .filter(|(_, rank)| **rank > 0)
            .map(|(o, _)| o as Ordinal)
    }
    fn spans(&self) -> Vec<Span> {
        spans_of(self.ordinals())
    }
    /// The verses in the current order.
    pub fn iter(&self) -> impl Iterator<Item = Verse> + '_ {
        self.ordered().into_iter().map(move |o| Verse::at(&self.v11n, o))
    }
    /// The verses with their ranks, in the current order.
    pub fn ranked(&self) -> Vec<(Verse, u32)> {
        self.ordered()
            .into_iter()
            .map(|o| (Verse::at(&self.v11n, o), self.board[o as usize]))
            .collect()
    }
    pub fn verse_at(&self, offset: usize) -> Result<Verse> {
        let ordered = self.ordered();
        ordered
            .get(offset)
            .map(|o| Verse::at(&self.v11n, *o))
            .ok_or(PassageError::OutOfRange {
                offset,
                count: ordered.len(),
            })
    }
    /// The ranked verses merged into ranges, in ordinal order.
    pub fn ranges(&self, restrict: RestrictionType) -> Vec<VerseRange> {
        ranges_of(&self.v11n, &self.spans(), restrict)
    }
    /// The ranges, highest ranked first. A range ranks as its best verse.
    pub fn ordered_ranges(&self) -> Vec<VerseRange> {
        let mut ranked: Vec<(VerseRange, u32)> = self
            .spans()
            .into_iter()
            .map(|(start, end)| {
                let best = self.board[start as usize..=end as usize].iter().copied().max().unwrap_or(0);
                (VerseRange::from_ordinals(&self.v11n, start, end), best)
            })
            .collect();
        ranked.sort_by_key(|(_, rank)| Reverse(*rank));
        ranked.into_iter().map(|(range, _)| range).collect()
    }
    fn ranges_in_order(&self, restrict: RestrictionType) -> Vec<VerseRange> {
        match self.order {
            Order::Biblical => self.ranges(restrict),
            Order::Tally => self.ordered_ranges(),
        }
    }

    // ------------- naming -------------
    pub fn name(&self) -> String {
        self.name_limited(0)
    }
    /// Names at most `count` entries, all of them when `count` is 0. In
    /// biblical order the entries are ranges, in tally order single verses.
    pub fn name_limited(&self, count: usize) -> String {
        let limit = if count == 0 { usize::MAX } else { count };
        let mut names = Vec::new();
        let mut base: Option<Verse> = None;
        match self.order {
            Order::Biblical => {
                for range in self.ranges(RestrictionType::None).into_iter().take(limit) {
                    names.push(range.name_relative(base.as_ref()));
                    base = Some(range.start().clone());
                }
            }
            Order::Tally => {
                for verse in self.iter().take(limit) {
                    names.push(verse.name_relative(base.as_ref()));
                    base = Some(verse);
                }
            }
        }
        names.join(", ")
    }
    /// "Gen 1:1 (100%), Gen 1:5 (66%)": the best `count` verses (all when 0)
    /// with their rank as a share of the maximum.
    pub fn name_and_tally(&self, count: usize) -> String {
        let limit = if count == 0 { usize::MAX } else { count };
        let max = self.max.max(1) as u64;
        let mut ranked: Vec<Ordinal> = self.ordinals().collect();
        ranked.sort_by_key(|o| Reverse(self.board[*o as usize]));
        ranked
            .into_iter()
            .take(limit)
            .map(|o| {
                let percent = 100 * self.board[o as usize] as u64 / max;
                format!("{} ({}%)", Verse::at(&self.v11n, o).name(), percent)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
    pub fn osis_ref(&self) -> String {
        self.ranges(RestrictionType::None)
            .iter()
            .map(|r| r.osis_ref())
            .collect::<Vec<_>>()
            .join(" ")
    }
    pub fn osis_id(&self) -> String {
        self.ranges(RestrictionType::None)
            .iter()
            .map(|r| r.osis_id())
            .collect::<Vec<_>>()
            .join(" ")
    }

    // ------------- listeners -------------
    pub fn add_listener(&mut self, listener: Arc<dyn PassageListener>) {
        self.listeners.add(listener);
    }
    pub fn remove_listener(&mut self, listener: &Arc<dyn PassageListener>) -> bool {
        self.listeners.remove(listener)
    }
    fn fire(&self, kind: EventKind, start: Option<Verse>, end: Option<Verse>) {
        self.listeners.notify(&PassageEvent::new(kind, start, end));
    }

    // ------------- board -------------
    fn increment(&mut self, ordinal: Ordinal, delta: i64) {
        let slot = &mut self.board[ordinal as usize];
        let existed = *slot > 0;
        *slot = (*slot as i64 + delta).clamp(0, MAX_TALLY as i64) as u32;
        match (existed, *slot > 0) {
            (true, false) => self.size -= 1,
            (false, true) => self.size += 1,
            _ => {}
        }
    }
    fn increment_max(&mut self, delta: u32) {
        self.max = self.max.saturating_add(delta).min(MAX_TALLY);
    }
    fn kill(&mut self, ordinal: Ordinal) {
        let slot = &mut self.board[ordinal as usize];
        if *slot > 0 {
            self.size -= 1;
        }
        *slot = 0;
    }
    fn reset_max(&mut self) {
        self.size = self.board.iter().filter(|r| **r > 0).count();
        self.max = self.board.iter().copied().max().unwrap_or(0);
    }
    // the spans of a key, refusing one from another versification
    fn spans_of_key(&self, key: &dyn Key) -> Result<Vec<Span>> {
        key.to_ranges()
            .iter()
            .map(|range| {
                if same_versification(&self.v11n, range.versification()) {
                    Ok((range.start().ordinal(), range.end().ordinal()))
                } else {
                    Err(PassageError::MismatchedVersification {
                        expected: self.v11n.name().to_string(),
                        found: range.versification().name().to_string(),
                    })
                }
            })
            .collect()
    }
    fn bounds(spans: &[Span], v11n: &Arc<Versification>) -> (Option<Verse>, Option<Verse>) {
        (
            spans.first().map(|s| Verse::at(v11n, s.0)),
            spans.last().map(|s| Verse::at(v11n, s.1)),
        )
    }

    // ------------- writing -------------
    /// Raises the rank of every verse in `key` by one.
    pub fn add(&mut self, key: &dyn Key) -> Result<()> {
        self.add_count(key, 1)
    }
    pub fn add_count(&mut self, key: &dyn Key, count: u32) -> Result<()> {
        let spans = self.spans_of_key(key)?;
        for &(start, end) in &spans {
            for ordinal in start..=end {
                self.increment(ordinal, count as i64);
            }
        }
        self.increment_max(count);
        let (start, end) = Self::bounds(&spans, &self.v11n);
        self.fire(EventKind::Added, start, end);
        Ok(())
    }
    /// Lowers the rank of every verse in `key` by one. The maximum stays.
    pub fn un_add(&mut self, key: &dyn Key) -> Result<()> {
        let spans = self.spans_of_key(key)?;
        for &(start, end) in &spans {
            for ordinal in start..=end {
                self.increment(ordinal, -1);
            }
        }
        let (start, end) = Self::bounds(&spans, &self.v11n);
        self.fire(EventKind::Removed, start, end);
        Ok(())
    }
    /// Drops the verses of `key` whatever their rank.
    pub fn remove(&mut self, key: &dyn Key) -> Result<()> {
        let spans = self.spans_of_key(key)?;
        for &(start, end) in &spans {
            for ordinal in start..=end {
                self.kill(ordinal);
            }
        }
        let (start, end) = Self::bounds(&spans, &self.v11n);
        self.fire(EventKind::Removed, start, end);
        Ok(())
    }
    /// Adds another tally rank for rank, or any other key as a single hit.
    pub fn add_all(&mut self, key: &dyn Key) -> Result<()> {
        let Some(other) = key.as_tally() else {
            return self.add(key);
        };
        self.check_tally(other)?;
        for (ordinal, rank) in other.board.iter().enumerate().skip(1) {
            if *rank > 0 {
                self.increment(ordinal as Ordinal, *rank as i64);
            }
        }
        self.increment_max(other.max);
        self.fire(EventKind::Added, None, None);
        Ok(())
    }
    pub fn un_add_all(&mut self, key: &dyn Key) -> Result<()> {
        let Some(other) = key.as_tally() else {
            return self.un_add(key);
        };
        self.check_tally(other)?;
        for (ordinal, rank) in other.board.iter().enumerate().skip(1) {
            if *rank > 0 {
                self.increment(ordinal as Ordinal, -(*rank as i64));
            }
        }
        self.fire(EventKind::Removed, None, None);
        Ok(())
    }
    pub fn remove_all(&mut self, key: &dyn Key) -> Result<()> {
        self.remove(key)
    }
    /// Drops every verse that is not in `key`, keeping the ranks of the rest.
    pub fn retain_all(&mut self, key: &dyn Key) -> Result<()> {
        let keep = self.spans_of_key(key)?;
        let mut keep = keep.into_iter().peekable();
        for ordinal in 1..self.board.len() as Ordinal {
            while keep.peek().is_some_and(|(_, end)| *end < ordinal) {
                keep.next();
            }
            let kept = keep.peek().is_some_and(|(start, _)| *start <= ordinal);
            if !kept {
                self.kill(ordinal);
            }
        }
        self.fire(EventKind::Removed, None, None);
        Ok(())
    }
    pub fn clear(&mut self) {
        self.board.iter_mut().for_each(|r| *r = 0);
        self.size = 0;
        self.max = 0;
        self.fire(EventKind::Removed, None, None);
    }
    /// Gives every ranked verse the same rank of 1.
    pub fn flatten(&mut self) {
        self.board.iter_mut().filter(|r| **r > 0).for_each(|r| *r = 1);
        self.max = u32::from(self.size > 0);
        self.fire(EventKind::Changed, None, None);
    }
    fn check_tally(&self, other: &PassageTally) -> Result<()> {
        if same_versification(&self.v11n, &other.v11n) {
            Ok(())
        } else {
            Err(PassageError::MismatchedVersification {
                expected: self.v11n.name().to_string(),
                found: other.v11n.name().to_string(),
            })
        }
    }

    /// Spreads every rank over the `by` verses on either side, falling off by
    /// one per verse of distance. With the chapter restriction nothing spills
    /// into a neighbouring chapter.
    pub fn blur(&mut self, by: u32, restrict: RestrictionType) {
        if by == 0 {
            return;
        }
        let max = self.v11n.max_ordinal();
        let mut board = vec![0u32; self.board.len()];
        for ordinal in self.ordinals() {
            let rank = self.board[ordinal as usize];
            let (low, high) = match restrict {
                RestrictionType::None => (1, max),
                RestrictionType::Chapter => {
                    let verse = Verse::at(&self.v11n, ordinal);
                    self.v11n
                        .chapter_span(verse.book(), verse.chapter())
                        .unwrap_or((ordinal, ordinal))
                }
            };
            let from = ordinal.saturating_sub(by).max(low);
            let to = ordinal.saturating_add(by).min(high);
            for target in from..=to {
                let spread = (rank as u64 + by as u64 - target.abs_diff(ordinal) as u64).min(MAX_TALLY as u64);
                let slot = &mut board[target as usize];
                *slot = slot.saturating_add(spread as u32).min(MAX_TALLY);
            }
        }
        self.board = board;
        self.reset_max();
        self.fire(EventKind::Changed, None, None);
    }

    /// Keeps the first `count` verses of the current order and returns the
    /// others with their ranks, or `None` when nothing had to go.
    pub fn trim_verses(&mut self, count: usize) -> Option<PassageTally> {
        let ordered = self.ordered();
        if ordered.len() <= count {
            return None;
        }
        Some(self.split_off(ordered[count..].iter().map(|o| (*o, *o))))
    }
    /// Like [`trim_verses`](Self::trim_verses) but counting ranges.
    pub fn trim_ranges(&mut self, count: usize, restrict: RestrictionType) -> Option<PassageTally> {
        let ranges = self.ranges_in_order(restrict);
        if ranges.len() <= count {
            return None;
        }
        Some(self.split_off(ranges[count..].iter().map(|r| (r.start().ordinal(), r.end().ordinal()))))
    }
    fn split_off(&mut self, moved: impl Iterator<Item = Span>) -> PassageTally {
        let mut remainder = PassageTally::new(&self.v11n);
        remainder.order = self.order;
        for (start, end) in moved {
            for ordinal in start..=end {
                remainder.board[ordinal as usize] = self.board[ordinal as usize];
                self.kill(ordinal);
            }
        }
        remainder.reset_max();
        self.fire(EventKind::Removed, None, None);
        remainder
    }

    /// The ranked verses as a plain passage.
    pub fn to_passage(&self, kind: PassageKind) -> Result<Passage> {
        let mut passage = Passage::new(kind, &self.v11n);
        passage.add_all(self)?;
        Ok(passage)
    }
}

impl PartialEq for PassageTally {
    fn eq(&self, other: &Self) -> bool {
        same_versification(&self.v11n, &other.v11n) && self.board == other.board
    }
}
impl Eq for PassageTally {}

impl fmt::Display for PassageTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for PassageTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassageTally")
            .field("versification", &self.v11n.name())
            .field("order", &self.order)
            .field("size", &self.size)
            .field("max", &self.max)
            .finish()
    }
}

impl Key for PassageTally {
    fn name(&self) -> String {
        PassageTally::name(self)
    }
    fn osis_ref(&self) -> String {
        PassageTally::osis_ref(self)
    }
    fn osis_id(&self) -> String {
        PassageTally::osis_id(self)
    }
    fn cardinality(&self) -> usize {
        self.size
    }
    fn to_ranges(&self) -> Vec<VerseRange> {
        self.ranges(RestrictionType::None)
    }
    fn get(&self, index: usize) -> Option<Verse> {
        self.verse_at(index).ok()
    }
    fn index_of(&self, verse: &Verse) -> Option<usize> {
        PassageTally::index_of(self, verse)
    }
    fn contains(&self, key: &dyn Key) -> bool {
        key.to_ranges().iter().all(|range| {
            same_versification(&self.v11n, range.versification())
                && (range.start().ordinal()..=range.end().ordinal()).all(|o| self.board[o as usize] > 0)
        })
    }
    fn as_tally(&self) -> Option<&PassageTally> {
        Some(self)
    }
    fn add_all(&mut self, key: &dyn Key) -> Result<()> {
        PassageTally::add_all(self, key)
    }
    fn remove_all(&mut self, key: &dyn Key) -> Result<()> {
        PassageTally::remove_all(self, key)
    }
    fn retain_all(&mut self, key: &dyn Key) -> Result<()> {
        PassageTally::retain_all(self, key)
    }
    fn clear(&mut self) -> Result<()> {
        PassageTally::clear(self);
        Ok(())
    }
    fn blur(&mut self, by: u32, restrict: RestrictionType) -> Result<()> {
        PassageTally::blur(self, by, restrict);
        Ok(())
    }
}
