//! Passage – Bible references as ordered sets of verses.
//!
//! A reference such as `"Gen 1:1-5, 7; Exod 2"` is read into a [`passage::Passage`],
//! a duplicate free set of verses kept in ordinal order, which can then be
//! combined with other passages, named again, blurred, trimmed and encoded.
//!
//! Every verse has an *ordinal*: its position counted from the first verse of
//! a [`versification::Versification`]. Passages store ordinals, so set algebra
//! is integer work whatever the book, chapter and verse structure looks like.
//!
//! ## Modules
//! * [`book`] – The 66 canonical books and their names.
//! * [`versification`] – Book and chapter layouts, ordinal arithmetic and the
//!   built-in KJV layout.
//! * [`verse`] and [`range`] – The [`verse::Verse`] and [`range::VerseRange`]
//!   value types with their algebra and naming.
//! * [`tokenizer`] and [`accuracy`] – Reading reference text, with earlier
//!   references filling in what a later one leaves out.
//! * [`passage`] – The [`passage::Passage`] engine over distinct, ranged,
//!   bitwise and rocket stores, with batching guards and change listeners.
//! * [`tally`] – [`tally::PassageTally`], a passage with a rank per verse.
//! * [`codec`] – Compact binary form, versioned serialized form and a plain
//!   text description.
//! * [`factory`] – [`factory::PassageKeyFactory`], lenient parsing driven by
//!   [`config::Settings`].
//! * [`wrapper`] – Read-only and synchronized keys.
//!
//! ## Quick Start
//! ```
//! use passage::{Passage, PassageKind, RestrictionType, Versification};
//! let kjv = Versification::kjv();
//! let mut p = Passage::parse(PassageKind::Ranged, &kjv, "Gen 1:1-3, 5; Exod 2:1").unwrap();
//! assert_eq!(p.name(), "Gen 1:1-3, 5, Exod 2:1");
//! p.blur(1, RestrictionType::Chapter);
//! assert_eq!(p.name(), "Gen 1:1-6, Exod 2:1-2");
//! ```

pub mod accuracy;
pub mod book;
pub mod codec;
pub mod config;
pub mod error;
pub mod factory;
pub mod key;
pub mod passage;
pub mod range;
pub mod restriction;
pub mod tally;
pub mod telemetry;
pub mod tokenizer;
pub mod verse;
pub mod versification;
pub mod wrapper;

pub use crate::book::BibleBook;
pub use crate::config::Settings;
pub use crate::error::{PassageError, Result};
pub use crate::factory::PassageKeyFactory;
pub use crate::key::Key;
pub use crate::passage::{Passage, PassageKind};
pub use crate::range::VerseRange;
pub use crate::restriction::RestrictionType;
pub use crate::tally::{Order, PassageTally};
pub use crate::verse::Verse;
pub use crate::versification::{Versification, Versifications};
