//! Binary and text forms of a passage.
//!
//! The binary form is a method tag followed by one of three payloads, all
//! with big-endian integers whose width is the smallest that can hold the
//! versification's highest ordinal:
//!
//! * bitwise: `max / 8 + 1` bytes, ordinal `o` is bit `o % 8` of byte `o / 8`
//! * distinct: a verse count followed by every ordinal
//! * ranged: a range count followed by the start and cardinality of each
//!
//! The encoder computes the size of all three and writes the smallest,
//! preferring bitwise, then distinct, then ranged when sizes are equal.
//! The serialized form adds a version byte and the versification name, and
//! the description is plain text, the versification name and then one
//! range per line.

use std::fmt;
use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing::debug;

use crate::accuracy::parse_range;
use crate::error::{PassageError, Result};
use crate::passage::{Passage, PassageKind};
use crate::range::VerseRange;
use crate::restriction::RestrictionType;
use crate::versification::{Ordinal, Versification, Versifications};

/// The version byte leading the serialized form.
pub const SERIAL_VERSION: u8 = 1;

// ------------- Method -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Bitwise = 0,
    Distinct = 1,
    Ranged = 2,
}

impl Method {
    fn from_tag(tag: u32) -> Result<Method> {
        match tag {
            0 => Ok(Method::Bitwise),
            1 => Ok(Method::Distinct),
            2 => Ok(Method::Ranged),
            other => Err(PassageError::UnknownPassageFormat(other)),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Bitwise => write!(f, "bitwise"),
            Method::Distinct => write!(f, "distinct"),
            Method::Ranged => write!(f, "ranged"),
        }
    }
}

/// The number of bytes needed to hold `n`.
pub fn width(n: u32) -> usize {
    match n {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        _ => 4,
    }
}

const TAG_WIDTH: usize = 1;

fn write_uint(out: &mut Vec<u8>, value: u32, width: usize) {
    out.extend_from_slice(&value.to_be_bytes()[4 - width..]);
}

// reads big-endian integers off the front of a buffer
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let available = self.bytes.len() - self.pos;
        if count > available {
            return Err(PassageError::Truncated {
                needed: count,
                available,
            });
        }
        let slice = &self.bytes[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }
    fn uint(&mut self, width: usize) -> Result<u32> {
        Ok(self.take(width)?.iter().fold(0u32, |acc, b| (acc << 8) | *b as u32))
    }
    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

// ------------- sizing -------------
/// The encoded size of each method for a passage, tag included.
pub fn binary_size(passage: &Passage, method: Method) -> usize {
    let max = passage.versification().max_ordinal();
    match method {
        Method::Bitwise => TAG_WIDTH + max as usize / 8 + 1,
        Method::Distinct => TAG_WIDTH + width(max) * (1 + passage.count_verses()),
        Method::Ranged => {
            TAG_WIDTH + width(max / 2) + 2 * width(max) * passage.count_ranges(RestrictionType::None)
        }
    }
}

/// The method the encoder would pick for a passage.
pub fn choose_method(passage: &Passage) -> Method {
    let bitwise = binary_size(passage, Method::Bitwise);
    let distinct = binary_size(passage, Method::Distinct);
    let ranged = binary_size(passage, Method::Ranged);
    if bitwise <= distinct && bitwise <= ranged {
        Method::Bitwise
    } else if distinct <= ranged {
        Method::Distinct
    } else {
        Method::Ranged
    }
}

// ------------- binary -------------
pub fn to_binary(passage: &Passage) -> Vec<u8> {
    let method = choose_method(passage);
    let max = passage.versification().max_ordinal();
    let mut out = Vec::with_capacity(binary_size(passage, method));
    debug!(
        method = %method,
        bytes = binary_size(passage, method),
        verses = passage.count_verses(),
        "encoding passage"
    );
    write_uint(&mut out, method as u32, TAG_WIDTH);
    match method {
        Method::Bitwise => {
            let mut bits = vec![0u8; max as usize / 8 + 1];
            for verse in passage.iter() {
                let ordinal = verse.ordinal() as usize;
                bits[ordinal / 8] |= 1 << (ordinal % 8);
            }
            out.extend_from_slice(&bits);
        }
        Method::Distinct => {
            let w = width(max);
            write_uint(&mut out, passage.count_verses() as u32, w);
            for verse in passage.iter() {
                write_uint(&mut out, verse.ordinal(), w);
            }
        }
        Method::Ranged => {
            let w = width(max);
            let ranges = passage.ranges(RestrictionType::None);
            write_uint(&mut out, ranges.len() as u32, width(max / 2));
            for range in &ranges {
                write_uint(&mut out, range.start().ordinal(), w);
                write_uint(&mut out, range.cardinality(), w);
            }
        }
    }
    out
}

/// Decodes a binary form into a passage of the given kind.
pub fn from_binary(bytes: &[u8], v11n: &Arc<Versification>, kind: PassageKind) -> Result<Passage> {
    let mut reader = Reader::new(bytes);
    let passage = read_binary(&mut reader, v11n, kind)?;
    Ok(passage)
}

fn read_binary(reader: &mut Reader<'_>, v11n: &Arc<Versification>, kind: PassageKind) -> Result<Passage> {
    let method = Method::from_tag(reader.uint(TAG_WIDTH)?)?;
    let max = v11n.max_ordinal();
    debug!(method = %method, versification = v11n.name(), "decoding passage");
    let mut passage = Passage::new(kind, v11n);
    let mut batch = passage.batch();
    let check = |start: Ordinal, count: u32| -> Result<VerseRange> {
        let end = start as u64 + count as u64 - 1;
        if start == 0 || count == 0 || end > max as u64 {
            return Err(PassageError::CorruptRange { start, count });
        }
        Ok(VerseRange::from_ordinals(v11n, start, end as Ordinal))
    };
    match method {
        Method::Bitwise => {
            let bits = reader.take(max as usize / 8 + 1)?;
            for (index, byte) in bits.iter().enumerate() {
                for bit in 0..8 {
                    if byte & (1 << bit) != 0 {
                        let ordinal = (index * 8 + bit) as Ordinal;
                        batch.add(check(ordinal, 1)?)?;
                    }
                }
            }
        }
        Method::Distinct => {
            let w = width(max);
            let count = reader.uint(w)?;
            for _ in 0..count {
                let ordinal = reader.uint(w)?;
                batch.add(check(ordinal, 1)?)?;
            }
        }
        Method::Ranged => {
            let w = width(max);
            let count = reader.uint(width(max / 2))?;
            for _ in 0..count {
                let start = reader.uint(w)?;
                let cardinality = reader.uint(w)?;
                batch.add(check(start, cardinality)?)?;
            }
        }
    }
    drop(batch);
    Ok(passage)
}

// ------------- serialized form -------------
/// `[version][name length][versification name][binary form]`.
pub fn serialize(passage: &Passage) -> Result<Vec<u8>> {
    let name = passage.versification().name().as_bytes();
    let length = u8::try_from(name.len())
        .map_err(|_| PassageError::InvalidLayout(format!("versification name of {} bytes", name.len())))?;
    let mut out = vec![SERIAL_VERSION, length];
    out.extend_from_slice(name);
    out.extend(to_binary(passage));
    Ok(out)
}

/// Reads the serialized form, finding the versification by name.
pub fn deserialize(bytes: &[u8], versifications: &Versifications, kind: PassageKind) -> Result<Passage> {
    let mut reader = Reader::new(bytes);
    let version = reader.uint(1)?;
    if version != SERIAL_VERSION as u32 {
        return Err(PassageError::UnknownPassageFormat(version));
    }
    let length = reader.uint(1)? as usize;
    let name = String::from_utf8_lossy(reader.take(length)?).into_owned();
    let v11n = versifications.get(&name)?;
    from_binary(reader.rest(), &v11n, kind)
}

// ------------- description -------------
/// Writes the versification name and then one range name per line.
pub fn write_description(passage: &Passage, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", passage.versification().name())?;
    for range in passage.ranges(RestrictionType::None) {
        writeln!(out, "{}", range.name())?;
    }
    Ok(())
}

/// Reads what [`write_description`] wrote. Every line is a reference on its
/// own and blank lines are skipped.
pub fn read_description(input: impl BufRead, versifications: &Versifications, kind: PassageKind) -> Result<Passage> {
    let mut lines = input.lines();
    let name = match lines.next() {
        Some(line) => line?,
        None => return Err(PassageError::Truncated { needed: 1, available: 0 }),
    };
    let v11n = versifications.get(name.trim())?;
    let mut passage = Passage::new(kind, &v11n);
    let mut batch = passage.batch();
    for line in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let range = parse_range(&v11n, line, None)?;
        batch.add(range)?;
    }
    drop(batch);
    Ok(passage)
}
