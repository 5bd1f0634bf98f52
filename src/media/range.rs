//! `Range` header parsing.
//!
//! Parsing is lenient: the first `bytes=<start>-<end>` occurrence in the
//! header wins, later ranges are ignored, and a header with no numeric start
//! is read as `bytes=0-` (the whole resource). Resolution against the
//! resource size is strict and rejects ranges that cannot be satisfied.

use slides_common::{Error, Result};

const BYTES_UNIT: &str = "bytes=";

/// Inclusive byte range `[start, end]` within a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by the range.
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value of the `Content-Range` header for a resource of `size` bytes.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

/// A parsed but not yet resolved range.
///
/// `end` is `None` for open ranges like `bytes=500-`; an explicit end of `0`
/// stays `Some(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: u64,
    pub end: Option<u64>,
}

impl RangeSpec {
    /// The whole resource.
    pub const FULL: RangeSpec = RangeSpec {
        start: 0,
        end: None,
    };

    /// Parse a raw `Range` header value.
    pub fn parse(header: &str) -> Self {
        header
            .match_indices(BYTES_UNIT)
            .find_map(|(pos, _)| parse_at(&header[pos + BYTES_UNIT.len()..]))
            .unwrap_or(Self::FULL)
    }

    /// Resolve against a resource of `size` bytes.
    ///
    /// An open end becomes `size - 1` and an explicit end past the resource is
    /// clamped to it. A start beyond the last byte, or an end before the start,
    /// is [`Error::RangeNotSatisfiable`]; so is any range over an empty
    /// resource.
    pub fn resolve(self, size: u64) -> Result<ByteRange> {
        let last = size
            .checked_sub(1)
            .ok_or(Error::RangeNotSatisfiable { size })?;

        let end = self.end.map_or(last, |end| end.min(last));
        if self.start > end {
            return Err(Error::RangeNotSatisfiable { size });
        }

        Ok(ByteRange {
            start: self.start,
            end,
        })
    }
}

/// Parse `<digits>-<digits>?` at the start of `s`.
fn parse_at(s: &str) -> Option<RangeSpec> {
    let (start, rest) = split_digits(s);
    let rest = rest.strip_prefix('-')?;
    let start = start.parse().ok()?;

    let (end, _) = split_digits(rest);
    let end = if end.is_empty() {
        None
    } else {
        Some(end.parse().ok()?)
    };

    Some(RangeSpec { start, end })
}

fn split_digits(s: &str) -> (&str, &str) {
    let idx = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(idx)
}

/// Parse a `Range` header and resolve it against `size`.
pub fn parse_range(header: &str, size: u64) -> Result<ByteRange> {
    RangeSpec::parse(header).resolve(size)
}
