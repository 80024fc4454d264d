//! Owned byte buffer used by byte-string and text-string literals.
//!
//! The original library distinguishes an *owned* buffer from a *view*
//! (unowned pointer + length) so that codec and lexing code can borrow
//! bytes without copying. Rust's borrow checker gives us that distinction
//! for free via `&[u8]`, so `Bytes` itself is always owned; transient
//! borrowing during codec/lexer work is just an ordinary slice.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An owned, growable byte buffer.
///
/// Every `Bytes` stored inside an [`Ari`](crate::Ari) owns its storage; there
/// is no view/alias state to track once a value leaves the codec layer.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a buffer by copying `src`.
    #[must_use]
    pub fn copy_from(src: &[u8]) -> Self {
        Self(src.to_vec())
    }

    /// Number of bytes currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the buffer contents.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Resizes the buffer, padding with zero bytes or truncating at the back.
    pub fn resize_back(&mut self, len: usize) {
        self.0.resize(len, 0);
    }

    /// Alters the size at the back of the buffer by a signed difference.
    ///
    /// Mirrors `cace_data_extend_back`: a negative `extra` truncates.
    pub fn extend_back(&mut self, extra: isize) {
        let new_len = (self.0.len() as isize + extra).max(0) as usize;
        self.resize_back(new_len);
    }

    /// Alters the size at the front of the buffer by a signed difference,
    /// preserving the existing tail contents.
    ///
    /// Mirrors `cace_data_extend_front`: a positive `extra` inserts zero
    /// bytes at the front; a negative one removes bytes from the front.
    pub fn extend_front(&mut self, extra: isize) {
        if extra > 0 {
            let mut next = vec![0u8; extra as usize];
            next.extend_from_slice(&self.0);
            self.0 = next;
        } else if extra < 0 {
            let drop = (-extra) as usize;
            if drop >= self.0.len() {
                self.0.clear();
            } else {
                self.0.drain(0..drop);
            }
        }
    }

    /// Appends a single byte.
    pub fn push(&mut self, val: u8) {
        self.0.push(val);
    }

    /// Appends the contents of `src`.
    pub fn append(&mut self, src: &[u8]) {
        self.0.extend_from_slice(src);
    }

    /// Consumes `self`, returning the underlying `Vec<u8>`.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

// Ordering is unsigned lexicographic over the raw bytes, matching
// `cace_data_cmp`'s `memcmp`-then-length-tiebreak behavior.
impl Ord for Bytes {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for Bytes {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Bytes {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
