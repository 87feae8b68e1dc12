//! Fixed-size scratch space for rendering a single value

use core::fmt;

/// Owned `[u8; N]` with a write position.
///
/// Writes past the end are dropped, but [`Scratch::needed`] keeps counting so callers can tell
/// how long the full rendering would have been.
pub struct Scratch<const N: usize> {
    buf: [u8; N],
    len: usize,
    needed: usize,
}

impl<const N: usize> Scratch<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; N],
            len: 0,
            needed: 0,
        }
    }

    /// Push as much of `data` as fits
    pub fn push(&mut self, data: &[u8]) {
        let n = data.len().min(N - self.len);
        self.buf[self.len..self.len + n].copy_from_slice(&data[..n]);
        self.len += n;
        self.needed = self.needed.saturating_add(data.len());
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.push(&[byte]);
    }

    /// Push `count` copies of `byte`
    pub fn fill(&mut self, byte: u8, count: usize) {
        let n = count.min(N - self.len);
        self.buf[self.len..self.len + n].fill(byte);
        self.len += n;
        self.needed = self.needed.saturating_add(count);
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes the writes so far asked for, including any that were dropped
    #[inline]
    pub fn needed(&self) -> usize {
        self.needed
    }

    #[inline]
    pub fn truncated(&self) -> bool {
        self.needed > self.len
    }

    /// Forget everything past `len`
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
            self.needed = len;
        }
    }
}

impl<const N: usize> Default for Scratch<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for Scratch<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push(s.as_bytes());
        Ok(())
    }
}
