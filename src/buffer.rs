//! Fixed-capacity, panic-free byte buffer with cursor tracking

use crate::constants::{LARGE_BUFFER, SMALL_BUFFER};
use crate::util::memzero;
use core::ffi::CStr;

pub type SmallBuffer = FixedBuffer<SMALL_BUFFER>;
pub type LargeBuffer = FixedBuffer<LARGE_BUFFER>;

/// Inline `[u8; N]` plus a cursor one past the last written byte.
///
/// Appends that do not fit in the remaining capacity are dropped whole.  No error is raised;
/// callers that care compare [`len`](Self::len) before and after, or check
/// [`dropped`](Self::dropped).
pub struct FixedBuffer<const N: usize> {
    data: [u8; N],
    cur: usize,
    dropped: usize,
}

impl<const N: usize> FixedBuffer<N> {
    pub const fn new() -> Self {
        Self {
            data: [0u8; N],
            cur: 0,
            dropped: 0,
        }
    }

    /// Copy `data` in after the cursor if it fits entirely, otherwise do nothing
    pub fn append(&mut self, data: &[u8]) {
        if data.len() > self.avail() {
            self.dropped = self.dropped.saturating_add(data.len());
            return;
        }

        // # SAFETY
        //
        // - We've verified that self.cur + data.len() <= N, and thus we know the destination has
        // exactly data.len() bytes available.
        // - Rust type system ensures both source and destination are valid for data.len() bytes
        // - Rust type system ensures they don't overlap (destination is an array we own mutably).
        unsafe {
            core::ptr::copy_nonoverlapping(
                data.as_ptr(),
                self.data.as_mut_ptr().add(self.cur),
                data.len(),
            )
        };
        self.cur += data.len();
    }

    /// Account for `len` bytes an in-place renderer could not fit
    pub(crate) fn discard(&mut self, len: usize) {
        self.dropped = self.dropped.saturating_add(len);
    }

    /// Unused tail of the buffer, for rendering in place
    ///
    /// Bytes written here become part of the contents only once [`advance`](Self::advance) is
    /// called.
    pub fn current(&mut self) -> &mut [u8] {
        &mut self.data[self.cur..]
    }

    /// Remaining capacity in bytes
    #[inline]
    pub fn avail(&self) -> usize {
        N - self.cur
    }

    /// Commit `len` bytes previously rendered into [`current`](Self::current)
    ///
    /// `len` must not exceed [`avail`](Self::avail).  Debug builds panic if it does; release
    /// builds stop the cursor at capacity.
    pub fn advance(&mut self, len: usize) {
        debug_assert!(
            len <= self.avail(),
            "advance({len}) past remaining capacity {}",
            self.avail()
        );
        self.cur += len.min(self.avail());
    }

    /// Bytes written so far
    #[inline]
    pub fn len(&self) -> usize {
        self.cur
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cur == 0
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes discarded by appends that did not fit since the last reset
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Rewind the cursor to the start.  Old bytes stay in memory but are no longer visible.
    pub fn reset(&mut self) {
        self.cur = 0;
        self.dropped = 0;
    }

    /// Zero the entire backing array without moving the cursor
    pub fn bzero(&mut self) {
        memzero(&mut self.data);
    }

    /// Get a reference to the populated segment of the buffer
    pub fn as_bytes(&self) -> &[u8] {
        // # SAFETY
        //
        // cur never exceeds N: append checks avail() and advance clamps to it.
        unsafe { self.data.get_unchecked(..self.cur) }
    }

    /// Populated segment as text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    /// The whole backing array, including bytes past the cursor
    pub fn data(&self) -> &[u8; N] {
        &self.data
    }

    /// NUL-terminate the contents in place for inspection from a debugger
    ///
    /// The terminator is written at the cursor but not committed, so later appends overwrite
    /// it.  Returns `None` if the buffer is full or the contents contain an interior NUL.
    pub fn debug_str(&mut self) -> Option<&CStr> {
        if self.avail() == 0 {
            return None;
        }
        self.data[self.cur] = 0;
        CStr::from_bytes_with_nul(&self.data[..=self.cur]).ok()
    }
}

impl<const N: usize> Default for FixedBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for FixedBuffer<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FixedBuffer")
            .field("len", &self.cur)
            .field("capacity", &N)
            .field("dropped", &self.dropped)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let buf = SmallBuffer::new();
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.avail(), 4000);
        assert_eq!(buf.capacity(), 4000);
        assert_eq!(buf.as_bytes(), b"");
    }

    #[test]
    fn test_append() {
        let mut buf = FixedBuffer::<16>::new();
        buf.append(b"abc");
        buf.append(b"def");
        assert_eq!(buf.as_bytes(), b"abcdef");
        assert_eq!(buf.len(), 6);
        assert_eq!(buf.avail(), 10);
    }

    #[test]
    fn test_append_fills_exactly() {
        let mut buf = FixedBuffer::<4>::new();
        buf.append(b"abcd");
        assert_eq!(buf.as_bytes(), b"abcd");
        assert_eq!(buf.avail(), 0);
        assert_eq!(buf.dropped(), 0);
    }

    #[test]
    fn test_append_overflow_is_full_noop() {
        let mut buf = FixedBuffer::<8>::new();
        buf.append(b"hello");
        buf.append(b"world");
        assert_eq!(buf.as_bytes(), b"hello");
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.dropped(), 5);

        // Smaller appends still land afterwards
        buf.append(b"!!!");
        assert_eq!(buf.as_bytes(), b"hello!!!");
    }

    #[test]
    fn test_append_empty_on_full_buffer() {
        let mut buf = FixedBuffer::<2>::new();
        buf.append(b"ab");
        buf.append(b"");
        assert_eq!(buf.as_bytes(), b"ab");
        assert_eq!(buf.dropped(), 0);
    }

    #[test]
    fn test_reset_round_trip() {
        let mut buf = FixedBuffer::<16>::new();
        buf.append(b"abc");
        assert_eq!(buf.as_bytes(), b"abc");
        buf.reset();
        assert!(buf.is_empty());
        buf.append(b"de");
        assert_eq!(buf.as_bytes(), b"de");
        assert_eq!(buf.as_str(), Some("de"));
    }

    #[test]
    fn test_reset_keeps_stale_bytes() {
        let mut buf = FixedBuffer::<8>::new();
        buf.append(b"abcdef");
        buf.reset();
        buf.append(b"xy");
        assert_eq!(&buf.data()[..6], b"xycdef");
    }

    #[test]
    fn test_reset_clears_dropped() {
        let mut buf = FixedBuffer::<2>::new();
        buf.append(b"abc");
        assert_eq!(buf.dropped(), 3);
        buf.reset();
        assert_eq!(buf.dropped(), 0);
    }

    #[test]
    fn test_bzero() {
        let mut buf = FixedBuffer::<8>::new();
        buf.append(b"abcdef");
        buf.reset();
        buf.bzero();
        assert_eq!(buf.data(), &[0u8; 8]);
    }

    #[test]
    fn test_current_and_advance() {
        let mut buf = FixedBuffer::<8>::new();
        buf.append(b"ab");
        let tail = buf.current();
        assert_eq!(tail.len(), 6);
        tail[..3].copy_from_slice(b"xyz");
        buf.advance(3);
        assert_eq!(buf.as_bytes(), b"abxyz");
        assert_eq!(buf.avail(), 3);
    }

    #[test]
    fn test_uncommitted_tail_is_invisible() {
        let mut buf = FixedBuffer::<8>::new();
        buf.current()[..2].copy_from_slice(b"zz");
        assert_eq!(buf.as_bytes(), b"");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "past remaining capacity")]
    fn test_advance_past_capacity_panics_in_debug() {
        let mut buf = FixedBuffer::<4>::new();
        buf.advance(5);
    }

    #[test]
    fn test_debug_str() {
        let mut buf = FixedBuffer::<8>::new();
        buf.append(b"abc");
        assert_eq!(buf.debug_str(), Some(c"abc"));
        // Terminator is not part of the contents
        assert_eq!(buf.len(), 3);
        buf.append(b"d");
        assert_eq!(buf.as_bytes(), b"abcd");
    }

    #[test]
    fn test_debug_str_full() {
        let mut buf = FixedBuffer::<3>::new();
        buf.append(b"abc");
        assert_eq!(buf.debug_str(), None);
    }

    #[test]
    fn test_large_buffer_in_static() {
        static BATCH: std::sync::Mutex<LargeBuffer> = std::sync::Mutex::new(LargeBuffer::new());

        let mut buf = BATCH.lock().unwrap();
        assert_eq!(buf.capacity(), LARGE_BUFFER);
        buf.append(b"line 1\n");
        buf.append(b"line 2\n");
        assert_eq!(buf.as_bytes(), b"line 1\nline 2\n");
        assert_eq!(buf.avail(), LARGE_BUFFER - 14);
    }

    #[test]
    fn test_as_str_rejects_invalid_utf8() {
        let mut buf = FixedBuffer::<4>::new();
        buf.append(&[0xff, 0xfe]);
        assert_eq!(buf.as_str(), None);
    }
}
