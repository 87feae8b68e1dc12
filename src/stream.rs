//! Chained-append façade over a [`FixedBuffer`]

use crate::buffer::FixedBuffer;
use crate::constants::{MAX_NUMERIC_SIZE, SMALL_BUFFER};
use crate::fmt::Fmt;
use crate::num::{format_float, format_integer, format_ptr};
use crate::util::strlen;
use core::ffi::{CStr, c_char};
use core::ops::Shl;
use core::ptr::NonNull;

/// A value that knows how to append its text to a buffer
pub trait Render {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>);
}

/// Owns one [`FixedBuffer`] and appends rendered values to it, left to right.
///
/// Both `stream.put(a).put(b)` and `&mut stream << a << b` are supported.
pub struct LogStream<const N: usize = SMALL_BUFFER> {
    buffer: FixedBuffer<N>,
}

impl LogStream {
    /// Stream backed by a [`SMALL_BUFFER`]-byte buffer
    pub const fn new() -> Self {
        Self::new_sized()
    }
}

impl<const N: usize> LogStream<N> {
    /// Stream backed by an `N`-byte buffer, e.g. `LogStream::<256>::new_sized()`
    pub const fn new_sized() -> Self {
        Self {
            buffer: FixedBuffer::new(),
        }
    }

    /// Append `value` and return the stream for chaining
    pub fn put<T: Render>(&mut self, value: T) -> &mut Self {
        value.render(&mut self.buffer);
        self
    }

    /// Append raw bytes, all or nothing
    pub fn append(&mut self, data: &[u8]) -> &mut Self {
        self.buffer.append(data);
        self
    }

    pub fn buffer(&self) -> &FixedBuffer<N> {
        &self.buffer
    }

    /// Access for in-place renderers; see [`FixedBuffer::current`] and [`FixedBuffer::advance`]
    pub fn buffer_mut(&mut self) -> &mut FixedBuffer<N> {
        &mut self.buffer
    }

    pub fn reset_buffer(&mut self) {
        self.buffer.reset();
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.buffer.as_str()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for LogStream {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for LogStream<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LogStream")
            .field("buffer", &self.buffer)
            .finish()
    }
}

impl<'a, T: Render, const N: usize> Shl<T> for &'a mut LogStream<N> {
    type Output = &'a mut LogStream<N>;

    fn shl(self, value: T) -> Self::Output {
        self.put(value)
    }
}

/// `write!` support.  One `write!` is one append: it lands whole or not at all.
///
/// Running out of room is not an error.  Only an `Err` from a formatted value's own `Display`
/// impl is returned, and nothing is committed then either.
impl<const N: usize> core::fmt::Write for LogStream<N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.buffer.append(s.as_bytes());
        Ok(())
    }

    fn write_fmt(&mut self, args: core::fmt::Arguments<'_>) -> core::fmt::Result {
        let mut tail = Tail {
            dst: self.buffer.current(),
            len: 0,
            needed: 0,
        };
        core::fmt::write(&mut tail, args)?;

        let Tail { len, needed, .. } = tail;
        if needed == len {
            self.buffer.advance(len);
        } else {
            self.buffer.discard(needed);
        }
        Ok(())
    }
}

/// Renders into the unused tail of a buffer.  Stops copying at the first piece that does not
/// fit but keeps counting, so the caller knows the full length it dropped.
struct Tail<'a> {
    dst: &'a mut [u8],
    len: usize,
    needed: usize,
}

impl core::fmt::Write for Tail<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        if self.needed == self.len && s.len() <= self.dst.len() - self.len {
            self.dst[self.len..self.len + s.len()].copy_from_slice(s.as_bytes());
            self.len += s.len();
        }
        self.needed = self.needed.saturating_add(s.len());
        Ok(())
    }
}

/// Text whose length was known when the code was written
///
/// Appending it copies exactly `len` bytes without measuring.  Build one with [`lit!`](crate::lit)
/// or [`Literal::new`].
#[derive(Clone, Copy, Debug)]
pub struct Literal<'a> {
    text: &'a [u8],
    len: usize,
}

impl<'a> Literal<'a> {
    /// Debug builds panic if `len` is not the length of `text`
    pub const fn new(text: &'a str, len: usize) -> Self {
        debug_assert!(text.len() == len, "Literal length does not match its text");
        Self {
            text: text.as_bytes(),
            len,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Borrowed NUL-terminated C string, measured when rendered
#[derive(Clone, Copy, Debug)]
pub struct CPtr(*const c_char);

impl CPtr {
    /// # Safety
    /// - `ptr` must be null or point to a NUL-terminated string that stays valid while this
    ///   `CPtr` is in use.
    pub const unsafe fn new(ptr: *const c_char) -> Self {
        Self(ptr)
    }
}

impl<T: Render + ?Sized> Render for &T {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        (**self).render(buf)
    }
}

impl Render for bool {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        buf.append(if *self { b"1" } else { b"0" });
    }
}

impl Render for char {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        let mut utf8 = [0u8; 4];
        buf.append(self.encode_utf8(&mut utf8).as_bytes());
    }
}

impl Render for str {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        buf.append(self.as_bytes());
    }
}

impl Render for [u8] {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        buf.append(self);
    }
}

impl<const M: usize> Render for [u8; M] {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        buf.append(self);
    }
}

impl Render for CStr {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        buf.append(self.to_bytes());
    }
}

impl Render for CPtr {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        // # SAFETY
        //
        // CPtr::new's caller guaranteed a valid NUL-terminated string (or null).
        let len = unsafe { strlen(self.0) };
        if len == 0 {
            return;
        }
        buf.append(unsafe { core::slice::from_raw_parts(self.0 as *const u8, len) });
    }
}

impl Render for Literal<'_> {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        // A mismatched length in a release build copies what is there rather than over-reading.
        buf.append(self.text.get(..self.len).unwrap_or(self.text));
    }
}

#[cfg(feature = "alloc")]
impl Render for alloc::string::String {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        buf.append(self.as_bytes());
    }
}

macro_rules! render_integer {
    ($($t:ty)*) => {$(
        const _: () = assert!(<$t as itoa::Integer>::MAX_STR_LEN <= MAX_NUMERIC_SIZE);

        impl Render for $t {
            fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
                format_integer(buf, *self);
            }
        }
    )*};
}

render_integer!(i8 i16 i32 i64 isize u8 u16 u32 u64 usize);

impl Render for f64 {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        format_float(buf, *self);
    }
}

impl Render for f32 {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        format_float(buf, f64::from(*self));
    }
}

impl<T: ?Sized> Render for *const T {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        format_ptr(buf, self.cast::<()>() as usize);
    }
}

impl<T: ?Sized> Render for *mut T {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        format_ptr(buf, self.cast::<()>() as usize);
    }
}

impl<T: ?Sized> Render for NonNull<T> {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        format_ptr(buf, self.as_ptr().cast::<()>() as usize);
    }
}

impl Render for Fmt {
    fn render<const N: usize>(&self, buf: &mut FixedBuffer<N>) {
        buf.append(self.as_bytes());
    }
}
