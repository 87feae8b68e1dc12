#![cfg_attr(not(test), no_std)]

//! Allocation-free text formatting for logging hot paths.
//!
//! A [`LogStream`] owns one [`FixedBuffer`] and renders values into it through chained
//! appends.  Nothing here allocates, and nothing panics when the buffer fills up: an append
//! that does not fit is dropped whole.
//!
//! ```
//! use logstream::{Fmt, LogStream, lit};
//!
//! let mut stream = LogStream::new();
//! stream.put("pid=").put(4242).put(' ').put(lit!("ok"));
//! stream.put(", load=").put(0.25).put(", mask=").put(Fmt::new("%#06x", 0x1fu32));
//! assert_eq!(stream.as_bytes(), b"pid=4242 ok, load=0.25, mask=0x001f");
//! ```
//!
//! The same chain reads as `<<` on a `&mut LogStream`, sized here with a const generic:
//!
//! ```
//! use logstream::LogStream;
//!
//! let mut stream = LogStream::<64>::new_sized();
//! let line = &mut stream << "retry " << 3u8 << '/' << 5u8;
//! assert_eq!(line.as_str(), Some("retry 3/5"));
//! ```

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod buffer;
pub mod constants;
pub mod fmt;
pub mod num;
pub mod stream;
pub mod util;

pub use buffer::{FixedBuffer, LargeBuffer, SmallBuffer};
pub use fmt::{Fmt, FmtArg};
pub use stream::{CPtr, Literal, LogStream, Render};

/// Wrap a string literal in a [`Literal`], measuring it at compile time.
#[macro_export]
macro_rules! lit {
    ($s:literal) => {{
        const LEN: usize = $s.len();
        $crate::Literal::new($s, LEN)
    }};
}
