/// Capacity of the buffer behind a default [`LogStream`](crate::LogStream).  Sized for a single
/// log line.
pub const SMALL_BUFFER: usize = 4000;

/// Capacity intended for buffers that batch many lines.  Too large for the stack; place it in
/// static or heap storage.
pub const LARGE_BUFFER: usize = 4000 * 1000;

/// Scratch size for rendering any single integer, pointer or default float.
///
/// Every supported value must fit with room to spare: `i64::MIN` is 20 bytes, a 64-bit pointer
/// is `0x` + 16 digits, and `%.12g` never exceeds `-d.ddddddddddde-308` (19 bytes).
pub const MAX_NUMERIC_SIZE: usize = 32;

/// Scratch size of a [`Fmt`](crate::Fmt).  Rendered text is always strictly shorter.
pub const FMT_SIZE: usize = 32;

/// Significant digits used when streaming `f32`/`f64` (`%.12g`).
pub const FLOAT_PRECISION: usize = 12;

/// Hex digits in a streamed pointer.  Fixed so log columns line up.
pub const PTR_HEX_DIGITS: usize = 2 * size_of::<usize>();

/// Largest precision `Fmt` honors for float conversions.  Anything above this cannot fit in
/// [`FMT_SIZE`] anyway.
pub const MAX_FLOAT_PRECISION: usize = 40;

const _: () = assert!(PTR_HEX_DIGITS + 2 <= MAX_NUMERIC_SIZE);
const _: () = assert!(FLOAT_PRECISION + 8 <= MAX_NUMERIC_SIZE);
