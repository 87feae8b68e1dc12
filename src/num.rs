//! Numeric rendering shared by [`LogStream`](crate::LogStream) and [`Fmt`](crate::Fmt)
//!
//! Integers go through `itoa`, which converts the unsigned magnitude and is therefore correct for
//! every `MIN`.  Pointers and other radixes are rendered least significant digit first into the
//! end of their destination.  Floats lean on `core::fmt`'s exact float printing and reshape the
//! output into C's `%f`/`%e`/`%g` forms.

use crate::buffer::FixedBuffer;
use crate::constants::{FLOAT_PRECISION, MAX_FLOAT_PRECISION, MAX_NUMERIC_SIZE, PTR_HEX_DIGITS};
use crate::util::Scratch;
use core::fmt::Write;

const DIGITS_LOWER: &[u8; 16] = b"0123456789abcdef";
const DIGITS_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Room for `{:.*e}` at [`MAX_FLOAT_PRECISION`] plus exponent, and for the `%g` fixed branch
pub(crate) const FLOAT_SCRATCH: usize = 64;

/// Append the decimal text of `value`
pub fn format_integer<I: itoa::Integer, const N: usize>(buf: &mut FixedBuffer<N>, value: I) {
    let mut scratch = itoa::Buffer::new();
    buf.append(scratch.format(value).as_bytes());
}

/// Append `addr` as `0x` followed by [`PTR_HEX_DIGITS`] zero-padded lowercase hex digits
///
/// Rendered straight into the buffer's unused tail.
pub fn format_ptr<const N: usize>(buf: &mut FixedBuffer<N>, addr: usize) {
    const LEN: usize = 2 + PTR_HEX_DIGITS;

    if buf.avail() < LEN {
        buf.discard(LEN);
        return;
    }
    let dst = &mut buf.current()[..LEN];
    dst[0] = b'0';
    dst[1] = b'x';
    fill_radix(&mut dst[2..], addr as u64, 16, false);
    buf.advance(LEN);
}

/// Append `value` using `%.12g`
pub fn format_float<const N: usize>(buf: &mut FixedBuffer<N>, value: f64) {
    let mut scratch = Scratch::<MAX_NUMERIC_SIZE>::new();
    if value.is_sign_negative() {
        scratch.push_byte(b'-');
    }
    float_body(&mut scratch, unsigned(value), &FloatSpec::general(FLOAT_PRECISION));
    debug_assert!(!scratch.truncated());
    buf.append(scratch.as_bytes());
}

/// Write `value` in base `radix` into all of `dst`, zero-padded on the left
///
/// High digits that do not fit are lost.
pub fn fill_radix(dst: &mut [u8], mut value: u64, radix: u64, upper: bool) {
    let digits = if upper { DIGITS_UPPER } else { DIGITS_LOWER };
    for slot in dst.iter_mut().rev() {
        *slot = digits[(value % radix) as usize];
        value /= radix;
    }
}

/// Minimal base-`radix` digits of `value`, in a 22-byte scratch (enough for a `u64` in octal)
pub fn radix_digits(out: &mut [u8; 22], mut value: u64, radix: u64, upper: bool) -> &[u8] {
    let digits = if upper { DIGITS_UPPER } else { DIGITS_LOWER };
    let mut pos = out.len();
    loop {
        pos -= 1;
        out[pos] = digits[(value % radix) as usize];
        value /= radix;
        if value == 0 {
            break;
        }
    }
    &out[pos..]
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FloatStyle {
    /// `%f`
    Fixed,
    /// `%e`
    Exp,
    /// `%g`
    General,
}

#[derive(Clone, Copy, Debug)]
pub struct FloatSpec {
    pub style: FloatStyle,
    pub precision: usize,
    pub upper: bool,
    /// `#` flag: keep the decimal point, and for `%g` the trailing zeros
    pub alt: bool,
}

impl FloatSpec {
    pub const fn general(precision: usize) -> Self {
        Self {
            style: FloatStyle::General,
            precision,
            upper: false,
            alt: false,
        }
    }
}

/// `x` with its sign bit cleared
pub fn unsigned(x: f64) -> f64 {
    f64::from_bits(x.to_bits() & !(1 << 63))
}

/// Render the unsigned part of a float; the caller writes the sign
///
/// `x` must be non-negative or NaN.
pub fn float_body<const M: usize>(out: &mut Scratch<M>, x: f64, spec: &FloatSpec) {
    if x.is_nan() {
        out.push(if spec.upper { b"NAN" } else { b"nan" });
        return;
    }
    if x.is_infinite() {
        out.push(if spec.upper { b"INF" } else { b"inf" });
        return;
    }

    let precision = spec.precision.min(MAX_FLOAT_PRECISION);
    match spec.style {
        FloatStyle::Fixed => fixed(out, x, precision, spec.alt),
        FloatStyle::Exp => exp(out, x, precision, spec.upper, spec.alt),
        FloatStyle::General => general(out, x, precision, spec.upper, spec.alt),
    }
}

fn fixed<const M: usize>(out: &mut Scratch<M>, x: f64, precision: usize, alt: bool) {
    let _ = write!(out, "{x:.precision$}");
    if alt && precision == 0 {
        out.push_byte(b'.');
    }
}

/// `{:.*e}` split into mantissa and decimal exponent
fn exp_parts(x: f64, precision: usize) -> (Scratch<FLOAT_SCRATCH>, i32) {
    let mut tmp = Scratch::<FLOAT_SCRATCH>::new();
    let _ = write!(tmp, "{x:.precision$e}");

    let bytes = tmp.as_bytes();
    let Some(e) = bytes.iter().position(|&b| b == b'e') else {
        return (tmp, 0);
    };
    let exponent = core::str::from_utf8(&bytes[e + 1..])
        .ok()
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or(0);
    tmp.truncate(e);
    (tmp, exponent)
}

fn push_exponent<const M: usize>(out: &mut Scratch<M>, exponent: i32, upper: bool) {
    out.push_byte(if upper { b'E' } else { b'e' });
    out.push_byte(if exponent < 0 { b'-' } else { b'+' });
    let magnitude = exponent.unsigned_abs();
    if magnitude < 10 {
        out.push_byte(b'0');
    }
    out.push(itoa::Buffer::new().format(magnitude).as_bytes());
}

fn exp<const M: usize>(out: &mut Scratch<M>, x: f64, precision: usize, upper: bool, alt: bool) {
    let (mantissa, exponent) = exp_parts(x, precision);
    out.push(mantissa.as_bytes());
    if alt && precision == 0 {
        out.push_byte(b'.');
    }
    push_exponent(out, exponent, upper);
}

fn general<const M: usize>(out: &mut Scratch<M>, x: f64, precision: usize, upper: bool, alt: bool) {
    let p = precision.max(1);
    let (mantissa, exponent) = exp_parts(x, p - 1);

    if exponent >= -4 && (exponent as i64) < p as i64 {
        let mut tmp = Scratch::<FLOAT_SCRATCH>::new();
        fixed(&mut tmp, x, (p as i64 - 1 - exponent as i64) as usize, alt);
        if alt {
            out.push(tmp.as_bytes());
        } else {
            out.push(strip_fraction_zeros(tmp.as_bytes()));
        }
    } else {
        if alt {
            out.push(mantissa.as_bytes());
            if p == 1 {
                out.push_byte(b'.');
            }
        } else {
            out.push(strip_fraction_zeros(mantissa.as_bytes()));
        }
        push_exponent(out, exponent, upper);
    }
}

/// Drop trailing zeros after a decimal point, then the point itself if nothing follows it
fn strip_fraction_zeros(bytes: &[u8]) -> &[u8] {
    if !bytes.contains(&b'.') {
        return bytes;
    }
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == b'0' {
        end -= 1;
    }
    if end > 0 && bytes[end - 1] == b'.' {
        end -= 1;
    }
    &bytes[..end]
}
