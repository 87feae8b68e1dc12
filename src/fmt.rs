//! printf-style rendering of a single numeric value
//!
//! A pattern is literal text around exactly one conversion:
//!
//! ```text
//! %[flags][width][.precision][length]conversion
//!
//! flags       - + space 0 #
//! length      h hh l ll L q j z t   (accepted and ignored)
//! conversion  d i u x X o c f F e E g G
//! ```
//!
//! `%%` is a literal percent sign.  The caller picks a pattern/value pair whose output is
//! shorter than [`FMT_SIZE`]; debug builds panic when it is not, or when the pattern does not
//! suit the value.

use crate::constants::FMT_SIZE;
use crate::num::{FLOAT_SCRATCH, FloatSpec, FloatStyle, float_body, radix_digits, unsigned};
use crate::util::Scratch;

/// A numeric value as `Fmt` sees it
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Arg {
    Int {
        negative: bool,
        magnitude: u64,
        /// Width of the source type, for two's complement reinterpretation by `%u`/`%x`/`%o`
        bits: u32,
    },
    Float(f64),
}

/// Types [`Fmt`] can render
pub trait FmtArg: Copy {
    fn into_arg(self) -> Arg;
}

macro_rules! fmt_arg_signed {
    ($($t:ty)*) => {$(
        impl FmtArg for $t {
            fn into_arg(self) -> Arg {
                Arg::Int {
                    negative: self < 0,
                    magnitude: self.unsigned_abs() as u64,
                    bits: <$t>::BITS,
                }
            }
        }
    )*};
}

macro_rules! fmt_arg_unsigned {
    ($($t:ty)*) => {$(
        impl FmtArg for $t {
            fn into_arg(self) -> Arg {
                Arg::Int {
                    negative: false,
                    magnitude: self as u64,
                    bits: <$t>::BITS,
                }
            }
        }
    )*};
}

fmt_arg_signed!(i8 i16 i32 i64 isize);
fmt_arg_unsigned!(u8 u16 u32 u64 usize);

impl FmtArg for f64 {
    fn into_arg(self) -> Arg {
        Arg::Float(self)
    }
}

impl FmtArg for f32 {
    fn into_arg(self) -> Arg {
        Arg::Float(f64::from(self))
    }
}

/// One value rendered through a printf-style pattern into a 32-byte scratch
#[derive(Clone, Copy)]
pub struct Fmt {
    buf: [u8; FMT_SIZE],
    len: usize,
}

impl Fmt {
    pub fn new<T: FmtArg>(pattern: &str, value: T) -> Self {
        let mut out = Scratch::<FMT_SIZE>::new();
        render_pattern(&mut out, pattern.as_bytes(), value.into_arg());

        debug_assert!(
            out.needed() < FMT_SIZE,
            "Fmt pattern {pattern:?} rendered {} bytes, limit is {}",
            out.needed(),
            FMT_SIZE - 1
        );

        let len = out.len().min(FMT_SIZE - 1);
        let mut buf = [0u8; FMT_SIZE];
        buf[..len].copy_from_slice(&out.as_bytes()[..len]);
        Self { buf, len }
    }

    /// Like [`Fmt::new`], and debug builds also check the rendering is exactly `len` bytes
    pub fn with_len<T: FmtArg>(pattern: &str, value: T, len: usize) -> Self {
        let fmt = Self::new(pattern, value);
        debug_assert_eq!(fmt.len, len, "Fmt pattern {pattern:?} length mismatch");
        fmt
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl core::fmt::Debug for Fmt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.as_str() {
            Some(s) => f.debug_tuple("Fmt").field(&s).finish(),
            None => f.debug_tuple("Fmt").field(&self.as_bytes()).finish(),
        }
    }
}

const CONVERSIONS: &[u8] = b"diuxXocfFeEgG";

#[derive(Default, Debug)]
struct Conversion {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alt: bool,
    width: usize,
    precision: Option<usize>,
    kind: u8,
}

fn render_pattern<const M: usize>(out: &mut Scratch<M>, pattern: &[u8], arg: Arg) {
    let mut conversions = 0usize;
    let mut i = 0;

    while i < pattern.len() {
        if pattern[i] != b'%' {
            let end = pattern[i..]
                .iter()
                .position(|&b| b == b'%')
                .map_or(pattern.len(), |p| i + p);
            out.push(&pattern[i..end]);
            i = end;
            continue;
        }

        if pattern.get(i + 1) == Some(&b'%') {
            out.push_byte(b'%');
            i += 2;
            continue;
        }

        let (conversion, next) = parse_conversion(pattern, i + 1);
        i = next;
        debug_assert!(
            conversion.is_some(),
            "Fmt pattern has an unsupported conversion"
        );
        debug_assert!(conversions == 0, "Fmt pattern has more than one conversion");
        if let (Some(conversion), 0) = (conversion, conversions) {
            render_conversion(out, &conversion, arg);
        }
        conversions += 1;
    }

    debug_assert!(conversions > 0, "Fmt pattern has no conversion");
}

/// Parse after a `%`.  Returns the conversion, if valid, and the index just past it.
fn parse_conversion(pattern: &[u8], mut i: usize) -> (Option<Conversion>, usize) {
    let mut conversion = Conversion::default();

    while let Some(&flag) = pattern.get(i) {
        match flag {
            b'-' => conversion.left = true,
            b'+' => conversion.plus = true,
            b' ' => conversion.space = true,
            b'0' => conversion.zero = true,
            b'#' => conversion.alt = true,
            _ => break,
        }
        i += 1;
    }

    (conversion.width, i) = parse_number(pattern, i);

    if pattern.get(i) == Some(&b'.') {
        let (precision, next) = parse_number(pattern, i + 1);
        conversion.precision = Some(precision);
        i = next;
    }

    while matches!(
        pattern.get(i),
        Some(b'h' | b'l' | b'L' | b'q' | b'j' | b'z' | b't')
    ) {
        i += 1;
    }

    match pattern.get(i) {
        Some(&kind) if CONVERSIONS.contains(&kind) => {
            conversion.kind = kind;
            (Some(conversion), i + 1)
        }
        Some(_) => (None, i + 1),
        None => (None, i),
    }
}

fn parse_number(pattern: &[u8], mut i: usize) -> (usize, usize) {
    let mut value = 0usize;
    while let Some(digit) = pattern.get(i).filter(|b| b.is_ascii_digit()) {
        value = value
            .saturating_mul(10)
            .saturating_add((digit - b'0') as usize);
        i += 1;
    }
    (value, i)
}

fn render_conversion<const M: usize>(out: &mut Scratch<M>, conversion: &Conversion, arg: Arg) {
    match conversion.kind {
        b'f' | b'F' | b'e' | b'E' | b'g' | b'G' => render_float(out, conversion, arg),
        b'c' => render_char(out, conversion, arg),
        _ => render_int(out, conversion, arg),
    }
}

fn int_parts(arg: Arg) -> (bool, u64, u32) {
    debug_assert!(
        matches!(arg, Arg::Int { .. }),
        "Fmt integer conversion given a float"
    );
    match arg {
        Arg::Int {
            negative,
            magnitude,
            bits,
        } => (negative, magnitude, bits),
        Arg::Float(value) => {
            // Truncates toward zero, saturating
            let truncated = value as i64;
            (truncated < 0, truncated.unsigned_abs(), u64::BITS)
        }
    }
}

/// Two's complement bits of a signed value at its own width
fn as_unsigned(negative: bool, magnitude: u64, bits: u32) -> u64 {
    if !negative {
        return magnitude;
    }
    let mask = if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    };
    magnitude.wrapping_neg() & mask
}

fn render_int<const M: usize>(out: &mut Scratch<M>, conversion: &Conversion, arg: Arg) {
    let (negative, magnitude, bits) = int_parts(arg);

    let signed = matches!(conversion.kind, b'd' | b'i');
    let value = if signed {
        magnitude
    } else {
        as_unsigned(negative, magnitude, bits)
    };

    let sign: &[u8] = match (signed, negative) {
        (true, true) => b"-",
        (true, false) if conversion.plus => b"+",
        (true, false) if conversion.space => b" ",
        _ => b"",
    };

    let mut itoa_buf = itoa::Buffer::new();
    let mut radix_buf = [0u8; 22];
    let mut digits: &[u8] = match conversion.kind {
        b'x' => radix_digits(&mut radix_buf, value, 16, false),
        b'X' => radix_digits(&mut radix_buf, value, 16, true),
        b'o' => radix_digits(&mut radix_buf, value, 8, false),
        _ => itoa_buf.format(value).as_bytes(),
    };

    if conversion.precision == Some(0) && value == 0 {
        digits = b"";
    }

    let mut zeros = conversion
        .precision
        .map_or(0, |p| p.saturating_sub(digits.len()));
    if conversion.alt && conversion.kind == b'o' && zeros == 0 && digits.first() != Some(&b'0') {
        zeros = 1;
    }

    let prefix: &[u8] = match conversion.kind {
        b'x' if conversion.alt && value != 0 => b"0x",
        b'X' if conversion.alt && value != 0 => b"0X",
        _ => b"",
    };

    let content = sign.len() + prefix.len() + zeros + digits.len();
    let pad = conversion.width.saturating_sub(content);
    let zero_pad = conversion.zero && !conversion.left && conversion.precision.is_none();

    if !conversion.left && !zero_pad {
        out.fill(b' ', pad);
    }
    out.push(sign);
    out.push(prefix);
    if zero_pad {
        out.fill(b'0', pad);
    }
    out.fill(b'0', zeros);
    out.push(digits);
    if conversion.left {
        out.fill(b' ', pad);
    }
}

fn render_char<const M: usize>(out: &mut Scratch<M>, conversion: &Conversion, arg: Arg) {
    let (negative, magnitude, bits) = int_parts(arg);
    let byte = as_unsigned(negative, magnitude, bits) as u8;
    let pad = conversion.width.saturating_sub(1);

    if !conversion.left {
        out.fill(b' ', pad);
    }
    out.push_byte(byte);
    if conversion.left {
        out.fill(b' ', pad);
    }
}

fn render_float<const M: usize>(out: &mut Scratch<M>, conversion: &Conversion, arg: Arg) {
    debug_assert!(
        matches!(arg, Arg::Float(_)),
        "Fmt float conversion given an integer"
    );
    let value = match arg {
        Arg::Float(value) => value,
        Arg::Int {
            negative,
            magnitude,
            ..
        } => {
            let value = magnitude as f64;
            if negative { -value } else { value }
        }
    };

    let style = match conversion.kind {
        b'f' | b'F' => FloatStyle::Fixed,
        b'e' | b'E' => FloatStyle::Exp,
        _ => FloatStyle::General,
    };
    let spec = FloatSpec {
        style,
        precision: conversion.precision.unwrap_or(6),
        upper: conversion.kind.is_ascii_uppercase(),
        alt: conversion.alt,
    };

    let mut body = Scratch::<FLOAT_SCRATCH>::new();
    float_body(&mut body, unsigned(value), &spec);

    let sign: &[u8] = if value.is_sign_negative() {
        b"-"
    } else if conversion.plus {
        b"+"
    } else if conversion.space {
        b" "
    } else {
        b""
    };

    let content = sign.len() + body.needed();
    let pad = conversion.width.saturating_sub(content);
    let zero_pad = conversion.zero && !conversion.left && value.is_finite();

    if !conversion.left && !zero_pad {
        out.fill(b' ', pad);
    }
    out.push(sign);
    if zero_pad {
        out.fill(b'0', pad);
    }
    out.push(body.as_bytes());
    if body.truncated() {
        // Keep `needed` honest for the overflow check
        out.fill(b'0', body.needed() - body.len());
    }
    if conversion.left {
        out.fill(b' ', pad);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt<T: FmtArg>(pattern: &str, value: T) -> Fmt {
        Fmt::new(pattern, value)
    }

    #[test]
    fn test_hex() {
        let f = fmt("%x", 255);
        assert_eq!(f.as_bytes(), b"ff");
        assert_eq!(f.len(), 2);
        assert_eq!(fmt("%X", 255u8).as_bytes(), b"FF");
        assert_eq!(fmt("%#x", 255).as_bytes(), b"0xff");
        assert_eq!(fmt("%#x", 0).as_bytes(), b"0");
        assert_eq!(fmt("%08x", 0xbeefu32).as_bytes(), b"0000beef");
        assert_eq!(fmt("%#010x", 0xbeefu32).as_bytes(), b"0x0000beef");
        assert_eq!(fmt("%lx", u64::MAX).as_bytes(), b"ffffffffffffffff");
    }

    #[test]
    fn test_negative_reinterpreted_at_own_width() {
        assert_eq!(fmt("%x", -1i8).as_bytes(), b"ff");
        assert_eq!(fmt("%x", -1i16).as_bytes(), b"ffff");
        assert_eq!(fmt("%x", -1i32).as_bytes(), b"ffffffff");
        assert_eq!(fmt("%u", -1i32).as_bytes(), b"4294967295");
        assert_eq!(fmt("%o", -1i8).as_bytes(), b"377");
        assert_eq!(fmt("%x", i64::MIN).as_bytes(), b"8000000000000000");
    }

    #[test]
    fn test_decimal() {
        assert_eq!(fmt("%d", 42).as_bytes(), b"42");
        assert_eq!(fmt("%i", -42).as_bytes(), b"-42");
        assert_eq!(fmt("%d", i64::MIN).as_bytes(), b"-9223372036854775808");
        assert_eq!(fmt("%+d", 5).as_bytes(), b"+5");
        assert_eq!(fmt("% d", 5).as_bytes(), b" 5");
        assert_eq!(fmt("%5d", -42).as_bytes(), b"  -42");
        assert_eq!(fmt("%-5d|", 42).as_bytes(), b"42   |");
        assert_eq!(fmt("%05d", -42).as_bytes(), b"-0042");
        assert_eq!(fmt("%.4d", 7).as_bytes(), b"0007");
        assert_eq!(fmt("%6.3d", 7).as_bytes(), b"   007");
        assert_eq!(fmt("%.0d", 0).as_bytes(), b"");
        assert_eq!(fmt("%hd", 12i16).as_bytes(), b"12");
        assert_eq!(fmt("%llu", 12u64).as_bytes(), b"12");
        assert_eq!(fmt("%zu", 12usize).as_bytes(), b"12");
    }

    #[test]
    fn test_octal() {
        assert_eq!(fmt("%o", 8).as_bytes(), b"10");
        assert_eq!(fmt("%#o", 8).as_bytes(), b"010");
        assert_eq!(fmt("%#o", 0).as_bytes(), b"0");
    }

    #[test]
    fn test_char() {
        assert_eq!(fmt("%c", b'A').as_bytes(), b"A");
        assert_eq!(fmt("[%3c]", 65).as_bytes(), b"[  A]");
        assert_eq!(fmt("[%-3c]", 65).as_bytes(), b"[A  ]");
    }

    #[test]
    fn test_fixed() {
        let f = fmt("%.2f", 3.14);
        assert_eq!(f.as_bytes(), b"3.14");
        assert_eq!(f.len(), 4);
        assert_eq!(fmt("%f", 1.5).as_bytes(), b"1.500000");
        assert_eq!(fmt("%.0f", 2.4).as_bytes(), b"2");
        assert_eq!(fmt("%#.0f", 2.4).as_bytes(), b"2.");
        assert_eq!(fmt("%8.3f", -1.5).as_bytes(), b"  -1.500");
        assert_eq!(fmt("%08.3f", -1.5).as_bytes(), b"-001.500");
        assert_eq!(fmt("%-8.1f|", 1.5).as_bytes(), b"1.5     |");
        assert_eq!(fmt("%+.1f", 1.5f32).as_bytes(), b"+1.5");
        assert_eq!(fmt("%.1f", -0.0).as_bytes(), b"-0.0");
    }

    #[test]
    fn test_exp_and_general() {
        assert_eq!(fmt("%e", 1500.0).as_bytes(), b"1.500000e+03");
        assert_eq!(fmt("%.1E", 0.00015).as_bytes(), b"1.5E-04");
        assert_eq!(fmt("%g", 0.0001).as_bytes(), b"0.0001");
        assert_eq!(fmt("%g", 1e-5).as_bytes(), b"1e-05");
        assert_eq!(fmt("%g", 123456.0).as_bytes(), b"123456");
        assert_eq!(fmt("%g", 1234567.0).as_bytes(), b"1.23457e+06");
        assert_eq!(fmt("%G", 1e-10).as_bytes(), b"1E-10");
        assert_eq!(fmt("%.3g", 3.14159).as_bytes(), b"3.14");
        assert_eq!(fmt("%.0g", 3.9).as_bytes(), b"4");
        assert_eq!(fmt("%#g", 1.5).as_bytes(), b"1.50000");
        assert_eq!(fmt("%.12g", 0.1).as_bytes(), b"0.1");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(fmt("%f", f64::INFINITY).as_bytes(), b"inf");
        assert_eq!(fmt("%F", f64::NEG_INFINITY).as_bytes(), b"-INF");
        assert_eq!(fmt("%e", f64::NAN).as_bytes(), b"nan");
        assert_eq!(fmt("%05f", f64::INFINITY).as_bytes(), b"  inf");
    }

    #[test]
    fn test_literal_text_and_percent() {
        assert_eq!(fmt("load=%.1f%%", 99.5).as_bytes(), b"load=99.5%");
        assert_eq!(fmt("[%d]", 1).as_str(), Some("[1]"));
    }

    #[test]
    fn test_with_len() {
        assert_eq!(Fmt::with_len("%4d", 1, 4).as_bytes(), b"   1");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "length mismatch")]
    fn test_with_len_mismatch_panics_in_debug() {
        let _ = Fmt::with_len("%d", 100, 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "limit is 31")]
    fn test_overflow_panics_in_debug() {
        let _ = Fmt::new("%.2f", 1e300);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_overflow_truncates_in_release() {
        let f = Fmt::new("%.2f", 1e300);
        assert_eq!(f.len(), FMT_SIZE - 1);
        assert!(f.as_bytes().starts_with(b"1000000000"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no conversion")]
    fn test_missing_conversion_panics_in_debug() {
        let _ = Fmt::new("plain", 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unsupported conversion")]
    fn test_unknown_conversion_panics_in_debug() {
        let _ = Fmt::new("%y", 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "integer conversion given a float")]
    fn test_type_mismatch_panics_in_debug() {
        let _ = Fmt::new("%d", 1.5);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_type_mismatch_coerces_in_release() {
        assert_eq!(Fmt::new("%d", -1.9).as_bytes(), b"-1");
        assert_eq!(Fmt::new("%.1f", 2).as_bytes(), b"2.0");
    }

    #[test]
    fn test_rendered_length_always_below_scratch() {
        for value in [i64::MIN, i64::MAX, 0, -1] {
            assert!(fmt("%d", value).len() < FMT_SIZE);
            assert!(fmt("%x", value).len() < FMT_SIZE);
        }
        assert!(fmt("%o", u64::MAX).len() < FMT_SIZE);
    }
}
