use core::ffi::c_char;

/// Zero every byte of `buf`
pub fn memzero(buf: &mut [u8]) {
    unsafe { core::ptr::write_bytes(buf.as_mut_ptr(), 0, buf.len()) };
}

/// Count the bytes before the terminating NUL of a C string
///
/// A null pointer has length 0.
///
/// # Safety
/// - `s` must be null or point to a readable, NUL-terminated sequence of bytes.
pub unsafe fn strlen(s: *const c_char) -> usize {
    if s.is_null() {
        return 0;
    }

    let mut len = 0usize;
    // SAFETY: Caller guarantees `s` points to a valid C string.
    unsafe {
        while *s.add(len) != 0 {
            len += 1;
        }
    }
    len
}
