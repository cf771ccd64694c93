//! Frozen C ABI over the checksum and echo operations.
//!
//! Every operation is an exported `extern "C"` symbol prefixed `xcall_`.
//!
//! # Argument conventions
//! - Booleans cross as `u8`.  Only `1` is true; any other byte is false.
//! - Text crosses as UTF-16 code units: `(*const u16, i32 len)`.
//! - Arrays cross as `(*const T, i32 len)`; boolean arrays as `*const u8`.
//! - A null pointer is the caller's null reference and must come with `len 0`.
//!
//! # Return convention
//! Checksum functions write the checksum through `out: *mut i64` and return a
//! status code from [`rc`].  On any failure nothing is written to `out`.
//! Reference echoes write the received pointer back through `out` the same way.
//!
//! # Stability contract
//! `XCALL_ABI_VERSION` only ever increases.  Parameter order of an exported
//! symbol is frozen; it is the same order the checksum mixes (except for
//! `xcall_probe`, whose attribute array is mixed last).
//!
//! # Memory model
//! Foreign buffers are borrowed for the duration of the call.  Nothing keeps a
//! pointer past return; boolean arrays are copied into a temporary that is
//! dropped before the function returns.

use thiserror::Error;
use tracing::error;

use crate::checksum::{variants, Checksum};
use crate::echo;

/// ABI version of this surface.
pub const XCALL_ABI_VERSION: u32 = 1;

/// Status codes returned by checksum and reference-echo functions.
pub mod rc {
    /// Success. The result was written through `out`.
    pub const OK:          i32 = 0;
    /// `out` was null.
    pub const NULL_OUT:    i32 = -1;
    /// A text or array length was negative.
    pub const BAD_LENGTH:  i32 = -2;
    /// A null buffer was passed with a non-zero length.
    pub const NULL_BUFFER: i32 = -3;
}

// ── Error type ───────────────────────────────────────────────────────────────

/// The boundary could not materialise a declared text or array argument.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    #[error("{slot}: negative length {len}")]
    NegativeLength { slot: &'static str, len: i32 },
    #[error("{slot}: null buffer declared with length {len}")]
    NullBuffer { slot: &'static str, len: i32 },
    #[error("null result pointer")]
    NullOut,
}

impl BoundaryError {
    pub fn code(&self) -> i32 {
        match self {
            BoundaryError::NegativeLength { .. } => rc::BAD_LENGTH,
            BoundaryError::NullBuffer { .. }     => rc::NULL_BUFFER,
            BoundaryError::NullOut               => rc::NULL_OUT,
        }
    }
}

// ── Borrowing helpers ────────────────────────────────────────────────────────

/// Borrow a foreign `(ptr, len)` pair.  `Ok(None)` is the caller's null.
///
/// # Safety
/// When `ptr` is non-null it must point to `len` initialised, properly
/// aligned `T`s that stay valid and unaliased by writers for `'a`.
pub unsafe fn borrow_slice<'a, T>(
    slot: &'static str,
    ptr:  *const T,
    len:  i32,
) -> Result<Option<&'a [T]>, BoundaryError> {
    if len < 0 {
        return Err(BoundaryError::NegativeLength { slot, len });
    }
    if ptr.is_null() {
        return if len == 0 {
            Ok(None)
        } else {
            Err(BoundaryError::NullBuffer { slot, len })
        };
    }
    // Safety: non-null, and the caller vouches for `len` valid elements.
    Ok(Some(unsafe { std::slice::from_raw_parts(ptr, len as usize) }))
}

/// Borrow a foreign boolean array, normalising each byte with the `== 1` rule.
///
/// # Safety
/// Same contract as [`borrow_slice`].
pub unsafe fn copy_bools(
    slot: &'static str,
    ptr:  *const u8,
    len:  i32,
) -> Result<Option<Vec<bool>>, BoundaryError> {
    let raw = unsafe { borrow_slice(slot, ptr, len)? };
    Ok(raw.map(|bytes| bytes.iter().map(|b| *b == 1).collect()))
}

#[inline]
fn flag(b: u8) -> bool { b == 1 }

/// Run `compute`, then write its checksum through `out`.
///
/// # Safety
/// `out`, when non-null, must be valid for one aligned `i64` write.
unsafe fn store(
    op:      &str,
    out:     *mut i64,
    compute: impl FnOnce() -> Result<Checksum, BoundaryError>,
) -> i32 {
    if out.is_null() {
        error!("{op}: {}", BoundaryError::NullOut);
        return rc::NULL_OUT;
    }
    match compute() {
        Ok(sum) => {
            // Safety: checked non-null above; validity is the caller's contract.
            unsafe { out.write(sum.as_i64()) };
            rc::OK
        }
        Err(e) => {
            error!("{op}: {e}");
            e.code()
        }
    }
}

/// Validate a reference and write the same pointer back through `out`.
///
/// # Safety
/// `out`, when non-null, must be valid for one aligned pointer write.
unsafe fn store_ptr<T>(
    op:   &str,
    out:  *mut *const T,
    echo: impl FnOnce() -> Result<Option<*const T>, BoundaryError>,
) -> i32 {
    if out.is_null() {
        error!("{op}: {}", BoundaryError::NullOut);
        return rc::NULL_OUT;
    }
    match echo() {
        Ok(p) => {
            // Safety: checked non-null above.
            unsafe { out.write(p.unwrap_or(std::ptr::null())) };
            rc::OK
        }
        Err(e) => {
            error!("{op}: {e}");
            e.code()
        }
    }
}

// ── Exported symbols ─────────────────────────────────────────────────────────

#[no_mangle]
pub extern "C" fn xcall_abi_version() -> u32 {
    XCALL_ABI_VERSION
}

/// # Safety
/// `java_attrs` follows the array convention; `out` must be writable.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn xcall_probe(
    ptr:             i64,
    theme_ptr:       i64,
    def_style_attr:  i32,
    def_style_resid: i32,
    xml_parser_ptr:  i64,
    java_attrs:      *const i32,
    java_attrs_len:  i32,
    out_values_ptr:  i64,
    out_indices_ptr: i64,
    out:             *mut i64,
) -> i32 {
    unsafe {
        store("xcall_probe", out, || {
            let attrs = borrow_slice("java_attrs", java_attrs, java_attrs_len)?;
            Ok(variants::probe(
                ptr, theme_ptr, def_style_attr, def_style_resid, xml_parser_ptr,
                attrs, out_values_ptr, out_indices_ptr,
            ))
        })
    }
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn xcall_multi_primitive_checksum(
    bool_value:   u8,
    byte_value:   i8,
    char_value:   u16,
    short_value:  i16,
    int_value:    i32,
    long_value:   i64,
    float_value:  f32,
    double_value: f64,
    out:          *mut i64,
) -> i32 {
    unsafe {
        store("xcall_multi_primitive_checksum", out, || {
            Ok(variants::multi_primitive(
                flag(bool_value), byte_value, char_value, short_value,
                int_value, long_value, float_value, double_value,
            ))
        })
    }
}

/// # Safety
/// Every `(ptr, len)` pair follows the array convention; `out` must be writable.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn xcall_mixed_reference_checksum(
    flag_value: u8,
    text:       *const u16,
    text_len:   i32,
    ints:       *const i32,
    ints_len:   i32,
    longs:      *const i64,
    longs_len:  i32,
    bools:      *const u8,
    bools_len:  i32,
    out:        *mut i64,
) -> i32 {
    unsafe {
        store("xcall_mixed_reference_checksum", out, || {
            // Every reference is materialised before anything is mixed.
            let text  = borrow_slice("text", text, text_len)?;
            let ints  = borrow_slice("ints", ints, ints_len)?;
            let longs = borrow_slice("longs", longs, longs_len)?;
            let bools = copy_bools("bools", bools, bools_len)?;
            Ok(variants::mixed_reference(
                flag(flag_value), text, ints, longs, bools.as_deref(),
            ))
        })
    }
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xcall_combo_checksum3(a: i32, b: i64, c: f64, out: *mut i64) -> i32 {
    unsafe { store("xcall_combo_checksum3", out, || Ok(variants::combo3(a, b, c))) }
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xcall_combo_checksum5(
    flag_value: u8, b: i8, s: i16, i: i32, l: i64,
    out: *mut i64,
) -> i32 {
    unsafe {
        store("xcall_combo_checksum5", out, || {
            Ok(variants::combo5(flag(flag_value), b, s, i, l))
        })
    }
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn xcall_combo_checksum7(
    f1: f32, d1: f64, l1: i64, i1: i32, s1: i16, b1: i8, flag_value: u8,
    out: *mut i64,
) -> i32 {
    unsafe {
        store("xcall_combo_checksum7", out, || {
            Ok(variants::combo7(f1, d1, l1, i1, s1, b1, flag(flag_value)))
        })
    }
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn xcall_combo_checksum9(
    a1: i32, a2: i32, l1: i64, l2: i64, f1: f32, f2: f32, d1: f64, d2: f64, flag_value: u8,
    out: *mut i64,
) -> i32 {
    unsafe {
        store("xcall_combo_checksum9", out, || {
            Ok(variants::combo9(a1, a2, l1, l2, f1, f2, d1, d2, flag(flag_value)))
        })
    }
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn xcall_combo_checksum13(
    l1: i64, l2: i64, l3: i64, l4: i64, l5: i64,
    i1: i32, i2: i32, i3: i32,
    s1: i16, s2: i16,
    b1: i8,
    flag_value: u8,
    d1: f64,
    out: *mut i64,
) -> i32 {
    unsafe {
        store("xcall_combo_checksum13", out, || {
            Ok(variants::combo13(
                l1, l2, l3, l4, l5, i1, i2, i3, s1, s2, b1, flag(flag_value), d1,
            ))
        })
    }
}

/// # Safety
/// `out` must be writable.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn xcall_combo_checksum20(
    p1: i64, p2: i64, p3: i64, p4: i64, p5: i64,
    p6: i64, p7: i64, p8: i64, p9: i64, p10: i64,
    i1: i32, i2: i32, i3: i32, i4: i32, i5: i32,
    s1: i16, s2: i16,
    b1: i8, b2: i8,
    flag_value: u8,
    out: *mut i64,
) -> i32 {
    unsafe {
        store("xcall_combo_checksum20", out, || {
            Ok(variants::combo20(
                p1, p2, p3, p4, p5, p6, p7, p8, p9, p10,
                i1, i2, i3, i4, i5, s1, s2, b1, b2, flag(flag_value),
            ))
        })
    }
}

// ── Scalar echoes ────────────────────────────────────────────────────────────

/// Returns the received byte itself, so non-canonical booleans survive.
#[no_mangle]
pub extern "C" fn xcall_echo_bool(value: u8) -> u8 {
    echo::echo_bool(flag(value));
    value
}

#[no_mangle]
pub extern "C" fn xcall_echo_byte(value: i8) -> i8 { echo::echo_byte(value) }

#[no_mangle]
pub extern "C" fn xcall_echo_char(value: u16) -> u16 { echo::echo_char(value) }

#[no_mangle]
pub extern "C" fn xcall_echo_short(value: i16) -> i16 { echo::echo_short(value) }

#[no_mangle]
pub extern "C" fn xcall_echo_int(value: i32) -> i32 { echo::echo_int(value) }

#[no_mangle]
pub extern "C" fn xcall_echo_long(value: i64) -> i64 { echo::echo_long(value) }

#[no_mangle]
pub extern "C" fn xcall_echo_float(value: f32) -> f32 { echo::echo_float(value) }

#[no_mangle]
pub extern "C" fn xcall_echo_double(value: f64) -> f64 { echo::echo_double(value) }

// ── Reference echoes ─────────────────────────────────────────────────────────

/// # Safety
/// `(value, len)` follows the text convention; `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xcall_echo_text(value: *const u16, len: i32, out: *mut *const u16) -> i32 {
    unsafe {
        store_ptr("xcall_echo_text", out, || {
            let text = borrow_slice("text", value, len)?;
            Ok(echo::echo_text(text).map(|t| t.as_ptr()))
        })
    }
}

/// # Safety
/// `(value, len)` follows the array convention; `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xcall_echo_byte_array(value: *const i8, len: i32, out: *mut *const i8) -> i32 {
    unsafe {
        store_ptr("xcall_echo_byte_array", out, || {
            let arr = borrow_slice("array", value, len)?;
            Ok(echo::echo_byte_array(arr).map(|a| a.as_ptr()))
        })
    }
}

/// # Safety
/// `(value, len)` follows the array convention; `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xcall_echo_int_array(value: *const i32, len: i32, out: *mut *const i32) -> i32 {
    unsafe {
        store_ptr("xcall_echo_int_array", out, || {
            let arr = borrow_slice("array", value, len)?;
            Ok(echo::echo_int_array(arr).map(|a| a.as_ptr()))
        })
    }
}

/// # Safety
/// `(value, len)` follows the array convention; `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xcall_echo_long_array(value: *const i64, len: i32, out: *mut *const i64) -> i32 {
    unsafe {
        store_ptr("xcall_echo_long_array", out, || {
            let arr = borrow_slice("array", value, len)?;
            Ok(echo::echo_long_array(arr).map(|a| a.as_ptr()))
        })
    }
}

/// The buffer handed back is the caller's own, bytes untouched.
///
/// # Safety
/// `(value, len)` follows the array convention; `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xcall_echo_bool_array(value: *const u8, len: i32, out: *mut *const u8) -> i32 {
    unsafe {
        store_ptr("xcall_echo_bool_array", out, || {
            let raw = borrow_slice("array", value, len)?;
            let bools = copy_bools("array", value, len)?;
            echo::echo_bool_array(bools.as_deref());
            Ok(raw.map(|a| a.as_ptr()))
        })
    }
}
