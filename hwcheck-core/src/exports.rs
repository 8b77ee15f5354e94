// ============================================================================
// hwcheck-core/src/exports.rs
// ============================================================================
//
// EXTERNAL ENTRY POINTS: C-ABI functions for the host application
//
// These keep the integer conventions the host application expects: 0/1
// capability flags written through out-pointers, a bare u64 signature, and
// 0 / -1 for parent-watch setup. None of them can fail in a way the caller
// has to handle beyond the return code.

use crate::capabilities::{HardwareCapabilities, check_all_capabilities, get_capability_signature};
use crate::parent_watch::{self, SetupError};

/// Writes the four hardware codec flags (0 or 1) through the given pointers.
///
/// Null pointers are skipped. On platforms without a hardware video framework
/// all four flags are 0.
///
/// # Safety
///
/// Each non-null pointer must be valid for a write of one `i32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn check_videotoolbox_support(
    h264_encoder: *mut i32,
    h265_encoder: *mut i32,
    h264_decoder: *mut i32,
    h265_decoder: *mut i32,
) {
    let caps = check_all_capabilities();
    unsafe { write_flags(&caps, h264_encoder, h265_encoder, h264_decoder, h265_decoder) };
}

/// Returns the packed hardware codec capability signature.
#[unsafe(no_mangle)]
pub extern "C" fn get_hwcodec_gpu_signature() -> u64 {
    get_capability_signature()
}

/// Arms the parent-liveness monitor. Returns 0 on success, -1 on failure.
///
/// Failures are logged where they happen; the caller decides whether running
/// without the monitor is acceptable.
#[unsafe(no_mangle)]
pub extern "C" fn setup_parent_death_signal() -> i32 {
    status_code(&parent_watch::setup_parent_death_signal())
}

/// Maps a setup result onto the 0 / -1 convention.
#[must_use]
pub fn status_code(result: &Result<(), SetupError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

/// Writes each flag as 0 or 1 through its pointer, skipping nulls.
///
/// # Safety
///
/// Each non-null pointer must be valid for a write of one `i32`.
pub unsafe fn write_flags(
    caps: &HardwareCapabilities,
    h264_encoder: *mut i32,
    h265_encoder: *mut i32,
    h264_decoder: *mut i32,
    h265_decoder: *mut i32,
) {
    let outputs = [
        (h264_encoder, caps.h264_encoder),
        (h265_encoder, caps.h265_encoder),
        (h264_decoder, caps.h264_decoder),
        (h265_decoder, caps.h265_decoder),
    ];
    for (ptr, present) in outputs {
        if !ptr.is_null() {
            unsafe { ptr.write(i32::from(present)) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::ptr;

    #[test]
    fn write_flags_emits_zero_or_one() {
        let caps = HardwareCapabilities {
            h264_encoder: true,
            h265_encoder: false,
            h264_decoder: true,
            h265_decoder: false,
        };
        let (mut a, mut b, mut c, mut d) = (-7, -7, -7, -7);
        unsafe { write_flags(&caps, &mut a, &mut b, &mut c, &mut d) };
        assert_eq!((a, b, c, d), (1, 0, 1, 0));
    }

    #[test]
    fn write_flags_skips_null_pointers() {
        let caps = HardwareCapabilities {
            h264_encoder: true,
            h265_encoder: true,
            h264_decoder: true,
            h265_decoder: true,
        };
        let mut only = 0;
        unsafe {
            write_flags(
                &caps,
                ptr::null_mut(),
                &mut only,
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };
        assert_eq!(only, 1);
    }

    #[test]
    fn status_code_follows_convention() {
        assert_eq!(status_code(&Ok(())), 0);
        let err = SetupError::QueueCreation(io::Error::from(io::ErrorKind::Unsupported));
        assert_eq!(status_code(&Err(err)), -1);
    }

    #[test]
    fn c_signature_matches_library_signature() {
        assert_eq!(get_hwcodec_gpu_signature(), get_capability_signature());
    }
}
