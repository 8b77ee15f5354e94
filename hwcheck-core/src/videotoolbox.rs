//! `VideoToolbox` backend for the capability prober (macOS only).
//!
//! Encoder availability is asked with
//! `VTCopySupportedPropertyDictionaryForEncoder` at the reference
//! resolution, restricted to hardware encoders through
//! `kVTVideoEncoderSpecification_RequireHardwareAcceleratedVideoEncoder`.
//! That key is resolved at runtime; OS versions that lack it get the query
//! without the hint. Decoder availability is `VTIsHardwareDecodeSupported`,
//! returned as is.

#![allow(non_upper_case_globals)]
#![allow(non_snake_case)]

use crate::capabilities::{CodecBackend, EncoderQuery, EncoderQueryStatus};
use crate::codec::CodecKind;
use core_foundation_sys::base::{Boolean, CFRelease, CFTypeRef, OSStatus, kCFAllocatorDefault};
use core_foundation_sys::dictionary::{
    CFDictionaryCreateMutable, CFDictionaryRef, CFDictionarySetValue, CFMutableDictionaryRef,
    kCFTypeDictionaryKeyCallBacks, kCFTypeDictionaryValueCallBacks,
};
use core_foundation_sys::number::kCFBooleanTrue;
use core_foundation_sys::string::CFStringRef;
use std::ffi::{CStr, c_void};
use std::ptr;

/// `CMVideoCodecType`
type CMVideoCodecType = u32;

/// `kVTCouldNotFindVideoEncoderErr`
pub const kVTCouldNotFindVideoEncoderErr: OSStatus = -12908;

const noErr: OSStatus = 0;

const REQUIRE_HARDWARE_KEY: &CStr =
    c"kVTVideoEncoderSpecification_RequireHardwareAcceleratedVideoEncoder";

#[link(name = "VideoToolbox", kind = "framework")]
unsafe extern "C" {
    fn VTCopySupportedPropertyDictionaryForEncoder(
        width: i32,
        height: i32,
        codecType: CMVideoCodecType,
        encoderSpecification: CFDictionaryRef,
        encoderIDOut: *mut CFStringRef,
        supportedPropertiesOut: *mut CFDictionaryRef,
    ) -> OSStatus;

    fn VTIsHardwareDecodeSupported(codecType: CMVideoCodecType) -> Boolean;
}

/// Reads a `CFStringRef` constant exported by a loaded framework.
///
/// Returns `None` when the symbol does not exist in this OS version.
fn lookup_cfstring_constant(name: &CStr) -> Option<CFStringRef> {
    let symbol = unsafe { libc::dlsym(libc::RTLD_DEFAULT, name.as_ptr()) };
    if symbol.is_null() {
        return None;
    }
    // SAFETY: the symbol is the address of a `const CFStringRef` global.
    let value = unsafe { *(symbol as *const CFStringRef) };
    (!value.is_null()).then_some(value)
}

/// Owns one CoreFoundation reference and releases it on drop.
struct CfOwned(CFTypeRef);

impl CfOwned {
    fn as_ptr(&self) -> CFTypeRef {
        self.0
    }
}

impl Drop for CfOwned {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { CFRelease(self.0) };
        }
    }
}

/// Capability backend backed by Apple's `VideoToolbox` framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoToolboxBackend;

impl VideoToolboxBackend {
    fn encoder_specification() -> Option<CfOwned> {
        let spec: CFMutableDictionaryRef = unsafe {
            CFDictionaryCreateMutable(
                kCFAllocatorDefault,
                0,
                &kCFTypeDictionaryKeyCallBacks,
                &kCFTypeDictionaryValueCallBacks,
            )
        };
        if spec.is_null() {
            return None;
        }
        let spec = CfOwned(spec as CFTypeRef);
        match lookup_cfstring_constant(REQUIRE_HARDWARE_KEY) {
            Some(key) => unsafe {
                CFDictionarySetValue(
                    spec.as_ptr() as CFMutableDictionaryRef,
                    key as *const c_void,
                    kCFBooleanTrue as *const c_void,
                );
            },
            None => log::debug!("Hardware-only encoder hint unavailable; querying without it"),
        }
        Some(spec)
    }
}

impl CodecBackend for VideoToolboxBackend {
    fn query_encoder_capability(&self, query: &EncoderQuery) -> EncoderQueryStatus {
        let Some(spec) = Self::encoder_specification() else {
            log::debug!("CFDictionaryCreateMutable failed for the encoder specification");
            return EncoderQueryStatus::Failed(-1);
        };

        let mut encoder_id: CFStringRef = ptr::null();
        let mut properties: CFDictionaryRef = ptr::null();
        let status = unsafe {
            VTCopySupportedPropertyDictionaryForEncoder(
                query.width,
                query.height,
                query.codec.fourcc(),
                spec.as_ptr() as CFDictionaryRef,
                &mut encoder_id,
                &mut properties,
            )
        };
        let _encoder_id = CfOwned(encoder_id as CFTypeRef);
        let _properties = CfOwned(properties as CFTypeRef);

        match status {
            noErr => EncoderQueryStatus::Supported,
            kVTCouldNotFindVideoEncoderErr => EncoderQueryStatus::NoEncoderFound,
            other => EncoderQueryStatus::Failed(other),
        }
    }

    fn query_decoder_capability(&self, codec: CodecKind) -> bool {
        unsafe { VTIsHardwareDecodeSupported(codec.fourcc()) != 0 }
    }
}
