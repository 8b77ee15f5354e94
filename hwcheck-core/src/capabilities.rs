// ============================================================================
// hwcheck-core/src/capabilities.rs
// ============================================================================
//
// CODEC CAPABILITY PROBER: Hardware encoder/decoder availability
//
// Hardware codec availability depends on silicon, driver and OS version, so
// it is always asked of the platform video framework. Every failure mode is
// folded into "not available": overclaiming hardware support would make
// encoder/decoder setup fail further downstream.
//
// KEY COMPONENTS:
// - CodecBackend: trait over the platform framework queries
// - CapabilityProber: runs the encoder/decoder probes against a backend
// - HardwareCapabilities: the four flags and their packed 64-bit signature
//
// The platform framework sits behind `CodecBackend` so the prober can be
// driven by a stand-in backend in tests.

use crate::codec::{CodecKind, fourcc_to_string};
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use serde::Serialize;

// ============================================================================
// SIGNATURE LAYOUT
// ============================================================================

/// Bit offset of the H.264 encoder flag in the capability signature.
pub const H264_ENCODER_SHIFT: u32 = 24;
/// Bit offset of the H.265 encoder flag in the capability signature.
pub const H265_ENCODER_SHIFT: u32 = 16;
/// Bit offset of the H.264 decoder flag in the capability signature.
pub const H264_DECODER_SHIFT: u32 = 8;
/// Bit offset of the H.265 decoder flag in the capability signature.
pub const H265_DECODER_SHIFT: u32 = 0;

// ============================================================================
// PLATFORM BOUNDARY
// ============================================================================

/// Outcome of a supported-properties query for an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderQueryStatus {
    /// The framework found a matching encoder.
    Supported,
    /// The framework reported that no matching encoder exists.
    NoEncoderFound,
    /// Any other framework status.
    Failed(i32),
}

/// Parameters of one encoder capability query.
///
/// Backends always restrict the query to hardware-accelerated encoders where
/// the platform offers that hint; a software encoder must never count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderQuery {
    pub codec: CodecKind,
    pub width: i32,
    pub height: i32,
}

/// Trait over the platform multimedia framework.
///
/// Implementations must release any framework objects they create before
/// returning; nothing is retained between calls.
pub trait CodecBackend {
    /// Asks the framework whether an encoder matching `query` exists.
    fn query_encoder_capability(&self, query: &EncoderQuery) -> EncoderQueryStatus;

    /// Returns the framework's hardware-decode predicate for `codec`.
    fn query_decoder_capability(&self, codec: CodecKind) -> bool;
}

impl<B: CodecBackend + ?Sized> CodecBackend for &B {
    fn query_encoder_capability(&self, query: &EncoderQuery) -> EncoderQueryStatus {
        (**self).query_encoder_capability(query)
    }

    fn query_decoder_capability(&self, codec: CodecKind) -> bool {
        (**self).query_decoder_capability(codec)
    }
}

/// Backend for platforms without a hardware video framework.
///
/// Every capability is reported absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHardwareBackend;

impl CodecBackend for NoHardwareBackend {
    fn query_encoder_capability(&self, _query: &EncoderQuery) -> EncoderQueryStatus {
        EncoderQueryStatus::NoEncoderFound
    }

    fn query_decoder_capability(&self, _codec: CodecKind) -> bool {
        false
    }
}

/// The backend for the current platform.
#[cfg(target_os = "macos")]
pub type DefaultBackend = crate::videotoolbox::VideoToolboxBackend;

/// The backend for the current platform.
#[cfg(not(target_os = "macos"))]
pub type DefaultBackend = NoHardwareBackend;

/// Returns the backend for the current platform.
#[must_use]
pub fn default_backend() -> DefaultBackend {
    DefaultBackend::default()
}

// ============================================================================
// CAPABILITIES
// ============================================================================

/// Hardware codec availability on this host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HardwareCapabilities {
    pub h264_encoder: bool,
    pub h265_encoder: bool,
    pub h264_decoder: bool,
    pub h265_decoder: bool,
}

impl HardwareCapabilities {
    /// Packs the four flags into the capability signature.
    #[must_use]
    pub fn signature(&self) -> u64 {
        pack_signature(self)
    }

    /// Decodes a capability signature.
    ///
    /// Only the four flag bytes are read; a non-zero flag byte counts as
    /// present.
    #[must_use]
    pub fn from_signature(signature: u64) -> Self {
        let flag = |shift: u32| (signature >> shift) & 0xff != 0;
        Self {
            h264_encoder: flag(H264_ENCODER_SHIFT),
            h265_encoder: flag(H265_ENCODER_SHIFT),
            h264_decoder: flag(H264_DECODER_SHIFT),
            h265_decoder: flag(H265_DECODER_SHIFT),
        }
    }

    /// Parses a signature written as decimal or `0x`-prefixed hexadecimal.
    pub fn parse_signature(text: &str) -> CoreResult<Self> {
        let trimmed = text.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed
            .map(Self::from_signature)
            .map_err(|e| CoreError::InvalidSignature(format!("'{}': {}", text, e)))
    }

    /// Whether a hardware encoder exists for `codec`.
    #[must_use]
    pub fn encoder(&self, codec: CodecKind) -> bool {
        match codec {
            CodecKind::H264 => self.h264_encoder,
            CodecKind::H265 => self.h265_encoder,
        }
    }

    /// Whether a hardware decoder exists for `codec`.
    #[must_use]
    pub fn decoder(&self, codec: CodecKind) -> bool {
        match codec {
            CodecKind::H264 => self.h264_decoder,
            CodecKind::H265 => self.h265_decoder,
        }
    }

    /// Whether any hardware codec is available.
    #[must_use]
    pub fn any(&self) -> bool {
        self.h264_encoder || self.h265_encoder || self.h264_decoder || self.h265_decoder
    }

    /// Short summary such as `"H.264 enc+dec, H.265 dec"`, or `"none"`.
    #[must_use]
    pub fn describe(&self) -> String {
        let parts: Vec<String> = CodecKind::ALL
            .iter()
            .filter_map(|&codec| {
                let kinds = match (self.encoder(codec), self.decoder(codec)) {
                    (true, true) => "enc+dec",
                    (true, false) => "enc",
                    (false, true) => "dec",
                    (false, false) => return None,
                };
                Some(format!("{} {}", codec, kinds))
            })
            .collect();

        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Logs the detected capabilities at info level.
    pub fn log_capabilities(&self) {
        if !self.any() {
            log::info!("No hardware video codecs available on this host");
            return;
        }
        for codec in CodecKind::ALL {
            log::info!(
                "Hardware {}: encoder {}, decoder {}",
                codec,
                availability(self.encoder(codec)),
                availability(self.decoder(codec))
            );
        }
    }
}

fn availability(present: bool) -> &'static str {
    if present { "available" } else { "not available" }
}

/// Packs four capability flags into the 64-bit signature.
///
/// Each flag occupies its own byte (bits 24, 16, 8 and 0 for the H.264
/// encoder, H.265 encoder, H.264 decoder and H.265 decoder) and is 0 or 1.
#[must_use]
pub fn pack_signature(caps: &HardwareCapabilities) -> u64 {
    (u64::from(caps.h264_encoder) << H264_ENCODER_SHIFT)
        | (u64::from(caps.h265_encoder) << H265_ENCODER_SHIFT)
        | (u64::from(caps.h264_decoder) << H264_DECODER_SHIFT)
        | (u64::from(caps.h265_decoder) << H265_DECODER_SHIFT)
}

// ============================================================================
// PROBER
// ============================================================================

/// Runs hardware codec probes against a `CodecBackend`.
#[derive(Debug, Clone)]
pub struct CapabilityProber<B> {
    backend: B,
    reference_width: i32,
    reference_height: i32,
}

impl<B: CodecBackend> CapabilityProber<B> {
    /// Creates a prober with the default reference resolution.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, &CoreConfig::default())
    }

    /// Creates a prober using the query settings from `config`.
    pub fn with_config(backend: B, config: &CoreConfig) -> Self {
        Self {
            backend,
            reference_width: config.reference_width,
            reference_height: config.reference_height,
        }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether a hardware encoder exists for `codec`.
    ///
    /// "No encoder found" and every other failure status are reported as
    /// absent.
    pub fn probe_hardware_encoder(&self, codec: CodecKind) -> bool {
        let query = EncoderQuery {
            codec,
            width: self.reference_width,
            height: self.reference_height,
        };
        match self.backend.query_encoder_capability(&query) {
            EncoderQueryStatus::Supported => true,
            EncoderQueryStatus::NoEncoderFound => {
                log::debug!(
                    "No hardware {} ('{}') encoder found at {}x{}",
                    codec,
                    fourcc_to_string(codec.fourcc()),
                    query.width,
                    query.height
                );
                false
            }
            EncoderQueryStatus::Failed(status) => {
                log::debug!(
                    "Hardware {} ('{}') encoder query failed with status {}",
                    codec,
                    fourcc_to_string(codec.fourcc()),
                    status
                );
                false
            }
        }
    }

    /// Whether the platform reports hardware decode support for `codec`.
    pub fn probe_hardware_decoder(&self, codec: CodecKind) -> bool {
        self.backend.query_decoder_capability(codec)
    }

    /// Runs all four probes.
    pub fn check_all_capabilities(&self) -> HardwareCapabilities {
        HardwareCapabilities {
            h264_encoder: self.probe_hardware_encoder(CodecKind::H264),
            h265_encoder: self.probe_hardware_encoder(CodecKind::H265),
            h264_decoder: self.probe_hardware_decoder(CodecKind::H264),
            h265_decoder: self.probe_hardware_decoder(CodecKind::H265),
        }
    }

    /// Runs all four probes and packs the result.
    pub fn capability_signature(&self) -> u64 {
        self.check_all_capabilities().signature()
    }
}

/// Probes the current platform with the default configuration.
#[must_use]
pub fn check_all_capabilities() -> HardwareCapabilities {
    CapabilityProber::new(default_backend()).check_all_capabilities()
}

/// Probes the current platform and returns the packed signature.
#[must_use]
pub fn get_capability_signature() -> u64 {
    check_all_capabilities().signature()
}
