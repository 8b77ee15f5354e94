//! Codec selectors understood by the capability prober.

use serde::Serialize;
use std::fmt;

/// `kCMVideoCodecType_H264` ('avc1').
pub const CODEC_TYPE_H264: u32 = 0x6176_6331;

/// `kCMVideoCodecType_HEVC` ('hvc1').
pub const CODEC_TYPE_HEVC: u32 = 0x6876_6331;

/// A video codec whose hardware support can be probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CodecKind {
    H264,
    H265,
}

impl CodecKind {
    /// Both codecs, in signature order.
    pub const ALL: [CodecKind; 2] = [CodecKind::H264, CodecKind::H265];

    /// The CoreMedia FourCC for this codec.
    #[must_use]
    pub fn fourcc(self) -> u32 {
        match self {
            CodecKind::H264 => CODEC_TYPE_H264,
            CodecKind::H265 => CODEC_TYPE_HEVC,
        }
    }

    /// Human-readable codec name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CodecKind::H264 => "H.264",
            CodecKind::H265 => "H.265",
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Renders a FourCC as its four ASCII characters.
#[must_use]
pub fn fourcc_to_string(code: u32) -> String {
    String::from_utf8_lossy(&code.to_be_bytes()).to_string()
}
