//! Host capability checks for streaming helper processes.
//!
//! This crate answers two unrelated questions for a video-conferencing or
//! streaming application:
//!
//! - which hardware H.264/H.265 encoders and decoders the platform video
//!   framework offers, packed into a 64-bit capability signature;
//! - whether the parent process has died, so a helper process can terminate
//!   itself instead of lingering as an orphan.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use hwcheck_core::{CapabilityProber, CoreConfig, default_backend, setup_parent_death_signal};
//!
//! let config = CoreConfig::from_env().unwrap();
//! let prober = CapabilityProber::with_config(default_backend(), &config);
//! let caps = prober.check_all_capabilities();
//! caps.log_capabilities();
//! println!("signature: {:#018x}", caps.signature());
//!
//! if let Err(e) = setup_parent_death_signal() {
//!     eprintln!("running without parent watch: {}", e);
//! }
//! ```

pub mod capabilities;
pub mod codec;
pub mod config;
pub mod error;
pub mod exports;
pub mod logging;
pub mod parent_watch;
#[cfg(target_os = "macos")]
pub mod videotoolbox;

// Re-exports for public API
pub use capabilities::{
    CapabilityProber, CodecBackend, EncoderQuery, EncoderQueryStatus, HardwareCapabilities,
    NoHardwareBackend, check_all_capabilities, default_backend, get_capability_signature,
    pack_signature,
};
pub use codec::CodecKind;
pub use config::{CoreConfig, CoreConfigBuilder, WatchStrategy};
pub use error::{CoreError, CoreResult};
pub use parent_watch::{
    ExitEvent, ParentWatch, ProcessEventSource, SetupError, Terminator, WatchStopped,
    WatcherSpawner, WatcherStatus, setup_parent_death_signal, setup_with_config,
};
#[cfg(target_os = "macos")]
pub use videotoolbox::VideoToolboxBackend;
