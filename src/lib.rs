//! # capture-codec
//!
//! Message-header decoding and native compression-codec bridge for captured
//! game traffic.
//!
//! Captured server messages carry a fixed 32-byte header followed by a
//! payload that is often compressed with a proprietary codec embedded in the
//! game client itself. This crate decodes the header and bridges to that
//! codec by loading the client image into the capturing process, so payloads
//! can be restored before dispatch.
//!
//! ## Components
//! - [`protocol`]: the 32-byte message header and known type codes
//! - [`native`]: image loading, allocator bridging, and the six codec operations
//! - [`config`]: versioned entry-point offset tables keyed by image build
//! - [`error`]: the crate-wide error taxonomy
//!
//! ## Example
//! ```rust,no_run
//! use capture_codec::{MessageHeader, NativeCodec};
//!
//! # fn main() -> capture_codec::Result<()> {
//! let codec = NativeCodec::new();
//! // load failures are logged and leave the codec in degraded mode
//! let _ = codec.load("C:/game/client_dx11.exe");
//!
//! let mut state = vec![0u8; codec.state_size()];
//! let mut shared = vec![0u8; codec.shared_size(0x13)];
//! codec.set_window(&mut shared, 0x13, &[]);
//! codec.train(&mut state, &mut shared, &[]);
//!
//! let captured: &[u8] = &[0u8; 64]; // from the capture collaborator
//! let header = MessageHeader::parse(captured)?;
//! let mut restored = vec![0u8; header.message_length as usize];
//! if codec.decode(&mut state, &mut shared, &captured[MessageHeader::SIZE..], &mut restored) {
//!     // hand restored bytes to downstream dispatch
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Degraded Mode
//! Every codec operation is safe to call before (or after a failed) `load`:
//! size queries return `0`, encode/decode return `false`, and the setup
//! calls are no-ops. Nothing in the native call path panics into callers.

pub mod config;
pub mod error;
pub mod native;
pub mod protocol;
pub mod utils;

pub use config::{CodecOffsets, OffsetTable};
pub use error::{CodecError, Result};
pub use native::NativeCodec;
pub use protocol::{MessageHeader, MessageType};
