//! # Native Codec Bridge
//!
//! Everything that touches the foreign client executable lives here.
//!
//! The compression routines this crate exposes are embedded in a separately
//! maintained client binary. They are reached by loading that image into the
//! capturing process, pointing its internal allocator at host-supplied memory,
//! and resolving five entry points by build-specific byte offsets.
//!
//! ## Components
//! - **alloc**: aligned malloc/free with the callback ABI the image expects
//! - **image**: platform library loading (Windows / Linux)
//! - **loader**: the owned codec resource — load, patch, resolve, unload
//! - **codec**: the six invocation operations, degraded-safe when unloaded
//!
//! ## Safety
//! No build verification is performed beyond the offset-table fingerprint:
//! a fingerprint collision with a mismatched build produces undefined
//! behavior at invocation time. Callers own all scratch buffers and must
//! size them with the query operations before encode/decode.

pub mod alloc;
pub mod codec;
pub mod image;
pub mod loader;

pub use loader::NativeCodec;
