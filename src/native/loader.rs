//! # Native Codec Loader
//!
//! Owns the foreign image and the resolved entry-point table.
//!
//! ## Load Sequence
//! 1. Fingerprint the image file and look up its offsets (fails closed on
//!    unrecognized builds)
//! 2. Map the image into the process
//! 3. Write the host allocator callbacks into the image's two allocator slots
//! 4. Resolve the five codec entry points from their byte offsets
//! 5. Publish the entry table for invokers
//!
//! Any failure after step 2 rolls back through [`NativeCodec::unload`] and
//! leaves the codec not ready. `load` and `unload` are idempotent and
//! serialized by one mutex; invocation reads the published table without
//! taking it.

use crate::config::{CodecOffsets, OffsetTable};
use crate::error::{CodecError, Result};
use crate::native::alloc::{codec_free, codec_malloc};
use crate::native::image::LoadedImage;
use arc_swap::ArcSwapOption;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

/// `fn() -> state_bytes`
pub(crate) type StateSizeFn = unsafe extern "C" fn() -> i32;
/// `fn(window_bits) -> shared_bytes`
pub(crate) type SharedSizeFn = unsafe extern "C" fn(i32) -> i32;
/// `fn(shared, window_bits, window, window_len)`
pub(crate) type SetWindowFn = unsafe extern "C" fn(*mut u8, i32, *const u8, i32);
/// `fn(state, shared, packet_ptrs, packet_lens, packet_count)`
pub(crate) type TrainFn = unsafe extern "C" fn(*mut u8, *mut u8, *const *const u8, *const i32, i32);
/// `fn(state, shared, raw, raw_len, compressed_out) -> nonzero on success`
pub(crate) type EncodeFn = unsafe extern "C" fn(*mut u8, *mut u8, *const u8, i32, *mut u8) -> i32;
/// `fn(state, shared, compressed, compressed_len, raw_out, raw_len) -> nonzero on success`
pub(crate) type DecodeFn =
    unsafe extern "C" fn(*mut u8, *mut u8, *const u8, i32, *mut u8, i32) -> i32;

/// The five resolved codec entry points
pub(crate) struct EntryPoints {
    pub(crate) state_size: StateSizeFn,
    pub(crate) shared_size: SharedSizeFn,
    pub(crate) set_window: SetWindowFn,
    pub(crate) train: TrainFn,
    pub(crate) encode: EncodeFn,
    pub(crate) decode: DecodeFn,
}

/// The loaded foreign codec, one image per instance.
///
/// `load` and `unload` mutate the image handle and entry table under a
/// mutex; the six invocation operations (see [`crate::native::codec`]) are
/// lock-free readers of the published table and degrade to neutral results
/// while nothing is loaded. The native routines are stateful with respect to
/// the scratch buffers passed in, so concurrent calls sharing buffers must be
/// serialized by the caller; calls on disjoint buffers may run concurrently.
pub struct NativeCodec {
    image: Mutex<Option<LoadedImage>>,
    table: ArcSwapOption<EntryPoints>,
    offsets: OffsetTable,
}

impl NativeCodec {
    /// Codec using the built-in offset table
    pub fn new() -> Self {
        Self::with_offsets(OffsetTable::builtin())
    }

    /// Codec using a caller-supplied offset table (e.g. loaded from TOML)
    pub fn with_offsets(offsets: OffsetTable) -> Self {
        Self {
            image: Mutex::new(None),
            table: ArcSwapOption::const_empty(),
            offsets,
        }
    }

    /// Whether an image is loaded and all entry points are resolved
    pub fn is_ready(&self) -> bool {
        self.table.load().is_some()
    }

    /// Load the codec image at `path`, patch its allocator slots, and
    /// resolve the entry points.
    ///
    /// Idempotent: returns immediately when an image is already loaded. On
    /// any failure the error is logged, partially loaded state is rolled
    /// back, and the codec stays not ready; a later `load` on a good path
    /// is unaffected.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut guard = match self.image.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if guard.is_some() {
            debug!(path = %path.display(), "codec image already loaded, skipping");
            return Ok(());
        }

        let result = self.load_locked(path, &mut guard);
        if let Err(e) = &result {
            error!(path = %path.display(), error = %e, "codec image load failed");
            // drop anything half-constructed
            self.table.store(None);
            if let Some(image) = guard.take() {
                if let Err(e) = image.close() {
                    warn!(error = %e, "failed to release image during rollback");
                }
            }
        }
        result
    }

    fn load_locked(&self, path: &Path, guard: &mut Option<LoadedImage>) -> Result<()> {
        let image_len = std::fs::metadata(path)
            .map_err(|e| CodecError::LoadFailure(format!("{}: {e}", path.display())))?
            .len();
        let offsets = self.offsets.lookup(image_len)?;

        let image = LoadedImage::open(path)?;
        let entries = match unsafe { install(image.base(), &offsets) } {
            Ok(entries) => entries,
            Err(e) => {
                if let Err(close_err) = image.close() {
                    warn!(error = %close_err, "failed to release image during rollback");
                }
                return Err(e);
            }
        };

        *guard = Some(image);
        self.table.store(Some(Arc::new(entries)));
        info!(path = %path.display(), image_len, "codec image loaded and entry points resolved");
        Ok(())
    }

    /// Release the image and clear the entry table.
    ///
    /// Idempotent and infallible from the caller's view: release failures
    /// are logged and swallowed, and the codec is left not ready either way.
    /// In-flight codec calls must have completed before unloading; the
    /// foreign code is unmapped by this call.
    pub fn unload(&self) {
        let mut guard = match self.image.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        self.table.store(None);
        if let Some(image) = guard.take() {
            match image.close() {
                Ok(()) => info!("codec image released"),
                Err(e) => warn!(error = %e, "failed to release codec image"),
            }
        }
    }

    pub(crate) fn entries(&self) -> Option<Arc<EntryPoints>> {
        self.table.load_full()
    }
}

impl Default for NativeCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NativeCodec {
    fn drop(&mut self) {
        self.unload();
    }
}

/// Patch the allocator slots and resolve the entry points.
///
/// # Safety
/// `base` must be the base of a live image whose layout matches `offsets`;
/// a mismatched build makes the writes and the produced function pointers
/// undefined behavior.
unsafe fn install(base: *mut u8, offsets: &CodecOffsets) -> Result<EntryPoints> {
    // The image reads its allocator through these two pointer slots; they
    // must point at host memory before any codec entry point runs.
    (base.add(offsets.malloc_slot) as *mut usize).write_unaligned(codec_malloc as usize);
    (base.add(offsets.free_slot) as *mut usize).write_unaligned(codec_free as usize);

    Ok(EntryPoints {
        state_size: std::mem::transmute::<usize, StateSizeFn>(entry(base, offsets.state_size)?),
        shared_size: std::mem::transmute::<usize, SharedSizeFn>(entry(base, offsets.shared_size)?),
        set_window: std::mem::transmute::<usize, SetWindowFn>(entry(
            base,
            offsets.shared_set_window,
        )?),
        train: std::mem::transmute::<usize, TrainFn>(entry(base, offsets.train)?),
        encode: std::mem::transmute::<usize, EncodeFn>(entry(base, offsets.encode)?),
        decode: std::mem::transmute::<usize, DecodeFn>(entry(base, offsets.decode)?),
    })
}

fn entry(base: *mut u8, offset: usize) -> Result<usize> {
    if offset == 0 {
        return Err(CodecError::ResolveFailure(String::from(
            "offset table contains a zero entry offset",
        )));
    }
    (base as usize).checked_add(offset).ok_or_else(|| {
        CodecError::ResolveFailure(format!("entry offset {offset:#x} overflows the address space"))
    })
}
