//! # Aligned Allocator Bridge
//!
//! Allocator callbacks the foreign codec image calls back into.
//!
//! The codec routines allocate internally. Left alone they would reach for
//! the image's own CRT heap, which is never initialized when the image is
//! loaded as a passive library, so the loader points the image's two
//! allocator slots at [`codec_malloc`] and [`codec_free`] and every internal
//! allocation is serviced by the host process heap instead.
//!
//! ## Layout
//! ```text
//! [raw malloc block .... [original ptr][aligned payload ....]]
//!                                      ^ returned address
//! ```
//!
//! The original block address is stashed one pointer-width before the
//! returned aligned address, so `free` can recover it from the pointer alone.

use crate::error::{CodecError, Result};
use libc::c_void;
use std::mem;
use std::ptr::NonNull;

/// Allocate `size` bytes aligned to `align` from the process heap.
///
/// `align` must be a power of two, else this fails with
/// [`CodecError::InvalidAlignment`]. The returned pointer must be released
/// with [`free_aligned`], never with `libc::free` directly.
pub fn alloc_aligned(size: usize, align: usize) -> Result<NonNull<u8>> {
    if !align.is_power_of_two() {
        return Err(CodecError::InvalidAlignment(align));
    }

    let total = size
        .checked_add(mem::size_of::<usize>())
        .and_then(|n| n.checked_add(align - 1))
        .ok_or(CodecError::InvalidAlignment(align))?;

    unsafe {
        let block = libc::malloc(total);
        let block =
            NonNull::new(block as *mut u8).ok_or(CodecError::AllocationFailure(total))?;

        // Round up past the stash slot to the next aligned address. The
        // rounding can never land inside the slot: the result is always at
        // least block + size_of::<usize>().
        let aligned =
            (block.as_ptr() as usize + mem::size_of::<usize>() + (align - 1)) & !(align - 1);
        let aligned = aligned as *mut u8;

        // Stash the raw block address immediately before the aligned payload.
        // The slot itself may be under-aligned for usize when align < 8.
        (aligned as *mut usize)
            .sub(1)
            .write_unaligned(block.as_ptr() as usize);

        Ok(NonNull::new_unchecked(aligned))
    }
}

/// Release a pointer produced by [`alloc_aligned`]. Null is a no-op.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by [`alloc_aligned`].
pub unsafe fn free_aligned(ptr: *mut u8) {
    if ptr.is_null() {
        return;
    }
    let block = (ptr as *mut usize).sub(1).read_unaligned() as *mut c_void;
    libc::free(block);
}

/// `malloc(size, align)` callback with the ABI the foreign image expects.
///
/// Returns null on any failure; nothing unwinds across this boundary.
pub unsafe extern "C" fn codec_malloc(size: usize, align: i32) -> *mut c_void {
    if align < 0 {
        return std::ptr::null_mut();
    }
    match alloc_aligned(size, align as usize) {
        Ok(ptr) => ptr.as_ptr() as *mut c_void,
        Err(_) => std::ptr::null_mut(),
    }
}

/// `free(ptr)` callback with the ABI the foreign image expects.
pub unsafe extern "C" fn codec_free(ptr: *mut c_void) {
    free_aligned(ptr as *mut u8);
}
