//! # Platform Image Loading
//!
//! Raw loading of the foreign executable image into the capturing process.
//!
//! Windows uses `LoadLibraryW`/`FreeLibrary`; Linux goes through
//! `dlopen`/`dlclose`, with `dlinfo` recovering the mapped base address that
//! offset arithmetic is performed against. The image is loaded purely as a
//! carrier for its embedded codec routines — none of its initialization is
//! meant to run beyond what the loader itself executes.

use crate::error::{CodecError, Result};
use std::path::Path;

/// An executable image mapped into this process.
///
/// Owned exclusively by the codec loader and released exactly once through
/// [`LoadedImage::close`].
#[derive(Debug)]
pub struct LoadedImage {
    #[cfg(windows)]
    handle: windows::Win32::Foundation::HMODULE,
    #[cfg(not(windows))]
    handle: *mut libc::c_void,
    base: *mut u8,
}

// The handle and base address are plain addresses into this process; the
// loader serializes all use behind its own mutex.
unsafe impl Send for LoadedImage {}

impl LoadedImage {
    /// The mapped base address of the image
    pub fn base(&self) -> *mut u8 {
        self.base
    }
}

#[cfg(windows)]
impl LoadedImage {
    /// Map the image at `path` into the current process
    pub fn open(path: &Path) -> Result<Self> {
        use windows::core::HSTRING;
        use windows::Win32::System::LibraryLoader::LoadLibraryW;

        let handle = unsafe { LoadLibraryW(&HSTRING::from(path.as_os_str())) }
            .map_err(|e| CodecError::LoadFailure(format!("LoadLibraryW({}): {e}", path.display())))?;

        Ok(Self {
            handle,
            base: handle.0 as *mut u8,
        })
    }

    /// Unmap the image from the current process
    pub fn close(self) -> Result<()> {
        use windows::Win32::Foundation::FreeLibrary;

        unsafe { FreeLibrary(self.handle) }
            .map_err(|e| CodecError::LoadFailure(format!("FreeLibrary: {e}")))
    }
}

#[cfg(not(windows))]
impl LoadedImage {
    /// Map the image at `path` into the current process
    pub fn open(path: &Path) -> Result<Self> {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let cpath = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| CodecError::LoadFailure(format!("{}: embedded NUL", path.display())))?;

        let handle = unsafe { libc::dlopen(cpath.as_ptr(), libc::RTLD_LAZY | libc::RTLD_LOCAL) };
        if handle.is_null() {
            return Err(CodecError::LoadFailure(format!(
                "dlopen({}): {}",
                path.display(),
                last_dl_error()
            )));
        }

        let base = match unsafe { mapped_base(handle) } {
            Ok(base) => base,
            Err(e) => {
                unsafe { libc::dlclose(handle) };
                return Err(e);
            }
        };

        Ok(Self { handle, base })
    }

    /// Unmap the image from the current process
    pub fn close(self) -> Result<()> {
        let rc = unsafe { libc::dlclose(self.handle) };
        if rc != 0 {
            return Err(CodecError::LoadFailure(format!(
                "dlclose: {}",
                last_dl_error()
            )));
        }
        Ok(())
    }
}

/// Head of the glibc `link_map` record, enough to read the load base
#[cfg(not(windows))]
#[repr(C)]
struct LinkMap {
    l_addr: usize,
    l_name: *const libc::c_char,
    l_ld: *mut libc::c_void,
    l_next: *mut LinkMap,
    l_prev: *mut LinkMap,
}

#[cfg(not(windows))]
const RTLD_DI_LINKMAP: libc::c_int = 2;

#[cfg(not(windows))]
unsafe fn mapped_base(handle: *mut libc::c_void) -> Result<*mut u8> {
    let mut map: *mut LinkMap = std::ptr::null_mut();
    let rc = libc::dlinfo(
        handle,
        RTLD_DI_LINKMAP,
        &mut map as *mut *mut LinkMap as *mut libc::c_void,
    );
    if rc != 0 || map.is_null() {
        return Err(CodecError::LoadFailure(format!(
            "dlinfo: {}",
            last_dl_error()
        )));
    }
    Ok((*map).l_addr as *mut u8)
}

#[cfg(not(windows))]
fn last_dl_error() -> String {
    unsafe {
        let msg = libc::dlerror();
        if msg.is_null() {
            String::from("unknown dl error")
        } else {
            std::ffi::CStr::from_ptr(msg).to_string_lossy().into_owned()
        }
    }
}
