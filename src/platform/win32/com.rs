// ── COM plumbing ──────────────────────────────────────────────────────────────

#![allow(unsafe_code)]

use std::{ffi::c_void, marker::PhantomData, os::windows::ffi::OsStrExt, path::Path};

use windows::{
    core::{PCWSTR, PWSTR},
    Win32::{
        Foundation::{HWND, RPC_E_CHANGED_MODE},
        System::Com::{CoInitializeEx, CoTaskMemFree, CoUninitialize, COINIT_APARTMENTTHREADED},
        UI::Shell::{IShellItem, SHCreateItemFromParsingName},
    },
};

use crate::{
    error::{Result, ShellError},
    platform::ParentWindow,
};

// ── Apartment guard ───────────────────────────────────────────────────────────

/// Single-threaded COM apartment for the duration of one shell call.
///
/// Interface pointers must be dropped before the guard, so declare the guard
/// first in the calling function.
pub(crate) struct Apartment {
    /// False when the thread was already initialised with another
    /// concurrency model; that initialisation is not ours to undo.
    owned: bool,
    /// Apartments are per-thread.
    _thread_bound: PhantomData<*const ()>,
}

impl Apartment {
    pub(crate) fn enter() -> Result<Self> {
        // SAFETY: No reserved pointer is passed.  A matching CoUninitialize is
        // issued by Drop only when this call succeeded (S_OK or S_FALSE).
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        if hr.is_ok() {
            Ok(Self {
                owned: true,
                _thread_bound: PhantomData,
            })
        } else if hr == RPC_E_CHANGED_MODE {
            // The host already runs an MTA on this thread.  Shell objects
            // still work through the marshaler.
            Ok(Self {
                owned: false,
                _thread_bound: PhantomData,
            })
        } else {
            Err(ShellError::Win32 {
                function: "CoInitializeEx",
                code: hr.0 as u32,
            })
        }
    }
}

impl Drop for Apartment {
    fn drop(&mut self) {
        if self.owned {
            // SAFETY: Balances the successful CoInitializeEx in `enter` on
            // the same thread; the guard is neither Send nor Clone.
            unsafe { CoUninitialize() };
        }
    }
}

// ── Strings ───────────────────────────────────────────────────────────────────

/// Copy a `CoTaskMemAlloc`ed string and free it.
///
/// # Safety
///
/// `p` must be a valid null-terminated string allocated with
/// `CoTaskMemAlloc` that the caller owns; it is freed here.
pub(crate) unsafe fn take_co_string(p: PWSTR) -> Result<String> {
    // SAFETY: guaranteed by the caller.
    let s = unsafe { p.to_string() };
    // SAFETY: `p` came from CoTaskMemAlloc and is not used after this.
    unsafe { CoTaskMemFree(Some(p.as_ptr() as *const c_void)) };
    s.map_err(|_| ShellError::InvalidPath)
}

/// Null-terminated UTF-16 form of `path`.
pub(crate) fn path_to_wide(path: &Path) -> Result<Vec<u16>> {
    let mut w: Vec<u16> = path.as_os_str().encode_wide().collect();
    if w.contains(&0) {
        return Err(ShellError::InvalidPath);
    }
    w.push(0);
    Ok(w)
}

/// `PCWSTR` over an optional buffer, null when absent.
pub(crate) fn pcwstr_or_null(buf: Option<&Vec<u16>>) -> PCWSTR {
    buf.map_or(PCWSTR::null(), |b| PCWSTR(b.as_ptr()))
}

pub(crate) fn hwnd(parent: ParentWindow) -> HWND {
    HWND(parent.0 as *mut c_void)
}

// ── Shell items ───────────────────────────────────────────────────────────────

/// Resolve an absolute filesystem path to an `IShellItem`.
///
/// Forward slashes are normalised first; the shell parser only accepts
/// backslashes.  Requires an active [`Apartment`].
pub(crate) fn shell_item(path: &Path) -> Result<IShellItem> {
    let absolute = std::path::absolute(path)?;
    let wide: Vec<u16> = path_to_wide(&absolute)?
        .into_iter()
        .map(|c| if c == u16::from(b'/') { u16::from(b'\\') } else { c })
        .collect();

    // SAFETY: `wide` is a valid null-terminated UTF-16 string that outlives
    // the call.  No bind context is supplied.
    unsafe { SHCreateItemFromParsingName(PCWSTR(wide.as_ptr()), None) }
        .map_err(|e| ShellError::from_win("SHCreateItemFromParsingName", &e))
}
