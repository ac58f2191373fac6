// ── Known folders ─────────────────────────────────────────────────────────────
//
// `SHGetKnownFolderPath` first; `SHGetFolderPathW` with the equivalent CSIDL
// when it fails (pre-Vista shells, redirected profiles that refuse the
// known-folder query).

#![allow(unsafe_code)]

use std::path::PathBuf;

use windows::{
    core::GUID,
    Win32::{
        Foundation::{HANDLE, HWND, S_FALSE},
        UI::Shell::{
            FOLDERID_Desktop, FOLDERID_Documents, SHGetFolderPathW, SHGetKnownFolderPath,
            CSIDL_DESKTOPDIRECTORY, CSIDL_PERSONAL, KF_FLAG_DEFAULT, SHGFP_TYPE_CURRENT,
        },
    },
};

use super::com;
use crate::{
    dialog,
    error::{Result, ShellError},
};

/// `MAX_PATH`; the legacy API writes into a fixed array of this size.
const LEGACY_PATH_LEN: usize = 260;

pub(crate) fn documents() -> Result<PathBuf> {
    lookup(&FOLDERID_Documents, CSIDL_PERSONAL as i32)
}

pub(crate) fn desktop() -> Result<PathBuf> {
    lookup(&FOLDERID_Desktop, CSIDL_DESKTOPDIRECTORY as i32)
}

fn lookup(id: &GUID, csidl: i32) -> Result<PathBuf> {
    known_folder(id).or_else(|e| {
        log::debug!("known-folder lookup failed ({e}), trying CSIDL {csidl}");
        legacy_folder(csidl)
    })
}

fn known_folder(id: &GUID) -> Result<PathBuf> {
    // SAFETY: `id` points to a valid GUID for the duration of the call.  The
    // default token means "current user".  The returned string is owned by us
    // and freed by take_co_string.
    let path = unsafe {
        let raw = SHGetKnownFolderPath(id, KF_FLAG_DEFAULT, HANDLE::default())
            .map_err(|e| ShellError::from_win("SHGetKnownFolderPath", &e))?;
        com::take_co_string(raw)?
    };
    if path.is_empty() {
        return Err(empty_result("SHGetKnownFolderPath"));
    }
    Ok(PathBuf::from(path))
}

fn legacy_folder(csidl: i32) -> Result<PathBuf> {
    let mut buf = [0u16; LEGACY_PATH_LEN];

    // SAFETY: `buf` is exactly MAX_PATH units, the size the API requires.
    // Null owner window and token select the current user.  S_FALSE (folder
    // does not exist) maps to Ok here and is caught by the empty check.
    unsafe {
        SHGetFolderPathW(
            HWND::default(),
            csidl,
            HANDLE::default(),
            SHGFP_TYPE_CURRENT.0 as u32,
            &mut buf,
        )
    }
    .map_err(|e| ShellError::from_win("SHGetFolderPathW", &e))?;

    dialog::path_from_buf(&buf).ok_or_else(|| empty_result("SHGetFolderPathW"))
}

/// An empty path would make callers resolve files against the working
/// directory.
fn empty_result(function: &'static str) -> ShellError {
    ShellError::Win32 {
        function,
        code: S_FALSE.0 as u32,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
