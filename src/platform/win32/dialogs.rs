// ── Common dialogs ─────────────────────────────────────────────────────────────
//
// Thin wrappers around the Win32 file dialogs.  The open/save dialogs use the
// classic `GetOpenFileNameW` / `GetSaveFileNameW` API so that an undersized
// result buffer is reported (FNERR_BUFFERTOOSMALL) and can be retried through
// `dialog::RetryOnce`.  The folder picker uses `IFileOpenDialog`.
//
// This is inside `platform::win32` so `unsafe` is permitted per crate policy.

#![allow(unsafe_code)]

use std::path::{Path, PathBuf};

use windows::{
    core::{HRESULT, PCWSTR, PWSTR},
    Win32::{
        Foundation::ERROR_CANCELLED,
        System::Com::{CoCreateInstance, CLSCTX_INPROC_SERVER},
        UI::{
            Controls::Dialogs::{
                CommDlgExtendedError, GetOpenFileNameW, GetSaveFileNameW, FNERR_BUFFERTOOSMALL,
                OFN_ALLOWMULTISELECT, OFN_EXPLORER, OFN_FILEMUSTEXIST, OFN_HIDEREADONLY,
                OFN_NOCHANGEDIR, OFN_OVERWRITEPROMPT, OFN_PATHMUSTEXIST, OPENFILENAMEW,
                OPEN_FILENAME_FLAGS,
            },
            Shell::{
                FileOpenDialog, IFileOpenDialog, FOS_FORCEFILESYSTEM, FOS_PATHMUSTEXIST,
                FOS_PICKFOLDERS, SIGDN_FILESYSPATH,
            },
        },
    },
};

use super::com::{self, Apartment};
use crate::{
    dialog::{self, BufferAttempt, DialogMode, FileDialogRequest, RetryOnce},
    error::{Result, ShellError},
    platform::ParentWindow,
    wide,
};

// ── Open / save dialog ────────────────────────────────────────────────────────

fn dialog_flags(mode: DialogMode, multi: bool) -> OPEN_FILENAME_FLAGS {
    let base = OFN_EXPLORER | OFN_NOCHANGEDIR | OFN_PATHMUSTEXIST | OFN_HIDEREADONLY;
    match (mode, multi) {
        (DialogMode::Open, false) => base | OFN_FILEMUSTEXIST,
        (DialogMode::Save, false) => base | OFN_OVERWRITEPROMPT,
        // Multi-select is always an open dialog.
        (_, true) => base | OFN_FILEMUSTEXIST | OFN_ALLOWMULTISELECT,
    }
}

/// Show the open or save dialog described by `request`.
///
/// Returns the raw result buffer: one path for single selection, the
/// directory-plus-leaves layout for multi-selection.  `Ok(None)` on cancel.
pub(crate) fn show_file_dialog(
    request: &FileDialogRequest,
    multi: bool,
    policy: RetryOnce,
) -> Result<Option<Vec<u16>>> {
    let mode = if multi { DialogMode::Open } else { request.mode };

    // The filter string is null-separated pairs ending with a double null:
    // "Display\0*.ext\0Display2\0*.ext2\0\0"
    let filter = Some(dialog::encode_filters(&request.filters)).filter(|f| !f.is_empty());
    let title = if request.title.is_empty() {
        None
    } else {
        Some(wide::to_wide(&request.title)?)
    };
    let initial_dir = request
        .initial_folder
        .as_deref()
        .map(com::path_to_wide)
        .transpose()?;
    let def_ext = request
        .default_extension
        .as_deref()
        .map(|ext| wide::to_wide(ext.trim_start_matches('.')))
        .transpose()?;

    let function = match mode {
        DialogMode::Open => "GetOpenFileNameW",
        DialogMode::Save => "GetSaveFileNameW",
    };

    policy.run(&request.seed(), |buf| {
        let mut ofn = OPENFILENAMEW {
            lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
            hwndOwner: com::hwnd(request.parent),
            lpstrFilter: com::pcwstr_or_null(filter.as_ref()),
            lpstrFile: PWSTR(buf.as_mut_ptr()),
            nMaxFile: u32::try_from(buf.len()).unwrap_or(u32::MAX),
            lpstrInitialDir: com::pcwstr_or_null(initial_dir.as_ref()),
            lpstrTitle: com::pcwstr_or_null(title.as_ref()),
            lpstrDefExt: com::pcwstr_or_null(def_ext.as_ref()),
            Flags: dialog_flags(mode, multi),
            ..Default::default()
        };

        // SAFETY: `ofn` is fully initialised; `buf`, `filter`, `title`,
        // `initial_dir` and `def_ext` outlive this call.  The dialog reads
        // and writes only within the buffers we provided, and `nMaxFile`
        // never exceeds `buf.len()`.  Called on the caller's UI thread, as
        // required for modal dialogs.
        let ok = unsafe {
            match mode {
                DialogMode::Open => GetOpenFileNameW(&mut ofn),
                DialogMode::Save => GetSaveFileNameW(&mut ofn),
            }
        };
        if ok.as_bool() {
            return BufferAttempt::Filled;
        }

        // SAFETY: No arguments; reads the thread's last common-dialog error.
        let code = unsafe { CommDlgExtendedError() };
        if code == FNERR_BUFFERTOOSMALL {
            // The first WORD of lpstrFile now holds the size the dialog wants.
            BufferAttempt::TooSmall {
                required: usize::from(buf[0]),
            }
        } else if code.0 == 0 {
            BufferAttempt::Cancelled
        } else {
            BufferAttempt::Failed(ShellError::Win32 {
                function,
                code: code.0,
            })
        }
    })
}

// ── Folder picker ─────────────────────────────────────────────────────────────

/// Show a directory-only `IFileOpenDialog`.
///
/// An `initial` folder that cannot be resolved is ignored rather than treated
/// as a failure.  Returns `Ok(None)` on cancel.
pub(crate) fn pick_folder(
    parent: ParentWindow,
    title: &str,
    initial: Option<&Path>,
) -> Result<Option<PathBuf>> {
    let _com = Apartment::enter()?;

    // SAFETY: COM is initialised on this thread by `_com`, which outlives
    // every interface pointer created below.
    let picker: IFileOpenDialog =
        unsafe { CoCreateInstance(&FileOpenDialog, None, CLSCTX_INPROC_SERVER) }
            .map_err(|e| ShellError::from_win("CoCreateInstance(FileOpenDialog)", &e))?;

    // SAFETY: `picker` is a live interface; option flags are plain values.
    unsafe {
        let options = picker.GetOptions()?;
        picker.SetOptions(options | FOS_PICKFOLDERS | FOS_FORCEFILESYSTEM | FOS_PATHMUSTEXIST)?;
    }

    if !title.is_empty() {
        let title = wide::to_wide(title)?;
        // SAFETY: `title` is null-terminated and outlives the call; the
        // dialog copies it.
        unsafe { picker.SetTitle(PCWSTR(title.as_ptr())) }?;
    }

    if let Some(dir) = initial {
        match com::shell_item(dir) {
            // SAFETY: `item` is a live shell item; the dialog AddRefs it.
            Ok(item) => unsafe { picker.SetFolder(&item) }?,
            Err(e) => log::debug!("ignoring initial folder {}: {e}", dir.display()),
        }
    }

    // SAFETY: Modal; blocks until the user closes the dialog.  The owner
    // handle is either null or a window supplied by the caller.
    if let Err(e) = unsafe { picker.Show(com::hwnd(parent)) } {
        if e.code() == HRESULT::from_win32(ERROR_CANCELLED.0) {
            return Ok(None);
        }
        return Err(ShellError::from_win("IFileDialog::Show", &e));
    }

    // SAFETY: Show succeeded, so a result item is available.  The display
    // name is CoTaskMemAlloc'ed and handed to take_co_string, which frees it.
    let path = unsafe {
        let item = picker.GetResult()?;
        com::take_co_string(item.GetDisplayName(SIGDN_FILESYSPATH)?)?
    };

    log::debug!("folder picker returned {path}");
    Ok(Some(PathBuf::from(path)))
}
