// ── Recycle Bin ───────────────────────────────────────────────────────────────

#![allow(unsafe_code)]

use std::path::Path;

use windows::Win32::{
    System::Com::{CoCreateInstance, CLSCTX_ALL},
    UI::Shell::{
        FileOperation, IFileOperation, FOF_ALLOWUNDO, FOF_NOCONFIRMATION, FOF_NOERRORUI,
        FOF_SILENT,
    },
};

use super::com::{self, Apartment};
use crate::error::{Result, ShellError};

/// Move one file or directory to the Recycle Bin.
///
/// No confirmation, progress or error UI is shown.  `FOF_ALLOWUNDO` is what
/// turns the delete into a recycle.
pub(crate) fn recycle(path: &Path) -> Result<()> {
    let _com = Apartment::enter()?;
    let item = com::shell_item(path)?;

    // SAFETY: COM is initialised on this thread by `_com`, which is dropped
    // after `op` and `item`.
    let op: IFileOperation = unsafe { CoCreateInstance(&FileOperation, None, CLSCTX_ALL) }
        .map_err(|e| ShellError::from_win("CoCreateInstance(FileOperation)", &e))?;

    // SAFETY: `op` and `item` are live interfaces owned by this frame.
    // PerformOperations runs synchronously on this thread.
    let aborted = unsafe {
        op.SetOperationFlags(FOF_ALLOWUNDO | FOF_NOCONFIRMATION | FOF_SILENT | FOF_NOERRORUI)
            .map_err(|e| ShellError::from_win("IFileOperation::SetOperationFlags", &e))?;
        op.DeleteItem(&item, None)
            .map_err(|e| ShellError::from_win("IFileOperation::DeleteItem", &e))?;
        op.PerformOperations()
            .map_err(|e| ShellError::from_win("IFileOperation::PerformOperations", &e))?;
        op.GetAnyOperationsAborted()?
    };

    if aborted.as_bool() {
        return Err(ShellError::Aborted);
    }
    log::debug!("recycled {}", path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(all(test, windows))]
mod tests {
    use super::*;

    #[test]
    fn recycled_file_is_gone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scratch.txt");
        std::fs::write(&path, b"discard me").expect("create file");

        recycle(&path).expect("recycle");
        assert!(!path.exists());
    }

    #[test]
    fn missing_path_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(recycle(&dir.path().join("never-created.txt")).is_err());
    }
}
