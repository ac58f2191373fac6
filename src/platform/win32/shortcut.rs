// ── Shell links ───────────────────────────────────────────────────────────────

#![allow(unsafe_code)]

use std::path::Path;

use windows::{
    core::{Interface, PCWSTR},
    Win32::{
        Foundation::TRUE,
        System::Com::{CoCreateInstance, IPersistFile, CLSCTX_INPROC_SERVER},
        UI::Shell::{IShellLinkW, ShellLink},
    },
};

use super::com::{self, Apartment};
use crate::{
    error::{Result, ShellError},
    wide,
};

/// Everything written into one `.lnk` file.
pub(crate) struct Link<'a> {
    /// Where the `.lnk` file is saved.
    pub(crate) location: &'a Path,
    pub(crate) target: &'a Path,
    /// Command line passed to the target, already quoted.
    pub(crate) arguments: &'a str,
    /// Icon file; `None` or an empty path keeps the target's own icon.
    pub(crate) icon: Option<&'a Path>,
    pub(crate) icon_index: i32,
    pub(crate) description: &'a str,
}

/// Create or overwrite the shortcut described by `link`.
pub(crate) fn write(link: &Link<'_>) -> Result<()> {
    let location = com::path_to_wide(link.location)?;
    let target = com::path_to_wide(link.target)?;
    let arguments = wide::to_wide(link.arguments)?;
    let icon = link
        .icon
        .filter(|p| !p.as_os_str().is_empty())
        .map(com::path_to_wide)
        .transpose()?;
    let description = wide::to_wide(link.description)?;
    let working_dir = link.target.parent().map(com::path_to_wide).transpose()?;

    let _com = Apartment::enter()?;

    // SAFETY: COM is initialised on this thread by `_com`, which outlives
    // `shell_link` and `file`.
    let shell_link: IShellLinkW =
        unsafe { CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER) }
            .map_err(|e| ShellError::from_win("CoCreateInstance(ShellLink)", &e))?;

    // SAFETY: Every string is null-terminated, owned by this frame and
    // outlives the calls; the link object copies what it keeps.
    unsafe {
        shell_link.SetPath(PCWSTR(target.as_ptr()))?;
        shell_link.SetArguments(PCWSTR(arguments.as_ptr()))?;
        if let Some(icon) = &icon {
            shell_link.SetIconLocation(PCWSTR(icon.as_ptr()), link.icon_index)?;
        }
        shell_link.SetDescription(PCWSTR(description.as_ptr()))?;
        if let Some(dir) = &working_dir {
            shell_link.SetWorkingDirectory(PCWSTR(dir.as_ptr()))?;
        }
    }

    let file: IPersistFile = shell_link.cast()?;

    // SAFETY: `location` is null-terminated and outlives the call.
    unsafe { file.Save(PCWSTR(location.as_ptr()), TRUE) }
        .map_err(|e| ShellError::from_win("IPersistFile::Save", &e))?;

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(all(test, windows))]
mod tests {
    use super::*;

    fn link_in<'a>(location: &'a Path, target: &'a Path, icon: Option<&'a Path>) -> Link<'a> {
        Link {
            location,
            target,
            arguments: "\"C:\\data\\notes.db\"",
            icon,
            icon_index: 0,
            description: "Notes",
        }
    }

    #[test]
    fn writes_lnk_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let location = dir.path().join("Notes.lnk");
        let exe = std::env::current_exe().expect("current exe");

        write(&link_in(&location, &exe, None)).expect("write shortcut");

        let bytes = std::fs::read(&location).expect("read back");
        // Shell link header: HeaderSize = 0x4C.
        assert_eq!(&bytes[..4], &[0x4c, 0, 0, 0]);
    }

    #[test]
    fn empty_icon_path_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let location = dir.path().join("NoIcon.lnk");
        let exe = std::env::current_exe().expect("current exe");

        write(&link_in(&location, &exe, Some(Path::new("")))).expect("write shortcut");
        assert!(location.exists());
    }
}
