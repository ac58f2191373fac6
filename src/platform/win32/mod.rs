// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module in the codebase where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

use std::path::{Path, PathBuf};

use crate::{
    config::ShellConfig,
    dialog::{self, FileDialogRequest, RetryOnce},
    error::Result,
    platform::{ParentWindow, ShellServices},
    shortcut as naming,
};

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub(crate) mod com; // scoped COM apartment, CoTaskMem strings, path marshaling
pub(crate) mod dialogs; // GetOpenFileNameW / GetSaveFileNameW, folder picker
pub(crate) mod folders; // known-folder lookup with legacy fallback
pub(crate) mod shortcut; // IShellLinkW writer
pub(crate) mod trash; // IFileOperation recycle

// ── Shell services ────────────────────────────────────────────────────────────

/// Native `ShellServices` backed by the Windows Shell.
///
/// Holds the executable path used as shortcut target and the buffer settings,
/// so no operation has to look either up behind the caller's back.
#[derive(Debug, Clone)]
pub struct Win32Shell {
    exe: PathBuf,
    config: ShellConfig,
}

impl Win32Shell {
    pub fn new(exe: PathBuf, config: ShellConfig) -> Self {
        Self {
            exe,
            config: config.normalized(),
        }
    }

    /// Use the running executable and the settings file under `%APPDATA%`.
    pub fn from_environment() -> Result<Self> {
        Ok(Self::new(std::env::current_exe()?, ShellConfig::load()))
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// The current user's Desktop folder.
    pub fn desktop_path(&self) -> Result<PathBuf> {
        folders::desktop()
    }
}

impl ShellServices for Win32Shell {
    fn move_to_trash(&self, path: &Path) -> Result<()> {
        trash::recycle(path)
    }

    fn browse_for_folder(
        &self,
        parent: ParentWindow,
        title: &str,
        initial: Option<&Path>,
    ) -> Option<PathBuf> {
        match dialogs::pick_folder(parent, title, initial) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("folder picker failed: {e}");
                None
            }
        }
    }

    fn browse_for_file_name(&self, request: &FileDialogRequest) -> Option<PathBuf> {
        let policy = RetryOnce::new(self.config.path_buffer_len);
        match dialogs::show_file_dialog(request, false, policy) {
            Ok(Some(buf)) => dialog::path_from_buf(&buf),
            Ok(None) => None,
            Err(e) => {
                log::warn!("file dialog failed: {e}");
                None
            }
        }
    }

    fn browse_for_file_names(&self, request: &FileDialogRequest) -> Vec<PathBuf> {
        let policy = RetryOnce::new(self.config.multiselect_buffer_len);
        match dialogs::show_file_dialog(request, true, policy) {
            Ok(Some(buf)) => dialog::split_multiselect(&buf),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("multi-select file dialog failed: {e}");
                Vec::new()
            }
        }
    }

    fn user_documents_path(&self) -> Result<PathBuf> {
        folders::documents()
    }

    fn create_desktop_shortcut(
        &self,
        argument: &str,
        title: &str,
        icon: Option<&Path>,
    ) -> Result<()> {
        let dest = folders::desktop()?.join(naming::shortcut_file_name(title));
        let description = self
            .config
            .shortcut_description
            .clone()
            .unwrap_or_else(|| title.to_owned());

        shortcut::write(&shortcut::Link {
            location: &dest,
            target: &self.exe,
            arguments: &naming::quote_argument(argument),
            icon,
            icon_index: self.config.shortcut_icon_index,
            description: &description,
        })?;

        log::info!("created shortcut {}", dest.display());
        Ok(())
    }
}
