// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface that the rest of an application uses to
// talk to the OS shell.  No `unsafe` lives here; all Win32 FFI is confined to
// the `win32` sub-module and never leaks outward.  Code that needs these
// operations takes a `&dyn ShellServices` so tests can substitute a fake.

use std::path::{Path, PathBuf};

use crate::{dialog::FileDialogRequest, error::Result};

#[cfg(windows)]
pub mod win32;

/// Raw handle of the window that owns a dialog.
///
/// Kept as an integer so this type stays portable; the Win32 layer converts it
/// to an `HWND`.  The default (0) means "no owner".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ParentWindow(pub isize);

impl ParentWindow {
    pub const NONE: Self = Self(0);
}

/// The shell operations an application needs.
///
/// Every call is synchronous and blocks until the OS returns.  Dialog methods
/// return `None` or an empty list on cancel *and* on failure; the other
/// methods report failures through `Result`.
pub trait ShellServices {
    /// Send `path` to the Recycle Bin without confirmation or error UI.
    fn move_to_trash(&self, path: &Path) -> Result<()>;

    /// Pick a directory.
    fn browse_for_folder(
        &self,
        parent: ParentWindow,
        title: &str,
        initial: Option<&Path>,
    ) -> Option<PathBuf>;

    /// Pick one file to open or a save target.
    fn browse_for_file_name(&self, request: &FileDialogRequest) -> Option<PathBuf>;

    /// Pick one or more files to open.
    fn browse_for_file_names(&self, request: &FileDialogRequest) -> Vec<PathBuf>;

    /// The current user's Documents folder.
    fn user_documents_path(&self) -> Result<PathBuf>;

    /// Create `<Desktop>\<title>.lnk` launching the current executable with
    /// `argument` as its only (quoted) argument.  Without `icon` the shortcut
    /// shows the executable's own icon.
    fn create_desktop_shortcut(
        &self,
        argument: &str,
        title: &str,
        icon: Option<&Path>,
    ) -> Result<()>;
}

/// The native implementation for this host.
#[cfg(windows)]
pub fn native() -> Result<win32::Win32Shell> {
    win32::Win32Shell::from_environment()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{error::ShellError, shortcut};

    /// Answers every dialog with a fixed selection and records side effects.
    #[derive(Default)]
    struct FakeShell {
        selection: Vec<PathBuf>,
        trashed: RefCell<Vec<PathBuf>>,
        shortcuts: RefCell<Vec<String>>,
    }

    impl ShellServices for FakeShell {
        fn move_to_trash(&self, path: &Path) -> Result<()> {
            if path.as_os_str().is_empty() {
                return Err(ShellError::InvalidPath);
            }
            self.trashed.borrow_mut().push(path.to_owned());
            Ok(())
        }

        fn browse_for_folder(
            &self,
            _parent: ParentWindow,
            _title: &str,
            initial: Option<&Path>,
        ) -> Option<PathBuf> {
            initial.map(Path::to_owned)
        }

        fn browse_for_file_name(&self, _request: &FileDialogRequest) -> Option<PathBuf> {
            self.selection.first().cloned()
        }

        fn browse_for_file_names(&self, _request: &FileDialogRequest) -> Vec<PathBuf> {
            self.selection.clone()
        }

        fn user_documents_path(&self) -> Result<PathBuf> {
            Ok(PathBuf::from("C:\\Users\\me\\Documents"))
        }

        fn create_desktop_shortcut(
            &self,
            _argument: &str,
            title: &str,
            _icon: Option<&Path>,
        ) -> Result<()> {
            self.shortcuts.borrow_mut().push(shortcut::shortcut_file_name(title));
            Ok(())
        }
    }

    /// Application-side code only sees the trait object.
    fn trash_selection(shell: &dyn ShellServices) -> Result<usize> {
        let picked = shell.browse_for_file_names(&FileDialogRequest::open("Delete"));
        for path in &picked {
            shell.move_to_trash(path)?;
        }
        Ok(picked.len())
    }

    #[test]
    fn trait_object_accepts_a_substitute() {
        let fake = FakeShell {
            selection: vec![PathBuf::from("C:\\a.txt"), PathBuf::from("C:\\b.txt")],
            ..Default::default()
        };

        assert_eq!(trash_selection(&fake).expect("trash"), 2);
        assert_eq!(fake.trashed.borrow().len(), 2);
    }

    #[test]
    fn cancelled_selection_trashes_nothing() {
        let fake = FakeShell::default();
        assert_eq!(trash_selection(&fake).expect("trash"), 0);
        assert!(fake.trashed.borrow().is_empty());
    }

    #[test]
    fn substitute_covers_the_remaining_operations() {
        let fake = FakeShell::default();
        let shell: &dyn ShellServices = &fake;

        shell
            .create_desktop_shortcut("C:/data", "Notes: Q3", None)
            .expect("shortcut");
        assert_eq!(fake.shortcuts.borrow().as_slice(), ["Notes_ Q3.lnk"]);
        assert!(shell.user_documents_path().is_ok());
        assert_eq!(
            shell.browse_for_folder(ParentWindow::NONE, "Pick", Some(Path::new("C:\\x"))),
            Some(PathBuf::from("C:\\x"))
        );
        assert!(shell.move_to_trash(Path::new("")).is_err());
    }
}
