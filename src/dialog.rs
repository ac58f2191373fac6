// ── Common-dialog plumbing ────────────────────────────────────────────────────
//
// Everything about the open/save dialogs that does not need to call into the
// OS: the request description, filter encoding, the grow-and-retry-once
// buffer policy, and splitting of multi-select results.  The Win32 backend in
// `platform::win32::dialogs` drives these with the real `GetOpenFileNameW`.

use std::path::PathBuf;

use crate::{
    error::{Result, ShellError},
    platform::ParentWindow,
    wide,
};

// ── Request ───────────────────────────────────────────────────────────────────

/// Whether the dialog picks an existing file or a save target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogMode {
    #[default]
    Open,
    Save,
}

/// One row of the "Files of type" list, e.g. `("PNG images", "*.png")`.
///
/// `pattern` may hold several globs separated by `;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub pattern: String,
}

impl FileFilter {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// Parameters for an open or save dialog.
#[derive(Debug, Clone, Default)]
pub struct FileDialogRequest {
    pub mode: DialogMode,
    pub parent: ParentWindow,
    /// Title bar text.  Empty uses the system default ("Open" / "Save As").
    pub title: String,
    /// Directory the dialog starts in.
    pub initial_folder: Option<PathBuf>,
    pub filters: Vec<FileFilter>,
    /// Appended by the dialog when the user types a name without extension.
    /// Without the leading dot, e.g. `"png"`.
    pub default_extension: Option<String>,
    /// Pre-fills the file-name field.
    pub initial_path: Option<PathBuf>,
}

impl FileDialogRequest {
    pub fn open(title: impl Into<String>) -> Self {
        Self {
            mode: DialogMode::Open,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn save(title: impl Into<String>) -> Self {
        Self {
            mode: DialogMode::Save,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent: ParentWindow) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_filter(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.filters.push(FileFilter::new(name, pattern));
        self
    }

    pub fn with_initial_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.initial_folder = Some(folder.into());
        self
    }

    pub fn with_initial_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.initial_path = Some(path.into());
        self
    }

    pub fn with_default_extension(mut self, ext: impl Into<String>) -> Self {
        self.default_extension = Some(ext.into());
        self
    }

    /// The text placed in the file-name field before the dialog opens.
    pub(crate) fn seed(&self) -> String {
        self.initial_path
            .as_deref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

// ── Filter encoding ───────────────────────────────────────────────────────────

/// Encode filters in the `lpstrFilter` layout:
/// `"Name\0*.ext\0Name2\0*.ext2\0\0"`.
///
/// Returns an empty vector when there are no filters; the caller passes a null
/// pointer in that case.
pub fn encode_filters(filters: &[FileFilter]) -> Vec<u16> {
    if filters.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();
    for f in filters {
        out.extend(f.name.encode_utf16().filter(|&c| c != 0));
        out.push(0);
        out.extend(f.pattern.encode_utf16().filter(|&c| c != 0));
        out.push(0);
    }
    out.push(0);
    out
}

// ── Grow-and-retry-once policy ────────────────────────────────────────────────

/// Result of showing a dialog once into a caller-provided buffer.
#[derive(Debug)]
pub enum BufferAttempt {
    /// The dialog wrote a selection into the buffer.
    Filled,
    /// The user dismissed the dialog.
    Cancelled,
    /// The selection did not fit.  `required` is the size the dialog reported
    /// (0 when it did not report one).
    TooSmall { required: usize },
    Failed(ShellError),
}

/// Show a dialog into a buffer of `initial_len` UTF-16 units; if the dialog
/// reports the buffer as too small, grow it and show the dialog exactly once
/// more.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnce {
    pub initial_len: usize,
}

enum Step {
    Done(Result<Option<Vec<u16>>>),
    Grow(usize),
}

impl RetryOnce {
    pub fn new(initial_len: usize) -> Self {
        Self { initial_len }
    }

    /// Drive `show` at most twice.
    ///
    /// Every attempt gets a fresh buffer pre-filled with `seed`, since the
    /// dialog overwrites the buffer when it reports an undersized result.
    /// Returns `Ok(None)` on cancel and `Ok(Some(buf))` with the filled buffer.
    pub fn run<F>(&self, seed: &str, mut show: F) -> Result<Option<Vec<u16>>>
    where
        F: FnMut(&mut [u16]) -> BufferAttempt,
    {
        let first_len = self.initial_len.max(2);
        let required = match attempt(seed, first_len, &mut show) {
            Step::Done(r) => return r,
            Step::Grow(required) => required,
        };

        let grown = grown_len(first_len, required);
        log::debug!("dialog buffer of {first_len} too small, retrying with {grown}");

        match attempt(seed, grown, &mut show) {
            Step::Done(r) => r,
            Step::Grow(required) => Err(ShellError::BufferTooSmall { required }),
        }
    }
}

fn attempt<F>(seed: &str, len: usize, show: &mut F) -> Step
where
    F: FnMut(&mut [u16]) -> BufferAttempt,
{
    let mut buf = wide::seeded_buffer(seed, len);
    match show(&mut buf) {
        BufferAttempt::Filled => Step::Done(Ok(Some(buf))),
        BufferAttempt::Cancelled => Step::Done(Ok(None)),
        BufferAttempt::Failed(e) => Step::Done(Err(e)),
        BufferAttempt::TooSmall { required } => Step::Grow(required),
    }
}

/// The dialog's reported size wins when it is larger than doubling.
fn grown_len(current: usize, required: usize) -> usize {
    required.saturating_add(1).max(current.saturating_mul(2))
}

// ── Result parsing ────────────────────────────────────────────────────────────

/// Read a single-selection result.  `None` when the buffer is empty.
pub fn path_from_buf(buf: &[u16]) -> Option<PathBuf> {
    let s = wide::from_wide(buf);
    if s.is_empty() {
        None
    } else {
        Some(PathBuf::from(s))
    }
}

/// Split an `OFN_ALLOWMULTISELECT | OFN_EXPLORER` result.
///
/// The buffer holds null-separated entries ending with an empty entry.  One
/// entry is a full path.  Several entries are a directory followed by leaf
/// names, which are joined with a backslash.
pub fn split_multiselect(buf: &[u16]) -> Vec<PathBuf> {
    let entries: Vec<String> = buf
        .split(|&c| c == 0)
        .take_while(|entry| !entry.is_empty())
        .map(String::from_utf16_lossy)
        .collect();

    match entries.split_first() {
        None => Vec::new(),
        Some((only, [])) => vec![PathBuf::from(only)],
        Some((dir, names)) => names
            .iter()
            .map(|name| PathBuf::from(join_windows(dir, name)))
            .collect(),
    }
}

fn join_windows(dir: &str, leaf: &str) -> String {
    // Drive roots come back as "C:\".
    if dir.ends_with('\\') {
        format!("{dir}{leaf}")
    } else {
        format!("{dir}\\{leaf}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn multi(entries: &[&str]) -> Vec<u16> {
        let mut buf = Vec::new();
        for e in entries {
            buf.extend(e.encode_utf16());
            buf.push(0);
        }
        buf.push(0);
        // Trailing garbage past the terminator must be ignored.
        buf.extend("stale".encode_utf16());
        buf
    }

    fn fill(buf: &mut [u16], s: &str) {
        for (slot, unit) in buf.iter_mut().zip(s.encode_utf16().chain(std::iter::once(0))) {
            *slot = unit;
        }
    }

    #[test]
    fn multiselect_directory_and_two_files() {
        let paths = split_multiselect(&multi(&["C:\\Users\\me\\Pictures", "a.png", "b.png"]));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("C:\\Users\\me\\Pictures\\a.png"),
                PathBuf::from("C:\\Users\\me\\Pictures\\b.png"),
            ]
        );
    }

    #[test]
    fn multiselect_single_full_path_is_unchanged() {
        let paths = split_multiselect(&multi(&["C:\\Users\\me\\Pictures\\a.png"]));
        assert_eq!(paths, vec![PathBuf::from("C:\\Users\\me\\Pictures\\a.png")]);
    }

    #[test]
    fn multiselect_drive_root_does_not_double_separator() {
        let paths = split_multiselect(&multi(&["C:\\", "boot.ini", "x.txt"]));
        assert_eq!(paths[0], PathBuf::from("C:\\boot.ini"));
        assert_eq!(paths[1], PathBuf::from("C:\\x.txt"));
    }

    #[test]
    fn multiselect_empty_buffer_yields_nothing() {
        assert!(split_multiselect(&[0, 0, 0]).is_empty());
        assert!(split_multiselect(&[]).is_empty());
    }

    #[test]
    fn filters_are_double_null_terminated() {
        let encoded = encode_filters(&[
            FileFilter::new("PNG", "*.png"),
            FileFilter::new("All", "*.*"),
        ]);
        let expected: Vec<u16> = "PNG\0*.png\0All\0*.*\0\0".encode_utf16().collect();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn no_filters_encode_to_nothing() {
        assert!(encode_filters(&[]).is_empty());
    }

    #[test]
    fn path_from_empty_buffer_is_none() {
        assert_eq!(path_from_buf(&[0; 8]), None);
    }

    #[test]
    fn retry_returns_first_result_without_growing() {
        let mut calls = 0;
        let out = RetryOnce::new(16)
            .run("", |buf| {
                calls += 1;
                fill(buf, "C:\\a.txt");
                BufferAttempt::Filled
            })
            .expect("filled");
        assert_eq!(calls, 1);
        assert_eq!(path_from_buf(&out.expect("some")), Some(PathBuf::from("C:\\a.txt")));
    }

    #[test]
    fn retry_grows_once_and_reseeds() {
        let mut lens = Vec::new();
        let out = RetryOnce::new(8)
            .run("seed", |buf| {
                lens.push(buf.len());
                assert_eq!(wide::from_wide(buf), "seed");
                if lens.len() == 1 {
                    // The dialog clobbers the buffer with the size it wants.
                    buf[0] = 40;
                    BufferAttempt::TooSmall { required: 40 }
                } else {
                    fill(buf, "C:\\long\\name.txt");
                    BufferAttempt::Filled
                }
            })
            .expect("second attempt fills");
        assert_eq!(lens, vec![8, 41]);
        assert!(out.is_some());
    }

    #[test]
    fn retry_doubles_when_no_size_is_reported() {
        let mut lens = Vec::new();
        let _ = RetryOnce::new(100).run("", |buf| {
            lens.push(buf.len());
            if lens.len() == 1 {
                BufferAttempt::TooSmall { required: 0 }
            } else {
                BufferAttempt::Cancelled
            }
        });
        assert_eq!(lens, vec![100, 200]);
    }

    #[test]
    fn retry_gives_up_after_second_undersized_report() {
        let mut calls = 0;
        let err = RetryOnce::new(8)
            .run("", |_| {
                calls += 1;
                BufferAttempt::TooSmall { required: 1000 }
            })
            .expect_err("must fail");
        assert_eq!(calls, 2);
        assert!(matches!(err, ShellError::BufferTooSmall { required: 1000 }));
    }

    #[test]
    fn cancel_yields_none_not_a_partial_value() {
        let out = RetryOnce::new(8)
            .run("C:\\prefill.txt", |_| BufferAttempt::Cancelled)
            .expect("cancel is not an error");
        assert!(out.is_none());
    }

    #[test]
    fn failure_is_propagated() {
        let err = RetryOnce::new(8)
            .run("", |_| BufferAttempt::Failed(ShellError::Win32 {
                function: "GetOpenFileNameW",
                code: 0xffff,
            }))
            .expect_err("must fail");
        assert!(matches!(err, ShellError::Win32 { code: 0xffff, .. }));
    }

    #[test]
    fn request_seed_comes_from_initial_path() {
        let req = FileDialogRequest::save("Export").with_initial_path("C:\\out\\icon.ico");
        assert_eq!(req.seed(), "C:\\out\\icon.ico");
        assert_eq!(FileDialogRequest::open("Import").seed(), "");
    }
}
