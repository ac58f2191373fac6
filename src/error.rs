// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in shellbridge return `error::Result<T>`.  No panics
// in production paths.  User cancellation of a dialog is *not* an error: the
// dialog functions return `None` / an empty list for that case.

/// Every error that shellbridge can produce.
#[derive(Debug)]
pub enum ShellError {
    /// A Win32 API or COM call returned a failure code.
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// A standard I/O error (file open, write, …).
    Io(std::io::Error),

    /// A common dialog still reported an undersized result buffer after the
    /// one permitted retry.
    BufferTooSmall {
        /// Size in UTF-16 units the dialog asked for on the last attempt.
        required: usize,
    },

    /// The input bytes are not a PNG image we can wrap.
    InvalidImage(&'static str),

    /// The PNG is larger than the 256×256 limit of an ICO directory entry.
    ImageTooLarge { width: u32, height: u32 },

    /// The shell reported that the file operation was aborted.
    Aborted,

    /// The path cannot be handed to the OS (interior NUL).
    InvalidPath,
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::BufferTooSmall { required } => {
                write!(f, "dialog result buffer too small ({required} characters required)")
            }
            Self::InvalidImage(reason) => write!(f, "invalid PNG data: {reason}"),
            Self::ImageTooLarge { width, height } => {
                write!(f, "image {width}x{height} exceeds the 256x256 icon limit")
            }
            Self::Aborted => f.write_str("shell file operation was aborted"),
            Self::InvalidPath => f.write_str("path contains an interior NUL character"),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ShellError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// Convert a windows-crate error (HRESULT) directly into a ShellError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for ShellError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        // Win32 errors appear as 0x8007xxxx HRESULTs.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

impl ShellError {
    /// Attach the failing function's name to a windows-crate error.
    #[cfg(windows)]
    pub(crate) fn from_win(function: &'static str, e: &windows::core::Error) -> Self {
        Self::Win32 {
            function,
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ShellError>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win32_error_formats_code_as_hex() {
        let e = ShellError::Win32 {
            function: "SHGetKnownFolderPath",
            code: 0x8007_0002,
        };
        assert_eq!(e.to_string(), "SHGetKnownFolderPath failed (error 0x80070002)");
    }

    #[test]
    fn io_error_is_exposed_as_source() {
        use std::error::Error as _;

        let e = ShellError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(e.source().is_some());
        assert!(ShellError::Aborted.source().is_none());
    }

    #[test]
    fn oversized_image_names_dimensions() {
        let e = ShellError::ImageTooLarge {
            width: 512,
            height: 64,
        };
        assert!(e.to_string().contains("512x64"));
    }
}
