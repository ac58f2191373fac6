// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 / COM
// FFI).  Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! Windows Shell bindings for applications that speak UTF-8.
//!
//! The native operations sit behind [`ShellServices`]; on Windows,
//! [`platform::native`] returns the real implementation.  ICO synthesis,
//! dialog buffer handling and shortcut naming are portable and live in their
//! own modules.

pub mod config;
pub mod dialog;
pub mod error;
pub mod icon;
pub mod platform;
pub mod shortcut;

mod wide;

pub use config::ShellConfig;
pub use dialog::{DialogMode, FileDialogRequest, FileFilter};
pub use error::{Result, ShellError};
pub use icon::create_ico_from_png;
pub use platform::{ParentWindow, ShellServices};

#[cfg(windows)]
pub use platform::win32::Win32Shell;
