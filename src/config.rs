// ── Settings ──────────────────────────────────────────────────────────────────
//
// Reads and writes `%APPDATA%\shellbridge\shell.json`.
// No `unsafe`: pure safe Rust + serde_json.

use std::{fs, io, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

// ── Format version ────────────────────────────────────────────────────────────

const CONFIG_VERSION: u32 = 1;

/// Maximum path length in `WCHAR`s for `\\?\` extended paths.  Large
/// enough that the grow-and-retry path is the exception.
const DEFAULT_PATH_BUFFER_LEN: usize = 32_768;

/// Room for a directory plus many leaf names.  The dialog reports a required
/// size in a single WORD, which wraps above 65 535, so the first buffer must
/// already be big enough for realistic selections.
const DEFAULT_MULTISELECT_BUFFER_LEN: usize = 32_768 * 10;

/// Smallest buffer that can hold one character plus its terminator.
const MIN_BUFFER_LEN: usize = 2;

// ── On-disk type ──────────────────────────────────────────────────────────────

/// Tunables for the native shell layer.
///
/// Every field has a default so that files written by older versions, or
/// hand-edited files with fields missing, still parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub version: u32,
    /// Initial UTF-16 buffer for single-selection file dialogs.
    pub path_buffer_len: usize,
    /// Initial UTF-16 buffer for multi-selection file dialogs.
    pub multiselect_buffer_len: usize,
    /// Index of the icon inside the shortcut's icon file.
    pub shortcut_icon_index: i32,
    /// Shortcut comment.  The title is used when unset.
    pub shortcut_description: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            path_buffer_len: DEFAULT_PATH_BUFFER_LEN,
            multiselect_buffer_len: DEFAULT_MULTISELECT_BUFFER_LEN,
            shortcut_icon_index: 0,
            shortcut_description: None,
        }
    }
}

impl ShellConfig {
    /// Buffer lengths below the minimum are raised to it.
    pub fn normalized(mut self) -> Self {
        self.path_buffer_len = self.path_buffer_len.max(MIN_BUFFER_LEN);
        self.multiselect_buffer_len = self.multiselect_buffer_len.max(MIN_BUFFER_LEN);
        self
    }

    /// Parse a settings file.  Rejects unknown versions.
    pub fn from_json(data: &[u8]) -> io::Result<Self> {
        let cfg: Self = serde_json::from_slice(data).map_err(io::Error::other)?;
        if cfg.version != CONFIG_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsupported config version {}", cfg.version),
            ));
        }
        Ok(cfg.normalized())
    }

    /// Read settings from `path`.
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;
        Self::from_json(&data)
    }

    /// Read `%APPDATA%\shellbridge\shell.json`.
    ///
    /// Falls back to defaults on any error: variable unset, file missing,
    /// JSON parse failure, or an unrecognised version number.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    log::warn!("ignoring {}: {e}", path.display());
                }
                Self::default()
            }
        }
    }

    /// Write settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self).map_err(io::Error::other)
    }

    /// Write settings to `%APPDATA%\shellbridge\shell.json`.
    pub fn save(&self) -> io::Result<()> {
        let path =
            config_path().ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "APPDATA not set"))?;
        self.save_to(&path)
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the path to the settings file: `%APPDATA%\shellbridge\shell.json`.
///
/// Returns `None` if the `APPDATA` environment variable is not set.
pub fn config_path() -> Option<PathBuf> {
    let appdata = std::env::var_os("APPDATA")?;
    let mut p = PathBuf::from(appdata);
    p.push("shellbridge");
    p.push("shell.json");
    Some(p)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
