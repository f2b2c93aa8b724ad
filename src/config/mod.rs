// ── Settings ──────────────────────────────────────────────────────────────────
//
// Reads an optional `settings.json` from the per-user configuration directory.
// The file is never written by the application.  No `unsafe`: pure safe Rust
// + serde_json.

use std::{
    ffi::OsString,
    fs, io,
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{InteropError, Result},
    ui::{Frontend, CONSOLE_WIDTH_RANGE},
};

// ── On-disk types ─────────────────────────────────────────────────────────────

/// Root of the JSON settings file.  Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) version: u32,
    /// `EnvFilter` directive used when `RUST_LOG` is unset, e.g. `"debug"`.
    pub(crate) log_level: String,
    pub(crate) frontend: Frontend,
    pub(crate) window: WindowSettings,
    /// Column count the console front end centres its lines in.
    pub(crate) console_width: usize,
}

/// Initial size of the native window, in pixels at 96 DPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct WindowSettings {
    pub(crate) width: i32,
    pub(crate) height: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            log_level: "info".to_owned(),
            frontend: Frontend::default(),
            window: WindowSettings::default(),
            console_width: 60,
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 480,
            height: 240,
        }
    }
}

// ── Format version & limits ───────────────────────────────────────────────────

const SETTINGS_VERSION: u32 = 1;

/// Accepted window width/height, in pixels at 96 DPI.
const WINDOW_EDGE_RANGE: RangeInclusive<i64> = 160..=8192;

// ── Path ──────────────────────────────────────────────────────────────────────

/// Environment variable that points at an explicit settings file.
pub(crate) const CONFIG_ENV: &str = "INTEROP_EXAMPLE_CONFIG";

/// Where the settings file lives for the current user.
///
/// | Target | Path |
/// |---|---|
/// | Windows | `{FOLDERID_RoamingAppData}\InteropExample\settings.json` |
/// | macOS | `~/Library/Application Support/InteropExample/settings.json` |
/// | other | `$XDG_CONFIG_HOME/interop-example/settings.json`, else `~/.config/…` |
///
/// `INTEROP_EXAMPLE_CONFIG` overrides all of these.  Returns `None` when
/// `dirs` cannot determine a configuration directory.
pub(crate) fn settings_path() -> Option<PathBuf> {
    resolve_settings_path(std::env::var_os(CONFIG_ENV), dirs::config_dir())
}

fn resolve_settings_path(explicit: Option<OsString>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(explicit) = explicit.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(explicit));
    }
    let app_dir = if cfg!(any(windows, target_os = "macos")) {
        "InteropExample"
    } else {
        "interop-example"
    };
    Some(config_dir?.join(app_dir).join("settings.json"))
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Load settings from the default location.
///
/// Never fails outright: the defaults come back alongside any error so the
/// caller can log it once logging is up.
pub(crate) fn load() -> (Settings, Option<InteropError>) {
    let Some(path) = settings_path() else {
        return (Settings::default(), None);
    };
    match load_from(&path) {
        Ok(Some(s)) => (s, None),
        Ok(None) => (Settings::default(), None),
        Err(e) => (Settings::default(), Some(e)),
    }
}

/// Read, parse and range-check the settings file at `path`.
///
/// `Ok(None)` when the file does not exist.
pub(crate) fn load_from(path: &Path) -> Result<Option<Settings>> {
    let data = match fs::read(path) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let settings: Settings = serde_json::from_slice(&data).map_err(|source| InteropError::Config {
        path: path.to_owned(),
        source,
    })?;
    if settings.version != SETTINGS_VERSION {
        return Err(InteropError::UnsupportedVersion {
            path: path.to_owned(),
            found: settings.version,
            expected: SETTINGS_VERSION,
        });
    }
    settings.validate(path)?;
    Ok(Some(settings))
}

impl Settings {
    fn validate(&self, path: &Path) -> Result<()> {
        let width = i64::try_from(self.console_width).unwrap_or(i64::MAX);
        let (lo, hi) = (*CONSOLE_WIDTH_RANGE.start(), *CONSOLE_WIDTH_RANGE.end());
        check_range(path, "console_width", width, lo as i64..=hi as i64)?;
        check_range(path, "window.width", self.window.width.into(), WINDOW_EDGE_RANGE)?;
        check_range(path, "window.height", self.window.height.into(), WINDOW_EDGE_RANGE)
    }
}

fn check_range(path: &Path, field: &'static str, value: i64, range: RangeInclusive<i64>) -> Result<()> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(InteropError::OutOfRange {
        path: path.to_owned(),
        field,
        value,
        min: *range.start(),
        max: *range.end(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
