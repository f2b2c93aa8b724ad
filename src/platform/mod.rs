// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the one capability the rest of the codebase needs from
// the OS: a display name and a single native query.  Exactly one concrete
// provider is compiled in per target and re-exported as `NativePlatform`.
//
// No `unsafe` lives here; Win32 FFI is confined to the `windows` and `win32`
// sub-modules and never leaks outward.

// ── Per-OS providers ──────────────────────────────────────────────────────────
//
// The Linux and macOS providers only read files, so they are also compiled
// under `cfg(test)` on every host to keep their parsers covered.

#[cfg(any(target_os = "linux", test))]
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
mod linux;

#[cfg(any(target_os = "macos", test))]
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
mod macos;

#[cfg(windows)]
mod windows;

#[cfg(any(not(any(target_os = "linux", target_os = "macos", windows)), test))]
#[cfg_attr(test, allow(dead_code))]
mod fallback;

#[cfg(target_os = "linux")]
pub(crate) use linux::LinuxPlatform as NativePlatform;

#[cfg(target_os = "macos")]
pub(crate) use macos::MacPlatform as NativePlatform;

#[cfg(windows)]
pub(crate) use self::windows::WindowsPlatform as NativePlatform;

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
pub(crate) use fallback::FallbackPlatform as NativePlatform;

// ── Native window host ────────────────────────────────────────────────────────

#[cfg(windows)]
pub mod win32;

// ── Capability interface ──────────────────────────────────────────────────────

/// Name substituted for any OS identification piece that could not be read.
pub(crate) const FALLBACK_NAME: &str = "Unknown OS";

/// What the presentation layer may ask of the host operating system.
///
/// Neither method can fail: implementations catch OS errors at their own
/// boundary and fall back to [`FALLBACK_NAME`]-based strings.
pub(crate) trait Platform {
    /// Human-readable OS name and version, fixed for the process lifetime.
    fn name(&self) -> &str;

    /// Query the OS and describe it.  Synchronous, no side effects.
    fn do_something_native(&self) -> String;
}

/// Immutable identification captured once when a provider is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlatformInfo {
    name: String,
}

impl PlatformInfo {
    /// Join `system` and `version` with a space, dropping blank parts.
    ///
    /// | system | version | name |
    /// |---|---|---|
    /// | `"Linux"` | `"6.8.0"` | `"Linux 6.8.0"` |
    /// | `"Linux"` | `""` | `"Linux"` |
    /// | `""` | `""` | `"Unknown OS"` |
    pub(crate) fn new(system: &str, version: &str) -> Self {
        Self {
            name: join_nonblank(&[system, version]).unwrap_or_else(|| FALLBACK_NAME.to_owned()),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

/// Build the string returned by `do_something_native`:
/// `"<headline> (<detail>, <detail>, …)"`.
///
/// Blank details are skipped; a blank headline becomes [`FALLBACK_NAME`].
pub(crate) fn describe(headline: &str, details: &[&str]) -> String {
    let head = nonblank(headline).unwrap_or(FALLBACK_NAME);
    let details: Vec<&str> = details.iter().filter_map(|d| nonblank(d)).collect();
    if details.is_empty() {
        head.to_owned()
    } else {
        format!("{head} ({})", details.join(", "))
    }
}

/// Construct the provider selected for this build target.
///
/// Called once at start-up, before the presentation shell exists.
pub(crate) fn current() -> NativePlatform {
    NativePlatform::new()
}

/// Trimmed `s`, or `None` if it is empty or whitespace-only.
pub(crate) fn nonblank(s: &str) -> Option<&str> {
    let t = s.trim();
    (!t.is_empty()).then_some(t)
}

fn join_nonblank(parts: &[&str]) -> Option<String> {
    let kept: Vec<&str> = parts.iter().filter_map(|p| nonblank(p)).collect();
    (!kept.is_empty()).then(|| kept.join(" "))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
