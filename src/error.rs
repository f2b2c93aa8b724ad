// ── Central error type ────────────────────────────────────────────────────────
//
// Ambient failures (settings, front-end start-up) return `error::Result<T>`.
// The native platform query is NOT one of them: provider variants swallow OS
// errors at their own boundary and substitute a fallback string.

use std::path::PathBuf;

use thiserror::Error;

/// Every error that the application can produce.
#[derive(Debug, Error)]
pub enum InteropError {
    /// A standard I/O error (settings file read, console read/write, …).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file exists but is not valid JSON for `Settings`.
    #[error("invalid settings file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The settings file declares a format version this build cannot read.
    #[error("settings file {} has version {found}, expected {expected}", .path.display())]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// A settings value parsed but lies outside what the front ends accept.
    #[error("settings file {}: {field} = {value} is outside {min}..={max}", .path.display())]
    OutOfRange {
        path: PathBuf,
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A Win32 API call returned a failure code.
    #[cfg(windows)]
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },
}

// Convert a windows-crate error (HRESULT) directly into an InteropError so
// that `?` can be used on `windows::core::Result<T>` in the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for InteropError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, InteropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts_and_keeps_message() {
        let e: InteropError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(e, InteropError::Io(_)));
        assert_eq!(e.to_string(), "I/O error: gone");
    }

    #[test]
    fn unsupported_version_display() {
        let e = InteropError::UnsupportedVersion {
            path: PathBuf::from("settings.json"),
            found: 7,
            expected: 1,
        };
        assert_eq!(e.to_string(), "settings file settings.json has version 7, expected 1");
    }

    #[test]
    fn out_of_range_display() {
        let e = InteropError::OutOfRange {
            path: PathBuf::from("settings.json"),
            field: "console_width",
            value: 9000,
            min: 20,
            max: 500,
        };
        assert_eq!(
            e.to_string(),
            "settings file settings.json: console_width = 9000 is outside 20..=500"
        );
    }

    #[test]
    fn config_error_exposes_json_source() {
        use std::error::Error as _;

        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let e = InteropError::Config {
            path: PathBuf::from("settings.json"),
            source,
        };
        assert!(e.source().is_some());
        assert!(e.to_string().starts_with("invalid settings file settings.json:"));
    }
}
