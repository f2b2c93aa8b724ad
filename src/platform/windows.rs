// ── Windows provider ──────────────────────────────────────────────────────────
//
// `GetVersionExW` lies to unmanifested processes (it reports 6.2 on Windows
// 10/11), so the real version comes from `RtlGetVersion` in ntdll.  The call
// cannot block and only fills a caller-owned struct.

#![allow(unsafe_code)]

use ::windows::{
    Wdk::System::SystemServices::RtlGetVersion,
    Win32::System::SystemInformation::OSVERSIONINFOW,
};

use super::{describe, Platform, PlatformInfo};

/// First build number that ships as Windows 11.
const WINDOWS_11_FIRST_BUILD: u32 = 22_000;

#[derive(Debug)]
pub(crate) struct WindowsPlatform {
    info: PlatformInfo,
}

impl WindowsPlatform {
    pub(crate) fn new() -> Self {
        let info = match query_version() {
            Some(v) => PlatformInfo::new(v.product_name(), &v.dotted()),
            None => PlatformInfo::new("Windows", ""),
        };
        Self { info }
    }
}

impl Platform for WindowsPlatform {
    fn name(&self) -> &str {
        self.info.name()
    }

    fn do_something_native(&self) -> String {
        match query_version() {
            Some(v) => describe(
                &format!("{} {}", v.product_name(), v.dotted()),
                &[&v.service_pack, std::env::consts::ARCH],
            ),
            None => describe("Windows", &[std::env::consts::ARCH]),
        }
    }
}

// ── Version query ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct OsVersion {
    major: u32,
    minor: u32,
    build: u32,
    /// `szCSDVersion`, e.g. `"Service Pack 1"`; empty on modern systems.
    service_pack: String,
}

impl OsVersion {
    /// Marketing name.  Windows 11 still reports major version 10.
    fn product_name(&self) -> &'static str {
        match (self.major, self.minor) {
            (10, 0) if self.build >= WINDOWS_11_FIRST_BUILD => "Windows 11",
            (10, 0) => "Windows 10",
            (6, 3) => "Windows 8.1",
            (6, 2) => "Windows 8",
            (6, 1) => "Windows 7",
            _ => "Windows",
        }
    }

    fn dotted(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.build)
    }
}

fn query_version() -> Option<OsVersion> {
    let mut info = OSVERSIONINFOW {
        // OSVERSIONINFOW is 276 bytes; the cast to u32 is always lossless.
        dwOSVersionInfoSize: std::mem::size_of::<OSVERSIONINFOW>() as u32,
        ..Default::default()
    };

    // SAFETY: `info` is a properly sized, writable OSVERSIONINFOW with
    // dwOSVersionInfoSize set, which is all RtlGetVersion requires.
    let status = unsafe { RtlGetVersion(&mut info) };
    if status.is_err() {
        tracing::debug!(status = status.0, "RtlGetVersion failed");
        return None;
    }

    let csd_len = info
        .szCSDVersion
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(info.szCSDVersion.len());

    Some(OsVersion {
        major: info.dwMajorVersion,
        minor: info.dwMinorVersion,
        build: info.dwBuildNumber,
        service_pack: String::from_utf16_lossy(&info.szCSDVersion[..csd_len]),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
