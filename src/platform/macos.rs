// ── macOS provider ────────────────────────────────────────────────────────────
//
// Reads `SystemVersion.plist`, the same file `sw_vers` reports from, by
// scanning for each `<key>` and taking the `<string>` that follows it.

use std::{
    fs,
    path::{Path, PathBuf},
};

use super::{describe, nonblank, Platform, PlatformInfo};

const SYSTEM_VERSION_PLIST: &str = "System/Library/CoreServices/SystemVersion.plist";

/// Provider backed by `SystemVersion.plist`.
#[derive(Debug)]
pub(crate) struct MacPlatform {
    root: PathBuf,
    info: PlatformInfo,
}

impl MacPlatform {
    /// Provider for the running system.
    pub(crate) fn new() -> Self {
        Self::with_root("/")
    }

    /// Provider that reads the plist below `root` instead of `/`.
    pub(crate) fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let v = read_system_version(&root).unwrap_or_default();
        let info = PlatformInfo::new(
            v.product_name.as_deref().unwrap_or("macOS"),
            v.product_version.as_deref().unwrap_or_default(),
        );
        Self { root, info }
    }
}

impl Platform for MacPlatform {
    fn name(&self) -> &str {
        self.info.name()
    }

    fn do_something_native(&self) -> String {
        let v = read_system_version(&self.root).unwrap_or_default();
        let headline = format!(
            "{} {}",
            v.product_name.as_deref().unwrap_or("macOS"),
            v.product_version.as_deref().unwrap_or_default()
        );
        let build = v
            .build_version
            .map(|b| format!("build {b}"))
            .unwrap_or_default();
        describe(&headline, &[&build, std::env::consts::ARCH])
    }
}

// ── SystemVersion.plist ───────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq)]
struct SystemVersion {
    product_name: Option<String>,
    product_version: Option<String>,
    build_version: Option<String>,
}

impl SystemVersion {
    fn parse(xml: &str) -> Self {
        Self {
            product_name: plist_string(xml, "ProductName"),
            product_version: plist_string(xml, "ProductVersion"),
            build_version: plist_string(xml, "ProductBuildVersion"),
        }
    }
}

fn read_system_version(root: &Path) -> Option<SystemVersion> {
    match fs::read_to_string(root.join(SYSTEM_VERSION_PLIST)) {
        Ok(xml) => Some(SystemVersion::parse(&xml)),
        Err(e) => {
            tracing::debug!(error = %e, "SystemVersion.plist unavailable");
            None
        }
    }
}

/// The `<string>` that immediately follows `<key>{key}</key>`.
fn plist_string(xml: &str, key: &str) -> Option<String> {
    let marker = format!("<key>{key}</key>");
    let after_key = &xml[xml.find(&marker)? + marker.len()..];
    let after_ws = after_key.trim_start();
    let body = after_ws.strip_prefix("<string>")?;
    let end = body.find("</string>")?;
    nonblank(&body[..end]).map(str::to_owned)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
