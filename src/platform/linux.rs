// ── Linux provider ────────────────────────────────────────────────────────────
//
// Identification comes from two plain files:
//   • `/proc/sys/kernel/osrelease`: the running kernel release
//   • `/etc/os-release` (or `/usr/lib/os-release`): the distribution
//
// Everything is read relative to a root directory so tests can point the
// provider at a fixture tree.

use std::{
    fs,
    path::{Path, PathBuf},
};

use super::{describe, nonblank, Platform, PlatformInfo};

const KERNEL_RELEASE: &str = "proc/sys/kernel/osrelease";

/// `os-release(5)` search order.
const OS_RELEASE: [&str; 2] = ["etc/os-release", "usr/lib/os-release"];

/// Provider backed by procfs and `os-release`.
#[derive(Debug)]
pub(crate) struct LinuxPlatform {
    root: PathBuf,
    info: PlatformInfo,
}

impl LinuxPlatform {
    /// Provider for the running system.
    pub(crate) fn new() -> Self {
        Self::with_root("/")
    }

    /// Provider that reads every file below `root` instead of `/`.
    pub(crate) fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let kernel = read_kernel_release(&root).unwrap_or_default();
        let info = PlatformInfo::new("Linux", &kernel);
        Self { root, info }
    }
}

impl Platform for LinuxPlatform {
    fn name(&self) -> &str {
        self.info.name()
    }

    fn do_something_native(&self) -> String {
        let distro = read_os_release(&self.root)
            .map(|r| r.display_name())
            .unwrap_or_default();
        let kernel = read_kernel_release(&self.root)
            .map(|k| format!("kernel {k}"))
            .unwrap_or_default();
        let headline = if distro.is_empty() { "Linux" } else { distro.as_str() };
        describe(headline, &[&kernel, std::env::consts::ARCH])
    }
}

// ── File readers ──────────────────────────────────────────────────────────────

fn read_kernel_release(root: &Path) -> Option<String> {
    match fs::read_to_string(root.join(KERNEL_RELEASE)) {
        Ok(s) => nonblank(&s).map(str::to_owned),
        Err(e) => {
            tracing::debug!(error = %e, "kernel release unavailable");
            None
        }
    }
}

fn read_os_release(root: &Path) -> Option<OsRelease> {
    let text = OS_RELEASE
        .iter()
        .find_map(|rel| fs::read_to_string(root.join(rel)).ok());
    if text.is_none() {
        tracing::debug!(root = %root.display(), "no os-release file found");
    }
    text.map(|t| OsRelease::parse(&t))
}

// ── os-release ────────────────────────────────────────────────────────────────

/// The handful of `os-release` keys used to name the distribution.
#[derive(Debug, Default, PartialEq, Eq)]
struct OsRelease {
    name: Option<String>,
    version_id: Option<String>,
    pretty_name: Option<String>,
}

impl OsRelease {
    /// Parse newline-separated `KEY=value` assignments.
    ///
    /// Values may be bare or wrapped in single or double quotes.  Blank
    /// lines, `#` comments and unknown keys are ignored.
    fn parse(text: &str) -> Self {
        let mut out = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = unquote(value.trim());
            let slot = match key.trim() {
                "NAME" => &mut out.name,
                "VERSION_ID" => &mut out.version_id,
                "PRETTY_NAME" => &mut out.pretty_name,
                _ => continue,
            };
            *slot = nonblank(value).map(str::to_owned);
        }
        out
    }

    /// `PRETTY_NAME`, else `NAME VERSION_ID`, else `"Linux"`.
    fn display_name(&self) -> String {
        if let Some(pretty) = &self.pretty_name {
            return pretty.clone();
        }
        let name = self.name.as_deref().unwrap_or("Linux");
        match &self.version_id {
            Some(v) => format!("{name} {v}"),
            None => name.to_owned(),
        }
    }
}

fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(q).and_then(|v| v.strip_suffix(q)) {
            return inner;
        }
    }
    value
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, contents).expect("write fixture");
    }

    #[test]
    fn parse_prefers_pretty_name() {
        let r = OsRelease::parse(
            "NAME=\"Fedora Linux\"\nVERSION_ID=40\nPRETTY_NAME=\"Fedora Linux 40 (Workstation Edition)\"\n",
        );
        assert_eq!(r.display_name(), "Fedora Linux 40 (Workstation Edition)");
    }

    #[test]
    fn parse_falls_back_to_name_and_version() {
        let r = OsRelease::parse("# generated\nNAME='Alpine Linux'\nVERSION_ID=3.20.1\n");
        assert_eq!(r.name.as_deref(), Some("Alpine Linux"));
        assert_eq!(r.display_name(), "Alpine Linux 3.20.1");
    }

    #[test]
    fn parse_ignores_junk_and_blank_values() {
        let r = OsRelease::parse("garbage line\nPRETTY_NAME=\"\"\nID=arch\nNAME=Arch Linux\n");
        assert_eq!(r.pretty_name, None);
        assert_eq!(r.display_name(), "Arch Linux");
    }

    #[test]
    fn empty_os_release_names_linux() {
        assert_eq!(OsRelease::parse("").display_name(), "Linux");
    }

    #[test]
    fn name_comes_from_kernel_release() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), KERNEL_RELEASE, "6.8.0-31-generic\n");
        let p = LinuxPlatform::with_root(dir.path());
        assert_eq!(p.name(), "Linux 6.8.0-31-generic");
    }

    #[test]
    fn native_query_combines_distro_kernel_and_arch() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), KERNEL_RELEASE, "6.8.0\n");
        write(dir.path(), "etc/os-release", "PRETTY_NAME=\"Ubuntu 24.04 LTS\"\n");
        let p = LinuxPlatform::with_root(dir.path());
        assert_eq!(
            p.do_something_native(),
            format!("Ubuntu 24.04 LTS (kernel 6.8.0, {})", std::env::consts::ARCH)
        );
    }

    #[test]
    fn usr_lib_os_release_is_second_choice() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "usr/lib/os-release", "NAME=Debian\nVERSION_ID=12\n");
        let p = LinuxPlatform::with_root(dir.path());
        assert!(p.do_something_native().starts_with("Debian 12 ("));
    }

    #[test]
    fn empty_root_still_answers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let p = LinuxPlatform::with_root(dir.path());
        assert_eq!(p.name(), "Linux");
        assert_eq!(
            p.do_something_native(),
            format!("Linux ({})", std::env::consts::ARCH)
        );
    }
}
