// ── Fallback provider ─────────────────────────────────────────────────────────
//
// Used on targets without a dedicated provider (the BSDs, illumos, …).
// Nothing is queried at run time; the answer comes from compile-time target
// constants, which are always available.

use std::env::consts::{ARCH, FAMILY, OS};

use super::{describe, Platform, PlatformInfo};

#[derive(Debug)]
pub(crate) struct FallbackPlatform {
    info: PlatformInfo,
}

impl FallbackPlatform {
    pub(crate) fn new() -> Self {
        Self {
            info: PlatformInfo::new(OS, ""),
        }
    }
}

impl Platform for FallbackPlatform {
    fn name(&self) -> &str {
        self.info.name()
    }

    fn do_something_native(&self) -> String {
        describe(OS, &[FAMILY, ARCH])
    }
}
