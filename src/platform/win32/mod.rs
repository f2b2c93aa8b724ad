// ── Win32 front end ───────────────────────────────────────────────────────────
//
// One of the two places in the codebase where `unsafe` code is permitted (the
// other is the `platform::windows` version query).  Every `unsafe` block MUST
// carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod window; // main window, button + label children, message loop

pub(crate) mod dpi; // per-monitor DPI v2 helpers
