// ── Presentation constants & layout helpers ───────────────────────────────────
//
// Pure Rust shared by both front ends.  No Win32 calls here; the native
// window lives in `platform::win32::window`.

use std::ops::RangeInclusive;

use serde::Deserialize;

pub(crate) mod console;

/// Caption of the single button.
pub(crate) const BUTTON_LABEL: &str = "Click me!";

/// Text shown before the first activation.
pub(crate) const PLACEHOLDER: &str = "Your text will be replaced depending on platform";

/// Application name, used as the window title prefix.
pub(crate) const APP_TITLE: &str = "Interop Example";

/// Column counts the console front end can lay out.
pub(crate) const CONSOLE_WIDTH_RANGE: RangeInclusive<usize> = 20..=500;

/// Which rendering of the screen to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Frontend {
    /// Native window with a real push button.  Windows only.
    Gui,
    /// Line-oriented screen on stdin/stdout.
    Console,
}

impl Default for Frontend {
    fn default() -> Self {
        if cfg!(windows) {
            Self::Gui
        } else {
            Self::Console
        }
    }
}

impl Frontend {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Gui => "gui",
            Self::Console => "console",
        }
    }
}

/// Pad `text` on the left so it sits horizontally centred in `width` columns.
///
/// Text at least as wide as `width` is returned unchanged.  Width is counted
/// in `char`s, which is exact for the ASCII and Latin text this app shows.
pub(crate) fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_owned();
    }
    let pad = (width - len) / 2;
    format!("{:pad$}{text}", "")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_pads_left_half() {
        assert_eq!(center("ab", 6), "  ab");
        assert_eq!(center("abc", 6), " abc");
    }

    #[test]
    fn center_leaves_wide_text_alone() {
        assert_eq!(center("wide text", 4), "wide text");
        assert_eq!(center("", 0), "");
    }

    #[test]
    fn frontend_serde_names() {
        let g: Frontend = serde_json::from_str("\"gui\"").expect("de");
        assert_eq!(g, Frontend::Gui);
        let f: Frontend = serde_json::from_str("\"console\"").expect("de");
        assert_eq!(f, Frontend::Console);
        assert_eq!(f.as_str(), "console");
    }

    #[test]
    fn default_frontend_matches_target() {
        let expected = if cfg!(windows) { Frontend::Gui } else { Frontend::Console };
        assert_eq!(Frontend::default(), expected);
    }
}
