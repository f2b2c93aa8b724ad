// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::windows` – RtlGetVersion FFI
//   • `platform::win32`   – Win32 window hosting
// Each unsafe block in those modules MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]
// Release builds on Windows run as a GUI application (no console window).
// Debug builds keep the console so that log output is visible.
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

mod app;
mod config;
mod error;
mod logging;
mod platform;
mod ui;

use crate::{
    app::App,
    config::Settings,
    error::{InteropError, Result},
    platform::Platform,
    ui::Frontend,
};

fn main() {
    // Settings come first so their log level can seed the filter; a settings
    // error is held back and reported once the subscriber is installed.
    let (settings, settings_err) = config::load();
    logging::init(&settings.log_level);
    match settings_err {
        Some(e) => tracing::warn!(error = %e, "using default settings"),
        None => tracing::debug!(?settings, "settings loaded"),
    }

    if let Err(e) = run(&settings) {
        report_fatal(&e);
        std::process::exit(1);
    }
}

fn run(settings: &Settings) -> Result<()> {
    let platform = platform::current();
    tracing::info!(platform = platform.name(), "platform provider ready");

    let mut app = App::new(platform);
    let frontend = effective_frontend(settings.frontend);
    tracing::info!(frontend = frontend.as_str(), "starting front end");

    match frontend {
        #[cfg(windows)]
        Frontend::Gui => platform::win32::window::run(app, &settings.window),
        _ => ui::console::run_stdio(&mut app, settings.console_width),
    }
}

/// The requested front end, downgraded to the console where no native window
/// exists.
fn effective_frontend(requested: Frontend) -> Frontend {
    if requested == Frontend::Gui && !cfg!(windows) {
        tracing::warn!("no native window on this platform; falling back to the console");
        return Frontend::Console;
    }
    requested
}

fn report_fatal(e: &InteropError) {
    tracing::error!(error = %e, "fatal error");
    #[cfg(windows)]
    platform::win32::window::show_error_dialog(&e.to_string());
    #[cfg(not(windows))]
    eprintln!("interop-example: {e}");
}
