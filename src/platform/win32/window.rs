// ── Main window ───────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the main window class.
//   • Create the top-level window with a push button and a static label.
//   • Run the Win32 message loop.
//   • Dispatch WM_NCCREATE, WM_CREATE, WM_SIZE, WM_DPICHANGED, WM_COMMAND,
//     WM_CLOSE, WM_DESTROY, WM_NCDESTROY.
//   • Expose a safe error-dialog helper for use by main().
//
// `WindowState` (which owns the `App`) is allocated by `run()` and reachable
// from the WndProc through GWLP_USERDATA while the window exists.

#![allow(unsafe_code)]

use std::ffi::c_void;

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::{GetStockObject, UpdateWindow, DEFAULT_GUI_FONT, HBRUSH, WHITE_BRUSH},
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetClientRect,
            GetMessageW, GetWindowLongPtrW, LoadCursorW, LoadIconW, MessageBoxW, MoveWindow,
            PostQuitMessage, RegisterClassExW, SendMessageW, SetWindowLongPtrW, SetWindowPos,
            SetWindowTextW, ShowWindow, TranslateMessage, BN_CLICKED, CREATESTRUCTW, CS_HREDRAW,
            CS_VREDRAW, CW_USEDEFAULT, GWLP_USERDATA, HMENU, IDC_ARROW, IDI_APPLICATION,
            MB_ICONERROR, MB_OK, MSG, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOZORDER, SW_SHOW, WINDOW_EX_STYLE,
            WINDOW_STYLE, WM_CLOSE, WM_COMMAND, WM_CREATE, WM_DESTROY, WM_DPICHANGED,
            WM_NCCREATE, WM_NCDESTROY, WM_SETFONT, WM_SIZE, WNDCLASSEXW, WS_CHILD,
            WS_OVERLAPPEDWINDOW, WS_TABSTOP, WS_VISIBLE,
        },
    },
};

use super::dpi;
use crate::{
    app::App,
    config::WindowSettings,
    error::{InteropError, Result},
    platform::NativePlatform,
    ui::BUTTON_LABEL,
};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register (and later find) the main window class.
const CLASS_NAME: PCWSTR = w!("InteropExampleMainWindow");

// ── Child controls ────────────────────────────────────────────────────────────

/// Control ID of the push button; arrives in the low word of WM_COMMAND.
const IDC_BUTTON: usize = 101;

/// Control ID of the static label.
const IDC_LABEL: usize = 102;

/// `BS_DEFPUSHBUTTON`: push button drawn as the dialog default.
const BUTTON_STYLE: u32 = 0x0001;

/// `SS_CENTER`: horizontally centred, word-wrapped static text.
const LABEL_STYLE: u32 = 0x0001;

// Layout metrics at 96 DPI; scaled per monitor by `dpi::scale`.
const MARGIN: i32 = 16;
const BUTTON_WIDTH: i32 = 120;
const BUTTON_HEIGHT: i32 = 32;

// ── Per-window state ──────────────────────────────────────────────────────────

struct WindowState {
    app: App<NativePlatform>,
    button: HWND,
    label: HWND,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Register the main window class, create the window, and drive the message
/// loop until the user closes the application.
///
/// Logs elapsed start-up time (debug builds only) once the window is shown.
pub(crate) fn run(app: App<NativePlatform>, size: &WindowSettings) -> Result<()> {
    #[cfg(debug_assertions)]
    let t0 = std::time::Instant::now();

    // Per-Monitor v2 must be set before the first window exists.
    dpi::init();

    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // always valid for the process lifetime and never fails in practice.
    let hmodule = unsafe { GetModuleHandleW(None) }.map_err(InteropError::from)?;
    let hinstance = HINSTANCE(hmodule.0);

    register_class(hinstance)?;

    let title = wide(&app.window_title());
    let state = Box::into_raw(Box::new(WindowState {
        app,
        button: HWND::default(),
        label: HWND::default(),
    }));

    let result = create_window(hinstance, &title, size, state).and_then(|hwnd| {
        // SAFETY: hwnd was just returned by CreateWindowExW and is valid.
        // ShowWindow returns the previous visibility state; UpdateWindow
        // returns a success BOOL; both are intentionally ignored here.
        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = UpdateWindow(hwnd);
        }

        #[cfg(debug_assertions)]
        tracing::debug!(
            elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0,
            "window visible"
        );

        message_loop()
    });

    // SAFETY: `state` came from Box::into_raw above.  The window has been
    // destroyed (or was never created), WM_NCDESTROY cleared GWLP_USERDATA,
    // so no other pointer to the state remains.
    let state = unsafe { Box::from_raw(state) };
    tracing::info!(
        activations = state.app.activation_count(),
        "window front end finished"
    );

    result
}

/// Show a modal error dialog with the given message.
///
/// Safe to call from any context; performs the UTF-16 conversion internally.
/// Used by `main()` when the front end returns an error.
pub(crate) fn show_error_dialog(message: &str) {
    let msg_wide = wide(message);
    let title_wide = wide("Interop Example \u{2014} Fatal Error");

    // SAFETY: msg_wide and title_wide are valid null-terminated UTF-16 strings
    // that remain allocated for the duration of the MessageBoxW call.
    // HWND::default() (null) means the dialog has no owner window.
    unsafe {
        let _ = MessageBoxW(
            HWND::default(),
            PCWSTR(msg_wide.as_ptr()),
            PCWSTR(title_wide.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}

// ── Window class registration ─────────────────────────────────────────────────

fn register_class(hinstance: HINSTANCE) -> Result<()> {
    // SAFETY: LoadIconW with IDI_APPLICATION always succeeds; it loads the
    // built-in application icon resource, which exists on all Windows versions.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }.map_err(InteropError::from)?;

    // SAFETY: LoadCursorW with IDC_ARROW always succeeds; the arrow cursor is
    // a built-in resource guaranteed to exist on all Windows versions.
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(InteropError::from)?;

    // SAFETY: GetStockObject with WHITE_BRUSH always returns a valid HGDIOBJ.
    // Casting to HBRUSH is correct: stock brush objects are compatible types.
    let bg_brush = unsafe { HBRUSH(GetStockObject(WHITE_BRUSH).0) };

    let wndclass = WNDCLASSEXW {
        // WNDCLASSEXW is ~80 bytes; the cast to u32 is always lossless.
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        hbrBackground: bg_brush,
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
    };

    // SAFETY: wndclass is fully initialised with valid handles;
    // CLASS_NAME is a valid null-terminated UTF-16 string literal.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error("RegisterClassExW"));
    }

    Ok(())
}

// ── Window creation ───────────────────────────────────────────────────────────

fn create_window(
    hinstance: HINSTANCE,
    title: &[u16],
    size: &WindowSettings,
    state: *mut WindowState,
) -> Result<HWND> {
    // SAFETY: CLASS_NAME was just registered; hinstance is the exe's module.
    // `title` is null-terminated and outlives the call.  `state` is a live
    // heap allocation owned by run(); WM_NCCREATE stores it in GWLP_USERDATA.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            PCWSTR(title.as_ptr()),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            size.width,
            size.height,
            HWND::default(),
            HMENU::default(),
            hinstance,
            Some(state as *const c_void),
        )
    }
    .map_err(InteropError::from)?;

    // The frame was sized at 96 DPI; rescale for the monitor it landed on.
    let dpi = dpi::get_for_window(hwnd);
    if dpi != dpi::BASE_DPI {
        // SAFETY: hwnd is valid; a null insert-after handle with SWP_NOZORDER
        // leaves the Z order untouched.
        unsafe {
            let _ = SetWindowPos(
                hwnd,
                HWND::default(),
                0,
                0,
                dpi::scale(size.width, dpi),
                dpi::scale(size.height, dpi),
                SWP_NOZORDER | SWP_NOACTIVATE | SWP_NOMOVE,
            );
        }
    }

    Ok(hwnd)
}

/// Create the button and label children and wire the label to the display
/// state.  Called from WM_CREATE.
fn create_children(hwnd: HWND, state: &mut WindowState) -> Result<()> {
    // SAFETY: same as in run(); the exe's module handle is process-wide.
    let hmodule = unsafe { GetModuleHandleW(None) }.map_err(InteropError::from)?;
    let hinstance = HINSTANCE(hmodule.0);

    let button_text = wide(BUTTON_LABEL);
    let label_text = wide(state.app.display_text());

    // SAFETY: "BUTTON" and "STATIC" are system classes; the text buffers are
    // null-terminated and outlive each call; the control IDs are passed in the
    // HMENU slot as Win32 requires for child windows.
    let (button, label) = unsafe {
        let button = CreateWindowExW(
            WINDOW_EX_STYLE(0),
            w!("BUTTON"),
            PCWSTR(button_text.as_ptr()),
            WS_CHILD | WS_VISIBLE | WS_TABSTOP | WINDOW_STYLE(BUTTON_STYLE),
            0,
            0,
            0,
            0,
            hwnd,
            HMENU(IDC_BUTTON as *mut c_void),
            hinstance,
            None,
        )
        .map_err(InteropError::from)?;

        let label = CreateWindowExW(
            WINDOW_EX_STYLE(0),
            w!("STATIC"),
            PCWSTR(label_text.as_ptr()),
            WS_CHILD | WS_VISIBLE | WINDOW_STYLE(LABEL_STYLE),
            0,
            0,
            0,
            0,
            hwnd,
            HMENU(IDC_LABEL as *mut c_void),
            hinstance,
            None,
        )
        .map_err(InteropError::from)?;

        (button, label)
    };

    // SAFETY: DEFAULT_GUI_FONT is a stock object and never needs freeing;
    // WM_SETFONT with lParam = TRUE redraws the control immediately.
    unsafe {
        let font = GetStockObject(DEFAULT_GUI_FONT);
        for ctl in [button, label] {
            let _ = SendMessageW(ctl, WM_SETFONT, WPARAM(font.0 as usize), LPARAM(1));
        }
    }

    state.button = button;
    state.label = label;
    state.app.subscribe(move |text| set_label_text(label, text));

    layout(hwnd, state);
    Ok(())
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// Centre the button at the top of the client area and give the label the
/// full width below it.
fn layout(hwnd: HWND, state: &WindowState) {
    let mut rc = RECT::default();
    // SAFETY: hwnd is valid for the duration of the message handler; rc is a
    // writable RECT.
    if unsafe { GetClientRect(hwnd, &mut rc) }.is_err() {
        return;
    }

    let dpi = dpi::get_for_window(hwnd);
    let margin = dpi::scale(MARGIN, dpi);
    let bw = dpi::scale(BUTTON_WIDTH, dpi);
    let bh = dpi::scale(BUTTON_HEIGHT, dpi);
    let width = rc.right - rc.left;
    let height = rc.bottom - rc.top;

    let label_y = margin * 2 + bh;
    let label_w = (width - margin * 2).max(0);
    let label_h = (height - label_y - margin).max(0);

    // SAFETY: both children were created by create_children and live as long
    // as the parent.  MoveWindow failures leave the previous layout in place.
    unsafe {
        let _ = MoveWindow(state.button, (width - bw) / 2, margin, bw, bh, true);
        let _ = MoveWindow(state.label, margin, label_y, label_w, label_h, true);
    }
}

fn set_label_text(label: HWND, text: &str) {
    let text = wide(text);
    // SAFETY: label is a child of the main window, which outlives the App
    // (and therefore this subscriber); text is null-terminated.
    unsafe {
        let _ = SetWindowTextW(label, PCWSTR(text.as_ptr()));
    }
}

// ── Message loop ──────────────────────────────────────────────────────────────

fn message_loop() -> Result<()> {
    let mut msg = MSG::default();

    loop {
        // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
        // messages for all windows on this thread; 0,0 filter accepts all.
        let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };

        match ret.0 {
            // GetMessageW returns -1 on error.
            -1 => return Err(last_error("GetMessageW")),
            // Returns 0 when WM_QUIT is retrieved: exit the loop cleanly.
            0 => break,
            _ => unsafe {
                // SAFETY: msg was populated by a successful GetMessageW call.
                let _ = TranslateMessage(&msg);
                let _ = DispatchMessageW(&msg);
            },
        }
    }

    Ok(())
}

// ── Window procedure ──────────────────────────────────────────────────────────

/// Borrow the state attached to `hwnd`, if any.
///
/// # Safety
/// The pointer in GWLP_USERDATA must be null or the live `WindowState` set in
/// WM_NCCREATE, and no other reference to it may be active.
unsafe fn state_mut<'a>(hwnd: HWND) -> Option<&'a mut WindowState> {
    (GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowState).as_mut()
}

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call; we must not store hwnd beyond the message handler.
unsafe extern "system" fn wnd_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        // ── Lifecycle ─────────────────────────────────────────────────────────
        WM_NCCREATE => {
            // SAFETY: for WM_NCCREATE, lparam points at the CREATESTRUCTW whose
            // lpCreateParams is the WindowState pointer passed by create_window.
            let cs = lparam.0 as *const CREATESTRUCTW;
            if let Some(cs) = cs.as_ref() {
                SetWindowLongPtrW(hwnd, GWLP_USERDATA, cs.lpCreateParams as isize);
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        WM_CREATE => match state_mut(hwnd) {
            Some(state) => match create_children(hwnd, state) {
                Ok(()) => LRESULT(0),
                Err(e) => {
                    tracing::error!(error = %e, "failed to create child controls");
                    // -1 makes CreateWindowExW fail and destroy the window.
                    LRESULT(-1)
                }
            },
            None => LRESULT(-1),
        },

        WM_CLOSE => {
            // SAFETY: DestroyWindow triggers WM_DESTROY, which posts WM_QUIT.
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }

        WM_DESTROY => {
            // SAFETY: PostQuitMessage is always safe to call from WM_DESTROY.
            PostQuitMessage(0);
            LRESULT(0)
        }

        WM_NCDESTROY => {
            // Detach the state; run() frees it after the loop ends.
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        // ── Layout ────────────────────────────────────────────────────────────
        WM_SIZE => {
            if let Some(state) = state_mut(hwnd) {
                layout(hwnd, state);
            }
            LRESULT(0)
        }

        WM_DPICHANGED => {
            // SAFETY: for WM_DPICHANGED, lparam points at the suggested RECT
            // for the new DPI, valid for the duration of the message.
            if let Some(rc) = (lparam.0 as *const RECT).as_ref() {
                let _ = SetWindowPos(
                    hwnd,
                    HWND::default(),
                    rc.left,
                    rc.top,
                    rc.right - rc.left,
                    rc.bottom - rc.top,
                    SWP_NOZORDER | SWP_NOACTIVATE,
                );
            }
            if let Some(state) = state_mut(hwnd) {
                layout(hwnd, state);
            }
            LRESULT(0)
        }

        // ── Commands ──────────────────────────────────────────────────────────
        WM_COMMAND => {
            // Low word of WPARAM is the control ID, high word the notification.
            let id = wparam.0 & 0xFFFF;
            let code = ((wparam.0 >> 16) & 0xFFFF) as u32;

            if id == IDC_BUTTON && code == BN_CLICKED {
                if let Some(state) = state_mut(hwnd) {
                    // The label subscriber runs inside activate().
                    state.app.activate();
                }
                LRESULT(0)
            } else {
                DefWindowProcW(hwnd, msg, wparam, lparam)
            }
        }

        // Default processing for all unhandled messages.
        // SAFETY: hwnd and message parameters are valid, provided by Windows.
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// UTF-16, null-terminated copy of `s` for `PCWSTR` arguments.
fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Capture the current Win32 last-error code and wrap it in an `InteropError`.
///
/// Call immediately after a Win32 function that signals failure; `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
fn last_error(function: &'static str) -> InteropError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    let code = unsafe { GetLastError() };
    InteropError::Win32 {
        function,
        code: code.0,
    }
}
