// ── Console front end ─────────────────────────────────────────────────────────
//
// Renders the one-screen UI as centred text and treats each input line as a
// UI event.  Reader and writer are generic so tests drive it in memory.
//
//   Interop Example — Linux 6.8.0
//   ────────────────────────────────
//            [ Click me! ]
//
//   Your text will be replaced depending on platform

use std::{
    cell::Cell,
    io::{self, BufRead, Write},
    rc::Rc,
};

use crate::{
    app::App,
    error::Result,
    platform::Platform,
    ui::{center, BUTTON_LABEL, CONSOLE_WIDTH_RANGE},
};

/// Printed after each screen and after unrecognised input.
const HINT: &str = "Press Enter (or type \"click\") to press the button, \"q\" to quit.";

/// One line of user input, interpreted.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Click,
    Quit,
    Unknown,
}

impl Command {
    fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "c" | "click" => Self::Click,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Unknown,
        }
    }
}

/// Run the console screen on the process's stdin/stdout.
pub(crate) fn run_stdio<P: Platform>(app: &mut App<P>, width: usize) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(app, stdin.lock(), stdout.lock(), width)
}

/// Draw the screen, then process input lines until quit or end of input.
///
/// The screen is redrawn only when the display state reports a change.
/// `width` is clamped to [`CONSOLE_WIDTH_RANGE`].  Input that is not valid
/// UTF-8 is decoded lossily, so a stray byte is just an unknown command.
pub(crate) fn run<P, R, W>(app: &mut App<P>, mut input: R, mut out: W, width: usize) -> Result<()>
where
    P: Platform,
    R: BufRead,
    W: Write,
{
    let width = width.clamp(*CONSOLE_WIDTH_RANGE.start(), *CONSOLE_WIDTH_RANGE.end());
    let dirty = Rc::new(Cell::new(false));
    let flag = Rc::clone(&dirty);
    app.subscribe(move |_| flag.set(true));

    render(app, &mut out, width)?;

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            tracing::debug!("console input closed");
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        match Command::parse(&line) {
            Command::Click => {
                app.activate();
                if dirty.replace(false) {
                    render(app, &mut out, width)?;
                }
            }
            Command::Quit => break,
            Command::Unknown => {
                tracing::debug!(input = line.trim(), "unrecognised console command");
                writeln!(out, "{HINT}")?;
            }
        }
    }

    out.flush()?;
    tracing::info!(activations = app.activation_count(), "console front end finished");
    Ok(())
}

fn render<P: Platform, W: Write>(app: &App<P>, out: &mut W, width: usize) -> io::Result<()> {
    let button = format!("[ {BUTTON_LABEL} ]");
    writeln!(out, "{}", center(&app.window_title(), width))?;
    writeln!(out, "{}", "\u{2500}".repeat(width))?;
    writeln!(out, "{}", center(&button, width))?;
    writeln!(out)?;
    writeln!(out, "{}", center(app.display_text(), width))?;
    writeln!(out)?;
    writeln!(out, "{HINT}")?;
    out.flush()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{app::tests::StubPlatform, ui::PLACEHOLDER};

    fn drive(answers: &[&str], input: &str) -> (App<StubPlatform>, String) {
        let mut app = App::new(StubPlatform::new("TestOS", answers));
        let mut out = Vec::new();
        run(&mut app, Cursor::new(input.as_bytes()), &mut out, 40).expect("console run");
        (app, String::from_utf8(out).expect("utf8 output"))
    }

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse("\n"), Command::Click);
        assert_eq!(Command::parse("  Click \r\n"), Command::Click);
        assert_eq!(Command::parse("c"), Command::Click);
        assert_eq!(Command::parse("Q"), Command::Quit);
        assert_eq!(Command::parse("exit\n"), Command::Quit);
        assert_eq!(Command::parse("jump"), Command::Unknown);
    }

    #[test]
    fn first_screen_shows_button_and_placeholder() {
        let (app, out) = drive(&[], "");
        assert_eq!(app.activation_count(), 0);
        assert!(out.contains("[ Click me! ]"));
        assert!(out.contains(PLACEHOLDER));
        assert!(out.contains("Interop Example \u{2014} TestOS"));
    }

    #[test]
    fn enter_activates_and_redraws() {
        let (app, out) = drive(&["TestOS 1.0"], "\n");
        assert_eq!(app.display_text(), "TestOS 1.0");
        let placeholder_at = out.find(PLACEHOLDER).expect("placeholder drawn");
        let result_at = out.find("TestOS 1.0").expect("result drawn");
        assert!(placeholder_at < result_at);
        assert_eq!(out.matches("[ Click me! ]").count(), 2);
    }

    #[test]
    fn each_click_shows_latest_answer() {
        let (app, out) = drive(&["TestOS 1.0", "TestOS 2.0"], "click\nc\n");
        assert_eq!(app.display_text(), "TestOS 2.0");
        assert_eq!(app.activation_count(), 2);
        assert!(out.rfind("TestOS 2.0") > out.rfind("TestOS 1.0"));
    }

    #[test]
    fn quit_stops_reading() {
        let (app, _) = drive(&["TestOS 1.0"], "q\n\n\n");
        assert_eq!(app.activation_count(), 0);
        assert_eq!(app.display_text(), PLACEHOLDER);
    }

    #[test]
    fn unknown_input_prints_hint_without_redraw() {
        let (app, out) = drive(&[], "jump\n");
        assert_eq!(app.activation_count(), 0);
        // Once under the first screen, once for the bad command.
        assert_eq!(out.matches(HINT).count(), 2);
        assert_eq!(out.matches("[ Click me! ]").count(), 1);
    }

    #[test]
    fn lines_are_centred_to_width() {
        let (_, out) = drive(&[], "");
        let button_line = out
            .lines()
            .find(|l| l.contains("[ Click me! ]"))
            .expect("button line");
        // 40 columns, 13-char button → 13 spaces of left padding.
        assert_eq!(button_line, format!("{}[ Click me! ]", " ".repeat(13)));
    }

    #[test]
    fn invalid_utf8_line_is_an_unknown_command() {
        let mut app = App::new(StubPlatform::new("TestOS", &["TestOS 1.0"]));
        let mut out = Vec::new();
        run(&mut app, Cursor::new(&b"\xff\n\n"[..]), &mut out, 40).expect("console run");
        assert_eq!(app.activation_count(), 1);
        assert_eq!(app.display_text(), "TestOS 1.0");
        let out = String::from_utf8(out).expect("utf8 output");
        // First screen, the bad line, and the redraw after the click.
        assert_eq!(out.matches(HINT).count(), 3);
    }

    #[test]
    fn oversized_width_is_clamped() {
        let mut app = App::new(StubPlatform::new("TestOS", &["TestOS 1.0"]));
        let mut out = Vec::new();
        run(&mut app, Cursor::new(&b"\n"[..]), &mut out, usize::MAX).expect("console run");
        let out = String::from_utf8(out).expect("utf8 output");
        let rule = "\u{2500}".repeat(*CONSOLE_WIDTH_RANGE.end());
        assert!(out.lines().any(|l| l == rule));
        assert_eq!(app.display_text(), "TestOS 1.0");
    }

    #[test]
    fn tiny_width_is_raised_to_minimum() {
        let mut app = App::new(StubPlatform::new("TestOS", &[]));
        let mut out = Vec::new();
        run(&mut app, Cursor::new(&b""[..]), &mut out, 0).expect("console run");
        let out = String::from_utf8(out).expect("utf8 output");
        let rule = "\u{2500}".repeat(*CONSOLE_WIDTH_RANGE.start());
        assert!(out.lines().any(|l| l == rule));
    }
}
