// ── Application state ─────────────────────────────────────────────────────────
//
// A single `App` is created on startup, after the platform provider, and is
// owned by whichever front end runs (console loop or `WindowState`).  All
// mutations happen on the UI thread; there is no global mutable state.

use crate::{
    platform::Platform,
    ui::{APP_TITLE, PLACEHOLDER},
};

// ── DisplayState ──────────────────────────────────────────────────────────────

/// Callback invoked with the new text each time the display changes.
pub(crate) type Subscriber = Box<dyn FnMut(&str)>;

/// The one piece of mutable UI state: the text shown under the button.
///
/// Front ends observe it through [`DisplayState::subscribe`] rather than
/// polling; every [`DisplayState::set`] notifies all subscribers, in
/// registration order, before returning.
pub(crate) struct DisplayState {
    text: String,
    subscribers: Vec<Subscriber>,
}

impl DisplayState {
    fn new(initial: &str) -> Self {
        Self {
            text: initial.to_owned(),
            subscribers: Vec::new(),
        }
    }

    pub(crate) fn get(&self) -> &str {
        &self.text
    }

    /// Replace the text wholesale and notify subscribers.
    pub(crate) fn set(&mut self, text: String) {
        self.text = text;
        for sub in &mut self.subscribers {
            sub(&self.text);
        }
    }

    pub(crate) fn subscribe(&mut self, f: impl FnMut(&str) + 'static) {
        self.subscribers.push(Box::new(f));
    }
}

impl std::fmt::Debug for DisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayState")
            .field("text", &self.text)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Top-level application state.
///
/// Generic over the capability provider so tests can inject a stub; the
/// binary always uses `platform::NativePlatform`.
#[derive(Debug)]
pub(crate) struct App<P: Platform> {
    platform: P,
    display: DisplayState,
    activations: u64,
}

impl<P: Platform> App<P> {
    /// Create the shell with the placeholder text showing.
    pub(crate) fn new(platform: P) -> Self {
        Self {
            platform,
            display: DisplayState::new(PLACEHOLDER),
            activations: 0,
        }
    }

    /// Handle a button press: run the native query and show its result.
    ///
    /// Cannot fail.  Subscribers have seen the new text when this returns.
    pub(crate) fn activate(&mut self) {
        let text = self.platform.do_something_native();
        self.activations += 1;
        tracing::debug!(activation = self.activations, text = %text, "native action returned");
        self.display.set(text);
    }

    pub(crate) fn display_text(&self) -> &str {
        self.display.get()
    }

    pub(crate) fn subscribe(&mut self, f: impl FnMut(&str) + 'static) {
        self.display.subscribe(f);
    }

    pub(crate) fn platform_name(&self) -> &str {
        self.platform.name()
    }

    pub(crate) fn activation_count(&self) -> u64 {
        self.activations
    }

    /// `"Interop Example \u{2014} <platform name>"`.
    pub(crate) fn window_title(&self) -> String {
        format!("{APP_TITLE} \u{2014} {}", self.platform_name())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use std::{cell::RefCell, collections::VecDeque, rc::Rc};

    use super::*;

    /// Provider that hands out scripted answers, then repeats the last one.
    pub(crate) struct StubPlatform {
        name: String,
        answers: RefCell<VecDeque<String>>,
        last: RefCell<String>,
    }

    impl StubPlatform {
        pub(crate) fn new(name: &str, answers: &[&str]) -> Self {
            Self {
                name: name.to_owned(),
                answers: RefCell::new(answers.iter().map(|s| (*s).to_owned()).collect()),
                last: RefCell::new(name.to_owned()),
            }
        }
    }

    impl Platform for StubPlatform {
        fn name(&self) -> &str {
            &self.name
        }

        fn do_something_native(&self) -> String {
            if let Some(next) = self.answers.borrow_mut().pop_front() {
                *self.last.borrow_mut() = next;
            }
            self.last.borrow().clone()
        }
    }

    #[test]
    fn starts_with_placeholder() {
        let app = App::new(StubPlatform::new("TestOS", &[]));
        assert_eq!(app.display_text(), "Your text will be replaced depending on platform");
        assert_eq!(app.activation_count(), 0);
    }

    #[test]
    fn activation_replaces_text() {
        let mut app = App::new(StubPlatform::new("TestOS", &["TestOS 1.0"]));
        app.activate();
        assert_eq!(app.display_text(), "TestOS 1.0");
    }

    #[test]
    fn scripted_scenario_tracks_latest_answer() {
        let mut app = App::new(StubPlatform::new("TestOS", &["TestOS 1.0", "TestOS 2.0"]));
        assert_eq!(app.display_text(), PLACEHOLDER);
        app.activate();
        assert_eq!(app.display_text(), "TestOS 1.0");
        app.activate();
        assert_eq!(app.display_text(), "TestOS 2.0");
    }

    #[test]
    fn nth_activation_wins_without_accumulating() {
        let answers = ["a", "b", "c", "d", "e"];
        let mut app = App::new(StubPlatform::new("TestOS", &answers));
        for _ in 0..answers.len() {
            app.activate();
        }
        assert_eq!(app.display_text(), "e");
        assert_eq!(app.activation_count(), 5);
    }

    #[test]
    fn repeated_identical_answers_are_idempotent() {
        let mut app = App::new(StubPlatform::new("TestOS", &["same"]));
        app.activate();
        app.activate();
        app.activate();
        assert_eq!(app.display_text(), "same");
    }

    #[test]
    fn subscribers_see_each_update_in_order() {
        let seen = Rc::new(RefCell::new(Vec::<String>::new()));
        let mut app = App::new(StubPlatform::new("TestOS", &["one", "two"]));

        let first = Rc::clone(&seen);
        app.subscribe(move |t| first.borrow_mut().push(format!("first:{t}")));
        let second = Rc::clone(&seen);
        app.subscribe(move |t| second.borrow_mut().push(format!("second:{t}")));

        app.activate();
        app.activate();

        assert_eq!(
            *seen.borrow(),
            ["first:one", "second:one", "first:two", "second:two"]
        );
    }

    #[test]
    fn subscribing_does_not_fire_immediately() {
        let hits = Rc::new(RefCell::new(0));
        let mut app = App::new(StubPlatform::new("TestOS", &["x"]));
        let h = Rc::clone(&hits);
        app.subscribe(move |_| *h.borrow_mut() += 1);
        assert_eq!(*hits.borrow(), 0);
        app.activate();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn title_includes_platform_name() {
        let app = App::new(StubPlatform::new("TestOS 1.0", &[]));
        assert_eq!(app.window_title(), "Interop Example \u{2014} TestOS 1.0");
    }
}
