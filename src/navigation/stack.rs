use super::screen::Screen;

/// Per-user history of screens, most recent last.
///
/// The top is always the screen currently on the user's display. The
/// transient-skip policy needs to know whether the user's e-mail is already
/// stored; callers pass that in so the stack itself stays a plain value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationStack {
    screens: Vec<Screen>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the history.
    pub fn reset(&mut self) {
        self.screens.clear();
    }

    /// Pushes `screen` and returns what was actually pushed.
    ///
    /// A resolved transient screen is replaced with its target, so `Email`
    /// never lands on the stack once the e-mail is known. An unresolved
    /// transient screen already on top is not pushed a second time.
    pub fn push(&mut self, screen: Screen, email_resolved: bool) -> Screen {
        let screen = if screen.is_transient() && email_resolved {
            screen.resolved_target()
        } else {
            screen
        };
        if screen.is_transient() && self.peek() == Some(screen) {
            return screen;
        }
        self.screens.push(screen);
        screen
    }

    /// Steps back one screen and returns the new top.
    ///
    /// Resolved transient screens uncovered by the pop are dropped as well.
    /// Popping the last screen leaves exactly `[fallback]`.
    pub fn pop(&mut self, fallback: Screen, email_resolved: bool) -> Screen {
        self.screens.pop();
        if email_resolved {
            while self.peek().is_some_and(Screen::is_transient) {
                self.screens.pop();
            }
        }
        match self.peek() {
            Some(top) => top,
            None => {
                self.screens.push(fallback);
                fallback
            }
        }
    }

    /// Removes the top if it is a transient screen. Returns whether it did.
    pub fn drop_transient_top(&mut self) -> bool {
        if self.peek().is_some_and(Screen::is_transient) {
            self.screens.pop();
            true
        } else {
            false
        }
    }

    pub fn peek(&self) -> Option<Screen> {
        self.screens.last().copied()
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}
