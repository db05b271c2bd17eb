//! Turning key presses and pointer gestures into timer operations.
//!
//! [`InputDispatcher`] owns the timer it controls; the application hands
//! it over at construction and reaches it through the dispatcher
//! afterwards.

use crate::gesture::{Gesture, GestureRecognizer, PointerEvent, PointerKind};
use crate::help;
use crate::key::{Binding, KeyPress};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use std::time::Instant;

/// Something a user can do to the timer or the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start when stopped, stop when running.
    Toggle,
    /// Stop and restore the preset.
    Reset,
    /// Add one minute.
    AddMinute,
    /// Take one minute off.
    SubtractMinute,
    /// Switch between short and full help.
    ToggleHelp,
    /// Leave the application.
    Quit,
}

impl From<Gesture> for Action {
    fn from(gesture: Gesture) -> Self {
        match gesture {
            Gesture::Tap => Action::Toggle,
            Gesture::Hold => Action::Reset,
            Gesture::SwipeUp => Action::AddMinute,
            Gesture::SwipeDown => Action::SubtractMinute,
        }
    }
}

/// The timer operations reachable from input.
///
/// Each returns the command to run next, if the operation scheduled one.
pub trait Controls {
    /// Starts or stops the countdown.
    fn toggle(&mut self) -> Option<Cmd>;
    /// Stops and restores the preset.
    fn reset(&mut self) -> Option<Cmd>;
    /// Adds a minute.
    fn add_minute(&mut self) -> Option<Cmd>;
    /// Takes a minute off.
    fn subtract_minute(&mut self) -> Option<Cmd>;
}

/// Key bindings for the timer.
#[derive(Debug, Clone)]
pub struct KeyMap {
    pub toggle: Binding,
    pub add_minute: Binding,
    pub subtract_minute: Binding,
    pub reset: Binding,
    pub help: Binding,
    pub quit: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            toggle: Binding::new(vec![KeyCode::Char(' ')]).with_help("space", "start/stop"),
            add_minute: Binding::new(vec![KeyCode::Up]).with_help("↑", "+1 min"),
            subtract_minute: Binding::new(vec![KeyCode::Down]).with_help("↓", "-1 min"),
            reset: Binding::new(vec![KeyCode::Char('r'), KeyCode::Char('R')])
                .with_help("r", "reset"),
            help: Binding::new(vec![KeyCode::Char('?')]).with_help("?", "more"),
            quit: Binding::new(vec![
                KeyPress::from(KeyCode::Char('q')),
                KeyPress::from(KeyCode::Esc),
                KeyPress::from((KeyCode::Char('c'), KeyModifiers::CONTROL)),
            ])
            .with_help("q", "quit"),
        }
    }
}

impl KeyMap {
    /// The action bound to `msg`, if any.
    pub fn action(&self, msg: &KeyMsg) -> Option<Action> {
        let bindings = [
            (&self.toggle, Action::Toggle),
            (&self.add_minute, Action::AddMinute),
            (&self.subtract_minute, Action::SubtractMinute),
            (&self.reset, Action::Reset),
            (&self.help, Action::ToggleHelp),
            (&self.quit, Action::Quit),
        ];
        bindings
            .into_iter()
            .find(|(binding, _)| binding.matches(msg))
            .map(|(_, action)| action)
    }
}

impl help::KeyMap for KeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.toggle, &self.add_minute, &self.subtract_minute, &self.help]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.toggle, &self.reset],
            vec![&self.add_minute, &self.subtract_minute],
            vec![&self.help, &self.quit],
        ]
    }
}

/// Sent after a press to check whether it has become a hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldCheckMsg;

/// Routes input to the timer it owns.
#[derive(Debug)]
pub struct InputDispatcher<C: Controls> {
    /// Key bindings; change them to rebind keys.
    pub keymap: KeyMap,
    gestures: GestureRecognizer,
    target: C,
}

impl<C: Controls> InputDispatcher<C> {
    /// Takes ownership of `target` and uses the default key map.
    pub fn new(target: C) -> Self {
        Self::with_keymap(target, KeyMap::default())
    }

    /// Takes ownership of `target` with custom key bindings.
    pub fn with_keymap(target: C, keymap: KeyMap) -> Self {
        Self {
            keymap,
            gestures: GestureRecognizer::new(),
            target,
        }
    }

    /// The controlled target.
    pub fn target(&self) -> &C {
        &self.target
    }

    /// Mutable access to the controlled target.
    pub fn target_mut(&mut self) -> &mut C {
        &mut self.target
    }

    /// Applies a timer action. Application actions are left to the caller.
    pub fn dispatch(&mut self, action: Action) -> Option<Cmd> {
        match action {
            Action::Toggle => self.target.toggle(),
            Action::Reset => self.target.reset(),
            Action::AddMinute => self.target.add_minute(),
            Action::SubtractMinute => self.target.subtract_minute(),
            Action::ToggleHelp | Action::Quit => None,
        }
    }

    /// Translates a key press.
    pub fn key(&self, msg: &KeyMsg) -> Option<Action> {
        self.keymap.action(msg)
    }

    /// Feeds a pointer event.
    ///
    /// Returns the recognized action, and a hold check to schedule when
    /// the event began a press.
    pub fn pointer(&mut self, event: PointerEvent) -> (Option<Action>, Option<Cmd>) {
        let action = self.gestures.handle(event).map(Action::from);
        let hold_check = if event.kind == PointerKind::Down {
            let hold = self.gestures.hold_duration;
            Some(bubbletea_tick(hold, |_| Box::new(HoldCheckMsg) as Msg))
        } else {
            None
        };
        (action, hold_check)
    }

    /// Answers a [`HoldCheckMsg`].
    pub fn poll_hold(&mut self, now: Instant) -> Option<Action> {
        self.gestures.poll_hold(now).map(Action::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl Controls for Recorder {
        fn toggle(&mut self) -> Option<Cmd> {
            self.calls.push("toggle");
            None
        }

        fn reset(&mut self) -> Option<Cmd> {
            self.calls.push("reset");
            None
        }

        fn add_minute(&mut self) -> Option<Cmd> {
            self.calls.push("add");
            None
        }

        fn subtract_minute(&mut self) -> Option<Cmd> {
            self.calls.push("subtract");
            None
        }
    }

    fn key(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_default_key_bindings() {
        let keymap = KeyMap::default();
        assert_eq!(keymap.action(&key(KeyCode::Char(' '))), Some(Action::Toggle));
        assert_eq!(keymap.action(&key(KeyCode::Up)), Some(Action::AddMinute));
        assert_eq!(keymap.action(&key(KeyCode::Down)), Some(Action::SubtractMinute));
        assert_eq!(keymap.action(&key(KeyCode::Char('r'))), Some(Action::Reset));
        assert_eq!(keymap.action(&key(KeyCode::Char('R'))), Some(Action::Reset));
        assert_eq!(keymap.action(&key(KeyCode::Char('?'))), Some(Action::ToggleHelp));
        assert_eq!(keymap.action(&key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(keymap.action(&key(KeyCode::Char('x'))), None);

        let ctrl_c = KeyMsg {
            key: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
        };
        assert_eq!(keymap.action(&ctrl_c), Some(Action::Quit));
    }

    #[test]
    fn test_dispatch_reaches_owned_target() {
        let mut dispatcher = InputDispatcher::new(Recorder::default());
        for code in [KeyCode::Char(' '), KeyCode::Up, KeyCode::Down, KeyCode::Char('r')] {
            if let Some(action) = dispatcher.key(&key(code)) {
                dispatcher.dispatch(action);
            }
        }
        dispatcher.dispatch(Action::Quit);
        assert_eq!(
            dispatcher.target().calls,
            vec!["toggle", "add", "subtract", "reset"]
        );
    }

    #[test]
    fn test_gestures_map_to_actions() {
        let t0 = Instant::now();
        let mut dispatcher = InputDispatcher::new(Recorder::default());

        let down = PointerEvent::new(PointerKind::Down, 1, 1, t0);
        let (action, hold_check) = dispatcher.pointer(down);
        assert_eq!(action, None);
        assert!(hold_check.is_some());

        let up = PointerEvent::new(PointerKind::Up, 1, 1, t0 + Duration::from_millis(100));
        let (action, hold_check) = dispatcher.pointer(up);
        assert_eq!(action, Some(Action::Toggle));
        assert!(hold_check.is_none());

        let later = t0 + Duration::from_secs(1);
        dispatcher.pointer(PointerEvent::new(PointerKind::Down, 1, 1, later));
        assert_eq!(
            dispatcher.poll_hold(later + Duration::from_millis(500)),
            Some(Action::Reset)
        );
    }
}
