//! The full-window timer application.
//!
//! Wires a [`timer::Model`] to keyboard, mouse, focus and window-size
//! messages and draws it centred with a help line underneath.

use crate::config::{self, TimerConfig};
use crate::gesture::PointerEvent;
use crate::help;
use crate::input::{Action, HoldCheckMsg, InputDispatcher};
use crate::timer::{self, VisibilityMsg};
use bubbletea_rs::{
    BlurMsg, Cmd, FocusMsg, KeyMsg, Model as BubbleTeaModel, MouseMsg, Msg, WindowSizeMsg,
};
use lipgloss_extras::lipgloss;
use std::time::Instant;

/// Rows kept free under the timer for the help line.
const HELP_ROWS: usize = 2;

/// A timer filling the window, driven by keyboard, mouse and focus.
#[derive(Debug)]
pub struct App {
    input: InputDispatcher<timer::Model>,
    help: help::Model,
    width: usize,
    height: usize,
}

impl App {
    /// Builds the application and its first command.
    pub fn new(config: &TimerConfig) -> (Self, Option<Cmd>) {
        let mut timer = timer::new(config);
        let cmd = timer.init();
        let app = Self {
            input: InputDispatcher::new(timer),
            help: help::Model::new(),
            width: 0,
            height: 0,
        };
        (app, cmd)
    }

    /// The timer being controlled.
    pub fn timer(&self) -> &timer::Model {
        self.input.target()
    }

    fn apply(&mut self, action: Action) -> Option<Cmd> {
        match action {
            Action::Quit => {
                log::info!("quitting");
                Some(bubbletea_rs::quit())
            }
            Action::ToggleHelp => {
                self.help.toggle();
                None
            }
            timer_action => self.input.dispatch(timer_action),
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.help.width = width;
        self.input
            .target_mut()
            .set_size(width, height.saturating_sub(HELP_ROWS));
    }
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        App::new(&config::installed())
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            let action = self.input.key(key_msg)?;
            return self.apply(action);
        }

        if let Some(mouse) = msg.downcast_ref::<MouseMsg>() {
            let event = PointerEvent::from_mouse(mouse.button, mouse.x, mouse.y, Instant::now())?;
            let (action, hold_check) = self.input.pointer(event);
            return match action {
                Some(action) => self.apply(action),
                None => hold_check,
            };
        }

        if msg.downcast_ref::<HoldCheckMsg>().is_some() {
            let action = self.input.poll_hold(Instant::now())?;
            return self.apply(action);
        }

        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.resize(size.width as usize, size.height as usize);
            return None;
        }

        if msg.downcast_ref::<FocusMsg>().is_some() {
            let visible = Box::new(VisibilityMsg { visible: true }) as Msg;
            return self.input.target_mut().update(visible);
        }

        if msg.downcast_ref::<BlurMsg>().is_some() {
            let hidden = Box::new(VisibilityMsg { visible: false }) as Msg;
            return self.input.target_mut().update(hidden);
        }

        self.input.target_mut().update(msg)
    }

    fn view(&self) -> String {
        let body = format!(
            "{}\n\n{}",
            self.timer().view(),
            self.help.view(&self.input.keymap)
        );
        center(&body, self.width, self.height)
    }
}

/// Centres every line of `content` in a `width` x `height` area.
fn center(content: &str, width: usize, height: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let top = height.saturating_sub(lines.len()) / 2;

    let body: Vec<String> = lines
        .iter()
        .map(|line| {
            let left = width.saturating_sub(lipgloss::width_visible(line)) / 2;
            format!("{}{}", " ".repeat(left), line)
        })
        .collect();
    format!("{}{}", "\n".repeat(top), body.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::HOLD_DURATION;
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
    use std::thread;

    fn app() -> App {
        let config = TimerConfig::default()
            .with_minutes(10)
            .with_fullscreen(false)
            .with_wake_lock(false)
            .with_big_digits(false);
        App::new(&config).0
    }

    fn press(app: &mut App, key: KeyCode) -> Option<Cmd> {
        app.update(Box::new(KeyMsg {
            key,
            modifiers: KeyModifiers::NONE,
        }))
    }

    #[test]
    fn test_keys_drive_timer() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.timer().clock().default_duration_ms(), 660_000);

        assert!(press(&mut app, KeyCode::Char(' ')).is_some());
        assert!(app.timer().running());

        press(&mut app, KeyCode::Down);
        assert_eq!(app.timer().clock().default_duration_ms(), 660_000);

        press(&mut app, KeyCode::Char('r'));
        assert!(!app.timer().running());
        assert_eq!(app.timer().clock().remaining_ms(), 660_000);
    }

    fn mouse(app: &mut App, button: MouseEventKind) -> Option<Cmd> {
        app.update(Box::new(MouseMsg {
            x: 5,
            y: 5,
            button,
            modifiers: KeyModifiers::NONE,
        }))
    }

    #[test]
    fn test_click_toggles_timer() {
        let mut app = app();
        let hold_check = mouse(&mut app, MouseEventKind::Down(MouseButton::Left));
        assert!(hold_check.is_some());
        assert!(!app.timer().running());

        assert!(mouse(&mut app, MouseEventKind::Up(MouseButton::Left)).is_some());
        assert!(app.timer().running());

        mouse(&mut app, MouseEventKind::Down(MouseButton::Left));
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left));
        assert!(!app.timer().running());
    }

    #[test]
    fn test_hold_check_resets_after_long_press() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.timer().running());

        mouse(&mut app, MouseEventKind::Down(MouseButton::Left));
        // Too early: not a hold yet.
        app.update(Box::new(HoldCheckMsg));
        assert!(app.timer().running());

        thread::sleep(HOLD_DURATION);
        app.update(Box::new(HoldCheckMsg));
        assert!(!app.timer().running());
        assert_eq!(app.timer().clock().remaining_ms(), 660_000);

        // Releasing after the hold is not also a tap.
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left));
        assert!(!app.timer().running());
    }

    #[test]
    fn test_help_toggle_and_quit() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Char('?')).is_none());
        assert!(app.help.show_all);
        assert!(press(&mut app, KeyCode::Char('q')).is_some());
    }

    #[test]
    fn test_view_is_centred() {
        let mut app = app();
        app.update(Box::new(WindowSizeMsg {
            width: 40,
            height: 10,
        }));
        let view = strip_ansi_escapes::strip_str(app.view());
        let timer_line = view
            .lines()
            .find(|line| line.contains("10:00"))
            .unwrap_or_default();
        assert!(timer_line.starts_with("               "));
    }

    #[test]
    fn test_center_pads_top_and_left() {
        assert_eq!(center("ab\ncd", 6, 4), "\n  ab\n  cd");
        assert_eq!(center("a\nabc", 5, 0), "  a\n abc");
        assert_eq!(center("ab", 0, 0), "ab");
    }
}
